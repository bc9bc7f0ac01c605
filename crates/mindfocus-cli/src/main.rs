use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;

#[derive(Parser)]
#[command(name = "mindfocus-cli", version, about = "MindFocus CLI")]
pub(crate) struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Treat this RFC 3339 instant as "now" instead of the system clock
    #[arg(long, global = true, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single focus session
    Score(commands::score::ScoreArgs),
    /// Aggregate score over the rolling window
    Weekly(commands::weekly::WeeklyArgs),
    /// Current and longest streaks
    Streak(commands::streak::StreakArgs),
    /// Full analytics report
    Report(commands::report::ReportArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let ctx = commands::Context::new(cli.now);
    let result = match cli.command {
        Commands::Score(args) => commands::score::run(args, &ctx),
        Commands::Weekly(args) => commands::weekly::run(args, &ctx),
        Commands::Streak(args) => commands::streak::run(args, &ctx),
        Commands::Report(args) => commands::report::run(args, &ctx),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
