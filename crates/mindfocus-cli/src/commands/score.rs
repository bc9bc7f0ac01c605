use clap::Args;
use mindfocus_core::{Clock, FocusSession};

use super::{print_json, Context};

#[derive(Args)]
pub struct ScoreArgs {
    /// Focused minutes; omit for an unmeasured session
    #[arg(long)]
    duration: Option<f64>,
    /// Number of logged distractions
    #[arg(long)]
    distractions: Option<u32>,
    /// The session's task was finished
    #[arg(long)]
    completed: bool,
}

pub fn run(args: ScoreArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let scorer = ctx.settings()?.config.session_scorer()?;

    let session = FocusSession {
        start_time: ctx.clock().now(),
        end_time: None,
        duration_minutes: args.duration,
        task_completed: Some(args.completed),
        distraction_count: args.distractions,
    };
    session.validate()?;

    print_json(&scorer.breakdown(&session))
}
