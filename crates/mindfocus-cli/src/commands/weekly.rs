use clap::Args;
use mindfocus_core::Clock;

use super::{print_json, Context};
use crate::input::SessionInput;

#[derive(Args)]
pub struct WeeklyArgs {
    #[command(flatten)]
    input: SessionInput,
    /// Aggregate every session instead of only the rolling window
    #[arg(long)]
    all: bool,
}

pub fn run(args: WeeklyArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let settings = ctx.settings()?;
    let aggregator = settings.config.weekly_aggregator()?;
    let sessions = args.input.load(settings.offset)?;

    let selected = if args.all {
        sessions
    } else {
        aggregator.window(&sessions, ctx.clock().now())
    };

    print_json(&aggregator.breakdown(&selected))
}
