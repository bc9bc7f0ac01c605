use clap::Args;
use mindfocus_core::FocusReporter;

use super::{print_json, Context};
use crate::input::SessionInput;

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    input: SessionInput,
}

pub fn run(args: ReportArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let settings = ctx.settings()?;
    let sessions = args.input.load(settings.offset)?;
    let reporter = FocusReporter::new(
        settings.config.weekly_aggregator()?,
        settings.streak_calculator(ctx.clock()),
    );

    print_json(&reporter.report(&sessions))
}
