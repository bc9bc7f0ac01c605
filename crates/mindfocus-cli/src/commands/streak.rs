use clap::Args;

use super::{print_json, Context};
use crate::input::SessionInput;

#[derive(Args)]
pub struct StreakArgs {
    #[command(flatten)]
    input: SessionInput,
}

pub fn run(args: StreakArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let settings = ctx.settings()?;
    let streaks = settings.streak_calculator(ctx.clock());
    let sessions = args.input.load(settings.offset)?;

    print_json(&streaks.summary(&sessions))
}
