use crate::cli::Context;
use crate::cli::parser::Commands;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Log {
        print: true,
        operation,
        last,
    } = cmd
    {
        let pool = ctx.open()?;
        LogLogic::print_log(&pool, operation.as_deref(), *last)?;
    }

    Ok(())
}
