use crate::cli::Context;
use crate::cli::parser::Commands;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, ctx: &Context) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let pool = ctx.open()?;
        BackupLogic::backup(&pool, &ctx.cfg.database, file, *compress, *force)?;
    }

    Ok(())
}
