pub mod inspect;
pub mod run;

use anyhow::Result;

use crate::cli::{Cli, Commands};

/// Dispatches the parsed CLI; returns whether every scenario passed.
pub async fn dispatch(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Inspect(args) => inspect::execute(args).await.map(|()| true),
    }
}
