mod cli;
mod cmd;
mod log;
mod time;
mod util;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use cmd::common::OutputOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    log::init_logger(&cli)?;

    let opts = OutputOptions {
        json: cli.json,
        no_stdout: cli.no_stdout,
        output: cli.output.clone(),
    };
    if opts.no_stdout && opts.output.is_none() {
        tracing::warn!("--no-stdout without --output discards the report");
    }

    let result = match cli.command {
        Command::Port(args) => cmd::port::run(args, opts).await,
        Command::Path(args) => cmd::path::run(args, opts).await,
        Command::Domain(args) => cmd::domain::run(args, opts).await,
    };
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}
