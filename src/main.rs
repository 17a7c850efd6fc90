use anyhow::Result;
use clap::Parser;

use capsync::config;

mod cli;
mod pipeline;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "capsync starting");

    match args.command {
        cli::Command::Group(cmd) => pipeline::run_group(cmd, &cfg),
        cli::Command::Replay(cmd) => pipeline::run_replay(cmd, &cfg),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
