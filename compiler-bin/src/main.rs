use clap::Parser;
use loopguard::{cli, commands, logging};

fn main() -> anyhow::Result<()> {
    let config = cli::Config::parse();
    logging::start(&config)?;
    commands::run(&config)
}
