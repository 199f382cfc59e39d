use anyhow::Result;
use cli::{Cli, Commands};
use config::Configuration;
use std::process::ExitCode;

mod cli;
mod config;
mod config_wizard;
mod elements;
mod fetch;
mod fonts;
mod layout;
mod localization;
mod meta;
mod pipeline;
mod sinks;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    if let Commands::Config = &cli.command {
        return config_wizard::run(&cli.config);
    }

    println!("Loading configuration...");
    let config = Configuration::load(&cli.config)?;

    match &cli.command {
        Commands::Config => Ok(()),
        Commands::Fetch(args) => fetch::run(&config, args),
        Commands::Normalize(args) => pipeline::normalize(&config, args),
        Commands::Cover => pipeline::cover(&config),
        Commands::Render => pipeline::render(&config),
        Commands::Build => pipeline::build(&config),
    }
}
