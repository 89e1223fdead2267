use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use smartdo::cli::args::{Cli, Commands};
use smartdo::cli::commands::{self, Context};
use smartdo::config::{ColorSetting, Config};

/// Environment variable holding the log filter, e.g. `SMARTDO_LOG=debug`.
const LOG_ENV: &str = "SMARTDO_LOG";

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {},
    }

    let ctx = Context::new(config, cli.timezone.as_deref(), cli.output)?;

    let output = match cli.command {
        Commands::Add(args) => commands::add(&ctx, args)?,
        Commands::List { status } => commands::list(&ctx, status)?,
        Commands::Show { id } => commands::show(&ctx, id)?,
        Commands::Done { id } => commands::done(&ctx, id)?,
        Commands::Reopen { id } => commands::reopen(&ctx, id)?,
        Commands::Delete { id } => commands::delete(&ctx, id)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
