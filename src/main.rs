mod cli;
mod client;
mod commands;
mod config;
mod error;
mod github;
mod jira;
mod output;
mod release;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::Context;
use config::Config;
use error::{ReleaseError, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let verbose = cli.verbose;
    if let Err(e) = run(cli).await {
        if e.is_ambiguous() {
            eprintln!("{}", "💀 FATAL ERROR 💀".red());
            eprintln!();
        }
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(exit_code(&e));
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "siali=debug" } else { "siali=warn" };
    let filter = EnvFilter::try_from_env("SIALI_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn exit_code(error: &ReleaseError) -> i32 {
    if error.is_ambiguous() {
        2
    } else {
        1
    }
}

async fn run(cli: Cli) -> Result<()> {
    output::set_json_output(cli.json);

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "siali", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?.merge(cli.settings.into_config());
            let ctx = Context::new(config)?;

            match command {
                Commands::Status => commands::status::run(&ctx).await?,
                Commands::Show { version } => commands::show::run(&ctx, version).await?,
                Commands::Releases { limit } => commands::releases::list(&ctx, limit).await?,
                Commands::Next => commands::releases::next(&ctx).await?,
                Commands::Start(args) => commands::start::run(&ctx, args).await?,
                Commands::Description(args) => commands::description::run(&ctx, args).await?,
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
