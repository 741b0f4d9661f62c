//! stravi CLI
//!
//! Command-line interface for converting PlayStation STR movies to AVI.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    if !verbose {
        // Normal output is the user-facing report, so print bare messages.
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::StrToAvi {
            input,
            output,
            fps,
            size,
        } => commands::convert::run_str2avi(&input, output, fps, size, cli.quiet),
        Commands::AviToStr { input } => commands::convert::run_avi2str(&input),
        Commands::Probe { input } => commands::probe::run_probe(&input),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show();
                Ok(())
            }
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::Init { force } => commands::config::run_config_init(force),
        },
    };

    if let Err(e) = result {
        log::error!("Error: {}", e);
        std::process::exit(1);
    }
}
