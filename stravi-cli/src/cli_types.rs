//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stravi")]
#[command(about = "Convert PlayStation STR movies to AVI", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output frame size, overriding what the stream declares.
#[derive(Args, Clone, Copy)]
pub(crate) struct SizeArgs {
    /// Frame width in pixels
    #[arg(
        long,
        requires = "height",
        value_parser = clap::value_parser!(u32).range(16..=stravi_lib::MAX_WIDTH as i64)
    )]
    pub width: Option<u32>,

    /// Frame height in pixels
    #[arg(
        long,
        requires = "width",
        value_parser = clap::value_parser!(u32).range(16..=stravi_lib::MAX_HEIGHT as i64)
    )]
    pub height: Option<u32>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Convert an STR movie to uncompressed AVI
    #[command(name = "str2avi")]
    StrToAvi {
        /// Input STR file (raw 2352-byte sectors)
        input: PathBuf,

        /// Output AVI file (default: input name with .avi extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output frame rate (default: from settings, else 15)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=120))]
        fps: Option<u32>,

        #[command(flatten)]
        size: SizeArgs,
    },

    /// Convert an AVI file back to STR (not supported)
    #[command(name = "avi2str")]
    AviToStr {
        /// Input AVI file
        input: PathBuf,
    },

    /// Show what an STR or AVI file contains without converting it
    Probe {
        /// STR or AVI file
        input: PathBuf,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with the default values
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
#[path = "tests/cli_types_tests.rs"]
mod tests;
