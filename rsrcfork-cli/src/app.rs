use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rsrcfork - inspect, extract and rewrite classic Macintosh resource forks
#[derive(Debug, Parser)]
#[command(name = "rsrcfork", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display file overview: size, attributes, type and resource counts.
    Info {
        /// Path to the resource file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// List resources with their IDs, names, attributes and sizes.
    List {
        /// Path to the resource file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show only resources of one type (four characters, e.g. 'STR ').
        #[arg(short, long, value_name = "TYPE")]
        r#type: Option<String>,
    },

    /// Write the payload of a single resource to a file or stdout.
    Extract {
        /// Path to the resource file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Resource type (four characters).
        #[arg(value_name = "TYPE")]
        r#type: String,

        /// Resource ID.
        #[arg(long, allow_negative_numbers = true, conflicts_with = "name")]
        id: Option<i16>,

        /// Resource name (case-insensitive).
        #[arg(long)]
        name: Option<String>,

        /// Destination file; stdout when omitted.
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Re-encode a resource file onto itself.
    Rewrite {
        /// Path to the resource file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Truncate and rewrite the open file instead of replacing it atomically.
        #[arg(long)]
        in_place: bool,
    },

    /// Re-encode a resource file to a new path, leaving the original untouched.
    SaveAs {
        /// Path to the resource file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Destination path.
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },
}
