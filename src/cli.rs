use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "guardian")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIME"), ")"))]
#[command(about = "Container host snapshot and change-log tool for disaster recovery", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a snapshot, write the change log and store the snapshot for next time
    Run {
        /// Directory holding the stored snapshot and change log
        #[arg(short, long, env = "OUTPUT_DIR", default_value = "/output")]
        output: PathBuf,

        /// Boot configuration directory used for host identity
        #[arg(long, default_value = "/boot")]
        boot_dir: PathBuf,
    },

    /// Compare two stored snapshot documents
    #[command(arg_required_else_help = true)]
    Diff {
        /// Older snapshot document
        #[arg(short, long)]
        previous: PathBuf,

        /// Newer snapshot document
        #[arg(short, long)]
        current: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}
