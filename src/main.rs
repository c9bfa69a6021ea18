mod cli;
mod collect;
mod diff;
mod driver;
mod output;
mod report;
mod snapshot;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { output, boot_dir } => {
            collect::run_collect(&output, &boot_dir, cli.debug)
        }
        Commands::Diff { previous, current, format } => {
            utils::logging::init(cli.debug, None);
            output::run_diff(&previous, &current, &format).map_err(anyhow::Error::from)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
