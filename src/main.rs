use anyhow::Context;
use clap::Parser;
use log::*;

use clspv_batch::cli::Cli;
use clspv_batch::report;
use clspv_batch::{BatchError, run_with_process};

fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = cli.config();

    let outcome = match run_with_process(&config) {
        Ok(outcome) => outcome,
        Err(BatchError::DirectoryNotFound(directory)) => {
            println!("error: directory {} does not exist!", directory.display());
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!(
                    "compiling .cl files in {} with \"{}\"",
                    config.directory.display(),
                    config.command
                )
            });
        }
    };

    println!("{}", outcome.summary);

    if let Some(report_path) = report::report_path_from_env() {
        match report::write_report(&report_path, &config, &outcome) {
            Ok(()) => info!("wrote run report to {}", report_path.display()),
            Err(err) => error!("failed to write run report: {err:#}"),
        }
    }

    Ok(())
}
