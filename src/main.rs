mod cli;

use std::process::ExitCode;

use env_logger::{Builder, Target};
use log::{error, info};

use cli::Cli;
use nav_vectors::prelude::Driver;

pub fn main() -> ExitCode {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();

    let Some(base) = cli.directory() else {
        Cli::print_help();
        return ExitCode::SUCCESS;
    };

    let cfg = match cli.config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    match Driver::new(cfg).run(&base) {
        Ok(report) => {
            info!("{} - done", base.display());
            if report.failed_files > 0 {
                error!("{} file(s) could not be processed", report.failed_files);
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
