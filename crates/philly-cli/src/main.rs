//! The `philly` binary.

use std::{io, process::ExitCode, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use philly_cli::{Args, error_adapter::render_reports};

fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).ok();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter.unwrap_or(LevelFilter::Warn))
        .init();

    if filter.is_none() {
        warn!(level; "Unknown log level, falling back to warn");
    }
}

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    let result = philly_cli::run(&args, &mut io::stdout().lock());
    let Err(err) = result else {
        info!(input_path = args.input; "Done");
        return ExitCode::SUCCESS;
    };

    match render_reports(&err, &miette::GraphicalReportHandler::new()) {
        Ok(reports) => reports.iter().for_each(|report| error!("{report}")),
        Err(_) => error!("{err}"),
    }
    ExitCode::FAILURE
}
