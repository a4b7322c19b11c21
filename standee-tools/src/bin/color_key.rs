use anyhow::Result;
use clap::Parser;
use standee_tools::{cli::ColorKeyArgs, config::Config, exit_code, init_logger};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = ColorKeyArgs::parse();
    init_logger(args.common.verbose);
    exit_code(run(&args))
}

fn run(args: &ColorKeyArgs) -> Result<bool> {
    let config = Config::load_or_default(args.common.config.as_deref())?;
    let job = args.job(&config)?;
    log::debug!("{job:?}");

    standee_tools::run(&args.common, &config, &job)
}
