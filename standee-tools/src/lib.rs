pub mod cli;
pub mod config;

use anyhow::{Context, Result, bail};
use cli::CommonArgs;
use config::Config;
use image_matte::{ImageJob, image_io};
use std::process::ExitCode;

/// Initializes the logger.
///
/// Format: `[HH:MM:SS LEVEL file line] message`. `RUST_LOG` overrides the
/// default level, which is `info` (or `debug` when `verbose`).
pub fn init_logger(verbose: bool) {
    use std::io::Write;

    let default_level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

/// Runs `job` over a single file or a directory. `Ok(false)` means at least
/// one file of a batch failed.
pub fn run(common: &CommonArgs, config: &Config, job: &ImageJob) -> Result<bool> {
    if let Some(input) = &common.source.input {
        if !input.is_file() {
            bail!("Input file not found: {}", input.display());
        }

        if !image_io::has_png_extension(&common.output) {
            log::warn!(
                "{} does not end in .png, PNG data is written anyway",
                common.output.display()
            );
        }

        job.process_file(input, &common.output)
            .with_context(|| format!("process {}", input.display()))?;
        log::info!("✓ {} -> {}", input.display(), common.output.display());
        return Ok(true);
    }

    let Some(dir) = &common.source.directory else {
        bail!("either an input file or an input directory is required");
    };
    if !dir.is_dir() {
        bail!("Input directory not found: {}", dir.display());
    }

    let report = common
        .batch_processor(config)
        .run(job, dir, &common.output)
        .with_context(|| format!("process directory {}", dir.display()))?;

    log::info!(
        "Completed: {}/{} images processed successfully in {:.2?}",
        report.succeeded(),
        report.total(),
        report.elapsed
    );
    for failure in report.failures() {
        if let Err(e) = &failure.result {
            log::error!("failed: {}: {e}", failure.input.display());
        }
    }

    Ok(report.is_success())
}

pub fn exit_code(result: Result<bool>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
