use crate::{Error, ImageJob, Result, image_io};
use derivative::Derivative;
use derive_setters::Setters;
use rayon::prelude::*;
use std::{
    collections::{HashMap, hash_map::Entry},
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<()>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per matched input file, in sorted input order.
    pub outcomes: Vec<FileOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Runs one [`ImageJob`] over every matching file of a directory.
///
/// A failing file never stops the batch; its error is kept in the report.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BatchProcessor {
    // 0 lets rayon pick one worker per CPU
    jobs: usize,

    #[derivative(Default(
        value = "image_io::DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()"
    ))]
    extensions: Vec<String>,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&self, job: &ImageJob, input_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        let start = Instant::now();
        let files = image_io::list_images(input_dir, &self.extensions)?;

        if files.is_empty() {
            log::warn!(
                "No files with extensions [{}] found in {}",
                self.extensions.join(", "),
                input_dir.display()
            );
            return Ok(BatchReport::default());
        }

        log::info!(
            "Processing {} images from {} into {}",
            files.len(),
            input_dir.display(),
            output_dir.display()
        );

        let tasks = plan_outputs(files, output_dir, job.suffix());
        let total = tasks.len();
        let completed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| Error::InvalidParameter(format!("cannot start {} workers: {e}", self.jobs)))?;

        let outcomes = pool.install(|| {
            tasks
                .into_par_iter()
                .map(|(input, output, claimed)| {
                    let result = claimed.and_then(|_| job.process_file(&input, &output));

                    match &result {
                        Ok(_) => log::info!("✓ {} -> {}", input.display(), output.display()),
                        Err(e) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                            log::error!("✗ {}: {e}", input.display());
                        }
                    }

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    let failed_so_far = failed.load(Ordering::Relaxed);
                    log::info!(
                        "Progress: {done}/{total} | Success: {} | Failed: {failed_so_far}",
                        done.saturating_sub(failed_so_far)
                    );

                    FileOutcome {
                        input,
                        output,
                        result,
                    }
                })
                .collect::<Vec<_>>()
        });

        Ok(BatchReport {
            outcomes,
            elapsed: start.elapsed(),
        })
    }
}

/// Pairs each input with its output path. An input whose output name was
/// already taken by an earlier input is marked failed up front.
fn plan_outputs(
    files: Vec<PathBuf>,
    output_dir: &Path,
    suffix: &str,
) -> Vec<(PathBuf, PathBuf, Result<()>)> {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    files
        .into_iter()
        .map(|input| {
            let output = image_io::output_path(&input, output_dir, suffix);
            let claim = match claimed.entry(output.clone()) {
                Entry::Occupied(owner) => Err(Error::ImageWrite {
                    path: output.clone(),
                    reason: format!("output name already used by {}", owner.get().display()),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(input.clone());
                    Ok(())
                }
            };
            (input, output, claim)
        })
        .collect()
}
