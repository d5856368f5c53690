use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;

use tracing::{debug, error, info};
use workerpool::thunk::{Thunk, ThunkWorker};
use workerpool::Pool;

use super::{Pipeline, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

/// One file to transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: PathBuf,
    pub output: PathBuf,
    pub direction: Direction,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub finished: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, PipelineError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Pipeline {
    /// Runs every job on a pool of `n_workers` threads. Jobs share nothing
    /// but the pipeline handles; a failed job is recorded and the rest go on.
    pub fn run_batch(&self, jobs: Vec<Job>, key: &[u8], n_workers: usize) -> BatchReport {
        let workers = Pool::<ThunkWorker<(PathBuf, Result<(), PipelineError>)>>::new(n_workers.max(1));
        let n_jobs = jobs.len();
        let key: Arc<[u8]> = Arc::from(key);

        info!(jobs = n_jobs, workers = n_workers, "batch started");

        let (tx, rx) = channel();
        for job in jobs {
            let pipeline = self.clone();
            let key = Arc::clone(&key);

            workers.execute_to(tx.clone(), Thunk::of(move || {
                let result = worker_run(&pipeline, &job, &key);
                (job.source, result)
            }));
        }

        let mut report = BatchReport::default();
        for (source, result) in rx.iter().take(n_jobs) {
            match result {
                Ok(()) => {
                    debug!("Files finished: {}/{}, path: {}", report.finished.len() + 1, n_jobs, source.display());
                    report.finished.push(source);
                }
                Err(e) => {
                    error!("Error while processing {}: {}", source.display(), e);
                    report.failed.push((source, e));
                }
            }
        }

        info!(finished = report.finished.len(), failed = report.failed.len(), "batch done");
        report
    }
}

fn worker_run(pipeline: &Pipeline, job: &Job, key: &[u8]) -> Result<(), PipelineError> {
    if let Some(prefix) = job.output.parent() {
        fs::create_dir_all(prefix).map_err(|e| PipelineError::io(prefix, e))?;
    }

    match job.direction {
        Direction::Encode => {
            let data = read(&job.source)?;
            pipeline.save(&job.output, &data, key)
        }
        Direction::Decode => {
            let data = pipeline.load(&job.source, key)?;
            fs::write(&job.output, data).map_err(|e| PipelineError::io(&job.output, e))
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, PipelineError> {
    fs::read(path).map_err(|e| PipelineError::io(path, e))
}
