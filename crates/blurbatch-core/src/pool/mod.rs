//! Scanner / worker pool coordination.
//!
//! ```text
//! Scanner(s) ──push──▶ BoundedQueue<Task> ──pop──▶ Worker × N ──▶ ImageProcessor
//! ```
//!
//! Scanners and workers are OS threads that share only the queue, the stop
//! signal and a set of counters. Image processing happens with no lock held.
//! When every scanner has finished (see `pool.max_passes`) the queue is closed
//! and workers exit after draining it.

mod retry;
mod scanner;
mod stats;
mod stop;
mod tracker;
mod worker;

pub use retry::{backoff_duration, is_retryable};
pub use stats::{PoolCounters, ProcessingStats};
pub use stop::StopSignal;
pub use tracker::ProcessedTracker;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::{Config, RescanPolicy};
use crate::error::{Result, SetupError};
use crate::pipeline::{Codec, FileDiscovery, ImageProcessor};
use crate::queue::BoundedQueue;
use crate::types::Task;

use scanner::Scanner;
use worker::Worker;

/// Check the input directory and make sure the output directory exists.
pub fn prepare_directories(
    input_dir: &Path,
    output_dir: &Path,
) -> std::result::Result<(), SetupError> {
    if !input_dir.exists() {
        return Err(SetupError::MissingInputDirectory(input_dir.to_path_buf()));
    }
    if !input_dir.is_dir() {
        return Err(SetupError::InputPathNotDirectory(input_dir.to_path_buf()));
    }

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir).map_err(|source| {
            SetupError::OutputDirectoryCreateFailure {
                path: output_dir.to_path_buf(),
                source,
            }
        })?;
        tracing::info!("Created output directory {:?}", output_dir);
    }
    if !output_dir.is_dir() {
        return Err(SetupError::OutputPathNotDirectory(output_dir.to_path_buf()));
    }
    Ok(())
}

/// Builds and starts the scanner / worker pool.
pub struct Coordinator {
    config: Config,
    processor: Arc<ImageProcessor>,
}

impl Coordinator {
    /// Create a coordinator that decodes and encodes with the `image` crate.
    pub fn new(config: Config) -> Self {
        let processor = Arc::new(ImageProcessor::new(&config));
        Self { config, processor }
    }

    /// Create a coordinator around a custom codec.
    pub fn with_codec(config: Config, codec: Arc<dyn Codec>) -> Self {
        let processor = Arc::new(ImageProcessor::with_codec(&config, codec));
        Self { config, processor }
    }

    /// Validate the configuration, prepare the directories and spawn every
    /// thread.
    ///
    /// Configuration and directory problems are reported before any thread
    /// starts.
    pub fn start(self) -> Result<PoolHandle> {
        self.config.validate()?;
        let input_dir = self.config.input_dir();
        let output_dir = self.config.output_dir();
        prepare_directories(&input_dir, &output_dir)?;

        let pool = &self.config.pool;
        let queue = Arc::new(BoundedQueue::new(pool.queue_capacity));
        let stop = StopSignal::new();
        let counters = Arc::new(PoolCounters::default());
        let tracker = match pool.rescan {
            RescanPolicy::Always => None,
            RescanPolicy::SkipProcessed => Some(Arc::new(ProcessedTracker::new())),
        };

        let mut handle = PoolHandle {
            queue: Arc::clone(&queue),
            stop: stop.clone(),
            counters: Arc::clone(&counters),
            scanners: Vec::with_capacity(pool.producer_count),
            workers: Vec::with_capacity(pool.consumer_count),
            started: Instant::now(),
        };

        for id in 0..pool.consumer_count {
            let worker = Worker {
                id,
                queue: Arc::clone(&queue),
                processor: Arc::clone(&self.processor),
                stop: stop.clone(),
                counters: Arc::clone(&counters),
                on_error: pool.on_error,
                retry_attempts: pool.retry_attempts,
                retry_delay_ms: pool.retry_delay_ms,
            };
            match spawn_named(format!("worker-{id}"), move || worker.run()) {
                Ok(thread) => handle.workers.push(thread),
                Err(e) => {
                    handle.signal_stop();
                    return Err(e.into());
                }
            }
        }

        let active_scanners = Arc::new(AtomicUsize::new(pool.producer_count));
        for id in 0..pool.producer_count {
            let scanner = Scanner {
                id,
                input_dir: input_dir.clone(),
                discovery: FileDiscovery::new(self.config.processing.clone()),
                queue: Arc::clone(&queue),
                stop: stop.clone(),
                counters: Arc::clone(&counters),
                tracker: tracker.clone(),
                poll_interval: Duration::from_millis(pool.poll_interval_ms),
                max_passes: pool.max_passes,
            };
            let queue = Arc::clone(&queue);
            let active = Arc::clone(&active_scanners);
            let body = move || {
                scanner.run();
                if active.fetch_sub(1, Ordering::AcqRel) == 1 {
                    queue.close();
                }
            };
            match spawn_named(format!("scanner-{id}"), body) {
                Ok(thread) => handle.scanners.push(thread),
                Err(e) => {
                    handle.signal_stop();
                    return Err(e.into());
                }
            }
        }

        tracing::info!(
            "Started {} scanner(s) and {} worker(s): {:?} -> {:?} (filter {}, queue {})",
            pool.producer_count,
            pool.consumer_count,
            input_dir,
            output_dir,
            self.config.blur.filter_size,
            pool.queue_capacity
        );
        Ok(handle)
    }
}

fn spawn_named<F>(name: String, body: F) -> std::result::Result<JoinHandle<()>, SetupError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(body)
        .map_err(|source| SetupError::Spawn { name, source })
}

/// Stops a running pool from another thread or task.
#[derive(Clone)]
pub struct ShutdownHandle {
    stop: StopSignal,
    queue: Arc<BoundedQueue<Task>>,
}

impl ShutdownHandle {
    /// Raise the stop signal and close the queue so blocked threads wake up.
    pub fn shutdown(&self) {
        self.stop.stop();
        self.queue.close();
    }

    pub fn is_shutdown(&self) -> bool {
        self.stop.is_stopped()
    }
}

/// Handle to a running pool.
///
/// Dropping the handle stops the pool without waiting for its threads.
pub struct PoolHandle {
    queue: Arc<BoundedQueue<Task>>,
    stop: StopSignal,
    counters: Arc<PoolCounters>,
    scanners: Vec<JoinHandle<()>>,
    workers: Vec<JoinHandle<()>>,
    started: Instant,
}

impl PoolHandle {
    /// Ask every scanner and worker to stop.
    ///
    /// Workers finish the image they are processing; queued tasks are dropped.
    pub fn stop(&self) {
        tracing::info!("Stopping pool ({} task(s) still queued)", self.queue.len());
        self.signal_stop();
    }

    fn signal_stop(&self) {
        self.shutdown_handle().shutdown();
    }

    /// A handle that can stop the pool after this handle has been moved
    /// (for example into a blocking `join`).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            stop: self.stop.clone(),
            queue: Arc::clone(&self.queue),
        }
    }

    /// Current counters.
    pub fn stats(&self) -> ProcessingStats {
        self.counters.snapshot(self.started.elapsed())
    }

    /// Wait for every thread to exit and return the final counters.
    ///
    /// Without `pool.max_passes` this only returns after [`stop`](Self::stop).
    pub fn join(mut self) -> ProcessingStats {
        for thread in self.scanners.drain(..).chain(self.workers.drain(..)) {
            let name = thread.thread().name().unwrap_or("pool").to_string();
            if thread.join().is_err() {
                tracing::error!("Thread {} panicked", name);
            }
        }
        let stats = self.stats();
        tracing::info!(
            "Pool finished: {} succeeded, {} failed, {} enqueued in {:.1}s",
            stats.succeeded,
            stats.failed,
            stats.enqueued,
            stats.total_seconds
        );
        stats
    }
}

impl Drop for PoolHandle {
    fn drop(&mut self) {
        self.signal_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare_directories(&dir.path().join("nope"), &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, SetupError::MissingInputDirectory(_)));
    }

    #[test]
    fn test_input_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("input");
        std::fs::write(&file, b"").unwrap();
        let err = prepare_directories(&file, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, SetupError::InputPathNotDirectory(_)));
    }

    #[test]
    fn test_output_directory_created() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("nested");
        prepare_directories(dir.path(), &output).unwrap();
        assert!(output.is_dir());
    }

    #[test]
    fn test_output_path_occupied_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();
        let output = dir.path().join("out");
        std::fs::write(&output, b"").unwrap();

        let err = prepare_directories(&input, &output).unwrap_err();
        assert!(matches!(err, SetupError::OutputPathNotDirectory(_)));
    }

    #[test]
    fn test_output_directory_create_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        // A regular file in the middle of the path makes creation fail.
        let err = prepare_directories(&input, &blocker.join("out")).unwrap_err();
        assert!(matches!(
            err,
            SetupError::OutputDirectoryCreateFailure { .. }
        ));
    }
}
