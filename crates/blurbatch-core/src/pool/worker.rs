//! Consumer loop: pop a task, run the pipeline, apply the failure policy.

use std::sync::Arc;

use crate::config::FailurePolicy;
use crate::error::PipelineError;
use crate::pipeline::ImageProcessor;
use crate::queue::BoundedQueue;
use crate::types::Task;

use super::retry::{backoff_duration, is_retryable};
use super::stats::PoolCounters;
use super::stop::StopSignal;

pub(crate) struct Worker {
    pub(crate) id: usize,
    pub(crate) queue: Arc<BoundedQueue<Task>>,
    pub(crate) processor: Arc<ImageProcessor>,
    pub(crate) stop: StopSignal,
    pub(crate) counters: Arc<PoolCounters>,
    pub(crate) on_error: FailurePolicy,
    pub(crate) retry_attempts: u32,
    pub(crate) retry_delay_ms: u64,
}

impl Worker {
    /// Process tasks until the queue is closed and drained, or the pool stops.
    pub(crate) fn run(self) {
        tracing::debug!("Worker {} started", self.id);
        while let Some(task) = self.queue.pop() {
            if self.stop.is_stopped() {
                break;
            }
            self.handle(&task);
        }
        tracing::debug!("Worker {} exiting", self.id);
    }

    fn handle(&self, task: &Task) {
        let mut attempt = 0u32;
        loop {
            match self.processor.process_one(task.path()) {
                Ok(_) => {
                    self.counters.record_success();
                    return;
                }
                Err(e) if self.should_retry(attempt, &e) => {
                    let delay = backoff_duration(attempt, self.retry_delay_ms);
                    tracing::warn!(
                        "Worker {}: {} (retry {}/{} in {:?})",
                        self.id,
                        e,
                        attempt + 1,
                        self.retry_attempts,
                        delay
                    );
                    self.counters.record_retry();
                    attempt += 1;
                    if self.stop.wait_timeout(delay) {
                        self.counters.record_failure();
                        return;
                    }
                }
                Err(e) => {
                    self.counters.record_failure();
                    tracing::error!("Failed: {:?} - {}", e.path(), e);
                    return;
                }
            }
        }
    }

    fn should_retry(&self, attempt: u32, error: &PipelineError) -> bool {
        self.on_error == FailurePolicy::Retry
            && attempt < self.retry_attempts
            && is_retryable(error)
    }
}
