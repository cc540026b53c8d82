//! Producer loop: scan the input directory, enqueue every image, pause, repeat.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::FileDiscovery;
use crate::queue::BoundedQueue;
use crate::types::Task;

use super::stats::PoolCounters;
use super::stop::StopSignal;
use super::tracker::ProcessedTracker;

pub(crate) struct Scanner {
    pub(crate) id: usize,
    pub(crate) input_dir: PathBuf,
    pub(crate) discovery: FileDiscovery,
    pub(crate) queue: Arc<BoundedQueue<Task>>,
    pub(crate) stop: StopSignal,
    pub(crate) counters: Arc<PoolCounters>,
    /// Present in `skip_processed` mode.
    pub(crate) tracker: Option<Arc<ProcessedTracker>>,
    pub(crate) poll_interval: Duration,
    pub(crate) max_passes: Option<u64>,
}

impl Scanner {
    /// Scan until stopped, the queue closes, or `max_passes` is reached.
    ///
    /// With no tracker every pass re-enqueues every file, including ones
    /// already blurred on earlier passes.
    pub(crate) fn run(self) {
        tracing::debug!("Scanner {} watching {:?}", self.id, self.input_dir);
        let mut passes = 0u64;

        'scan: while !self.stop.is_stopped() {
            let files = self.discovery.discover(&self.input_dir);
            if let Some(tracker) = &self.tracker {
                tracker.retain_present(&files);
            }
            let mut enqueued = 0usize;

            for path in files {
                if self.stop.is_stopped() {
                    break 'scan;
                }
                if let Some(tracker) = &self.tracker {
                    if !tracker.should_enqueue(&path) {
                        self.counters.record_unchanged();
                        continue;
                    }
                }
                if self.queue.push(Task::new(path)).is_err() {
                    tracing::debug!("Scanner {}: queue closed", self.id);
                    break 'scan;
                }
                self.counters.record_enqueued();
                enqueued += 1;
            }

            passes += 1;
            self.counters.record_pass();
            tracing::trace!("Scanner {} pass {}: {} enqueued", self.id, passes, enqueued);

            if self.max_passes.is_some_and(|max| passes >= max) {
                tracing::debug!("Scanner {} finished after {} passes", self.id, passes);
                break;
            }
            if !self.poll_interval.is_zero() && self.stop.wait_timeout(self.poll_interval) {
                break;
            }
        }

        tracing::debug!("Scanner {} exiting", self.id);
    }
}
