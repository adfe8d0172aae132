//! Recurring worker tasks.
//!
//! `RecurringTask` runs a closure on a named thread at a fixed interval
//! until cancelled. It replaces self-rescheduling callbacks with an
//! explicit start/cancel lifecycle: cancellation sets a stop flag that
//! is observed at the top of every iteration, and `cancel` joins the
//! worker before returning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle to a periodically running worker thread.
pub struct RecurringTask {
    name: String,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RecurringTask {
    /// Spawn a named worker that invokes `tick` once per `interval`
    /// until the task is cancelled.
    pub fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    tick();
                    std::thread::sleep(interval);
                }
            })
            .unwrap_or_else(|e| panic!("failed to spawn worker thread '{name}': {e}"));

        Self {
            name: name.to_string(),
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the worker and wait for its current iteration to finish.
    pub fn cancel(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[TASK] worker '{}' panicked", self.name);
            }
        }
    }
}

impl Drop for RecurringTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
