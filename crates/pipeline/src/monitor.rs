//! Progress monitor for long-running migrations.
//!
//! A timer thread ticks at a fixed interval and logs the elapsed seconds
//! every few ticks so operators can see the import is alive. It carries no
//! data dependency on the pipeline; the coordinator cancels it on every
//! exit path.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use tracing::info;

/// The periodic progress reporter.
pub struct ProgressMonitor;

impl ProgressMonitor {
    /// Starts the timer thread.
    ///
    /// Ticks every `interval` and logs elapsed seconds every `log_every`
    /// ticks.
    pub fn start(interval: Duration, log_every: u32) -> ProgressHandle {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let ticks = Arc::new(AtomicU64::new(0));

        let thread = {
            let ticks = Arc::clone(&ticks);
            thread::spawn(move || {
                let started = Instant::now();
                loop {
                    match stop_rx.recv_timeout(interval) {
                        // A message or a disconnect both mean cancellation.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {
                            let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                            if tick % u64::from(log_every.max(1)) == 0 {
                                info!(
                                    elapsed_secs = started.elapsed().as_secs(),
                                    "asset import in progress"
                                );
                            }
                        },
                    }
                }
            })
        };

        ProgressHandle { stop_tx, thread: Some(thread), ticks }
    }
}

/// Handle used to cancel the progress monitor.
///
/// Dropping the handle cancels the monitor as well, so the timer never
/// outlives the coordinator's cleanup path.
pub struct ProgressHandle {
    stop_tx: Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl ProgressHandle {
    /// Stops the timer thread and waits for it to exit.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    /// Returns the number of ticks fired so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.try_send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_ticks_until_cancelled() {
        let handle = ProgressMonitor::start(Duration::from_millis(5), 5);
        thread::sleep(Duration::from_millis(60));

        let seen = handle.ticks();
        assert!(seen >= 3, "expected at least 3 ticks, saw {seen}");
        handle.cancel();
    }

    #[test]
    fn test_cancel_stops_ticking() {
        let handle = ProgressMonitor::start(Duration::from_millis(5), 1);
        thread::sleep(Duration::from_millis(30));
        let ticks = Arc::clone(&handle.ticks);
        handle.cancel();

        let after_cancel = ticks.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::Relaxed), after_cancel);
    }

    #[test]
    fn test_drop_cancels_without_hanging() {
        let handle = ProgressMonitor::start(Duration::from_millis(5), 5);
        drop(handle);
    }
}
