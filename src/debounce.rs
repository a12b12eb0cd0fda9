use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Default quiescence window for resize bursts.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(250);

/// Coalesces a burst of triggers into one delayed callback.
///
/// Each `schedule` cancels the pending callback, if any, and restarts the
/// quiet period. Outside a tokio runtime there is no timer to wait on, so
/// the callback runs immediately.
pub struct Debouncer {
    quiet: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Mutex::new(None),
        }
    }

    pub fn schedule<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let quiet = self.quiet;
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
            trace!("Superseded pending debounced callback");
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            drop(pending);
            debug!("No runtime for debounce timer, running callback now");
            callback();
            return;
        };
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(quiet).await;
            callback();
        }));
    }

    /// Drops the pending callback without running it.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_one_call() {
        let debouncer = Debouncer::default();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            debouncer.schedule(counting(&calls));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_callback_wins() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for value in [1, 2, 3] {
            let seen = Arc::clone(&seen);
            debouncer.schedule(move || seen.lock().push(value));
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        assert_eq!(*seen.lock(), vec![3]);
    }

    #[test]
    fn test_runs_immediately_without_runtime() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let calls = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting(&calls));
        debouncer.schedule(counting(&calls));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let calls = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting(&calls));
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }
}
