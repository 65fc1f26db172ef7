//! Trailing-edge debounce for conversion triggers.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Default quiet period between the last edit and the conversion.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Coalesces bursts of notifications into a single delayed trigger.
///
/// Each [`notify`](Self::notify) cancels the previously armed timer and arms
/// a new one, so at most one timer is alive at any time. Timers are child
/// tokens of a scheduler-wide root, which [`shutdown`](Self::shutdown) (or
/// dropping the scheduler) cancels.
pub struct Debouncer {
    quiet: Duration,
    root: CancellationToken,
    armed: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            root: CancellationToken::new(),
            armed: Mutex::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Arm (or re-arm) the quiet-period timer.
    ///
    /// `trigger` runs once the quiet period elapses without another call.
    /// Must be called from within a Tokio runtime.
    pub fn notify<F, Fut>(&self, trigger: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.root.is_cancelled() {
            tracing::debug!("Debouncer shut down, ignoring notify");
            return;
        }

        let timer = self.root.child_token();
        {
            let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = armed.replace(timer.clone()) {
                previous.cancel();
            }
        }

        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = timer.cancelled() => {
                    tracing::trace!("Debounce timer superseded");
                }

                _ = tokio::time::sleep(quiet) => {
                    // Consumed; a later notify has nothing to cancel.
                    timer.cancel();
                    tracing::debug!(quiet_ms = quiet.as_millis() as u64, "Debounce timer fired");
                    trigger().await;
                }
            }
        });
    }

    /// Drop the pending timer, if any, without firing it.
    pub fn cancel(&self) {
        let armed = self
            .armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(timer) = armed {
            timer.cancel();
        }
    }

    /// Whether a timer is armed and has not yet been cancelled or fired.
    pub fn is_armed(&self) -> bool {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    /// Cancel any pending timer and refuse further notifications.
    pub fn shutdown(&self) {
        self.root.cancel();
        self.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
