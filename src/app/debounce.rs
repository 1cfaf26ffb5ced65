use std::future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Trailing-edge debounce timer.
///
/// Only the most recently scheduled value is delivered, once `delay` has
/// passed without another `schedule` call.
#[derive(Debug)]
pub(crate) struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace whatever is pending and restart the quiet period.
    pub(crate) fn schedule(&mut self, value: T) {
        self.pending = Some((Instant::now() + self.delay, value));
    }

    pub(crate) fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the quiet period to elapse and hand out the pending value.
    ///
    /// Never resolves while nothing is pending. Safe to drop mid-wait: the
    /// value is only taken after the deadline has passed.
    pub(crate) async fn fire(&mut self) -> T {
        let Some(deadline) = self.pending.as_ref().map(|(deadline, _)| *deadline) else {
            return future::pending().await;
        };

        sleep_until(deadline).await;

        match self.pending.take() {
            Some((_, value)) => value,
            None => future::pending().await,
        }
    }
}
