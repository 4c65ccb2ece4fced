//! Cancellable delayed emission of rapidly-changing values.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Holds at most one pending timer. Each [`Debouncer::observe`] replaces it;
/// when a timer survives its full window the value is sent to the paired
/// [`DebouncedValues`]. Dropping the debouncer cancels the pending timer.
pub struct Debouncer<T> {
    window: Duration,
    runtime: Handle,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

/// Receiving end of a [`Debouncer`]: the stabilized values, in emission order.
pub struct DebouncedValues<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> DebouncedValues<T> {
    /// Waits for the next stabilized value. `None` once the debouncer is gone
    /// and no timer is left to fire.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(window: Duration, runtime: Handle) -> (Self, DebouncedValues<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            window,
            runtime,
            tx,
            pending: None,
        };
        (debouncer, DebouncedValues { rx })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Restarts the quiet period with `value` as the candidate emission.
    /// Equal consecutive values are not special-cased.
    pub fn observe(&mut self, value: T) {
        self.cancel();
        // Deadline is fixed now, not when the task first gets polled.
        let deadline = Instant::now() + self.window;
        let tx = self.tx.clone();
        self.pending = Some(self.runtime.spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(value);
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Debouncer<T> {
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
