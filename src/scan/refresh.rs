use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Coalesces bursts of refresh requests into a single callback invocation.
///
/// Every `trigger` restarts the settle window; the callback runs once the
/// window passes without another trigger. Rapid re-toggling therefore
/// produces one visible update, not one per toggle.
pub struct RefreshDebouncer {
    tx: Sender<()>,
}

impl RefreshDebouncer {
    pub fn new<F>(settle: Duration, mut on_settle: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = channel();

        thread::spawn(move || loop {
            // Block until the first trigger of a burst arrives.
            if rx.recv().is_err() {
                return;
            }
            loop {
                match rx.recv_timeout(settle) {
                    Ok(()) => continue,
                    Err(RecvTimeoutError::Timeout) => {
                        on_settle();
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        });

        Self { tx }
    }

    /// Request a refresh. Fire-and-forget; a worker already gone during
    /// shutdown is not an error.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}
