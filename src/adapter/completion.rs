//! Completion notification for pending operations
//!
//! The library's worker thread fires a [`CompletionNotifier`]; the
//! adapter awaits the matching [`CompletionSignal`] before running the
//! end primitive.

use tokio::sync::watch;

/// Create a connected notifier/signal pair.
#[must_use]
pub fn completion_channel() -> (CompletionNotifier, CompletionSignal) {
    let (tx, rx) = watch::channel(false);
    (CompletionNotifier(tx), CompletionSignal(rx))
}

/// Held by whoever performs the work. Safe to fire from any thread.
#[derive(Debug)]
pub struct CompletionNotifier(watch::Sender<bool>);

impl CompletionNotifier {
    pub fn complete(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct CompletionSignal(watch::Receiver<bool>);

impl CompletionSignal {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolve once the operation completes, or once the notifier is
    /// dropped without completing. The end primitive reports what went
    /// wrong in the latter case.
    pub async fn wait(mut self) {
        let _ = self.0.wait_for(|done| *done).await;
    }
}
