//! Background completion of pending operations.
//!
//! Real libraries hand the request to their own I/O thread and signal
//! the async handle once the server answers. This does the same with a
//! plain thread and a short delay, so the adapter genuinely has to wait.

use groupware_mail::adapter::CompletionNotifier;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Run `work` on a new thread, park its output in `slot`, then fire
/// `notifier`.
pub fn spawn<T, F>(
    delay: Duration,
    slot: Arc<Mutex<Option<T>>>,
    notifier: CompletionNotifier,
    work: F,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    std::thread::spawn(move || {
        std::thread::sleep(delay);
        let out = work();
        *slot.lock().unwrap() = Some(out);
        notifier.complete();
    })
}
