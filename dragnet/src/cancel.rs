use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};

/// Cooperative cancellation signal threaded through the walker and every
/// worker.
///
/// Clones are cheap and all observe the same signal. Besides the flag, the
/// token carries an alarm channel that disconnects when the signal trips, so
/// blocking channel operations can select on it instead of polling.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    guard: Arc<Mutex<Option<Sender<()>>>>,
    alarm: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            guard: Arc::new(Mutex::new(Some(tx))),
            alarm: rx,
        }
    }

    /// Trips the signal. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // Dropping the only sender disconnects every alarm receiver.
        if let Ok(mut guard) = self.guard.lock() {
            guard.take();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Receiver that stays silent until the token is cancelled and
    /// disconnects the moment it is; intended for `select!` arms guarding
    /// blocking sends and receives.
    pub(crate) fn alarm(&self) -> Receiver<()> {
        self.alarm.clone()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
