use crossbeam_channel as cbc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A wait was cut short by the emergency latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/**
 * Latched emergency signal shared between a car and whoever may raise it.
 *
 * The level is kept in an atomic flag, so a signal raised while nobody is waiting is still seen
 * at the next check. Raising also drops a token on a one-slot channel to wake a pending `wait`.
 */
#[derive(Debug, Clone)]
pub struct EmergencyLatch {
    active: Arc<AtomicBool>,
    wake_tx: cbc::Sender<()>,
    wake_rx: cbc::Receiver<()>,
}

impl EmergencyLatch {
    pub fn new() -> EmergencyLatch {
        let (wake_tx, wake_rx) = cbc::bounded(1);
        EmergencyLatch {
            active: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    pub fn set(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
        if active {
            // A full slot already guarantees a wake-up.
            let _ = self.wake_tx.try_send(());
        }
    }

    pub fn raise(&self) {
        self.set(true);
    }

    pub fn lower(&self) {
        self.set(false);
    }

    pub fn is_raised(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Blocks for `duration` unless the latch is, or becomes, raised.
    pub fn wait(&self, duration: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now() + duration;

        loop {
            if self.is_raised() {
                return Err(Interrupted);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }

            cbc::select! {
                recv(self.wake_rx) -> _ => {}
                default(deadline - now) => {}
            }
        }
    }
}

impl Default for EmergencyLatch {
    fn default() -> Self {
        EmergencyLatch::new()
    }
}
