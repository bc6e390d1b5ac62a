use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{ErrorKind, MogulError, MogulResult};

/// Cancellation and deadline token passed to every store call.
///
/// [`Context::background`] never expires. Clones share the cancellation
/// flag, so cancelling one clone cancels every operation holding another.
#[derive(Clone, Debug, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Context {
    /// A context without deadline that is never cancelled unless asked to.
    pub fn background() -> Self {
        Context::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Context::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Context {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when the context never expires.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with `Cancelled` or `Timeout` once the context is done.
    pub fn check(&self) -> MogulResult<()> {
        if self.is_cancelled() {
            return Err(MogulError::new("context cancelled", ErrorKind::Cancelled));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(MogulError::new("context deadline exceeded", ErrorKind::Timeout));
            }
        }
        Ok(())
    }
}
