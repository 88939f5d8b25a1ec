//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking a running solver to stop.
///
/// The solver checks it between records, so a stop is prompt but never
/// leaves a record half-written. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Create a signal that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this signal to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check whether a stop was requested.
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag so the signal can drive another run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}
