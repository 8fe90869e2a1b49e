//! Virtual time provider for deterministic testing
//!
//! Gesture and scroll recognition read wall-clock time when classifying
//! input. Routing those reads through a provider lets tests drive the
//! clock explicitly instead of sleeping.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Trait for providing time in tests and production
pub trait TimeProvider: Send + Sync + 'static {
    /// Get the current instant
    fn now(&self) -> Instant;
}

/// Production time provider that uses real system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Virtual time provider for testing
#[derive(Clone, Debug)]
pub struct VirtualTimeProvider {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl VirtualTimeProvider {
    /// Create a new virtual time provider
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        let mut offset = self.offset.lock().unwrap();
        *offset += duration;
    }

    /// Reset to initial time
    pub fn reset(&self) {
        *self.offset.lock().unwrap() = Duration::ZERO;
    }
}

impl Default for VirtualTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for VirtualTimeProvider {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}
