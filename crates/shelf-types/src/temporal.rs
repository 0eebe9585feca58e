use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Source of wall-clock timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant. Useful for deterministic tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Wraps a clock so that every stamp is strictly greater than the last one.
///
/// When the source has not advanced (or has moved backwards) the previous
/// stamp is bumped by one microsecond. This keeps `updated_at > created_at`
/// after any update, even one issued in the same tick as the create.
pub struct MonotonicClock<C = SystemClock> {
    source: C,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::with_source(SystemClock)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MonotonicClock<C> {
    pub fn with_source(source: C) -> Self {
        Self {
            source,
            last: Mutex::new(None),
        }
    }

    /// Produce the next timestamp.
    pub fn stamp(&self) -> DateTime<Utc> {
        let wall = self.source.now();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *last {
            Some(prev) if wall <= prev => prev + Duration::microseconds(1),
            _ => wall,
        };
        *last = Some(next);
        next
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now(&self) -> DateTime<Utc> {
        self.stamp()
    }
}

impl<C> std::fmt::Debug for MonotonicClock<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last = *self.last.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MonotonicClock").field("last", &last).finish()
    }
}
