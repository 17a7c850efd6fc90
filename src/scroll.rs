//! Cool-down gate that keeps auto-scroll from fighting a manual scroll.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(4);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_ms: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone)]
pub struct ScrollGuard<C: Clock = SystemClock> {
    clock: C,
    cooldown: Duration,
    suppressed_until: Option<Instant>,
}

impl Default for ScrollGuard<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock, DEFAULT_COOLDOWN)
    }
}

impl<C: Clock> ScrollGuard<C> {
    pub fn new(clock: C, cooldown: Duration) -> Self {
        Self {
            clock,
            cooldown,
            suppressed_until: None,
        }
    }

    pub fn notify_manual_scroll(&mut self) {
        let until = self.clock.now() + self.cooldown;
        tracing::trace!(cooldown_ms = self.cooldown.as_millis() as u64, "manual scroll");
        self.suppressed_until = Some(until);
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed_until
            .is_some_and(|until| self.clock.now() < until)
    }

    /// Time left before auto-scroll resumes.
    pub fn remaining(&self) -> Duration {
        self.suppressed_until
            .map(|until| until.saturating_duration_since(self.clock.now()))
            .unwrap_or_default()
    }
}
