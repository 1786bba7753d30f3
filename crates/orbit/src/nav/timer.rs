use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};

pub trait Clock {
    fn now(&self) -> Instant;

    /// Wall-clock time for event timestamps, in Unix milliseconds.
    fn unix_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            now: Arc::new(Mutex::new(origin)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn elapsed(&self) -> Duration {
        *self.now.lock() - self.origin
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }

    fn unix_millis(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum TimerKind {
    Animation,
    AutoClose,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    animation: Option<Instant>,
    auto_close: Option<Instant>,
}

impl Timers {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<Instant> {
        match kind {
            TimerKind::Animation => &mut self.animation,
            TimerKind::AutoClose => &mut self.auto_close,
        }
    }

    pub fn get(&self, kind: TimerKind) -> Option<Instant> {
        match kind {
            TimerKind::Animation => self.animation,
            TimerKind::AutoClose => self.auto_close,
        }
    }

    pub fn schedule(&mut self, kind: TimerKind, deadline: Instant) {
        if self.slot(kind).replace(deadline).is_some() {
            log::debug!("Replaced pending {} timer", kind);
        }
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.slot(kind).take().is_some()
    }

    pub fn cancel_all(&mut self) {
        TimerKind::iter().for_each(|kind| {
            self.cancel(kind);
        });
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        TimerKind::iter().filter_map(|kind| self.get(kind)).min()
    }

    /// Earliest due timer wins; on a tie, `Animation` comes first.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerKind, Instant)> {
        let (at, kind) = TimerKind::iter()
            .filter_map(|kind| self.get(kind).map(|at| (at, kind)))
            .filter(|(at, _)| *at <= now)
            .min_by_key(|(at, _)| *at)?;
        self.cancel(kind);
        Some((kind, at))
    }
}
