//! Tick-clock helpers. All timestamps are monotonic `Duration`s since the
//! host started its frame loop.

use std::time::Duration;

/// Frame interval the animation constants were tuned for.
const REFERENCE_FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);
const MIN_DT: f32 = 0.5;
const MAX_DT: f32 = 2.0;

/// Caps how often work runs, independent of how often the host ticks.
#[derive(Clone, Debug)]
pub struct FrameGate {
    interval: Duration,
    last: Option<Duration>,
}

impl FrameGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn per_second(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    /// `true` (and remembers `now`) when at least one interval passed since
    /// the last accepted timestamp. The first call is always accepted.
    pub fn ready(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last {
            if now.saturating_sub(last) < self.interval {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Frame delta normalized to a 60 fps step, clamped to `[0.5, 2]`.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last: Option<Duration>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta(&mut self, now: Duration) -> f32 {
        let dt = match self.last {
            Some(last) => {
                let raw = now.saturating_sub(last).as_secs_f32() / REFERENCE_FRAME.as_secs_f32();
                raw.clamp(MIN_DT, MAX_DT)
            }
            None => 1.0,
        };
        self.last = Some(now);
        dt
    }
}

/// A one-shot deadline on the tick clock.
#[derive(Clone, Debug)]
pub struct Deadline {
    due: Duration,
    fired: bool,
}

impl Deadline {
    pub fn at(due: Duration) -> Self {
        Self { due, fired: false }
    }

    pub fn after(now: Duration, delay: Duration) -> Self {
        Self::at(now + delay)
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    /// Returns `true` exactly once: on the first poll at or after the due time.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.fired || now < self.due {
            return false;
        }
        self.fired = true;
        true
    }
}
