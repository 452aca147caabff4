use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use geom::{Duration, Time};

/// Where playback gets the current time from. Injected so tests don't have to wait for real
/// seconds to pass.
pub trait Clock {
    fn now(&self) -> Time;
}

/// Real time elapsed since the clock was created.
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> Time {
        Time::START_OF_DAY + Duration::seconds(self.start.elapsed().as_secs_f64())
    }
}

/// Only moves when told to. Clones share the same time, so a test can keep one handle and give
/// another to the engine.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Time>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Time::START_OF_DAY)),
        }
    }

    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        self.now.get()
    }
}

/// A repeating task with a fixed period. There's at most one pending fire time, and disarming
/// clears it immediately, so nothing fires afterwards.
pub struct RecurringTimer {
    period: Duration,
    next_fire: Option<Time>,
}

impl RecurringTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_fire: None,
        }
    }

    /// Starts a fresh period from `now`, replacing anything already pending.
    pub fn arm(&mut self, now: Time) {
        self.next_fire = Some(now + self.period);
    }

    /// Returns true if something was pending.
    pub fn disarm(&mut self) -> bool {
        self.next_fire.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.next_fire.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// True if a fire is due by `now`. Each call consumes at most one fire, so a caller that fell
    /// behind gets every missed fire in order by calling repeatedly.
    pub fn poll(&mut self, now: Time) -> bool {
        match self.next_fire {
            Some(t) if t <= now => {
                self.next_fire = Some(t + self.period);
                true
            }
            _ => false,
        }
    }
}
