use std::fmt;

use route::{Fix, Route};

use crate::clock::{Clock, RecurringTimer};
use crate::kinematics::{self, SpeedReading};
use crate::{PlaybackConfig, Position};

/// Replays one route, advancing a cursor by one fix every tick of a recurring timer.
///
/// Everything happens on one thread: the caller invokes the commands and periodically calls
/// `update`, which delivers any ticks that are due according to the injected clock.
pub struct Playback<C: Clock> {
    route: Route,
    state: PlaybackState,
    timer: RecurringTimer,
    clock: C,
    default_center: Position,
}

/// Only the engine changes this; everyone else gets to look.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub cursor: usize,
    pub running: bool,
    /// Degrees, using the same +90 offset as `kinematics::bearing`
    pub heading: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Playing,
    Paused,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Phase::Stopped => "stopped",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::Finished => "finished",
        };
        write!(f, "{}", label)
    }
}

impl<C: Clock> Playback<C> {
    pub fn new(route: Route, clock: C, config: &PlaybackConfig) -> Self {
        Self {
            route,
            state: PlaybackState::default(),
            timer: RecurringTimer::new(config.tick_period()),
            clock,
            default_center: config.default_center,
        }
    }

    /// Swaps in a whole new route and starts over from the beginning.
    pub fn set_route(&mut self, route: Route) {
        self.timer.disarm();
        self.state = PlaybackState::default();
        debug!("Replaced route, now {} fixes", route.len());
        self.route = route;
    }

    pub fn play(&mut self) {
        if self.state.running {
            return;
        }
        if self.route.len() < 2 {
            debug!("Nothing to animate on a route of {} fixes", self.route.len());
            return;
        }
        if self.state.cursor >= self.last_idx() {
            self.state.cursor = 0;
        }
        self.state.running = true;
        self.timer.arm(self.clock.now());
        debug!("Playing from fix {}", self.state.cursor);
    }

    pub fn pause(&mut self) {
        if !self.state.running {
            return;
        }
        self.timer.disarm();
        self.state.running = false;
        debug!("Paused at fix {}", self.state.cursor);
    }

    pub fn toggle(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Safe to call in any state.
    pub fn reset(&mut self) {
        self.timer.disarm();
        self.state = PlaybackState::default();
        debug!("Reset playback");
    }

    /// Delivers every tick that's come due since the last call, returning how many happened.
    pub fn update(&mut self) -> usize {
        let now = self.clock.now();
        let mut ticks = 0;
        while self.timer.poll(now) {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn tick(&mut self) {
        if !self.state.running {
            return;
        }
        let last = self.last_idx();
        let next = self.state.cursor + 1;
        if next >= last {
            self.state.cursor = last;
            self.timer.disarm();
            self.state.running = false;
            debug!("Reached the end of the route at fix {}", last);
            return;
        }

        self.state.heading =
            kinematics::bearing(self.route.get(self.state.cursor), self.route.get(next));
        self.state.cursor = next;
    }

    fn last_idx(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn heading(&self) -> f64 {
        self.state.heading
    }

    /// Recalculated every time; nothing to keep in sync.
    pub fn speed(&self) -> SpeedReading {
        kinematics::speed(&self.route, self.state.cursor)
    }

    pub fn phase(&self) -> Phase {
        if self.state.running {
            Phase::Playing
        } else if self.state.cursor == 0 {
            Phase::Stopped
        } else if self.state.cursor >= self.last_idx() {
            Phase::Finished
        } else {
            Phase::Paused
        }
    }

    /// None when the route is empty.
    pub fn current_fix(&self) -> Option<&Fix> {
        self.route.get(self.state.cursor)
    }

    /// Where to draw the vehicle. Falls back to the configured center for an empty route; use
    /// `current_fix` to tell the difference.
    pub fn position(&self) -> Position {
        match self.current_fix() {
            Some(fix) => Position {
                lat: fix.lat,
                lng: fix.lng,
            },
            None => self.default_center,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn route_len(&self) -> usize {
        self.route.len()
    }

    /// The fixes already covered, including the current one.
    pub fn traveled(&self) -> &[Fix] {
        self.route.traveled(self.state.cursor)
    }
}

impl<C: Clock> Drop for Playback<C> {
    fn drop(&mut self) {
        if self.timer.disarm() {
            debug!("Playback dropped while running; cancelled its timer");
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use geom::Duration;

    use super::*;
    use crate::clock::ManualClock;

    fn fix(lat: f64, lng: f64, secs: i64) -> Fix {
        Fix::new(lat, lng, Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn engine(fixes: Vec<Fix>) -> (Playback<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let playback = Playback::new(
            Route::new(fixes),
            clock.clone(),
            &PlaybackConfig::default(),
        );
        (playback, clock)
    }

    fn line(n: usize) -> Vec<Fix> {
        (0..n)
            .map(|i| fix(17.0 + 0.001 * i as f64, 78.0, 10 * i as i64))
            .collect()
    }

    #[test]
    fn tick_updates_heading_from_the_step() {
        let (mut playback, _) = engine(vec![
            fix(17.0, 78.0, 0),
            fix(17.0, 78.001, 10),
            fix(17.001, 78.001, 20),
            fix(17.002, 78.001, 30),
        ]);
        playback.play();
        playback.tick();
        assert_eq!(playback.cursor(), 1);
        // Eastward
        assert_relative_eq!(playback.heading(), 90.0);
        playback.tick();
        assert_eq!(playback.cursor(), 2);
        // Northward
        assert_relative_eq!(playback.heading(), 180.0);
        // The final step doesn't touch heading
        playback.tick();
        assert_eq!(playback.cursor(), 3);
        assert_relative_eq!(playback.heading(), 180.0);
        assert!(!playback.is_running());
        assert_eq!(playback.phase(), Phase::Finished);
    }

    #[test]
    fn tick_ignored_when_not_running() {
        let (mut playback, _) = engine(line(4));
        playback.tick();
        assert_eq!(playback.cursor(), 0);
    }

    #[test]
    fn two_fix_route_finishes_in_one_tick() {
        let (mut playback, clock) = engine(line(2));
        playback.play();
        clock.advance(Duration::seconds(1.0));
        assert_eq!(playback.update(), 1);
        assert_eq!(playback.cursor(), 1);
        assert!(!playback.is_running());
        assert_eq!(playback.heading(), 0.0);
    }

    #[test]
    fn degenerate_routes() {
        let (mut empty, _) = engine(Vec::new());
        empty.play();
        assert!(!empty.is_running());
        assert!(empty.current_fix().is_none());
        assert_eq!(
            empty.position(),
            PlaybackConfig::default().default_center
        );
        assert_eq!(empty.speed().to_string(), "0.00");
        assert_eq!(empty.heading(), 0.0);
        assert!(empty.traveled().is_empty());

        let (mut single, _) = engine(vec![fix(17.5, 78.5, 0)]);
        single.toggle();
        assert!(!single.is_running());
        assert_eq!(single.position(), Position { lat: 17.5, lng: 78.5 });
        assert_eq!(single.speed().to_string(), "0.00");
        assert_eq!(single.phase(), Phase::Stopped);
    }

    #[test]
    fn play_twice_keeps_the_first_schedule() {
        let (mut playback, clock) = engine(line(5));
        playback.play();
        clock.advance(Duration::seconds(0.5));
        playback.play();
        clock.advance(Duration::seconds(0.5));
        assert_eq!(playback.update(), 1);
    }

    #[test]
    fn phases() {
        let (mut playback, clock) = engine(line(4));
        assert_eq!(playback.phase(), Phase::Stopped);
        playback.play();
        assert_eq!(playback.phase(), Phase::Playing);
        clock.advance(Duration::seconds(1.0));
        playback.update();
        playback.pause();
        assert_eq!(playback.phase(), Phase::Paused);
        assert_eq!(playback.phase().to_string(), "paused");
    }

    #[test]
    fn set_route_starts_over() {
        let (mut playback, clock) = engine(line(5));
        playback.play();
        clock.advance(Duration::seconds(2.0));
        playback.update();
        assert_eq!(playback.cursor(), 2);

        playback.set_route(Route::new(line(3)));
        assert_eq!(playback.state(), PlaybackState::default());
        assert_eq!(playback.route_len(), 3);
        clock.advance(Duration::seconds(5.0));
        assert_eq!(playback.update(), 0);
    }

    #[test]
    fn traveled_follows_cursor() {
        let (mut playback, clock) = engine(line(5));
        assert_eq!(playback.traveled().len(), 1);
        playback.play();
        clock.advance(Duration::seconds(2.0));
        playback.update();
        assert_eq!(playback.traveled(), &playback.route().fixes()[..3]);
    }
}
