#[macro_use]
extern crate log;

pub mod clock;
mod config;
mod engine;
pub mod kinematics;

use serde::{Deserialize, Serialize};

pub use self::clock::{Clock, ManualClock, RecurringTimer, WallClock};
pub use self::config::PlaybackConfig;
pub use self::engine::{Phase, Playback, PlaybackState};
pub use self::kinematics::SpeedReading;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}
