use geom::Duration;
use serde::{Deserialize, Serialize};

use crate::Position;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Real seconds between advancing to the next fix. Fixed for a whole session.
    pub tick_period_seconds: f64,
    /// Shown when there's no route to play.
    pub default_center: Position,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_period_seconds: 1.0,
            // Hyderabad
            default_center: Position {
                lat: 17.385044,
                lng: 78.486671,
            },
        }
    }
}

impl PlaybackConfig {
    pub fn tick_period(&self) -> Duration {
        if self.tick_period_seconds > 0.0 && self.tick_period_seconds.is_finite() {
            Duration::seconds(self.tick_period_seconds)
        } else {
            warn!(
                "Ignoring tick period of {}s, using the default",
                self.tick_period_seconds
            );
            Duration::seconds(Self::default().tick_period_seconds)
        }
    }
}
