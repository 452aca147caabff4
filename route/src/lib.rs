#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub mod load;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::load::load_path;

/// One GPS sample from a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    pub fn new(lat: f64, lng: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            lat,
            lng,
            timestamp,
        }
    }
}

/// The recorded trajectory of one vehicle. Once built, the fixes are never reordered or mutated;
/// callers replace the whole route instead.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    fixes: Vec<Fix>,
}

impl Route {
    /// Accepts anything, including empty input. Timestamps going backwards are suspicious, but
    /// speed calculations cope with them, so just complain.
    pub fn new(fixes: Vec<Fix>) -> Self {
        for (idx, pair) in fixes.windows(2).enumerate() {
            if pair[0].timestamp > pair[1].timestamp {
                warn!(
                    "Route input out-of-order at fix {}: {} then {}",
                    idx + 1,
                    pair[0].timestamp,
                    pair[1].timestamp
                );
            } else if pair[0].timestamp == pair[1].timestamp {
                warn!(
                    "Route has duplicate timestamp {} at fix {}",
                    pair[1].timestamp,
                    idx + 1
                );
            }
        }
        Self { fixes }
    }

    pub fn empty() -> Self {
        Self { fixes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Fix> {
        self.fixes.get(idx)
    }

    pub fn first(&self) -> Option<&Fix> {
        self.fixes.first()
    }

    pub fn last(&self) -> Option<&Fix> {
        self.fixes.last()
    }

    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    /// The part of the route already covered when `cursor` is the active fix, inclusive.
    pub fn traveled(&self, cursor: usize) -> &[Fix] {
        let end = (cursor + 1).min(self.fixes.len());
        &self.fixes[..end]
    }
}
