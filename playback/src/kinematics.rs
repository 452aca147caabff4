//! Heading and speed derived from consecutive fixes. Everything here treats degrees of latitude
//! and longitude as a flat plane, which is close enough over one step of an urban route.

use std::fmt;

use route::{Fix, Route};

/// Rough kilometers per degree, measured at the equator.
pub const KM_PER_DEGREE: f64 = 111.32;

const MILLIS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;

/// The direction of travel from `p1` to `p2` in degrees, rotated by +90 so that 0 matches a
/// marker sprite drawn facing east. Missing points give 0.
pub fn bearing(p1: Option<&Fix>, p2: Option<&Fix>) -> f64 {
    match (p1, p2) {
        (Some(p1), Some(p2)) => {
            let dy = p2.lat - p1.lat;
            let dx = p2.lng - p1.lng;
            dy.atan2(dx).to_degrees() + 90.0
        }
        _ => 0.0,
    }
}

pub fn planar_distance_km(p1: &Fix, p2: &Fix) -> f64 {
    let dlat = p2.lat - p1.lat;
    let dlng = p2.lng - p1.lng;
    (dlat * dlat + dlng * dlng).sqrt() * KM_PER_DEGREE
}

/// Speed over the step arriving at `idx`.
pub fn speed(route: &Route, idx: usize) -> SpeedReading {
    if idx == 0 || route.len() <= 1 {
        return SpeedReading::ZERO;
    }
    let (prev, curr) = match (route.get(idx - 1), route.get(idx)) {
        (Some(prev), Some(curr)) => (prev, curr),
        _ => return SpeedReading::ZERO,
    };

    let distance_km = planar_distance_km(prev, curr);
    let dt_hours =
        (curr.timestamp - prev.timestamp).num_milliseconds() as f64 / MILLIS_PER_HOUR;
    // Duplicate or backwards timestamps
    if dt_hours <= 0.0 {
        return SpeedReading::NotAvailable;
    }
    SpeedReading::Kmh(distance_km / dt_hours)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedReading {
    Kmh(f64),
    /// The time between the two fixes wasn't positive.
    NotAvailable,
}

impl SpeedReading {
    pub const ZERO: SpeedReading = SpeedReading::Kmh(0.0);

    pub fn kmh(self) -> Option<f64> {
        match self {
            SpeedReading::Kmh(x) => Some(x),
            SpeedReading::NotAvailable => None,
        }
    }
}

impl fmt::Display for SpeedReading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpeedReading::Kmh(x) => write!(f, "{:.2}", x),
            SpeedReading::NotAvailable => write!(f, "N/A"),
        }
    }
}
