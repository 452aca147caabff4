use abstutil::prettyprint_usize;
use chrono::Local;

use playback::{Clock, Playback};

/// The vehicle status panel, as one line of text.
pub fn describe<C: Clock>(playback: &Playback<C>) -> String {
    let pos = playback.position();
    let timestamp = match playback.current_fix() {
        Some(fix) => fix
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string(),
        None => "N/A".to_string(),
    };
    let progress = if playback.route_len() == 0 {
        0
    } else {
        playback.cursor() + 1
    };

    format!(
        "Coordinate: {:.6}, {:.6} | Timestamp: {} | Speed: {} km/h | Heading: {:.1} | {} {}/{}",
        pos.lat,
        pos.lng,
        timestamp,
        playback.speed(),
        playback.heading(),
        playback.phase(),
        prettyprint_usize(progress),
        prettyprint_usize(playback.route_len())
    )
}
