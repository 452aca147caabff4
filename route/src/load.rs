use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::{Fix, Route};

/// Reads a route from a `.json` or `.csv` file.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Route> {
    let path = path.as_ref();
    let file = fs_err::File::open(path)?;
    let route = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => from_json(file),
        Some("csv") => from_csv(file),
        _ => bail!("Don't know how to read a route from {}", path.display()),
    }
    .with_context(|| format!("loading route from {}", path.display()))?;
    info!("Loaded {} fixes from {}", route.len(), path.display());
    Ok(route)
}

/// A JSON array of `{"latitude", "longitude", "timestamp"}` objects.
pub fn from_json<R: std::io::Read>(reader: R) -> Result<Route> {
    let records: Vec<RawFix> = serde_json::from_reader(reader)?;
    let mut fixes = Vec::new();
    for (idx, rec) in records.into_iter().enumerate() {
        fixes.push(rec.into_fix().with_context(|| format!("record {}", idx))?);
    }
    Ok(Route::new(fixes))
}

/// A CSV file with `latitude`, `longitude` and `timestamp` columns.
pub fn from_csv<R: std::io::Read>(reader: R) -> Result<Route> {
    let mut fixes = Vec::new();
    for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
        let rec: RawFix = rec?;
        fixes.push(rec.into_fix().with_context(|| format!("record {}", idx))?);
    }
    Ok(Route::new(fixes))
}

#[derive(Deserialize)]
struct RawFix {
    latitude: f64,
    longitude: f64,
    timestamp: RawTimestamp,
}

impl RawFix {
    fn into_fix(self) -> Result<Fix> {
        Ok(Fix::new(
            self.latitude,
            self.longitude,
            self.timestamp.into_datetime()?,
        ))
    }
}

// Different exports disagree about how to write time
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochMillis(i64),
    Text(String),
}

impl RawTimestamp {
    fn into_datetime(self) -> Result<DateTime<Utc>> {
        match self {
            RawTimestamp::EpochMillis(ms) => match Utc.timestamp_millis_opt(ms).single() {
                Some(t) => Ok(t),
                None => bail!("Timestamp {} ms is out of range", ms),
            },
            RawTimestamp::Text(text) => {
                if let Ok(t) = DateTime::parse_from_rfc3339(&text) {
                    return Ok(t.with_timezone(&Utc));
                }
                // No timezone; assume UTC
                let naive = NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S")
                    .with_context(|| format!("unrecognized timestamp {}", text))?;
                Ok(Utc.from_utc_datetime(&naive))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_with_mixed_timestamps() {
        let input = r#"[
            {"latitude": 17.385044, "longitude": 78.486671, "timestamp": "2024-05-01T10:00:00Z"},
            {"latitude": 17.385500, "longitude": 78.487000, "timestamp": "2024-05-01 10:00:05"},
            {"latitude": 17.386000, "longitude": 78.487500, "timestamp": 1714557610000}
        ]"#;
        let route = from_json(input.as_bytes()).unwrap();
        assert_eq!(route.len(), 3);

        let first = route.get(0).unwrap();
        assert_eq!(first.lat, 17.385044);
        assert_eq!(first.lng, 78.486671);
        assert_eq!(first.timestamp.timestamp_millis(), 1_714_557_600_000);
        assert_eq!(
            route.get(1).unwrap().timestamp.timestamp_millis(),
            1_714_557_605_000
        );
        assert_eq!(
            route.get(2).unwrap().timestamp.timestamp_millis(),
            1_714_557_610_000
        );
    }

    #[test]
    fn json_empty_array() {
        assert!(from_json("[]".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn bad_timestamp_names_the_record() {
        let input = r#"[
            {"latitude": 17.0, "longitude": 78.0, "timestamp": 0},
            {"latitude": 17.0, "longitude": 78.0, "timestamp": "yesterday"}
        ]"#;
        let err = from_json(input.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("record 1"));
    }

    #[test]
    fn csv_rows() {
        let input = "latitude,longitude,timestamp\n\
                     17.0,78.0,2024-05-01T10:00:00+05:30\n\
                     17.001,78.0,2024-05-01T11:00:00+05:30\n";
        let route = from_csv(input.as_bytes()).unwrap();
        assert_eq!(route.len(), 2);
        let dt = route.get(1).unwrap().timestamp - route.get(0).unwrap().timestamp;
        assert_eq!(dt.num_milliseconds(), 3_600_000);
    }

    #[test]
    fn unknown_extension() {
        let path = std::env::temp_dir().join("route_load_unknown_extension.gpx");
        fs_err::write(&path, "").unwrap();
        assert!(load_path(&path).is_err());
        fs_err::remove_file(&path).unwrap();
    }
}
