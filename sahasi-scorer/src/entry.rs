//! Location entries as submitted by clients.
//!
//! An entry is a loosely shaped record: coordinates may arrive as `lat`/`lon`
//! or `latitude`/`longitude`, and the timestamp may be an ISO-8601 string, a
//! structured date-time, or absent. [`LocationEntry`] accepts all of these and
//! normalises them into a [`LocationReading`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use sahasi_core::{Coordinate, CoordinateError};
use serde::{Deserialize, Serialize};

/// Naive date-time layouts accepted after RFC 3339, all interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Timestamp attached to a [`LocationEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryTime {
    /// A date-time that is already structured.
    At(DateTime<FixedOffset>),
    /// A string to be parsed with [`parse_timestamp`].
    Text(String),
    /// Any other JSON value; treated as an absent timestamp.
    Other(serde_json::Value),
}

impl EntryTime {
    /// Resolve the timestamp, if it can be understood.
    #[must_use]
    pub fn resolve(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::At(at) => Some(*at),
            Self::Text(text) => parse_timestamp(text),
            Self::Other(_) => None,
        }
    }
}

impl From<DateTime<FixedOffset>> for EntryTime {
    fn from(at: DateTime<FixedOffset>) -> Self {
        Self::At(at)
    }
}

impl From<DateTime<Utc>> for EntryTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self::At(at.into())
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a naive date-time (read as UTC) or a bare
/// date (midnight UTC). Anything else yields `None`.
///
/// # Examples
///
/// ```
/// use sahasi_scorer::parse_timestamp;
///
/// assert!(parse_timestamp("2024-03-01T21:15:00+05:30").is_some());
/// assert!(parse_timestamp("2024-03-01T21:15:00").is_some());
/// assert!(parse_timestamp("2024-03-01").is_some());
/// assert!(parse_timestamp("yesterday evening").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(at);
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(Utc.from_utc_datetime(&naive).into())
}

/// A location sample submitted for scoring.
///
/// Short coordinate names win over long ones when both are present and
/// non-null.
///
/// # Examples
///
/// ```
/// use sahasi_scorer::LocationEntry;
///
/// let entry: LocationEntry = serde_json::from_str(
///     r#"{"latitude": 12.9716, "longitude": 77.5946, "time": "2024-03-01T21:15:00Z"}"#,
/// )?;
/// assert_eq!(entry.latitude(), Some(12.9716));
/// assert!(entry.timestamp().is_some());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    /// Latitude under its short name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Latitude under its long name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude under its short name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Longitude under its long name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// When the sample was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<EntryTime>,
}

impl LocationEntry {
    /// Entry with short-name coordinates and no timestamp.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            latitude: None,
            lon: Some(lon),
            longitude: None,
            time: None,
        }
    }

    /// Attach a timestamp.
    #[must_use]
    pub fn with_time(mut self, time: impl Into<EntryTime>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Effective latitude.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.lat.or(self.latitude)
    }

    /// Effective longitude.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.lon.or(self.longitude)
    }

    /// Effective timestamp, or `None` when absent or unparseable.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.time.as_ref().and_then(EntryTime::resolve)
    }

    /// Validated coordinate.
    ///
    /// Returns `Ok(None)` when either component is missing.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when both components are present but out of
    /// range or not finite.
    pub fn coordinate(&self) -> Result<Option<Coordinate>, CoordinateError> {
        match (self.latitude(), self.longitude()) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }
}

/// A normalised entry: a valid coordinate plus its resolved timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationReading {
    /// Where the sample was taken.
    pub coordinate: Coordinate,
    /// When the sample was taken, if known.
    pub time: Option<DateTime<FixedOffset>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rstest::rstest;

    fn parse(json: &str) -> LocationEntry {
        serde_json::from_str(json).expect("entry should deserialise")
    }

    #[rstest]
    #[case(r#"{"lat": 1.5, "lon": 2.5}"#)]
    #[case(r#"{"latitude": 1.5, "longitude": 2.5}"#)]
    #[case(r#"{"lat": 1.5, "longitude": 2.5}"#)]
    #[case(r#"{"lat": 1.5, "latitude": 9.0, "lon": 2.5, "longitude": 9.0}"#)]
    #[case(r#"{"lat": null, "latitude": 1.5, "lon": 2.5}"#)]
    fn resolves_coordinate_aliases(#[case] json: &str) {
        let entry = parse(json);

        assert_eq!(entry.latitude(), Some(1.5));
        assert_eq!(entry.longitude(), Some(2.5));
    }

    #[rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"lat": 1.5}"#)]
    #[case(r#"{"longitude": 2.5, "time": "2024-01-01"}"#)]
    fn missing_component_yields_no_coordinate(#[case] json: &str) {
        assert_eq!(parse(json).coordinate(), Ok(None));
    }

    #[rstest]
    fn out_of_range_coordinate_is_an_error() {
        let entry = LocationEntry::new(91.0, 0.0);

        assert!(entry.coordinate().is_err());
    }

    #[rstest]
    fn unknown_fields_are_ignored() {
        let entry = parse(r#"{"lat": 1.0, "lon": 2.0, "accuracy": 12}"#);

        assert_eq!(entry, LocationEntry::new(1.0, 2.0));
    }

    #[rstest]
    #[case("2024-03-01T21:15:00Z", 21)]
    #[case("2024-03-01T21:15:00+05:30", 21)]
    #[case("2024-03-01T21:15:00.250", 21)]
    #[case("2024-03-01 21:15:00", 21)]
    #[case("2024-03-01T21:15", 21)]
    #[case("2024-03-01", 0)]
    fn parses_iso_timestamps(#[case] text: &str, #[case] hour: u32) {
        let at = parse_timestamp(text).expect("timestamp should parse");

        assert_eq!(at.hour(), hour);
    }

    #[rstest]
    #[case("")]
    #[case("not a time")]
    #[case("2024-13-01")]
    #[case("01/03/2024")]
    fn rejects_unparseable_timestamps(#[case] text: &str) {
        assert!(parse_timestamp(text).is_none());
    }

    #[rstest]
    fn naive_timestamp_is_utc() {
        let at = parse_timestamp("2024-03-01T21:15:00").expect("timestamp should parse");

        assert_eq!(at.offset().local_minus_utc(), 0);
    }

    #[rstest]
    fn unparseable_time_string_is_absent() {
        let entry = parse(r#"{"lat": 1.0, "lon": 2.0, "time": "soon"}"#);

        assert_eq!(entry.time, Some(EntryTime::Text("soon".to_owned())));
        assert!(entry.timestamp().is_none());
    }

    #[rstest]
    fn non_string_time_is_absent() {
        let entry = parse(r#"{"lat": 1.0, "lon": 2.0, "time": 1709327700}"#);

        assert!(entry.timestamp().is_none());
    }

    #[rstest]
    fn structured_time_is_used_directly() {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 1, 21, 15, 0)
            .single()
            .expect("valid date-time");
        let entry = LocationEntry::new(1.0, 2.0).with_time(at);

        assert_eq!(entry.timestamp(), Some(at.into()));
    }
}
