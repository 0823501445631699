use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "mag", "country", "latitude", "longitude", "depth"];

/// Date-time layouts tried in order after RFC 3339.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Cell texts read as missing in any column, the default NA list of
/// dataframe CSV readers. Matched exactly, without trimming.
pub const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Date-only layouts tried last.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// ---------------------------------------------------------------------------
// RawRecord – one row before validation
// ---------------------------------------------------------------------------

/// A row as read from the file, every field optional.
///
/// Numeric cells that fail to parse deserialize to `None` instead of
/// failing the whole file. Text cells are kept verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub mag: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub depth: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

impl RawRecord {
    /// Validate the row. Returns `None` when any required field is missing.
    pub fn into_event(self) -> Option<EventRecord> {
        let timestamp = parse_date(present(self.date)?.as_str())?;
        Some(EventRecord {
            timestamp,
            year: timestamp.year(),
            magnitude: not_nan(self.mag)?,
            depth: not_nan(self.depth)?,
            country: present(self.country)?,
            latitude: not_nan(self.latitude)?,
            longitude: not_nan(self.longitude)?,
        })
    }
}

/// `None` for an NA token.
fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !is_na(s))
}

/// NaN is missing; infinities are values.
fn not_nan(v: Option<f64>) -> Option<f64> {
    v.filter(|x| !x.is_nan())
}

pub fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// Numeric cell with surrounding whitespace allowed; anything else is `None`.
fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let cell: Option<String> = csv::invalid_option(de)?;
    Ok(cell.and_then(|s| s.trim().parse().ok()))
}

/// Parse a date cell into a calendar date. Unrecognised text is `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Calendar date from milliseconds since the Unix epoch.
pub fn date_from_epoch_millis(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// EventRecord – one validated earthquake
// ---------------------------------------------------------------------------

/// A single earthquake observation with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub timestamp: NaiveDate,
    /// Calendar year of `timestamp`.
    pub year: i32,
    pub magnitude: f64,
    /// Depth in kilometres.
    pub depth: f64,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable loaded dataset with pre-computed bounds.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<EventRecord>,
    /// Smallest and largest `year`, `None` when empty.
    pub year_bounds: Option<(i32, i32)>,
    /// Sorted distinct countries over all records.
    pub countries: BTreeSet<String>,
    /// Rows discarded by the drop rule.
    pub dropped: usize,
    pub source: Option<PathBuf>,
}

impl Dataset {
    /// Validate raw rows and build indices.
    pub fn from_raw<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut records = Vec::new();
        let mut dropped = 0;
        for row in rows {
            match row.into_event() {
                Some(rec) => records.push(rec),
                None => dropped += 1,
            }
        }
        let mut ds = Self::from_records(records);
        ds.dropped = dropped;
        ds
    }

    pub fn from_records(records: Vec<EventRecord>) -> Self {
        let year_bounds = records.iter().fold(None, |acc, r| match acc {
            None => Some((r.year, r.year)),
            Some((lo, hi)) => Some((r.year.min(lo), r.year.max(hi))),
        });
        let countries = records.iter().map(|r| r.country.clone()).collect();
        Dataset {
            records,
            year_bounds,
            countries,
            dropped: 0,
            source: None,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, country: Option<&str>) -> RawRecord {
        RawRecord {
            date: Some(date.to_string()),
            mag: Some(5.5),
            depth: Some(10.0),
            country: country.map(str::to_string),
            latitude: Some(-33.0),
            longitude: Some(-71.0),
        }
    }

    #[test]
    fn parses_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2010, 2, 27).unwrap();
        for s in [
            "2010-02-27T06:34:11.530Z",
            "2010-02-27 06:34:11",
            "2010-02-27T06:34:11.5",
            "2010-02-27",
            "2010/02/27",
            "02/27/2010",
        ] {
            assert_eq!(parse_date(s), Some(expected), "layout {s}");
        }
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[test]
    fn missing_country_drops_the_row() {
        assert!(raw("2010-01-01", None).into_event().is_none());
        assert!(raw("2010-01-01", Some("")).into_event().is_none());
        let rec = raw("2010-01-01", Some("Chile")).into_event().unwrap();
        assert_eq!(rec.country, "Chile");
        assert_eq!(rec.year, 2010);
    }

    #[test]
    fn na_tokens_are_missing_in_text_columns() {
        for token in NA_VALUES {
            assert!(raw("2010-01-01", Some(token)).into_event().is_none(), "country {token:?}");
            assert!(raw(token, Some("Chile")).into_event().is_none(), "date {token:?}");
        }
        // Only exact tokens count; padded text is an ordinary label.
        assert_eq!(raw("2010-01-01", Some(" NA")).into_event().unwrap().country, " NA");
    }

    #[test]
    fn countries_are_kept_verbatim() {
        let rec = raw("2010-01-01", Some(" Chile")).into_event().unwrap();
        assert_eq!(rec.country, " Chile");
    }

    #[test]
    fn nan_is_missing_but_infinity_is_kept() {
        let mut row = raw("2010-01-01", Some("Chile"));
        row.depth = Some(f64::NAN);
        assert!(row.into_event().is_none());

        let mut row = raw("2010-01-01", Some("Chile"));
        row.depth = Some(f64::INFINITY);
        assert_eq!(row.into_event().unwrap().depth, f64::INFINITY);
    }

    #[test]
    fn bounds_and_drop_count() {
        let ds = Dataset::from_raw(vec![
            raw("2012-05-01", Some("Japan")),
            raw("not a date", Some("Chile")),
            raw("2008-01-01", Some("Chile")),
        ]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped, 1);
        assert_eq!(ds.year_bounds, Some((2008, 2012)));
        assert_eq!(ds.countries.len(), 2);
    }

    #[test]
    fn epoch_millis_dates() {
        // 2010-02-27T06:34:11Z
        assert_eq!(
            date_from_epoch_millis(1_267_252_451_000),
            NaiveDate::from_ymd_opt(2010, 2, 27)
        );
    }
}
