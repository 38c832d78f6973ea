//! Observation records and the immutable daily table

use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::info;

use crate::DataError;

/// Columns that must be present after header trimming
const REQUIRED_COLUMNS: [&str; 6] = ["day", "month", "year", "PM10", "TEMP", "HUMI"];

/// One CSV row exactly as it appears in the source file
#[derive(Debug, Deserialize)]
struct RawRecord {
    day: u32,
    month: u32,
    year: i32,
    #[serde(rename = "PM10")]
    pm10: f64,
    #[serde(rename = "TEMP")]
    temp: f64,
    #[serde(rename = "HUMI")]
    humi: f64,
}

/// One day's measurements plus the derived calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    /// Particulate concentration in µg/m³
    pub pm10: f64,
    /// Temperature in °C
    pub temp: f64,
    /// Relative humidity in %
    pub humi: f64,
    pub date: NaiveDate,
}

impl Observation {
    /// Build an observation, deriving the calendar date from its components.
    /// Returns `None` when (year, month, day) is not a valid date.
    pub fn from_parts(
        year: i32,
        month: u32,
        day: u32,
        pm10: f64,
        temp: f64,
        humi: f64,
    ) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self {
            day,
            month,
            year,
            pm10,
            temp,
            humi,
            date,
        })
    }
}

/// The three selectable measurement fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Pm10,
    Temp,
    Humi,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Pm10, Field::Temp, Field::Humi];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Pm10 => "PM10",
            Field::Temp => "TEMP",
            Field::Humi => "HUMI",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Field::Pm10 => "µg/m³",
            Field::Temp => "°C",
            Field::Humi => "%",
        }
    }

    pub fn value(&self, obs: &Observation) -> f64 {
        match self {
            Field::Pm10 => obs.pm10,
            Field::Temp => obs.temp,
            Field::Humi => obs.humi,
        }
    }
}

/// Immutable, date-ordered table of daily observations.
///
/// A `Dataset` is never empty: both constructors reject tables with no rows,
/// so `date_range` is total.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Observation>,
}

impl Dataset {
    /// Load the table from a semicolon-delimited CSV file with a header row.
    ///
    /// Column names are matched after whitespace trimming. Fails if the file
    /// is missing or unreadable, a required column is absent, a row cannot be
    /// parsed, any (year, month, day) triple is not a valid calendar date, or
    /// the table has no rows.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DataError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
            let raw = result?;
            let obs = Observation::from_parts(
                raw.year, raw.month, raw.day, raw.pm10, raw.temp, raw.humi,
            )
            .ok_or(DataError::InvalidDate {
                row: idx + 1,
                year: raw.year,
                month: raw.month,
                day: raw.day,
            })?;
            records.push(obs);
        }

        let dataset = Self::from_records(records)
            .map_err(|_| DataError::Empty(path.display().to_string()))?;
        info!(
            "Loaded {} observations from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Build a table from already-constructed records. Fails on an empty set.
    pub fn from_records(records: Vec<Observation>) -> Result<Self, DataError> {
        if records.is_empty() {
            return Err(DataError::Empty("in-memory record set".to_string()));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Extract one field as a column of values, in record order.
    pub fn values(&self, field: Field) -> Vec<f64> {
        self.records.iter().map(|obs| field.value(obs)).collect()
    }

    /// Minimum and maximum date present in the table.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let mut min = NaiveDate::MAX;
        let mut max = NaiveDate::MIN;
        for obs in &self.records {
            min = min.min(obs.date);
            max = max.max(obs.date);
        }
        (min, max)
    }

    /// Records whose date lies in the inclusive range [start, end], in table
    /// order. An inverted range (start > end) selects nothing and is not an
    /// error. The table itself is never reordered or mutated.
    pub fn filter_by_date(&self, start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
        self.records
            .iter()
            .filter(|obs| obs.date >= start && obs.date <= end)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::io::Write;
    use std::path::PathBuf;

    const SAMPLE: &str = "day;month;year;PM10;TEMP;HUMI\n\
        1;8;2025;10.0;5.0;50.0\n\
        2;8;2025;20.0;15.0;50.0\n\
        5;9;2025;30.0;25.0;50.0\n";

    fn write_csv(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("air_qualite.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_semicolon_delimited_rows() {
        let (_dir, path) = write_csv(SAMPLE);
        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0].pm10, 10.0);
        assert_eq!(dataset.records()[2].temp, 25.0);
    }

    #[test]
    fn header_whitespace_is_trimmed() {
        let csv = " day ; month ;year ; PM10; TEMP ;HUMI\n1;1;2025;12.0;3.0;80.0\n";
        let (_dir, path) = write_csv(csv);
        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].humi, 80.0);
    }

    #[test]
    fn derived_date_round_trips() {
        let (_dir, path) = write_csv(SAMPLE);
        let dataset = Dataset::load(&path).unwrap();
        for obs in dataset.records() {
            assert_eq!(obs.date.year(), obs.year);
            assert_eq!(obs.date.month(), obs.month);
            assert_eq!(obs.date.day(), obs.day);
        }
    }

    #[test]
    fn invalid_date_fails_loading() {
        let csv = "day;month;year;PM10;TEMP;HUMI\n31;2;2025;10.0;5.0;50.0\n";
        let (_dir, path) = write_csv(csv);
        let err = Dataset::load(&path).unwrap_err();
        assert!(matches!(err, DataError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn missing_file_fails_loading() {
        let err = Dataset::load("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn missing_column_fails_loading() {
        let csv = "day;month;year;PM10;TEMP\n1;1;2025;10.0;5.0\n";
        let (_dir, path) = write_csv(csv);
        let err = Dataset::load(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "HUMI"));
    }

    #[test]
    fn empty_table_fails_loading() {
        let (_dir, path) = write_csv("day;month;year;PM10;TEMP;HUMI\n");
        let err = Dataset::load(&path).unwrap_err();
        assert!(matches!(err, DataError::Empty(_)));
    }

    #[test]
    fn date_range_spans_the_table() {
        let (_dir, path) = write_csv(SAMPLE);
        let dataset = Dataset::load(&path).unwrap();
        let (min, max) = dataset.date_range();
        assert_eq!(min, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
    }

    #[test]
    fn filter_keeps_only_dates_in_range() {
        let (_dir, path) = write_csv(SAMPLE);
        let dataset = Dataset::load(&path).unwrap();
        let august = dataset.filter_by_date(
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        );
        assert_eq!(august.len(), 2);
        assert!(august.iter().all(|obs| obs.month == 8));
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let (_dir, path) = write_csv(SAMPLE);
        let dataset = Dataset::load(&path).unwrap();
        let filtered = dataset.filter_by_date(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn full_range_returns_the_table_unchanged() {
        let (_dir, path) = write_csv(SAMPLE);
        let dataset = Dataset::load(&path).unwrap();
        let (min, max) = dataset.date_range();
        let filtered = dataset.filter_by_date(min, max);
        assert_eq!(filtered.len(), dataset.len());
        assert_eq!(filtered, dataset.records());
    }

    #[test]
    fn values_extracts_the_selected_field() {
        let (_dir, path) = write_csv(SAMPLE);
        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.values(Field::Pm10), vec![10.0, 20.0, 30.0]);
        assert_eq!(dataset.values(Field::Humi), vec![50.0, 50.0, 50.0]);
    }

    #[test]
    fn from_records_rejects_empty_input() {
        assert!(matches!(
            Dataset::from_records(Vec::new()),
            Err(DataError::Empty(_))
        ));
    }
}
