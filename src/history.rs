//! On-disk history: finalized charge records and periodic current samples.
//!
//! Both stores are append-only and single-writer (the main event loop). Each
//! write re-reads the file, adds one entry, and rewrites the whole thing; the
//! files are small and this keeps partial-write surface to a single rename-free
//! operation, but it is NOT safe against concurrent writers.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    app::session::ChargeRecord,
    utils::error::{BatwatchError, Result},
};

const CHARGE_COUNT_KEY: &str = "charge_count";

fn write_with_parents(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;

    Ok(())
}

/// A counted store of charge records in one JSON file: `charge_count` holds
/// the number of records, `charge_1`..`charge_N` hold them as JSON-encoded
/// strings. Records are never rewritten or dropped once stored.
#[derive(Debug, Clone)]
pub struct ChargeHistory {
    path: PathBuf,
}

impl ChargeHistory {
    pub fn new(path: PathBuf) -> Self {
        ChargeHistory { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> Result<IndexMap<String, Value>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                BatwatchError::Record(format!(
                    "charge history at {:?} is not valid JSON: {err}",
                    self.path
                ))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(IndexMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn stored_count(map: &IndexMap<String, Value>) -> u64 {
        map.get(CHARGE_COUNT_KEY)
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Appends one record, bumping the counter. Returns the new record count.
    pub fn append(&self, record: &ChargeRecord) -> Result<u64> {
        let mut map = self.load_map()?;
        let next = Self::stored_count(&map) + 1;

        map.insert(CHARGE_COUNT_KEY.to_string(), Value::from(next));
        map.insert(
            format!("charge_{next}"),
            Value::String(serde_json::to_string(record)?),
        );

        write_with_parents(&self.path, &serde_json::to_string_pretty(&map)?)?;

        Ok(next)
    }

    /// Rebuilds the record list in insertion order. A record that fails to
    /// decode is skipped rather than failing the whole list.
    pub fn load(&self) -> Result<Vec<ChargeRecord>> {
        let map = self.load_map()?;
        let count = Self::stored_count(&map);

        let records = (1..=count)
            .filter_map(|i| {
                map.get(&format!("charge_{i}"))
                    .and_then(Value::as_str)
                    .and_then(|json| serde_json::from_str(json).ok())
            })
            .collect();

        Ok(records)
    }
}

/// One line of the sample log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistorySample {
    pub timestamp_ms: u64,
    pub current_ma: i64,
}

/// A line-oriented log of instantaneous current samples, one
/// `<epoch_millis>,<current_ma>` line per entry. Growth is unbounded unless a
/// retention cap is set, in which case the oldest lines are dropped on write.
#[derive(Debug, Clone)]
pub struct SampleLog {
    path: PathBuf,
    retention: Option<usize>,
}

impl SampleLog {
    pub fn new(path: PathBuf, retention: Option<usize>) -> Self {
        SampleLog { path, retention }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one sample, rewriting the whole log.
    pub fn append(&self, timestamp_ms: u64, current_ma: i64) -> Result<()> {
        let mut contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };

        contents.push_str(&format!("{timestamp_ms},{current_ma}\n"));

        if let Some(max_lines) = self.retention {
            let count = contents.lines().count();
            if count > max_lines {
                let mut pruned =
                    contents.lines().skip(count - max_lines).fold(
                        String::with_capacity(contents.len()),
                        |mut acc, line| {
                            acc.push_str(line);
                            acc.push('\n');
                            acc
                        },
                    );
                std::mem::swap(&mut contents, &mut pruned);
            }
        }

        write_with_parents(&self.path, &contents)
    }

    /// Reads every sample back, skipping malformed lines.
    pub fn load(&self) -> Result<Vec<HistorySample>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let samples = contents
            .lines()
            .filter_map(|line| {
                let (timestamp, current) = line.split_once(',')?;
                Some(HistorySample {
                    timestamp_ms: timestamp.trim().parse().ok()?,
                    current_ma: current.trim().parse().ok()?,
                })
            })
            .collect();

        Ok(samples)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(start: i32, end: i32) -> ChargeRecord {
        ChargeRecord {
            start_percent: start,
            end_percent: end,
            duration_ms: 90_000,
            average_current_ma: 640.0,
            min_temperature: Some(21.5),
            max_temperature: Some(33.0),
            temperature_unit: "°C".to_string(),
        }
    }

    #[test]
    fn charge_history_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let history = ChargeHistory::new(tmp.path().join("charge_history.json"));

        let records = [record(10, 50), record(50, 90), record(5, 100)];
        for (i, r) in records.iter().enumerate() {
            assert_eq!(history.append(r).unwrap(), i as u64 + 1);
        }

        let loaded = history.load().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn missing_history_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let history = ChargeHistory::new(tmp.path().join("nope.json"));

        assert!(history.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_record_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let history = ChargeHistory::new(tmp.path().join("charge_history.json"));

        history.append(&record(10, 50)).unwrap();
        history.append(&record(50, 90)).unwrap();

        // Clobber the first record with junk; the second must survive.
        let mut map: IndexMap<String, Value> =
            serde_json::from_str(&fs::read_to_string(history.path()).unwrap()).unwrap();
        map.insert(
            "charge_1".to_string(),
            Value::String("{not json".to_string()),
        );
        fs::write(history.path(), serde_json::to_string(&map).unwrap()).unwrap();

        let loaded = history.load().unwrap();
        assert_eq!(loaded, vec![record(50, 90)]);
    }

    #[test]
    fn corrupt_history_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("charge_history.json");
        fs::write(&path, "you're not json").unwrap();

        let history = ChargeHistory::new(path);
        assert!(history.load().is_err());
        assert!(history.append(&record(0, 1)).is_err());
    }

    #[test]
    fn sample_log_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let log = SampleLog::new(tmp.path().join("battery_history.txt"), None);

        log.append(1_000, 520).unwrap();
        log.append(2_000, -48).unwrap();

        assert_eq!(
            log.load().unwrap(),
            vec![
                HistorySample {
                    timestamp_ms: 1_000,
                    current_ma: 520
                },
                HistorySample {
                    timestamp_ms: 2_000,
                    current_ma: -48
                },
            ]
        );
    }

    #[test]
    fn sample_log_skips_malformed_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("battery_history.txt");
        fs::write(&path, "1000,520\ngarbage\n2000\n3000,77\n").unwrap();

        let log = SampleLog::new(path, None);
        let samples = log.load().unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].current_ma, 77);
    }

    #[test]
    fn sample_log_retention_drops_oldest() {
        let tmp = tempfile::tempdir().unwrap();
        let log = SampleLog::new(tmp.path().join("battery_history.txt"), Some(2));

        log.append(1_000, 1).unwrap();
        log.append(2_000, 2).unwrap();
        log.append(3_000, 3).unwrap();

        let samples = log.load().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp_ms, 2_000);
        assert_eq!(samples[1].timestamp_ms, 3_000);
    }
}
