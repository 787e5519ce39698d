//! # Health Log Repository
//!
//! The four append-heavy health logs, one CSV file each in the user's
//! directory: `weight.csv`, `kicks.csv`, `contractions.csv` and
//! `blood_pressure.csv`. Files are rewritten atomically on every change.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use super::connection::{atomic_write, CsvConnection};
use super::find_user_directory;
use crate::domain::models::health::{
    BloodPressureReading, ContractionEntry, KickSession, WeightEntry,
};
use crate::storage::traits::HealthLogStorage;

const WEIGHT_FILE: &str = "weight.csv";
const KICKS_FILE: &str = "kicks.csv";
const CONTRACTIONS_FILE: &str = "contractions.csv";
const BLOOD_PRESSURE_FILE: &str = "blood_pressure.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeightRecord {
    id: String,
    user_id: String,
    date: String, // YYYY-MM-DD
    weight_kg: f64,
    note: String,
    created_at: String, // RFC 3339
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KickRecord {
    id: String,
    user_id: String,
    started_at: String, // RFC 3339
    duration_minutes: u32,
    kick_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContractionRecord {
    id: String,
    user_id: String,
    started_at: String, // RFC 3339
    duration_seconds: u32,
    interval_minutes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BloodPressureRecord {
    id: String,
    user_id: String,
    measured_at: String, // RFC 3339
    systolic: u32,
    diastolic: u32,
    pulse: Option<u32>,
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", s))
}

impl From<&WeightEntry> for WeightRecord {
    fn from(entry: &WeightEntry) -> Self {
        WeightRecord {
            id: entry.id.clone(),
            user_id: entry.user_id.clone(),
            date: entry.date.to_string(),
            weight_kg: entry.weight_kg,
            note: entry.note.clone(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<WeightRecord> for WeightEntry {
    type Error = anyhow::Error;

    fn try_from(record: WeightRecord) -> Result<Self> {
        Ok(WeightEntry {
            date: NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .with_context(|| format!("Invalid weight entry date: {}", record.date))?,
            created_at: parse_rfc3339(&record.created_at)?,
            id: record.id,
            user_id: record.user_id,
            weight_kg: record.weight_kg,
            note: record.note,
        })
    }
}

impl From<&KickSession> for KickRecord {
    fn from(session: &KickSession) -> Self {
        KickRecord {
            id: session.id.clone(),
            user_id: session.user_id.clone(),
            started_at: session.started_at.to_rfc3339(),
            duration_minutes: session.duration_minutes,
            kick_count: session.kick_count,
        }
    }
}

impl TryFrom<KickRecord> for KickSession {
    type Error = anyhow::Error;

    fn try_from(record: KickRecord) -> Result<Self> {
        Ok(KickSession {
            started_at: parse_rfc3339(&record.started_at)?,
            id: record.id,
            user_id: record.user_id,
            duration_minutes: record.duration_minutes,
            kick_count: record.kick_count,
        })
    }
}

impl From<&ContractionEntry> for ContractionRecord {
    fn from(entry: &ContractionEntry) -> Self {
        ContractionRecord {
            id: entry.id.clone(),
            user_id: entry.user_id.clone(),
            started_at: entry.started_at.to_rfc3339(),
            duration_seconds: entry.duration_seconds,
            interval_minutes: entry.interval_minutes,
        }
    }
}

impl TryFrom<ContractionRecord> for ContractionEntry {
    type Error = anyhow::Error;

    fn try_from(record: ContractionRecord) -> Result<Self> {
        Ok(ContractionEntry {
            started_at: parse_rfc3339(&record.started_at)?,
            id: record.id,
            user_id: record.user_id,
            duration_seconds: record.duration_seconds,
            interval_minutes: record.interval_minutes,
        })
    }
}

impl From<&BloodPressureReading> for BloodPressureRecord {
    fn from(reading: &BloodPressureReading) -> Self {
        BloodPressureRecord {
            id: reading.id.clone(),
            user_id: reading.user_id.clone(),
            measured_at: reading.measured_at.to_rfc3339(),
            systolic: reading.systolic,
            diastolic: reading.diastolic,
            pulse: reading.pulse,
        }
    }
}

impl TryFrom<BloodPressureRecord> for BloodPressureReading {
    type Error = anyhow::Error;

    fn try_from(record: BloodPressureRecord) -> Result<Self> {
        Ok(BloodPressureReading {
            measured_at: parse_rfc3339(&record.measured_at)?,
            id: record.id,
            user_id: record.user_id,
            systolic: record.systolic,
            diastolic: record.diastolic,
            pulse: record.pulse,
        })
    }
}

/// CSV-based repository for the health logs
#[derive(Clone)]
pub struct HealthLogRepository {
    connection: CsvConnection,
}

impl HealthLogRepository {
    /// Create a new health log repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn file_path(&self, directory_name: &str, file: &str) -> PathBuf {
        self.connection.get_user_directory(directory_name).join(file)
    }

    fn resolve_directory(&self, user_id: &str) -> Result<String> {
        find_user_directory(&self.connection, user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", user_id))
    }

    fn read_records<R: DeserializeOwned>(&self, directory_name: &str, file: &str) -> Result<Vec<R>> {
        let path = self.file_path(directory_name, file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let handle = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(handle));
        let mut records = Vec::new();
        for result in csv_reader.deserialize::<R>() {
            records.push(result.with_context(|| format!("Malformed row in {:?}", path))?);
        }
        Ok(records)
    }

    fn write_records<R: Serialize>(
        &self,
        directory_name: &str,
        file: &str,
        records: &[R],
    ) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        for record in records {
            csv_writer.serialize(record)?;
        }
        let buffer = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush {}: {}", file, e))?;
        atomic_write(&self.file_path(directory_name, file), &buffer)
    }

    fn append_record<R: Serialize + DeserializeOwned>(
        &self,
        user_id: &str,
        file: &str,
        record: R,
    ) -> Result<()> {
        let directory = self.resolve_directory(user_id)?;
        let mut records: Vec<R> = self.read_records(&directory, file)?;
        records.push(record);
        self.write_records(&directory, file, &records)?;
        debug!("Appended record to {} for user {}", file, user_id);
        Ok(())
    }

    fn delete_record<R, F>(&self, user_id: &str, file: &str, keep: F) -> Result<bool>
    where
        R: Serialize + DeserializeOwned,
        F: Fn(&R) -> bool,
    {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(false),
        };
        let mut records: Vec<R> = self.read_records(&directory, file)?;
        let before = records.len();
        records.retain(|r| keep(r));
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&directory, file, &records)?;
        info!("Deleted record from {} for user {}", file, user_id);
        Ok(true)
    }

    fn list_records<R: DeserializeOwned>(&self, user_id: &str, file: &str) -> Result<Vec<R>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };
        self.read_records(&directory, file)
    }
}

impl HealthLogStorage for HealthLogRepository {
    fn append_weight(&self, entry: &WeightEntry) -> Result<()> {
        self.append_record(&entry.user_id, WEIGHT_FILE, WeightRecord::from(entry))
    }

    fn list_weights(&self, user_id: &str) -> Result<Vec<WeightEntry>> {
        let records: Vec<WeightRecord> = self.list_records(user_id, WEIGHT_FILE)?;
        let mut entries = records
            .into_iter()
            .map(WeightEntry::try_from)
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }

    fn delete_weight(&self, user_id: &str, entry_id: &str) -> Result<bool> {
        self.delete_record(user_id, WEIGHT_FILE, |r: &WeightRecord| r.id != entry_id)
    }

    fn append_kick_session(&self, session: &KickSession) -> Result<()> {
        self.append_record(&session.user_id, KICKS_FILE, KickRecord::from(session))
    }

    fn list_kick_sessions(&self, user_id: &str) -> Result<Vec<KickSession>> {
        let records: Vec<KickRecord> = self.list_records(user_id, KICKS_FILE)?;
        let mut sessions = records
            .into_iter()
            .map(KickSession::try_from)
            .collect::<Result<Vec<_>>>()?;
        sessions.sort_by_key(|s| s.started_at);
        Ok(sessions)
    }

    fn delete_kick_session(&self, user_id: &str, session_id: &str) -> Result<bool> {
        self.delete_record(user_id, KICKS_FILE, |r: &KickRecord| r.id != session_id)
    }

    fn append_contraction(&self, entry: &ContractionEntry) -> Result<()> {
        self.append_record(
            &entry.user_id,
            CONTRACTIONS_FILE,
            ContractionRecord::from(entry),
        )
    }

    fn list_contractions(&self, user_id: &str) -> Result<Vec<ContractionEntry>> {
        let records: Vec<ContractionRecord> = self.list_records(user_id, CONTRACTIONS_FILE)?;
        let mut entries = records
            .into_iter()
            .map(ContractionEntry::try_from)
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.started_at);
        Ok(entries)
    }

    fn delete_contraction(&self, user_id: &str, entry_id: &str) -> Result<bool> {
        self.delete_record(user_id, CONTRACTIONS_FILE, |r: &ContractionRecord| {
            r.id != entry_id
        })
    }

    fn append_blood_pressure(&self, reading: &BloodPressureReading) -> Result<()> {
        self.append_record(
            &reading.user_id,
            BLOOD_PRESSURE_FILE,
            BloodPressureRecord::from(reading),
        )
    }

    fn list_blood_pressure(&self, user_id: &str) -> Result<Vec<BloodPressureReading>> {
        let records: Vec<BloodPressureRecord> = self.list_records(user_id, BLOOD_PRESSURE_FILE)?;
        let mut readings = records
            .into_iter()
            .map(BloodPressureReading::try_from)
            .collect::<Result<Vec<_>>>()?;
        readings.sort_by_key(|r| r.measured_at);
        Ok(readings)
    }

    fn delete_blood_pressure(&self, user_id: &str, reading_id: &str) -> Result<bool> {
        self.delete_record(user_id, BLOOD_PRESSURE_FILE, |r: &BloodPressureRecord| {
            r.id != reading_id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{seed_user, test_connection};
    use chrono::TimeZone;

    fn setup() -> (HealthLogRepository, tempfile::TempDir) {
        let (connection, temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        (HealthLogRepository::new(connection), temp_dir)
    }

    fn weight(id: &str, date: &str, kg: f64) -> WeightEntry {
        WeightEntry {
            id: id.to_string(),
            user_id: "user::1::0".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            weight_kg: kg,
            note: "after breakfast, with shoes".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_weight_round_trip_sorted_by_date() {
        let (repo, _temp_dir) = setup();
        repo.append_weight(&weight("weight::2::0", "2024-04-01", 66.4)).unwrap();
        repo.append_weight(&weight("weight::1::0", "2024-03-01", 65.0)).unwrap();

        let entries = repo.list_weights("user::1::0").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "weight::1::0");
        assert_eq!(entries[0].weight_kg, 65.0);
        assert_eq!(entries[1].note, "after breakfast, with shoes");
    }

    #[test]
    fn test_delete_weight() {
        let (repo, _temp_dir) = setup();
        repo.append_weight(&weight("weight::1::0", "2024-03-01", 65.0)).unwrap();

        assert!(repo.delete_weight("user::1::0", "weight::1::0").unwrap());
        assert!(!repo.delete_weight("user::1::0", "weight::1::0").unwrap());
        assert!(repo.list_weights("user::1::0").unwrap().is_empty());
    }

    #[test]
    fn test_kick_session_round_trip() {
        let (repo, _temp_dir) = setup();
        let session = KickSession {
            id: "kicks::1::0".to_string(),
            user_id: "user::1::0".to_string(),
            started_at: Utc.with_ymd_and_hms(2024, 3, 25, 20, 0, 0).unwrap(),
            duration_minutes: 30,
            kick_count: 12,
        };
        repo.append_kick_session(&session).unwrap();

        let sessions = repo.list_kick_sessions("user::1::0").unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0], session);
    }

    #[test]
    fn test_contraction_optional_interval() {
        let (repo, _temp_dir) = setup();
        let first = ContractionEntry {
            id: "contraction::1::0".to_string(),
            user_id: "user::1::0".to_string(),
            started_at: Utc.with_ymd_and_hms(2024, 9, 30, 4, 0, 0).unwrap(),
            duration_seconds: 45,
            interval_minutes: None,
        };
        let second = ContractionEntry {
            id: "contraction::2::0".to_string(),
            interval_minutes: Some(9.5),
            started_at: Utc.with_ymd_and_hms(2024, 9, 30, 4, 9, 30).unwrap(),
            ..first.clone()
        };
        repo.append_contraction(&first).unwrap();
        repo.append_contraction(&second).unwrap();

        let entries = repo.list_contractions("user::1::0").unwrap();
        assert_eq!(entries[0].interval_minutes, None);
        assert_eq!(entries[1].interval_minutes, Some(9.5));
    }

    #[test]
    fn test_blood_pressure_round_trip() {
        let (repo, _temp_dir) = setup();
        let reading = BloodPressureReading {
            id: "bp::1::0".to_string(),
            user_id: "user::1::0".to_string(),
            measured_at: Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap(),
            systolic: 118,
            diastolic: 76,
            pulse: Some(82),
        };
        repo.append_blood_pressure(&reading).unwrap();

        let readings = repo.list_blood_pressure("user::1::0").unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0], reading);
    }

    #[test]
    fn test_append_for_unknown_user_fails() {
        let (repo, _temp_dir) = setup();
        let mut entry = weight("weight::1::0", "2024-03-01", 65.0);
        entry.user_id = "user::404::0".to_string();
        assert!(repo.append_weight(&entry).is_err());
    }
}
