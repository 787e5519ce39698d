//! # Health Service
//!
//! The four health logs: weight, kick counting, contractions and blood
//! pressure. Validation ranges are deliberately generous; the service rejects
//! obvious typos, not unusual physiology.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};

use crate::domain::commands::health::{
    LogBloodPressureCommand, LogBloodPressureResult, LogContractionCommand, LogContractionResult,
    LogKickSessionCommand, LogKickSessionResult, LogWeightCommand, LogWeightResult,
};
use crate::domain::ids;
use crate::domain::models::health::{
    BloodPressureReading, ContractionEntry, KickSession, WeightEntry,
};
use crate::storage::csv::{CsvConnection, HealthLogRepository};
use crate::storage::traits::HealthLogStorage;

const MIN_WEIGHT_KG: f64 = 30.0;
const MAX_WEIGHT_KG: f64 = 300.0;
const MAX_KICK_SESSION_MINUTES: u32 = 180;
const MAX_CONTRACTION_SECONDS: u32 = 600;
const SYSTOLIC_RANGE: std::ops::RangeInclusive<u32> = 60..=250;
const DIASTOLIC_RANGE: std::ops::RangeInclusive<u32> = 30..=150;

/// Readings at or above 140/90 get a warning attached to the result
const HYPERTENSION_SYSTOLIC: u32 = 140;
const HYPERTENSION_DIASTOLIC: u32 = 90;

/// Service for the health tracking screens
#[derive(Clone)]
pub struct HealthService {
    health_repository: HealthLogRepository,
}

impl HealthService {
    /// Create a new HealthService
    pub fn new(csv_conn: CsvConnection) -> Self {
        let health_repository = HealthLogRepository::new(csv_conn);
        Self { health_repository }
    }

    /// Log a weight measurement, reporting the change to the previous entry
    pub fn log_weight(&self, user_id: &str, command: LogWeightCommand) -> Result<LogWeightResult> {
        info!("Logging weight for user {}: {} kg", user_id, command.weight_kg);

        if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&command.weight_kg) {
            return Err(anyhow::anyhow!(
                "Weight must be between {} and {} kg",
                MIN_WEIGHT_KG,
                MAX_WEIGHT_KG
            ));
        }

        let date = parse_date(&command.date)?;
        // Backdated entries compare against the latest entry on or before
        // their own date, not the newest entry overall
        let previous = self.health_repository.list_weights(user_id)?;
        let change_kg = previous
            .iter()
            .filter(|e| e.date <= date)
            .last()
            .map(|e| command.weight_kg - e.weight_kg);

        let entry = WeightEntry {
            id: ids::generate_id("weight"),
            user_id: user_id.to_string(),
            date,
            weight_kg: command.weight_kg,
            note: command.note.unwrap_or_default().trim().to_string(),
            created_at: Utc::now(),
        };
        self.health_repository.append_weight(&entry)?;

        Ok(LogWeightResult { entry, change_kg })
    }

    /// All weight entries, ordered by date
    pub fn list_weights(&self, user_id: &str) -> Result<Vec<WeightEntry>> {
        self.health_repository.list_weights(user_id)
    }

    /// Delete a weight entry.
    /// Returns true if the entry was found and deleted.
    pub fn delete_weight(&self, user_id: &str, entry_id: &str) -> Result<bool> {
        self.health_repository.delete_weight(user_id, entry_id)
    }

    /// Log a finished kick counting session
    pub fn log_kick_session(
        &self,
        user_id: &str,
        command: LogKickSessionCommand,
    ) -> Result<LogKickSessionResult> {
        info!(
            "Logging kick session for user {}: {} kicks in {} min",
            user_id, command.kick_count, command.duration_minutes
        );

        if command.duration_minutes == 0 || command.duration_minutes > MAX_KICK_SESSION_MINUTES {
            return Err(anyhow::anyhow!(
                "Session duration must be between 1 and {} minutes",
                MAX_KICK_SESSION_MINUTES
            ));
        }

        let session = KickSession {
            id: ids::generate_id("kicks"),
            user_id: user_id.to_string(),
            started_at: parse_timestamp(&command.started_at)?,
            duration_minutes: command.duration_minutes,
            kick_count: command.kick_count,
        };
        self.health_repository.append_kick_session(&session)?;

        Ok(LogKickSessionResult { session })
    }

    /// All kick sessions, ordered by start time
    pub fn list_kick_sessions(&self, user_id: &str) -> Result<Vec<KickSession>> {
        self.health_repository.list_kick_sessions(user_id)
    }

    /// Delete a kick session.
    /// Returns true if the session was found and deleted.
    pub fn delete_kick_session(&self, user_id: &str, session_id: &str) -> Result<bool> {
        self.health_repository.delete_kick_session(user_id, session_id)
    }

    /// Log a contraction. The interval to the previous contraction is derived
    /// from the log, not supplied by the caller.
    pub fn log_contraction(
        &self,
        user_id: &str,
        command: LogContractionCommand,
    ) -> Result<LogContractionResult> {
        info!("Logging contraction for user {}", user_id);

        if command.duration_seconds == 0 || command.duration_seconds > MAX_CONTRACTION_SECONDS {
            return Err(anyhow::anyhow!(
                "Contraction duration must be between 1 and {} seconds",
                MAX_CONTRACTION_SECONDS
            ));
        }

        let started_at = parse_timestamp(&command.started_at)?;
        let previous = self.health_repository.list_contractions(user_id)?;
        let interval_minutes = previous
            .iter()
            .filter(|e| e.started_at < started_at)
            .last()
            .map(|e| (started_at - e.started_at).num_seconds() as f64 / 60.0);

        let entry = ContractionEntry {
            id: ids::generate_id("contraction"),
            user_id: user_id.to_string(),
            started_at,
            duration_seconds: command.duration_seconds,
            interval_minutes,
        };
        self.health_repository.append_contraction(&entry)?;

        Ok(LogContractionResult { entry })
    }

    /// All contractions, ordered by start time
    pub fn list_contractions(&self, user_id: &str) -> Result<Vec<ContractionEntry>> {
        self.health_repository.list_contractions(user_id)
    }

    /// Delete a contraction entry.
    /// Returns true if the entry was found and deleted.
    pub fn delete_contraction(&self, user_id: &str, entry_id: &str) -> Result<bool> {
        self.health_repository.delete_contraction(user_id, entry_id)
    }

    /// Log a blood pressure reading, warning on hypertension-range values
    pub fn log_blood_pressure(
        &self,
        user_id: &str,
        command: LogBloodPressureCommand,
    ) -> Result<LogBloodPressureResult> {
        info!(
            "Logging blood pressure for user {}: {}/{}",
            user_id, command.systolic, command.diastolic
        );

        if !SYSTOLIC_RANGE.contains(&command.systolic) {
            return Err(anyhow::anyhow!(
                "Systolic pressure must be between {} and {}",
                SYSTOLIC_RANGE.start(),
                SYSTOLIC_RANGE.end()
            ));
        }
        if !DIASTOLIC_RANGE.contains(&command.diastolic) {
            return Err(anyhow::anyhow!(
                "Diastolic pressure must be between {} and {}",
                DIASTOLIC_RANGE.start(),
                DIASTOLIC_RANGE.end()
            ));
        }
        if command.diastolic >= command.systolic {
            return Err(anyhow::anyhow!("Diastolic must be lower than systolic"));
        }

        let reading = BloodPressureReading {
            id: ids::generate_id("bp"),
            user_id: user_id.to_string(),
            measured_at: parse_timestamp(&command.measured_at)?,
            systolic: command.systolic,
            diastolic: command.diastolic,
            pulse: command.pulse,
        };
        self.health_repository.append_blood_pressure(&reading)?;

        let warning = if reading.systolic >= HYPERTENSION_SYSTOLIC
            || reading.diastolic >= HYPERTENSION_DIASTOLIC
        {
            warn!(
                "Hypertension-range reading for user {}: {}/{}",
                user_id, reading.systolic, reading.diastolic
            );
            Some(format!(
                "Reading {}/{} is elevated; consider contacting your doctor",
                reading.systolic, reading.diastolic
            ))
        } else {
            None
        };

        Ok(LogBloodPressureResult { reading, warning })
    }

    /// All blood pressure readings, ordered by measurement time
    pub fn list_blood_pressure(&self, user_id: &str) -> Result<Vec<BloodPressureReading>> {
        self.health_repository.list_blood_pressure(user_id)
    }

    /// Delete a blood pressure reading.
    /// Returns true if the reading was found and deleted.
    pub fn delete_blood_pressure(&self, user_id: &str, reading_id: &str) -> Result<bool> {
        self.health_repository.delete_blood_pressure(user_id, reading_id)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date: {}", s))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp: {}", s))
}
