//! Converters from domain models to the `shared` DTOs the UI consumes.
//! Dates become ISO 8601 strings, timestamps RFC 3339.

use crate::domain::commands::pregnancy::PregnancyStatusResult;
use crate::domain::models::checklist as domain_checklist;
use crate::domain::models::health as domain_health;
use crate::domain::models::pregnancy as domain_pregnancy;
use crate::domain::models::reminder as domain_reminder;
use crate::domain::models::user as domain_user;

pub fn profile_to_dto(profile: domain_user::UserProfile) -> shared::UserProfile {
    shared::UserProfile {
        user_id: profile.user_id,
        name: profile.name,
        birth_date: profile.birth_date.map(|d| d.to_string()),
        height_cm: profile.height_cm,
        weight_before_pregnancy_kg: profile.weight_before_pregnancy_kg,
        previous_pregnancies: profile.previous_pregnancies,
        cycle_length_days: profile.cycle_length_days,
        updated_at: profile.updated_at.to_rfc3339(),
    }
}

pub fn pregnancy_to_dto(record: domain_pregnancy::PregnancyRecord) -> shared::PregnancyRecord {
    shared::PregnancyRecord {
        user_id: record.user_id,
        last_period_date: record.last_period_date.to_string(),
        conception_date: record.conception_date.map(|d| d.to_string()),
        due_date: record.due_date.to_string(),
        baby_name: record.baby_name,
        baby_gender: Some(record.baby_gender.as_str().to_string()),
        created_at: record.created_at.to_rfc3339(),
        updated_at: record.updated_at.to_rfc3339(),
    }
}

/// Status snapshot; `None` means no pregnancy is being tracked
pub fn status_to_dto(status: Option<PregnancyStatusResult>) -> shared::PregnancyStatus {
    match status {
        Some(status) => shared::PregnancyStatus {
            current_week: Some(status.current_week),
            trimester: Some(status.trimester.number()),
            days_left: Some(status.days_left),
            due_date: Some(status.record.due_date.to_string()),
        },
        None => shared::PregnancyStatus {
            current_week: None,
            trimester: None,
            days_left: None,
            due_date: None,
        },
    }
}

pub fn reminder_to_dto(reminder: domain_reminder::Reminder) -> shared::Reminder {
    shared::Reminder {
        id: reminder.id,
        user_id: reminder.user_id,
        title: reminder.title,
        description: reminder.description,
        reminder_date: reminder.reminder_date.to_string(),
        reminder_time: reminder.reminder_time.format("%H:%M").to_string(),
        kind: reminder.kind.as_str().to_string(),
        is_active: reminder.is_active,
        is_completed: reminder.is_completed,
    }
}

pub fn reminders_to_dto(reminders: Vec<domain_reminder::Reminder>) -> shared::ReminderListResponse {
    shared::ReminderListResponse {
        reminders: reminders.into_iter().map(reminder_to_dto).collect(),
    }
}

pub fn weight_to_dto(entry: domain_health::WeightEntry) -> shared::WeightEntry {
    shared::WeightEntry {
        id: entry.id,
        date: entry.date.to_string(),
        weight_kg: entry.weight_kg,
        note: entry.note,
    }
}

pub fn kick_session_to_dto(session: domain_health::KickSession) -> shared::KickSession {
    shared::KickSession {
        id: session.id,
        started_at: session.started_at.to_rfc3339(),
        duration_minutes: session.duration_minutes,
        kick_count: session.kick_count,
    }
}

pub fn contraction_to_dto(entry: domain_health::ContractionEntry) -> shared::ContractionEntry {
    shared::ContractionEntry {
        id: entry.id,
        started_at: entry.started_at.to_rfc3339(),
        duration_seconds: entry.duration_seconds,
        interval_minutes: entry.interval_minutes,
    }
}

pub fn blood_pressure_to_dto(
    reading: domain_health::BloodPressureReading,
) -> shared::BloodPressureReading {
    shared::BloodPressureReading {
        id: reading.id,
        measured_at: reading.measured_at.to_rfc3339(),
        systolic: reading.systolic,
        diastolic: reading.diastolic,
        pulse: reading.pulse,
    }
}

pub fn checklist_item_to_dto(item: domain_checklist::ChecklistItem) -> shared::ChecklistItem {
    shared::ChecklistItem {
        id: item.id,
        title: item.title,
        is_done: item.is_done,
        position: item.position,
    }
}

pub fn wishlist_item_to_dto(item: domain_checklist::WishlistItem) -> shared::WishlistItem {
    shared::WishlistItem {
        id: item.id,
        title: item.title,
        note: item.note,
        is_purchased: item.is_purchased,
        position: item.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};

    use crate::domain::gestation::Trimester;
    use crate::domain::models::pregnancy::BabyGender;
    use crate::domain::models::reminder::ReminderKind;

    #[test]
    fn test_reminder_to_dto_formats_date_and_time() {
        let now = Utc::now();
        let dto = reminder_to_dto(domain_reminder::Reminder {
            id: "reminder::1::0".to_string(),
            user_id: "user::1::0".to_string(),
            title: "Checkup".to_string(),
            description: String::new(),
            reminder_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            reminder_time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            kind: ReminderKind::Appointment,
            is_active: true,
            is_completed: false,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(dto.reminder_date, "2024-06-01");
        assert_eq!(dto.reminder_time, "09:05");
        assert_eq!(dto.kind, "appointment");
    }

    #[test]
    fn test_status_to_dto_none() {
        let dto = status_to_dto(None);
        assert_eq!(dto.current_week, None);
        assert_eq!(dto.trimester, None);
        assert_eq!(dto.due_date, None);
    }

    #[test]
    fn test_status_to_dto_snapshot() {
        let now = Utc::now();
        let record = domain_pregnancy::PregnancyRecord {
            user_id: "user::1::0".to_string(),
            last_period_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            conception_date: None,
            due_date: NaiveDate::from_ymd_opt(2024, 10, 7).unwrap(),
            baby_name: None,
            baby_gender: BabyGender::Unknown,
            created_at: now,
            updated_at: now,
        };
        let dto = status_to_dto(Some(PregnancyStatusResult {
            record,
            current_week: 12,
            trimester: Trimester::First,
            days_left: 196,
        }));
        assert_eq!(dto.current_week, Some(12));
        assert_eq!(dto.trimester, Some(1));
        assert_eq!(dto.due_date.as_deref(), Some("2024-10-07"));
    }
}
