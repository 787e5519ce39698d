//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The UI layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod auth {
    use crate::domain::models::user::{Session, UserAccount};

    /// Input for registering a new account.
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub username: String,
        pub password: String,
        pub email: Option<String>,
    }

    /// Input for logging in.
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub username: String,
        pub password: String,
    }

    /// Input for changing a password.
    #[derive(Debug, Clone)]
    pub struct ChangePasswordCommand {
        pub user_id: String,
        pub current_password: String,
        pub new_password: String,
    }

    /// Result of registering a new account.
    #[derive(Debug, Clone)]
    pub struct RegisterResult {
        pub account: UserAccount,
        pub success_message: String,
    }

    /// Result of logging in.
    #[derive(Debug, Clone)]
    pub struct LoginResult {
        pub session: Session,
        pub success_message: String,
    }
}

pub mod profile {
    use crate::domain::models::user::UserProfile;

    /// Input for updating the user profile. `None` fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub birth_date: Option<String>,
        pub height_cm: Option<f64>,
        pub weight_before_pregnancy_kg: Option<f64>,
        pub previous_pregnancies: Option<u32>,
        pub cycle_length_days: Option<u32>,
    }

    /// Result of updating the profile.
    #[derive(Debug, Clone)]
    pub struct UpdateProfileResult {
        pub profile: UserProfile,
        pub success_message: String,
    }
}

pub mod pregnancy {
    use crate::domain::models::pregnancy::PregnancyRecord;
    use crate::domain::gestation::Trimester;

    /// Input for starting a pregnancy record.
    #[derive(Debug, Clone)]
    pub struct StartPregnancyCommand {
        pub last_period_date: String,
        pub conception_date: Option<String>,
        pub baby_name: Option<String>,
        pub baby_gender: Option<String>,
    }

    /// Input for updating a pregnancy record. `None` fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdatePregnancyCommand {
        pub last_period_date: Option<String>,
        pub conception_date: Option<String>,
        pub baby_name: Option<String>,
        pub baby_gender: Option<String>,
    }

    /// Result of starting or updating a pregnancy.
    #[derive(Debug, Clone)]
    pub struct PregnancyResult {
        pub record: PregnancyRecord,
        pub success_message: String,
    }

    /// Snapshot of pregnancy progress as of a given day.
    #[derive(Debug, Clone)]
    pub struct PregnancyStatusResult {
        pub record: PregnancyRecord,
        pub current_week: u32,
        pub trimester: Trimester,
        pub days_left: i64,
    }
}

pub mod reminders {
    use crate::domain::models::reminder::Reminder;

    /// Input for creating a reminder.
    #[derive(Debug, Clone)]
    pub struct CreateReminderCommand {
        pub title: String,
        pub description: String,
        pub reminder_date: String,
        pub reminder_time: String,
        pub kind: String,
    }

    /// Input for updating a reminder. `None` fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateReminderCommand {
        pub reminder_id: String,
        pub title: Option<String>,
        pub description: Option<String>,
        pub reminder_date: Option<String>,
        pub reminder_time: Option<String>,
        pub kind: Option<String>,
        pub is_active: Option<bool>,
    }

    /// Result of creating or updating a reminder.
    #[derive(Debug, Clone)]
    pub struct ReminderResult {
        pub reminder: Reminder,
        pub success_message: String,
    }

    /// Result of listing reminders.
    #[derive(Debug, Clone)]
    pub struct ReminderListResult {
        pub reminders: Vec<Reminder>,
    }
}

pub mod health {
    use crate::domain::models::health::{
        BloodPressureReading, ContractionEntry, KickSession, WeightEntry,
    };

    /// Input for logging a weight measurement.
    #[derive(Debug, Clone)]
    pub struct LogWeightCommand {
        pub date: String,
        pub weight_kg: f64,
        pub note: Option<String>,
    }

    /// Input for logging a kick counting session.
    #[derive(Debug, Clone)]
    pub struct LogKickSessionCommand {
        pub started_at: String,
        pub duration_minutes: u32,
        pub kick_count: u32,
    }

    /// Input for logging a contraction.
    #[derive(Debug, Clone)]
    pub struct LogContractionCommand {
        pub started_at: String,
        pub duration_seconds: u32,
    }

    /// Input for logging a blood pressure reading.
    #[derive(Debug, Clone)]
    pub struct LogBloodPressureCommand {
        pub measured_at: String,
        pub systolic: u32,
        pub diastolic: u32,
        pub pulse: Option<u32>,
    }

    /// Result of logging a weight measurement.
    #[derive(Debug, Clone)]
    pub struct LogWeightResult {
        pub entry: WeightEntry,
        /// Difference to the previous entry, if one exists
        pub change_kg: Option<f64>,
    }

    /// Result of logging a kick session.
    #[derive(Debug, Clone)]
    pub struct LogKickSessionResult {
        pub session: KickSession,
    }

    /// Result of logging a contraction, with the interval to the previous one.
    #[derive(Debug, Clone)]
    pub struct LogContractionResult {
        pub entry: ContractionEntry,
    }

    /// Result of logging a blood pressure reading.
    #[derive(Debug, Clone)]
    pub struct LogBloodPressureResult {
        pub reading: BloodPressureReading,
        /// Set when the reading crosses the hypertension threshold
        pub warning: Option<String>,
    }
}

pub mod checklist {
    use crate::domain::models::checklist::ChecklistItem;

    /// Input for adding a checklist item.
    #[derive(Debug, Clone)]
    pub struct AddChecklistItemCommand {
        pub title: String,
    }

    /// Result of a checklist mutation, returning the full updated list.
    #[derive(Debug, Clone)]
    pub struct ChecklistResult {
        pub items: Vec<ChecklistItem>,
    }
}

pub mod wishlist {
    use crate::domain::models::checklist::WishlistItem;

    /// Input for adding a wishlist item.
    #[derive(Debug, Clone)]
    pub struct AddWishlistItemCommand {
        pub title: String,
        pub note: Option<String>,
    }

    /// Result of a wishlist mutation, returning the full updated list.
    #[derive(Debug, Clone)]
    pub struct WishlistResult {
        pub items: Vec<WishlistItem>,
    }
}
