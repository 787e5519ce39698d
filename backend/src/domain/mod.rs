//! # Domain Layer
//!
//! Services and models for the pregnancy tracker. Each screen of the app has
//! a matching service; all of them share one `CsvConnection`.

pub mod auth_service;
pub mod checklist_service;
pub mod commands;
pub mod email_config_service;
pub mod email_service;
pub mod gestation;
pub mod health_service;
pub mod ids;
pub mod models;
pub mod notification;
pub mod pregnancy_service;
pub mod profile_service;
pub mod reminder_service;
pub mod scheduler;
pub mod wishlist_service;

pub use auth_service::AuthService;
pub use checklist_service::ChecklistService;
pub use email_config_service::EmailConfigService;
pub use email_service::{EmailConfig, EmailService, EmailServiceWrapper};
pub use health_service::HealthService;
pub use notification::{
    DispatchOutcome, EmailSender, LogNotificationSink, NotificationDispatcher, NotificationSink,
};
pub use pregnancy_service::PregnancyService;
pub use profile_service::ProfileService;
pub use reminder_service::ReminderService;
pub use scheduler::{ReminderScheduler, SchedulerConfig};
pub use wishlist_service::WishlistService;
