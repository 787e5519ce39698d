//! # Pregnancy Tracker Backend
//!
//! Synchronous backend for the pregnancy tracker desktop app: domain
//! services over a file-backed store, plus a background scheduler that
//! dispatches due reminders. The UI talks to the services directly; every
//! operation is a local disk read/write.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod mappers;
pub mod storage;

pub use storage::csv::CsvConnection;

use domain::{
    AuthService, ChecklistService, EmailConfigService, EmailSender, EmailServiceWrapper,
    HealthService, NotificationDispatcher, PregnancyService, ProfileService, ReminderScheduler,
    ReminderService, SchedulerConfig, WishlistService,
};

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub pregnancy_service: PregnancyService,
    pub reminder_service: ReminderService,
    pub health_service: HealthService,
    pub checklist_service: ChecklistService,
    pub wishlist_service: WishlistService,
    csv_conn: CsvConnection,
}

impl Backend {
    /// Create a backend rooted in the default data directory
    pub fn new() -> Result<Self> {
        let csv_conn = CsvConnection::new_default()?;
        Ok(Self::with_connection(csv_conn))
    }

    /// Create a backend rooted in an explicit data directory
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let csv_conn = CsvConnection::new(data_dir)?;
        Ok(Self::with_connection(csv_conn))
    }

    fn with_connection(csv_conn: CsvConnection) -> Self {
        let auth_service = AuthService::new(csv_conn.clone());
        let profile_service = ProfileService::new(csv_conn.clone());
        let pregnancy_service = PregnancyService::new(csv_conn.clone());
        let reminder_service = ReminderService::new(csv_conn.clone());
        let health_service = HealthService::new(csv_conn.clone());
        let checklist_service = ChecklistService::new(csv_conn.clone());
        let wishlist_service = WishlistService::new(csv_conn.clone());

        Backend {
            auth_service,
            profile_service,
            pregnancy_service,
            reminder_service,
            health_service,
            checklist_service,
            wishlist_service,
            csv_conn,
        }
    }

    /// The connection shared by all services
    pub fn connection(&self) -> &CsvConnection {
        &self.csv_conn
    }

    /// Start the reminder scheduler. Email delivery is enabled when a valid
    /// `email_config.toml` exists in the data directory.
    pub fn start_scheduler(&self, config: SchedulerConfig) -> ReminderScheduler {
        let email_config_path = self.csv_conn.base_directory().join("email_config.toml");
        let email_config = EmailConfigService::load_config_or_default(&email_config_path);

        let email_sender: Option<Arc<dyn EmailSender>> = if email_config.username.is_empty() {
            None
        } else {
            match EmailServiceWrapper::new(email_config) {
                Ok(wrapper) => Some(Arc::new(wrapper)),
                Err(e) => {
                    log::warn!("Email service unavailable: {}", e);
                    None
                }
            }
        };

        ReminderScheduler::start(
            config,
            self.auth_service.clone(),
            self.reminder_service.clone(),
            NotificationDispatcher::new(email_sender),
        )
    }
}
