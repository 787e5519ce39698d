//! SMTP delivery for reminder emails. The transport is built once from the
//! TOML config; when no config exists the app runs with email disabled.

use anyhow::{Context, Result};
use lettre::message::Mailbox;
use lettre::{
    transport::smtp::authentication::Credentials,
    transport::smtp::client::{Tls, TlsParameters},
    Message, SmtpTransport, Transport,
};
use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::models::reminder::Reminder;
use crate::domain::notification::EmailSender;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
        }
    }
}

pub struct EmailService {
    config: EmailConfig,
    transport: Option<SmtpTransport>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        info!(
            "📧 Initializing email service for SMTP server: {}:{}",
            self.config.smtp_server, self.config.smtp_port
        );

        let tls_params = TlsParameters::new(self.config.smtp_server.clone())
            .context("Failed to create TLS parameters")?;

        let transport = SmtpTransport::relay(&self.config.smtp_server)
            .context("Failed to create SMTP relay")?
            .port(self.config.smtp_port)
            .tls(Tls::Required(tls_params))
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        self.transport = Some(transport);
        info!("📧 Email service initialized successfully");
        Ok(())
    }

    pub fn send_reminder_notification(&self, reminder: &Reminder, to_email: &str) -> Result<()> {
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Email service not initialized"))?;

        let subject = format!("Pregnancy Tracker - Reminder: {}", reminder.title);

        let body = format!(
            "Hello!\n\nThis is your reminder:\n\n{}\n{}\n\nScheduled for: {} at {}\nType: {}\n\nBest regards,\nPregnancy Tracker",
            reminder.title,
            reminder.description,
            reminder.reminder_date.format("%B %d, %Y"),
            reminder.reminder_time.format("%H:%M"),
            reminder.kind.as_str()
        );

        let email = Message::builder()
            .from(
                self.config
                    .from_email
                    .parse::<Mailbox>()
                    .context("Failed to parse from email")?,
            )
            .to(to_email
                .parse::<Mailbox>()
                .context("Failed to parse recipient email")?)
            .subject(subject)
            .body(body)
            .context("Failed to build email")?;

        transport.send(&email).context("Failed to send email")?;
        info!("📧 Reminder email sent for reminder {}", reminder.id);
        Ok(())
    }
}

// Thread-safe wrapper for the email service
pub struct EmailServiceWrapper {
    service: EmailService,
}

impl EmailServiceWrapper {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let mut service = EmailService::new(config);
        service.initialize()?;
        Ok(Self { service })
    }

    pub fn send_reminder_notification(&self, reminder: &Reminder, to_email: &str) -> Result<()> {
        self.service.send_reminder_notification(reminder, to_email)
    }
}

impl EmailSender for EmailServiceWrapper {
    fn send_reminder(&self, reminder: &Reminder, to_email: &str) -> Result<()> {
        self.send_reminder_notification(reminder, to_email)
    }
}
