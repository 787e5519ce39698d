//! Domain models for the pregnancy tracker backend.

pub mod checklist;
pub mod health;
pub mod pregnancy;
pub mod reminder;
pub mod user;
