//! # Storage Layer
//!
//! Storage traits plus the file-backed implementation. The domain layer only
//! talks to the traits so the backing store can be swapped without touching
//! the services.

pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{
    ChecklistStorage, HealthLogStorage, PregnancyStorage, ReminderStorage, UserStorage,
    WishlistStorage,
};
