use serde::{Deserialize, Serialize};

/// One entry of the medical checklist (tests, appointments to book, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub is_done: bool,
    pub position: u32,
}

/// One entry of the baby wishlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub title: String,
    pub note: String,
    pub is_purchased: bool,
    pub position: u32,
}
