//! Medical checklist: an ordered list of todo items (tests, appointments).
//! Every mutation returns the full updated list so the UI can re-render.

use anyhow::Result;
use log::info;

use crate::domain::commands::checklist::{AddChecklistItemCommand, ChecklistResult};
use crate::domain::ids;
use crate::domain::models::checklist::ChecklistItem;
use crate::storage::csv::{ChecklistRepository, CsvConnection};
use crate::storage::traits::ChecklistStorage;

/// Service for the medical checklist screen
#[derive(Clone)]
pub struct ChecklistService {
    checklist_repository: ChecklistRepository,
}

impl ChecklistService {
    /// Create a new ChecklistService
    pub fn new(csv_conn: CsvConnection) -> Self {
        let checklist_repository = ChecklistRepository::new(csv_conn);
        Self { checklist_repository }
    }

    /// The full checklist, ordered by position
    pub fn list_items(&self, user_id: &str) -> Result<ChecklistResult> {
        let items = self.checklist_repository.load_checklist(user_id)?;
        Ok(ChecklistResult { items })
    }

    /// Append a new item at the end of the list
    pub fn add_item(
        &self,
        user_id: &str,
        command: AddChecklistItemCommand,
    ) -> Result<ChecklistResult> {
        let title = command.title.trim().to_string();
        if title.is_empty() {
            return Err(anyhow::anyhow!("Checklist item title cannot be empty"));
        }

        let mut items = self.checklist_repository.load_checklist(user_id)?;
        let position = items.iter().map(|i| i.position + 1).max().unwrap_or(0);
        items.push(ChecklistItem {
            id: ids::generate_id("checklist"),
            title,
            is_done: false,
            position,
        });
        self.checklist_repository.save_checklist(user_id, &items)?;

        info!("Added checklist item for user {}", user_id);
        Ok(ChecklistResult { items })
    }

    /// Toggle an item between done and open
    pub fn toggle_item(&self, user_id: &str, item_id: &str) -> Result<ChecklistResult> {
        let mut items = self.checklist_repository.load_checklist(user_id)?;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| anyhow::anyhow!("Checklist item not found: {}", item_id))?;
        item.is_done = !item.is_done;
        self.checklist_repository.save_checklist(user_id, &items)?;
        Ok(ChecklistResult { items })
    }

    /// Remove an item, renumbering the remaining positions
    pub fn remove_item(&self, user_id: &str, item_id: &str) -> Result<ChecklistResult> {
        let mut items = self.checklist_repository.load_checklist(user_id)?;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        if items.len() == before {
            return Err(anyhow::anyhow!("Checklist item not found: {}", item_id));
        }
        for (index, item) in items.iter_mut().enumerate() {
            item.position = index as u32;
        }
        self.checklist_repository.save_checklist(user_id, &items)?;

        info!("Removed checklist item for user {}", user_id);
        Ok(ChecklistResult { items })
    }
}
