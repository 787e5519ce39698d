//! Medical checklist storage, one `checklist.yaml` document per user.

use anyhow::Result;
use log::info;
use std::fs;
use std::path::PathBuf;

use super::connection::{atomic_write, CsvConnection};
use super::find_user_directory;
use crate::domain::models::checklist::ChecklistItem;
use crate::storage::traits::ChecklistStorage;

/// YAML-backed checklist repository
#[derive(Clone)]
pub struct ChecklistRepository {
    connection: CsvConnection,
}

impl ChecklistRepository {
    /// Create a new checklist repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn checklist_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .get_user_directory(directory_name)
            .join("checklist.yaml")
    }
}

impl ChecklistStorage for ChecklistRepository {
    fn load_checklist(&self, user_id: &str) -> Result<Vec<ChecklistItem>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };
        let path = self.checklist_path(&directory);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let mut items: Vec<ChecklistItem> = serde_yaml::from_str(&content)?;
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    fn save_checklist(&self, user_id: &str, items: &[ChecklistItem]) -> Result<()> {
        let directory = find_user_directory(&self.connection, user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", user_id))?;
        let yaml = serde_yaml::to_string(items)?;
        atomic_write(&self.checklist_path(&directory), yaml.as_bytes())?;
        info!("Saved checklist ({} items) for user {}", items.len(), user_id);
        Ok(())
    }
}
