//! Baby wishlist storage, one `wishlist.yaml` document per user.

use anyhow::Result;
use log::info;
use std::fs;
use std::path::PathBuf;

use super::connection::{atomic_write, CsvConnection};
use super::find_user_directory;
use crate::domain::models::checklist::WishlistItem;
use crate::storage::traits::WishlistStorage;

/// YAML-backed wishlist repository
#[derive(Clone)]
pub struct WishlistRepository {
    connection: CsvConnection,
}

impl WishlistRepository {
    /// Create a new wishlist repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn wishlist_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .get_user_directory(directory_name)
            .join("wishlist.yaml")
    }
}

impl WishlistStorage for WishlistRepository {
    fn load_wishlist(&self, user_id: &str) -> Result<Vec<WishlistItem>> {
        let directory = match find_user_directory(&self.connection, user_id)? {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };
        let path = self.wishlist_path(&directory);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let mut items: Vec<WishlistItem> = serde_yaml::from_str(&content)?;
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    fn save_wishlist(&self, user_id: &str, items: &[WishlistItem]) -> Result<()> {
        let directory = find_user_directory(&self.connection, user_id)?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", user_id))?;
        let yaml = serde_yaml::to_string(items)?;
        atomic_write(&self.wishlist_path(&directory), yaml.as_bytes())?;
        info!("Saved wishlist ({} items) for user {}", items.len(), user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{seed_user, test_connection};

    fn item(id: &str, title: &str, position: u32) -> WishlistItem {
        WishlistItem {
            id: id.to_string(),
            title: title.to_string(),
            note: String::new(),
            is_purchased: false,
            position,
        }
    }

    #[test]
    fn test_save_and_load_sorted_by_position() {
        let (connection, _temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        let repo = WishlistRepository::new(connection);

        let items = vec![
            item("wishlist::2::0", "Stroller", 2),
            item("wishlist::1::0", "Crib", 1),
        ];
        repo.save_wishlist("user::1::0", &items).unwrap();

        let loaded = repo.load_wishlist("user::1::0").unwrap();
        assert_eq!(loaded[0].title, "Crib");
        assert_eq!(loaded[1].title, "Stroller");
    }

    #[test]
    fn test_purchased_flag_round_trip() {
        let (connection, _temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        let repo = WishlistRepository::new(connection);

        let mut bought = item("wishlist::1::0", "Bottle warmer", 1);
        bought.is_purchased = true;
        bought.note = "the one with the timer".to_string();
        repo.save_wishlist("user::1::0", &[bought]).unwrap();

        let loaded = repo.load_wishlist("user::1::0").unwrap();
        assert!(loaded[0].is_purchased);
        assert_eq!(loaded[0].note, "the one with the timer");
    }

    #[test]
    fn test_load_empty_for_unknown_user() {
        let (connection, _temp_dir) = test_connection();
        let repo = WishlistRepository::new(connection);
        assert!(repo.load_wishlist("user::404::0").unwrap().is_empty());
    }
}
