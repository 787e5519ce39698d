//! Baby wishlist: items to buy before the due date, with a purchased flag.

use anyhow::Result;
use log::info;

use crate::domain::commands::wishlist::{AddWishlistItemCommand, WishlistResult};
use crate::domain::ids;
use crate::domain::models::checklist::WishlistItem;
use crate::storage::csv::{CsvConnection, WishlistRepository};
use crate::storage::traits::WishlistStorage;

/// Service for the baby wishlist screen
#[derive(Clone)]
pub struct WishlistService {
    wishlist_repository: WishlistRepository,
}

impl WishlistService {
    /// Create a new WishlistService
    pub fn new(csv_conn: CsvConnection) -> Self {
        let wishlist_repository = WishlistRepository::new(csv_conn);
        Self { wishlist_repository }
    }

    /// The full wishlist, ordered by position
    pub fn list_items(&self, user_id: &str) -> Result<WishlistResult> {
        let items = self.wishlist_repository.load_wishlist(user_id)?;
        Ok(WishlistResult { items })
    }

    /// Append a new item at the end of the list
    pub fn add_item(
        &self,
        user_id: &str,
        command: AddWishlistItemCommand,
    ) -> Result<WishlistResult> {
        let title = command.title.trim().to_string();
        if title.is_empty() {
            return Err(anyhow::anyhow!("Wishlist item title cannot be empty"));
        }

        let mut items = self.wishlist_repository.load_wishlist(user_id)?;
        let position = items.iter().map(|i| i.position + 1).max().unwrap_or(0);
        items.push(WishlistItem {
            id: ids::generate_id("wishlist"),
            title,
            note: command.note.unwrap_or_default().trim().to_string(),
            is_purchased: false,
            position,
        });
        self.wishlist_repository.save_wishlist(user_id, &items)?;

        info!("Added wishlist item for user {}", user_id);
        Ok(WishlistResult { items })
    }

    /// Toggle an item between purchased and open
    pub fn toggle_purchased(&self, user_id: &str, item_id: &str) -> Result<WishlistResult> {
        let mut items = self.wishlist_repository.load_wishlist(user_id)?;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| anyhow::anyhow!("Wishlist item not found: {}", item_id))?;
        item.is_purchased = !item.is_purchased;
        self.wishlist_repository.save_wishlist(user_id, &items)?;
        Ok(WishlistResult { items })
    }

    /// Remove an item, renumbering the remaining positions
    pub fn remove_item(&self, user_id: &str, item_id: &str) -> Result<WishlistResult> {
        let mut items = self.wishlist_repository.load_wishlist(user_id)?;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        if items.len() == before {
            return Err(anyhow::anyhow!("Wishlist item not found: {}", item_id));
        }
        for (index, item) in items.iter_mut().enumerate() {
            item.position = index as u32;
        }
        self.wishlist_repository.save_wishlist(user_id, &items)?;

        info!("Removed wishlist item for user {}", user_id);
        Ok(WishlistResult { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{seed_user, test_connection};

    fn setup_test() -> (WishlistService, tempfile::TempDir) {
        let (connection, temp_dir) = test_connection();
        seed_user(&connection, "user::1::0", "anna");
        (WishlistService::new(connection), temp_dir)
    }

    fn add(service: &WishlistService, title: &str) -> WishlistResult {
        service
            .add_item(
                "user::1::0",
                AddWishlistItemCommand {
                    title: title.to_string(),
                    note: None,
                },
            )
            .unwrap()
    }

    #[test]
    fn test_add_and_toggle_purchased() {
        let (service, _temp_dir) = setup_test();
        let result = add(&service, "Crib");
        let id = result.items[0].id.clone();

        let toggled = service.toggle_purchased("user::1::0", &id).unwrap();
        assert!(toggled.items[0].is_purchased);
    }

    #[test]
    fn test_remove_item() {
        let (service, _temp_dir) = setup_test();
        add(&service, "Crib");
        let result = add(&service, "Stroller");
        let id = result.items[0].id.clone();

        let remaining = service.remove_item("user::1::0", &id).unwrap();
        assert_eq!(remaining.items.len(), 1);
        assert_eq!(remaining.items[0].title, "Stroller");
        assert_eq!(remaining.items[0].position, 0);
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let (service, _temp_dir) = setup_test();
        let result = service.add_item(
            "user::1::0",
            AddWishlistItemCommand {
                title: "  ".to_string(),
                note: None,
            },
        );
        assert!(result.is_err());
    }
}
