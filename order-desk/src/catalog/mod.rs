//! Menu catalog
//!
//! Read-only view of `menu.json`. Items are handed out as `Arc<MenuItem>`
//! so order lines share the catalog's entries instead of copying them.

use crate::orders::storage::{JsonStore, Loaded, StorageError, StorageResult};
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuCategory, MenuItem};
use std::collections::HashSet;
use std::sync::Arc;

/// Loaded menu, in document order
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: Vec<Arc<MenuItem>>,
}

impl MenuCatalog {
    /// Load the catalog from `store`
    ///
    /// A missing document gives an empty catalog; a corrupt one gives an
    /// empty catalog plus the recovered error.
    pub fn load(store: &JsonStore) -> StorageResult<Loaded<Self>> {
        let loaded = store.load_menu()?.map(Self::from_items);
        tracing::info!(items = loaded.value.len(), "Menu catalog loaded");
        Ok(loaded)
    }

    /// UI error for a menu that could not be read or was recovered empty
    pub fn unavailable(err: &StorageError) -> AppError {
        let app = AppError::with_message(ErrorCode::MenuUnavailable, err.to_string());
        match err {
            StorageError::Io { path, .. } | StorageError::Parse { path, .. } => {
                app.with_detail("path", path.display().to_string())
            }
            StorageError::Serialization(_) => app,
        }
    }

    /// Build a catalog, skipping malformed entries and repeated names
    pub fn from_items(items: impl IntoIterator<Item = MenuItem>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for item in items {
            if !item.is_well_formed() {
                tracing::warn!(name = %item.name, price = %item.price, "Skipping malformed menu item");
                continue;
            }
            if !seen.insert(item.name.clone()) {
                tracing::warn!(name = %item.name, "Skipping duplicate menu item");
                continue;
            }
            kept.push(Arc::new(item));
        }

        Self { items: kept }
    }

    pub fn items(&self) -> &[Arc<MenuItem>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by name
    pub fn get(&self, name: &str) -> Option<Arc<MenuItem>> {
        self.items.iter().find(|i| i.name == name).cloned()
    }

    /// Items whose category label equals `label`; unknown labels match nothing
    pub fn items_by_category(&self, label: &str) -> Vec<Arc<MenuItem>> {
        match MenuCategory::from_label(label) {
            Some(category) => self.items_of(category),
            None => Vec::new(),
        }
    }

    pub fn items_of(&self, category: MenuCategory) -> Vec<Arc<MenuItem>> {
        self.items
            .iter()
            .filter(|i| i.kind == category)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample() -> Vec<MenuItem> {
        vec![
            MenuItem::new(MenuCategory::Dish, "Борщ", Decimal::from(120)),
            MenuItem::new(MenuCategory::Drink, "Узвар", Decimal::from(40)),
            MenuItem::new(MenuCategory::Dish, "Вареники", Decimal::from(95)),
            MenuItem::new(MenuCategory::Dessert, "Сирники", Decimal::from(90)),
        ]
    }

    #[test]
    fn test_items_by_category_keeps_document_order() {
        let catalog = MenuCatalog::from_items(sample());
        let dishes: Vec<_> = catalog
            .items_by_category("Блюда власної кухні")
            .iter()
            .map(|i| i.name.clone())
            .collect();
        assert_eq!(dishes, vec!["Борщ", "Вареники"]);
        assert_eq!(catalog.items_by_category("Напої").len(), 1);
        assert_eq!(catalog.items_of(MenuCategory::Dessert)[0].name, "Сирники");
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let catalog = MenuCatalog::from_items(sample());
        assert!(catalog.items_by_category("Піца").is_empty());
        assert!(catalog.items_by_category("").is_empty());
    }

    #[test]
    fn test_get_shares_entry() {
        let catalog = MenuCatalog::from_items(sample());
        let a = catalog.get("Узвар").unwrap();
        let b = catalog.get("Узвар").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(catalog.get("Квас").is_none());
    }

    #[test]
    fn test_skips_malformed_and_duplicates() {
        let mut items = sample();
        items.push(MenuItem::new(MenuCategory::Dish, "Борщ", Decimal::from(999)));
        items.push(MenuItem::new(MenuCategory::Drink, "", Decimal::ONE));
        items.push(MenuItem::new(MenuCategory::Drink, "Квас", Decimal::NEGATIVE_ONE));

        let catalog = MenuCatalog::from_items(items);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("Борщ").unwrap().price, Decimal::from(120));
    }

    #[test]
    fn test_load_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let empty = MenuCatalog::load(&store).unwrap();
        assert!(empty.is_clean());
        assert!(empty.value.is_empty());

        store.save_menu(&sample()).unwrap();
        let loaded = MenuCatalog::load(&store).unwrap().value;
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.items()[0].category(), "Блюда власної кухні");
    }

    #[test]
    fn test_load_failure_maps_to_menu_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        std::fs::write(store.menu_path(), "[{").unwrap();

        let loaded = MenuCatalog::load(&store).unwrap();
        let err = MenuCatalog::unavailable(loaded.recovered.as_ref().unwrap());
        assert_eq!(err.code, ErrorCode::MenuUnavailable);
        assert!(!err.is_validation());
        let details = err.details.unwrap();
        assert_eq!(details["path"], store.menu_path().display().to_string());

        // a directory in place of the file is an I/O failure
        std::fs::remove_file(store.menu_path()).unwrap();
        std::fs::create_dir(store.menu_path()).unwrap();
        let err = MenuCatalog::unavailable(&MenuCatalog::load(&store).unwrap_err());
        assert_eq!(err.code, ErrorCode::MenuUnavailable);
    }
}
