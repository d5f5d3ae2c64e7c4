//! # Catalog Repository
//!
//! Persists the item catalog under the `items` key.

use std::collections::HashMap;

use kirana_core::catalog::default_drafts;
use kirana_core::{Catalog, Item, ItemDraft, ItemPatch};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::store::{keys, KvStore};

/// Repository for catalog items.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    store: KvStore,
}

impl CatalogRepository {
    pub fn new(store: KvStore) -> Self {
        CatalogRepository { store }
    }

    /// Loads the catalog. A store with no catalog yields an empty one.
    pub async fn load(&self) -> DbResult<Catalog> {
        Ok(self.store.get(keys::ITEMS).await?.unwrap_or_default())
    }

    pub async fn save(&self, catalog: &Catalog) -> DbResult<()> {
        self.store.set(keys::ITEMS, catalog).await
    }

    pub async fn list(&self) -> DbResult<Vec<Item>> {
        Ok(self.load().await?.into_items())
    }

    pub async fn get(&self, id: u64) -> DbResult<Option<Item>> {
        Ok(self.load().await?.get(id).cloned())
    }

    pub async fn add(&self, draft: ItemDraft) -> DbResult<Item> {
        let mut catalog = self.load().await?;
        let item = catalog.add(draft)?;
        self.save(&catalog).await?;

        info!(id = item.id, name = %item.name, "Item added");
        Ok(item)
    }

    pub async fn update(&self, id: u64, patch: ItemPatch) -> DbResult<Item> {
        let mut catalog = self.load().await?;
        let item = catalog.update(id, patch)?;
        self.save(&catalog).await?;

        debug!(id = item.id, margin = item.profit_margin, "Item updated");
        Ok(item)
    }

    /// Removes an item. Returns whether it existed; nothing is written if not.
    pub async fn remove(&self, id: u64) -> DbResult<bool> {
        let mut catalog = self.load().await?;
        let Some(removed) = catalog.remove(id) else {
            debug!(id, "Remove skipped, item absent");
            return Ok(false);
        };
        self.save(&catalog).await?;

        info!(id, name = %removed.name, "Item removed");
        Ok(true)
    }

    /// Replaces the catalog with the starter list. Returns the item count.
    pub async fn seed_defaults(&self) -> DbResult<usize> {
        let mut catalog = Catalog::new();
        catalog.seed(default_drafts())?;
        self.save(&catalog).await?;

        info!(count = catalog.len(), "Catalog seeded with default items");
        Ok(catalog.len())
    }

    /// Seeds the starter list only if no catalog has ever been stored.
    pub async fn ensure_seeded(&self) -> DbResult<bool> {
        if self.store.contains(keys::ITEMS).await? {
            return Ok(false);
        }
        self.seed_defaults().await?;
        Ok(true)
    }

    /// Applies a purchase-rate correction map as one catalog write.
    ///
    /// Nothing is written when no rate changes.
    pub async fn apply_purchase_rates(&self, rates: &HashMap<String, f64>) -> DbResult<usize> {
        let mut catalog = self.load().await?;
        let updated = catalog.apply_purchase_rates(rates);

        if updated > 0 {
            self.save(&catalog).await?;
        }

        info!(offered = rates.len(), updated, "Purchase rates applied");
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use kirana_core::CoreError;

    async fn repo() -> CatalogRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().catalog()
    }

    #[tokio::test]
    async fn test_add_persists_with_sequential_ids() {
        let repo = repo().await;
        let first = repo.add(ItemDraft::new("RICE", "KG", 60.0, 50.0)).await.unwrap();
        let second = repo.add(ItemDraft::new("DAL", "KG", 120.0, 100.0)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_update_writes_nothing() {
        let repo = repo().await;
        repo.add(ItemDraft::new("RICE", "KG", 60.0, 50.0)).await.unwrap();

        let patch = ItemPatch {
            store_rate: Some(-1.0),
            ..Default::default()
        };
        let err = repo.update(1, patch).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert_eq!(repo.get(1).await.unwrap().unwrap().store_rate, 60.0);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let repo = repo().await;
        repo.add(ItemDraft::new("RICE", "KG", 60.0, 50.0)).await.unwrap();

        assert!(repo.remove(1).await.unwrap());
        assert!(!repo.remove(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_seeded_only_once() {
        let repo = repo().await;
        assert!(repo.ensure_seeded().await.unwrap());
        repo.remove(27).await.unwrap();

        assert!(!repo.ensure_seeded().await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 26);
    }

    #[tokio::test]
    async fn test_apply_purchase_rates() {
        let repo = repo().await;
        repo.seed_defaults().await.unwrap();

        let mut rates = HashMap::new();
        rates.insert("AJINOMOTO".to_string(), 140.0);
        assert_eq!(repo.apply_purchase_rates(&rates).await.unwrap(), 1);

        let item = repo.get(6).await.unwrap().unwrap();
        assert_eq!(item.name, "AJINOMOTO");
        assert_eq!(item.purchase_rate, 140.0);
        assert_eq!(item.profit_margin, 40.0);
    }
}
