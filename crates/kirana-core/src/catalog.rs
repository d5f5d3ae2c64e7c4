//! # Catalog
//!
//! Ordered collection of sellable items.
//!
//! ## Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add(draft)  → id = max(existing ids, default 0) + 1                    │
//! │                                                                         │
//! │   [1 PALM.OIL] [2 PATTAI-1] [3 PATTAI-2]   add → 4                      │
//! │   [1 PALM.OIL]              [3 PATTAI-2]   add → 4  (2 is not reused    │
//! │                                                     while 3 exists)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Removing an item never touches bills; they carry their own snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Item, ItemDraft, ItemPatch};
use crate::validation::{validate_item_draft, validate_item_name, validate_rate};

// =============================================================================
// Default Items
// =============================================================================

/// Starter list for a new store: `(name, unit, store_rate, purchase_rate)`.
const DEFAULT_ITEMS: &[(&str, &str, f64, f64)] = &[
    ("PALM.OIL(1KG)", "BOX", 1200.0, 1110.0),
    ("PATTAI-1", "KG", 1400.0, 450.0),
    ("PATTAI-2", "KG", 510.0, 260.0),
    ("ELLACHI", "KG", 3200.0, 2600.0),
    ("KRAMBU", "KG", 1200.0, 850.0),
    ("AJINOMOTO", "KG", 180.0, 138.0),
    ("VELLEM", "KG", 70.0, 65.0),
    ("CHILLI-POW-50GM-S", "KG", 240.0, 225.0),
    ("CHICKEN-POW-50GM-S", "KG", 330.0, 285.0),
    ("MUTTON-POW-50GM-S", "KG", 430.0, 385.0),
    ("PULLI", "KG", 185.0, 175.0),
    ("WHITE.ELLU", "KG", 300.0, 200.0),
    ("KADUGU", "KG", 120.0, 100.0),
    ("JEERAM", "KG", 360.0, 300.0),
    ("VENTHAIYAM", "KG", 110.0, 75.0),
    ("MILAGU", "KG", 840.0, 740.0),
    ("MYSORE PARUPPU", "KG", 100.0, 0.0),
    ("SIRU PARUPPU", "KG", 125.0, 0.0),
    ("THOORAM PARUPPU", "KG", 120.0, 0.0),
    ("APPALAM", "PACKET", 50.0, 0.0),
    ("TIGER KESARI", "BAG", 380.0, 0.0),
    ("MEAL MAKER", "KG", 110.0, 0.0),
    ("VINEGAR", "BOX (12)", 25.0, 20.0),
    ("ROCK SALT", "KG", 17.0, 14.0),
    ("VERKADALAI", "KG", 150.0, 134.0),
    ("TURMERIC POWDER", "KG", 270.0, 233.0),
    ("GARAM MASALA", "KG", 0.0, 0.0),
];

/// The starter catalog as drafts, in display order.
pub fn default_drafts() -> Vec<ItemDraft> {
    DEFAULT_ITEMS
        .iter()
        .map(|(name, unit, store_rate, purchase_rate)| {
            ItemDraft::new(name, unit, *store_rate, *purchase_rate)
        })
        .collect()
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered item collection. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Catalog { items }
    }

    pub fn list(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Like [`Catalog::get`], but absence is an error.
    pub fn require(&self, id: u64) -> CoreResult<&Item> {
        self.get(id).ok_or(CoreError::ItemNotFound(id))
    }

    fn next_id(&self) -> u64 {
        self.items.iter().map(|item| item.id).max().unwrap_or(0) + 1
    }

    /// Validates and appends a new item, returning it with its assigned id.
    pub fn add(&mut self, draft: ItemDraft) -> CoreResult<Item> {
        validate_item_draft(&draft)?;

        let item = Item::from_draft(self.next_id(), draft);
        self.items.push(item.clone());
        Ok(item)
    }

    /// Applies a partial update.
    ///
    /// The patch is validated against a working copy; on any error the
    /// stored item is left exactly as it was.
    pub fn update(&mut self, id: u64, patch: ItemPatch) -> CoreResult<Item> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CoreError::ItemNotFound(id))?;

        let mut working = self.items[position].clone();

        if let Some(name) = patch.name {
            validate_item_name(&name)?;
            working.name = name.trim().to_string();
        }
        if let Some(unit) = patch.unit {
            working.unit = unit.trim().to_string();
        }
        if let Some(rate) = patch.store_rate {
            validate_rate("storeRate", rate)?;
            working.store_rate = rate;
        }
        if let Some(rate) = patch.purchase_rate {
            validate_rate("purchaseRate", rate)?;
            working.purchase_rate = rate;
        }
        if let Some(image_url) = patch.image_url {
            working.image_url = image_url.filter(|url| !url.trim().is_empty());
        }
        working.refresh_margin();

        self.items[position] = working.clone();
        Ok(working)
    }

    /// Removes an item. Removing an absent id is a no-op and returns `None`.
    pub fn remove(&mut self, id: u64) -> Option<Item> {
        let position = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(position))
    }

    /// Replaces the whole catalog with `drafts`, numbered from 1.
    ///
    /// All drafts are validated before anything is replaced.
    pub fn seed(&mut self, drafts: Vec<ItemDraft>) -> CoreResult<()> {
        for draft in &drafts {
            validate_item_draft(draft)?;
        }

        self.items = drafts
            .into_iter()
            .zip(1u64..)
            .map(|(draft, id)| Item::from_draft(id, draft))
            .collect();
        Ok(())
    }

    /// Applies externally produced purchase-rate corrections keyed by item name.
    ///
    /// A rate is taken only when it is finite, positive and different from
    /// the current one. Returns the number of items changed.
    pub fn apply_purchase_rates(&mut self, rates: &HashMap<String, f64>) -> usize {
        let mut updated = 0;

        for item in &mut self.items {
            let Some(&rate) = rates.get(&item.name) else {
                continue;
            };
            if rate.is_finite() && rate > 0.0 && rate != item.purchase_rate {
                item.purchase_rate = rate;
                item.refresh_margin();
                updated += 1;
            }
        }

        updated
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn catalog_with(names: &[&str]) -> Catalog {
        let mut catalog = Catalog::new();
        for name in names {
            catalog.add(ItemDraft::new(name, "KG", 100.0, 80.0)).unwrap();
        }
        catalog
    }

    #[test]
    fn test_add_assigns_max_plus_one() {
        let mut catalog = catalog_with(&["A", "B", "C"]);
        catalog.remove(2);

        let item = catalog.add(ItemDraft::new("D", "KG", 10.0, 5.0)).unwrap();
        assert_eq!(item.id, 4);
        assert_eq!(item.profit_margin, 5.0);
    }

    #[test]
    fn test_add_rejects_invalid_draft() {
        let mut catalog = Catalog::new();
        let err = catalog.add(ItemDraft::new(" ", "KG", 10.0, 5.0)).unwrap_err();
        assert_eq!(err, CoreError::Validation(ValidationError::required("name")));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_update_recomputes_margin() {
        let mut catalog = catalog_with(&["RICE"]);
        let patch = ItemPatch {
            store_rate: Some(120.0),
            ..Default::default()
        };

        let item = catalog.update(1, patch).unwrap();
        assert_eq!(item.store_rate, 120.0);
        assert_eq!(item.profit_margin, 40.0);
        assert_eq!(catalog.get(1).unwrap().profit_margin, 40.0);
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut catalog = catalog_with(&["RICE"]);
        let before = catalog.clone();
        let patch = ItemPatch {
            name: Some("BASMATI".to_string()),
            purchase_rate: Some(-5.0),
            ..Default::default()
        };

        assert!(catalog.update(1, patch).is_err());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_update_missing_item() {
        let mut catalog = Catalog::new();
        assert_eq!(
            catalog.update(9, ItemPatch::default()),
            Err(CoreError::ItemNotFound(9))
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut catalog = catalog_with(&["RICE"]);
        assert!(catalog.remove(1).is_some());
        assert!(catalog.remove(1).is_none());
    }

    #[test]
    fn test_seed_defaults() {
        let mut catalog = catalog_with(&["OLD"]);
        catalog.seed(default_drafts()).unwrap();

        assert_eq!(catalog.len(), 27);
        let first = catalog.get(1).unwrap();
        assert_eq!(first.name, "PALM.OIL(1KG)");
        assert_eq!(first.profit_margin, 90.0);
        assert_eq!(catalog.get(27).unwrap().name, "GARAM MASALA");
    }

    #[test]
    fn test_apply_purchase_rates() {
        let mut catalog = Catalog::new();
        catalog.seed(default_drafts()).unwrap();

        let mut rates = HashMap::new();
        rates.insert("VELLEM".to_string(), 62.0);
        rates.insert("KRAMBU".to_string(), 850.0); // unchanged
        rates.insert("JEERAM".to_string(), 0.0); // not positive
        rates.insert("UNKNOWN".to_string(), 10.0);

        assert_eq!(catalog.apply_purchase_rates(&rates), 1);
        let vellem = catalog.list().iter().find(|i| i.name == "VELLEM").unwrap();
        assert_eq!(vellem.purchase_rate, 62.0);
        assert_eq!(vellem.profit_margin, 8.0);
    }

    #[test]
    fn test_serializes_as_array() {
        let catalog = catalog_with(&["RICE"]);
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "RICE");
    }
}
