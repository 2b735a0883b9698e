use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::domain::types::{BuildId, BuildName};

/// Rejections raised while editing a [`BuildState`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildStateError {
    /// The product belongs to a different slot than the one requested.
    #[error("product of category {product} cannot be placed in the {slot} slot")]
    CategoryMismatch { slot: Category, product: Category },
}

/// One optional product per category.
///
/// A filled slot always holds a product whose `category` equals the slot.
/// [`BuildState::set`] enforces this; [`BuildState::reconcile`] restores it
/// for data that bypassed `set` (deserialized blobs).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildState {
    #[serde(default)]
    cpu: Option<Product>,
    #[serde(default)]
    motherboard: Option<Product>,
    #[serde(default)]
    ram: Option<Product>,
    #[serde(default)]
    gpu: Option<Product>,
    #[serde(default)]
    storage: Option<Product>,
    #[serde(default)]
    psu: Option<Product>,
    #[serde(default)]
    case: Option<Product>,
}

impl BuildState {
    /// A build with every slot empty.
    pub fn empty() -> Self {
        Self::default()
    }

    fn slot(&self, category: Category) -> &Option<Product> {
        match category {
            Category::Cpu => &self.cpu,
            Category::Motherboard => &self.motherboard,
            Category::Ram => &self.ram,
            Category::Gpu => &self.gpu,
            Category::Storage => &self.storage,
            Category::Psu => &self.psu,
            Category::Case => &self.case,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<Product> {
        match category {
            Category::Cpu => &mut self.cpu,
            Category::Motherboard => &mut self.motherboard,
            Category::Ram => &mut self.ram,
            Category::Gpu => &mut self.gpu,
            Category::Storage => &mut self.storage,
            Category::Psu => &mut self.psu,
            Category::Case => &mut self.case,
        }
    }

    /// Product currently selected for `category`.
    pub fn get(&self, category: Category) -> Option<&Product> {
        self.slot(category).as_ref()
    }

    /// Place `product` into the `category` slot, returning what it replaced.
    pub fn set(
        &mut self,
        category: Category,
        product: Product,
    ) -> Result<Option<Product>, BuildStateError> {
        if product.category != category {
            return Err(BuildStateError::CategoryMismatch {
                slot: category,
                product: product.category,
            });
        }
        Ok(self.slot_mut(category).replace(product))
    }

    /// Empty the `category` slot, returning the removed product.
    pub fn clear(&mut self, category: Category) -> Option<Product> {
        self.slot_mut(category).take()
    }

    /// Filled slots in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Product)> + '_ {
        Category::ALL
            .into_iter()
            .filter_map(move |category| self.get(category).map(|product| (category, product)))
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every slot whose product belongs to another category.
    ///
    /// Returns the categories that were cleared.
    pub fn reconcile(&mut self) -> Vec<Category> {
        let mut cleared = Vec::new();
        for category in Category::ALL {
            let slot = self.slot_mut(category);
            if slot.as_ref().is_some_and(|p| p.category != category) {
                *slot = None;
                cleared.push(category);
            }
        }
        cleared
    }
}

/// A named, timestamped build owned by the build repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedBuild {
    pub id: BuildId,
    pub name: BuildName,
    pub build: BuildState,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl SavedBuild {
    /// A fresh, empty build stamped with `now`.
    pub fn new(name: BuildName, now: DateTime<Utc>) -> Self {
        Self {
            id: BuildId::generate(),
            name,
            build: BuildState::empty(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test::{sample_product, timestamp};

    #[test]
    fn set_rejects_products_from_other_categories() {
        let mut build = BuildState::empty();
        let err = build
            .set(Category::Gpu, sample_product(1, Category::Cpu))
            .unwrap_err();

        assert_eq!(
            err,
            BuildStateError::CategoryMismatch {
                slot: Category::Gpu,
                product: Category::Cpu,
            }
        );
        assert!(build.is_empty());
    }

    #[test]
    fn set_returns_replaced_product() {
        let mut build = BuildState::empty();
        assert_eq!(
            build.set(Category::Ram, sample_product(1, Category::Ram)),
            Ok(None)
        );
        let replaced = build
            .set(Category::Ram, sample_product(2, Category::Ram))
            .unwrap();

        assert_eq!(replaced.and_then(|p| p.id.as_number()), Some(1));
        assert_eq!(build.get(Category::Ram).and_then(|p| p.id.as_number()), Some(2));
        assert_eq!(build.len(), 1);
    }

    #[test]
    fn iterates_filled_slots_in_category_order() {
        let mut build = BuildState::empty();
        build.set(Category::Case, sample_product(7, Category::Case)).unwrap();
        build.set(Category::Cpu, sample_product(1, Category::Cpu)).unwrap();

        let order: Vec<Category> = build.iter().map(|(category, _)| category).collect();
        assert_eq!(order, vec![Category::Cpu, Category::Case]);
    }

    #[test]
    fn serializes_every_slot_with_nulls() {
        let value = serde_json::to_value(BuildState::empty()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 7);
        assert!(object.values().all(serde_json::Value::is_null));
    }

    #[test]
    fn reconcile_clears_mismatched_slots() {
        let mut value = serde_json::to_value(BuildState::empty()).unwrap();
        value["gpu"] = serde_json::to_value(sample_product(3, Category::Psu)).unwrap();
        value["psu"] = serde_json::to_value(sample_product(4, Category::Psu)).unwrap();
        let mut build: BuildState = serde_json::from_value(value).unwrap();

        assert_eq!(build.reconcile(), vec![Category::Gpu]);
        assert!(build.get(Category::Gpu).is_none());
        assert!(build.get(Category::Psu).is_some());
    }

    #[test]
    fn saved_build_uses_epoch_milliseconds() {
        let saved = SavedBuild::new(BuildName::new("Rig").unwrap(), timestamp(1_700_000_000_123));
        let value = serde_json::to_value(&saved).unwrap();

        assert_eq!(value["createdAt"], serde_json::json!(1_700_000_000_123_i64));
        assert_eq!(value["updatedAt"], value["createdAt"]);
        assert_eq!(value["id"], serde_json::json!(saved.id.to_string()));
    }
}
