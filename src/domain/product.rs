use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{ImageUrl, Millimeters, ProductId, ProductName, ProductPrice, Wattage};

/// A catalog item that can occupy one slot of a build.
///
/// Products are immutable once loaded; builds hold their own copies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub price: ProductPrice,
    pub category: Category,
    pub image: ImageUrl,
    #[serde(default)]
    pub specs: ProductSpecs,
}

/// Category-dependent attributes of a product.
///
/// Fields read by the compatibility rules are typed; everything else the
/// catalog ships (cores, vram, capacity, ...) is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpecs {
    /// CPU and motherboard socket, e.g. `AM5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    /// RAM and motherboard memory generation, e.g. `DDR5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    /// Draw for consumers, capacity for power supplies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wattage: Option<Wattage>,
    /// Motherboard size or the largest board a case accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
    /// Graphics card length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Millimeters>,
    /// Longest graphics card a case accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gpu_length: Option<Millimeters>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProductSpecs {
    /// Render any attribute as text, looking up typed fields by their
    /// persisted (camelCase) key first.
    pub fn spec_value(&self, key: &str) -> Option<String> {
        match key {
            "socket" => self.socket.clone(),
            "memoryType" => self.memory_type.clone(),
            "formFactor" => self.form_factor.clone(),
            "wattage" => self.wattage.map(|w| w.to_string()),
            "length" => self.length.map(|l| l.to_string()),
            "maxGpuLength" => self.max_gpu_length.map(|l| l.to_string()),
            other => self.extra.get(other).map(|value| match value {
                serde_json::Value::String(text) => text.clone(),
                value => value.to_string(),
            }),
        }
    }
}

impl Product {
    /// Power drawn by this component, zero when the catalog omits it.
    pub fn wattage(&self) -> f64 {
        self.specs.wattage.map(Wattage::get).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_untyped_specs() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Intel Core i9-14900K",
            "price": 620,
            "category": "cpu",
            "image": "https://via.placeholder.com/150?text=Intel+i9",
            "specs": { "socket": "LGA1700", "wattage": 253, "cores": 24 }
        }))
        .unwrap();

        assert_eq!(product.specs.socket.as_deref(), Some("LGA1700"));
        assert_eq!(product.wattage(), 253.0);
        assert_eq!(product.specs.spec_value("cores").as_deref(), Some("24"));

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["specs"]["cores"], json!(24));
        assert!(value["specs"].get("memoryType").is_none());
    }

    #[test]
    fn missing_specs_default_to_empty() {
        let product: Product = serde_json::from_value(json!({
            "id": 9,
            "name": "Bare PSU",
            "price": 10,
            "category": "psu",
            "image": "https://example.com/psu.png"
        }))
        .unwrap();

        assert_eq!(product.specs, ProductSpecs::default());
        assert_eq!(product.wattage(), 0.0);
    }

    #[test]
    fn spec_value_renders_typed_fields() {
        let specs = ProductSpecs {
            memory_type: Some("DDR5".into()),
            max_gpu_length: Some(Millimeters::new(340.0).unwrap()),
            ..ProductSpecs::default()
        };

        assert_eq!(specs.spec_value("memoryType").as_deref(), Some("DDR5"));
        assert_eq!(specs.spec_value("maxGpuLength").as_deref(), Some("340"));
        assert_eq!(specs.spec_value("socket"), None);
    }
}
