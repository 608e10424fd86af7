use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockia_core::{CategoryId, Entity, ProductId};

use crate::category::CategoryRef;

/// A product as held in the client cache.
///
/// Decoding is lenient in the ways the backend actually varies: a missing or
/// null `currentStock`/`minStock` reads as 0, a missing `isAvailable` as
/// `true`, and the supplier may arrive as `supplier.name` or `supplierName`.
/// The `id` must be a UUID; numeric ids are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProductRecord")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Option<CategoryRef>,
    pub price: Decimal,
    pub current_stock: u32,
    pub min_stock: u32,
    pub supplier_name: Option<String>,
    pub photo_url: Option<String>,
    pub is_available: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
            price: Decimal::ZERO,
            current_stock: 0,
            min_stock: 0,
            supplier_name: None,
            photo_url: None,
            is_available: true,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.as_ref().and_then(|c| c.id)
    }

    /// At or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    name: String,
    #[serde(default)]
    category: Option<CategoryRef>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    current_stock: Option<u32>,
    #[serde(default)]
    min_stock: Option<u32>,
    #[serde(default)]
    supplier: Option<SupplierName>,
    #[serde(default)]
    supplier_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    is_available: Option<bool>,
    #[serde(default)]
    created_at: Option<NaiveDateTime>,
    #[serde(default)]
    updated_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
struct SupplierName {
    #[serde(default)]
    name: Option<String>,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        let supplier_name = r
            .supplier_name
            .or_else(|| r.supplier.and_then(|s| s.name))
            .filter(|s| !s.trim().is_empty());

        Self {
            id: r.id,
            name: r.name,
            category: r.category,
            price: r.price.unwrap_or_default(),
            current_stock: r.current_stock.unwrap_or(0),
            min_stock: r.min_stock.unwrap_or(0),
            supplier_name,
            photo_url: r.photo_url.filter(|s| !s.is_empty()),
            is_available: r.is_available.unwrap_or(true),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Partial update, sent as the body of `PUT /api/products/{id}`.
///
/// Only the fields that are `Some` are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl ProductPatch {
    pub fn stock(current_stock: u32) -> Self {
        Self {
            current_stock: Some(current_stock),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a cached product.
    ///
    /// Moving to another category keeps only its id; the name is filled in
    /// by the next fetch.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(id) = self.category_id {
            if product.category_id() != Some(id) {
                product.category = Some(CategoryRef {
                    id: Some(id),
                    name: String::new(),
                });
            }
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(url) = &self.photo_url {
            product.photo_url = Some(url.clone()).filter(|s| !s.is_empty());
        }
        if let Some(stock) = self.current_stock {
            product.current_stock = stock;
        }
        if let Some(min) = self.min_stock {
            product.min_stock = min;
        }
        if let Some(available) = self.is_available {
            product.is_available = available;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Product {
        let mut p = Product::new(ProductId::new(), "Yerba 1kg");
        p.price = Decimal::new(350000, 2);
        p.current_stock = 12;
        p.min_stock = 5;
        p
    }

    #[test]
    fn decodes_backend_product_response() {
        let id = ProductId::new();
        let category = CategoryId::new();
        let json = format!(
            r#"{{
                "id": "{id}",
                "name": "Yerba 1kg",
                "category": {{"id": "{category}", "name": "Almacen", "isActive": true, "productCount": 4}},
                "price": 3500.5,
                "photoUrl": "https://cdn.example.com/yerba.png",
                "currentStock": 12,
                "minStock": 5,
                "isAvailable": false,
                "createdAt": "2025-03-01T10:00:00",
                "updatedAt": null,
                "hasLowStock": false
            }}"#
        );
        let product: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product.id, id);
        assert_eq!(product.category_id(), Some(category));
        assert_eq!(product.price, Decimal::new(35005, 1));
        assert_eq!(product.current_stock, 12);
        assert_eq!(product.min_stock, 5);
        assert!(!product.is_available);
        assert!(product.created_at.is_some());
        assert_eq!(product.updated_at, None);
    }

    #[test]
    fn missing_stock_fields_decode_as_zero() {
        let id = ProductId::new();
        let json = format!(r#"{{"id":"{id}","name":"Sin stock","currentStock":null}}"#);
        let product: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product.current_stock, 0);
        assert_eq!(product.min_stock, 0);
        assert_eq!(product.price, Decimal::ZERO);
        assert!(product.is_available);
    }

    #[test]
    fn ids_must_be_uuids() {
        let numeric = r#"{"id":42,"name":"Legacy","currentStock":3}"#;
        assert!(serde_json::from_str::<Product>(numeric).is_err());
    }

    #[test]
    fn supplier_name_is_read_from_either_shape() {
        let id = ProductId::new();
        let nested = format!(r#"{{"id":"{id}","name":"A","supplier":{{"name":"Acme"}}}}"#);
        let flat = format!(r#"{{"id":"{id}","name":"A","supplierName":"Acme"}}"#);
        let blank = format!(r#"{{"id":"{id}","name":"A","supplierName":"  "}}"#);

        let nested: Product = serde_json::from_str(&nested).unwrap();
        let flat: Product = serde_json::from_str(&flat).unwrap();
        let blank: Product = serde_json::from_str(&blank).unwrap();
        assert_eq!(nested.supplier_name.as_deref(), Some("Acme"));
        assert_eq!(flat.supplier_name.as_deref(), Some("Acme"));
        assert_eq!(blank.supplier_name, None);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["currentStock"], 12);
        assert_eq!(value["minStock"], 5);
        assert_eq!(value["isAvailable"], true);
        assert_eq!(value["price"], 3500.0);
    }

    #[test]
    fn low_stock_includes_the_minimum() {
        let mut p = sample();
        assert!(!p.is_low_stock());
        p.current_stock = 5;
        assert!(p.is_low_stock());
        p.current_stock = 0;
        assert!(p.is_low_stock());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            name: Some("Nuevo".into()),
            current_stock: Some(3),
            ..ProductPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Nuevo", "currentStock": 3}));
        assert!(ProductPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_to_another_category_keeps_only_its_id() {
        let mut p = sample();
        p.category = Some(CategoryRef {
            id: Some(CategoryId::new()),
            name: "Almacen".into(),
        });
        let target = CategoryId::new();
        ProductPatch {
            category_id: Some(target),
            ..ProductPatch::default()
        }
        .apply_to(&mut p);
        assert_eq!(p.category_id(), Some(target));
        assert_eq!(p.category.as_ref().map(|c| c.name.as_str()), Some(""));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a stock-only patch changes the stock and nothing else.
        #[test]
        fn stock_patch_touches_only_stock(stock in any::<u32>()) {
            let original = sample();
            let mut patched = original.clone();
            ProductPatch::stock(stock).apply_to(&mut patched);
            prop_assert_eq!(patched.current_stock, stock);
            patched.current_stock = original.current_stock;
            prop_assert_eq!(patched, original);
        }
    }
}
