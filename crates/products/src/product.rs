use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use catalog_core::{Entity, ProductId};

/// A catalog record.
///
/// `name`, `price` and `image` are payload: the catalog stores them as given and
/// never validates their content. `available` is the soft-delete marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Payload for creating a product. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Materialize the record a store writes for this payload.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image: self.image,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field patch for an existing product.
///
/// Only `Some` fields are written. `image: Some(None)` clears the image; in
/// JSON that is an explicit `"image": null`, while a missing key leaves it.
/// There is no way to express a change of `id` or `available` here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
}

/// Deserialize a field that is present in the input (possibly `null`) as `Some`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ProductPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(Some(image.into()));
        self
    }

    pub fn clear_image(mut self) -> Self {
        self.image = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.image.is_none()
    }

    /// Apply the patched fields to `product`, bumping `updated_at`.
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = &self.image {
            product.image = image.clone();
        }
        product.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        NewProduct::new("Widget", 9.99).into_product(ProductId::new(1), Utc::now())
    }

    #[test]
    fn new_products_start_available() {
        let p = widget();
        assert!(p.available);
        assert!(p.is_available());
        assert_eq!(p.created_at, p.updated_at);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut p = widget();
        let before = p.clone();

        ProductPatch::default().price(-1.0).apply(&mut p, Utc::now());

        assert_eq!(p.id, before.id);
        assert_eq!(p.available, before.available);
        assert_eq!(p.name, before.name);
        assert_eq!(p.image, before.image);
        assert_eq!(p.price, -1.0);
    }

    #[test]
    fn patch_leaves_removed_flag_alone() {
        let mut p = widget();
        p.available = false;

        ProductPatch::default().name("Gadget").apply(&mut p, Utc::now());

        assert!(!p.available);
        assert_eq!(p.name, "Gadget");
    }

    #[test]
    fn patch_ignores_unknown_fields_like_available() {
        let patch: ProductPatch =
            serde_json::from_value(serde_json::json!({ "price": 3.5, "available": false, "id": 99 }))
                .unwrap();
        assert_eq!(patch, ProductPatch::default().price(3.5));
    }

    #[test]
    fn null_image_clears_but_missing_image_keeps() {
        let mut p = widget();
        p.image = Some("a.png".into());

        let keep: ProductPatch = serde_json::from_value(serde_json::json!({ "name": "n" })).unwrap();
        assert_eq!(keep.image, None);
        keep.apply(&mut p, Utc::now());
        assert_eq!(p.image.as_deref(), Some("a.png"));

        let clear: ProductPatch = serde_json::from_value(serde_json::json!({ "image": null })).unwrap();
        assert_eq!(clear, ProductPatch::default().clear_image());
        assert!(!clear.is_empty());
        clear.apply(&mut p, Utc::now());
        assert_eq!(p.image, None);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(ProductPatch::default().is_empty());
        assert!(!ProductPatch::default().image("a.png").is_empty());
    }

    #[test]
    fn product_serializes_camel_case() {
        let json = serde_json::to_value(widget()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["available"], true);
        assert_eq!(json["id"], 1);
    }
}
