use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use pulse_core::{Entity, ProductId};

use crate::document::{Document, Draft};
use crate::schema::{EntityKind, EntitySchema, FieldKind, FieldRule, TextFormat, formatted, text};

pub const SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Product,
    fields: &[
        FieldRule::required("name", text(1, 100)),
        FieldRule::required("description", text(1, 500)),
        FieldRule::required("price", FieldKind::PositiveNumber),
        FieldRule::required("image", formatted(1, 2048, TextFormat::Uri)),
        FieldRule::required("category", text(1, 50)),
        FieldRule::required(
            "features",
            FieldKind::TextList {
                max_items: 10,
                max_item_len: 100,
            },
        ),
    ],
};

/// Validated product create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
    pub features: Vec<String>,
}

impl Draft for NewProduct {
    const SCHEMA: &'static EntitySchema = &SCHEMA;
}

/// Stored catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub image: String,
    pub category: String,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whole prices go out as integers (`2999`, not `2999.0`).
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // 2^53, the last integer every f64 below it represents exactly.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if price.fract() == 0.0 && price.abs() <= MAX_EXACT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Document for Product {
    type Draft = NewProduct;

    const KIND: EntityKind = EntityKind::Product;

    fn create(draft: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::new(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            image: draft.image,
            category: draft.category,
            features: draft.features,
            created_at: now,
            updated_at: now,
        }
    }
}
