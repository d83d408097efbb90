//! Traits tying a validated draft to the record it becomes once stored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use pulse_core::{Entity, FieldErrors};

use crate::schema::{EntityKind, EntitySchema};
use crate::validate;

/// A validated, normalized create request.
pub trait Draft: DeserializeOwned + Sized {
    const SCHEMA: &'static EntitySchema;

    /// Run the validation layer over a raw body and deserialize the result.
    fn validate(input: &Value) -> Result<Self, FieldErrors> {
        let normalized = validate::check(Self::SCHEMA, input)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| FieldErrors::single(format!("\"value\" {e}")))
    }
}

/// A persisted record kind.
pub trait Document: Entity + Clone + Serialize + Send + Sync + 'static {
    type Draft: Draft + Send;

    const KIND: EntityKind;

    /// Build the record for a draft: fresh identifier, both timestamps = `now`.
    fn create(draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn schema() -> &'static EntitySchema {
        <Self::Draft as Draft>::SCHEMA
    }
}
