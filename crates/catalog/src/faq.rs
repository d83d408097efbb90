use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pulse_core::{Entity, FaqId};

use crate::document::{Document, Draft};
use crate::schema::{EntityKind, EntitySchema, FieldRule, text};

pub const DEFAULT_CATEGORY: &str = "general";

pub const SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Faq,
    fields: &[
        FieldRule::required("question", text(1, 200)),
        FieldRule::required("answer", text(1, 1000)),
        FieldRule::with_default("category", text(1, 50), DEFAULT_CATEGORY),
    ],
};

/// Validated FAQ create request (category already defaulted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub category: String,
}

impl Draft for NewFaq {
    const SCHEMA: &'static EntitySchema = &SCHEMA;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(rename = "_id")]
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Faq {
    type Id = FaqId;

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

impl Document for Faq {
    type Draft = NewFaq;

    const KIND: EntityKind = EntityKind::Faq;

    fn create(draft: NewFaq, now: DateTime<Utc>) -> Self {
        Self {
            id: FaqId::new(),
            question: draft.question,
            answer: draft.answer,
            category: draft.category,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_category_becomes_general() {
        let draft = NewFaq::validate(&json!({"question": "Does it fly?", "answer": "Yes."})).unwrap();
        assert_eq!(draft.category, DEFAULT_CATEGORY);

        let faq = Faq::create(draft, Utc::now());
        assert_eq!(faq.category, "general");
    }

    #[test]
    fn question_over_limit_is_rejected() {
        let errs = NewFaq::validate(&json!({"question": "q".repeat(201), "answer": "a"})).unwrap_err();
        assert_eq!(
            errs.as_slice(),
            ["\"question\" length must be less than or equal to 200 characters long"]
        );
    }
}
