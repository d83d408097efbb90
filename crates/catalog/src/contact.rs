use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pulse_core::{ContactId, DomainError, Email, Entity};

use crate::document::{Document, Draft};
use crate::schema::{EntityKind, EntitySchema, FieldKind, FieldRule, TextFormat, formatted, text};

pub const SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Contact,
    fields: &[
        FieldRule::required("name", text(1, 100)),
        FieldRule::required("email", formatted(1, 254, TextFormat::Email)),
        FieldRule::required("message", text(1, 1000)),
        FieldRule::stored_only(
            "status",
            FieldKind::Choice {
                options: ContactStatus::NAMES,
            },
            "pending",
        ),
    ],
};

/// Processing state of a submission.
///
/// Only `Pending` is ever assigned: no operation transitions a stored contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Pending,
    Read,
    Responded,
}

impl ContactStatus {
    pub const NAMES: &'static [&'static str] = &["pending", "read", "responded"];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::Read => "read",
            ContactStatus::Responded => "responded",
        }
    }
}

impl FromStr for ContactStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ContactStatus::Pending),
            "read" => Ok(ContactStatus::Read),
            "responded" => Ok(ContactStatus::Responded),
            other => Err(DomainError::invariant(format!("unknown contact status: {other}"))),
        }
    }
}

/// Validated contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: Email,
    pub message: String,
}

impl Draft for NewContact {
    const SCHEMA: &'static EntitySchema = &SCHEMA;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Contact {
    type Id = ContactId;

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

impl Document for Contact {
    type Draft = NewContact;

    const KIND: EntityKind = EntityKind::Contact;

    fn create(draft: NewContact, now: DateTime<Utc>) -> Self {
        Self {
            id: ContactId::new(),
            name: draft.name,
            email: draft.email,
            message: draft.message,
            status: ContactStatus::default(),
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
    fn new_submissions_are_pending() {
        let draft = NewContact::validate(&json!({
            "name": "Happy Hogan",
            "email": "Happy@Stark.com",
            "message": "Need a ride?"
        }))
        .unwrap();
        let contact = Contact::create(draft, Utc::now());

        assert_eq!(contact.status, ContactStatus::Pending);
        assert_eq!(contact.email.as_str(), "happy@stark.com");
    }

    #[test]
    fn identical_drafts_produce_distinct_records() {
        let draft = NewContact::validate(&json!({"name": "A", "email": "a@b.co", "message": "m"})).unwrap();
        let now = Utc::now();
        let first = Contact::create(draft.clone(), now);
        let second = Contact::create(draft, now);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn status_names_roundtrip() {
        for name in ContactStatus::NAMES {
            assert_eq!(name.parse::<ContactStatus>().unwrap().as_str(), *name);
        }
        assert!("archived".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ContactStatus::Responded).unwrap(), json!("responded"));
    }
}
