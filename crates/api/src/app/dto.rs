use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use pulse_catalog::Contact;
use pulse_core::ContactId;
use pulse_infra::connection::ConnectionState;
use pulse_infra::seed::SeedOutcome;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, PartialEq)]
pub struct InitDataRequest {
    pub force: bool,
}

impl InitDataRequest {
    /// Only a literal JSON `true` forces a reseed; any other `force` value,
    /// or a body that is not an object, means a plain run.
    pub fn from_body(body: &Value) -> Self {
        Self {
            force: matches!(body.get("force"), Some(Value::Bool(true))),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since the process started serving.
    pub uptime: f64,
    pub persistence: ConnectionState,
}

/// Minimal acknowledgment returned for a contact submission.
#[derive(Debug, Serialize)]
pub struct ContactAck {
    pub message: &'static str,
    pub data: ContactAckData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAckData {
    pub id: ContactId,
    pub created_at: DateTime<Utc>,
}

impl From<&Contact> for ContactAck {
    fn from(contact: &Contact) -> Self {
        Self {
            message: "Message sent successfully",
            data: ContactAckData {
                id: contact.id,
                created_at: contact.created_at,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InitDataResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SeedCounts>,
}

#[derive(Debug, Serialize)]
pub struct SeedCounts {
    pub products: usize,
    pub faqs: usize,
}

impl From<SeedOutcome> for InitDataResponse {
    fn from(outcome: SeedOutcome) -> Self {
        match outcome {
            SeedOutcome::AlreadySeeded => Self {
                message: "Sample data already exists",
                data: None,
            },
            SeedOutcome::Seeded { products, faqs } => Self {
                message: "Sample data initialized successfully",
                data: Some(SeedCounts { products, faqs }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_boolean_true_forces_a_reseed() {
        assert!(InitDataRequest::from_body(&json!({"force": true})).force);
        for body in [
            json!({}),
            json!({"force": false}),
            json!({"force": "true"}),
            json!({"force": null}),
            json!({"force": 1}),
            json!([true]),
        ] {
            assert_eq!(InitDataRequest::from_body(&body), InitDataRequest::default());
        }
    }
}
