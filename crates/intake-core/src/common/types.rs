//! # Core application types
//!
//! The persisted document shape and its validated precursor. Field names
//! serialize in camelCase to match the wire format and the stored document
//! layout, so the duplicate guard can filter on the literal `email` field.

use chrono::{DateTime, Utc};

/// A validated submission that has not yet been persisted.
///
/// Produced only by the validation engine; timestamps and the storage key
/// are assigned later by the pipeline and the store respectively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub year: i32,
}

/// A live application document as persisted in the store.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub year: i32,
    /// Assigned by the pipeline at creation and immutable afterwards.
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` until the record is mutated. The canonical
    /// pipeline never mutates records, so the two stay equal for their
    /// whole lifetime.
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// Stamps a validated submission into its persisted shape.
    pub fn stamped(new: NewApplication, now: DateTime<Utc>) -> Self {
        Self {
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            year: new.year,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_camel_case() {
        let now = Utc::now();
        let record = ApplicationRecord::stamped(
            NewApplication {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                year: 2026,
            },
            now,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["lastName"], "Lovelace");
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["year"], 2026);
        assert!(value["createdAt"].is_string());
        assert_eq!(value["createdAt"], value["updatedAt"]);
    }
}
