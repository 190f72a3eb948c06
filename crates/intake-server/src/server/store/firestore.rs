//! Google Firestore document-store adapter.
//!
//! Talks to the Firestore REST v1 API with a plain [`reqwest`] client:
//! document create (server-assigned id), point get, delete, and `runQuery`
//! with a single field-equality filter. Field values cross the wire in
//! Firestore's typed-value envelope (`stringValue`, `integerValue`,
//! `timestampValue`), which this module encodes and decodes for
//! [`ApplicationRecord`] documents.
//!
//! Authentication is a bearer token supplied through configuration; token
//! acquisition lives outside this service. Emulators accept requests
//! without one.

use super::DocumentStore;
use chrono::{DateTime, Utc};
use intake_core::{ApplicationRecord, Error, Result};
use serde_json::{Value, json};

/// [`DocumentStore`] backed by the Firestore REST v1 API.
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    token: Option<String>,
}

impl FirestoreStore {
    pub fn new(base_url: String, project_id: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            project_id,
            token,
        }
    }

    /// Root of the `(default)` database's document tree.
    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder, op: &str) -> Result<reqwest::Response> {
        builder.send().await.map_err(|e| Error::Store {
            context: format!("firestore: {op}: transport: {e}"),
        })
    }

    async fn read_json(response: reqwest::Response, op: &str) -> Result<Value> {
        response.json().await.map_err(|e| Error::Store {
            context: format!("firestore: {op}: decoding response body: {e}"),
        })
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn create(&self, collection: &str, record: &ApplicationRecord) -> Result<String> {
        let url = format!("{}/{collection}", self.documents_root());
        let body = json!({ "fields": encode_fields(record) });

        let response = self
            .send(self.request(reqwest::Method::POST, url).json(&body), "create")
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Store {
                context: format!("firestore: create returned {status}"),
            });
        }

        let doc = Self::read_json(response, "create").await?;
        let name = doc.get("name").and_then(Value::as_str).ok_or_else(|| Error::Store {
            context: "firestore: create response missing document name".to_string(),
        })?;
        Ok(key_from_name(name).to_string())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<ApplicationRecord>> {
        let url = format!("{}/{collection}/{key}", self.documents_root());

        let response = self
            .send(self.request(reqwest::Method::GET, url), "get")
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Store {
                context: format!("firestore: get returned {status}"),
            });
        }

        let doc = Self::read_json(response, "get").await?;
        decode_document(&doc).map(Some)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let url = format!("{}/{collection}/{key}", self.documents_root());

        let response = self
            .send(self.request(reqwest::Method::DELETE, url), "delete")
            .await?;
        let status = response.status();
        // Firestore deletes are idempotent: deleting a missing document
        // still returns success.
        if !status.is_success() {
            return Err(Error::Store {
                context: format!("firestore: delete returned {status}"),
            });
        }
        Ok(())
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<ApplicationRecord>> {
        let url = format!("{}:runQuery", self.documents_root());
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value },
                    }
                },
            }
        });

        let response = self
            .send(self.request(reqwest::Method::POST, url).json(&body), "runQuery")
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Store {
                context: format!("firestore: runQuery returned {status}"),
            });
        }

        // runQuery streams one JSON object per result; the aggregate JSON
        // body is an array where only some entries carry a `document`.
        let results = Self::read_json(response, "runQuery").await?;
        let entries = results.as_array().ok_or_else(|| Error::Store {
            context: "firestore: runQuery response is not an array".to_string(),
        })?;

        entries
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(decode_document)
            .collect()
    }
}

/// Encodes a record into Firestore's typed-value field map.
fn encode_fields(record: &ApplicationRecord) -> Value {
    json!({
        "firstName": { "stringValue": record.first_name },
        "lastName": { "stringValue": record.last_name },
        "email": { "stringValue": record.email },
        // Firestore represents 64-bit integers as decimal strings.
        "year": { "integerValue": record.year.to_string() },
        "createdAt": { "timestampValue": record.created_at.to_rfc3339() },
        "updatedAt": { "timestampValue": record.updated_at.to_rfc3339() },
    })
}

/// Decodes a Firestore document back into an [`ApplicationRecord`].
fn decode_document(doc: &Value) -> Result<ApplicationRecord> {
    let fields = doc.get("fields").ok_or_else(|| Error::Store {
        context: "firestore: document missing fields".to_string(),
    })?;

    Ok(ApplicationRecord {
        first_name: string_field(fields, "firstName")?,
        last_name: string_field(fields, "lastName")?,
        email: string_field(fields, "email")?,
        year: integer_field(fields, "year")?,
        created_at: timestamp_field(fields, "createdAt")?,
        updated_at: timestamp_field(fields, "updatedAt")?,
    })
}

fn string_field(fields: &Value, name: &str) -> Result<String> {
    fields
        .get(name)
        .and_then(|f| f.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::Store {
            context: format!("firestore: document missing string field `{name}`"),
        })
}

fn integer_field(fields: &Value, name: &str) -> Result<i32> {
    fields
        .get(name)
        .and_then(|f| f.get("integerValue"))
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| Error::Store {
            context: format!("firestore: document missing integer field `{name}`"),
        })
}

fn timestamp_field(fields: &Value, name: &str) -> Result<DateTime<Utc>> {
    let raw = fields
        .get(name)
        .and_then(|f| f.get("timestampValue"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Store {
            context: format!("firestore: document missing timestamp field `{name}`"),
        })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Store {
            context: format!("firestore: invalid timestamp in `{name}`: {e}"),
        })
}

/// Extracts the storage key from a fully qualified document name
/// (`projects/<p>/databases/(default)/documents/<collection>/<key>`).
fn key_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::NewApplication;

    fn record() -> ApplicationRecord {
        ApplicationRecord::stamped(
            NewApplication {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                year: 2026,
            },
            Utc::now(),
        )
    }

    #[test]
    fn typed_values_round_trip() {
        let record = record();
        let doc = json!({
            "name": "projects/demo/databases/(default)/documents/applications_f25/abc123",
            "fields": encode_fields(&record),
        });
        let decoded = decode_document(&doc).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn year_crosses_the_wire_as_a_decimal_string() {
        let fields = encode_fields(&record());
        assert_eq!(fields["year"]["integerValue"], "2026");
    }

    #[test]
    fn key_is_the_last_name_segment() {
        assert_eq!(
            key_from_name("projects/demo/databases/(default)/documents/applications_f25/abc123"),
            "abc123"
        );
        assert_eq!(key_from_name("abc123"), "abc123");
    }

    #[test]
    fn decode_rejects_documents_missing_fields() {
        let doc = json!({ "name": "x", "fields": { "firstName": { "stringValue": "Ada" } } });
        let err = decode_document(&doc).unwrap_err();
        assert_eq!(err.error_type(), "DATABASE_ERROR");
    }
}
