//! The intake pipeline orchestrator.
//!
//! [`IntakeService`] sequences the full lifecycle of an application:
//!
//! - **Submit**: validate -> duplicate guard -> timestamp and create ->
//!   respond -> detached notification.
//! - **Withdraw**: parse id -> fetch -> delete -> respond -> detached
//!   notification (rendered from the pre-delete field values).
//!
//! Any failure halts the sequence at that stage and maps to the error
//! taxonomy; a notification outcome never revises the already-determined
//! response. Store failures are logged here with full context before being
//! surfaced as a generic internal error.
//!
//! The duplicate guard's query and the subsequent create are not atomic.
//! The in-memory adapter additionally enforces uniqueness inside create;
//! for backends without that support the guard is the only enforcement and
//! two racing submissions can both land (an acknowledged gap, not silently
//! papered over).

use crate::server::config::ServerConfig;
use crate::server::mail::{EmailService, NotificationKind, Recipient};
use crate::server::store::DocumentStore;
use chrono::Utc;
use intake_core::{ApplicationId, ApplicationRecord, Error, Result, validate};
use serde_json::Value;
use std::sync::Arc;

/// Advisory string attached to responses when the email capability is
/// unavailable.
const EMAIL_DISABLED_ADVISORY: &str = "Email service is currently down, no confirmation email \
     sent, please contact support and remember your application id!";

/// Outcome of a successful submit or withdraw, as surfaced to the client.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub application_id: ApplicationId,
    /// Advisory only: describes the notification attempt, never a delivery
    /// guarantee.
    pub email_sent: String,
}

/// Orchestrator owning the full lifecycle of application records.
///
/// Cheap to clone: clones share the store handle and the email service.
#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn DocumentStore>,
    email: EmailService,
    config: Arc<ServerConfig>,
}

impl IntakeService {
    pub fn new(store: Arc<dyn DocumentStore>, email: EmailService, config: Arc<ServerConfig>) -> Self {
        Self { store, email, config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn email_enabled(&self) -> bool {
        self.email.is_enabled()
    }

    /// Runs the submission pipeline over a raw JSON payload.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] with the complete violation list.
    /// - [`Error::EmailAlreadyExists`] when a live record holds the email.
    /// - [`Error::Store`] on any store failure.
    pub async fn submit(&self, payload: &Value) -> Result<Outcome> {
        let new = validate(payload, self.config.min_year, self.config.max_year)
            .map_err(|details| Error::InvalidRequest { details })?;

        // Duplicate guard: read-only pre-check on the uniqueness key.
        let existing = self
            .store
            .query_by_field(&self.config.collection, "email", &new.email)
            .await
            .inspect_err(|e| tracing::error!("duplicate guard query failed: {e}"))?;
        if !existing.is_empty() {
            return Err(Error::EmailAlreadyExists);
        }

        let record = ApplicationRecord::stamped(new, Utc::now());
        let key = self
            .store
            .create(&self.config.collection, &record)
            .await
            .inspect_err(|e| tracing::error!("store create failed: {e}"))?;
        let application_id = ApplicationId::from_key(&key);

        tracing::info!(%application_id, "application submitted");

        let email_sent = self.advisory(&record.email);
        self.dispatch_notification(NotificationKind::Submitted, &record, application_id.clone());

        Ok(Outcome {
            application_id,
            email_sent,
        })
    }

    /// Runs the withdrawal pipeline for a client-supplied external id.
    ///
    /// The id is parsed before any store access, so a malformed id is a
    /// validation failure, not a not-found.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidApplicationId`] for a malformed external id.
    /// - [`Error::ApplicationNotFound`] when no live record has this id.
    /// - [`Error::Store`] on any store failure.
    pub async fn withdraw(&self, external_id: &str) -> Result<Outcome> {
        let application_id = ApplicationId::parse(external_id)?;

        let record = self
            .store
            .get(&self.config.collection, application_id.key())
            .await
            .inspect_err(|e| tracing::error!("store get failed: {e}"))?
            .ok_or(Error::ApplicationNotFound)?;

        self.store
            .delete(&self.config.collection, application_id.key())
            .await
            .inspect_err(|e| tracing::error!("store delete failed: {e}"))?;

        tracing::info!(%application_id, "application withdrawn");

        let email_sent = self.advisory(&record.email);
        self.dispatch_notification(NotificationKind::Withdrawn, &record, application_id.clone());

        Ok(Outcome {
            application_id,
            email_sent,
        })
    }

    /// Shapes the advisory `email_sent` message from the capability state,
    /// before the detached dispatch completes.
    fn advisory(&self, email: &str) -> String {
        if self.email.is_enabled() {
            format!("Confirmation email sent to {email}")
        } else {
            EMAIL_DISABLED_ADVISORY.to_string()
        }
    }

    /// Fires the notification off the response path. The spawned task's
    /// outcome is only logged; on shutdown it is simply dropped.
    fn dispatch_notification(
        &self,
        kind: NotificationKind,
        record: &ApplicationRecord,
        application_id: ApplicationId,
    ) {
        let email = self.email.clone();
        let recipient = Recipient {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
        };

        tokio::spawn(async move {
            match email.notify(kind, &recipient, application_id.as_str()).await {
                Ok(()) => {
                    tracing::info!(to = %recipient.email, ?kind, "notification email sent");
                }
                Err(e) => {
                    tracing::warn!(to = %recipient.email, ?kind, "notification email failed: {e}");
                }
            }
        });
    }
}
