//! Notification dispatcher for application lifecycle emails.
//!
//! [`EmailService`] composes an HTML message for a lifecycle event and
//! submits it through a [`MailTransport`]. The service is constructed once
//! at startup: with credentials it wraps the real transport, without them it
//! is disabled and every `notify` call short-circuits to a not-configured
//! failure without contacting any provider. [`EmailService::is_enabled`]
//! lets the pipeline shape its advisory response message before dispatch
//! completes.
//!
//! Delivery is best-effort. The pipeline never awaits a notification on the
//! response path and the outcome is only ever logged.

pub mod sendgrid;
pub mod templates;

pub use sendgrid::SendGridTransport;

use std::sync::Arc;

/// A notification failure. Advisory only: never converted into a request
/// failure.
#[derive(Clone, thiserror::Error, Debug)]
#[error("{0}")]
pub struct MailError(pub String);

/// Which lifecycle event a notification reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Submitted,
    Withdrawn,
}

/// The recipient fields a notification is rendered from.
#[derive(Clone, Debug)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Narrow interface over the external email capability.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

/// Template-selecting, transport-agnostic notification sender.
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<dyn MailTransport>>,
    program_name: String,
}

impl EmailService {
    /// An enabled service backed by `transport`.
    pub fn new(transport: Arc<dyn MailTransport>, program_name: String) -> Self {
        Self {
            transport: Some(transport),
            program_name,
        }
    }

    /// A disabled service: `notify` short-circuits without provider
    /// contact.
    pub fn disabled(program_name: String) -> Self {
        Self {
            transport: None,
            program_name,
        }
    }

    /// Whether the email capability was successfully initialized.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Renders and submits the notification for `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] when the service is disabled or the
    /// transport reports a failure. Callers log this; it never reaches a
    /// client.
    pub async fn notify(
        &self,
        kind: NotificationKind,
        recipient: &Recipient,
        application_id: &str,
    ) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            return Err(MailError("email transport not configured".to_string()));
        };

        let (subject, html) = match kind {
            NotificationKind::Submitted => (
                format!("Thank you for applying to {} - Application Received!", self.program_name),
                templates::submission_html(
                    &self.program_name,
                    &recipient.first_name,
                    &recipient.last_name,
                    application_id,
                ),
            ),
            NotificationKind::Withdrawn => (
                format!("{} Application Withdrawn", self.program_name),
                templates::withdrawal_html(
                    &self.program_name,
                    &recipient.first_name,
                    &recipient.last_name,
                    application_id,
                ),
            ),
        };

        transport.send(&recipient.email, &subject, &html).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), MailError> {
            self.sent.lock().push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    fn recipient() -> Recipient {
        Recipient {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn disabled_service_short_circuits() {
        let service = EmailService::disabled("the cohort program".to_string());
        assert!(!service.is_enabled());

        let err = service
            .notify(NotificationKind::Submitted, &recipient(), "app_x")
            .await
            .unwrap_err();
        assert!(err.0.contains("not configured"));
    }

    #[tokio::test]
    async fn enabled_service_selects_subject_by_kind() {
        let transport = Arc::new(RecordingTransport::default());
        let service = EmailService::new(transport.clone(), "the cohort program".to_string());
        assert!(service.is_enabled());

        service
            .notify(NotificationKind::Submitted, &recipient(), "app_x")
            .await
            .unwrap();
        service
            .notify(NotificationKind::Withdrawn, &recipient(), "app_x")
            .await
            .unwrap();

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "ada@example.com");
        assert!(sent[0].1.contains("Application Received"));
        assert!(sent[1].1.contains("Withdrawn"));
    }
}
