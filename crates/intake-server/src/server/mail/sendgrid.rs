//! SendGrid mail transport.
//!
//! Submits messages through the SendGrid v3 `mail/send` endpoint with
//! bearer authentication. SendGrid acknowledges accepted messages with
//! `202 Accepted`; anything else is reported as a [`MailError`].

use super::{MailError, MailTransport};
use serde_json::json;

/// [`MailTransport`] backed by the SendGrid REST API.
pub struct SendGridTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl SendGridTransport {
    pub fn new(base_url: String, api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            from,
        }
    }
}

#[async_trait::async_trait]
impl MailTransport for SendGridTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError(format!("sendgrid: transport: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::ACCEPTED {
            return Err(MailError(format!("sendgrid: send returned {status}")));
        }
        Ok(())
    }
}
