//! HTML bodies for lifecycle notification emails.
//!
//! Plain `format!` templates, inlined styles only. Both templates repeat the
//! application id prominently because clients need it for any later
//! withdrawal.

use chrono::Utc;

/// Confirmation body for a received submission.
pub fn submission_html(
    program_name: &str,
    first_name: &str,
    last_name: &str,
    application_id: &str,
) -> String {
    let date = Utc::now().format("%B %-d, %Y");
    format!(
        r#"
    <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
      <div style="background: #c5050c; color: white; padding: 20px; text-align: center; border-radius: 8px 8px 0 0;">
        <h1 style="margin: 0;">Thank you for applying!</h1>
      </div>

      <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 8px 8px;">
        <h2 style="color: #333; margin-top: 0;">Hi {first_name}!</h2>

        <p style="color: #666; font-size: 16px; line-height: 1.6;">
          Thank you for applying to {program_name}. We've successfully received your application!
        </p>

        <div style="background: white; padding: 20px; border-radius: 6px; border-left: 4px solid #c5050c; margin: 20px 0;">
          <h3 style="color: #333; margin-top: 0;">Your Application Details</h3>
          <p style="margin: 5px 0;"><strong>Name:</strong> {first_name} {last_name}</p>
          <p style="margin: 5px 0;"><strong>Application ID:</strong> <code style="background: #f0f0f0; padding: 2px 6px; border-radius: 3px;">{application_id}</code></p>
          <p style="margin: 5px 0;"><strong>Submitted:</strong> {date}</p>
        </div>

        <div style="background: #e8f4fd; padding: 15px; border-radius: 6px; margin: 20px 0;">
          <h4 style="color: #0366d6; margin-top: 0;">Next Steps</h4>
          <ol style="color: #666; padding-left: 20px;">
            <li>Our team will review your application</li>
            <li>You'll hear back from us within the next week</li>
            <li>Keep an eye on your email for updates</li>
          </ol>
        </div>

        <div style="background: #fff3cd; padding: 15px; border-radius: 6px; margin: 20px 0;">
          <h4 style="color: #856404; margin-top: 0;">Important</h4>
          <p style="color: #856404; margin: 0;">
            Save your Application ID: <strong>{application_id}</strong><br>
            You'll need it for any future correspondence, including withdrawing your application.
          </p>
        </div>
      </div>
    </div>
  "#
    )
}

/// Confirmation body for a withdrawn application.
pub fn withdrawal_html(
    program_name: &str,
    first_name: &str,
    last_name: &str,
    application_id: &str,
) -> String {
    let date = Utc::now().format("%B %-d, %Y");
    format!(
        r#"
    <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
      <div style="background: #dc3545; color: white; padding: 20px; text-align: center; border-radius: 8px 8px 0 0;">
        <h1 style="margin: 0;">Application Withdrawn</h1>
      </div>

      <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 8px 8px;">
        <h2 style="color: #333; margin-top: 0;">Hi {first_name},</h2>

        <p style="color: #666; font-size: 16px; line-height: 1.6;">
          Your application to {program_name} has been successfully withdrawn.
        </p>

        <div style="background: white; padding: 20px; border-radius: 6px; border-left: 4px solid #dc3545; margin: 20px 0;">
          <h3 style="color: #333; margin-top: 0;">Withdrawal Details</h3>
          <p style="margin: 5px 0;"><strong>Name:</strong> {first_name} {last_name}</p>
          <p style="margin: 5px 0;"><strong>Application ID:</strong> <code style="background: #f0f0f0; padding: 2px 6px; border-radius: 3px;">{application_id}</code></p>
          <p style="margin: 5px 0;"><strong>Withdrawn:</strong> {date}</p>
        </div>

        <p style="color: #666; font-size: 14px; margin-top: 30px;">
          Thanks for your interest. We hope to hear from you again soon!
        </p>
      </div>
    </div>
  "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_body_carries_name_and_id() {
        let html = submission_html("the cohort program", "Ada", "Lovelace", "app_abc123");
        assert!(html.contains("Hi Ada!"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("app_abc123"));
        assert!(html.contains("the cohort program"));
    }

    #[test]
    fn withdrawal_body_carries_name_and_id() {
        let html = withdrawal_html("the cohort program", "Ada", "Lovelace", "app_abc123");
        assert!(html.contains("Hi Ada,"));
        assert!(html.contains("app_abc123"));
        assert!(html.contains("successfully withdrawn"));
    }
}
