use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::UserEmail;

const RESET_SUBJECT: &str = "Your UnitedMess password reset code";

// Client for the transactional email provider (Postmark style `/email` api)
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: UserEmail,
    authorization_token: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: UserEmail,
        authorization_token: SecretString,
        timeout: u64,
    ) -> Result<EmailClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        })
    }

    /// Mails a password reset code. The code only travels in the message
    /// bodies, it is skipped from the span.
    #[tracing::instrument(
        "Mailing password reset code",
        skip(self, code)
    )]
    pub async fn send_reset_code(
        &self,
        recipient: &UserEmail,
        code: &str,
        expiry_minutes: i64,
    ) -> Result<(), reqwest::Error> {
        let html_body = format!(
            "<p>Your password reset code is <strong>{}</strong>.</p>\
            <p>It expires in {} minutes. Ignore this mail if you did not ask for it.</p>",
            code, expiry_minutes
        );
        let text_body = format!(
            "Your password reset code is {}. It expires in {} minutes. \
            Ignore this mail if you did not ask for it.",
            code, expiry_minutes
        );

        self.send_email(recipient, RESET_SUBJECT, &html_body, &text_body).await
    }

    async fn send_email(
        &self,
        recipient: &UserEmail,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), reqwest::Error> {
        let request_body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            subject,
            html_body,
            text_body,
        };

        self.http_client
            .post(format!("{}/email", self.base_url))
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
