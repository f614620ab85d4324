use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::PhoneNumberDomain;

/// Client for the SMS verification provider. The provider generates,
/// delivers and checks the codes; nothing about them is stored locally.
pub struct SmsClient {
    http_client: Client,
    base_url: String,
    authorization_token: SecretString,
}

#[derive(Serialize)]
struct SendVerificationRequest<'a> {
    to: &'a str,
    channel: &'a str,
}

#[derive(Serialize)]
struct CheckVerificationRequest<'a> {
    to: &'a str,
    code: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct VerificationResponse {
    pub status: String,
}

impl SmsClient {
    pub fn new(
        base_url: String,
        authorization_token: SecretString,
        timeout: u64,
    ) -> Result<SmsClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            authorization_token,
        })
    }

    #[tracing::instrument(
        "Requesting SMS verification code",
        skip(self)
    )]
    pub async fn send_verification(&self, phone: &PhoneNumberDomain) -> Result<(), reqwest::Error> {
        let url = format!("{}/verifications", self.base_url);
        let phone = phone.inner();

        self.http_client
            .post(url)
            .bearer_auth(self.authorization_token.expose_secret())
            .json(&SendVerificationRequest { to: &phone, channel: "sms" })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    // true only when the provider reports the code as approved
    #[tracing::instrument(
        "Checking SMS verification code",
        skip(self, code)
    )]
    pub async fn check_verification(
        &self,
        phone: &PhoneNumberDomain,
        code: &str,
    ) -> Result<bool, reqwest::Error> {
        let url = format!("{}/verification-checks", self.base_url);
        let phone = phone.inner();

        let response: VerificationResponse = self.http_client
            .post(url)
            .bearer_auth(self.authorization_token.expose_secret())
            .json(&CheckVerificationRequest { to: &phone, code })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.status == "approved")
    }
}
