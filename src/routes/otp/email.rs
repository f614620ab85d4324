use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::{
    configuration::OtpSettings,
    db_interaction::{claim_otp_attempt, get_user_from_email, reset_user_password, set_user_otp},
    domain::{otp::{generate_otp, otp_expiry, otp_is_live}, UserEmail},
    email_client::EmailClient,
    error::{error_body, error_fmt_chain},
    models::User,
    password::{hash_password, validate_password, verify_password},
    utils::{get_pooled_connection, DbPool}
};

#[derive(Error)]
pub enum OtpError{
    #[error("{0}")]
    InvalidInput(String),
    #[error("No user registered with this email")]
    UserNotFound,
    #[error("OTP is invalid or has expired")]
    InvalidOtp,
    #[error("Failed to deliver the verification code")]
    DeliveryFailed(#[source] reqwest::Error),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for OtpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for OtpError {
    fn status_code(&self) -> StatusCode {
        match self {
            OtpError::InvalidInput(_) | OtpError::InvalidOtp => StatusCode::BAD_REQUEST,
            OtpError::UserNotFound => StatusCode::NOT_FOUND,
            OtpError::DeliveryFailed(_) | OtpError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        error_body(self.status_code(), self)
    }
}

#[derive(Deserialize, Debug)]
pub struct OtpRequestForm{
    pub email: String
}

#[derive(Deserialize, Debug)]
pub struct OtpValidateForm{
    pub email: String,
    pub otp: SecretString
}

#[derive(Deserialize, Debug)]
pub struct PasswordResetForm{
    pub email: String,
    pub otp: SecretString,
    pub password: SecretString
}

#[tracing::instrument(
    "Requesting password reset code",
    skip(pool, email_client, otp_settings)
)]
pub async fn request_password_reset(
    pool: web::Data<DbPool>,
    form: web::Json<OtpRequestForm>,
    email_client: web::Data<EmailClient>,
    otp_settings: web::Data<OtpSettings>
) -> Result<HttpResponse, OtpError> {
    let email = UserEmail::parse(form.into_inner().email)
        .map_err(OtpError::InvalidInput)?;

    let user = find_user(&pool, &email).await?;

    let otp = generate_otp();
    let otp_hash = hash_password(SecretString::from(otp.clone())).await?;
    let expires_at = otp_expiry(Utc::now(), otp_settings.expiry_minutes);

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;
    set_user_otp(conn, user.user_id, Some(otp_hash), Some(expires_at)).await?;

    email_client.send_reset_code(&email, &otp, otp_settings.expiry_minutes)
        .await
        .map_err(OtpError::DeliveryFailed)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "OTP sent to your email" })))
}

#[tracing::instrument(
    "Validating password reset code",
    skip_all
)]
pub async fn validate_password_reset(
    pool: web::Data<DbPool>,
    form: web::Json<OtpValidateForm>,
    otp_settings: web::Data<OtpSettings>
) -> Result<HttpResponse, OtpError> {
    let form = form.into_inner();
    let email = UserEmail::parse(form.email)
        .map_err(OtpError::InvalidInput)?;

    let user = find_user(&pool, &email).await?;
    check_otp(&pool, &user, form.otp, otp_settings.max_attempts).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "OTP verified" })))
}

#[tracing::instrument(
    "Resetting password with code",
    skip_all
)]
pub async fn reset_password(
    pool: web::Data<DbPool>,
    form: web::Json<PasswordResetForm>,
    otp_settings: web::Data<OtpSettings>
) -> Result<HttpResponse, OtpError> {
    let form = form.into_inner();
    let email = UserEmail::parse(form.email)
        .map_err(OtpError::InvalidInput)?;

    validate_password(&form.password)
        .map_err(OtpError::InvalidInput)?;

    let user = find_user(&pool, &email).await?;
    check_otp(&pool, &user, form.otp, otp_settings.max_attempts).await?;

    let password_hash = hash_password(form.password).await?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;
    reset_user_password(conn, user.user_id, password_hash).await?;

    tracing::info!(user_id = %user.user_id, "Password reset");

    Ok(HttpResponse::Ok().json(json!({ "message": "Password reset successfully" })))
}

async fn find_user(pool: &web::Data<DbPool>, email: &UserEmail) -> Result<User, OtpError> {
    let conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection from pool")?;

    get_user_from_email(conn, email.inner())
        .await?
        .ok_or(OtpError::UserNotFound)
}

// Missing, expired, wrong and exhausted codes are indistinguishable to the
// caller. Every check spends an attempt; the last failed one drops the code.
async fn check_otp(
    pool: &web::Data<DbPool>,
    user: &User,
    otp: SecretString,
    max_attempts: i32
) -> Result<(), OtpError> {
    let conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection from pool")?;

    let attempt = match claim_otp_attempt(conn, user.user_id, max_attempts).await? {
        Some(attempt) if otp_is_live(attempt.expires_at, Utc::now()) => attempt,
        _ => return Err(OtpError::InvalidOtp)
    };

    if verify_password(otp, attempt.otp_hash).await? {
        return Ok(())
    }

    if attempt.attempts >= max_attempts {
        let conn = get_pooled_connection(pool)
            .await
            .context("Failed to get connection from pool")?;
        set_user_otp(conn, user.user_id, None, None).await?;

        tracing::warn!(user_id = %user.user_id, "Password reset code dropped after too many attempts");
    }

    Err(OtpError::InvalidOtp)
}
