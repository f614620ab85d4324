use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::{
    auth::{jwt::Tokenizer, session::{session_cookie, SessionConfig}},
    db_interaction::get_user_from_email,
    domain::{UserEmail, UserStatus},
    error::{error_body, error_fmt_chain},
    models::PublicUser,
    password::verify_password,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct SigninForm{
    pub email: String,
    pub password: SecretString
}

#[derive(Error)]
pub enum SigninError{
    #[error("Email or password is incorrect")]
    InvalidCredentials,
    #[error("Your account is pending admin approval")]
    PendingApproval,
    #[error("Failed to sign in")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for SigninError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for SigninError {
    fn status_code(&self) -> StatusCode {
        match self {
            SigninError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            SigninError::PendingApproval => StatusCode::FORBIDDEN,
            SigninError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        error_body(self.status_code(), self)
    }
}

#[tracing::instrument(
    "Signing in user",
    skip(pool, form, tokenizer, session_config),
    fields(email = %form.email)
)]
pub async fn signin(
    pool: web::Data<DbPool>,
    form: web::Json<SigninForm>,
    tokenizer: web::Data<Tokenizer>,
    session_config: web::Data<SessionConfig>
) -> Result<HttpResponse, SigninError>{
    let form = form.into_inner();

    // A malformed email cannot belong to anybody
    let email = UserEmail::parse(form.email)
        .map_err(|_| SigninError::InvalidCredentials)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = match get_user_from_email(conn, email.inner()).await? {
        Some(user) => user,
        None => {
            tracing::info!("No user registered with this email");
            return Err(SigninError::InvalidCredentials)
        }
    };

    if !verify_password(form.password, user.password.clone()).await? {
        tracing::info!("Passwords did not match");
        return Err(SigninError::InvalidCredentials)
    }

    if user.user_status.parse::<UserStatus>() != Ok(UserStatus::Approved) {
        tracing::info!(user_id = %user.user_id, "Signin refused, account not approved");
        return Err(SigninError::PendingApproval)
    }

    let token = tokenizer.generate_key(&user)
        .context("Failed to sign session token")?;

    let cookie = session_cookie(token.clone(), tokenizer.expiry_hours, session_config.secure);

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({
            "message": "Successfully signed in",
            "token": token,
            "user": PublicUser::from(user)
        })))
}
