use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    db_interaction::{insert_user_into_database, NewUser, UserWriteError},
    domain::{PhoneNumberDomain, UserEmail},
    error::{error_body, error_fmt_chain},
    models::PublicUser,
    password::validate_password,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct RegistrationForm{
    name: String,
    email: String,
    password: SecretString,
    phone: Option<String>
}

#[derive(Error)]
pub enum RegisterError{
    #[error("{0}")]
    InvalidInput(String),
    #[error("user already exists")]
    UserAlreadyExists(#[source] UserWriteError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegisterError{
    fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::InvalidInput(_) | RegisterError::UserAlreadyExists(_) => StatusCode::BAD_REQUEST,
            RegisterError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        error_body(self.status_code(), self)
    }
}

// New accounts start out denied; an admin has to approve them before signin works
#[tracing::instrument(
    "User registration started",
    skip(pool, form),
    fields(email = %form.email)
)]
pub async fn register(
    pool: web::Data<DbPool>,
    form: web::Json<RegistrationForm>
) -> Result<HttpResponse, RegisterError> {
    let form = form.into_inner();

    let name = form.name.trim().to_string();
    if name.is_empty() {
        return Err(RegisterError::InvalidInput("name must not be empty".to_string()))
    }

    let email = UserEmail::parse(form.email)
        .map_err(RegisterError::InvalidInput)?;

    validate_password(&form.password)
        .map_err(RegisterError::InvalidInput)?;

    let phone = match form.phone.filter(|phone| !phone.trim().is_empty()) {
        Some(phone) => Some(
            PhoneNumberDomain::parse(phone)
                .map_err(RegisterError::InvalidInput)?
                .inner()
        ),
        None => None
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = insert_user_into_database(conn, NewUser{
        name,
        email: email.inner(),
        phone,
        password: form.password
    })
    .await
    .map_err(|e| {
        match e {
            UserWriteError::EmailNotUnique(_) => RegisterError::UserAlreadyExists(e),
            UserWriteError::UnexpectedError(e) => RegisterError::UnexpectedError(e)
        }
    })?;

    tracing::info!(user_id = %user.user_id, "Registered new user pending approval");

    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}
