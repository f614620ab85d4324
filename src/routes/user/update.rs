use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::SecretString;
use serde::Deserialize;

use crate::{
    auth::extractors::IsUser,
    db_interaction::{update_user, UserWriteError},
    domain::{PhoneNumberDomain, UserEmail},
    error::ApiError,
    models::{PublicUser, UserChangeset},
    password::{hash_password, validate_password},
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct UpdateUserForm{
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<SecretString>
}

#[tracing::instrument(
    "Updating profile of signed in user",
    skip_all,
    fields(user_id = %uid.0)
)]
pub async fn update_profile(
    pool: web::Data<DbPool>,
    form: web::Json<UpdateUserForm>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let changes = changeset_from_form(form.into_inner()).await?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = update_user(conn, uid.0, changes)
        .await
        .map_err(|e| {
            match e {
                UserWriteError::EmailNotUnique(_) => ApiError::Validation("email is already registered".to_string()),
                UserWriteError::UnexpectedError(e) => ApiError::UnexpectedError(e)
            }
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

// Validates every supplied field; absent fields stay untouched
async fn changeset_from_form(form: UpdateUserForm) -> Result<UserChangeset, ApiError> {
    let mut changes = UserChangeset::default();

    if let Some(name) = form.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_string()))
        }
        changes.name = Some(name);
    }

    if let Some(email) = form.email {
        changes.email = Some(
            UserEmail::parse(email)
                .map_err(ApiError::Validation)?
                .inner()
        );
    }

    if let Some(phone) = form.phone {
        changes.phone = Some(
            PhoneNumberDomain::parse(phone)
                .map_err(ApiError::Validation)?
                .inner()
        );
    }

    if let Some(password) = form.password {
        validate_password(&password).map_err(ApiError::Validation)?;
        changes.password = Some(hash_password(password).await?);
    }

    Ok(changes)
}
