use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::{get_all_user_summaries, get_user_summary, list_users},
    error::ApiError,
    models::PublicUser,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Listing users",
    skip_all
)]
pub async fn get_users(
    pool: web::Data<DbPool>,
    _: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let users: Vec<PublicUser> = list_users(conn)
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(
    "Get summary of signed in user",
    skip_all,
    fields(user_id = %uid.0)
)]
pub async fn get_profile(
    pool: web::Data<DbPool>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    // The account may have been deleted while the token is still valid
    let summary = get_user_summary(conn, uid.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(summary))
}

#[tracing::instrument(
    "Get user summary by id",
    skip(pool, _user)
)]
pub async fn get_user(
    pool: web::Data<DbPool>,
    user_id: web::Path<Uuid>,
    _user: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let summary = get_user_summary(conn, user_id.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(summary))
}

#[tracing::instrument(
    "Get summaries of every user",
    skip_all
)]
pub async fn get_user_summaries(
    pool: web::Data<DbPool>,
    _: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let summaries = get_all_user_summaries(conn).await?;

    Ok(HttpResponse::Ok().json(summaries))
}
