use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::{get_meal_by_id, get_meals, ListFilter},
    error::ApiError,
    routes::ListQuery,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Listing meal entries",
    skip(pool, _user)
)]
pub async fn list_meals(
    pool: web::Data<DbPool>,
    query: web::Query<ListQuery>,
    _user: IsUser
) -> Result<HttpResponse, ApiError> {
    let filter = ListFilter::try_from(query.into_inner())?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let meals = get_meals(conn, filter).await?;

    Ok(HttpResponse::Ok().json(meals))
}

#[tracing::instrument(
    "Get meal entry by id",
    skip(pool, _user)
)]
pub async fn get_meal(
    pool: web::Data<DbPool>,
    meal_id: web::Path<Uuid>,
    _user: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let meal = get_meal_by_id(conn, meal_id.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("meal not found".to_string()))?;

    Ok(HttpResponse::Ok().json(meal))
}
