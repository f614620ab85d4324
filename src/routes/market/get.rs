use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::{get_market_by_id, get_markets, ListFilter},
    error::ApiError,
    routes::ListQuery,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Listing market entries",
    skip(pool, _user)
)]
pub async fn list_markets(
    pool: web::Data<DbPool>,
    query: web::Query<ListQuery>,
    _user: IsUser
) -> Result<HttpResponse, ApiError> {
    let filter = ListFilter::try_from(query.into_inner())?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let markets = get_markets(conn, filter).await?;

    Ok(HttpResponse::Ok().json(markets))
}

#[tracing::instrument(
    "Get market entry by id",
    skip(pool, _user)
)]
pub async fn get_market(
    pool: web::Data<DbPool>,
    market_id: web::Path<Uuid>,
    _user: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let market = get_market_by_id(conn, market_id.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("market not found".to_string()))?;

    Ok(HttpResponse::Ok().json(market))
}
