use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::delete_market as delete_market_from_database,
    error::ApiError,
    routes::owned_record_error,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Deleting market entry",
    skip(pool, uid),
    fields(user_id = %uid.0)
)]
pub async fn delete_market(
    pool: web::Data<DbPool>,
    market_id: web::Path<Uuid>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    delete_market_from_database(conn, market_id.into_inner(), uid.0, uid.1)
        .await
        .map_err(|e| owned_record_error(e, "market"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "market deleted" })))
}
