use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::delete_meal as delete_meal_from_database,
    error::ApiError,
    routes::owned_record_error,
    utils::{get_pooled_connection, DbPool}
};

#[tracing::instrument(
    "Deleting meal entry",
    skip(pool, uid),
    fields(user_id = %uid.0)
)]
pub async fn delete_meal(
    pool: web::Data<DbPool>,
    meal_id: web::Path<Uuid>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    delete_meal_from_database(conn, meal_id.into_inner(), uid.0, uid.1)
        .await
        .map_err(|e| owned_record_error(e, "meal"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "meal deleted" })))
}
