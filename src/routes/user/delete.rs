use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{extractors::{IsAdmin, IsUser}, session::{removal_cookie, SessionConfig}},
    db_interaction::delete_user_from_database,
    error::ApiError,
    utils::{get_pooled_connection, DbPool}
};

// Members may delete their own account; admins may delete any
#[tracing::instrument(
    "Deleting user by id",
    skip(pool, uid, session_config)
)]
pub async fn delete_user(
    pool: web::Data<DbPool>,
    user_id: web::Path<Uuid>,
    uid: IsUser,
    session_config: web::Data<SessionConfig>
) -> Result<HttpResponse, ApiError> {
    let user_id = user_id.into_inner();
    let (caller, is_admin) = (uid.0, uid.1);

    if caller != user_id && !is_admin {
        return Err(ApiError::Forbidden("You can only delete your own account".to_string()))
    }

    remove_user(&pool, user_id).await?;

    let mut response = HttpResponse::Ok();
    if caller == user_id {
        response.cookie(removal_cookie(session_config.secure));
    }

    Ok(response.json(json!({ "message": "User deleted" })))
}

#[tracing::instrument(
    "Deleting user as admin",
    skip(pool, admin),
    fields(admin_id = %admin.0)
)]
pub async fn delete_user_by_admin(
    pool: web::Data<DbPool>,
    user_id: web::Path<Uuid>,
    admin: IsAdmin
) -> Result<HttpResponse, ApiError> {
    remove_user(&pool, user_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}

async fn remove_user(pool: &web::Data<DbPool>, user_id: Uuid) -> Result<(), ApiError> {
    let conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection from pool")?;

    if !delete_user_from_database(conn, user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()))
    }

    tracing::info!(%user_id, "Deleted user with owned markets and meals");

    Ok(())
}
