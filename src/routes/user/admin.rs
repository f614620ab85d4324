use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::extractors::IsAdmin,
    db_interaction::update_user_by_admin as update_user_in_database,
    domain::{PaymentStatus, UserRole, UserStatus},
    error::ApiError,
    models::{AdminUserChangeset, PublicUser},
    utils::{get_pooled_connection, DbPool}
};

// Fields only an admin may change on another account
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateForm{
    pub role: Option<UserRole>,
    pub user_status: Option<UserStatus>,
    pub payment: Option<PaymentStatus>,
    pub gas_bill: Option<PaymentStatus>
}

impl From<AdminUpdateForm> for AdminUserChangeset {
    fn from(form: AdminUpdateForm) -> Self {
        AdminUserChangeset{
            role: form.role.map(|role| role.as_str().to_string()),
            user_status: form.user_status.map(|status| status.as_str().to_string()),
            payment: form.payment.map(|payment| payment.as_str().to_string()),
            gas_bill: form.gas_bill.map(|gas_bill| gas_bill.as_str().to_string()),
            updated_at: None
        }
    }
}

#[tracing::instrument(
    "Updating user as admin",
    skip(pool, admin),
    fields(admin_id = %admin.0)
)]
pub async fn update_user_by_admin(
    pool: web::Data<DbPool>,
    user_id: web::Path<Uuid>,
    form: web::Json<AdminUpdateForm>,
    admin: IsAdmin
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = update_user_in_database(conn, user_id.into_inner(), form.into_inner().into())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %user.user_id,
        user_status = %user.user_status,
        role = %user.role,
        "Admin updated user"
    );

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}
