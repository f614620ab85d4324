use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::update_meal as update_meal_in_database,
    error::ApiError,
    models::MealChangeset,
    routes::owned_record_error,
    utils::{get_pooled_connection, DbPool}
};

use super::MealForm;

impl From<MealForm> for MealChangeset {
    fn from(form: MealForm) -> Self {
        MealChangeset{
            meal_time: form.meal_time.map(|meal_time| meal_time.as_str().to_string()),
            date: form.date,
            updated_at: None
        }
    }
}

#[tracing::instrument(
    "Updating meal entry",
    skip(pool, uid),
    fields(user_id = %uid.0)
)]
pub async fn update_meal(
    pool: web::Data<DbPool>,
    meal_id: web::Path<Uuid>,
    form: web::Json<MealForm>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let meal = update_meal_in_database(conn, meal_id.into_inner(), uid.0, uid.1, form.into_inner().into())
        .await
        .map_err(|e| owned_record_error(e, "meal"))?;

    Ok(HttpResponse::Ok().json(meal))
}
