use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::insert_meal,
    domain::MealTime,
    error::ApiError,
    models::Meal,
    routes::owned_record_error,
    utils::{get_pooled_connection, DbPool}
};

// Unknown meal times fail deserialization and surface as a 400
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MealForm{
    pub meal_time: Option<MealTime>,
    pub date: Option<NaiveDate>
}

#[tracing::instrument(
    "Creating meal entry",
    skip(pool, uid),
    fields(user_id = %uid.0)
)]
pub async fn create_meal(
    pool: web::Data<DbPool>,
    form: web::Json<MealForm>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();
    let now = Utc::now();

    let meal = Meal{
        meal_id: Uuid::new_v4(),
        user_id: uid.0,
        meal_time: form.meal_time.unwrap_or_default().as_str().to_string(),
        date: form.date.unwrap_or_else(|| now.date_naive()),
        created_at: now,
        updated_at: now
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let meal = insert_meal(conn, meal)
        .await
        .map_err(|e| owned_record_error(e, "meal"))?;

    Ok(HttpResponse::Created().json(meal))
}
