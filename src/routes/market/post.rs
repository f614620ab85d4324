use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::insert_market,
    error::ApiError,
    models::Market,
    routes::owned_record_error,
    utils::{get_pooled_connection, DbPool}
};

use super::{parse_amount, parse_items};

#[derive(Deserialize, Debug)]
pub struct MarketForm{
    pub items: String,
    pub amount: f64,
    pub date: Option<NaiveDate>
}

#[tracing::instrument(
    "Creating market entry",
    skip(pool, uid),
    fields(user_id = %uid.0)
)]
pub async fn create_market(
    pool: web::Data<DbPool>,
    form: web::Json<MarketForm>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();
    let now = Utc::now();

    // The owner is always the caller, never taken from the body
    let market = Market{
        market_id: Uuid::new_v4(),
        user_id: uid.0,
        items: parse_items(form.items).map_err(ApiError::Validation)?,
        amount: parse_amount(form.amount).map_err(ApiError::Validation)?,
        date: form.date.unwrap_or_else(|| now.date_naive()),
        created_at: now,
        updated_at: now
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let market = insert_market(conn, market)
        .await
        .map_err(|e| owned_record_error(e, "market"))?;

    Ok(HttpResponse::Created().json(market))
}
