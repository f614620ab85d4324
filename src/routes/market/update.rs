use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::extractors::IsUser,
    db_interaction::update_market as update_market_in_database,
    error::ApiError,
    models::MarketChangeset,
    routes::owned_record_error,
    utils::{get_pooled_connection, DbPool}
};

use super::{parse_amount, parse_items};

#[derive(Deserialize, Debug)]
pub struct UpdateMarketForm{
    pub items: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>
}

#[tracing::instrument(
    "Updating market entry",
    skip(pool, uid),
    fields(user_id = %uid.0)
)]
pub async fn update_market(
    pool: web::Data<DbPool>,
    market_id: web::Path<Uuid>,
    form: web::Json<UpdateMarketForm>,
    uid: IsUser
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();

    let changes = MarketChangeset{
        items: form.items.map(parse_items).transpose().map_err(ApiError::Validation)?,
        amount: form.amount.map(parse_amount).transpose().map_err(ApiError::Validation)?,
        date: form.date,
        updated_at: None
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let market = update_market_in_database(conn, market_id.into_inner(), uid.0, uid.1, changes)
        .await
        .map_err(|e| owned_record_error(e, "market"))?;

    Ok(HttpResponse::Ok().json(market))
}
