use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use uuid::Uuid;

use crate::{
    models::{Market, MarketChangeset},
    schema::markets,
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection
};

use super::{ListFilter, OwnedRecordError};

#[tracing::instrument(
    "Inserting market entry into db",
    skip_all
)]
pub async fn insert_market(
    mut conn: DbConnection,
    market: Market
) -> Result<Market, OwnedRecordError> {
    // A token can outlive its user row, the foreign key catches that
    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(markets::table)
            .values(&market)
            .returning(Market::as_returning())
            .get_result::<Market>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting market entries from db",
    skip(conn)
)]
pub async fn get_markets(
    mut conn: DbConnection,
    filter: ListFilter
) -> Result<Vec<Market>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let mut query = markets::table
            .select(Market::as_select())
            .into_boxed();

        if let Some(user_id) = filter.user_id {
            query = query.filter(markets::user_id.eq(user_id));
        }

        if let Some((limit, offset)) = filter.limit_offset().map_err(anyhow::Error::msg)? {
            query = query.limit(limit).offset(offset);
        }

        query
            .order((markets::date.desc(), markets::created_at.desc()))
            .load::<Market>(&mut conn)
            .context("Failed to load market entries")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting market entry by id",
    skip(conn)
)]
pub async fn get_market_by_id(
    mut conn: DbConnection,
    market_id: Uuid
) -> Result<Option<Market>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        markets::table
            .find(market_id)
            .select(Market::as_select())
            .first::<Market>(&mut conn)
            .optional()
            .context("Failed to query market entry")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Updating market entry",
    skip(conn, changes)
)]
pub async fn update_market(
    mut conn: DbConnection,
    market_id: Uuid,
    caller: Uuid,
    is_admin: bool,
    mut changes: MarketChangeset
) -> Result<Market, OwnedRecordError> {
    changes.updated_at = Some(Utc::now());

    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Market, OwnedRecordError, _>(|conn| {
            let owner = markets::table
                .find(market_id)
                .select(markets::user_id)
                .for_update()
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(OwnedRecordError::NotFound)?;

            if owner != caller && !is_admin {
                return Err(OwnedRecordError::NotOwner)
            }

            let market = diesel::update(markets::table.find(market_id))
                .set(&changes)
                .returning(Market::as_returning())
                .get_result::<Market>(conn)?;

            Ok(market)
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Deleting market entry",
    skip(conn)
)]
pub async fn delete_market(
    mut conn: DbConnection,
    market_id: Uuid,
    caller: Uuid,
    is_admin: bool
) -> Result<(), OwnedRecordError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), OwnedRecordError, _>(|conn| {
            let owner = markets::table
                .find(market_id)
                .select(markets::user_id)
                .for_update()
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(OwnedRecordError::NotFound)?;

            if owner != caller && !is_admin {
                return Err(OwnedRecordError::NotOwner)
            }

            diesel::delete(markets::table.find(market_id))
                .execute(conn)?;

            Ok(())
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}
