use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use uuid::Uuid;

use crate::{
    models::{Meal, MealChangeset},
    schema::meals,
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection
};

use super::{ListFilter, OwnedRecordError};

#[tracing::instrument(
    "Inserting meal entry into db",
    skip_all
)]
pub async fn insert_meal(
    mut conn: DbConnection,
    meal: Meal
) -> Result<Meal, OwnedRecordError> {
    // A token can outlive its user row, the foreign key catches that
    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(meals::table)
            .values(&meal)
            .returning(Meal::as_returning())
            .get_result::<Meal>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting meal entries from db",
    skip(conn)
)]
pub async fn get_meals(
    mut conn: DbConnection,
    filter: ListFilter
) -> Result<Vec<Meal>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let mut query = meals::table
            .select(Meal::as_select())
            .into_boxed();

        if let Some(user_id) = filter.user_id {
            query = query.filter(meals::user_id.eq(user_id));
        }

        if let Some((limit, offset)) = filter.limit_offset().map_err(anyhow::Error::msg)? {
            query = query.limit(limit).offset(offset);
        }

        query
            .order((meals::date.desc(), meals::created_at.desc()))
            .load::<Meal>(&mut conn)
            .context("Failed to load meal entries")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting meal entry by id",
    skip(conn)
)]
pub async fn get_meal_by_id(
    mut conn: DbConnection,
    meal_id: Uuid
) -> Result<Option<Meal>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        meals::table
            .find(meal_id)
            .select(Meal::as_select())
            .first::<Meal>(&mut conn)
            .optional()
            .context("Failed to query meal entry")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Updating meal entry",
    skip(conn, changes)
)]
pub async fn update_meal(
    mut conn: DbConnection,
    meal_id: Uuid,
    caller: Uuid,
    is_admin: bool,
    mut changes: MealChangeset
) -> Result<Meal, OwnedRecordError> {
    changes.updated_at = Some(Utc::now());

    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Meal, OwnedRecordError, _>(|conn| {
            let owner = meals::table
                .find(meal_id)
                .select(meals::user_id)
                .for_update()
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(OwnedRecordError::NotFound)?;

            if owner != caller && !is_admin {
                return Err(OwnedRecordError::NotOwner)
            }

            let meal = diesel::update(meals::table.find(meal_id))
                .set(&changes)
                .returning(Meal::as_returning())
                .get_result::<Meal>(conn)?;

            Ok(meal)
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Deleting meal entry",
    skip(conn)
)]
pub async fn delete_meal(
    mut conn: DbConnection,
    meal_id: Uuid,
    caller: Uuid,
    is_admin: bool
) -> Result<(), OwnedRecordError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), OwnedRecordError, _>(|conn| {
            let owner = meals::table
                .find(meal_id)
                .select(meals::user_id)
                .for_update()
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(OwnedRecordError::NotFound)?;

            if owner != caller && !is_admin {
                return Err(OwnedRecordError::NotOwner)
            }

            diesel::delete(meals::table.find(meal_id))
                .execute(conn)?;

            Ok(())
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}
