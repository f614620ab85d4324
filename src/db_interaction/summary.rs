use anyhow::Context;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use uuid::Uuid;

use crate::{
    domain::UserSummary,
    models::{Market, Meal, User},
    schema::{markets, meals, users},
    telemetry::spawn_blocking_with_tracing,
    utils::DbConnection
};

// The user plus the owned rows, read in one snapshot. None when the id is unknown.
#[tracing::instrument(
    "Getting user summary",
    skip(conn)
)]
pub async fn get_user_summary(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Option<UserSummary>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        conn.build_transaction()
            .read_only()
            .run::<Option<UserSummary>, anyhow::Error, _>(|conn| {
                let user = match users::table
                    .find(user_id)
                    .select(User::as_select())
                    .first::<User>(conn)
                    .optional()
                    .context("Failed to query user")?
                {
                    Some(user) => user,
                    None => return Ok(None)
                };

                let user_markets = markets::table
                    .filter(markets::user_id.eq(user_id))
                    .order(markets::date.asc())
                    .select(Market::as_select())
                    .load::<Market>(conn)
                    .context("Failed to load markets of user")?;

                let user_meals = meals::table
                    .filter(meals::user_id.eq(user_id))
                    .order(meals::date.asc())
                    .select(Meal::as_select())
                    .load::<Meal>(conn)
                    .context("Failed to load meals of user")?;

                Ok(Some(UserSummary::build(user, user_markets, user_meals)))
            })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Three queries regardless of how many users there are; grouping happens in memory
#[tracing::instrument(
    "Getting summaries of all users",
    skip_all
)]
pub async fn get_all_user_summaries(
    mut conn: DbConnection
) -> Result<Vec<UserSummary>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        conn.build_transaction()
            .read_only()
            .run::<Vec<UserSummary>, anyhow::Error, _>(|conn| {
                let all_users = users::table
                    .order(users::created_at.asc())
                    .select(User::as_select())
                    .load::<User>(conn)
                    .context("Failed to load users")?;

                let all_markets = markets::table
                    .order(markets::date.asc())
                    .select(Market::as_select())
                    .load::<Market>(conn)
                    .context("Failed to load markets")?;

                let all_meals = meals::table
                    .order(meals::date.asc())
                    .select(Meal::as_select())
                    .load::<Meal>(conn)
                    .context("Failed to load meals")?;

                Ok(UserSummary::build_all(all_users, all_markets, all_meals))
            })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
