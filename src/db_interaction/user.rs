use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use secrecy::SecretString;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    domain::{PaymentStatus, UserRole, UserStatus},
    models::{AdminUserChangeset, User, UserChangeset},
    password::hash_password,
    schema::{markets, meals, users},
    telemetry::spawn_blocking_with_tracing,
    error::error_fmt_chain,
    utils::DbConnection
};

// Error associated with inserting or updating rows of the users table
#[derive(Error)]
pub enum UserWriteError{
    #[error("email is already registered")]
    EmailNotUnique(#[source] diesel::result::Error),
    #[error("unexpected database / hashing error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<diesel::result::Error> for UserWriteError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ) => UserWriteError::EmailNotUnique(e),
            _ => UserWriteError::UnexpectedError(anyhow::Error::new(e).context("Unexpected diesel / database error"))
        }
    }
}

pub struct NewUser{
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: SecretString
}

#[tracing::instrument(
    "Inserting user into the database",
    skip_all
)]
pub async fn insert_user_into_database(
    mut conn: DbConnection,
    new_user: NewUser
) -> Result<User, UserWriteError> {
    let password_hash = hash_password(new_user.password).await?;

    let now = Utc::now();
    let user = User{
        user_id: Uuid::new_v4(),
        name: new_user.name,
        email: new_user.email,
        password: password_hash,
        phone: new_user.phone,
        role: UserRole::User.as_str().to_string(),
        user_status: UserStatus::Denied.as_str().to_string(),
        payment: PaymentStatus::Pending.as_str().to_string(),
        gas_bill: PaymentStatus::Pending.as_str().to_string(),
        otp: None,
        otp_expires_at: None,
        otp_attempts: 0,
        created_at: now,
        updated_at: now
    };

    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Function to query user from email id
#[tracing::instrument(
    "Getting user by email",
    skip(conn)
)]
pub async fn get_user_from_email(
    mut conn: DbConnection,
    email: String
) -> Result<Option<User>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
            .context("Failed to query user by email")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Listing users",
    skip_all
)]
pub async fn list_users(
    mut conn: DbConnection
) -> Result<Vec<User>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .order(users::created_at.asc())
            .select(User::as_select())
            .load::<User>(&mut conn)
            .context("Failed to load users")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// None when no user has this id
#[tracing::instrument(
    "Updating user profile",
    skip(conn, changes)
)]
pub async fn update_user(
    mut conn: DbConnection,
    user_id: Uuid,
    mut changes: UserChangeset
) -> Result<Option<User>, UserWriteError> {
    changes.updated_at = Some(Utc::now());

    let res = spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set(&changes)
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
            .optional()
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Updating user as admin",
    skip(conn, changes)
)]
pub async fn update_user_by_admin(
    mut conn: DbConnection,
    user_id: Uuid,
    mut changes: AdminUserChangeset
) -> Result<Option<User>, anyhow::Error> {
    changes.updated_at = Some(Utc::now());

    let res = spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set(&changes)
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
            .optional()
            .context("Failed to update user")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Removes the user together with every market and meal they own.
// Returns false when no user has this id.
#[tracing::instrument(
    "Deleting user with owned records",
    skip(conn)
)]
pub async fn delete_user_from_database(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<bool, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<bool, anyhow::Error, _>(|conn| {
            diesel::delete(meals::table.filter(meals::user_id.eq(user_id)))
                .execute(conn)
                .context("Failed to delete meals of user")?;

            diesel::delete(markets::table.filter(markets::user_id.eq(user_id)))
                .execute(conn)
                .context("Failed to delete markets of user")?;

            let affected_rows = diesel::delete(users::table.find(user_id))
                .execute(conn)
                .context("Failed to delete user")?;

            Ok(affected_rows > 0)
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Stores (or clears, with None) the hash of a pending password reset code.
// Either way the attempt counter starts over.
#[tracing::instrument(
    "Setting password reset code",
    skip(conn, otp_hash)
)]
pub async fn set_user_otp(
    mut conn: DbConnection,
    user_id: Uuid,
    otp_hash: Option<String>,
    expires_at: Option<DateTime<Utc>>
) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set((
                users::otp.eq(otp_hash),
                users::otp_expires_at.eq(expires_at),
                users::otp_attempts.eq(0)
            ))
            .execute(&mut conn)
            .context("Failed to store password reset code")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}

// A pending code as seen by the check that just used up one attempt
#[derive(Debug)]
pub struct OtpAttempt{
    pub otp_hash: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub attempts: i32
}

/// Spends one attempt on the pending reset code and hands back its hash.
/// `None` when there is no code or its attempts are used up. The increment
/// and the limit check are one statement, so parallel guesses cannot
/// overrun `max_attempts`.
#[tracing::instrument(
    "Claiming a password reset code attempt",
    skip(conn)
)]
pub async fn claim_otp_attempt(
    mut conn: DbConnection,
    user_id: Uuid,
    max_attempts: i32
) -> Result<Option<OtpAttempt>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        diesel::update(
            users::table
                .find(user_id)
                .filter(users::otp.is_not_null())
                .filter(users::otp_attempts.lt(max_attempts))
        )
        .set(users::otp_attempts.eq(users::otp_attempts + 1))
        .returning((users::otp, users::otp_expires_at, users::otp_attempts))
        .get_result::<(Option<String>, Option<DateTime<Utc>>, i32)>(&mut conn)
        .optional()
        .context("Failed to claim a password reset code attempt")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res.and_then(|(otp_hash, expires_at, attempts)| {
        otp_hash.map(|otp_hash| OtpAttempt{ otp_hash, expires_at, attempts })
    }))
}

#[tracing::instrument(
    "Resetting user password",
    skip(conn, password_hash)
)]
pub async fn reset_user_password(
    mut conn: DbConnection,
    user_id: Uuid,
    password_hash: String
) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set((
                users::password.eq(password_hash),
                users::otp.eq(None::<String>),
                users::otp_expires_at.eq(None::<DateTime<Utc>>),
                users::otp_attempts.eq(0),
                users::updated_at.eq(Utc::now())
            ))
            .execute(&mut conn)
            .context("Failed to reset password")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}
