use std::{error::Error, fmt::Debug};

use thiserror::Error;
use uuid::Uuid;

use crate::error::error_fmt_chain;

pub mod market;
pub mod meal;
pub mod summary;
pub mod user;

pub use market::*;
pub use meal::*;
pub use summary::*;
pub use user::*;

// Optional narrowing of market / meal listings
#[derive(Debug, Default, Clone)]
pub struct ListFilter{
    pub user_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>
}

impl ListFilter {
    // Paging applies only when a positive limit is given; pages start at 1.
    // An offset past i64 is rejected rather than wrapped.
    pub fn limit_offset(&self) -> Result<Option<(i64, i64)>, String> {
        let Some(limit) = self.limit.filter(|limit| *limit > 0) else {
            return Ok(None)
        };
        let page = self.page.unwrap_or(1).max(1);

        (page - 1)
            .checked_mul(limit)
            .map(|offset| Some((limit, offset)))
            .ok_or_else(|| format!("page {} is out of range for limit {}", page, limit))
    }
}

// Failures of write paths that check ownership before touching the row
#[derive(Error)]
pub enum OwnedRecordError{
    #[error("record not found")]
    NotFound,
    #[error("caller does not own this record")]
    NotOwner,
    #[error("owning user no longer exists")]
    OwnerMissing,
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for OwnedRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<diesel::result::Error> for OwnedRecordError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _
            ) => OwnedRecordError::OwnerMissing,
            _ => OwnedRecordError::UnexpectedError(anyhow::Error::new(e))
        }
    }
}
