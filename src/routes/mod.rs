use serde::Deserialize;
use uuid::Uuid;

use crate::{db_interaction::{ListFilter, OwnedRecordError}, error::ApiError};

mod authentication;
mod health_check;
mod market;
mod meal;
mod otp;
mod user;

pub use authentication::*;
pub use health_check::*;
pub use market::*;
pub use meal::*;
pub use otp::*;
pub use user::*;

// Query string accepted by the market and meal listings
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery{
    pub user_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>
}

impl TryFrom<ListQuery> for ListFilter {
    type Error = ApiError;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        let filter = ListFilter{
            user_id: query.user_id,
            page: query.page,
            limit: query.limit
        };
        filter.limit_offset().map_err(ApiError::Validation)?;

        Ok(filter)
    }
}

pub(crate) fn owned_record_error(e: OwnedRecordError, record: &str) -> ApiError {
    match e {
        OwnedRecordError::NotFound => ApiError::NotFound(format!("{} not found", record)),
        OwnedRecordError::NotOwner => ApiError::Forbidden(
            format!("Only the owner or an admin can change this {}", record)
        ),
        // The token outlived its account
        OwnedRecordError::OwnerMissing => ApiError::Unauthorized,
        OwnedRecordError::UnexpectedError(e) => ApiError::UnexpectedError(e)
    }
}
