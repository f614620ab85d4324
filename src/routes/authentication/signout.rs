use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::{extractors::IsUser, session::{removal_cookie, SessionConfig}};

#[tracing::instrument(
    "Signing out currently signed in user",
    skip_all,
    fields(user_id = %user.0)
)]
pub async fn signout(
    user: IsUser,
    session_config: web::Data<SessionConfig>
) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie(session_config.secure))
        .json(json!({ "message": "Successfully signed out" }))
}
