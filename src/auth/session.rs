use actix_web::cookie::{time::Duration, Cookie, SameSite};

pub const SESSION_COOKIE: &str = "token";

// Registered as app data so handlers know how to build the cookie
#[derive(Debug, Clone)]
pub struct SessionConfig{
    pub secure: bool
}

// HTTP-only cookie carrying the signed session token
pub fn session_cookie(token: String, expiry_hours: u64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(expiry_hours as i64))
        .finish()
}

pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();

    cookie
}
