use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const OTP_LENGTH: usize = 6;

// Zero padded, so every code has exactly OTP_LENGTH digits
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}

pub fn otp_expiry(now: DateTime<Utc>, expiry_minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(expiry_minutes)
}

// A code is usable while it is pending and its expiry lies in the future
pub fn otp_is_live(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expires_at, Some(expires_at) if expires_at > now)
}
