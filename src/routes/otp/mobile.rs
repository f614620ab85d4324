use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{domain::PhoneNumberDomain, sms_client::SmsClient};

use super::email::OtpError;

#[derive(Deserialize, Debug)]
pub struct MobileOtpRequestForm{
    pub phone: String
}

#[derive(Deserialize, Debug)]
pub struct MobileOtpVerifyForm{
    pub phone: String,
    pub code: String
}

#[tracing::instrument(
    "Sending mobile verification code",
    skip(sms_client)
)]
pub async fn send_mobile_otp(
    form: web::Json<MobileOtpRequestForm>,
    sms_client: web::Data<SmsClient>
) -> Result<HttpResponse, OtpError> {
    let phone = PhoneNumberDomain::parse(form.into_inner().phone)
        .map_err(OtpError::InvalidInput)?;

    sms_client.send_verification(&phone)
        .await
        .map_err(OtpError::DeliveryFailed)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "OTP sent to your phone" })))
}

#[tracing::instrument(
    "Verifying mobile verification code",
    skip_all
)]
pub async fn verify_mobile_otp(
    form: web::Json<MobileOtpVerifyForm>,
    sms_client: web::Data<SmsClient>
) -> Result<HttpResponse, OtpError> {
    let form = form.into_inner();
    let phone = PhoneNumberDomain::parse(form.phone)
        .map_err(OtpError::InvalidInput)?;

    let code = form.code.trim();
    if code.is_empty() {
        return Err(OtpError::InvalidInput("code must not be empty".to_string()))
    }

    let approved = sms_client.check_verification(&phone, code)
        .await
        .map_err(OtpError::DeliveryFailed)?;

    if !approved {
        return Err(OtpError::InvalidOtp)
    }

    Ok(HttpResponse::Ok().json(json!({ "verified": true })))
}
