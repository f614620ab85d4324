use chrono::{Duration, Utc};
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use serde_json::{json, Value};
use united_mess::schema::users;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

async fn request_code(app: &TestApp, email: &str) -> String {
    Mock::given(path("/email"))
        .and(method("POST"))
        .and(header_exists("X-Postmark-Server-Token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_api)
        .await;

    let response = app.post_json("/user/otp/request", &json!({ "email": email }), None).await;
    assert_eq!(response.status().as_u16(), 200);

    let requests = app.email_api.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();

    body["TextBody"]
        .as_str()
        .unwrap()
        .split(|c: char| !c.is_ascii_digit())
        .find(|word| word.len() == 6)
        .expect("no code in the email")
        .to_string()
}

#[actix_web::test]
async fn reset_code_is_emailed_and_stored_hashed(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    let code = request_code(&app, &member.email).await;

    let user = app.find_user(&member.email).unwrap();
    let stored = user.otp.expect("code was not stored");
    assert_ne!(stored, code);
    assert!(user.otp_expires_at.unwrap() > Utc::now());
}

#[actix_web::test]
async fn reset_code_for_unknown_email_is_not_found(){
    let app = TestApp::spawn_app().await;

    Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_api)
        .await;

    let response = app.post_json("/user/otp/request", &json!({ "email": "ghost@mess.test" }), None).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn valid_code_resets_the_password(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;
    let code = request_code(&app, &member.email).await;

    let response = app.post_json("/user/otp/validate", &json!({ "email": member.email, "otp": code }), None).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.post_json(
        "/user/otp/reset",
        &json!({ "email": member.email, "otp": code, "password": "after-reset" }),
        None
    ).await;
    assert_eq!(response.status().as_u16(), 200);

    assert_eq!(app.signin(&member.email, &member.password).await.status().as_u16(), 401);
    assert_eq!(app.signin(&member.email, "after-reset").await.status().as_u16(), 200);

    // The code is spent once used
    let response = app.post_json("/user/otp/validate", &json!({ "email": member.email, "otp": code }), None).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn wrong_code_is_rejected(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;
    let code = request_code(&app, &member.email).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let response = app.post_json("/user/otp/validate", &json!({ "email": member.email, "otp": wrong }), None).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.post_json(
        "/user/otp/reset",
        &json!({ "email": member.email, "otp": wrong, "password": "after-reset" }),
        None
    ).await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.signin(&member.email, &member.password).await.status().as_u16(), 200);
}

#[actix_web::test]
async fn code_is_dropped_after_too_many_wrong_attempts(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;
    let code = request_code(&app, &member.email).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..app.settings.otp.max_attempts {
        let response = app.post_json("/user/otp/validate", &json!({ "email": member.email, "otp": wrong }), None).await;
        assert_eq!(response.status().as_u16(), 400);
    }

    let user = app.find_user(&member.email).unwrap();
    assert!(user.otp.is_none());
    assert!(user.otp_expires_at.is_none());

    // Even the right code is refused now
    let response = app.post_json(
        "/user/otp/reset",
        &json!({ "email": member.email, "otp": code, "password": "after-reset" }),
        None
    ).await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.signin(&member.email, &member.password).await.status().as_u16(), 200);
}

#[actix_web::test]
async fn fresh_code_restores_the_attempts(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    let mut conn = app.pool.get().unwrap();
    diesel::update(users::table.filter(users::email.eq(&member.email)))
        .set(users::otp_attempts.eq(app.settings.otp.max_attempts))
        .execute(&mut conn)
        .unwrap();

    let code = request_code(&app, &member.email).await;
    assert_eq!(app.find_user(&member.email).unwrap().otp_attempts, 0);

    let response = app.post_json("/user/otp/validate", &json!({ "email": member.email, "otp": code }), None).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.find_user(&member.email).unwrap().otp_attempts, 1);
}

#[actix_web::test]
async fn expired_code_is_rejected(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;
    let code = request_code(&app, &member.email).await;

    let mut conn = app.pool.get().unwrap();
    diesel::update(users::table.filter(users::email.eq(&member.email)))
        .set(users::otp_expires_at.eq(Utc::now() - Duration::minutes(1)))
        .execute(&mut conn)
        .unwrap();

    let response = app.post_json("/user/otp/validate", &json!({ "email": member.email, "otp": code }), None).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn validating_without_a_pending_code_fails(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    let response = app.post_json("/user/otp/validate", &json!({ "email": member.email, "otp": "123456" }), None).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn mobile_code_is_sent_through_the_sms_provider(){
    let app = TestApp::spawn_app().await;

    Mock::given(path("/verifications"))
        .and(method("POST"))
        .and(header("Authorization", "Bearer my-secret-token"))
        .and(body_partial_json(json!({ "to": "+8801712345678", "channel": "sms" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "status": "pending" })))
        .expect(1)
        .mount(&app.sms_api)
        .await;

    let response = app.post_json("/user/mobile-otp/send", &json!({ "phone": "01712345678" }), None).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[actix_web::test]
async fn mobile_code_verification_follows_the_provider(){
    let app = TestApp::spawn_app().await;

    Mock::given(path("/verification-checks"))
        .and(body_partial_json(json!({ "code": "424242" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "approved" })))
        .mount(&app.sms_api)
        .await;
    Mock::given(path("/verification-checks"))
        .and(body_partial_json(json!({ "code": "000000" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "pending" })))
        .mount(&app.sms_api)
        .await;

    let response = app.post_json("/user/mobile-otp/verify", &json!({ "phone": "01712345678", "code": "424242" }), None).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["verified"], true);

    let response = app.post_json("/user/mobile-otp/verify", &json!({ "phone": "01712345678", "code": "000000" }), None).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn mobile_code_rejects_invalid_phone(){
    let app = TestApp::spawn_app().await;

    Mock::given(path("/verifications"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.sms_api)
        .await;

    let response = app.post_json("/user/mobile-otp/send", &json!({ "phone": "12" }), None).await;

    assert_eq!(response.status().as_u16(), 400);
}
