use reqwest::header::SET_COOKIE;
use serde_json::Value;

use crate::helpers::TestApp;

#[actix_web::test]
async fn denied_user_cannot_sign_in(){
    let app = TestApp::spawn_app().await;
    app.register("Rahim", "rahim@mess.test", "secret-pass").await;

    let response = app.signin("rahim@mess.test", "secret-pass").await;

    assert_eq!(response.status().as_u16(), 403);
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[actix_web::test]
async fn wrong_credentials_are_unauthorized(){
    let app = TestApp::spawn_app().await;
    app.register("Rahim", "rahim@mess.test", "secret-pass").await;
    app.approve("rahim@mess.test");

    let wrong_password = app.signin("rahim@mess.test", "wrong-pass").await;
    assert_eq!(wrong_password.status().as_u16(), 401);

    let unknown_email = app.signin("nobody@mess.test", "secret-pass").await;
    assert_eq!(unknown_email.status().as_u16(), 401);

    // Both failures look the same to the caller
    let body: Value = unknown_email.json().await.unwrap();
    assert_eq!(body["message"], "Email or password is incorrect");
}

#[actix_web::test]
async fn approved_user_signs_in_with_cookie_and_token(){
    let app = TestApp::spawn_app().await;
    app.register("Rahim", "rahim@mess.test", "secret-pass").await;
    app.approve("rahim@mess.test");

    let response = app.signin("rahim@mess.test", "secret-pass").await;
    assert_eq!(response.status().as_u16(), 200);

    let cookie = response.headers()
        .get(SET_COOKIE)
        .expect("session cookie was not set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = response.json().await.unwrap();
    assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
    assert_eq!(body["user"]["email"], "rahim@mess.test");
    assert!(body["user"].get("password").is_none());
}

#[actix_web::test]
async fn session_cookie_authenticates_until_signout(){
    let app = TestApp::spawn_app().await;
    app.register("Rahim", "rahim@mess.test", "secret-pass").await;
    app.approve("rahim@mess.test");

    let response = app.api_client
        .post(format!("{}/user/signin", app.get_app_url()))
        .json(&serde_json::json!({ "email": "rahim@mess.test", "password": "secret-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let profile = app.api_client
        .get(format!("{}/user/profile", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(profile.status().as_u16(), 200);

    let signout = app.api_client
        .post(format!("{}/user/signout", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(signout.status().as_u16(), 200);

    let profile = app.api_client
        .get(format!("{}/user/profile", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(profile.status().as_u16(), 401);
}
