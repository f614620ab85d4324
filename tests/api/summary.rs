use serde_json::{json, Value};

use crate::helpers::TestApp;

#[actix_web::test]
async fn fresh_member_has_zero_totals(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    let response = app.get("/user/profile", Some(&member.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["totalAmount"], 0.0);
    assert_eq!(body["totalMeal"], 0);
    assert_eq!(body["markets"], json!([]));
    assert_eq!(body["meals"], json!([]));
    assert!(body.get("password").is_none());
    assert!(body.get("otp").is_none());
}

#[actix_web::test]
async fn totals_follow_markets_and_weighted_meals(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    for amount in [150.0, 200.5] {
        let response = app.post_json(
            "/market",
            &json!({ "items": "rice, oil", "amount": amount }),
            Some(&member.token)
        ).await;
        assert_eq!(response.status().as_u16(), 201);
    }

    for meal_time in ["both", "day", "night"] {
        let response = app.post_json(
            "/meal",
            &json!({ "mealTime": meal_time }),
            Some(&member.token)
        ).await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let response = app.get(&format!("/user/{}", member.user_id), Some(&member.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["totalAmount"], 350.5);
    assert_eq!(body["totalMeal"], 4);
    assert_eq!(body["markets"].as_array().unwrap().len(), 2);
    assert_eq!(body["meals"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn totals_of_one_member_ignore_other_members(){
    let app = TestApp::spawn_app().await;
    let first = app.member().await;
    let second = app.member().await;

    app.post_json("/market", &json!({ "items": "fish", "amount": 500.0 }), Some(&first.token)).await;
    app.post_json("/meal", &json!({ "mealTime": "both" }), Some(&first.token)).await;
    app.post_json("/market", &json!({ "items": "eggs", "amount": 120.0 }), Some(&second.token)).await;

    let response = app.get("/user/summary", Some(&first.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Vec<Value> = response.json().await.unwrap();
    assert_eq!(body.len(), 2);

    let summary_of = |email: &str| body.iter()
        .find(|summary| summary["email"] == email)
        .cloned()
        .expect("summary missing");

    let first_summary = summary_of(&first.email);
    assert_eq!(first_summary["totalAmount"], 500.0);
    assert_eq!(first_summary["totalMeal"], 2);

    let second_summary = summary_of(&second.email);
    assert_eq!(second_summary["totalAmount"], 120.0);
    assert_eq!(second_summary["totalMeal"], 0);
}

#[actix_web::test]
async fn unknown_user_summary_is_not_found(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    let response = app.get(&format!("/user/{}", uuid::Uuid::new_v4()), Some(&member.token)).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn user_listing_hides_secrets(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    let response = app.get("/user/", Some(&member.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Vec<Value> = response.json().await.unwrap();
    assert_eq!(body.len(), 1);
    assert!(body[0].get("password").is_none());
    assert!(body[0].get("otp").is_none());
}

#[actix_web::test]
async fn deleting_a_market_lowers_the_total(){
    let app = TestApp::spawn_app().await;
    let member = app.member().await;

    let kept: Value = app.post_json("/market", &json!({ "items": "rice", "amount": 100.0 }), Some(&member.token))
        .await
        .json()
        .await
        .unwrap();
    let removed: Value = app.post_json("/market", &json!({ "items": "beef", "amount": 250.5 }), Some(&member.token))
        .await
        .json()
        .await
        .unwrap();

    let response = app.delete(&format!("/market/{}", removed["marketId"].as_str().unwrap()), Some(&member.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let profile: Value = app.get("/user/profile", Some(&member.token)).await.json().await.unwrap();
    assert_eq!(profile["totalAmount"], 100.0);
    let markets = profile["markets"].as_array().unwrap();
    assert_eq!(markets.len(), 1);
    assert_eq!(markets[0]["marketId"], kept["marketId"]);
}
