use actix_web::{test, App};
use crm_server::AuthGate;
use serde_json::json;
use uuid::Uuid;

mod common;

#[actix_web::test]
async fn test_register_and_login() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    // Test registration
    let register_response = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({
            "username": "test@example.com",
            "password": "password123",
            "first_name": "Test",
            "last_name": "User"
        }))
        .send_request(&app)
        .await;

    assert_eq!(register_response.status(), 200);

    // Test login
    let login_response = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({
            "username": "test@example.com",
            "password": "password123"
        }))
        .send_request(&app)
        .await;

    assert_eq!(login_response.status(), 200);

    let auth_header = login_response
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .expect("login response should carry an Authorization header");
    assert!(auth_header.starts_with("Bearer "));

    let login_body: serde_json::Value = test::read_body_json(login_response).await;
    assert!(login_body.get("token").is_some());
    assert_eq!(login_body["user"]["username"], "test@example.com");
    // The hash must never be serialized.
    assert!(login_body["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn test_invalid_login() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    // Unknown user
    let response = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({
            "username": "nonexistent@example.com",
            "password": "wrongpassword"
        }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);

    // Known user, wrong password
    test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({ "username": "test@example.com", "password": "password123" }))
        .send_request(&app)
        .await;

    let response = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({
            "username": "test@example.com",
            "password": "wrongpassword"
        }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);

    // Both cases answer with the same opaque message.
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"]["message"], "authentication failed");
}

#[actix_web::test]
async fn test_duplicate_registration_rejected() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    let payload = json!({ "username": "test@example.com", "password": "password123" });

    let first = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(&payload)
        .send_request(&app)
        .await;
    assert_eq!(first.status(), 200);

    let second = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(&payload)
        .send_request(&app)
        .await;
    assert_eq!(second.status(), 400);
}

#[actix_web::test]
async fn test_empty_credentials_rejected() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    let response = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({ "username": "", "password": "" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn test_protected_route_requires_token() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    // No token at all
    let response = test::TestRequest::get()
        .uri("/api/meeting/")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);

    // Raw token without the Bearer scheme is rejected too
    test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({ "username": "test@example.com", "password": "password123" }))
        .send_request(&app)
        .await;
    let login_response = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({ "username": "test@example.com", "password": "password123" }))
        .send_request(&app)
        .await;
    let login_body: serde_json::Value = test::read_body_json(login_response).await;
    let token = login_body["token"].as_str().unwrap().to_string();

    let response = test::TestRequest::get()
        .uri("/api/meeting/")
        .insert_header(("Authorization", token.clone()))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);

    // With the proper scheme the request goes through
    let response = test::TestRequest::get()
        .uri("/api/meeting/")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
}

#[actix_web::test]
async fn test_foreign_secret_token_rejected() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    // A token signed under a different secret never verifies here.
    let foreign_gate = AuthGate::new("some_other_secret", 24).unwrap();
    let token = foreign_gate.issue(Uuid::new_v4()).unwrap();

    let response = test::TestRequest::get()
        .uri("/api/meeting/")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"]["message"], "authentication failed");
}

#[actix_web::test]
async fn test_tampered_token_rejected() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(json!({ "username": "test@example.com", "password": "password123" }))
        .send_request(&app)
        .await;
    let login_response = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({ "username": "test@example.com", "password": "password123" }))
        .send_request(&app)
        .await;
    let login_body: serde_json::Value = test::read_body_json(login_response).await;
    let token = login_body["token"].as_str().unwrap();

    let mut tampered = token.to_string().into_bytes();
    let idx = tampered.len() / 2;
    tampered[idx] = if tampered[idx] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = test::TestRequest::get()
        .uri("/api/meeting/")
        .insert_header(("Authorization", format!("Bearer {}", tampered)))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);
}
