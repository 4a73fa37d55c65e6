use actix_web::{test, App};
use chrono::DateTime;

mod common;

#[actix_web::test]
async fn test_health_check() {
    let state = common::test_state();
    let app = test::init_service(
        App::new().app_data(state.clone()).configure(crm_server::routes),
    )
    .await;

    let response = test::TestRequest::get()
        .uri("/health")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "healthy");

    // Timestamp is well-formed RFC 3339
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}
