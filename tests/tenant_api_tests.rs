mod test_utils;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use marketplace::models::{service, tenant_location};
use marketplace::repositories::{NewService, ServiceRepository, TenantLocationRepository};
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde_json::{Value, json};
use test_utils::{create_test_tenant, setup_test_app};
use tower::ServiceExt;
use uuid::Uuid;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, headers, json)
}

fn green_thumb() -> Value {
    json!({
        "name": "Green Thumb Landscaping",
        "description": "Expert landscaping and lawn care services.",
        "user_id": "42",
        "contact_email": "greenthumb@example.com",
        "phone_number": "123-456-7890"
    })
}

#[tokio::test]
async fn create_returns_201_with_location() {
    let (app, _db) = setup_test_app().await.unwrap();

    let (status, headers, body) = send(&app, "POST", "/api/v1/tenants", Some(green_thumb())).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap();
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        &format!("/api/v1/tenants/{id}")
    );
    assert_eq!(body["data"]["name"], "Green Thumb Landscaping");
    assert_eq!(body["data"]["phone_number"], "123-456-7890");

    let trace_id = headers.get("x-trace-id").unwrap().to_str().unwrap();
    assert_eq!(body["meta"]["request_id"], trace_id);
}

#[tokio::test]
async fn retrieve_and_list() {
    let (app, _db) = setup_test_app().await.unwrap();

    let (_, _, created) = send(&app, "POST", "/api/v1/tenants", Some(green_thumb())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let mut second = green_thumb();
    second["name"] = json!("QuickMove Services");
    send(&app, "POST", "/api/v1/tenants", Some(second)).await;

    let (status, _, body) = send(&app, "GET", &format!("/api/v1/tenants/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["contact_email"], "greenthumb@example.com");

    let (status, _, body) = send(&app, "GET", "/api/v1/tenants", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Green Thumb Landscaping"));
    assert!(names.contains(&"QuickMove Services"));
}

#[tokio::test]
async fn put_replaces_all_fields() {
    let (app, _db) = setup_test_app().await.unwrap();
    let (_, _, created) = send(&app, "POST", "/api/v1/tenants", Some(green_thumb())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let replacement = json!({
        "name": "Green Thumb Gardens",
        "description": "Gardens only.",
        "user_id": "43",
        "contact_email": "gardens@example.com"
    });
    let (status, _, body) = send(&app, "PUT", &format!("/api/v1/tenants/{id}"), Some(replacement)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Green Thumb Gardens");
    assert_eq!(body["data"]["user_id"], "43");
    assert_eq!(body["data"]["phone_number"], Value::Null);

    let incomplete = json!({ "name": "Only a name" });
    let (status, _, body) = send(&app, "PUT", &format!("/api/v1/tenants/{id}"), Some(incomplete)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn patch_changes_only_given_fields() {
    let (app, _db) = setup_test_app().await.unwrap();
    let (_, _, created) = send(&app, "POST", "/api/v1/tenants", Some(green_thumb())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/tenants/{id}"),
        Some(json!({ "description": "Lawns and hedges." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Lawns and hedges.");
    assert_eq!(body["data"]["name"], "Green Thumb Landscaping");
    assert_eq!(body["data"]["phone_number"], "123-456-7890");

    let (_, _, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/tenants/{id}"),
        Some(json!({ "phone_number": null })),
    )
    .await;
    assert_eq!(body["data"]["phone_number"], Value::Null);
    assert_eq!(body["data"]["description"], "Lawns and hedges.");
}

#[tokio::test]
async fn delete_cascades_and_then_404s() {
    let (app, db) = setup_test_app().await.unwrap();
    let tenant = create_test_tenant(&db, "Style Studio Salon").await.unwrap();
    TenantLocationRepository::new(&db)
        .create_location(tenant.id, Uuid::new_v4())
        .await
        .unwrap();
    ServiceRepository::new(&db)
        .create_service(tenant.id, NewService::new("Haircut", Decimal::new(3000, 2)))
        .await
        .unwrap();

    let (status, _, body) = send(&app, "DELETE", &format!("/api/v1/tenants/{}", tenant.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    assert!(tenant_location::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(service::Entity::find().all(&db).await.unwrap().is_empty());

    let (status, _, body) = send(&app, "GET", &format!("/api/v1/tenants/{}", tenant.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TENANT_NOT_FOUND");

    let (status, _, _) = send(&app, "DELETE", &format!("/api/v1/tenants/{}", tenant.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let (app, _db) = setup_test_app().await.unwrap();

    let mut bad_email = green_thumb();
    bad_email["contact_email"] = json!("not-an-email");
    let (status, headers, body) = send(&app, "POST", "/api/v1/tenants", Some(bad_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "contact_email");
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(
        body["trace_id"],
        headers.get("x-trace-id").unwrap().to_str().unwrap()
    );

    let mut blank_name = green_thumb();
    blank_name["name"] = json!("   ");
    let (status, _, body) = send(&app, "POST", "/api/v1/tenants", Some(blank_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "name");

    let (status, _, body) = send(&app, "GET", "/api/v1/tenants/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, _, _) = send(&app, "GET", "/api/v1/tenants", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _db) = setup_test_app().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tenants")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn incoming_trace_id_is_echoed() {
    let (app, _db) = setup_test_app().await.unwrap();

    let request = Request::builder()
        .uri("/api/v1/tenants")
        .header("x-trace-id", "trace-from-client")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-trace-id").unwrap(),
        "trace-from-client"
    );
}

#[tokio::test]
async fn root_health_and_openapi() {
    let (app, _db) = setup_test_app().await.unwrap();

    let (status, _, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "services-marketplace");

    let (status, _, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, body) = send(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/tenants/{id}"].is_object());
}

#[tokio::test]
async fn healthz_reports_unavailable_database() {
    let (app, db) = setup_test_app().await.unwrap();
    db.close().await.unwrap();

    let (status, headers, body) = send(&app, "GET", "/healthz", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(body["message"], "Database is unavailable");
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
}
