mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use axum_helpers::{JwtAuth, JwtConfig, jwt_auth_middleware};
use common::InMemoryEventRepository;
use domain_events::EventService;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-secret-key-at-least-32-chars";

struct TestApp {
    router: Router,
    jwt: JwtAuth,
}

impl TestApp {
    fn new() -> Self {
        let jwt = JwtAuth::new(&JwtConfig::new(SECRET));
        let router = domain_events::router(EventService::new(InMemoryEventRepository::new()))
            .layer(middleware::from_fn_with_state(jwt.clone(), jwt_auth_middleware));
        Self { router, jwt }
    }

    fn token(&self, user_id: Uuid, email: &str) -> String {
        self.jwt.issue_token(user_id, "tester", email).unwrap()
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

async fn create_weekly(app: &TestApp, token: &str, start: &str) -> Value {
    let (status, body) = app
        .call(
            "POST",
            "/",
            Some(token),
            Some(json!({
                "title": "Weekly 1:1",
                "startTime": start,
                "participants": ["Bob@Example.com"],
                "recurrence": { "type": "weekly", "interval": 1 }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["event"].clone()
}

#[tokio::test]
async fn rejects_requests_without_valid_token() {
    let app = TestApp::new();

    let (status, body) = app.call("GET", "/myevents", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");

    let (status, body) = app.call("GET", "/myevents", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn create_returns_event_with_server_side_series_key() {
    let app = TestApp::new();
    let ada = Uuid::now_v7();
    let token = app.token(ada, "ada@example.com");

    let (status, body) = app
        .call(
            "POST",
            "/",
            Some(&token),
            Some(json!({
                "title": "Weekly 1:1",
                "startTime": "2025-03-03T10:00:00Z",
                "seriesId": "chosen-by-client",
                "recurrence": { "type": "weekly", "interval": 1 }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Event created successfully");
    let event = &body["event"];
    assert_eq!(event["creatorId"], ada.to_string());
    assert_eq!(event["recurrence"]["type"], "weekly");
    let series_id = event["seriesId"].as_str().unwrap();
    assert_eq!(series_id.len(), 36);
    assert_ne!(series_id, "chosen-by-client");
    assert_ne!(series_id, event["id"].as_str().unwrap());
}

#[tokio::test]
async fn create_validation_messages() {
    let app = TestApp::new();
    let token = app.token(Uuid::now_v7(), "ada@example.com");

    let (status, body) = app
        .call("POST", "/", Some(&token), Some(json!({ "title": "No start" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and startTime are required fields.");

    let (status, body) = app
        .call(
            "POST",
            "/",
            Some(&token),
            Some(json!({
                "title": "Yearly review",
                "startTime": "2025-03-03T10:00:00Z",
                "recurrence": { "type": "yearly" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid recurrence type. Must be one of: none, daily, weekly, monthly."
    );
}

#[tokio::test]
async fn participant_can_list_and_read_but_not_mutate() {
    let app = TestApp::new();
    let ada_token = app.token(Uuid::now_v7(), "ada@example.com");
    let bob_token = app.token(Uuid::now_v7(), "bob@example.com");

    let event = create_weekly(&app, &ada_token, "2025-03-03T10:00:00Z").await;
    let uri = format!("/{}", event["id"].as_str().unwrap());

    let (status, body) = app.call("GET", "/myevents", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Events retrieved successfully");
    assert_eq!(body["events"].as_array().unwrap().len(), 1);

    let (status, _) = app.call("GET", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            "PUT",
            &uri,
            Some(&bob_token),
            Some(json!({ "title": "Mine now", "updateScope": "allEvents" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not authorized to update this event.");

    let (status, body) = app.call("DELETE", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not authorized to delete this event.");
}

#[tokio::test]
async fn update_reports_scope_and_count() {
    let app = TestApp::new();
    let token = app.token(Uuid::now_v7(), "ada@example.com");
    let event = create_weekly(&app, &token, "2025-03-03T10:00:00Z").await;
    let uri = format!("/{}", event["id"].as_str().unwrap());

    let (status, body) = app
        .call(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "description": "agenda in doc", "updateScope": "allEvents" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All events in the series updated successfully.");
    assert_eq!(body["scope"], "allEvents");
    assert_eq!(body["affected"], 1);

    let (_, body) = app.call("GET", &uri, Some(&token), None).await;
    assert_eq!(body["description"], "agenda in doc");
    assert_eq!(body["seriesId"], event["seriesId"]);
}

#[tokio::test]
async fn delete_scope_from_query_and_repeat_is_not_found() {
    let app = TestApp::new();
    let token = app.token(Uuid::now_v7(), "ada@example.com");
    let event = create_weekly(&app, &token, "2025-03-03T10:00:00Z").await;
    let id = event["id"].as_str().unwrap();

    let (status, body) = app
        .call("DELETE", &format!("/{id}?deleteScope=allEvents"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scope"], "allEvents");
    assert_eq!(body["message"], "All events in the series deleted successfully.");

    let (status, body) = app
        .call("DELETE", &format!("/{id}?deleteScope=allEvents"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found.");
}

#[tokio::test]
async fn delete_body_scope_wins_over_query() {
    let app = TestApp::new();
    let token = app.token(Uuid::now_v7(), "ada@example.com");
    let event = create_weekly(&app, &token, "2025-03-03T10:00:00Z").await;
    let id = event["id"].as_str().unwrap();

    let (status, body) = app
        .call(
            "DELETE",
            &format!("/{id}?deleteScope=allEvents"),
            Some(&token),
            Some(json!({ "deleteScope": "thisEvent" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scope"], "thisEvent");
    assert_eq!(body["message"], "Event deleted successfully.");
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = TestApp::new();
    let token = app.token(Uuid::now_v7(), "ada@example.com");

    let (status, body) = app.call("GET", "/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_UUID");
}

#[tokio::test]
async fn missing_event_is_not_found() {
    let app = TestApp::new();
    let token = app.token(Uuid::now_v7(), "ada@example.com");

    let (status, body) = app
        .call("PUT", &format!("/{}", Uuid::now_v7()), Some(&token), Some(json!({ "title": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}
