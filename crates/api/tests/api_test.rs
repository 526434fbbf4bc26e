//! Router tests against the in-memory repository.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use fintrack_api::{AppState, create_router, generation::GenerationClient};
use fintrack_core::assistant::{AssistantError, ChatMessage};
use fintrack_db::{LedgerUnitOfWork, MemoryUserAggregateRepository};
use fintrack_shared::types::UserId;
use fintrack_shared::{JwtConfig, JwtService};

/// Generation client returning a canned reply.
struct StubGeneration {
    reply: Option<String>,
}

#[async_trait]
impl GenerationClient for StubGeneration {
    async fn generate(
        &self,
        _system_prompt: &str,
        _messages: &[ChatMessage],
    ) -> Result<String, AssistantError> {
        self.reply
            .clone()
            .ok_or_else(|| AssistantError::Unavailable("connection refused".to_string()))
    }
}

struct TestApp {
    router: Router,
    token: String,
}

impl TestApp {
    fn new(assistant_reply: Option<Option<&str>>) -> Self {
        let jwt_service = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-router-tests".to_string(),
            access_token_expires_minutes: 15,
        });
        let token = jwt_service.generate_access_token(UserId::new()).unwrap();

        let assistant = assistant_reply.map(|reply| {
            Arc::new(StubGeneration {
                reply: reply.map(str::to_string),
            }) as Arc<dyn GenerationClient>
        });

        let state = AppState {
            uow: LedgerUnitOfWork::new(Arc::new(MemoryUserAggregateRepository::new()), 3),
            jwt_service: Arc::new(jwt_service),
            assistant,
        };

        Self {
            router: create_router(state),
            token,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{uri}"))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn open_profile(&self, initial_balance: &str) {
        let (status, _) = self
            .send(
                Method::POST,
                "/profile",
                Some(json!({
                    "name": "Jordan",
                    "email": "Jordan@Example.com",
                    "initial_balance": initial_balance
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    async fn balance(&self) -> Decimal {
        let (_, profile) = self.send(Method::GET, "/profile", None).await;
        amount(&profile["current_balance"])
    }
}

fn amount(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn entry(entry_type: &str, category: &str, amount: &str, date: &str) -> Value {
    json!({
        "date": date,
        "type": entry_type,
        "category": category,
        "amount": amount,
        "title": format!("{category} entry"),
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new(Some(None));
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["assistant"], true);
}

#[rstest]
#[case::missing(None, "UNAUTHORIZED")]
#[case::wrong_scheme(Some("Basic dXNlcjpwYXNz"), "UNAUTHORIZED")]
#[case::garbage(Some("Bearer not-a-token"), "INVALID_TOKEN")]
#[tokio::test]
async fn test_protected_routes_need_token(
    #[case] authorization: Option<&str>,
    #[case] expected_code: &str,
) {
    let app = TestApp::new(None);
    let mut builder = Request::builder().uri("/api/v1/profile");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let response = app
        .router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], expected_code);
}

#[tokio::test]
async fn test_profile_lifecycle() {
    let app = TestApp::new(None);

    let (status, body) = app.send(Method::GET, "/profile", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    app.open_profile("250").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/profile",
            Some(json!({"name": "Jordan", "email": "jordan@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, profile) = app
        .send(Method::PATCH, "/profile", Some(json!({"name": "Jordan Lee"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Jordan Lee");
    assert_eq!(profile["email"], "jordan@example.com");
    assert_eq!(amount(&profile["current_balance"]), dec!(250));

    let (status, _) = app.send(Method::DELETE, "/profile", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::GET, "/profile", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auto_saving_scenario() {
    let app = TestApp::new(None);
    app.open_profile("1000").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/transactions",
            Some(entry("income", "salary", "500", "2026-02-01T09:00:00Z")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app.send(
        Method::POST,
        "/transactions",
        Some(entry("expense", "food", "200", "2026-02-02T12:00:00Z")),
    )
    .await;
    assert_eq!(app.balance().await, dec!(1300));

    let (status, _) = app
        .send(
            Method::POST,
            "/saving",
            Some(json!({
                "goal_name": "New laptop",
                "target_amount": "500",
                "target_date": "2026-12-31T00:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, goal) = app
        .send(
            Method::PUT,
            "/saving/auto-saving",
            Some(json!({"enabled": true, "percentage": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goal["is_auto_saving_enabled"], true);

    let (status, created) = app
        .send(
            Method::POST,
            "/transactions",
            Some(entry("income", "bonus", "300", "2026-02-03T09:00:00Z")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(amount(&created["entry"]["amount"]), dec!(300));
    assert_eq!(amount(&created["savings_transfer"]["amount"]), dec!(30));
    assert_eq!(created["savings_transfer"]["category"], "saving");
    assert_eq!(app.balance().await, dec!(1570));

    let (_, listed) = app.send(Method::GET, "/transactions", None).await;
    assert_eq!(listed["transactions"].as_array().unwrap().len(), 4);

    let transfer_id = created["savings_transfer"]["id"].as_str().unwrap().to_string();
    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/transactions/{transfer_id}"),
            Some(json!({"amount": "1"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let income_id = created["entry"]["id"].as_str().unwrap().to_string();
    let (status, removal) = app
        .send(Method::DELETE, &format!("/transactions/{income_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removal["savings_transfer"]["id"], transfer_id.as_str());
    assert_eq!(app.balance().await, dec!(1300));

    let (_, goal) = app.send(Method::GET, "/saving", None).await;
    assert_eq!(amount(&goal["current_amount"]), dec!(0));
    let (_, listed) = app.send(Method::GET, "/transactions", None).await;
    assert_eq!(listed["transactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_rejected_once_share_is_withdrawn() {
    let app = TestApp::new(None);
    app.open_profile("100").await;
    app.send(
        Method::POST,
        "/saving",
        Some(json!({
            "goal_name": "Camera",
            "target_amount": "400",
            "target_date": "2026-12-31T00:00:00Z"
        })),
    )
    .await;
    app.send(
        Method::PUT,
        "/saving/auto-saving",
        Some(json!({"enabled": true, "percentage": 10})),
    )
    .await;

    let (_, created) = app
        .send(
            Method::POST,
            "/transactions",
            Some(entry("income", "salary", "200", "2026-03-01T09:00:00Z")),
        )
        .await;
    let (status, _) = app
        .send(Method::POST, "/saving/withdraw", Some(json!({"amount": "20"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.balance().await, dec!(300));

    let income_id = created["entry"]["id"].as_str().unwrap().to_string();
    let (status, body) = app
        .send(Method::DELETE, &format!("/transactions/{income_id}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("withdrawn"));
    assert_eq!(app.balance().await, dec!(300));

    let (_, goal) = app.send(Method::GET, "/saving", None).await;
    assert_eq!(amount(&goal["current_amount"]), dec!(0));
}

#[tokio::test]
async fn test_tracked_goals_lifecycle() {
    let app = TestApp::new(None);
    app.open_profile("250").await;

    let (status, listed) = app.send(Method::GET, "/goals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    let (status, goal) = app
        .send(
            Method::POST,
            "/goals",
            Some(json!({
                "title": "  Road bike ",
                "description": "Replace the old commuter",
                "target_amount": "900",
                "saved_amount": "120",
                "deadline": "2026-09-01T00:00:00Z",
                "status": "ongoing"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["title"], "Road bike");
    let id = goal["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(
            Method::POST,
            "/goals",
            Some(json!({
                "title": "TV",
                "target_amount": "300",
                "saved_amount": "0",
                "deadline": "2026-09-01T00:00:00Z",
                "status": "ongoing"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");

    let (status, updated) = app
        .send(
            Method::PATCH,
            &format!("/goals/{id}"),
            Some(json!({"saved_amount": "900", "status": "achieved"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&updated["saved_amount"]), dec!(900));
    assert_eq!(updated["status"], "achieved");

    let (_, fetched) = app.send(Method::GET, &format!("/goals/{id}"), None).await;
    assert_eq!(fetched, updated);
    // Tracked goals never move money.
    assert_eq!(app.balance().await, dec!(250));

    let (status, _) = app.send(Method::DELETE, &format!("/goals/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = app.send(Method::GET, &format!("/goals/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    let (_, listed) = app.send(Method::GET, "/goals", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_deposit_checks_balance() {
    let app = TestApp::new(None);
    app.open_profile("50").await;
    app.send(
        Method::POST,
        "/saving",
        Some(json!({
            "goal_name": "Bike",
            "target_amount": "300",
            "target_date": "2026-12-31T00:00:00Z"
        })),
    )
    .await;

    let (status, body) = app
        .send(Method::POST, "/saving/deposit", Some(json!({"amount": "80"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INSUFFICIENT_BALANCE");

    let (status, movement) = app
        .send(Method::POST, "/saving/deposit", Some(json!({"amount": "20"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&movement["transferred"]), dec!(20));
    assert_eq!(app.balance().await, dec!(30));
}

#[tokio::test]
async fn test_budget_tracks_spend() {
    let app = TestApp::new(None);
    app.open_profile("1000").await;
    app.send(
        Method::POST,
        "/transactions",
        Some(entry("expense", "food", "42.50", "2026-03-03T12:00:00Z")),
    )
    .await;

    let (status, budget) = app
        .send(
            Method::POST,
            "/budget",
            Some(json!({
                "title": "March",
                "start_date": "2026-03-01T00:00:00Z",
                "deadline": "2026-03-31T23:59:59Z",
                "categories": {"food": "300", "transportation": "100"}
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(amount(&budget["limit_amount"]), dec!(400));
    assert_eq!(amount(&budget["categories"]["food"]["spent"]), dec!(42.50));

    app.send(
        Method::POST,
        "/transactions",
        Some(entry("expense", "food", "7.50", "2026-03-04T12:00:00Z")),
    )
    .await;
    let (_, budget) = app.send(Method::GET, "/budget", None).await;
    assert_eq!(amount(&budget["categories"]["food"]["spent"]), dec!(50.00));

    let (status, _) = app.send(Method::DELETE, "/budget", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::GET, "/budget", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_views() {
    let app = TestApp::new(None);
    app.open_profile("0").await;
    for (entry_type, category, amount, date) in [
        ("income", "salary", "900", "2025-12-20T09:00:00Z"),
        ("expense", "food", "15", "2026-01-10T12:30:00Z"),
        ("expense", "shopping", "60", "2026-02-14T18:45:00Z"),
    ] {
        app.send(
            Method::POST,
            "/transactions",
            Some(entry(entry_type, category, amount, date)),
        )
        .await;
    }

    let (_, years) = app.send(Method::GET, "/transactions/years", None).await;
    assert_eq!(years["years"], json!([2025, 2026]));

    let (status, chart) = app
        .send(Method::GET, "/transactions/chart?year=2026", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["months"].as_array().unwrap().len(), 12);
    assert_eq!(amount(&chart["months"][1]["expense"]), dec!(60));

    let (_, listed) = app
        .send(
            Method::GET,
            "/transactions?type=expense&sort_by=amount&order=asc",
            None,
        )
        .await;
    let amounts: Vec<&str> = listed["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_str().unwrap())
        .collect();
    assert_eq!(amounts, vec!["15", "60"]);

    let (status, csv) = app
        .send(
            Method::GET,
            "/transactions/export?from=2026-01-01T00:00:00Z",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let csv = csv.as_str().unwrap();
    assert!(csv.starts_with("date(ddmmyy-hhmm),type,category,title,transaction amount"));
    assert!(csv.contains("100126-1230,expense,food,food entry,15"));
    assert!(!csv.contains("salary"));
}

#[tokio::test]
async fn test_unknown_transaction() {
    let app = TestApp::new(None);
    app.open_profile("0").await;

    let (status, body) = app
        .send(
            Method::GET,
            "/transactions/0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

fn assistant_request(intent: &str) -> Value {
    json!({
        "intent": intent,
        "messages": [{"role": "user", "content": "Lunch was 12 dollars and I got paid 100"}]
    })
}

#[tokio::test]
async fn test_assistant_applies_reply() {
    let reply = r#"[
        {"date": "2026-03-05T12:00", "type": "expense", "category": "Food",
         "transactionAmount": 12, "title": "Lunch"},
        {"date": "2026-03-05T17:00", "type": "income", "category": "Income",
         "transactionAmount": 100, "title": "Paycheck"}
    ]"#;
    let app = TestApp::new(Some(Some(reply)));
    app.open_profile("10").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/assistant/transactions",
            Some(assistant_request("create")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcomes"].as_array().unwrap().len(), 2);
    assert_eq!(body["outcomes"][0]["action"], "created");
    assert_eq!(body["message"]["role"], "assistant");
    assert_eq!(app.balance().await, dec!(98));
}

#[tokio::test]
async fn test_assistant_rejects_bad_reply_atomically() {
    let reply = r#"[
        {"date": "2026-03-05T12:00", "type": "expense", "category": "food",
         "transactionAmount": 12, "title": "Lunch"},
        {"date": "yesterday", "type": "expense", "category": "food",
         "transactionAmount": 5, "title": "Snack"}
    ]"#;
    let app = TestApp::new(Some(Some(reply)));
    app.open_profile("10").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/assistant/transactions",
            Some(assistant_request("create")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(app.balance().await, dec!(10));
}

#[tokio::test]
async fn test_assistant_unavailable() {
    let app = TestApp::new(Some(None));
    app.open_profile("10").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/assistant/transactions",
            Some(assistant_request("delete")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "EXTERNAL_SERVICE_ERROR");

    let unconfigured = TestApp::new(None);
    unconfigured.open_profile("10").await;
    let (status, _) = unconfigured
        .send(
            Method::POST,
            "/assistant/transactions",
            Some(assistant_request("create")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
