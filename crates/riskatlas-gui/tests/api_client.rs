//! Integration tests for the REST client
//!
//! Each test starts an in-process axum backend on an ephemeral port and drives
//! `ApiClient` against it over real HTTP.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use riskatlas_core::types::{ChatRequest, ChatTurn, ChatRole, CostSimulationRequest, Impact, Trend};
use riskatlas_gui::ApiClient;
use serde_json::{json, Value};
use std::collections::HashMap;

// ============================================================================
// Mock backend
// ============================================================================

fn country_json(id: &str, name: &str, risk_score: i32, risk_level: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "risk_score": risk_score,
        "risk_level": risk_level,
        "risk_trend": "increasing",
        "tariff_percentage": 25.0,
        "coordinates": {"lat": 35.0, "lng": 105.0},
        "key_industries": ["Electronics", "Steel"],
        "supply_chain_risk": "High",
        "friend_shore_score": 20
    })
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "version": "1.0.0"}))
}

async fn dashboard_metrics() -> Json<Value> {
    Json(json!({
        "total_countries_monitored": 42,
        "high_risk_countries": 7,
        "policy_alerts_this_week": 13,
        "avg_global_risk": 47.25,
        "top_risk_trend": "increasing",
        "supply_chain_alerts": 5
    }))
}

async fn countries(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let all = vec![
        country_json("CN", "China", 78, "High"),
        country_json("MX", "Mexico", 48, "Medium"),
    ];
    let filtered: Vec<Value> = all
        .into_iter()
        .filter(|c| match params.get("risk_level") {
            Some(level) => c["risk_level"] == json!(level),
            None => true,
        })
        .collect();
    Json(Value::Array(filtered))
}

async fn country(Path(id): Path<String>) -> Result<Json<Value>, (StatusCode, String)> {
    if id != "CN" {
        return Err((StatusCode::NOT_FOUND, "Country not found".to_string()));
    }
    let mut detail = country_json("CN", "China", 78, "High");
    detail["trade_policy_summary"] = json!("Export controls on advanced semiconductors");
    detail["headlines"] = json!([{
        "title": "New chip export rules",
        "source": "Reuters",
        "date": "2024-05-01",
        "category": "Export Control",
        "impact": "High"
    }]);
    detail["ai_forecast"] = json!({
        "3_month": {"score": 80, "trend": "increasing", "confidence": 85},
        "12_month": {"score": 74, "trend": "decreasing", "confidence": 60}
    });
    Ok(Json(detail))
}

/// Echoes the received filters back in the alert title.
async fn policy_alerts(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let mut keys: Vec<_> = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    keys.sort();
    Json(json!([{
        "id": 1,
        "title": keys.join("&"),
        "country": params.get("country").cloned().unwrap_or_else(|| "GLOBAL".to_string()),
        "category": "Tariff",
        "impact": "Medium",
        "date": "2024-05-02",
        "description": "Tariff schedule revised",
        "affected_industries": ["Steel", "Aluminium", "Autos", "Solar"]
    }]))
}

async fn supply_chain(Path(industry): Path<String>) -> Json<Value> {
    Json(json!({
        "industry": industry,
        "risk_level": "High",
        "concentration_risk": "Critical",
        "top_suppliers": ["CN", "KR"],
        "vulnerabilities": ["Single-source rare earths"],
        "alternatives_available": false
    }))
}

async fn industries() -> Json<Value> {
    Json(json!({
        "industries": ["Electronics", "Raw Materials"],
        "supply_chain_data": ["Semiconductors"]
    }))
}

async fn alternative_suppliers(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json(json!([{
        "country_id": "VN",
        "country_name": "Vietnam",
        "risk_score": 35,
        "friend_shore_score": 70,
        "tariff_percentage": 5.0,
        "key_industries": ["Electronics"],
        "suitability_score": 88,
        "reason": format!(
            "Replaces {} for {}",
            id,
            params.get("industry").map(String::as_str).unwrap_or("all industries")
        )
    }]))
}

async fn simulate_cost(Json(request): Json<CostSimulationRequest>) -> Json<Value> {
    let tariff_amount = request.base_cost * request.tariff_percentage / 100.0;
    let with_prediction = request.country_id.is_some();
    let mut body = json!({
        "base_cost": request.base_cost,
        "tariff_percentage": request.tariff_percentage,
        "tariff_amount": tariff_amount,
        "final_cost": request.base_cost + tariff_amount,
        "risk_adjustment": 0.0
    });
    if with_prediction {
        body["ai_prediction"] = json!({
            "predicted_risk_6m": 82,
            "confidence": 70,
            "trend": "increasing",
            "estimated_future_tariff": 30.0
        });
    }
    Json(body)
}

async fn chat(Json(request): Json<ChatRequest>) -> Json<Value> {
    Json(json!({
        "reply": format!(
            "**{}** ({} prior turns, country {})",
            request.message,
            request.history.len(),
            request.country_id.as_deref().unwrap_or("none")
        )
    }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database offline")
}

fn routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dashboard-metrics", get(dashboard_metrics))
        .route("/countries", get(countries))
        .route("/country/{id}", get(country))
        .route("/policy-alerts", get(policy_alerts))
        .route("/supply-chain/{industry}", get(supply_chain))
        .route("/industries", get(industries))
        .route("/alternative-suppliers/{id}", get(alternative_suppliers))
        .route("/simulate-cost", post(simulate_cost))
        .route("/chat", post(chat))
}

/// Starts `app` on an ephemeral port and returns its base URL.
async fn start_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend failed");
    });
    format!("http://{}", addr)
}

async fn client() -> ApiClient {
    let base_url = start_backend(routes()).await;
    ApiClient::new(&base_url).expect("Failed to create client")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_health_and_metrics() {
    let api = client().await;

    let health = api.health_check().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.version.as_deref(), Some("1.0.0"));

    let metrics = api.get_dashboard_metrics().await.unwrap();
    assert_eq!(metrics.total_countries_monitored, 42);
    assert_eq!(metrics.avg_global_risk, 47.25);
    assert_eq!(metrics.top_risk_trend, Trend::Increasing);
}

#[tokio::test]
async fn test_countries_with_and_without_filter() {
    let api = client().await;

    let all = api.get_countries(None, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "CN");
    assert_eq!(all[0].friend_shore_score, Some(20));

    let medium = api.get_countries(None, Some("Medium")).await.unwrap();
    assert_eq!(medium.len(), 1);
    assert_eq!(medium[0].name, "Mexico");
}

#[tokio::test]
async fn test_country_detail() {
    let api = client().await;

    let detail = api.get_country("CN").await.unwrap();
    assert_eq!(detail.country.name, "China");
    assert_eq!(detail.headlines.len(), 1);
    assert!(detail.has_forecast());
    assert_eq!(detail.ai_forecast.as_ref().map(|f| f.len()), Some(2));
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let api = client().await;

    let error = api.get_country("XX").await.unwrap_err();
    let message = format!("{:#}", error);
    assert!(message.contains("404"), "unexpected error: {}", message);
    assert!(message.contains("Country not found"), "unexpected error: {}", message);
}

#[tokio::test]
async fn test_server_error_reported() {
    let base_url = start_backend(Router::new().route("/health", get(broken))).await;
    let api = ApiClient::new(&base_url).unwrap();

    let message = format!("{:#}", api.health_check().await.unwrap_err());
    assert!(message.contains("500"), "unexpected error: {}", message);
    assert!(message.contains("database offline"), "unexpected error: {}", message);
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(&format!("http://{}", addr)).unwrap();
    assert!(api.get_countries(None, None).await.is_err());
}

#[tokio::test]
async fn test_policy_alert_filters_sent_as_query() {
    let api = client().await;

    let unfiltered = api.get_policy_alerts(None, None, None).await.unwrap();
    assert_eq!(unfiltered[0].title, "");
    assert_eq!(unfiltered[0].country, "GLOBAL");

    let filtered = api
        .get_policy_alerts(Some("CN"), Some("Export Control"), Some("High"))
        .await
        .unwrap();
    assert_eq!(
        filtered[0].title,
        "category=Export Control&country=CN&impact=High"
    );
    assert_eq!(filtered[0].impact, Impact::Medium);
    assert_eq!(filtered[0].affected_industries.len(), 4);
}

#[tokio::test]
async fn test_path_segments_are_escaped() {
    let api = client().await;

    let info = api.get_supply_chain_info("Raw Materials").await.unwrap();
    assert_eq!(info.industry, "Raw Materials");
    assert!(!info.alternatives_available);

    let catalog = api.get_industries().await.unwrap();
    assert_eq!(catalog.supply_chain_data, vec!["Semiconductors".to_string()]);
}

#[tokio::test]
async fn test_alternative_suppliers() {
    let api = client().await;

    let suppliers = api.get_alternative_suppliers("CN", None).await.unwrap();
    assert_eq!(suppliers[0].country_id, "VN");
    assert_eq!(suppliers[0].reason, "Replaces CN for all industries");

    let suppliers = api
        .get_alternative_suppliers("CN", Some("Electronics"))
        .await
        .unwrap();
    assert_eq!(suppliers[0].reason, "Replaces CN for Electronics");
}

#[tokio::test]
async fn test_simulate_cost() {
    let api = client().await;

    let request = CostSimulationRequest {
        base_cost: 1000.0,
        tariff_percentage: 25.0,
        country_id: None,
        industry: None,
    };
    let result = api.simulate_cost(&request).await.unwrap();
    assert_eq!(result.tariff_amount, 250.0);
    assert_eq!(result.final_cost, 1250.0);
    assert_eq!(result.risk_premium(), None);
    assert!(result.ai_prediction.is_none());

    let request = CostSimulationRequest {
        country_id: Some("CN".to_string()),
        ..request
    };
    let result = api.simulate_cost(&request).await.unwrap();
    let prediction = result.ai_prediction.expect("prediction expected");
    assert_eq!(prediction.predicted_risk_6m, Some(82));
    assert_eq!(prediction.trend, Trend::Increasing);
}

#[tokio::test]
async fn test_chat_round_trip() {
    let api = client().await;

    let history = vec![
        ChatTurn {
            role: ChatRole::User,
            content: "Hi".to_string(),
        },
        ChatTurn {
            role: ChatRole::Assistant,
            content: "Hello".to_string(),
        },
    ];
    let reply = api
        .send_chat_message("What about China?", Some("CN"), history)
        .await
        .unwrap();
    assert_eq!(reply.reply, "**What about China?** (2 prior turns, country CN)");
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let base_url = start_backend(Router::new().nest("/api", routes())).await;

    for prefix in ["/api", "/api/"] {
        let api = ApiClient::new(&format!("{}{}", base_url, prefix)).unwrap();
        let health = api.health_check().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(api.base_url(), format!("{}/api", base_url));
    }
}
