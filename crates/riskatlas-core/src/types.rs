//! Wire types served by the RiskAtlas REST API.
//!
//! Optional fields default the same way the backend defaults them so that a
//! sparse payload still deserializes.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Geographic position of a country's marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Backend risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
            RiskLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a risk score over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    #[serde(other)]
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts a trend that may be `null`, treating it as stable.
fn trend_or_stable<'de, D>(deserializer: D) -> Result<Trend, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Trend>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a list that may be `null`, treating it as empty.
fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Policy alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Country summary as listed by `GET /countries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166 alpha-2 code
    pub id: String,
    pub name: String,
    pub risk_score: i32,
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "trend_or_stable")]
    pub risk_trend: Trend,
    pub tariff_percentage: f64,
    pub coordinates: Coordinates,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub key_industries: Vec<String>,
    #[serde(default)]
    pub supply_chain_risk: Option<String>,
    #[serde(default)]
    pub friend_shore_score: Option<i32>,
}

impl Country {
    /// True when the supply-chain badge should render as a warning.
    pub fn supply_chain_flagged(&self) -> bool {
        matches!(
            self.supply_chain_risk.as_deref(),
            Some("High") | Some("Critical")
        )
    }
}

/// News headline attached to a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub impact: Option<String>,
}

/// One forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub score: i32,
    #[serde(default, deserialize_with = "trend_or_stable")]
    pub trend: Trend,
    pub confidence: i32,
}

/// Forecast horizons in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastHorizon {
    ThreeMonth,
    SixMonth,
    TwelveMonth,
}

impl ForecastHorizon {
    pub const ALL: [ForecastHorizon; 3] = [
        ForecastHorizon::ThreeMonth,
        ForecastHorizon::SixMonth,
        ForecastHorizon::TwelveMonth,
    ];

    /// Key used in the `ai_forecast` object.
    pub fn key(&self) -> &'static str {
        match self {
            ForecastHorizon::ThreeMonth => "3_month",
            ForecastHorizon::SixMonth => "6_month",
            ForecastHorizon::TwelveMonth => "12_month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ForecastHorizon::ThreeMonth => "3 Months",
            ForecastHorizon::SixMonth => "6 Months",
            ForecastHorizon::TwelveMonth => "12 Months",
        }
    }

    pub fn timeframe(&self) -> &'static str {
        match self {
            ForecastHorizon::ThreeMonth => "Short-term",
            ForecastHorizon::SixMonth => "Medium-term",
            ForecastHorizon::TwelveMonth => "Long-term",
        }
    }
}

/// Full country record served by `GET /country/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetail {
    #[serde(flatten)]
    pub country: Country,
    #[serde(default)]
    pub trade_policy_summary: String,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub headlines: Vec<Headline>,
    #[serde(default)]
    pub ai_forecast: Option<BTreeMap<String, Forecast>>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub alternative_to: Vec<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub alternatives: Vec<String>,
}

impl CountryDetail {
    pub fn forecast(&self, horizon: ForecastHorizon) -> Option<&Forecast> {
        self.ai_forecast.as_ref()?.get(horizon.key())
    }

    /// True when at least one horizon is present.
    pub fn has_forecast(&self) -> bool {
        ForecastHorizon::ALL
            .iter()
            .any(|h| self.forecast(*h).is_some())
    }
}

/// Trade policy alert served by `GET /policy-alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyAlert {
    pub id: i64,
    pub title: String,
    pub country: String,
    pub category: String,
    pub impact: Impact,
    pub date: String,
    pub description: String,
    #[serde(default)]
    pub affected_industries: Vec<String>,
}

/// Industry vulnerability card served by `GET /supply-chain/{industry}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainInfo {
    pub industry: String,
    pub risk_level: String,
    pub concentration_risk: String,
    #[serde(default)]
    pub top_suppliers: Vec<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<String>,
    pub alternatives_available: bool,
}

/// Friend-shoring recommendation served by `GET /alternative-suppliers/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSupplier {
    pub country_id: String,
    pub country_name: String,
    pub risk_score: i32,
    pub friend_shore_score: i32,
    pub tariff_percentage: f64,
    #[serde(default)]
    pub key_industries: Vec<String>,
    pub suitability_score: i32,
    pub reason: String,
}

/// Body of `POST /simulate-cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSimulationRequest {
    pub base_cost: f64,
    pub tariff_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

/// Forward-looking part of a cost simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPrediction {
    #[serde(default)]
    pub predicted_risk_3m: Option<i32>,
    #[serde(default)]
    pub predicted_risk_6m: Option<i32>,
    #[serde(default)]
    pub predicted_risk_12m: Option<i32>,
    #[serde(default)]
    pub confidence: Option<i32>,
    #[serde(default, deserialize_with = "trend_or_stable")]
    pub trend: Trend,
    pub estimated_future_tariff: f64,
}

/// Response of `POST /simulate-cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSimulationResponse {
    pub base_cost: f64,
    pub tariff_percentage: f64,
    pub tariff_amount: f64,
    pub final_cost: f64,
    #[serde(default)]
    pub risk_adjustment: Option<f64>,
    #[serde(default)]
    pub supply_chain_premium: Option<f64>,
    #[serde(default)]
    pub ai_prediction: Option<AiPrediction>,
}

impl CostSimulationResponse {
    /// Risk premium, only when it actually adds cost.
    pub fn risk_premium(&self) -> Option<f64> {
        self.risk_adjustment.filter(|v| *v > 0.0)
    }

    /// Supply-chain premium, only when it actually adds cost.
    pub fn supply_chain_premium(&self) -> Option<f64> {
        self.supply_chain_premium.filter(|v| *v > 0.0)
    }
}

/// Headline numbers served by `GET /dashboard-metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_countries_monitored: u32,
    pub high_risk_countries: u32,
    pub policy_alerts_this_week: u32,
    pub avg_global_risk: f64,
    #[serde(default, deserialize_with = "trend_or_stable")]
    pub top_risk_trend: Trend,
    pub supply_chain_alerts: u32,
}

/// Response of `GET /industries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryCatalog {
    #[serde(default)]
    pub industries: Vec<String>,
    /// Industries that have a `/supply-chain/{industry}` record
    #[serde(default)]
    pub supply_chain_data: Vec<String>,
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior turn sent as conversation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vietnam_detail() -> serde_json::Value {
        json!({
            "id": "VN",
            "name": "Vietnam",
            "risk_score": 38,
            "risk_level": "Low",
            "risk_trend": "decreasing",
            "tariff_percentage": 8.5,
            "coordinates": {"lat": 14.06, "lng": 108.28},
            "key_industries": ["Electronics", "Textiles"],
            "supply_chain_risk": "Low",
            "friend_shore_score": 78,
            "trade_policy_summary": "Manufacturing alternative to China.",
            "headlines": [
                {"title": "Samsung expands plant", "source": "Reuters", "date": "2025-01-10",
                 "category": "Investment", "impact": "high"},
                {"title": "New FTA round", "source": "VnExpress", "date": "2025-01-08",
                 "category": "Agreement"}
            ],
            "ai_forecast": {
                "3_month": {"score": 36, "trend": "decreasing", "confidence": 84},
                "12_month": {"score": 33, "trend": "decreasing", "confidence": 65}
            },
            "alternative_to": ["CN"],
            "alternatives": []
        })
    }

    #[test]
    fn test_country_defaults_for_sparse_payload() {
        let country: Country = serde_json::from_value(json!({
            "id": "KE",
            "name": "Kenya",
            "risk_score": 52,
            "risk_level": "Medium",
            "tariff_percentage": 12.0,
            "coordinates": {"lat": -0.02, "lng": 37.9},
            "key_industries": null
        }))
        .unwrap();

        assert_eq!(country.risk_trend, Trend::Stable);
        assert!(country.key_industries.is_empty());
        assert_eq!(country.supply_chain_risk, None);
        assert_eq!(country.friend_shore_score, None);
        assert!(!country.supply_chain_flagged());
    }

    #[test]
    fn test_unknown_enums_fall_back() {
        let country: Country = serde_json::from_value(json!({
            "id": "XX",
            "name": "Nowhere",
            "risk_score": 1,
            "risk_level": "Extreme",
            "risk_trend": "sideways",
            "tariff_percentage": 0.0,
            "coordinates": {"lat": 0.0, "lng": 0.0}
        }))
        .unwrap();

        assert_eq!(country.risk_level, RiskLevel::Unknown);
        assert_eq!(country.risk_trend, Trend::Stable);
    }

    #[test]
    fn test_country_detail_flatten_and_forecast_lookup() {
        let detail: CountryDetail = serde_json::from_value(vietnam_detail()).unwrap();

        assert_eq!(detail.country.id, "VN");
        assert_eq!(detail.country.risk_trend, Trend::Decreasing);
        assert_eq!(detail.headlines.len(), 2);
        assert_eq!(detail.headlines[0].impact.as_deref(), Some("high"));
        assert_eq!(detail.headlines[1].impact, None);

        let short = detail.forecast(ForecastHorizon::ThreeMonth).unwrap();
        assert_eq!(short.score, 36);
        assert_eq!(short.confidence, 84);
        assert!(detail.forecast(ForecastHorizon::SixMonth).is_none());
        assert!(detail.has_forecast());
        assert_eq!(detail.alternative_to, vec!["CN".to_string()]);
    }

    #[test]
    fn test_country_detail_without_forecast() {
        let mut value = vietnam_detail();
        value["ai_forecast"] = json!({});
        let detail: CountryDetail = serde_json::from_value(value).unwrap();
        assert!(!detail.has_forecast());

        let mut value = vietnam_detail();
        value.as_object_mut().unwrap().remove("ai_forecast");
        let detail: CountryDetail = serde_json::from_value(value).unwrap();
        assert!(detail.ai_forecast.is_none());
        assert!(!detail.has_forecast());
    }

    #[test]
    fn test_policy_alert_impact_casing() {
        let alert: PolicyAlert = serde_json::from_value(json!({
            "id": 7,
            "title": "Chip export controls",
            "country": "US",
            "category": "Export Control",
            "impact": "high",
            "date": "2025-01-12",
            "description": "Entity list expanded.",
            "affected_industries": ["Semiconductors"]
        }))
        .unwrap();
        assert_eq!(alert.impact, Impact::High);
        assert_eq!(alert.impact.to_string(), "High");
    }

    #[test]
    fn test_cost_request_omits_absent_options() {
        let request = CostSimulationRequest {
            base_cost: 1000.0,
            tariff_percentage: 25.0,
            country_id: Some("CN".to_string()),
            industry: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"base_cost": 1000.0, "tariff_percentage": 25.0, "country_id": "CN"})
        );
    }

    #[test]
    fn test_cost_response_premiums() {
        let response: CostSimulationResponse = serde_json::from_value(json!({
            "base_cost": 1000.0,
            "tariff_percentage": 25.0,
            "tariff_amount": 250.0,
            "final_cost": 1300.0,
            "risk_adjustment": 50.0,
            "supply_chain_premium": 0.0,
            "ai_prediction": {
                "predicted_risk_3m": 80,
                "predicted_risk_6m": 82,
                "predicted_risk_12m": null,
                "confidence": 78,
                "trend": "increasing",
                "estimated_future_tariff": 26.25
            }
        }))
        .unwrap();

        assert_eq!(response.risk_premium(), Some(50.0));
        assert_eq!(response.supply_chain_premium(), None);
        let prediction = response.ai_prediction.unwrap();
        assert_eq!(prediction.trend, Trend::Increasing);
        assert_eq!(prediction.predicted_risk_12m, None);
    }

    #[test]
    fn test_dashboard_metrics() {
        let metrics: DashboardMetrics = serde_json::from_value(json!({
            "total_countries_monitored": 66,
            "high_risk_countries": 9,
            "policy_alerts_this_week": 24,
            "avg_global_risk": 47.3,
            "top_risk_trend": "increasing",
            "supply_chain_alerts": 4
        }))
        .unwrap();
        assert_eq!(metrics.top_risk_trend, Trend::Increasing);
        assert_eq!(metrics.avg_global_risk, 47.3);
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            message: "Which countries are critical?".to_string(),
            country_id: None,
            history: vec![ChatTurn {
                role: ChatRole::User,
                content: "hi".to_string(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "message": "Which countries are critical?",
                "history": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus =
            serde_json::from_value(json!({"status": "healthy", "version": "2.0.0"})).unwrap();
        assert!(health.is_healthy());

        let health: HealthStatus = serde_json::from_value(json!({"status": "degraded"})).unwrap();
        assert!(!health.is_healthy());
    }
}
