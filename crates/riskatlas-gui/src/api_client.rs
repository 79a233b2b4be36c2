//! REST API client for the RiskAtlas backend.
//!
//! Every endpoint is a plain HTTP/JSON call. There is no caching and no retry;
//! callers surface failures and let the user retry.

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use riskatlas_core::types::{
    AlternativeSupplier, ChatReply, ChatRequest, ChatTurn, CostSimulationRequest,
    CostSimulationResponse, Country, CountryDetail, DashboardMetrics, HealthStatus,
    IndustryCatalog, PolicyAlert, SupplyChainInfo,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    /// Create a new API client with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new API client
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API base URL: {}", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, Option<&str>)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);

        let present: Vec<_> = query
            .iter()
            .filter_map(|(key, value)| value.map(|v| (*key, v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to fetch {} ({}): {}", what, status, error_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    async fn post_json<B, T>(&self, url: Url, body: &B, what: &str) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to {} ({}): {}", what, status, error_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    /// Backend health
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["health"], &[])?;
        self.get_json(url, "health status").await
    }

    /// Headline dashboard numbers
    pub async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics> {
        let url = self.endpoint(&["dashboard-metrics"], &[])?;
        self.get_json(url, "dashboard metrics").await
    }

    /// All monitored countries, optionally filtered
    pub async fn get_countries(
        &self,
        industry: Option<&str>,
        risk_level: Option<&str>,
    ) -> Result<Vec<Country>> {
        let url = self.endpoint(
            &["countries"],
            &[("industry", industry), ("risk_level", risk_level)],
        )?;
        self.get_json(url, "countries").await
    }

    /// Full record for one country
    pub async fn get_country(&self, id: &str) -> Result<CountryDetail> {
        let url = self.endpoint(&["country", id], &[])?;
        self.get_json(url, "country details").await
    }

    /// Policy alerts, optionally filtered
    pub async fn get_policy_alerts(
        &self,
        country: Option<&str>,
        category: Option<&str>,
        impact: Option<&str>,
    ) -> Result<Vec<PolicyAlert>> {
        let url = self.endpoint(
            &["policy-alerts"],
            &[
                ("country", country),
                ("category", category),
                ("impact", impact),
            ],
        )?;
        self.get_json(url, "policy alerts").await
    }

    /// Vulnerability card for one industry
    pub async fn get_supply_chain_info(&self, industry: &str) -> Result<SupplyChainInfo> {
        let url = self.endpoint(&["supply-chain", industry], &[])?;
        self.get_json(url, "supply chain info").await
    }

    /// Industry names
    pub async fn get_industries(&self) -> Result<IndustryCatalog> {
        let url = self.endpoint(&["industries"], &[])?;
        self.get_json(url, "industries").await
    }

    /// Friend-shoring alternatives to a country
    pub async fn get_alternative_suppliers(
        &self,
        country_id: &str,
        industry: Option<&str>,
    ) -> Result<Vec<AlternativeSupplier>> {
        let url = self.endpoint(
            &["alternative-suppliers", country_id],
            &[("industry", industry)],
        )?;
        self.get_json(url, "alternative suppliers").await
    }

    /// Tariff and risk cost breakdown
    pub async fn simulate_cost(
        &self,
        request: &CostSimulationRequest,
    ) -> Result<CostSimulationResponse> {
        let url = self.endpoint(&["simulate-cost"], &[])?;
        self.post_json(url, request, "simulate cost").await
    }

    /// Ask the assistant a question
    pub async fn send_chat_message(
        &self,
        message: &str,
        country_id: Option<&str>,
        history: Vec<ChatTurn>,
    ) -> Result<ChatReply> {
        let request = ChatRequest {
            message: message.to_string(),
            country_id: country_id.map(str::to_string),
            history,
        };
        self.send_chat(&request).await
    }

    /// Ask the assistant with a prepared request
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint(&["chat"], &[])?;
        self.post_json(url, request, "reach the assistant").await
    }
}
