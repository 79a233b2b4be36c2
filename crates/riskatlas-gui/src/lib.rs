//! Desktop client for the RiskAtlas trade-risk backend.
//!
//! This crate provides a native GUI built with egui/eframe. It fetches country
//! risk data from the RiskAtlas REST API and lays it out around an interactive
//! world map: dashboard metrics, country details, AI forecasts, policy alerts,
//! a cost simulator, alternative suppliers, supply-chain cards and a chat
//! assistant.

use anyhow::Context as _;
use chrono::{DateTime, Local};
use eframe::egui;
use riskatlas_core::analysis::category_filter;
use riskatlas_core::types::{
    AlternativeSupplier, CostSimulationRequest, CostSimulationResponse, Country, CountryDetail,
    DashboardMetrics, HealthStatus, IndustryCatalog, PolicyAlert, SupplyChainInfo,
};
use riskatlas_core::AppConfig;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

mod ui;

pub mod api_client;
pub use api_client::ApiClient;

pub mod chat;
pub mod fetch;
pub mod geo;
pub mod viewport;

use fetch::Fetch;
use geo::{CountryShapes, Projection};
use viewport::{MapTransform, Viewport, ViewportConfig};

/// eframe storage key for [`PersistedView`].
pub const VIEW_KEY: &str = "riskatlas_view";

/// UI preferences kept across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedView {
    /// Last committed map transform
    #[serde(default)]
    pub map_transform: MapTransform,

    /// Country selected when the app closed
    #[serde(default)]
    pub selected_country: Option<String>,
}

/// Status message level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Tabs of the right-hand panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Alerts,
    CostSimulator,
    Suppliers,
    SupplyChain,
    Rankings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Alerts,
        Tab::CostSimulator,
        Tab::Suppliers,
        Tab::SupplyChain,
        Tab::Rankings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Alerts => "🔔 Alerts",
            Tab::CostSimulator => "💲 Cost",
            Tab::Suppliers => "⇄ Suppliers",
            Tab::SupplyChain => "🔗 Supply Chain",
            Tab::Rankings => "📋 Rankings",
        }
    }
}

/// Everything fetched from the backend.
#[derive(Default)]
pub struct RemoteData {
    pub countries: Fetch<Vec<Country>>,
    pub metrics: Fetch<DashboardMetrics>,
    pub health: Fetch<HealthStatus>,
    pub industries: Fetch<IndustryCatalog>,
    pub detail: Fetch<CountryDetail>,
    pub alerts: Fetch<Vec<PolicyAlert>>,
    pub suppliers: Fetch<Vec<AlternativeSupplier>>,
    pub supply_chain: Fetch<SupplyChainInfo>,
    pub simulation: Fetch<CostSimulationResponse>,
    pub chat_reply: Fetch<String>,
}

impl RemoteData {
    pub fn any_loading(&self) -> bool {
        self.countries.is_loading()
            || self.metrics.is_loading()
            || self.health.is_loading()
            || self.industries.is_loading()
            || self.detail.is_loading()
            || self.alerts.is_loading()
            || self.suppliers.is_loading()
            || self.supply_chain.is_loading()
            || self.simulation.is_loading()
            || self.chat_reply.is_loading()
    }
}

/// UI state (not serialized).
pub struct UiState {
    /// Currently selected tab
    pub selected_tab: Tab,

    /// Text typed into the country search box
    pub country_query: String,

    /// Policy alert category, `"all"` for no filter
    pub alert_category: &'static str,

    pub cost: ui::cost_simulator::CostSimulatorState,

    /// Industry shown in the supply chain tab
    pub supply_chain_industry: Option<String>,

    pub chat: ui::chat::ChatPanelState,

    pub map: ui::map::MapPanelState,
}

impl UiState {
    fn new(map: ui::map::MapPanelState) -> Self {
        Self {
            selected_tab: Tab::default(),
            country_query: String::new(),
            alert_category: "all",
            cost: Default::default(),
            supply_chain_industry: None,
            chat: Default::default(),
            map,
        }
    }
}

/// Configured outlines, else the bundled set. Markers still work if both fail.
fn load_country_shapes(path: Option<&std::path::Path>, projection: &Projection) -> CountryShapes {
    if let Some(path) = path {
        match CountryShapes::load(path, projection) {
            Ok(shapes) => return shapes,
            Err(e) => tracing::warn!("{}, falling back to bundled outlines", e),
        }
    }

    CountryShapes::bundled(projection).unwrap_or_else(|e| {
        tracing::warn!("Country outlines unavailable, showing markers only: {}", e);
        CountryShapes::default()
    })
}

/// Main application state for the RiskAtlas GUI.
pub struct RiskAtlasApp {
    pub config: AppConfig,

    pub api: ApiClient,

    /// Runtime that drives every request future
    runtime: tokio::runtime::Runtime,

    pub data: RemoteData,

    pub ui_state: UiState,

    /// ISO alpha-2 id of the selected country
    pub selected: Option<String>,

    /// Status message for user notifications
    pub status_message: Option<(String, StatusLevel)>,

    /// Timestamp for status message expiry
    pub status_message_expiry: Option<Instant>,

    last_metrics_refresh: Instant,
    last_health_refresh: Instant,

    /// Wall-clock time of the last successful metrics load
    pub last_updated: Option<DateTime<Local>>,

    theme_initialized: bool,
}

impl RiskAtlasApp {
    /// Creates the application, restoring the persisted view from eframe storage.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        let view: PersistedView = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, VIEW_KEY))
            .unwrap_or_default();

        Self::with_view(config, view)
    }

    /// Creates the application from an explicit view and starts the initial loads.
    pub fn with_view(config: AppConfig, view: PersistedView) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("riskatlas-io")
            .build()
            .context("Failed to start async runtime")?;

        let api = ApiClient::with_timeout(&config.api.base_url, config.api.timeout())?;
        tracing::info!("API client initialized for {}", api.base_url());

        let projection = Projection::from(&config.map);
        let shapes = load_country_shapes(config.map.geojson_path.as_deref(), &projection);
        let viewport = Viewport::with_transform(ViewportConfig::from(&config.map), view.map_transform);
        let map = ui::map::MapPanelState::new(viewport, projection, shapes);

        let now = Instant::now();
        let mut app = Self {
            config,
            api,
            runtime,
            data: RemoteData::default(),
            ui_state: UiState::new(map),
            selected: None,
            status_message: None,
            status_message_expiry: None,
            last_metrics_refresh: now,
            last_health_refresh: now,
            last_updated: None,
            theme_initialized: false,
        };

        app.load_initial();
        if let Some(id) = view.selected_country {
            app.select_country(id);
        }

        Ok(app)
    }

    /// Fetches everything the dashboard needs before a selection exists.
    pub fn load_initial(&mut self) {
        tracing::info!("Loading dashboard data from {}", self.api.base_url());

        let api = self.api.clone();
        self.data
            .countries
            .start("countries", self.runtime.handle(), async move {
                api.get_countries(None, None).await
            });

        let api = self.api.clone();
        self.data
            .industries
            .start("industries", self.runtime.handle(), async move {
                api.get_industries().await
            });

        self.refresh_metrics();
        self.refresh_health();
        self.reload_alerts();
    }

    fn refresh_metrics(&mut self) {
        let api = self.api.clone();
        self.data
            .metrics
            .start("dashboard-metrics", self.runtime.handle(), async move {
                api.get_dashboard_metrics().await
            });
        self.last_metrics_refresh = Instant::now();
    }

    fn refresh_health(&mut self) {
        let api = self.api.clone();
        self.data
            .health
            .start("health", self.runtime.handle(), async move {
                api.health_check().await
            });
        self.last_health_refresh = Instant::now();
    }

    /// Refreshes metrics and health once their intervals elapse.
    fn refresh_periodic(&mut self) {
        if self.last_metrics_refresh.elapsed() >= self.config.refresh.metrics_interval()
            && !self.data.metrics.is_loading()
        {
            tracing::debug!("Refreshing dashboard metrics");
            self.refresh_metrics();
        }

        if self.last_health_refresh.elapsed() >= self.config.refresh.health_interval()
            && !self.data.health.is_loading()
        {
            self.refresh_health();
        }
    }

    /// Looks up a loaded country by id.
    pub fn country(&self, id: &str) -> Option<&Country> {
        self.data
            .countries
            .value()
            .and_then(|list| list.iter().find(|c| c.id == id))
    }

    /// Makes `id` the selected country and reloads everything that depends on it.
    pub fn select_country(&mut self, id: String) {
        tracing::debug!("Selected country {}", id);

        let api = self.api.clone();
        let detail_id = id.clone();
        self.data
            .detail
            .start("country", self.runtime.handle(), async move {
                api.get_country(&detail_id).await
            });

        self.selected = Some(id);
        self.prefill_tariff();
        self.reload_alerts();
        self.reload_suppliers();
    }

    fn prefill_tariff(&mut self) {
        let tariff = self
            .selected
            .as_deref()
            .and_then(|id| self.country(id))
            .map(|c| c.tariff_percentage);
        if let Some(tariff) = tariff {
            self.ui_state.cost.apply_country_tariff(tariff);
        }
    }

    /// Reloads the alert feed for the current country and category.
    pub fn reload_alerts(&mut self) {
        let api = self.api.clone();
        let country = self.selected.clone();
        let category = category_filter(self.ui_state.alert_category).map(str::to_string);
        self.data
            .alerts
            .start("policy-alerts", self.runtime.handle(), async move {
                api.get_policy_alerts(country.as_deref(), category.as_deref(), None)
                    .await
            });
    }

    fn reload_suppliers(&mut self) {
        let Some(country_id) = self.selected.clone() else {
            self.data.suppliers.clear();
            return;
        };

        let api = self.api.clone();
        self.data
            .suppliers
            .start("alternative-suppliers", self.runtime.handle(), async move {
                api.get_alternative_suppliers(&country_id, None).await
            });
    }

    fn load_supply_chain(&mut self, industry: String) {
        let api = self.api.clone();
        let requested = industry.clone();
        self.data
            .supply_chain
            .start("supply-chain", self.runtime.handle(), async move {
                api.get_supply_chain_info(&requested).await
            });
        self.ui_state.supply_chain_industry = Some(industry);
    }

    fn run_simulation(&mut self, request: CostSimulationRequest) {
        tracing::debug!(
            "Simulating cost: base {} at {}% tariff",
            request.base_cost,
            request.tariff_percentage
        );
        let api = self.api.clone();
        self.data
            .simulation
            .start("simulate-cost", self.runtime.handle(), async move {
                api.simulate_cost(&request).await
            });
    }

    fn send_chat(&mut self) {
        let Some(request) = self
            .ui_state
            .chat
            .session
            .begin_send(self.selected.as_deref())
        else {
            return;
        };

        let api = self.api.clone();
        self.data
            .chat_reply
            .start("chat", self.runtime.handle(), async move {
                api.send_chat(&request).await.map(|reply| reply.reply)
            });
    }

    fn clear_chat(&mut self) {
        self.data.chat_reply.clear();
        self.ui_state.chat.session.clear();
    }

    /// Moves finished requests into their slots and reacts to the ones that matter.
    fn poll_remote(&mut self) {
        if self.data.countries.poll() {
            if let Some(count) = self.data.countries.value().map(Vec::len) {
                tracing::info!("Loaded {} countries", count);
                self.prefill_tariff();
            }
            if let Some(error) = self.data.countries.error().map(str::to_string) {
                self.show_status(format!("Failed to load countries: {}", error), StatusLevel::Error, 8);
            }
        }

        if self.data.metrics.poll() && matches!(self.data.metrics, Fetch::Ready(_)) {
            self.last_updated = Some(Local::now());
        }

        if self.data.health.poll() {
            if let Some(health) = self.data.health.value() {
                tracing::debug!("Backend health: {}", health.status);
            }
        }

        self.data.industries.poll();
        self.data.detail.poll();
        self.data.alerts.poll();
        self.data.suppliers.poll();
        self.data.supply_chain.poll();

        if self.data.simulation.poll() && matches!(self.data.simulation, Fetch::Ready(_)) {
            self.show_status("Cost simulation complete".to_string(), StatusLevel::Success, 3);
        }

        if self.data.chat_reply.poll() {
            match std::mem::take(&mut self.data.chat_reply) {
                Fetch::Ready(reply) => self
                    .ui_state
                    .chat
                    .session
                    .finish(Ok(reply), self.api.base_url()),
                Fetch::Failed(error) => self
                    .ui_state
                    .chat
                    .session
                    .finish(Err(error), self.api.base_url()),
                other => self.data.chat_reply = other,
            }
        }
    }

    /// Shows a status message to the user
    pub fn show_status(&mut self, message: String, level: StatusLevel, duration_secs: u64) {
        self.status_message = Some((message, level));
        self.status_message_expiry = Some(Instant::now() + Duration::from_secs(duration_secs));
    }

    /// Clears the status message if expired
    fn check_status_expiry(&mut self) {
        if let Some(expiry) = self.status_message_expiry {
            if Instant::now() > expiry {
                self.status_message = None;
                self.status_message_expiry = None;
            }
        }
    }

    fn show_connection_error(&mut self, ctx: &egui::Context) {
        let mut retry = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                ui.label(egui::RichText::new("⚠").size(48.0).color(ui::theme::RED));
                ui.label(egui::RichText::new("Connection Error").size(22.0).strong());
                ui.label(format!(
                    "Failed to load countries. Please ensure the backend is running at {}.",
                    self.api.base_url()
                ));
                ui.add_space(12.0);
                if ui.button("⟲ Retry Connection").clicked() {
                    retry = true;
                }
            });
        });

        if retry {
            self.status_message = None;
            self.status_message_expiry = None;
            self.load_initial();
        }
    }
}

impl eframe::App for RiskAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_initialized {
            ui::theme::apply_theme(ctx);
            self.theme_initialized = true;
        }

        self.check_status_expiry();
        self.poll_remote();
        self.refresh_periodic();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui::header::show(
                ui,
                &self.data.health,
                self.data.countries.value().map(Vec::len),
                self.last_updated,
            );
        });

        egui::TopBottomPanel::top("metrics").show(ctx, |ui| {
            ui.add_space(4.0);
            ui::dashboard::show(ui, &self.data.metrics);
            ui.add_space(4.0);
        });

        // Bottom status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((message, level)) = &self.status_message {
                    let (icon, color) = match level {
                        StatusLevel::Info => ("ℹ", egui::Color32::LIGHT_BLUE),
                        StatusLevel::Success => ("✓", egui::Color32::GREEN),
                        StatusLevel::Warning => ("⚠", egui::Color32::YELLOW),
                        StatusLevel::Error => ("✗", egui::Color32::RED),
                    };
                    ui.colored_label(color, icon);
                    ui.label(message);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("API: {}", self.api.base_url()))
                            .small()
                            .color(egui::Color32::GRAY),
                    );
                });
            });
        });

        if self.data.countries.error().is_some() {
            self.show_connection_error(ctx);
            ctx.request_repaint_after(Duration::from_secs(1));
            return;
        }

        let mut select: Option<String> = None;
        let mut alerts_changed = false;
        let mut simulate = None;
        let mut picked_industry = None;
        let mut chat_action = None;

        let countries: &[Country] = self
            .data
            .countries
            .value()
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let selected_country = self
            .selected
            .as_deref()
            .and_then(|id| countries.iter().find(|c| c.id == id));

        egui::SidePanel::left("country_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("country_scroll")
                    .show(ui, |ui| {
                        if let Some(id) = ui::country_search::show(
                            ui,
                            &mut self.ui_state.country_query,
                            countries,
                            self.selected.as_deref(),
                        ) {
                            select = Some(id);
                        }
                        ui.add_space(8.0);
                        ui::country_info::show(ui, &self.data.detail, self.selected.as_deref());
                        ui.add_space(8.0);
                        let detail = self
                            .data
                            .detail
                            .value()
                            .filter(|d| Some(d.country.id.as_str()) == self.selected.as_deref());
                        ui::forecast::show(ui, detail);
                    });
            });

        egui::SidePanel::right("tab_panel")
            .resizable(true)
            .default_width(400.0)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for tab in Tab::ALL {
                        if ui
                            .selectable_label(self.ui_state.selected_tab == tab, tab.label())
                            .clicked()
                        {
                            self.ui_state.selected_tab = tab;
                        }
                    }
                });
                ui.separator();

                let tab = self.ui_state.selected_tab;
                match tab {
                    Tab::Alerts => {
                        alerts_changed = ui::alerts::show(
                            ui,
                            &mut self.ui_state.alert_category,
                            &self.data.alerts,
                            selected_country.map(|c| c.name.as_str()),
                        );
                    }
                    Tab::CostSimulator => {
                        let industries = self
                            .data
                            .industries
                            .value()
                            .map(|catalog| catalog.industries.as_slice())
                            .unwrap_or(&[]);
                        simulate = ui::cost_simulator::show(
                            ui,
                            &mut self.ui_state.cost,
                            &self.data.simulation,
                            industries,
                            self.selected.as_deref(),
                        );
                    }
                    Tab::Suppliers => {
                        if let Some(id) =
                            ui::suppliers::show(ui, &self.data.suppliers, selected_country)
                        {
                            select = Some(id);
                        }
                    }
                    Tab::SupplyChain => {
                        picked_industry = ui::supply_chain::show(
                            ui,
                            &self.ui_state.supply_chain_industry,
                            &self.data.industries,
                            &self.data.supply_chain,
                        );
                    }
                    Tab::Rankings => {
                        if let Some(id) =
                            ui::rankings::show(ui, countries, self.selected.as_deref())
                        {
                            select = Some(id);
                        }
                    }
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(ui::theme::MAP_FILL))
            .show(ctx, |ui| {
                if countries.is_empty() && self.data.countries.is_loading() {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                    return;
                }
                if let Some(id) = ui::map::show(
                    ui,
                    &mut self.ui_state.map,
                    countries,
                    self.selected.as_deref(),
                ) {
                    select = Some(id);
                }
            });

        if let Some(action) = ui::chat::show(ctx, &mut self.ui_state.chat, selected_country) {
            chat_action = Some(action);
        }

        if let Some(id) = select {
            if self.selected.as_deref() != Some(id.as_str()) {
                self.select_country(id);
            }
        }
        if alerts_changed {
            self.reload_alerts();
        }
        if let Some(request) = simulate {
            self.run_simulation(request);
        }
        if let Some(industry) = picked_industry {
            self.load_supply_chain(industry);
        }
        match chat_action {
            Some(ui::chat::ChatAction::Send) => self.send_chat(),
            Some(ui::chat::ChatAction::Clear) => self.clear_chat(),
            None => {}
        }

        let busy = self.data.any_loading() || self.ui_state.map.viewport.has_pending_zoom();
        ctx.request_repaint_after(if busy {
            Duration::from_millis(100)
        } else {
            Duration::from_secs(1)
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let view = PersistedView {
            map_transform: self.ui_state.map.viewport.committed(),
            selected_country: self.selected.clone(),
        };
        eframe::set_value(storage, VIEW_KEY, &view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_labels_unique() {
        let labels: std::collections::HashSet<_> = Tab::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels.len(), Tab::ALL.len());
        assert_eq!(Tab::default(), Tab::Alerts);
    }

    #[test]
    fn test_persisted_view_tolerates_missing_fields() {
        let view: PersistedView = serde_json::from_str("{}").unwrap();
        assert_eq!(view, PersistedView::default());
        assert_eq!(view.map_transform, MapTransform::IDENTITY);

        let view: PersistedView = serde_json::from_str(
            r#"{"map_transform":{"scale":2.0,"tx":10.0,"ty":-4.0},"selected_country":"CN"}"#,
        )
        .unwrap();
        assert_eq!(view.map_transform.scale, 2.0);
        assert_eq!(view.selected_country.as_deref(), Some("CN"));
    }

    #[test]
    fn test_country_shapes_fall_back_to_bundled() {
        let projection = Projection::default();

        let shapes = load_country_shapes(None, &projection);
        assert!(shapes.get("USA").is_some());

        let missing = std::path::Path::new("/nonexistent/outlines.geojson");
        let shapes = load_country_shapes(Some(missing), &projection);
        assert!(shapes.get("CHN").is_some());
    }

    #[test]
    fn test_remote_data_idle_by_default() {
        let data = RemoteData::default();
        assert!(!data.any_loading());
        assert!(data.countries.is_idle());
        assert!(data.chat_reply.value().is_none());
    }
}
