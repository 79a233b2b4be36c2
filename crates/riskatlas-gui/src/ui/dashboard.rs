//! Headline metric cards.

use crate::fetch::Fetch;
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::analysis::capitalize;
use riskatlas_core::types::DashboardMetrics;

/// Shows the metrics row.
pub fn show(ui: &mut egui::Ui, metrics: &Fetch<DashboardMetrics>) {
    let value = metrics.value();
    let loading = metrics.is_loading() && value.is_none();

    ui.columns(6, |columns| {
        let cards: [(&str, &str, Option<String>, egui::Color32); 6] = [
            (
                "🌍",
                "Countries Monitored",
                value.map(|m| m.total_countries_monitored.to_string()),
                theme::BLUE,
            ),
            (
                "⚠",
                "High Risk Countries",
                value.map(|m| m.high_risk_countries.to_string()),
                theme::RED,
            ),
            (
                "🔔",
                "Policy Alerts",
                value.map(|m| m.policy_alerts_this_week.to_string()),
                theme::YELLOW,
            ),
            (
                "📊",
                "Avg Global Risk",
                value.map(|m| format!("{:.1}/100", m.avg_global_risk)),
                theme::ORANGE,
            ),
            (
                value
                    .map(|m| theme::trend_style(m.top_risk_trend).0)
                    .unwrap_or("➡"),
                "Risk Trend",
                value.map(|m| capitalize(m.top_risk_trend.as_str())),
                value
                    .map(|m| theme::trend_style(m.top_risk_trend).1)
                    .unwrap_or(theme::MUTED),
            ),
            (
                "🔗",
                "Supply Chain Alerts",
                value.map(|m| m.supply_chain_alerts.to_string()),
                theme::PURPLE,
            ),
        ];

        for (column, (icon, title, text, color)) in columns.iter_mut().zip(cards) {
            metric_card(column, icon, title, text.as_deref(), color, loading);
        }
    });

    if let Some(error) = metrics.error() {
        ui.colored_label(theme::RED, format!("Metrics unavailable: {}", error));
    }
}

/// Shows a metric card.
fn metric_card(
    ui: &mut egui::Ui,
    icon: &str,
    title: &str,
    value: Option<&str>,
    color: egui::Color32,
    loading: bool,
) {
    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(icon).size(18.0).color(color));
            ui.label(egui::RichText::new(title).size(12.0).color(theme::MUTED));
        });
        match value {
            Some(value) => {
                ui.label(egui::RichText::new(value).size(24.0).strong().color(color));
            }
            None if loading => {
                ui.add(egui::Spinner::new().size(24.0));
            }
            None => {
                ui.label(egui::RichText::new("-").size(24.0).color(theme::MUTED));
            }
        }
    });
}
