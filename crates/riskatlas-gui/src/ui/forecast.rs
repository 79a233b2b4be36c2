//! Risk forecast per horizon.

use crate::ui::theme;
use eframe::egui;
use riskatlas_core::analysis::{capitalize, format_score_change, score_change, RiskBand};
use riskatlas_core::types::{CountryDetail, ForecastHorizon};

const DISCLAIMER: &str = "Predictions are based on historical data, current geopolitical trends \
and machine learning models. Confidence decreases for longer timeframes.";

/// Shows the forecast panel.
pub fn show(ui: &mut egui::Ui, detail: Option<&CountryDetail>) {
    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            theme::section_heading(ui, "🧠", "AI Risk Forecast");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new("AI Powered").small().color(theme::PURPLE));
            });
        });

        let Some(detail) = detail else {
            ui.label(
                egui::RichText::new("Select a country to view its AI risk forecast")
                    .color(theme::MUTED),
            );
            return;
        };

        if !detail.has_forecast() {
            ui.label(
                egui::RichText::new(format!(
                    "No forecast data available for {}",
                    detail.country.name
                ))
                .color(theme::MUTED),
            );
            return;
        }

        let current = detail.country.risk_score;
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Current Risk Score").color(theme::MUTED));
            ui.label(
                egui::RichText::new(current.to_string())
                    .size(18.0)
                    .strong()
                    .color(theme::band_color(RiskBand::from_score(current))),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (arrow, color) = theme::trend_style(detail.country.risk_trend);
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        arrow,
                        capitalize(detail.country.risk_trend.as_str())
                    ))
                    .color(color),
                );
                ui.label(egui::RichText::new("Trend:").small().color(theme::MUTED));
            });
        });

        for horizon in ForecastHorizon::ALL {
            let Some(forecast) = detail.forecast(horizon) else {
                continue;
            };

            ui.add_space(6.0);
            egui::Frame::new()
                .fill(egui::Color32::from_gray(35))
                .corner_radius(4.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(horizon.label()).strong());
                        ui.label(
                            egui::RichText::new(horizon.timeframe())
                                .small()
                                .color(theme::MUTED),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if let Some(change) =
                                format_score_change(score_change(forecast.score, current))
                            {
                                let color = if forecast.score > current {
                                    theme::RED
                                } else {
                                    theme::GREEN
                                };
                                ui.label(egui::RichText::new(format!("({})", change)).color(color));
                            }
                            ui.label(
                                egui::RichText::new(forecast.score.to_string())
                                    .size(18.0)
                                    .strong()
                                    .color(theme::band_color(RiskBand::from_score(forecast.score))),
                            );
                        });
                    });

                    let (arrow, color) = theme::trend_style(forecast.trend);
                    ui.label(
                        egui::RichText::new(format!("{} {}", arrow, capitalize(forecast.trend.as_str())))
                            .small()
                            .color(color),
                    );

                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("Confidence:").small().color(theme::MUTED));
                        ui.label(
                            egui::RichText::new(format!("{}%", forecast.confidence))
                                .small()
                                .color(theme::MUTED),
                        );
                    });
                    theme::bar(ui, forecast.confidence as f32 / 100.0, theme::PURPLE);
                });
        }

        ui.add_space(8.0);
        ui.label(egui::RichText::new(format!("ⓘ {}", DISCLAIMER)).small().color(theme::PURPLE));
    });
}
