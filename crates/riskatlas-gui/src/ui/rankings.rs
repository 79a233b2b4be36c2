//! Table of every tracked country, ranked by risk score.

use crate::ui::theme;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use riskatlas_core::types::Country;

/// Countries ordered by descending risk score, ties broken by name.
pub fn rank_countries(countries: &[Country]) -> Vec<&Country> {
    let mut ranked: Vec<&Country> = countries.iter().collect();
    ranked.sort_by(|a, b| {
        b.risk_score
            .cmp(&a.risk_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Shows the table. Returns the id of a clicked row.
pub fn show(ui: &mut egui::Ui, countries: &[Country], selected: Option<&str>) -> Option<String> {
    let mut clicked = None;

    theme::section_heading(ui, "📋", "Risk Rankings");

    if countries.is_empty() {
        ui.label(egui::RichText::new("No countries loaded").color(theme::MUTED));
        return None;
    }

    let ranked = rank_countries(countries);
    let max_height = ui.available_height();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(28.0))
        .column(Column::remainder().at_least(100.0))
        .columns(Column::auto().at_least(48.0), 4)
        .min_scrolled_height(0.0)
        .max_scroll_height(max_height)
        .header(20.0, |mut header| {
            for title in ["#", "Country", "Risk", "Level", "Trend", "Tariff"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (rank, country) in ranked.iter().enumerate() {
                body.row(22.0, |mut row| {
                    row.set_selected(selected == Some(country.id.as_str()));

                    row.col(|ui| {
                        ui.label(egui::RichText::new((rank + 1).to_string()).color(theme::MUTED));
                    });
                    row.col(|ui| {
                        ui.label(&country.name);
                        ui.label(egui::RichText::new(&country.id).small().monospace());
                    });
                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(country.risk_score.to_string())
                                .strong()
                                .color(theme::risk_color(country.risk_score)),
                        );
                    });
                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(country.risk_level.as_str())
                                .color(theme::level_color(country.risk_level.as_str())),
                        );
                    });
                    row.col(|ui| {
                        let (arrow, color) = theme::trend_style(country.risk_trend);
                        ui.label(egui::RichText::new(arrow).color(color));
                    });
                    row.col(|ui| {
                        ui.label(format!("{}%", country.tariff_percentage));
                    });

                    if row.response().clicked() {
                        clicked = Some(country.id.clone());
                    }
                });
            }
        });

    clicked
}
