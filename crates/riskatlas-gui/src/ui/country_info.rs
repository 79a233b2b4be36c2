//! Selected country details.

use crate::fetch::Fetch;
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::analysis::{is_high_risk, FriendShoreRating, RiskBand};
use riskatlas_core::types::{CountryDetail, Headline};

/// Shows the country panel.
pub fn show(ui: &mut egui::Ui, detail: &Fetch<CountryDetail>, selected: Option<&str>) {
    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        if selected.is_none() {
            placeholder(ui);
            return;
        }

        // A previous country's record is not shown while another one loads.
        let current = detail
            .value()
            .filter(|d| Some(d.country.id.as_str()) == selected);

        match (current, detail) {
            (Some(detail), _) => show_detail(ui, detail),
            (None, Fetch::Failed(error)) => {
                ui.colored_label(theme::RED, "Failed to load country details");
                ui.label(egui::RichText::new(error.as_str()).small().color(theme::MUTED));
            }
            (None, _) => skeleton(ui),
        }
    });
}

fn placeholder(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.label(egui::RichText::new("🌐").size(48.0).color(theme::MUTED));
        ui.label(egui::RichText::new("Select a Country").size(17.0).strong());
        ui.label(
            egui::RichText::new(
                "Click on a country on the map to view detailed trade risk intelligence",
            )
            .color(theme::MUTED),
        );
        ui.add_space(24.0);
    });
}

fn skeleton(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(egui::RichText::new("Loading country data...").color(theme::MUTED));
    });
    for width in [0.66, 1.0, 0.75] {
        ui.add_space(6.0);
        let size = egui::vec2(ui.available_width() * width, 14.0);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        ui.painter().rect_filled(rect, 3.0, egui::Color32::from_gray(45));
    }
}

fn show_detail(ui: &mut egui::Ui, detail: &CountryDetail) {
    let country = &detail.country;
    let band_color = theme::band_color(RiskBand::from_score(country.risk_score));

    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&country.name).size(20.0).strong());
                let (arrow, color) = theme::trend_style(country.risk_trend);
                ui.label(egui::RichText::new(arrow).color(color));
            });
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&country.id).monospace().color(theme::MUTED));
                if let Some(risk) = &country.supply_chain_risk {
                    let color = if country.supply_chain_flagged() {
                        theme::RED
                    } else {
                        theme::MUTED
                    };
                    ui.label(
                        egui::RichText::new(format!("Supply Chain: {}", risk))
                            .small()
                            .color(color),
                    );
                }
            });
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            egui::Frame::new()
                .stroke(egui::Stroke::new(1.0, band_color))
                .corner_radius(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(country.risk_score.to_string())
                                .size(26.0)
                                .strong()
                                .color(band_color),
                        );
                        ui.label(egui::RichText::new("Risk Score").small().color(theme::MUTED));
                    });
                });
        });
    });

    if is_high_risk(country.risk_score) {
        ui.add_space(8.0);
        egui::Frame::new()
            .fill(theme::RED.gamma_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, theme::RED.gamma_multiply(0.6)))
            .corner_radius(6.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(egui::RichText::new("⚠ High Risk Warning").strong().color(theme::RED));
                ui.label(
                    egui::RichText::new("Consider alternative suppliers or friend-shoring options")
                        .small(),
                );
            });
    }

    ui.add_space(10.0);
    ui.label(egui::RichText::new("Key Industries").strong());
    if country.key_industries.is_empty() {
        ui.label(egui::RichText::new("None listed").color(theme::MUTED));
    } else {
        ui.horizontal_wrapped(|ui| {
            for industry in &country.key_industries {
                egui::Frame::new()
                    .fill(egui::Color32::from_gray(50))
                    .corner_radius(4.0)
                    .inner_margin(egui::Margin::symmetric(6, 2))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(industry).small());
                    });
            }
        });
    }

    if let Some(score) = country.friend_shore_score {
        let rating = FriendShoreRating::from_score(score);
        let color = theme::friend_shore_color(rating);
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Friend-Shore Score").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(format!("{}/100", score)).strong().color(color));
            });
        });
        theme::bar(ui, score as f32 / 100.0, color);
        ui.label(egui::RichText::new(rating.description()).small().color(theme::MUTED));
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Current Tariff Rate").color(theme::MUTED));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!("{}%", country.tariff_percentage))
                    .size(18.0)
                    .strong()
                    .color(theme::ORANGE),
            );
        });
    });

    if !detail.trade_policy_summary.is_empty() {
        ui.add_space(10.0);
        ui.label(egui::RichText::new("Trade Policy Summary").strong());
        ui.label(&detail.trade_policy_summary);
    }

    if !detail.headlines.is_empty() {
        ui.add_space(10.0);
        ui.label(egui::RichText::new("Latest Headlines").strong());
        for headline in &detail.headlines {
            headline_row(ui, headline);
        }
    }
}

fn category_color(category: &str) -> egui::Color32 {
    match category {
        "Tariff" | "Energy" => theme::ORANGE,
        "Geopolitics" | "Sanctions" => theme::RED,
        "Regulation" => theme::PURPLE,
        "Currency" | "Investment" | "Agreement" => theme::GREEN,
        _ => theme::BLUE,
    }
}

fn headline_row(ui: &mut egui::Ui, headline: &Headline) {
    ui.add_space(4.0);
    egui::Frame::new()
        .fill(egui::Color32::from_gray(35))
        .corner_radius(4.0)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(&headline.category)
                        .small()
                        .color(category_color(&headline.category)),
                );
                ui.label(egui::RichText::new(&headline.date).small().color(theme::MUTED));
                if let Some(impact) = &headline.impact {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let color = match impact.to_ascii_lowercase().as_str() {
                            "high" => theme::RED,
                            "medium" => theme::YELLOW,
                            _ => theme::MUTED,
                        };
                        ui.label(egui::RichText::new(impact).small().color(color));
                    });
                }
            });
            ui.label(&headline.title);
            ui.label(egui::RichText::new(&headline.source).small().color(theme::MUTED));
        });
}
