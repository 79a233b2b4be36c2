//! Friend-shoring alternatives to the selected country.

use crate::fetch::Fetch;
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::analysis::{RiskBand, SuitabilityBand};
use riskatlas_core::types::{AlternativeSupplier, Country};

/// Shows the suppliers panel. Returns a supplier id the user asked to inspect.
pub fn show(
    ui: &mut egui::Ui,
    suppliers: &Fetch<Vec<AlternativeSupplier>>,
    country: Option<&Country>,
) -> Option<String> {
    let mut inspect = None;

    theme::section_heading(ui, "⇄", "Alternative Suppliers");
    ui.label(
        egui::RichText::new("Friend-shoring recommendations")
            .small()
            .color(theme::MUTED),
    );

    let Some(country) = country else {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label(egui::RichText::new("📍").size(32.0).color(theme::MUTED));
            ui.label(
                egui::RichText::new("Select a high-risk country to see alternative suppliers")
                    .color(theme::MUTED),
            );
        });
        return None;
    };

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Alternatives for:").color(theme::MUTED));
        ui.label(egui::RichText::new(&country.name).strong());
    });
    ui.separator();

    if let Fetch::Failed(error) = suppliers {
        ui.colored_label(theme::RED, "Failed to load alternative suppliers");
        ui.label(egui::RichText::new(error.as_str()).small().color(theme::MUTED));
        return None;
    }

    let Some(list) = suppliers.value().filter(|_| !suppliers.is_loading()) else {
        for _ in 0..3 {
            let size = egui::vec2(ui.available_width(), 90.0);
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            ui.painter().rect_filled(rect, 6.0, egui::Color32::from_gray(40));
            ui.add_space(6.0);
        }
        return None;
    };

    if list.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label(egui::RichText::new("🛡").size(32.0).color(theme::GREEN));
            ui.label(egui::RichText::new("No alternative suppliers needed").strong());
            ui.label(
                egui::RichText::new("This country has acceptable risk levels").color(theme::MUTED),
            );
        });
        return None;
    }

    egui::ScrollArea::vertical()
        .id_salt("suppliers_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (index, supplier) in list.iter().enumerate() {
                if supplier_card(ui, supplier, index == 0) {
                    inspect = Some(supplier.country_id.clone());
                }
                ui.add_space(6.0);
            }
        });

    inspect
}

fn metric(ui: &mut egui::Ui, label: &str, value: String, color: egui::Color32) {
    ui.vertical(|ui| {
        ui.label(egui::RichText::new(label).small().color(theme::MUTED));
        ui.label(egui::RichText::new(value).strong().color(color));
    });
}

fn supplier_card(ui: &mut egui::Ui, supplier: &AlternativeSupplier, top_pick: bool) -> bool {
    let mut clicked = false;
    let suitability = theme::suitability_color(SuitabilityBand::from_score(supplier.suitability_score));

    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&supplier.country_name).strong());
            if top_pick {
                ui.label(egui::RichText::new("⭐ Top Pick").small().color(theme::YELLOW));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("{}%", supplier.suitability_score))
                        .strong()
                        .color(suitability),
                );
            });
        });

        ui.columns(3, |columns| {
            metric(
                &mut columns[0],
                "Risk",
                supplier.risk_score.to_string(),
                theme::band_color(RiskBand::from_score(supplier.risk_score)),
            );
            metric(
                &mut columns[1],
                "Friend Score",
                supplier.friend_shore_score.to_string(),
                theme::BLUE,
            );
            metric(
                &mut columns[2],
                "Tariff",
                format!("{}%", supplier.tariff_percentage),
                theme::ORANGE,
            );
        });

        ui.horizontal_wrapped(|ui| {
            for industry in supplier.key_industries.iter().take(3) {
                ui.label(egui::RichText::new(industry).small().background_color(egui::Color32::from_gray(50)));
            }
        });

        ui.label(
            egui::RichText::new(format!("⬊ {}", supplier.reason))
                .small()
                .color(theme::GREEN),
        );

        if ui.small_button("View on map").clicked() {
            clicked = true;
        }
    });

    clicked
}
