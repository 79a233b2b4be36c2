//! Industry supply chain vulnerability card.

use crate::fetch::Fetch;
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::types::{IndustryCatalog, SupplyChainInfo};

/// Shows the panel. Returns an industry the user just picked.
pub fn show(
    ui: &mut egui::Ui,
    selected: &Option<String>,
    catalog: &Fetch<IndustryCatalog>,
    info: &Fetch<SupplyChainInfo>,
) -> Option<String> {
    let mut picked = None;

    theme::section_heading(ui, "🔗", "Supply Chain Vulnerability");

    let industries = catalog
        .value()
        .map(|c| c.supply_chain_data.as_slice())
        .unwrap_or(&[]);

    if industries.is_empty() {
        if catalog.is_loading() {
            ui.spinner();
        } else {
            ui.label(
                egui::RichText::new("No supply chain data available").color(theme::MUTED),
            );
        }
        return None;
    }

    egui::ComboBox::from_id_salt("supply_chain_industry")
        .selected_text(selected.as_deref().unwrap_or("Select an industry"))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for industry in industries {
                let is_selected = selected.as_deref() == Some(industry.as_str());
                if ui.selectable_label(is_selected, industry).clicked() && !is_selected {
                    picked = Some(industry.clone());
                }
            }
        });
    ui.add_space(8.0);

    if selected.is_none() {
        ui.label(
            egui::RichText::new("Pick an industry to see where its supply chain is exposed")
                .color(theme::MUTED),
        );
        return picked;
    }

    match info {
        Fetch::Failed(error) => {
            ui.colored_label(theme::RED, "Failed to load supply chain data");
            ui.label(egui::RichText::new(error.as_str()).small().color(theme::MUTED));
        }
        _ => match info.value().filter(|_| !info.is_loading()) {
            Some(info) => info_card(ui, info),
            None => {
                ui.spinner();
            }
        },
    }

    picked
}

fn info_card(ui: &mut egui::Ui, info: &SupplyChainInfo) {
    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&info.industry).size(16.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("{} Risk", info.risk_level))
                        .strong()
                        .color(theme::level_color(&info.risk_level)),
                );
            });
        });

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Concentration").color(theme::MUTED));
            ui.label(
                egui::RichText::new(&info.concentration_risk)
                    .color(theme::level_color(&info.concentration_risk)),
            );
        });

        if !info.top_suppliers.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Top Suppliers").strong());
            ui.label(info.top_suppliers.join(", "));
        }

        if !info.vulnerabilities.is_empty() {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Vulnerabilities").strong());
            for vulnerability in &info.vulnerabilities {
                ui.label(format!("• {}", vulnerability));
            }
        }

        ui.add_space(6.0);
        if info.alternatives_available {
            ui.colored_label(theme::GREEN, "✔ Alternative sources available");
        } else {
            ui.colored_label(theme::RED, "✖ No ready alternative sources");
        }
    });
}
