//! Country picker with type-to-filter.

use crate::ui::theme;
use eframe::egui;
use riskatlas_core::types::Country;

/// Countries whose id or name contains `query`, ignoring case.
pub fn filter_countries<'a>(countries: &'a [Country], query: &str) -> Vec<&'a Country> {
    let needle = query.trim().to_lowercase();
    countries
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.id.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Shows the picker. Returns the id of a newly chosen country.
pub fn show(
    ui: &mut egui::Ui,
    query: &mut String,
    countries: &[Country],
    selected: Option<&str>,
) -> Option<String> {
    let mut chosen = None;

    let selected_text = selected
        .and_then(|id| countries.iter().find(|c| c.id == id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Search countries...".to_string());

    egui::ComboBox::from_id_salt("country_search")
        .selected_text(selected_text)
        .width(ui.available_width())
        .height(320.0)
        .show_ui(ui, |ui| {
            ui.add(
                egui::TextEdit::singleline(query)
                    .hint_text("Type a name or code")
                    .desired_width(f32::INFINITY),
            )
            .request_focus();
            ui.separator();

            let matches = filter_countries(countries, query);
            if matches.is_empty() {
                ui.label(egui::RichText::new("No country found.").color(theme::MUTED));
            }

            for country in matches {
                let is_selected = selected == Some(country.id.as_str());
                let label = egui::RichText::new(format!(
                    "{}  {}  ({})",
                    country.name, country.id, country.risk_score
                ))
                .color(if is_selected {
                    egui::Color32::WHITE
                } else {
                    theme::risk_color(country.risk_score)
                });

                if ui.selectable_label(is_selected, label).clicked() {
                    chosen = Some(country.id.clone());
                }
            }
        });

    if chosen.is_some() {
        query.clear();
    }
    chosen
}
