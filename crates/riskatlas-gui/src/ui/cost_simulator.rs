//! Landed cost calculator.

use crate::fetch::Fetch;
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::analysis::{
    cost_increase_pct, estimated_future_cost, format_money, format_number, recommendation,
    CostForm, DEFAULT_TARIFF,
};
use riskatlas_core::types::{AiPrediction, CostSimulationRequest, CostSimulationResponse, Trend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostTab {
    #[default]
    Calculator,
    Prediction,
}

pub struct CostSimulatorState {
    pub form: CostForm,
    /// Validation message shown under the form
    pub error: Option<String>,
    pub tab: CostTab,
}

impl Default for CostSimulatorState {
    fn default() -> Self {
        Self {
            form: CostForm::with_tariff(DEFAULT_TARIFF),
            error: None,
            tab: CostTab::default(),
        }
    }
}

impl CostSimulatorState {
    /// Prefills the tariff from a newly selected country. A zero tariff keeps
    /// whatever is already entered.
    pub fn apply_country_tariff(&mut self, tariff: f64) {
        if tariff != 0.0 && tariff.is_finite() {
            self.form.tariff_percentage = format_number(tariff);
        }
    }

    /// Validates the form, recording the message on failure.
    pub fn submit(&mut self, country_id: Option<&str>) -> Option<CostSimulationRequest> {
        match self.form.validate(country_id) {
            Ok(request) => {
                self.error = None;
                Some(request)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

/// Shows the simulator. Returns a request when Calculate is pressed with valid input.
pub fn show(
    ui: &mut egui::Ui,
    state: &mut CostSimulatorState,
    simulation: &Fetch<CostSimulationResponse>,
    industries: &[String],
    country_id: Option<&str>,
) -> Option<CostSimulationRequest> {
    let mut request = None;
    let result = simulation.value();
    let prediction = result.and_then(|r| r.ai_prediction.as_ref());
    if prediction.is_none() {
        state.tab = CostTab::Calculator;
    }

    ui.horizontal(|ui| {
        theme::section_heading(ui, "🧮", "Predictive Cost Simulator");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new("AI Enhanced").small().color(theme::PURPLE));
        });
    });

    ui.horizontal(|ui| {
        ui.selectable_value(&mut state.tab, CostTab::Calculator, "Calculator");
        ui.add_enabled_ui(prediction.is_some(), |ui| {
            ui.selectable_value(&mut state.tab, CostTab::Prediction, "AI Prediction");
        });
    });
    ui.separator();

    match (state.tab, result, prediction) {
        (CostTab::Prediction, Some(result), Some(prediction)) => {
            show_prediction(ui, result, prediction);
        }
        _ => {
            if show_form(ui, state, simulation.is_loading(), industries) {
                request = state.submit(country_id);
            }
            if simulation.error().is_some() {
                ui.colored_label(theme::RED, "Failed to simulate cost. Please try again.");
            }
            ui.add_space(8.0);
            show_breakdown(ui, result);
        }
    }

    request
}

fn show_form(
    ui: &mut egui::Ui,
    state: &mut CostSimulatorState,
    loading: bool,
    industries: &[String],
) -> bool {
    egui::Grid::new("cost_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("$ Base Product Cost");
            ui.add(
                egui::TextEdit::singleline(&mut state.form.base_cost)
                    .hint_text("Enter amount")
                    .desired_width(140.0),
            );
            ui.end_row();

            ui.label("% Tariff");
            ui.add(
                egui::TextEdit::singleline(&mut state.form.tariff_percentage)
                    .hint_text("Enter %")
                    .desired_width(140.0),
            );
            ui.end_row();

            ui.label("🏭 Industry (Optional)");
            let selected_text = if state.form.industry.is_empty() {
                "Select industry".to_string()
            } else {
                state.form.industry.clone()
            };
            egui::ComboBox::from_id_salt("cost_industry")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut state.form.industry, String::new(), "None");
                    for industry in industries {
                        ui.selectable_value(&mut state.form.industry, industry.clone(), industry);
                    }
                });
            ui.end_row();
        });

    if let Some(error) = &state.error {
        ui.colored_label(theme::RED, format!("⚠ {}", error));
    }

    ui.add_space(6.0);
    if loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Calculating...");
        });
        false
    } else {
        ui.button("Calculate Final Cost ➡").clicked()
    }
}

fn breakdown_row(ui: &mut egui::Ui, label: &str, value: String, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).color(theme::MUTED));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(value).color(color));
        });
    });
}

fn show_breakdown(ui: &mut egui::Ui, result: Option<&CostSimulationResponse>) {
    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        let Some(result) = result else {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("🧮").size(32.0).color(theme::MUTED));
                ui.label(egui::RichText::new("Enter values and click Calculate").color(theme::MUTED));
            });
            return;
        };

        ui.label(egui::RichText::new("Cost Breakdown").strong());
        breakdown_row(ui, "Base Cost", format_money(result.base_cost), egui::Color32::WHITE);
        breakdown_row(
            ui,
            &format!("Tariff ({}%)", format_number(result.tariff_percentage)),
            format!("+{}", format_money(result.tariff_amount)),
            theme::ORANGE,
        );
        if let Some(premium) = result.risk_premium() {
            breakdown_row(
                ui,
                "🛡 Risk Premium (High Risk)",
                format!("+{}", format_money(premium)),
                theme::RED,
            );
        }
        if let Some(premium) = result.supply_chain_premium() {
            breakdown_row(
                ui,
                "🏭 Supply Chain Premium",
                format!("+{}", format_money(premium)),
                theme::PURPLE,
            );
        }
        ui.separator();
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Final Cost").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format_money(result.final_cost))
                        .size(20.0)
                        .strong()
                        .color(theme::GREEN),
                );
            });
        });
        if let Some(pct) = cost_increase_pct(result) {
            ui.label(
                egui::RichText::new(format!("Total increase: {:.1}%", pct))
                    .small()
                    .color(theme::MUTED),
            );
        }
    });
}

fn show_prediction(ui: &mut egui::Ui, result: &CostSimulationResponse, prediction: &AiPrediction) {
    let risk = |value: Option<i32>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.label(
            egui::RichText::new("🧠 AI Cost Prediction (3 Months)")
                .strong()
                .color(theme::PURPLE),
        );
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Predicted Risk Score").color(theme::MUTED));
            ui.label(egui::RichText::new(risk(prediction.predicted_risk_3m)).strong());
            if prediction.trend != Trend::Stable {
                let (arrow, color) = theme::trend_style(prediction.trend);
                ui.label(egui::RichText::new(arrow).color(color));
            }
        });
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Confidence").color(theme::MUTED));
            ui.label(risk(prediction.confidence) + "%");
        });
    });

    ui.add_space(6.0);
    ui.columns(3, |columns| {
        columns[0].label(egui::RichText::new("3 Months").small().color(theme::MUTED));
        columns[0].label(
            egui::RichText::new(format!(
                "${:.0}",
                estimated_future_cost(result.base_cost, prediction.estimated_future_tariff)
            ))
            .strong(),
        );
        columns[1].label(egui::RichText::new("6 Months").small().color(theme::MUTED));
        columns[1].label(format!("Risk: {}", risk(prediction.predicted_risk_6m)));
        columns[2].label(egui::RichText::new("12 Months").small().color(theme::MUTED));
        columns[2].label(format!("Risk: {}", risk(prediction.predicted_risk_12m)));
    });

    ui.add_space(6.0);
    ui.label(format!(
        "AI Recommendation: Based on the predicted trend, consider {} to optimize costs.",
        recommendation(prediction.trend)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tariff() {
        let state = CostSimulatorState::default();
        assert_eq!(state.form.tariff_percentage, "15");
        assert_eq!(state.tab, CostTab::Calculator);
    }

    #[test]
    fn test_country_tariff_prefill() {
        let mut state = CostSimulatorState::default();
        state.apply_country_tariff(25.0);
        assert_eq!(state.form.tariff_percentage, "25");

        state.apply_country_tariff(0.0);
        assert_eq!(state.form.tariff_percentage, "25");

        state.apply_country_tariff(7.5);
        assert_eq!(state.form.tariff_percentage, "7.5");
    }

    #[test]
    fn test_submit_records_validation_error() {
        let mut state = CostSimulatorState::default();
        assert!(state.submit(Some("CN")).is_none());
        assert_eq!(state.error.as_deref(), Some("Please enter a valid base cost"));

        state.form.base_cost = "1000".to_string();
        let request = state.submit(Some("CN")).unwrap();
        assert_eq!(request.tariff_percentage, 15.0);
        assert_eq!(state.error, None);
    }
}
