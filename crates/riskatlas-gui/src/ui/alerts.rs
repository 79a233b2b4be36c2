//! Policy alert feed.

use crate::fetch::Fetch;
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::analysis::{summarize_industries, ALERT_CATEGORIES};
use riskatlas_core::types::PolicyAlert;

fn category_color(category: &str) -> egui::Color32 {
    match category {
        "Export Control" => theme::PURPLE,
        "Export Restriction" => theme::RED,
        "Tariff" => theme::ORANGE,
        "Subsidy" | "Incentive" => theme::GREEN,
        "Policy" => theme::BLUE,
        "Regulation" => egui::Color32::from_rgb(0x06, 0xb6, 0xd4),
        _ => theme::MUTED,
    }
}

/// What the feed body shows for a given load state.
#[derive(Debug, PartialEq)]
enum FeedView<'a> {
    Failed(&'a str),
    /// Skeleton cards. A stale list is hidden until the reload settles.
    Loading,
    List(&'a [PolicyAlert]),
    Empty,
}

fn feed_view(alerts: &Fetch<Vec<PolicyAlert>>) -> FeedView<'_> {
    match alerts {
        Fetch::Failed(error) => FeedView::Failed(error),
        Fetch::Loading { .. } => FeedView::Loading,
        Fetch::Ready(list) if !list.is_empty() => FeedView::List(list),
        Fetch::Ready(_) | Fetch::Idle => FeedView::Empty,
    }
}

/// Shows the feed. Returns true when the category filter changed.
pub fn show(
    ui: &mut egui::Ui,
    category: &mut &'static str,
    alerts: &Fetch<Vec<PolicyAlert>>,
    country_name: Option<&str>,
) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        theme::section_heading(ui, "🔔", "Policy Alerts");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new("● LIVE").small().color(theme::RED));
        });
    });
    ui.label(
        egui::RichText::new(match country_name {
            Some(name) => format!("Real-time trade policy updates for {}", name),
            None => "Real-time trade policy updates".to_string(),
        })
        .small()
        .color(theme::MUTED),
    );

    ui.horizontal_wrapped(|ui| {
        for candidate in ALERT_CATEGORIES {
            let label = if candidate == "all" { "All" } else { candidate };
            if ui
                .selectable_label(*category == candidate, label)
                .clicked()
                && *category != candidate
            {
                *category = candidate;
                changed = true;
            }
        }
    });
    ui.separator();

    match feed_view(alerts) {
        FeedView::Failed(error) => {
            ui.colored_label(theme::RED, "Failed to load policy alerts");
            ui.label(egui::RichText::new(error).small().color(theme::MUTED));
        }
        FeedView::Loading => {
            for _ in 0..4 {
                let size = egui::vec2(ui.available_width(), 64.0);
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                ui.painter().rect_filled(rect, 6.0, egui::Color32::from_gray(40));
                ui.add_space(6.0);
            }
        }
        FeedView::List(list) => {
            egui::ScrollArea::vertical()
                .id_salt("alerts_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for alert in list {
                        alert_card(ui, alert);
                        ui.add_space(6.0);
                    }
                });
        }
        FeedView::Empty => {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label(egui::RichText::new("🔔").size(32.0).color(theme::MUTED));
                ui.label(egui::RichText::new("No policy alerts found").color(theme::MUTED));
            });
        }
    }

    changed
}

fn alert_card(ui: &mut egui::Ui, alert: &PolicyAlert) {
    let (icon, impact_color) = theme::impact_style(alert.impact);

    theme::card().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(icon).size(16.0).color(impact_color));
            ui.label(egui::RichText::new(&alert.title).strong());
        });
        ui.label(egui::RichText::new(&alert.description).small());

        ui.horizontal_wrapped(|ui| {
            ui.label(
                egui::RichText::new(format!("{} Impact", alert.impact))
                    .small()
                    .color(impact_color),
            );
            ui.label(
                egui::RichText::new(&alert.category)
                    .small()
                    .color(category_color(&alert.category)),
            );
            ui.label(egui::RichText::new(&alert.country).small().monospace());
            ui.label(egui::RichText::new(&alert.date).small().color(theme::MUTED));
        });

        let (shown, more) = summarize_industries(&alert.affected_industries, 3);
        if !shown.is_empty() {
            let text = match more {
                Some(n) => format!("Affects: {} +{} more", shown, n),
                None => format!("Affects: {}", shown),
            };
            ui.label(egui::RichText::new(text).small().color(theme::MUTED));
        }
    });
}
