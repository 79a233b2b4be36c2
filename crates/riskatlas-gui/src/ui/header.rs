//! Top bar with branding and backend health.

use crate::fetch::Fetch;
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::types::HealthStatus;

/// Backend reachability as shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connecting,
    Live,
    Offline,
}

impl Connectivity {
    pub fn from_health(health: &Fetch<HealthStatus>) -> Self {
        match health {
            Fetch::Failed(_) => Connectivity::Offline,
            _ => match health.value() {
                Some(status) if status.is_healthy() => Connectivity::Live,
                Some(_) => Connectivity::Offline,
                None => Connectivity::Connecting,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Connectivity::Connecting => "Connecting...",
            Connectivity::Live => "Live Monitoring",
            Connectivity::Offline => "API Offline",
        }
    }

    fn color(&self) -> egui::Color32 {
        match self {
            Connectivity::Connecting => theme::MUTED,
            Connectivity::Live => theme::GREEN,
            Connectivity::Offline => theme::RED,
        }
    }
}

/// Shows the header bar.
pub fn show(
    ui: &mut egui::Ui,
    health: &Fetch<HealthStatus>,
    country_count: Option<usize>,
    last_updated: Option<chrono::DateTime<chrono::Local>>,
) {
    let connectivity = Connectivity::from_health(health);

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("🌐").size(26.0));
        ui.vertical(|ui| {
            ui.label(egui::RichText::new("RiskAtlas").size(20.0).strong());
            ui.label(
                egui::RichText::new("Global Trade Risk Intelligence")
                    .small()
                    .color(theme::MUTED),
            );
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(count) = country_count {
                ui.label(
                    egui::RichText::new(format!("{} countries tracked", count))
                        .color(theme::MUTED),
                );
                ui.separator();
            }

            if let Some(at) = last_updated {
                ui.label(
                    egui::RichText::new(format!("Updated {}", at.format("%H:%M:%S")))
                        .small()
                        .color(theme::MUTED),
                );
                ui.separator();
            }

            let color = connectivity.color();
            ui.label(egui::RichText::new(connectivity.label()).color(color));
            let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().circle_filled(rect.center(), 4.0, color);

            if let Some(version) = health.value().and_then(|h| h.version.as_deref()) {
                ui.label(
                    egui::RichText::new(format!("API v{}", version))
                        .small()
                        .color(theme::MUTED),
                );
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_from_health() {
        let idle: Fetch<HealthStatus> = Fetch::Idle;
        assert_eq!(Connectivity::from_health(&idle), Connectivity::Connecting);

        let failed: Fetch<HealthStatus> = Fetch::Failed("connection refused".to_string());
        assert_eq!(Connectivity::from_health(&failed), Connectivity::Offline);
        assert_eq!(Connectivity::Offline.label(), "API Offline");

        let healthy = Fetch::Ready(HealthStatus {
            status: "healthy".to_string(),
            timestamp: None,
            version: Some("2.0.0".to_string()),
        });
        assert_eq!(Connectivity::from_health(&healthy), Connectivity::Live);

        let degraded = Fetch::Ready(HealthStatus {
            status: "degraded".to_string(),
            timestamp: None,
            version: None,
        });
        assert_eq!(Connectivity::from_health(&degraded), Connectivity::Offline);
    }
}
