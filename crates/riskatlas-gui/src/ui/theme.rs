//! Colours and glyphs shared by the panels.

use eframe::egui::{self, Color32};
use riskatlas_core::analysis::{FriendShoreRating, RiskBand, SuitabilityBand};
use riskatlas_core::types::{Impact, Trend};

pub const GREEN: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);
pub const YELLOW: Color32 = Color32::from_rgb(0xea, 0xb3, 0x08);
pub const ORANGE: Color32 = Color32::from_rgb(0xf9, 0x73, 0x16);
pub const RED: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
pub const BLUE: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
pub const PURPLE: Color32 = Color32::from_rgb(0xa8, 0x55, 0xf7);
pub const MUTED: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);

pub const CARD_FILL: Color32 = Color32::from_rgb(0x1e, 0x29, 0x3b);
pub const PANEL_FILL: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);
pub const MAP_FILL: Color32 = Color32::from_rgb(0x0b, 0x12, 0x20);

/// Score stops of the marker colour scale.
const RISK_STOPS: [(f32, Color32); 4] = [(0.0, GREEN), (50.0, YELLOW), (70.0, ORANGE), (100.0, RED)];

/// Linear colour scale over the risk score.
pub fn risk_color(score: i32) -> Color32 {
    let score = (score as f32).clamp(0.0, 100.0);
    for pair in RISK_STOPS.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if score <= hi {
            let t = (score - lo) / (hi - lo);
            return lerp(lo_color, hi_color, t);
        }
    }
    RED
}

fn lerp(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

pub fn band_color(band: RiskBand) -> Color32 {
    match band {
        RiskBand::Low => GREEN,
        RiskBand::Elevated => YELLOW,
        RiskBand::Severe => RED,
    }
}

pub fn friend_shore_color(rating: FriendShoreRating) -> Color32 {
    match rating {
        FriendShoreRating::Excellent => GREEN,
        FriendShoreRating::Good => BLUE,
        FriendShoreRating::Evaluate => YELLOW,
    }
}

pub fn suitability_color(band: SuitabilityBand) -> Color32 {
    match band {
        SuitabilityBand::Strong => GREEN,
        SuitabilityBand::Moderate => YELLOW,
        SuitabilityBand::Weak => ORANGE,
    }
}

pub fn impact_style(impact: Impact) -> (&'static str, Color32) {
    match impact {
        Impact::High => ("⚠", RED),
        Impact::Medium => ("❗", ORANGE),
        Impact::Low => ("ℹ", BLUE),
    }
}

pub fn trend_style(trend: Trend) -> (&'static str, Color32) {
    match trend {
        Trend::Increasing => ("⬈", RED),
        Trend::Decreasing => ("⬊", GREEN),
        Trend::Stable => ("➡", MUTED),
    }
}

/// Risk level label colour for free-form backend strings.
pub fn level_color(level: &str) -> Color32 {
    match level {
        "Critical" => RED,
        "High" => ORANGE,
        "Medium" => YELLOW,
        "Low" => GREEN,
        _ => MUTED,
    }
}

/// Card frame used across the panels.
pub fn card() -> egui::Frame {
    egui::Frame::new()
        .fill(CARD_FILL)
        .corner_radius(6.0)
        .inner_margin(12.0)
}

/// Section title with a leading glyph.
pub fn section_heading(ui: &mut egui::Ui, icon: &str, title: &str) {
    ui.label(
        egui::RichText::new(format!("{} {}", icon, title))
            .size(15.0)
            .strong(),
    );
    ui.add_space(6.0);
}

/// Thin horizontal bar filled to `fraction`.
pub fn bar(ui: &mut egui::Ui, fraction: f32, color: Color32) {
    let width = ui.available_width().max(40.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 6.0), egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 3.0, Color32::from_gray(60));
    let mut filled = rect;
    filled.set_width(rect.width() * fraction.clamp(0.0, 1.0));
    painter.rect_filled(filled, 3.0, color);
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = PANEL_FILL;
    visuals.window_fill = PANEL_FILL;
    ctx.set_visuals(visuals);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_color_stops() {
        assert_eq!(risk_color(0), GREEN);
        assert_eq!(risk_color(50), YELLOW);
        assert_eq!(risk_color(70), ORANGE);
        assert_eq!(risk_color(100), RED);
    }

    #[test]
    fn test_risk_color_clamps_and_interpolates() {
        assert_eq!(risk_color(-20), GREEN);
        assert_eq!(risk_color(140), RED);

        let mid = risk_color(60);
        assert_eq!(mid, lerp(YELLOW, ORANGE, 0.5));
        assert!(mid.g() < YELLOW.g() && mid.g() > ORANGE.g());
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(band_color(RiskBand::from_score(30)), GREEN);
        assert_eq!(band_color(RiskBand::from_score(55)), YELLOW);
        assert_eq!(band_color(RiskBand::from_score(85)), RED);
    }
}
