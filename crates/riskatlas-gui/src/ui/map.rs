//! World map with risk markers.
//!
//! Pointer input is fed into [`Viewport`] by hand rather than through egui's
//! drag detection so that the click/drag threshold and per-frame zoom
//! coalescing behave the same everywhere.

use crate::geo::{CountryShape, CountryShapes, Projection};
use crate::ui::theme;
use crate::viewport::{PointerRelease, Viewport};
use eframe::egui::{self, Color32, Mesh, Pos2, Rect, Shape, Stroke};
use riskatlas_core::country_codes::{iso2_to_iso3, iso3_to_iso2};
use riskatlas_core::types::Country;

const MARKER_RADIUS: f32 = 5.0;
const SELECTED_MARKER_RADIUS: f32 = 8.0;
/// Extra pick slop around a marker, in points.
const MARKER_SLOP: f32 = 3.0;
const ZOOM_STEP: f32 = 1.5;

const LAND_FILL: Color32 = Color32::from_rgb(0x16, 0x23, 0x3a);
const HOVER_FILL: Color32 = Color32::from_rgb(0x24, 0x38, 0x5c);

pub struct MapPanelState {
    pub viewport: Viewport,
    pub projection: Projection,
    pub shapes: CountryShapes,
}

impl MapPanelState {
    pub fn new(viewport: Viewport, projection: Projection, shapes: CountryShapes) -> Self {
        Self {
            viewport,
            projection,
            shapes,
        }
    }
}

/// Country under `screen` (relative to the map origin): markers first, then outlines.
pub fn pick_country<'a>(
    state: &MapPanelState,
    countries: &'a [Country],
    selected: Option<&str>,
    screen: Pos2,
) -> Option<&'a Country> {
    let marker = countries
        .iter()
        .map(|country| {
            let world = state
                .projection
                .project(country.coordinates.lng, country.coordinates.lat);
            let distance = state.viewport.world_to_screen(world).distance(screen);
            (country, distance)
        })
        .filter(|(country, distance)| *distance <= marker_radius(country, selected) + MARKER_SLOP)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(country, _)| country);

    marker.or_else(|| {
        let iso3 = state.shapes.hit_test(state.viewport.screen_to_world(screen))?;
        let iso2 = iso3_to_iso2(iso3)?;
        countries.iter().find(|c| c.id.eq_ignore_ascii_case(iso2))
    })
}

/// Appends `shape`'s fill triangles to `mesh`.
fn add_fill(mesh: &mut Mesh, shape: &CountryShape, color: Color32, to_screen: impl Fn(Pos2) -> Pos2) {
    for triangle in &shape.fill {
        let base = mesh.vertices.len() as u32;
        for point in triangle {
            mesh.colored_vertex(to_screen(*point), color);
        }
        mesh.add_triangle(base, base + 1, base + 2);
    }
}

/// Tint for the outline under the pointer: the risk colour if tracked.
fn hover_fill(tracked: Option<&Country>) -> Color32 {
    match tracked {
        Some(country) => theme::risk_color(country.risk_score).gamma_multiply(0.45),
        None => HOVER_FILL,
    }
}

fn marker_radius(country: &Country, selected: Option<&str>) -> f32 {
    if selected == Some(country.id.as_str()) {
        SELECTED_MARKER_RADIUS
    } else {
        MARKER_RADIUS
    }
}

/// Shows the map. Returns the id of a clicked country.
pub fn show(
    ui: &mut egui::Ui,
    state: &mut MapPanelState,
    countries: &[Country],
    selected: Option<&str>,
) -> Option<String> {
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let rect = response.rect;
    let origin = rect.center();
    let local = |p: Pos2| Pos2::ZERO + (p - origin);

    let clicked_at = handle_input(ui, &response, state, origin);
    if state.viewport.commit_frame() {
        ui.ctx().request_repaint();
    }

    let painter = painter.with_clip_rect(rect);
    painter.rect_filled(rect, 0.0, theme::MAP_FILL);

    let transform = state.viewport.transform();
    let to_screen = |world: Pos2| origin + transform.apply(world).to_vec2();

    for line in state.projection.graticule() {
        let points: Vec<Pos2> = line.into_iter().map(to_screen).collect();
        painter.add(Shape::line(points, Stroke::new(0.5, Color32::from_gray(40))));
    }

    let hovered_iso3 = response
        .hover_pos()
        .filter(|_| !state.viewport.is_dragging())
        .and_then(|hover| state.shapes.hit_test(state.viewport.screen_to_world(local(hover))));
    let selected_iso3 = selected.and_then(iso2_to_iso3);

    let mut land = Mesh::default();
    let mut outlines = Vec::new();
    for shape in state.shapes.iter() {
        let bounds = Rect::from_two_pos(to_screen(shape.bounds.min), to_screen(shape.bounds.max));
        if !bounds.intersects(rect) {
            continue;
        }

        let tracked = iso3_to_iso2(&shape.iso3)
            .and_then(|iso2| countries.iter().find(|c| c.id.eq_ignore_ascii_case(iso2)));
        let fill = if hovered_iso3 == Some(shape.iso3.as_str()) {
            hover_fill(tracked)
        } else {
            LAND_FILL
        };
        add_fill(&mut land, shape, fill, to_screen);

        let stroke = if selected_iso3 == Some(shape.iso3.as_str()) {
            Stroke::new(2.0, Color32::WHITE)
        } else {
            match tracked {
                Some(country) => Stroke::new(1.0, theme::risk_color(country.risk_score)),
                None => Stroke::new(0.6, Color32::from_gray(70)),
            }
        };

        for ring in shape.rings() {
            let points: Vec<Pos2> = ring.iter().map(|p| to_screen(*p)).collect();
            outlines.push(Shape::closed_line(points, stroke));
        }
    }
    painter.add(Shape::mesh(land));
    painter.extend(outlines);

    let mut markers: Vec<&Country> = countries.iter().collect();
    // Selected marker drawn last so it sits on top.
    markers.sort_by_key(|c| selected == Some(c.id.as_str()));
    for country in markers {
        let world = state
            .projection
            .project(country.coordinates.lng, country.coordinates.lat);
        let center = to_screen(world);
        if !rect.expand(SELECTED_MARKER_RADIUS).contains(center) {
            continue;
        }
        let radius = marker_radius(country, selected);
        let is_selected = selected == Some(country.id.as_str());
        painter.circle(
            center,
            radius,
            theme::risk_color(country.risk_score),
            Stroke::new(
                if is_selected { 2.0 } else { 1.0 },
                if is_selected {
                    Color32::WHITE
                } else {
                    Color32::from_black_alpha(160)
                },
            ),
        );
    }

    draw_legend(&painter, rect);

    let mut chosen = clicked_at
        .and_then(|p| pick_country(state, countries, selected, p))
        .map(|c| c.id.clone());

    if !state.viewport.is_dragging() {
        if let Some(hover) = response.hover_pos() {
            if let Some(country) = pick_country(state, countries, selected, local(hover)) {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                response
                    .clone()
                    .on_hover_text_at_pointer(format!("{} - Risk: {}", country.name, country.risk_score));
            } else if let Some(name) = hovered_iso3
                .and_then(|iso3| state.shapes.get(iso3))
                .and_then(|shape| shape.name.as_deref())
            {
                response
                    .clone()
                    .on_hover_text_at_pointer(format!("{} - not tracked", name));
            }
        }
    } else {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    }

    if zoom_controls(ui, rect, &mut state.viewport) {
        chosen = None;
    }

    chosen
}

/// Feeds this frame's pointer events to the viewport. Returns a click position.
fn handle_input(
    ui: &egui::Ui,
    response: &egui::Response,
    state: &mut MapPanelState,
    origin: Pos2,
) -> Option<Pos2> {
    let local = |p: Pos2| Pos2::ZERO + (p - origin);
    let (pointer, pressed, released, down, scroll, zoom) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.raw_scroll_delta,
            i.zoom_delta(),
        )
    });

    let viewport = &mut state.viewport;

    if pressed && response.hovered() {
        if let Some(p) = pointer {
            viewport.pointer_down(local(p));
        }
    }

    if viewport.is_pressed() {
        if let Some(p) = pointer {
            if viewport.pointer_move(local(p)) {
                ui.ctx().request_repaint();
            }
        }
    }

    let mut clicked_at = None;
    if viewport.is_pressed() && released {
        match pointer {
            Some(p) => {
                if let PointerRelease::Click(at) = viewport.pointer_up(local(p)) {
                    clicked_at = Some(at);
                }
            }
            None => viewport.cancel(),
        }
    } else if viewport.is_pressed() && !down {
        viewport.cancel();
    }

    if response.hovered() {
        if let Some(hover) = response.hover_pos() {
            if zoom != 1.0 {
                viewport.queue_zoom(zoom, local(hover));
            } else if scroll.y != 0.0 {
                // egui reports scrolling up as positive.
                viewport.queue_wheel(-scroll.y, local(hover));
            }
        }
    }

    clicked_at
}

/// Returns true if a control consumed the click.
fn zoom_controls(ui: &mut egui::Ui, rect: Rect, viewport: &mut Viewport) -> bool {
    let size = egui::vec2(30.0, 30.0);
    let top_right = rect.right_top() + egui::vec2(-12.0 - size.x, 12.0);
    let mut used = false;

    let buttons: [(&str, &str); 3] = [("+", "Zoom in"), ("−", "Zoom out"), ("⟲", "Reset view")];
    for (index, (label, hint)) in buttons.into_iter().enumerate() {
        let min = top_right + egui::vec2(0.0, index as f32 * (size.y + 4.0));
        let button = egui::Button::new(egui::RichText::new(label).size(16.0)).fill(theme::CARD_FILL);
        if ui
            .put(Rect::from_min_size(min, size), button)
            .on_hover_text(hint)
            .clicked()
        {
            used = true;
            match index {
                0 => {
                    viewport.zoom_by(ZOOM_STEP, Pos2::ZERO);
                }
                1 => {
                    viewport.zoom_by(1.0 / ZOOM_STEP, Pos2::ZERO);
                }
                _ => viewport.reset(),
            }
        }
    }

    used
}

fn draw_legend(painter: &egui::Painter, rect: Rect) {
    let entries = [
        ("Low", theme::risk_color(20)),
        ("Medium", theme::risk_color(50)),
        ("High", theme::risk_color(70)),
        ("Critical", theme::risk_color(95)),
    ];
    let mut pos = rect.left_bottom() + egui::vec2(14.0, -14.0 - 18.0 * entries.len() as f32);
    for (label, color) in entries {
        painter.circle_filled(pos + egui::vec2(5.0, 7.0), 5.0, color);
        painter.text(
            pos + egui::vec2(16.0, 0.0),
            egui::Align2::LEFT_TOP,
            label,
            egui::FontId::proportional(12.0),
            theme::MUTED,
        );
        pos.y += 18.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportConfig;
    use riskatlas_core::types::{Coordinates, RiskLevel, Trend};

    const OUTLINES: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": "BRA",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-70.0, -30.0], [-35.0, -30.0], [-35.0, 5.0], [-70.0, 5.0], [-70.0, -30.0]]]
            }
        }]
    }"#;

    fn country(id: &str, lat: f64, lng: f64) -> Country {
        Country {
            id: id.to_string(),
            name: id.to_string(),
            risk_score: 60,
            risk_level: RiskLevel::Medium,
            risk_trend: Trend::Stable,
            tariff_percentage: 10.0,
            coordinates: Coordinates { lat, lng },
            key_industries: vec![],
            supply_chain_risk: None,
            friend_shore_score: None,
        }
    }

    fn state() -> MapPanelState {
        let projection = Projection::default();
        let shapes = CountryShapes::from_geojson_str(OUTLINES, &projection).unwrap();
        MapPanelState::new(Viewport::new(ViewportConfig::default()), projection, shapes)
    }

    #[test]
    fn test_pick_marker() {
        let state = state();
        let countries = vec![country("DE", 51.2, 10.4), country("FR", 46.2, 2.2)];
        let germany = state.projection.project(10.4, 51.2);

        let picked = pick_country(&state, &countries, None, germany + egui::vec2(3.0, 0.0));
        assert_eq!(picked.map(|c| c.id.as_str()), Some("DE"));

        let far = pick_country(&state, &countries, None, germany + egui::vec2(40.0, 40.0));
        assert!(far.is_none());
    }

    #[test]
    fn test_selected_marker_has_larger_target() {
        let state = state();
        let countries = vec![country("DE", 51.2, 10.4)];
        let near = state.projection.project(10.4, 51.2) + egui::vec2(10.0, 0.0);

        assert!(pick_country(&state, &countries, None, near).is_none());
        assert!(pick_country(&state, &countries, Some("DE"), near).is_some());
    }

    #[test]
    fn test_pick_outline_when_no_marker() {
        let state = state();
        let countries = vec![country("BR", -14.2, -51.9), country("DE", 51.2, 10.4)];

        let inside = state.projection.project(-60.0, -20.0);
        let picked = pick_country(&state, &countries, None, inside);
        assert_eq!(picked.map(|c| c.id.as_str()), Some("BR"));

        // Outlines of untracked countries are not selectable.
        let untracked = vec![country("DE", 51.2, 10.4)];
        assert!(pick_country(&state, &untracked, None, inside).is_none());
    }

    #[test]
    fn test_fill_mesh_and_hover_tint() {
        let state = state();
        let brazil = state.shapes.get("BRA").unwrap();
        let mut mesh = Mesh::default();

        add_fill(&mut mesh, brazil, HOVER_FILL, |p| p + egui::vec2(100.0, 50.0));
        assert_eq!(brazil.fill.len(), 2);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(mesh.vertices.iter().all(|v| v.color == HOVER_FILL));
        assert_eq!(mesh.vertices[0].pos, brazil.fill[0][0] + egui::vec2(100.0, 50.0));

        let tracked = country("BR", -14.2, -51.9);
        assert_ne!(hover_fill(Some(&tracked)), HOVER_FILL);
        assert_eq!(hover_fill(None), HOVER_FILL);
    }

    #[test]
    fn test_pick_follows_viewport() {
        let mut state = state();
        let countries = vec![country("DE", 51.2, 10.4)];
        let world = state.projection.project(10.4, 51.2);

        state.viewport.zoom_by(4.0, Pos2::ZERO);
        assert!(pick_country(&state, &countries, None, world).is_none());

        let screen = state.viewport.world_to_screen(world);
        assert!(pick_country(&state, &countries, None, screen).is_some());
    }
}
