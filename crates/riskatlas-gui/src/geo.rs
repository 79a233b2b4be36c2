//! Map projection and country outlines.

use eframe::egui::{pos2, Pos2, Rect};
use geojson::{Feature, GeoJson, Value};
use riskatlas_core::config::MapConfig;
use riskatlas_core::error::GeoError;
use std::f64::consts::FRAC_PI_4;
use std::path::Path;

/// Latitude limit of the Mercator projection.
pub const MAX_LATITUDE: f64 = 85.0;

/// Graticule spacing in degrees.
pub const GRATICULE_STEP: i32 = 30;

/// Low-resolution world outlines keyed by alpha-3 id, used when no
/// `map.geojson_path` is configured.
pub const BUNDLED_COUNTRIES: &str = include_str!("../assets/countries.geojson");

/// Mercator projection into the map's base frame.
///
/// The base frame is in points with its origin at the centre of the map rect
/// and y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    /// `[longitude, latitude]` placed at the origin
    pub center: [f64; 2],
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            scale: 140.0,
            center: [0.0, 25.0],
        }
    }
}

impl From<&MapConfig> for Projection {
    fn from(config: &MapConfig) -> Self {
        Self {
            scale: config.projection_scale,
            center: config.projection_center,
        }
    }
}

fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (FRAC_PI_4 + lat / 2.0).tan().ln()
}

impl Projection {
    pub fn project(&self, lng: f64, lat: f64) -> Pos2 {
        let x = self.scale * (lng - self.center[0]).to_radians();
        let y = -self.scale * (mercator_y(lat) - mercator_y(self.center[1]));
        pos2(x as f32, y as f32)
    }

    pub fn unproject(&self, point: Pos2) -> (f64, f64) {
        let lng = (point.x as f64 / self.scale).to_degrees() + self.center[0];
        let merc = -(point.y as f64) / self.scale + mercator_y(self.center[1]);
        let lat = (2.0 * merc.exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
        (lng, lat)
    }

    /// Parallels and meridians every [`GRATICULE_STEP`] degrees.
    pub fn graticule(&self) -> Vec<Vec<Pos2>> {
        let mut lines = Vec::new();

        for lat in (-60..=60).step_by(GRATICULE_STEP as usize) {
            let line = (-180..=180)
                .step_by(5)
                .map(|lng| self.project(lng as f64, lat as f64))
                .collect();
            lines.push(line);
        }

        for lng in (-180..=180).step_by(GRATICULE_STEP as usize) {
            let line = (-80..=80)
                .step_by(5)
                .map(|lat| self.project(lng as f64, lat as f64))
                .collect();
            lines.push(line);
        }

        lines
    }
}

/// A projected polygon: the outer ring followed by its holes.
pub type Polygon = Vec<Vec<Pos2>>;

#[derive(Debug, Clone)]
pub struct CountryShape {
    /// ISO alpha-3 code
    pub iso3: String,
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
    /// Triangles covering each polygon's outer ring, for filling.
    pub fill: Vec<[Pos2; 3]>,
    pub bounds: Rect,
}

impl CountryShape {
    /// Even-odd test against each polygon, so holes are excluded.
    pub fn contains(&self, point: Pos2) -> bool {
        if !self.bounds.contains(point) {
            return false;
        }
        self.polygons.iter().any(|polygon| {
            polygon
                .iter()
                .filter(|ring| ring_contains(ring, point))
                .count()
                % 2
                == 1
        })
    }

    /// Every ring of every polygon.
    pub fn rings(&self) -> impl Iterator<Item = &Vec<Pos2>> {
        self.polygons.iter().flatten()
    }
}

fn signed_area(points: &[Pos2]) -> f32 {
    let mut sum = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

fn turn(a: Pos2, b: Pos2, c: Pos2) -> f32 {
    (b - a).x * (c - b).y - (b - a).y * (c - b).x
}

fn triangle_contains(a: Pos2, b: Pos2, c: Pos2, p: Pos2) -> bool {
    let edge = |from: Pos2, to: Pos2| (to - from).x * (p - from).y - (to - from).y * (p - from).x;
    edge(a, b) >= 0.0 && edge(b, c) >= 0.0 && edge(c, a) >= 0.0
}

/// Ear-clipping triangulation of a simple ring.
///
/// Holes are not cut out. A self-intersecting ring yields a partial fill.
pub fn triangulate(ring: &[Pos2]) -> Vec<[Pos2; 3]> {
    let mut points = ring.to_vec();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return Vec::new();
    }
    if signed_area(&points) < 0.0 {
        points.reverse();
    }

    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len() - 2);
    let mut i = 0;
    let mut misses = 0;

    while remaining.len() > 3 {
        let n = remaining.len();
        i %= n;
        let (prev, cur, next) = (remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]);
        let (a, b, c) = (points[prev], points[cur], points[next]);

        let corner = turn(a, b, c);
        if corner.abs() <= f32::EPSILON {
            // Collinear: the vertex adds no area.
            remaining.remove(i);
            misses = 0;
            continue;
        }

        let is_ear = corner > 0.0
            && !remaining.iter().any(|&k| {
                k != prev
                    && k != cur
                    && k != next
                    && ![a, b, c].contains(&points[k])
                    && triangle_contains(a, b, c, points[k])
            });

        if is_ear {
            triangles.push([a, b, c]);
            remaining.remove(i);
            misses = 0;
        } else {
            i += 1;
            misses += 1;
            if misses > remaining.len() {
                break;
            }
        }
    }

    if let [a, b, c] = remaining[..] {
        triangles.push([points[a], points[b], points[c]]);
    }
    triangles
}

fn ring_contains(ring: &[Pos2], point: Pos2) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Country outlines keyed by alpha-3 code.
#[derive(Debug, Clone, Default)]
pub struct CountryShapes {
    shapes: Vec<CountryShape>,
}

impl CountryShapes {
    pub fn load(path: &Path, projection: &Projection) -> Result<Self, GeoError> {
        let raw = std::fs::read_to_string(path).map_err(|e| GeoError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let shapes = Self::from_geojson_str(&raw, projection)?;
        tracing::info!(
            "Loaded {} country outlines from {}",
            shapes.len(),
            path.display()
        );
        Ok(shapes)
    }

    /// Outlines compiled into the binary.
    pub fn bundled(projection: &Projection) -> Result<Self, GeoError> {
        let shapes = Self::from_geojson_str(BUNDLED_COUNTRIES, projection)?;
        tracing::info!("Loaded {} bundled country outlines", shapes.len());
        Ok(shapes)
    }

    pub fn from_geojson_str(raw: &str, projection: &Projection) -> Result<Self, GeoError> {
        let geojson: GeoJson = raw.parse().map_err(|e| GeoError::parse(format!("{}", e)))?;
        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            _ => return Err(GeoError::parse("expected a FeatureCollection")),
        };

        let mut shapes = Vec::new();
        for feature in &collection.features {
            let Some(iso3) = feature_code(feature) else {
                tracing::debug!("Skipping feature without an alpha-3 code");
                continue;
            };

            let polygons = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Polygon(rings)) => vec![project_polygon(rings, projection)],
                Some(Value::MultiPolygon(parts)) => parts
                    .iter()
                    .map(|rings| project_polygon(rings, projection))
                    .collect(),
                _ => {
                    tracing::debug!("Skipping {}: not a polygon", iso3);
                    continue;
                }
            };

            let bounds = polygons
                .iter()
                .flatten()
                .flatten()
                .fold(Rect::NOTHING, |rect, p| rect.union(Rect::from_min_max(*p, *p)));

            let name = ["name", "NAME", "ADMIN"]
                .iter()
                .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
                .map(str::to_string);

            let fill = polygons
                .iter()
                .filter_map(|polygon| polygon.first())
                .flat_map(|outer| triangulate(outer))
                .collect();

            shapes.push(CountryShape {
                iso3,
                name,
                polygons,
                fill,
                bounds,
            });
        }

        Ok(Self { shapes })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryShape> {
        self.shapes.iter()
    }

    pub fn get(&self, iso3: &str) -> Option<&CountryShape> {
        self.shapes.iter().find(|s| s.iso3.eq_ignore_ascii_case(iso3))
    }

    /// Alpha-3 code of the country under a base-frame point.
    pub fn hit_test(&self, world: Pos2) -> Option<&str> {
        self.shapes
            .iter()
            .find(|shape| shape.contains(world))
            .map(|shape| shape.iso3.as_str())
    }
}

fn feature_code(feature: &Feature) -> Option<String> {
    let from_id = match &feature.id {
        Some(geojson::feature::Id::String(id)) => Some(id.clone()),
        _ => None,
    };

    from_id
        .into_iter()
        .chain(
            ["ISO_A3", "iso_a3", "ADM0_A3"]
                .iter()
                .filter_map(|key| feature.property(key).and_then(|v| v.as_str()))
                .map(str::to_string),
        )
        .find(|code| code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|code| code.to_ascii_uppercase())
}

fn project_polygon(rings: &[Vec<Vec<f64>>], projection: &Projection) -> Polygon {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|position| position.len() >= 2)
                .map(|position| projection.project(position[0], position[1]))
                .collect()
        })
        .filter(|ring: &Vec<Pos2>| ring.len() >= 3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "FRA",
                "properties": {"name": "France"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0.0, 40.0], [10.0, 40.0], [10.0, 50.0], [0.0, 50.0], [0.0, 40.0]],
                        [[4.0, 44.0], [6.0, 44.0], [6.0, 46.0], [4.0, 46.0], [4.0, 44.0]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {"ISO_A3": "jpn", "NAME": "Japan"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[130.0, 30.0], [135.0, 30.0], [135.0, 35.0], [130.0, 30.0]]],
                        [[[140.0, 40.0], [145.0, 40.0], [145.0, 45.0], [140.0, 45.0], [140.0, 40.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "id": "-99",
                "properties": {"ISO_A3": "-99", "ADM0_A3": "KOS"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[20.0, 42.0], [21.0, 42.0], [21.0, 43.0], [20.0, 43.0], [20.0, 42.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "Nowhere"},
                "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
            }
        ]
    }"#;

    #[test]
    fn test_projection_center_maps_to_origin() {
        let projection = Projection::default();
        let origin = projection.project(0.0, 25.0);
        assert!(origin.x.abs() < 1e-4 && origin.y.abs() < 1e-4);

        let north = projection.project(0.0, 60.0);
        let east = projection.project(90.0, 25.0);
        assert!(north.y < 0.0);
        assert!(east.x > 0.0);
        assert!((east.x - (140.0 * std::f64::consts::FRAC_PI_2) as f32).abs() < 1e-3);
    }

    #[test]
    fn test_projection_round_trip_and_clamp() {
        let projection = Projection::default();
        let (lng, lat) = projection.unproject(projection.project(-77.0, 38.9));
        assert!((lng + 77.0).abs() < 1e-3);
        assert!((lat - 38.9).abs() < 1e-3);

        assert_eq!(projection.project(0.0, 89.0), projection.project(0.0, 85.0));
        assert!(projection.project(0.0, -90.0).y.is_finite());
    }

    #[test]
    fn test_graticule() {
        let lines = Projection::default().graticule();
        // 5 parallels (-60..=60) and 13 meridians (-180..=180)
        assert_eq!(lines.len(), 18);
        assert!(lines.iter().all(|line| line.len() > 2));
    }

    #[test]
    fn test_parse_feature_codes() {
        let shapes = CountryShapes::from_geojson_str(SAMPLE, &Projection::default()).unwrap();
        assert_eq!(shapes.len(), 3);

        let france = shapes.get("FRA").unwrap();
        assert_eq!(france.name.as_deref(), Some("France"));
        assert_eq!(france.polygons.len(), 1);
        assert_eq!(france.polygons[0].len(), 2);

        let japan = shapes.get("JPN").unwrap();
        assert_eq!(japan.name.as_deref(), Some("Japan"));
        assert_eq!(japan.polygons.len(), 2);
        assert_eq!(japan.rings().count(), 2);

        assert!(shapes.get("KOS").is_some());
    }

    #[test]
    fn test_hit_test_respects_holes() {
        let projection = Projection::default();
        let shapes = CountryShapes::from_geojson_str(SAMPLE, &projection).unwrap();

        assert_eq!(shapes.hit_test(projection.project(2.0, 42.0)), Some("FRA"));
        assert_eq!(shapes.hit_test(projection.project(5.0, 45.0)), None);
        assert_eq!(shapes.hit_test(projection.project(142.0, 42.0)), Some("JPN"));
        assert_eq!(shapes.hit_test(projection.project(-40.0, 0.0)), None);
    }

    #[test]
    fn test_rejects_non_collections() {
        let projection = Projection::default();
        assert!(CountryShapes::from_geojson_str("not json", &projection).is_err());
        assert!(CountryShapes::from_geojson_str(
            r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#,
            &projection
        )
        .is_err());
    }

    fn triangles_area(triangles: &[[Pos2; 3]]) -> f32 {
        triangles.iter().map(|t| signed_area(t).abs()).sum()
    }

    #[test]
    fn test_triangulate_concave_ring() {
        // L-shape with the closing point repeated.
        let ring = vec![
            pos2(0.0, 0.0),
            pos2(0.0, 20.0),
            pos2(10.0, 20.0),
            pos2(10.0, 10.0),
            pos2(20.0, 10.0),
            pos2(20.0, 0.0),
            pos2(0.0, 0.0),
        ];
        let triangles = triangulate(&ring);

        assert_eq!(triangles.len(), 4);
        assert!((triangles_area(&triangles) - 300.0).abs() < 1e-3);
        // Nothing spills into the notch.
        assert!(!triangles
            .iter()
            .any(|[a, b, c]| triangle_contains(*a, *b, *c, pos2(15.0, 15.0))
                || triangle_contains(*c, *b, *a, pos2(15.0, 15.0))));
    }

    #[test]
    fn test_triangulate_degenerate_rings() {
        assert!(triangulate(&[pos2(0.0, 0.0), pos2(1.0, 1.0)]).is_empty());

        let with_collinear = [pos2(0.0, 0.0), pos2(5.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)];
        let triangles = triangulate(&with_collinear);
        assert!((triangles_area(&triangles) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_parsed_shapes_carry_fill() {
        let shapes = CountryShapes::from_geojson_str(SAMPLE, &Projection::default()).unwrap();
        let japan = shapes.get("JPN").unwrap();
        // A triangle and a quad.
        assert_eq!(japan.fill.len(), 3);
    }

    #[test]
    fn test_bundled_outlines() {
        let projection = Projection::default();
        let shapes = CountryShapes::bundled(&projection).unwrap();

        assert!(shapes.len() >= 170);
        assert_eq!(shapes.get("CHN").unwrap().name.as_deref(), Some("China"));
        assert_eq!(shapes.hit_test(projection.project(116.4, 39.9)), Some("CHN"));
        assert_eq!(shapes.hit_test(projection.project(-47.9, -15.8)), Some("BRA"));
        assert_eq!(shapes.hit_test(projection.project(-30.0, 0.0)), None);

        let brazil = shapes.get("BRA").unwrap();
        let outline_area = signed_area(&brazil.polygons[0][0]).abs();
        assert!((triangles_area(&brazil.fill) - outline_area).abs() < outline_area * 1e-3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = CountryShapes::load(
            Path::new("/nonexistent/countries.geojson"),
            &Projection::default(),
        );
        assert!(matches!(result, Err(GeoError::Io { .. })));
    }
}
