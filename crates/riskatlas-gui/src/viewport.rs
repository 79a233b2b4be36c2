//! Pan/zoom state of the world map.
//!
//! All positions handled here are relative to the map origin (the centre of the
//! map rect). World space is the projected base frame produced by
//! [`crate::geo::Projection`]; screen space is world space after the transform.
//!
//! The viewport keeps two transforms: the *live* one that is drawn every frame
//! and the *committed* one that is persisted. Gestures only touch the live
//! transform; it is committed when the pointer is released. Wheel events are
//! queued and folded into a single zoom step per frame.

use eframe::egui::{pos2, Pos2, Vec2};
use riskatlas_core::config::MapConfig;
use serde::{Deserialize, Serialize};

/// Uniform scale followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapTransform {
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for MapTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl MapTransform {
    pub const IDENTITY: MapTransform = MapTransform {
        scale: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// World to screen.
    pub fn apply(&self, world: Pos2) -> Pos2 {
        pos2(world.x * self.scale + self.tx, world.y * self.scale + self.ty)
    }

    /// Screen to world.
    pub fn invert(&self, screen: Pos2) -> Pos2 {
        pos2(
            (screen.x - self.tx) / self.scale,
            (screen.y - self.ty) / self.scale,
        )
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.tx, self.ty)
    }

    fn translated(&self, offset: Vec2) -> Self {
        Self {
            scale: self.scale,
            tx: self.tx + offset.x,
            ty: self.ty + offset.y,
        }
    }

    fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.tx.is_finite() && self.ty.is_finite()
    }
}

/// Gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Pointer travel, in points, before a press turns into a drag
    pub drag_threshold: f32,
    /// Wheel delta to log-scale factor
    pub zoom_sensitivity: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 8.0,
            drag_threshold: 4.0,
            zoom_sensitivity: 0.0015,
        }
    }
}

impl From<&MapConfig> for ViewportConfig {
    fn from(config: &MapConfig) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            drag_threshold: config.drag_threshold_px,
            zoom_sensitivity: config.zoom_sensitivity,
        }
    }
}

/// How a press ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRelease {
    /// Released without exceeding the drag threshold
    Click(Pos2),
    /// Released after panning
    DragEnd,
    /// No press was in progress
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Pressed {
        origin: Pos2,
        start: MapTransform,
    },
    Dragging {
        origin: Pos2,
        start: MapTransform,
        last: Pos2,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingZoom {
    factor: f32,
    anchor: Pos2,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    live: MapTransform,
    committed: MapTransform,
    gesture: Gesture,
    pending: Option<PendingZoom>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            live: MapTransform::IDENTITY,
            committed: MapTransform::IDENTITY,
            gesture: Gesture::Idle,
            pending: None,
        }
    }

    /// Starts from a previously committed transform.
    ///
    /// Invalid transforms fall back to identity; the scale is clamped.
    pub fn with_transform(config: ViewportConfig, transform: MapTransform) -> Self {
        let mut viewport = Self::new(config);
        if transform.is_valid() {
            let restored = MapTransform {
                scale: transform.scale.clamp(config.min_scale, config.max_scale),
                ..transform
            };
            viewport.live = restored;
            viewport.committed = restored;
        }
        viewport
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Transform to draw with.
    pub fn transform(&self) -> MapTransform {
        self.live
    }

    /// Transform to persist.
    pub fn committed(&self) -> MapTransform {
        self.committed
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_pressed(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn has_pending_zoom(&self) -> bool {
        self.pending.is_some()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        self.live.invert(screen)
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        self.live.apply(world)
    }

    /// Queues one wheel step. Positive `delta_y` zooms out.
    pub fn queue_wheel(&mut self, delta_y: f32, cursor: Pos2) {
        let factor = (-delta_y * self.config.zoom_sensitivity).exp();
        self.queue_zoom(factor, cursor);
    }

    /// Queues a multiplicative zoom anchored at `cursor`.
    pub fn queue_zoom(&mut self, factor: f32, cursor: Pos2) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let factor = match self.pending {
            Some(pending) => pending.factor * factor,
            None => factor,
        };
        self.pending = Some(PendingZoom {
            factor,
            anchor: cursor,
        });
    }

    /// Applies the zoom queued this frame. Returns true if the transform changed.
    pub fn commit_frame(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.zoom_by(pending.factor, pending.anchor)
    }

    /// Zooms immediately about `anchor`.
    pub fn zoom_by(&mut self, factor: f32, anchor: Pos2) -> bool {
        if !self.zoom_live(factor, anchor) {
            return false;
        }

        match &mut self.gesture {
            Gesture::Idle => self.committed = self.live,
            Gesture::Pressed { start, .. } => *start = self.live,
            Gesture::Dragging { origin, start, last } => {
                // Continue the drag from the zoomed transform.
                *origin = *last;
                *start = self.live;
            }
        }
        true
    }

    fn zoom_live(&mut self, factor: f32, anchor: Pos2) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }

        let current = self.live;
        let scale = (current.scale * factor).clamp(self.config.min_scale, self.config.max_scale);
        if (scale - current.scale).abs() <= f32::EPSILON * current.scale {
            return false;
        }

        let world = current.invert(anchor);
        self.live = MapTransform {
            scale,
            tx: anchor.x - world.x * scale,
            ty: anchor.y - world.y * scale,
        };
        true
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        self.gesture = Gesture::Pressed {
            origin: pos,
            start: self.live,
        };
    }

    /// Tracks the pointer during a press. Returns true if the transform changed.
    pub fn pointer_move(&mut self, pos: Pos2) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Pressed { origin, start } => {
                if (pos - origin).length() <= self.config.drag_threshold {
                    return false;
                }
                self.gesture = Gesture::Dragging {
                    origin,
                    start,
                    last: pos,
                };
                self.live = start.translated(pos - origin);
                true
            }
            Gesture::Dragging { origin, start, .. } => {
                self.gesture = Gesture::Dragging {
                    origin,
                    start,
                    last: pos,
                };
                let next = start.translated(pos - origin);
                let changed = next != self.live;
                self.live = next;
                changed
            }
        }
    }

    /// Ends a press and commits the live transform.
    pub fn pointer_up(&mut self, pos: Pos2) -> PointerRelease {
        let release = match self.gesture {
            Gesture::Idle => return PointerRelease::Ignored,
            Gesture::Pressed { .. } => PointerRelease::Click(pos),
            Gesture::Dragging { .. } => {
                self.pointer_move(pos);
                PointerRelease::DragEnd
            }
        };

        self.gesture = Gesture::Idle;
        self.committed = self.live;
        release
    }

    /// Abandons a press without producing a click. A drag keeps its offset.
    pub fn cancel(&mut self) {
        if self.is_pressed() {
            self.committed = self.live;
        }
        self.gesture = Gesture::Idle;
    }

    /// Back to identity, dropping any gesture or queued zoom.
    pub fn reset(&mut self) {
        self.live = MapTransform::IDENTITY;
        self.committed = MapTransform::IDENTITY;
        self.gesture = Gesture::Idle;
        self.pending = None;
    }
}
