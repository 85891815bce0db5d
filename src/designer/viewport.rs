//! Pan center and zoom of the designer view.

use bevy::prelude::*;

use super::GRID_SIZE;
use super::coords::{IsoProjection, delta_to_grid};

/// Smallest allowed half-cell size in pixels (whole grid fits a small window).
pub const MIN_HALF_CELL: f32 = 0.5;

/// Largest allowed half-cell size in pixels.
pub const MAX_HALF_CELL: f32 = 80.0;

/// Half-cell size when a session starts.
pub const DEFAULT_HALF_CELL: f32 = 8.0;

/// Multiplicative step for discrete zoom and each wheel/pinch notch.
pub const ZOOM_STEP: f32 = 1.08;

/// Screen pixels moved by a discrete pan nudge.
pub const PAN_STEP_PX: f32 = 80.0;

/// Discrete pan directions, in screen terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Unit screen-space vector the visible content moves along.
    #[must_use]
    pub const fn screen_vector(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Grid point at the canvas center plus the zoom factor.
///
/// The center may drift past the grid edge; only zoom is clamped.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct Viewport {
    center: Vec2,
    half_cell: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        let mid = GRID_SIZE as f32 / 2.0;
        Self {
            center: Vec2::splat(mid),
            half_cell: DEFAULT_HALF_CELL,
        }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(center: Vec2, half_cell: f32) -> Self {
        Self {
            center,
            half_cell: half_cell.clamp(MIN_HALF_CELL, MAX_HALF_CELL),
        }
    }

    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    #[must_use]
    pub const fn half_cell(&self) -> f32 {
        self.half_cell
    }

    /// Projection for a canvas of the given size.
    #[must_use]
    pub const fn projection(&self, canvas: Vec2) -> IsoProjection {
        IsoProjection::new(self.center, self.half_cell, canvas)
    }

    /// Drags the content by a screen-space pixel delta.
    pub fn pan_by_pixels(&mut self, delta: Vec2) {
        self.center -= delta_to_grid(delta, self.half_cell);
    }

    /// Fixed-step nudge.
    pub fn pan(&mut self, direction: PanDirection) {
        self.pan_by_pixels(-direction.screen_vector() * PAN_STEP_PX);
    }

    pub fn pan_up(&mut self) {
        self.pan(PanDirection::Up);
    }

    pub fn pan_down(&mut self) {
        self.pan(PanDirection::Down);
    }

    pub fn pan_left(&mut self) {
        self.pan(PanDirection::Left);
    }

    pub fn pan_right(&mut self) {
        self.pan(PanDirection::Right);
    }

    /// Multiplies the zoom, clamped to `[MIN_HALF_CELL, MAX_HALF_CELL]`.
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom_by(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.half_cell = (self.half_cell * factor).clamp(MIN_HALF_CELL, MAX_HALF_CELL);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(ZOOM_STEP.recip());
    }
}
