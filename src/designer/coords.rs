//! Isometric grid <-> screen projection.
//!
//! Screen space is canvas pixels with the origin at the top-left corner and `y`
//! growing downwards. Grid space puts `(0, 0)` at the southern corner of the
//! diamond; `+x` runs north-east and `+y` runs north-west.

use bevy::prelude::*;

use super::GRID_SIZE;

/// Grid-line steps offered by the level-of-detail picker, finest first.
const GRID_LINE_STEPS: [i32; 9] = [1, 2, 5, 10, 25, 50, 100, 200, 400];

/// Minimum on-screen spacing between two rendered grid lines, in pixels.
pub const MIN_GRID_LINE_SPACING: f32 = 10.0;

/// A snapshot of the projection parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    /// Grid-space point drawn at the canvas center.
    pub center: Vec2,
    /// Pixels per half cell.
    pub half_cell: f32,
    /// Canvas size in pixels.
    pub canvas: Vec2,
}

impl IsoProjection {
    #[must_use]
    pub const fn new(center: Vec2, half_cell: f32, canvas: Vec2) -> Self {
        Self {
            center,
            half_cell,
            canvas,
        }
    }

    /// Projects a (possibly fractional) grid point to screen pixels.
    #[must_use]
    pub fn grid_to_screen(&self, grid: Vec2) -> Vec2 {
        let rel = grid - self.center;
        Vec2::new(
            (rel.x - rel.y).mul_add(self.half_cell, self.canvas.x / 2.0),
            (-(rel.x + rel.y)).mul_add(self.half_cell, self.canvas.y / 2.0),
        )
    }

    /// Screen position of the center of `cell`.
    #[must_use]
    pub fn cell_center_to_screen(&self, cell: IVec2) -> Vec2 {
        self.grid_to_screen(cell.as_vec2() + Vec2::splat(0.5))
    }

    /// Inverse projection without flooring.
    #[must_use]
    pub fn screen_to_grid_f(&self, screen: Vec2) -> Vec2 {
        let u = (screen.x - self.canvas.x / 2.0) / self.half_cell;
        let v = -(screen.y - self.canvas.y / 2.0) / self.half_cell;
        self.center + Vec2::new((u + v) / 2.0, (v - u) / 2.0)
    }

    /// The grid cell containing the screen pixel. Every pixel maps to exactly one
    /// cell; cells outside the grid are returned as-is.
    #[must_use]
    pub fn screen_to_grid(&self, screen: Vec2) -> IVec2 {
        self.screen_to_grid_f(screen).floor().as_ivec2()
    }

    /// The four screen-space corners (south, east, north, west) of an `n`×`n`
    /// block anchored at `origin`.
    #[must_use]
    pub fn block_corners(&self, origin: IVec2, size: i32) -> [Vec2; 4] {
        let o = origin.as_vec2();
        let s = size as f32;
        [
            self.grid_to_screen(o),
            self.grid_to_screen(o + Vec2::new(s, 0.0)),
            self.grid_to_screen(o + Vec2::new(s, s)),
            self.grid_to_screen(o + Vec2::new(0.0, s)),
        ]
    }

    /// Grid-space bounding box (inclusive min, exclusive max) of everything
    /// visible on the canvas, clamped to the grid.
    #[must_use]
    pub fn visible_cells(&self) -> (IVec2, IVec2) {
        let corners = [
            Vec2::ZERO,
            Vec2::new(self.canvas.x, 0.0),
            self.canvas,
            Vec2::new(0.0, self.canvas.y),
        ]
        .map(|p| self.screen_to_grid_f(p));
        let min = corners.iter().fold(Vec2::splat(f32::MAX), |acc, p| acc.min(*p));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |acc, p| acc.max(*p));
        let limit = IVec2::splat(GRID_SIZE);
        (
            min.floor().as_ivec2().clamp(IVec2::ZERO, limit),
            (max.ceil().as_ivec2() + IVec2::ONE).clamp(IVec2::ZERO, limit),
        )
    }

    /// Spacing in cells between rendered grid lines at this zoom.
    #[must_use]
    pub fn grid_line_step(&self) -> i32 {
        let cell_px = self.half_cell * std::f32::consts::SQRT_2;
        GRID_LINE_STEPS
            .into_iter()
            .find(|step| *step as f32 * cell_px >= MIN_GRID_LINE_SPACING)
            .unwrap_or(GRID_LINE_STEPS[GRID_LINE_STEPS.len() - 1])
    }

    /// Linear part of the inverse projection: converts a screen-space pixel delta
    /// into a grid-space delta. Independent of absolute position.
    #[must_use]
    pub fn screen_delta_to_grid(&self, delta: Vec2) -> Vec2 {
        delta_to_grid(delta, self.half_cell)
    }
}

/// See [`IsoProjection::screen_delta_to_grid`].
#[must_use]
pub fn delta_to_grid(delta: Vec2, half_cell: f32) -> Vec2 {
    let two_h = 2.0 * half_cell;
    Vec2::new((delta.x - delta.y) / two_h, -(delta.x + delta.y) / two_h)
}
