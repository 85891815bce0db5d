//! Color constants and font size tokens for the designer canvas and HUD.

use bevy::prelude::*;

// === Canvas ===

/// Area outside the grid diamond.
pub const BACKGROUND: Color = Color::srgb(0.08, 0.09, 0.11);

pub const GRID_LINE: Color = Color::srgba(0.45, 0.5, 0.6, 0.25);
pub const GRID_BOUNDARY: Color = Color::srgb(0.75, 0.8, 0.9);
pub const GRID_CORNER_TEXT: Color = Color::srgb(0.6, 0.65, 0.75);

pub const TERRITORY_FILL: Color = Color::srgba(0.3, 0.55, 1.0, 0.12);
pub const TERRITORY_OUTLINE: Color = Color::srgba(0.45, 0.7, 1.0, 0.8);

// === Buildings ===

pub const BUILDING_TEXT: Color = Color::WHITE;
pub const SELECTION_OUTLINE: Color = Color::WHITE;
pub const HOVER_OUTLINE: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);
pub const INVALID_PREVIEW: Color = Color::srgb(0.9, 0.15, 0.15);
pub const LONG_PRESS_HIGHLIGHT: Color = Color::srgb(1.0, 0.95, 0.6);

/// Alpha of a building left behind while it is dragged.
pub const GHOST_ALPHA: f32 = 0.3;

/// Alpha of hover and drag previews.
pub const PREVIEW_ALPHA: f32 = 0.55;

// === HUD ===

pub const HEADER_TEXT: Color = Color::WHITE;
pub const HUD_TEXT: Color = Color::srgb(0.85, 0.85, 0.85);
pub const HUD_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);

// === Font Size Tokens ===

pub const FONT_SIZE_HEADER: f32 = 64.0;
pub const FONT_SIZE_HUD: f32 = 18.0;
pub const FONT_SIZE_CORNER: f32 = 14.0;
pub const FONT_SIZE_BUILDING_MIN: f32 = 8.0;
pub const FONT_SIZE_BUILDING_MAX: f32 = 28.0;
