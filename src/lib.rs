//! Alliance base designer: an isometric grid editor for laying out an alliance
//! base (headquarters, banners, member cities, traps and obstacles).

mod camera;
pub mod designer;
#[cfg(feature = "dev")]
pub mod dev_tools;
pub mod screens;
#[cfg(test)]
pub mod testing;
pub mod theme;

use bevy::prelude::*;

pub use designer::{
    DesignerSettings, EditLabelRequested, GRID_SIZE, HapticFeedback, LayoutPath, LayoutSeed,
};

/// Ordering of the designer's per-frame work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppSet {
    /// Device input is read and translated.
    Input,
    /// Pointer inputs run through the gesture machine.
    Gestures,
    /// The canvas frame is composed and drawn.
    Render,
    /// HUD text is refreshed.
    Ui,
}

/// Everything except window and rendering setup.
pub fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (AppSet::Input, AppSet::Gestures, AppSet::Render, AppSet::Ui).chain(),
    );
    app.add_plugins((camera::plugin, screens::plugin, designer::plugin));
}
