//! Development tools, only included with `cargo run --features dev`.
//!
//! Layout dump, overlay toggle and the world inspector. This module is stripped
//! from release builds.

use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use crate::designer::DesignerSettings;
use crate::designer::layout::BaseLayout;
use crate::screens::Screen;

/// Logs the current layout as JSON on F2.
fn dump_layout(keyboard: Res<ButtonInput<KeyCode>>, layout: Res<BaseLayout>) {
    if !keyboard.just_pressed(KeyCode::F2) {
        return;
    }
    match layout.to_json() {
        Ok(json) => info!("current layout:\n{json}"),
        Err(err) => warn!("could not serialize layout: {err}"),
    }
}

/// Toggles the territory overlay on F3.
fn toggle_territory(keyboard: Res<ButtonInput<KeyCode>>, mut settings: ResMut<DesignerSettings>) {
    if keyboard.just_pressed(KeyCode::F3) {
        settings.show_territory = !settings.show_territory;
    }
}

/// Debug hotkeys. Headless-safe, so tests can add it.
pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (dump_layout, toggle_territory)
            .in_set(crate::AppSet::Input)
            .run_if(in_state(Screen::Designer)),
    );
}

/// Egui world inspector; needs a window and renderer.
pub fn inspector_plugin(app: &mut App) {
    app.add_plugins((EguiPlugin::default(), WorldInspectorPlugin::new()));
}
