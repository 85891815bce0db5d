//! The canvas camera. It persists across all screens.

use bevy::prelude::*;

use crate::theme::palette;

/// Marker for the global 2d camera. Canvas pixels map 1:1 onto its world space.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CanvasCamera;

fn spawn_canvas_camera(mut commands: Commands) {
    commands.spawn((Name::new("Canvas Camera"), CanvasCamera, Camera2d));
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<CanvasCamera>();
    app.insert_resource(ClearColor(palette::BACKGROUND));
    app.add_systems(Startup, spawn_canvas_camera);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_entity_count;

    #[test]
    fn one_camera_is_spawned() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(plugin);
        app.update();
        assert_entity_count::<With<CanvasCamera>>(&mut app, 1);
    }
}
