//! Alliance base designer entry point.
//!
//! Usage: `alliance-base-designer [layout.json]`

use std::path::PathBuf;

use alliance_base_designer::LayoutPath;
use bevy::prelude::*;

fn main() -> AppExit {
    let layout_path = std::env::args_os().nth(1).map(PathBuf::from);

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Alliance Base Designer".to_string(),
            resolution: (1280, 720).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(LayoutPath(layout_path))
    .add_plugins(alliance_base_designer::plugin);

    #[cfg(feature = "dev")]
    app.add_plugins((
        alliance_base_designer::dev_tools::plugin,
        alliance_base_designer::dev_tools::inspector_plugin,
    ));

    app.run()
}
