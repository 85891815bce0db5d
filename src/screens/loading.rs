//! Loading screen: reads the optional layout file, then mounts the designer.

use bevy::prelude::*;

use super::Screen;
use crate::designer::layout::BaseLayout;
use crate::designer::{LayoutPath, LayoutSeed};
use crate::theme::palette;

fn spawn_loading_text(mut commands: Commands) {
    commands.spawn((
        Name::new("Loading Text"),
        Text::new("Loading..."),
        TextFont {
            font_size: palette::FONT_SIZE_HEADER,
            ..default()
        },
        TextColor(palette::HEADER_TEXT),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            ..default()
        },
        DespawnOnExit(Screen::Loading),
    ));
}

/// Replaces the seed records with the file's. A bad file leaves the seed as is.
fn load_layout_file(path: Res<LayoutPath>, mut seed: ResMut<LayoutSeed>) {
    let Some(path) = path.0.as_deref() else {
        return;
    };
    match BaseLayout::from_path(seed.catalog.clone(), path) {
        Ok(layout) => {
            info!(
                "loaded {} buildings from {}",
                layout.buildings().len(),
                path.display()
            );
            seed.records = layout.buildings().to_vec();
        }
        Err(err) => warn!("ignoring layout file {}: {err}", path.display()),
    }
}

fn enter_designer(mut next_state: ResMut<NextState<Screen>>) {
    next_state.set(Screen::Designer);
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(Screen::Loading),
        (spawn_loading_text, load_layout_file),
    )
    .add_systems(Update, enter_designer.run_if(in_state(Screen::Loading)));
}

#[cfg(test)]
mod integration_tests {
    use std::path::PathBuf;

    use super::*;
    use crate::testing::assert_entity_count;
    use pretty_assertions::assert_eq;

    fn create_loading_test_app(path: Option<PathBuf>) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin));
        app.init_resource::<LayoutSeed>();
        app.insert_resource(LayoutPath(path));
        app.add_plugins(super::super::plugin);
        app
    }

    #[test]
    fn loading_hands_over_to_designer() {
        let mut app = create_loading_test_app(None);
        app.update();
        assert_entity_count::<With<Text>>(&mut app, 1);

        app.update();
        assert_eq!(
            *app.world().resource::<State<Screen>>().get(),
            Screen::Designer
        );
        assert_entity_count::<With<Text>>(&mut app, 0);
    }

    #[test]
    fn missing_file_keeps_default_seed() {
        let mut app = create_loading_test_app(Some(PathBuf::from("no/such/layout.json")));
        app.update();
        assert!(app.world().resource::<LayoutSeed>().records.is_empty());
    }

    #[test]
    fn layout_file_replaces_seed_records() {
        let path = std::env::temp_dir().join(format!(
            "alliance-base-designer-seed-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"[{"id":3,"typeId":"banner","x":40,"y":40},{"id":4,"typeId":"city","x":42,"y":42,"label":"Ana"}]"#,
        )
        .unwrap();

        let mut app = create_loading_test_app(Some(path.clone()));
        app.update();
        std::fs::remove_file(&path).unwrap();

        let seed = app.world().resource::<LayoutSeed>();
        assert_eq!(seed.records.len(), 2);
        assert_eq!(seed.records[1].label.as_deref(), Some("Ana"));
    }
}
