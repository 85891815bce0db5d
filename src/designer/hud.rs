//! Status line: active tool, zoom, hovered cell and building count.

use bevy::prelude::*;

use super::layout::BaseLayout;
use super::session::{ActiveTool, DesignFocus};
use super::viewport::{DEFAULT_HALF_CELL, Viewport};
use crate::AppSet;
use crate::screens::Screen;
use crate::theme::palette;

/// Marker for the status text.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct StatusLine;

fn spawn_status_line(mut commands: Commands) {
    commands.spawn((
        Name::new("Status Line"),
        StatusLine,
        Text::new(""),
        TextFont {
            font_size: palette::FONT_SIZE_HUD,
            ..default()
        },
        TextColor(palette::HUD_TEXT),
        BackgroundColor(palette::HUD_BACKGROUND),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(8.0),
            bottom: Val::Px(8.0),
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            ..default()
        },
        DespawnOnExit(Screen::Designer),
    ));
}

fn status_text(
    layout: &BaseLayout,
    viewport: &Viewport,
    focus: &DesignFocus,
    tool: &ActiveTool,
) -> String {
    let tool = tool
        .0
        .as_deref()
        .and_then(|id| layout.catalog().get(id))
        .map_or("none", |ty| ty.name.as_str());
    let zoom = viewport.half_cell() / DEFAULT_HALF_CELL * 100.0;
    let hovered = focus
        .hovered
        .map_or_else(|| "-".to_string(), |cell| format!("{},{}", cell.x, cell.y));
    format!(
        "Tool: {tool} | Zoom: {zoom:.0}% | Cell: {hovered} | Buildings: {}",
        layout.buildings().len()
    )
}

fn update_status_line(
    layout: Res<BaseLayout>,
    viewport: Res<Viewport>,
    focus: Res<DesignFocus>,
    tool: Res<ActiveTool>,
    mut line: Single<&mut Text, With<StatusLine>>,
) {
    let text = status_text(&layout, &viewport, &focus, &tool);
    if line.0 != text {
        line.0 = text;
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<StatusLine>();

    app.add_systems(OnEnter(Screen::Designer), spawn_status_line)
        .add_systems(
            Update,
            update_status_line
                .in_set(AppSet::Ui)
                .run_if(in_state(Screen::Designer)),
        );
}
