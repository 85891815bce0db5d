//! Alliance base designer: isometric grid, placement rules, viewport, gestures
//! and the per-frame redraw.

#![allow(clippy::cast_precision_loss)]

pub mod catalog;
pub mod coords;
pub mod gesture;
mod hud;
pub mod input;
pub mod layout;
pub mod render;
pub mod session;
pub mod viewport;

use bevy::prelude::*;

use crate::screens::Screen;
use catalog::BuildingCatalog;
use gesture::{GestureMachine, GestureSettings, PointerInput};
use layout::{BaseLayout, BuildingId, PlacedBuilding};
use session::{ActiveTool, CanvasSize, DesignFocus};
use viewport::Viewport;

/// Cells along each edge of the square grid.
pub const GRID_SIZE: i32 = 1200;

/// A labelable building was double-tapped or double-clicked.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct EditLabelRequested {
    pub building: BuildingId,
    /// Screen point the label editor should anchor to.
    pub anchor: Vec2,
}

/// Fire-and-forget haptic pulse for the host.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticFeedback;

/// Live-tweakable designer parameters.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct DesignerSettings {
    pub gestures: GestureSettings,
    pub show_territory: bool,
}

impl Default for DesignerSettings {
    fn default() -> Self {
        Self {
            gestures: GestureSettings::default(),
            show_territory: true,
        }
    }
}

/// Catalog and records a session starts from.
#[derive(Resource, Debug, Clone)]
pub struct LayoutSeed {
    pub catalog: BuildingCatalog,
    pub records: Vec<PlacedBuilding>,
}

impl Default for LayoutSeed {
    fn default() -> Self {
        Self {
            catalog: BuildingCatalog::alliance_defaults(),
            records: Vec::new(),
        }
    }
}

/// JSON layout file to seed the session from, read while loading.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutPath(pub Option<std::path::PathBuf>);

/// Builds a fresh session from the seed.
fn start_session(
    mut commands: Commands,
    seed: Res<LayoutSeed>,
    settings: Res<DesignerSettings>,
    mut machine: ResMut<GestureMachine>,
) {
    let layout = BaseLayout::seeded(seed.catalog.clone(), seed.records.iter().cloned());
    info!(
        "designer session started with {} buildings",
        layout.buildings().len()
    );
    commands.insert_resource(layout);
    commands.insert_resource(Viewport::default());
    commands.insert_resource(DesignFocus::default());
    commands.insert_resource(ActiveTool::default());
    machine.reset();
    machine.set_settings(settings.gestures);
}

/// Tears down transient interaction state so nothing fires after unmount.
fn end_session(mut machine: ResMut<GestureMachine>, layout: Res<BaseLayout>) {
    machine.reset();
    info!(
        "designer session ended with {} buildings",
        layout.buildings().len()
    );
}

fn apply_settings(settings: Res<DesignerSettings>, mut machine: ResMut<GestureMachine>) {
    if settings.is_changed() {
        machine.set_settings(settings.gestures);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<DesignerSettings>()
        .register_type::<BaseLayout>()
        .register_type::<Viewport>()
        .register_type::<DesignFocus>()
        .register_type::<ActiveTool>()
        .register_type::<CanvasSize>();

    app.init_resource::<DesignerSettings>()
        .init_resource::<LayoutSeed>()
        .init_resource::<LayoutPath>()
        .init_resource::<BaseLayout>()
        .init_resource::<Viewport>()
        .init_resource::<DesignFocus>()
        .init_resource::<ActiveTool>()
        .init_resource::<CanvasSize>()
        .init_resource::<GestureMachine>();

    app.add_message::<PointerInput>()
        .add_message::<EditLabelRequested>()
        .add_message::<HapticFeedback>();

    app.add_systems(OnEnter(Screen::Designer), start_session)
        .add_systems(OnExit(Screen::Designer), end_session)
        .add_systems(
            Update,
            apply_settings
                .in_set(crate::AppSet::Input)
                .run_if(in_state(Screen::Designer)),
        );

    app.add_plugins((input::plugin, render::plugin, hud::plugin));
}
