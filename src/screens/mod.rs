//! Top-level screen state and its plugins.

mod loading;

use bevy::prelude::*;

/// The app's screens.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Waiting for the layout seed.
    #[default]
    Loading,
    /// The designer canvas is mounted.
    Designer,
}

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Screen>();
    app.add_plugins(loading::plugin);
}
