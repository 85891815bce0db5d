//! Testing utilities for Bevy systems.

#![cfg(test)]

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::AppSet;
use crate::screens::Screen;

/// Headless app with states and the designer's system ordering, still in
/// [`Screen::Loading`]. Add the plugins under test, then call
/// [`transition_to_designer`].
pub fn create_base_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<Screen>();
    app.configure_sets(
        Update,
        (AppSet::Input, AppSet::Gestures, AppSet::Render, AppSet::Ui).chain(),
    );
    app
}

/// Enters [`Screen::Designer`] and applies the commands queued by `OnEnter`.
pub fn transition_to_designer(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<Screen>>()
        .set(Screen::Designer);
    app.update(); // Apply transition + run OnEnter systems
    app.update(); // Apply deferred commands from OnEnter
}

/// Asserts that exactly `expected` entities match the filter.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let count = app
        .world_mut()
        .query_filtered::<(), F>()
        .iter(app.world())
        .count();
    assert_eq!(count, expected, "unexpected number of matching entities");
}
