//! Device adapters that feed the gesture machine, plus keyboard nudges.
//!
//! Mouse and touch are translated into the shared [`PointerInput`] stream; the
//! gesture machine never sees a device type beyond [`PointerButton`].

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::Touches;
use bevy::prelude::*;

use super::gesture::{GestureMachine, PointerButton, PointerInput};
use super::layout::BaseLayout;
use super::session::{ActiveTool, CanvasSize, DesignFocus, DesignSession, DesignerSignal};
use super::viewport::{PanDirection, Viewport};
use super::{EditLabelRequested, HapticFeedback};
use crate::AppSet;
use crate::screens::Screen;

/// Pixels per scroll line, so line-based wheels zoom like a browser wheel.
const WHEEL_LINE_PX: f32 = 100.0;

const MOUSE_BUTTONS: [(MouseButton, PointerButton); 3] = [
    (MouseButton::Left, PointerButton::Primary),
    (MouseButton::Right, PointerButton::Secondary),
    (MouseButton::Middle, PointerButton::Middle),
];

const DIGIT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Keeps [`CanvasSize`] in step with the primary window.
fn track_canvas_size(window: Single<&Window>, mut canvas: ResMut<CanvasSize>) {
    let size = Vec2::new(window.width(), window.height());
    if canvas.0 != size {
        canvas.0 = size;
    }
}

/// Pointer inputs for one frame of mouse state. Presses come before motion,
/// releases last.
fn mouse_inputs(
    cursor: Option<Vec2>,
    last_cursor: Option<Vec2>,
    buttons: &ButtonInput<MouseButton>,
) -> Vec<PointerInput> {
    let mut inputs = Vec::new();
    let held = MOUSE_BUTTONS.iter().any(|(button, _)| buttons.pressed(*button));

    if let Some(position) = cursor
        && let Some((_, button)) = MOUSE_BUTTONS
            .iter()
            .find(|(button, _)| buttons.just_pressed(*button))
    {
        inputs.push(PointerInput::Down {
            position,
            button: *button,
        });
    }

    if cursor != last_cursor {
        match cursor {
            Some(position) if held => inputs.push(PointerInput::Move { position }),
            position => inputs.push(PointerInput::Hover { position }),
        }
    }

    let released = MOUSE_BUTTONS
        .iter()
        .any(|(button, _)| buttons.just_released(*button));
    if released && !held
        && let Some(position) = cursor.or(last_cursor)
    {
        inputs.push(PointerInput::Up { position });
    }
    inputs
}

/// Converts a wheel notch into a pointer input.
fn wheel_input(unit: MouseScrollUnit, delta: Vec2, zoom_modifier: bool) -> PointerInput {
    let delta = match unit {
        MouseScrollUnit::Line => delta * WHEEL_LINE_PX,
        MouseScrollUnit::Pixel => delta,
    };
    PointerInput::Wheel {
        delta,
        zoom: zoom_modifier,
    }
}

fn read_mouse(
    window: Single<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut wheel: MessageReader<MouseWheel>,
    mut last_cursor: Local<Option<Vec2>>,
    mut pointer: MessageWriter<PointerInput>,
) {
    let cursor = window.cursor_position();
    pointer.write_batch(mouse_inputs(cursor, *last_cursor, &buttons));
    *last_cursor = cursor;

    let zoom_modifier = keys.any_pressed([
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
        KeyCode::SuperLeft,
        KeyCode::SuperRight,
    ]);
    for event in wheel.read() {
        pointer.write(wheel_input(
            event.unit,
            Vec2::new(event.x, event.y),
            zoom_modifier,
        ));
    }
}

/// Folds up to two touch contacts into one pointer session. A third finger is
/// ignored; `Up` is only reported once every tracked contact has lifted.
#[derive(Debug, Default)]
struct TouchTracker {
    primary: Option<(u64, Vec2)>,
    secondary: Option<(u64, Vec2)>,
}

impl TouchTracker {
    fn press(&mut self, id: u64, position: Vec2) -> Option<PointerInput> {
        match (self.primary, self.secondary) {
            (None, _) => {
                self.primary = Some((id, position));
                Some(PointerInput::Down {
                    position,
                    button: PointerButton::Touch,
                })
            }
            (Some((_, primary)), None) => {
                self.secondary = Some((id, position));
                Some(PointerInput::SecondDown {
                    primary,
                    secondary: position,
                })
            }
            (Some(_), Some(_)) => None,
        }
    }

    fn moved(&mut self, id: u64, position: Vec2) -> Option<PointerInput> {
        match (&mut self.primary, &mut self.secondary) {
            (Some((pid, primary)), None) if *pid == id => {
                *primary = position;
                Some(PointerInput::Move { position })
            }
            (Some((pid, primary)), Some((sid, secondary))) if *pid == id || *sid == id => {
                if *pid == id {
                    *primary = position;
                } else {
                    *secondary = position;
                }
                Some(PointerInput::PinchMove {
                    primary: *primary,
                    secondary: *secondary,
                })
            }
            _ => None,
        }
    }

    fn release(&mut self, id: u64, position: Vec2) -> Option<PointerInput> {
        if self.secondary.is_some_and(|(sid, _)| sid == id) {
            self.secondary = None;
        } else if self.primary.is_some_and(|(pid, _)| pid == id) {
            self.primary = self.secondary.take();
        } else {
            return None;
        }
        self.primary
            .is_none()
            .then_some(PointerInput::Up { position })
    }

    fn cancel(&mut self) -> Option<PointerInput> {
        let active = self.primary.is_some();
        self.primary = None;
        self.secondary = None;
        active.then_some(PointerInput::Cancel)
    }
}

fn read_touches(
    touches: Res<Touches>,
    mut tracker: Local<TouchTracker>,
    mut pointer: MessageWriter<PointerInput>,
) {
    for touch in touches.iter_just_pressed() {
        if let Some(input) = tracker.press(touch.id(), touch.position()) {
            pointer.write(input);
        }
    }
    for touch in touches.iter() {
        if touch.delta() != Vec2::ZERO
            && let Some(input) = tracker.moved(touch.id(), touch.position())
        {
            pointer.write(input);
        }
    }
    for touch in touches.iter_just_released() {
        if let Some(input) = tracker.release(touch.id(), touch.position()) {
            pointer.write(input);
        }
    }
    if touches.iter_just_canceled().next().is_some()
        && let Some(input) = tracker.cancel()
    {
        pointer.write(input);
    }
}

/// Desktop shortcuts: nudges, zoom steps, tool hotkeys, deselect and delete.
fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut viewport: ResMut<Viewport>,
    mut tool: ResMut<ActiveTool>,
    mut focus: ResMut<DesignFocus>,
    mut layout: ResMut<BaseLayout>,
) {
    let nudges = [
        ([KeyCode::ArrowUp, KeyCode::KeyW], PanDirection::Up),
        ([KeyCode::ArrowDown, KeyCode::KeyS], PanDirection::Down),
        ([KeyCode::ArrowLeft, KeyCode::KeyA], PanDirection::Left),
        ([KeyCode::ArrowRight, KeyCode::KeyD], PanDirection::Right),
    ];
    for (bindings, direction) in nudges {
        if keys.any_just_pressed(bindings) {
            viewport.pan(direction);
        }
    }

    if keys.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        viewport.zoom_in();
    }
    if keys.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        viewport.zoom_out();
    }

    if let Some(index) = DIGIT_KEYS.iter().position(|key| keys.just_pressed(*key))
        && let Some(ty) = layout.catalog().nth(index)
    {
        let next = (tool.0.as_deref() != Some(ty.id.as_str())).then(|| ty.id.clone());
        debug!("placement tool set to {next:?}");
        tool.0 = next;
    }

    if keys.just_pressed(KeyCode::Escape) {
        tool.0 = None;
        focus.selected = None;
    }

    if keys.any_just_pressed([KeyCode::Delete, KeyCode::Backspace])
        && let Some(selected) = focus.selected.take()
    {
        layout.remove(selected);
    }
}

/// Runs every queued pointer input through the gesture machine, then advances
/// its timers, and forwards resulting signals as messages.
fn drive_gestures(
    mut inputs: MessageReader<PointerInput>,
    time: Res<Time<Real>>,
    tool: Res<ActiveTool>,
    canvas: Res<CanvasSize>,
    mut machine: ResMut<GestureMachine>,
    mut layout: ResMut<BaseLayout>,
    mut viewport: ResMut<Viewport>,
    mut focus: ResMut<DesignFocus>,
    mut edit_requests: MessageWriter<EditLabelRequested>,
    mut haptics: MessageWriter<HapticFeedback>,
) {
    let now = time.elapsed();
    let mut session = DesignSession::new(
        &mut layout,
        &mut viewport,
        &mut focus,
        tool.0.as_deref(),
        canvas.0,
    );
    for input in inputs.read() {
        machine.handle(*input, now, &mut session);
    }
    machine.tick(now, &mut session);

    for signal in session.signals {
        match signal {
            DesignerSignal::EditLabel { building, anchor } => {
                edit_requests.write(EditLabelRequested { building, anchor });
            }
            DesignerSignal::Haptic => {
                haptics.write(HapticFeedback);
            }
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ButtonInput<MouseButton>>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<Touches>()
        .add_message::<MouseWheel>();

    app.add_systems(
        Update,
        (
            track_canvas_size,
            read_mouse,
            read_touches,
            keyboard_controls,
        )
            .chain()
            .in_set(AppSet::Input)
            .run_if(in_state(Screen::Designer)),
    )
    .add_systems(
        Update,
        drive_gestures
            .in_set(AppSet::Gestures)
            .run_if(in_state(Screen::Designer)),
    );
}
