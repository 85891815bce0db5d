//! Gesture disambiguation for a single pointer stream.
//!
//! Mouse and touch adapters translate raw device input into [`PointerInput`]s;
//! this machine decides whether a session is a pan, a pinch, a building drag, a
//! tap (select / place) or a double tap (edit label).
//!
//! Touch on a building arms a long-press. The arm lives inside
//! [`GesturePhase::DragCandidate`], so any transition out of that phase drops it.
//! There is no separate timer to cancel.

use std::time::Duration;

use bevy::prelude::*;

use super::layout::BuildingId;
use super::session::{DesignSession, DesignerSignal};
use super::viewport::ZOOM_STEP;

/// Hold time before a touch on a building turns into a drag.
pub const LONG_PRESS: Duration = Duration::from_millis(500);

/// Movement that disarms a long-press and disqualifies a tap.
pub const MOVE_SLOP_PX: f32 = 8.0;

/// Longest press still counted as a tap.
pub const TAP_MAX: Duration = Duration::from_millis(300);

/// Max gap between two taps of a double tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(350);

/// Max distance between two taps of a double tap.
pub const DOUBLE_TAP_RADIUS_PX: f32 = 30.0;

/// Wheel deltas at least this large zoom instead of pan.
pub const WHEEL_ZOOM_MAGNITUDE: f32 = 50.0;

/// Timing and distance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct GestureSettings {
    pub long_press: Duration,
    pub move_slop: f32,
    pub tap_max: Duration,
    pub double_tap_window: Duration,
    pub double_tap_radius: f32,
    pub wheel_zoom_magnitude: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            long_press: LONG_PRESS,
            move_slop: MOVE_SLOP_PX,
            tap_max: TAP_MAX,
            double_tap_window: DOUBLE_TAP_WINDOW,
            double_tap_radius: DOUBLE_TAP_RADIUS_PX,
            wheel_zoom_magnitude: WHEEL_ZOOM_MAGNITUDE,
        }
    }
}

/// Which device button started a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PointerButton {
    Touch,
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// Buttons whose quick release counts as a tap.
    const fn taps(self) -> bool {
        matches!(self, Self::Touch | Self::Primary)
    }
}

/// Device-independent input, in canvas pixels.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { position: Vec2, button: PointerButton },
    /// A second touch joined the session.
    SecondDown { primary: Vec2, secondary: Vec2 },
    Move { position: Vec2 },
    /// Both pinch contacts moved.
    PinchMove { primary: Vec2, secondary: Vec2 },
    Up { position: Vec2 },
    Cancel,
    /// Positive `y` scrolls up. `zoom` is set when a zoom modifier is held.
    Wheel { delta: Vec2, zoom: bool },
    /// Pointer moved with nothing pressed; `None` when it left the canvas.
    Hover { position: Option<Vec2> },
}

/// Pending long-press on a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressArm {
    pub building: BuildingId,
    /// Cell under the finger at touch-down.
    pub cell: IVec2,
    pub armed_at: Duration,
    pub fires_at: Duration,
}

/// A building being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub building: BuildingId,
    /// Grabbed cell minus the building origin.
    pub grab: IVec2,
    /// Origin the building would move to on release.
    pub preview: Option<IVec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Panning,
    /// Touch with a tool active: pans on move, places on tap.
    ToolPlacing,
    /// Touch on a building: pans provisionally while the long-press is armed.
    DragCandidate(LongPressArm),
    Dragging(DragState),
    Pinching {
        distance: f32,
        midpoint: Vec2,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerSession {
    button: PointerButton,
    origin: Vec2,
    last: Vec2,
    started_at: Duration,
    moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TapRecord {
    position: Vec2,
    at: Duration,
}

/// Selection held back while a second tap could still turn it into an edit.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingSelect {
    building: BuildingId,
    at: Duration,
}

#[derive(Resource, Debug, Default)]
pub struct GestureMachine {
    settings: GestureSettings,
    phase: GesturePhase,
    pointer: Option<PointerSession>,
    last_tap: Option<TapRecord>,
    pending_select: Option<PendingSelect>,
}

impl GestureMachine {
    #[must_use]
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }

    pub const fn set_settings(&mut self, settings: GestureSettings) {
        self.settings = settings;
    }

    #[must_use]
    pub const fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub const fn armed(&self) -> Option<LongPressArm> {
        match self.phase {
            GesturePhase::DragCandidate(arm) => Some(arm),
            _ => None,
        }
    }

    #[must_use]
    pub const fn drag(&self) -> Option<DragState> {
        match self.phase {
            GesturePhase::Dragging(drag) => Some(drag),
            _ => None,
        }
    }

    /// Drops every transient state, including any armed long-press.
    pub fn reset(&mut self) {
        self.enter(GesturePhase::Idle);
        self.pointer = None;
        self.last_tap = None;
        self.pending_select = None;
    }

    pub fn handle(&mut self, input: PointerInput, now: Duration, session: &mut DesignSession) {
        match input {
            PointerInput::Down { position, button } => {
                self.pointer_down(position, button, now, session);
            }
            PointerInput::SecondDown { primary, secondary } => {
                self.second_down(primary, secondary, now);
            }
            PointerInput::Move { position } => self.pointer_move(position, session),
            PointerInput::PinchMove { primary, secondary } => {
                self.pinch_move(primary, secondary, session);
            }
            PointerInput::Up { position } => self.pointer_up(position, now, session),
            PointerInput::Cancel => {
                self.enter(GesturePhase::Idle);
                self.pointer = None;
            }
            PointerInput::Wheel { delta, zoom } => self.wheel(delta, zoom, session),
            PointerInput::Hover { position } => {
                session.focus.hovered = position.map(|p| session.cell_at(p));
            }
        }
    }

    /// Advances timers: fires a due long-press and resolves a lapsed pending
    /// selection.
    pub fn tick(&mut self, now: Duration, session: &mut DesignSession) {
        if let GesturePhase::DragCandidate(arm) = self.phase
            && self.pointer.is_some()
            && now >= arm.fires_at
        {
            // Provisional panning keeps the touch-down cell under the finger.
            match session.layout.get(arm.building) {
                Some(building) => {
                    debug!("long-press fired on {}", arm.building);
                    let grab = arm.cell - building.origin();
                    self.enter(GesturePhase::Dragging(DragState {
                        building: arm.building,
                        grab,
                        preview: None,
                    }));
                    session.signals.push(DesignerSignal::Haptic);
                }
                None => self.enter(GesturePhase::Panning),
            }
        }

        if self
            .pending_select
            .is_some_and(|pending| now.saturating_sub(pending.at) > self.settings.double_tap_window)
        {
            self.flush_pending_select(session);
        }
    }

    /// Every phase change goes through here so a superseded arm is logged as
    /// cancelled; dropping the phase drops the arm.
    fn enter(&mut self, next: GesturePhase) {
        if let GesturePhase::DragCandidate(arm) = self.phase
            && !matches!(next, GesturePhase::Dragging(_))
        {
            debug!("long-press on {} cancelled", arm.building);
        }
        self.phase = next;
    }

    fn pointer_down(
        &mut self,
        position: Vec2,
        button: PointerButton,
        now: Duration,
        session: &mut DesignSession,
    ) {
        let cell = session.cell_at(position);
        session.focus.hovered = Some(cell);
        let target = session.layout.building_at(cell).map(|b| (b.id, b.origin()));

        let next = match button {
            PointerButton::Secondary | PointerButton::Middle => GesturePhase::Panning,
            PointerButton::Primary => {
                if let Some(type_id) = session.tool {
                    // Desktop places on press; nothing left to track.
                    session.layout.place(type_id, cell);
                    self.enter(GesturePhase::Idle);
                    self.pointer = None;
                    return;
                }
                match target {
                    Some((building, origin)) => GesturePhase::Dragging(DragState {
                        building,
                        grab: cell - origin,
                        preview: None,
                    }),
                    None => GesturePhase::Panning,
                }
            }
            PointerButton::Touch => match (session.tool, target) {
                (Some(_), _) => GesturePhase::ToolPlacing,
                (None, Some((building, _))) => {
                    debug!("long-press armed on {building}");
                    GesturePhase::DragCandidate(LongPressArm {
                        building,
                        cell,
                        armed_at: now,
                        fires_at: now + self.settings.long_press,
                    })
                }
                (None, None) => GesturePhase::Panning,
            },
        };

        self.enter(next);
        self.pointer = Some(PointerSession {
            button,
            origin: position,
            last: position,
            started_at: now,
            moved: false,
        });
    }

    fn second_down(&mut self, primary: Vec2, secondary: Vec2, now: Duration) {
        let pointer = self.pointer.get_or_insert(PointerSession {
            button: PointerButton::Touch,
            origin: primary,
            last: primary,
            started_at: now,
            moved: false,
        });
        // A pinch never ends in a tap.
        pointer.moved = true;
        pointer.last = primary;
        if let GesturePhase::Dragging(drag) = self.phase {
            debug!("drag of {} abandoned for pinch", drag.building);
        }
        debug!("pinch started");
        self.enter(GesturePhase::Pinching {
            distance: primary.distance(secondary),
            midpoint: primary.midpoint(secondary),
        });
    }

    fn pointer_move(&mut self, position: Vec2, session: &mut DesignSession) {
        let cell = session.cell_at(position);
        session.focus.hovered = Some(cell);

        let Some(pointer) = self.pointer.as_mut() else {
            return;
        };
        let delta = position - pointer.last;
        pointer.last = position;
        if !pointer.moved && position.distance(pointer.origin) > self.settings.move_slop {
            pointer.moved = true;
        }
        let moved = pointer.moved;

        match self.phase {
            GesturePhase::DragCandidate(_) => {
                if moved {
                    self.enter(GesturePhase::Panning);
                }
                session.viewport.pan_by_pixels(delta);
            }
            GesturePhase::Panning | GesturePhase::ToolPlacing => {
                session.viewport.pan_by_pixels(delta);
            }
            GesturePhase::Dragging(mut drag) => {
                drag.preview = Some(cell - drag.grab);
                self.phase = GesturePhase::Dragging(drag);
            }
            GesturePhase::Pinching { .. } | GesturePhase::Idle => {}
        }
    }

    fn pinch_move(&mut self, primary: Vec2, secondary: Vec2, session: &mut DesignSession) {
        let GesturePhase::Pinching { distance, midpoint } = self.phase else {
            return;
        };
        let new_distance = primary.distance(secondary);
        let new_midpoint = primary.midpoint(secondary);
        if distance > f32::EPSILON && new_distance > f32::EPSILON {
            session.viewport.zoom_by(new_distance / distance);
        }
        session.viewport.pan_by_pixels(new_midpoint - midpoint);
        self.phase = GesturePhase::Pinching {
            distance: new_distance,
            midpoint: new_midpoint,
        };
    }

    fn pointer_up(&mut self, position: Vec2, now: Duration, session: &mut DesignSession) {
        let phase = self.phase;
        self.enter(GesturePhase::Idle);
        let Some(pointer) = self.pointer.take() else {
            return;
        };
        let is_tap = pointer.button.taps()
            && !pointer.moved
            && now.saturating_sub(pointer.started_at) < self.settings.tap_max;

        match phase {
            GesturePhase::Dragging(drag) => {
                let mouse_click = pointer.button != PointerButton::Touch && !pointer.moved;
                if mouse_click {
                    if is_tap {
                        self.tap(position, now, pointer.button, session);
                    }
                } else if let Some(preview) = drag.preview {
                    session.layout.move_building(drag.building, preview);
                }
            }
            GesturePhase::Panning | GesturePhase::ToolPlacing | GesturePhase::DragCandidate(_) => {
                if is_tap {
                    self.tap(position, now, pointer.button, session);
                }
            }
            GesturePhase::Pinching { .. } | GesturePhase::Idle => {}
        }
    }

    fn tap(
        &mut self,
        position: Vec2,
        now: Duration,
        button: PointerButton,
        session: &mut DesignSession,
    ) {
        let target = session.building_at_screen(position);

        if let Some(last) = self.last_tap.take()
            && now.saturating_sub(last.at) <= self.settings.double_tap_window
            && last.position.distance(position) <= self.settings.double_tap_radius
            && let Some((building, true)) = target
        {
            info!("edit label requested for {building}");
            self.pending_select = None;
            session.signals.push(DesignerSignal::EditLabel {
                building,
                anchor: position,
            });
            return;
        }

        self.flush_pending_select(session);
        self.last_tap = Some(TapRecord { position, at: now });

        if let Some(type_id) = session.tool {
            let cell = session.cell_at(position);
            if session.layout.place(type_id, cell).is_some() && button == PointerButton::Touch {
                session.signals.push(DesignerSignal::Haptic);
            }
            return;
        }

        match target {
            Some((building, true)) => {
                self.pending_select = Some(PendingSelect { building, at: now });
            }
            Some((building, false)) => session.focus.selected = Some(building),
            None => session.focus.selected = None,
        }
    }

    fn flush_pending_select(&mut self, session: &mut DesignSession) {
        if let Some(pending) = self.pending_select.take()
            && session.layout.get(pending.building).is_some()
        {
            session.focus.selected = Some(pending.building);
        }
    }

    fn wheel(&self, delta: Vec2, zoom: bool, session: &mut DesignSession) {
        let zooming = zoom || delta.y.abs() >= self.settings.wheel_zoom_magnitude;
        if !zooming {
            session.viewport.pan_by_pixels(delta);
            return;
        }
        if delta.y > 0.0 {
            session.viewport.zoom_by(ZOOM_STEP);
        } else if delta.y < 0.0 {
            session.viewport.zoom_by(ZOOM_STEP.recip());
        }
    }
}
