//! Per-frame redraw of the designer canvas.
//!
//! [`compose`] turns session state into a [`Frame`] of screen-space shapes. It is
//! pure, so drawing the same state twice yields the same frame. The systems
//! below only copy that frame onto gizmos, pooled sprites and pooled text.

use std::f32::consts::{FRAC_PI_4, SQRT_2, TAU};
use std::time::Duration;

use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;

use super::coords::IsoProjection;
use super::gesture::{DragState, GestureMachine, LongPressArm};
use super::layout::{BaseLayout, Footprint, PlacedBuilding};
use super::session::{ActiveTool, CanvasSize, DesignFocus};
use super::viewport::Viewport;
use super::{DesignerSettings, GRID_SIZE};
use crate::AppSet;
use crate::screens::Screen;
use crate::theme::palette;

/// Dash and gap length of dashed outlines, in pixels.
const DASH_PX: f32 = 6.0;
const DASH_GAP_PX: f32 = 4.0;

/// Building text is skipped below this zoom.
const MIN_LABEL_HALF_CELL: f32 = 3.0;

/// Long-press highlight pulses per second.
const PULSE_HZ: f32 = 3.0;

/// Draw order of filled shapes.
const LAYER_TERRITORY: f32 = 0.0;
const LAYER_BUILDING: f32 = 1.0;
const LAYER_PREVIEW: f32 = 2.0;
const LAYER_HIGHLIGHT: f32 = 3.0;
const LAYER_TEXT: f32 = 10.0;

/// A filled diamond: an axis-aligned grid square seen through the projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub center: Vec2,
    /// Corner-to-corner extent in pixels.
    pub diagonal: f32,
    pub color: Color,
    pub layer: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Vec2>,
    pub color: Color,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Vec2,
    pub text: String,
    pub color: Color,
    pub size: f32,
}

/// Everything drawn in one frame, in screen pixels.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub fills: Vec<Fill>,
    pub strokes: Vec<Stroke>,
    pub labels: Vec<Label>,
}

/// State read by [`compose`].
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub layout: &'a BaseLayout,
    pub projection: IsoProjection,
    pub focus: &'a DesignFocus,
    pub tool: Option<&'a str>,
    pub armed: Option<LongPressArm>,
    pub drag: Option<DragState>,
    pub now: Duration,
    pub show_territory: bool,
}

impl Frame {
    fn diamond(
        &mut self,
        projection: &IsoProjection,
        footprint: Footprint,
        color: Color,
        layer: f32,
    ) {
        let [south, _, north, _] = projection.block_corners(footprint.min, footprint.size);
        self.fills.push(Fill {
            center: (south + north) / 2.0,
            diagonal: south.y - north.y,
            color,
            layer,
        });
    }

    fn outline(
        &mut self,
        projection: &IsoProjection,
        footprint: Footprint,
        color: Color,
        dashed: bool,
    ) {
        let corners = projection.block_corners(footprint.min, footprint.size);
        let mut points = corners.to_vec();
        points.push(corners[0]);
        self.strokes.push(Stroke {
            points,
            color,
            dashed,
        });
    }
}

#[must_use]
pub fn compose(inputs: &FrameInputs) -> Frame {
    let mut frame = Frame::default();
    grid(&mut frame, &inputs.projection);
    if inputs.show_territory {
        territory(&mut frame, inputs);
    }
    buildings(&mut frame, inputs);
    previews(&mut frame, inputs);
    frame
}

fn grid(frame: &mut Frame, projection: &IsoProjection) {
    let (min, max) = projection.visible_cells();
    if min.x < max.x && min.y < max.y {
        let step = projection.grid_line_step();
        let stride = usize::try_from(step).unwrap_or(1);
        let first = |v: i32| (v + step - 1).div_euclid(step) * step;
        for x in (first(min.x)..=max.x).step_by(stride) {
            frame.strokes.push(Stroke {
                points: vec![
                    projection.grid_to_screen(IVec2::new(x, min.y).as_vec2()),
                    projection.grid_to_screen(IVec2::new(x, max.y).as_vec2()),
                ],
                color: palette::GRID_LINE,
                dashed: false,
            });
        }
        for y in (first(min.y)..=max.y).step_by(stride) {
            frame.strokes.push(Stroke {
                points: vec![
                    projection.grid_to_screen(IVec2::new(min.x, y).as_vec2()),
                    projection.grid_to_screen(IVec2::new(max.x, y).as_vec2()),
                ],
                color: palette::GRID_LINE,
                dashed: false,
            });
        }
    }

    let whole = Footprint::new(IVec2::ZERO, GRID_SIZE);
    frame.outline(projection, whole, palette::GRID_BOUNDARY, false);

    let corners = projection.block_corners(IVec2::ZERO, GRID_SIZE);
    let offsets = [
        Vec2::new(0.0, 14.0),
        Vec2::new(36.0, 0.0),
        Vec2::new(0.0, -14.0),
        Vec2::new(-36.0, 0.0),
    ];
    let names = [
        (0, 0),
        (GRID_SIZE, 0),
        (GRID_SIZE, GRID_SIZE),
        (0, GRID_SIZE),
    ];
    for ((corner, offset), (x, y)) in corners.into_iter().zip(offsets).zip(names) {
        frame.labels.push(Label {
            position: corner + offset,
            text: format!("{x},{y}"),
            color: palette::GRID_CORNER_TEXT,
            size: palette::FONT_SIZE_CORNER,
        });
    }
}

fn territory(frame: &mut Frame, inputs: &FrameInputs) {
    for zone in inputs.layout.territory_zones() {
        let footprint = Footprint::new(zone.min, zone.max.x - zone.min.x + 1);
        frame.diamond(&inputs.projection, footprint, palette::TERRITORY_FILL, LAYER_TERRITORY);
        frame.outline(&inputs.projection, footprint, palette::TERRITORY_OUTLINE, true);
    }
}

fn building_text(
    inputs: &FrameInputs,
    building: &PlacedBuilding,
    footprint: Footprint,
    icon: &str,
) -> Option<Label> {
    let h = inputs.projection.half_cell;
    if h < MIN_LABEL_HALF_CELL {
        return None;
    }
    let text = building.label.clone().unwrap_or_else(|| icon.to_string());
    if text.is_empty() {
        return None;
    }
    Some(Label {
        position: inputs.projection.grid_to_screen(footprint.center()),
        text,
        color: palette::BUILDING_TEXT,
        size: (h * footprint.size as f32 * 0.6)
            .clamp(palette::FONT_SIZE_BUILDING_MIN, palette::FONT_SIZE_BUILDING_MAX),
    })
}

fn buildings(frame: &mut Frame, inputs: &FrameInputs) {
    let projection = &inputs.projection;
    for building in inputs.layout.buildings() {
        let Some(ty) = inputs.layout.type_of(building) else {
            continue;
        };
        let footprint = Footprint::new(building.origin(), ty.size);
        let dragged = inputs.drag.filter(|drag| drag.building == building.id);

        if let Some(drag) = dragged {
            let ghost = ty.color.with_alpha(palette::GHOST_ALPHA);
            frame.diamond(projection, footprint, ghost, LAYER_BUILDING);
            if let Some(preview) = drag.preview {
                let valid = inputs
                    .layout
                    .check_placement(&ty.id, preview, Some(building.id))
                    .is_ok();
                let color = if valid { ty.color } else { palette::INVALID_PREVIEW };
                let target = Footprint::new(preview, ty.size);
                let fill = color.with_alpha(palette::PREVIEW_ALPHA);
                frame.diamond(projection, target, fill, LAYER_PREVIEW);
                frame.outline(projection, target, color, false);
            }
            continue;
        }

        frame.diamond(projection, footprint, ty.color, LAYER_BUILDING);
        frame.outline(projection, footprint, ty.color.darker(0.15), false);
        if inputs.focus.selected == Some(building.id) {
            frame.outline(projection, footprint, palette::SELECTION_OUTLINE, false);
        }
        if let Some(arm) = inputs.armed.filter(|arm| arm.building == building.id) {
            let alpha = pulse_alpha(inputs.now.saturating_sub(arm.armed_at));
            frame.diamond(
                projection,
                footprint,
                palette::LONG_PRESS_HIGHLIGHT.with_alpha(alpha),
                LAYER_HIGHLIGHT,
            );
        }
        if let Some(label) = building_text(inputs, building, footprint, &ty.icon) {
            frame.labels.push(label);
        }
    }
}

fn previews(frame: &mut Frame, inputs: &FrameInputs) {
    if inputs.drag.is_some() {
        return;
    }
    let Some(cell) = inputs.focus.hovered else {
        return;
    };
    let projection = &inputs.projection;
    match inputs.tool.and_then(|id| inputs.layout.catalog().get(id)) {
        Some(ty) => {
            let valid = inputs.layout.check_placement(&ty.id, cell, None).is_ok();
            let color = if valid { ty.color } else { palette::INVALID_PREVIEW };
            let footprint = Footprint::new(cell, ty.size);
            let fill = color.with_alpha(palette::PREVIEW_ALPHA);
            frame.diamond(projection, footprint, fill, LAYER_PREVIEW);
            frame.outline(projection, footprint, color, false);
        }
        None => frame.outline(projection, Footprint::new(cell, 1), palette::HOVER_OUTLINE, false),
    }
}

/// Highlight alpha `elapsed` after a long-press was armed.
fn pulse_alpha(elapsed: Duration) -> f32 {
    let phase = (elapsed.as_secs_f32() * PULSE_HZ * TAU).sin();
    0.45 + 0.25 * phase
}

/// Splits `a -> b` into dash segments.
fn dashes(a: Vec2, b: Vec2) -> Vec<(Vec2, Vec2)> {
    let length = a.distance(b);
    if length <= f32::EPSILON {
        return Vec::new();
    }
    let dir = (b - a) / length;
    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + DASH_PX).min(length);
        segments.push((a + dir * start, a + dir * end));
        start += DASH_PX + DASH_GAP_PX;
    }
    segments
}

/// Canvas pixels (top-left origin, y down) to world space of a default 2d camera.
fn to_world(screen: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(screen.x - canvas.x / 2.0, canvas.y / 2.0 - screen.y)
}

/// Pooled sprite showing `Frame::fills[index]`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FillSprite(pub usize);

/// Pooled text showing `Frame::labels[index]`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CanvasLabel(pub usize);

fn compose_frame(
    layout: Res<BaseLayout>,
    viewport: Res<Viewport>,
    focus: Res<DesignFocus>,
    tool: Res<ActiveTool>,
    canvas: Res<CanvasSize>,
    machine: Res<GestureMachine>,
    settings: Res<DesignerSettings>,
    time: Res<Time<Real>>,
    mut frame: ResMut<Frame>,
) {
    let next = compose(&FrameInputs {
        layout: &layout,
        projection: viewport.projection(canvas.0),
        focus: &focus,
        tool: tool.0.as_deref(),
        armed: machine.armed(),
        drag: machine.drag(),
        now: time.elapsed(),
        show_territory: settings.show_territory,
    });
    frame.set_if_neq(next);
}

fn draw_strokes(frame: Res<Frame>, canvas: Res<CanvasSize>, mut gizmos: Gizmos) {
    for stroke in &frame.strokes {
        for pair in stroke.points.windows(2) {
            let (a, b) = (to_world(pair[0], canvas.0), to_world(pair[1], canvas.0));
            if stroke.dashed {
                for (start, end) in dashes(a, b) {
                    gizmos.line_2d(start, end, stroke.color);
                }
            } else {
                gizmos.line_2d(a, b, stroke.color);
            }
        }
    }
}

fn fill_transform(fill: &Fill, canvas: Vec2) -> Transform {
    Transform::from_translation(to_world(fill.center, canvas).extend(fill.layer))
        .with_rotation(Quat::from_rotation_z(FRAC_PI_4))
}

fn sync_fill_sprites(
    mut commands: Commands,
    frame: Res<Frame>,
    canvas: Res<CanvasSize>,
    mut pool: Query<(&FillSprite, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    let mut pooled = 0;
    for (slot, mut sprite, mut transform, mut visibility) in &mut pool {
        pooled = pooled.max(slot.0 + 1);
        match frame.fills.get(slot.0) {
            Some(fill) => {
                sprite.color = fill.color;
                sprite.custom_size = Some(Vec2::splat(fill.diagonal / SQRT_2));
                *transform = fill_transform(fill, canvas.0);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
    for (index, fill) in frame.fills.iter().enumerate().skip(pooled) {
        commands.spawn((
            Name::new("Canvas Fill"),
            FillSprite(index),
            Sprite::from_color(fill.color, Vec2::splat(fill.diagonal / SQRT_2)),
            fill_transform(fill, canvas.0),
            DespawnOnExit(Screen::Designer),
        ));
    }
}

fn sync_labels(
    mut commands: Commands,
    frame: Res<Frame>,
    canvas: Res<CanvasSize>,
    mut pool: Query<(
        &CanvasLabel,
        &mut Text2d,
        &mut TextFont,
        &mut TextColor,
        &mut Transform,
        &mut Visibility,
    )>,
) {
    let mut pooled = 0;
    for (slot, mut text, mut font, mut color, mut transform, mut visibility) in &mut pool {
        pooled = pooled.max(slot.0 + 1);
        match frame.labels.get(slot.0) {
            Some(label) => {
                if text.0 != label.text {
                    text.0.clone_from(&label.text);
                }
                font.font_size = label.size;
                color.0 = label.color;
                transform.translation = to_world(label.position, canvas.0).extend(LAYER_TEXT);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
    for (index, label) in frame.labels.iter().enumerate().skip(pooled) {
        commands.spawn((
            Name::new("Canvas Label"),
            CanvasLabel(index),
            Text2d::new(label.text.clone()),
            TextFont {
                font_size: label.size,
                ..default()
            },
            TextColor(label.color),
            Transform::from_translation(to_world(label.position, canvas.0).extend(LAYER_TEXT)),
            DespawnOnExit(Screen::Designer),
        ));
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<FillSprite>()
        .register_type::<CanvasLabel>();
    app.init_resource::<Frame>();

    app.add_systems(
        Update,
        (
            compose_frame,
            (
                draw_strokes.run_if(resource_exists::<GizmoConfigStore>),
                sync_fill_sprites,
                sync_labels,
            ),
        )
            .chain()
            .in_set(AppSet::Render)
            .run_if(in_state(Screen::Designer)),
    );
}
