//! Session-wide interaction resources and the borrowed view gestures act through.

use bevy::prelude::*;

use super::coords::IsoProjection;
use super::layout::{BaseLayout, BuildingId};
use super::viewport::Viewport;

/// Hovered cell and selected building.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct DesignFocus {
    pub hovered: Option<IVec2>,
    pub selected: Option<BuildingId>,
}

/// Building type armed for placement, if any.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct ActiveTool(pub Option<String>);

/// Logical size of the drawing surface in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct CanvasSize(pub Vec2);

impl Default for CanvasSize {
    fn default() -> Self {
        Self(Vec2::new(1280.0, 720.0))
    }
}

/// Outbound notifications raised while handling input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesignerSignal {
    /// A labelable building was double-tapped; `anchor` is the screen point to
    /// attach the editor to.
    EditLabel { building: BuildingId, anchor: Vec2 },
    /// Fire-and-forget haptic pulse.
    Haptic,
}

/// Mutable access to everything a gesture may touch for one batch of input.
///
/// Gestures never reach into resources directly; they go through the layout and
/// viewport operations exposed here.
pub struct DesignSession<'a> {
    pub layout: &'a mut BaseLayout,
    pub viewport: &'a mut Viewport,
    pub focus: &'a mut DesignFocus,
    pub tool: Option<&'a str>,
    pub canvas: Vec2,
    pub signals: Vec<DesignerSignal>,
}

impl<'a> DesignSession<'a> {
    pub const fn new(
        layout: &'a mut BaseLayout,
        viewport: &'a mut Viewport,
        focus: &'a mut DesignFocus,
        tool: Option<&'a str>,
        canvas: Vec2,
    ) -> Self {
        Self {
            layout,
            viewport,
            focus,
            tool,
            canvas,
            signals: Vec::new(),
        }
    }

    #[must_use]
    pub const fn projection(&self) -> IsoProjection {
        self.viewport.projection(self.canvas)
    }

    #[must_use]
    pub fn cell_at(&self, screen: Vec2) -> IVec2 {
        self.projection().screen_to_grid(screen)
    }

    /// Building under a screen point and whether its type takes a label.
    #[must_use]
    pub fn building_at_screen(&self, screen: Vec2) -> Option<(BuildingId, bool)> {
        let building = self.layout.building_at(self.cell_at(screen))?;
        let labelable = self
            .layout
            .type_of(building)
            .is_some_and(|ty| ty.is_labelable());
        Some((building.id, labelable))
    }
}
