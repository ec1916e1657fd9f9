//! Pointer gesture state for the map surface.
//!
//! The machine only decides what a gesture means; it never touches tokens or
//! fog itself. Every handler returns an [`Effect`] for the session to apply.

use super::transform::screen_to_grid;
use super::viewport::Viewport;
use crate::model::{BrushMode, GridPoint, ScreenPoint, SessionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map `MouseEvent.button`.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Panning {
        anchor: ScreenPoint,
        start_offset: ScreenPoint,
    },
    FogPainting(BrushMode),
    TokenDragging(String),
}

/// What the session should do in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SetOffset(ScreenPoint),
    Paint { cell: GridPoint, mode: BrushMode },
}

/// Read-only facts the machine needs from the session.
#[derive(Debug, Clone, Copy)]
pub struct PointerContext<'a> {
    pub mode: SessionMode,
    pub brush_active: bool,
    pub viewport: &'a Viewport,
    pub cell_size_px: f64,
}

impl PointerContext<'_> {
    fn is_gm(&self) -> bool {
        self.mode == SessionMode::Gm
    }

    fn cell_at(&self, point: ScreenPoint) -> GridPoint {
        screen_to_grid(point, self.viewport, self.cell_size_px)
    }
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        point: ScreenPoint,
        ctx: &PointerContext,
    ) -> Effect {
        if !ctx.is_gm() || !self.is_idle() {
            return Effect::None;
        }
        match button {
            PointerButton::Middle => {
                *self = Interaction::Panning {
                    anchor: point,
                    start_offset: ctx.viewport.offset,
                };
                Effect::None
            }
            PointerButton::Primary | PointerButton::Secondary if ctx.brush_active => {
                let mode = if button == PointerButton::Primary {
                    BrushMode::Reveal
                } else {
                    BrushMode::Hide
                };
                *self = Interaction::FogPainting(mode);
                Effect::Paint {
                    cell: ctx.cell_at(point),
                    mode,
                }
            }
            _ => Effect::None,
        }
    }

    pub fn pointer_move(&mut self, point: ScreenPoint, ctx: &PointerContext) -> Effect {
        if !ctx.is_gm() {
            *self = Interaction::Idle;
            return Effect::None;
        }
        match self {
            Interaction::Panning { anchor, start_offset } => Effect::SetOffset(ScreenPoint::new(
                start_offset.x + (point.x - anchor.x),
                start_offset.y + (point.y - anchor.y),
            )),
            Interaction::FogPainting(mode) => Effect::Paint {
                cell: ctx.cell_at(point),
                mode: *mode,
            },
            Interaction::Idle | Interaction::TokenDragging(_) => Effect::None,
        }
    }

    /// Pointer released. Ends any pointer gesture; HTML5 drags end on
    /// drop/dragend instead.
    pub fn pointer_up(&mut self) {
        if !matches!(self, Interaction::TokenDragging(_)) {
            *self = Interaction::Idle;
        }
    }

    /// Pointer left the surface: always back to idle.
    pub fn pointer_leave(&mut self) {
        *self = Interaction::Idle;
    }

    pub fn begin_token_drag(&mut self, id: &str, ctx: &PointerContext) -> bool {
        if !ctx.is_gm() || ctx.brush_active || !self.is_idle() {
            return false;
        }
        *self = Interaction::TokenDragging(id.to_string());
        true
    }

    pub fn end_token_drag(&mut self) {
        if matches!(self, Interaction::TokenDragging(_)) {
            *self = Interaction::Idle;
        }
    }

    pub fn painting_hide(&self) -> bool {
        matches!(self, Interaction::FogPainting(BrushMode::Hide))
    }
}
