//! State-Definitionen und Hilfsmethoden für das Bogen-Tool.

use super::super::helpers::LineWidthSetting;
use super::super::{place_junction, ToolContext};
use crate::core::Coord;

/// Zustände des Bogen-Tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawArcState {
    /// Startpunkt wählen
    From,
    /// Endpunkt wählen (provisorischer Bogen folgt dem Cursor)
    To,
    /// Mittelpunkt wählen
    Center,
}

/// Bogen-Tool
#[derive(Debug, Clone)]
pub struct DrawArcTool {
    pub(crate) state: DrawArcState,
    /// Provisorische Junction unter dem Cursor
    pub(crate) temp_junc: Option<u64>,
    pub(crate) from_junc: Option<u64>,
    pub(crate) to_junc: Option<u64>,
    pub(crate) temp_arc: Option<u64>,
    pub(crate) line_width: LineWidthSetting,
}

impl DrawArcTool {
    /// Erstellt ein neues Bogen-Tool mit Standardwerten.
    pub fn new() -> Self {
        Self {
            state: DrawArcState::From,
            temp_junc: None,
            from_junc: None,
            to_junc: None,
            temp_arc: None,
            line_width: LineWidthSetting::default(),
        }
    }

    pub fn state(&self) -> DrawArcState {
        self.state
    }

    pub(crate) fn update_tip(&self, ctx: &mut ToolContext<'_>) {
        let step = match self.state {
            DrawArcState::From => "Startpunkt klicken",
            DrawArcState::To => "Endpunkt klicken",
            DrawArcState::Center => "Mittelpunkt klicken",
        };
        let tip = format!("{step} · Escape bricht ab · {}", self.line_width.tip());
        ctx.imp.tool_bar_set_tip(&tip);
    }

    /// Löst einen bestätigten Punkt in eine Junction auf (siehe `place_junction`).
    pub(crate) fn make_junction(&mut self, ctx: &mut ToolContext<'_>, coords: Coord) -> u64 {
        place_junction(ctx, coords, &mut self.temp_junc)
    }

    /// Position einer Junction; `None` wenn sie nicht (mehr) existiert.
    pub(crate) fn junction_position(ctx: &ToolContext<'_>, id: Option<u64>) -> Option<Coord> {
        id.and_then(|id| ctx.core.document().junction(id))
            .map(|j| j.position)
    }
}

impl Default for DrawArcTool {
    fn default() -> Self {
        Self::new()
    }
}
