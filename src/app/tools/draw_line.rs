//! Linienzug-Tool: jeder Klick schließt ein Segment ab und beginnt das
//! nächste am letzten Punkt. Return übernimmt den Zug, Escape verwirft ihn.

use super::helpers::{LineWidthSetting, RestrictHelper};
use super::{
    highlight_snap_candidate, place_junction, snap_to_junction, JunctionAnchor, MouseButton, Tool,
    ToolArgs, ToolContext, ToolEvent, ToolId, ToolResponse,
};
use crate::app::document_controller::DocumentController;
use crate::core::{Coord, ObjectType, SelectableRef, Selection};

/// Linienzug-Tool
#[derive(Debug, Clone, Default)]
pub struct DrawLineTool {
    /// Provisorische Junction unter dem Cursor
    temp_junc: Option<u64>,
    /// Provisorische Linie vom letzten Punkt zum Cursor
    temp_line: Option<u64>,
    /// Letzter bestätigter Punkt
    last_junc: Option<u64>,
    /// Abgeschlossene Segmente
    segments: Vec<u64>,
    restrict: RestrictHelper,
    line_width: LineWidthSetting,
}

impl DrawLineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn update_tip(&self, ctx: &mut ToolContext<'_>) {
        let step = if self.last_junc.is_none() {
            "Startpunkt klicken"
        } else {
            "Nächsten Punkt klicken, Return übernimmt"
        };
        let tip = format!(
            "{step} · Richtung {} (/) · {}",
            self.restrict.mode_name(),
            self.line_width.tip()
        );
        ctx.imp.tool_bar_set_tip(&tip);
    }

    /// Cursor-Position nach Achsen-Beschränkung relativ zum letzten Punkt.
    fn constrained(&self, ctx: &ToolContext<'_>, args: &ToolArgs) -> Coord {
        match self
            .last_junc
            .and_then(|id| ctx.core.document().junction(id))
            .map(|j| j.position)
        {
            Some(last) => last + self.restrict.restrict_with(args.coords - last, args.modifiers),
            None => args.coords,
        }
    }

    fn on_confirm(&mut self, ctx: &mut ToolContext<'_>, pos: Coord) -> ToolResponse {
        let last_pos = self
            .last_junc
            .and_then(|id| ctx.core.document().junction(id))
            .map(|j| j.position);
        if self.last_junc.is_some() && last_pos.is_none() {
            log::error!("Linien-Tool: letzter Punkt fehlt, breche ab");
            return ctx.cancel();
        }

        if let Some(last) = last_pos {
            let anchor =
                snap_to_junction(pos, ctx.core.document(), ctx.options.junction_merge_tolerance);
            let same_as_last = match anchor {
                JunctionAnchor::Existing(id, _) => Some(id) == self.last_junc,
                JunctionAnchor::NewPosition(p) => p == last,
            };
            if same_as_last {
                ctx.imp.tool_bar_flash("Segment hat keine Länge");
                return ToolResponse::next();
            }
        }

        let placed = place_junction(ctx, pos, &mut self.temp_junc);
        let doc = ctx.core.document_mut();
        if let Some(line) = self.temp_line.take() {
            if let Some(l) = doc.line_mut(line) {
                l.to = placed;
            }
            self.segments.push(line);
        }
        // Eingerastet: die Cursor-Junction wird nicht mehr gebraucht
        if let Some(temp) = self.temp_junc.take() {
            doc.remove_junction(temp);
        }

        let layer = ctx.imp.get_work_layer();
        let doc = ctx.core.document_mut();
        let temp = doc.create_junction(pos);
        self.temp_junc = Some(temp);
        self.temp_line = Some(doc.create_line(placed, temp, self.line_width.width(), layer));
        self.last_junc = Some(placed);
        log::debug!("Linien-Tool: Punkt {} gesetzt", placed);

        self.update_tip(ctx);
        ToolResponse::next()
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if self.segments.is_empty() {
            log::debug!("Linien-Tool ohne Segment beendet");
            return ctx.cancel();
        }
        // Das offene Segment zum Cursor wird verworfen
        if let Some(temp) = self.temp_junc.take() {
            ctx.core.document_mut().remove_junction(temp);
        }
        self.temp_line = None;

        let selection: Selection = self
            .segments
            .iter()
            .map(|id| SelectableRef::new(ObjectType::Line, *id))
            .collect();
        ctx.core.set_selection(selection);
        ctx.imp.get_highlights().clear();
        ctx.imp.update_highlights();
        log::info!("Linienzug mit {} Segmenten erstellt", self.segments.len());
        ctx.commit_and_end()
    }
}

impl Tool for DrawLineTool {
    fn id(&self) -> ToolId {
        ToolId::DrawLine
    }

    fn can_begin(&self, core: &DocumentController) -> bool {
        core.has_object_type(ObjectType::Line)
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        self.temp_junc = Some(ctx.core.document_mut().create_junction(args.coords));
        highlight_snap_candidate(ctx, args.coords);
        self.update_tip(ctx);
        ToolResponse::next()
    }

    fn apply_settings(&mut self, ctx: &mut ToolContext<'_>) {
        self.line_width.apply_settings(ctx.options);
        self.update_tip(ctx);
    }

    fn update(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        if args.is_cancel() {
            log::debug!("Linien-Tool abgebrochen");
            return ctx.cancel();
        }
        if args.is_commit() {
            return self.finish(ctx);
        }

        match args.event {
            ToolEvent::Motion => {
                let pos = self.constrained(ctx, args);
                if let Some(temp) = self.temp_junc {
                    ctx.core.document_mut().set_junction_position(temp, pos);
                }
                highlight_snap_candidate(ctx, pos);
            }
            ToolEvent::Press(MouseButton::Left) => {
                let pos = self.constrained(ctx, args);
                return self.on_confirm(ctx, pos);
            }
            ToolEvent::Key(key) => {
                let grid = ctx.imp.get_grid_spacing();
                if self.restrict.handle_key(key) {
                    self.update_tip(ctx);
                } else if self.line_width.handle_key(key, grid) {
                    if let Some(line) = self.temp_line {
                        self.line_width.apply_to_line(ctx.core.document_mut(), line);
                    }
                    self.update_tip(ctx);
                }
            }
            _ => {}
        }
        ToolResponse::next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::interface::HeadlessInterface;
    use crate::app::tools::helpers::RestrictMode;
    use crate::app::tools::{Key, Modifiers};
    use crate::core::{Document, DocumentKind, Junction, Pool};
    use crate::shared::EditorOptions;
    use std::sync::Arc;

    fn setup(doc: Document) -> (DocumentController, HeadlessInterface, EditorOptions) {
        let options = EditorOptions::default();
        let imp = HeadlessInterface::from_options(&options);
        (DocumentController::new(doc, Arc::new(Pool::new()), 10), imp, options)
    }

    fn click(x: i64, y: i64) -> ToolArgs {
        ToolArgs::new(ToolEvent::Press(MouseButton::Left), Coord::new(x, y))
    }

    #[test]
    fn polyline_commits_closed_segments_only() {
        let (mut core, mut imp, options) = setup(Document::new(DocumentKind::Symbol));
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = DrawLineTool::new();

        tool.begin(&mut ctx, &ToolArgs::new(ToolEvent::Start, Coord::ZERO));
        tool.apply_settings(&mut ctx);
        tool.update(&mut ctx, &click(0, 0));
        tool.update(&mut ctx, &click(1_000, 0));
        tool.update(&mut ctx, &click(1_000, 1_000));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Motion, Coord::new(5, 5)));
        let response = tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Key(Key::Return), Coord::ZERO));

        assert!(response.is_end());
        assert_eq!(core.document().line_count(), 2);
        assert_eq!(core.document().junction_count(), 3);
        assert_eq!(core.document().provisional_count(), 0);
        assert_eq!(core.selection().len(), 2);
    }

    #[test]
    fn return_without_segment_leaves_document_untouched() {
        let (mut core, mut imp, options) = setup(Document::new(DocumentKind::Symbol));
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = DrawLineTool::new();

        tool.begin(&mut ctx, &ToolArgs::new(ToolEvent::Start, Coord::ZERO));
        tool.update(&mut ctx, &click(0, 0));
        let response = tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Commit, Coord::ZERO));

        assert!(response.is_end());
        assert_eq!(core.document().entity_count(), 0);
        assert!(!core.is_dirty());
    }

    #[test]
    fn horizontal_restriction_keeps_segment_flat() {
        let (mut core, mut imp, options) = setup(Document::new(DocumentKind::Symbol));
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = DrawLineTool::new();
        tool.restrict.set_mode(RestrictMode::Horizontal);

        tool.begin(&mut ctx, &ToolArgs::new(ToolEvent::Start, Coord::ZERO));
        tool.update(&mut ctx, &click(0, 0));
        tool.update(&mut ctx, &click(800, 450));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Commit, Coord::ZERO));

        let doc = core.document();
        let line = doc.lines().next().expect("Linie vorhanden");
        let to = doc.junction(line.to).expect("Ende").position;
        assert_eq!(to, Coord::new(800, 0));
    }

    #[test]
    fn shift_forces_diagonal_segment() {
        let (mut core, mut imp, options) = setup(Document::new(DocumentKind::Symbol));
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = DrawLineTool::new();
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };

        tool.begin(&mut ctx, &ToolArgs::new(ToolEvent::Start, Coord::ZERO));
        tool.update(&mut ctx, &click(0, 0));
        tool.update(&mut ctx, &click(1_000, 900).with_modifiers(shift));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Commit, Coord::ZERO));

        let doc = core.document();
        let line = doc.lines().next().expect("Linie vorhanden");
        assert_eq!(doc.junction(line.to).expect("Ende").position, Coord::new(950, 950));
    }

    #[test]
    fn segments_snap_onto_existing_junctions() {
        let mut doc = Document::new(DocumentKind::Schematic);
        doc.insert_junction(Junction::new(1, Coord::new(0, 0)));
        doc.insert_junction(Junction::new(2, Coord::new(2_000, 0)));
        let (mut core, mut imp, options) = setup(doc);
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = DrawLineTool::new();

        tool.begin(&mut ctx, &ToolArgs::new(ToolEvent::Start, Coord::ZERO));
        tool.update(&mut ctx, &click(0, 0));
        tool.update(&mut ctx, &click(2_000, 0));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Commit, Coord::ZERO));

        let doc = core.document();
        assert_eq!(doc.junction_count(), 2);
        let line = doc.lines().next().expect("Linie vorhanden");
        assert_eq!((line.from, line.to), (1, 2));
    }

    #[test]
    fn zero_length_segment_is_refused() {
        let (mut core, mut imp, options) = setup(Document::new(DocumentKind::Symbol));
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = DrawLineTool::new();

        tool.begin(&mut ctx, &ToolArgs::new(ToolEvent::Start, Coord::ZERO));
        tool.update(&mut ctx, &click(10, 10));
        tool.update(&mut ctx, &click(10, 10));

        assert_eq!(tool.segment_count(), 0);
        assert!(imp.last_flash().is_some());
    }
}
