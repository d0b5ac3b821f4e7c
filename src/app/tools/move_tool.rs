//! Verschieben der Selektion per Drag, sowie Drehen/Spiegeln als
//! Einzelschritt.
//!
//! Während des Drags: `r` dreht, `e` spiegelt (um die Mitte der Selektion,
//! auf das Raster gerastet), Pfeiltasten verschieben um einen Rasterschritt,
//! `/` schaltet die Achsen-Beschränkung weiter.

use super::helpers::MoveHelper;
use super::{Key, MouseButton, Tool, ToolArgs, ToolContext, ToolEvent, ToolId, ToolResponse};
use crate::app::document_controller::DocumentController;
use crate::core::geometry::snap_to_grid;
use crate::core::Coord;

/// Variante des Tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Interaktiv mit der Maus verschieben
    Drag,
    /// Einmal 90° gegen den Uhrzeigersinn drehen
    Rotate,
    /// Einmal horizontal spiegeln
    Mirror,
}

#[derive(Debug, Clone)]
pub struct MoveTool {
    mode: MoveMode,
    helper: MoveHelper,
    /// Summe der Pfeiltasten-Schritte
    nudge: Coord,
    cursor: Coord,
}

impl MoveTool {
    pub fn new(mode: MoveMode) -> Self {
        Self {
            mode,
            helper: MoveHelper::new(),
            nudge: Coord::ZERO,
            cursor: Coord::ZERO,
        }
    }

    fn update_tip(&self, ctx: &mut ToolContext<'_>) {
        let tip = format!(
            "Klick setzt ab · r drehen · e spiegeln · Richtung {} (/)",
            self.helper.restrict.mode_name()
        );
        ctx.imp.tool_bar_set_tip(&tip);
    }

    /// Drehen oder Spiegeln um die gerasterte Mitte der Selektion.
    fn transform(&mut self, ctx: &mut ToolContext<'_>, rotate: bool) {
        let Some(center) = self.helper.tracked_center(ctx.core.document()) else {
            return;
        };
        let center = snap_to_grid(center, ctx.imp.get_grid_spacing());
        self.helper
            .move_mirror_or_rotate(ctx.core.document_mut(), center, rotate);
    }

    fn drag_to(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) {
        self.cursor = args.coords;
        let delta = self.helper.get_delta(args.coords, args.modifiers) + self.nudge;
        if self.helper.would_move(delta) {
            self.helper.move_do(ctx.core.document_mut(), delta);
        }
    }
}

impl Tool for MoveTool {
    fn id(&self) -> ToolId {
        match self.mode {
            MoveMode::Drag => ToolId::Move,
            MoveMode::Rotate => ToolId::Rotate,
            MoveMode::Mirror => ToolId::Mirror,
        }
    }

    /// Mindestens ein bewegliches (nicht fixiertes) Objekt selektiert.
    fn can_begin(&self, core: &DocumentController) -> bool {
        let mut helper = MoveHelper::new();
        helper.track_selection(core.document(), core.selection()) > 0
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        self.helper.move_init(args.coords);
        self.cursor = args.coords;
        let tracked = self
            .helper
            .track_selection(ctx.core.document(), &args.selection);
        log::debug!("{}: {} Objekte", self.id().name(), tracked);

        match self.mode {
            MoveMode::Drag => {
                self.update_tip(ctx);
                ToolResponse::next()
            }
            MoveMode::Rotate | MoveMode::Mirror => {
                self.transform(ctx, self.mode == MoveMode::Rotate);
                ctx.commit_and_end()
            }
        }
    }

    fn update(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        if args.is_cancel() {
            log::debug!("Verschieben abgebrochen");
            return ctx.cancel();
        }
        if args.is_commit() {
            return ctx.commit_and_end();
        }

        match args.event {
            ToolEvent::Motion => self.drag_to(ctx, args),
            ToolEvent::Press(MouseButton::Left) => {
                self.drag_to(ctx, args);
                log::info!("Verschiebung abgeschlossen");
                return ctx.commit_and_end();
            }
            ToolEvent::Key(key) => {
                let grid = ctx.imp.get_grid_spacing() as i64;
                let step = match key {
                    Key::Left => Some(Coord::new(-grid, 0)),
                    Key::Right => Some(Coord::new(grid, 0)),
                    Key::Up => Some(Coord::new(0, grid)),
                    Key::Down => Some(Coord::new(0, -grid)),
                    _ => None,
                };
                if let Some(step) = step {
                    self.nudge += step;
                    let moved = ToolArgs {
                        coords: self.cursor,
                        ..args.clone()
                    };
                    self.drag_to(ctx, &moved);
                } else if key == Key::Char('r') || key == Key::Char('e') {
                    self.transform(ctx, key == Key::Char('r'));
                } else if self.helper.restrict.handle_key(key) {
                    self.update_tip(ctx);
                }
            }
            _ => {}
        }
        ToolResponse::next()
    }

    fn is_specific(&self) -> bool {
        self.mode != MoveMode::Drag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::interface::HeadlessInterface;
    use crate::core::{
        selection_of, BoardPackage, Document, DocumentKind, ObjectType, Orientation, Pool,
        SelectableRef, Selection,
    };
    use crate::shared::EditorOptions;
    use std::sync::Arc;

    fn board() -> (DocumentController, Selection) {
        let mut doc = Document::new(DocumentKind::Board);
        doc.insert_package(BoardPackage::new(1, "U1", Coord::new(1_000, 0)));
        let mut fixed = BoardPackage::new(2, "U2", Coord::ZERO);
        fixed.fixed = true;
        doc.insert_package(fixed);
        let selection = selection_of([
            SelectableRef::new(ObjectType::BoardPackage, 1),
            SelectableRef::new(ObjectType::BoardPackage, 2),
        ]);
        let mut core = DocumentController::new(doc, Arc::new(Pool::new()), 10);
        core.set_selection(selection.clone());
        (core, selection)
    }

    #[test]
    fn drag_moves_unfixed_package_and_commits() {
        let (mut core, selection) = board();
        let mut imp = HeadlessInterface::default();
        let options = EditorOptions::default();
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = MoveTool::new(MoveMode::Drag);

        tool.begin(&mut ctx, &ToolArgs::default().with_selection(selection));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Motion, Coord::new(50, 70)));
        let response = tool.update(
            &mut ctx,
            &ToolArgs::new(ToolEvent::Press(MouseButton::Left), Coord::new(100, 70)),
        );

        assert!(response.is_end());
        assert_eq!(core.document().package(1).expect("vorhanden").position, Coord::new(1_100, 70));
        assert_eq!(core.document().package(2).expect("vorhanden").position, Coord::ZERO);
        assert!(core.can_undo());
    }

    #[test]
    fn zero_drag_commits_nothing() {
        let (mut core, selection) = board();
        let rebuilds = std::rc::Rc::new(std::cell::Cell::new(0));
        let r = std::rc::Rc::clone(&rebuilds);
        core.signals.rebuilt.connect(move |_| r.set(r.get() + 1));
        let mut imp = HeadlessInterface::default();
        let options = EditorOptions::default();
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = MoveTool::new(MoveMode::Drag);

        tool.begin(&mut ctx, &ToolArgs::default().with_selection(selection));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Motion, Coord::ZERO));
        assert!(!ctx.core.is_dirty());
        let response = tool.update(
            &mut ctx,
            &ToolArgs::new(ToolEvent::Press(MouseButton::Left), Coord::ZERO),
        );

        assert!(response.is_end());
        assert_eq!(rebuilds.get(), 0);
        assert!(!core.can_undo());
        assert_eq!(core.document().package(1).expect("vorhanden").position, Coord::new(1_000, 0));
    }

    #[test]
    fn cancel_restores_original_positions() {
        let (mut core, selection) = board();
        let mut imp = HeadlessInterface::default();
        let options = EditorOptions::default();
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = MoveTool::new(MoveMode::Drag);

        tool.begin(&mut ctx, &ToolArgs::default().with_selection(selection));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Motion, Coord::new(500, 500)));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Key(Key::Char('r')), Coord::new(500, 500)));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Key(Key::Escape), Coord::ZERO));

        let pkg = core.document().package(1).expect("vorhanden");
        assert_eq!(pkg.position, Coord::new(1_000, 0));
        assert_eq!(pkg.orientation, Orientation::Up);
        assert!(!core.can_undo());
    }

    #[test]
    fn arrow_keys_nudge_by_grid() {
        let (mut core, selection) = board();
        let mut imp = HeadlessInterface {
            grid_spacing: 100,
            ..HeadlessInterface::default()
        };
        let options = EditorOptions::default();
        let mut ctx = ToolContext::new(&mut core, &mut imp, &options);
        let mut tool = MoveTool::new(MoveMode::Drag);

        tool.begin(&mut ctx, &ToolArgs::default().with_selection(selection));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Key(Key::Right), Coord::ZERO));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Key(Key::Right), Coord::ZERO));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Key(Key::Up), Coord::ZERO));
        tool.update(&mut ctx, &ToolArgs::new(ToolEvent::Commit, Coord::ZERO));

        assert_eq!(core.document().package(1).expect("vorhanden").position, Coord::new(1_200, 100));
    }

    #[test]
    fn rotate_is_one_shot() {
        let (mut core, selection) = board();
        let mut imp = HeadlessInterface::default();
        let options = EditorOptions::default();
        let mut tool = MoveTool::new(MoveMode::Rotate);
        assert!(tool.is_specific());

        let response = tool.begin(
            &mut ToolContext::new(&mut core, &mut imp, &options),
            &ToolArgs::default().with_selection(selection),
        );

        assert!(response.is_end());
        let pkg = core.document().package(1).expect("vorhanden");
        assert_eq!(pkg.orientation, Orientation::Left);
        assert_eq!(pkg.position, Coord::new(1_000, 0));
        assert!(!core.is_dirty());
    }

    #[test]
    fn only_fixed_selection_cannot_begin() {
        let (mut core, _) = board();
        core.set_selection(selection_of([SelectableRef::new(ObjectType::BoardPackage, 2)]));
        assert!(!MoveTool::new(MoveMode::Drag).can_begin(&core));
        assert!(!MoveTool::new(MoveMode::Mirror).can_begin(&core));
    }
}
