//! Platziert die noch fehlenden Pins einer Unit im Symbol-Editor.
//!
//! Pins werden in Unit-Reihenfolge abgearbeitet: der aktuelle Pin folgt dem
//! Cursor, ein Klick setzt ihn ab und holt den nächsten. Die Leertaste setzt
//! den Pin einen Rasterschritt unter den zuletzt platzierten.

use std::collections::VecDeque;

use super::helpers::MoveHelper;
use super::{Key, MouseButton, Tool, ToolArgs, ToolContext, ToolEvent, ToolId, ToolResponse};
use crate::app::document_controller::DocumentController;
use crate::core::{selection_of, Coord, ObjectType, Orientation, SelectableRef};

#[derive(Debug, Clone, Default)]
pub struct MapPinTool {
    mover: MoveHelper,
    /// Noch anzulegende Pin-Namen
    pending: VecDeque<String>,
    /// Pin, der gerade dem Cursor folgt
    placing: Option<u64>,
    placed: Vec<u64>,
    cursor: Coord,
}

impl MapPinTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending_pins(core: &DocumentController) -> Vec<String> {
        let doc = core.document();
        let Some(unit) = doc.unit.and_then(|id| core.pool().unit(id)) else {
            return Vec::new();
        };
        doc.unplaced_pins(unit)
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn update_tip(&self, ctx: &mut ToolContext<'_>) {
        let name = self
            .placing
            .and_then(|id| ctx.core.document().pin(id))
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let tip = format!(
            "Pin {} absetzen · Leertaste darunter · r drehen · e spiegeln · noch {} Pins",
            name,
            self.pending.len()
        );
        ctx.imp.tool_bar_set_tip(&tip);
    }

    fn last_placed(&self, ctx: &ToolContext<'_>) -> Option<(Coord, Orientation)> {
        let doc = ctx.core.document();
        self.placed
            .last()
            .and_then(|id| doc.pin(*id))
            .map(|p| (p.position, p.orientation))
    }

    /// Legt den nächsten Pin an. Endet mit Commit, wenn keiner mehr offen ist.
    fn next_pin(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let Some(name) = self.pending.pop_front() else {
            log::info!("{} Pins platziert", self.placed.len());
            if self.placed.is_empty() {
                return ctx.cancel();
            }
            let placed = selection_of(
                self.placed
                    .iter()
                    .map(|id| SelectableRef::new(ObjectType::SymbolPin, *id)),
            );
            ctx.core.set_selection(placed);
            return ctx.commit_and_end();
        };

        let orientation = self
            .last_placed(ctx)
            .map(|(_, o)| o)
            .unwrap_or(Orientation::Right);
        let id = ctx
            .core
            .document_mut()
            .create_pin(&name, self.cursor, orientation);
        self.placing = Some(id);
        self.mover.move_init(self.cursor);
        let tracked = selection_of([SelectableRef::new(ObjectType::SymbolPin, id)]);
        self.mover.track_selection(ctx.core.document(), &tracked);
        self.update_tip(ctx);
        ToolResponse::next()
    }

    /// Setzt die Gesamtverschiebung des aktuellen Pins auf `delta`.
    fn move_to(&mut self, ctx: &mut ToolContext<'_>, delta: Coord) {
        if self.mover.would_move(delta) {
            self.mover.move_do(ctx.core.document_mut(), delta);
        }
    }

    fn place(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let Some(id) = self.placing.take() else {
            return ToolResponse::next();
        };
        self.placed.push(id);
        log::debug!("Pin {} abgesetzt", id);
        self.next_pin(ctx)
    }
}

impl Tool for MapPinTool {
    fn id(&self) -> ToolId {
        ToolId::MapPin
    }

    fn can_begin(&self, core: &DocumentController) -> bool {
        core.has_object_type(ObjectType::SymbolPin) && !Self::pending_pins(core).is_empty()
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        self.cursor = args.coords;
        self.pending = Self::pending_pins(ctx.core).into();
        log::info!("Pins platzieren: {} offen", self.pending.len());
        self.next_pin(ctx)
    }

    fn update(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        if args.is_cancel() {
            log::debug!("Pins platzieren abgebrochen");
            return ctx.cancel();
        }
        let Some(id) = self.placing else {
            return ToolResponse::next();
        };

        match args.event {
            ToolEvent::Motion => {
                self.cursor = args.coords;
                let delta = self.mover.get_delta(args.coords, args.modifiers);
                self.move_to(ctx, delta);
            }
            ToolEvent::Press(MouseButton::Left) | ToolEvent::Commit | ToolEvent::Key(Key::Return) => {
                if args.event != ToolEvent::Commit {
                    self.cursor = args.coords;
                    let delta = self.mover.get_delta(args.coords, args.modifiers);
                    self.move_to(ctx, delta);
                }
                return self.place(ctx);
            }
            ToolEvent::Key(Key::Char(' ')) => {
                let Some((last, _)) = self.last_placed(ctx) else {
                    ctx.imp.tool_bar_flash("noch kein Pin platziert");
                    return ToolResponse::next();
                };
                let grid = ctx.imp.get_grid_spacing() as i64;
                let target = last - Coord::new(0, grid);
                self.cursor = target;
                self.move_to(ctx, target - self.mover.origin());
                return self.place(ctx);
            }
            ToolEvent::Key(key @ (Key::Char('r') | Key::Char('e'))) => {
                let doc = ctx.core.document_mut();
                if let Some(center) = doc.pin(id).map(|p| p.position) {
                    self.mover
                        .move_mirror_or_rotate(doc, center, key == Key::Char('r'));
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
    use crate::core::{Document, DocumentKind, Pool, SymbolPin};
    use crate::shared::EditorOptions;
    use std::sync::Arc;

    fn pool() -> Pool {
        let mut pool = Pool::new();
        pool.add_unit(7, "NAND", &["A", "B", "Y"]);
        pool
    }

    struct Fixture {
        core: DocumentController,
        imp: HeadlessInterface,
        options: EditorOptions,
    }

    impl Fixture {
        fn new(doc: Document) -> Self {
            Self {
                core: DocumentController::new(doc, Arc::new(pool()), 10),
                imp: HeadlessInterface {
                    grid_spacing: 100,
                    ..HeadlessInterface::default()
                },
                options: EditorOptions::default(),
            }
        }

        fn ctx(&mut self) -> ToolContext<'_> {
            ToolContext::new(&mut self.core, &mut self.imp, &self.options)
        }
    }

    fn click(x: i64, y: i64) -> ToolArgs {
        ToolArgs::new(ToolEvent::Press(MouseButton::Left), Coord::new(x, y))
    }

    fn key(c: char) -> ToolArgs {
        ToolArgs::new(ToolEvent::Key(Key::Char(c)), Coord::ZERO)
    }

    fn pin_at(core: &DocumentController, name: &str) -> Coord {
        let doc = core.document();
        let id = doc.find_pin(name).expect("Pin vorhanden");
        doc.pin(id).expect("Pin vorhanden").position
    }

    #[test]
    fn places_missing_pins_in_unit_order_and_commits() {
        let mut doc = Document::for_unit(7);
        doc.insert_pin(SymbolPin::new(1, "B", Coord::new(0, 500), Orientation::Left));
        let mut f = Fixture::new(doc);
        let mut tool = MapPinTool::new();

        assert_eq!(tool.begin(&mut f.ctx(), &ToolArgs::default()), ToolResponse::next());
        assert!(f.imp.tip.contains("Pin A"));
        tool.update(&mut f.ctx(), &ToolArgs::new(ToolEvent::Motion, Coord::new(40, 40)));
        tool.update(&mut f.ctx(), &click(100, 0));
        let response = tool.update(&mut f.ctx(), &click(100, -200));

        assert!(response.is_end());
        assert_eq!(pin_at(&f.core, "A"), Coord::new(100, 0));
        assert_eq!(pin_at(&f.core, "Y"), Coord::new(100, -200));
        assert_eq!(f.core.document().pin_count(), 3);
        assert_eq!(f.core.document().provisional_count(), 0);
        assert_eq!(f.core.selection().len(), 2);
        assert!(f.core.can_undo());
    }

    #[test]
    fn space_stacks_pin_below_previous() {
        let mut f = Fixture::new(Document::for_unit(7));
        let mut tool = MapPinTool::new();

        tool.begin(&mut f.ctx(), &ToolArgs::default());
        // Ohne abgesetzten Pin gibt es keine Referenz
        tool.update(&mut f.ctx(), &key(' '));
        assert_eq!(f.imp.last_flash(), Some("noch kein Pin platziert"));

        tool.update(&mut f.ctx(), &click(300, 300));
        tool.update(&mut f.ctx(), &key('r'));
        tool.update(&mut f.ctx(), &key(' '));
        let response = tool.update(&mut f.ctx(), &key(' '));

        assert!(response.is_end());
        assert_eq!(pin_at(&f.core, "A"), Coord::new(300, 300));
        assert_eq!(pin_at(&f.core, "B"), Coord::new(300, 200));
        assert_eq!(pin_at(&f.core, "Y"), Coord::new(300, 100));
        let doc = f.core.document();
        let b = doc.pin(doc.find_pin("B").expect("Pin vorhanden")).expect("Pin vorhanden");
        // Orientierung wird vom vorigen Pin übernommen, dann gedreht
        assert_eq!(b.orientation, Orientation::Up);
    }

    #[test]
    fn cancel_discards_all_pins() {
        let mut f = Fixture::new(Document::for_unit(7));
        let mut tool = MapPinTool::new();

        tool.begin(&mut f.ctx(), &ToolArgs::default());
        tool.update(&mut f.ctx(), &click(0, 0));
        assert_eq!(f.core.document().pin_count(), 2);
        let response = tool.update(&mut f.ctx(), &ToolArgs::new(ToolEvent::Cancel, Coord::ZERO));

        assert!(response.is_end());
        assert_eq!(f.core.document().pin_count(), 0);
        assert!(!f.core.is_dirty());
        assert!(!f.core.can_undo());
    }

    #[test]
    fn can_begin_needs_unit_with_unplaced_pins() {
        let with_unit = Fixture::new(Document::for_unit(7));
        assert!(MapPinTool::new().can_begin(&with_unit.core));

        let no_unit = Fixture::new(Document::new(DocumentKind::Symbol));
        assert!(!MapPinTool::new().can_begin(&no_unit.core));

        let unknown_unit = Fixture::new(Document::for_unit(99));
        assert!(!MapPinTool::new().can_begin(&unknown_unit.core));

        let mut complete = Document::for_unit(7);
        for (id, name) in [(1, "A"), (2, "B"), (3, "Y")] {
            complete.insert_pin(SymbolPin::new(id, name, Coord::ZERO, Orientation::Right));
        }
        assert!(!MapPinTool::new().can_begin(&Fixture::new(complete).core));

        let board = Fixture::new(Document::new(DocumentKind::Board));
        assert!(!MapPinTool::new().can_begin(&board.core));
    }
}
