use eda_tool_engine::app::tools::helpers::{MapSymbolHelper, MoveHelper, RestrictMode, SymbolSelection};
use eda_tool_engine::app::{Key, Modifiers, MouseButton};
use eda_tool_engine::core::{BoardPackage, Junction};
use eda_tool_engine::{
    selection_of, Coord, Document, DocumentController, DocumentKind, EditorOptions,
    HeadlessInterface, ObjectType, Orientation, Pool, SelectableRef, Selection, ToolArgs,
    ToolEvent, ToolHost, ToolHostError, ToolId,
};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

fn host_for(document: Document) -> ToolHost<HeadlessInterface> {
    let options = EditorOptions::default();
    let core = DocumentController::new(document, Arc::new(Pool::new()), options.history_depth);
    ToolHost::new(core, HeadlessInterface::from_options(&options), options)
}

fn click(x: i64, y: i64) -> ToolArgs {
    ToolArgs::new(ToolEvent::Press(MouseButton::Left), Coord::new(x, y))
}

fn packages(ids: &[u64]) -> Selection {
    selection_of(
        ids.iter()
            .map(|id| SelectableRef::new(ObjectType::BoardPackage, *id)),
    )
}

fn count_rebuilds(host: &mut ToolHost<HeadlessInterface>) -> Rc<Cell<usize>> {
    let rebuilds = Rc::new(Cell::new(0));
    let r = Rc::clone(&rebuilds);
    host.core_mut()
        .signals
        .rebuilt
        .connect(move |_| r.set(r.get() + 1));
    rebuilds
}

#[test]
fn test_refused_begin_never_touches_document() {
    let mut doc = Document::new(DocumentKind::Schematic);
    doc.insert_junction(Junction::new(1, Coord::ZERO));
    let mut host = host_for(doc);
    let before = host.core().document().entity_count();

    for id in [ToolId::DrawArc, ToolId::Fix, ToolId::Move, ToolId::MapSymbol] {
        assert_eq!(
            host.tool_begin(id, ToolArgs::default()),
            Err(ToolHostError::CannotBegin(id))
        );
    }

    assert!(!host.is_tool_active());
    assert!(host.imp().tool_name.is_empty());
    assert!(!host.core().is_dirty());
    assert_eq!(host.core().document().entity_count(), before);
}

#[test]
fn test_arc_cancel_in_every_state_restores_entity_count() {
    let steps = [click(0, 0), click(1_000, 0)];

    for reached in 0..=steps.len() {
        for cancel in [ToolEvent::Cancel, ToolEvent::Key(Key::Escape), ToolEvent::Press(MouseButton::Right)] {
            let mut doc = Document::new(DocumentKind::Board);
            doc.insert_junction(Junction::new(1, Coord::new(5_000, 5_000)));
            let mut host = host_for(doc);
            let before = host.core().document().entity_count();

            host.tool_begin(ToolId::DrawArc, ToolArgs::default())
                .expect("Bogen-Tool startet");
            for step in &steps[..reached] {
                host.tool_update(step.clone());
            }
            host.tool_update(ToolArgs::new(ToolEvent::Motion, Coord::new(300, 700)));
            let response = host.tool_update(ToolArgs::new(cancel, Coord::ZERO));

            assert!(response.is_end(), "Zustand {reached}: Abbruch beendet das Tool");
            assert_eq!(
                host.core().document().entity_count(),
                before,
                "Zustand {reached}: keine verwaisten Objekte"
            );
            assert!(!host.core().can_undo());
        }
    }
}

#[test]
fn test_arc_commit_creates_one_arc_and_at_most_two_junctions() {
    let mut host = host_for(Document::new(DocumentKind::Board));
    let rebuilds = count_rebuilds(&mut host);

    host.tool_begin(ToolId::DrawArc, ToolArgs::default())
        .expect("Bogen-Tool startet");
    host.tool_update(click(0, 0));
    host.tool_update(click(2_000, 0));
    let response = host.tool_update(click(1_000, 700));

    assert!(response.is_end());
    assert!(!host.is_tool_active());
    let doc = host.core().document();
    assert_eq!(doc.arc_count(), 1);
    assert_eq!(doc.junction_count(), 2);
    assert_eq!(doc.provisional_count(), 0);
    assert_eq!(rebuilds.get(), 1);
    assert_eq!(host.core().selection().len(), 1);
}

#[test]
fn test_arc_endpoints_on_existing_junctions_create_no_junction() {
    let mut doc = Document::new(DocumentKind::Board);
    doc.insert_junction(Junction::new(1, Coord::new(0, 0)));
    doc.insert_junction(Junction::new(2, Coord::new(2_000, 0)));
    let mut host = host_for(doc);

    host.tool_begin(ToolId::DrawArc, ToolArgs::default())
        .expect("Bogen-Tool startet");
    host.tool_update(click(0, 0));
    host.tool_update(click(2_000, 0));
    host.tool_update(click(1_000, -500));

    let doc = host.core().document();
    assert_eq!(doc.arc_count(), 1);
    assert_eq!(doc.junction_count(), 2);
    let arc = doc.arcs().next().expect("Bogen vorhanden");
    assert_eq!((arc.from, arc.to), (1, 2));
}

#[test]
fn test_horizontal_restriction_never_moves_vertically() {
    let mut helper = MoveHelper::new();
    helper.restrict.set_mode(RestrictMode::Horizontal);
    helper.move_init(Coord::new(-3_000, 12_000));

    let mut seed: i64 = 17;
    for _ in 0..500 {
        seed = (seed * 1_103_515_245 + 12_345) % 2_147_483_648;
        let cursor = Coord::new(seed % 100_000 - 50_000, (seed / 7) % 100_000 - 50_000);
        assert_eq!(helper.get_delta(cursor, Modifiers::default()).y, 0);
    }
}

#[test]
fn test_double_mirror_is_identity() {
    for o in Orientation::ALL {
        for reverse in [false, true] {
            let once = MoveHelper::transform_orientation(o, false, reverse);
            assert_eq!(MoveHelper::transform_orientation(once, false, reverse), o);
        }
    }
}

#[test]
fn test_fix_with_mixed_flags_commits_once() {
    let mut doc = Document::new(DocumentKind::Board);
    let mut fixed = BoardPackage::new(1, "R1", Coord::ZERO);
    fixed.fixed = true;
    doc.insert_package(fixed);
    doc.insert_package(BoardPackage::new(2, "R2", Coord::new(1_000, 0)));
    doc.insert_package(BoardPackage::new(3, "R3", Coord::new(2_000, 0)));
    let mut host = host_for(doc);
    let rebuilds = count_rebuilds(&mut host);

    host.set_selection(packages(&[1]));
    assert!(!host.available_tools().contains(&ToolId::Fix));
    host.set_selection(packages(&[1, 2, 3]));
    assert!(host.available_tools().contains(&ToolId::Fix));

    let response = host
        .tool_begin(ToolId::Fix, ToolArgs::default().with_selection(packages(&[1, 2, 3])))
        .expect("Fix startet");

    assert!(response.is_end());
    assert_eq!(rebuilds.get(), 1);
    assert!(host.core().document().packages().all(|p| p.fixed));
    assert!(!host.available_tools().contains(&ToolId::Fix));
}

#[test]
fn test_symbol_mapping_auto_selects_single_candidate() {
    let mut pool = Pool::new();
    pool.add_unit(1, "Resistor", &["1", "2"]);
    pool.add_symbol(10, "R", 1);
    pool.add_unit(2, "OpAmp", &["+", "-", "OUT"]);
    pool.add_symbol(20, "OpAmp-Dreieck", 2);
    pool.add_symbol(21, "OpAmp-Kasten", 2);
    let helper = MapSymbolHelper::new();

    assert_eq!(
        helper.get_symbol_for_unit(&pool, 1),
        Ok(SymbolSelection::Chosen {
            symbol: 10,
            auto_selected: true
        })
    );
    assert!(matches!(
        helper.get_symbol_for_unit(&pool, 2),
        Ok(SymbolSelection::Deferred { candidates }) if candidates == vec![20, 21]
    ));
}

#[test]
fn test_commit_without_changes_is_silent() {
    let mut host = host_for(Document::new(DocumentKind::Board));
    let rebuilds = count_rebuilds(&mut host);

    assert!(!host.core_mut().commit());
    assert!(!host.core_mut().commit());

    assert_eq!(rebuilds.get(), 0);
    assert!(!host.core().can_undo());
}

#[test]
fn test_undo_is_refused_while_tool_is_active() {
    let mut host = host_for(Document::new(DocumentKind::Board));
    host.tool_begin(ToolId::DrawArc, ToolArgs::default())
        .expect("Bogen-Tool startet");
    host.tool_update(click(0, 0));
    host.tool_update(click(2_000, 0));
    host.tool_update(click(1_000, 700));
    assert_eq!(host.core().document().arc_count(), 1);

    host.tool_begin(ToolId::DrawLine, ToolArgs::default())
        .expect("Linien-Tool startet");
    assert!(!host.undo());
    host.tool_cancel();

    assert!(host.undo());
    assert_eq!(host.core().document().arc_count(), 0);
    assert!(host.redo());
    assert_eq!(host.core().document().arc_count(), 1);
}

#[test]
fn test_polyline_finishes_on_return() {
    let mut host = host_for(Document::new(DocumentKind::Board));
    host.tool_begin(ToolId::DrawLine, ToolArgs::default())
        .expect("Linien-Tool startet");
    host.tool_update(click(0, 0));
    host.tool_update(click(1_000, 0));
    host.tool_update(click(1_000, 1_000));
    let response = host.tool_update(ToolArgs::new(ToolEvent::Key(Key::Return), Coord::ZERO));

    assert!(response.is_end());
    let doc = host.core().document();
    assert_eq!(doc.line_count(), 2);
    assert_eq!(doc.junction_count(), 3);
    assert_eq!(doc.provisional_count(), 0);
}

#[test]
fn test_move_drags_selection_and_undo_restores() {
    let mut doc = Document::new(DocumentKind::Board);
    doc.insert_package(BoardPackage::new(1, "U1", Coord::new(100, 100)));
    let mut host = host_for(doc);

    host.tool_begin(
        ToolId::Move,
        ToolArgs::new(ToolEvent::Start, Coord::ZERO).with_selection(packages(&[1])),
    )
    .expect("Verschieben startet");
    host.tool_update(ToolArgs::new(ToolEvent::Motion, Coord::new(400, 0)));
    host.tool_update(click(500, 0));

    let pos = |host: &ToolHost<HeadlessInterface>| {
        host.core()
            .document()
            .package(1)
            .expect("Package vorhanden")
            .position
    };
    assert_eq!(pos(&host), Coord::new(600, 100));
    assert!(host.undo());
    assert_eq!(pos(&host), Coord::new(100, 100));
}

#[test]
fn test_zero_move_leaves_history_untouched() {
    let mut doc = Document::new(DocumentKind::Board);
    doc.insert_package(BoardPackage::new(1, "U1", Coord::new(100, 100)));
    let mut host = host_for(doc);
    let rebuilds = count_rebuilds(&mut host);

    host.tool_begin(
        ToolId::Move,
        ToolArgs::new(ToolEvent::Start, Coord::ZERO).with_selection(packages(&[1])),
    )
    .expect("Verschieben startet");
    host.tool_update(ToolArgs::new(ToolEvent::Motion, Coord::ZERO));
    let response = host.tool_update(click(0, 0));

    assert!(response.is_end());
    assert_eq!(rebuilds.get(), 0);
    assert!(!host.core().can_undo());
    assert_eq!(
        host.core().document().package(1).expect("Package vorhanden").position,
        Coord::new(100, 100)
    );
}

#[test]
fn test_map_pin_places_unit_pins_in_one_step() {
    let mut pool = Pool::new();
    pool.add_unit(5, "Transistor", &["B", "C", "E"]);
    let options = EditorOptions::default();
    let core = DocumentController::new(Document::for_unit(5), Arc::new(pool), options.history_depth);
    let mut host = ToolHost::new(core, HeadlessInterface::from_options(&options), options);
    let rebuilds = count_rebuilds(&mut host);
    let grid = host.imp().grid_spacing as i64;

    assert!(host.available_tools().contains(&ToolId::MapPin));
    host.tool_begin(ToolId::MapPin, ToolArgs::default())
        .expect("Pin-Tool startet");
    host.tool_update(click(0, 0));
    host.tool_update(ToolArgs::new(ToolEvent::Key(Key::Char(' ')), Coord::ZERO));
    let response = host.tool_update(ToolArgs::new(ToolEvent::Key(Key::Char(' ')), Coord::ZERO));

    assert!(response.is_end());
    let doc = host.core().document();
    let positions: Vec<(String, Coord)> = doc
        .pins()
        .into_iter()
        .map(|p| (p.name.clone(), p.position))
        .collect();
    assert_eq!(
        positions,
        vec![
            ("B".to_string(), Coord::ZERO),
            ("C".to_string(), Coord::new(0, -grid)),
            ("E".to_string(), Coord::new(0, -2 * grid)),
        ]
    );
    assert_eq!(rebuilds.get(), 1);
    assert!(!host.available_tools().contains(&ToolId::MapPin));
    assert!(host.undo());
    assert_eq!(host.core().document().pin_count(), 0);
}
