//! EDA Tool-Engine: Kommandozeilen-Host.
//!
//! Spielt eine kurze Bearbeitungs-Sitzung ohne Oberfläche ab: Packages
//! fixieren, einen Bogen zeichnen, Symbole und Pins platzieren und
//! rückgängig machen.

use std::sync::Arc;

use eda_tool_engine::app::{Key, MouseButton};
use eda_tool_engine::core::{BoardPackage, Component, Junction};
use eda_tool_engine::{
    selection_of, Coord, Document, DocumentController, DocumentKind, EditorOptions,
    HeadlessInterface, ImpInterface, ObjectType, Pool, SelectableRef, ToolArgs, ToolEvent,
    ToolHost, ToolId,
};

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("EDA Tool-Engine v{} startet...", env!("CARGO_PKG_VERSION"));

    // Optionen aus TOML laden (oder Standardwerte)
    let config_path = EditorOptions::config_path();
    let options = EditorOptions::load_from_file(&config_path);

    board_session(&options)?;
    schematic_session(&options)?;
    symbol_session(&options)?;
    Ok(())
}

fn demo_pool() -> Arc<Pool> {
    let mut pool = Pool::new();
    pool.add_unit(1, "Resistor", &["1", "2"]);
    pool.add_symbol(11, "R", 1);
    pool.add_unit(2, "OpAmp", &["+", "-", "OUT"]);
    pool.add_symbol(21, "OpAmp-Dreieck", 2);
    pool.add_symbol(22, "OpAmp-Kasten", 2);
    Arc::new(pool)
}

fn new_host(document: Document, options: &EditorOptions) -> ToolHost<HeadlessInterface> {
    let core = DocumentController::new(document, demo_pool(), options.history_depth);
    let mut host = ToolHost::new(
        core,
        HeadlessInterface::from_options(options),
        options.clone(),
    );
    host.core_mut()
        .signals
        .rebuilt
        .connect(|_| log::debug!("Dokument neu aufgebaut"));
    host
}

fn board_session(options: &EditorOptions) -> anyhow::Result<()> {
    let grid = options.grid_spacing as i64;
    let mut document = Document::new(DocumentKind::Board);
    document.insert_package(BoardPackage::new(1, "R1", Coord::new(0, 0)));
    document.insert_package(BoardPackage::new(2, "C1", Coord::new(4 * grid, 0)));
    document.insert_junction(Junction::new(3, Coord::new(0, 4 * grid)));
    let mut host = new_host(document, options);

    let packages = selection_of([
        SelectableRef::new(ObjectType::BoardPackage, 1),
        SelectableRef::new(ObjectType::BoardPackage, 2),
    ]);
    host.set_selection(packages.clone());
    log::info!("Verfügbare Tools: {:?}", host.available_tools());

    host.tool_begin(ToolId::Fix, ToolArgs::default().with_selection(packages.clone()))?;
    if let Err(err) = host.tool_begin(ToolId::Move, ToolArgs::default().with_selection(packages)) {
        log::info!("Erwartet abgelehnt: {}", err);
    }

    // Bogen von der bestehenden Junction zu einem neuen Punkt
    host.tool_begin(
        ToolId::DrawArc,
        ToolArgs::new(ToolEvent::Start, Coord::new(0, 4 * grid)),
    )?;
    host.tool_update(ToolArgs::new(
        ToolEvent::Press(MouseButton::Left),
        Coord::new(0, 4 * grid),
    ));
    host.imp_mut().set_no_update(true);
    for step in 1..=4 {
        host.tool_update(ToolArgs::new(
            ToolEvent::Motion,
            Coord::new(step * grid, 4 * grid),
        ));
    }
    host.imp_mut().set_no_update(false);
    host.tool_update(ToolArgs::new(
        ToolEvent::Press(MouseButton::Left),
        Coord::new(4 * grid, 4 * grid),
    ));
    host.tool_update(ToolArgs::new(
        ToolEvent::Press(MouseButton::Left),
        Coord::new(2 * grid, 2 * grid),
    ));

    let doc = host.core().document();
    log::info!(
        "Board: {} Bögen, {} Junctions, {} Redraws ({} unterdrückt)",
        doc.arc_count(),
        doc.junction_count(),
        host.imp().canvas_updates,
        host.imp().suppressed_updates
    );

    host.undo();
    log::info!(
        "Nach Undo: {} Bögen",
        host.core().document().arc_count()
    );
    Ok(())
}

fn schematic_session(options: &EditorOptions) -> anyhow::Result<()> {
    let mut document = Document::new(DocumentKind::Schematic);
    document.insert_component(Component::new(1, "R1").with_gate(10, "Main", 1));
    document.insert_component(
        Component::new(2, "U1")
            .with_gate(20, "A", 2)
            .with_gate(21, "B", 2),
    );
    let mut host = new_host(document, options);
    let grid = options.grid_spacing as i64;

    host.tool_begin(ToolId::MapSymbol, ToolArgs::default())?;
    let mut x = 0;
    while host.is_tool_active() {
        x += 4 * grid;
        host.tool_update(ToolArgs::new(ToolEvent::Key(Key::Char('1')), Coord::new(x, 0)));
        host.tool_update(ToolArgs::new(
            ToolEvent::Press(MouseButton::Left),
            Coord::new(x, 0),
        ));
    }

    log::info!(
        "Schaltplan: {} Symbole platziert ({:?})",
        host.core().document().schematic_symbol_count(),
        host.imp().placed_parts
    );
    Ok(())
}

fn symbol_session(options: &EditorOptions) -> anyhow::Result<()> {
    let mut host = new_host(Document::for_unit(2), options);
    let grid = options.grid_spacing as i64;

    // Erster Pin per Klick, die übrigen stapeln sich darunter
    host.tool_begin(ToolId::MapPin, ToolArgs::new(ToolEvent::Start, Coord::ZERO))?;
    host.tool_update(ToolArgs::new(
        ToolEvent::Press(MouseButton::Left),
        Coord::new(-2 * grid, grid),
    ));
    while host.is_tool_active() {
        host.tool_update(ToolArgs::new(ToolEvent::Key(Key::Char(' ')), Coord::ZERO));
    }

    for pin in host.core().document().pins() {
        log::info!("Pin {} bei {:?} ({:?})", pin.name, pin.position, pin.orientation);
    }
    Ok(())
}
