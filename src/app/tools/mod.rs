//! Trait-basiertes Tool-System für interaktive Dokument-Bearbeitung.
//!
//! Jedes Tool implementiert den `Tool`-Trait und wird über `create_tool`
//! aus seiner `ToolId` erzeugt. Der Host reicht Ereignisse als `ToolArgs`
//! an das aktive Tool weiter; das Tool antwortet mit einer `ToolResponse`.

/// Bogen-Tool: Start, Ende, Mittelpunkt.
pub mod draw_arc;
/// Linienzug-Tool mit Achsen-Beschränkung.
pub mod draw_line;
/// Fix/Unfix für Board-Packages (Einzelschritt).
pub mod fix;
/// Wiederverwendbare Teil-Verhalten (Bewegung, Beschränkung, Linienbreite, Symbol-Zuordnung).
pub mod helpers;
/// Platziert die fehlenden Pins einer Unit im Symbol-Editor.
pub mod map_pin;
/// Platziert Symbole für noch nicht platzierte Gates.
pub mod map_symbol;
/// Verschieben, Drehen und Spiegeln der Selektion.
pub mod move_tool;
/// Tool-Trait und Aufruf-Kontext.
mod tool_base;

pub use tool_base::{Tool, ToolContext};

use crate::core::{Coord, Document, ObjectRef, ObjectType, Selection};

// ── Gemeinsame Utilities ─────────────────────────────────────

/// Versucht, auf eine bestehende Junction innerhalb der Toleranz einzurasten.
///
/// Gibt `JunctionAnchor::Existing` zurück wenn eine (nicht-provisorische)
/// Junction in Reichweite ist, sonst `JunctionAnchor::NewPosition`.
pub fn snap_to_junction(pos: Coord, document: &Document, tolerance: u64) -> JunctionAnchor {
    if let Some(id) = document.find_junction_at(pos, tolerance) {
        if let Some(junction) = document.junction(id) {
            return JunctionAnchor::Existing(id, junction.position);
        }
    }
    JunctionAnchor::NewPosition(pos)
}

/// Löst einen bestätigten Punkt in eine Junction auf.
///
/// Liegt eine bestehende Junction innerhalb der Toleranz, wird sie verwendet
/// und die Cursor-Junction bleibt unverändert. Sonst wird die Cursor-Junction
/// selbst zum Punkt (`cursor_junction` ist danach `None`).
pub(crate) fn place_junction(
    ctx: &mut ToolContext<'_>,
    coords: Coord,
    cursor_junction: &mut Option<u64>,
) -> u64 {
    let tolerance = ctx.options.junction_merge_tolerance;
    match snap_to_junction(coords, ctx.core.document(), tolerance) {
        JunctionAnchor::Existing(id, _) => id,
        JunctionAnchor::NewPosition(pos) => {
            let doc = ctx.core.document_mut();
            match cursor_junction.take() {
                Some(temp) if doc.set_junction_position(temp, pos) => temp,
                _ => doc.create_junction(pos),
            }
        }
    }
}

/// Hebt den Einrast-Kandidaten unter dem Cursor hervor.
pub(crate) fn highlight_snap_candidate(ctx: &mut ToolContext<'_>, coords: Coord) {
    let candidate = ctx
        .core
        .document()
        .find_junction_at(coords, ctx.options.junction_merge_tolerance);
    let highlights = ctx.imp.get_highlights();
    highlights.clear();
    if let Some(id) = candidate {
        highlights.insert(ObjectRef::new(ObjectType::Junction, id));
    }
    ctx.imp.update_highlights();
}

// ── Typen ────────────────────────────────────────────────────────

/// Anker-Punkt: entweder eine bestehende Junction oder eine freie Position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionAnchor {
    /// Einrasten auf bestehende Junction
    Existing(u64, Coord),
    /// Freie Position (neue Junction wird erstellt)
    NewPosition(Coord),
}

impl JunctionAnchor {
    /// Gibt die Dokument-Position des Ankers zurück.
    pub fn position(&self) -> Coord {
        match self {
            JunctionAnchor::Existing(_, pos) => *pos,
            JunctionAnchor::NewPosition(pos) => *pos,
        }
    }
}

/// Geschlossene Menge aller Tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    DrawArc,
    DrawLine,
    Move,
    Rotate,
    Mirror,
    Fix,
    Unfix,
    MapSymbol,
    MapPin,
}

impl ToolId {
    /// Alle Tools in Menü-Reihenfolge.
    pub const ALL: [ToolId; 9] = [
        ToolId::DrawArc,
        ToolId::DrawLine,
        ToolId::Move,
        ToolId::Rotate,
        ToolId::Mirror,
        ToolId::Fix,
        ToolId::Unfix,
        ToolId::MapSymbol,
        ToolId::MapPin,
    ];

    /// Anzeigename für die Toolbar.
    pub fn name(self) -> &'static str {
        match self {
            ToolId::DrawArc => "Bogen zeichnen",
            ToolId::DrawLine => "Linie zeichnen",
            ToolId::Move => "Verschieben",
            ToolId::Rotate => "Drehen",
            ToolId::Mirror => "Spiegeln",
            ToolId::Fix => "Fixieren",
            ToolId::Unfix => "Fixierung lösen",
            ToolId::MapSymbol => "Symbole platzieren",
            ToolId::MapPin => "Pins platzieren",
        }
    }
}

/// Erzeugt eine frische Tool-Instanz.
pub fn create_tool(id: ToolId) -> Box<dyn Tool> {
    match id {
        ToolId::DrawArc => Box::new(draw_arc::DrawArcTool::new()),
        ToolId::DrawLine => Box::new(draw_line::DrawLineTool::new()),
        ToolId::Move => Box::new(move_tool::MoveTool::new(move_tool::MoveMode::Drag)),
        ToolId::Rotate => Box::new(move_tool::MoveTool::new(move_tool::MoveMode::Rotate)),
        ToolId::Mirror => Box::new(move_tool::MoveTool::new(move_tool::MoveMode::Mirror)),
        ToolId::Fix => Box::new(fix::FixTool::new(true)),
        ToolId::Unfix => Box::new(fix::FixTool::new(false)),
        ToolId::MapSymbol => Box::new(map_symbol::MapSymbolTool::new()),
        ToolId::MapPin => Box::new(map_pin::MapPinTool::new()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Tasten, die Tools auswerten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Return,
    Left,
    Right,
    Up,
    Down,
    Char(char),
}

/// Gehaltene Modifier-Tasten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Typisierte Eingabe aus der UI (Antwort auf `ToolData`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolInput {
    /// Vom Benutzer gewähltes Symbol (Pool-ID)
    SymbolChoice(u64),
}

/// Art des Ereignisses in `ToolArgs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolEvent {
    /// Tool wird gestartet (nur für `begin`)
    #[default]
    Start,
    /// Cursor wurde bewegt
    Motion,
    Press(MouseButton),
    Key(Key),
    /// Explizite Bestätigung durch den Host
    Commit,
    /// Expliziter Abbruch durch den Host
    Cancel,
    Data(ToolInput),
}

/// Unveränderliche Eingabe eines Tool-Schritts.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    pub event: ToolEvent,
    /// Cursor-Position in nm (vom Host bereits auf das Raster gerastet)
    pub coords: Coord,
    pub selection: Selection,
    pub work_layer: i32,
    pub modifiers: Modifiers,
}

impl ToolArgs {
    /// Erstellt Argumente ohne Selektion und ohne Modifier.
    pub fn new(event: ToolEvent, coords: Coord) -> Self {
        Self {
            event,
            coords,
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_work_layer(mut self, layer: i32) -> Self {
        self.work_layer = layer;
        self
    }

    /// Abbruch: `Cancel`, Escape oder Rechtsklick.
    pub fn is_cancel(&self) -> bool {
        matches!(
            self.event,
            ToolEvent::Cancel
                | ToolEvent::Key(Key::Escape)
                | ToolEvent::Press(MouseButton::Right)
        )
    }

    /// Bestätigung: `Commit` oder Return.
    pub fn is_commit(&self) -> bool {
        matches!(self.event, ToolEvent::Commit | ToolEvent::Key(Key::Return))
    }

    /// Linksklick: setzt den nächsten Punkt.
    pub fn is_click(&self) -> bool {
        self.event == ToolEvent::Press(MouseButton::Left)
    }
}

/// Antwort eines Tool-Schritts. Einziger Kanal für "fertig".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolResponse {
    /// Tool bleibt aktiv und wartet auf das nächste Ereignis
    Continue,
    /// Tool ist beendet; optional startet der Host direkt das nächste Tool
    End { next: Option<ToolId> },
}

impl ToolResponse {
    /// Weiter im aktuellen Zustand.
    pub fn next() -> Self {
        ToolResponse::Continue
    }

    pub fn end() -> Self {
        ToolResponse::End { next: None }
    }

    /// Beenden und anschließend `id` starten.
    pub fn end_and_start(id: ToolId) -> Self {
        ToolResponse::End { next: Some(id) }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, ToolResponse::End { .. })
    }
}
