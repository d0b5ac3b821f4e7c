//! Schnittstelle der Tools zur Außenwelt (Toolbar, Canvas, Highlights).
//!
//! Alle Aufrufe sind Einweg-Benachrichtigungen; die Korrektheit eines Tools
//! hängt von keinem Rückgabewert ab, außer Work-Layer und Raster.

use crate::core::ObjectRef;
use crate::shared::EditorOptions;
use indexmap::IndexSet;

/// Menge hervorgehobener Objekte (z.B. Merge-Kandidat unter dem Cursor).
pub type Highlights = IndexSet<ObjectRef>;

/// Typisierte Tool-spezifische Rückmeldung an die UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolData {
    /// Ein Gate hat mehrere mögliche Symbole; die UI soll eine Wahl anbieten.
    SymbolCandidates {
        component: u64,
        gate: u64,
        /// (Symbol-ID, Name) in Anzeige-Reihenfolge
        candidates: Vec<(u64, String)>,
    },
    /// Aktueller Radius des Bogens in nm
    ArcRadius(f64),
}

/// Vom Host bereitgestellte Adapter-Schicht.
pub trait ImpInterface {
    /// Hinweistext: was wird als nächste Eingabe erwartet?
    fn tool_bar_set_tip(&mut self, text: &str);

    fn tool_bar_set_tool_name(&mut self, text: &str);

    /// Kurzzeitige Meldung (z.B. abgelehnte Eingabe).
    fn tool_bar_flash(&mut self, text: &str);

    fn set_work_layer(&mut self, layer: i32);

    fn get_work_layer(&self) -> i32;

    /// Rasterabstand in nm
    fn get_grid_spacing(&self) -> u64;

    /// Fordert ein Neuzeichnen an.
    fn canvas_update(&mut self);

    /// Übernimmt Änderungen an `get_highlights()` in die Darstellung.
    fn update_highlights(&mut self);

    fn get_highlights(&mut self) -> &mut Highlights;

    /// Unterdrückt `canvas_update` während vieler Einzel-Mutationen.
    fn set_no_update(&mut self, no_update: bool);

    fn tool_update_data(&mut self, data: ToolData);

    /// Ein Bauteil/Symbol wurde platziert.
    fn part_placed(&mut self, _id: u64) {}
}

/// Adapter ohne Oberfläche: zeichnet alle Benachrichtigungen auf.
///
/// Wird von Tests, Benchmarks und dem Kommandozeilen-Host verwendet.
#[derive(Debug, Clone, Default)]
pub struct HeadlessInterface {
    pub tip: String,
    pub tool_name: String,
    pub flashes: Vec<String>,
    pub work_layer: i32,
    pub grid_spacing: u64,
    /// Ausgeführte Neuzeichnungen
    pub canvas_updates: usize,
    /// Wegen `set_no_update(true)` unterdrückte Neuzeichnungen
    pub suppressed_updates: usize,
    pub no_update: bool,
    pub highlights: Highlights,
    pub highlight_updates: usize,
    pub data: Vec<ToolData>,
    pub placed_parts: Vec<u64>,
}

impl HeadlessInterface {
    /// Erstellt einen Adapter mit Raster und Work-Layer aus den Optionen.
    pub fn from_options(options: &EditorOptions) -> Self {
        Self {
            work_layer: options.default_work_layer,
            grid_spacing: options.grid_spacing,
            ..Self::default()
        }
    }

    /// Letzte Flash-Meldung, falls vorhanden.
    pub fn last_flash(&self) -> Option<&str> {
        self.flashes.last().map(String::as_str)
    }
}

impl ImpInterface for HeadlessInterface {
    fn tool_bar_set_tip(&mut self, text: &str) {
        self.tip = text.to_owned();
    }

    fn tool_bar_set_tool_name(&mut self, text: &str) {
        self.tool_name = text.to_owned();
    }

    fn tool_bar_flash(&mut self, text: &str) {
        log::debug!("Flash: {}", text);
        self.flashes.push(text.to_owned());
    }

    fn set_work_layer(&mut self, layer: i32) {
        self.work_layer = layer;
    }

    fn get_work_layer(&self) -> i32 {
        self.work_layer
    }

    fn get_grid_spacing(&self) -> u64 {
        self.grid_spacing
    }

    fn canvas_update(&mut self) {
        if self.no_update {
            self.suppressed_updates += 1;
        } else {
            self.canvas_updates += 1;
        }
    }

    fn update_highlights(&mut self) {
        self.highlight_updates += 1;
    }

    fn get_highlights(&mut self) -> &mut Highlights {
        &mut self.highlights
    }

    fn set_no_update(&mut self, no_update: bool) {
        self.no_update = no_update;
    }

    fn tool_update_data(&mut self, data: ToolData) {
        self.data.push(data);
    }

    fn part_placed(&mut self, id: u64) {
        self.placed_parts.push(id);
    }
}
