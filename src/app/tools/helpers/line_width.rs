//! Standard-Linienbreite für neu gezeichnete Linien und Bögen.

use super::super::Key;
use crate::core::Document;
use crate::shared::{EditorOptions, DEFAULT_LINE_WIDTH};

/// Linienbreite, die ein Zeichen-Tool an neue Geometrie vergibt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWidthSetting {
    width: u64,
}

impl Default for LineWidthSetting {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl LineWidthSetting {
    pub fn new(width: u64) -> Self {
        Self { width }
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    pub fn set_width(&mut self, width: u64) {
        self.width = width;
    }

    /// Übernimmt die Breite aus den Editor-Optionen.
    pub fn apply_settings(&mut self, options: &EditorOptions) {
        self.width = options.default_line_width;
    }

    /// Schreibt die Breite auf eine Linie. `false` wenn die Linie fehlt.
    pub fn apply_to_line(&self, document: &mut Document, line: u64) -> bool {
        match document.line_mut(line) {
            Some(l) => {
                l.width = self.width;
                true
            }
            None => false,
        }
    }

    /// Schreibt die Breite auf einen Bogen. `false` wenn der Bogen fehlt.
    pub fn apply_to_arc(&self, document: &mut Document, arc: u64) -> bool {
        match document.arc_mut(arc) {
            Some(a) => {
                a.width = self.width;
                true
            }
            None => false,
        }
    }

    /// `+`/`-` ändern die Breite um einen Rasterschritt (nie unter 0).
    pub fn handle_key(&mut self, key: Key, grid_spacing: u64) -> bool {
        match key {
            Key::Char('+') => {
                self.width = self.width.saturating_add(grid_spacing);
            }
            Key::Char('-') => {
                self.width = self.width.saturating_sub(grid_spacing);
            }
            _ => return false,
        }
        log::debug!("Linienbreite: {} nm", self.width);
        true
    }

    /// Tipp-Zusatz für die Toolbar.
    pub fn tip(&self) -> String {
        format!("Breite {:.3} mm (+/-)", self.width as f64 / 1_000_000.0)
    }
}
