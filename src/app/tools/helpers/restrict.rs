//! Achsen-Beschränkung für Verschiebungen (horizontal, vertikal, 45°).

use super::super::{Key, Modifiers};
use crate::core::Coord;

/// tan(22.5°) in Promille; Grenze zwischen Achse und Diagonale.
const TAN_22_5_PERMILLE: i128 = 414;

/// Aktive Beschränkung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestrictMode {
    #[default]
    Free,
    Horizontal,
    Vertical,
    /// Nächste der 8 Himmelsrichtungen
    Deg45,
}

impl RestrictMode {
    /// Nächster Modus in der Zyklus-Reihenfolge.
    pub fn next(self) -> Self {
        match self {
            RestrictMode::Free => RestrictMode::Horizontal,
            RestrictMode::Horizontal => RestrictMode::Vertical,
            RestrictMode::Vertical => RestrictMode::Deg45,
            RestrictMode::Deg45 => RestrictMode::Free,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RestrictMode::Free => "frei",
            RestrictMode::Horizontal => "horizontal",
            RestrictMode::Vertical => "vertikal",
            RestrictMode::Deg45 => "45°",
        }
    }
}

/// Tool-lokaler Beschränkungs-Zustand. Wird nicht persistiert.
#[derive(Debug, Clone, Default)]
pub struct RestrictHelper {
    mode: RestrictMode,
}

impl RestrictHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RestrictMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RestrictMode) {
        self.mode = mode;
    }

    /// Schaltet auf den nächsten Modus weiter.
    pub fn cycle(&mut self) {
        self.mode = self.mode.next();
        log::debug!("Beschränkung: {}", self.mode.name());
    }

    /// Verarbeitet die Umschalt-Taste `/`. Gibt `true` zurück, wenn die
    /// Taste verbraucht wurde.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if key == Key::Char('/') {
            self.cycle();
            true
        } else {
            false
        }
    }

    /// Wirksamer Modus: gehaltenes Shift erzwingt 45°.
    pub fn effective_mode(&self, modifiers: Modifiers) -> RestrictMode {
        if modifiers.shift {
            RestrictMode::Deg45
        } else {
            self.mode
        }
    }

    /// Beschränkt `delta` mit dem eingestellten Modus.
    pub fn restrict(&self, delta: Coord) -> Coord {
        restrict_delta(delta, self.mode)
    }

    /// Beschränkt `delta` unter Berücksichtigung der Modifier.
    pub fn restrict_with(&self, delta: Coord, modifiers: Modifiers) -> Coord {
        restrict_delta(delta, self.effective_mode(modifiers))
    }

    /// Text für die Tool-Tipps.
    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }
}

/// Projiziert `delta` auf die Richtung des Modus.
pub fn restrict_delta(delta: Coord, mode: RestrictMode) -> Coord {
    match mode {
        RestrictMode::Free => delta,
        RestrictMode::Horizontal => Coord::new(delta.x, 0),
        RestrictMode::Vertical => Coord::new(0, delta.y),
        RestrictMode::Deg45 => {
            let ax = delta.x.unsigned_abs() as i128;
            let ay = delta.y.unsigned_abs() as i128;
            if ay * 1000 <= ax * TAN_22_5_PERMILLE {
                Coord::new(delta.x, 0)
            } else if ax * 1000 <= ay * TAN_22_5_PERMILLE {
                Coord::new(0, delta.y)
            } else {
                let m = ((ax + ay) / 2) as i64;
                Coord::new(m * delta.x.signum(), m * delta.y.signum())
            }
        }
    }
}
