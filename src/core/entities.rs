//! Entitäten des Dokument-Graphen.
//!
//! Verweise zwischen Entitäten sind reine IDs, die über das `Document`
//! aufgelöst werden. Kein Objekt hält ein anderes direkt.

use super::geometry::{Coord, Orientation};
use glam::DVec2;
use indexmap::IndexMap;

/// Gemeinsamer Punkt, an dem Linien und Bögen enden.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Eindeutige ID
    pub id: u64,
    /// Position in nm
    pub position: Coord,
    /// Während eines Tools erzeugt und noch nicht committet
    pub provisional: bool,
}

impl Junction {
    /// Erstellt eine neue (nicht-provisorische) Junction.
    pub fn new(id: u64, position: Coord) -> Self {
        Self {
            id,
            position,
            provisional: false,
        }
    }
}

/// Gerade Linie zwischen zwei Junctions.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: u64,
    /// Start-Junction
    pub from: u64,
    /// End-Junction
    pub to: u64,
    /// Linienbreite in nm
    pub width: u64,
    pub layer: i32,
    pub provisional: bool,
}

impl Line {
    /// Erstellt eine neue Linie.
    pub fn new(id: u64, from: u64, to: u64, width: u64, layer: i32) -> Self {
        Self {
            id,
            from,
            to,
            width,
            layer,
            provisional: false,
        }
    }
}

/// Kreisbogen von `from` nach `to` (gegen den Uhrzeigersinn) um `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub id: u64,
    /// Start-Junction
    pub from: u64,
    /// End-Junction
    pub to: u64,
    /// Mittelpunkt (keine Junction, nur Koordinate)
    pub center: Coord,
    /// Linienbreite in nm
    pub width: u64,
    pub layer: i32,
    pub provisional: bool,
}

impl Arc {
    /// Erstellt einen neuen Bogen.
    pub fn new(id: u64, from: u64, to: u64, center: Coord, width: u64, layer: i32) -> Self {
        Self {
            id,
            from,
            to,
            center,
            width,
            layer,
            provisional: false,
        }
    }

    /// Radius bezogen auf die Start-Position.
    pub fn radius(&self, from_pos: Coord) -> f64 {
        (from_pos - self.center).as_dvec2().length()
    }

    /// Start- und Endwinkel (Radiant) für die gegebenen Endpunkt-Positionen.
    pub fn angles(&self, from_pos: Coord, to_pos: Coord) -> (f64, f64) {
        let c = self.center.as_dvec2();
        let angle = |p: DVec2| {
            let d = p - c;
            d.y.atan2(d.x)
        };
        (angle(from_pos.as_dvec2()), angle(to_pos.as_dvec2()))
    }
}

/// Auf dem Board platziertes Package.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardPackage {
    pub id: u64,
    /// Bestückungsname (z.B. "R12")
    pub refdes: String,
    pub position: Coord,
    pub orientation: Orientation,
    /// Fixierte Packages werden von Move/Rotate/Mirror nicht verändert
    pub fixed: bool,
    pub provisional: bool,
}

impl BoardPackage {
    /// Erstellt ein neues, nicht fixiertes Package.
    pub fn new(id: u64, refdes: impl Into<String>, position: Coord) -> Self {
        Self {
            id,
            refdes: refdes.into(),
            position,
            orientation: Orientation::default(),
            fixed: false,
            provisional: false,
        }
    }
}

/// Pin im Symbol-Editor.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolPin {
    pub id: u64,
    pub name: String,
    pub position: Coord,
    pub orientation: Orientation,
    /// Pin-Länge in nm
    pub length: u64,
    pub provisional: bool,
}

impl SymbolPin {
    /// Erstellt einen neuen Pin.
    pub fn new(id: u64, name: impl Into<String>, position: Coord, orientation: Orientation) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            orientation,
            length: 2_540_000,
            provisional: false,
        }
    }
}

/// Gate eines logischen Bauteils. Referenziert eine Unit aus dem Pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub id: u64,
    /// Anzeigename (z.B. "A", "B", "PWR")
    pub name: String,
    /// Unit-ID im Pool
    pub unit: u64,
}

/// Logisches Bauteil im Schaltplan mit geordneten Gates.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: u64,
    pub refdes: String,
    pub gates: IndexMap<u64, Gate>,
    pub provisional: bool,
}

impl Component {
    /// Erstellt ein Bauteil ohne Gates.
    pub fn new(id: u64, refdes: impl Into<String>) -> Self {
        Self {
            id,
            refdes: refdes.into(),
            gates: IndexMap::new(),
            provisional: false,
        }
    }

    /// Fügt ein Gate hinzu (Builder-Stil für Tests und Demos).
    pub fn with_gate(mut self, id: u64, name: impl Into<String>, unit: u64) -> Self {
        self.gates.insert(
            id,
            Gate {
                id,
                name: name.into(),
                unit,
            },
        );
        self
    }
}

/// Sichtbare Symbol-Instanz eines Gates im Schaltplan.
#[derive(Debug, Clone, PartialEq)]
pub struct SchematicSymbol {
    pub id: u64,
    /// Bauteil-ID im Dokument
    pub component: u64,
    /// Gate-ID innerhalb des Bauteils
    pub gate: u64,
    /// Symbol-Definition im Pool
    pub symbol: u64,
    pub position: Coord,
    pub orientation: Orientation,
    pub provisional: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn arc_radius_and_angles() {
        let arc = Arc::new(1, 2, 3, Coord::new(0, 0), 150_000, 0);

        assert_relative_eq!(arc.radius(Coord::new(3_000, 4_000)), 5_000.0);
        let (start, end) = arc.angles(Coord::new(1_000, 0), Coord::new(0, 1_000));
        assert_relative_eq!(start, 0.0);
        assert_relative_eq!(end, FRAC_PI_2);
        let (_, back) = arc.angles(Coord::new(1_000, 0), Coord::new(-1_000, 0));
        assert_relative_eq!(back, PI);
    }

    #[test]
    fn component_keeps_gate_order() {
        let c = Component::new(1, "U1")
            .with_gate(30, "C", 100)
            .with_gate(10, "A", 100)
            .with_gate(20, "B", 100);
        let names: Vec<&str> = c.gates.values().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
