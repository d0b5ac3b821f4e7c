//! Verschieben, Drehen und Spiegeln einer Objekt-Menge.
//!
//! Linien und Bögen werden auf ihre Junctions abgebildet, damit jede
//! Junction genau einmal bewegt wird, auch wenn mehrere selektierte
//! Objekte sie teilen.

use super::restrict::RestrictHelper;
use super::super::Modifiers;
use crate::core::geometry::{mirror_x, rotate_ccw};
use crate::core::{Coord, Document, ObjectType, Orientation, Selection};
use indexmap::IndexSet;

/// Tool-lokaler Bewegungs-Zustand.
#[derive(Debug, Clone, Default)]
pub struct MoveHelper {
    /// Achsen-Beschränkung für `get_delta`
    pub restrict: RestrictHelper,
    origin: Coord,
    /// Bereits angewendete Gesamtverschiebung seit `move_init`
    last: Coord,
    junctions: IndexSet<u64>,
    arcs: IndexSet<u64>,
    packages: IndexSet<u64>,
    pins: IndexSet<u64>,
    symbols: IndexSet<u64>,
}

impl MoveHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merkt sich den Cursor als Ursprung einer Bewegung.
    pub fn move_init(&mut self, origin: Coord) {
        self.origin = origin;
        self.last = Coord::ZERO;
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Übernimmt die zu bewegenden Objekte aus der Selektion.
    ///
    /// Fixierte Packages werden übersprungen. Gibt die Anzahl
    /// verfolgter Einträge zurück.
    pub fn track_selection(&mut self, document: &Document, selection: &Selection) -> usize {
        self.junctions.clear();
        self.arcs.clear();
        self.packages.clear();
        self.pins.clear();
        self.symbols.clear();

        for r in selection {
            match r.kind {
                ObjectType::Junction => {
                    if document.junction(r.id).is_some() {
                        self.junctions.insert(r.id);
                    }
                }
                ObjectType::Line => {
                    if let Some(line) = document.line(r.id) {
                        self.junctions.insert(line.from);
                        self.junctions.insert(line.to);
                    }
                }
                ObjectType::Arc => {
                    if let Some(arc) = document.arc(r.id) {
                        self.junctions.insert(arc.from);
                        self.junctions.insert(arc.to);
                        self.arcs.insert(r.id);
                    }
                }
                ObjectType::BoardPackage => match document.package(r.id) {
                    Some(pkg) if pkg.fixed => {
                        log::debug!("Package {} ist fixiert, wird nicht bewegt", pkg.refdes);
                    }
                    Some(_) => {
                        self.packages.insert(r.id);
                    }
                    None => {}
                },
                ObjectType::SymbolPin => {
                    if document.pin(r.id).is_some() {
                        self.pins.insert(r.id);
                    }
                }
                ObjectType::SchematicSymbol => {
                    if document.schematic_symbol(r.id).is_some() {
                        self.symbols.insert(r.id);
                    }
                }
                ObjectType::Component => {}
            }
        }
        self.tracked_count()
    }

    pub fn tracked_count(&self) -> usize {
        self.junctions.len() + self.packages.len() + self.pins.len() + self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked_count() == 0
    }

    /// Mitte der Bounding-Box aller verfolgten Punkt-Positionen.
    pub fn tracked_center(&self, document: &Document) -> Option<Coord> {
        let positions = self
            .junctions
            .iter()
            .filter_map(|id| document.junction(*id).map(|j| j.position))
            .chain(
                self.packages
                    .iter()
                    .filter_map(|id| document.package(*id).map(|p| p.position)),
            )
            .chain(
                self.pins
                    .iter()
                    .filter_map(|id| document.pin(*id).map(|p| p.position)),
            )
            .chain(
                self.symbols
                    .iter()
                    .filter_map(|id| document.schematic_symbol(*id).map(|s| s.position)),
            );

        let mut bounds: Option<(Coord, Coord)> = None;
        for p in positions {
            bounds = Some(match bounds {
                None => (p, p),
                Some((min, max)) => (min.min(p), max.max(p)),
            });
        }
        bounds.map(|(min, max)| (min + max) / 2)
    }

    /// Cursor minus Ursprung, nach Achsen-Beschränkung.
    pub fn get_delta(&self, cursor: Coord, modifiers: Modifiers) -> Coord {
        self.restrict.restrict_with(cursor - self.origin, modifiers)
    }

    /// `true`, wenn `move_do(delta)` tatsächlich etwas verschieben würde.
    pub fn would_move(&self, delta: Coord) -> bool {
        delta != self.last && !self.is_empty()
    }

    /// Setzt die Gesamtverschiebung auf `delta` und wendet nur die
    /// Differenz zum vorigen Aufruf an. Gibt diese Differenz zurück.
    pub fn move_do(&mut self, document: &mut Document, delta: Coord) -> Coord {
        let inc = delta - self.last;
        if inc != Coord::ZERO {
            self.translate(document, inc);
            self.last = delta;
        }
        inc
    }

    /// `move_do` mit dem Delta aus der Cursor-Position.
    pub fn move_do_cursor(
        &mut self,
        document: &mut Document,
        cursor: Coord,
        modifiers: Modifiers,
    ) -> Coord {
        let delta = self.get_delta(cursor, modifiers);
        self.move_do(document, delta)
    }

    fn translate(&self, document: &mut Document, inc: Coord) {
        for id in &self.junctions {
            if let Some(pos) = document.junction(*id).map(|j| j.position) {
                document.set_junction_position(*id, pos + inc);
            }
        }
        for id in &self.arcs {
            if let Some(arc) = document.arc_mut(*id) {
                arc.center += inc;
            }
        }
        for id in &self.packages {
            if let Some(pkg) = document.package_mut(*id) {
                pkg.position += inc;
            }
        }
        for id in &self.pins {
            if let Some(pin) = document.pin_mut(*id) {
                pin.position += inc;
            }
        }
        for id in &self.symbols {
            if let Some(sym) = document.schematic_symbol_mut(*id) {
                sym.position += inc;
            }
        }
    }

    /// Dreht (90° gegen den Uhrzeigersinn) oder spiegelt (an der Vertikalen
    /// durch `center`) alle verfolgten Objekte.
    pub fn move_mirror_or_rotate(&mut self, document: &mut Document, center: Coord, rotate: bool) {
        let transform = |p: Coord| {
            if rotate {
                rotate_ccw(p, center)
            } else {
                mirror_x(p, center)
            }
        };

        for id in &self.junctions {
            if let Some(pos) = document.junction(*id).map(|j| j.position) {
                document.set_junction_position(*id, transform(pos));
            }
        }
        for id in &self.arcs {
            if let Some(arc) = document.arc_mut(*id) {
                arc.center = transform(arc.center);
                if !rotate {
                    // Spiegeln kehrt den Umlaufsinn um
                    std::mem::swap(&mut arc.from, &mut arc.to);
                }
            }
        }
        for id in &self.packages {
            if let Some(pkg) = document.package_mut(*id) {
                pkg.position = transform(pkg.position);
                pkg.orientation = Self::transform_orientation(pkg.orientation, rotate, false);
            }
        }
        for id in &self.pins {
            if let Some(pin) = document.pin_mut(*id) {
                pin.position = transform(pin.position);
                pin.orientation = Self::transform_orientation(pin.orientation, rotate, false);
            }
        }
        for id in &self.symbols {
            if let Some(sym) = document.schematic_symbol_mut(*id) {
                sym.position = transform(sym.position);
                sym.orientation = Self::transform_orientation(sym.orientation, rotate, false);
            }
        }
    }

    /// Transformiert eine diskrete Orientierung.
    ///
    /// - `rotate`: 90° gegen den Uhrzeigersinn, mit `reverse` im Uhrzeigersinn
    /// - sonst Spiegeln: links/rechts, mit `reverse` oben/unten
    pub fn transform_orientation(orientation: Orientation, rotate: bool, reverse: bool) -> Orientation {
        use Orientation::{Down, Left, Right, Up};
        match (rotate, reverse) {
            (true, false) => match orientation {
                Up => Left,
                Left => Down,
                Down => Right,
                Right => Up,
            },
            (true, true) => match orientation {
                Up => Right,
                Right => Down,
                Down => Left,
                Left => Up,
            },
            (false, false) => match orientation {
                Left => Right,
                Right => Left,
                other => other,
            },
            (false, true) => match orientation {
                Up => Down,
                Down => Up,
                other => other,
            },
        }
    }
}
