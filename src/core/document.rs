//! Der zentrale Dokument-Graph mit allen Entitäten und dem Junction-Index.

use super::entities::{Arc, BoardPackage, Component, Junction, Line, SchematicSymbol, SymbolPin};
use super::geometry::{distance_sq, Coord, Orientation};
use super::object_ref::{ObjectType, SelectableRef};
use super::pool::Unit;
use super::spatial::{JunctionIndex, SpatialMatch};
use std::collections::HashMap;


/// Art des bearbeiteten Dokuments. Bestimmt die erlaubten Objekt-Typen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Symbol-Editor (Pins + Grafik)
    Symbol,
    /// Schaltplan (Bauteile + Symbol-Instanzen)
    Schematic,
    /// Platine (Packages + Grafik)
    Board,
}

impl DocumentKind {
    /// Prüft, ob Dokumente dieser Art Objekte vom Typ `kind` enthalten können.
    pub fn has_object_type(self, kind: ObjectType) -> bool {
        use ObjectType as O;
        match self {
            DocumentKind::Symbol => matches!(kind, O::Junction | O::Line | O::Arc | O::SymbolPin),
            DocumentKind::Schematic => matches!(
                kind,
                O::Junction | O::Line | O::SchematicSymbol | O::Component
            ),
            DocumentKind::Board => {
                matches!(kind, O::Junction | O::Line | O::Arc | O::BoardPackage)
            }
        }
    }
}

/// Verletzung der Referenz-Integrität (siehe `Document::validate`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Objekt, das den ungültigen Verweis hält
    pub owner: SelectableRef,
    /// Beschreibung des fehlenden Ziels
    pub missing: String,
}

/// Vollständiger Dokument-Graph.
///
/// Entitäten, die über `create_*` angelegt werden, sind provisorisch, bis
/// `promote_provisional` aufgerufen wird. `insert_*` übernimmt Entitäten
/// unverändert (Laden, Aufbau in Tests).
#[derive(Debug, Clone)]
pub struct Document {
    /// Art des Dokuments
    pub kind: DocumentKind,
    /// Unit, die ein Symbol-Dokument darstellt
    pub unit: Option<u64>,
    junctions: HashMap<u64, Junction>,
    lines: HashMap<u64, Line>,
    arcs: HashMap<u64, Arc>,
    packages: HashMap<u64, BoardPackage>,
    pins: HashMap<u64, SymbolPin>,
    components: HashMap<u64, Component>,
    symbols: HashMap<u64, SchematicSymbol>,
    next_id: u64,
    /// Persistenter Spatial-Index für Junction-Abfragen
    junction_index: JunctionIndex,
}

impl Document {
    /// Erstellt ein leeres Dokument.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            unit: None,
            junctions: HashMap::new(),
            lines: HashMap::new(),
            arcs: HashMap::new(),
            packages: HashMap::new(),
            pins: HashMap::new(),
            components: HashMap::new(),
            symbols: HashMap::new(),
            next_id: 1,
            junction_index: JunctionIndex::empty(),
        }
    }

    /// Leeres Symbol-Dokument für eine Unit aus dem Pool.
    pub fn for_unit(unit: u64) -> Self {
        Self {
            unit: Some(unit),
            ..Self::new(DocumentKind::Symbol)
        }
    }

    /// Vergibt die nächste freie ID (monoton, dokumentweit eindeutig).
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn reserve_id(&mut self, id: u64) {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    /// Siehe [`DocumentKind::has_object_type`].
    pub fn has_object_type(&self, kind: ObjectType) -> bool {
        self.kind.has_object_type(kind)
    }

    // ── Junctions ───────────────────────────────────────────────────

    /// Legt eine provisorische Junction an.
    pub fn create_junction(&mut self, position: Coord) -> u64 {
        let id = self.next_id();
        let mut junction = Junction::new(id, position);
        junction.provisional = true;
        self.junctions.insert(id, junction);
        self.junction_index.insert(id, position);
        id
    }

    /// Übernimmt eine Junction unverändert.
    pub fn insert_junction(&mut self, junction: Junction) {
        self.reserve_id(junction.id);
        let (id, position) = (junction.id, junction.position);
        if let Some(old) = self.junctions.insert(id, junction) {
            self.junction_index.remove(id, old.position);
        }
        self.junction_index.insert(id, position);
    }

    /// Übernimmt viele Junctions und baut den Index nur einmal auf.
    pub fn insert_junctions(&mut self, junctions: impl IntoIterator<Item = Junction>) {
        for junction in junctions {
            self.reserve_id(junction.id);
            self.junctions.insert(junction.id, junction);
        }
        self.rebuild_junction_index();
    }

    pub fn junction(&self, id: u64) -> Option<&Junction> {
        self.junctions.get(&id)
    }

    /// Aktualisiert die Position einer Junction samt Index-Eintrag.
    pub fn set_junction_position(&mut self, id: u64, position: Coord) -> bool {
        let Some(junction) = self.junctions.get_mut(&id) else {
            return false;
        };
        if junction.position == position {
            return true;
        }
        let old = std::mem::replace(&mut junction.position, position);
        self.junction_index.relocate(id, old, position);
        true
    }

    /// Entfernt eine Junction inklusive aller Linien und Bögen, die sie nutzen.
    pub fn remove_junction(&mut self, id: u64) -> Option<Junction> {
        let removed = self.junctions.remove(&id);
        if let Some(junction) = &removed {
            self.lines.retain(|_, l| l.from != id && l.to != id);
            self.arcs.retain(|_, a| a.from != id && a.to != id);
            self.junction_index.remove(id, junction.position);
        }
        removed
    }

    /// Iterator über alle Junctions (read-only).
    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.values()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    /// Sucht eine bestehende, nicht-provisorische Junction im Abstand `tolerance`.
    ///
    /// Grundlage für das Zusammenführen nach Position beim Anlegen neuer
    /// Geometrie. Provisorische Junctions (z.B. der Cursor-Punkt des aktiven
    /// Tools) sind nie Kandidaten.
    pub fn find_junction_at(&self, position: Coord, tolerance: u64) -> Option<u64> {
        let tol_sq = (tolerance as i128) * (tolerance as i128);
        self.junction_index
            .within_radius(position, tolerance as f64 + 1.0)
            .into_iter()
            .filter_map(|m| self.junctions.get(&m.junction_id))
            .filter(|j| !j.provisional && distance_sq(j.position, position) <= tol_sq)
            .min_by_key(|j| (distance_sq(j.position, position), j.id))
            .map(|j| j.id)
    }

    /// Nächste Junction zur Position (beliebiger Abstand).
    pub fn nearest_junction(&self, position: Coord) -> Option<SpatialMatch> {
        self.junction_index.nearest(position)
    }

    fn rebuild_junction_index(&mut self) {
        self.junction_index = JunctionIndex::from_junctions(&self.junctions);
    }

    // ── Linien ──────────────────────────────────────────────────────

    /// Legt eine provisorische Linie an.
    pub fn create_line(&mut self, from: u64, to: u64, width: u64, layer: i32) -> u64 {
        let id = self.next_id();
        let mut line = Line::new(id, from, to, width, layer);
        line.provisional = true;
        self.lines.insert(id, line);
        id
    }

    pub fn insert_line(&mut self, line: Line) {
        self.reserve_id(line.id);
        self.lines.insert(line.id, line);
    }

    pub fn line(&self, id: u64) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn line_mut(&mut self, id: u64) -> Option<&mut Line> {
        self.lines.get_mut(&id)
    }

    pub fn remove_line(&mut self, id: u64) -> Option<Line> {
        self.lines.remove(&id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    // ── Bögen ───────────────────────────────────────────────────────

    /// Legt einen provisorischen Bogen an.
    pub fn create_arc(&mut self, from: u64, to: u64, center: Coord, width: u64, layer: i32) -> u64 {
        let id = self.next_id();
        let mut arc = Arc::new(id, from, to, center, width, layer);
        arc.provisional = true;
        self.arcs.insert(id, arc);
        id
    }

    pub fn insert_arc(&mut self, arc: Arc) {
        self.reserve_id(arc.id);
        self.arcs.insert(arc.id, arc);
    }

    pub fn arc(&self, id: u64) -> Option<&Arc> {
        self.arcs.get(&id)
    }

    pub fn arc_mut(&mut self, id: u64) -> Option<&mut Arc> {
        self.arcs.get_mut(&id)
    }

    pub fn remove_arc(&mut self, id: u64) -> Option<Arc> {
        self.arcs.remove(&id)
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.values()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    // ── Packages ────────────────────────────────────────────────────

    pub fn insert_package(&mut self, package: BoardPackage) {
        self.reserve_id(package.id);
        self.packages.insert(package.id, package);
    }

    pub fn package(&self, id: u64) -> Option<&BoardPackage> {
        self.packages.get(&id)
    }

    pub fn package_mut(&mut self, id: u64) -> Option<&mut BoardPackage> {
        self.packages.get_mut(&id)
    }

    pub fn packages(&self) -> impl Iterator<Item = &BoardPackage> {
        self.packages.values()
    }

    // ── Symbol-Pins ─────────────────────────────────────────────────

    pub fn insert_pin(&mut self, pin: SymbolPin) {
        self.reserve_id(pin.id);
        self.pins.insert(pin.id, pin);
    }

    pub fn pin(&self, id: u64) -> Option<&SymbolPin> {
        self.pins.get(&id)
    }

    pub fn pin_mut(&mut self, id: u64) -> Option<&mut SymbolPin> {
        self.pins.get_mut(&id)
    }

    /// Legt einen provisorischen Pin an.
    pub fn create_pin(&mut self, name: &str, position: Coord, orientation: Orientation) -> u64 {
        let id = self.next_id();
        let mut pin = SymbolPin::new(id, name, position, orientation);
        pin.provisional = true;
        self.pins.insert(id, pin);
        id
    }

    /// Alle Pins, sortiert nach ID.
    pub fn pins(&self) -> Vec<&SymbolPin> {
        let mut list: Vec<&SymbolPin> = self.pins.values().collect();
        list.sort_by_key(|p| p.id);
        list
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn find_pin(&self, name: &str) -> Option<u64> {
        self.pins.values().find(|p| p.name == name).map(|p| p.id)
    }

    /// Pin-Namen der Unit, für die es noch keinen Pin gibt, in Unit-Reihenfolge.
    pub fn unplaced_pins<'u>(&self, unit: &'u Unit) -> Vec<&'u str> {
        unit.pins
            .iter()
            .map(String::as_str)
            .filter(|name| self.find_pin(name).is_none())
            .collect()
    }

    // ── Bauteile und Symbol-Instanzen ──────────────────────────────

    pub fn insert_component(&mut self, component: Component) {
        self.reserve_id(component.id);
        for gate_id in component.gates.keys() {
            self.reserve_id(*gate_id);
        }
        self.components.insert(component.id, component);
    }

    pub fn component(&self, id: u64) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Alle Bauteile, sortiert nach ID.
    pub fn components(&self) -> Vec<&Component> {
        let mut list: Vec<&Component> = self.components.values().collect();
        list.sort_by_key(|c| c.id);
        list
    }

    /// Legt eine provisorische Symbol-Instanz für ein Gate an.
    pub fn create_schematic_symbol(
        &mut self,
        component: u64,
        gate: u64,
        symbol: u64,
        position: Coord,
    ) -> u64 {
        let id = self.next_id();
        self.symbols.insert(
            id,
            SchematicSymbol {
                id,
                component,
                gate,
                symbol,
                position,
                orientation: Default::default(),
                provisional: true,
            },
        );
        id
    }

    pub fn insert_schematic_symbol(&mut self, symbol: SchematicSymbol) {
        self.reserve_id(symbol.id);
        self.symbols.insert(symbol.id, symbol);
    }

    pub fn schematic_symbol(&self, id: u64) -> Option<&SchematicSymbol> {
        self.symbols.get(&id)
    }

    pub fn schematic_symbol_mut(&mut self, id: u64) -> Option<&mut SchematicSymbol> {
        self.symbols.get_mut(&id)
    }

    pub fn schematic_symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Findet die Symbol-Instanz, die ein Gate darstellt.
    pub fn find_symbol_for_gate(&self, component: u64, gate: u64) -> Option<u64> {
        self.symbols
            .values()
            .find(|s| s.component == component && s.gate == gate)
            .map(|s| s.id)
    }

    /// Gates ohne Symbol-Instanz als (Bauteil, Gate), in Bauteil- und Gate-Reihenfolge.
    pub fn unplaced_gates(&self) -> Vec<(u64, u64)> {
        self.components()
            .into_iter()
            .flat_map(|c| c.gates.keys().map(move |g| (c.id, *g)))
            .filter(|(c, g)| self.find_symbol_for_gate(*c, *g).is_none())
            .collect()
    }

    // ── Allgemein ───────────────────────────────────────────────────

    /// Prüft, ob die Referenz auf ein lebendes Objekt zeigt.
    pub fn contains(&self, r: SelectableRef) -> bool {
        match r.kind {
            ObjectType::Junction => self.junctions.contains_key(&r.id),
            ObjectType::Line => self.lines.contains_key(&r.id),
            ObjectType::Arc => self.arcs.contains_key(&r.id),
            ObjectType::BoardPackage => self.packages.contains_key(&r.id),
            ObjectType::SymbolPin => self.pins.contains_key(&r.id),
            ObjectType::SchematicSymbol => self.symbols.contains_key(&r.id),
            ObjectType::Component => self.components.contains_key(&r.id),
        }
    }

    /// Position eines punktförmigen Objekts (Linien/Bögen/Bauteile: `None`).
    pub fn position_of(&self, r: SelectableRef) -> Option<Coord> {
        match r.kind {
            ObjectType::Junction => self.junctions.get(&r.id).map(|j| j.position),
            ObjectType::BoardPackage => self.packages.get(&r.id).map(|p| p.position),
            ObjectType::SymbolPin => self.pins.get(&r.id).map(|p| p.position),
            ObjectType::SchematicSymbol => self.symbols.get(&r.id).map(|s| s.position),
            ObjectType::Line | ObjectType::Arc | ObjectType::Component => None,
        }
    }

    /// Gesamtzahl aller Entitäten.
    pub fn entity_count(&self) -> usize {
        self.junctions.len()
            + self.lines.len()
            + self.arcs.len()
            + self.packages.len()
            + self.pins.len()
            + self.components.len()
            + self.symbols.len()
    }

    /// Anzahl provisorischer Entitäten.
    pub fn provisional_count(&self) -> usize {
        self.junctions.values().filter(|e| e.provisional).count()
            + self.lines.values().filter(|e| e.provisional).count()
            + self.arcs.values().filter(|e| e.provisional).count()
            + self.packages.values().filter(|e| e.provisional).count()
            + self.pins.values().filter(|e| e.provisional).count()
            + self.components.values().filter(|e| e.provisional).count()
            + self.symbols.values().filter(|e| e.provisional).count()
    }

    /// Vergleicht den Inhalt zweier Dokumente.
    ///
    /// ID-Zähler und Spatial-Index zählen nicht zum Inhalt.
    pub fn same_content(&self, other: &Document) -> bool {
        self.kind == other.kind
            && self.unit == other.unit
            && self.junctions == other.junctions
            && self.lines == other.lines
            && self.arcs == other.arcs
            && self.packages == other.packages
            && self.pins == other.pins
            && self.components == other.components
            && self.symbols == other.symbols
    }

    /// Stuft alle provisorischen Entitäten zu permanenten hoch.
    /// Gibt die Anzahl hochgestufter Entitäten zurück.
    pub fn promote_provisional(&mut self) -> usize {
        fn promote<'a>(flags: impl Iterator<Item = &'a mut bool>) -> usize {
            let mut n = 0;
            for flag in flags.filter(|f| **f) {
                *flag = false;
                n += 1;
            }
            n
        }
        promote(self.junctions.values_mut().map(|e| &mut e.provisional))
            + promote(self.lines.values_mut().map(|e| &mut e.provisional))
            + promote(self.arcs.values_mut().map(|e| &mut e.provisional))
            + promote(self.packages.values_mut().map(|e| &mut e.provisional))
            + promote(self.pins.values_mut().map(|e| &mut e.provisional))
            + promote(self.components.values_mut().map(|e| &mut e.provisional))
            + promote(self.symbols.values_mut().map(|e| &mut e.provisional))
    }

    /// Sammelt alle Verweise, die nicht auf ein lebendes Objekt zeigen.
    pub fn validate(&self) -> Vec<DanglingReference> {
        let mut errors = Vec::new();
        for line in self.lines.values() {
            for junction in [line.from, line.to] {
                if !self.junctions.contains_key(&junction) {
                    errors.push(DanglingReference {
                        owner: SelectableRef::new(ObjectType::Line, line.id),
                        missing: format!("junction {junction}"),
                    });
                }
            }
        }
        for arc in self.arcs.values() {
            for junction in [arc.from, arc.to] {
                if !self.junctions.contains_key(&junction) {
                    errors.push(DanglingReference {
                        owner: SelectableRef::new(ObjectType::Arc, arc.id),
                        missing: format!("junction {junction}"),
                    });
                }
            }
        }
        for sym in self.symbols.values() {
            let owner = SelectableRef::new(ObjectType::SchematicSymbol, sym.id);
            match self.components.get(&sym.component) {
                None => errors.push(DanglingReference {
                    owner,
                    missing: format!("component {}", sym.component),
                }),
                Some(c) if !c.gates.contains_key(&sym.gate) => errors.push(DanglingReference {
                    owner,
                    missing: format!("gate {} of component {}", sym.gate, c.id),
                }),
                Some(_) => {}
            }
        }
        errors
    }
}
