//! Objekt-Typen und typisierte Referenzen für Selektion und Highlights.

use indexmap::IndexSet;

/// Art eines adressierbaren Dokument-Objekts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    /// Gemeinsamer Verbindungspunkt
    Junction,
    /// Gerade Linie zwischen zwei Junctions
    Line,
    /// Kreisbogen zwischen zwei Junctions
    Arc,
    /// Platziertes Package auf dem Board
    BoardPackage,
    /// Pin im Symbol-Editor
    SymbolPin,
    /// Symbol-Instanz eines Gates im Schaltplan
    SchematicSymbol,
    /// Logisches Bauteil im Schaltplan
    Component,
}

impl ObjectType {
    /// Alle Objekt-Typen in Anzeige-Reihenfolge.
    pub const ALL: [ObjectType; 7] = [
        ObjectType::Junction,
        ObjectType::Line,
        ObjectType::Arc,
        ObjectType::BoardPackage,
        ObjectType::SymbolPin,
        ObjectType::SchematicSymbol,
        ObjectType::Component,
    ];

    /// Plural-Anzeigename (Selektionsfilter).
    pub fn name_plural(self) -> &'static str {
        match self {
            ObjectType::Junction => "Junctions",
            ObjectType::Line => "Lines",
            ObjectType::Arc => "Arcs",
            ObjectType::BoardPackage => "Packages",
            ObjectType::SymbolPin => "Pins",
            ObjectType::SchematicSymbol => "Symbols",
            ObjectType::Component => "Components",
        }
    }
}

/// Selektierbares Objekt: (Typ, ID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectableRef {
    /// Objekt-Typ
    pub kind: ObjectType,
    /// ID innerhalb des Dokuments
    pub id: u64,
}

impl SelectableRef {
    /// Erstellt eine neue Referenz.
    pub fn new(kind: ObjectType, id: u64) -> Self {
        Self { kind, id }
    }
}

/// Objekt-Referenz für Highlights (gleiche Struktur wie `SelectableRef`).
pub type ObjectRef = SelectableRef;

/// Geordnete Selektion - Einfüge-Reihenfolge bleibt erhalten.
pub type Selection = IndexSet<SelectableRef>;

/// Baut eine Selektion aus einer Liste von Referenzen.
pub fn selection_of(items: impl IntoIterator<Item = SelectableRef>) -> Selection {
    items.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_keeps_insertion_order_and_deduplicates() {
        let a = SelectableRef::new(ObjectType::Junction, 7);
        let b = SelectableRef::new(ObjectType::Arc, 2);
        let sel = selection_of([a, b, a]);
        let items: Vec<_> = sel.iter().copied().collect();
        assert_eq!(items, vec![a, b]);
    }
}
