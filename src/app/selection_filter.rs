//! Selektionsfilter: welche Objekt-Typen dürfen in die Selektion.

use super::document_controller::DocumentController;
use crate::core::{ObjectType, Selection};
use indexmap::IndexMap;

/// Pro Objekt-Typ ein Schalter. Enthält nur Typen, die das Dokument kennt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionFilter {
    types: IndexMap<ObjectType, bool>,
}

impl SelectionFilter {
    /// Alle vom Dokument unterstützten Typen, initial erlaubt.
    pub fn new(core: &DocumentController) -> Self {
        let types = ObjectType::ALL
            .into_iter()
            .filter(|kind| core.has_object_type(*kind))
            .map(|kind| (kind, true))
            .collect();
        Self { types }
    }

    /// Gefilterte Typen in Anzeige-Reihenfolge.
    pub fn types(&self) -> impl Iterator<Item = (ObjectType, bool)> + '_ {
        self.types.iter().map(|(k, v)| (*k, *v))
    }

    /// Setzt den Schalter eines Typs. Unbekannte Typen werden ignoriert.
    pub fn set(&mut self, kind: ObjectType, allowed: bool) {
        if let Some(flag) = self.types.get_mut(&kind) {
            *flag = allowed;
        }
    }

    /// Nur `kind` erlauben.
    pub fn select_only(&mut self, kind: ObjectType) {
        for (k, flag) in self.types.iter_mut() {
            *flag = *k == kind;
        }
    }

    pub fn reset(&mut self) {
        for flag in self.types.values_mut() {
            *flag = true;
        }
    }

    /// `true` wenn alle Typen erlaubt sind.
    pub fn is_reset(&self) -> bool {
        self.types.values().all(|flag| *flag)
    }

    pub fn allows(&self, kind: ObjectType) -> bool {
        self.types.get(&kind).copied().unwrap_or(false)
    }

    /// Entfernt alle nicht erlaubten Einträge, Reihenfolge bleibt erhalten.
    pub fn apply(&self, selection: &Selection) -> Selection {
        selection
            .iter()
            .filter(|r| self.allows(r.kind))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{selection_of, Document, DocumentKind, Pool, SelectableRef};
    use std::sync::Arc;

    fn filter(kind: DocumentKind) -> SelectionFilter {
        let core = DocumentController::new(Document::new(kind), Arc::new(Pool::new()), 10);
        SelectionFilter::new(&core)
    }

    #[test]
    fn lists_only_types_of_the_document() {
        let board = filter(DocumentKind::Board);
        let kinds: Vec<ObjectType> = board.types().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                ObjectType::Junction,
                ObjectType::Line,
                ObjectType::Arc,
                ObjectType::BoardPackage
            ]
        );
        assert!(!board.allows(ObjectType::SchematicSymbol));
    }

    #[test]
    fn select_only_then_reset() {
        let mut f = filter(DocumentKind::Board);
        f.select_only(ObjectType::Arc);
        assert!(f.allows(ObjectType::Arc));
        assert!(!f.allows(ObjectType::Line));
        assert!(!f.is_reset());

        f.reset();
        assert!(f.is_reset());
    }

    #[test]
    fn apply_keeps_order_of_allowed_entries() {
        let mut f = filter(DocumentKind::Board);
        f.set(ObjectType::Junction, false);
        let selection = selection_of([
            SelectableRef::new(ObjectType::Arc, 5),
            SelectableRef::new(ObjectType::Junction, 1),
            SelectableRef::new(ObjectType::Line, 3),
        ]);

        let filtered = f.apply(&selection);

        assert_eq!(
            filtered.into_iter().collect::<Vec<_>>(),
            vec![
                SelectableRef::new(ObjectType::Arc, 5),
                SelectableRef::new(ObjectType::Line, 3)
            ]
        );
    }
}
