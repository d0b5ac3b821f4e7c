//! Dokument-Controller: einzige Instanz, die Mutationen dauerhaft macht.
//!
//! Hält das Arbeitsdokument und den zuletzt committeten Stand als
//! `Arc<Document>`. Tools mutieren nur das Arbeitsdokument; `commit()` macht
//! den Stand dauerhaft, `rollback()` verwirft ihn.

use super::history::{EditHistory, Snapshot};
use super::signals::CoreSignals;
use crate::core::{Document, ObjectType, Pool, Selection};
use std::sync::Arc;

/// Transaktionaler Zugriff auf Dokument, Selektion und Verlauf.
#[derive(Debug)]
pub struct DocumentController {
    document: Arc<Document>,
    committed: Arc<Document>,
    selection: Selection,
    committed_selection: Selection,
    pool: Arc<Pool>,
    history: EditHistory,
    dirty: bool,
    tool_active: bool,
    needs_save: bool,
    /// Benachrichtigungs-Kanäle für Beobachter
    pub signals: CoreSignals,
}

impl DocumentController {
    /// Erstellt einen Controller für ein geladenes Dokument.
    pub fn new(document: Document, pool: Arc<Pool>, history_depth: usize) -> Self {
        let document = Arc::new(document);
        Self {
            committed: Arc::clone(&document),
            document,
            selection: Selection::new(),
            committed_selection: Selection::new(),
            pool,
            history: EditHistory::new_with_capacity(history_depth),
            dirty: false,
            tool_active: false,
            needs_save: false,
            signals: CoreSignals::default(),
        }
    }

    /// Read-only Zugriff auf das Arbeitsdokument.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Zuletzt committeter Stand.
    pub fn committed_document(&self) -> &Document {
        &self.committed
    }

    /// Mutabler Zugriff auf das Arbeitsdokument (CoW: klont nur wenn nötig).
    ///
    /// Jeder Zugriff markiert den Controller als "dirty"; die Änderungen sind
    /// provisorisch bis zum nächsten `commit()`. Aufrufer holen sich den
    /// Zugriff erst, wenn sie wirklich etwas ändern.
    pub fn document_mut(&mut self) -> &mut Document {
        self.dirty = true;
        Arc::make_mut(&mut self.document)
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Geteilter Pool-Handle, z.B. wenn parallel `document_mut()` gebraucht wird.
    pub fn pool_handle(&self) -> Arc<Pool> {
        Arc::clone(&self.pool)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Gibt `true` zurück, wenn seit dem letzten Commit mutabel zugegriffen wurde.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Siehe [`Document::has_object_type`].
    pub fn has_object_type(&self, kind: ObjectType) -> bool {
        self.document.has_object_type(kind)
    }

    /// Macht alle provisorischen Mutationen dauerhaft.
    ///
    /// Ohne anstehende Mutationen passiert nichts (kein Rebuild, Rückgabe
    /// `false`). Das gilt auch, wenn das Arbeitsdokument inhaltlich wieder dem
    /// committeten Stand entspricht. Sonst werden provisorische Entitäten
    /// hochgestuft, der vorige Stand landet im Undo-Verlauf und `rebuilt`
    /// wird gesendet.
    pub fn commit(&mut self) -> bool {
        if !self.dirty {
            log::debug!("Commit ohne Änderungen - nichts zu tun");
            return false;
        }
        if Arc::ptr_eq(&self.document, &self.committed)
            || self.document.same_content(&self.committed)
        {
            log::debug!("Commit ohne inhaltliche Änderung - nichts zu tun");
            self.document = Arc::clone(&self.committed);
            self.dirty = false;
            return false;
        }

        let doc = Arc::make_mut(&mut self.document);
        let promoted = doc.promote_provisional();
        let violations = doc.validate();
        if !violations.is_empty() {
            log::error!(
                "Commit verweigert: {} ungültige Verweise ({:?})",
                violations.len(),
                violations
            );
            debug_assert!(violations.is_empty(), "ungültige Verweise: {violations:?}");
            self.rollback();
            return false;
        }

        self.history
            .record_snapshot(Snapshot::new(&self.committed, &self.committed_selection));
        self.committed = Arc::clone(&self.document);
        self.committed_selection = self.selection.clone();
        self.dirty = false;
        self.needs_save = true;

        log::info!(
            "Commit: {} Entitäten, {} neu übernommen",
            self.document.entity_count(),
            promoted
        );
        self.signals.rebuilt.emit(&());
        true
    }

    /// Verwirft alle provisorischen Mutationen. Idempotent.
    ///
    /// Selektions-Einträge, die danach ins Leere zeigen, werden entfernt.
    pub fn rollback(&mut self) {
        if self.dirty {
            log::debug!("Rollback auf letzten Commit");
        }
        self.document = Arc::clone(&self.committed);
        self.dirty = false;
        let doc = &self.document;
        self.selection.retain(|r| doc.contains(*r));
    }

    /// Wird vom Host gesetzt, solange ein Tool aktiv ist.
    pub(crate) fn set_tool_active(&mut self, active: bool) {
        self.tool_active = active;
    }

    pub fn tool_is_active(&self) -> bool {
        self.tool_active
    }

    pub fn can_undo(&self) -> bool {
        !self.tool_active && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.tool_active && self.history.can_redo()
    }

    /// Stellt den vorigen committeten Stand wieder her.
    pub fn undo(&mut self) -> bool {
        if self.tool_active {
            log::warn!("Undo während aktivem Tool ignoriert");
            return false;
        }
        let current = Snapshot::new(&self.committed, &self.committed_selection);
        let Some(prev) = self.history.pop_undo_with_current(current) else {
            log::debug!("Undo: nichts zu tun");
            return false;
        };
        self.apply_snapshot(prev);
        log::info!("Undo ausgeführt");
        true
    }

    /// Stellt einen rückgängig gemachten Stand wieder her.
    pub fn redo(&mut self) -> bool {
        if self.tool_active {
            log::warn!("Redo während aktivem Tool ignoriert");
            return false;
        }
        let current = Snapshot::new(&self.committed, &self.committed_selection);
        let Some(next) = self.history.pop_redo_with_current(current) else {
            log::debug!("Redo: nichts zu tun");
            return false;
        };
        self.apply_snapshot(next);
        log::info!("Redo ausgeführt");
        true
    }

    fn apply_snapshot(&mut self, snap: Snapshot) {
        self.document = Arc::clone(&snap.document);
        self.committed = snap.document;
        self.selection = snap.selection.clone();
        self.committed_selection = snap.selection;
        self.dirty = false;
        self.needs_save = true;
        self.signals.rebuilt.emit(&());
    }

    /// Gibt `true` zurück, wenn seit dem letzten Speichern committet wurde.
    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    /// Fordert Beobachter auf, ihren Zustand ins Dokument zu schreiben.
    ///
    /// Das eigentliche Serialisieren übernimmt der Aufrufer.
    pub fn request_save(&mut self) {
        self.signals.save.emit(&());
        self.needs_save = false;
        log::info!("Speichern angefordert");
    }
}
