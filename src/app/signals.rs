//! Typisierte Benachrichtigungs-Kanäle (Publish/Subscribe) des Controllers.
//!
//! Beobachter (UI, Interface-Adapter) registrieren Closures und erhalten eine
//! `SubscriptionId`, mit der sie sich wieder abmelden können.

use super::tools::ToolId;

/// Handle einer Anmeldung an einem `Signal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ein einzelner Benachrichtigungs-Kanal mit Payload `T`.
pub struct Signal<T> {
    handlers: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    /// Erstellt einen Kanal ohne Abonnenten.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    /// Meldet einen Handler an.
    pub fn connect(&mut self, handler: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Meldet einen Handler ab. Gibt `false` zurück, wenn die ID unbekannt ist.
    pub fn disconnect(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() < before
    }

    /// Benachrichtigt alle Handler in Anmelde-Reihenfolge.
    pub fn emit(&mut self, payload: &T) {
        for (_, handler) in &mut self.handlers {
            handler(payload);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .finish()
    }
}

/// Alle Kanäle, die der Dokument-Controller anbietet.
#[derive(Debug, Default)]
pub struct CoreSignals {
    /// Dokument wurde nach Commit/Undo/Redo neu aufgebaut
    pub rebuilt: Signal<()>,
    /// Aktives Tool hat gewechselt (`None` = kein Tool aktiv)
    pub tool_changed: Signal<Option<ToolId>>,
    /// Vor dem Speichern: Beobachter schreiben UI-Zustand ins Dokument
    pub save: Signal<()>,
}
