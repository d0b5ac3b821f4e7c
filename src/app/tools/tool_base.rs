//! Tool-Trait: Schnittstelle für alle interaktiven Werkzeuge.

use super::{ToolArgs, ToolId, ToolResponse};
use crate::app::document_controller::DocumentController;
use crate::app::interface::ImpInterface;
use crate::shared::EditorOptions;

/// Alles, was ein Tool während eines Aufrufs anfassen darf.
pub struct ToolContext<'a> {
    pub core: &'a mut DocumentController,
    pub imp: &'a mut dyn ImpInterface,
    pub options: &'a EditorOptions,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        core: &'a mut DocumentController,
        imp: &'a mut dyn ImpInterface,
        options: &'a EditorOptions,
    ) -> Self {
        Self { core, imp, options }
    }

    /// Commit und Ende in einem Schritt.
    pub fn commit_and_end(&mut self) -> ToolResponse {
        self.core.commit();
        ToolResponse::end()
    }

    /// Verwirft alle provisorischen Mutationen und beendet das Tool.
    pub fn cancel(&mut self) -> ToolResponse {
        self.core.rollback();
        self.imp.get_highlights().clear();
        self.imp.update_highlights();
        ToolResponse::end()
    }
}

/// Zustandsautomat eines Werkzeugs.
///
/// Der Host ruft `can_begin` vor `begin` auf und startet das Tool nur, wenn
/// es `true` liefert. Ein Tool darf nach einer `End`-Antwort keine
/// provisorischen Entitäten hinterlassen: entweder `commit()` oder
/// `rollback()` vor dem Ende.
pub trait Tool {
    fn id(&self) -> ToolId;

    /// Reine Abfrage ohne Seiteneffekte: ist das Tool für die aktuelle
    /// Selektion sinnvoll?
    fn can_begin(&self, core: &DocumentController) -> bool;

    /// Einmaliger Start. Einzelschritt-Tools dürfen direkt `End` liefern.
    fn begin(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse;

    /// Jedes weitere Ereignis, solange das Tool aktiv ist.
    fn update(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse;

    /// Übernimmt Editor-Defaults (z.B. Linienbreite). Läuft direkt nach
    /// `begin`, sofern das Tool danach noch aktiv ist.
    fn apply_settings(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// Einzelschritt-Tool, das ausschließlich auf der Selektion arbeitet.
    fn is_specific(&self) -> bool {
        false
    }
}
