//! Tool-Host: startet Tools, reicht Ereignisse weiter und räumt nach dem Ende auf.

use super::document_controller::DocumentController;
use super::interface::ImpInterface;
use super::selection_filter::SelectionFilter;
use super::tools::{create_tool, Tool, ToolArgs, ToolContext, ToolEvent, ToolId, ToolResponse};
use crate::core::Selection;
use crate::shared::EditorOptions;
use thiserror::Error;

/// Gründe, aus denen der Host ein Tool nicht startet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToolHostError {
    #[error("es ist bereits ein Tool aktiv: {0:?}")]
    ToolActive(ToolId),
    #[error("{} ist für die aktuelle Selektion nicht verfügbar", .0.name())]
    CannotBegin(ToolId),
}

/// Orchestriert genau ein aktives Tool über einem Dokument.
pub struct ToolHost<I: ImpInterface> {
    core: DocumentController,
    imp: I,
    options: EditorOptions,
    active: Option<Box<dyn Tool>>,
    filter: Option<SelectionFilter>,
}

impl<I: ImpInterface> ToolHost<I> {
    pub fn new(core: DocumentController, imp: I, options: EditorOptions) -> Self {
        Self {
            core,
            imp,
            options,
            active: None,
            filter: None,
        }
    }

    pub fn core(&self) -> &DocumentController {
        &self.core
    }

    /// Mutabler Zugriff auf den Controller, z.B. für Signal-Abos.
    pub fn core_mut(&mut self) -> &mut DocumentController {
        &mut self.core
    }

    pub fn imp(&self) -> &I {
        &self.imp
    }

    pub fn imp_mut(&mut self) -> &mut I {
        &mut self.imp
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Übernimmt neue Optionen; ein aktives Tool bekommt sie sofort.
    pub fn set_options(&mut self, options: EditorOptions) {
        self.options = options;
        if let Some(tool) = self.active.as_mut() {
            let mut ctx = ToolContext::new(&mut self.core, &mut self.imp, &self.options);
            tool.apply_settings(&mut ctx);
        }
    }

    pub fn active_tool(&self) -> Option<ToolId> {
        self.active.as_ref().map(|t| t.id())
    }

    pub fn is_tool_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn selection_filter(&self) -> Option<&SelectionFilter> {
        self.filter.as_ref()
    }

    pub fn set_selection_filter(&mut self, filter: Option<SelectionFilter>) {
        self.filter = filter;
    }

    /// Setzt die Selektion (nach Anwendung des Selektionsfilters).
    pub fn set_selection(&mut self, selection: Selection) {
        let selection = self.filtered(&selection);
        self.core.set_selection(selection);
    }

    fn filtered(&self, selection: &Selection) -> Selection {
        match &self.filter {
            Some(filter) => filter.apply(selection),
            None => selection.clone(),
        }
    }

    /// Alle Tools, die für die aktuelle Selektion starten könnten.
    pub fn available_tools(&self) -> Vec<ToolId> {
        ToolId::ALL
            .into_iter()
            .filter(|id| create_tool(*id).can_begin(&self.core))
            .collect()
    }

    /// Startet ein Tool. `args.selection` wird zur Selektion des Dokuments.
    pub fn tool_begin(&mut self, id: ToolId, args: ToolArgs) -> Result<ToolResponse, ToolHostError> {
        self.begin_tool(create_tool(id), args)
    }

    fn begin_tool(
        &mut self,
        mut tool: Box<dyn Tool>,
        args: ToolArgs,
    ) -> Result<ToolResponse, ToolHostError> {
        let id = tool.id();
        if let Some(active) = self.active_tool() {
            log::warn!("{} nicht gestartet: {} ist aktiv", id.name(), active.name());
            return Err(ToolHostError::ToolActive(active));
        }

        let selection = self.filtered(&args.selection);
        self.core.set_selection(selection.clone());
        let args = ToolArgs { selection, ..args };

        if !tool.can_begin(&self.core) {
            log::debug!("{} kann nicht starten", id.name());
            return Err(ToolHostError::CannotBegin(id));
        }

        log::info!("Tool gestartet: {}", id.name());
        self.imp.tool_bar_set_tool_name(id.name());
        self.core.set_tool_active(true);

        let response = {
            let mut ctx = ToolContext::new(&mut self.core, &mut self.imp, &self.options);
            let response = tool.begin(&mut ctx, &args);
            if response == ToolResponse::Continue {
                tool.apply_settings(&mut ctx);
            }
            response
        };

        match response {
            ToolResponse::Continue => {
                self.active = Some(tool);
                self.core.signals.tool_changed.emit(&Some(id));
            }
            ToolResponse::End { next } => self.finish(id, next, &args, false),
        }
        self.imp.canvas_update();
        Ok(response)
    }

    /// Reicht ein Ereignis an das aktive Tool weiter.
    ///
    /// Ohne aktives Tool ist das Ergebnis immer `End`.
    pub fn tool_update(&mut self, args: ToolArgs) -> ToolResponse {
        let Some(tool) = self.active.as_mut() else {
            return ToolResponse::end();
        };
        let id = tool.id();
        let response = {
            let mut ctx = ToolContext::new(&mut self.core, &mut self.imp, &self.options);
            tool.update(&mut ctx, &args)
        };

        if let ToolResponse::End { next } = response {
            self.active = None;
            self.finish(id, next, &args, true);
        }
        self.imp.canvas_update();
        response
    }

    /// Bricht das aktive Tool ab (wie Escape).
    pub fn tool_cancel(&mut self) -> ToolResponse {
        self.tool_update(ToolArgs::new(ToolEvent::Cancel, Default::default()))
    }

    fn finish(&mut self, id: ToolId, next: Option<ToolId>, args: &ToolArgs, announced: bool) {
        self.core.set_tool_active(false);
        if self.core.is_dirty() {
            log::warn!("{} endete mit offenen Änderungen, verwerfe sie", id.name());
            self.core.rollback();
        }
        self.imp.get_highlights().clear();
        self.imp.update_highlights();
        self.imp.tool_bar_set_tip("");
        self.imp.tool_bar_set_tool_name("");
        if announced {
            self.core.signals.tool_changed.emit(&None);
        }
        log::info!("Tool beendet: {}", id.name());

        let Some(next) = next else {
            return;
        };
        let chained = ToolArgs::new(ToolEvent::Start, args.coords)
            .with_selection(self.core.selection().clone())
            .with_work_layer(args.work_layer)
            .with_modifiers(args.modifiers);
        if let Err(err) = self.tool_begin(next, chained) {
            log::debug!("Folge-Tool nicht gestartet: {}", err);
        }
    }

    pub fn undo(&mut self) -> bool {
        let done = self.core.undo();
        if done {
            self.imp.canvas_update();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.core.redo();
        if done {
            self.imp.canvas_update();
        }
        done
    }
}
