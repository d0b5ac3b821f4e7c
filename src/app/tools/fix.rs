//! Fixieren / Lösen von Board-Packages.
//!
//! Einzelschritt-Tool: `begin` setzt das Flag auf allen selektierten
//! Packages, committet und endet sofort.

use super::{Tool, ToolArgs, ToolContext, ToolId, ToolResponse};
use crate::app::document_controller::DocumentController;
use crate::core::ObjectType;

/// Setzt `BoardPackage::fixed` auf `fix`.
#[derive(Debug, Clone, Copy)]
pub struct FixTool {
    fix: bool,
}

impl FixTool {
    /// `fix = true` für Fixieren, `false` für Lösen.
    pub fn new(fix: bool) -> Self {
        Self { fix }
    }
}

impl Tool for FixTool {
    fn id(&self) -> ToolId {
        if self.fix {
            ToolId::Fix
        } else {
            ToolId::Unfix
        }
    }

    /// Nur anbieten, wenn mindestens ein selektiertes Package das Flag
    /// noch nicht hat.
    fn can_begin(&self, core: &DocumentController) -> bool {
        let doc = core.document();
        core.selection()
            .iter()
            .filter(|r| r.kind == ObjectType::BoardPackage)
            .filter_map(|r| doc.package(r.id))
            .any(|pkg| pkg.fixed != self.fix)
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        let doc = ctx.core.document_mut();
        let mut changed = 0;
        for r in args
            .selection
            .iter()
            .filter(|r| r.kind == ObjectType::BoardPackage)
        {
            if let Some(pkg) = doc.package_mut(r.id) {
                if pkg.fixed != self.fix {
                    pkg.fixed = self.fix;
                    changed += 1;
                }
            }
        }
        log::info!("{}: {} Packages geändert", self.id().name(), changed);
        ctx.commit_and_end()
    }

    fn update(&mut self, _ctx: &mut ToolContext<'_>, _args: &ToolArgs) -> ToolResponse {
        ToolResponse::end()
    }

    fn is_specific(&self) -> bool {
        true
    }
}
