//! Lifecycle-Methoden des DrawArcTool (Tool-Implementierung).

use super::super::{
    highlight_snap_candidate, snap_to_junction, Key, MouseButton, Tool, ToolArgs, ToolContext,
    ToolEvent, ToolId, ToolResponse,
};
use super::state::{DrawArcState, DrawArcTool};
use crate::app::document_controller::DocumentController;
use crate::app::interface::ToolData;
use crate::core::geometry::project_on_bisector;
use crate::core::{selection_of, Coord, ObjectType, SelectableRef};

impl Tool for DrawArcTool {
    fn id(&self) -> ToolId {
        ToolId::DrawArc
    }

    fn can_begin(&self, core: &DocumentController) -> bool {
        core.has_object_type(ObjectType::Arc)
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        self.state = DrawArcState::From;
        self.temp_junc = Some(ctx.core.document_mut().create_junction(args.coords));
        highlight_snap_candidate(ctx, args.coords);
        self.update_tip(ctx);
        ToolResponse::next()
    }

    fn apply_settings(&mut self, ctx: &mut ToolContext<'_>) {
        self.line_width.apply_settings(ctx.options);
        if let Some(arc) = self.temp_arc {
            self.line_width.apply_to_arc(ctx.core.document_mut(), arc);
        }
        self.update_tip(ctx);
    }

    fn update(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        if args.is_cancel() {
            log::debug!("Bogen-Tool abgebrochen in Zustand {:?}", self.state);
            return ctx.cancel();
        }
        if !self.references_intact(ctx) {
            log::error!("Bogen-Tool: referenzierte Junction/Bogen fehlt, breche ab");
            return ctx.cancel();
        }

        match args.event {
            ToolEvent::Motion => {
                self.on_motion(ctx, args.coords);
                ToolResponse::next()
            }
            ToolEvent::Press(MouseButton::Left) => self.on_confirm(ctx, args.coords),
            ToolEvent::Commit | ToolEvent::Key(Key::Return) => {
                if self.state == DrawArcState::Center {
                    self.on_confirm(ctx, args.coords)
                } else {
                    ctx.imp.tool_bar_flash("Bogen unvollständig");
                    ToolResponse::next()
                }
            }
            ToolEvent::Key(key) => {
                if self.line_width.handle_key(key, ctx.imp.get_grid_spacing()) {
                    if let Some(arc) = self.temp_arc {
                        self.line_width.apply_to_arc(ctx.core.document_mut(), arc);
                    }
                    self.update_tip(ctx);
                }
                ToolResponse::next()
            }
            _ => ToolResponse::next(),
        }
    }
}

impl DrawArcTool {
    fn references_intact(&self, ctx: &ToolContext<'_>) -> bool {
        let doc = ctx.core.document();
        let junction_ok = |id: Option<u64>| id.map_or(true, |id| doc.junction(id).is_some());
        junction_ok(self.from_junc)
            && junction_ok(self.to_junc)
            && junction_ok(self.temp_junc)
            && self.temp_arc.map_or(true, |id| doc.arc(id).is_some())
    }

    fn on_motion(&mut self, ctx: &mut ToolContext<'_>, coords: Coord) {
        match self.state {
            DrawArcState::From | DrawArcState::To => {
                if let Some(temp) = self.temp_junc {
                    ctx.core.document_mut().set_junction_position(temp, coords);
                }
                if self.state == DrawArcState::To {
                    if let (Some(arc), Some(from)) =
                        (self.temp_arc, Self::junction_position(ctx, self.from_junc))
                    {
                        if let Some(a) = ctx.core.document_mut().arc_mut(arc) {
                            a.center = (from + coords) / 2;
                        }
                    }
                }
                highlight_snap_candidate(ctx, coords);
            }
            DrawArcState::Center => {
                self.update_center(ctx, coords);
            }
        }
    }

    /// Setzt den Mittelpunkt auf die Projektion des Cursors auf die
    /// Mittelsenkrechte. Gibt `false` zurück bei entartetem Bogen.
    fn update_center(&mut self, ctx: &mut ToolContext<'_>, coords: Coord) -> bool {
        let (Some(arc), Some(from), Some(to)) = (
            self.temp_arc,
            Self::junction_position(ctx, self.from_junc),
            Self::junction_position(ctx, self.to_junc),
        ) else {
            return false;
        };
        let Some(center) = project_on_bisector(from, to, coords) else {
            return false;
        };
        if let Some(a) = ctx.core.document_mut().arc_mut(arc) {
            a.center = center;
            let radius = a.radius(from);
            ctx.imp.tool_update_data(ToolData::ArcRadius(radius));
        }
        true
    }

    fn on_confirm(&mut self, ctx: &mut ToolContext<'_>, coords: Coord) -> ToolResponse {
        match self.state {
            DrawArcState::From => {
                let from = self.make_junction(ctx, coords);
                let width = self.line_width.width();
                let layer = ctx.imp.get_work_layer();
                let doc = ctx.core.document_mut();
                let temp = match self.temp_junc {
                    Some(temp) => temp,
                    None => doc.create_junction(coords),
                };
                self.temp_junc = Some(temp);
                self.from_junc = Some(from);
                self.temp_arc = Some(doc.create_arc(from, temp, coords, width, layer));
                self.state = DrawArcState::To;
                log::debug!("Bogen: Start {} gesetzt", from);
            }
            DrawArcState::To => {
                let Some(from_pos) = Self::junction_position(ctx, self.from_junc) else {
                    return ctx.cancel();
                };
                let anchor = snap_to_junction(
                    coords,
                    ctx.core.document(),
                    ctx.options.junction_merge_tolerance,
                );
                if anchor.position() == from_pos {
                    log::warn!("Bogen: Endpunkt fällt auf den Startpunkt");
                    ctx.imp
                        .tool_bar_flash("Endpunkt muss vom Startpunkt verschieden sein");
                    return ToolResponse::next();
                }

                let to = self.make_junction(ctx, coords);
                let doc = ctx.core.document_mut();
                if let Some(arc) = self.temp_arc {
                    if let Some(a) = doc.arc_mut(arc) {
                        a.to = to;
                    }
                }
                // Eingerastet: die Cursor-Junction wird nicht mehr gebraucht
                if let Some(temp) = self.temp_junc.take() {
                    doc.remove_junction(temp);
                }
                self.to_junc = Some(to);
                self.state = DrawArcState::Center;
                self.update_center(ctx, coords);
                ctx.imp.get_highlights().clear();
                ctx.imp.update_highlights();
                log::debug!("Bogen: Ende {} gesetzt", to);
            }
            DrawArcState::Center => {
                if !self.update_center(ctx, coords) {
                    ctx.imp.tool_bar_flash("Mittelpunkt ungültig");
                    return ToolResponse::next();
                }
                let Some(arc) = self.temp_arc else {
                    return ctx.cancel();
                };
                self.line_width.apply_to_arc(ctx.core.document_mut(), arc);
                ctx.core
                    .set_selection(selection_of([SelectableRef::new(ObjectType::Arc, arc)]));
                log::info!("Bogen {} erstellt", arc);
                return ctx.commit_and_end();
            }
        }
        self.update_tip(ctx);
        ToolResponse::next()
    }
}
