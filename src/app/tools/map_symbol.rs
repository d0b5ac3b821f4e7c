//! Platziert Symbol-Instanzen für alle noch nicht platzierten Gates.
//!
//! Gates werden nacheinander abgearbeitet: das neue Symbol folgt dem Cursor,
//! ein Klick setzt es ab. Hat eine Unit mehrere passende Symbole, wartet das
//! Tool auf eine Wahl (Ziffer `1`..`9` oder `ToolInput::SymbolChoice`).

use std::collections::VecDeque;

use super::helpers::{MapSymbolHelper, MappingError, MoveHelper, SymbolPlan};
use super::{
    Key, MouseButton, Tool, ToolArgs, ToolContext, ToolEvent, ToolId, ToolInput, ToolResponse,
};
use crate::app::document_controller::DocumentController;
use crate::app::interface::ToolData;
use crate::core::{selection_of, Coord, Document, ObjectType, SelectableRef, Selection};

/// Offene Symbol-Wahl für ein Gate.
#[derive(Debug, Clone)]
struct PendingChoice {
    component: u64,
    gate: u64,
    unit: u64,
    candidates: Vec<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct MapSymbolTool {
    helper: MapSymbolHelper,
    mover: MoveHelper,
    /// Noch abzuarbeitende (Bauteil, Gate)-Paare
    gates: VecDeque<(u64, u64)>,
    choice: Option<PendingChoice>,
    /// Symbol-Instanz, die gerade dem Cursor folgt
    placing: Option<u64>,
    placed: Vec<u64>,
    cursor: Coord,
}

impl MapSymbolTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unplatzierte Gates der selektierten Bauteile, ohne Bauteil-Selektion
    /// alle unplatzierten Gates des Dokuments.
    fn pending_gates(document: &Document, selection: &Selection) -> Vec<(u64, u64)> {
        let selected: Vec<u64> = selection
            .iter()
            .filter(|r| r.kind == ObjectType::Component)
            .map(|r| r.id)
            .collect();
        document
            .unplaced_gates()
            .into_iter()
            .filter(|(component, _)| selected.is_empty() || selected.contains(component))
            .collect()
    }

    fn update_tip(&self, ctx: &mut ToolContext<'_>) {
        let tip = match (&self.choice, self.placing) {
            (Some(choice), _) => {
                format!("Symbol wählen (1-{}) · Escape bricht ab", choice.candidates.len())
            }
            (None, Some(_)) => format!(
                "Symbol absetzen · r drehen · e spiegeln · noch {} Gates",
                self.gates.len()
            ),
            (None, None) => String::new(),
        };
        ctx.imp.tool_bar_set_tip(&tip);
    }

    /// Nimmt das nächste Gate in Arbeit. Endet mit Commit, wenn keins mehr übrig ist.
    fn next_gate(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let pool = ctx.core.pool_handle();
        while let Some((component, gate)) = self.gates.pop_front() {
            let plan = self
                .helper
                .plan_symbol(ctx.core.document(), &pool, component, gate);
            match plan {
                Ok(SymbolPlan::Existing(id)) => {
                    log::debug!("Gate {} hat bereits Symbol {}", gate, id);
                }
                Ok(SymbolPlan::Create {
                    symbol,
                    auto_selected,
                }) => {
                    let id = MapSymbolHelper::place_symbol(
                        ctx.core.document_mut(),
                        component,
                        gate,
                        symbol,
                        auto_selected,
                        self.cursor,
                    );
                    self.placing = Some(id);
                    self.mover.move_init(self.cursor);
                    let tracked = selection_of([SelectableRef::new(ObjectType::SchematicSymbol, id)]);
                    self.mover.track_selection(ctx.core.document(), &tracked);
                    self.update_tip(ctx);
                    return ToolResponse::next();
                }
                Ok(SymbolPlan::NeedsChoice { unit, candidates }) => {
                    let named = candidates
                        .iter()
                        .map(|id| {
                            let name = pool.symbol(*id).map(|s| s.name.clone()).unwrap_or_default();
                            (*id, name)
                        })
                        .collect();
                    ctx.imp.tool_update_data(ToolData::SymbolCandidates {
                        component,
                        gate,
                        candidates: named,
                    });
                    self.choice = Some(PendingChoice {
                        component,
                        gate,
                        unit,
                        candidates,
                    });
                    self.update_tip(ctx);
                    return ToolResponse::next();
                }
                Err(err @ MappingError::NoSymbolForUnit { .. }) => {
                    log::warn!("Symbole platzieren: {}", err);
                    ctx.imp.tool_bar_flash(&err.to_string());
                    return ctx.cancel();
                }
                Err(err) => {
                    log::error!("Symbole platzieren: {}", err);
                    return ctx.cancel();
                }
            }
        }

        log::info!("{} Symbole platziert", self.placed.len());
        if self.placed.is_empty() {
            return ctx.cancel();
        }
        let placed = selection_of(
            self.placed
                .iter()
                .map(|id| SelectableRef::new(ObjectType::SchematicSymbol, *id)),
        );
        ctx.core.set_selection(placed);
        ctx.commit_and_end()
    }

    /// Übernimmt eine Symbol-Wahl und setzt mit demselben Gate fort.
    fn on_choice(&mut self, ctx: &mut ToolContext<'_>, symbol: u64) -> ToolResponse {
        let Some(choice) = self.choice.take() else {
            return ToolResponse::next();
        };
        let pool = ctx.core.pool_handle();
        if let Err(err) = self.helper.choose(&pool, choice.unit, symbol) {
            log::warn!("Symbol-Wahl abgelehnt: {}", err);
            ctx.imp.tool_bar_flash(&err.to_string());
            self.choice = Some(choice);
            return ToolResponse::next();
        }
        self.gates.push_front((choice.component, choice.gate));
        self.next_gate(ctx)
    }

    /// Zieht das schwebende Symbol zum Cursor.
    fn follow_cursor(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) {
        self.cursor = args.coords;
        let delta = self.mover.get_delta(args.coords, args.modifiers);
        if self.mover.would_move(delta) {
            self.mover.move_do(ctx.core.document_mut(), delta);
        }
    }

    fn on_place(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        let Some(id) = self.placing.take() else {
            return ToolResponse::next();
        };
        self.follow_cursor(ctx, args);
        ctx.imp.part_placed(id);
        self.placed.push(id);
        log::debug!("Symbol {} abgesetzt", id);
        self.next_gate(ctx)
    }
}

impl Tool for MapSymbolTool {
    fn id(&self) -> ToolId {
        ToolId::MapSymbol
    }

    fn can_begin(&self, core: &DocumentController) -> bool {
        core.has_object_type(ObjectType::SchematicSymbol)
            && !Self::pending_gates(core.document(), core.selection()).is_empty()
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        self.cursor = args.coords;
        self.gates = Self::pending_gates(ctx.core.document(), &args.selection).into();
        log::info!("Symbole platzieren: {} Gates offen", self.gates.len());
        self.next_gate(ctx)
    }

    fn update(&mut self, ctx: &mut ToolContext<'_>, args: &ToolArgs) -> ToolResponse {
        if args.is_cancel() {
            log::debug!("Symbole platzieren abgebrochen");
            return ctx.cancel();
        }

        if let Some(choice) = &self.choice {
            let symbol = match args.event {
                ToolEvent::Data(ToolInput::SymbolChoice(symbol)) => Some(symbol),
                ToolEvent::Key(Key::Char(c)) => c
                    .to_digit(10)
                    .filter(|d| *d >= 1)
                    .and_then(|d| choice.candidates.get(d as usize - 1).copied()),
                _ => None,
            };
            return match symbol {
                Some(symbol) => self.on_choice(ctx, symbol),
                None => ToolResponse::next(),
            };
        }

        let Some(id) = self.placing else {
            return ToolResponse::next();
        };
        match args.event {
            ToolEvent::Motion => self.follow_cursor(ctx, args),
            ToolEvent::Press(MouseButton::Left) | ToolEvent::Commit => {
                return self.on_place(ctx, args)
            }
            ToolEvent::Key(Key::Return) => return self.on_place(ctx, args),
            ToolEvent::Key(key @ (Key::Char('r') | Key::Char('e'))) => {
                let doc = ctx.core.document_mut();
                if let Some(center) = doc.schematic_symbol(id).map(|s| s.position) {
                    self.mover
                        .move_mirror_or_rotate(doc, center, key == Key::Char('r'));
                }
            }
            _ => {}
        }
        ToolResponse::next()
    }
}
