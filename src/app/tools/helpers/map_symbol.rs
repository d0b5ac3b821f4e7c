//! Zuordnung Gate → Symbol-Instanz im Schaltplan.
//!
//! Logisches Modell (Bauteil, Gate, Unit) und grafisches Modell (Symbol,
//! Symbol-Instanz) sind getrennte Graphen. Sie werden ausschließlich über
//! `map_symbol` konsistent gehalten.

use crate::core::{Coord, Document, Pool};
use std::collections::HashMap;
use thiserror::Error;

/// Fehler der Symbol-Zuordnung.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("kein Symbol für Unit {unit} gefunden")]
    NoSymbolForUnit { unit: u64 },
    #[error("Symbol {symbol} gehört nicht zu Unit {unit}")]
    SymbolNotForUnit { symbol: u64, unit: u64 },
    #[error("Bauteil {0} existiert nicht")]
    UnknownComponent(u64),
    #[error("Gate {gate} existiert nicht in Bauteil {component}")]
    UnknownGate { component: u64, gate: u64 },
}

/// Ergebnis der Symbol-Auswahl für eine Unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSelection {
    /// `auto_selected`: ohne Benutzer-Eingabe gewählt (einziger Kandidat)
    Chosen { symbol: u64, auto_selected: bool },
    /// Mehrere Kandidaten, Benutzer muss wählen
    Deferred { candidates: Vec<u64> },
}

/// Ergebnis von `MapSymbolHelper::map_symbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedSymbol {
    /// Das Gate hat bereits eine Symbol-Instanz
    Existing(u64),
    /// Neue provisorische Symbol-Instanz
    Created {
        id: u64,
        symbol: u64,
        auto_selected: bool,
    },
    /// Auswahl steht aus (siehe `MapSymbolHelper::choose`)
    NeedsChoice { unit: u64, candidates: Vec<u64> },
}

/// Was `map_symbol` für ein Gate tun würde, ermittelt ohne Schreibzugriff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolPlan {
    /// Das Gate hat bereits eine Symbol-Instanz
    Existing(u64),
    /// Eine neue Instanz mit diesem Symbol anlegen
    Create { symbol: u64, auto_selected: bool },
    /// Auswahl steht aus
    NeedsChoice { unit: u64, candidates: Vec<u64> },
}

/// Merkt sich Benutzer-Entscheidungen pro Unit für die Dauer eines Tools.
#[derive(Debug, Clone, Default)]
pub struct MapSymbolHelper {
    choices: HashMap<u64, u64>,
}

impl MapSymbolHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wählt das Symbol für eine Unit.
    ///
    /// Eine frühere Benutzer-Wahl hat Vorrang. Sonst wird ein einziger
    /// Kandidat automatisch gewählt; bei mehreren wird die Wahl vertagt.
    pub fn get_symbol_for_unit(&self, pool: &Pool, unit: u64) -> Result<SymbolSelection, MappingError> {
        if let Some(symbol) = self.choices.get(&unit) {
            if pool.symbol(*symbol).is_some() {
                return Ok(SymbolSelection::Chosen {
                    symbol: *symbol,
                    auto_selected: false,
                });
            }
        }

        let candidates = pool.symbols_for_unit(unit);
        match candidates.as_slice() {
            [] => Err(MappingError::NoSymbolForUnit { unit }),
            [only] => Ok(SymbolSelection::Chosen {
                symbol: only.id,
                auto_selected: true,
            }),
            many => Ok(SymbolSelection::Deferred {
                candidates: many.iter().map(|s| s.id).collect(),
            }),
        }
    }

    /// Übernimmt eine Benutzer-Wahl.
    pub fn choose(&mut self, pool: &Pool, unit: u64, symbol: u64) -> Result<(), MappingError> {
        match pool.symbol(symbol) {
            Some(s) if s.unit == unit => {
                self.choices.insert(unit, symbol);
                Ok(())
            }
            _ => Err(MappingError::SymbolNotForUnit { symbol, unit }),
        }
    }

    pub fn choice_for(&self, unit: u64) -> Option<u64> {
        self.choices.get(&unit).copied()
    }

    /// Ermittelt, wie (Bauteil, Gate) auf ein Symbol abgebildet wird.
    pub fn plan_symbol(
        &self,
        document: &Document,
        pool: &Pool,
        component: u64,
        gate: u64,
    ) -> Result<SymbolPlan, MappingError> {
        let unit = document
            .component(component)
            .ok_or(MappingError::UnknownComponent(component))?
            .gates
            .get(&gate)
            .ok_or(MappingError::UnknownGate { component, gate })?
            .unit;

        if let Some(existing) = document.find_symbol_for_gate(component, gate) {
            return Ok(SymbolPlan::Existing(existing));
        }

        Ok(match self.get_symbol_for_unit(pool, unit)? {
            SymbolSelection::Chosen {
                symbol,
                auto_selected,
            } => SymbolPlan::Create {
                symbol,
                auto_selected,
            },
            SymbolSelection::Deferred { candidates } => SymbolPlan::NeedsChoice { unit, candidates },
        })
    }

    /// Legt die provisorische Symbol-Instanz für ein `SymbolPlan::Create` an.
    pub fn place_symbol(
        document: &mut Document,
        component: u64,
        gate: u64,
        symbol: u64,
        auto_selected: bool,
        position: Coord,
    ) -> u64 {
        let id = document.create_schematic_symbol(component, gate, symbol, position);
        log::debug!(
            "Symbol {} für Gate {} angelegt (automatisch: {})",
            symbol,
            gate,
            auto_selected
        );
        id
    }

    /// Liefert oder erzeugt die Symbol-Instanz für (Bauteil, Gate).
    pub fn map_symbol(
        &self,
        document: &mut Document,
        pool: &Pool,
        component: u64,
        gate: u64,
        position: Coord,
    ) -> Result<MappedSymbol, MappingError> {
        Ok(match self.plan_symbol(document, pool, component, gate)? {
            SymbolPlan::Existing(id) => MappedSymbol::Existing(id),
            SymbolPlan::Create {
                symbol,
                auto_selected,
            } => MappedSymbol::Created {
                id: Self::place_symbol(document, component, gate, symbol, auto_selected, position),
                symbol,
                auto_selected,
            },
            SymbolPlan::NeedsChoice { unit, candidates } => {
                MappedSymbol::NeedsChoice { unit, candidates }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Component, DocumentKind};

    fn pool() -> Pool {
        let mut pool = Pool::new();
        pool.add_unit(100, "Resistor", &["1", "2"]);
        pool.add_symbol(500, "R", 100);
        pool.add_unit(200, "OpAmp", &["+", "-", "OUT"]);
        pool.add_symbol(600, "OpAmp-Triangle", 200);
        pool.add_symbol(601, "OpAmp-Box", 200);
        pool.add_unit(300, "Unbenutzt", &[]);
        pool
    }

    fn schematic() -> Document {
        let mut doc = Document::new(DocumentKind::Schematic);
        doc.insert_component(Component::new(1, "R1").with_gate(10, "Main", 100));
        doc.insert_component(Component::new(2, "U1").with_gate(20, "A", 200));
        doc
    }

    #[test]
    fn single_candidate_is_auto_selected() {
        let helper = MapSymbolHelper::new();
        assert_eq!(
            helper.get_symbol_for_unit(&pool(), 100),
            Ok(SymbolSelection::Chosen {
                symbol: 500,
                auto_selected: true
            })
        );
    }

    #[test]
    fn several_candidates_defer_until_chosen() {
        let pool = pool();
        let mut helper = MapSymbolHelper::new();
        assert_eq!(
            helper.get_symbol_for_unit(&pool, 200),
            Ok(SymbolSelection::Deferred {
                candidates: vec![600, 601]
            })
        );

        helper.choose(&pool, 200, 601).expect("gültige Wahl");
        assert_eq!(
            helper.get_symbol_for_unit(&pool, 200),
            Ok(SymbolSelection::Chosen {
                symbol: 601,
                auto_selected: false
            })
        );
    }

    #[test]
    fn unit_without_symbol_is_an_explicit_error() {
        let helper = MapSymbolHelper::new();
        assert_eq!(
            helper.get_symbol_for_unit(&pool(), 300),
            Err(MappingError::NoSymbolForUnit { unit: 300 })
        );
    }

    #[test]
    fn choosing_foreign_symbol_is_rejected() {
        let mut helper = MapSymbolHelper::new();
        assert_eq!(
            helper.choose(&pool(), 200, 500),
            Err(MappingError::SymbolNotForUnit {
                symbol: 500,
                unit: 200
            })
        );
        assert_eq!(helper.choice_for(200), None);
    }

    #[test]
    fn map_symbol_creates_then_reuses_instance() {
        let pool = pool();
        let helper = MapSymbolHelper::new();
        let mut doc = schematic();

        let created = helper
            .map_symbol(&mut doc, &pool, 1, 10, Coord::ZERO)
            .expect("Zuordnung");
        let MappedSymbol::Created { id, auto_selected, .. } = created else {
            panic!("Symbol erwartet, bekommen: {created:?}");
        };
        assert!(auto_selected);
        assert!(doc.schematic_symbol(id).expect("vorhanden").provisional);

        assert_eq!(
            helper.map_symbol(&mut doc, &pool, 1, 10, Coord::ZERO),
            Ok(MappedSymbol::Existing(id))
        );
    }

    #[test]
    fn map_symbol_reports_missing_references() {
        let pool = pool();
        let helper = MapSymbolHelper::new();
        let mut doc = schematic();

        assert_eq!(
            helper.map_symbol(&mut doc, &pool, 9, 10, Coord::ZERO),
            Err(MappingError::UnknownComponent(9))
        );
        assert_eq!(
            helper.map_symbol(&mut doc, &pool, 1, 99, Coord::ZERO),
            Err(MappingError::UnknownGate {
                component: 1,
                gate: 99
            })
        );
        assert!(matches!(
            helper.map_symbol(&mut doc, &pool, 2, 20, Coord::ZERO),
            Ok(MappedSymbol::NeedsChoice { unit: 200, .. })
        ));
        assert_eq!(doc.schematic_symbol_count(), 0);
    }

    #[test]
    fn plan_reads_without_creating() {
        let pool = pool();
        let helper = MapSymbolHelper::new();
        let mut doc = schematic();

        assert_eq!(
            helper.plan_symbol(&doc, &pool, 1, 10),
            Ok(SymbolPlan::Create {
                symbol: 500,
                auto_selected: true
            })
        );
        assert_eq!(doc.schematic_symbol_count(), 0);

        let id = MapSymbolHelper::place_symbol(&mut doc, 1, 10, 500, true, Coord::ZERO);
        assert_eq!(helper.plan_symbol(&doc, &pool, 1, 10), Ok(SymbolPlan::Existing(id)));
    }
}
