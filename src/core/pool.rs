//! Bibliothek (Pool) mit Unit- und Symbol-Definitionen.
//!
//! Der Pool ist read-only und wird vom Controller per `Arc` geteilt.

use std::collections::BTreeMap;

/// Logische Unit (Pin-Satz eines Gates).
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: u64,
    pub name: String,
    /// Pin-Namen der Unit
    pub pins: Vec<String>,
}

/// Grafische Symbol-Definition für genau eine Unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub id: u64,
    pub name: String,
    /// Unit, die dieses Symbol darstellt
    pub unit: u64,
}

/// Sammlung aller Units und Symbole.
#[derive(Debug, Clone, Default)]
pub struct Pool {
    units: BTreeMap<u64, Unit>,
    symbols: BTreeMap<u64, Symbol>,
}

impl Pool {
    /// Erstellt einen leeren Pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert eine Unit.
    pub fn add_unit(&mut self, id: u64, name: impl Into<String>, pins: &[&str]) {
        self.units.insert(
            id,
            Unit {
                id,
                name: name.into(),
                pins: pins.iter().map(|p| p.to_string()).collect(),
            },
        );
    }

    /// Registriert ein Symbol für eine Unit.
    pub fn add_symbol(&mut self, id: u64, name: impl Into<String>, unit: u64) {
        self.symbols.insert(
            id,
            Symbol {
                id,
                name: name.into(),
                unit,
            },
        );
    }

    pub fn unit(&self, id: u64) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn symbol(&self, id: u64) -> Option<&Symbol> {
        self.symbols.get(&id)
    }

    /// Alle Symbole einer Unit, sortiert nach ID (deterministische Kandidaten-Reihenfolge).
    pub fn symbols_for_unit(&self, unit: u64) -> Vec<&Symbol> {
        self.symbols.values().filter(|s| s.unit == unit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_for_unit_filters_and_sorts() {
        let mut pool = Pool::new();
        pool.add_unit(1, "NAND", &["A", "B", "Y"]);
        pool.add_unit(2, "PWR", &["VCC", "GND"]);
        pool.add_symbol(12, "NAND (IEC)", 1);
        pool.add_symbol(11, "NAND (ANSI)", 1);
        pool.add_symbol(20, "PWR", 2);

        let ids: Vec<u64> = pool.symbols_for_unit(1).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert!(pool.symbols_for_unit(3).is_empty());
        assert_eq!(pool.unit(2).map(|u| u.pins.len()), Some(2));
    }
}
