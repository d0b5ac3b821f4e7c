//! Spatial-Index (KD-Tree) für schnelle Junction-Abfragen.

use std::collections::HashMap;

use kiddo::{KdTree, SquaredEuclidean};

use super::entities::Junction;
use super::geometry::Coord;

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// ID der gefundenen Junction
    pub junction_id: u64,
    /// Euklidische Distanz zum Suchpunkt in nm
    pub distance: f64,
}

/// Spatial-Index über allen Junctions eines Dokuments.
///
/// Einträge tragen direkt die Junction-ID; Verschieben einer Junction
/// ersetzt nur ihren Eintrag.
#[derive(Debug, Clone)]
pub struct JunctionIndex {
    tree: KdTree<f64, 2>,
    len: usize,
}

impl JunctionIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: KdTree::new(),
            len: 0,
        }
    }

    /// Baut einen neuen Index aus den übergebenen Junctions.
    pub fn from_junctions(junctions: &HashMap<u64, Junction>) -> Self {
        let mut ids: Vec<u64> = junctions.keys().copied().collect();
        ids.sort_unstable();

        let mut tree: KdTree<f64, 2> = KdTree::with_capacity(ids.len().max(1));
        for id in &ids {
            if let Some(junction) = junctions.get(id) {
                tree.add(&to_point(junction.position), *id);
            }
        }

        Self {
            tree,
            len: ids.len(),
        }
    }

    /// Nimmt eine Junction auf.
    pub fn insert(&mut self, id: u64, position: Coord) {
        self.tree.add(&to_point(position), id);
        self.len += 1;
    }

    /// Entfernt den Eintrag einer Junction. Gibt `false` zurück, wenn er fehlte.
    pub fn remove(&mut self, id: u64, position: Coord) -> bool {
        let removed = self.tree.remove(&to_point(position), id);
        self.len -= removed.min(self.len);
        removed > 0
    }

    /// Versetzt den Eintrag einer Junction.
    pub fn relocate(&mut self, id: u64, from: Coord, to: Coord) {
        if self.remove(id, from) {
            self.insert(id, to);
        }
    }

    /// Gibt die Anzahl indexierter Junctions zurück.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Gibt `true` zurück, wenn keine Junctions im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Findet die nächste Junction zur gegebenen Position.
    pub fn nearest(&self, query: Coord) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }
        let result = self.tree.nearest_one::<SquaredEuclidean>(&to_point(query));

        Some(SpatialMatch {
            junction_id: result.item,
            distance: result.distance.sqrt(),
        })
    }

    /// Findet alle Junctions innerhalb eines Radius, aufsteigend nach Distanz.
    ///
    /// Der KD-Tree dient nur als Vorfilter; der Aufrufer prüft die exakte
    /// Ganzzahl-Distanz selbst, wenn es auf Gleichheit ankommt.
    pub fn within_radius(&self, query: Coord, radius: f64) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&to_point(query), radius * radius)
            .into_iter()
            .map(|entry| SpatialMatch {
                junction_id: entry.item,
                distance: entry.distance.sqrt(),
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.junction_id.cmp(&b.junction_id))
        });
        results
    }
}

impl Default for JunctionIndex {
    fn default() -> Self {
        Self::empty()
    }
}

fn to_point(c: Coord) -> [f64; 2] {
    [c.x as f64, c.y as f64]
}
