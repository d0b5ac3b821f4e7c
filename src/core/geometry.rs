//! Koordinaten, diskrete Orientierungen und Punkt-Transformationen.

use glam::{DVec2, I64Vec2};

/// Dokument-Koordinate in Nanometern.
pub type Coord = I64Vec2;

/// Diskrete Ausrichtung von Pins, Symbolen und Packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Zeigt nach oben (+y)
    #[default]
    Up,
    /// Zeigt nach unten (-y)
    Down,
    /// Zeigt nach links (-x)
    Left,
    /// Zeigt nach rechts (+x)
    Right,
}

impl Orientation {
    /// Alle definierten Orientierungen (für vollständige Prüfungen).
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Down,
        Orientation::Left,
        Orientation::Right,
    ];
}

/// Dreht `p` um 90° gegen den Uhrzeigersinn um `center`.
pub fn rotate_ccw(p: Coord, center: Coord) -> Coord {
    let d = p - center;
    center + Coord::new(-d.y, d.x)
}

/// Spiegelt `p` an der vertikalen Achse durch `center`.
pub fn mirror_x(p: Coord, center: Coord) -> Coord {
    Coord::new(2 * center.x - p.x, p.y)
}

/// Rastet `p` auf das nächste Vielfache von `spacing` ein (0 = unverändert).
pub fn snap_to_grid(p: Coord, spacing: u64) -> Coord {
    if spacing == 0 {
        return p;
    }
    let s = spacing as i64;
    let snap = |v: i64| (v as f64 / s as f64).round() as i64 * s;
    Coord::new(snap(p.x), snap(p.y))
}

/// Quadrierter Abstand zweier Koordinaten (i128 gegen Überlauf bei großen Boards).
pub fn distance_sq(a: Coord, b: Coord) -> i128 {
    let d = a - b;
    (d.x as i128) * (d.x as i128) + (d.y as i128) * (d.y as i128)
}

/// Projiziert `cursor` auf die Mittelsenkrechte von `from`–`to`.
///
/// Jeder Punkt auf der Mittelsenkrechten ist von beiden Endpunkten gleich weit
/// entfernt und damit ein gültiger Kreismittelpunkt. Bei identischen Endpunkten
/// gibt es keine Mittelsenkrechte → `None`.
///
/// Auf dem nm-Raster liegt die Mittelsenkrechte bei schrägen Sehnen meist
/// zwischen den Gitterpunkten. Gewählt wird deshalb unter den Nachbarn des
/// exakten Punkts derjenige mit dem kleinsten Radius-Unterschied; dieser
/// bleibt unter 2 nm.
pub fn project_on_bisector(from: Coord, to: Coord, cursor: Coord) -> Option<Coord> {
    if from == to {
        return None;
    }
    let a = from.as_dvec2();
    let b = to.as_dvec2();
    let mid = (a + b) * 0.5;
    let chord = b - a;
    let normal = DVec2::new(-chord.y, chord.x).normalize();
    let t = (cursor.as_dvec2() - mid).dot(normal);
    let exact = mid + normal * t;

    let base = exact.round().as_i64vec2();
    let mut best = base;
    let mut best_key = (
        radius_imbalance(base, from, to),
        base.as_dvec2().distance_squared(exact),
    );
    for dx in -1..=1 {
        for dy in -1..=1 {
            let candidate = base + Coord::new(dx, dy);
            let key = (
                radius_imbalance(candidate, from, to),
                candidate.as_dvec2().distance_squared(exact),
            );
            if key.0 < best_key.0 || (key.0 == best_key.0 && key.1 < best_key.1) {
                best = candidate;
                best_key = key;
            }
        }
    }
    Some(best)
}

/// |r_from² − r_to²| eines Mittelpunkts, exakt in Ganzzahlen.
fn radius_imbalance(center: Coord, from: Coord, to: Coord) -> u128 {
    (distance_sq(center, from) - distance_sq(center, to)).unsigned_abs()
}
