//! Bogen-Tool: Zeichnet einen Kreisbogen über drei Eingaben.
//!
//! **Ablauf:** Startpunkt → Endpunkt → Mittelpunkt. Der Mittelpunkt gleitet
//! auf der Mittelsenkrechten von Start und Ende, damit jeder Klick einen
//! gültigen Kreis ergibt (auf dem nm-Raster mit unter 2 nm Radius-Differenz).
//!
//! Start- und Endpunkt rasten auf bestehende Junctions ein; neue Junctions
//! und der Bogen bleiben provisorisch, bis der Mittelpunkt bestätigt ist.
//! Abbruch in jedem Zustand verwirft alles.
//!
//! Aufgeteilt in:
//! - `state`     : Struct, Zustände, Hilfsmethoden (Tipp, Junction-Auflösung)
//! - `lifecycle` : Tool-Implementierung (begin, update, apply_settings)

mod lifecycle;
mod state;

pub use state::{DrawArcState, DrawArcTool};
