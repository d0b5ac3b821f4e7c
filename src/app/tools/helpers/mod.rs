//! Teil-Verhalten, die Tools per Komposition einbinden.
//!
//! Ein Helper hält nur eigenen, tool-lokalen Zustand; das Tool besitzt je
//! eine Instanz und delegiert explizit.

pub mod line_width;
pub mod map_symbol;
pub mod movement;
pub mod restrict;

pub use line_width::LineWidthSetting;
pub use map_symbol::{MapSymbolHelper, MappedSymbol, MappingError, SymbolPlan, SymbolSelection};
pub use movement::MoveHelper;
pub use restrict::{RestrictHelper, RestrictMode};
