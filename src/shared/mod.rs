//! Geteilte Typen und Konstanten für layer-übergreifende Verträge.

pub mod options;

pub use options::EditorOptions;
pub use options::{
    DEFAULT_LINE_WIDTH, DEFAULT_WORK_LAYER, GRID_SPACING, HISTORY_DEPTH, JUNCTION_MERGE_TOLERANCE,
};
