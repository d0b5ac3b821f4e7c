//! EDA Tool-Engine Library.
//! Interaktive Werkzeuge (Zustandsautomaten) über einem transaktionalen
//! Dokument-Modell, als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    create_tool, DocumentController, HeadlessInterface, ImpInterface, SelectionFilter, Tool,
    ToolArgs, ToolData, ToolEvent, ToolHost, ToolHostError, ToolId, ToolResponse,
};
pub use core::{
    selection_of, Coord, Document, DocumentKind, ObjectType, Orientation, Pool, SelectableRef,
    Selection,
};
pub use shared::EditorOptions;
