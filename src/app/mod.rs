//! Application-Layer: Tool-Host, Dokument-Controller, Historie und Tools.

pub mod controller;
pub mod document_controller;
pub mod history;
pub mod interface;
pub mod selection_filter;
pub mod signals;
pub mod tools;

pub use controller::{ToolHost, ToolHostError};
pub use document_controller::DocumentController;
pub use history::{EditHistory, Snapshot};
pub use interface::{HeadlessInterface, Highlights, ImpInterface, ToolData};
pub use selection_filter::SelectionFilter;
pub use signals::{CoreSignals, Signal, SubscriptionId};
pub use tools::{
    create_tool, Key, Modifiers, MouseButton, Tool, ToolArgs, ToolContext, ToolEvent, ToolId,
    ToolInput, ToolResponse,
};
