//! Core-Domänentypen: Dokument-Graph, Entitäten, Selektion, Pool, Spatial-Index.

pub mod document;
pub mod entities;
pub mod geometry;
pub mod object_ref;
pub mod pool;
pub mod spatial;

pub use document::{DanglingReference, Document, DocumentKind};
pub use entities::{Arc, BoardPackage, Component, Gate, Junction, Line, SchematicSymbol, SymbolPin};
pub use geometry::{Coord, Orientation};
pub use object_ref::{selection_of, ObjectRef, ObjectType, SelectableRef, Selection};
pub use pool::{Pool, Symbol, Unit};
pub use spatial::{JunctionIndex, SpatialMatch};
