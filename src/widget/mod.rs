//! Widget model: values, kinds, property tables, nodes, and the tree arena.

pub mod kind;
pub mod lifecycle;
pub mod node;
pub mod render;
pub mod schema;
pub mod tree;
pub mod value;

pub use kind::WidgetKind;
pub use lifecycle::Lifecycle;
pub use node::{Field, Handles, NodeKey, WidgetNode};
pub use tree::{Descendants, WidgetTree, DARK_MODE_CLASS};
pub use value::Value;
