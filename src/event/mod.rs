//! Event handling: handler slots, the name registry, target resolution.

pub mod handler;
pub mod target;

pub use handler::{Handler, HandlerFn, HandlerRegistry};
pub use target::{find_event_target, WidgetEvent};
