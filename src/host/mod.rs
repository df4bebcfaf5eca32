//! Host capability boundary: the rendering surface and session storage.
//!
//! The widget tree never touches a concrete DOM. It talks to a [`Host`],
//! which owns live elements addressed by [`Handle`]s, and to a [`Storage`],
//! which holds the persisted snapshot between page loads. [`memory`] provides
//! in-memory implementations of both.

pub mod memory;

use slotmap::new_key_type;

use crate::error::HostError;
use crate::id::WidgetId;

pub use memory::{MemoryHost, MemoryStorage};

new_key_type! {
    /// Opaque reference to a live element on the host surface.
    pub struct Handle;
}

/// An event listener registration: which widget listens for which event.
///
/// Listeners are plain data so that they can be re-bound after a restore
/// without carrying closures across the capture boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Listener {
    pub widget: WidgetId,
    pub event: String,
}

impl Listener {
    pub fn new(widget: WidgetId, event: impl Into<String>) -> Self {
        Self {
            widget,
            event: event.into(),
        }
    }
}

/// Something the host wants the session to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A bound listener fired. `target` is the `id` attribute of the element
    /// the event originated on, which may be a sub-element of the listener.
    Listener { listener: Listener, target: String },
    /// The page is being torn down. Delivered at most once.
    Unload,
}

/// The rendering surface consumed by the widget tree.
pub trait Host {
    /// Create a detached element with the given tag.
    fn create_handle(&mut self, tag: &str) -> Handle;

    /// Release an element and everything below it. Stale handles are ignored.
    fn destroy_handle(&mut self, handle: Handle);

    fn set_attribute(&mut self, handle: Handle, name: &str, value: &str);

    fn remove_attribute(&mut self, handle: Handle, name: &str);

    fn attribute(&self, handle: Handle, name: &str) -> Option<String>;

    /// Set an inline style property, or remove it with `None`.
    fn set_style(&mut self, handle: Handle, property: &str, value: Option<&str>);

    /// Replace the element's children with a single text node.
    fn set_text(&mut self, handle: Handle, text: &str);

    /// Append a text node after the element's current children.
    fn append_text(&mut self, handle: Handle, text: &str);

    /// Append `child` under `parent`, detaching it from any previous parent.
    fn append_child(&mut self, parent: Handle, child: Handle);

    fn remove_child(&mut self, parent: Handle, child: Handle);

    fn replace_children(&mut self, parent: Handle, children: &[Handle]);

    /// Live value of a form element.
    fn value(&self, handle: Handle) -> String;

    fn set_value(&mut self, handle: Handle, value: &str);

    /// Make `handle` the only child of the anchor named `mount_point`.
    fn mount_root(&mut self, handle: Handle, mount_point: &str) -> Result<(), HostError>;

    /// Ask for a single [`HostEvent::Unload`] at page teardown.
    fn register_unload_hook(&mut self);

    fn bind_event(&mut self, handle: Handle, listener: Listener);

    fn unbind_event(&mut self, handle: Handle, listener: &Listener);

    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<HostEvent>;

    /// Whether the user prefers a dark colour scheme.
    fn prefers_dark_scheme(&self) -> bool {
        false
    }

    /// Classes from the `class` attribute, in order.
    fn class_list(&self, handle: Handle) -> Vec<String> {
        self.attribute(handle, "class")
            .map(|classes| classes.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn has_class(&self, handle: Handle, class: &str) -> bool {
        self.class_list(handle).iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    fn add_class(&mut self, handle: Handle, class: &str) {
        let mut classes = self.class_list(handle);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
            self.set_attribute(handle, "class", &classes.join(" "));
        }
    }

    /// Remove a class. No-op if not present.
    fn remove_class(&mut self, handle: Handle, class: &str) {
        let mut classes = self.class_list(handle);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.set_attribute(handle, "class", &classes.join(" "));
        }
    }
}

/// Session-scoped key/value storage for persisted tokens.
pub trait Storage {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&mut self, key: &str, value: &str);

    fn clear(&mut self, key: &str);
}
