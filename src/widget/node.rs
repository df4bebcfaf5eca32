//! The generic widget node stored in a [`WidgetTree`](super::WidgetTree) arena.

use std::collections::BTreeMap;

use slotmap::new_key_type;
use tracing::warn;

use super::kind::WidgetKind;
use super::lifecycle::Lifecycle;
use super::schema::Part;
use super::value::Value;
use crate::event::Handler;
use crate::host::Handle;
use crate::id::WidgetId;

new_key_type! {
    /// Arena key of a widget node.
    pub struct NodeKey;
}

/// Field name of the render handle in a node's full state.
pub const HANDLE_FIELD: &str = "handle";

/// Field name of the parent back-reference in a node's full state.
pub const PARENT_FIELD: &str = "parent";

/// The live elements rendering one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handles {
    /// The widget's own element.
    pub outer: Handle,
    /// Inner form element (text inputs only).
    pub inner: Option<Handle>,
    /// Icon element (buttons only). Detached while the icon is empty.
    pub icon: Option<Handle>,
}

impl Handles {
    pub fn part(&self, part: Part) -> Handle {
        match part {
            Part::Outer => self.outer,
            Part::Inner => self.focus(),
        }
    }

    /// Element that receives focus and form state.
    pub fn focus(&self) -> Handle {
        self.inner.unwrap_or(self.outer)
    }
}

/// One entry of a node's full in-memory state.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Value(Value),
    Handler(Handler),
    Handles(Handles),
    Parent(NodeKey),
}

/// A widget: identity, kind, property values, handler slots, render handles
/// and tree links.
///
/// Properties are keyed by the names in the kind's property table and are
/// the source of truth for rendering, except where
/// [`WidgetTree::capture`](super::WidgetTree::capture) pulls drifted state
/// back from the host.
#[derive(Debug, Clone)]
pub struct WidgetNode {
    pub(crate) id: WidgetId,
    pub(crate) kind: WidgetKind,
    pub(crate) props: BTreeMap<&'static str, Value>,
    pub(crate) handlers: BTreeMap<&'static str, Handler>,
    pub(crate) handles: Option<Handles>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) lifecycle: Lifecycle,
}

impl WidgetNode {
    /// A node with every property at its initial value and no handles.
    pub(crate) fn new(id: WidgetId, kind: WidgetKind) -> Self {
        let mut props: BTreeMap<_, _> = kind
            .properties()
            .map(|spec| (spec.name, spec.initial.value()))
            .collect();
        props.insert("classes", Value::List(kind.initial_classes()));
        Self {
            id,
            kind,
            props,
            handlers: BTreeMap::new(),
            handles: None,
            parent: None,
            children: Vec::new(),
            lifecycle: Lifecycle::Unattached,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Current value of a property.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Handler bound to `event`, if any.
    pub fn handler(&self, event: &str) -> Option<&Handler> {
        self.handlers.get(event)
    }

    pub fn handles(&self) -> Option<Handles> {
        self.handles
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub(crate) fn set_lifecycle(&mut self, next: Lifecycle) {
        self.lifecycle = self.lifecycle.advance(next);
    }

    /// Live handles. Panics when the node has none, which means a caller
    /// touched the host before `recreate_handles` ran.
    pub(crate) fn live_handles(&self) -> Handles {
        self.handles
            .unwrap_or_else(|| panic!("widget {} has no live render handle", self.id))
    }

    pub(crate) fn classes(&self) -> &[String] {
        self.props
            .get("classes")
            .and_then(Value::as_list)
            .unwrap_or_default()
    }

    /// The node's full in-memory field set, persistable or not.
    pub fn state(&self) -> BTreeMap<String, Field> {
        let mut state: BTreeMap<String, Field> = self
            .props
            .iter()
            .map(|(name, value)| ((*name).to_owned(), Field::Value(value.clone())))
            .collect();
        for spec in self.kind.handlers() {
            if let Some(handler) = self.handlers.get(spec.event) {
                state.insert(spec.field.to_owned(), Field::Handler(handler.clone()));
            }
        }
        if let Some(handles) = self.handles {
            state.insert(HANDLE_FIELD.to_owned(), Field::Handles(handles));
        }
        if let Some(parent) = self.parent {
            state.insert(PARENT_FIELD.to_owned(), Field::Parent(parent));
        }
        state
    }

    /// Remove every field that cannot cross the capture boundary: the render
    /// handle, the parent link, and closure handlers. Named handlers stay.
    pub fn exclude_non_persistable(&self, state: &mut BTreeMap<String, Field>) {
        state.retain(|name, field| match field {
            Field::Value(_) => true,
            Field::Handler(handler) if handler.is_persistable() => true,
            Field::Handler(_) => {
                warn!(widget = %self.id, field = %name, "dropping closure handler from snapshot");
                false
            }
            Field::Handles(_) | Field::Parent(_) => false,
        });
    }
}
