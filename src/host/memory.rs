//! In-memory host: a slotmap-backed element tree and a map-backed storage.
//!
//! [`MemoryHost`] behaves like a minimal DOM. Elements and text nodes live in
//! one `SlotMap`; parent/child links live in secondary maps so detaching is
//! O(siblings) and lookups are O(1). Every mutating [`Host`] call bumps a
//! counter, which lets tests check that idempotent setters do not re-render.

use std::collections::{BTreeMap, HashMap, VecDeque};

use slotmap::{SecondaryMap, SlotMap};

use super::{Handle, Host, HostEvent, Listener, Storage};
use crate::error::HostError;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[Handle] = &[];

// ---------------------------------------------------------------------------
// Node content
// ---------------------------------------------------------------------------

/// An element on the in-memory surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    /// Live value for form elements.
    pub value: String,
    pub listeners: Vec<Listener>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }
}

/// A node of the in-memory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNode {
    Element(Element),
    Text(String),
}

// ---------------------------------------------------------------------------
// MemoryHost
// ---------------------------------------------------------------------------

/// Headless [`Host`] implementation.
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: SlotMap<Handle, HostNode>,
    children: SecondaryMap<Handle, Vec<Handle>>,
    parent: SecondaryMap<Handle, Handle>,
    mount_points: HashMap<String, Handle>,
    events: VecDeque<HostEvent>,
    unload_hook: bool,
    unload_fired: bool,
    dark_scheme: bool,
    mutations: usize,
}

impl MemoryHost {
    /// Create an empty surface with no mount points.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `div` anchor with the given id (builder).
    pub fn with_mount_point(mut self, id: &str) -> Self {
        let anchor = self.insert(HostNode::Element(Element::new("div")));
        if let Some(HostNode::Element(element)) = self.nodes.get_mut(anchor) {
            element.attributes.insert("id".to_owned(), id.to_owned());
        }
        self.mount_points.insert(id.to_owned(), anchor);
        self
    }

    /// Report a dark colour-scheme preference (builder).
    pub fn with_dark_scheme(mut self, dark: bool) -> Self {
        self.dark_scheme = dark;
        self
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Number of mutating host calls made so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// Number of live nodes (elements and text).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.nodes.contains_key(handle)
    }

    pub fn node(&self, handle: Handle) -> Option<&HostNode> {
        self.nodes.get(handle)
    }

    pub fn element(&self, handle: Handle) -> Option<&Element> {
        match self.nodes.get(handle) {
            Some(HostNode::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, handle: Handle) -> Option<&str> {
        self.element(handle).map(|e| e.tag.as_str())
    }

    pub fn style(&self, handle: Handle, property: &str) -> Option<&str> {
        self.element(handle)
            .and_then(|e| e.styles.get(property))
            .map(String::as_str)
    }

    pub fn listeners(&self, handle: Handle) -> &[Listener] {
        self.element(handle)
            .map(|e| e.listeners.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, handle: Handle) -> Option<Handle> {
        self.parent.get(handle).copied()
    }

    /// Children of a node. Empty if it has none or does not exist.
    pub fn children_of(&self, handle: Handle) -> &[Handle] {
        self.children
            .get(handle)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Concatenated text of all text nodes below `handle`, in document order.
    pub fn text_content(&self, handle: Handle) -> String {
        let mut out = String::new();
        for node in self.walk_depth_first(handle) {
            if let Some(HostNode::Text(text)) = self.nodes.get(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// The anchor registered under `id`.
    pub fn mount_point(&self, id: &str) -> Option<Handle> {
        self.mount_points.get(id).copied()
    }

    /// First element below the mount points whose `id` attribute matches.
    pub fn element_by_id(&self, id: &str) -> Option<Handle> {
        self.mount_points
            .values()
            .flat_map(|&anchor| self.walk_depth_first(anchor))
            .find(|&h| self.attribute(h, "id").as_deref() == Some(id))
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: Handle) -> Vec<Handle> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children_of(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    // ── User simulation ──────────────────────────────────────────────

    /// Overwrite a form element's value the way a user typing would: no
    /// toolkit call is involved and the mutation counter is untouched.
    pub fn type_text(&mut self, handle: Handle, text: &str) {
        if let Some(HostNode::Element(element)) = self.nodes.get_mut(handle) {
            element.value = text.to_owned();
        }
    }

    /// Add a class from outside the toolkit, as a stylesheet script might.
    pub fn add_external_class(&mut self, handle: Handle, class: &str) {
        let mut classes = self.class_list(handle);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
            if let Some(HostNode::Element(element)) = self.nodes.get_mut(handle) {
                element.attributes.insert("class".to_owned(), classes.join(" "));
            }
        }
    }

    /// Fire `event` on `handle`, bubbling to its ancestors. Every matching
    /// listener on the path queues one [`HostEvent::Listener`]. Returns the
    /// number of queued events.
    pub fn dispatch(&mut self, handle: Handle, event: &str) -> usize {
        if !self.nodes.contains_key(handle) {
            return 0;
        }
        let target = self.attribute(handle, "id").unwrap_or_default();
        let mut path = vec![handle];
        let mut current = handle;
        while let Some(p) = self.parent.get(current).copied() {
            path.push(p);
            current = p;
        }

        let mut queued = 0;
        for node in path {
            let listeners: Vec<Listener> = self
                .listeners(node)
                .iter()
                .filter(|l| l.event == event)
                .cloned()
                .collect();
            for listener in listeners {
                self.events.push_back(HostEvent::Listener {
                    listener,
                    target: target.clone(),
                });
                queued += 1;
            }
        }
        queued
    }

    /// Begin page teardown. Queues [`HostEvent::Unload`] if a hook was
    /// registered and teardown has not happened yet.
    pub fn unload(&mut self) -> bool {
        if self.unload_hook && !self.unload_fired {
            self.unload_fired = true;
            self.events.push_back(HostEvent::Unload);
            true
        } else {
            false
        }
    }

    pub fn has_unload_hook(&self) -> bool {
        self.unload_hook
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // ── Internal helpers ─────────────────────────────────────────────

    fn insert(&mut self, node: HostNode) -> Handle {
        let handle = self.nodes.insert(node);
        self.children.insert(handle, Vec::new());
        handle
    }

    fn element_mut(&mut self, handle: Handle) -> Option<&mut Element> {
        match self.nodes.get_mut(handle) {
            Some(HostNode::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Detach `node` from its parent's children list.
    fn detach(&mut self, node: Handle) {
        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
        }
    }

    /// Remove a node and all its descendants from the arena.
    fn remove_subtree(&mut self, handle: Handle) {
        self.detach(handle);
        let mut to_remove = VecDeque::new();
        to_remove.push_back(handle);
        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            self.nodes.remove(current);
        }
    }

    /// Detach every child of `parent`; text nodes are freed.
    fn clear_children(&mut self, parent: Handle) {
        let kids = self
            .children
            .get_mut(parent)
            .map(std::mem::take)
            .unwrap_or_default();
        for kid in kids {
            self.parent.remove(kid);
            if matches!(self.nodes.get(kid), Some(HostNode::Text(_))) {
                self.remove_subtree(kid);
            }
        }
    }

    fn attach(&mut self, parent: Handle, child: Handle) {
        debug_assert!(self.nodes.contains_key(parent), "parent handle does not exist");
        debug_assert!(self.nodes.contains_key(child), "child handle does not exist");
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        self.detach(child);
        self.parent.insert(child, parent);
        if let Some(kids) = self.children.get_mut(parent) {
            kids.push(child);
        }
    }
}

impl Host for MemoryHost {
    fn create_handle(&mut self, tag: &str) -> Handle {
        self.mutations += 1;
        self.insert(HostNode::Element(Element::new(tag)))
    }

    fn destroy_handle(&mut self, handle: Handle) {
        if self.nodes.contains_key(handle) {
            self.mutations += 1;
            self.remove_subtree(handle);
        }
    }

    fn set_attribute(&mut self, handle: Handle, name: &str, value: &str) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(handle) {
            element.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn remove_attribute(&mut self, handle: Handle, name: &str) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(handle) {
            element.attributes.remove(name);
        }
    }

    fn attribute(&self, handle: Handle, name: &str) -> Option<String> {
        self.element(handle)
            .and_then(|e| e.attributes.get(name))
            .cloned()
    }

    fn set_style(&mut self, handle: Handle, property: &str, value: Option<&str>) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(handle) {
            match value {
                Some(value) => {
                    element.styles.insert(property.to_owned(), value.to_owned());
                }
                None => {
                    element.styles.remove(property);
                }
            }
        }
    }

    fn set_text(&mut self, handle: Handle, text: &str) {
        self.mutations += 1;
        if self.element(handle).is_none() {
            return;
        }
        self.clear_children(handle);
        let node = self.insert(HostNode::Text(text.to_owned()));
        self.attach(handle, node);
    }

    fn append_text(&mut self, handle: Handle, text: &str) {
        self.mutations += 1;
        if self.element(handle).is_none() {
            return;
        }
        let node = self.insert(HostNode::Text(text.to_owned()));
        self.attach(handle, node);
    }

    fn append_child(&mut self, parent: Handle, child: Handle) {
        self.mutations += 1;
        self.attach(parent, child);
    }

    fn remove_child(&mut self, parent: Handle, child: Handle) {
        self.mutations += 1;
        if self.parent.get(child) == Some(&parent) {
            self.detach(child);
        }
    }

    fn replace_children(&mut self, parent: Handle, children: &[Handle]) {
        self.mutations += 1;
        self.clear_children(parent);
        for &child in children {
            self.attach(parent, child);
        }
    }

    fn value(&self, handle: Handle) -> String {
        self.element(handle)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, handle: Handle, value: &str) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(handle) {
            element.value = value.to_owned();
        }
    }

    fn mount_root(&mut self, handle: Handle, mount_point: &str) -> Result<(), HostError> {
        let anchor = self
            .mount_point(mount_point)
            .ok_or_else(|| HostError::MissingMountPoint(mount_point.to_owned()))?;
        self.replace_children(anchor, &[handle]);
        Ok(())
    }

    fn register_unload_hook(&mut self) {
        self.unload_hook = true;
    }

    fn bind_event(&mut self, handle: Handle, listener: Listener) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(handle) {
            if !element.listeners.contains(&listener) {
                element.listeners.push(listener);
            }
        }
    }

    fn unbind_event(&mut self, handle: Handle, listener: &Listener) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(handle) {
            element.listeners.retain(|l| l != listener);
        }
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.dark_scheme
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Map-backed [`Storage`], standing in for browser session storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn clear(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
