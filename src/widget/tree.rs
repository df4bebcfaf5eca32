//! The widget tree: an arena of [`WidgetNode`]s plus the identity allocator.
//!
//! Nodes live in a `SlotMap` keyed by [`NodeKey`]. A composite owns the
//! ordered list of its children's keys; a child's `parent` is a plain key
//! used for lookups only and is never walked by capture. Identities are
//! indexed in a side map so event targets resolve in O(1).
//!
//! The capture/restore protocol is split into the steps that
//! [`serializer`](crate::serializer) orchestrates:
//!
//! 1. [`capture`](WidgetTree::capture) pulls drifted host state back into
//!    properties, depth-first.
//! 2. [`snapshot`](WidgetTree::snapshot) builds the structural record,
//!    excluding non-persistable fields.
//! 3. [`insert_record`](WidgetTree::insert_record) repopulates fields into a
//!    fresh tree without touching the host.
//! 4. [`recreate_handles`](WidgetTree::recreate_handles) allocates elements,
//!    children before parents.
//! 5. [`reconcile_identity_and_attach`](WidgetTree::reconcile_identity_and_attach)
//!    advances the allocator and splices child elements under their parents.

use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::{debug, warn};

use super::kind::WidgetKind;
use super::lifecycle::Lifecycle;
use super::node::{Handles, NodeKey, WidgetNode};
use super::render;
use super::schema::Render;
use super::value::Value;
use crate::error::{RestoreError, SnapshotError};
use crate::event::Handler;
use crate::host::{Host, Listener};
use crate::id::{IdAllocator, WidgetId};
use crate::snapshot::NodeRecord;

/// Class marking a widget as rendered in dark mode.
pub const DARK_MODE_CLASS: &str = "inverted";

/// Arena of widgets with their identity allocator.
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: SlotMap<NodeKey, WidgetNode>,
    live: HashMap<WidgetId, NodeKey>,
    ids: IdAllocator,
    root: Option<NodeKey>,
}

impl WidgetTree {
    /// Create an empty tree with a fresh allocator.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub fn node(&self, key: NodeKey) -> Option<&WidgetNode> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    /// Key of the node with identity `id`, anywhere in the arena.
    pub fn key_of(&self, id: WidgetId) -> Option<NodeKey> {
        self.live.get(&id).copied()
    }

    pub fn id(&self, key: NodeKey) -> WidgetId {
        self.nodes[key].id
    }

    pub fn kind(&self, key: NodeKey) -> WidgetKind {
        self.nodes[key].kind
    }

    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// Bind `key` as the root of the tree.
    pub fn set_root(&mut self, key: NodeKey) {
        let node = &mut self.nodes[key];
        node.set_lifecycle(Lifecycle::Attached);
        self.root = Some(key);
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    /// Children in order. Empty for leaves and unknown keys.
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// `start` and every descendant, depth-first, children in order. The
    /// sequence is lazy and can be re-walked as long as the tree is unchanged.
    pub fn descendants(&self, start: NodeKey) -> Descendants<'_> {
        let stack = if self.contains(start) { vec![start] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Call `f` for `start` and every descendant in depth-first order.
    pub fn for_each_descendant(&self, start: NodeKey, mut f: impl FnMut(NodeKey, &WidgetNode)) {
        for key in self.descendants(start) {
            f(key, &self.nodes[key]);
        }
    }

    /// First node in `start`'s subtree, depth-first, whose identity is `id`.
    pub fn find_by_id(&self, start: NodeKey, id: WidgetId) -> Option<NodeKey> {
        self.descendants(start).find(|&key| self.nodes[key].id == id)
    }

    fn kind_of(&self, id: WidgetId) -> Option<WidgetKind> {
        self.key_of(id).map(|key| self.nodes[key].kind)
    }

    fn is_ancestor_or_self(&self, candidate: NodeKey, of: NodeKey) -> bool {
        let mut current = Some(of);
        while let Some(key) = current {
            if key == candidate {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    // ── Construction ─────────────────────────────────────────────────

    /// Create a widget of `kind` with a fresh identity and live handles.
    ///
    /// # Panics
    ///
    /// Panics if the allocator issues an identity that is already live,
    /// which means a restore skipped `reconcile_identity_and_attach`.
    pub fn create(&mut self, host: &mut dyn Host, kind: WidgetKind) -> NodeKey {
        let id = self.ids.next_id();
        assert!(
            !self.live.contains_key(&id),
            "identity {id} issued twice; allocator was not advanced past a restored tree"
        );
        let key = self.nodes.insert(WidgetNode::new(id, kind));
        self.live.insert(id, key);
        self.build_handles(host, key);
        key
    }

    /// Allocate elements for one node and render every property onto them.
    fn build_handles(&mut self, host: &mut dyn Host, key: NodeKey) {
        let (id, kind) = {
            let node = &self.nodes[key];
            (node.id, node.kind)
        };
        let outer = host.create_handle(kind.tag());
        render::structure(host, id, kind, outer);
        let inner = (kind == WidgetKind::TextInput).then(|| render::inner_input(host, id, kind, outer));
        let icon = (kind == WidgetKind::Button).then(|| render::icon_element(host, id));
        self.nodes[key].handles = Some(Handles { outer, inner, icon });

        self.render_all(host, key);
        self.bind_handlers(host, key);
    }

    fn render_all(&self, host: &mut dyn Host, key: NodeKey) {
        let node = &self.nodes[key];
        let lookup = |id| self.kind_of(id);
        let mut content_rendered = false;
        for spec in node.kind.properties() {
            // Button text and icon share one render pass.
            if spec.render == Render::ButtonContent && std::mem::replace(&mut content_rendered, true) {
                continue;
            }
            render::apply(host, node, spec, &lookup);
        }
    }

    fn bind_handlers(&self, host: &mut dyn Host, key: NodeKey) {
        let node = &self.nodes[key];
        let outer = node.live_handles().outer;
        for event in node.handlers.keys() {
            host.bind_event(outer, Listener::new(node.id, *event));
        }
    }

    // ── Properties ───────────────────────────────────────────────────

    /// Current value of a property.
    pub fn get(&self, key: NodeKey, name: &str) -> Option<&Value> {
        self.nodes.get(key).and_then(|n| n.get(name))
    }

    /// Live value of a text input, read from its inner element.
    pub fn live_value(&self, host: &dyn Host, key: NodeKey) -> String {
        let handles = self.nodes[key].live_handles();
        host.value(handles.focus())
    }

    /// Set a property and re-render it if the value changed. Returns whether
    /// anything was rendered.
    ///
    /// Integer entries of track lists are normalised to pixels before the
    /// comparison. A text input's `value` is compared against the live value.
    ///
    /// # Panics
    ///
    /// Panics if the kind has no such property or the value has the wrong
    /// shape.
    pub fn set(&mut self, host: &mut dyn Host, key: NodeKey, name: &str, value: impl Into<Value>) -> bool {
        let node = &self.nodes[key];
        let spec = node
            .kind
            .property(name)
            .unwrap_or_else(|| panic!("{} has no property `{name}`", node.kind.name()));
        let mut value = value.into();
        assert!(
            spec.shape.accepts(&value),
            "{value:?} is not a valid `{name}` for {}",
            node.kind.name()
        );

        if let (Render::Tracks(_), Value::List(tracks)) = (spec.render, &value) {
            value = Value::List(tracks.iter().map(|t| render::normalize_track(t)).collect());
        }
        if spec.render == Render::InputValue {
            let live = self.live_value(host, key);
            self.nodes[key].props.insert(spec.name, Value::Text(live));
        }
        if spec.render == Render::Classes {
            let live = self.live_classes(host, key);
            self.nodes[key].props.insert(spec.name, Value::List(live));
        }

        let node = &mut self.nodes[key];
        if node.props.get(spec.name) == Some(&value) {
            return false;
        }
        node.props.insert(spec.name, value);

        let node = &self.nodes[key];
        let lookup = |id| self.kind_of(id);
        render::apply(host, node, spec, &lookup);
        true
    }

    /// Put `handler` in the slot for `event`, or clear it with `None`. The
    /// previous listener is unbound before the new one is bound.
    ///
    /// # Panics
    ///
    /// Panics if the kind has no handler slot for `event`.
    pub fn set_handler(
        &mut self,
        host: &mut dyn Host,
        key: NodeKey,
        event: &str,
        handler: Option<Handler>,
    ) -> bool {
        let node = &mut self.nodes[key];
        let spec = node
            .kind
            .handler(event)
            .unwrap_or_else(|| panic!("{} has no `{event}` handler", node.kind.name()));
        if node.handlers.get(spec.event) == handler.as_ref() {
            return false;
        }

        let listener = Listener::new(node.id, spec.event);
        let outer = node.live_handles().outer;
        if node.handlers.remove(spec.event).is_some() {
            host.unbind_event(outer, &listener);
        }
        if let Some(handler) = handler {
            node.handlers.insert(spec.event, handler);
            host.bind_event(outer, listener);
        }
        true
    }

    /// Class list as the host renders it now, including classes added
    /// outside the toolkit. Nodes without handles report the stored list.
    fn live_classes(&self, host: &dyn Host, key: NodeKey) -> Vec<String> {
        let node = &self.nodes[key];
        match node.handles {
            Some(handles) => host.class_list(handles.outer),
            None => node.classes().to_vec(),
        }
    }

    /// Add `class` to the live class list. Returns whether it was missing.
    pub fn add_class(&mut self, host: &mut dyn Host, key: NodeKey, class: &str) -> bool {
        let mut classes = self.live_classes(host, key);
        if classes.iter().any(|c| c == class) {
            return false;
        }
        classes.push(class.to_owned());
        self.set(host, key, "classes", classes)
    }

    /// Remove `class` from the live class list. Returns whether it was there.
    pub fn remove_class(&mut self, host: &mut dyn Host, key: NodeKey, class: &str) -> bool {
        let mut classes = self.live_classes(host, key);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() == before {
            return false;
        }
        self.set(host, key, "classes", classes)
    }

    pub fn is_dark_mode(&self, key: NodeKey) -> bool {
        self.nodes[key].classes().iter().any(|c| c == DARK_MODE_CLASS)
    }

    /// Toggle dark mode on `key` and every descendant.
    pub fn set_dark_mode(&mut self, host: &mut dyn Host, key: NodeKey, dark: bool) {
        let keys: Vec<_> = self.descendants(key).collect();
        for key in keys {
            if dark {
                self.add_class(host, key, DARK_MODE_CLASS);
            } else {
                self.remove_class(host, key, DARK_MODE_CLASS);
            }
        }
    }

    // ── Children ─────────────────────────────────────────────────────

    /// Append `child` to `parent`, detaching it from any previous parent.
    ///
    /// Returns `false` without changing anything if `child` is already a
    /// child of `parent`, is the root, or is `parent` or one of its ancestors.
    /// The child inherits the parent's dark mode. A panel or grid added to a
    /// grid scrolls and is capped at the cell size.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a composite.
    pub fn add_child(&mut self, host: &mut dyn Host, parent: NodeKey, child: NodeKey) -> bool {
        let parent_kind = self.nodes[parent].kind;
        assert!(parent_kind.is_composite(), "{} cannot hold children", parent_kind.name());

        if self.nodes[child].parent == Some(parent) {
            warn!(parent = %self.id(parent), child = %self.id(child), "child already attached");
            return false;
        }
        if self.root == Some(child) || self.is_ancestor_or_self(child, parent) {
            warn!(parent = %self.id(parent), child = %self.id(child), "attach would create a cycle");
            return false;
        }
        if let Some(old) = self.nodes[child].parent {
            self.detach_child(host, old, child);
        }

        if parent_kind == WidgetKind::Grid && self.nodes[child].kind.is_composite() {
            host.set_style(self.nodes[child].live_handles().outer, "overflow", Some("auto"));
            self.set(host, child, "max_width", "100%");
            self.set(host, child, "max_height", "100%");
        }

        self.nodes[child].parent = Some(parent);
        let dark = self.is_dark_mode(parent);
        self.set_dark_mode(host, child, dark);

        let parent_outer = self.nodes[parent].live_handles().outer;
        let child_outer = self.nodes[child].live_handles().outer;
        host.append_child(parent_outer, child_outer);
        self.nodes[parent].children.push(child);
        self.nodes[child].set_lifecycle(Lifecycle::Attached);
        true
    }

    pub fn add_children(&mut self, host: &mut dyn Host, parent: NodeKey, children: &[NodeKey]) {
        for &child in children {
            self.add_child(host, parent, child);
        }
    }

    /// Take `child` out of `parent` but keep it alive so it can be attached
    /// elsewhere.
    pub fn detach_child(&mut self, host: &mut dyn Host, parent: NodeKey, child: NodeKey) -> bool {
        let Some(pos) = self.nodes[parent].children.iter().position(|&c| c == child) else {
            return false;
        };
        self.nodes[parent].children.remove(pos);
        let parent_outer = self.nodes[parent].live_handles().outer;
        let child_outer = self.nodes[child].live_handles().outer;
        host.remove_child(parent_outer, child_outer);

        let node = &mut self.nodes[child];
        node.parent = None;
        node.set_lifecycle(Lifecycle::Unattached);
        true
    }

    /// Remove `child` from `parent` and destroy it with its whole subtree.
    pub fn remove_child(&mut self, host: &mut dyn Host, parent: NodeKey, child: NodeKey) -> bool {
        if !self.detach_child(host, parent, child) {
            return false;
        }
        self.discard(host, child);
        true
    }

    /// Detach every child of `parent`. The children stay alive.
    pub fn remove_all_children(&mut self, host: &mut dyn Host, parent: NodeKey) {
        let outer = self.nodes[parent].live_handles().outer;
        host.replace_children(outer, &[]);
        for child in std::mem::take(&mut self.nodes[parent].children) {
            let node = &mut self.nodes[child];
            node.parent = None;
            node.set_lifecycle(Lifecycle::Unattached);
        }
    }

    /// Destroy `key` and its subtree: elements released, identities retired.
    pub fn discard(&mut self, host: &mut dyn Host, key: NodeKey) {
        if let Some(parent) = self.parent(key) {
            self.nodes[parent].children.retain(|&c| c != key);
        }
        if let Some(handles) = self.nodes[key].handles {
            host.destroy_handle(handles.outer);
        }
        let keys: Vec<_> = self.descendants(key).collect();
        for key in keys {
            if let Some(mut node) = self.nodes.remove(key) {
                // A detached icon is not under the outer element.
                if let Some(icon) = node.handles.and_then(|h| h.icon) {
                    host.destroy_handle(icon);
                }
                node.set_lifecycle(Lifecycle::Destroyed);
                self.live.remove(&node.id);
            }
        }
        if self.root == Some(key) {
            self.root = None;
        }
    }

    /// Lay out a grid from rows of cells. The grid's children are replaced
    /// by the widgets named in `areas` (each once, in reading order) and
    /// empty cells render as `.`.
    pub fn set_areas(&mut self, host: &mut dyn Host, grid: NodeKey, areas: &[Vec<Option<NodeKey>>]) {
        self.remove_all_children(host, grid);
        let mut rows = Vec::with_capacity(areas.len());
        for line in areas {
            let mut cells = Vec::with_capacity(line.len());
            for cell in line {
                match *cell {
                    Some(child) => {
                        if !self.nodes[grid].children.contains(&child) {
                            self.add_child(host, grid, child);
                        }
                        // Rejected cells (the grid or an ancestor) stay empty.
                        if self.nodes[grid].children.contains(&child) {
                            cells.push(self.id(child).to_string());
                        } else {
                            cells.push(".".to_owned());
                        }
                    }
                    None => cells.push(".".to_owned()),
                }
            }
            rows.push(format!("\"{}\"", cells.join(" ")));
        }
        self.set(host, grid, "areas", rows.join(" "));
    }

    // ── Capture ──────────────────────────────────────────────────────

    /// Pull host-side state that can drift back into properties: the class
    /// list (classes added outside the toolkit) and a text input's live
    /// value. Visits `key` and its descendants depth-first. Calling it
    /// again without host changes leaves every property as it was.
    pub fn capture(&mut self, host: &dyn Host, key: NodeKey) {
        let keys: Vec<_> = self.descendants(key).collect();
        for key in keys {
            let node = &mut self.nodes[key];
            let Some(handles) = node.handles else {
                continue;
            };
            let classes = host.class_list(handles.outer);
            if !classes.is_empty() {
                node.props.insert("classes", Value::List(classes));
            }
            if node.kind == WidgetKind::TextInput {
                node.props.insert("value", Value::Text(host.value(handles.focus())));
            }
            node.set_lifecycle(Lifecycle::Captured);
        }
        debug!(root = %self.id(key), "captured subtree");
    }

    /// Structural record of `key`'s subtree with non-persistable fields
    /// excluded.
    pub fn snapshot(&self, key: NodeKey) -> Result<NodeRecord, SnapshotError> {
        let node = &self.nodes[key];
        let children = node
            .children
            .iter()
            .map(|&child| self.snapshot(child))
            .collect::<Result<Vec<_>, _>>()?;
        let mut state = node.state();
        node.exclude_non_persistable(&mut state);
        NodeRecord::from_state(node.kind, node.id, state, children)
    }

    // ── Restore ──────────────────────────────────────────────────────

    /// Populate a subtree from a record without touching the host. Nodes
    /// are left `Detached`: fields set, no handles, no parent links, and
    /// the allocator not yet advanced.
    pub fn insert_record(&mut self, record: &NodeRecord) -> Result<NodeKey, RestoreError> {
        let kind = WidgetKind::from_name(&record.kind)
            .ok_or_else(|| RestoreError::UnknownKind(record.kind.clone()))?;
        let id: WidgetId = record.id.parse()?;
        if self.live.contains_key(&id) {
            return Err(RestoreError::DuplicateId(record.id.clone()));
        }
        if !kind.is_composite() && !record.children.is_empty() {
            return Err(RestoreError::UnexpectedChildren(record.id.clone()));
        }

        let mut node = WidgetNode::new(id, kind);
        node.lifecycle = Lifecycle::Detached;
        for (name, value) in &record.fields {
            let field_type = || RestoreError::FieldType {
                widget: record.id.clone(),
                field: name.clone(),
            };
            if let Some(spec) = kind.handlers().iter().find(|h| h.field == name.as_str()) {
                let Value::Handler(registered) = value else {
                    return Err(field_type());
                };
                node.handlers.insert(spec.event, Handler::Named(registered.clone()));
            } else if let Some(spec) = kind.property(name) {
                if !spec.shape.accepts(value) {
                    return Err(field_type());
                }
                node.props.insert(spec.name, value.clone());
            } else {
                warn!(widget = %id, field = %name, "ignoring unknown snapshot field");
            }
        }

        let key = self.nodes.insert(node);
        self.live.insert(id, key);
        for child in &record.children {
            let child_key = self.insert_record(child)?;
            self.nodes[key].children.push(child_key);
        }
        Ok(key)
    }

    /// Allocate fresh elements for `key`'s subtree, children before their
    /// parent, re-rendering every property and re-binding named handlers.
    pub fn recreate_handles(&mut self, host: &mut dyn Host, key: NodeKey) {
        for child in self.nodes[key].children.clone() {
            self.recreate_handles(host, child);
        }
        self.build_handles(host, key);
        self.nodes[key].set_lifecycle(Lifecycle::Reattached);
    }

    /// Advance the allocator past every identity in `key`'s subtree and
    /// splice each child's element under its parent's, restoring parent
    /// links on the way.
    ///
    /// # Panics
    ///
    /// Panics if a node has no handle, i.e. `recreate_handles` did not run.
    pub fn reconcile_identity_and_attach(&mut self, host: &mut dyn Host, key: NodeKey) {
        self.ids.advance_past(self.nodes[key].id);
        let outer = self.nodes[key]
            .handles
            .expect("handles are recreated before attach")
            .outer;
        for child in self.nodes[key].children.clone() {
            self.reconcile_identity_and_attach(host, child);
            let child_outer = self.nodes[child]
                .handles
                .expect("child handles are recreated before attach")
                .outer;
            host.append_child(outer, child_outer);
            self.nodes[child].parent = Some(key);
        }
    }
}

/// Lazy depth-first iterator over a subtree. See [`WidgetTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a WidgetTree,
    stack: Vec<NodeKey>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        self.stack.extend(self.tree.children(key).iter().rev());
        Some(key)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    /// Build a small tree:
    /// ```text
    ///        root (Panel)
    ///       /    \
    ///   form      title (Label)
    ///  (Panel)
    ///   /   \
    /// input  add (Button)
    /// ```
    struct Fixture {
        host: MemoryHost,
        tree: WidgetTree,
        root: NodeKey,
        form: NodeKey,
        title: NodeKey,
        input: NodeKey,
        add: NodeKey,
    }

    fn build_tree() -> Fixture {
        let mut host = MemoryHost::new().with_mount_point("app");
        let mut tree = WidgetTree::new();
        let root = tree.create(&mut host, WidgetKind::Panel);
        tree.set_root(root);
        let form = tree.create(&mut host, WidgetKind::Panel);
        let title = tree.create(&mut host, WidgetKind::Label);
        let input = tree.create(&mut host, WidgetKind::TextInput);
        let add = tree.create(&mut host, WidgetKind::Button);
        tree.add_children(&mut host, root, &[form, title]);
        tree.add_children(&mut host, form, &[input, add]);
        Fixture {
            host,
            tree,
            root,
            form,
            title,
            input,
            add,
        }
    }

    fn outer(tree: &WidgetTree, key: NodeKey) -> crate::host::Handle {
        tree.node(key).unwrap().handles().unwrap().outer
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn create_issues_sequential_identities() {
        let f = build_tree();
        let ids: Vec<_> = [f.root, f.form, f.title, f.input, f.add]
            .iter()
            .map(|&k| f.tree.id(k).to_string())
            .collect();
        assert_eq!(ids, ["e1", "e2", "e3", "e4", "e5"]);
        assert_eq!(f.tree.allocator().last_ordinal(), 5);
    }

    #[test]
    fn create_renders_identity_and_structure() {
        let f = build_tree();
        let root = outer(&f.tree, f.root);
        assert_eq!(f.host.attribute(root, "id").as_deref(), Some("e1"));
        assert_eq!(f.host.style(root, "grid-area"), Some("e1"));
        assert_eq!(f.host.style(root, "display"), Some("flex"));
        assert_eq!(f.host.style(root, "flex-direction"), Some("row"));
        assert_eq!(f.host.attribute(root, "class").as_deref(), Some("Panel ui"));
    }

    #[test]
    fn text_input_has_inner_element() {
        let f = build_tree();
        let handles = f.tree.node(f.input).unwrap().handles().unwrap();
        let inner = handles.inner.unwrap();
        assert_eq!(f.host.tag(inner), Some("input"));
        assert_eq!(f.host.attribute(inner, "id").as_deref(), Some("e4_input"));
        assert_eq!(f.host.attribute(inner, "type").as_deref(), Some("text"));
        assert_eq!(f.host.parent_of(inner), Some(handles.outer));
    }

    // ── Properties ───────────────────────────────────────────────────

    #[test]
    fn setting_the_same_value_renders_once() {
        let mut f = build_tree();
        let before = f.host.mutation_count();
        assert!(f.tree.set(&mut f.host, f.title, "text", "x"));
        let after_first = f.host.mutation_count();
        assert!(!f.tree.set(&mut f.host, f.title, "text", "x"));
        assert_eq!(after_first - before, 1);
        assert_eq!(f.host.mutation_count(), after_first);
    }

    #[test]
    fn dimensions_render_pixels_or_text() {
        let mut f = build_tree();
        f.tree.set(&mut f.host, f.form, "width", 120);
        f.tree.set(&mut f.host, f.form, "height", "50%");
        let form = outer(&f.tree, f.form);
        assert_eq!(f.host.style(form, "width"), Some("120px"));
        assert_eq!(f.host.style(form, "height"), Some("50%"));
        f.tree.set(&mut f.host, f.form, "width", Value::Null);
        assert_eq!(f.host.style(form, "width"), None);
    }

    #[test]
    fn text_input_value_compares_against_live_value() {
        let mut f = build_tree();
        let inner = f.tree.node(f.input).unwrap().handles().unwrap().focus();
        f.host.type_text(inner, "typed");
        assert!(!f.tree.set(&mut f.host, f.input, "value", "typed"));
        assert!(f.tree.set(&mut f.host, f.input, "value", "other"));
        assert_eq!(f.tree.live_value(&f.host, f.input), "other");
    }

    #[test]
    fn integer_tracks_are_normalised() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let grid = tree.create(&mut host, WidgetKind::Grid);
        tree.set(&mut host, grid, "columns", Value::from(&["100", "50%", "50%"][..]));
        assert_eq!(
            tree.get(grid, "columns"),
            Some(&Value::from(&["100px", "50%", "50%"][..]))
        );
        assert_eq!(
            host.style(outer(&tree, grid), "grid-template-columns"),
            Some("100px calc(50% - 50px) calc(50% - 50px)")
        );
        assert!(!tree.set(&mut host, grid, "columns", Value::from(&["100px", "50%", "50%"][..])));
    }

    #[test]
    fn label_for_points_at_inner_input() {
        let mut f = build_tree();
        let target = f.tree.id(f.input).to_string();
        f.tree.set(&mut f.host, f.title, "for", target);
        assert_eq!(
            f.host.attribute(outer(&f.tree, f.title), "for").as_deref(),
            Some("e4_input")
        );
        f.tree.set(&mut f.host, f.title, "for", "e5");
        assert_eq!(f.host.attribute(outer(&f.tree, f.title), "for").as_deref(), Some("e5"));
    }

    #[test]
    fn button_icon_precedes_text() {
        let mut f = build_tree();
        f.tree.set(&mut f.host, f.add, "text", "Add");
        f.tree.set(&mut f.host, f.add, "icon", "plus");
        let button = outer(&f.tree, f.add);
        let icon = f.host.children_of(button)[0];
        assert_eq!(f.host.attribute(icon, "class").as_deref(), Some("icon plus"));
        assert_eq!(f.host.attribute(icon, "id").as_deref(), Some("e5_i"));
        assert_eq!(f.host.text_content(button), " Add");
    }

    #[test]
    #[should_panic(expected = "has no property")]
    fn unknown_property_panics() {
        let mut f = build_tree();
        f.tree.set(&mut f.host, f.title, "columns", Value::Null);
    }

    // ── Handlers ─────────────────────────────────────────────────────

    #[test]
    fn handler_binds_listener_once() {
        let mut f = build_tree();
        assert!(f.tree.set_handler(&mut f.host, f.add, "click", Some(Handler::named("add"))));
        assert!(!f.tree.set_handler(&mut f.host, f.add, "click", Some(Handler::named("add"))));
        let button = outer(&f.tree, f.add);
        assert_eq!(f.host.listeners(button), [Listener::new(f.tree.id(f.add), "click")]);

        assert!(f.tree.set_handler(&mut f.host, f.add, "click", None));
        assert!(f.host.listeners(button).is_empty());
    }

    // ── Children ─────────────────────────────────────────────────────

    #[test]
    fn children_keep_order_and_parent_links() {
        let f = build_tree();
        assert_eq!(f.tree.children(f.root), [f.form, f.title]);
        assert_eq!(f.tree.children(f.form), [f.input, f.add]);
        assert_eq!(f.tree.parent(f.add), Some(f.form));
        assert_eq!(
            f.host.children_of(outer(&f.tree, f.form)),
            [outer(&f.tree, f.input), outer(&f.tree, f.add)]
        );
    }

    #[test]
    fn duplicate_attach_is_rejected() {
        let mut f = build_tree();
        assert!(!f.tree.add_child(&mut f.host, f.form, f.add));
        assert_eq!(f.tree.children(f.form), [f.input, f.add]);
    }

    #[test]
    fn cyclic_attach_is_rejected() {
        let mut f = build_tree();
        assert!(!f.tree.add_child(&mut f.host, f.form, f.root));
        assert!(!f.tree.add_child(&mut f.host, f.form, f.form));
        assert_eq!(f.tree.children(f.root), [f.form, f.title]);
    }

    #[test]
    fn reparenting_detaches_first() {
        let mut f = build_tree();
        assert!(f.tree.add_child(&mut f.host, f.root, f.add));
        assert_eq!(f.tree.children(f.form), [f.input]);
        assert_eq!(f.tree.children(f.root), [f.form, f.title, f.add]);
        assert_eq!(f.tree.parent(f.add), Some(f.root));
        assert_eq!(f.host.parent_of(outer(&f.tree, f.add)), Some(outer(&f.tree, f.root)));
    }

    #[test]
    fn remove_child_destroys_subtree() {
        let mut f = build_tree();
        let form_outer = outer(&f.tree, f.form);
        assert!(f.tree.remove_child(&mut f.host, f.root, f.form));
        assert!(!f.tree.contains(f.form));
        assert!(!f.tree.contains(f.input));
        assert!(!f.host.contains(form_outer));
        assert_eq!(f.tree.key_of(WidgetId::from_ordinal(4)), None);
        assert_eq!(f.tree.children(f.root), [f.title]);
        assert!(!f.tree.remove_child(&mut f.host, f.root, f.form));
    }

    #[test]
    fn remove_all_children_keeps_them_alive() {
        let mut f = build_tree();
        f.tree.remove_all_children(&mut f.host, f.form);
        assert!(f.tree.children(f.form).is_empty());
        assert_eq!(f.tree.parent(f.input), None);
        assert_eq!(f.tree.node(f.input).unwrap().lifecycle(), Lifecycle::Unattached);
        assert!(f.host.children_of(outer(&f.tree, f.form)).is_empty());
    }

    #[test]
    fn find_by_id_searches_depth_first() {
        let f = build_tree();
        assert_eq!(f.tree.find_by_id(f.root, WidgetId::from_ordinal(5)), Some(f.add));
        assert_eq!(f.tree.find_by_id(f.root, WidgetId::from_ordinal(1)), Some(f.root));
        assert_eq!(f.tree.find_by_id(f.form, WidgetId::from_ordinal(3)), None);
        assert_eq!(f.tree.find_by_id(f.root, WidgetId::from_ordinal(99)), None);
    }

    #[test]
    fn descendants_are_lazy_and_restartable() {
        let f = build_tree();
        let first: Vec<_> = f.tree.descendants(f.root).collect();
        let second: Vec<_> = f.tree.descendants(f.root).collect();
        assert_eq!(first, [f.root, f.form, f.input, f.add, f.title]);
        assert_eq!(first, second);
        assert_eq!(f.tree.descendants(f.root).take(2).count(), 2);

        let mut visited = 0;
        f.tree.for_each_descendant(f.form, |_, _| visited += 1);
        assert_eq!(visited, 3);
    }

    #[test]
    fn dark_mode_propagates_and_is_inherited() {
        let mut f = build_tree();
        f.tree.set_dark_mode(&mut f.host, f.root, true);
        assert!(f.tree.is_dark_mode(f.add));
        assert!(f.host.has_class(outer(&f.tree, f.add), DARK_MODE_CLASS));

        let late = f.tree.create(&mut f.host, WidgetKind::Label);
        assert!(!f.tree.is_dark_mode(late));
        f.tree.add_child(&mut f.host, f.form, late);
        assert!(f.tree.is_dark_mode(late));

        f.tree.set_dark_mode(&mut f.host, f.root, false);
        assert!(!f.tree.is_dark_mode(late));
    }

    #[test]
    fn dark_mode_keeps_external_classes_through_capture() {
        let mut f = build_tree();
        let title = outer(&f.tree, f.title);
        f.host.add_external_class(title, "highlight");

        f.tree.set_dark_mode(&mut f.host, f.root, true);
        assert_eq!(f.host.class_list(title), ["Label", "ui", "highlight", DARK_MODE_CLASS]);

        f.tree.capture(&f.host, f.root);
        assert_eq!(
            f.tree.get(f.title, "classes"),
            Some(&Value::List(vec![
                "Label".into(),
                "ui".into(),
                "highlight".into(),
                DARK_MODE_CLASS.into()
            ]))
        );

        f.tree.set_dark_mode(&mut f.host, f.root, false);
        assert_eq!(f.host.class_list(title), ["Label", "ui", "highlight"]);
    }

    #[test]
    fn set_areas_leaves_rejected_cells_empty() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let outer_grid = tree.create(&mut host, WidgetKind::Grid);
        let grid = tree.create(&mut host, WidgetKind::Grid);
        let a = tree.create(&mut host, WidgetKind::Label);
        tree.add_child(&mut host, outer_grid, grid);

        tree.set_areas(&mut host, grid, &[vec![Some(a), Some(grid)], vec![Some(outer_grid), None]]);

        assert_eq!(tree.children(grid), &[a]);
        assert_eq!(
            host.style(outer(&tree, grid), "grid-template-areas"),
            Some("\"e3 .\" \". .\"")
        );
    }

    #[test]
    fn composites_added_to_grid_are_capped() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let grid = tree.create(&mut host, WidgetKind::Grid);
        let panel = tree.create(&mut host, WidgetKind::Panel);
        let label = tree.create(&mut host, WidgetKind::Label);
        tree.add_children(&mut host, grid, &[panel, label]);
        let panel_outer = outer(&tree, panel);
        assert_eq!(host.style(panel_outer, "overflow"), Some("auto"));
        assert_eq!(host.style(panel_outer, "max-width"), Some("100%"));
        assert_eq!(host.style(outer(&tree, label), "overflow"), None);
    }

    #[test]
    fn set_areas_replaces_children_and_renders_template() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let grid = tree.create(&mut host, WidgetKind::Grid);
        let a = tree.create(&mut host, WidgetKind::Label);
        let b = tree.create(&mut host, WidgetKind::Button);
        let stray = tree.create(&mut host, WidgetKind::Label);
        tree.add_child(&mut host, grid, stray);

        tree.set_areas(&mut host, grid, &[vec![Some(a), Some(a)], vec![None, Some(b)]]);
        assert_eq!(tree.children(grid), [a, b]);
        assert_eq!(tree.parent(stray), None);
        assert_eq!(
            host.style(outer(&tree, grid), "grid-template-areas"),
            Some(r#""e2 e2" ". e3""#)
        );
    }

    // ── Capture / restore steps ──────────────────────────────────────

    #[test]
    fn capture_pulls_live_state() {
        let mut f = build_tree();
        let handles = f.tree.node(f.input).unwrap().handles().unwrap();
        f.host.type_text(handles.focus(), "Buy milk");
        f.host.add_external_class(outer(&f.tree, f.title), "highlight");

        f.tree.capture(&f.host, f.root);
        assert_eq!(f.tree.get(f.input, "value"), Some(&Value::from("Buy milk")));
        assert_eq!(
            f.tree.get(f.title, "classes"),
            Some(&Value::from(&["Label", "ui", "highlight"][..]))
        );
        assert_eq!(f.tree.node(f.add).unwrap().lifecycle(), Lifecycle::Captured);
    }

    #[test]
    fn capture_is_idempotent() {
        let mut f = build_tree();
        f.tree.capture(&f.host, f.root);
        let first = f.tree.snapshot(f.root).unwrap();
        f.tree.capture(&f.host, f.root);
        assert_eq!(f.tree.snapshot(f.root).unwrap(), first);
    }

    #[test]
    fn snapshot_preserves_structure() {
        let f = build_tree();
        let record = f.tree.snapshot(f.root).unwrap();
        let ids: Vec<_> = record.walk().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["e1", "e2", "e4", "e5", "e3"]);
        assert!(record.walk().all(|r| !r.fields.contains_key("handle") && !r.fields.contains_key("parent")));
    }

    #[test]
    fn restore_steps_rebuild_the_tree() {
        let mut f = build_tree();
        f.tree.set(&mut f.host, f.title, "text", "Todo form:");
        f.tree.set_handler(&mut f.host, f.add, "click", Some(Handler::named("add")));
        let record = f.tree.snapshot(f.root).unwrap();

        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let root = tree.insert_record(&record).unwrap();
        assert_eq!(tree.node(root).unwrap().lifecycle(), Lifecycle::Detached);
        assert_eq!(tree.allocator().last_ordinal(), 0);

        tree.recreate_handles(&mut host, root);
        tree.reconcile_identity_and_attach(&mut host, root);
        assert_eq!(tree.allocator().last_ordinal(), 5);
        assert_eq!(tree.snapshot(root).unwrap(), record);

        let add = tree.key_of(WidgetId::from_ordinal(5)).unwrap();
        let form = tree.key_of(WidgetId::from_ordinal(2)).unwrap();
        assert_eq!(tree.parent(add), Some(form));
        assert_eq!(tree.node(add).unwrap().lifecycle(), Lifecycle::Reattached);
        assert_eq!(host.listeners(outer(&tree, add)), [Listener::new(WidgetId::from_ordinal(5), "click")]);
        assert_eq!(host.parent_of(outer(&tree, add)), Some(outer(&tree, form)));
    }

    #[test]
    fn insert_record_rejects_bad_records() {
        let f = build_tree();
        let record = f.tree.snapshot(f.root).unwrap();

        let mut bad = record.clone();
        bad.kind = "Slider".into();
        assert!(matches!(WidgetTree::new().insert_record(&bad), Err(RestoreError::UnknownKind(_))));

        let mut bad = record.clone();
        bad.id = "x1".into();
        assert!(matches!(WidgetTree::new().insert_record(&bad), Err(RestoreError::MalformedId(_))));

        let mut bad = record.clone();
        bad.children[1].id = "e1".into();
        assert!(matches!(WidgetTree::new().insert_record(&bad), Err(RestoreError::DuplicateId(_))));

        let mut bad = record.clone();
        bad.children[1].children = vec![record.children[1].clone()];
        assert!(matches!(
            WidgetTree::new().insert_record(&bad),
            Err(RestoreError::UnexpectedChildren(_))
        ));

        let mut bad = record;
        bad.fields.insert("visible".into(), Value::from("yes"));
        assert!(matches!(WidgetTree::new().insert_record(&bad), Err(RestoreError::FieldType { .. })));
    }

    #[test]
    #[should_panic(expected = "issued twice")]
    fn creating_before_reconcile_panics() {
        let f = build_tree();
        let record = f.tree.snapshot(f.root).unwrap();
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        tree.insert_record(&record).unwrap();
        tree.create(&mut host, WidgetKind::Label);
    }
}
