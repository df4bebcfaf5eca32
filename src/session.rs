//! Session binder: load or build the root, bind it to the host, persist it
//! at teardown.
//!
//! ```text
//! NoSession --(no stored token)----> FreshRoot ----+
//! NoSession --(stored token)-------> RestoredRoot -+--> Bound --(unload)--> Persisted
//! ```
//!
//! A stored token that fails to decode is logged and replaced by a fresh
//! root; the page never sees the error.

use tracing::{debug, info, warn};

use crate::error::{HostError, SnapshotError};
use crate::event::{find_event_target, Handler, HandlerRegistry, WidgetEvent};
use crate::host::{Host, HostEvent, Listener, Storage};
use crate::id::WidgetId;
use crate::serializer;
use crate::widget::{NodeKey, Value, WidgetKind, WidgetTree};

/// Default id of the host anchor the root is mounted under.
pub const DEFAULT_MOUNT_POINT: &str = "app";

/// Default storage key of the persisted widget tree.
pub const DEFAULT_STORAGE_KEY: &str = "widget_state";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for binding a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Id of the host anchor that receives the root element.
    pub mount_point: String,
    /// Storage key of the persisted token.
    pub storage_key: String,
    /// Ignore any stored token and always build a fresh root. The token is
    /// left in storage.
    pub fresh_start: bool,
    /// Apply dark mode to the root when the host prefers a dark scheme.
    pub detect_dark_mode: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mount_point: DEFAULT_MOUNT_POINT.to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            fresh_start: false,
            detect_dark_mode: true,
        }
    }
}

impl SessionConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mount point (builder).
    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Self {
        self.mount_point = mount_point.into();
        self
    }

    /// Set the storage key (builder).
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    /// Force a fresh root on every load (builder).
    pub fn with_fresh_start(mut self, fresh_start: bool) -> Self {
        self.fresh_start = fresh_start;
        self
    }

    /// Enable or disable dark scheme detection (builder).
    pub fn with_dark_mode_detection(mut self, detect: bool) -> Self {
        self.detect_dark_mode = detect;
        self
    }
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// Mutable access to the tree together with the host it renders on.
///
/// Handed to [`Application`] hooks and event handlers.
pub struct Ui<'a> {
    pub tree: &'a mut WidgetTree,
    pub host: &'a mut dyn Host,
}

impl<'a> Ui<'a> {
    pub fn new(tree: &'a mut WidgetTree, host: &'a mut dyn Host) -> Self {
        Self { tree, host }
    }

    pub fn create(&mut self, kind: WidgetKind) -> NodeKey {
        self.tree.create(self.host, kind)
    }

    pub fn set(&mut self, key: NodeKey, name: &str, value: impl Into<Value>) -> bool {
        self.tree.set(self.host, key, name, value)
    }

    pub fn get(&self, key: NodeKey, name: &str) -> Option<&Value> {
        self.tree.get(key, name)
    }

    pub fn set_handler(&mut self, key: NodeKey, event: &str, handler: Option<Handler>) -> bool {
        self.tree.set_handler(self.host, key, event, handler)
    }

    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        self.tree.add_child(self.host, parent, child)
    }

    pub fn add_children(&mut self, parent: NodeKey, children: &[NodeKey]) {
        self.tree.add_children(self.host, parent, children)
    }

    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        self.tree.remove_child(self.host, parent, child)
    }

    /// Live value of a text input.
    pub fn value(&self, key: NodeKey) -> String {
        self.tree.live_value(&*self.host, key)
    }

    pub fn root(&self) -> Option<NodeKey> {
        self.tree.root()
    }

    /// Resolve an identity under the root.
    pub fn find(&self, id: WidgetId) -> Option<NodeKey> {
        self.tree.find_by_id(self.tree.root()?, id)
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Application code plugged into a [`Session`].
pub trait Application {
    /// Build a fresh root widget. Called when nothing was restored.
    fn build(&mut self, ui: &mut Ui<'_>) -> NodeKey;

    /// Handlers that [`Handler::Named`] slots resolve against. Called on
    /// every load, so restored named handlers rebind to fresh callables.
    fn handlers(&self) -> HandlerRegistry {
        HandlerRegistry::new()
    }

    /// Runs once after the root is bound, whether it was built or restored.
    fn after_page_load(&mut self, _ui: &mut Ui<'_>, _root: NodeKey) {}
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// How the root of a session came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Fresh,
    Restored,
}

/// Where a bound session is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Root mounted, unload hook registered.
    Bound,
    /// Tree captured and written to storage at unload.
    Persisted,
}

/// A root widget bound to a host and a storage.
pub struct Session<H: Host, S: Storage, A: Application> {
    config: SessionConfig,
    host: H,
    storage: S,
    app: A,
    tree: WidgetTree,
    root: NodeKey,
    registry: HandlerRegistry,
    origin: Origin,
    state: SessionState,
}

impl<H: Host, S: Storage, A: Application> Session<H, S, A> {
    /// Load the stored tree or build a fresh one, mount it, register the
    /// unload hook and run [`Application::after_page_load`].
    ///
    /// A stored token is removed once it restores successfully. A token that
    /// fails to restore is logged and a fresh root is built instead.
    pub fn bind(config: SessionConfig, mut host: H, mut storage: S, mut app: A) -> Result<Self, HostError> {
        let registry = app.handlers();

        let restored = match storage.read(&config.storage_key) {
            Some(_) if config.fresh_start => {
                debug!(key = %config.storage_key, "fresh start requested, ignoring stored state");
                None
            }
            Some(token) => match serializer::restore_from_token(&token, &mut host) {
                Ok(tree) => {
                    storage.clear(&config.storage_key);
                    info!(nodes = tree.len(), "application state restored from session storage");
                    Some(tree)
                }
                Err(err) => {
                    warn!(error = %err, "stored widget state could not be restored, starting fresh");
                    None
                }
            },
            None => None,
        };

        let (mut tree, origin) = match restored {
            Some(tree) => (tree, Origin::Restored),
            None => {
                let mut tree = WidgetTree::new();
                let root = app.build(&mut Ui::new(&mut tree, &mut host));
                tree.set_root(root);
                (tree, Origin::Fresh)
            }
        };
        let root = tree
            .root()
            .expect("a built or restored tree always has a root");

        if config.detect_dark_mode && host.prefers_dark_scheme() {
            tree.set_dark_mode(&mut host, root, true);
        }
        let outer = tree
            .node(root)
            .and_then(|n| n.handles())
            .expect("root has live handles once bound")
            .outer;
        host.mount_root(outer, &config.mount_point)?;
        host.register_unload_hook();
        app.after_page_load(&mut Ui::new(&mut tree, &mut host), root);

        Ok(Self {
            config,
            host,
            storage,
            app,
            tree,
            root,
            registry,
            origin,
            state: SessionState::Bound,
        })
    }

    /// Drain the host event queue. Listener events run their widget's
    /// handler; an unload event captures and persists the tree. Returns the
    /// number of handlers run.
    pub fn process_events(&mut self) -> Result<usize, SnapshotError> {
        let mut handled = 0;
        while let Some(event) = self.host.poll_event() {
            match event {
                HostEvent::Listener { listener, target } => {
                    if self.dispatch(listener, &target) {
                        handled += 1;
                    }
                }
                HostEvent::Unload => {
                    self.unload()?;
                }
            }
        }
        Ok(handled)
    }

    fn dispatch(&mut self, listener: Listener, target: &str) -> bool {
        let Some(key) = self.tree.find_by_id(self.root, listener.widget) else {
            debug!(widget = %listener.widget, "event for a widget outside the tree");
            return false;
        };
        let Some(handler) = self
            .tree
            .node(key)
            .and_then(|n| n.handler(&listener.event))
            .cloned()
        else {
            return false;
        };
        let Some(f) = handler.resolve(&self.registry) else {
            warn!(widget = %listener.widget, handler = ?handler, "no handler registered under this name");
            return false;
        };

        let event = WidgetEvent {
            name: listener.event,
            target: find_event_target(target),
            current: listener.widget,
        };
        f(&mut Ui::new(&mut self.tree, &mut self.host), &event);
        true
    }

    /// Capture the tree without persisting it.
    pub fn capture_token(&mut self) -> Result<String, SnapshotError> {
        serializer::capture_to_token(&mut self.tree, &self.host, self.root)
    }

    /// Capture the tree and write it to storage. Only the first call per
    /// session does anything; returns whether it did.
    pub fn unload(&mut self) -> Result<bool, SnapshotError> {
        if self.state == SessionState::Persisted {
            debug!("session already persisted, ignoring unload");
            return Ok(false);
        }
        let token = self.capture_token()?;
        self.storage.write(&self.config.storage_key, &token);
        self.state = SessionState::Persisted;
        info!(bytes = token.len(), "widget state saved to session storage");
        Ok(true)
    }

    /// Run `f` against the tree and host.
    pub fn with_ui<R>(&mut self, f: impl FnOnce(&mut Ui<'_>) -> R) -> R {
        f(&mut Ui::new(&mut self.tree, &mut self.host))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Tear the session down, returning the host, storage and application.
    pub fn into_parts(self) -> (H, S, A) {
        (self.host, self.storage, self.app)
    }
}
