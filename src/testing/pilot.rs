//! Pilot: drive a headless session through clicks, typing and page reloads.
//!
//! A `Pilot` binds a [`Session`] on a fresh [`MemoryHost`] and keeps the
//! [`MemoryStorage`] across [`reload`](Pilot::reload)s, the way session
//! storage survives a browser reload while the page itself is rebuilt.

use crate::error::SessionError;
use crate::host::memory::{MemoryHost, MemoryStorage};
use crate::host::{Handle, Host};
use crate::id::WidgetId;
use crate::session::{Application, Session, SessionConfig};
use crate::widget::render::INPUT_SUFFIX;
use crate::widget::NodeKey;

use super::snapshot::mounted_html;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless page driver for testing.
///
/// # Examples
///
/// ```ignore
/// let mut pilot = Pilot::new(TodoApp::default)?;
/// pilot.type_text(input_id, "Buy milk");
/// let mut pilot = pilot.reload()?;
/// assert_eq!(pilot.live_value(input_id).as_deref(), Some("Buy milk"));
/// ```
pub struct Pilot<A: Application> {
    config: SessionConfig,
    factory: Box<dyn FnMut() -> A>,
    session: Session<MemoryHost, MemoryStorage, A>,
    reloads: usize,
}

impl<A: Application> Pilot<A> {
    /// Bind a fresh page with the default config.
    pub fn new(factory: impl FnMut() -> A + 'static) -> Result<Self, SessionError> {
        Self::with_config(SessionConfig::default(), factory)
    }

    /// Bind a fresh page with `config`. `factory` builds the application
    /// object for every page load.
    pub fn with_config(config: SessionConfig, factory: impl FnMut() -> A + 'static) -> Result<Self, SessionError> {
        Self::with_storage(config, MemoryStorage::new(), factory)
    }

    /// Bind a page whose session storage already holds `storage`.
    pub fn with_storage(
        config: SessionConfig,
        storage: MemoryStorage,
        factory: impl FnMut() -> A + 'static,
    ) -> Result<Self, SessionError> {
        let mut factory: Box<dyn FnMut() -> A> = Box::new(factory);
        let session = Session::bind(config.clone(), page(&config), storage, factory())?;
        Ok(Self {
            config,
            factory,
            session,
            reloads: 0,
        })
    }

    // ── Interaction ──────────────────────────────────────────────────

    /// Click the element of widget `id`. Returns the number of handlers run.
    pub fn click(&mut self, id: WidgetId) -> Result<usize, SessionError> {
        self.fire(&id.to_string(), "click")
    }

    /// Type into a text input without committing, as a user mid-edit.
    pub fn type_text(&mut self, id: WidgetId, text: &str) {
        if let Some(inner) = self.element(&id.sub_element(INPUT_SUFFIX)) {
            self.session.host_mut().type_text(inner, text);
        }
    }

    /// Type into a text input and commit with a `change` event.
    pub fn change(&mut self, id: WidgetId, text: &str) -> Result<usize, SessionError> {
        self.type_text(id, text);
        self.fire(&id.sub_element(INPUT_SUFFIX), "change")
    }

    fn fire(&mut self, element_id: &str, event: &str) -> Result<usize, SessionError> {
        let Some(handle) = self.element(element_id) else {
            return Ok(0);
        };
        self.session.host_mut().dispatch(handle, event);
        Ok(self.session.process_events()?)
    }

    /// Unload the page, persisting the tree, and load it again on a fresh
    /// host with the same storage.
    pub fn reload(self) -> Result<Self, SessionError> {
        let Pilot {
            config,
            mut factory,
            mut session,
            reloads,
        } = self;
        session.host_mut().unload();
        session.process_events()?;
        let (_, storage, _) = session.into_parts();
        let session = Session::bind(config.clone(), page(&config), storage, factory())?;
        Ok(Self {
            config,
            factory,
            session,
            reloads: reloads + 1,
        })
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn session(&self) -> &Session<MemoryHost, MemoryStorage, A> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<MemoryHost, MemoryStorage, A> {
        &mut self.session
    }

    pub fn host(&self) -> &MemoryHost {
        self.session.host()
    }

    /// Number of reloads since the first load.
    pub fn reloads(&self) -> usize {
        self.reloads
    }

    /// Node of widget `id` under the root.
    pub fn find(&self, id: WidgetId) -> Option<NodeKey> {
        let tree = self.session.tree();
        tree.find_by_id(self.session.root(), id)
    }

    /// Mounted element whose `id` attribute is `element_id`.
    pub fn element(&self, element_id: &str) -> Option<Handle> {
        self.host().element_by_id(element_id)
    }

    /// Live value of text input `id`.
    pub fn live_value(&self, id: WidgetId) -> Option<String> {
        let key = self.find(id)?;
        let handles = self.session.tree().node(key)?.handles()?;
        Some(self.host().value(handles.focus()))
    }

    /// The mounted page as indented HTML.
    pub fn html(&self) -> String {
        mounted_html(self.host(), &self.config.mount_point)
    }
}

fn page(config: &SessionConfig) -> MemoryHost {
    MemoryHost::new().with_mount_point(&config.mount_point)
}
