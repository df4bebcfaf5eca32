//! Event handlers and the name registry that resolves them.
//!
//! A widget's handler slot holds either a [`Handler::Named`] reference, which
//! is plain data and survives capture, or a [`Handler::Closure`], which works
//! live but is dropped when the tree is captured. The [`HandlerRegistry`]
//! maps names to callables and is rebuilt by the application on every load,
//! so named handlers rebind deterministically after a restore.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::target::WidgetEvent;
use crate::session::Ui;

/// Callable run when a widget event fires.
pub type HandlerFn = Rc<dyn Fn(&mut Ui<'_>, &WidgetEvent)>;

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Contents of a widget's event handler slot.
#[derive(Clone)]
pub enum Handler {
    /// A registry name. Persisted across capture.
    Named(String),
    /// An arbitrary closure. Works live, never persisted.
    Closure(HandlerFn),
}

impl Handler {
    pub fn named(name: impl Into<String>) -> Self {
        Handler::Named(name.into())
    }

    pub fn closure(f: impl Fn(&mut Ui<'_>, &WidgetEvent) + 'static) -> Self {
        Handler::Closure(Rc::new(f))
    }

    /// Registry name, if this handler is persistable.
    pub fn name(&self) -> Option<&str> {
        match self {
            Handler::Named(name) => Some(name),
            Handler::Closure(_) => None,
        }
    }

    pub fn is_persistable(&self) -> bool {
        matches!(self, Handler::Named(_))
    }

    /// Resolve to a callable: closures directly, names through `registry`.
    pub fn resolve(&self, registry: &HandlerRegistry) -> Option<HandlerFn> {
        match self {
            Handler::Named(name) => registry.get(name),
            Handler::Closure(f) => Some(Rc::clone(f)),
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Named(a), Handler::Named(b)) => a == b,
            (Handler::Closure(a), Handler::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "Named({name:?})"),
            Self::Closure(_) => write!(f, "Closure(<fn>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// HandlerRegistry
// ---------------------------------------------------------------------------

/// Name to callable lookup for [`Handler::Named`] slots.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HandlerFn>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, f: impl Fn(&mut Ui<'_>, &WidgetEvent) + 'static) {
        self.handlers.insert(name.into(), Rc::new(f));
    }

    /// Register (builder).
    pub fn with(mut self, name: impl Into<String>, f: impl Fn(&mut Ui<'_>, &WidgetEvent) + 'static) -> Self {
        self.register(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<HandlerFn> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry").field("names", &names).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Ui<'_>, _: &WidgetEvent) {}

    #[test]
    fn named_handlers_are_persistable() {
        let handler = Handler::named("save");
        assert!(handler.is_persistable());
        assert_eq!(handler.name(), Some("save"));
    }

    #[test]
    fn closures_are_not_persistable() {
        let handler = Handler::closure(noop);
        assert!(!handler.is_persistable());
        assert_eq!(handler.name(), None);
        assert_eq!(format!("{handler:?}"), "Closure(<fn>)");
    }

    #[test]
    fn equality() {
        assert_eq!(Handler::named("a"), Handler::named("a"));
        assert_ne!(Handler::named("a"), Handler::named("b"));

        let closure = Handler::closure(noop);
        assert_eq!(closure, closure.clone());
        assert_ne!(closure, Handler::closure(noop));
        assert_ne!(closure, Handler::named("a"));
    }

    #[test]
    fn registry_resolves_names() {
        let registry = HandlerRegistry::new().with("save", noop);
        assert!(registry.contains("save"));
        assert_eq!(registry.len(), 1);
        assert!(Handler::named("save").resolve(&registry).is_some());
        assert!(Handler::named("missing").resolve(&registry).is_none());
        assert!(Handler::closure(noop).resolve(&registry).is_some());
    }

    #[test]
    fn registry_debug_lists_sorted_names() {
        let registry = HandlerRegistry::new().with("b", noop).with("a", noop);
        assert_eq!(format!("{registry:?}"), r#"HandlerRegistry { names: ["a", "b"] }"#);
    }
}
