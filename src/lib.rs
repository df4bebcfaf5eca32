//! # snapwidgets
//!
//! A small widget toolkit whose tree mirrors into a host DOM and survives
//! page reloads.
//!
//! Widgets live in a slotmap-backed [`WidgetTree`]. Every property change is
//! written through to a live element on the [`Host`]. When the page unloads,
//! the tree is captured into a compact text token (bincode, zlib, base64) and
//! parked in session [`Storage`]; on the next load the [`Session`] rebuilds
//! the identical tree from that token instead of running the application's
//! build step again.
//!
//! ## Core Systems
//!
//! - **[`id`]**: widget identities (`e1`, `e2`, ...) and their allocator
//! - **[`host`]**: the rendering and storage boundary, plus in-memory hosts
//! - **[`widget`]**: property tables, widget nodes, lifecycle, and the tree
//! - **[`widgets`]**: typed facades: Panel, Grid, Label, Button, TextInput
//! - **[`event`]**: persistable handlers and event target resolution
//! - **[`snapshot`]**: the snapshot records and token codec
//! - **[`serializer`]**: capture a subtree to a token and restore it
//! - **[`session`]**: binding an application to a page across reloads
//! - **[`testing`]**: a headless reload driver and HTML dumps

// Foundation
pub mod error;
pub mod id;
pub mod host;

// Widget system
pub mod widget;
pub mod widgets;
pub mod event;

// Persistence
pub mod snapshot;
pub mod serializer;

// Application
pub mod session;

pub mod testing;

pub use error::{DecodeError, HostError, RestoreError, SessionError, SnapshotError};
pub use event::{Handler, HandlerRegistry, WidgetEvent};
pub use host::{Handle, Host, Storage};
pub use id::WidgetId;
pub use serializer::{capture_to_token, restore_from_token};
pub use session::{Application, Session, SessionConfig, Ui};
pub use widget::{NodeKey, Value, WidgetKind, WidgetTree};
