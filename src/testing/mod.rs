//! Headless testing helpers: the reload-cycle [`Pilot`] and HTML dumps of
//! the in-memory host.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{mounted_html, outer_html};
