//! Typed widget handles: Panel, Grid, Label, Button, TextInput.
//!
//! Each type is a `Copy` wrapper around a [`NodeKey`] with setters for its
//! kind's properties. State lives in the [`WidgetTree`](crate::widget::WidgetTree);
//! setters take the [`Ui`] and return the handle so calls chain.

/// Wrap an existing node of the right kind.
macro_rules! widget_handle {
    ($name:ident, $kind:expr) => {
        impl $name {
            /// Wrap `key`, which must be a node of this widget's kind.
            pub fn from_key(ui: &Ui<'_>, key: NodeKey) -> Option<Self> {
                (ui.tree.contains(key) && ui.tree.kind(key) == $kind).then_some(Self(key))
            }
        }

        impl Widget for $name {
            fn key(self) -> NodeKey {
                self.0
            }
        }
    };
}

pub mod button;
pub mod grid;
pub mod label;
pub mod panel;
pub mod text_input;

pub use button::Button;
pub use grid::Grid;
pub use label::Label;
pub use panel::Panel;
pub use text_input::{InputType, TextInput};

use crate::id::WidgetId;
use crate::session::Ui;
use crate::widget::{NodeKey, Value};

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Properties shared by every widget kind.
pub trait Widget: Copy {
    fn key(self) -> NodeKey;

    fn id(self, ui: &Ui<'_>) -> WidgetId {
        ui.tree.id(self.key())
    }

    fn is_visible(self, ui: &Ui<'_>) -> bool {
        flag(ui, self.key(), "visible")
    }

    fn set_visible(self, ui: &mut Ui<'_>, visible: bool) -> Self {
        ui.set(self.key(), "visible", visible);
        self
    }

    fn set_color(self, ui: &mut Ui<'_>, color: &str) -> Self {
        ui.set(self.key(), "color", color);
        self
    }

    fn set_bg_color(self, ui: &mut Ui<'_>, color: &str) -> Self {
        ui.set(self.key(), "bg_color", color);
        self
    }

    /// Integer pixels, CSS text, or `Value::Null` to unset.
    fn set_width(self, ui: &mut Ui<'_>, width: impl Into<Value>) -> Self {
        ui.set(self.key(), "width", width);
        self
    }

    fn set_height(self, ui: &mut Ui<'_>, height: impl Into<Value>) -> Self {
        ui.set(self.key(), "height", height);
        self
    }

    fn set_min_width(self, ui: &mut Ui<'_>, width: impl Into<Value>) -> Self {
        ui.set(self.key(), "min_width", width);
        self
    }

    fn set_min_height(self, ui: &mut Ui<'_>, height: impl Into<Value>) -> Self {
        ui.set(self.key(), "min_height", height);
        self
    }

    fn set_max_width(self, ui: &mut Ui<'_>, width: impl Into<Value>) -> Self {
        ui.set(self.key(), "max_width", width);
        self
    }

    fn set_max_height(self, ui: &mut Ui<'_>, height: impl Into<Value>) -> Self {
        ui.set(self.key(), "max_height", height);
        self
    }

    /// Classes added outside the toolkit are kept.
    fn add_class(self, ui: &mut Ui<'_>, class: &str) -> Self {
        ui.tree.add_class(ui.host, self.key(), class);
        self
    }

    fn remove_class(self, ui: &mut Ui<'_>, class: &str) -> Self {
        ui.tree.remove_class(ui.host, self.key(), class);
        self
    }

    fn is_dark_mode(self, ui: &Ui<'_>) -> bool {
        ui.tree.is_dark_mode(self.key())
    }

    /// Toggle dark mode here and in every descendant.
    fn set_dark_mode(self, ui: &mut Ui<'_>, dark: bool) -> Self {
        ui.tree.set_dark_mode(ui.host, self.key(), dark);
        self
    }
}

/// Properties of widgets that take focus.
pub trait Focusable: Widget {
    fn is_enabled(self, ui: &Ui<'_>) -> bool {
        flag(ui, self.key(), "enabled")
    }

    fn set_enabled(self, ui: &mut Ui<'_>, enabled: bool) -> Self {
        ui.set(self.key(), "enabled", enabled);
        self
    }
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

/// Widgets that own an ordered list of children.
pub trait Composite: Widget {
    fn children(self, ui: &Ui<'_>) -> Vec<NodeKey> {
        ui.tree.children(self.key()).to_vec()
    }

    fn add_child(self, ui: &mut Ui<'_>, child: impl Widget) -> Self {
        ui.add_child(self.key(), child.key());
        self
    }

    fn add_children(self, ui: &mut Ui<'_>, children: &[NodeKey]) -> Self {
        ui.add_children(self.key(), children);
        self
    }

    /// Remove and destroy `child`.
    fn remove_child(self, ui: &mut Ui<'_>, child: impl Widget) -> Self {
        ui.remove_child(self.key(), child.key());
        self
    }

    /// Detach every child, keeping them alive.
    fn remove_all_children(self, ui: &mut Ui<'_>) -> Self {
        ui.tree.remove_all_children(ui.host, self.key());
        self
    }

    fn find_by_id(self, ui: &Ui<'_>, id: WidgetId) -> Option<NodeKey> {
        ui.tree.find_by_id(self.key(), id)
    }

    fn set_margin(self, ui: &mut Ui<'_>, margin: impl Into<Value>) -> Self {
        ui.set(self.key(), "margin", margin);
        self
    }

    fn set_padding(self, ui: &mut Ui<'_>, padding: impl Into<Value>) -> Self {
        ui.set(self.key(), "padding", padding);
        self
    }

    fn set_border_width(self, ui: &mut Ui<'_>, width: impl Into<Value>) -> Self {
        ui.set(self.key(), "border_width", width);
        self
    }

    fn set_border_style(self, ui: &mut Ui<'_>, style: &str) -> Self {
        ui.set(self.key(), "border_style", style);
        self
    }

    fn set_border_color(self, ui: &mut Ui<'_>, color: &str) -> Self {
        ui.set(self.key(), "border_color", color);
        self
    }

    fn set_row_gap(self, ui: &mut Ui<'_>, gap: i64) -> Self {
        ui.set(self.key(), "row_gap", gap);
        self
    }

    fn set_column_gap(self, ui: &mut Ui<'_>, gap: i64) -> Self {
        ui.set(self.key(), "column_gap", gap);
        self
    }
}

fn flag(ui: &Ui<'_>, key: NodeKey, name: &str) -> bool {
    ui.get(key, name).and_then(Value::as_bool).unwrap_or_default()
}

fn text(ui: &Ui<'_>, key: NodeKey, name: &str) -> String {
    ui.get(key, name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}
