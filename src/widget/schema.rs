//! Declarative property tables.
//!
//! Every widget kind is described by a list of [`PropertySpec`]s: the
//! property name, its value shape, its initial value, and the rule that
//! mirrors it into the render handle. Capture, restore, and rendering are
//! all driven from these tables, so adding a property is one table row.

use super::value::Value;

/// Which element of a widget a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// The widget's own element.
    Outer,
    /// The inner form element of a text input.
    Inner,
}

/// Accepted value variants for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Int,
    Text,
    List,
    /// Null, integer pixels, or CSS text.
    Dimension,
    /// Null or text.
    OptionalText,
}

impl Shape {
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Shape::Bool, Value::Bool(_))
                | (Shape::Int, Value::Int(_))
                | (Shape::Text, Value::Text(_))
                | (Shape::List, Value::List(_))
                | (Shape::Dimension, Value::Null | Value::Int(_) | Value::Text(_))
                | (Shape::OptionalText, Value::Null | Value::Text(_))
        )
    }
}

/// Initial value of a property, in a form usable in a `const` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initial {
    Null,
    Bool(bool),
    Int(i64),
    Text(&'static str),
    EmptyList,
}

impl Initial {
    pub fn value(self) -> Value {
        match self {
            Initial::Null => Value::Null,
            Initial::Bool(b) => Value::Bool(b),
            Initial::Int(i) => Value::Int(i),
            Initial::Text(s) => Value::Text(s.to_owned()),
            Initial::EmptyList => Value::List(Vec::new()),
        }
    }
}

/// How a property is mirrored into the render handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// `visibility: inherit | hidden`.
    Visibility,
    /// Text style; empty text removes the style.
    Style(&'static str),
    /// Length style; see [`Value::to_css_length`].
    Dimension(&'static str),
    /// Integer pixels style.
    Pixels(&'static str),
    /// `flex-direction: column | row`.
    FlexDirection,
    /// `flex-wrap: wrap | nowrap`.
    FlexWrap,
    /// Grid track list, with `%` tracks made relative to the space left by
    /// `px` tracks.
    Tracks(&'static str),
    /// The `class` attribute.
    Classes,
    /// Element text content.
    Text,
    /// Button icon followed by button text.
    ButtonContent,
    /// `disabled` attribute, on the inner element for text inputs.
    Enabled,
    /// Presence attribute: set to `""` when true, removed when false.
    Flag(&'static str, Part),
    /// Text attribute; empty text removes it.
    Attribute(&'static str, Part),
    /// Label `for` attribute pointing at the target widget's focusable element.
    LabelFor,
    /// Live value of the inner form element.
    InputValue,
}

/// One row of a property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub shape: Shape,
    pub initial: Initial,
    pub render: Render,
}

const fn prop(name: &'static str, shape: Shape, initial: Initial, render: Render) -> PropertySpec {
    PropertySpec {
        name,
        shape,
        initial,
        render,
    }
}

/// An event handler slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerSpec {
    /// Host event name, also the slot name (`click`).
    pub event: &'static str,
    /// Snapshot field name (`on_click`).
    pub field: &'static str,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub(crate) const BASE: &[PropertySpec] = &[
    prop("classes", Shape::List, Initial::EmptyList, Render::Classes),
    prop("visible", Shape::Bool, Initial::Bool(true), Render::Visibility),
    prop("color", Shape::Text, Initial::Text(""), Render::Style("color")),
    prop("bg_color", Shape::Text, Initial::Text(""), Render::Style("background-color")),
    prop("width", Shape::Dimension, Initial::Null, Render::Dimension("width")),
    prop("height", Shape::Dimension, Initial::Null, Render::Dimension("height")),
    prop("min_width", Shape::Dimension, Initial::Null, Render::Dimension("min-width")),
    prop("min_height", Shape::Dimension, Initial::Null, Render::Dimension("min-height")),
    prop("max_width", Shape::Dimension, Initial::Null, Render::Dimension("max-width")),
    prop("max_height", Shape::Dimension, Initial::Null, Render::Dimension("max-height")),
];

pub(crate) const FOCUSABLE: &[PropertySpec] = &[
    prop("enabled", Shape::Bool, Initial::Bool(true), Render::Enabled),
];

pub(crate) const COMPOSITE: &[PropertySpec] = &[
    prop("margin", Shape::Dimension, Initial::Null, Render::Dimension("margin")),
    prop("padding", Shape::Dimension, Initial::Null, Render::Dimension("padding")),
    prop("border_width", Shape::Dimension, Initial::Null, Render::Dimension("border-width")),
    prop("border_style", Shape::Text, Initial::Text(""), Render::Style("border-style")),
    prop("border_color", Shape::Text, Initial::Text(""), Render::Style("border-color")),
    prop("row_gap", Shape::Int, Initial::Int(0), Render::Pixels("row-gap")),
    prop("column_gap", Shape::Int, Initial::Int(0), Render::Pixels("column-gap")),
];

pub(crate) const PANEL: &[PropertySpec] = &[
    prop("vertical", Shape::Bool, Initial::Bool(false), Render::FlexDirection),
    prop("wrap", Shape::Bool, Initial::Bool(false), Render::FlexWrap),
];

pub(crate) const GRID: &[PropertySpec] = &[
    prop("columns", Shape::List, Initial::EmptyList, Render::Tracks("grid-template-columns")),
    prop("rows", Shape::List, Initial::EmptyList, Render::Tracks("grid-template-rows")),
    prop("areas", Shape::Text, Initial::Text(""), Render::Style("grid-template-areas")),
];

pub(crate) const LABEL: &[PropertySpec] = &[
    prop("text", Shape::Text, Initial::Text(""), Render::Text),
    prop("for", Shape::OptionalText, Initial::Null, Render::LabelFor),
];

pub(crate) const BUTTON: &[PropertySpec] = &[
    prop("text", Shape::Text, Initial::Text(""), Render::ButtonContent),
    prop("icon", Shape::Text, Initial::Text(""), Render::ButtonContent),
];

pub(crate) const TEXT_INPUT: &[PropertySpec] = &[
    prop("value", Shape::Text, Initial::Text(""), Render::InputValue),
    prop("input_type", Shape::Text, Initial::Text("text"), Render::Attribute("type", Part::Inner)),
    prop("required", Shape::Bool, Initial::Bool(false), Render::Flag("required", Part::Inner)),
    prop("readonly", Shape::Bool, Initial::Bool(false), Render::Flag("readonly", Part::Inner)),
    prop("placeholder", Shape::Text, Initial::Text(""), Render::Attribute("placeholder", Part::Inner)),
    prop("pattern", Shape::Text, Initial::Text(""), Render::Attribute("pattern", Part::Inner)),
];

pub(crate) static CLICK: &[HandlerSpec] = &[HandlerSpec {
    event: "click",
    field: "on_click",
}];

pub(crate) static CHANGE: &[HandlerSpec] = &[HandlerSpec {
    event: "change",
    field: "on_change",
}];
