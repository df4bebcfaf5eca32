//! TextInput: an `input` element wrapped in a `div`.
//!
//! The value lives in the inner element, where the user edits it. Reads go
//! to the live element; capture pulls it back into the tree before a
//! snapshot.

use std::fmt;
use std::str::FromStr;

use super::{flag, text, Focusable, Widget};
use crate::event::Handler;
use crate::session::Ui;
use crate::widget::{NodeKey, WidgetKind};

/// Values of the inner element's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Tel,
    Url,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Email => "email",
            InputType::Tel => "tel",
            InputType::Url => "url",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(InputType::Text),
            "password" => Ok(InputType::Password),
            "email" => Ok(InputType::Email),
            "tel" => Ok(InputType::Tel),
            "url" => Ok(InputType::Url),
            other => Err(format!("unknown input type `{other}`")),
        }
    }
}

/// A single-line text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextInput(NodeKey);

widget_handle!(TextInput, WidgetKind::TextInput);

impl TextInput {
    pub fn new(ui: &mut Ui<'_>, value: &str) -> Self {
        let input = Self(ui.create(WidgetKind::TextInput));
        input.set_value(ui, value)
    }

    /// Live value of the inner element.
    pub fn value(self, ui: &Ui<'_>) -> String {
        ui.value(self.0)
    }

    /// Write the inner element's value unless it already holds `value`.
    pub fn set_value(self, ui: &mut Ui<'_>, value: &str) -> Self {
        ui.set(self.0, "value", value);
        self
    }

    pub fn input_type(self, ui: &Ui<'_>) -> InputType {
        text(ui, self.0, "input_type").parse().unwrap_or_default()
    }

    pub fn set_input_type(self, ui: &mut Ui<'_>, input_type: InputType) -> Self {
        ui.set(self.0, "input_type", input_type.as_str());
        self
    }

    pub fn set_type_text(self, ui: &mut Ui<'_>) -> Self {
        self.set_input_type(ui, InputType::Text)
    }

    pub fn set_type_password(self, ui: &mut Ui<'_>) -> Self {
        self.set_input_type(ui, InputType::Password)
    }

    pub fn set_type_email(self, ui: &mut Ui<'_>) -> Self {
        self.set_input_type(ui, InputType::Email)
    }

    pub fn set_type_tel(self, ui: &mut Ui<'_>) -> Self {
        self.set_input_type(ui, InputType::Tel)
    }

    pub fn set_type_url(self, ui: &mut Ui<'_>) -> Self {
        self.set_input_type(ui, InputType::Url)
    }

    pub fn is_required(self, ui: &Ui<'_>) -> bool {
        flag(ui, self.0, "required")
    }

    pub fn set_required(self, ui: &mut Ui<'_>, required: bool) -> Self {
        ui.set(self.0, "required", required);
        self
    }

    pub fn is_readonly(self, ui: &Ui<'_>) -> bool {
        flag(ui, self.0, "readonly")
    }

    pub fn set_readonly(self, ui: &mut Ui<'_>, readonly: bool) -> Self {
        ui.set(self.0, "readonly", readonly);
        self
    }

    pub fn placeholder(self, ui: &Ui<'_>) -> String {
        text(ui, self.0, "placeholder")
    }

    pub fn set_placeholder(self, ui: &mut Ui<'_>, placeholder: &str) -> Self {
        ui.set(self.0, "placeholder", placeholder);
        self
    }

    pub fn pattern(self, ui: &Ui<'_>) -> String {
        text(ui, self.0, "pattern")
    }

    /// Validation regex; empty removes it.
    pub fn set_pattern(self, ui: &mut Ui<'_>, pattern: &str) -> Self {
        ui.set(self.0, "pattern", pattern);
        self
    }

    /// Set or clear the change handler.
    pub fn on_change(self, ui: &mut Ui<'_>, handler: Option<Handler>) -> Self {
        ui.set_handler(self.0, "change", handler);
        self
    }
}

impl Focusable for TextInput {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::widget::WidgetTree;

    #[test]
    fn attributes_render_on_inner_element() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let mut ui = Ui::new(&mut tree, &mut host);
        let input = TextInput::new(&mut ui, "")
            .set_placeholder(&mut ui, "<new todo>")
            .set_required(&mut ui, true)
            .set_type_password(&mut ui)
            .set_enabled(&mut ui, false);
        let handles = ui.tree.node(input.key()).unwrap().handles().unwrap();
        let inner = handles.inner.unwrap();
        assert_eq!(ui.host.attribute(inner, "placeholder").as_deref(), Some("<new todo>"));
        assert_eq!(ui.host.attribute(inner, "required").as_deref(), Some(""));
        assert_eq!(ui.host.attribute(inner, "type").as_deref(), Some("password"));
        assert_eq!(ui.host.attribute(inner, "disabled").as_deref(), Some(""));
        assert_eq!(ui.host.attribute(handles.outer, "disabled"), None);
        assert_eq!(input.input_type(&ui), InputType::Password);

        input.set_placeholder(&mut ui, "");
        assert_eq!(ui.host.attribute(inner, "placeholder"), None);
    }

    #[test]
    fn value_reads_live_element() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let (input, inner) = {
            let mut ui = Ui::new(&mut tree, &mut host);
            let input = TextInput::new(&mut ui, "draft");
            let inner = ui.tree.node(input.key()).unwrap().handles().unwrap().focus();
            (input, inner)
        };
        host.type_text(inner, "edited");
        let ui = Ui::new(&mut tree, &mut host);
        assert_eq!(input.value(&ui), "edited");
    }

    #[test]
    fn input_type_names() {
        assert_eq!("email".parse::<InputType>(), Ok(InputType::Email));
        assert!("number".parse::<InputType>().is_err());
        assert_eq!(InputType::Url.to_string(), "url");
    }
}
