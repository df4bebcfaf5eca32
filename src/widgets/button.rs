//! Button: text, icon and a click handler.

use super::{text, Focusable, Widget};
use crate::event::Handler;
use crate::session::Ui;
use crate::widget::{NodeKey, WidgetKind};

/// A `button` element with an optional icon before its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button(NodeKey);

widget_handle!(Button, WidgetKind::Button);

impl Button {
    pub fn new(ui: &mut Ui<'_>, text: &str) -> Self {
        let button = Self(ui.create(WidgetKind::Button));
        button.set_text(ui, text)
    }

    pub fn text(self, ui: &Ui<'_>) -> String {
        text(ui, self.0, "text")
    }

    pub fn set_text(self, ui: &mut Ui<'_>, text: &str) -> Self {
        ui.set(self.0, "text", text);
        self
    }

    pub fn icon(self, ui: &Ui<'_>) -> String {
        text(ui, self.0, "icon")
    }

    /// Space-separated icon classes; empty removes the icon.
    pub fn set_icon(self, ui: &mut Ui<'_>, icon: &str) -> Self {
        ui.set(self.0, "icon", icon);
        self
    }

    /// Set or clear the click handler. Only [`Handler::Named`] survives a
    /// reload.
    pub fn on_click(self, ui: &mut Ui<'_>, handler: Option<Handler>) -> Self {
        ui.set_handler(self.0, "click", handler);
        self
    }
}

impl Focusable for Button {}
