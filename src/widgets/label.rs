//! Label: text, optionally tied to a focusable widget.

use super::{text, Focusable, Widget};
use crate::session::Ui;
use crate::widget::{NodeKey, Value, WidgetKind};

/// A `label` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(NodeKey);

widget_handle!(Label, WidgetKind::Label);

impl Label {
    pub fn new(ui: &mut Ui<'_>, text: &str) -> Self {
        let label = Self(ui.create(WidgetKind::Label));
        label.set_text(ui, text)
    }

    pub fn text(self, ui: &Ui<'_>) -> String {
        text(ui, self.0, "text")
    }

    pub fn set_text(self, ui: &mut Ui<'_>, text: &str) -> Self {
        ui.set(self.0, "text", text);
        self
    }

    /// Identity of the widget this label is for.
    pub fn target(self, ui: &Ui<'_>) -> Option<String> {
        ui.get(self.0, "for").and_then(Value::as_str).map(str::to_owned)
    }

    /// Point the label at `target`, or clear it with `None`.
    pub fn set_for(self, ui: &mut Ui<'_>, target: Option<impl Widget>) -> Self {
        let id = match target {
            Some(widget) => Some(widget.id(ui).to_string()),
            None => None,
        };
        ui.set(self.0, "for", id);
        self
    }
}

impl Focusable for Label {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::widget::WidgetTree;
    use crate::widgets::TextInput;

    #[test]
    fn for_attribute_follows_target() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let mut ui = Ui::new(&mut tree, &mut host);
        let input = TextInput::new(&mut ui, "");
        let label = Label::new(&mut ui, "Name").set_for(&mut ui, Some(input));
        assert_eq!(label.target(&ui).as_deref(), Some("e1"));
        let outer = ui.tree.node(label.key()).unwrap().handles().unwrap().outer;
        assert_eq!(ui.host.attribute(outer, "for").as_deref(), Some("e1_input"));

        label.set_for(&mut ui, None::<TextInput>);
        assert_eq!(ui.host.attribute(outer, "for"), None);
        assert_eq!(label.text(&ui), "Name");
    }
}
