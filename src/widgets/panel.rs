//! Panel: a flex container.

use super::{flag, Composite, Widget};
use crate::session::Ui;
use crate::widget::{NodeKey, WidgetKind};

/// A `div` laying its children out in a row or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel(NodeKey);

widget_handle!(Panel, WidgetKind::Panel);

impl Panel {
    pub fn new(ui: &mut Ui<'_>) -> Self {
        Self(ui.create(WidgetKind::Panel))
    }

    pub fn is_vertical(self, ui: &Ui<'_>) -> bool {
        flag(ui, self.0, "vertical")
    }

    pub fn set_vertical(self, ui: &mut Ui<'_>, vertical: bool) -> Self {
        ui.set(self.0, "vertical", vertical);
        self
    }

    pub fn is_wrap(self, ui: &Ui<'_>) -> bool {
        flag(ui, self.0, "wrap")
    }

    pub fn set_wrap(self, ui: &mut Ui<'_>, wrap: bool) -> Self {
        ui.set(self.0, "wrap", wrap);
        self
    }
}

impl Composite for Panel {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::widget::WidgetTree;
    use crate::widgets::Label;

    #[test]
    fn vertical_panel_stacks_children() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let mut ui = Ui::new(&mut tree, &mut host);
        let a = Label::new(&mut ui, "a");
        let b = Label::new(&mut ui, "b");
        let panel = Panel::new(&mut ui)
            .set_vertical(&mut ui, true)
            .set_wrap(&mut ui, true)
            .set_row_gap(&mut ui, 4)
            .add_child(&mut ui, a)
            .add_child(&mut ui, b);
        assert!(panel.is_vertical(&ui));
        assert_eq!(panel.children(&ui), [a.key(), b.key()]);
        assert_eq!(panel.find_by_id(&ui, b.id(&ui)), Some(b.key()));

        let outer = ui.tree.node(panel.key()).unwrap().handles().unwrap().outer;
        drop(ui);
        assert_eq!(host.style(outer, "flex-direction"), Some("column"));
        assert_eq!(host.style(outer, "flex-wrap"), Some("wrap"));
        assert_eq!(host.style(outer, "row-gap"), Some("4px"));
    }

    #[test]
    fn remove_child_and_remove_all() {
        let mut host = MemoryHost::new();
        let mut tree = WidgetTree::new();
        let mut ui = Ui::new(&mut tree, &mut host);
        let a = Label::new(&mut ui, "a");
        let b = Label::new(&mut ui, "b");
        let panel = Panel::new(&mut ui).add_child(&mut ui, a).add_child(&mut ui, b);
        panel.remove_child(&mut ui, a);
        assert_eq!(panel.children(&ui), [b.key()]);
        assert!(!ui.tree.contains(a.key()));
        panel.remove_all_children(&mut ui);
        assert!(panel.children(&ui).is_empty());
        assert!(ui.tree.contains(b.key()));
    }
}
