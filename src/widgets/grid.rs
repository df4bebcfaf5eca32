//! Grid: a CSS grid container with named areas.

use super::{Composite, Widget};
use crate::session::Ui;
use crate::widget::{NodeKey, Value, WidgetKind};

/// A `div` laying its children out on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid(NodeKey);

widget_handle!(Grid, WidgetKind::Grid);

impl Grid {
    pub fn new(ui: &mut Ui<'_>) -> Self {
        Self(ui.create(WidgetKind::Grid))
    }

    pub fn columns(self, ui: &Ui<'_>) -> Vec<String> {
        tracks(ui, self.0, "columns")
    }

    /// Column tracks. Integer entries become pixels.
    pub fn set_columns(self, ui: &mut Ui<'_>, columns: &[&str]) -> Self {
        ui.set(self.0, "columns", columns);
        self
    }

    pub fn rows(self, ui: &Ui<'_>) -> Vec<String> {
        tracks(ui, self.0, "rows")
    }

    /// Row tracks. Integer entries become pixels.
    pub fn set_rows(self, ui: &mut Ui<'_>, rows: &[&str]) -> Self {
        ui.set(self.0, "rows", rows);
        self
    }

    /// The rendered `grid-template-areas` value.
    pub fn areas(self, ui: &Ui<'_>) -> String {
        super::text(ui, self.0, "areas")
    }

    /// Replace the children with the widgets placed in `areas`, row by row.
    /// `None` leaves a cell empty.
    pub fn set_areas(self, ui: &mut Ui<'_>, areas: &[Vec<Option<NodeKey>>]) -> Self {
        ui.tree.set_areas(ui.host, self.0, areas);
        self
    }
}

impl Composite for Grid {}

fn tracks(ui: &Ui<'_>, key: NodeKey, name: &str) -> Vec<String> {
    ui.get(key, name)
        .and_then(Value::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::widgets::{Button, Label, Panel};

    #[test]
    fn tracks_and_areas() {
        let mut host = MemoryHost::new();
        let mut tree = crate::widget::WidgetTree::new();
        let mut ui = Ui::new(&mut tree, &mut host);
        let grid = Grid::new(&mut ui)
            .set_columns(&mut ui, &["200", "100%"])
            .set_rows(&mut ui, &["auto", "1fr"]);
        let title = Label::new(&mut ui, "Title");
        let ok = Button::new(&mut ui, "OK");
        let side = Panel::new(&mut ui);
        grid.set_areas(
            &mut ui,
            &[
                vec![Some(title.key()), Some(title.key())],
                vec![Some(side.key()), Some(ok.key())],
            ],
        );

        assert_eq!(grid.columns(&ui), ["200px", "100%"]);
        assert_eq!(grid.rows(&ui), ["auto", "1fr"]);
        assert_eq!(grid.areas(&ui), r#""e2 e2" "e4 e3""#);
        assert_eq!(grid.children(&ui), [title.key(), side.key(), ok.key()]);

        let outer = ui.tree.node(grid.key()).unwrap().handles().unwrap().outer;
        let side_outer = ui.tree.node(side.key()).unwrap().handles().unwrap().outer;
        drop(ui);
        assert_eq!(
            host.style(outer, "grid-template-columns"),
            Some("200px calc(100% - 200px)")
        );
        assert_eq!(host.style(outer, "grid-template-rows"), Some("auto 1fr"));
        assert_eq!(host.style(side_outer, "max-height"), Some("100%"));
    }
}
