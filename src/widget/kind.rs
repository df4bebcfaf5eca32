//! Widget kinds and the property tables that describe them.

use super::schema::{self, HandlerSpec, PropertySpec};

/// Structural type of a widget. Immutable once the widget exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Flex container.
    Panel,
    /// Grid container.
    Grid,
    Label,
    Button,
    /// A `div` wrapping an `input` element.
    TextInput,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::Panel,
        WidgetKind::Grid,
        WidgetKind::Label,
        WidgetKind::Button,
        WidgetKind::TextInput,
    ];

    /// Name used in snapshots and as the widget's CSS class.
    pub fn name(self) -> &'static str {
        match self {
            WidgetKind::Panel => "Panel",
            WidgetKind::Grid => "Grid",
            WidgetKind::Label => "Label",
            WidgetKind::Button => "Button",
            WidgetKind::TextInput => "TextInput",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Tag of the widget's own element.
    pub fn tag(self) -> &'static str {
        match self {
            WidgetKind::Panel | WidgetKind::Grid | WidgetKind::TextInput => "div",
            WidgetKind::Label => "label",
            WidgetKind::Button => "button",
        }
    }

    /// Whether the kind owns an ordered list of children.
    pub fn is_composite(self) -> bool {
        matches!(self, WidgetKind::Panel | WidgetKind::Grid)
    }

    pub fn is_focusable(self) -> bool {
        matches!(
            self,
            WidgetKind::Label | WidgetKind::Button | WidgetKind::TextInput
        )
    }

    /// Classes every widget of this kind starts with.
    pub fn initial_classes(self) -> Vec<String> {
        let mut classes = vec![self.name().to_owned(), "ui".to_owned()];
        match self {
            WidgetKind::Button => classes.push("button".to_owned()),
            WidgetKind::TextInput => classes.push("input".to_owned()),
            _ => {}
        }
        classes
    }

    fn property_groups(self) -> &'static [&'static [PropertySpec]] {
        use super::schema::*;
        match self {
            WidgetKind::Panel => &[BASE, COMPOSITE, PANEL],
            WidgetKind::Grid => &[BASE, COMPOSITE, GRID],
            WidgetKind::Label => &[BASE, FOCUSABLE, LABEL],
            WidgetKind::Button => &[BASE, FOCUSABLE, BUTTON],
            WidgetKind::TextInput => &[BASE, TEXT_INPUT, FOCUSABLE],
        }
    }

    /// Every property of this kind, in render order.
    pub fn properties(self) -> impl Iterator<Item = &'static PropertySpec> {
        self.property_groups().iter().flat_map(|group| group.iter())
    }

    pub fn property(self, name: &str) -> Option<&'static PropertySpec> {
        self.properties().find(|spec| spec.name == name)
    }

    /// Event handler slots of this kind.
    pub fn handlers(self) -> &'static [HandlerSpec] {
        match self {
            WidgetKind::Button => schema::CLICK,
            WidgetKind::TextInput => schema::CHANGE,
            _ => &[],
        }
    }

    pub fn handler(self, event: &str) -> Option<&'static HandlerSpec> {
        self.handlers().iter().find(|spec| spec.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_round_trip() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(WidgetKind::from_name("Slider"), None);
    }

    #[test]
    fn composites() {
        assert!(WidgetKind::Panel.is_composite());
        assert!(WidgetKind::Grid.is_composite());
        assert!(!WidgetKind::Button.is_composite());
    }

    #[test]
    fn kinds_combine_their_property_tables() {
        use crate::widget::schema::{BASE, BUTTON, COMPOSITE, FOCUSABLE, GRID, LABEL, PANEL, TEXT_INPUT};
        let count = |kind: WidgetKind| kind.properties().count();
        assert_eq!(count(WidgetKind::Panel), BASE.len() + COMPOSITE.len() + PANEL.len());
        assert_eq!(count(WidgetKind::Grid), BASE.len() + COMPOSITE.len() + GRID.len());
        assert_eq!(count(WidgetKind::Label), BASE.len() + FOCUSABLE.len() + LABEL.len());
        assert_eq!(count(WidgetKind::Button), BASE.len() + FOCUSABLE.len() + BUTTON.len());
        assert_eq!(count(WidgetKind::TextInput), BASE.len() + TEXT_INPUT.len() + FOCUSABLE.len());
        assert_eq!(WidgetKind::Grid.property("areas").map(|p| p.name), Some("areas"));
    }

    #[test]
    fn property_names_are_unique_per_kind() {
        for kind in WidgetKind::ALL {
            let mut seen = HashSet::new();
            for spec in kind.properties() {
                assert!(seen.insert(spec.name), "{} repeats {}", kind.name(), spec.name);
            }
        }
    }

    #[test]
    fn handler_fields_do_not_clash_with_properties() {
        for kind in WidgetKind::ALL {
            for handler in kind.handlers() {
                assert!(kind.property(handler.field).is_none());
            }
        }
    }

    #[test]
    fn kind_specific_properties() {
        assert!(WidgetKind::Panel.property("vertical").is_some());
        assert!(WidgetKind::Grid.property("columns").is_some());
        assert!(WidgetKind::Label.property("for").is_some());
        assert!(WidgetKind::Button.property("icon").is_some());
        assert!(WidgetKind::TextInput.property("placeholder").is_some());
        assert!(WidgetKind::Label.property("vertical").is_none());
        assert!(WidgetKind::Panel.property("enabled").is_none());
    }

    #[test]
    fn button_and_input_classes() {
        assert_eq!(WidgetKind::Button.initial_classes(), vec!["Button", "ui", "button"]);
        assert_eq!(WidgetKind::Label.initial_classes(), vec!["Label", "ui"]);
    }
}
