//! Widget events and event-target resolution.

use crate::id::{WidgetId, ID_SUPPLEMENT};

/// A host event delivered to a widget's handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEvent {
    /// Host event name (`click`, `change`).
    pub name: String,
    /// Widget the event originated on, resolved from the target element id.
    /// `None` when the element carries no widget identity.
    pub target: Option<WidgetId>,
    /// Widget whose handler is running.
    pub current: WidgetId,
}

/// Map the `id` attribute of an event target element to a widget identity.
///
/// Sub-elements carry `<id>_<suffix>` ids (`e5_input`, `e7_i`), so everything
/// from the first supplement separator on is stripped.
pub fn find_event_target(element_id: &str) -> Option<WidgetId> {
    let base = element_id
        .split_once(ID_SUPPLEMENT)
        .map_or(element_id, |(base, _)| base);
    WidgetId::parse(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_resolve() {
        assert_eq!(find_event_target("e12"), Some(WidgetId::from_ordinal(12)));
    }

    #[test]
    fn sub_element_ids_resolve_to_owner() {
        assert_eq!(find_event_target("e5_input"), Some(WidgetId::from_ordinal(5)));
        assert_eq!(find_event_target("e7_i"), Some(WidgetId::from_ordinal(7)));
    }

    #[test]
    fn foreign_ids_do_not_resolve() {
        assert_eq!(find_event_target("app"), None);
        assert_eq!(find_event_target(""), None);
        assert_eq!(find_event_target("_input"), None);
    }
}
