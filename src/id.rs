//! Widget identities and the allocator that issues them.
//!
//! Identities render as `e<ordinal>` (`e1`, `e2`, ...). Elements that belong
//! to a widget but are not the widget's own element append a supplement
//! (`e5_input`). The allocator is owned by a [`WidgetTree`](crate::widget::WidgetTree)
//! rather than being process-global, so independent trees never share a counter.

use std::fmt;
use std::str::FromStr;

/// Prefix of every widget identity.
pub const ID_PREFIX: &str = "e";

/// Separator between a widget identity and a sub-element suffix.
pub const ID_SUPPLEMENT: char = '_';

/// Largest ordinal [`WidgetId::parse`] accepts. Leaves the allocator room to
/// keep counting after a restore.
pub const MAX_ORDINAL: u64 = i64::MAX as u64;

/// A widget identity, unique among the live widgets of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Build the identity with the given ordinal.
    pub const fn from_ordinal(ordinal: u64) -> Self {
        Self(ordinal)
    }

    /// The numeric ordinal (`7` for `e7`).
    pub fn ordinal(self) -> u64 {
        self.0
    }

    /// Id of a sub-element of this widget, e.g. `e5_input`.
    pub fn sub_element(self, suffix: &str) -> String {
        format!("{self}{ID_SUPPLEMENT}{suffix}")
    }

    /// Parse `e<digits>`. Leading zeros and signs are rejected so that every
    /// identity has exactly one textual form. Ordinals above [`MAX_ORDINAL`]
    /// are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix(ID_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        digits.parse().ok().filter(|&n| n <= MAX_ORDINAL).map(Self)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

impl FromStr for WidgetId {
    type Err = crate::error::RestoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::error::RestoreError::MalformedId(s.to_owned()))
    }
}

/// Issues monotonically increasing identities.
///
/// `next_id` and `advance_past` take `&mut self`; a multi-threaded host must
/// wrap the allocator in a lock so both stay atomic with respect to each other.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// An allocator whose first identity is `e1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh identity.
    pub fn next_id(&mut self) -> WidgetId {
        self.last += 1;
        WidgetId(self.last)
    }

    /// Make every later `next_id` return an ordinal strictly above `id`'s.
    pub fn advance_past(&mut self, id: WidgetId) {
        self.last = self.last.max(id.0);
    }

    /// Ordinal of the most recently issued (or advanced-past) identity.
    pub fn last_ordinal(&self) -> u64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_id_is_e1() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id().to_string(), "e1");
        assert_eq!(ids.next_id().to_string(), "e2");
    }

    #[test]
    fn advance_past_skips_ahead() {
        let mut ids = IdAllocator::new();
        ids.advance_past(WidgetId::from_ordinal(41));
        assert_eq!(ids.next_id().ordinal(), 42);
    }

    #[test]
    fn advance_past_never_goes_backwards() {
        let mut ids = IdAllocator::new();
        for _ in 0..10 {
            ids.next_id();
        }
        ids.advance_past(WidgetId::from_ordinal(3));
        assert_eq!(ids.next_id().ordinal(), 11);
    }

    #[test]
    fn independent_allocators_do_not_interfere() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        a.next_id();
        a.next_id();
        assert_eq!(b.next_id().ordinal(), 1);
    }

    #[test]
    fn parse_accepts_canonical_form() {
        assert_eq!(WidgetId::parse("e12"), Some(WidgetId::from_ordinal(12)));
        assert_eq!(WidgetId::parse("e0"), Some(WidgetId::from_ordinal(0)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for text in ["", "e", "12", "x12", "e012", "e-1", "e1a", "e 1"] {
            assert_eq!(WidgetId::parse(text), None, "{text:?}");
        }
    }

    #[test]
    fn parse_rejects_ordinals_near_overflow() {
        assert_eq!(WidgetId::parse(&format!("e{MAX_ORDINAL}")), Some(WidgetId::from_ordinal(MAX_ORDINAL)));
        assert_eq!(WidgetId::parse(&format!("e{}", MAX_ORDINAL + 1)), None);
        assert_eq!(WidgetId::parse("e18446744073709551615"), None);
        assert_eq!(WidgetId::parse("e99999999999999999999"), None);
    }

    #[test]
    fn from_str_reports_malformed_id() {
        let err = "nope".parse::<WidgetId>().unwrap_err();
        assert_eq!(err.to_string(), "malformed widget identity `nope`");
    }

    #[test]
    fn sub_element_id() {
        assert_eq!(WidgetId::from_ordinal(5).sub_element("input"), "e5_input");
    }
}
