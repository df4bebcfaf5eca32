//! Per-node lifecycle state machine.
//!
//! ```text
//! Unattached -> Attached -> Captured          (normal operation, capture at unload)
//! Detached -> Reattached                      (restore: fields in, handles recreated)
//! any live state -> Destroyed                 (removed from parent or tree discarded)
//! ```
//!
//! Capture is re-entrant, so `Captured -> Captured` is allowed, and a captured
//! or reattached node keeps working normally (it may be attached, detached
//! and captured again).

/// Where a node is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed with a live handle, not yet placed under a parent or bound as root.
    #[default]
    Unattached,
    /// Added as a child or bound as the root.
    Attached,
    /// Snapshot taken; handle still live.
    Captured,
    /// Fields populated from a snapshot; no handle yet.
    Detached,
    /// Handle recreated and attached after a restore.
    Reattached,
    /// Removed for good.
    Destroyed,
}

impl Lifecycle {
    /// Whether the node has a usable render handle.
    pub fn has_handle(self) -> bool {
        !matches!(self, Lifecycle::Detached | Lifecycle::Destroyed)
    }

    /// Whether moving to `next` is a legal transition.
    pub fn can_advance_to(self, next: Lifecycle) -> bool {
        use Lifecycle::*;
        match (self, next) {
            (Destroyed, _) => false,
            (_, Destroyed) => true,
            (Detached, Reattached) => true,
            (Detached, _) | (_, Detached) => false,
            (_, Reattached) => false,
            (_, Unattached | Attached | Captured) => true,
        }
    }

    /// Move to `next`, asserting in debug builds that the transition is legal.
    #[must_use]
    pub fn advance(self, next: Lifecycle) -> Lifecycle {
        debug_assert!(
            self.can_advance_to(next),
            "illegal lifecycle transition {self:?} -> {next:?}"
        );
        next
    }
}
