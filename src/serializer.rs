//! Whole-tree capture into a text token and restore from one.

use tracing::debug;

use crate::error::{RestoreError, SnapshotError};
use crate::host::Host;
use crate::snapshot::{self, Snapshot};
use crate::widget::{NodeKey, WidgetTree};

/// Capture `root`'s subtree and encode it as a token.
///
/// Host-side drift (live input text, external classes) is pulled into the
/// tree first, so the tree itself is updated by this call. Capturing again
/// without host changes yields the same token.
pub fn capture_to_token(
    tree: &mut WidgetTree,
    host: &dyn Host,
    root: NodeKey,
) -> Result<String, SnapshotError> {
    tree.capture(host, root);
    let record = tree.snapshot(root)?;
    let nodes = record.node_count();
    let token = snapshot::encode(&Snapshot::new(record))?;
    debug!(nodes, bytes = token.len(), "captured widget tree");
    Ok(token)
}

/// Rebuild a live tree from a token. The returned tree's root is set, every
/// node has fresh handles attached under its parent's, and the allocator is
/// past every restored identity.
///
/// The host is only touched once the whole snapshot has decoded and
/// validated, so an error leaves it unchanged.
pub fn restore_from_token(token: &str, host: &mut dyn Host) -> Result<WidgetTree, RestoreError> {
    let snapshot = snapshot::decode(token)?;
    let mut tree = WidgetTree::new();
    let root = tree.insert_record(&snapshot.root)?;
    tree.recreate_handles(host, root);
    tree.reconcile_identity_and_attach(host, root);
    tree.set_root(root);
    debug!(nodes = tree.len(), next = tree.allocator().last_ordinal() + 1, "restored widget tree");
    Ok(tree)
}
