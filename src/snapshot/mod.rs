//! Structural snapshot of a widget subtree.
//!
//! A [`Snapshot`] is a schema version tag plus the root [`NodeRecord`]. Each
//! record carries the widget kind name, its identity, its persistable fields
//! and its ordered child records. [`codec`] turns a snapshot into a text
//! token and back.

pub mod codec;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::id::WidgetId;
use crate::widget::node::Field;
use crate::widget::{Value, WidgetKind};

pub use codec::{decode, encode};

/// Version written into every snapshot. Bump when a record's shape or a
/// property's meaning changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One widget in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub kind: String,
    pub id: String,
    pub fields: BTreeMap<String, Value>,
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    /// Build a record from a node's state after non-persistable fields were
    /// excluded. Any handle, parent link or closure still present is an error.
    pub fn from_state(
        kind: WidgetKind,
        id: WidgetId,
        state: BTreeMap<String, Field>,
        children: Vec<NodeRecord>,
    ) -> Result<Self, SnapshotError> {
        let mut fields = BTreeMap::new();
        for (name, field) in state {
            let value = match field {
                Field::Value(value) => value,
                Field::Handler(handler) => match handler.name() {
                    Some(registered) => Value::Handler(registered.to_owned()),
                    None => return Err(non_persistable(id, name)),
                },
                Field::Handles(_) | Field::Parent(_) => return Err(non_persistable(id, name)),
            };
            fields.insert(name, value);
        }
        Ok(Self {
            kind: kind.name().to_owned(),
            id: id.to_string(),
            fields,
            children,
        })
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// This record and all descendants, depth-first, children in order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of records in this subtree.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

fn non_persistable(id: WidgetId, field: String) -> SnapshotError {
    SnapshotError::NonPersistable {
        widget: id.to_string(),
        field,
    }
}

/// Pre-order iterator over a record subtree.
pub struct Walk<'a> {
    stack: Vec<&'a NodeRecord>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a NodeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.stack.pop()?;
        self.stack.extend(record.children.iter().rev());
        Some(record)
    }
}

/// A versioned snapshot of a whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub root: NodeRecord,
}

impl Snapshot {
    pub fn new(root: NodeRecord) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            root,
        }
    }
}
