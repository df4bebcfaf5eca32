//! Error types for snapshot capture, token decoding, restore, and host binding.
//!
//! Decode and restore failures are recoverable: the session binder falls back
//! to a fresh tree. Capture failures mean a node leaked a non-persistable
//! field into the encoder and are treated as bugs by the caller.

use thiserror::Error;

/// A persisted token could not be turned back into a snapshot.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token is not valid base64.
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The compressed payload is truncated or corrupt.
    #[error("token payload failed to decompress: {0}")]
    Decompress(#[source] std::io::Error),
    /// The decompressed payload does not decode as a snapshot.
    #[error("snapshot payload is malformed: {0}")]
    Payload(#[from] bincode::Error),
    /// The snapshot was written by an incompatible schema version.
    #[error("snapshot schema version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Capturing a tree into a token failed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A field that cannot cross the capture boundary reached the encoder.
    #[error("field `{field}` of widget {widget} cannot be persisted")]
    NonPersistable { widget: String, field: String },
    /// Binary serialization failed.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] bincode::Error),
    /// Compression failed.
    #[error("failed to compress snapshot: {0}")]
    Compress(#[from] std::io::Error),
}

/// Rebuilding a tree from a token failed.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("unknown widget kind `{0}`")]
    UnknownKind(String),
    #[error("malformed widget identity `{0}`")]
    MalformedId(String),
    #[error("widget identity {0} appears more than once in the snapshot")]
    DuplicateId(String),
    #[error("field `{field}` of widget {widget} has an unexpected type")]
    FieldType { widget: String, field: String },
    #[error("widget {0} is not a composite but the snapshot gives it children")]
    UnexpectedChildren(String),
}

/// The host surface rejected an operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("mount point `{0}` does not exist")]
    MissingMountPoint(String),
}

/// Failure while driving a session through a load or unload.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
