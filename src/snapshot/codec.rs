//! Token codec: bincode, then zlib, then standard base64.
//!
//! The schema version is the first field of [`Snapshot`], so it is decoded
//! on its own before the full payload. A token from another schema version
//! fails with [`DecodeError::Version`] instead of a confusing payload error.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::debug;

use super::{Snapshot, SNAPSHOT_VERSION};
use crate::error::{DecodeError, SnapshotError};

/// Encode a snapshot into a text token.
pub fn encode(snapshot: &Snapshot) -> Result<String, SnapshotError> {
    let payload = bincode::serialize(snapshot)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&payload)?;
    let compressed = encoder.finish()?;
    let token = STANDARD.encode(&compressed);
    debug!(
        payload = payload.len(),
        compressed = compressed.len(),
        token = token.len(),
        "encoded snapshot"
    );
    Ok(token)
}

/// Decode a text token into a snapshot.
pub fn decode(token: &str) -> Result<Snapshot, DecodeError> {
    let compressed = STANDARD.decode(token.trim())?;
    let mut payload = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut payload)
        .map_err(DecodeError::Decompress)?;

    let version: u32 = bincode::deserialize(&payload)?;
    if version != SNAPSHOT_VERSION {
        return Err(DecodeError::Version {
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(bincode::deserialize(&payload)?)
}
