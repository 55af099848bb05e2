//! Binary snapshot of an [`EntityStore`].
//!
//! Layout: 4-byte magic `SRAT`, 1-byte format version, postcard payload.

use crate::model::{Rating, Store, User};
use crate::store::{EntityStore, RatingPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Magic bytes at the start of every snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"SRAT";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u8 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 1;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("snapshot is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("not a storerate snapshot (bad magic)")]
    BadMagic,

    #[error("unsupported snapshot version {found}")]
    UnsupportedVersion { found: u8 },

    #[error("snapshot payload error: {0}")]
    Payload(#[from] postcard::Error),
}

#[derive(Serialize, Deserialize)]
struct PersistedState {
    policy: RatingPolicy,
    users: Vec<User>,
    stores: Vec<Store>,
    ratings: Vec<Rating>,
}

/// Encode the store's collections and policy.
pub fn encode_snapshot(store: &EntityStore) -> Result<Vec<u8>, FormatError> {
    let state = PersistedState {
        policy: store.policy(),
        users: store.users().to_vec(),
        stores: store.stores().to_vec(),
        ratings: store.ratings().to_vec(),
    };
    let payload = postcard::to_stdvec(&state)?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&SNAPSHOT_MAGIC);
    bytes.push(SNAPSHOT_VERSION);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a snapshot produced by [`encode_snapshot`].
pub fn decode_snapshot(bytes: &[u8]) -> Result<EntityStore, FormatError> {
    let (header, payload) = bytes
        .split_at_checked(HEADER_LEN)
        .ok_or(FormatError::Truncated(bytes.len()))?;
    if header[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(FormatError::BadMagic);
    }
    let found = header[SNAPSHOT_MAGIC.len()];
    if found != SNAPSHOT_VERSION {
        return Err(FormatError::UnsupportedVersion { found });
    }

    let state: PersistedState = postcard::from_bytes(payload)?;
    Ok(EntityStore::from_parts(
        state.users,
        state.stores,
        state.ratings,
        state.policy,
    ))
}
