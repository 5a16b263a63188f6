//! Replay fingerprints over store content.

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{ComponentStore, Result, StoreError, snapshot};
use crate::state::{EntityId, Record, Turn};

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StoreError::Encoding(e.to_string()))
}

/// SHA-256 over `records` (expected in id order) followed by the turn.
pub(crate) fn digest_records<'r>(
    records: impl IntoIterator<Item = (EntityId, &'r Record)>,
    turn: Option<&Turn>,
) -> Result<[u8; 32]> {
    let mut hasher = Sha256::new();
    for (id, record) in records {
        hasher.update(id.0.to_le_bytes());
        hasher.update(encode(record)?);
    }
    hasher.update(encode(&turn)?);
    Ok(hasher.finalize().into())
}

/// Digest of any backend. Matches [`InMemoryStore::digest`](super::InMemoryStore::digest)
/// for equal content.
pub fn digest<S>(store: &S, turn: Option<&Turn>) -> Result<[u8; 32]>
where
    S: ComponentStore + ?Sized,
{
    let records = snapshot(store)?;
    digest_records(records.iter().map(|(id, record)| (*id, record)), turn)
}
