//! Content-addressed identifiers.
//!
//! A value is serialized to compact JSON (serde derive order, no whitespace) and
//! hashed with SHA-256; the first 16 bytes are hex-encoded. Equal values always
//! map to equal ids. Two different values sharing an id are treated as the same
//! value: this is deduplication, not integrity checking.
//! Only hash structs and sequences; `HashMap` iteration order is not canonical.

use crate::error::{ConvertError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

const ID_BYTES: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(String);

impl ContentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash the canonical serialization of `value`.
pub fn content_id<T: Serialize + ?Sized>(value: &T) -> Result<ContentId> {
    let canonical = serde_json::to_vec(value).map_err(ConvertError::Serialization)?;
    let digest = Sha256::digest(&canonical);
    Ok(ContentId(hex::encode(&digest[..ID_BYTES])))
}
