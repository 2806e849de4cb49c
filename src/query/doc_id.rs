//! Ordered document identifiers.

use std::fmt;

use serde::{Serialize, Serializer};

/// An opaque, byte-comparable document identifier.
///
/// Identifiers compare lexicographically on their bytes. Every searcher of a
/// single query draws its identifiers from the same order, which is what the
/// merge-join in [`BooleanSearcher`](crate::query::BooleanSearcher) aligns on.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(Vec<u8>);

impl DocId {
    /// Create an identifier from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        DocId(bytes.to_vec())
    }

    /// Create an identifier from a number.
    ///
    /// The number is encoded big-endian so that byte order and numeric order agree.
    pub fn from_u64(value: u64) -> Self {
        DocId(value.to_be_bytes().to_vec())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode the identifier as a number, if it was built by [`DocId::from_u64`].
    pub fn to_u64(&self) -> Option<u64> {
        let bytes: [u8; 8] = self.0.as_slice().try_into().ok()?;
        Some(u64::from_be_bytes(bytes))
    }

    /// Overwrite this identifier with `other`, reusing the existing buffer.
    pub fn copy_from(&mut self, other: &DocId) {
        self.0.clear();
        self.0.extend_from_slice(&other.0);
    }

    /// Clear the identifier, keeping its capacity.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Check if the identifier holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u64> for DocId {
    fn from(value: u64) -> Self {
        DocId::from_u64(value)
    }
}

/// 8-byte ids print as the number they encode, other ids as lowercase hex.
impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u64() {
            Some(n) => write!(f, "{n}"),
            None => {
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Serialized in its display form, so numeric ids read as numbers in JSON output.
///
/// Like `Display`, this cannot tell a [`DocId::from_u64`] id from any other
/// 8-byte id: every 8-byte id is written as the big-endian `u64` it encodes,
/// and only ids of other lengths are written as hex strings. Callers that mix
/// raw byte ids of length 8 with numeric ids should serialize
/// [`DocId::as_bytes`] themselves.
impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_u64() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.collect_str(self),
        }
    }
}

impl fmt::Debug for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocId({self})")
    }
}
