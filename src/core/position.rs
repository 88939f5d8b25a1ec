//! Opaque position identity.
//!
//! The solver never interprets a position: it hashes and compares the raw
//! bytes produced by a game's encoder. Symmetry reduction, if any, must already
//! be applied by the game before a position reaches the solver.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Byte identity of a game position.
///
/// Stored inline for encodings up to 16 bytes, which covers every bundled
/// game. Larger encodings spill to the heap transparently.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(SmallVec<[u8; 16]>);

impl Position {
    /// Create a position from its encoded bytes.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self(SmallVec::from_slice(bytes))
    }

    /// The encoded bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the encoding in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the encoding is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Position {
    fn from(bytes: Vec<u8>) -> Self {
        Self(SmallVec::from_vec(bytes))
    }
}

impl From<&[u8]> for Position {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl<const N: usize> From<[u8; N]> for Position {
    fn from(bytes: [u8; N]) -> Self {
        Self::new(&bytes)
    }
}

impl AsRef<[u8]> for Position {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("'")?;
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        f.write_str("'")
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Position({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_identity() {
        let a = Position::new(&[1, 2, 3]);
        let b = Position::from(vec![1, 2, 3]);
        let c = Position::from([1, 2, 4]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 3);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_position_display_is_hex() {
        let p = Position::new(&[0x00, 0xab, 0x15]);
        assert_eq!(format!("{}", p), "'00ab15'");
        assert_eq!(format!("{:?}", p), "Position('00ab15')");
    }

    #[test]
    fn test_position_spills_past_inline_capacity() {
        let bytes: Vec<u8> = (0..40).collect();
        let p = Position::from(bytes.clone());
        assert_eq!(p.as_bytes(), bytes.as_slice());
    }
}
