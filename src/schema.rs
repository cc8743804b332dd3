//! Document zones and zone masks.
//!
//! A zone is a named sub-region of a case document whose term occurrences
//! are tracked separately: the judgment body, the case title, and the
//! singleton year/date/court/citation fields. Bit assignments are an
//! internal detail of the index format.

use serde::{Deserialize, Serialize};

/// A logical zone of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Case title.
    Title,
    /// Judgment body text (the only zone with positional data).
    Content,
    /// Year the case was decided.
    Year,
    /// Full decision date.
    Date,
    /// Court that decided the case.
    Court,
    /// Neutral citation.
    Citation,
}

impl Zone {
    /// The bit this zone occupies in a [`ZoneMask`].
    pub fn bit(self) -> u8 {
        match self {
            Zone::Title => 0b0000_0001,
            Zone::Content => 0b0000_0010,
            Zone::Year => 0b0000_0100,
            Zone::Date => 0b0000_1000,
            Zone::Court => 0b0001_0000,
            Zone::Citation => 0b0010_0000,
        }
    }
}

/// A bitmask over the zones a term appears in for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneMask(u8);

impl ZoneMask {
    /// An empty mask.
    pub fn empty() -> Self {
        ZoneMask(0)
    }

    /// Create a mask from its raw byte representation.
    pub fn from_bits(bits: u8) -> Self {
        ZoneMask(bits)
    }

    /// Raw byte representation.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Add a zone to the mask.
    pub fn insert(&mut self, zone: Zone) {
        self.0 |= zone.bit();
    }

    /// Check whether the mask contains a zone.
    pub fn contains(self, zone: Zone) -> bool {
        self.0 & zone.bit() != 0
    }

    /// Union with another mask.
    pub fn union(self, other: ZoneMask) -> ZoneMask {
        ZoneMask(self.0 | other.0)
    }

    /// Whether no zone is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut mask = ZoneMask::empty();
        assert!(mask.is_empty());

        mask.insert(Zone::Content);
        mask.insert(Zone::Title);

        assert!(mask.contains(Zone::Content));
        assert!(mask.contains(Zone::Title));
        assert!(!mask.contains(Zone::Year));
    }

    #[test]
    fn test_union() {
        let mut a = ZoneMask::empty();
        a.insert(Zone::Content);
        let mut b = ZoneMask::empty();
        b.insert(Zone::Court);

        let merged = a.union(b);
        assert!(merged.contains(Zone::Content));
        assert!(merged.contains(Zone::Court));
    }

    #[test]
    fn test_bits_round_trip() {
        let mut mask = ZoneMask::empty();
        mask.insert(Zone::Date);
        mask.insert(Zone::Citation);

        assert_eq!(ZoneMask::from_bits(mask.bits()), mask);
    }
}
