//! SP3/ILRS/NORAD satellite identifier vocabulary and the embedded catalog.
mod catalog;

pub use catalog::{lookup_norad, lookup_sp3, CatalogEntry};

use std::fmt;
use std::str::FromStr;

use crate::errors::ParsingError;

/// SP3 satellite vehicle id: one ASCII letter (constellation) followed by
/// two decimal digits (PRN/slot within that constellation), e.g. `"G01"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sp3Id(String);

impl Sp3Id {
    /// Validates and wraps `s` as an [`Sp3Id`].
    pub fn new(s: &str) -> Result<Self, ParsingError> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes[0].is_ascii_uppercase() || !bytes[1].is_ascii_digit() || !bytes[2].is_ascii_digit()
        {
            return Err(ParsingError::Identifier(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The single-letter constellation prefix, e.g. `'G'` for GPS.
    pub fn constellation(&self) -> char {
        self.0.as_bytes()[0] as char
    }
}

impl fmt::Display for Sp3Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sp3Id {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// ILRS identifier: 6 or 7 decimal digits, e.g. a satellite launch code
/// used for SLR (satellite laser ranging) cross-referencing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlrsId(String);

impl IlrsId {
    pub fn new(s: &str) -> Result<Self, ParsingError> {
        let len = s.len();
        if !(6..=7).contains(&len) || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsingError::Identifier(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IlrsId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IlrsId {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// NORAD catalog number: one or more decimal digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoradId(pub u32);

impl NoradId {
    pub fn new(s: &str) -> Result<Self, ParsingError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsingError::Identifier(s.to_string()));
        }
        let value = s.parse().map_err(|_| ParsingError::Identifier(s.to_string()))?;
        Ok(Self(value))
    }
}

impl fmt::Display for NoradId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoradId {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A satellite identifier: either the compact SP3 form or an ILRS code.
/// Mirrors the polymorphic `Id` used by satellite-catalog lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Id {
    Sp3(Sp3Id),
    Ilrs(IlrsId),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Sp3(id) => id.fmt(f),
            Self::Ilrs(id) => id.fmt(f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sp3_id_validates_shape() {
        assert!(Sp3Id::new("G01").is_ok());
        assert_eq!(Sp3Id::new("G01").unwrap().constellation(), 'G');
        assert!(Sp3Id::new("g01").is_err());
        assert!(Sp3Id::new("G1").is_err());
        assert!(Sp3Id::new("G123").is_err());
    }

    #[test]
    fn ilrs_id_accepts_6_or_7_digits() {
        assert!(IlrsId::new("110802").is_ok());
        assert!(IlrsId::new("1108021").is_ok());
        assert!(IlrsId::new("11080").is_err());
        assert!(IlrsId::new("11080a1").is_err());
    }

    #[test]
    fn norad_id_parses_plain_digits() {
        assert_eq!(NoradId::new("37846").unwrap(), NoradId(37846));
        assert!(NoradId::new("").is_err());
        assert!(NoradId::new("37a46").is_err());
    }
}
