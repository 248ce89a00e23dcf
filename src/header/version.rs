//! SP3 file revision.
use crate::errors::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SP3-C and SP3-D are the only revisions this parser accepts; earlier
/// revisions (SP3-a, SP3-b) are rejected with
/// [`ParsingError::NonSupportedRevision`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Version {
    C,
    D,
}

impl Default for Version {
    fn default() -> Self {
        Self::C
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::C => f.write_str("c"),
            Self::D => f.write_str("d"),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" | "C" => Ok(Self::C),
            "d" | "D" => Ok(Self::D),
            other => Err(ParsingError::NonSupportedRevision(
                other.chars().next().unwrap_or('?'),
            )),
        }
    }
}
