//! SP3 header parsing.
pub(crate) mod line1;
pub(crate) mod line2;
pub mod version;

use crate::errors::ParsingError;
use crate::identifiers::Sp3Id;
use crate::time_system::TimeSystem;
use hifitime::{Duration, Epoch};
use version::Version;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use line1::Line1;
use line2::Line2;

/// Whether a file provides position-only or position+velocity records.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    #[default]
    Position,
    Velocity,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Position => f.write_str("P"),
            Self::Velocity => f.write_str("V"),
        }
    }
}

impl std::str::FromStr for DataType {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(Self::Position),
            "V" => Ok(Self::Velocity),
            _ => Err(ParsingError::MalformedH1),
        }
    }
}

/// Constellation content declared on the `#` header line, 9 variants per
/// the IGS SP3-d specification.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FileType {
    #[default]
    Gps,
    Mixed,
    Glonass,
    Leo,
    Sbas,
    Irnss,
    Galileo,
    Beidou,
    Qzss,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::Gps => "G",
            Self::Mixed => "M",
            Self::Glonass => "R",
            Self::Leo => "L",
            Self::Sbas => "S",
            Self::Irnss => "I",
            Self::Galileo => "E",
            Self::Beidou => "C",
            Self::Qzss => "J",
        })
    }
}

impl std::str::FromStr for FileType {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "G" => Ok(Self::Gps),
            "M" => Ok(Self::Mixed),
            "R" => Ok(Self::Glonass),
            "L" => Ok(Self::Leo),
            "S" => Ok(Self::Sbas),
            "I" => Ok(Self::Irnss),
            "E" => Ok(Self::Galileo),
            "C" => Ok(Self::Beidou),
            "J" => Ok(Self::Qzss),
            _ => Err(ParsingError::UnknownFileType(s.to_string())),
        }
    }
}

/// Orbit fitting method used to produce this file, as declared on header
/// line #1.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbitType {
    #[default]
    Fit,
    Ext,
    Bct,
    Bhn,
    Hlm,
}

impl std::fmt::Display for OrbitType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fit => f.write_str("FIT"),
            Self::Ext => f.write_str("EXT"),
            Self::Bct => f.write_str("BCT"),
            Self::Bhn => f.write_str("BHN"),
            Self::Hlm => f.write_str("HLM"),
        }
    }
}

impl std::str::FromStr for OrbitType {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIT" => Ok(Self::Fit),
            "EXT" => Ok(Self::Ext),
            "BCT" => Ok(Self::Bct),
            "BHN" => Ok(Self::Bhn),
            "HLM" => Ok(Self::Hlm),
            _ => Err(ParsingError::MalformedH1),
        }
    }
}

/// Parsed content of an SP3 file's header block (the `#`, `##`, `%c`, `%f`,
/// `%i` and `+`/`++` lines preceding the first epoch).
#[derive(Debug, Default, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    pub version: Version,

    /// File publication epoch, in [`Self::time_system`] (or GPS time for
    /// files that predate a declared time system).
    pub release_epoch: Epoch,

    /// Whether records carry velocity vectors.
    pub data_used: DataType,

    /// Constellation content of this file.
    pub file_type: FileType,

    /// Free-form coordinate system description, e.g. `"ITRF93"`.
    pub coord_system: String,

    pub orbit_type: OrbitType,

    /// Producing agency, as a short free-form code.
    pub agency: String,

    /// Time system all epochs in the data section are expressed in.
    pub time_system: TimeSystem,

    /// Total elapsed whole weeks since the GPS/GNSS time system epoch.
    pub week: u32,

    /// Total number of nanoseconds elapsed in the current week.
    pub week_nanos: u64,

    /// Datetime as a Modified Julian Day.
    pub mjd: u32,

    /// MJD fraction of day, in `[0, 1)`.
    pub mjd_fraction: f64,

    /// Nominal spacing between consecutive epochs.
    pub epoch_interval: Duration,

    /// Number of epochs declared on header line #1. Used as a
    /// cross-check against the number actually parsed.
    pub num_epochs: u64,

    /// SP3 ids of the satellites declared in the `+`/`++` header blocks.
    pub satellites: Vec<Sp3Id>,
}

impl Header {
    pub(crate) fn from_lines(line1: Line1, line2: Line2, satellites: Vec<Sp3Id>) -> Self {
        Self {
            version: line1.version,
            release_epoch: line1.epoch,
            data_used: line1.data_type,
            file_type: FileType::default(),
            coord_system: line1.coord_system,
            orbit_type: line1.orbit_type,
            agency: line1.agency,
            time_system: TimeSystem::default(),
            week: line2.week,
            week_nanos: line2.week_nanos,
            mjd: line2.mjd_fract.0,
            mjd_fraction: line2.mjd_fract.1,
            epoch_interval: line2.sampling_period,
            num_epochs: line1.num_epochs,
            satellites,
        }
    }
}
