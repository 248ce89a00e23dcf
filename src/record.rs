//! A single epoch's worth of state for one satellite.
use hifitime::Epoch;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The twelve optional position/velocity correlation coefficients carried by
/// `EP`/`EV` records. Always `None` until a conforming parser for those
/// lines is added (see [`crate::errors::ParsingError::UnsupportedFeature`]).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Correlations {
    pub xy: Option<f64>,
    pub xz: Option<f64>,
    pub xc: Option<f64>,
    pub yz: Option<f64>,
    pub yc: Option<f64>,
    pub zc: Option<f64>,
    pub xy_velocity: Option<f64>,
    pub xz_velocity: Option<f64>,
    pub xc_velocity: Option<f64>,
    pub yz_velocity: Option<f64>,
    pub yc_velocity: Option<f64>,
    pub zc_velocity: Option<f64>,
}

/// One tabulated ECEF state for a satellite, at a single instant.
///
/// Positions are meters, velocities are meters/second, clock offsets are
/// seconds, clock drift is seconds/second — all already converted from the
/// file's native km/dm/us/1e-4 s/s units during parsing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    /// Epoch of this record, always expressed in UTC.
    pub time: Epoch,

    pub position: (f64, f64, f64),
    pub position_std: Option<(f64, f64, f64)>,

    pub velocity: Option<(f64, f64, f64)>,
    pub velocity_std: Option<(f64, f64, f64)>,

    pub clock: Option<f64>,
    pub clock_std: Option<f64>,

    pub clock_rate: Option<f64>,
    pub clock_rate_std: Option<f64>,

    pub clock_event: bool,
    pub clock_predicted: bool,
    pub maneuver: bool,
    pub orbit_predicted: bool,

    pub correlations: Correlations,
}

impl Record {
    /// `true` when this record provides a velocity vector.
    pub fn has_velocity(&self) -> bool {
        self.velocity.is_some()
    }
}
