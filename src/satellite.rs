//! Per-satellite record series.
use crate::errors::ParsingError;
use crate::identifiers::Sp3Id;
use crate::record::Record;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One satellite's declared accuracy code and its ascending-time series of
/// tabulated [`Record`]s.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Satellite {
    pub id: Sp3Id,

    /// Declared accuracy exponent (base-2 mm), `None` when the `+`/`++`
    /// header blocks omitted it or declared the "unknown" sentinel.
    pub accuracy: Option<i8>,

    /// Always sorted ascending by [`Record::time`].
    pub records: Vec<Record>,
}

impl Satellite {
    /// Creates a satellite from an already-sorted record series.
    ///
    /// Returns [`ParsingError::UnsortedRecords`] if `records` is not sorted
    /// ascending by time: this is a property of the source file, not of any
    /// builder parameter, so it surfaces as a parsing error.
    pub fn new(id: Sp3Id, accuracy: Option<i8>, records: Vec<Record>) -> Result<Self, ParsingError> {
        if !records.windows(2).all(|w| w[0].time < w[1].time) {
            return Err(ParsingError::UnsortedRecords(id.to_string()));
        }

        Ok(Self {
            id,
            accuracy,
            records,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::Correlations;
    use hifitime::Epoch;
    use std::str::FromStr;

    fn record(t: &str) -> Record {
        Record {
            time: Epoch::from_str(t).unwrap(),
            position: (0.0, 0.0, 0.0),
            position_std: None,
            velocity: None,
            velocity_std: None,
            clock: None,
            clock_std: None,
            clock_rate: None,
            clock_rate_std: None,
            clock_event: false,
            clock_predicted: false,
            maneuver: false,
            orbit_predicted: false,
            correlations: Correlations::default(),
        }
    }

    #[test]
    fn rejects_unsorted_records() {
        let records = vec![
            record("2021-01-01T00:15:00 UTC"),
            record("2021-01-01T00:00:00 UTC"),
        ];
        let sv = Sp3Id::new("G01").unwrap();
        assert!(Satellite::new(sv, None, records).is_err());
    }

    #[test]
    fn accepts_sorted_records() {
        let records = vec![
            record("2021-01-01T00:00:00 UTC"),
            record("2021-01-01T00:15:00 UTC"),
        ];
        let sv = Sp3Id::new("G01").unwrap();
        assert!(Satellite::new(sv, Some(3), records).is_ok());
    }
}
