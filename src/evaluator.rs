//! Evaluation of a [`PiecewisePolynomial`] at arbitrary UTC instants.
use hifitime::Epoch;

use crate::errors::{EvalError, Side};
use crate::polynomial::PiecewisePolynomial;

/// ECEF position (meters) and velocity (meters/second) at a queried instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub position: (f64, f64, f64),
    pub velocity: (f64, f64, f64),
}

/// Evaluates `pp` at a single `t`.
///
/// `t` must fall within `[pp.minimum_time, pp.maximum_time)`; otherwise
/// [`EvalError::OutOfRange`] identifies which side was missed. The matching
/// interval is found with a right-insertion binary search
/// (`slice::partition_point`) over each interval's `begin`, so a `t`
/// exactly on a boundary resolves to the interval that starts at it.
pub fn evaluate(pp: &PiecewisePolynomial, t: Epoch) -> Result<State, EvalError> {
    if t < pp.minimum_time {
        return Err(EvalError::OutOfRange(Side::Before));
    }

    if t >= pp.maximum_time {
        return Err(EvalError::OutOfRange(Side::After));
    }

    let tau = (t - pp.reference_time).to_seconds();
    let idx = pp.intervals.partition_point(|iv| iv.begin <= tau) - 1;
    let interval = &pp.intervals[idx];

    Ok(State {
        position: interval.position_at(tau),
        velocity: interval.velocity_at(tau),
    })
}

/// Evaluates `pp` at each instant in `ts`, in order.
pub fn evaluate_many(pp: &PiecewisePolynomial, ts: &[Epoch]) -> Result<Vec<State>, EvalError> {
    ts.iter().map(|&t| evaluate(pp, t)).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::{Correlations, Record};
    use hifitime::Unit;
    use std::str::FromStr;

    fn records(n: usize) -> Vec<Record> {
        let t0 = Epoch::from_str("2021-06-01T00:00:00 UTC").unwrap();
        (0..n)
            .map(|i| Record {
                time: t0 + (i as f64) * Unit::Second,
                position: (100.0 * i as f64, 0.0, 0.0),
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
            })
            .collect()
    }

    #[test]
    fn evaluates_within_range() {
        let recs = records(11);
        let pp = PiecewisePolynomial::build(&recs, 2, 1).unwrap();

        let t = recs[5].time + 0.4 * Unit::Second;
        let state = evaluate(&pp, t).unwrap();
        assert!((state.position.0 - 540.0).abs() < 1e-6);
    }

    #[test]
    fn before_range_is_an_error() {
        let recs = records(11);
        let pp = PiecewisePolynomial::build(&recs, 2, 1).unwrap();

        let t = recs[2].time - 1.0 * Unit::Second;
        assert_eq!(evaluate(&pp, t), Err(EvalError::OutOfRange(Side::Before)));
    }

    #[test]
    fn at_or_after_end_is_an_error() {
        let recs = records(11);
        let pp = PiecewisePolynomial::build(&recs, 2, 1).unwrap();

        let t = recs[9].time;
        assert_eq!(evaluate(&pp, t), Err(EvalError::OutOfRange(Side::After)));
    }
}
