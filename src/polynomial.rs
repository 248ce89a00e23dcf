//! Piecewise polynomial builder: fits one local ordinary-least-squares
//! polynomial per sample, over a sliding window centred on that sample, so
//! a satellite's tabulated [`Record`] series can be evaluated continuously
//! between epochs.
use hifitime::{Epoch, Unit};
use polyfit_rs::polyfit_rs::polyfit;

use crate::errors::BuildError;
use crate::record::Record;

/// One polynomial's validity window plus its per-axis coefficients.
///
/// `begin` and `offset` are seconds relative to the owning
/// [`PiecewisePolynomial::reference_time`]. Coefficients are ascending-degree
/// (`coeffs[0]` is the constant term) and evaluate directly in metres (or
/// metres/second) against `t - offset`, where `t` is likewise seconds
/// relative to `reference_time` — the fit's own mean/std normalisation has
/// already been folded back in, so no further scaling is needed at query
/// time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub(crate) begin: f64,
    pub(crate) offset: f64,

    coeffs_pos: [Vec<f64>; 3],
    coeffs_vel: [Vec<f64>; 3],
}

impl Interval {
    /// Evaluates the position polynomial at `tau` seconds relative to the
    /// owning polynomial's `reference_time`, returning ECEF metres.
    pub(crate) fn position_at(&self, tau: f64) -> (f64, f64, f64) {
        let x = tau - self.offset;
        (
            horner(&self.coeffs_pos[0], x),
            horner(&self.coeffs_pos[1], x),
            horner(&self.coeffs_pos[2], x),
        )
    }

    /// Evaluates the velocity polynomial at `tau`, returning metres/second.
    /// Either fit directly against source velocities, or the analytic
    /// derivative of the position polynomial when the source lacked them.
    pub(crate) fn velocity_at(&self, tau: f64) -> (f64, f64, f64) {
        let x = tau - self.offset;
        (
            horner(&self.coeffs_vel[0], x),
            horner(&self.coeffs_vel[1], x),
            horner(&self.coeffs_vel[2], x),
        )
    }
}

fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Analytic derivative of an ascending-degree coefficient vector, zero-padded
/// at the top so its length matches the input (degree reduces by one).
fn derivative_padded(coeffs: &[f64]) -> Vec<f64> {
    if coeffs.len() <= 1 {
        return vec![0.0; coeffs.len()];
    }
    let mut d: Vec<f64> = coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(power, &c)| c * power as f64)
        .collect();
    d.push(0.0);
    d
}

/// A satellite's full set of time-ordered, sliding-window-fit [`Interval`]s,
/// valid over the half-open range `[minimum_time, maximum_time)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PiecewisePolynomial {
    pub reference_time: Epoch,
    pub minimum_time: Epoch,
    pub maximum_time: Epoch,

    pub(crate) intervals: Vec<Interval>,
}

impl PiecewisePolynomial {
    /// Builds one polynomial of degree `degree` centred on each of
    /// `records[w..records.len() - w]`, each fit over the `2w + 1`
    /// surrounding samples.
    ///
    /// `w` must be at least 1, `2w + 1` must exceed `degree`, and `records`
    /// must hold at least `2w + 1` entries.
    pub fn build(records: &[Record], w: usize, degree: usize) -> Result<Self, BuildError> {
        if w < 1 {
            return Err(BuildError::InvalidParameters("window w must be at least 1"));
        }

        if 2 * w + 1 <= degree {
            return Err(BuildError::InvalidParameters(
                "2w + 1 must exceed the polynomial degree",
            ));
        }

        let n = records.len();
        let need = 2 * w + 1;
        if n < need {
            return Err(BuildError::InsufficientRecords { have: n, want: need });
        }

        let reference_time = records[0].time;
        let elapsed: Vec<f64> = records
            .iter()
            .map(|r| (r.time - reference_time).to_seconds())
            .collect();

        let all_have_velocity = records.iter().all(Record::has_velocity);

        let mut intervals = Vec::with_capacity(n - 2 * w);
        for i in w..(n - w) {
            let lo = i - w;
            let hi = i + w;
            let window = &records[lo..=hi];
            let offset = elapsed[i];
            let t_centered: Vec<f64> = elapsed[lo..=hi].iter().map(|t| t - offset).collect();

            // Midpoint between this centre and the previous one; the very
            // first interval instead starts exactly at its own centre, since
            // [`Self::minimum_time`] already rejects queries before it.
            let begin = if i == w {
                offset
            } else {
                offset - (offset - elapsed[i - 1]) / 2.0
            };

            let coeffs_pos = fit_window(&t_centered, window, degree, |r| r.position)?;

            let coeffs_vel = if all_have_velocity {
                fit_window(&t_centered, window, degree, |r| {
                    r.velocity.expect("checked all_have_velocity above")
                })?
            } else {
                [
                    derivative_padded(&coeffs_pos[0]),
                    derivative_padded(&coeffs_pos[1]),
                    derivative_padded(&coeffs_pos[2]),
                ]
            };

            intervals.push(Interval {
                begin,
                offset,
                coeffs_pos,
                coeffs_vel,
            });
        }

        let minimum_time = reference_time + elapsed[w] * Unit::Second;
        let maximum_time = reference_time + elapsed[n - w] * Unit::Second;

        Ok(Self {
            reference_time,
            minimum_time,
            maximum_time,
            intervals,
        })
    }
}

fn fit_window(
    t_centered: &[f64],
    window: &[Record],
    degree: usize,
    extract: impl Fn(&Record) -> (f64, f64, f64),
) -> Result<[Vec<f64>; 3], BuildError> {
    let mut out: [Vec<f64>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for (axis, slot) in out.iter_mut().enumerate() {
        let ys: Vec<f64> = window
            .iter()
            .map(|r| {
                let v = extract(r);
                match axis {
                    0 => v.0,
                    1 => v.1,
                    _ => v.2,
                }
            })
            .collect();

        let mean = ys.iter().sum::<f64>() / ys.len() as f64;
        let variance = ys.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / ys.len() as f64;
        let std = variance.sqrt().max(f64::EPSILON);

        let normalized: Vec<f64> = ys.iter().map(|y| (y - mean) / std).collect();

        let mut coeffs = polyfit(t_centered, &normalized, degree)
            .map_err(|_| BuildError::InvalidParameters("OLS fit failed"))?;

        for c in coeffs.iter_mut() {
            *c *= std;
        }
        coeffs[0] += mean;

        *slot = coeffs;
    }

    Ok(out)
}
