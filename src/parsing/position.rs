//! `P` (position/clock) record line parsing.
use std::str::FromStr;

use crate::errors::ParsingError;
use crate::identifiers::Sp3Id;

pub(crate) fn is_position_line(content: &str) -> bool {
    content.starts_with('P')
}

pub(crate) struct PositionLine {
    pub sv: Sp3Id,
    pub x_km: f64,
    pub y_km: f64,
    pub z_km: f64,
    pub clock_us: Option<f64>,
    pub clock_event: bool,
    pub clock_prediction: bool,
    pub maneuver: bool,
    pub orbit_prediction: bool,

    /// Base-`position_base`/`clock_base` standard deviation exponents, `None`
    /// when the corresponding column is blank.
    pub exp_x: Option<i32>,
    pub exp_y: Option<i32>,
    pub exp_z: Option<i32>,
    pub exp_clock: Option<i32>,
}

impl PositionLine {
    pub fn parse(line: &str) -> Result<Self, ParsingError> {
        let line_len = line.len();

        if line_len < 46 {
            return Err(ParsingError::MalformedLine {
                line: 0,
                expected: "P-record",
            });
        }

        let sv = Sp3Id::from_str(line[1..4].trim())?;

        let x_km = f64::from_str(line[4..18].trim())
            .map_err(|_| ParsingError::Coordinates(line[4..18].to_string()))?;

        let y_km = f64::from_str(line[18..32].trim())
            .map_err(|_| ParsingError::Coordinates(line[18..32].to_string()))?;

        let z_km = f64::from_str(line[32..46].trim())
            .map_err(|_| ParsingError::Coordinates(line[32..46].to_string()))?;

        let mut clock_us = None;
        if line_len > 51 && !line[45..52].trim().eq("999999.") {
            let clk = f64::from_str(line[46..60].trim())
                .map_err(|_| ParsingError::Clock(line[46..60].to_string()))?;
            clock_us = Some(clk);
        }

        let clock_event = line_len > 74 && &line[74..75] == "E";
        let clock_prediction = line_len > 75 && &line[75..76] == "P";
        let maneuver = line_len > 78 && &line[78..79] == "M";
        let orbit_prediction = line_len > 79 && &line[79..80] == "P";

        let parse_exp = |field: &str| -> Option<i32> {
            let trimmed = field.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<i32>().ok()
            }
        };

        let (exp_x, exp_y, exp_z, exp_clock) = if line_len >= 73 {
            (
                parse_exp(&line[61..63]),
                parse_exp(&line[64..66]),
                parse_exp(&line[67..69]),
                parse_exp(&line[70..73]),
            )
        } else {
            (None, None, None, None)
        };

        Ok(Self {
            sv,
            x_km,
            y_km,
            z_km,
            clock_us,
            clock_event,
            clock_prediction,
            maneuver,
            orbit_prediction,
            exp_x,
            exp_y,
            exp_z,
            exp_clock,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_plain_position_line() {
        let p = PositionLine::parse(
            "PC01 -32312.652253  27060.656563    205.195454     63.035497",
        )
        .unwrap();

        assert_eq!(p.sv.as_str(), "C01");
        assert_eq!(p.x_km, -32312.652253);
        assert_eq!(p.y_km, 27060.656563);
        assert_eq!(p.z_km, 205.195454);
        assert_eq!(p.clock_us, Some(63.035497));
        assert!(!p.clock_event);
        assert!(!p.maneuver);
    }

    #[test]
    fn parses_flags() {
        let p = PositionLine::parse(
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 10  9 11 102 EP  MP",
        )
        .unwrap();

        assert!(p.clock_event);
        assert!(p.clock_prediction);
        assert!(p.maneuver);
        assert!(p.orbit_prediction);
        assert_eq!(p.exp_x, Some(10));
        assert_eq!(p.exp_y, Some(9));
        assert_eq!(p.exp_z, Some(11));
        assert_eq!(p.exp_clock, Some(102));
    }

    #[test]
    fn blank_exponents_are_none() {
        let p = PositionLine::parse(
            "PC01 -32312.652253  27060.656563    205.195454     63.035497",
        )
        .unwrap();
        assert_eq!(p.exp_x, None);
        assert_eq!(p.exp_y, None);
        assert_eq!(p.exp_z, None);
        assert_eq!(p.exp_clock, None);
    }

    #[test]
    fn missing_clock_is_sentinel() {
        let p = PositionLine::parse(
            "PG23      0.000000      0.000000      0.000000 999999.999999                  M",
        )
        .unwrap();
        assert_eq!(p.clock_us, Some(999999.999999));
    }
}
