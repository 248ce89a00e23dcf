//! `V` (velocity/clock-rate) record line parsing.
use std::str::FromStr;

use crate::errors::ParsingError;
use crate::identifiers::Sp3Id;

pub(crate) fn is_velocity_line(content: &str) -> bool {
    content.starts_with('V')
}

pub(crate) struct VelocityLine {
    pub sv: Sp3Id,
    pub x_km_s: f64,
    pub y_km_s: f64,
    pub z_km_s: f64,
    pub clock_rate: Option<f64>,

    /// Base-`position_base`/`clock_base` standard deviation exponents, `None`
    /// when the corresponding column is blank or absent.
    pub exp_x: Option<i32>,
    pub exp_y: Option<i32>,
    pub exp_z: Option<i32>,
    pub exp_clock_rate: Option<i32>,
}

impl VelocityLine {
    pub fn parse(line: &str) -> Result<Self, ParsingError> {
        if line.len() < 46 {
            return Err(ParsingError::MalformedLine {
                line: 0,
                expected: "V-record",
            });
        }

        let sv = Sp3Id::from_str(line[1..4].trim())?;

        let x_km_s = f64::from_str(line[4..18].trim())
            .map_err(|_| ParsingError::Coordinates(line[4..18].to_string()))?
            * 1.0E-4;

        let y_km_s = f64::from_str(line[18..32].trim())
            .map_err(|_| ParsingError::Coordinates(line[18..32].to_string()))?
            * 1.0E-4;

        let z_km_s = f64::from_str(line[32..46].trim())
            .map_err(|_| ParsingError::Coordinates(line[32..46].to_string()))?
            * 1.0E-4;

        let mut clock_rate = None;
        if line.len() > 51 && !line[45..52].trim().eq("999999.") {
            let clk = f64::from_str(line[46..60].trim())
                .map_err(|_| ParsingError::Clock(line[46..60].to_string()))?;
            clock_rate = Some(clk);
        }

        let parse_exp = |field: &str| -> Option<i32> {
            let trimmed = field.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<i32>().ok()
            }
        };

        let (exp_x, exp_y, exp_z, exp_clock_rate) = if line.len() >= 73 {
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
            x_km_s,
            y_km_s,
            z_km_s,
            clock_rate,
            exp_x,
            exp_y,
            exp_z,
            exp_clock_rate,
        })
    }
}
