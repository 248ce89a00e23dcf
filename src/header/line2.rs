//! Header line #2 (`##`) parsing.
use std::str::FromStr;

use crate::errors::ParsingError;
use hifitime::Duration;

pub(crate) fn is_header_line2(content: &str) -> bool {
    content.starts_with("##")
}

pub(crate) struct Line2 {
    pub week: u32,
    pub week_nanos: u64,

    /// (MJD, MJD fraction of day)
    pub mjd_fract: (u32, f64),

    pub sampling_period: Duration,
}

impl FromStr for Line2 {
    type Err = ParsingError;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if line.len() != 60 {
            return Err(ParsingError::MalformedH2);
        }

        let week = line[2..7]
            .trim()
            .parse::<u32>()
            .or(Err(ParsingError::WeekCounter))?;

        let week_seconds = line[7..14]
            .trim()
            .parse::<u64>()
            .or(Err(ParsingError::WeekSeconds))?;

        let mut week_nanos = line[15..23]
            .trim()
            .parse::<u64>()
            .or(Err(ParsingError::WeekSeconds))?;

        week_nanos *= 10;
        week_nanos += week_seconds * 1_000_000_000;

        let (dt_s, dt_nanos) = (line[24..29].trim(), line[30..38].trim());

        let dt_s = dt_s.parse::<u32>().or(Err(ParsingError::SamplingPeriod))? as i128;

        let dt_nanos = dt_nanos
            .parse::<u32>()
            .or(Err(ParsingError::SamplingPeriod))? as i128;

        let mjd = line[38..44]
            .trim()
            .parse::<u32>()
            .or(Err(ParsingError::Mjd))?;

        let mjd_fraction = line[44..]
            .trim()
            .parse::<f64>()
            .or(Err(ParsingError::Mjd))?;

        Ok(Self {
            week,
            week_nanos,
            mjd_fract: (mjd, mjd_fraction),
            sampling_period: Duration::from_total_nanoseconds(dt_s * 1_000_000_000 + dt_nanos * 10),
        })
    }
}
