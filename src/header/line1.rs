//! Header line #1 (`#c`/`#d`) parsing.
use std::str::FromStr;

use crate::errors::ParsingError;
use crate::header::{DataType, OrbitType, Version};
use hifitime::Epoch;

pub(crate) fn is_header_line1(content: &str) -> bool {
    content.starts_with('#')
}

pub(crate) struct Line1 {
    pub version: Version,
    pub data_type: DataType,
    pub epoch: Epoch,
    pub fit_type: String,
    pub num_epochs: u64,
    pub coord_system: String,
    pub orbit_type: OrbitType,
    pub agency: String,
}

impl FromStr for Line1 {
    type Err = ParsingError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if line.len() < 59 {
            return Err(ParsingError::MalformedH1);
        }

        let (y, m, d, hh, mm, ss, nanos) = (
            line[3..7].trim(),
            line[8..11].trim(),
            line[11..13].trim(),
            line[14..16].trim(),
            line[17..19].trim(),
            line[20..22].trim(),
            line[23..31].trim(),
        );

        let y = y.parse::<i32>().or(Err(ParsingError::MalformedH1))?;
        let m = m.parse::<u8>().or(Err(ParsingError::MalformedH1))?;
        let d = d.parse::<u8>().or(Err(ParsingError::MalformedH1))?;
        let hh = hh.parse::<u8>().or(Err(ParsingError::MalformedH1))?;
        let mm = mm.parse::<u8>().or(Err(ParsingError::MalformedH1))?;
        let ss = ss.parse::<u8>().or(Err(ParsingError::MalformedH1))?;
        let nanos = nanos.parse::<u32>().or(Err(ParsingError::MalformedH1))?;

        let epoch = Epoch::from_gregorian_utc(y, m, d, hh, mm, ss, nanos * 10);

        let num_epochs = line[32..40].trim();
        let num_epochs = num_epochs
            .parse::<u64>()
            .map_err(|_| ParsingError::NumberEpoch(num_epochs.to_string()))?;

        Ok(Self {
            epoch,
            num_epochs,
            fit_type: line[40..45].trim().to_string(),
            version: Version::from_str(&line[1..2])?,
            data_type: DataType::from_str(&line[2..3])?,
            coord_system: line[45..51].trim().to_string(),
            orbit_type: OrbitType::from_str(line[51..55].trim())?,
            agency: line[55..].trim().to_string(),
        })
    }
}
