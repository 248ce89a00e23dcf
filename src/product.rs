//! Top-level parsed SP3 product: header, comments and per-satellite series.
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

use crate::errors::{CatalogError, Error, ParsingError};
use crate::header::line1::{is_header_line1, Line1};
use crate::header::line2::{is_header_line2, Line2};
use crate::header::Header;
use crate::identifiers::Sp3Id;
use crate::parsing::position::{is_position_line, PositionLine};
use crate::parsing::velocity::{is_velocity_line, VelocityLine};
use crate::record::{Correlations, Record};
use crate::satellite::Satellite;
use crate::time_system::TimeSystem;

fn is_comment(line: &str) -> bool {
    line.starts_with('/')
}

fn is_satellite_block(line: &str) -> bool {
    line.starts_with('+')
}

fn is_percent_c(line: &str) -> bool {
    line.starts_with("%c")
}

fn is_percent_f(line: &str) -> bool {
    line.starts_with("%f")
}

fn is_percent_other(line: &str) -> bool {
    line.starts_with('%') && !line.starts_with("%c") && !line.starts_with("%f")
}

/// Extracts `(position_base, clock_base)` from a `%f` header line's first
/// occurrence (the second `%f` line is a fixed, degenerate `0.0...` pattern
/// and carries no information).
fn parse_percent_f(line: &str) -> Option<(f64, f64)> {
    if line.len() < 26 {
        return None;
    }
    let position_base = line[3..13].trim().parse::<f64>().ok()?;
    let clock_base = line[14..26].trim().parse::<f64>().ok()?;
    Some((position_base, clock_base))
}

/// GPS time system reference epoch (1980-01-06 00:00:00 UTC), used to
/// cross-check header line #2's declared week/seconds-of-week against the
/// first parsed epoch.
fn gps_week_epoch() -> hifitime::Epoch {
    hifitime::Epoch::from_gregorian_utc(1980, 1, 6, 0, 0, 0, 0)
}

fn is_new_epoch(line: &str) -> bool {
    line.starts_with('*')
}

fn is_eof(line: &str) -> bool {
    line.trim_end() == "EOF"
}

type GregorianFields = (i32, u8, u8, u8, u8, u8, u32);

fn parse_epoch_fields(line: &str) -> Result<GregorianFields, ParsingError> {
    // "*  2021 12 16  0  0  0.00000000"
    if line.len() < 29 {
        return Err(ParsingError::EpochParsing);
    }

    let y = line[3..7].trim().parse::<i32>().map_err(|_| ParsingError::EpochParsing)?;
    let m = line[8..10].trim().parse::<u8>().map_err(|_| ParsingError::EpochParsing)?;
    let d = line[11..13].trim().parse::<u8>().map_err(|_| ParsingError::EpochParsing)?;
    let hh = line[14..16].trim().parse::<u8>().map_err(|_| ParsingError::EpochParsing)?;
    let mm = line[17..19].trim().parse::<u8>().map_err(|_| ParsingError::EpochParsing)?;
    let ss_str = line[20..].trim();
    let ss_f = ss_str.parse::<f64>().map_err(|_| ParsingError::EpochParsing)?;
    let ss = ss_f.floor() as u8;
    let nanos = ((ss_f - ss_f.floor()) * 1.0e9).round() as u32;

    Ok((y, m, d, hh, mm, ss, nanos))
}

/// Validates the header's GPS-week/SOW and MJD fields against the first
/// parsed epoch, and every parsed epoch against the declared start +
/// `k * epoch_interval` grid. All raw digits here are pre-time-system, the
/// same convention header line #1/#2 already use for [`Header::release_epoch`].
fn check_epoch_grid(header: &Header, raw_epochs: &[hifitime::Epoch]) -> Result<(), ParsingError> {
    let Some(&first) = raw_epochs.first() else {
        return Ok(());
    };

    let tolerance = hifitime::Duration::from_microseconds(1.0);

    for (k, &raw) in raw_epochs.iter().enumerate() {
        let step_nanos = header.epoch_interval.total_nanoseconds() * k as i128;
        let expected = header.release_epoch + hifitime::Duration::from_total_nanoseconds(step_nanos);
        if (raw - expected).abs() > tolerance {
            return Err(ParsingError::HeaderInconsistent(format!(
                "epoch #{k} ({raw}) does not fall on the declared {} grid starting at {}",
                header.epoch_interval, header.release_epoch
            )));
        }
    }

    let week_nanos = header.week as i128 * 7 * 86_400 * 1_000_000_000 + header.week_nanos as i128;
    let week_reading = gps_week_epoch() + hifitime::Duration::from_total_nanoseconds(week_nanos);
    if (week_reading - first).abs() > tolerance {
        return Err(ParsingError::HeaderInconsistent(format!(
            "declared GPS week/SOW ({week_reading}) does not match the first epoch ({first})"
        )));
    }

    let mjd_reading = hifitime::Epoch::from_mjd_utc(header.mjd as f64 + header.mjd_fraction);
    if (mjd_reading - first).abs() > tolerance {
        return Err(ParsingError::HeaderInconsistent(format!(
            "declared MJD ({mjd_reading}) does not match the first epoch ({first})"
        )));
    }

    Ok(())
}

/// A fully parsed SP3 file: header metadata, free-form comments, and one
/// ascending-time record series per declared satellite.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    pub header: Header,
    pub comments: Vec<String>,
    pub satellites: Vec<Satellite>,
}

impl Product {
    /// Parses an SP3 product from an in-memory buffer.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        let mut line1: Option<Line1> = None;
        let mut line2: Option<Line2> = None;
        let mut time_system = TimeSystem::default();
        let mut file_type_char = 'G';
        let mut declared_ids: Vec<Sp3Id> = Vec::new();
        let mut declared_accuracy: Vec<Option<i8>> = Vec::new();
        let mut comments = Vec::new();
        let mut per_sv: BTreeMap<Sp3Id, Vec<Record>> = BTreeMap::new();

        let mut current_epoch: Option<hifitime::Epoch> = None;
        let mut raw_epochs: Vec<hifitime::Epoch> = Vec::new();
        let mut position_base = 2.0f64;
        let mut clock_base = 2.0f64;
        let mut seen_percent_f = false;
        let mut seen_eof = false;
        let mut trailing_bytes = 0usize;
        let mut line_no = 0usize;

        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            if read == 0 {
                break;
            }
            line_no += 1;
            let content = line.trim_end_matches(['\n', '\r']);

            if seen_eof {
                trailing_bytes += content.len();
                continue;
            }

            if content.is_empty() {
                continue;
            } else if is_comment(content) {
                comments.push(content.trim_start_matches('/').trim().to_string());
            } else if is_header_line1(content) && line1.is_none() {
                line1 = Some(Line1::from_str(content).inspect_err(|_| {
                    warn!("line {line_no}: malformed header line #1");
                })?);
            } else if is_header_line2(content) && line2.is_none() {
                line2 = Some(Line2::from_str(content)?);
            } else if is_percent_c(content) {
                if content.len() > 3 {
                    if let Some(c) = content[3..4].chars().next() {
                        if c != 'c' {
                            file_type_char = c;
                        }
                    }
                }
                if content.len() >= 12 {
                    let tag = content[9..12].trim();
                    if let Ok(ts) = TimeSystem::from_str(tag) {
                        time_system = ts;
                    }
                }
            } else if is_percent_f(content) {
                // Only the first `%f` line (`f0`) carries real exponent bases;
                // the second is a fixed, degenerate all-zero pattern.
                if !seen_percent_f {
                    if let Some((pb, cb)) = parse_percent_f(content) {
                        position_base = pb;
                        clock_base = cb;
                    }
                    seen_percent_f = true;
                }
            } else if is_percent_other(content) {
                // %i and similar auxiliary lines are accepted but not decoded.
                debug!("line {line_no}: ignoring auxiliary header line \"{content}\"");
            } else if is_satellite_block(content) {
                if content.starts_with("++") {
                    // accuracy block: series of 3-digit exponents
                    for chunk in content[9..].as_bytes().chunks(3) {
                        if chunk.len() < 3 {
                            continue;
                        }
                        let s = std::str::from_utf8(chunk).unwrap_or("").trim();
                        match s.parse::<i8>() {
                            Ok(v) if v != 0 => declared_accuracy.push(Some(v)),
                            _ => declared_accuracy.push(None),
                        }
                    }
                } else {
                    for chunk in content[9..].as_bytes().chunks(3) {
                        if chunk.len() < 3 {
                            continue;
                        }
                        let s = std::str::from_utf8(chunk).unwrap_or("").trim();
                        if s.is_empty() || s == "0" {
                            continue;
                        }
                        if let Ok(id) = Sp3Id::from_str(s) {
                            declared_ids.push(id);
                        }
                    }
                }
            } else if is_new_epoch(content) {
                let (y, m, d, hh, mm, ss, nanos) = parse_epoch_fields(content)?;
                raw_epochs.push(hifitime::Epoch::from_gregorian_utc(y, m, d, hh, mm, ss, nanos));
                current_epoch = Some(time_system.epoch_from_gregorian(y, m, d, hh, mm, ss, nanos));
            } else if is_position_line(content) {
                let p = PositionLine::parse(content)?;
                let epoch = current_epoch.ok_or(ParsingError::MalformedLine {
                    line: line_no,
                    expected: "epoch before P-record",
                })?;

                let position_std = match (p.exp_x, p.exp_y, p.exp_z) {
                    (Some(ex), Some(ey), Some(ez)) => Some((
                        position_base.powi(ex) * 1.0e-3,
                        position_base.powi(ey) * 1.0e-3,
                        position_base.powi(ez) * 1.0e-3,
                    )),
                    _ => None,
                };
                let clock_std = p.exp_clock.map(|ec| clock_base.powi(ec) * 1.0e-12);

                let record = Record {
                    time: epoch,
                    position: (p.x_km * 1.0e3, p.y_km * 1.0e3, p.z_km * 1.0e3),
                    position_std,
                    velocity: None,
                    velocity_std: None,
                    clock: p.clock_us.map(|v| v * 1.0e-6),
                    clock_std,
                    clock_rate: None,
                    clock_rate_std: None,
                    clock_event: p.clock_event,
                    clock_predicted: p.clock_prediction,
                    maneuver: p.maneuver,
                    orbit_predicted: p.orbit_prediction,
                    correlations: Correlations::default(),
                };

                per_sv.entry(p.sv).or_default().push(record);
            } else if is_velocity_line(content) {
                let v = VelocityLine::parse(content)?;
                let epoch = current_epoch.ok_or(ParsingError::MalformedLine {
                    line: line_no,
                    expected: "epoch before V-record",
                })?;

                if let Some(records) = per_sv.get_mut(&v.sv) {
                    if let Some(last) = records.last_mut() {
                        if last.time == epoch {
                            last.velocity = Some((v.x_km_s * 1.0e3, v.y_km_s * 1.0e3, v.z_km_s * 1.0e3));
                            last.clock_rate = v.clock_rate.map(|c| c * 1.0e-4 * 1.0e-6);
                            last.velocity_std = match (v.exp_x, v.exp_y, v.exp_z) {
                                (Some(ex), Some(ey), Some(ez)) => Some((
                                    position_base.powi(ex) * 1.0e-7,
                                    position_base.powi(ey) * 1.0e-7,
                                    position_base.powi(ez) * 1.0e-7,
                                )),
                                _ => None,
                            };
                            last.clock_rate_std = v.exp_clock_rate.map(|ec| clock_base.powi(ec) * 1.0e-16);
                        }
                    }
                }
            } else if content.starts_with("EP") || content.starts_with("EV") {
                return Err(ParsingError::UnsupportedFeature("EP/EV correlation records").into());
            } else if is_eof(content) {
                seen_eof = true;
            } else {
                warn!("line {line_no}: unrecognized SP3 line \"{content}\"");
            }
        }

        if !seen_eof {
            return Err(ParsingError::MissingEof.into());
        }

        if trailing_bytes > 0 {
            return Err(ParsingError::TrailingGarbageAfterEOF(trailing_bytes).into());
        }

        let line1 = line1.ok_or(ParsingError::MalformedH1)?;
        let line2 = line2.ok_or(ParsingError::MalformedH2)?;

        if !declared_ids.is_empty() && declared_ids.len() != per_sv.len() {
            return Err(ParsingError::HeaderInconsistent(format!(
                "declared {} satellites but found records for {}",
                declared_ids.len(),
                per_sv.len()
            ))
            .into());
        }

        let mut header = Header::from_lines(line1, line2, declared_ids.clone());
        header.time_system = time_system;
        header.file_type = crate::header::FileType::from_str(&file_type_char.to_string())
            .unwrap_or_default();

        let actual_epochs = per_sv
            .values()
            .next()
            .map(|records| records.len())
            .unwrap_or(0) as u64;

        if header.num_epochs != 0 && actual_epochs != 0 && header.num_epochs != actual_epochs {
            return Err(ParsingError::HeaderInconsistent(format!(
                "declared {} epochs, parsed {}",
                header.num_epochs, actual_epochs
            ))
            .into());
        }

        check_epoch_grid(&header, &raw_epochs)?;

        let expects_velocity = header.data_used == crate::header::DataType::Velocity;
        for records in per_sv.values() {
            for record in records {
                if record.has_velocity() != expects_velocity {
                    return Err(ParsingError::HeaderInconsistent(format!(
                        "header declares data type {}, but a record at {} {} a velocity",
                        header.data_used,
                        record.time,
                        if expects_velocity { "is missing" } else { "carries" }
                    ))
                    .into());
                }
            }
        }

        let mut satellites = Vec::with_capacity(per_sv.len());
        for (idx, (id, mut records)) in per_sv.into_iter().enumerate() {
            records.sort_by_key(|r| r.time);
            let accuracy = declared_accuracy.get(idx).copied().flatten();
            satellites.push(Satellite::new(id, accuracy, records)?);
        }

        Ok(Self {
            header,
            comments,
            satellites,
        })
    }

    /// Parses an SP3 product from a plain-text file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses an SP3 product from a gzip-compressed file on disk.
    #[cfg(feature = "flate2")]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        let decoder = flate2::read::GzDecoder::new(file);
        Self::from_reader(decoder)
    }

    /// Returns the satellite matching `id`, if present in this product.
    pub fn satellite_with_id(&self, id: &Sp3Id) -> Result<&Satellite, CatalogError> {
        self.satellites
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| CatalogError::UnknownSatellite(id.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_sp3() -> String {
        [
            "#dP2021 12 16  0  0  0.00000000       1 __u+U IGS14 FIT  IGS",
            "## 2188 345600.00000000   900.00000000 59564 0.0000000000000",
            "+    1   G01                                                ",
            "++         2  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0",
            "%c G  cc GPS ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc",
            "%c cc cc ccc ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc",
            "/* sample test product",
            "*  2021 12 16  0  0  0.00000000",
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152",
            "EOF",
        ]
        .join("\n")
    }

    #[test]
    fn parses_minimal_product() {
        let text = sample_sp3();
        let product = Product::from_reader(text.as_bytes()).unwrap_or_else(|e| {
            panic!("failed to parse minimal product: {e}");
        });

        assert_eq!(product.satellites.len(), 1);
        let g01 = product
            .satellite_with_id(&Sp3Id::new("G01").unwrap())
            .unwrap();
        assert_eq!(g01.records.len(), 1);
        assert_eq!(g01.records[0].position.0, -22335.782004 * 1.0e3);
    }

    #[test]
    fn rejects_missing_eof() {
        let text = sample_sp3().replace("EOF", "");
        assert!(Product::from_reader(text.as_bytes()).is_err());
    }

    #[test]
    fn rejects_unsupported_ep_record() {
        let mut text = sample_sp3();
        text = text.replace(
            "EOF",
            "EP   123   456   789   012     1     2     3     4     5     6     7     8     9    10    11    12\nEOF",
        );
        let result = Product::from_reader(text.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_satellite_count_mismatch() {
        let text = sample_sp3().replace(
            "+    1   G01                                                ",
            "+    2   G01G02                                             ",
        );
        let result = Product::from_reader(text.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_epoch_off_declared_grid() {
        let text = sample_sp3().replace(
            "*  2021 12 16  0  0  0.00000000",
            "*  2021 12 16  0  1  0.00000000",
        );
        let result = Product::from_reader(text.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_mismatched_gps_week() {
        let text = sample_sp3().replace(
            "## 2188 345600.00000000   900.00000000 59564 0.0000000000000",
            "## 2188      0.00000000   900.00000000 59564 0.0000000000000",
        );
        let result = Product::from_reader(text.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_mismatched_mjd() {
        let text = sample_sp3().replace(
            "## 2188 345600.00000000   900.00000000 59564 0.0000000000000",
            "## 2188 345600.00000000   900.00000000 59565 0.0000000000000",
        );
        let result = Product::from_reader(text.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_velocity_flag_mismatch() {
        let text = sample_sp3().replace("#dP2021", "#dV2021");
        let result = Product::from_reader(text.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn parses_std_dev_fields_from_declared_bases() {
        let mut text = sample_sp3();
        text = text.replace(
            "%c cc cc ccc ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc",
            "%c cc cc ccc ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc\n%f  1.2500000  1.0250000000  0.00000000000  0.000000000000000\n%f  0.0000000  0.000000000  0.00000000000  0.000000000000000\n%i    0    0    0    0      0      0      0      0         0\n%i    0    0    0    0      0      0      0      0         0",
        );
        text = text.replace(
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152",
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 10  9 11 102 EP",
        );

        let product = Product::from_reader(text.as_bytes()).unwrap_or_else(|e| {
            panic!("failed to parse product with std-dev fields: {e}");
        });

        let g01 = product
            .satellite_with_id(&Sp3Id::new("G01").unwrap())
            .unwrap();
        let record = &g01.records[0];

        let position_base = 1.25f64;
        let clock_base = 1.025f64;
        let expected_position_std = (
            position_base.powi(10) * 1.0e-3,
            position_base.powi(9) * 1.0e-3,
            position_base.powi(11) * 1.0e-3,
        );
        assert_eq!(record.position_std, Some(expected_position_std));
        assert_eq!(record.clock_std, Some(clock_base.powi(102) * 1.0e-12));
    }
}
