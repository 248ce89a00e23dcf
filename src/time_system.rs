//! SP3 epoch time systems and their conversion to/from UTC.
use std::str::FromStr;

use hifitime::{Duration, Epoch, TimeScale, Unit};

use crate::errors::ParsingError;

/// One of the eight epoch time systems an SP3 file may declare on its `%c` line.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeSystem {
    /// GPS time: TAI minus a constant 19 s offset.
    #[default]
    Gps,
    /// GLONASS time: UTC shifted by a fixed +3 h civil offset (Moscow time).
    Glonass,
    /// Galileo System Time: follows TAI/UTC leap-second conversion.
    Galileo,
    /// BeiDou Time: follows `hifitime`'s own BDT scale, which has been
    /// synchronized with UTC (no leap-second divergence) since its 2005-12-31
    /// reference epoch.
    Beidou,
    /// International Atomic Time.
    Tai,
    /// Coordinated Universal Time.
    Utc,
    /// NavIC/IRNSS time: same TAI−19s convention as GPS.
    Irnss,
    /// QZSS time: same TAI−19s convention as GPS.
    Qzss,
}

impl TimeSystem {
    /// The native `hifitime` scale raw epoch fields in this time system should
    /// be tagged with before any leap-second-aware conversion. GLONASS has no
    /// dedicated `hifitime` scale: its fields are civil UTC+3h and are handled
    /// with a fixed shift instead of a scale relabel.
    fn hifitime_scale(&self) -> TimeScale {
        match self {
            Self::Gps | Self::Irnss | Self::Qzss => TimeScale::GPST,
            Self::Galileo => TimeScale::GST,
            Self::Beidou => TimeScale::BDT,
            Self::Tai => TimeScale::TAI,
            Self::Glonass | Self::Utc => TimeScale::UTC,
        }
    }

    /// Builds the UTC instant corresponding to raw Gregorian calendar fields
    /// declared in `self`'s own time system.
    ///
    /// The fields are tagged with `self`'s native scale *before* converting to
    /// UTC, so a genuine leap-second-aware relabel happens for GPS/IRNSS/QZSS
    /// (GPST), Galileo (GST) and TAI, rather than building the digits as UTC
    /// and reinterpreting an already-UTC-tagged instant.
    pub fn epoch_from_gregorian(
        &self,
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanos: u32,
    ) -> Epoch {
        if matches!(self, Self::Glonass) {
            let civil = Epoch::from_gregorian_utc(year, month, day, hour, minute, second, nanos);
            return civil - 3 * Unit::Hour;
        }

        let native = Epoch::from_gregorian(year, month, day, hour, minute, second, nanos, self.hifitime_scale());
        native.to_time_scale(TimeScale::UTC)
    }

    /// Interprets a true UTC instant `t_utc` and returns the Gregorian
    /// calendar fields `self`'s own time system would display for the same
    /// instant. Inverse of [`TimeSystem::epoch_from_gregorian`].
    pub fn gregorian_from_utc(&self, t_utc: Epoch) -> (i32, u8, u8, u8, u8, u8, u32) {
        if matches!(self, Self::Glonass) {
            return (t_utc + 3 * Unit::Hour).to_gregorian_utc();
        }
        t_utc.to_gregorian(self.hifitime_scale())
    }

    /// Interprets `t`'s UTC-tagged calendar fields as raw digits declared in
    /// `self`'s time system, and returns the corresponding UTC instant. This
    /// is the convention SP3 epoch parsing uses: `t` carries the file's raw
    /// digits tagged as UTC only because that's how they were read off the
    /// line, not because they are already a correct UTC instant.
    pub fn to_utc(&self, t: Epoch) -> Epoch {
        let (y, mo, d, h, mi, s, ns) = t.to_gregorian_utc();
        self.epoch_from_gregorian(y, mo, d, h, mi, s, ns)
    }

    /// Inverse of [`TimeSystem::to_utc`]: interprets `t_utc` as a genuine UTC
    /// instant and returns an `Epoch` whose UTC-tagged calendar fields are the
    /// raw digits `self`'s time system would display for that instant.
    pub fn from_utc(&self, t_utc: Epoch) -> Epoch {
        let (y, mo, d, h, mi, s, ns) = self.gregorian_from_utc(t_utc);
        Epoch::from_gregorian_utc(y, mo, d, h, mi, s, ns)
    }

    /// Adds `delta_seconds` to `t_utc` (a genuine UTC instant) in this
    /// system's native scale, and returns the new instant as UTC.
    pub fn offset_seconds(&self, t_utc: Epoch, delta_seconds: f64) -> Epoch {
        if matches!(self, Self::Glonass) {
            return t_utc + delta_seconds * Unit::Second;
        }
        let native = t_utc.to_time_scale(self.hifitime_scale()) + delta_seconds * Unit::Second;
        native.to_time_scale(TimeScale::UTC)
    }

    /// 3-byte SP3 tag for this time system (`"GPS"`, `"GLO"`, ...).
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Gps => "GPS",
            Self::Glonass => "GLO",
            Self::Galileo => "GAL",
            Self::Beidou => "BDT",
            Self::Tai => "TAI",
            Self::Utc => "UTC",
            Self::Irnss => "IRN",
            Self::Qzss => "QZS",
        }
    }
}

impl std::fmt::Display for TimeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TimeSystem {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "GPS" => Ok(Self::Gps),
            "GLO" => Ok(Self::Glonass),
            "GAL" => Ok(Self::Galileo),
            "BDT" => Ok(Self::Beidou),
            "TAI" => Ok(Self::Tai),
            "UTC" => Ok(Self::Utc),
            "IRN" => Ok(Self::Irnss),
            "QZS" => Ok(Self::Qzss),
            _ => Err(ParsingError::UnknownTimeSystem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gps_offset_is_19_tai_seconds() {
        let utc = Epoch::from_gregorian_utc(2020, 4, 4, 23, 59, 42, 0);
        let gps_time = TimeSystem::Gps.from_utc(utc);
        let back = TimeSystem::Gps.to_utc(gps_time);
        assert!((back - utc).abs() < Duration::from_nanoseconds(1.0));
    }

    /// Worked example: `emr21000.sp3` declares GPS time; its first `G01`
    /// record's raw GPST epoch digits (`2020 04 05 00 00 00`) must resolve to
    /// the documented `2020-04-04T23:59:42 UTC` once correctly relabeled out
    /// of GPST. GPS has run a constant 18 s ahead of UTC since the last leap
    /// second insertion at the end of 2016, so this is a genuine
    /// leap-second-aware shift, not an identity mapping.
    #[test]
    fn gps_epoch_resolves_to_documented_utc_instant() {
        let resolved = TimeSystem::Gps.epoch_from_gregorian(2020, 4, 5, 0, 0, 0, 0);
        let expected = Epoch::from_gregorian_utc(2020, 4, 4, 23, 59, 42, 0);
        assert!((resolved - expected).abs() < Duration::from_nanoseconds(1.0));
    }

    #[test]
    fn glonass_is_civil_3h_shift() {
        let utc = Epoch::from_gregorian_utc(2021, 12, 16, 0, 0, 0, 0);
        let glo_time = TimeSystem::Glonass.from_utc(utc);
        assert_eq!(glo_time - utc, 3 * Unit::Hour);
        assert_eq!(TimeSystem::Glonass.to_utc(glo_time), utc);
    }

    #[test]
    fn beidou_and_utc_are_identity() {
        let utc = Epoch::from_gregorian_utc(2023, 8, 27, 0, 0, 0, 0);
        assert_eq!(TimeSystem::Beidou.to_utc(utc), utc);
        assert_eq!(TimeSystem::Utc.from_utc(utc), utc);
    }

    #[test]
    fn tags_round_trip() {
        for ts in [
            TimeSystem::Gps,
            TimeSystem::Glonass,
            TimeSystem::Galileo,
            TimeSystem::Beidou,
            TimeSystem::Tai,
            TimeSystem::Utc,
            TimeSystem::Irnss,
            TimeSystem::Qzss,
        ] {
            let tag = ts.to_string();
            assert_eq!(TimeSystem::from_str(&tag).unwrap(), ts);
        }
    }

    #[test]
    fn unknown_tag_is_an_error() {
        assert!(TimeSystem::from_str("XYZ").is_err());
    }
}
