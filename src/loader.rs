//! Provider abstraction and the multi-file stitching `load()` entry point.
//!
//! This crate ships no HTTP client: callers implement [`Provider`] against
//! whatever transport (CDDIS, a mirror, a local archive) fits their
//! deployment. [`load`] only handles the generic concerns — picking which
//! files cover a requested span and merging their records.
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use hifitime::Epoch;
use log::{debug, warn};

use crate::errors::Error;
use crate::identifiers::Sp3Id;
use crate::product::Product;
use crate::record::Record;
use crate::satellite::Satellite;

/// A named, fixed-cadence source of SP3 products, e.g. one IGS analysis
/// center's rapid-orbit product line.
///
/// `time_to_parameters` maps a requested instant to whatever the concrete
/// provider needs to name/locate one file (a filename, a URL, a local
/// path); `fetch_response`/`download_to` perform the actual transfer.
/// Providers that only ever read local files can make `fetch_response`
/// trivially return an empty byte vector and do all the work in
/// `download_to`.
pub trait Provider {
    /// Human-readable name, used in log output.
    fn name(&self) -> &str;

    /// Returns the local file path this provider would use for products
    /// covering `time`, without performing any I/O.
    fn time_to_parameters(&self, time: Epoch) -> PathBuf;

    /// Returns the already-downloaded bytes for `time`, if any are cached
    /// locally.
    fn fetch_response(&self, time: Epoch) -> Option<Vec<u8>>;

    /// Materializes the product covering `time` into `destination`,
    /// performing whatever I/O the concrete provider needs.
    fn download_to(&self, time: Epoch, destination: &Path) -> Result<(), Error>;
}

/// Serves products already present in a local directory, named by this
/// provider's own `time_to_parameters` convention. Performs no network I/O;
/// `download_to` simply errors if the file isn't already there.
pub struct LocalDirectoryProvider {
    name: String,
    directory: PathBuf,
    namer: fn(Epoch) -> String,
}

impl LocalDirectoryProvider {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>, namer: fn(Epoch) -> String) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            namer,
        }
    }
}

impl Provider for LocalDirectoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn time_to_parameters(&self, time: Epoch) -> PathBuf {
        self.directory.join((self.namer)(time))
    }

    fn fetch_response(&self, time: Epoch) -> Option<Vec<u8>> {
        std::fs::read(self.time_to_parameters(time)).ok()
    }

    fn download_to(&self, time: Epoch, destination: &Path) -> Result<(), Error> {
        let source = self.time_to_parameters(time);
        if source == destination {
            return Ok(());
        }
        std::fs::copy(&source, destination)?;
        Ok(())
    }
}

/// A fixed, ordered list of [`Provider`]s, tried in priority order for each
/// instant. Mirrors `find_providers_of` iterating a provider list.
pub struct ChainProvider {
    providers: Vec<Box<dyn Provider>>,
}

impl ChainProvider {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }
}

/// Returns the bytes of the file covering `time`, downloading it into
/// `download_directory` first if needed.
///
/// Unless `force_download` is set, a provider's own in-memory cache
/// ([`Provider::fetch_response`]) is tried first, then a previously
/// downloaded copy already sitting in `download_directory`. Otherwise (or
/// on a cache miss) the file is downloaded to a `.download`-suffixed
/// staging path and atomically renamed into place, so a reader never
/// observes a partially written file.
fn fetch_with_cache(
    provider: &dyn Provider,
    time: Epoch,
    download_directory: &Path,
    force_download: bool,
) -> Result<Vec<u8>, Error> {
    let file_name = provider
        .time_to_parameters(time)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(provider.name()));
    let destination = download_directory.join(file_name);

    if !force_download {
        if let Some(bytes) = provider.fetch_response(time) {
            return Ok(bytes);
        }
        if destination.is_file() {
            return std::fs::read(&destination).map_err(Error::from);
        }
    }

    let staging = destination.with_extension("download");
    provider.download_to(time, &staging)?;
    std::fs::rename(&staging, &destination)?;
    debug!("downloaded {} to {}", provider.name(), destination.display());

    std::fs::read(&destination).map_err(Error::from)
}

/// Loads and stitches together every record for `sv` covering `[begin -
/// window*step, end + window*step]`, across as many of `provider`'s
/// underlying files as are needed.
///
/// The `window`-sample pad on each side gives a downstream piecewise
/// polynomial builder enough neighboring samples to fit an interval whose
/// center sits right at `begin` or `end`. Records are appended in time
/// order; when two source files overlap and disagree on a shared epoch,
/// the later provider's record replaces the earlier one for that epoch
/// (append/replace-on-equal-time). Downloaded files are cached under
/// `download_directory`; pass `force_download` to bypass both the
/// provider's in-memory cache and that directory and re-fetch every file.
#[allow(clippy::too_many_arguments)]
pub fn load(
    provider: &ChainProvider,
    sv: &Sp3Id,
    begin: Epoch,
    end: Epoch,
    step: hifitime::Duration,
    window: u32,
    download_directory: &Path,
    force_download: bool,
) -> Result<Satellite, Error> {
    std::fs::create_dir_all(download_directory)?;

    let pad = hifitime::Duration::from_total_nanoseconds(step.total_nanoseconds() * window as i128);
    let padded_begin = begin - pad;
    let padded_end = end + pad;

    let mut merged: VecDeque<Record> = VecDeque::new();
    let mut cursor = padded_begin;

    while cursor <= padded_end {
        let served = provider
            .providers
            .iter()
            .map(|p| p.as_ref())
            .find_map(|candidate| {
                match fetch_with_cache(candidate, cursor, download_directory, force_download) {
                    Ok(bytes) => Some((candidate, bytes)),
                    Err(e) => {
                        debug!("{} could not serve {cursor}: {e}", candidate.name());
                        None
                    },
                }
            });

        let Some((served_by, bytes)) = served else {
            warn!("no provider covers {cursor}");
            cursor += step;
            continue;
        };

        let product = Product::from_reader(bytes.as_slice())?;
        let satellite = product.satellite_with_id(sv)?;

        for record in &satellite.records {
            if record.time < padded_begin || record.time > padded_end {
                continue;
            }

            match merged.iter().position(|r| r.time == record.time) {
                Some(pos) => {
                    debug!("replacing duplicate record at {}", record.time);
                    merged[pos] = record.clone();
                },
                None => merged.push_back(record.clone()),
            }
        }

        debug!("{} served {cursor}", served_by.name());

        // Advance past this file's last covered instant rather than by a
        // single step, so multi-day files aren't re-fetched epoch by epoch.
        cursor = satellite
            .records
            .last()
            .map(|r| r.time + step)
            .unwrap_or(cursor + step);
    }

    let mut records: Vec<Record> = merged.into_iter().collect();
    records.sort_by_key(|r| r.time);

    Satellite::new(sv.clone(), None, records).map_err(Error::from)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    struct StaticProvider {
        name: &'static str,
        bytes: Vec<u8>,
    }

    impl Provider for StaticProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn time_to_parameters(&self, _time: Epoch) -> PathBuf {
            PathBuf::from(self.name)
        }

        fn fetch_response(&self, _time: Epoch) -> Option<Vec<u8>> {
            Some(self.bytes.clone())
        }

        fn download_to(&self, _time: Epoch, destination: &Path) -> Result<(), Error> {
            std::fs::write(destination, &self.bytes)?;
            Ok(())
        }
    }

    fn sample_bytes() -> Vec<u8> {
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
        .into_bytes()
    }

    /// Same header as [`sample_bytes`], but declaring and providing three
    /// epochs 15 minutes apart instead of one.
    fn sample_bytes_three_epochs() -> Vec<u8> {
        [
            "#dP2021 12 16  0  0  0.00000000       3 __u+U IGS14 FIT  IGS",
            "## 2188 345600.00000000   900.00000000 59564 0.0000000000000",
            "+    1   G01                                                ",
            "++         2  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0",
            "%c G  cc GPS ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc",
            "%c cc cc ccc ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc",
            "/* sample test product",
            "*  2021 12 16  0  0  0.00000000",
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152",
            "*  2021 12 16  0 15  0.00000000",
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152",
            "*  2021 12 16  0 30  0.00000000",
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152",
            "EOF",
        ]
        .join("\n")
        .into_bytes()
    }

    /// A scratch directory under the OS temp dir, unique to one test, so
    /// parallel test runs don't race on the same cache files.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sp3-ephem-test-{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn loads_a_single_record_from_one_provider() {
        let chain = ChainProvider::new(vec![Box::new(StaticProvider {
            name: "test",
            bytes: sample_bytes(),
        })]);

        let sv = Sp3Id::new("G01").unwrap();
        let begin = Epoch::from_str("2021-12-16T00:00:00 UTC").unwrap();
        let end = Epoch::from_str("2021-12-16T00:00:00 UTC").unwrap();
        let download_directory = scratch_dir("single-record");

        let satellite = load(
            &chain,
            &sv,
            begin,
            end,
            hifitime::Duration::from_days(1.0),
            0,
            &download_directory,
            false,
        )
        .unwrap();
        assert_eq!(satellite.records.len(), 1);
    }

    #[test]
    fn window_pads_the_requested_range() {
        let chain = ChainProvider::new(vec![Box::new(StaticProvider {
            name: "test",
            bytes: sample_bytes_three_epochs(),
        })]);

        let sv = Sp3Id::new("G01").unwrap();
        let step = hifitime::Duration::from_seconds(900.0);
        let begin = Epoch::from_str("2021-12-16T00:15:00 UTC").unwrap();
        let end = Epoch::from_str("2021-12-16T00:15:00 UTC").unwrap();
        let download_directory = scratch_dir("window-pad");

        let unpadded = load(&chain, &sv, begin, end, step, 0, &download_directory, false).unwrap();
        assert_eq!(unpadded.records.len(), 1);

        let padded = load(&chain, &sv, begin, end, step, 1, &download_directory, false).unwrap();
        assert_eq!(padded.records.len(), 3);
    }

    #[test]
    fn caches_downloaded_bytes_under_download_directory() {
        struct DownloadOnlyProvider {
            bytes: Vec<u8>,
        }

        impl Provider for DownloadOnlyProvider {
            fn name(&self) -> &str {
                "download-only"
            }

            fn time_to_parameters(&self, _time: Epoch) -> PathBuf {
                PathBuf::from("sample.sp3")
            }

            fn fetch_response(&self, _time: Epoch) -> Option<Vec<u8>> {
                None
            }

            fn download_to(&self, _time: Epoch, destination: &Path) -> Result<(), Error> {
                std::fs::write(destination, &self.bytes)?;
                Ok(())
            }
        }

        let chain = ChainProvider::new(vec![Box::new(DownloadOnlyProvider {
            bytes: sample_bytes(),
        })]);

        let sv = Sp3Id::new("G01").unwrap();
        let begin = Epoch::from_str("2021-12-16T00:00:00 UTC").unwrap();
        let end = Epoch::from_str("2021-12-16T00:00:00 UTC").unwrap();
        let download_directory = scratch_dir("download-cache");

        let satellite = load(
            &chain,
            &sv,
            begin,
            end,
            hifitime::Duration::from_days(1.0),
            0,
            &download_directory,
            false,
        )
        .unwrap();
        assert_eq!(satellite.records.len(), 1);
        assert!(download_directory.join("sample.sp3").is_file());
        assert!(!download_directory.join("sample.download").exists());
    }
}
