//! Dataset transport.
//!
//! A location is either an `http(s)://` URL or a path. Bytes are always
//! buffered whole before decoding; there is no streaming parse and no
//! retry.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use web_time::Instant;

use crate::dataset::DccmDataset;
use crate::error::DccmError;
use crate::format;

/// Upper bound on a fetched body, in bytes.
pub const DEFAULT_BODY_LIMIT: u64 = 1 << 30;

/// Something that can produce the raw bytes of a dataset file.
pub trait DatasetSource {
    /// Fetch the complete body at `location`.
    ///
    /// # Errors
    ///
    /// [`DccmError::Fetch`] for a non-success status,
    /// [`DccmError::Transport`] or [`DccmError::Io`] when no body could be
    /// read.
    fn fetch(&self, location: &str) -> Result<Vec<u8>, DccmError>;
}

/// Fetch `location` from `source` and decode it.
///
/// # Errors
///
/// Propagates fetch failures and returns [`DccmError::Format`] when the
/// body is not a valid dataset file.
pub fn load_dataset(
    source: &dyn DatasetSource,
    location: &str,
) -> Result<DccmDataset, DccmError> {
    let start = Instant::now();
    let bytes = source.fetch(location)?;
    let fetched = start.elapsed();
    let dataset = format::decode(&bytes)?;
    log::info!(
        "loaded {location}: {} slices x {} atoms ({} bytes, fetch {:.1?}, decode {:.1?})",
        dataset.num_slices(),
        dataset.num_atoms(),
        bytes.len(),
        fetched,
        start.elapsed().saturating_sub(fetched),
    );
    Ok(dataset)
}

fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Plain HTTP GET via `ureq`.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Copy)]
pub struct HttpSource {
    body_limit: u64,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Source with the default body limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Override the body size limit.
    #[must_use]
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }
}

#[cfg(feature = "http")]
impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl DatasetSource for HttpSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, DccmError> {
        log::debug!("GET {location}");
        let response = ureq::get(location).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => DccmError::Fetch {
                url: location.to_owned(),
                status,
            },
            other => DccmError::Transport {
                url: location.to_owned(),
                message: other.to_string(),
            },
        })?;
        let mut body = response.into_body();
        body.with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(|e| DccmError::Transport {
                url: location.to_owned(),
                message: e.to_string(),
            })
    }
}

/// Files resolved against a root directory.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Resolve relative locations against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DatasetSource for FileSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, DccmError> {
        let path = self.root.join(location);
        log::debug!("reading {}", path.display());
        Ok(std::fs::read(path)?)
    }
}

/// In-memory files keyed by location.
///
/// Unknown locations answer like a server would: status 404.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `location`, replacing any previous body.
    pub fn insert(&mut self, location: impl Into<String>, bytes: Vec<u8>) {
        let _ = self.files.insert(location.into(), bytes);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, location: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(location, bytes);
        self
    }
}

impl DatasetSource for MemorySource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, DccmError> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| DccmError::Fetch {
                url: location.to_owned(),
                status: 404,
            })
    }
}

/// Routes `http(s)://` locations to HTTP and everything else to files.
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
    files: FileSource,
    #[cfg(feature = "http")]
    http: HttpSource,
}

impl DefaultSource {
    /// Resolve file locations against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            files: FileSource::new(root),
            #[cfg(feature = "http")]
            http: HttpSource::new(),
        }
    }
}

impl DatasetSource for DefaultSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, DccmError> {
        if !is_http(location) {
            return self.files.fetch(location);
        }
        #[cfg(feature = "http")]
        {
            self.http.fetch(location)
        }
        #[cfg(not(feature = "http"))]
        {
            Err(DccmError::Transport {
                url: location.to_owned(),
                message: "built without the `http` feature".to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatError, HEADER_LEN};

    fn fixture() -> DccmDataset {
        DccmDataset::new(
            1,
            3,
            vec!["ALA".to_owned(), "GLY".to_owned(), "LYS".to_owned()],
            vec![1.0, 0.0, -1.0, 0.5, 0.2, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn memory_source_round_trip() {
        let bytes = format::encode(&fixture()).unwrap();
        let source = MemorySource::new().with("wt/Rep_1/dccm_data_25.bin", bytes);
        let ds = load_dataset(&source, "wt/Rep_1/dccm_data_25.bin").unwrap();
        assert_eq!(ds, fixture());
    }

    #[test]
    fn missing_location_is_a_fetch_error() {
        let err = load_dataset(&MemorySource::new(), "data/nope.bin").unwrap_err();
        assert!(matches!(
            err,
            DccmError::Fetch { ref url, status: 404 } if url == "data/nope.bin"
        ));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn bad_tag_is_a_format_error() {
        let mut bytes = format::encode(&fixture()).unwrap();
        bytes[8] = 2;
        let source = MemorySource::new().with("x", bytes);
        let err = load_dataset(&source, "x").unwrap_err();
        assert!(matches!(
            err,
            DccmError::Format(FormatError::UnsupportedDataType(2))
        ));
    }

    #[test]
    fn file_source_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("wt/Rep_1")).unwrap();
        let path = dir.path().join("wt/Rep_1/dccm_data_25.bin");
        std::fs::write(&path, format::encode(&fixture()).unwrap()).unwrap();

        let source = DefaultSource::new(dir.path());
        let ds = load_dataset(&source, "wt/Rep_1/dccm_data_25.bin").unwrap();
        assert_eq!(ds.num_atoms(), 3);

        let err = source.fetch("wt/Rep_2/dccm_data_25.bin").unwrap_err();
        assert!(matches!(err, DccmError::Io(_)));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = format::encode(&fixture()).unwrap();
        std::fs::write(dir.path().join("short.bin"), &bytes[..HEADER_LEN + 2])
            .unwrap();
        let err =
            load_dataset(&FileSource::new(dir.path()), "short.bin").unwrap_err();
        assert!(matches!(err, DccmError::Format(FormatError::Truncated { .. })));
    }

    #[test]
    fn routes_by_scheme() {
        assert!(is_http("https://example.org/a.bin"));
        assert!(is_http("http://localhost/a.bin"));
        assert!(!is_http("data/wt/Rep_1/dccm_data_25.bin"));
    }
}
