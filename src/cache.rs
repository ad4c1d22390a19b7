//! The remote asset cache.
//!
//! Every avatar, thumbnail, service icon, and uploaded file referenced by
//! the archive lives on a remote host. [`AssetCache`] materializes each of
//! those resources to a local file exactly once, keyed by source URI, so
//! the generated pages work offline and repeated runs stay cheap.
//!
//! Durable state is a flat registry JSON mapping remote URI → cached file
//! name, stored next to the cache directory. The registry is loaded at
//! startup (absence is not an error) and rewritten in full after every new
//! entry, so an aborted run never forgets a completed download.
//!
//! Cached files take the caller's suggested name when it is free; otherwise
//! a numeric suffix is inserted before the extension (`logo.png`,
//! `logo.1.png`, `logo.2.png`, …) until a free name is found.
//!
//! The network seam is the [`Fetcher`] trait; production uses a blocking
//! `reqwest` client that follows redirects, tests substitute in-memory
//! fetchers. A fetch failure or non-success status aborts the whole run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SlackviewError};

/// Fetches the bytes of a remote resource.
///
/// One call per distinct URI per run; no retries, no timeout beyond the
/// transport's own.
pub trait Fetcher {
    /// Downloads the resource, erroring on transport failure or a
    /// non-success status.
    fn fetch(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Production fetcher over a blocking HTTP client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let response = self.client.get(uri).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SlackviewError::download(uri, status.to_string()));
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Maps remote URIs to locally materialized files.
pub struct AssetCache {
    registry_path: PathBuf,
    cache_dir: PathBuf,
    uri_to_file: HashMap<String, String>,
    fetcher: Box<dyn Fetcher>,
}

impl AssetCache {
    /// Opens the cache with the production HTTP fetcher.
    pub fn open(registry_path: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_fetcher(registry_path, cache_dir, Box::new(HttpFetcher::new()?))
    }

    /// Opens the cache over an explicit fetcher.
    pub fn with_fetcher(
        registry_path: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
        fetcher: Box<dyn Fetcher>,
    ) -> Result<Self> {
        let registry_path = registry_path.into();
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;

        // A missing registry means a fresh cache, not a failure.
        let uri_to_file = match fs::read_to_string(&registry_path) {
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| SlackviewError::json_in(e, &registry_path))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            registry_path,
            cache_dir,
            uri_to_file,
            fetcher,
        })
    }

    /// Materializes `uri` locally and returns the cached file name.
    ///
    /// The first call for a URI downloads it under `name_hint` (or a
    /// collision-renamed variant); later calls return the registered name
    /// without touching the network.
    pub fn cache(&mut self, uri: &str, name_hint: &str) -> Result<String> {
        if let Some(name) = self.uri_to_file.get(uri) {
            return Ok(name.clone());
        }

        let name = self.free_name(name_hint);
        println!("⬇️  Downloading <{uri}> to {name}");
        let bytes = self.fetcher.fetch(uri)?;
        fs::write(self.cache_dir.join(&name), bytes)?;

        self.uri_to_file.insert(uri.to_string(), name.clone());
        self.write_back()?;
        Ok(name)
    }

    /// Like [`cache`](Self::cache), returning the document-relative
    /// reference used inside generated HTML (`cache/<name>`).
    pub fn cache_relative(&mut self, uri: &str, name_hint: &str) -> Result<String> {
        let name = self.cache(uri, name_hint)?;
        let dir = self
            .cache_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("{dir}/{name}"))
    }

    /// Materializes `uri` and returns its content as UTF-8 text.
    ///
    /// Used for truncated snippets whose full body must be inlined.
    pub fn cache_text(&mut self, uri: &str, name_hint: &str) -> Result<String> {
        let name = self.cache(uri, name_hint)?;
        let bytes = fs::read(self.cache_dir.join(name))?;
        String::from_utf8(bytes).map_err(|_| SlackviewError::SnippetEncoding {
            uri: uri.to_string(),
        })
    }

    /// Absolute path of the cache directory.
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Number of registered URIs.
    pub fn len(&self) -> usize {
        self.uri_to_file.len()
    }

    /// Returns `true` if no URI has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.uri_to_file.is_empty()
    }

    /// First free file name derived from the hint.
    fn free_name(&self, hint: &str) -> String {
        if !self.cache_dir.join(hint).exists() {
            return hint.to_string();
        }

        let (stem, ext) = match hint.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
            _ => (hint, String::new()),
        };
        let mut i = 1;
        loop {
            let candidate = format!("{stem}.{i}{ext}");
            if !self.cache_dir.join(&candidate).exists() {
                return candidate;
            }
            i += 1;
        }
    }

    fn write_back(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.uri_to_file)?;
        fs::write(&self.registry_path, data)?;
        Ok(())
    }
}
