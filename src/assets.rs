//! Offline cache for the planner's static front-end assets.
//!
//! Caches are named by version. Installing fills the current cache from a
//! fixed asset list and is all-or-nothing. Activating drops every other
//! version. Fetching is cache-first, then source-then-store, and finally an
//! empty `503` when the source is unreachable.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Current cache version.
pub const CACHE_NAME: &str = "sync-operator-cache-v1";

/// Assets cached on install.
pub const DEFAULT_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./style.css",
    "./app.js",
    "./manifest.json",
    "./icons/icon.svg",
];

pub const STATUS_OK: u16 = 200;
pub const STATUS_UNAVAILABLE: u16 = 503;

/// Where assets come from when they are not cached.
pub trait AssetSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>>;
}

/// Serves assets from a directory. `./` maps to `index.html`.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = path.trim_start_matches("./").trim_start_matches('/');
        if relative.split('/').any(|part| part == "..") {
            return Err(Error::AssetUnavailable(format!("{path}: outside asset root")));
        }
        let relative = if relative.is_empty() { "index.html" } else { relative };
        Ok(self.root.join(relative))
    }
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.resolve(path)?;
        fs::read(&file).map_err(|e| Error::AssetUnavailable(format!("{path}: {e}")))
    }
}

/// Result of an asset fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    /// Empty body, status 503.
    pub fn unavailable() -> Self {
        Self {
            status: STATUS_UNAVAILABLE,
            body: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Versioned asset caches.
#[derive(Debug, Clone)]
pub struct AssetCache {
    current: String,
    caches: BTreeMap<String, HashMap<String, Vec<u8>>>,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new(CACHE_NAME)
    }
}

impl AssetCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            current: name.into(),
            caches: BTreeMap::new(),
        }
    }

    /// Switches to a new cache version. Older caches stay until
    /// [`activate`](Self::activate).
    pub fn with_version(mut self, name: impl Into<String>) -> Self {
        self.current = name.into();
        self
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Names of all caches held, in order.
    pub fn cache_names(&self) -> Vec<&str> {
        self.caches.keys().map(String::as_str).collect()
    }

    /// Whether the current cache holds `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.caches
            .get(&self.current)
            .is_some_and(|cache| cache.contains_key(path))
    }

    /// Fetches every asset in `assets` into the current cache.
    ///
    /// # Errors
    /// The first asset the source cannot deliver. Nothing is stored in that
    /// case.
    pub fn install(&mut self, source: &dyn AssetSource, assets: &[&str]) -> Result<usize> {
        let mut fetched = HashMap::with_capacity(assets.len());
        for &path in assets {
            let body = source.fetch(path)?;
            fetched.insert(path.to_string(), body);
        }
        let count = fetched.len();
        self.caches
            .entry(self.current.clone())
            .or_default()
            .extend(fetched);
        info!(cache = %self.current, count, "installed assets");
        Ok(count)
    }

    /// Deletes every cache other than the current one. Returns the names
    /// removed.
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .caches
            .keys()
            .filter(|name| **name != self.current)
            .cloned()
            .collect();
        for name in &stale {
            self.caches.remove(name);
            debug!(cache = %name, "dropped stale asset cache");
        }
        stale
    }

    /// Serves `path`.
    pub fn fetch(&mut self, source: &dyn AssetSource, path: &str) -> AssetResponse {
        if let Some(body) = self.caches.get(&self.current).and_then(|c| c.get(path)) {
            return AssetResponse::ok(body.clone());
        }
        match source.fetch(path) {
            Ok(body) => {
                self.caches
                    .entry(self.current.clone())
                    .or_default()
                    .insert(path.to_string(), body.clone());
                AssetResponse::ok(body)
            }
            Err(err) => {
                warn!(path, %err, "asset unavailable offline");
                AssetResponse::unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// In-memory source that can be taken offline.
    struct MapSource {
        files: HashMap<&'static str, &'static str>,
        online: Cell<bool>,
        hits: Cell<usize>,
    }

    impl MapSource {
        fn new(files: &[(&'static str, &'static str)]) -> Self {
            Self {
                files: files.iter().copied().collect(),
                online: Cell::new(true),
                hits: Cell::new(0),
            }
        }
    }

    impl AssetSource for MapSource {
        fn fetch(&self, path: &str) -> Result<Vec<u8>> {
            self.hits.set(self.hits.get() + 1);
            if !self.online.get() {
                return Err(Error::AssetUnavailable("offline".into()));
            }
            self.files
                .get(path)
                .map(|s| s.as_bytes().to_vec())
                .ok_or_else(|| Error::AssetUnavailable(path.to_string()))
        }
    }

    #[test]
    fn test_install_all_or_nothing() {
        let source = MapSource::new(&[("./", "root"), ("./app.js", "js")]);
        let mut cache = AssetCache::default();

        assert!(cache.install(&source, &["./", "./app.js", "./missing.css"]).is_err());
        assert!(!cache.contains("./"));
        assert!(cache.cache_names().is_empty());

        assert_eq!(cache.install(&source, &["./", "./app.js"]).unwrap(), 2);
        assert!(cache.contains("./app.js"));
    }

    #[test]
    fn test_fetch_cache_first() {
        let source = MapSource::new(&[("./app.js", "js")]);
        let mut cache = AssetCache::default();
        cache.install(&source, &["./app.js"]).unwrap();
        let hits = source.hits.get();

        source.online.set(false);
        let response = cache.fetch(&source, "./app.js");
        assert!(response.is_ok());
        assert_eq!(response.body, b"js");
        assert_eq!(source.hits.get(), hits);
    }

    #[test]
    fn test_fetch_stores_then_falls_back_to_503() {
        let source = MapSource::new(&[("./style.css", "css")]);
        let mut cache = AssetCache::default();

        assert!(cache.fetch(&source, "./style.css").is_ok());
        assert!(cache.contains("./style.css"));

        source.online.set(false);
        assert!(cache.fetch(&source, "./style.css").is_ok());
        let missing = cache.fetch(&source, "./manifest.json");
        assert_eq!(missing, AssetResponse::unavailable());
        assert!(missing.body.is_empty());
    }

    #[test]
    fn test_activate_drops_old_versions() {
        let source = MapSource::new(&[("./", "root")]);
        let mut cache = AssetCache::new("v1");
        cache.install(&source, &["./"]).unwrap();

        let mut cache = cache.with_version("v2");
        assert!(!cache.contains("./"));
        cache.install(&source, &["./"]).unwrap();
        assert_eq!(cache.cache_names(), vec!["v1", "v2"]);

        assert_eq!(cache.activate(), vec!["v1".to_string()]);
        assert_eq!(cache.cache_names(), vec!["v2"]);
    }

    #[test]
    fn test_fs_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html>").unwrap();
        fs::create_dir(dir.path().join("icons")).unwrap();
        fs::write(dir.path().join("icons/icon.svg"), "<svg>").unwrap();
        let source = FsAssetSource::new(dir.path());

        assert_eq!(source.fetch("./").unwrap(), b"<html>");
        assert_eq!(source.fetch("./icons/icon.svg").unwrap(), b"<svg>");
        assert!(source.fetch("./style.css").is_err());
        assert!(source.fetch("../etc/passwd").is_err());

        let mut cache = AssetCache::default();
        assert!(cache.install(&source, DEFAULT_ASSETS).is_err());
    }
}
