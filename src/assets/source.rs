use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{DrapeError, DrapeResult};

/// An asset reference as written in a product or design record, together with its resolved
/// location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetRef {
    raw: String,
    resolved: String,
}

impl AssetRef {
    /// Resolve `raw` against `base_url` (see [`resolve_asset_ref`]).
    pub fn resolve(raw: impl Into<String>, base_url: &str) -> Self {
        let raw = raw.into();
        let resolved = resolve_asset_ref(base_url, &raw);
        Self { raw, resolved }
    }

    /// Reference exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Absolute location after resolution.
    pub fn resolved(&self) -> &str {
        &self.resolved
    }

    /// Return `true` when the raw reference already carried a scheme.
    pub fn is_absolute(&self) -> bool {
        has_scheme(&self.raw)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolved)
    }
}

fn has_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("data:")
}

/// Resolve an image reference against the static asset base URL.
///
/// `http(s)://` and `data:` references are returned verbatim; anything else is treated as a path
/// below `base_url`.
pub fn resolve_asset_ref(base_url: &str, reference: &str) -> String {
    let reference = reference.trim();
    if has_scheme(reference) || base_url.is_empty() {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

/// Normalize and validate a relative asset path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> DrapeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(DrapeError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(DrapeError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(DrapeError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(DrapeError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Byte source for product photographs and clipart.
///
/// Implementations are called from background load workers, so they must be shareable across
/// threads. A failing fetch is reported as [`DrapeError::Asset`] and recovered by the caller.
pub trait AssetSource: Send + Sync + fmt::Debug {
    /// Fetch the encoded bytes behind `asset`.
    fn fetch(&self, asset: &AssetRef) -> DrapeResult<Vec<u8>>;
}

/// Serves assets from a local directory that mirrors the asset server layout.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory files are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, asset: &AssetRef) -> DrapeResult<Vec<u8>> {
        if asset.is_absolute() {
            return Err(DrapeError::asset(format!(
                "filesystem source cannot fetch '{}'",
                asset.raw()
            )));
        }
        let rel = normalize_rel_path(asset.raw().trim_start_matches('/'))
            .map_err(|e| DrapeError::asset(e.to_string()))?;
        let path = self.root.join(Path::new(&rel));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(|e| DrapeError::asset(format!("{e:#}")))
    }
}

/// In-memory asset table keyed by raw reference (embedding, tests, pre-fetched catalogs).
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryAssetSource {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryAssetSource::insert`].
    pub fn with(mut self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }

    /// Register `bytes` under `reference`, replacing any previous entry.
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), Arc::new(bytes));
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no asset is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, asset: &AssetRef) -> DrapeResult<Vec<u8>> {
        self.entries
            .get(asset.raw())
            .or_else(|| self.entries.get(asset.resolved()))
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| DrapeError::asset(format!("asset '{}' not found", asset.raw())))
    }
}

/// Fetches assets over HTTP(S) from their resolved URL.
#[cfg(feature = "http")]
#[derive(Clone, Debug, Default)]
pub struct HttpAssetSource;

#[cfg(feature = "http")]
impl HttpAssetSource {
    /// Create an HTTP source using the default agent settings.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "http")]
impl AssetSource for HttpAssetSource {
    fn fetch(&self, asset: &AssetRef) -> DrapeResult<Vec<u8>> {
        let url = asset.resolved();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DrapeError::asset(format!("'{url}' is not an http(s) url")));
        }
        let mut resp = ureq::get(url)
            .call()
            .map_err(|e| DrapeError::asset(format!("GET {url}: {e}")))?;
        resp.body_mut()
            .read_to_vec()
            .map_err(|e| DrapeError::asset(format!("read body of {url}: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
