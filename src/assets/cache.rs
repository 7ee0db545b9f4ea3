use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use sha2::{Digest, Sha256};

use crate::{
    assets::image::{BitmapAsset, SvgAsset},
    foundation::error::{DeckError, DeckResult},
};

/// Representation a resource was prepared into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Raster image metadata plus base64 payload.
    Bitmap,
    /// Parsed vector document with per-step fragments.
    Svg,
    /// Typeset math rendered to SVG.
    Latex,
}

/// Identity of an in-memory cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Normalized resource path (or content digest for inline resources).
    pub path: String,
    /// Representation tag.
    pub kind: AssetKind,
}

impl CacheKey {
    /// Key for `path` prepared as `kind`.
    pub fn new(path: &str, kind: AssetKind) -> Self {
        Self {
            path: normalize_path_key(path),
            kind,
        }
    }
}

/// Prepared payload stored in [`MemCache`].
#[derive(Clone, Debug)]
pub enum CachedAsset {
    /// Raster image.
    Bitmap(Arc<BitmapAsset>),
    /// Vector document (including converted layered images and typeset math).
    Svg(Arc<SvgAsset>),
}

/// Build-scoped memo of prepared resources.
///
/// No eviction: one build references a bounded set of files.
#[derive(Debug, Default)]
pub struct MemCache {
    entries: HashMap<CacheKey, CachedAsset>,
    loads: u64,
    hits: u64,
}

impl MemCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup an entry.
    pub fn get(&self, key: &CacheKey) -> Option<&CachedAsset> {
        self.entries.get(key)
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: CacheKey, value: CachedAsset) {
        self.entries.insert(key, value);
    }

    /// Return the cached entry or build, store and return it.
    pub fn get_or_try_insert_with(
        &mut self,
        key: CacheKey,
        load: impl FnOnce() -> DeckResult<CachedAsset>,
    ) -> DeckResult<CachedAsset> {
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(path = %key.path, kind = ?key.kind, "memory cache hit");
            return Ok(hit.clone());
        }
        let value = load()?;
        self.loads += 1;
        tracing::debug!(path = %key.path, kind = ?key.kind, "memory cache miss");
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    /// Number of entries built through [`MemCache::get_or_try_insert_with`].
    pub fn loads(&self) -> u64 {
        self.loads
    }

    /// Number of lookups served from memory.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// On-disk memo of external conversions, keyed by content digest and output kind.
#[derive(Clone, Debug)]
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    /// Cache storing its files in `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding cached files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the converted form of `source`, running `constructor(source, destination, kind)`
    /// only when no file for the same content and kind exists yet.
    pub fn ensure_by_file(
        &self,
        source: &Path,
        kind: &str,
        constructor: impl FnOnce(&Path, &Path, &str) -> DeckResult<()>,
    ) -> DeckResult<PathBuf> {
        let bytes = std::fs::read(source).map_err(|e| {
            DeckError::resource(format!("cannot read '{}': {e}", source.display()))
        })?;
        self.ensure_by_content(&bytes, kind, |dst| constructor(source, dst, kind))
    }

    /// Like [`FsCache::ensure_by_file`] for in-memory source content.
    pub fn ensure_by_content(
        &self,
        content: &[u8],
        kind: &str,
        constructor: impl FnOnce(&Path) -> DeckResult<()>,
    ) -> DeckResult<PathBuf> {
        let digest = content_digest(content, kind);
        let dest = self.dir.join(format!("{digest}.{kind}"));
        if dest.is_file() {
            tracing::debug!(path = %dest.display(), "disk cache hit");
            return Ok(dest);
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create cache dir '{}'", self.dir.display()))?;
        let tmp = self.dir.join(format!("{digest}.{kind}.partial"));
        tracing::debug!(path = %dest.display(), "disk cache miss, constructing");
        if let Err(e) = constructor(&tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        if !tmp.is_file() {
            return Err(DeckError::resource(format!(
                "cache constructor for kind '{kind}' did not produce an output file"
            )));
        }
        std::fs::rename(&tmp, &dest)
            .with_context(|| format!("move cache entry into '{}'", dest.display()))?;
        Ok(dest)
    }
}

pub(crate) fn content_digest(content: &[u8], kind: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hasher.update([0u8]);
    hasher.update(kind.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Normalize a resource path into a cache key: `/` separators, no `.` segments.
pub fn normalize_path_key(source: &str) -> String {
    let s = source.replace('\\', "/");
    let absolute = s.starts_with('/');
    let parts: Vec<&str> = s
        .split('/')
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();
    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
