use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::{
    assets::cache::{AssetKind, CacheKey, CachedAsset, FsCache, MemCache, content_digest},
    assets::image::{BitmapAsset, OraConverter, SvgAsset},
    assets::latex::{CommandLatexRenderer, LatexRenderer},
    foundation::error::{DeckError, DeckResult},
    text::highlight::{Highlighter, PlainHighlighter},
    text::metrics::{ApproxTextMetrics, TextMetrics},
};

/// State shared by every authoring call of one deck build.
///
/// Owns the in-memory and on-disk caches and the external collaborators. Its lifetime is the
/// build; nothing here is process-global.
pub struct BuildContext {
    mem: MemCache,
    fs: FsCache,
    highlighter: Box<dyn Highlighter>,
    metrics: Box<dyn TextMetrics>,
    ora: Option<Box<dyn OraConverter>>,
    latex: Box<dyn LatexRenderer>,
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("mem", &self.mem)
            .field("fs", &self.fs)
            .field("ora", &self.ora.is_some())
            .finish_non_exhaustive()
    }
}

impl BuildContext {
    /// Context caching external conversions in `cache_dir`.
    ///
    /// Defaults: no highlighting, approximate text metrics, no `.ora` converter, and LaTeX through
    /// `pdflatex` + `pdf2svg`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            mem: MemCache::new(),
            fs: FsCache::new(cache_dir),
            highlighter: Box::new(PlainHighlighter),
            metrics: Box::new(ApproxTextMetrics::default()),
            ora: None,
            latex: Box::new(CommandLatexRenderer::default()),
        }
    }

    /// Replace the syntax highlighter.
    pub fn with_highlighter(mut self, h: impl Highlighter + 'static) -> Self {
        self.highlighter = Box::new(h);
        self
    }

    /// Replace the text metrics provider.
    pub fn with_text_metrics(mut self, m: impl TextMetrics + 'static) -> Self {
        self.metrics = Box::new(m);
        self
    }

    /// Install a converter for `.ora` images.
    pub fn with_ora_converter(mut self, c: impl OraConverter + 'static) -> Self {
        self.ora = Some(Box::new(c));
        self
    }

    /// Replace the LaTeX renderer.
    pub fn with_latex_renderer(mut self, r: impl LatexRenderer + 'static) -> Self {
        self.latex = Box::new(r);
        self
    }

    /// In-memory resource cache.
    pub fn mem_cache(&self) -> &MemCache {
        &self.mem
    }

    /// On-disk conversion cache.
    pub fn fs_cache(&self) -> &FsCache {
        &self.fs
    }

    pub(crate) fn highlighter(&self) -> &dyn Highlighter {
        self.highlighter.as_ref()
    }

    pub(crate) fn metrics(&self) -> &dyn TextMetrics {
        self.metrics.as_ref()
    }

    pub(crate) fn load_bitmap(&mut self, filename: &str) -> DeckResult<Arc<BitmapAsset>> {
        let key = CacheKey::new(filename, AssetKind::Bitmap);
        let asset = self.mem.get_or_try_insert_with(key, || {
            Ok(CachedAsset::Bitmap(Arc::new(BitmapAsset::load(Path::new(
                filename,
            ))?)))
        })?;
        match asset {
            CachedAsset::Bitmap(b) => Ok(b),
            CachedAsset::Svg(_) => Err(kind_mismatch(filename)),
        }
    }

    pub(crate) fn load_svg(&mut self, filename: &str) -> DeckResult<Arc<SvgAsset>> {
        let key = CacheKey::new(filename, AssetKind::Svg);
        let asset = self.mem.get_or_try_insert_with(key, || {
            Ok(CachedAsset::Svg(Arc::new(SvgAsset::load(Path::new(
                filename,
            ))?)))
        })?;
        expect_svg(asset, filename)
    }

    pub(crate) fn load_ora(&mut self, filename: &str) -> DeckResult<Arc<SvgAsset>> {
        let key = CacheKey::new(filename, AssetKind::Svg);
        let Self { mem, fs, ora, .. } = self;
        let asset = mem.get_or_try_insert_with(key, || {
            let converter = ora.as_deref().ok_or_else(|| {
                DeckError::configuration(format!(
                    "image '{filename}' needs an .ora converter, none is configured"
                ))
            })?;
            let path = fs.ensure_by_file(Path::new(filename), "svg", |src, dst, _kind| {
                let svg = converter.convert(src)?;
                std::fs::write(dst, svg)
                    .with_context(|| format!("failed to write '{}'", dst.display()))?;
                Ok(())
            })?;
            Ok(CachedAsset::Svg(Arc::new(SvgAsset::load(&path)?)))
        })?;
        expect_svg(asset, filename)
    }

    pub(crate) fn render_latex(&mut self, document: &str) -> DeckResult<Arc<SvgAsset>> {
        let key = CacheKey {
            path: content_digest(document.as_bytes(), "latex"),
            kind: AssetKind::Latex,
        };
        let Self { mem, fs, latex, .. } = self;
        let asset = mem.get_or_try_insert_with(key, || {
            let path = fs.ensure_by_content(document.as_bytes(), "svg", |dst| {
                let svg = latex.render(document)?;
                std::fs::write(dst, svg)
                    .with_context(|| format!("failed to write '{}'", dst.display()))?;
                Ok(())
            })?;
            Ok(CachedAsset::Svg(Arc::new(SvgAsset::load(&path)?)))
        })?;
        expect_svg(asset, "<latex>")
    }
}

fn expect_svg(asset: CachedAsset, name: &str) -> DeckResult<Arc<SvgAsset>> {
    match asset {
        CachedAsset::Svg(s) => Ok(s),
        CachedAsset::Bitmap(_) => Err(kind_mismatch(name)),
    }
}

fn kind_mismatch(name: &str) -> DeckError {
    DeckError::resource(format!("cache entry for '{name}' holds another representation"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/context.rs"]
mod tests;
