//! Content-addressed diagram caching.
//!
//! Provides [`DiagramKey`] for computing cache keys and [`CachedRenderer`],
//! which consults a [`CacheBucket`] before delegating to a renderer.

use folio_cache::{CacheBucket, CacheBucketExt};
use sha2::{Digest, Sha256};

use crate::error::DiagramError;
use crate::renderer::DiagramRenderer;

/// Cache key of a diagram.
///
/// The trimmed source text is the sole identity of a diagram: renderer
/// version and options are not part of the key, so upgrading the tool does
/// not invalidate existing entries.
#[derive(Debug)]
pub struct DiagramKey<'a> {
    /// Diagram source code.
    pub source: &'a str,
}

impl DiagramKey<'_> {
    /// SHA-256 of the trimmed source, as 64 lowercase hex characters.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.trim().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Renderer wrapper that memoizes successful renders.
///
/// A cache hit returns the stored payload without invoking the renderer. A
/// failed render is never stored, so the next run retries it.
pub struct CachedRenderer<R> {
    renderer: R,
    cache: Box<dyn CacheBucket>,
}

impl<R: DiagramRenderer> CachedRenderer<R> {
    /// Wrap `renderer` with the given cache bucket.
    pub fn new(renderer: R, cache: Box<dyn CacheBucket>) -> Self {
        Self { renderer, cache }
    }

    /// The wrapped renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render `source`, consulting the cache first.
    ///
    /// # Errors
    ///
    /// - [`DiagramError::Render`] if the renderer fails (recoverable)
    /// - [`DiagramError::Cache`] if the rendered payload cannot be stored
    pub fn render(&self, source: &str) -> Result<String, DiagramError> {
        let source = source.trim();
        let hash = DiagramKey { source }.compute_hash();

        if let Some(svg) = self.cache.get_string(&hash) {
            tracing::debug!(hash = %hash, "Diagram cache hit");
            return Ok(svg);
        }

        tracing::debug!(hash = %hash, "Diagram cache miss, rendering");
        let svg = self.renderer.render(source)?;

        self.cache
            .set_string(&hash, &svg)
            .map_err(|source| DiagramError::Cache { hash, source })?;
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use folio_cache::{FileCache, NullCache};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::error::RenderError;

    struct CountingRenderer {
        calls: Cell<usize>,
        svg: Option<&'static str>,
    }

    impl CountingRenderer {
        fn ok(svg: &'static str) -> Self {
            Self {
                calls: Cell::new(0),
                svg: Some(svg),
            }
        }

        fn failing() -> Self {
            Self {
                calls: Cell::new(0),
                svg: None,
            }
        }
    }

    impl DiagramRenderer for CountingRenderer {
        fn render(&self, _source: &str) -> Result<String, RenderError> {
            self.calls.set(self.calls.get() + 1);
            self.svg
                .map(str::to_owned)
                .ok_or_else(|| RenderError::Failed("syntax error".to_owned()))
        }
    }

    #[test]
    fn test_diagram_key_hash() {
        let key1 = DiagramKey { source: "graph TD; A-->B" };
        let key2 = DiagramKey { source: "graph TD; A-->B" };
        let key3 = DiagramKey { source: "graph TD; C-->D" };

        assert_eq!(key1.compute_hash(), key2.compute_hash());
        assert_ne!(key1.compute_hash(), key3.compute_hash());
        assert_eq!(key1.compute_hash().len(), 64);
    }

    #[test]
    fn test_diagram_key_ignores_surrounding_whitespace() {
        let plain = DiagramKey { source: "graph TD; A-->B" };
        let padded = DiagramKey {
            source: "\n  graph TD; A-->B  \n\n",
        };

        assert_eq!(plain.compute_hash(), padded.compute_hash());
    }

    #[test]
    fn test_diagram_key_known_value() {
        // sha256("") is a well-known constant
        let key = DiagramKey { source: "   " };

        assert_eq!(
            key.compute_hash(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_cache_hit_skips_renderer() {
        let dir = TempDir::new().unwrap();
        let cached = CachedRenderer::new(
            CountingRenderer::ok("<svg>diagram</svg>"),
            Box::new(FileCache::new(dir.path(), "svg")),
        );

        let first = cached.render("graph TD; A-->B").unwrap();
        let second = cached.render("  graph TD; A-->B\n").unwrap();

        assert_eq!(first, "<svg>diagram</svg>");
        assert_eq!(first, second);
        assert_eq!(cached.renderer().calls.get(), 1);
    }

    #[test]
    fn test_cache_entry_named_by_hash() {
        let dir = TempDir::new().unwrap();
        let cached = CachedRenderer::new(
            CountingRenderer::ok("<svg/>"),
            Box::new(FileCache::new(dir.path(), "svg")),
        );

        cached.render("graph LR; X-->Y").unwrap();

        let hash = DiagramKey {
            source: "graph LR; X-->Y",
        }
        .compute_hash();
        let entry = dir.path().join(format!("{hash}.svg"));
        assert_eq!(std::fs::read_to_string(entry).unwrap(), "<svg/>");
    }

    #[test]
    fn test_cache_prepopulated_entry_is_returned() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path(), "svg");
        let hash = DiagramKey { source: "pie" }.compute_hash();
        cache.set_string(&hash, "<svg>stored</svg>").unwrap();

        let cached = CachedRenderer::new(CountingRenderer::ok("<svg>fresh</svg>"), Box::new(cache));

        assert_eq!(cached.render("pie").unwrap(), "<svg>stored</svg>");
        assert_eq!(cached.renderer().calls.get(), 0);
    }

    #[test]
    fn test_failed_render_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let cached = CachedRenderer::new(
            CountingRenderer::failing(),
            Box::new(FileCache::new(dir.path(), "svg")),
        );

        let first = cached.render("graph TD; broken");
        let second = cached.render("graph TD; broken");

        assert!(matches!(first, Err(DiagramError::Render(_))));
        assert!(matches!(second, Err(DiagramError::Render(_))));
        assert_eq!(cached.renderer().calls.get(), 2);
        assert!(!dir.path().exists() || std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_null_cache_always_renders() {
        let cached = CachedRenderer::new(CountingRenderer::ok("<svg/>"), Box::new(NullCache));

        cached.render("a").unwrap();
        cached.render("a").unwrap();

        assert_eq!(cached.renderer().calls.get(), 2);
    }

    #[test]
    fn test_unwritable_cache_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let cached = CachedRenderer::new(
            CountingRenderer::ok("<svg/>"),
            Box::new(FileCache::new(blocker.join("cache"), "svg")),
        );

        let result = cached.render("graph TD; A-->B");

        assert!(matches!(result, Err(DiagramError::Cache { .. })));
    }
}
