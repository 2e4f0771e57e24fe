//! Theme stylesheets.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Math color for dark-background themes.
const DARK_MATH_COLOR: &str = "#dcdcaa";

/// Math color for every other theme.
const DEFAULT_MATH_COLOR: &str = "#333333";

/// Looks up theme stylesheets by name in a styles directory.
///
/// Theme `name` is the file `<styles_dir>/<name>.css`. A theme that does not
/// exist, or cannot be read, is an empty stylesheet.
#[derive(Clone, Debug)]
pub struct ThemeStore {
    styles_dir: PathBuf,
}

impl ThemeStore {
    /// Create a store reading from `styles_dir`.
    #[must_use]
    pub fn new(styles_dir: impl Into<PathBuf>) -> Self {
        Self {
            styles_dir: styles_dir.into(),
        }
    }

    /// Directory stylesheets are read from.
    #[must_use]
    pub fn styles_dir(&self) -> &Path {
        &self.styles_dir
    }

    /// Stylesheet text of theme `name`, or an empty string.
    #[must_use]
    pub fn load(&self, name: &str) -> String {
        let path = self.styles_dir.join(format!("{name}.css"));
        match fs::read_to_string(&path) {
            Ok(css) => css,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(theme = name, path = %path.display(), "Theme not found, using no theme CSS");
                String::new()
            }
            Err(e) => {
                tracing::warn!(theme = name, path = %path.display(), error = %e, "Failed to read theme");
                String::new()
            }
        }
    }
}

/// Glyph color math is rendered in under theme `name`.
#[must_use]
pub fn math_color(name: &str) -> &'static str {
    match name {
        "technical" => DARK_MATH_COLOR,
        _ => DEFAULT_MATH_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_existing_theme() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.css"), "body { margin: 0; }").unwrap();

        let store = ThemeStore::new(dir.path());

        assert_eq!(store.load("default"), "body { margin: 0; }");
    }

    #[test]
    fn test_missing_theme_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ThemeStore::new(dir.path());

        assert_eq!(store.load("no-such-theme"), "");
    }

    #[test]
    fn test_missing_styles_dir_is_empty() {
        let store = ThemeStore::new("/nonexistent/folio/styles");

        assert_eq!(store.load("default"), "");
    }

    #[test]
    fn test_math_color() {
        assert_eq!(math_color("technical"), "#dcdcaa");
        assert_eq!(math_color("default"), "#333333");
        assert_eq!(math_color("anything"), "#333333");
    }
}
