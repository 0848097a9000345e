//! Include/exclude glob filtering for watched paths.

use crate::error::{ConfigError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Excludes applied unless `--skip-built-in-ignores` is given: dotfiles and
/// dot-directories anywhere in the tree, plus dependency/bytecode caches.
pub const BUILT_IN_EXCLUDES: &[&str] = &["**/.*", "**/node_modules/**", "**/__pycache__/**"];

/// Decides which changed paths are worth a reload.
///
/// A pattern matches a path when it matches either the path relative to the
/// watched root or just its file name, so `*.js` and `index.html` both apply
/// at any depth. `*` may cross directory separators. Matching is
/// case-sensitive.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl WatchFilter {
    /// Compile the filter, failing on the first malformed pattern.
    pub fn new(include: &[String], exclude: &[String], use_built_in_excludes: bool) -> Result<Self> {
        let built_in: &[&str] = if use_built_in_excludes {
            BUILT_IN_EXCLUDES
        } else {
            &[]
        };

        Ok(Self {
            include: build_set(include.iter().map(String::as_str))?,
            exclude: build_set(exclude.iter().map(String::as_str).chain(built_in.iter().copied()))?,
        })
    }

    /// Whether a path relative to the watched root should trigger a reload.
    pub fn is_match(&self, relative: &Path) -> bool {
        let matches = |set: &GlobSet| {
            set.is_match(relative)
                || relative
                    .file_name()
                    .is_some_and(|name| set.is_match(Path::new(name)))
        };

        matches(&self.include) && !matches(&self.exclude)
    }

    /// Like [`is_match`](Self::is_match) for an absolute path; paths outside
    /// `root` never match.
    pub fn matches_under(&self, root: &Path, path: &Path) -> bool {
        match path.strip_prefix(root) {
            Ok(relative) if !relative.as_os_str().is_empty() => self.is_match(relative),
            _ => false,
        }
    }
}

fn build_set<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| {
        ConfigError::InvalidPattern {
            pattern: e.glob().unwrap_or_default().to_string(),
            reason: e.kind().to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn filter(include: &[&str], exclude: &[&str], built_in: bool) -> WatchFilter {
        let include: Vec<String> = include.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        WatchFilter::new(&include, &exclude, built_in).unwrap()
    }

    #[test]
    fn test_default_watches_everything_visible() {
        let f = filter(&["*"], &[], true);
        assert!(f.is_match(Path::new("index.html")));
        assert!(f.is_match(Path::new("src/app/main.js")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(&["*"], &["*.css"], true);
        assert!(!f.is_match(Path::new("style.css")));
        assert!(!f.is_match(Path::new("assets/theme/dark.css")));
        assert!(f.is_match(Path::new("app.js")));
    }

    #[test]
    fn test_include_by_file_name_at_any_depth() {
        let f = filter(&["index.html", "*.js"], &[], true);
        assert!(f.is_match(Path::new("index.html")));
        assert!(f.is_match(Path::new("docs/index.html")));
        assert!(f.is_match(Path::new("lib/util.js")));
        assert!(!f.is_match(Path::new("docs/about.html")));
    }

    #[test]
    fn test_built_in_excludes() {
        let f = filter(&["*"], &[], true);
        assert!(!f.is_match(Path::new(".env")));
        assert!(!f.is_match(Path::new(".git/config")));
        assert!(!f.is_match(Path::new("src/.hidden/file.js")));
        assert!(!f.is_match(Path::new("node_modules/react/index.js")));
        assert!(!f.is_match(Path::new("web/node_modules/react/index.js")));
        assert!(!f.is_match(Path::new("pkg/__pycache__/mod.cpython-312.pyc")));
        assert!(f.is_match(Path::new("src/file.with.dots.js")));
    }

    #[test]
    fn test_skip_built_in_excludes() {
        let f = filter(&["*"], &[], false);
        assert!(f.is_match(Path::new(".env")));
        assert!(f.is_match(Path::new("node_modules/react/index.js")));
    }

    #[test]
    fn test_case_sensitive() {
        let f = filter(&["*.html"], &[], true);
        assert!(f.is_match(Path::new("page.html")));
        assert!(!f.is_match(Path::new("PAGE.HTML")));
    }

    #[test]
    fn test_matches_under_root() {
        let root = PathBuf::from("/project");
        let f = filter(&["*"], &[], true);
        assert!(f.matches_under(&root, Path::new("/project/index.html")));
        assert!(!f.matches_under(&root, Path::new("/other/index.html")));
        assert!(!f.matches_under(&root, Path::new("/project")));
        assert!(!f.matches_under(&root, Path::new("/project/.git/HEAD")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = WatchFilter::new(&["*.{js".to_string()], &[], true).unwrap_err();
        assert!(err.to_string().contains("*.{js"));
    }
}
