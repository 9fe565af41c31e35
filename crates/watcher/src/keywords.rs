//! Keyword matching for event paths
//!
//! Matching is a plain case-insensitive substring test against the full
//! path. It is not segment aware: `log` matches `/var/catalog/x` as well
//! as `/var/log/x`.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Immutable, ordered set of lowercase keywords
///
/// An empty set is pass-through and matches every path. Cloning is cheap,
/// so one set can be shared by the session and its filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Arc<[String]>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            keywords: Arc::from(Vec::new()),
        }
    }
}

impl KeywordSet {
    /// Build a set from raw keywords, lowercasing each one
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// True when no keywords are configured (match-all mode)
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Keywords in configured order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Check a path string against the set
    pub fn matches(&self, path: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }

        let path_lower = path.to_lowercase();
        self.keywords.iter().any(|k| path_lower.contains(k.as_str()))
    }

    /// Check a filesystem path against the set
    ///
    /// Non-UTF-8 components are compared in their lossy form.
    pub fn matches_path(&self, path: &Path) -> bool {
        self.matches(&path.to_string_lossy())
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keywords.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&self.keywords.join(", "))
    }
}

/// Free-function form of [`KeywordSet::matches`]
pub fn matches(keywords: &KeywordSet, path: &str) -> bool {
    keywords.matches(path)
}
