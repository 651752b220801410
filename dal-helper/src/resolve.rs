//! Turning a `--source` value into the paths handed to a DAL.

use std::path::PathBuf;

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

/// Character that switches multi-source resolution to glob expansion.
pub const GLOB_WILDCARD: char = '*';

/// Paths a DAL is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sources {
    /// Single-source mode: the `--source` value, untouched.
    Single(PathBuf),
    /// Multi-source mode: glob matches, or the literal `--source` value.
    Multi(Vec<PathBuf>),
}

impl Sources {
    /// All paths, in resolution order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::Single(path) => std::slice::from_ref(path),
            Self::Multi(paths) => paths,
        }
    }

    /// Consume into a path list; a single source becomes a one-element list.
    #[must_use]
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Self::Single(path) => vec![path],
            Self::Multi(paths) => paths,
        }
    }

    /// Number of resolved paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths().len()
    }

    /// `true` when a glob matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths().is_empty()
    }
}

/// Resolve a source specification.
///
/// - `single_source`: returns [`Sources::Single`] with `spec` unchanged, even if it
///   contains a wildcard.
/// - otherwise, if `spec` contains `*` and `no_glob` is unset: every filesystem
///   match, in glob enumeration order. No matches yields an empty list.
/// - otherwise: a one-element list holding `spec` verbatim.
///
/// Expansion follows shell conventions: `*` does not match a leading `.`, runs of
/// `*` act as a single `*` (no recursive `**`), and a `[` that does not open a
/// valid character class matches itself. Entries that cannot be read during the
/// scan are skipped with a warning.
#[must_use]
pub fn resolve(spec: &str, single_source: bool, no_glob: bool) -> Sources {
    let sources = if single_source {
        Sources::Single(PathBuf::from(spec))
    } else if spec.contains(GLOB_WILDCARD) && !no_glob {
        Sources::Multi(expand(spec))
    } else {
        Sources::Multi(vec![PathBuf::from(spec)])
    };

    debug!(
        spec,
        count = sources.len(),
        paths = %DisplayPaths(sources.paths()),
        "using sources"
    );
    sources
}

fn expand(spec: &str) -> Vec<PathBuf> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut pattern = collapse_stars(spec);
    let entries = loop {
        match glob::glob_with(&pattern, options) {
            Ok(entries) => break entries,
            Err(e) => {
                pattern = if let Some(escaped) = escape_bracket_at(&pattern, e.pos) {
                    debug!(pos = e.pos, "treating unclosed '[' literally");
                    escaped
                } else {
                    warn!(spec, error = %e, "matching source literally");
                    Pattern::escape(spec)
                };
            }
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable entry"),
        }
    }
    paths
}

/// `a**b` and `***` become `a*b` and `*`.
fn collapse_stars(spec: &str) -> String {
    let mut out = String::with_capacity(spec.len());
    for c in spec.chars() {
        if c == GLOB_WILDCARD && out.ends_with(GLOB_WILDCARD) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Replace the `[` at char index `pos` with the one-character class `[[]`.
fn escape_bracket_at(pattern: &str, pos: usize) -> Option<String> {
    if pattern.chars().nth(pos) != Some('[') {
        return None;
    }
    let mut out = String::with_capacity(pattern.len() + 2);
    for (i, c) in pattern.chars().enumerate() {
        if i == pos {
            out.push_str("[[]");
        } else {
            out.push(c);
        }
    }
    Some(out)
}

struct DisplayPaths<'a>(&'a [PathBuf]);

impl std::fmt::Display for DisplayPaths<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for path in self.0 {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}
