//! Paths claimed by more than one file.
//!
//! `guides/a.md` and `guides/a.mdx` both map to `/guides/a`; so do
//! `img/x.png.mdx` and `img/x.png`. The index keeps the last registration,
//! which is reported as the one in use.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::core::UrlPath;
use crate::log;
use crate::utils::plural_count;

/// Every file registered for a path, in registration order.
pub type UrlSourceMap = FxHashMap<UrlPath, Vec<PathBuf>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlConflict {
    pub url: UrlPath,
    /// Claiming files relative to the root, in registration order.
    pub sources: Vec<PathBuf>,
}

impl UrlConflict {
    /// The file the index ended up with.
    pub fn winner(&self) -> Option<&Path> {
        self.sources.last().map(PathBuf::as_path)
    }
}

/// Collect paths with two or more sources, ordered by path.
pub fn detect_conflicts(url_sources: &UrlSourceMap, root: &Path) -> Vec<UrlConflict> {
    let mut conflicts = Vec::new();
    for (url, sources) in url_sources {
        if sources.len() < 2 {
            continue;
        }
        conflicts.push(UrlConflict {
            url: url.clone(),
            sources: sources
                .iter()
                .map(|p| p.strip_prefix(root).unwrap_or(p).to_path_buf())
                .collect(),
        });
    }
    conflicts.sort_unstable_by(|a, b| a.url.cmp(&b.url));
    conflicts
}

/// Print conflicts under `module` (`warning` or `error`).
///
/// ```text
/// [warning] 1 path claimed by several files
///   /images/logo.png
///     images/logo.png.mdx
///     images/logo.png (used)
/// ```
pub fn print_conflicts(module: &str, conflicts: &[UrlConflict]) {
    if conflicts.is_empty() {
        return;
    }

    log!(module; "{} claimed by several files", plural_count(conflicts.len(), "path"));
    for conflict in conflicts {
        println!("  {}", conflict.url);
        for source in &conflict.sources {
            let used = if Some(source.as_path()) == conflict.winner() {
                " (used)"
            } else {
                ""
            };
            println!("    {}{used}", source.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(map: &mut UrlSourceMap, url: &str, files: &[PathBuf]) {
        map.entry(UrlPath::from_link(url))
            .or_default()
            .extend(files.iter().cloned());
    }

    #[test]
    fn test_single_source_is_not_a_conflict() {
        let root = PathBuf::from("/site");
        let mut map = UrlSourceMap::default();
        claim(&mut map, "/a", &[root.join("a.mdx")]);
        assert!(detect_conflicts(&map, &root).is_empty());
    }

    #[test]
    fn test_conflict_sources_relative_and_ordered() {
        let root = PathBuf::from("/site");
        let mut map = UrlSourceMap::default();
        claim(&mut map, "/b", &[root.join("b.md"), root.join("b.mdx")]);

        let conflicts = detect_conflicts(&map, &root);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].url, "/b");
        assert_eq!(
            conflicts[0].sources,
            vec![PathBuf::from("b.md"), PathBuf::from("b.mdx")]
        );
        assert_eq!(conflicts[0].winner(), Some(Path::new("b.mdx")));
    }

    #[test]
    fn test_conflicts_sorted_by_path() {
        let root = PathBuf::from("/site");
        let mut map = UrlSourceMap::default();
        for url in ["/z", "/m", "/a"] {
            claim(&mut map, url, &[root.join("x"), root.join("y")]);
        }
        let urls: Vec<_> = detect_conflicts(&map, &root)
            .iter()
            .map(|c| c.url.to_string())
            .collect();
        assert_eq!(urls, ["/a", "/m", "/z"]);
    }
}
