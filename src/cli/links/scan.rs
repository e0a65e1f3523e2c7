//! Internal link extraction from markup documents.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{normalize_path, split_anchor};

/// `[label](/target)` with a site-root target.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((/[^)]+)\)").unwrap());

/// A link extracted from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLink {
    /// Link text between the brackets.
    pub label: String,
    /// Raw target as written, anchor included.
    pub target: String,
}

impl ScannedLink {
    /// Anchor fragment without `#`, if any.
    #[inline]
    pub fn anchor(&self) -> Option<&str> {
        split_anchor(&self.target).1
    }

    /// Target path with anchor removed and trailing slashes stripped.
    #[inline]
    pub fn path(&self) -> &str {
        normalize_path(split_anchor(&self.target).0)
    }

    /// Whether the target contains one of the exempt substrings.
    #[inline]
    pub fn is_exempt(&self, skip_substrings: &[String]) -> bool {
        skip_substrings
            .iter()
            .any(|s| self.target.contains(s.as_str()))
    }
}

/// Extract all internal links, skipping protocol-relative `//host` targets.
pub fn extract_internal_links(content: &str) -> Vec<ScannedLink> {
    LINK_RE
        .captures_iter(content)
        .map(|caps| ScannedLink {
            label: caps[1].to_string(),
            target: caps[2].to_string(),
        })
        // `//host/x` is protocol-relative, i.e. external
        .filter(|link| !link.target.starts_with("//"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(label: &str, target: &str) -> ScannedLink {
        ScannedLink {
            label: label.into(),
            target: target.into(),
        }
    }

    #[test]
    fn test_extract_internal_links() {
        let content = r#"
See [Setup](/guides/setup) and [the API](/api/overview#auth).
An [external](https://example.com) link and a [relative](./sibling) one.
![Logo](/images/logo.png)
"#;
        let links = extract_internal_links(content);
        assert_eq!(
            links,
            vec![
                link("Setup", "/guides/setup"),
                link("the API", "/api/overview#auth"),
                link("Logo", "/images/logo.png"),
            ]
        );
    }

    #[test]
    fn test_extract_skips_protocol_relative() {
        let links = extract_internal_links("[cdn](//cdn.example.com/x.js) [home](/home)");
        assert_eq!(links, vec![link("home", "/home")]);
    }

    #[test]
    fn test_extract_requires_label_and_target() {
        assert!(extract_internal_links("[](/empty-label)").is_empty());
        assert!(extract_internal_links("[text]()").is_empty());
        assert!(extract_internal_links("[text] (/spaced)").is_empty());
    }

    #[test]
    fn test_extract_multiple_on_one_line() {
        let links = extract_internal_links("[a](/a)[b](/b/) text [c](/c#x)");
        assert_eq!(links.len(), 3);
        assert_eq!(links[1].path(), "/b");
    }

    #[test]
    fn test_path_and_anchor() {
        let l = link("x", "/guides/setup/#install");
        assert_eq!(l.path(), "/guides/setup");
        assert_eq!(l.anchor(), Some("install"));

        let l = link("x", "/guides/setup");
        assert_eq!(l.path(), "/guides/setup");
        assert_eq!(l.anchor(), None);
    }

    #[test]
    fn test_root_and_anchor_only_paths() {
        assert_eq!(link("home", "/").path(), "/");
        assert_eq!(link("top", "/#top").path(), "/");
    }

    #[test]
    fn test_is_exempt() {
        let skip = vec!["console-api".to_string()];
        assert!(link("x", "/console-api/rules").is_exempt(&skip));
        assert!(link("x", "/reference/console-api#keys").is_exempt(&skip));
        assert!(!link("x", "/console/api").is_exempt(&skip));
        assert!(!link("x", "/anything").is_exempt(&[]));
    }
}
