//! Link target helpers.

/// Split a link target at the first `#` into path and optional anchor.
///
/// ```ignore
/// split_anchor("/about#team") == ("/about", Some("team"))
/// split_anchor("/about")      == ("/about", None)
/// ```
#[inline]
pub fn split_anchor(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((path, anchor)) => (path, Some(anchor)),
        None => (target, None),
    }
}
