//! Narrows a profile page down to the text window holding the embedded user record.
//!
//! The page renders the record either as a plain `"userData":{...}` object or
//! inside a framework stream chunk where every quote is escaped. Anchors are
//! tried from most to least specific; the whole document is the last resort.

/// Start of the plainly embedded record.
pub const PRIMARY_MARKER: &str = r#""userData":{"#;
/// Key that follows the record in the plain rendering.
pub const ERROR_MARKER: &str = r#""error""#;
/// Bare keyword, present in both renderings.
pub const FALLBACK_KEYWORD: &str = "userData";
/// Bytes kept past the error marker.
pub const ERROR_MARGIN: usize = 200;
/// Width used when no closing anchor exists.
pub const WINDOW_WIDTH: usize = 5000;

/// Which anchor produced the window. Mostly useful for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Primary,
    Keyword,
    WholeDocument,
}

/// Returns the smallest slice of `html` likely to contain the user record.
/// Never fails; worst case is the full input.
pub fn locate(html: &str) -> &str {
    locate_with_anchor(html).0
}

pub fn locate_with_anchor(html: &str) -> (&str, Anchor) {
    if let Some(start) = html.find(PRIMARY_MARKER) {
        let end = match html[start..].find(ERROR_MARKER) {
            Some(offset) => start + offset + ERROR_MARGIN,
            None => start + WINDOW_WIDTH,
        };
        return (slice_to(html, start, end), Anchor::Primary);
    }

    if let Some(start) = html.find(FALLBACK_KEYWORD) {
        return (
            slice_to(html, start, start + WINDOW_WIDTH),
            Anchor::Keyword,
        );
    }

    (html, Anchor::WholeDocument)
}

/// `html[start..end]` with `end` clamped to the input and pulled back onto a
/// char boundary. `start` must already be a boundary.
fn slice_to(html: &str, start: usize, end: usize) -> &str {
    let mut end = end.min(html.len());
    while !html.is_char_boundary(end) {
        end -= 1;
    }
    &html[start..end]
}
