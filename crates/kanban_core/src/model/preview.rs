//! Card description preview projection.
//!
//! # Responsibility
//! - Derive the short plain-text preview rendered on a card face.
//!
//! # Invariants
//! - Preview never contains markdown markup or line breaks.
//! - Preview text is at most `DESCRIPTION_PREVIEW_MAX_CHARS` characters; a cut
//!   preview gains a trailing `…`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Maximum preview length in characters.
pub const DESCRIPTION_PREVIEW_MAX_CHARS: usize = 100;

/// Inline `[label](target)` links and `![alt](src)` images.
static INLINE_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(!?)\[([^\]]*)\]\([^)]*\)").expect("valid inline reference regex")
});
/// Emphasis, heading, quote and code markers, together with whitespace runs.
static MARKUP_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s*_`#>~\[\]]+").expect("valid markup gap regex"));

/// Builds the card-face preview for a description.
///
/// Links keep their label, images are dropped, and markup collapses into
/// single spaces. Returns `None` when nothing printable remains.
pub fn derive_description_preview(description: &str) -> Option<String> {
    let labels = INLINE_REF_RE.replace_all(description, |caps: &Captures<'_>| {
        if &caps[1] == "!" {
            " ".to_string()
        } else {
            caps[2].to_string()
        }
    });
    let flat = MARKUP_GAP_RE.replace_all(&labels, " ");
    let text = flat.trim();
    if text.is_empty() {
        return None;
    }

    match text.char_indices().nth(DESCRIPTION_PREVIEW_MAX_CHARS) {
        None => Some(text.to_string()),
        Some((cut, _)) => Some(format!("{}…", text[..cut].trim_end())),
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_description_preview, DESCRIPTION_PREVIEW_MAX_CHARS};

    #[test]
    fn preview_strips_markup_and_line_breaks() {
        let preview =
            derive_description_preview("# Goal\n\n**Ship** the [spec doc](https://x.test)\n![shot](a.png)")
                .unwrap();
        assert_eq!(preview, "Goal Ship the spec doc");
    }

    #[test]
    fn preview_is_capped() {
        let long = "word ".repeat(60);
        let preview = derive_description_preview(&long).unwrap();
        assert!(preview.chars().count() <= DESCRIPTION_PREVIEW_MAX_CHARS + 1);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn preview_at_limit_is_not_marked() {
        let exact = "x".repeat(DESCRIPTION_PREVIEW_MAX_CHARS);
        assert_eq!(derive_description_preview(&exact).as_deref(), Some(exact.as_str()));
    }

    #[test]
    fn image_alt_text_is_dropped() {
        assert_eq!(
            derive_description_preview("![diagram](d.png) see [board](b)").as_deref(),
            Some("see board")
        );
    }

    #[test]
    fn blank_description_has_no_preview() {
        assert_eq!(derive_description_preview("  \n **  "), None);
    }
}
