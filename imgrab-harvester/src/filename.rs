//! Filename derivation for saved images.

/// Extension used when the response declares no usable media subtype.
pub const FALLBACK_EXTENSION: &str = "webp";

/// Derive a filename from an address: the part after the last `/`, with
/// query string and fragment stripped.
///
/// Returns `None` when the result is empty or carries no extension, in
/// which case a name should be synthesized instead.
pub fn filename_from_url(url: &str) -> Option<String> {
    let tail = url.rsplit('/').next().unwrap_or(url);
    let name = tail.split(['?', '#']).next().unwrap_or("");
    if name.is_empty() || !name.contains('.') {
        None
    } else {
        Some(sanitize_filename(name))
    }
}

/// Synthesize `image_<index>.<ext>` for addresses with no extractable
/// filename. `index` is the address's 1-based position in the unique
/// sequence; the extension comes from the content type's subtype, falling
/// back to [`FALLBACK_EXTENSION`].
pub fn synthesized_filename(index: usize, content_type: Option<&str>) -> String {
    let ext = content_type
        .and_then(|ct| ct.split('/').nth(1))
        .and_then(|subtype| subtype.split(';').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_EXTENSION);
    format!("image_{}.{}", index, ext)
}

/// Replace characters that are unsafe in a filename on the local
/// filesystem. Addresses are untrusted input.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == '\\' || c == '\0' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_path_segment() {
        assert_eq!(
            filename_from_url("https://x.test/a/b/pic.webp").as_deref(),
            Some("pic.webp")
        );
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(
            filename_from_url("https://x.test/pic.jpg?v=2#top").as_deref(),
            Some("pic.jpg")
        );
    }

    #[test]
    fn no_extension_yields_none() {
        assert_eq!(filename_from_url("https://x.test/img?id=5"), None);
        assert_eq!(filename_from_url("https://x.test/images/"), None);
        assert_eq!(filename_from_url("https://x.test/"), None);
    }

    #[test]
    fn synthesized_uses_content_subtype() {
        assert_eq!(synthesized_filename(3, Some("image/png")), "image_3.png");
        assert_eq!(
            synthesized_filename(1, Some("image/webp; charset=binary")),
            "image_1.webp"
        );
    }

    #[test]
    fn synthesized_falls_back_to_webp() {
        assert_eq!(synthesized_filename(2, None), "image_2.webp");
        assert_eq!(synthesized_filename(2, Some("image")), "image_2.webp");
        assert_eq!(synthesized_filename(2, Some("image/")), "image_2.webp");
    }

    #[test]
    fn sanitizes_control_characters() {
        assert_eq!(
            filename_from_url("https://x.test/pi\\c.webp").as_deref(),
            Some("pi_c.webp")
        );
    }
}
