use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// Lazy-loading attributes checked on `img` elements when `src` is absent,
/// in priority order.
const LAZY_SRC_ATTRS: &[&str] = &["data-src", "data-lazy-src"];

/// What a discovery pass over a document found.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Number of candidate elements (`img` and `source`) in the document,
    /// including ones no reference could be extracted from.
    pub elements_seen: usize,
    /// Raw references in document order, unvalidated.
    pub candidates: Vec<String>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.elements_seen == 0
    }
}

/// Scan a document for image references.
///
/// Enumerates every `img` and `source` element. For `img`, the reference is
/// taken from `src`, falling back to the recognized lazy-loading attributes.
/// For `source`, the first entry of `srcset` is taken as representative and
/// its width/density descriptor is dropped.
pub fn discover_candidates(html: &str) -> Discovery {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img, source").unwrap();

    let mut elements_seen = 0;
    let mut candidates = Vec::new();

    for element in document.select(&selector) {
        elements_seen += 1;

        let reference = match element.value().name() {
            "img" => {
                let mut reference = element.value().attr("src");
                for attr in LAZY_SRC_ATTRS {
                    if reference.is_none() {
                        reference = element.value().attr(attr);
                    }
                }
                reference.map(|r| r.to_string())
            }
            "source" => element
                .value()
                .attr("srcset")
                .and_then(first_srcset_entry),
            _ => None,
        };

        if let Some(reference) = reference {
            debug!("Found candidate reference: {}", reference);
            candidates.push(reference);
        }
    }

    Discovery {
        elements_seen,
        candidates,
    }
}

/// First address of a `srcset` value, without its descriptor.
fn first_srcset_entry(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()
        .map(str::trim)
        .and_then(|entry| entry.split_whitespace().next())
        .map(|address| address.to_string())
}

/// Resolve raw references to absolute addresses and collapse duplicates,
/// preserving first-seen order.
///
/// References beginning with `http` are accepted unchanged. Root-relative
/// references (one leading `/`) are resolved against the page URL.
/// Everything else, including protocol-relative `//host/path` references
/// and `data:` URIs, is dropped.
pub fn normalize_candidates(candidates: &[String], page_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for raw in candidates {
        let resolved = if raw.starts_with("http") {
            Some(raw.clone())
        } else if raw.starts_with('/') && !raw.starts_with("//") {
            match page_url.join(raw) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    warn!("Cannot resolve {} against {}: {}", raw, page_url, e);
                    None
                }
            }
        } else {
            debug!("Dropping reference: {}", raw);
            None
        };

        if let Some(url) = resolved
            && seen.insert(url.clone())
        {
            unique.push(url);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://x.test/gallery/page.html").unwrap()
    }

    #[test]
    fn discovers_img_src() {
        let discovery = discover_candidates(
            r#"<html><body><img src="https://x.test/a.png"></body></html>"#,
        );
        assert_eq!(discovery.elements_seen, 1);
        assert_eq!(discovery.candidates, vec!["https://x.test/a.png"]);
    }

    #[test]
    fn src_takes_priority_over_lazy_attrs() {
        let discovery = discover_candidates(
            r#"<img src="/real.png" data-src="/lazy.png" data-lazy-src="/lazier.png">"#,
        );
        assert_eq!(discovery.candidates, vec!["/real.png"]);
    }

    #[test]
    fn lazy_attrs_checked_in_order() {
        let discovery =
            discover_candidates(r#"<img data-src="/lazy.png" data-lazy-src="/lazier.png">"#);
        assert_eq!(discovery.candidates, vec!["/lazy.png"]);

        let discovery = discover_candidates(r#"<img data-lazy-src="/lazier.png">"#);
        assert_eq!(discovery.candidates, vec!["/lazier.png"]);
    }

    #[test]
    fn source_takes_first_srcset_entry_without_descriptor() {
        let discovery = discover_candidates(
            r#"<picture>
                <source srcset="/small.webp 480w, /large.webp 1080w">
                <img src="/fallback.jpg">
            </picture>"#,
        );
        assert_eq!(discovery.elements_seen, 2);
        assert_eq!(discovery.candidates, vec!["/small.webp", "/fallback.jpg"]);
    }

    #[test]
    fn element_without_reference_still_counts() {
        let discovery = discover_candidates(
            r#"<img alt="no src"><picture><source media="(min-width: 600px)"></picture>"#,
        );
        assert_eq!(discovery.elements_seen, 2);
        assert!(discovery.candidates.is_empty());
    }

    #[test]
    fn empty_document_is_empty_discovery() {
        let discovery = discover_candidates("<html><body><p>text</p></body></html>");
        assert!(discovery.is_empty());
        assert!(discovery.candidates.is_empty());
    }

    #[test]
    fn absolute_http_references_pass_unchanged() {
        let refs = vec!["http://other.test/pic.jpg".to_string()];
        assert_eq!(
            normalize_candidates(&refs, &page()),
            vec!["http://other.test/pic.jpg"]
        );
    }

    #[test]
    fn root_relative_resolves_against_origin() {
        let refs = vec!["/wp-content/uploads/pic.webp".to_string()];
        assert_eq!(
            normalize_candidates(&refs, &page()),
            vec!["https://x.test/wp-content/uploads/pic.webp"]
        );
    }

    #[test]
    fn protocol_relative_and_data_uris_are_dropped() {
        let refs = vec![
            "//cdn.test/pic.jpg".to_string(),
            "data:image/png;base64,AAAA".to_string(),
            "".to_string(),
        ];
        assert!(normalize_candidates(&refs, &page()).is_empty());
    }

    #[test]
    fn duplicates_collapse_preserving_first_seen_order() {
        let refs = vec![
            "https://x.test/b.png".to_string(),
            "/a.png".to_string(),
            "https://x.test/b.png".to_string(),
            "https://x.test/a.png".to_string(),
        ];
        assert_eq!(
            normalize_candidates(&refs, &page()),
            vec!["https://x.test/b.png", "https://x.test/a.png"]
        );
    }
}
