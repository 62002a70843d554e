//! Image candidate-list resolution.
//!
//! The API stores image references in several shapes: absolute URLs,
//! protocol-relative URLs, root-relative paths, or bare upload filenames.
//! Given one raw reference this module produces the ordered list of URLs a
//! renderer should attempt, ending in an inline SVG placeholder that cannot
//! fail to load. [`ImageFallback`] tracks the attempt cursor: advance on
//! load failure, stop at the placeholder.

use std::sync::LazyLock;

/// Upload directory served by the API for bare filenames.
const UPLOADS_PREFIX: &str = "/static/uploads/";

/// The raw SVG shown when no image could be resolved.
const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="400"><rect width="100%" height="100%" fill="#f6f6f6"/><text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" fill="#cfcfcf" font-size="20">Sin imagen</text></svg>"##;

static PLACEHOLDER: LazyLock<String> =
    LazyLock::new(|| format!("data:image/svg+xml;utf8,{}", urlencoding::encode(PLACEHOLDER_SVG)));

/// The inline "Sin imagen" placeholder data URI.
///
/// Self-contained: rendering it performs no network fetch.
#[must_use]
pub fn placeholder() -> &'static str {
    &PLACEHOLDER
}

/// Scheme used to absolutize protocol-relative (`//host/...`) references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlScheme {
    Http,
    #[default]
    Https,
}

impl UrlScheme {
    /// The scheme prefix including the trailing colon, e.g. `"https:"`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Http => "http:",
            Self::Https => "https:",
        }
    }
}

/// Ordered, de-duplicated URL fallback chain for one raw image reference.
///
/// Invariants: never empty; the last element is always [`placeholder()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList(Vec<String>);

impl CandidateList {
    /// Build the candidate chain for `raw`.
    ///
    /// `api_base` is the API origin used to absolutize server-hosted paths
    /// (a trailing slash is ignored); `scheme` absolutizes protocol-relative
    /// references. Construction rules, first match wins:
    ///
    /// 1. blank -> placeholder only
    /// 2. absolute `http(s)://` URL -> `[url, placeholder]`
    /// 3. protocol-relative `//...` -> `[scheme + url, placeholder]`
    /// 4. root-relative `/...` -> `[base + path, path, placeholder]`
    /// 5. bare name -> `[base + uploads + name, uploads + name, /name, name, placeholder]`
    ///
    /// Lists 4 and 5 are de-duplicated preserving first occurrence.
    #[must_use]
    pub fn build(raw: Option<&str>, api_base: Option<&str>, scheme: UrlScheme) -> Self {
        let base = api_base
            .map(|b| b.trim_end_matches('/'))
            .filter(|b| !b.is_empty());

        let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self(vec![placeholder().to_owned()]);
        };

        if has_http_scheme(s) {
            return Self(vec![s.to_owned(), placeholder().to_owned()]);
        }

        if s.starts_with("//") {
            return Self(vec![format!("{}{s}", scheme.prefix()), placeholder().to_owned()]);
        }

        let mut candidates = Vec::new();
        if s.starts_with('/') {
            if let Some(base) = base {
                candidates.push(format!("{base}{s}"));
            }
            candidates.push(s.to_owned());
        } else {
            if let Some(base) = base {
                candidates.push(format!("{base}{UPLOADS_PREFIX}{s}"));
            }
            candidates.push(format!("{UPLOADS_PREFIX}{s}"));
            candidates.push(format!("/{s}"));
            candidates.push(s.to_owned());
        }
        candidates.push(placeholder().to_owned());

        Self(dedup_preserving_order(candidates))
    }

    /// The candidates in attempt order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of candidates (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A candidate list is never empty; provided for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Candidate at `idx`, if in range.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }
}

/// Attempt cursor over a [`CandidateList`].
///
/// The cursor only moves forward. Once it reaches the final candidate (the
/// placeholder) further failure reports are ignored: the placeholder is
/// inline and cannot fail.
#[derive(Debug, Clone)]
pub struct ImageFallback {
    candidates: CandidateList,
    idx: usize,
}

impl ImageFallback {
    /// Start at the first candidate of `candidates`.
    #[must_use]
    pub const fn new(candidates: CandidateList) -> Self {
        Self { candidates, idx: 0 }
    }

    /// The URL to render right now.
    #[must_use]
    pub fn current(&self) -> &str {
        match self.candidates.get(self.idx) {
            Some(candidate) => candidate,
            None => placeholder(),
        }
    }

    /// Report that the current candidate failed to load.
    ///
    /// Advances to the next candidate when one remains; returns whether the
    /// cursor moved.
    pub fn mark_failed(&mut self) -> bool {
        if self.idx + 1 < self.candidates.len() {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    /// Whether the cursor has reached the placeholder.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.idx + 1 >= self.candidates.len()
    }

    /// The underlying candidate list.
    #[must_use]
    pub const fn candidates(&self) -> &CandidateList {
        &self.candidates
    }
}

/// Case-insensitive check for an explicit `http://` or `https://` scheme.
fn has_http_scheme(s: &str) -> bool {
    let mut lower = String::with_capacity(8);
    for c in s.chars().take(8) {
        lower.push(c.to_ascii_lowercase());
    }
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Remove duplicates, keeping the first occurrence of each value.
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BASE: Option<&str> = Some("http://localhost:5000");

    fn urls(list: &CandidateList) -> Vec<&str> {
        list.as_slice().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_blank_reference_is_placeholder_only() {
        for raw in [None, Some(""), Some("   ")] {
            let list = CandidateList::build(raw, BASE, UrlScheme::Https);
            assert_eq!(list.len(), 1);
            assert_eq!(list.get(0), Some(placeholder()));
        }
    }

    #[test]
    fn test_every_list_ends_in_placeholder() {
        let raws = [
            None,
            Some("https://cdn.example.com/a.jpg"),
            Some("//cdn.example.com/a.jpg"),
            Some("/static/uploads/a.jpg"),
            Some("a.jpg"),
        ];
        for raw in raws {
            let list = CandidateList::build(raw, BASE, UrlScheme::Https);
            assert!(!list.is_empty());
            let last = list.get(list.len() - 1).unwrap();
            assert_eq!(last, placeholder());
        }
    }

    #[test]
    fn test_absolute_url() {
        let list = CandidateList::build(Some("https://cdn.example.com/a.jpg"), BASE, UrlScheme::Https);
        assert_eq!(
            urls(&list),
            vec!["https://cdn.example.com/a.jpg", placeholder()]
        );
    }

    #[test]
    fn test_absolute_url_scheme_is_case_insensitive() {
        let list = CandidateList::build(Some("HTTP://cdn.example.com/a.jpg"), BASE, UrlScheme::Https);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), Some("HTTP://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_protocol_relative_url() {
        let list = CandidateList::build(Some("//cdn.example.com/a.jpg"), BASE, UrlScheme::Http);
        assert_eq!(
            urls(&list),
            vec!["http://cdn.example.com/a.jpg", placeholder()]
        );
    }

    #[test]
    fn test_root_relative_path_with_base() {
        let list = CandidateList::build(Some("/static/uploads/a.jpg"), BASE, UrlScheme::Https);
        assert_eq!(
            urls(&list),
            vec![
                "http://localhost:5000/static/uploads/a.jpg",
                "/static/uploads/a.jpg",
                placeholder(),
            ]
        );
    }

    #[test]
    fn test_root_relative_path_without_base() {
        let list = CandidateList::build(Some("/img/a.jpg"), None, UrlScheme::Https);
        assert_eq!(urls(&list), vec!["/img/a.jpg", placeholder()]);
    }

    #[test]
    fn test_bare_name_full_chain() {
        let list = CandidateList::build(Some("a.jpg"), BASE, UrlScheme::Https);
        assert_eq!(
            urls(&list),
            vec![
                "http://localhost:5000/static/uploads/a.jpg",
                "/static/uploads/a.jpg",
                "/a.jpg",
                "a.jpg",
                placeholder(),
            ]
        );
    }

    #[test]
    fn test_trailing_slash_on_base_is_trimmed() {
        let list = CandidateList::build(Some("a.jpg"), Some("http://localhost:5000/"), UrlScheme::Https);
        assert_eq!(
            list.get(0),
            Some("http://localhost:5000/static/uploads/a.jpg")
        );
    }

    #[test]
    fn test_reference_is_trimmed() {
        let list = CandidateList::build(Some("  a.jpg  "), None, UrlScheme::Https);
        assert_eq!(list.get(0), Some("/static/uploads/a.jpg"));
    }

    #[test]
    fn test_blank_base_is_ignored() {
        let list = CandidateList::build(Some("/static/uploads/a.jpg"), Some(""), UrlScheme::Https);
        assert_eq!(urls(&list), vec!["/static/uploads/a.jpg", placeholder()]);
    }

    #[test]
    fn test_dedup_preserves_order() {
        let deduped = dedup_preserving_order(vec![
            "a".to_owned(),
            "b".to_owned(),
            "a".to_owned(),
            "c".to_owned(),
            "b".to_owned(),
        ]);
        assert_eq!(deduped, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_placeholder_is_inline_data_uri() {
        assert!(placeholder().starts_with("data:image/svg+xml;utf8,"));
        assert!(placeholder().contains("Sin%20imagen"));
    }

    #[test]
    fn test_fallback_advances_on_failure() {
        let list = CandidateList::build(Some("a.jpg"), BASE, UrlScheme::Https);
        let mut fallback = ImageFallback::new(list);
        assert_eq!(
            fallback.current(),
            "http://localhost:5000/static/uploads/a.jpg"
        );
        assert!(fallback.mark_failed());
        assert_eq!(fallback.current(), "/static/uploads/a.jpg");
    }

    #[test]
    fn test_fallback_sticks_at_placeholder() {
        let list = CandidateList::build(None, None, UrlScheme::Https);
        let mut fallback = ImageFallback::new(list);
        assert!(fallback.is_exhausted());
        assert!(!fallback.mark_failed());
        assert_eq!(fallback.current(), placeholder());
    }

    #[test]
    fn test_fallback_exhausts_full_chain() {
        let list = CandidateList::build(Some("a.jpg"), BASE, UrlScheme::Https);
        let mut fallback = ImageFallback::new(list);
        let mut steps = 0;
        while fallback.mark_failed() {
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert!(fallback.is_exhausted());
        assert_eq!(fallback.current(), placeholder());
    }
}
