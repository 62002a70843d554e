//! Memoized image candidate lists.
//!
//! Candidate construction is pure ([`CandidateList::build`]); this cache
//! runs it once per distinct raw reference. Lists are only rebuilt when the
//! raw reference itself changes - advancing through the fallback chain
//! never regenerates the list.

use std::sync::Arc;

use moka::sync::Cache;

use mercado_barrio_core::image::{CandidateList, ImageFallback, UrlScheme};

/// Distinct raw references kept memoized.
const CACHE_CAPACITY: u64 = 1000;

/// Shared candidate-list memo for one API base.
#[derive(Clone)]
pub struct ImageCache {
    api_base: Option<String>,
    scheme: UrlScheme,
    cache: Cache<String, Arc<CandidateList>>,
}

impl ImageCache {
    /// Memoize candidate lists against `api_base` and `scheme`.
    #[must_use]
    pub fn new(api_base: Option<String>, scheme: UrlScheme) -> Self {
        Self {
            api_base,
            scheme,
            cache: Cache::new(CACHE_CAPACITY),
        }
    }

    /// The candidate list for `raw`, computed at most once per reference.
    #[must_use]
    pub fn candidates(&self, raw: Option<&str>) -> Arc<CandidateList> {
        let key = raw.unwrap_or("").trim().to_owned();
        self.cache.get_with(key, || {
            Arc::new(CandidateList::build(
                raw,
                self.api_base.as_deref(),
                self.scheme,
            ))
        })
    }

    /// A fresh attempt cursor for `raw`; the underlying list is shared.
    #[must_use]
    pub fn fallback(&self, raw: Option<&str>) -> ImageFallback {
        ImageFallback::new((*self.candidates(raw)).clone())
    }
}
