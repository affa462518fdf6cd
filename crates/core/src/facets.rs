//! "Count if added" estimates for facet options.
//!
//! For every facet value the filter UI shows how many actions would remain
//! if that value were also selected. With no filters active this is the
//! value's baseline count; otherwise the hypothetical state is run through
//! the query compiler and the result memoized.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::catalog::Catalog;
use crate::dimension::Dimension;
use crate::filter_state::FilterState;
use crate::index::SearchIndex;
use crate::query;

/// One selectable option of a facet dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub id: String,
    /// Value written to the query string when the option is toggled.
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_html: Option<String>,
    pub count: usize,
    pub selected: bool,
    /// Zero-count options cannot be picked, unless already selected.
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CountKey {
    dimension: Dimension,
    key: String,
    state: String,
}

#[derive(Debug, Default)]
struct CountCache {
    generation: u64,
    counts: HashMap<CountKey, usize>,
}

/// Memoizing facet count estimator.
///
/// The cache belongs to a single catalog generation: the first request for
/// a different generation empties it.
#[derive(Debug, Default)]
pub struct FacetCountEstimator {
    cache: Mutex<CountCache>,
}

impl FacetCountEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result count of `state` with `key` added to `dimension`. `state` itself
    /// is not modified.
    pub fn count_if_added(
        &self,
        catalog: &Catalog,
        index: &SearchIndex,
        dimension: Dimension,
        key: &str,
        state: &FilterState,
    ) -> usize {
        if !query::has_filters(catalog, state) {
            return catalog.baseline_count(dimension, key);
        }

        let cache_key = CountKey {
            dimension,
            key: key.to_string(),
            state: state.canonical_key(),
        };
        if let Some(&count) = self.lock_for(catalog.generation()).counts.get(&cache_key) {
            return count;
        }

        let count = query::count(catalog, index, &state.with_added(dimension, key));
        self.lock_for(catalog.generation())
            .counts
            .insert(cache_key, count);
        count
    }

    /// Every option of `dimension` with its count and selection flags.
    pub fn options(
        &self,
        catalog: &Catalog,
        index: &SearchIndex,
        dimension: Dimension,
        state: &FilterState,
    ) -> Vec<FacetOption> {
        catalog
            .facet_values(dimension)
            .iter()
            .map(|value| {
                let key = value.url_key(dimension);
                let count = self.count_if_added(catalog, index, dimension, key, state);
                let selected = state.is_selected(dimension, key);
                FacetOption {
                    id: value.id.clone(),
                    key: key.to_string(),
                    name: value.name.clone(),
                    summary_html: value.summary_html.clone(),
                    count,
                    selected,
                    disabled: count == 0 && !selected,
                }
            })
            .collect()
    }

    /// Number of memoized counts.
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .len()
    }

    fn lock_for(&self, generation: u64) -> std::sync::MutexGuard<'_, CountCache> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.generation != generation {
            tracing::debug!(
                from = cache.generation,
                to = generation,
                dropped = cache.counts.len(),
                "Catalog changed, clearing facet count cache"
            );
            cache.counts.clear();
            cache.generation = generation;
        }
        cache
    }
}
