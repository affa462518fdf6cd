//! One catalog generation together with its search index and count cache.

use crate::catalog::{Action, Catalog};
use crate::dimension::Dimension;
use crate::error::CoreError;
use crate::facets::{FacetCountEstimator, FacetOption};
use crate::filter_state::FilterState;
use crate::index::{IndexConfig, SearchIndex};
use crate::query::{self, FilteredActions};

/// Read-only engine over a single catalog.
///
/// Shared behind an `Arc`; a refreshed catalog gets a new `Explorer`, so the
/// index and the count cache never outlive the records they describe.
#[derive(Debug)]
pub struct Explorer {
    catalog: Catalog,
    index: SearchIndex,
    counts: FacetCountEstimator,
}

impl Explorer {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, IndexConfig::default())
    }

    pub fn with_config(catalog: Catalog, config: IndexConfig) -> Self {
        let index = SearchIndex::build(&catalog, config);
        Self {
            catalog,
            index,
            counts: FacetCountEstimator::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn generation(&self) -> u64 {
        self.catalog.generation()
    }

    pub fn filter(&self, state: &FilterState) -> FilteredActions<'_> {
        query::filter_actions(&self.catalog, &self.index, state)
    }

    pub fn has_filters(&self, state: &FilterState) -> bool {
        query::has_filters(&self.catalog, state)
    }

    pub fn count(&self, state: &FilterState) -> usize {
        query::count(&self.catalog, &self.index, state)
    }

    pub fn count_if_added(&self, dimension: Dimension, key: &str, state: &FilterState) -> usize {
        self.counts
            .count_if_added(&self.catalog, &self.index, dimension, key, state)
    }

    pub fn facet_options(&self, dimension: Dimension, state: &FilterState) -> Vec<FacetOption> {
        self.counts
            .options(&self.catalog, &self.index, dimension, state)
    }

    pub fn action_by_slug(&self, slug: &str) -> Result<&Action, CoreError> {
        self.catalog.action_by_slug(slug)
    }
}
