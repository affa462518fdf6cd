//! Filter state value object and its reducer.
//!
//! A [`FilterState`] is the free-text query plus one ordered, duplicate-free
//! selection per [`Dimension`]. Selections hold URL keys (year, country slug,
//! or display name); they are resolved against the catalog only when a query
//! is compiled.

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// Current search text and facet selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub years: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A user-driven state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Toggle { dimension: Dimension, key: String },
    SetSearchText(String),
    ClearAll,
}

impl FilterState {
    /// Apply `action` and return the next state.
    pub fn reduce(mut self, action: FilterAction) -> Self {
        match action {
            FilterAction::Toggle { dimension, key } => self.toggle(dimension, key),
            FilterAction::SetSearchText(text) => self.set_search_text(&text),
            FilterAction::ClearAll => self.clear_all(),
        }
        self
    }

    pub fn selected(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Year => &self.years,
            Dimension::Type => &self.types,
            Dimension::Status => &self.statuses,
            Dimension::Category => &self.categories,
            Dimension::Company => &self.companies,
            Dimension::Country => &self.countries,
            Dimension::Group => &self.groups,
        }
    }

    fn selected_mut(&mut self, dimension: Dimension) -> &mut Vec<String> {
        match dimension {
            Dimension::Year => &mut self.years,
            Dimension::Type => &mut self.types,
            Dimension::Status => &mut self.statuses,
            Dimension::Category => &mut self.categories,
            Dimension::Company => &mut self.companies,
            Dimension::Country => &mut self.countries,
            Dimension::Group => &mut self.groups,
        }
    }

    pub fn is_selected(&self, dimension: Dimension, key: &str) -> bool {
        self.selected(dimension).iter().any(|k| k == key)
    }

    /// Remove `key` from the dimension if present, otherwise append it.
    /// Empty keys are ignored.
    pub fn toggle(&mut self, dimension: Dimension, key: impl Into<String>) {
        let key = key.into();
        if key.is_empty() {
            return;
        }
        let selected = self.selected_mut(dimension);
        match selected.iter().position(|k| *k == key) {
            Some(position) => {
                selected.remove(position);
            }
            None => selected.push(key),
        }
    }

    pub fn toggle_year(&mut self, year: impl Into<String>) {
        self.toggle(Dimension::Year, year);
    }

    pub fn toggle_type(&mut self, name: impl Into<String>) {
        self.toggle(Dimension::Type, name);
    }

    pub fn toggle_status(&mut self, name: impl Into<String>) {
        self.toggle(Dimension::Status, name);
    }

    pub fn toggle_category(&mut self, name: impl Into<String>) {
        self.toggle(Dimension::Category, name);
    }

    pub fn toggle_company(&mut self, name: impl Into<String>) {
        self.toggle(Dimension::Company, name);
    }

    pub fn toggle_country(&mut self, slug: impl Into<String>) {
        self.toggle(Dimension::Country, slug);
    }

    pub fn toggle_group(&mut self, name: impl Into<String>) {
        self.toggle(Dimension::Group, name);
    }

    /// Replace the free-text query. Leading whitespace is dropped; facet
    /// selections are untouched.
    pub fn set_search_text(&mut self, text: &str) {
        self.search = text.trim_start().to_string();
    }

    /// Reset every dimension and the search text.
    pub fn clear_all(&mut self) {
        *self = FilterState::default();
    }

    /// The search text as it participates in queries.
    pub fn search_phrase(&self) -> Option<&str> {
        let phrase = self.search.trim();
        (!phrase.is_empty()).then_some(phrase)
    }

    /// Whether anything is selected or searched. Whitespace-only search text
    /// counts as no search. Selections are not resolved against a catalog;
    /// see [`crate::query::has_filters`] for the effective check.
    pub fn has_filters(&self) -> bool {
        self.search_phrase().is_some()
            || Dimension::ALL
                .into_iter()
                .any(|d| !self.selected(d).is_empty())
    }

    /// The state that would result from adding `key` to `dimension`, without
    /// touching `self`. Already-selected keys are not duplicated.
    pub fn with_added(&self, dimension: Dimension, key: &str) -> FilterState {
        let mut next = self.clone();
        if !key.is_empty() && !next.is_selected(dimension, key) {
            next.selected_mut(dimension).push(key.to_string());
        }
        next
    }

    /// Order-insensitive serialization used as a memoization key.
    pub fn canonical_key(&self) -> String {
        let mut key = String::new();
        key.push_str(self.search_phrase().unwrap_or_default());
        for dimension in Dimension::ALL {
            let mut selected: Vec<&str> = self.selected(dimension).iter().map(String::as_str).collect();
            selected.sort_unstable();
            key.push('\u{1f}');
            key.push_str(dimension.url_key());
            for item in selected {
                key.push('\u{1e}');
                key.push_str(item);
            }
        }
        key
    }
}
