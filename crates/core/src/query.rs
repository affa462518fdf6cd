//! Compile a [`FilterState`] into a boolean query and run it on the index.
//!
//! The compiled shape is always `AND(OR(facet clauses)..., OR(phrase
//! clauses))`: selections within a dimension are alternatives, dimensions
//! and the free-text query must all hold. When nothing compiles the caller
//! gets the catalog order back untouched, without match metadata.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::{Action, Catalog};
use crate::dimension::Dimension;
use crate::filter_state::FilterState;
use crate::index::{IndexedField, MatchRange, PhraseMatcher, SearchIndex};

/// Boolean query over indexed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BooleanQuery {
    And(Vec<BooleanQuery>),
    Or(Vec<BooleanQuery>),
    /// Some value of an identifier field equals `value` exactly.
    FieldEquals { field: IndexedField, value: String },
    /// `phrase` occurs contiguously, case-insensitively, in some value of a
    /// text field.
    PhraseContains { field: IndexedField, phrase: String },
}

/// One document matched by [`execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Position of the action in [`Catalog::actions`].
    pub position: usize,
    /// Free-text occurrences, for highlighting. Empty when no phrase clause
    /// was part of the query.
    pub matches: Vec<MatchRange>,
}

impl MatchResult {
    /// Ranges to highlight in one field.
    pub fn ranges_for(&self, field: IndexedField) -> impl Iterator<Item = &MatchRange> + '_ {
        self.matches.iter().filter(move |r| r.field == field)
    }
}

/// Build the query for `state`, resolving URL keys against `catalog`.
///
/// Keys that resolve to no facet value are dropped. Returns `None` when no
/// clause survives, in which case no filtering applies.
pub fn compile(catalog: &Catalog, state: &FilterState) -> Option<BooleanQuery> {
    let mut conjunction = Vec::new();

    for dimension in Dimension::ALL {
        let field = IndexedField::for_dimension(dimension);
        let clauses: Vec<BooleanQuery> = state
            .selected(dimension)
            .iter()
            .filter_map(|key| catalog.resolve_key(dimension, key))
            .map(|value| BooleanQuery::FieldEquals {
                field,
                value: value.id.clone(),
            })
            .collect();
        if !clauses.is_empty() {
            conjunction.push(BooleanQuery::Or(clauses));
        }
    }

    if let Some(phrase) = state.search_phrase() {
        conjunction.push(BooleanQuery::Or(
            IndexedField::TEXT
                .into_iter()
                .map(|field| BooleanQuery::PhraseContains {
                    field,
                    phrase: phrase.to_string(),
                })
                .collect(),
        ));
    }

    (!conjunction.is_empty()).then_some(BooleanQuery::And(conjunction))
}

/// Whether `state` narrows `catalog` at all. Selections that resolve to no
/// facet value do not count.
pub fn has_filters(catalog: &Catalog, state: &FilterState) -> bool {
    compile(catalog, state).is_some()
}

/// Run `query` against every document, preserving index order.
pub fn execute(index: &SearchIndex, query: &BooleanQuery) -> Vec<MatchResult> {
    let mut matchers = HashMap::new();
    collect_phrases(query, index.config().min_match_chars, &mut matchers);

    (0..index.len())
        .filter_map(|position| {
            let mut matches = Vec::new();
            evaluate(index, position, query, &matchers, &mut matches).then_some(MatchResult {
                position,
                matches,
            })
        })
        .collect()
}

fn collect_phrases(
    query: &BooleanQuery,
    min_chars: usize,
    matchers: &mut HashMap<String, Option<PhraseMatcher>>,
) {
    match query {
        BooleanQuery::And(clauses) | BooleanQuery::Or(clauses) => {
            for clause in clauses {
                collect_phrases(clause, min_chars, matchers);
            }
        }
        BooleanQuery::PhraseContains { phrase, .. } => {
            if !matchers.contains_key(phrase) {
                matchers.insert(phrase.clone(), PhraseMatcher::new(phrase, min_chars));
            }
        }
        BooleanQuery::FieldEquals { .. } => {}
    }
}

fn evaluate(
    index: &SearchIndex,
    position: usize,
    query: &BooleanQuery,
    matchers: &HashMap<String, Option<PhraseMatcher>>,
    matches: &mut Vec<MatchRange>,
) -> bool {
    match query {
        BooleanQuery::And(clauses) => clauses
            .iter()
            .all(|clause| evaluate(index, position, clause, matchers, matches)),
        // Every alternative is visited so all highlight ranges are collected.
        BooleanQuery::Or(clauses) => clauses.iter().fold(false, |hit, clause| {
            evaluate(index, position, clause, matchers, matches) || hit
        }),
        BooleanQuery::FieldEquals { field, value } => index.field_equals(position, *field, value),
        BooleanQuery::PhraseContains { field, phrase } => {
            let Some(Some(matcher)) = matchers.get(phrase) else {
                return false;
            };
            let found = index.phrase_ranges(position, *field, matcher);
            let hit = !found.is_empty();
            matches.extend(found);
            hit
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// One action of a filtered result, with highlight ranges when a free-text
/// query is active.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredAction<'a> {
    #[serde(flatten)]
    pub action: &'a Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<MatchRange>>,
}

/// Result of applying a [`FilterState`] to a catalog.
#[derive(Debug, Clone)]
pub struct FilteredActions<'a> {
    has_filters: bool,
    entries: Vec<FilteredAction<'a>>,
}

impl<'a> FilteredActions<'a> {
    /// False when the query compiled to nothing and the catalog order was
    /// returned unchanged.
    pub fn has_filters(&self) -> bool {
        self.has_filters
    }

    pub fn entries(&self) -> &[FilteredAction<'a>] {
        &self.entries
    }

    pub fn actions(&self) -> Vec<&'a Action> {
        self.entries.iter().map(|e| e.action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Apply `state` to `catalog` through `index`.
///
/// With no compiled query this returns every action in catalog order and no
/// match metadata, without touching the index.
pub fn filter_actions<'a>(
    catalog: &'a Catalog,
    index: &SearchIndex,
    state: &FilterState,
) -> FilteredActions<'a> {
    debug_assert_eq!(catalog.generation(), index.generation());

    let Some(query) = compile(catalog, state) else {
        return FilteredActions {
            has_filters: false,
            entries: catalog
                .actions()
                .iter()
                .map(|action| FilteredAction {
                    action,
                    matches: None,
                })
                .collect(),
        };
    };

    let text_active = state.search_phrase().is_some();
    let entries = execute(index, &query)
        .into_iter()
        .filter_map(|result| {
            let action = catalog.actions().get(result.position)?;
            Some(FilteredAction {
                action,
                matches: text_active.then_some(result.matches),
            })
        })
        .collect();

    FilteredActions {
        has_filters: true,
        entries,
    }
}

/// Number of actions `state` would select.
pub fn count(catalog: &Catalog, index: &SearchIndex, state: &FilterState) -> usize {
    match compile(catalog, state) {
        Some(query) => execute(index, &query).len(),
        None => catalog.len(),
    }
}
