//! Fielded search index over catalog actions.
//!
//! The set of searchable fields is an explicit [`IndexConfig`], never inferred
//! from the shape of [`Action`]. Text matching is case-insensitive,
//! unanchored substring matching; identifier fields support exact equality.
//! The index is immutable and can be shared between threads.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::catalog::{Action, Catalog};
use crate::dimension::Dimension;
use crate::types::RecordId;

/// Shortest query fragment that can produce a match.
pub const MIN_MATCH_CHARS: usize = 2;

/// Longest field value the index accepts, in characters.
pub const MAX_FIELD_CHARS: usize = 20_000;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A searchable attribute of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexedField {
    Name,
    Summary,
    Location,
    GeocodedLocation,
    TypeName,
    StatusName,
    CategoryName,
    CountryName,
    CompanyName,
    GroupName,
    Year,
    TypeId,
    StatusId,
    CategoryId,
    CompanyId,
    CountryId,
    GroupId,
}

impl IndexedField {
    /// Fields searched by the free-text query.
    pub const TEXT: [IndexedField; 10] = [
        IndexedField::Name,
        IndexedField::Summary,
        IndexedField::Location,
        IndexedField::GeocodedLocation,
        IndexedField::TypeName,
        IndexedField::StatusName,
        IndexedField::CategoryName,
        IndexedField::CountryName,
        IndexedField::CompanyName,
        IndexedField::GroupName,
    ];

    /// Fields compared by facet clauses.
    pub const IDENTIFIERS: [IndexedField; 7] = [
        IndexedField::Year,
        IndexedField::TypeId,
        IndexedField::StatusId,
        IndexedField::CategoryId,
        IndexedField::CompanyId,
        IndexedField::CountryId,
        IndexedField::GroupId,
    ];

    pub fn is_text(self) -> bool {
        Self::TEXT.contains(&self)
    }

    /// The identifier field a facet clause on `dimension` compares against.
    pub fn for_dimension(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Year => IndexedField::Year,
            Dimension::Type => IndexedField::TypeId,
            Dimension::Status => IndexedField::StatusId,
            Dimension::Category => IndexedField::CategoryId,
            Dimension::Company => IndexedField::CompanyId,
            Dimension::Country => IndexedField::CountryId,
            Dimension::Group => IndexedField::GroupId,
        }
    }
}

/// Which fields to index and how to match them.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub fields: Vec<IndexedField>,
    pub min_match_chars: usize,
    pub max_field_chars: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            fields: IndexedField::TEXT
                .into_iter()
                .chain(IndexedField::IDENTIFIERS)
                .collect(),
            min_match_chars: MIN_MATCH_CHARS,
            max_field_chars: MAX_FIELD_CHARS,
        }
    }
}

// ---------------------------------------------------------------------------
// Match metadata
// ---------------------------------------------------------------------------

/// Byte range `start..end` within one value of one field that matched the
/// free-text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchRange {
    pub field: IndexedField,
    /// Position of the value within a multi-valued field (e.g. the second
    /// company name).
    pub value_index: usize,
    pub start: usize,
    pub end: usize,
}

/// A field value that was left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    pub action_id: RecordId,
    pub field: IndexedField,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
enum FieldError {
    #[error("contains control character U+{0:04X}")]
    ControlCharacter(u32),

    #[error("exceeds {max} characters")]
    TooLong { max: usize },
}

fn check_value(value: &str, max_chars: usize) -> Result<(), FieldError> {
    if let Some(c) = value.chars().find(|c| c.is_control() && !c.is_whitespace()) {
        return Err(FieldError::ControlCharacter(c as u32));
    }
    if value.chars().count() > max_chars {
        return Err(FieldError::TooLong { max: max_chars });
    }
    Ok(())
}

/// Case-insensitive literal phrase matcher.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    regex: Regex,
}

impl PhraseMatcher {
    /// Compile `phrase` for matching. Returns `None` for phrases shorter than
    /// `min_chars` characters, which match nothing.
    pub fn new(phrase: &str, min_chars: usize) -> Option<Self> {
        if phrase.chars().count() < min_chars {
            return None;
        }
        match RegexBuilder::new(&regex::escape(phrase))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(e) => {
                tracing::warn!(error = %e, "Search phrase could not be compiled");
                None
            }
        }
    }

    /// Every non-overlapping occurrence in `haystack`, as byte ranges.
    pub fn ranges(&self, haystack: &str) -> Vec<(usize, usize)> {
        self.regex
            .find_iter(haystack)
            .map(|m| (m.start(), m.end()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct IndexedDocument {
    fields: HashMap<IndexedField, Vec<String>>,
}

/// Immutable index over one catalog generation. Documents are addressed by
/// the action's position in [`Catalog::actions`].
#[derive(Debug)]
pub struct SearchIndex {
    generation: u64,
    config: IndexConfig,
    documents: Vec<IndexedDocument>,
    skipped: Vec<SkippedField>,
}

impl SearchIndex {
    /// Index every action of `catalog` at the fields named by `config`.
    ///
    /// A value that fails validation is excluded for that action and field
    /// only; the rest of the catalog is still indexed.
    pub fn build(catalog: &Catalog, config: IndexConfig) -> Self {
        let mut documents = Vec::with_capacity(catalog.len());
        let mut skipped = Vec::new();

        for action in catalog.actions() {
            let mut document = IndexedDocument::default();
            for &field in &config.fields {
                let mut kept = Vec::new();
                for value in extract(catalog, action, field) {
                    match check_value(&value, config.max_field_chars) {
                        Ok(()) => kept.push(value),
                        Err(e) => {
                            tracing::warn!(
                                action_id = %action.id,
                                ?field,
                                error = %e,
                                "Field value excluded from search index"
                            );
                            skipped.push(SkippedField {
                                action_id: action.id.clone(),
                                field,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                if !kept.is_empty() {
                    document.fields.insert(field, kept);
                }
            }
            documents.push(document);
        }

        tracing::info!(
            generation = catalog.generation(),
            documents = documents.len(),
            skipped = skipped.len(),
            "Search index built"
        );

        Self {
            generation: catalog.generation(),
            config,
            documents,
            skipped,
        }
    }

    /// Generation of the catalog this index was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn skipped_fields(&self) -> &[SkippedField] {
        &self.skipped
    }

    /// Indexed values of `field` for the document at `position`.
    pub fn values(&self, position: usize, field: IndexedField) -> &[String] {
        self.documents
            .get(position)
            .and_then(|d| d.fields.get(&field))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn field_equals(&self, position: usize, field: IndexedField, value: &str) -> bool {
        self.values(position, field).iter().any(|v| v == value)
    }

    /// All occurrences of `matcher` in `field` of the document at `position`.
    pub fn phrase_ranges(
        &self,
        position: usize,
        field: IndexedField,
        matcher: &PhraseMatcher,
    ) -> Vec<MatchRange> {
        let mut ranges = Vec::new();
        for (value_index, value) in self.values(position, field).iter().enumerate() {
            for (start, end) in matcher.ranges(value) {
                if end - start < self.config.min_match_chars {
                    continue;
                }
                ranges.push(MatchRange {
                    field,
                    value_index,
                    start,
                    end,
                });
            }
        }
        ranges
    }
}

fn extract(catalog: &Catalog, action: &Action, field: IndexedField) -> Vec<String> {
    let names = |dimension: Dimension| -> Vec<String> {
        catalog
            .resolve_ids(dimension, action.foreign_keys(dimension))
            .map(|value| value.name.clone())
            .collect()
    };

    match field {
        IndexedField::Name => vec![action.name.clone()],
        IndexedField::Summary if action.summary.is_empty() => Vec::new(),
        IndexedField::Summary => vec![action.summary.clone()],
        IndexedField::Location => action.location.iter().cloned().collect(),
        IndexedField::GeocodedLocation => action.geocoded_location.iter().cloned().collect(),
        IndexedField::TypeName => names(Dimension::Type),
        IndexedField::StatusName => names(Dimension::Status),
        IndexedField::CategoryName => names(Dimension::Category),
        IndexedField::CountryName => names(Dimension::Country),
        IndexedField::CompanyName => names(Dimension::Company),
        IndexedField::GroupName => names(Dimension::Group),
        IndexedField::Year => action.year().map(|y| y.to_string()).into_iter().collect(),
        IndexedField::TypeId => action.type_ids.clone(),
        IndexedField::StatusId => action.status_ids.clone(),
        IndexedField::CategoryId => action.category_ids.clone(),
        IndexedField::CompanyId => action.company_ids.clone(),
        IndexedField::CountryId => action.country_ids.clone(),
        IndexedField::GroupId => action.group_ids.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FacetRecords, FacetValue};

    fn catalog() -> Catalog {
        Catalog::build(
            vec![
                Action::new("a1", "one", "2020-02-01", "Dock workers refuse cargo")
                    .with_summary("Solidarity with striking Amazon workers")
                    .with_foreign_keys(Dimension::Company, &["recAMZ", "recGone"]),
                Action::new("a2", "two", "2021-02-01", "Bad\u{0007}name")
                    .with_location("Hamburg"),
            ],
            FacetRecords::default().with(
                Dimension::Company,
                vec![FacetValue::new("recAMZ", "Amazon")],
            ),
        )
    }

    #[test]
    fn resolves_names_and_keeps_raw_ids() {
        let index = SearchIndex::build(&catalog(), IndexConfig::default());
        assert_eq!(index.values(0, IndexedField::CompanyName), ["Amazon"]);
        assert_eq!(index.values(0, IndexedField::CompanyId), ["recAMZ", "recGone"]);
        assert_eq!(index.values(0, IndexedField::Year), ["2020"]);
        assert!(index.field_equals(0, IndexedField::CompanyId, "recAMZ"));
        assert!(!index.field_equals(0, IndexedField::CompanyId, "recAM"));
    }

    #[test]
    fn bad_value_is_skipped_without_aborting() {
        let index = SearchIndex::build(&catalog(), IndexConfig::default());
        assert_eq!(index.len(), 2);
        assert!(index.values(1, IndexedField::Name).is_empty());
        assert_eq!(index.values(1, IndexedField::Location), ["Hamburg"]);

        let skipped = index.skipped_fields();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].action_id, "a2");
        assert_eq!(skipped[0].field, IndexedField::Name);
    }

    #[test]
    fn fields_outside_config_are_not_indexed() {
        let config = IndexConfig {
            fields: vec![IndexedField::Name],
            ..IndexConfig::default()
        };
        let index = SearchIndex::build(&catalog(), config);
        assert!(index.values(0, IndexedField::Summary).is_empty());
        assert_eq!(index.values(0, IndexedField::Name).len(), 1);
    }

    #[test]
    fn phrase_matching_is_case_insensitive_and_unanchored() {
        let index = SearchIndex::build(&catalog(), IndexConfig::default());
        let matcher = PhraseMatcher::new("amazon WORKERS", MIN_MATCH_CHARS).unwrap();
        let ranges = index.phrase_ranges(0, IndexedField::Summary, &matcher);
        assert_eq!(
            ranges,
            vec![MatchRange {
                field: IndexedField::Summary,
                value_index: 0,
                start: 25,
                end: 39,
            }]
        );
    }

    #[test]
    fn phrase_metacharacters_are_literal() {
        let matcher = PhraseMatcher::new("a.b", MIN_MATCH_CHARS).unwrap();
        assert!(matcher.ranges("axb").is_empty());
        assert_eq!(matcher.ranges("see a.b"), vec![(4, 7)]);
    }

    #[test]
    fn short_phrase_matches_nothing() {
        assert!(PhraseMatcher::new("a", MIN_MATCH_CHARS).is_none());
        assert!(PhraseMatcher::new("ab", MIN_MATCH_CHARS).is_some());
    }
}
