//! Immutable in-memory record catalog.
//!
//! A [`Catalog`] holds every live [`Action`] plus the facet values of each
//! [`Dimension`]. It is built once per record-store load and never mutated;
//! a reload produces a new catalog with a new generation number, which is what
//! scopes the search index and the facet count cache.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::error::CoreError;
use crate::types::{RecordId, Year};

/// Lowercase alphanumeric words separated by single hyphens.
const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A file attached to an action (already mirrored to the CDN upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// One documented solidarity action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    // Missing required fields deserialize empty so one incomplete record is
    // dropped by `validate` (or left undated) instead of failing the load.
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub slug: String,
    /// Raw upstream date (`YYYY-MM-DD`, optionally followed by a time).
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub name: String,
    /// Plaintext summary, used for search.
    #[serde(default)]
    pub summary: String,
    /// Rendered rich-text summary, used for display only.
    #[serde(default)]
    pub summary_html: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Display name returned by the geocoder for `location`.
    #[serde(default)]
    pub geocoded_location: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub type_ids: Vec<RecordId>,
    #[serde(default)]
    pub status_ids: Vec<RecordId>,
    #[serde(default)]
    pub category_ids: Vec<RecordId>,
    #[serde(default)]
    pub company_ids: Vec<RecordId>,
    #[serde(default)]
    pub country_ids: Vec<RecordId>,
    #[serde(default)]
    pub group_ids: Vec<RecordId>,
}

impl Action {
    /// Create an action with only the required fields set.
    pub fn new(
        id: impl Into<RecordId>,
        slug: impl Into<String>,
        date: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            date: date.into(),
            name: name.into(),
            summary: String::new(),
            summary_html: None,
            location: None,
            geocoded_location: None,
            coordinate: None,
            link: None,
            attachments: Vec::new(),
            type_ids: Vec::new(),
            status_ids: Vec::new(),
            category_ids: Vec::new(),
            company_ids: Vec::new(),
            country_ids: Vec::new(),
            group_ids: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_coordinate(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinate = Some(Coordinate {
            latitude,
            longitude,
        });
        self
    }

    /// Set the foreign keys for `dimension`. Ignored for [`Dimension::Year`],
    /// which is derived from the date.
    pub fn with_foreign_keys(mut self, dimension: Dimension, ids: &[&str]) -> Self {
        let ids: Vec<RecordId> = ids.iter().map(|id| id.to_string()).collect();
        match dimension {
            Dimension::Year => {}
            Dimension::Type => self.type_ids = ids,
            Dimension::Status => self.status_ids = ids,
            Dimension::Category => self.category_ids = ids,
            Dimension::Company => self.company_ids = ids,
            Dimension::Country => self.country_ids = ids,
            Dimension::Group => self.group_ids = ids,
        }
        self
    }

    /// The calendar date of the action, if the raw date is well formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let day = self.date.trim().split(['T', ' ']).next()?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn year(&self) -> Option<Year> {
        self.parsed_date().map(|d| d.year())
    }

    /// Foreign keys into `dimension`. Always empty for [`Dimension::Year`].
    pub fn foreign_keys(&self, dimension: Dimension) -> &[RecordId] {
        match dimension {
            Dimension::Year => &[],
            Dimension::Type => &self.type_ids,
            Dimension::Status => &self.status_ids,
            Dimension::Category => &self.category_ids,
            Dimension::Company => &self.company_ids,
            Dimension::Country => &self.country_ids,
            Dimension::Group => &self.group_ids,
        }
    }

    /// Check the invariants an action must satisfy to enter a catalog.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation("action id must not be empty".into()));
        }
        if !SLUG_RE.is_match(&self.slug) {
            return Err(CoreError::Validation(format!(
                "action {} has slug '{}' which is not lowercase-hyphenated",
                self.id, self.slug
            )));
        }
        Ok(())
    }
}

/// A named value of one facet dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetValue {
    pub id: RecordId,
    pub name: String,
    /// URL slug; only countries carry one.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub summary_html: Option<String>,
    /// ISO 3166 code; only countries carry one.
    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub centroid: Option<Coordinate>,
    /// Actions referencing this value. Recomputed from the catalog's own
    /// action list at build time.
    #[serde(default)]
    pub action_ids: Vec<RecordId>,
}

impl FacetValue {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            summary_html: None,
            iso_code: None,
            centroid: None,
            action_ids: Vec::new(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_iso_code(mut self, code: impl Into<String>) -> Self {
        self.iso_code = Some(code.into());
        self
    }

    pub fn with_centroid(mut self, latitude: f64, longitude: f64) -> Self {
        self.centroid = Some(Coordinate {
            latitude,
            longitude,
        });
        self
    }

    /// The string identifying this value in the query string: the slug for
    /// countries, the display name everywhere else.
    pub fn url_key(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Country => self.slug.as_deref().unwrap_or(&self.name),
            _ => &self.name,
        }
    }

    /// Number of actions carrying this value with no filters applied.
    pub fn baseline_count(&self) -> usize {
        self.action_ids.len()
    }
}

/// Facet values as delivered by the record store, one list per sourced
/// dimension. Years are not sourced; they are derived from action dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetRecords {
    #[serde(default)]
    pub types: Vec<FacetValue>,
    #[serde(default)]
    pub statuses: Vec<FacetValue>,
    #[serde(default)]
    pub categories: Vec<FacetValue>,
    #[serde(default)]
    pub companies: Vec<FacetValue>,
    #[serde(default)]
    pub countries: Vec<FacetValue>,
    #[serde(default)]
    pub groups: Vec<FacetValue>,
}

impl FacetRecords {
    /// Replace the values of `dimension`. Ignored for [`Dimension::Year`].
    pub fn with(mut self, dimension: Dimension, values: Vec<FacetValue>) -> Self {
        if let Some(slot) = self.slot_mut(dimension) {
            *slot = values;
        }
        self
    }

    fn slot_mut(&mut self, dimension: Dimension) -> Option<&mut Vec<FacetValue>> {
        match dimension {
            Dimension::Year => None,
            Dimension::Type => Some(&mut self.types),
            Dimension::Status => Some(&mut self.statuses),
            Dimension::Category => Some(&mut self.categories),
            Dimension::Company => Some(&mut self.companies),
            Dimension::Country => Some(&mut self.countries),
            Dimension::Group => Some(&mut self.groups),
        }
    }

    fn take(&mut self, dimension: Dimension) -> Vec<FacetValue> {
        self.slot_mut(dimension).map(std::mem::take).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct FacetTable {
    values: Vec<FacetValue>,
    by_id: HashMap<RecordId, usize>,
    by_key: HashMap<String, usize>,
}

impl FacetTable {
    fn new(dimension: Dimension, values: Vec<FacetValue>) -> Self {
        let mut table = FacetTable::default();
        for value in values {
            if table.by_id.contains_key(&value.id) {
                tracing::warn!(
                    dimension = dimension.url_key(),
                    id = %value.id,
                    "Duplicate facet value id, keeping the first"
                );
                continue;
            }
            let position = table.values.len();
            table.by_id.insert(value.id.clone(), position);
            table
                .by_key
                .entry(value.url_key(dimension).to_string())
                .or_insert(position);
            table.values.push(value);
        }
        table
    }
}

/// Read-only collection of actions and facet values.
#[derive(Debug)]
pub struct Catalog {
    generation: u64,
    actions: Vec<Action>,
    position_by_slug: HashMap<String, usize>,
    facets: HashMap<Dimension, FacetTable>,
}

impl Catalog {
    /// Build a catalog from upstream records.
    ///
    /// Actions failing [`Action::validate`], or repeating an id or slug seen
    /// earlier, are dropped with a warning. Actions whose date cannot be
    /// parsed are kept but contribute to no year. Back references of every
    /// facet value are recomputed from the kept actions, so dangling foreign
    /// keys never inflate a count.
    pub fn build(actions: Vec<Action>, mut facets: FacetRecords) -> Self {
        let mut seen_ids = HashSet::new();
        let mut seen_slugs = HashSet::new();
        let mut kept = Vec::with_capacity(actions.len());
        let mut dropped = 0usize;

        for action in actions {
            if let Err(e) = action.validate() {
                tracing::warn!(action_id = %action.id, error = %e, "Dropping invalid action");
                dropped += 1;
                continue;
            }
            if !seen_ids.insert(action.id.clone()) {
                tracing::warn!(action_id = %action.id, "Dropping action with duplicate id");
                dropped += 1;
                continue;
            }
            if !seen_slugs.insert(action.slug.clone()) {
                tracing::warn!(
                    action_id = %action.id,
                    slug = %action.slug,
                    "Dropping action with duplicate slug"
                );
                dropped += 1;
                continue;
            }
            if action.parsed_date().is_none() {
                tracing::warn!(
                    action_id = %action.id,
                    date = %action.date,
                    "Action date is not a calendar date; excluded from year facets"
                );
            }
            kept.push(action);
        }

        let mut tables = HashMap::new();
        tables.insert(
            Dimension::Year,
            FacetTable::new(Dimension::Year, synthesize_years(&kept)),
        );
        for dimension in Dimension::ALL {
            if dimension == Dimension::Year {
                continue;
            }
            let mut values = facets.take(dimension);
            attach_back_references(dimension, &mut values, &kept);
            tables.insert(dimension, FacetTable::new(dimension, values));
        }

        let position_by_slug = kept
            .iter()
            .enumerate()
            .map(|(position, action)| (action.slug.clone(), position))
            .collect();

        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        tracing::info!(generation, actions = kept.len(), dropped, "Catalog built");

        Self {
            generation,
            actions: kept,
            position_by_slug,
            facets: tables,
        }
    }

    /// Identity of this action collection. Unique per process.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All actions in upstream order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn action_by_slug(&self, slug: &str) -> Result<&Action, CoreError> {
        self.position_by_slug
            .get(slug)
            .map(|&position| &self.actions[position])
            .ok_or_else(|| CoreError::NotFound {
                entity: "Action",
                key: slug.to_string(),
            })
    }

    /// Facet values of `dimension` in display order.
    pub fn facet_values(&self, dimension: Dimension) -> &[FacetValue] {
        self.facets
            .get(&dimension)
            .map(|t| t.values.as_slice())
            .unwrap_or_default()
    }

    /// Look up a facet value by record id.
    pub fn facet(&self, dimension: Dimension, id: &str) -> Option<&FacetValue> {
        let table = self.facets.get(&dimension)?;
        table.by_id.get(id).map(|&position| &table.values[position])
    }

    /// Look up a facet value by its URL key (see [`FacetValue::url_key`]).
    pub fn resolve_key(&self, dimension: Dimension, key: &str) -> Option<&FacetValue> {
        let table = self.facets.get(&dimension)?;
        table.by_key.get(key).map(|&position| &table.values[position])
    }

    /// Baseline count for a URL key; zero if it resolves to nothing.
    pub fn baseline_count(&self, dimension: Dimension, key: &str) -> usize {
        self.resolve_key(dimension, key)
            .map(FacetValue::baseline_count)
            .unwrap_or(0)
    }

    /// Resolve foreign keys to facet values, silently dropping dangling ids.
    pub fn resolve_ids<'a>(
        &'a self,
        dimension: Dimension,
        ids: &'a [RecordId],
    ) -> impl Iterator<Item = &'a FacetValue> + 'a {
        ids.iter().filter_map(move |id| self.facet(dimension, id))
    }
}

fn synthesize_years(actions: &[Action]) -> Vec<FacetValue> {
    let mut years: BTreeMap<Year, Vec<RecordId>> = BTreeMap::new();
    for action in actions {
        if let Some(year) = action.year() {
            years.entry(year).or_default().push(action.id.clone());
        }
    }

    years
        .into_iter()
        .rev()
        .map(|(year, action_ids)| FacetValue {
            action_ids,
            ..FacetValue::new(year.to_string(), year.to_string())
        })
        .collect()
}

fn attach_back_references(dimension: Dimension, values: &mut [FacetValue], actions: &[Action]) {
    let mut refs: HashMap<&str, Vec<RecordId>> = HashMap::new();
    for action in actions {
        for id in action.foreign_keys(dimension) {
            let ids = refs.entry(id.as_str()).or_default();
            // Actions are visited one at a time, so a repeated key within one
            // action can only collide with the last entry.
            if ids.last() != Some(&action.id) {
                ids.push(action.id.clone());
            }
        }
    }
    for value in values.iter_mut() {
        value.action_ids = refs.remove(value.id.as_str()).unwrap_or_default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn countries() -> Vec<FacetValue> {
        vec![
            FacetValue::new("recFR", "France").with_slug("fr"),
            FacetValue::new("recDE", "Germany").with_slug("de"),
        ]
    }

    // -- Validation --

    #[test]
    fn slug_must_be_lowercase_hyphenated() {
        assert!(Action::new("a1", "strike-at-plant", "2020-01-01", "x").validate().is_ok());
        assert!(Action::new("a1", "Strike", "2020-01-01", "x").validate().is_err());
        assert!(Action::new("a1", "strike--plant", "2020-01-01", "x").validate().is_err());
        assert!(Action::new("a1", "", "2020-01-01", "x").validate().is_err());
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_matches!(
            Action::new(" ", "ok", "2020-01-01", "x").validate(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn build_drops_invalid_and_duplicate_actions() {
        let catalog = Catalog::build(
            vec![
                Action::new("a1", "one", "2020-01-01", "One"),
                Action::new("a2", "Bad Slug", "2020-01-01", "Two"),
                Action::new("a3", "one", "2020-01-01", "Three"),
                Action::new("a1", "four", "2020-01-01", "Four"),
                Action::new("a5", "five", "2020-01-01", "Five"),
            ],
            FacetRecords::default(),
        );
        let ids: Vec<&str> = catalog.actions().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a5"]);
    }

    // -- Dates and years --

    #[test]
    fn parses_date_with_time_suffix() {
        let action = Action::new("a1", "one", "2021-03-04T10:00:00.000Z", "x");
        assert_eq!(action.year(), Some(2021));
    }

    #[test]
    fn malformed_date_has_no_year() {
        assert_eq!(Action::new("a1", "one", "sometime", "x").year(), None);
        assert_eq!(Action::new("a1", "one", "", "x").year(), None);
    }

    #[test]
    fn years_are_synthesized_newest_first() {
        let catalog = Catalog::build(
            vec![
                Action::new("a1", "one", "2019-05-01", "One"),
                Action::new("a2", "two", "2021-05-01", "Two"),
                Action::new("a3", "three", "2019-07-01", "Three"),
                Action::new("a4", "four", "not a date", "Four"),
            ],
            FacetRecords::default(),
        );
        let years: Vec<(&str, usize)> = catalog
            .facet_values(Dimension::Year)
            .iter()
            .map(|y| (y.name.as_str(), y.baseline_count()))
            .collect();
        assert_eq!(years, vec![("2021", 1), ("2019", 2)]);
        assert_eq!(catalog.len(), 4);
    }

    // -- Back references --

    #[test]
    fn baseline_counts_come_from_catalog_actions() {
        let stale = FacetValue {
            action_ids: vec!["gone".into(), "also-gone".into()],
            ..FacetValue::new("recFR", "France").with_slug("fr")
        };
        let catalog = Catalog::build(
            vec![
                Action::new("a1", "one", "2020-01-01", "One")
                    .with_foreign_keys(Dimension::Country, &["recFR", "recFR"]),
                Action::new("a2", "two", "2020-01-01", "Two")
                    .with_foreign_keys(Dimension::Country, &["recXX"]),
                Action::new("a3", "three", "2020-01-01", "Three")
                    .with_foreign_keys(Dimension::Country, &["recFR", "recXX", "recFR"]),
            ],
            FacetRecords::default().with(Dimension::Country, vec![stale]),
        );
        assert_eq!(
            catalog.facet(Dimension::Country, "recFR").unwrap().action_ids,
            vec!["a1", "a3"]
        );
        assert_eq!(catalog.baseline_count(Dimension::Country, "fr"), 2);
        assert_eq!(catalog.baseline_count(Dimension::Country, "xx"), 0);
    }

    // -- Lookups --

    #[test]
    fn countries_resolve_by_slug_and_others_by_name() {
        let catalog = Catalog::build(
            Vec::new(),
            FacetRecords::default()
                .with(Dimension::Country, countries())
                .with(Dimension::Type, vec![FacetValue::new("recT1", "Arrest")]),
        );
        assert_eq!(
            catalog.resolve_key(Dimension::Country, "de").map(|c| c.id.as_str()),
            Some("recDE")
        );
        assert!(catalog.resolve_key(Dimension::Country, "Germany").is_none());
        assert_eq!(
            catalog.resolve_key(Dimension::Type, "Arrest").map(|c| c.id.as_str()),
            Some("recT1")
        );
    }

    #[test]
    fn resolve_ids_drops_dangling_references() {
        let catalog = Catalog::build(
            Vec::new(),
            FacetRecords::default().with(Dimension::Country, countries()),
        );
        let ids = vec!["recDE".to_string(), "recZZ".to_string(), "recFR".to_string()];
        let names: Vec<&str> = catalog
            .resolve_ids(Dimension::Country, &ids)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Germany", "France"]);
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let catalog = Catalog::build(Vec::new(), FacetRecords::default());
        assert_matches!(
            catalog.action_by_slug("missing"),
            Err(CoreError::NotFound { entity: "Action", .. })
        );
    }

    #[test]
    fn every_build_gets_a_new_generation() {
        let a = Catalog::build(Vec::new(), FacetRecords::default());
        let b = Catalog::build(Vec::new(), FacetRecords::default());
        assert_ne!(a.generation(), b.generation());
    }
}
