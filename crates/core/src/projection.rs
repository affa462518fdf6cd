//! Views derived from a filtered action list: year groups for the list,
//! year bins for the chart, markers for the map, and the organising groups
//! involved in the current result.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::catalog::{Action, Catalog, Coordinate, FacetValue};
use crate::dimension::Dimension;
use crate::index::{IndexedField, MatchRange};
use crate::types::{RecordId, Year};

/// Actions shown per year before the list is expanded.
pub const YEAR_PREVIEW_LEN: usize = 3;

/// The chart never starts later than this year.
pub const CHART_START_YEAR: Year = 2000;

// ---------------------------------------------------------------------------
// Year groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct YearGroup<'a> {
    pub year: Year,
    pub actions: Vec<&'a Action>,
}

impl<'a> YearGroup<'a> {
    /// The first [`YEAR_PREVIEW_LEN`] actions of the year.
    pub fn preview(&self) -> &[&'a Action] {
        &self.actions[..self.actions.len().min(YEAR_PREVIEW_LEN)]
    }

    /// Actions hidden until the year is expanded.
    pub fn hidden_count(&self) -> usize {
        self.actions.len().saturating_sub(YEAR_PREVIEW_LEN)
    }
}

/// Partition `actions` by calendar year, newest year first. Relative order
/// inside a year is preserved. Actions without a usable date are left out.
pub fn group_by_year<'a>(actions: &[&'a Action]) -> Vec<YearGroup<'a>> {
    let mut groups: BTreeMap<Year, Vec<&'a Action>> = BTreeMap::new();
    for &action in actions {
        match action.year() {
            Some(year) => groups.entry(year).or_default().push(action),
            None => tracing::warn!(
                action_id = %action.id,
                date = %action.date,
                "Action without a calendar date left out of year grouping"
            ),
        }
    }

    groups
        .into_iter()
        .rev()
        .map(|(year, actions)| YearGroup { year, actions })
        .collect()
}

// ---------------------------------------------------------------------------
// Related organising groups
// ---------------------------------------------------------------------------

/// Organising groups referenced by `actions`, de-duplicated in first-seen
/// order. Ids absent from the catalog are dropped.
pub fn related_groups<'a>(catalog: &'a Catalog, actions: &[&Action]) -> Vec<&'a FacetValue> {
    let mut seen = HashSet::new();
    actions
        .iter()
        .flat_map(|action| action.group_ids.iter())
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| catalog.facet(Dimension::Group, id))
        .collect()
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearBin {
    pub year: Year,
    pub count: usize,
}

/// Action counts per calendar year, from [`CHART_START_YEAR`] (or the
/// earliest action, if older) through `current_year`, zero-filled.
/// Actions dated after `current_year` fall outside the chart.
pub fn year_histogram(actions: &[&Action], current_year: Year) -> Vec<YearBin> {
    let years: Vec<Year> = actions.iter().filter_map(|a| a.year()).collect();
    let first = years
        .iter()
        .copied()
        .min()
        .map_or(CHART_START_YEAR, |y| y.min(CHART_START_YEAR));
    let last = current_year.max(first);

    let mut bins: Vec<YearBin> = (first..=last).map(|year| YearBin { year, count: 0 }).collect();
    for year in years {
        if year <= last {
            bins[(year - first) as usize].count += 1;
        }
    }
    bins
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapMarker {
    /// A geocoded action.
    Action {
        action_id: RecordId,
        slug: String,
        coordinate: Coordinate,
    },
    /// Actions without their own coordinate, pinned to a country centroid.
    Country {
        country_id: RecordId,
        name: String,
        iso_code: Option<String>,
        coordinate: Coordinate,
        action_ids: Vec<RecordId>,
    },
}

/// Map markers for `actions`.
///
/// Geocoded actions get their own marker. The rest are split per country
/// and gathered into one marker per country centroid, in first-seen order;
/// countries without a centroid are not drawn.
pub fn map_markers(catalog: &Catalog, actions: &[&Action]) -> Vec<MapMarker> {
    let mut markers = Vec::new();
    let mut national: Vec<(&FacetValue, Coordinate, Vec<RecordId>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for action in actions {
        if let Some(coordinate) = action.coordinate {
            markers.push(MapMarker::Action {
                action_id: action.id.clone(),
                slug: action.slug.clone(),
                coordinate,
            });
            continue;
        }
        for country in catalog.resolve_ids(Dimension::Country, &action.country_ids) {
            let Some(centroid) = country.centroid else {
                continue;
            };
            let slot = *slots.entry(country.id.as_str()).or_insert_with(|| {
                national.push((country, centroid, Vec::new()));
                national.len() - 1
            });
            national[slot].2.push(action.id.clone());
        }
    }

    markers.extend(
        national
            .into_iter()
            .map(|(country, coordinate, action_ids)| MapMarker::Country {
                country_id: country.id.clone(),
                name: country.name.clone(),
                iso_code: country.iso_code.clone(),
                coordinate,
                action_ids,
            }),
    );
    markers
}

/// Number of actions per country ISO code. Countries without a code are
/// not counted.
pub fn country_counts(catalog: &Catalog, actions: &[&Action]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for action in actions {
        for country in catalog.resolve_ids(Dimension::Country, &action.country_ids) {
            if let Some(code) = &country.iso_code {
                *counts.entry(code.clone()).or_insert(0) += 1;
            }
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

/// A run of text that is either inside or outside a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightChunk<'t> {
    pub text: &'t str,
    pub highlighted: bool,
}

/// Split `text`, the `value_index`-th value of `field`, into plain and
/// highlighted runs. Overlapping or adjacent ranges are merged; ranges that
/// do not fit `text` are ignored.
pub fn highlight_chunks<'t>(
    text: &'t str,
    matches: &[MatchRange],
    field: IndexedField,
    value_index: usize,
) -> Vec<HighlightChunk<'t>> {
    let mut ranges: Vec<(usize, usize)> = matches
        .iter()
        .filter(|m| m.field == field && m.value_index == value_index)
        .filter(|m| {
            m.start < m.end && text.is_char_boundary(m.start) && text.is_char_boundary(m.end)
        })
        .map(|m| (m.start, m.end))
        .collect();
    ranges.sort_unstable();

    let mut chunks = Vec::new();
    let mut cursor = 0;
    let mut pending: Option<(usize, usize)> = None;
    for (start, end) in ranges {
        match pending {
            Some((s, e)) if start <= e => pending = Some((s, e.max(end))),
            _ => {
                if let Some((s, e)) = pending.take() {
                    push_chunks(text, &mut chunks, &mut cursor, s, e);
                }
                pending = Some((start, end));
            }
        }
    }
    if let Some((s, e)) = pending {
        push_chunks(text, &mut chunks, &mut cursor, s, e);
    }
    if cursor < text.len() {
        chunks.push(HighlightChunk {
            text: &text[cursor..],
            highlighted: false,
        });
    }
    chunks
}

fn push_chunks<'t>(
    text: &'t str,
    chunks: &mut Vec<HighlightChunk<'t>>,
    cursor: &mut usize,
    start: usize,
    end: usize,
) {
    if *cursor < start {
        chunks.push(HighlightChunk {
            text: &text[*cursor..start],
            highlighted: false,
        });
    }
    chunks.push(HighlightChunk {
        text: &text[start..end],
        highlighted: true,
    });
    *cursor = end;
}
