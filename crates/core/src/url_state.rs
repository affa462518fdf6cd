//! Query-string codec for [`FilterState`].
//!
//! Recognised parameters are `search` plus one per [`Dimension`]
//! (`year`, `type`, `status`, `category`, `company`, `country`, `group`).
//! Dimension parameters may repeat (`country=fr&country=de`) or use array
//! syntax (`country[]=fr`). Anything else is ignored rather than rejected.

use url::form_urlencoded;

use crate::dimension::Dimension;
use crate::filter_state::FilterState;

/// Query parameter holding the free-text search.
pub const SEARCH_KEY: &str = "search";

/// Parse a query string (with or without the leading `?`).
///
/// Repeated `search` values are joined with commas. Empty and duplicate
/// facet values are dropped.
pub fn decode(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = FilterState::default();
    let mut search: Vec<String> = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let key = strip_array_suffix(&key);
        if key == SEARCH_KEY {
            search.push(value.into_owned());
            continue;
        }
        let Some(dimension) = Dimension::from_url_key(key) else {
            tracing::debug!(key, "Ignoring unknown query parameter");
            continue;
        };
        if value.trim().is_empty() || state.is_selected(dimension, &value) {
            continue;
        }
        state.toggle(dimension, value.into_owned());
    }

    if !search.is_empty() {
        state.set_search_text(&search.join(","));
    }
    state
}

/// Serialize `state` to a query string without the leading `?`.
///
/// Keys are written in alphabetical order; empty dimensions and an empty
/// search are omitted, so the empty state encodes to `""`.
pub fn encode(state: &FilterState) -> String {
    let mut keys: Vec<&str> = Dimension::ALL
        .into_iter()
        .map(Dimension::url_key)
        .chain([SEARCH_KEY])
        .collect();
    keys.sort_unstable();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for key in keys {
        match Dimension::from_url_key(key) {
            Some(dimension) => {
                for value in state.selected(dimension) {
                    serializer.append_pair(key, value);
                }
            }
            None if !state.search.is_empty() => {
                serializer.append_pair(key, &state.search);
            }
            None => {}
        }
    }
    serializer.finish()
}

/// `country[]` and `country[0]` both mean `country`.
fn strip_array_suffix(key: &str) -> &str {
    match key.find('[') {
        Some(open) if key.ends_with(']') => &key[..open],
        _ => key,
    }
}
