use serde::{Deserialize, Serialize};
use solidarity_core::catalog::{Action, Catalog, FacetRecords};

use crate::error::StoreError;

/// Everything the record store delivers in one load.
///
/// Serialized as a single JSON object: `actions` next to one array per
/// facet table (`types`, `statuses`, `categories`, `companies`, `countries`,
/// `groups`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(flatten)]
    pub facets: FacetRecords,
}

impl RecordSet {
    /// Reject loads that would replace a catalog with nothing.
    ///
    /// Individual bad records are not an error here; [`Catalog::build`]
    /// drops them with a warning.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.actions.is_empty() {
            return Err(StoreError::Validation(
                "record set contains no actions".into(),
            ));
        }
        Ok(())
    }

    pub fn into_catalog(self) -> Catalog {
        Catalog::build(self.actions, self.facets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use solidarity_core::dimension::Dimension;

    #[test]
    fn parses_flat_facet_tables() {
        let json = r#"{
            "actions": [{
                "id": "rec1",
                "slug": "port-blockade",
                "date": "2020-05-01",
                "name": "Port blockade",
                "country_ids": ["recFR"]
            }],
            "countries": [{ "id": "recFR", "name": "France", "slug": "fr", "iso_code": "FR" }]
        }"#;
        let records: RecordSet = serde_json::from_str(json).unwrap();
        assert_eq!(records.facets.countries.len(), 1);
        assert!(records.facets.types.is_empty());

        let catalog = records.into_catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.baseline_count(Dimension::Country, "fr"), 1);
    }

    #[test]
    fn empty_record_set_is_invalid() {
        assert_matches!(
            RecordSet::default().validate(),
            Err(StoreError::Validation(_))
        );
    }
}
