//! The seven facet dimensions an action can be filtered by.

use serde::{Deserialize, Serialize};

/// One independent categorical axis of the filter.
///
/// Selections inside a dimension are OR-ed together; dimensions are AND-ed
/// with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Year,
    Type,
    Status,
    Category,
    Company,
    Country,
    Group,
}

impl Dimension {
    /// All dimensions in display order.
    pub const ALL: [Dimension; 7] = [
        Dimension::Year,
        Dimension::Country,
        Dimension::Type,
        Dimension::Status,
        Dimension::Category,
        Dimension::Company,
        Dimension::Group,
    ];

    /// Query-string parameter holding this dimension's selection.
    pub fn url_key(self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::Type => "type",
            Dimension::Status => "status",
            Dimension::Category => "category",
            Dimension::Company => "company",
            Dimension::Country => "country",
            Dimension::Group => "group",
        }
    }

    /// Inverse of [`Dimension::url_key`].
    pub fn from_url_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.url_key() == key)
    }

    /// Human-readable label used on filter buttons.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Type => "Type",
            Dimension::Status => "Status",
            Dimension::Category => "Category",
            Dimension::Company => "Company",
            Dimension::Country => "Location",
            Dimension::Group => "Organising group",
        }
    }
}
