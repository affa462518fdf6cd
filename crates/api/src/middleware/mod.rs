//! Request extractors shared by handlers.
//!
//! - [`filter::FilterQuery`] -- Decodes the filter state from the query string.

pub mod filter;
