pub mod catalog;
pub mod dimension;
pub mod error;
pub mod explorer;
pub mod facets;
pub mod filter_state;
pub mod index;
pub mod projection;
pub mod query;
pub mod session;
pub mod types;
pub mod url_state;
