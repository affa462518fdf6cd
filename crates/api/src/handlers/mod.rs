pub mod actions;
pub mod catalog;
pub mod facets;
pub mod views;
