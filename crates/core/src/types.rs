/// Upstream record ids are opaque strings (e.g. `rec3kX9...`).
pub type RecordId = String;

/// Calendar year extracted from an action date.
pub type Year = i32;
