//! Filter state extractor for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use solidarity_core::filter_state::FilterState;
use solidarity_core::url_state;

/// The [`FilterState`] encoded in the request's query string.
///
/// Never rejects: unknown parameters and malformed values are dropped by the
/// decoder, so a garbled URL degrades to fewer filters rather than an error.
///
/// ```ignore
/// async fn my_handler(FilterQuery(state): FilterQuery) -> AppResult<Response> {
///     tracing::debug!(has_filters = state.has_filters(), "handling request");
///     ...
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterQuery(pub FilterState);

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        Ok(FilterQuery(url_state::decode(query)))
    }
}
