//! Parse and generate handlers.

use axum::extract::{Path, Query, State};
use bottlenose_core::ResponseDocument;
use std::collections::HashMap;

use crate::error::HttpError;
use crate::jsonp::{Reply, callback};
use crate::state::AppState;

/// Parse `input` with the grammar named in the path.
pub async fn parse(
    State(state): State<AppState>,
    Path(grammar): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Reply<ResponseDocument>, HttpError> {
    let callback = callback(&query, state.allow_jsonp)?;
    let document = state.dispatcher.parse(&grammar, &query).await?;
    Ok(Reply::new(document, callback))
}

/// Realize the MRS in `input` with the grammar named in the path.
pub async fn generate(
    State(state): State<AppState>,
    Path(grammar): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Reply<ResponseDocument>, HttpError> {
    let callback = callback(&query, state.allow_jsonp)?;
    let document = state.dispatcher.generate(&grammar, &query).await?;
    Ok(Reply::new(document, callback))
}
