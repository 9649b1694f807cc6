//! Grammar listing.

use axum::extract::{Query, State};
use bottlenose_core::GrammarSummary;
use std::collections::HashMap;

use crate::error::HttpError;
use crate::jsonp::{Reply, callback};
use crate::state::AppState;

/// List configured grammars and whether their images are installed.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Reply<Vec<GrammarSummary>>, HttpError> {
    let callback = callback(&query, state.allow_jsonp)?;
    Ok(Reply::new(state.dispatcher.grammars(), callback))
}
