//! JSON-P support.
//!
//! When enabled in configuration, a `callback` query parameter wraps a
//! successful JSON body as `callback(<json>)` served as JavaScript. Error
//! responses are never wrapped.

use axum::Json;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::HttpError;

/// Query parameter naming the callback.
pub const CALLBACK_PARAM: &str = "callback";

/// Content type of wrapped bodies.
pub const JAVASCRIPT: &str = "application/javascript";

/// A JavaScript identifier path such as `handle` or `app.parsed`.
fn is_valid_callback(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

/// Read the callback from `query`.
///
/// An absent or empty `callback` means plain JSON. A callback is rejected
/// when JSON-P is disabled or the name is not a JavaScript identifier path.
pub fn callback(
    query: &HashMap<String, String>,
    allow_jsonp: bool,
) -> Result<Option<String>, HttpError> {
    let Some(name) = query.get(CALLBACK_PARAM).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if !allow_jsonp {
        return Err(HttpError::BadRequest(
            "JSON-P callbacks are disabled for this request.".to_string(),
        ));
    }
    if !is_valid_callback(name) {
        return Err(HttpError::BadRequest(format!(
            "Invalid JSON-P callback name: {name}"
        )));
    }
    Ok(Some(name.clone()))
}

/// A JSON body, optionally wrapped in a callback.
#[derive(Debug)]
pub struct Reply<T> {
    body: T,
    callback: Option<String>,
}

impl<T> Reply<T> {
    pub const fn new(body: T, callback: Option<String>) -> Self {
        Self { body, callback }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        let Some(callback) = self.callback else {
            return Json(self.body).into_response();
        };
        match serde_json::to_string(&self.body) {
            Ok(json) => (
                [(header::CONTENT_TYPE, JAVASCRIPT)],
                format!("{callback}({json})"),
            )
                .into_response(),
            Err(e) => HttpError::Internal(format!("Failed to serialize response: {e}"))
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(callback: &str) -> HashMap<String, String> {
        HashMap::from([(CALLBACK_PARAM.to_string(), callback.to_string())])
    }

    #[test]
    fn test_no_callback_is_plain_json() {
        assert_eq!(callback(&HashMap::new(), false).unwrap(), None);
        assert_eq!(callback(&query(""), false).unwrap(), None);
    }

    #[test]
    fn test_disabled_callback_rejected() {
        let err = callback(&query("cb"), false).unwrap_err();
        assert!(matches!(err, HttpError::BadRequest(_)));
    }

    #[test]
    fn test_callback_names() {
        for ok in ["cb", "_handle", "$", "app.results.push", "jQuery123_456"] {
            assert_eq!(callback(&query(ok), true).unwrap().as_deref(), Some(ok));
        }
        for bad in ["1cb", "alert(1)", "a-b", "x;y", "</script>"] {
            assert!(callback(&query(bad), true).is_err(), "{bad} accepted");
        }
    }
}
