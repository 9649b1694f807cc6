//! Query parameter tables and validation.
//!
//! Each endpoint is described by a static table of [`ParamSpec`]s. The
//! validator walks the whole table, so a request with several bad
//! parameters is rejected once with every problem listed.

use regex::Regex;
use std::collections::HashMap;

use crate::error::{ParamError, ServiceError};

/// The choice that switches an optional output off.
pub const NULL: &str = "null";

/// How a raw query value is checked and typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Free text, taken as is.
    Text,
    /// A non-negative integer.
    Int,
    /// One of a fixed set of words.
    Choice(&'static [&'static str]),
    /// A regular expression.
    Pattern,
}

/// One recognized query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// Raw default, validated like a supplied value. `None` leaves the
    /// parameter unset when absent.
    pub default: Option<&'static str>,
    /// Absence is a validation error.
    pub required: bool,
}

impl ParamSpec {
    const fn required_text(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            default: None,
            required: true,
        }
    }

    const fn int(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            default: Some(default),
            required: false,
        }
    }

    const fn choice(
        name: &'static str,
        choices: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Choice(choices),
            default: Some(default),
            required: false,
        }
    }

    const fn pattern(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Pattern,
            default: None,
            required: false,
        }
    }
}

/// Parameters of `/{grammar}/parse`.
pub const PARSE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required_text("input"),
    ParamSpec::int("analyses", "100"),
    ParamSpec::int("results", "1"),
    ParamSpec::choice("generics", &["all", NULL], "all"),
    ParamSpec::choice("tokens", &["json", "yy", NULL], NULL),
    ParamSpec::choice("derivation", &["json", "udf", NULL], NULL),
    ParamSpec::choice("mrs", &["json", "simple", "latex", NULL], NULL),
    ParamSpec::choice(
        "eds",
        &["json", "native", "penman", "amr", "latex", NULL],
        NULL,
    ),
    ParamSpec::choice("dmrs", &["json", "penman", "latex", NULL], NULL),
    ParamSpec::choice("properties", &["json", NULL], "json"),
    ParamSpec::pattern("filter"),
];

/// Parameters of `/{grammar}/generate`.
pub const GENERATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required_text("input"),
    ParamSpec::int("results", "1"),
    ParamSpec::choice("derivation", &["json", "udf", NULL], NULL),
];

/// A validated, typed parameter value.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Text(String),
    Int(usize),
    /// Always one of the table's static choices.
    Choice(&'static str),
    Pattern(Regex),
}

/// The outcome of validating a query against a table.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<&'static str, ParamValue>,
}

impl Params {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<usize> {
        match self.values.get(name) {
            Some(ParamValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// The selected choice, or `None` when it is absent or `null`.
    pub fn choice(&self, name: &str) -> Option<&'static str> {
        match self.values.get(name) {
            Some(ParamValue::Choice(c)) if *c != NULL => Some(*c),
            _ => None,
        }
    }

    pub fn pattern(&self, name: &str) -> Option<&Regex> {
        match self.values.get(name) {
            Some(ParamValue::Pattern(re)) => Some(re),
            _ => None,
        }
    }
}

fn check(spec: &ParamSpec, raw: &str) -> Result<ParamValue, String> {
    // Reasons are joined one per line, so echoed values stay on one line.
    let shown = raw.escape_debug();
    match spec.kind {
        ParamKind::Text => Ok(ParamValue::Text(raw.to_string())),
        ParamKind::Int => raw
            .trim()
            .parse::<usize>()
            .map(ParamValue::Int)
            .map_err(|_| format!("expected a non-negative integer, got '{shown}'")),
        ParamKind::Choice(choices) => choices
            .iter()
            .copied()
            .find(|c| *c == raw)
            .map(ParamValue::Choice)
            .ok_or_else(|| format!("expected one of {}, got '{shown}'", choices.join(", "))),
        ParamKind::Pattern => Regex::new(raw)
            .map(ParamValue::Pattern)
            // regex::Error renders a multi-line caret diagram.
            .map_err(|_| format!("invalid regular expression '{shown}'")),
    }
}

/// Validate `query` against `table`, collecting every failure.
///
/// Unrecognized query keys are ignored; adapters may use them (`callback`).
pub fn validate(
    query: &HashMap<String, String>,
    table: &[ParamSpec],
) -> Result<Params, ServiceError> {
    let mut params = Params::default();
    let mut errors = Vec::new();
    for spec in table {
        let raw = query.get(spec.name).map(String::as_str).or(spec.default);
        let Some(raw) = raw else {
            if spec.required {
                errors.push(ParamError::new(spec.name, "missing required parameter"));
            }
            continue;
        };
        match check(spec, raw) {
            Ok(value) => {
                params.values.insert(spec.name, value);
            }
            Err(reason) => errors.push(ParamError::new(spec.name, reason)),
        }
    }
    if errors.is_empty() {
        Ok(params)
    } else {
        tracing::debug!(count = errors.len(), "Rejecting request parameters");
        Err(ServiceError::InvalidParameters(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply() {
        let params = validate(&query(&[("input", "Abrams barks")]), PARSE_PARAMS).unwrap();
        assert_eq!(params.text("input"), Some("Abrams barks"));
        assert_eq!(params.int("analyses"), Some(100));
        assert_eq!(params.int("results"), Some(1));
        assert_eq!(params.choice("generics"), Some("all"));
        assert_eq!(params.choice("properties"), Some("json"));
        assert_eq!(params.choice("mrs"), None);
        assert!(params.pattern("filter").is_none());
    }

    #[test]
    fn test_explicit_null_switches_off() {
        let params = validate(
            &query(&[("input", "x"), ("properties", "null"), ("generics", "null")]),
            PARSE_PARAMS,
        )
        .unwrap();
        assert_eq!(params.choice("properties"), None);
        assert_eq!(params.choice("generics"), None);
    }

    #[test]
    fn test_typed_values() {
        let params = validate(
            &query(&[
                ("input", "x"),
                ("results", "5"),
                ("eds", "amr"),
                ("filter", "_bark_v"),
            ]),
            PARSE_PARAMS,
        )
        .unwrap();
        assert_eq!(params.int("results"), Some(5));
        assert_eq!(params.choice("eds"), Some("amr"));
        assert!(params.pattern("filter").unwrap().is_match("[ _bark_v_1 ]"));
    }

    #[test]
    fn test_every_invalid_parameter_is_reported() {
        let err = validate(
            &query(&[
                ("input", "x"),
                ("results", "-1"),
                ("mrs", "xml"),
                ("dmrs", "svg"),
                ("filter", "("),
            ]),
            PARSE_PARAMS,
        )
        .unwrap_err();
        let ServiceError::InvalidParameters(errors) = err else {
            panic!("expected InvalidParameters");
        };
        let names: Vec<&str> = errors.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["results", "mrs", "dmrs", "filter"]);
    }

    #[test]
    fn test_missing_input_is_reported_with_other_errors() {
        let err = validate(&query(&[("results", "many")]), GENERATE_PARAMS).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid parameters:\n"));
        assert!(message.contains("  input: missing required parameter"));
        assert!(message.contains("  results: expected a non-negative integer, got 'many'"));
    }

    #[test]
    fn test_generation_table_ignores_parse_only_parameters() {
        let params = validate(
            &query(&[("input", "[ ]"), ("mrs", "nonsense")]),
            GENERATE_PARAMS,
        )
        .unwrap();
        assert_eq!(params.choice("mrs"), None);
    }

    #[test]
    fn test_choices_are_case_sensitive() {
        let err = validate(&query(&[("input", "x"), ("eds", "AMR")]), PARSE_PARAMS).unwrap_err();
        assert!(err.to_string().contains("eds: expected one of"));
    }

    #[test]
    fn test_every_reason_fits_on_one_line() {
        let err = validate(
            &query(&[("results", "many"), ("filter", "("), ("mrs", "x\ny")]),
            PARSE_PARAMS,
        )
        .unwrap_err();
        let ServiceError::InvalidParameters(errors) = &err else {
            panic!("expected InvalidParameters");
        };
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| !e.reason.contains('\n')));
        assert_eq!(
            errors.iter().find(|e| e.name == "filter").unwrap().reason,
            "invalid regular expression '('"
        );
        assert_eq!(err.to_string().lines().count(), 5);
    }

    #[test]
    fn test_choice_error_lists_allowed_values() {
        let err = validate(&query(&[("input", "x"), ("tokens", "xml")]), PARSE_PARAMS).unwrap_err();
        assert!(
            err.to_string()
                .contains("tokens: expected one of json, yy, null, got 'xml'")
        );
    }
}
