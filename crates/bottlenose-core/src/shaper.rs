//! Response shaping.
//!
//! Turns a [`ProcessorResponse`] into the JSON document served to clients.
//! Output formats are chosen from lookup tables keyed by field and format
//! name, so supporting a new format means adding a table row. A format that
//! the parameter tables accept but no row provides (`mrs=latex`,
//! `eds=latex`) is reported as [`ServiceError::UnimplementedFormat`] before
//! the processor is run.

use bottlenose_delphin::{
    Derivation, DerivationField, Dmrs, Eds, Mrs, YyTokenLattice, eds, latex, penman, simplemrs,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ServiceError;
use crate::params::Params;
use crate::ports::{ProcessorError, ProcessorResponse, ProcessorResult};

/// Key of the per-result identifier.
pub const RESULT_ID: &str = "result-id";

/// Per-result output fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Derivation,
    Mrs,
    Eds,
    Dmrs,
}

impl Field {
    /// Fields in the order they appear in a result object.
    pub const ALL: [Self; 4] = [Self::Derivation, Self::Mrs, Self::Eds, Self::Dmrs];

    /// Query parameter and JSON key of the field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Derivation => "derivation",
            Self::Mrs => "mrs",
            Self::Eds => "eds",
            Self::Dmrs => "dmrs",
        }
    }
}

/// What an encoder sees for one result.
struct Source<'a> {
    result: &'a ProcessorResult,
    mrs: Option<Mrs>,
    properties: bool,
}

impl Source<'_> {
    fn mrs(&self) -> Result<&Mrs, ServiceError> {
        self.mrs.as_ref().ok_or_else(|| missing(self.result, "mrs"))
    }

    fn raw_mrs(&self) -> Result<&str, ServiceError> {
        self.result
            .mrs
            .as_deref()
            .ok_or_else(|| missing(self.result, "mrs"))
    }

    fn raw_derivation(&self) -> Result<&str, ServiceError> {
        self.result
            .derivation
            .as_deref()
            .ok_or_else(|| missing(self.result, "derivation"))
    }
}

fn missing(result: &ProcessorResult, what: &str) -> ServiceError {
    ServiceError::Processor(ProcessorError::MalformedOutput(format!(
        "result {} has no {what}",
        result.result_id
    )))
}

type Encode = fn(&Source<'_>) -> Result<Value, ServiceError>;

/// One row of the per-result format table.
struct Encoding {
    field: Field,
    format: &'static str,
    /// Whether the encoder reads the decoded MRS.
    needs_mrs: bool,
    encode: Encode,
}

const ENCODINGS: &[Encoding] = &[
    Encoding {
        field: Field::Derivation,
        format: "udf",
        needs_mrs: false,
        encode: |s| Ok(s.raw_derivation()?.into()),
    },
    Encoding {
        field: Field::Derivation,
        format: "json",
        needs_mrs: false,
        encode: |s| Ok(Derivation::from_udf(s.raw_derivation()?)?.to_json(DerivationField::SERVED)),
    },
    Encoding {
        field: Field::Mrs,
        format: "simple",
        needs_mrs: false,
        encode: |s| Ok(s.raw_mrs()?.into()),
    },
    Encoding {
        field: Field::Mrs,
        format: "json",
        needs_mrs: true,
        encode: |s| Ok(s.mrs()?.to_json(s.properties)),
    },
    Encoding {
        field: Field::Eds,
        format: "native",
        needs_mrs: true,
        encode: |s| Ok(eds::dumps_native(&Eds::from_mrs(s.mrs()?)).into()),
    },
    Encoding {
        field: Field::Eds,
        format: "json",
        needs_mrs: true,
        encode: |s| Ok(Eds::from_mrs(s.mrs()?).to_json(s.properties)),
    },
    Encoding {
        field: Field::Eds,
        format: "penman",
        needs_mrs: true,
        encode: |s| Ok(penman::encode_eds(&Eds::from_mrs(s.mrs()?), s.properties)?.into()),
    },
    Encoding {
        field: Field::Eds,
        format: "amr",
        needs_mrs: true,
        encode: |s| Ok(penman::encode_eds(&Eds::from_mrs(s.mrs()?), s.properties)?.into()),
    },
    Encoding {
        field: Field::Dmrs,
        format: "json",
        needs_mrs: true,
        encode: |s| Ok(Dmrs::from_mrs(s.mrs()?).to_json(s.properties)),
    },
    Encoding {
        field: Field::Dmrs,
        format: "penman",
        needs_mrs: true,
        encode: |s| Ok(penman::encode_dmrs(&Dmrs::from_mrs(s.mrs()?), s.properties)?.into()),
    },
    Encoding {
        field: Field::Dmrs,
        format: "latex",
        needs_mrs: true,
        encode: |s| Ok(latex::dmrs_tikz_dependency(&Dmrs::from_mrs(s.mrs()?)).into()),
    },
];

type EncodeTokens = fn(&str) -> Result<Value, ServiceError>;

const TOKEN_ENCODINGS: &[(&str, EncodeTokens)] = &[
    ("json", |text| Ok(text.parse::<YyTokenLattice>()?.to_json())),
    ("yy", |text| Ok(text.parse::<YyTokenLattice>()?.to_string().into())),
];

/// Which outputs a request asked for.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Requested `(field, format)` pairs.
    pub fields: Vec<(Field, &'static str)>,
    pub tokens: Option<&'static str>,
    /// Include variable properties in structured projections.
    pub properties: bool,
    /// Keep only results whose MRS text matches.
    pub filter: Option<Regex>,
    /// Include realized strings (generation).
    pub surface: bool,
}

impl Selection {
    /// Selection for a validated parse request.
    pub fn for_parse(params: &Params) -> Self {
        Self {
            fields: Field::ALL
                .iter()
                .filter_map(|&field| params.choice(field.name()).map(|format| (field, format)))
                .collect(),
            tokens: params.choice("tokens"),
            properties: params.choice("properties").is_some(),
            filter: params.pattern("filter").cloned(),
            surface: false,
        }
    }

    /// Selection for a validated generation request.
    pub fn for_generate(params: &Params) -> Self {
        Self {
            fields: params
                .choice(Field::Derivation.name())
                .map(|format| vec![(Field::Derivation, format)])
                .unwrap_or_default(),
            tokens: None,
            properties: true,
            filter: None,
            surface: true,
        }
    }
}

/// The document served for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDocument {
    pub input: String,
    pub readings: usize,
    pub results: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcpu: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pedges: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Value>,
}

/// A resolved [`Selection`], ready to shape responses.
pub struct Shaper {
    encodings: Vec<&'static Encoding>,
    tokens: Option<EncodeTokens>,
    properties: bool,
    filter: Option<Regex>,
    surface: bool,
}

impl std::fmt::Debug for Shaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formats: Vec<String> = self
            .encodings
            .iter()
            .map(|e| format!("{}={}", e.field.name(), e.format))
            .collect();
        f.debug_struct("Shaper")
            .field("formats", &formats)
            .field("tokens", &self.tokens.is_some())
            .field("properties", &self.properties)
            .field("filter", &self.filter)
            .field("surface", &self.surface)
            .finish()
    }
}

impl Shaper {
    /// Resolve every requested format, failing on the first unimplemented one.
    pub fn new(selection: Selection) -> Result<Self, ServiceError> {
        let mut encodings = Vec::with_capacity(selection.fields.len());
        for (field, format) in selection.fields {
            let encoding = ENCODINGS
                .iter()
                .find(|e| e.field == field && e.format == format)
                .ok_or(ServiceError::UnimplementedFormat {
                    field: field.name(),
                    format,
                })?;
            encodings.push(encoding);
        }
        let tokens = match selection.tokens {
            Some(format) => Some(
                TOKEN_ENCODINGS
                    .iter()
                    .find(|(name, _)| *name == format)
                    .map(|(_, encode)| *encode)
                    .ok_or(ServiceError::UnimplementedFormat {
                        field: "tokens",
                        format,
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            encodings,
            tokens,
            properties: selection.properties,
            filter: selection.filter,
            surface: selection.surface,
        })
    }

    /// Build the response document. Any decoding or encoding failure fails
    /// the whole document.
    pub fn shape(&self, response: &ProcessorResponse) -> Result<ResponseDocument, ServiceError> {
        let readings = response.readings.unwrap_or(response.results.len());
        let needs_mrs = self.encodings.iter().any(|e| e.needs_mrs);

        let mut results = Vec::with_capacity(response.results.len());
        for result in &response.results {
            if let Some(filter) = &self.filter {
                if !result.mrs.as_deref().is_some_and(|m| filter.is_match(m)) {
                    continue;
                }
            }
            results.push(self.shape_result(result, needs_mrs)?);
        }

        let tokens = match self.tokens {
            Some(encode) => {
                let initial = response.tokens.initial.as_deref().unwrap_or_default();
                let internal = response.tokens.internal.as_deref().unwrap_or_default();
                let mut out = Map::new();
                out.insert("initial".into(), encode(initial)?);
                out.insert("internal".into(), encode(internal)?);
                Some(Value::Object(out))
            }
            None => None,
        };

        Ok(ResponseDocument {
            input: response.input.clone(),
            readings,
            results,
            tcpu: response.tcpu,
            pedges: response.pedges,
            tokens,
        })
    }

    fn shape_result(
        &self,
        result: &ProcessorResult,
        needs_mrs: bool,
    ) -> Result<Map<String, Value>, ServiceError> {
        let mrs = match (&result.mrs, needs_mrs) {
            (Some(text), true) => Some(simplemrs::loads_one(text)?),
            _ => None,
        };
        let source = Source {
            result,
            mrs,
            properties: self.properties,
        };

        let mut out = Map::new();
        out.insert(RESULT_ID.into(), result.result_id.into());
        if self.surface {
            if let Some(surface) = &result.surface {
                out.insert("surface".into(), surface.as_str().into());
            }
        }
        for encoding in &self.encodings {
            out.insert(encoding.field.name().into(), (encoding.encode)(&source)?);
        }
        Ok(out)
    }
}
