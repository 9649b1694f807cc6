//! Dispatcher - runs parse and generation requests end to end.

use bottlenose_delphin::simplemrs;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::error::ServiceError;
use crate::params::{GENERATE_PARAMS, PARSE_PARAMS, Params, validate};
use crate::ports::{ProcessorOptions, ProcessorPort};
use crate::registry::{GrammarRegistry, GrammarSummary};
use crate::shaper::{ResponseDocument, Selection, Shaper};

/// Raw query parameters, last value per key.
pub type Query = HashMap<String, String>;

/// Entry point for every grammar request.
///
/// Each request goes through the same stages: grammar lookup, parameter
/// validation, format resolution, one processor call, shaping. The first
/// failing stage decides the error.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<GrammarRegistry>,
    processor: Arc<dyn ProcessorPort>,
}

impl Dispatcher {
    /// Create a new dispatcher.
    pub fn new(registry: Arc<GrammarRegistry>, processor: Arc<dyn ProcessorPort>) -> Self {
        Self {
            registry,
            processor,
        }
    }

    /// List configured grammars.
    pub fn grammars(&self) -> Vec<GrammarSummary> {
        self.registry.summaries()
    }

    /// Parse `input` with the grammar registered under `key`.
    pub async fn parse(&self, key: &str, query: &Query) -> Result<ResponseDocument, ServiceError> {
        let grammar = self.registry.lookup(key)?;
        let params = validate(query, PARSE_PARAMS)?;
        let shaper = Shaper::new(Selection::for_parse(&params))?;
        let input = params.text("input").unwrap_or_default();
        let options = options(&params).with_generics(params.choice("generics").is_some());

        tracing::debug!(
            grammar = %grammar.key,
            analyses = params.int("analyses"),
            results = options.results,
            generics = options.generics,
            "Parsing"
        );
        let started = Instant::now();
        let response = self
            .processor
            .parse(&grammar.path, input, &options)
            .await?;
        let document = shaper.shape(&response)?;
        tracing::info!(
            grammar = %grammar.key,
            readings = document.readings,
            returned = document.results.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Parse complete"
        );
        Ok(document)
    }

    /// Realize the SimpleMRS `input` with the grammar registered under `key`.
    ///
    /// The MRS is read and written back out before it reaches the processor,
    /// so the processor always sees a normalized rendering.
    pub async fn generate(
        &self,
        key: &str,
        query: &Query,
    ) -> Result<ResponseDocument, ServiceError> {
        let grammar = self.registry.lookup(key)?;
        let params = validate(query, GENERATE_PARAMS)?;
        let shaper = Shaper::new(Selection::for_generate(&params))?;
        let mrs = simplemrs::loads_one(params.text("input").unwrap_or_default())
            .map_err(ServiceError::InvalidGenerationInput)?;
        let input = simplemrs::dumps_one(&mrs);
        let options = options(&params);

        tracing::debug!(
            grammar = %grammar.key,
            results = options.results,
            eps = mrs.rels.len(),
            "Generating"
        );
        let started = Instant::now();
        let response = self
            .processor
            .generate(&grammar.path, &input, &options)
            .await?;
        let document = shaper.shape(&response)?;
        tracing::info!(
            grammar = %grammar.key,
            readings = document.readings,
            returned = document.results.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Generation complete"
        );
        Ok(document)
    }
}

fn options(params: &Params) -> ProcessorOptions {
    let defaults = ProcessorOptions::default();
    let results = params.int("results").unwrap_or(defaults.results);
    defaults.with_results(results)
}
