//! Core of the bottlenose service.
//!
//! Holds everything that does not depend on a transport or on how the
//! processor is run: configuration, the grammar registry, query parameter
//! validation, the processor port and response shaping. Adapters
//! (`bottlenose-axum`, `bottlenose-cli`) drive a [`Dispatcher`]; the
//! processor itself is plugged in through [`ProcessorPort`].

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod params;
pub mod ports;
pub mod registry;
pub mod services;
pub mod shaper;

pub use config::{AceConfig, AppConfig, ConfigError, GrammarConfig};
pub use error::{ParamError, ServiceError};
pub use params::{GENERATE_PARAMS, PARSE_PARAMS, ParamKind, ParamSpec, Params, validate};
pub use ports::{
    ProcessorError, ProcessorOptions, ProcessorPort, ProcessorResponse, ProcessorResult,
    TokenStreams,
};
pub use registry::{Grammar, GrammarRegistry, GrammarSummary};
pub use services::{Dispatcher, Query};
pub use shaper::{Field, ResponseDocument, Selection, Shaper};

#[cfg(test)]
use tokio as _;
