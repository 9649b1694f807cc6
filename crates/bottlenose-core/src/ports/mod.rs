//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process or filesystem implementation details in signatures
//! - Intent-based methods (parse, generate), not command lines

pub mod processor;

pub use processor::{
    ProcessorError, ProcessorOptions, ProcessorPort, ProcessorResponse, ProcessorResult,
    TokenStreams,
};
