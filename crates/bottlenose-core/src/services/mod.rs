//! Core services - request orchestration.
//!
//! Services sit between adapters and ports. They validate, invoke the
//! processor through [`ProcessorPort`](crate::ports::ProcessorPort) and
//! shape the result, without knowing which processor or transport is used.

mod dispatcher;

pub use dispatcher::{Dispatcher, Query};
