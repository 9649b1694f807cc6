//! Semantic representation codecs used by the bottlenose response shaper.
//!
//! This crate reads the formats ACE emits (SimpleMRS, UDF derivations and
//! YY token lattices) and writes the formats bottlenose serves:
//!
//! - MRS as SimpleMRS text or structured JSON
//! - DMRS as structured JSON, Penman, or a `tikz-dependency` LaTeX document
//! - EDS as native text, structured JSON, or Penman
//! - derivation trees as structured JSON
//! - token lattices as structured JSON or YY text
//!
//! DMRS and EDS are always derived from an MRS; there is no reader for them.

#![deny(unused_crate_dependencies)]

pub mod derivation;
pub mod dmrs;
pub mod eds;
mod error;
pub mod latex;
pub mod lnk;
pub mod mrs;
pub mod penman;
pub mod predicate;
pub mod syntax;
pub mod tokens;
pub mod variable;

pub use derivation::{Derivation, DerivationField};
pub use dmrs::{Dmrs, Link, Node};
pub use eds::{Eds, EdsNode};
pub use error::DelphinError;
pub use lnk::Lnk;
pub use mrs::{ElementaryPredication, HandleConstraint, IndividualConstraint, Mrs, simplemrs};
pub use tokens::{YyToken, YyTokenLattice};
