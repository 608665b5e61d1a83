//! Artifact readers.
//!
//! - car catalog JSON (`catalog`)
//! - label encoder JSON (`encoders`)
//! - tree-ensemble model JSON (`model`)

pub mod catalog;
pub mod encoders;
pub mod model;

pub use catalog::*;
pub use encoders::*;
pub use model::*;
