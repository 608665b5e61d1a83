//! Terminal-facing text: prices, request summaries, taxonomy and audit listings.

pub mod format;

pub use format::*;
