//! `carprice` library crate.
//!
//! The binary (`carprice`) is a thin wrapper around this library so that:
//!
//! - the form and prediction logic are testable without a terminal
//! - the TUI, the line prompt and the one-shot command share one pipeline

pub mod app;
pub mod cli;
pub mod domain;
pub mod encode;
pub mod error;
pub mod form;
pub mod io;
pub mod logging;
pub mod models;
pub mod report;
pub mod taxonomy;
pub mod tui;

#[cfg(test)]
mod testing;
