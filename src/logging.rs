//! Log subscriber setup.
//!
//! `RUST_LOG` overrides the default filter. The TUI owns the terminal, so it
//! only logs when given a file.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::AppError;

const DEFAULT_FILTER: &str = "carprice=info,warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

impl LogTarget {
    /// Where logs go for a command: an explicit file always wins, otherwise
    /// stderr unless the command draws on the terminal.
    pub fn select(log_file: Option<PathBuf>, owns_terminal: bool) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path),
            None if owns_terminal => LogTarget::Off,
            None => LogTarget::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global subscriber.
pub fn init(target: &LogTarget) -> Result<(), AppError> {
    let registry = tracing_subscriber::registry().with(env_filter());
    let result = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogTarget::File(path) => {
            let file = File::create(path).map_err(|e| {
                AppError::input(format!("Failed to create log file '{}': {e}", path.display()))
            })?;
            registry
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false)
                        .compact(),
                )
                .try_init()
        }
    };
    result.map_err(|e| AppError::runtime(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_wins_over_terminal_ownership() {
        let path = PathBuf::from("carprice.log");
        assert_eq!(LogTarget::select(Some(path.clone()), true), LogTarget::File(path));
        assert_eq!(LogTarget::select(None, true), LogTarget::Off);
        assert_eq!(LogTarget::select(None, false), LogTarget::Stderr);
    }

    #[test]
    fn off_installs_nothing() {
        assert!(init(&LogTarget::Off).is_ok());
    }
}
