//! Verbosity shared by the scanner and renderer, and the output sinks of the
//! command-line front end.
//!
//! Every call carries its own [`Verbosity`] inside its options. The process-wide
//! default only seeds those options when they are built and is never consulted
//! mid-call.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

static DEFAULT_VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

/// How chatty the library is through `tracing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Nothing is logged; issues are still collected.
    Quiet = 0,
    /// Issues and fallbacks are logged as warnings.
    #[default]
    Normal = 1,
    /// Adds one line of progress per scanned file.
    Verbose = 2,
    /// Adds per-annotation and per-detection details.
    Debug = 3,
}

impl Verbosity {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            2 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }

    /// Raises the level by `steps`, saturating at [`Verbosity::Debug`].
    pub fn raised(self, steps: u8) -> Self {
        Self::from_u8((self as u8).saturating_add(steps))
    }

    pub fn warnings_enabled(self) -> bool {
        self >= Verbosity::Normal
    }

    pub fn progress_enabled(self) -> bool {
        self >= Verbosity::Verbose
    }

    pub fn details_enabled(self) -> bool {
        self >= Verbosity::Debug
    }

    /// The `tracing` level filter a subscriber should use for this verbosity.
    pub fn level_filter(self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self {
            Verbosity::Quiet => LevelFilter::OFF,
            Verbosity::Normal => LevelFilter::WARN,
            Verbosity::Verbose => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Sets the verbosity that newly built options start from.
pub fn set_default_verbosity(verbosity: Verbosity) {
    DEFAULT_VERBOSITY.store(verbosity as u8, Ordering::Relaxed);
}

/// The verbosity that newly built options start from.
pub fn default_verbosity() -> Verbosity {
    Verbosity::from_u8(DEFAULT_VERBOSITY.load(Ordering::Relaxed))
}

/// Where rendered text goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Printed with a short header and an issue summary.
    #[default]
    Console,
    /// Only the rendered text, for piping.
    Raw,
    /// Written to a file.
    File,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(OutputMode::Console),
            "raw" => Ok(OutputMode::Raw),
            "file" => Ok(OutputMode::File),
            _ => Err(ConfigError::UnknownOutputMode(s.to_string())),
        }
    }
}
