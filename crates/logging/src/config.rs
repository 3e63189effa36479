//! crates/logging/src/config.rs
//! Verbosity configuration derived from the `-v` count.

use std::fmt;

/// Most verbose level a diagnostic may be emitted at.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
    /// Warnings and errors only.
    #[default]
    Warn,
    /// Adds one line per ACL operation.
    Info,
    /// Adds every tool invocation and listing.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Returns the `EnvFilter` directive for this level.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// Logging configuration assembled by the front-end.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VerbosityConfig {
    /// Maximum level emitted when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Whether ANSI colours are written.
    pub ansi: bool,
}

impl Default for VerbosityConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            ansi: false,
        }
    }
}

impl VerbosityConfig {
    /// Create a configuration from a verbose count (`-v` repetitions).
    pub fn from_verbose_level(level: u8) -> Self {
        let level = match level {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        Self {
            level,
            ..Self::default()
        }
    }

    /// Enables or disables ANSI colours.
    pub const fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Returns the filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub const fn filter_directive(&self) -> &'static str {
        self.level.as_directive()
    }
}
