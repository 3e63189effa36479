#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` turns the `-v` count of the `oc-facl` front-end into a
//! [`VerbosityConfig`] and, with the `tracing` feature enabled, installs a
//! `tracing` subscriber that writes diagnostics to standard error.
//!
//! # Design
//!
//! Library crates only emit events through the `tracing` macros; they never
//! install a subscriber. The binary calls [`init_tracing`] once at startup.
//! The verbosity level becomes an `EnvFilter` directive, and a `RUST_LOG`
//! value in the environment takes precedence over it.
//!
//! # Invariants
//!
//! - Levels above the highest supported one saturate at [`LogLevel::Trace`].
//! - Installing the subscriber twice is reported, never a panic.
//!
//! # Examples
//!
//! ```
//! use logging::{LogLevel, VerbosityConfig};
//!
//! assert_eq!(VerbosityConfig::from_verbose_level(0).level, LogLevel::Warn);
//! assert_eq!(VerbosityConfig::from_verbose_level(2).filter_directive(), "debug");
//! assert_eq!(VerbosityConfig::from_verbose_level(9).level, LogLevel::Trace);
//! ```

mod config;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{LogLevel, VerbosityConfig};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{env_filter, init_tracing};
