//! Error types for the Atelier workspace.
//!
//! This crate provides the foundation error types used by every other Atelier crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use atelier_error::{AtelierResult, HttpError};
//!
//! fn fetch_status() -> AtelierResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_status() {
//!     Ok(status) => println!("Got: {}", status),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod generation;
mod http;
mod transition;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{AtelierError, AtelierErrorKind, AtelierResult};
pub use generation::{
    FailureCategory, GenerationError, GenerationErrorKind, GenerationResult, PreflightFailure,
};
pub use http::HttpError;
pub use transition::TransitionError;
