//! Core data types for the Atelier generation lifecycle.
//!
//! This crate provides the data model shared by every Atelier crate: node
//! kinds and their capabilities, generation parameters, artifacts, the
//! request state machine, and polling settings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod kind;
mod node_data;
mod parameters;
mod polling;
mod request;
mod session;
mod telemetry;

pub use artifact::{Artifact, RequestId, SubmissionId};
pub use kind::{MAX_IMAGE_SLOTS, MIN_VIDEO_IMAGES, NodeKind};
pub use node_data::NodeData;
pub use parameters::{
    AspectRatio, CreditMetadata, GenerationParameters, GenerationParametersBuilder, Style,
};
pub use polling::{PollingConfig, PollingConfigBuilder};
pub use request::{GenerationRequest, GenerationStatus};
pub use session::{AccessToken, SessionState, UserSession};
pub use telemetry::{TelemetryOptions, init_telemetry, shutdown_telemetry};
