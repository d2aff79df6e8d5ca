//! Generation node lifecycle for Atelier.
//!
//! A [`NodeController`] turns a node's parameters into an artifact:
//! pre-flight checks, one credit debit, the submit call, and (for queued
//! jobs) a bounded [`PollingController`] loop. Every transition is published
//! to subscribers, and [`render`] maps the published state to display
//! content.
//!
//! # Example
//!
//! ```no_run
//! use atelier_core::{NodeKind, PollingConfig};
//! use atelier_interface::{InMemoryCreditLedger, StaticSession, TracingNotifier};
//! use atelier_node::{Collaborators, NodeController};
//! # use atelier_interface::GenerationEndpoint;
//! # async fn run<E: GenerationEndpoint + 'static>(endpoint: E) {
//! use std::sync::Arc;
//!
//! let collaborators = Collaborators::new(
//!     Arc::new(StaticSession::default()),
//!     Arc::new(InMemoryCreditLedger::new(10)),
//!     Arc::new(TracingNotifier),
//! );
//! let node = NodeController::new(
//!     NodeKind::Image,
//!     Arc::new(endpoint),
//!     collaborators,
//!     PollingConfig::default(),
//! );
//! node.set_prompt("a cat").await;
//! let finished = node.submit().await;
//! println!("{}", finished.status());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod poller;
mod preflight;
mod view;

pub use controller::{Collaborators, NodeController};
pub use poller::{PollAttempt, PollObserver, PollOutcome, PollingController};
pub use preflight::{failure_notification, preflight, success_notification};
pub use view::{NodeView, render};
