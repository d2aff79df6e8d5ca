//! Atelier - generation nodes with asynchronous job polling
//!
//! Atelier implements the lifecycle behind a canvas node that turns a prompt
//! into text, an image or a video: pre-flight checks, one credit debit, a
//! submit call, and a bounded polling loop for queued jobs. The lifecycle is
//! written once and parameterised by [`NodeKind`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use atelier::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AtelierConfig::load()?;
//!     let endpoint = Arc::new(FalClient::new(&config.endpoint)?);
//!     let session = StaticSession::new(SessionState::signed_in(UserSession::new(
//!         "user-1",
//!         None,
//!         AccessToken::new(std::env::var("ATELIER_ACCESS_TOKEN")?),
//!     )));
//!     let collaborators = Collaborators::new(
//!         Arc::new(session),
//!         Arc::new(InMemoryCreditLedger::new(10)),
//!         Arc::new(TracingNotifier),
//!     );
//!
//!     let node = NodeController::new(NodeKind::Image, endpoint, collaborators, config.polling);
//!     node.set_prompt("a cat").await;
//!     let finished = node.submit().await;
//!     println!("{}", render(NodeKind::Image, &node.parameters().await, &finished));
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `atelier_error` - error kinds with source locations
//! - `atelier_core` - node kinds, parameters, artifacts, request state machine
//! - `atelier_interface` - session, credits, notifier and endpoint traits
//! - `atelier_config` - layered TOML configuration
//! - `atelier_models` - fal endpoint client
//! - `atelier_node` - polling controller, pre-flight and node controller
//!
//! This crate re-exports everything for convenience.

pub use atelier_config::*;
pub use atelier_core::*;
pub use atelier_error::*;
pub use atelier_interface::*;
pub use atelier_models::*;
pub use atelier_node::*;
