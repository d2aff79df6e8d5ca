//! Shared test utilities for node lifecycle tests.

#![allow(dead_code)]

pub mod mock_endpoint;

use atelier_core::{AccessToken, NodeKind, PollingConfig, SessionState, UserSession};
use atelier_interface::{InMemoryCreditLedger, RecordingNotifier, StaticSession};
use atelier_node::{Collaborators, NodeController};
pub use mock_endpoint::{MockEndpoint, MockStatus};
use std::sync::Arc;

/// Everything a test needs to drive and inspect one node.
pub struct Harness {
    pub node: Arc<NodeController<MockEndpoint>>,
    pub endpoint: Arc<MockEndpoint>,
    pub session: StaticSession,
    pub ledger: InMemoryCreditLedger,
    pub notifier: RecordingNotifier,
}

/// A signed-in session with a fixed token.
pub fn signed_in() -> SessionState {
    SessionState::signed_in(UserSession::new(
        "user-1",
        Some("artist@example.com".to_string()),
        AccessToken::new("test-token"),
    ))
}

/// Builds a node of `kind` over `endpoint` with `credits` available.
pub fn harness(kind: NodeKind, endpoint: MockEndpoint, credits: u32) -> Harness {
    harness_with(kind, endpoint, credits, signed_in(), PollingConfig::default())
}

/// Builds a node with full control over session and polling.
pub fn harness_with(
    kind: NodeKind,
    endpoint: MockEndpoint,
    credits: u32,
    session: SessionState,
    polling: PollingConfig,
) -> Harness {
    let endpoint = Arc::new(endpoint);
    let session = StaticSession::new(session);
    let ledger = InMemoryCreditLedger::new(credits);
    let notifier = RecordingNotifier::new();

    let collaborators = Collaborators::new(
        Arc::new(session.clone()),
        Arc::new(ledger.clone()),
        Arc::new(notifier.clone()),
    );
    let node = Arc::new(NodeController::new(
        kind,
        endpoint.clone(),
        collaborators,
        polling,
    ));

    Harness {
        node,
        endpoint,
        session,
        ledger,
        notifier,
    }
}
