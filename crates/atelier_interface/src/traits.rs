//! Trait definitions for the node controller's collaborators.

use crate::{JobStatusReport, Notification, Submission};
use async_trait::async_trait;
use atelier_core::{AccessToken, CreditMetadata, GenerationParameters, NodeKind, RequestId, SessionState};
use atelier_error::GenerationResult;

/// Reports the current user and session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Current session snapshot.
    async fn current_session(&self) -> SessionState;
}

/// Owns the user's credit balance.
///
/// Implementations serialize debits themselves; callers never read the
/// balance and then write it back.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Credits available right now.
    async fn available_credits(&self) -> u32;

    /// Debits `amount` credits for a `kind` generation.
    ///
    /// Returns `true` if the debit happened.
    async fn use_credits(&self, kind: NodeKind, amount: u32, metadata: &CreditMetadata) -> bool;
}

/// Remote inference service reached through submit and status calls.
#[async_trait]
pub trait GenerationEndpoint: Send + Sync {
    /// Submits a generation and returns either the artifact or a job id.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success responses, and bodies carrying
    /// neither an artifact nor a job id.
    async fn submit(
        &self,
        kind: NodeKind,
        params: &GenerationParameters,
        token: &AccessToken,
    ) -> GenerationResult<Submission>;

    /// Asks once for the status of an asynchronous job.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success responses, and malformed bodies.
    async fn check_status(
        &self,
        kind: NodeKind,
        request_id: &RequestId,
        token: &AccessToken,
    ) -> GenerationResult<JobStatusReport>;

    /// Provider name for logs (e.g., "fal").
    fn provider_name(&self) -> &'static str;
}

/// Shows transient notifications (toasts) to the user.
pub trait Notifier: Send + Sync {
    /// Displays a notification.
    fn notify(&self, notification: Notification);
}
