//! The generation request state machine.
//!
//! ```text
//!  Idle ──submit──▶ Submitting ──complete──────────────▶ Completed
//!    │                  │    └──pending──▶ Polling ──┬──▶ Completed
//!    │                  │                            └──▶ Failed
//!    └──rejected────────┴──fail──────────────────────────▶ Failed
//! ```
//!
//! Fields are private so the invariants hold by construction: `result` is
//! present only in `Completed`, `error_message` only in `Failed`, and
//! `attempt_count` only moves while `Polling`.

use crate::{Artifact, RequestId, SubmissionId};
use atelier_error::{FailureCategory, GenerationErrorKind, TransitionError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a generation request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum GenerationStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Initial request in flight
    Submitting,
    /// Waiting on an asynchronous job
    Polling,
    /// Artifact available
    Completed,
    /// Ended with an error
    Failed,
}

impl GenerationStatus {
    /// Whether the status ends a request.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Failed)
    }

    /// Whether network work is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, GenerationStatus::Submitting | GenerationStatus::Polling)
    }
}

/// One unit of generation work from a node.
///
/// # Examples
///
/// ```
/// use atelier_core::{Artifact, GenerationRequest, GenerationStatus, RequestId};
///
/// let mut request = GenerationRequest::submitting();
/// request.begin_polling(RequestId::new("abc")).unwrap();
/// request.record_attempt().unwrap();
/// request.complete(Artifact::ImageUrl("https://x/img.png".into())).unwrap();
///
/// assert_eq!(*request.status(), GenerationStatus::Completed);
/// assert_eq!(*request.attempt_count(), 1);
/// assert!(request.error_message().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, derive_getters::Getters)]
pub struct GenerationRequest {
    /// Local id of the submission; `None` while idle
    submission_id: Option<SubmissionId>,
    /// Server job id, for asynchronous jobs
    request_id: Option<RequestId>,
    /// Current status
    status: GenerationStatus,
    /// Status checks issued so far
    attempt_count: u32,
    /// Artifact, only when completed
    result: Option<Artifact>,
    /// User-facing message, only when failed
    error_message: Option<String>,
    /// Failure class, only when failed
    failure_category: Option<FailureCategory>,
    /// When the submission started
    submitted_at: Option<DateTime<Utc>>,
}

impl GenerationRequest {
    /// A node with nothing submitted.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A fresh submission whose initial request is about to be sent.
    ///
    /// Any previous result or error belongs to the superseded request.
    pub fn submitting() -> Self {
        Self::start().1
    }

    /// Like [`submitting`](Self::submitting), also handing back the new
    /// submission's id.
    pub fn start() -> (SubmissionId, Self) {
        let submission = SubmissionId::new();
        let request = Self {
            submission_id: Some(submission),
            status: GenerationStatus::Submitting,
            submitted_at: Some(Utc::now()),
            ..Self::default()
        };
        (submission, request)
    }

    /// A fresh submission refused before any network call.
    pub fn rejected(kind: &GenerationErrorKind) -> Self {
        Self {
            submission_id: Some(SubmissionId::new()),
            status: GenerationStatus::Failed,
            error_message: Some(kind.user_message()),
            failure_category: Some(kind.category()),
            submitted_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// A completed request rebuilt from a stored artifact.
    pub fn restored(artifact: Artifact) -> Self {
        Self {
            status: GenerationStatus::Completed,
            result: Some(artifact),
            ..Self::default()
        }
    }

    /// Moves a submitted request to polling for `request_id`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the request is `Submitting`.
    pub fn begin_polling(&mut self, request_id: RequestId) -> Result<(), TransitionError> {
        self.expect(&[GenerationStatus::Submitting], GenerationStatus::Polling)?;
        self.status = GenerationStatus::Polling;
        self.request_id = Some(request_id);
        Ok(())
    }

    /// Counts one status check and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns an error unless the request is `Polling`.
    pub fn record_attempt(&mut self) -> Result<u32, TransitionError> {
        self.expect(&[GenerationStatus::Polling], GenerationStatus::Polling)?;
        self.attempt_count += 1;
        Ok(self.attempt_count)
    }

    /// Finishes the request with an artifact.
    ///
    /// # Errors
    ///
    /// Returns an error unless the request is `Submitting` or `Polling`.
    pub fn complete(&mut self, artifact: Artifact) -> Result<(), TransitionError> {
        self.expect(
            &[GenerationStatus::Submitting, GenerationStatus::Polling],
            GenerationStatus::Completed,
        )?;
        self.status = GenerationStatus::Completed;
        self.result = Some(artifact);
        Ok(())
    }

    /// Finishes the request with a failure.
    ///
    /// # Errors
    ///
    /// Returns an error unless the request is `Submitting` or `Polling`.
    pub fn fail(&mut self, kind: &GenerationErrorKind) -> Result<(), TransitionError> {
        self.expect(
            &[GenerationStatus::Submitting, GenerationStatus::Polling],
            GenerationStatus::Failed,
        )?;
        self.status = GenerationStatus::Failed;
        self.error_message = Some(kind.user_message());
        self.failure_category = Some(kind.category());
        Ok(())
    }

    /// Whether this request belongs to `submission`.
    pub fn is_submission(&self, submission: SubmissionId) -> bool {
        self.submission_id == Some(submission)
    }

    fn expect(
        &self,
        allowed: &[GenerationStatus],
        to: GenerationStatus,
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(TransitionError::new(self.status.to_string(), to.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_error::PreflightFailure;

    #[test]
    fn idle_has_no_submission() {
        let idle = GenerationRequest::idle();
        assert_eq!(*idle.status(), GenerationStatus::Idle);
        assert!(idle.submission_id().is_none());
    }

    #[test]
    fn synchronous_completion_skips_polling() {
        let mut request = GenerationRequest::submitting();
        request.complete(Artifact::Text("hi".into())).unwrap();
        assert_eq!(*request.attempt_count(), 0);
        assert!(request.request_id().is_none());
        assert_eq!(request.result(), &Some(Artifact::Text("hi".into())));
    }

    #[test]
    fn attempts_only_count_while_polling() {
        let mut request = GenerationRequest::submitting();
        assert!(request.record_attempt().is_err());
        request.begin_polling("abc".into()).unwrap();
        assert_eq!(request.record_attempt().unwrap(), 1);
        assert_eq!(request.record_attempt().unwrap(), 2);
        request.fail(&GenerationErrorKind::Timeout { attempts: 2 }).unwrap();
        assert!(request.record_attempt().is_err());
        assert_eq!(*request.attempt_count(), 2);
    }

    #[test]
    fn failure_sets_message_and_category_only() {
        let mut request = GenerationRequest::submitting();
        request
            .fail(&GenerationErrorKind::Remote {
                status: Some(500),
                message: "Image generation failed".into(),
            })
            .unwrap();
        assert_eq!(request.error_message().as_deref(), Some("Image generation failed"));
        assert_eq!(*request.failure_category(), Some(FailureCategory::Remote));
        assert!(request.result().is_none());
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        let mut request = GenerationRequest::submitting();
        request.complete(Artifact::Text("done".into())).unwrap();
        assert!(request.complete(Artifact::Text("again".into())).is_err());
        assert!(request.fail(&GenerationErrorKind::Transport("x".into())).is_err());
        assert!(request.begin_polling("late".into()).is_err());
    }

    #[test]
    fn rejected_request_is_failed_without_network_state() {
        let kind = GenerationErrorKind::Preflight(PreflightFailure::NotAuthenticated);
        let request = GenerationRequest::rejected(&kind);
        assert_eq!(*request.status(), GenerationStatus::Failed);
        assert_eq!(*request.failure_category(), Some(FailureCategory::Preflight));
        assert!(request.request_id().is_none());
    }

    #[test]
    fn start_returns_the_request_submission_id() {
        let (submission, request) = GenerationRequest::start();
        assert_eq!(*request.submission_id(), Some(submission));
        assert_eq!(*request.status(), GenerationStatus::Submitting);
        assert!(request.is_submission(submission));
    }

    #[test]
    fn each_submission_gets_a_new_id() {
        let first = GenerationRequest::submitting();
        let second = GenerationRequest::submitting();
        assert_ne!(first.submission_id(), second.submission_id());
        let id = first.submission_id().unwrap();
        assert!(first.is_submission(id));
        assert!(!second.is_submission(id));
    }
}
