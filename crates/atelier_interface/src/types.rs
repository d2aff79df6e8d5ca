//! Types exchanged with the collaborators.

use atelier_core::{Artifact, CreditMetadata, NodeKind, RequestId};
use serde::{Deserialize, Serialize};

/// What the generation endpoint answered to a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The artifact came back immediately
    Complete(Artifact),
    /// An asynchronous job was queued
    Pending(RequestId),
}

/// Job status reported by the polling endpoint.
///
/// Statuses other than `COMPLETED` and `FAILED` are kept verbatim and
/// treated as "still running".
///
/// # Examples
///
/// ```
/// use atelier_interface::JobStatus;
///
/// assert_eq!(JobStatus::from("COMPLETED"), JobStatus::Completed);
/// assert_eq!(JobStatus::from("IN_QUEUE"), JobStatus::Other("IN_QUEUE".to_string()));
/// assert!(!JobStatus::from("IN_PROGRESS").is_terminal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum JobStatus {
    /// Job finished
    #[display("COMPLETED")]
    Completed,
    /// Job failed server-side
    #[display("FAILED")]
    Failed,
    /// Any other status string
    #[display("{}", _0)]
    Other(String),
}

impl JobStatus {
    /// Whether the status ends the job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl From<&str> for JobStatus {
    fn from(status: &str) -> Self {
        match status {
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

/// One status check's answer.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct JobStatusReport {
    /// Reported status
    status: JobStatus,
    /// Artifact found in the result, if any
    artifact: Option<Artifact>,
}

impl JobStatusReport {
    /// Creates a report.
    pub fn new(status: JobStatus, artifact: Option<Artifact>) -> Self {
        Self { status, artifact }
    }

    /// A job that is still running under `status`.
    pub fn running(status: impl Into<String>) -> Self {
        Self::new(JobStatus::Other(status.into()), None)
    }

    /// A completed job with its artifact.
    pub fn completed(artifact: Artifact) -> Self {
        Self::new(JobStatus::Completed, Some(artifact))
    }

    /// A failed job.
    pub fn failed() -> Self {
        Self::new(JobStatus::Failed, None)
    }

    /// The artifact, when the job completed with one.
    pub fn finished_artifact(&self) -> Option<&Artifact> {
        match self.status {
            JobStatus::Completed => self.artifact.as_ref(),
            _ => None,
        }
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum NotificationLevel {
    /// Something worked
    #[display("success")]
    Success,
    /// Something failed
    #[display("error")]
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Notification {
    /// Severity
    level: NotificationLevel,
    /// Short title
    title: String,
    /// Longer description
    description: Option<String>,
}

impl Notification {
    /// A success notification.
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: None,
        }
    }

    /// An error notification.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: Some(description.into()),
        }
    }
}

/// A debit recorded by the in-memory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CreditDebit {
    /// Node kind charged
    kind: NodeKind,
    /// Credits taken
    amount: u32,
    /// Metadata the caller attached
    metadata: CreditMetadata,
}

impl CreditDebit {
    /// Records a debit.
    pub fn new(kind: NodeKind, amount: u32, metadata: CreditMetadata) -> Self {
        Self {
            kind,
            amount,
            metadata,
        }
    }
}
