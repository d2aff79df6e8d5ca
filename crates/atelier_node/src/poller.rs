//! Bounded fixed-interval polling of a queued job.

use atelier_core::{AccessToken, Artifact, NodeKind, PollingConfig, RequestId};
use atelier_error::{GenerationError, GenerationErrorKind, GenerationResult};
use atelier_interface::{GenerationEndpoint, JobStatus};
use tokio_retry2::strategy::FixedInterval;
use tracing::{debug, instrument, warn};

/// One completed status check.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PollAttempt {
    /// 1-based attempt number
    number: u32,
    /// Status the endpoint reported
    status: JobStatus,
}

/// How a polling loop ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job finished with an artifact
    Completed(Artifact),
    /// The caller stopped wanting the result; nothing should be recorded
    Abandoned,
}

/// Receives progress from a polling loop and decides whether it continues.
pub trait PollObserver: Send {
    /// Checked before every attempt and after every response.
    fn still_wanted(&self) -> bool;

    /// Called once per status check, before its outcome is acted on.
    fn on_attempt(&mut self, attempt: &PollAttempt);
}

/// Polls a job until it completes, fails, or runs out of attempts.
///
/// Attempts are strictly sequential. The delay between attempts comes from a
/// fixed-interval schedule, and no delay follows the last attempt.
#[derive(Debug, Clone, Copy)]
pub struct PollingController {
    config: PollingConfig,
}

impl PollingController {
    /// Creates a controller with the given limits.
    pub fn new(config: PollingConfig) -> Self {
        Self { config }
    }

    /// Limits in use.
    pub fn config(&self) -> &PollingConfig {
        &self.config
    }

    /// Runs the loop for `request_id`.
    ///
    /// `COMPLETED` without a usable artifact and unrecognised statuses are
    /// not terminal.
    ///
    /// # Errors
    ///
    /// - the endpoint reports `FAILED` (remote failure)
    /// - a status call fails (transport or remote failure, ends the loop)
    /// - `max_attempts` checks pass without a terminal status (timeout)
    #[instrument(skip(self, endpoint, token, observer), fields(max_attempts = *self.config.max_attempts()))]
    pub async fn run<E, O>(
        &self,
        endpoint: &E,
        kind: NodeKind,
        request_id: &RequestId,
        token: &AccessToken,
        observer: &mut O,
    ) -> GenerationResult<PollOutcome>
    where
        E: GenerationEndpoint + ?Sized,
        O: PollObserver,
    {
        let max_attempts = *self.config.max_attempts();
        let mut delays = FixedInterval::from_millis(*self.config.interval_ms());

        for number in 1..=max_attempts {
            if !observer.still_wanted() {
                debug!(attempt = number, "Polling abandoned before attempt");
                return Ok(PollOutcome::Abandoned);
            }

            let report = endpoint.check_status(kind, request_id, token).await?;

            if !observer.still_wanted() {
                debug!(attempt = number, "Polling abandoned after response");
                return Ok(PollOutcome::Abandoned);
            }

            let attempt = PollAttempt {
                number,
                status: report.status().clone(),
            };
            observer.on_attempt(&attempt);
            debug!(attempt = number, status = %attempt.status, "Status check");

            match report.status() {
                JobStatus::Completed => {
                    if let Some(artifact) = report.finished_artifact() {
                        return Ok(PollOutcome::Completed(artifact.clone()));
                    }
                    warn!(attempt = number, "Completed status without artifact, continuing");
                }
                JobStatus::Failed => {
                    return Err(GenerationError::remote(
                        None,
                        format!("{} generation failed", capitalize(kind.noun())),
                    ));
                }
                JobStatus::Other(_) => {}
            }

            if number < max_attempts {
                if let Some(delay) = delays.next() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        warn!(attempts = max_attempts, "Polling exhausted its attempts");
        Err(GenerationError::new(GenerationErrorKind::Timeout {
            attempts: max_attempts,
        }))
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
