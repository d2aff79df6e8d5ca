//! Mock generation endpoint for testing.

use async_trait::async_trait;
use atelier_core::{AccessToken, Artifact, GenerationParameters, NodeKind, RequestId};
use atelier_error::{GenerationError, GenerationErrorKind, GenerationResult};
use atelier_interface::{GenerationEndpoint, JobStatus, JobStatusReport, Submission};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A scripted answer to one status check.
#[derive(Debug, Clone)]
pub enum MockStatus {
    /// Non-terminal status string
    Running(String),
    /// COMPLETED with an artifact
    Completed(Artifact),
    /// COMPLETED with no usable artifact
    CompletedEmpty,
    /// FAILED
    Failed,
    /// The call itself fails
    Error(GenerationErrorKind),
}

/// A scripted answer to one submit call.
#[derive(Debug, Clone)]
struct MockSubmit {
    delay: Duration,
    response: Result<Submission, GenerationErrorKind>,
}

/// Mock endpoint with scripted responses and call counters.
///
/// Scripts are consumed in order; the last entry repeats once the script
/// runs out.
pub struct MockEndpoint {
    submits: Mutex<VecDeque<MockSubmit>>,
    statuses: Mutex<VecDeque<MockStatus>>,
    submit_calls: Arc<Mutex<usize>>,
    status_calls: Arc<Mutex<Vec<Instant>>>,
    submitted_prompts: Arc<Mutex<Vec<String>>>,
    seen_tokens: Arc<Mutex<Vec<String>>>,
}

impl MockEndpoint {
    /// Endpoint with nothing scripted yet.
    pub fn new() -> Self {
        Self {
            submits: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            submit_calls: Arc::new(Mutex::new(0)),
            status_calls: Arc::new(Mutex::new(Vec::new())),
            submitted_prompts: Arc::new(Mutex::new(Vec::new())),
            seen_tokens: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Submit returns the artifact immediately.
    pub fn new_complete(artifact: Artifact) -> Self {
        Self::new().then_submit(Ok(Submission::Complete(artifact)))
    }

    /// Submit queues a job; status checks follow `statuses`.
    pub fn new_pending(request_id: &str, statuses: Vec<MockStatus>) -> Self {
        let mock = Self::new().then_submit(Ok(Submission::Pending(RequestId::new(request_id))));
        *mock.statuses.lock().unwrap() = statuses.into();
        mock
    }

    /// Submit fails with `error`.
    pub fn new_error(error: GenerationErrorKind) -> Self {
        Self::new().then_submit(Err(error))
    }

    /// Appends a submit response.
    pub fn then_submit(self, response: Result<Submission, GenerationErrorKind>) -> Self {
        self.then_submit_after(Duration::ZERO, response)
    }

    /// Appends a submit response that arrives after `delay`.
    pub fn then_submit_after(
        self,
        delay: Duration,
        response: Result<Submission, GenerationErrorKind>,
    ) -> Self {
        self.submits
            .lock()
            .unwrap()
            .push_back(MockSubmit { delay, response });
        self
    }

    /// Number of submit calls.
    pub fn submit_count(&self) -> usize {
        *self.submit_calls.lock().unwrap()
    }

    /// Number of status calls.
    pub fn status_count(&self) -> usize {
        self.status_calls.lock().unwrap().len()
    }

    /// When each status call happened.
    pub fn status_times(&self) -> Vec<Instant> {
        self.status_calls.lock().unwrap().clone()
    }

    /// Prompts seen by submit, in order.
    pub fn submitted_prompts(&self) -> Vec<String> {
        self.submitted_prompts.lock().unwrap().clone()
    }

    /// Tokens seen on any call.
    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl GenerationEndpoint for MockEndpoint {
    async fn submit(
        &self,
        _kind: NodeKind,
        params: &GenerationParameters,
        token: &AccessToken,
    ) -> GenerationResult<Submission> {
        *self.submit_calls.lock().unwrap() += 1;
        self.submitted_prompts
            .lock()
            .unwrap()
            .push(params.prompt().clone());
        self.seen_tokens
            .lock()
            .unwrap()
            .push(token.expose().to_string());

        let scripted = Self::next(&self.submits)
            .ok_or_else(|| GenerationError::remote(None, "No scripted submit response"))?;
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.response.map_err(GenerationError::new)
    }

    async fn check_status(
        &self,
        _kind: NodeKind,
        _request_id: &RequestId,
        token: &AccessToken,
    ) -> GenerationResult<JobStatusReport> {
        self.status_calls.lock().unwrap().push(Instant::now());
        self.seen_tokens
            .lock()
            .unwrap()
            .push(token.expose().to_string());

        let status = Self::next(&self.statuses)
            .unwrap_or_else(|| MockStatus::Running("IN_QUEUE".to_string()));
        match status {
            MockStatus::Running(status) => Ok(JobStatusReport::running(status)),
            MockStatus::Completed(artifact) => Ok(JobStatusReport::completed(artifact)),
            MockStatus::CompletedEmpty => Ok(JobStatusReport::new(JobStatus::Completed, None)),
            MockStatus::Failed => Ok(JobStatusReport::failed()),
            MockStatus::Error(kind) => Err(GenerationError::new(kind)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
