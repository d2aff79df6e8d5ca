//! fal proxy request and response bodies.

use atelier_core::{GenerationParameters, NodeKind, RequestId};
use atelier_error::{GenerationError, GenerationResult};
use atelier_interface::{JobStatus, JobStatusReport, Submission};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback when a failed response carries no usable message.
const GENERIC_FAILURE: &str = "Generation request failed";

/// Body of a submit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct FalSubmitRequest {
    /// Model identifier (e.g., "fal-ai/ideogram/v2")
    model_id: String,
    /// Kind-specific model input
    input: Value,
}

impl FalSubmitRequest {
    /// Creates a new builder for `FalSubmitRequest`.
    pub fn builder() -> FalSubmitRequestBuilder {
        FalSubmitRequestBuilder::default()
    }

    /// The submit body for a node of `kind` with form `params`.
    pub fn for_node(kind: NodeKind, params: &GenerationParameters) -> Self {
        Self {
            model_id: params.model_id().clone(),
            input: kind.request_input(params),
        }
    }
}

/// Body of a status call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct FalPollRequest {
    /// Job to ask about
    request_id: String,
}

impl FalPollRequest {
    /// Creates a poll body for `request_id`.
    pub fn new(request_id: &RequestId) -> Self {
        Self {
            request_id: request_id.as_str().to_string(),
        }
    }
}

/// Status response from the poll function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct FalStatusBody {
    /// Job status (`IN_QUEUE`, `IN_PROGRESS`, `COMPLETED`, `FAILED`); may be absent
    #[serde(default)]
    status: Option<Value>,
    /// Model output once completed
    #[serde(default)]
    result: Option<Value>,
}

impl FalStatusBody {
    /// The status as reported. A missing, null or non-string status is an
    /// unrecognised, non-terminal one.
    pub fn job_status(&self) -> JobStatus {
        match &self.status {
            Some(Value::String(status)) => JobStatus::from(status.as_str()),
            Some(Value::Null) | None => JobStatus::Other(String::new()),
            Some(other) => JobStatus::Other(other.to_string()),
        }
    }
}

/// Pulls a user-facing message out of a failed response body.
///
/// Tries the JSON `error` and `message` fields, then the raw text.
///
/// # Examples
///
/// ```
/// use atelier_models::remote_error_message;
///
/// assert_eq!(remote_error_message(r#"{"error":"Quota exceeded"}"#), "Quota exceeded");
/// assert_eq!(remote_error_message("Bad gateway"), "Bad gateway");
/// assert_eq!(remote_error_message(""), "Generation request failed");
/// ```
pub fn remote_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let field = ["error", "message"]
            .iter()
            .filter_map(|key| json.get(*key).and_then(Value::as_str))
            .find(|message| !message.trim().is_empty());
        if let Some(message) = field {
            return message.to_string();
        }
        if json.is_object() {
            return GENERIC_FAILURE.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Interprets a successful submit response.
///
/// A `requestId` means the job was queued. Otherwise the artifact must be
/// in the body.
///
/// # Errors
///
/// A remote failure for non-JSON bodies and bodies carrying neither a job
/// id nor an artifact.
pub fn parse_submit_body(kind: NodeKind, body: &str) -> GenerationResult<Submission> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Submit response was not valid JSON");
        GenerationError::remote(None, "Invalid response from generation service")
    })?;

    if let Some(request_id) = json
        .get("requestId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
    {
        return Ok(Submission::Pending(RequestId::new(request_id)));
    }

    kind.extract_artifact(&json)
        .map(Submission::Complete)
        .ok_or_else(|| GenerationError::remote(None, kind.missing_artifact_message()))
}

/// Interprets a successful status response.
///
/// # Errors
///
/// A remote failure for bodies that are not a status object.
pub fn parse_status_body(kind: NodeKind, body: &str) -> GenerationResult<JobStatusReport> {
    let parsed: FalStatusBody = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Status response could not be parsed");
        GenerationError::remote(None, "Invalid status response from generation service")
    })?;

    let artifact = parsed
        .result
        .as_ref()
        .and_then(|result| kind.extract_artifact(result));

    Ok(JobStatusReport::new(parsed.job_status(), artifact))
}
