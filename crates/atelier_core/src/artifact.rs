//! Generated artifacts and request identifiers.

use crate::NodeKind;
use serde::{Deserialize, Serialize};

/// Generated content returned by a completed request.
///
/// # Examples
///
/// ```
/// use atelier_core::{Artifact, NodeKind};
///
/// let image = Artifact::ImageUrl("https://x/img.png".to_string());
/// assert_eq!(image.value(), "https://x/img.png");
/// assert_eq!(image.kind(), NodeKind::Image);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Artifact {
    /// Generated text
    Text(String),
    /// URL of a generated image
    ImageUrl(String),
    /// URL of a generated video
    VideoUrl(String),
}

impl Artifact {
    /// The text or URL carried by this artifact.
    pub fn value(&self) -> &str {
        match self {
            Artifact::Text(text) => text,
            Artifact::ImageUrl(url) | Artifact::VideoUrl(url) => url,
        }
    }

    /// Node kind that produces this artifact.
    pub fn kind(&self) -> NodeKind {
        match self {
            Artifact::Text(_) => NodeKind::Text,
            Artifact::ImageUrl(_) => NodeKind::Image,
            Artifact::VideoUrl(_) => NodeKind::Video,
        }
    }
}

/// Server-assigned identifier of an asynchronous job.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a request id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Locally generated identifier of one submission from a node.
///
/// Each submit gets a fresh id; outcomes carrying an older id are stale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct SubmissionId(uuid::Uuid);

impl SubmissionId {
    /// Generates a new random submission id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}
