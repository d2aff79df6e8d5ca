//! Node state echoed back into the shared canvas.

use crate::{Artifact, GenerationParameters, NodeKind};
use serde::{Deserialize, Serialize};

/// Serializable snapshot of a node, as stored by the canvas.
///
/// Missing fields fall back to the kind's form defaults when a node is
/// restored.
///
/// # Examples
///
/// ```
/// use atelier_core::{NodeData, NodeKind};
///
/// let data: NodeData = serde_json::from_str(r#"{ "kind": "image" }"#).unwrap();
/// let restored = data.parameters_or_default();
/// assert_eq!(restored.model_id(), "fal-ai/ideogram/v2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Node kind
    kind: NodeKind,
    /// Form parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<GenerationParameters>,
    /// Last generated artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact: Option<Artifact>,
    /// Header block type label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_type: Option<String>,
    /// Header model label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model_name: Option<String>,
}

impl NodeData {
    /// Snapshot of a node's current form and output.
    pub fn snapshot(
        kind: NodeKind,
        parameters: &GenerationParameters,
        artifact: Option<&Artifact>,
    ) -> Self {
        Self {
            kind,
            parameters: Some(parameters.clone()),
            artifact: artifact.cloned(),
            block_type: Some(kind.block_type().to_string()),
            model_name: Some(kind.model_display_name(parameters.model_id())),
        }
    }

    /// Empty data for a freshly placed node.
    pub fn empty(kind: NodeKind) -> Self {
        Self {
            kind,
            parameters: None,
            artifact: None,
            block_type: None,
            model_name: None,
        }
    }

    /// Stored parameters with the kind's form defaults filled in per field.
    pub fn parameters_or_default(&self) -> GenerationParameters {
        match &self.parameters {
            Some(stored) => stored.clone().with_defaults_for(self.kind),
            None => GenerationParameters::for_kind(self.kind),
        }
    }

    /// Stored block type, or the kind's label.
    pub fn block_type_or_default(&self) -> String {
        self.block_type
            .clone()
            .unwrap_or_else(|| self.kind.block_type().to_string())
    }
}
