//! Display content derived from request state.

use atelier_core::{Artifact, GenerationParameters, GenerationRequest, GenerationStatus, NodeKind};
use serde::Serialize;
use std::fmt;

/// What a node shows for a given request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct NodeView {
    /// Status the view was rendered from
    status: GenerationStatus,
    /// Placeholder shown before anything is generated
    placeholder: Option<String>,
    /// Spinner label while work is in flight
    spinner: Option<String>,
    /// Generated content
    artifact: Option<Artifact>,
    /// Error shown after a failure
    error: Option<String>,
    /// Whether the generate button accepts a click
    #[getter(skip)]
    can_generate: bool,
}

impl NodeView {
    /// Whether the generate button accepts a click.
    pub fn can_generate(&self) -> bool {
        self.can_generate
    }
}

/// Maps the form and request state to display content.
///
/// Pure: the same inputs always render the same view. The generate button
/// is enabled only when nothing is in flight and the form passes the kind's
/// input check.
///
/// # Examples
///
/// ```
/// use atelier_core::{GenerationParameters, GenerationRequest, NodeKind};
/// use atelier_node::render;
///
/// let form = GenerationParameters::for_kind(NodeKind::Image).with_prompt("a cat");
/// let view = render(NodeKind::Image, &form, &GenerationRequest::submitting());
/// assert_eq!(view.spinner().as_deref(), Some("Generating image..."));
/// assert!(!view.can_generate());
/// ```
pub fn render(kind: NodeKind, form: &GenerationParameters, state: &GenerationRequest) -> NodeView {
    let status = *state.status();
    let mut view = NodeView {
        status,
        placeholder: None,
        spinner: None,
        artifact: None,
        error: None,
        can_generate: !status.is_in_flight() && kind.check_input(form).is_ok(),
    };

    match status {
        GenerationStatus::Idle => {
            view.placeholder = Some(placeholder(kind).to_string());
        }
        GenerationStatus::Submitting => {
            view.spinner = Some(format!("Generating {}...", kind.noun()));
        }
        GenerationStatus::Polling => {
            let attempts = *state.attempt_count();
            view.spinner = Some(if attempts == 0 {
                format!("Generating {}... (queued)", kind.noun())
            } else {
                format!("Generating {}... (check {})", kind.noun(), attempts)
            });
        }
        GenerationStatus::Completed => {
            view.artifact = state.result().clone();
        }
        GenerationStatus::Failed => {
            view.error = state.error_message().clone();
        }
    }

    view
}

fn placeholder(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Text => "Your generated text will appear here",
        NodeKind::Image => "Your generated image will appear here",
        NodeKind::Video => "Add at least 2 images to generate a video",
    }
}

impl fmt::Display for NodeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.status)?;
        if let Some(spinner) = &self.spinner {
            write!(f, " {}", spinner)?;
        }
        if let Some(placeholder) = &self.placeholder {
            write!(f, " {}", placeholder)?;
        }
        if let Some(artifact) = &self.artifact {
            write!(f, " {}", artifact.value())?;
        }
        if let Some(error) = &self.error {
            write!(f, " {}", error)?;
        }
        Ok(())
    }
}
