//! Node kinds and their capability descriptors.
//!
//! The text, image and video nodes share one lifecycle. Everything that
//! differs between them (cost, input rules, request input, how the artifact
//! is found in a response body) is dispatched on [`NodeKind`].

use crate::{Artifact, CreditMetadata, GenerationParameters};
use atelier_error::PreflightFailure;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Number of image slots on a video node.
pub const MAX_IMAGE_SLOTS: usize = 9;

/// Minimum provided images for a video submission.
pub const MIN_VIDEO_IMAGES: usize = 2;

/// Content kind of a generation node.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NodeKind {
    /// Text-to-text node
    #[display("text")]
    Text,
    /// Text-to-image node
    #[display("image")]
    Image,
    /// Images-to-video node
    #[display("video")]
    Video,
}

impl NodeKind {
    /// Credits debited per submission.
    pub fn cost(&self) -> u32 {
        match self {
            NodeKind::Text | NodeKind::Image => 1,
            NodeKind::Video => 2,
        }
    }

    /// Label the credits collaborator files the debit under.
    pub fn credit_label(&self) -> &'static str {
        (*self).into()
    }

    /// Model used when the node has not picked one.
    pub fn default_model(&self) -> &'static str {
        match self {
            NodeKind::Text => "openai/gpt-4o-mini",
            NodeKind::Image => "fal-ai/ideogram/v2",
            NodeKind::Video => "fal-ai/stable-video",
        }
    }

    /// Block type shown in the node header.
    pub fn block_type(&self) -> &'static str {
        match self {
            NodeKind::Text => "TEXT",
            NodeKind::Image => "IMAGE",
            NodeKind::Video => "VIDEO",
        }
    }

    /// Human-readable name for a model id, falling back to the id itself.
    pub fn model_display_name(&self, model_id: &str) -> String {
        match model_id {
            "openai/gpt-4o-mini" => "GPT-4o Mini".to_string(),
            "fal-ai/ideogram/v2" => "Ideogram v2".to_string(),
            "fal-ai/stable-video" => "SVD 1.1".to_string(),
            other => other.to_string(),
        }
    }

    /// Noun used in user-facing messages ("image", "video", "text").
    pub fn noun(&self) -> &'static str {
        (*self).into()
    }

    /// Checks that the parameters carry the input this kind needs.
    ///
    /// # Errors
    ///
    /// Returns the pre-flight failure describing the missing or excess input.
    pub fn check_input(&self, params: &GenerationParameters) -> Result<(), PreflightFailure> {
        match self {
            NodeKind::Text | NodeKind::Image => {
                if params.prompt().trim().is_empty() {
                    return Err(PreflightFailure::IncompleteInput(
                        "Please enter a prompt".to_string(),
                    ));
                }
            }
            NodeKind::Video => {
                let slots = params.image_inputs().len();
                if slots > MAX_IMAGE_SLOTS {
                    return Err(PreflightFailure::TooManyInputs {
                        max: MAX_IMAGE_SLOTS,
                        provided: slots,
                    });
                }
                if params.provided_images().len() < MIN_VIDEO_IMAGES {
                    return Err(PreflightFailure::IncompleteInput(format!(
                        "Please provide at least {} images",
                        MIN_VIDEO_IMAGES
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the `input` object sent to the generation endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::{AspectRatio, GenerationParameters, NodeKind, Style};
    ///
    /// let params = GenerationParameters::builder()
    ///     .prompt("a cat")
    ///     .model_id("fal-ai/ideogram/v2")
    ///     .aspect_ratio(AspectRatio::Widescreen)
    ///     .style(Style::Anime)
    ///     .build()
    ///     .unwrap();
    ///
    /// let input = NodeKind::Image.request_input(&params);
    /// assert_eq!(input["aspect_ratio"], "16:9");
    /// assert_eq!(input["expand_prompt"], true);
    /// ```
    pub fn request_input(&self, params: &GenerationParameters) -> Value {
        let mut input = Map::new();
        match self {
            NodeKind::Text => {
                input.insert("prompt".into(), json!(params.prompt()));
            }
            NodeKind::Image => {
                input.insert("prompt".into(), json!(params.prompt()));
                if let Some(negative) = params.negative_prompt().as_deref() {
                    if !negative.trim().is_empty() {
                        input.insert("negative_prompt".into(), json!(negative));
                    }
                }
                if let Some(ratio) = params.aspect_ratio() {
                    input.insert("aspect_ratio".into(), json!(ratio));
                }
                if let Some(style) = params.style() {
                    input.insert("style".into(), json!(style));
                }
                input.insert("expand_prompt".into(), json!(true));
            }
            NodeKind::Video => {
                if !params.prompt().trim().is_empty() {
                    input.insert("prompt".into(), json!(params.prompt()));
                }
                input.insert("image_urls".into(), json!(params.provided_images()));
            }
        }
        Value::Object(input)
    }

    /// Finds this kind's artifact in a response body.
    ///
    /// Text looks at `data.output` then `output`; image at `images[0].url`;
    /// video at `video.url` then `videos[0].url`. Empty strings do not count.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::{Artifact, NodeKind};
    /// use serde_json::json;
    ///
    /// let body = json!({ "images": [{ "url": "https://x/img.png" }] });
    /// assert_eq!(
    ///     NodeKind::Image.extract_artifact(&body),
    ///     Some(Artifact::ImageUrl("https://x/img.png".to_string()))
    /// );
    /// assert_eq!(NodeKind::Video.extract_artifact(&body), None);
    /// ```
    pub fn extract_artifact(&self, body: &Value) -> Option<Artifact> {
        let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);
        match self {
            NodeKind::Text => body
                .pointer("/data/output")
                .and_then(non_empty)
                .or_else(|| body.get("output").and_then(non_empty))
                .map(Artifact::Text),
            NodeKind::Image => body
                .pointer("/images/0/url")
                .and_then(non_empty)
                .map(Artifact::ImageUrl),
            NodeKind::Video => body
                .pointer("/video/url")
                .and_then(non_empty)
                .or_else(|| body.pointer("/videos/0/url").and_then(non_empty))
                .map(Artifact::VideoUrl),
        }
    }

    /// Message used when a completed response carries no artifact.
    pub fn missing_artifact_message(&self) -> &'static str {
        match self {
            NodeKind::Text => "No output received",
            NodeKind::Image => "No image URL received",
            NodeKind::Video => "No video URL received",
        }
    }

    /// Metadata attached to the credit debit for a submission.
    pub fn credit_metadata(&self, params: &GenerationParameters) -> CreditMetadata {
        let base = CreditMetadata::new(params.prompt_excerpt());
        match self {
            NodeKind::Text => base.with_model(params.model_id().clone()),
            NodeKind::Image => base
                .with_style(*params.style())
                .with_aspect_ratio(*params.aspect_ratio()),
            NodeKind::Video => base.with_image_count(Some(params.provided_images().len())),
        }
    }
}
