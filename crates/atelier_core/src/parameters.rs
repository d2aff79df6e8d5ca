//! Generation parameters bound to a node's form.

use crate::{MAX_IMAGE_SLOTS, NodeKind};
use atelier_error::BuilderError;
use derive_builder::Builder;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Characters of the prompt kept in credit metadata.
const PROMPT_EXCERPT_CHARS: usize = 100;

/// Output aspect ratios offered by image nodes.
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
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum AspectRatio {
    /// 1:1
    #[default]
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    /// 16:9
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Widescreen,
    /// 9:16
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Vertical,
    /// 4:3
    #[serde(rename = "4:3")]
    #[strum(serialize = "4:3")]
    Standard,
    /// 3:4
    #[serde(rename = "3:4")]
    #[strum(serialize = "3:4")]
    StandardPortrait,
    /// 3:2
    #[serde(rename = "3:2")]
    #[strum(serialize = "3:2")]
    Photo,
    /// 2:3
    #[serde(rename = "2:3")]
    #[strum(serialize = "2:3")]
    PhotoPortrait,
}

/// Rendering styles offered by image nodes.
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
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Style {
    /// Let the model pick
    #[default]
    Auto,
    /// General purpose
    General,
    /// Photorealistic
    Realistic,
    /// Graphic design
    Design,
    /// 3D render
    #[serde(rename = "render_3D")]
    #[strum(serialize = "render_3D")]
    Render3D,
    /// Anime
    Anime,
}

/// Parameters of one generation submission.
///
/// The node edits these through the `with_*` setters; a submission takes a
/// clone, so the submitted copy never changes.
///
/// # Examples
///
/// ```
/// use atelier_core::{AspectRatio, GenerationParameters};
///
/// let params = GenerationParameters::builder()
///     .prompt("A cat astronaut on the moon")
///     .model_id("fal-ai/ideogram/v2")
///     .aspect_ratio(AspectRatio::Square)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.prompt(), "A cat astronaut on the moon");
/// assert!(params.negative_prompt().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters, Setters)]
#[builder(setter(into), build_fn(error = "BuilderError"))]
#[setters(prefix = "with_", into)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    /// User prompt
    #[builder(default)]
    #[serde(default)]
    prompt: String,

    /// Things the image should avoid
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,

    /// Output aspect ratio
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<AspectRatio>,

    /// Rendering style
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<Style>,

    /// Model identifier sent to the endpoint
    #[serde(default)]
    model_id: String,

    /// Image slots (video nodes); `None` is an empty slot
    #[builder(default)]
    #[serde(default)]
    image_inputs: Vec<Option<String>>,
}

impl GenerationParameters {
    /// Creates a new builder for `GenerationParameters`.
    pub fn builder() -> GenerationParametersBuilder {
        GenerationParametersBuilder::default()
    }

    /// Form defaults for a freshly placed node of the given kind.
    ///
    /// Image nodes start at `1:1` / `auto`; video nodes start with all
    /// slots empty.
    pub fn for_kind(kind: NodeKind) -> Self {
        let (aspect_ratio, style, image_inputs) = match kind {
            NodeKind::Text => (None, None, Vec::new()),
            NodeKind::Image => (Some(AspectRatio::default()), Some(Style::default()), Vec::new()),
            NodeKind::Video => (None, None, vec![None; MAX_IMAGE_SLOTS]),
        };
        Self {
            prompt: String::new(),
            negative_prompt: None,
            aspect_ratio,
            style,
            model_id: kind.default_model().to_string(),
            image_inputs,
        }
    }

    /// Fills every field the stored form left unset with the kind's form
    /// default. Set fields are kept as they are.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_core::{AspectRatio, GenerationParameters, NodeKind, Style};
    ///
    /// let stored: GenerationParameters = serde_json::from_str(r#"{ "prompt": "a cat" }"#).unwrap();
    /// let restored = stored.with_defaults_for(NodeKind::Image);
    /// assert_eq!(restored.model_id(), "fal-ai/ideogram/v2");
    /// assert_eq!(*restored.aspect_ratio(), Some(AspectRatio::Square));
    /// assert_eq!(*restored.style(), Some(Style::Auto));
    /// ```
    pub fn with_defaults_for(mut self, kind: NodeKind) -> Self {
        let defaults = Self::for_kind(kind);
        if self.model_id.trim().is_empty() {
            self.model_id = defaults.model_id;
        }
        self.aspect_ratio = self.aspect_ratio.or(defaults.aspect_ratio);
        self.style = self.style.or(defaults.style);
        if self.image_inputs.len() < defaults.image_inputs.len() {
            self.image_inputs.resize(defaults.image_inputs.len(), None);
        }
        self
    }

    /// URLs of the filled image slots, in slot order.
    pub fn provided_images(&self) -> Vec<&str> {
        self.image_inputs
            .iter()
            .filter_map(|slot| slot.as_deref())
            .collect()
    }

    /// Fills or clears one image slot.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is outside the node's slots.
    pub fn set_image_slot(&mut self, index: usize, url: Option<String>) -> Result<(), BuilderError> {
        if index >= MAX_IMAGE_SLOTS {
            return Err(BuilderError::invalid_field(
                "image_inputs",
                format!("slot {} is outside 0..{}", index, MAX_IMAGE_SLOTS),
            ));
        }
        if self.image_inputs.len() <= index {
            self.image_inputs.resize(index + 1, None);
        }
        self.image_inputs[index] = url;
        Ok(())
    }

    /// First 100 characters of the prompt, with `...` when truncated.
    pub fn prompt_excerpt(&self) -> String {
        if self.prompt.chars().count() > PROMPT_EXCERPT_CHARS {
            let head: String = self.prompt.chars().take(PROMPT_EXCERPT_CHARS).collect();
            format!("{}...", head)
        } else {
            self.prompt.clone()
        }
    }
}

/// Details recorded alongside a credit debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_", into)]
#[serde(rename_all = "camelCase")]
pub struct CreditMetadata {
    /// Prompt excerpt
    prompt: String,
    /// Image style
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<Style>,
    /// Image aspect ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<AspectRatio>,
    /// Text model
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    /// Number of images fed to a video
    #[serde(skip_serializing_if = "Option::is_none")]
    image_count: Option<usize>,
}

impl CreditMetadata {
    /// Metadata carrying only a prompt excerpt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: None,
            aspect_ratio: None,
            model: None,
            image_count: None,
        }
    }
}
