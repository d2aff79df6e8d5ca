//! Generation command handler.

use atelier_config::AtelierConfig;
use atelier_core::{
    AccessToken, AspectRatio, GenerationStatus, NodeKind, SessionState, Style, UserSession,
};
use atelier_interface::{InMemoryCreditLedger, StaticSession, TracingNotifier};
use atelier_models::FalClient;
use atelier_node::{Collaborators, NodeController, render};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Environment variable holding the session token.
const TOKEN_VAR: &str = "ATELIER_ACCESS_TOKEN";

/// Form values and ledger seed for one generation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Node kind
    pub kind: NodeKind,
    /// Prompt text
    pub prompt: String,
    /// Negative prompt (image)
    pub negative_prompt: Option<String>,
    /// Aspect ratio (image)
    pub aspect_ratio: Option<AspectRatio>,
    /// Style (image)
    pub style: Option<Style>,
    /// Model override
    pub model: Option<String>,
    /// Image slot URLs (video)
    pub images: Vec<String>,
    /// Starting credit balance
    pub credits: u32,
}

/// Runs one node lifecycle against the configured endpoint.
///
/// Without an access token the session is signed out, so the node fails
/// its pre-flight check like an anonymous canvas user would.
pub async fn run_generate(options: GenerateOptions) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AtelierConfig::load()?;
    let endpoint = Arc::new(FalClient::new(&config.endpoint)?);

    let session = match std::env::var(TOKEN_VAR) {
        Ok(token) if !token.trim().is_empty() => SessionState::signed_in(UserSession::new(
            "cli",
            None,
            AccessToken::new(token),
        )),
        _ => {
            warn!("{} not set; running signed out", TOKEN_VAR);
            SessionState::signed_out()
        }
    };

    let collaborators = Collaborators::new(
        Arc::new(StaticSession::new(session)),
        Arc::new(InMemoryCreditLedger::new(options.credits)),
        Arc::new(TracingNotifier),
    );
    let node = NodeController::new(options.kind, endpoint, collaborators, config.polling);

    node.set_prompt(options.prompt).await;
    node.set_negative_prompt(options.negative_prompt).await;
    if let Some(aspect_ratio) = options.aspect_ratio {
        node.set_aspect_ratio(aspect_ratio).await;
    }
    if let Some(style) = options.style {
        node.set_style(style).await;
    }
    let model = options
        .model
        .unwrap_or_else(|| config.models.model_for(options.kind));
    node.set_model(model).await;
    for (slot, url) in options.images.into_iter().enumerate() {
        node.set_image_slot(slot, Some(url)).await?;
    }

    info!(kind = %options.kind, "Starting generation");
    println!("{}", node.view().await);

    let kind = options.kind;
    let form = node.parameters().await;
    let mut transitions = node.transitions();
    let printer = tokio::spawn(async move {
        loop {
            match transitions.recv().await {
                Ok(request) => println!("{}", render(kind, &form, &request)),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Printer lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let finished = node.submit().await;
    drop(node);
    printer.await?;

    match finished.status() {
        GenerationStatus::Completed => Ok(()),
        status => anyhow::bail!(
            "Generation ended {}: {}",
            status,
            finished.error_message().as_deref().unwrap_or("no result")
        ),
    }
}
