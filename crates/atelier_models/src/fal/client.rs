//! fal proxy client using reqwest.

use crate::fal::{FalPollRequest, FalSubmitRequest, parse_status_body, parse_submit_body, remote_error_message};
use async_trait::async_trait;
use atelier_config::EndpointConfig;
use atelier_core::{AccessToken, GenerationParameters, NodeKind, RequestId};
use atelier_error::{AtelierResult, GenerationError, GenerationResult, HttpError};
use atelier_interface::{GenerationEndpoint, JobStatusReport, Submission};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, error, instrument};

/// Message for any non-success status response.
const POLL_FAILURE: &str = "Failed to check generation status";

/// Client for the fal submit and poll functions.
///
/// Every call carries the caller's session token as a bearer credential.
#[derive(Debug, Clone)]
pub struct FalClient {
    client: Client,
    generate_url: String,
    poll_url: String,
}

impl FalClient {
    /// Creates a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be initialized.
    #[instrument(skip_all, fields(base_url = %endpoint.base_url))]
    pub fn new(endpoint: &EndpointConfig) -> AtelierResult<Self> {
        let client = Client::builder()
            .timeout(endpoint.request_timeout())
            .build()
            .map_err(|e| {
                HttpError::new(format!("Failed to build HTTP client: {}", e))
                    .with_url(endpoint.base_url.clone())
            })?;

        debug!("Created fal client");

        Ok(Self::with_client(
            client,
            endpoint.generate_url(),
            endpoint.poll_url(),
        ))
    }

    /// Creates a client from an existing reqwest client and explicit URLs.
    pub fn with_client(
        client: Client,
        generate_url: impl Into<String>,
        poll_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            generate_url: generate_url.into(),
            poll_url: poll_url.into(),
        }
    }

    /// URL of the submit function.
    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }

    /// URL of the poll function.
    pub fn poll_url(&self) -> &str {
        &self.poll_url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        token: &AccessToken,
    ) -> GenerationResult<Response> {
        self.client
            .post(url)
            .bearer_auth(token.expose())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url, "HTTP request failed");
                GenerationError::transport(format!("Request failed: {}", e))
            })
    }

    async fn read_text(response: Response) -> GenerationResult<String> {
        response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read response");
            GenerationError::transport(format!("Failed to read response: {}", e))
        })
    }
}

#[async_trait]
impl GenerationEndpoint for FalClient {
    #[instrument(skip(self, params, token), fields(kind = %kind, model = %params.model_id()))]
    async fn submit(
        &self,
        kind: NodeKind,
        params: &GenerationParameters,
        token: &AccessToken,
    ) -> GenerationResult<Submission> {
        let request = FalSubmitRequest::for_node(kind, params);

        debug!(url = %self.generate_url, "Submitting generation");

        let response = self.post(&self.generate_url, &request, token).await?;
        let status = response.status();
        let body = Self::read_text(response).await?;

        if !status.is_success() {
            error!(status = %status, error = %body, "Generation submit failed");
            return Err(GenerationError::remote(
                Some(status.as_u16()),
                remote_error_message(&body),
            ));
        }

        debug!(response_len = body.len(), "Received submit response");
        parse_submit_body(kind, &body)
    }

    #[instrument(skip(self, token), fields(kind = %kind, request_id = %request_id))]
    async fn check_status(
        &self,
        kind: NodeKind,
        request_id: &RequestId,
        token: &AccessToken,
    ) -> GenerationResult<JobStatusReport> {
        let request = FalPollRequest::new(request_id);

        let response = self.post(&self.poll_url, &request, token).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %body, "Status check failed");
            return Err(GenerationError::remote(Some(status.as_u16()), POLL_FAILURE));
        }

        let body = Self::read_text(response).await?;
        let report = parse_status_body(kind, &body)?;
        debug!(status = %report.status(), "Received job status");
        Ok(report)
    }

    fn provider_name(&self) -> &'static str {
        "fal"
    }
}
