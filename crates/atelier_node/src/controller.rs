//! The per-node generation controller.

use crate::poller::{PollAttempt, PollObserver, PollOutcome, PollingController};
use crate::preflight::{failure_notification, preflight, success_notification};
use crate::view::{NodeView, render};
use atelier_core::{
    Artifact, AspectRatio, GenerationParameters, GenerationRequest, NodeData, NodeKind,
    PollingConfig, Style, SubmissionId,
};
use atelier_error::{BuilderError, GenerationError, GenerationErrorKind, TransitionError};
use atelier_interface::{
    CreditLedger, GenerationEndpoint, Notifier, SessionProvider, Submission,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, broadcast, watch};
use tracing::{debug, error, info, instrument, warn};

/// Buffered transitions per subscriber before it starts lagging.
const TRANSITION_BUFFER: usize = 64;

/// External services a node depends on.
#[derive(Clone)]
pub struct Collaborators {
    session: Arc<dyn SessionProvider>,
    ledger: Arc<dyn CreditLedger>,
    notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Bundles the session, credits and notification collaborators.
    pub fn new(
        session: Arc<dyn SessionProvider>,
        ledger: Arc<dyn CreditLedger>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            ledger,
            notifier,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Drives one node's generation requests.
///
/// Form edits and submissions take `&self`, so a host can share the
/// controller behind an `Arc` and submit from a spawned task. A newer
/// submission supersedes an older one: the older one's outcome is dropped
/// and never reaches the published state. After [`unmount`](Self::unmount)
/// nothing is published and in-flight polling stops before its next attempt.
pub struct NodeController<E: GenerationEndpoint + ?Sized> {
    kind: NodeKind,
    endpoint: Arc<E>,
    collaborators: Collaborators,
    poller: PollingController,
    parameters: RwLock<GenerationParameters>,
    state: watch::Sender<GenerationRequest>,
    transitions: broadcast::Sender<GenerationRequest>,
    mounted: AtomicBool,
}

impl<E: GenerationEndpoint + ?Sized> NodeController<E> {
    /// Creates a fresh node with the kind's default form.
    pub fn new(
        kind: NodeKind,
        endpoint: Arc<E>,
        collaborators: Collaborators,
        polling: PollingConfig,
    ) -> Self {
        Self::with_state(
            kind,
            endpoint,
            collaborators,
            polling,
            GenerationParameters::for_kind(kind),
            GenerationRequest::idle(),
        )
    }

    /// Restores a node from canvas data.
    ///
    /// A stored artifact comes back as a completed request.
    pub fn from_node_data(
        data: &NodeData,
        endpoint: Arc<E>,
        collaborators: Collaborators,
        polling: PollingConfig,
    ) -> Self {
        let state = match data.artifact() {
            Some(artifact) => GenerationRequest::restored(artifact.clone()),
            None => GenerationRequest::idle(),
        };
        Self::with_state(
            *data.kind(),
            endpoint,
            collaborators,
            polling,
            data.parameters_or_default(),
            state,
        )
    }

    fn with_state(
        kind: NodeKind,
        endpoint: Arc<E>,
        collaborators: Collaborators,
        polling: PollingConfig,
        parameters: GenerationParameters,
        state: GenerationRequest,
    ) -> Self {
        let (state, _) = watch::channel(state);
        let (transitions, _) = broadcast::channel(TRANSITION_BUFFER);
        Self {
            kind,
            endpoint,
            collaborators,
            poller: PollingController::new(polling),
            parameters: RwLock::new(parameters),
            state,
            transitions,
            mounted: AtomicBool::new(true),
        }
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Current form parameters.
    pub async fn parameters(&self) -> GenerationParameters {
        self.parameters.read().await.clone()
    }

    /// Current request state.
    pub fn state(&self) -> GenerationRequest {
        self.state.borrow().clone()
    }

    /// Current form and state rendered for display.
    pub async fn view(&self) -> NodeView {
        let form = self.parameters.read().await;
        render(self.kind, &form, &self.state.borrow())
    }

    /// Watches the latest state.
    ///
    /// Intermediate states may be skipped by a slow reader; use
    /// [`transitions`](Self::transitions) to see every one.
    pub fn subscribe(&self) -> watch::Receiver<GenerationRequest> {
        self.state.subscribe()
    }

    /// Receives every published transition, in order.
    pub fn transitions(&self) -> broadcast::Receiver<GenerationRequest> {
        self.transitions.subscribe()
    }

    /// Snapshot for the canvas.
    pub async fn node_data(&self) -> NodeData {
        let parameters = self.parameters.read().await;
        let state = self.state.borrow();
        NodeData::snapshot(self.kind, &parameters, state.result().as_ref())
    }

    /// Whether the node is still on the canvas.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Detaches the node. In-flight work is abandoned and nothing more is
    /// published.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        debug!("Node unmounted");
    }

    /// Replaces the prompt.
    pub async fn set_prompt(&self, prompt: impl Into<String>) {
        let mut params = self.parameters.write().await;
        *params = params.clone().with_prompt(prompt);
    }

    /// Replaces the negative prompt.
    pub async fn set_negative_prompt(&self, negative_prompt: Option<String>) {
        let mut params = self.parameters.write().await;
        *params = params.clone().with_negative_prompt(negative_prompt);
    }

    /// Replaces the aspect ratio.
    pub async fn set_aspect_ratio(&self, aspect_ratio: AspectRatio) {
        let mut params = self.parameters.write().await;
        *params = params.clone().with_aspect_ratio(Some(aspect_ratio));
    }

    /// Replaces the style.
    pub async fn set_style(&self, style: Style) {
        let mut params = self.parameters.write().await;
        *params = params.clone().with_style(Some(style));
    }

    /// Replaces the model id.
    pub async fn set_model(&self, model_id: impl Into<String>) {
        let mut params = self.parameters.write().await;
        *params = params.clone().with_model_id(model_id);
    }

    /// Fills or clears one image slot.
    ///
    /// # Errors
    ///
    /// Returns an error for a slot index past the node's capacity.
    pub async fn set_image_slot(&self, index: usize, url: Option<String>) -> Result<(), BuilderError> {
        self.parameters.write().await.set_image_slot(index, url)
    }

    /// Replaces the whole form.
    pub async fn set_parameters(&self, parameters: GenerationParameters) {
        *self.parameters.write().await = parameters;
    }

    /// Runs one submission to a terminal state.
    ///
    /// Returns the state published when this call finished. If a newer
    /// submission superseded this one, that is the newer submission's state.
    #[instrument(skip(self), fields(kind = %self.kind, provider = self.endpoint.provider_name()))]
    pub async fn submit(&self) -> GenerationRequest {
        if !self.is_mounted() {
            warn!("Submit on unmounted node ignored");
            return self.state();
        }

        let params = self.parameters().await;

        let token = match preflight(
            self.kind,
            &params,
            self.collaborators.session.as_ref(),
            self.collaborators.ledger.as_ref(),
        )
        .await
        {
            Ok(token) => token,
            Err(reason) => {
                let kind = GenerationErrorKind::Preflight(reason);
                info!(reason = %kind, "Submission rejected before network call");
                self.publish(GenerationRequest::rejected(&kind));
                self.collaborators
                    .notifier
                    .notify(failure_notification(self.kind, &kind));
                return self.state();
            }
        };

        let (submission, request) = GenerationRequest::start();
        info!(submission = %submission, model = %params.model_id(), "Submitting generation");
        self.publish(request);

        match self.endpoint.submit(self.kind, &params, &token).await {
            Ok(Submission::Complete(artifact)) => {
                debug!("Synchronous result");
                self.finish_completed(submission, artifact);
            }
            Ok(Submission::Pending(request_id)) => {
                debug!(request_id = %request_id, "Job queued, polling");
                if !self.update_current(submission, |r| r.begin_polling(request_id.clone())) {
                    return self.state();
                }
                let mut observer = SubmissionObserver {
                    controller: self,
                    submission,
                };
                match self
                    .poller
                    .run(
                        self.endpoint.as_ref(),
                        self.kind,
                        &request_id,
                        &token,
                        &mut observer,
                    )
                    .await
                {
                    Ok(PollOutcome::Completed(artifact)) => {
                        self.finish_completed(submission, artifact);
                    }
                    Ok(PollOutcome::Abandoned) => {
                        debug!(submission = %submission, "Polling abandoned");
                    }
                    Err(e) => self.finish_failed(submission, &e),
                }
            }
            Err(e) => self.finish_failed(submission, &e),
        }

        self.state()
    }

    fn finish_completed(&self, submission: SubmissionId, artifact: Artifact) {
        if self.update_current(submission, |r| r.complete(artifact)) {
            info!(submission = %submission, "Generation completed");
            self.collaborators
                .notifier
                .notify(success_notification(self.kind));
        } else {
            debug!(submission = %submission, "Dropped stale completion");
        }
    }

    fn finish_failed(&self, submission: SubmissionId, error: &GenerationError) {
        if self.update_current(submission, |r| r.fail(&error.kind)) {
            error!(submission = %submission, error = %error, "Generation failed");
            self.collaborators
                .notifier
                .notify(failure_notification(self.kind, &error.kind));
        } else {
            debug!(submission = %submission, error = %error, "Dropped stale failure");
        }
    }

    /// Publishes a new submission's first state, superseding any other.
    fn publish(&self, request: GenerationRequest) {
        if !self.is_mounted() {
            return;
        }
        debug!(status = %request.status(), "State transition");
        let _ = self.transitions.send(request.clone());
        self.state.send_replace(request);
    }

    /// Applies a transition if `submission` is still the node's current one.
    fn update_current<F>(&self, submission: SubmissionId, apply: F) -> bool
    where
        F: FnOnce(&mut GenerationRequest) -> Result<(), TransitionError>,
    {
        if !self.is_mounted() {
            return false;
        }
        let mut applied = false;
        self.state.send_if_modified(|current| {
            if !current.is_submission(submission) {
                return false;
            }
            match apply(current) {
                Ok(()) => {
                    debug!(status = %current.status(), "State transition");
                    let _ = self.transitions.send(current.clone());
                    applied = true;
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Ignored invalid transition");
                    false
                }
            }
        });
        applied
    }

    fn is_current(&self, submission: SubmissionId) -> bool {
        self.state.borrow().is_submission(submission)
    }
}

struct SubmissionObserver<'a, E: GenerationEndpoint + ?Sized> {
    controller: &'a NodeController<E>,
    submission: SubmissionId,
}

impl<E: GenerationEndpoint + ?Sized> PollObserver for SubmissionObserver<'_, E> {
    fn still_wanted(&self) -> bool {
        self.controller.is_mounted() && self.controller.is_current(self.submission)
    }

    fn on_attempt(&mut self, _attempt: &PollAttempt) {
        self.controller
            .update_current(self.submission, |r| r.record_attempt().map(|_| ()));
    }
}
