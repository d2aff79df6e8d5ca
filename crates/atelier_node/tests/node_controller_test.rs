//! Lifecycle tests for the node controller.

mod test_utils;

use atelier_core::{
    Artifact, AspectRatio, GenerationParameters, GenerationStatus, NodeData, NodeKind, PollingConfig,
    RequestId, SessionState, Style,
};
use atelier_error::{FailureCategory, GenerationErrorKind};
use atelier_interface::{CreditLedger, NotificationLevel, Submission};
use atelier_node::{Collaborators, NodeController};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockEndpoint, MockStatus, harness, harness_with, signed_in};

fn image(url: &str) -> Artifact {
    Artifact::ImageUrl(url.to_string())
}

#[tokio::test(start_paused = true)]
async fn test_cat_scenario_completes_after_two_polls() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_pending(
        "abc",
        vec![
            MockStatus::Running("PENDING".into()),
            MockStatus::Completed(image("https://x/img.png")),
        ],
    );
    let h = harness(NodeKind::Image, endpoint, 5);
    h.node.set_prompt("a cat").await;
    h.node.set_model("X").await;
    let mut transitions = h.node.transitions();

    let finished = h.node.submit().await;

    assert_eq!(*finished.status(), GenerationStatus::Completed);
    assert_eq!(finished.result(), &Some(image("https://x/img.png")));
    assert_eq!(finished.request_id(), &Some(RequestId::new("abc")));
    assert_eq!(*finished.attempt_count(), 2);
    assert_eq!(h.endpoint.status_count(), 2);
    assert_eq!(h.endpoint.submitted_prompts(), vec!["a cat".to_string()]);
    assert!(h.endpoint.seen_tokens().iter().all(|t| t == "test-token"));

    let mut statuses = Vec::new();
    while let Ok(request) = transitions.try_recv() {
        statuses.push((*request.status(), *request.attempt_count()));
    }
    assert_eq!(
        statuses,
        vec![
            (GenerationStatus::Submitting, 0),
            (GenerationStatus::Polling, 0),
            (GenerationStatus::Polling, 1),
            (GenerationStatus::Polling, 2),
            (GenerationStatus::Completed, 2),
        ]
    );

    let notes = h.notifier.received();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title(), "Image generated successfully");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_synchronous_result_skips_polling() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_complete(Artifact::Text("Hello!".into()));
    let h = harness(NodeKind::Text, endpoint, 1);
    h.node.set_prompt("Say hello").await;
    let mut transitions = h.node.transitions();

    let finished = h.node.submit().await;

    assert_eq!(*finished.status(), GenerationStatus::Completed);
    assert_eq!(finished.result(), &Some(Artifact::Text("Hello!".into())));
    assert_eq!(h.endpoint.status_count(), 0);
    assert_eq!(*transitions.try_recv()?.status(), GenerationStatus::Submitting);
    assert_eq!(*transitions.try_recv()?.status(), GenerationStatus::Completed);
    assert!(transitions.try_recv().is_err());
    assert_eq!(h.ledger.available_credits().await, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_timeout_after_max_attempts() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_pending("abc", vec![MockStatus::Running("IN_QUEUE".into())]);
    let h = harness(NodeKind::Image, endpoint, 1);
    h.node.set_prompt("a slow cat").await;

    let finished = h.node.submit().await;

    assert_eq!(*finished.status(), GenerationStatus::Failed);
    assert_eq!(*finished.failure_category(), Some(FailureCategory::Timeout));
    assert_eq!(*finished.attempt_count(), 30);
    assert_eq!(h.endpoint.status_count(), 30);
    assert_eq!(h.notifier.received()[0].title(), "Generation Timed Out");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_not_authenticated_makes_no_call() -> anyhow::Result<()> {
    for session in [SessionState::signed_out(), SessionState::loading()] {
        let endpoint = MockEndpoint::new_complete(image("u"));
        let h = harness_with(
            NodeKind::Image,
            endpoint,
            5,
            session,
            PollingConfig::default(),
        );
        h.node.set_prompt("a cat").await;

        let finished = h.node.submit().await;

        assert_eq!(*finished.status(), GenerationStatus::Failed);
        assert_eq!(*finished.failure_category(), Some(FailureCategory::Preflight));
        assert_eq!(h.endpoint.submit_count(), 0);
        assert_eq!(h.ledger.debit_count().await, 0);
        assert_eq!(h.notifier.received()[0].title(), "Authentication Required");
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_insufficient_credits_for_video() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_complete(Artifact::VideoUrl("v".into()));
    let h = harness(NodeKind::Video, endpoint, 1);
    h.node.set_image_slot(0, Some("https://x/a.png".into())).await?;
    h.node.set_image_slot(1, Some("https://x/b.png".into())).await?;

    let finished = h.node.submit().await;

    assert_eq!(*finished.status(), GenerationStatus::Failed);
    assert!(
        finished
            .error_message()
            .as_deref()
            .is_some_and(|m| m.contains("at least 2 credit"))
    );
    assert_eq!(h.endpoint.submit_count(), 0);
    assert_eq!(h.ledger.debit_count().await, 0);
    assert_eq!(h.notifier.received()[0].title(), "No Credits Available");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_incomplete_input_never_debits() -> anyhow::Result<()> {
    let text = harness(NodeKind::Text, MockEndpoint::new_complete(Artifact::Text("x".into())), 5);
    text.node.set_prompt("   ").await;
    let finished = text.node.submit().await;
    assert_eq!(finished.error_message().as_deref(), Some("Please enter a prompt"));
    assert_eq!(text.endpoint.submit_count(), 0);
    assert_eq!(text.ledger.debit_count().await, 0);

    let video = harness(NodeKind::Video, MockEndpoint::new_complete(Artifact::VideoUrl("v".into())), 5);
    video.node.set_image_slot(4, Some("https://x/only.png".into())).await?;
    let finished = video.node.submit().await;
    assert_eq!(*finished.failure_category(), Some(FailureCategory::Preflight));
    assert_eq!(video.endpoint.submit_count(), 0);
    assert_eq!(video.ledger.debit_count().await, 0);
    assert_eq!(video.notifier.received()[0].title(), "Missing Input");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refused_debit_is_hard_stop() -> anyhow::Result<()> {
    let h = harness(NodeKind::Image, MockEndpoint::new_complete(image("u")), 5);
    h.ledger.refuse_debits(true).await;
    h.node.set_prompt("a cat").await;

    let finished = h.node.submit().await;

    assert_eq!(*finished.failure_category(), Some(FailureCategory::Preflight));
    assert_eq!(h.endpoint.submit_count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debit_once_per_submission_with_metadata() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_pending(
        "abc",
        vec![
            MockStatus::Running("IN_QUEUE".into()),
            MockStatus::Running("IN_PROGRESS".into()),
            MockStatus::Completed(image("u")),
        ],
    );
    let h = harness(NodeKind::Image, endpoint, 5);
    let long_prompt = "a".repeat(150);
    h.node.set_prompt(long_prompt.clone()).await;

    h.node.submit().await;

    let debits = h.ledger.debits().await;
    assert_eq!(debits.len(), 1);
    assert_eq!(*debits[0].amount(), 1);
    assert_eq!(*debits[0].kind(), NodeKind::Image);
    assert_eq!(debits[0].metadata().prompt(), &format!("{}...", &long_prompt[..100]));
    assert_eq!(h.ledger.available_credits().await, 4);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_submit_error_fails_with_server_message() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_error(GenerationErrorKind::Remote {
        status: Some(402),
        message: "Quota exceeded".into(),
    });
    let h = harness(NodeKind::Image, endpoint, 5);
    h.node.set_prompt("a cat").await;

    let finished = h.node.submit().await;

    assert_eq!(*finished.status(), GenerationStatus::Failed);
    assert_eq!(finished.error_message().as_deref(), Some("Quota exceeded"));
    let notes = h.notifier.received();
    assert_eq!(*notes[0].level(), NotificationLevel::Error);
    assert_eq!(notes[0].title(), "Generation Failed");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_resubmission_clears_previous_outcome_first() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_error(GenerationErrorKind::Transport("offline".into()))
        .then_submit(Ok(Submission::Complete(image("second"))));
    let h = harness(NodeKind::Image, endpoint, 5);
    h.node.set_prompt("a cat").await;

    let first = h.node.submit().await;
    assert_eq!(*first.status(), GenerationStatus::Failed);
    assert_eq!(*first.failure_category(), Some(FailureCategory::Transport));

    let mut transitions = h.node.transitions();
    let second = h.node.submit().await;

    let submitting = transitions.try_recv()?;
    assert_eq!(*submitting.status(), GenerationStatus::Submitting);
    assert!(submitting.error_message().is_none());
    assert!(submitting.result().is_none());
    assert_ne!(submitting.submission_id(), first.submission_id());
    assert_eq!(second.result(), &Some(image("second")));
    assert_eq!(h.ledger.debit_count().await, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_superseded_submission_never_updates_state() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new()
        .then_submit_after(Duration::from_secs(5), Ok(Submission::Complete(image("old"))))
        .then_submit(Ok(Submission::Complete(image("new"))));
    let h = harness(NodeKind::Image, endpoint, 5);
    h.node.set_prompt("first").await;

    let node = h.node.clone();
    let older = tokio::spawn(async move { node.submit().await });
    tokio::time::sleep(Duration::from_secs(1)).await;

    h.node.set_prompt("second").await;
    let newer = h.node.submit().await;
    assert_eq!(newer.result(), &Some(image("new")));

    let after_older = older.await?;
    assert_eq!(after_older.result(), &Some(image("new")));
    assert_eq!(h.node.state().result(), &Some(image("new")));
    assert_eq!(h.notifier.received().len(), 1);
    assert_eq!(
        h.endpoint.submitted_prompts(),
        vec!["first".to_string(), "second".to_string()]
    );
    assert_eq!(h.ledger.debit_count().await, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_superseded_polling_stops() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new()
        .then_submit(Ok(Submission::Pending(RequestId::new("old-job"))))
        .then_submit(Ok(Submission::Complete(image("new"))));
    let h = harness(NodeKind::Image, endpoint, 5);
    h.node.set_prompt("first").await;

    let node = h.node.clone();
    let older = tokio::spawn(async move { node.submit().await });
    tokio::time::sleep(Duration::from_millis(2500)).await;
    let polls_before = h.endpoint.status_count();
    assert_eq!(polls_before, 2);

    h.node.submit().await;
    older.await?;

    assert_eq!(h.endpoint.status_count(), polls_before);
    assert_eq!(h.node.state().result(), &Some(image("new")));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unmount_abandons_polling_before_next_attempt() -> anyhow::Result<()> {
    let endpoint = MockEndpoint::new_pending("abc", vec![MockStatus::Running("IN_QUEUE".into())]);
    let h = harness(NodeKind::Video, endpoint, 5);
    h.node.set_image_slot(0, Some("https://x/a.png".into())).await?;
    h.node.set_image_slot(1, Some("https://x/b.png".into())).await?;

    let node = h.node.clone();
    let running = tokio::spawn(async move { node.submit().await });
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(h.endpoint.status_count(), 2);

    h.node.unmount();
    let last = running.await?;

    assert_eq!(h.endpoint.status_count(), 2);
    assert_eq!(*last.status(), GenerationStatus::Polling);
    assert_eq!(*last.attempt_count(), 2);
    assert!(h.notifier.received().is_empty());

    let ignored = h.node.submit().await;
    assert_eq!(ignored, last);
    assert_eq!(h.endpoint.submit_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_node_data_round_trip_restores_form_and_artifact() -> anyhow::Result<()> {
    let h = harness(NodeKind::Image, MockEndpoint::new_complete(image("https://x/img.png")), 5);
    h.node.set_prompt("a cat").await;
    h.node.submit().await;

    let data = h.node.node_data().await;
    assert_eq!(data.block_type().as_deref(), Some("IMAGE"));
    assert_eq!(data.model_name().as_deref(), Some("Ideogram v2"));

    let json = serde_json::to_string(&data)?;
    let stored: NodeData = serde_json::from_str(&json)?;
    let collaborators = Collaborators::new(
        Arc::new(h.session.clone()),
        Arc::new(h.ledger.clone()),
        Arc::new(h.notifier.clone()),
    );
    let restored = NodeController::from_node_data(
        &stored,
        h.endpoint.clone(),
        collaborators,
        PollingConfig::default(),
    );

    assert_eq!(restored.parameters().await.prompt(), "a cat");
    assert_eq!(restored.state().result(), &Some(image("https://x/img.png")));
    assert_eq!(restored.view().await.artifact(), &Some(image("https://x/img.png")));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_restore_from_empty_data_uses_defaults() -> anyhow::Result<()> {
    let h = harness(NodeKind::Video, MockEndpoint::new(), 5);
    let collaborators = Collaborators::new(
        Arc::new(h.session.clone()),
        Arc::new(h.ledger.clone()),
        Arc::new(h.notifier.clone()),
    );
    let node = NodeController::from_node_data(
        &NodeData::empty(NodeKind::Video),
        h.endpoint.clone(),
        collaborators,
        PollingConfig::default(),
    );

    let params: GenerationParameters = node.parameters().await;
    assert_eq!(params.image_inputs().len(), 9);
    assert!(params.image_inputs().iter().all(Option::is_none));
    assert_eq!(*node.state().status(), GenerationStatus::Idle);
    assert!(!node.view().await.can_generate());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_restore_partial_form_fills_missing_fields() -> anyhow::Result<()> {
    let h = harness(NodeKind::Image, MockEndpoint::new_complete(image("u")), 5);
    let stored: NodeData =
        serde_json::from_str(r#"{"kind":"image","parameters":{"prompt":"a cat"}}"#)?;
    let collaborators = Collaborators::new(
        Arc::new(h.session.clone()),
        Arc::new(h.ledger.clone()),
        Arc::new(h.notifier.clone()),
    );
    let node = NodeController::from_node_data(
        &stored,
        h.endpoint.clone(),
        collaborators,
        PollingConfig::default(),
    );

    let params = node.parameters().await;
    assert_eq!(params.prompt(), "a cat");
    assert_eq!(params.model_id(), "fal-ai/ideogram/v2");
    assert_eq!(*params.aspect_ratio(), Some(AspectRatio::Square));
    assert_eq!(*params.style(), Some(Style::Auto));

    node.submit().await;
    let debits = h.ledger.debits().await;
    assert_eq!(debits.len(), 1);
    assert_eq!(*debits[0].metadata().aspect_ratio(), Some(AspectRatio::Square));
    assert_eq!(*debits[0].metadata().style(), Some(Style::Auto));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_between_submissions() -> anyhow::Result<()> {
    let h = harness_with(
        NodeKind::Text,
        MockEndpoint::new_complete(Artifact::Text("ok".into())),
        5,
        SessionState::loading(),
        PollingConfig::default(),
    );
    h.node.set_prompt("hello").await;

    assert_eq!(*h.node.submit().await.status(), GenerationStatus::Failed);
    h.session.set(signed_in()).await;
    assert_eq!(*h.node.submit().await.status(), GenerationStatus::Completed);
    assert_eq!(h.endpoint.submit_count(), 1);
    Ok(())
}
