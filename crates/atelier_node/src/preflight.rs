//! Checks run before a submission touches the network.

use crate::poller::capitalize;
use atelier_core::{AccessToken, GenerationParameters, NodeKind};
use atelier_error::{GenerationErrorKind, PreflightFailure};
use atelier_interface::{CreditLedger, Notification, SessionProvider};
use tracing::{debug, instrument, warn};

/// Runs the pre-flight checks and takes the credit debit.
///
/// Checks run in order: a signed-in session (a loading session does not
/// count), a balance covering the kind's cost, then the kind's input rules.
/// Only when all pass is the debit requested, so a failed check never costs
/// credits.
///
/// Returns the access token to send with the request.
///
/// # Errors
///
/// The first failing check, or [`PreflightFailure::DebitRefused`] when the
/// ledger declines the debit.
#[instrument(skip(params, session, ledger), fields(kind = %kind))]
pub async fn preflight(
    kind: NodeKind,
    params: &GenerationParameters,
    session: &dyn SessionProvider,
    ledger: &dyn CreditLedger,
) -> Result<AccessToken, PreflightFailure> {
    let state = session.current_session().await;
    let user = state.authenticated().ok_or_else(|| {
        warn!(loading = state.loading, "No authenticated user");
        PreflightFailure::NotAuthenticated
    })?;
    let token = user.access_token().clone();

    let required = kind.cost();
    let available = ledger.available_credits().await;
    if available < required {
        warn!(required, available, "Insufficient credits");
        return Err(PreflightFailure::InsufficientCredits {
            required,
            available,
        });
    }

    kind.check_input(params)?;

    let metadata = kind.credit_metadata(params);
    if !ledger.use_credits(kind, required, &metadata).await {
        warn!(required, "Credit debit refused");
        return Err(PreflightFailure::DebitRefused);
    }

    debug!(required, "Pre-flight passed");
    Ok(token)
}

/// Error notification for a failed request.
pub fn failure_notification(kind: NodeKind, error: &GenerationErrorKind) -> Notification {
    let title = match error {
        GenerationErrorKind::Preflight(PreflightFailure::NotAuthenticated) => {
            "Authentication Required"
        }
        GenerationErrorKind::Preflight(PreflightFailure::InsufficientCredits { .. }) => {
            "No Credits Available"
        }
        GenerationErrorKind::Preflight(PreflightFailure::DebitRefused) => "Credits Not Used",
        GenerationErrorKind::Preflight(_) => "Missing Input",
        GenerationErrorKind::Timeout { .. } => "Generation Timed Out",
        GenerationErrorKind::Transport(_) | GenerationErrorKind::Remote { .. } => {
            "Generation Failed"
        }
    };

    let description = match error {
        GenerationErrorKind::Preflight(PreflightFailure::InsufficientCredits { .. }) => format!(
            "You need credits to generate {}. Visit the credits page to get more.",
            kind.noun()
        ),
        other => other.user_message(),
    };

    Notification::error(title, description)
}

/// Success notification for a completed request.
pub fn success_notification(kind: NodeKind) -> Notification {
    Notification::success(format!("{} generated successfully", capitalize(kind.noun())))
}
