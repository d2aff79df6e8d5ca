//! Session data reported by the auth collaborator.

use serde::{Deserialize, Serialize};

/// Bearer token for the generation endpoints.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(<{} chars>)", self.0.len())
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct UserSession {
    /// Stable user identifier
    user_id: String,
    /// Email, when the provider shares one
    email: Option<String>,
    /// Token sent with generation requests
    access_token: AccessToken,
}

impl UserSession {
    /// Creates a session.
    pub fn new(user_id: impl Into<String>, email: Option<String>, access_token: AccessToken) -> Self {
        Self {
            user_id: user_id.into(),
            email,
            access_token,
        }
    }
}

/// Snapshot of the auth collaborator.
///
/// # Examples
///
/// ```
/// use atelier_core::{AccessToken, SessionState, UserSession};
///
/// assert!(SessionState::loading().authenticated().is_none());
///
/// let session = UserSession::new("u1", None, AccessToken::new("t"));
/// assert!(SessionState::signed_in(session).authenticated().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Whether the initial session lookup is still running
    pub loading: bool,
    /// Current user, if any
    pub user: Option<UserSession>,
}

impl SessionState {
    /// Lookup still in progress.
    pub fn loading() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    /// Nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A user is signed in.
    pub fn signed_in(user: UserSession) -> Self {
        Self {
            loading: false,
            user: Some(user),
        }
    }

    /// The user, if the state is settled and someone is signed in.
    pub fn authenticated(&self) -> Option<&UserSession> {
        if self.loading {
            None
        } else {
            self.user.as_ref()
        }
    }
}
