//! Session slice.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shopx_core::{AuthPayload, User, UserId};

/// Bearer token, signed-in user and the rehydration flag.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default)]
pub struct SessionState {
    pub token: Option<SecretString>,
    pub user: Option<User>,
    /// Whether persisted state has been restored.
    pub hydrated: bool,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("hydrated", &self.hydrated)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Set(AuthPayload),
    /// Refresh the user record. Ignored when signed out.
    UpdateUser(User),
    /// Drop token and user. The hydrated flag is kept.
    Clear,
    SetHydrated(bool),
}

impl SessionState {
    pub(crate) fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::Set(payload) => {
                self.token = Some(SecretString::from(payload.token));
                self.user = Some(payload.user);
            }
            SessionAction::UpdateUser(user) => {
                if self.token.is_some() {
                    self.user = Some(user);
                }
            }
            SessionAction::Clear => {
                self.token = None;
                self.user = None;
            }
            SessionAction::SetHydrated(hydrated) => self.hydrated = hydrated,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    pub(crate) fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            token: self.token.as_ref().map(|t| t.expose_secret().to_string()),
            user: self.user.clone(),
        }
    }

    pub(crate) fn restore(&mut self, persisted: PersistedSession) {
        self.token = persisted.token.map(SecretString::from);
        self.user = persisted.user;
    }
}

/// On-disk form of the session. The hydrated flag is never stored.
#[derive(Clone, Default, Serialize, Deserialize)]
pub(crate) struct PersistedSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(user: &str, token: &str) -> AuthPayload {
        AuthPayload {
            token: token.to_string(),
            user: User {
                id: UserId::from(user),
                email: format!("{user}@shopx.app"),
                ..User::default()
            },
        }
    }

    #[test]
    fn test_set_then_clear_keeps_hydrated() {
        let mut state = SessionState::default();
        state.apply(SessionAction::SetHydrated(true));
        state.apply(SessionAction::Set(payload("u1", "tok-1")));
        assert!(state.is_authenticated());
        assert_eq!(state.user_id().map(UserId::as_str), Some("u1"));

        state.apply(SessionAction::Clear);
        assert!(state.token.is_none());
        assert!(state.user.is_none());
        assert!(state.hydrated);
    }

    #[test]
    fn test_last_set_wins() {
        let mut state = SessionState::default();
        state.apply(SessionAction::Set(payload("u1", "tok-1")));
        state.apply(SessionAction::Set(payload("u2", "tok-2")));
        assert_eq!(state.user_id().map(UserId::as_str), Some("u2"));
        assert_eq!(
            state.token.as_ref().map(|t| t.expose_secret().to_string()),
            Some("tok-2".to_string())
        );
    }

    #[test]
    fn test_update_user_requires_token() {
        let mut state = SessionState::default();
        let user = payload("u1", "t").user;
        state.apply(SessionAction::UpdateUser(user.clone()));
        assert!(state.user.is_none());

        state.apply(SessionAction::Set(payload("u1", "t")));
        let renamed = User {
            name: Some("Ana".to_string()),
            ..user
        };
        state.apply(SessionAction::UpdateUser(renamed.clone()));
        assert_eq!(state.user, Some(renamed));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut state = SessionState::default();
        state.apply(SessionAction::Set(payload("u1", "very-secret-token")));
        let debug = format!("{state:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret-token"));
    }
}
