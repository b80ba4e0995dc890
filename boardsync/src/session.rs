//! Session state: token lifecycle and auth flows
//!
//! `anonymous → authenticating → authenticated → anonymous`, plus the
//! reconnect-on-load path when a persisted token exists. The token's
//! presence is the sole source of truth for "is authenticated".

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::error;

use crate::api::{ApiClient, SessionPayload};
use crate::error::{Result, SyncError};
use crate::notify::Notifier;
use crate::persist::{KeyValueStore, CONSENT_KEY, SEEN_COOKIE_NOTICE_KEY, TOKEN_KEY};
use crate::types::UserId;

/// The authenticated (or anonymous) user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUser {
    pub id: Option<UserId>,
    pub username: String,
}

/// Snapshot of session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: SessionUser,
    pub fetching: bool,
    pub cookies_modal_visible: bool,
}

/// Session component: owns the token lifecycle
pub struct Session {
    api: ApiClient,
    persist: Arc<dyn KeyValueStore>,
    notifier: Notifier,
    state: Mutex<SessionState>,
    version: watch::Sender<u64>,
}

impl Session {
    /// Create a session, initializing from the persisted token and the
    /// persisted "has seen cookie notice" flag
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        let persist = api.persist().clone();
        let state = SessionState {
            token: persist.get(TOKEN_KEY),
            user: SessionUser::default(),
            fetching: false,
            cookies_modal_visible: persist.get(SEEN_COOKIE_NOTICE_KEY).is_none(),
        };
        let (version, _) = watch::channel(0);

        Self {
            api,
            persist,
            notifier,
            state: Mutex::new(state),
            version,
        }
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Clone out the current session state
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().unwrap().clone()
    }

    /// Derived predicate: authenticated iff a token is present
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().token.is_some()
    }

    /// Whether an auth call is in flight
    pub fn is_fetching(&self) -> bool {
        self.state.lock().unwrap().fetching
    }

    fn publish(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    fn set_fetching(&self, fetching: bool) {
        self.state.lock().unwrap().fetching = fetching;
        self.publish();
    }

    fn apply_session(&self, payload: SessionPayload, persist_token: bool) {
        if persist_token {
            if let Err(err) = self.persist.set(TOKEN_KEY, &payload.token) {
                error!(%err, "failed to persist session token");
            }
        }

        let mut state = self.state.lock().unwrap();
        state.token = Some(payload.token);
        state.user.id = Some(payload.id);
        state.user.username = payload.username;
        state.fetching = false;
        drop(state);
        self.publish();
    }

    fn surface_auth_error(&self, err: &SyncError, during: &str) {
        match err {
            SyncError::Api { .. } => self.notifier.error(err.to_string()),
            _ => self.notifier.error(format!("An error occurred during {during}")),
        }
    }

    /// Log in with credentials; persists the token on success
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.set_fetching(true);

        let result = self.api.auth().login(username, password).await;
        let outcome = match result {
            Ok(payload) => {
                self.apply_session(payload, true);
                Ok(())
            }
            Err(err) => {
                self.surface_auth_error(&err, "login");
                Err(err)
            }
        };

        self.set_fetching(false);
        outcome
    }

    /// Sign up with credentials; persists the token on success
    pub async fn signup(&self, username: &str, password: &str) -> Result<()> {
        self.set_fetching(true);

        let result = self.api.auth().signup(username, password).await;
        let outcome = match result {
            Ok(payload) => {
                self.apply_session(payload, true);
                Ok(())
            }
            Err(err) => {
                self.surface_auth_error(&err, "signup");
                Err(err)
            }
        };

        self.set_fetching(false);
        outcome
    }

    /// Re-establish a session from the persisted token
    ///
    /// The token is already persisted; a success only refreshes in-memory
    /// state, it does not re-write the store.
    pub async fn reconnect(&self) -> Result<()> {
        self.set_fetching(true);

        let result = self.api.auth().reconnect().await;
        let outcome = match result {
            Ok(payload) => {
                self.apply_session(payload, false);
                Ok(())
            }
            Err(err) => {
                self.surface_auth_error(&err, "reconnection");
                Err(err)
            }
        };

        self.set_fetching(false);
        outcome
    }

    /// Exchange a GitHub OAuth code for a session; persists the token
    pub async fn oauth_github(&self, code: &str, state: &str) -> Result<()> {
        self.set_fetching(true);

        let result = self.api.auth().oauth_github(code, state).await;
        let outcome = match result {
            Ok(payload) => {
                self.apply_session(payload, true);
                Ok(())
            }
            Err(err) => {
                self.surface_auth_error(&err, "authentication");
                Err(err)
            }
        };

        self.set_fetching(false);
        outcome
    }

    /// Log out: clear the persisted token and reset state synchronously
    ///
    /// No remote call is involved; the backend token is simply abandoned.
    pub fn logout(&self) {
        if let Err(err) = self.persist.remove(TOKEN_KEY) {
            error!(%err, "failed to remove persisted token");
        }

        let mut state = self.state.lock().unwrap();
        *state = SessionState {
            cookies_modal_visible: self.persist.get(SEEN_COOKIE_NOTICE_KEY).is_none(),
            ..SessionState::default()
        };
        drop(state);
        self.publish();
    }

    /// Toggle the cookie-notice modal; dismissing it persists the seen flag
    pub fn toggle_cookies_modal(&self) {
        let mut state = self.state.lock().unwrap();
        state.cookies_modal_visible = !state.cookies_modal_visible;
        let dismissed = !state.cookies_modal_visible;
        drop(state);

        if dismissed {
            if let Err(err) = self.persist.set(SEEN_COOKIE_NOTICE_KEY, "true") {
                error!(%err, "failed to persist cookie-notice flag");
            }
        }
        self.publish();
    }

    /// The persisted analytics consent flag
    pub fn analytics_consent(&self) -> bool {
        self.persist
            .get(CONSENT_KEY)
            .is_some_and(|v| v == "true")
    }

    /// Persist the analytics consent flag
    pub fn set_analytics_consent(&self, consent: bool) {
        let value = if consent { "true" } else { "false" };
        if let Err(err) = self.persist.set(CONSENT_KEY, value) {
            error!(%err, "failed to persist consent flag");
        }
        self.publish();
    }
}
