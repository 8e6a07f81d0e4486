//! Login state machine: passphrase exchange, token storage, and logout.

use std::sync::{Arc, Mutex};

use photolog_api_types::{TokenRequest, TokenResponse};
use reqwest::Method;
use tracing::{info, warn};

use crate::domain::routes::{FEED_PATH, HOME_PATH};
use crate::infra::lock::mutex_lock;

use super::api::{ApiClient, RequestOptions, decode_json};
use super::error::ClientError;

pub const WRONG_PASSPHRASE: &str = "Wrong passphrase.";
pub const NETWORK_FAILURE: &str = "Network error.";

const TOKEN_PATH: &str = "/auth/token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    /// Carries the message shown under the form. Submitting again is allowed.
    Failed(String),
}

enum Exchange {
    Token(String),
    Rejected,
}

#[derive(Debug, Clone)]
pub struct AuthFlow {
    api: ApiClient,
    state: Arc<Mutex<AuthState>>,
}

impl AuthFlow {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let initial = if api.session().is_logged_in() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        Self {
            api,
            state: Arc::new(Mutex::new(initial)),
        }
    }

    /// Current state. A session ended by a 401 reads as unauthenticated.
    #[must_use]
    pub fn state(&self) -> AuthState {
        let state = mutex_lock(&self.state, "application::auth", "state").clone();
        match state {
            AuthState::Authenticated if !self.api.session().is_logged_in() => {
                AuthState::Unauthenticated
            }
            other => other,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state() == AuthState::Authenticating
    }

    /// Exchanges `passphrase` for a token.
    ///
    /// On success the token is stored and the shell moves to the captured
    /// redirect target, or the feed. A non-2xx answer or a transport failure
    /// ends in [`AuthState::Failed`] with the token untouched. Only storage
    /// and request-construction failures are returned as errors.
    pub async fn submit(&self, passphrase: &str) -> Result<AuthState, ClientError> {
        {
            let mut state = mutex_lock(&self.state, "application::auth", "submit");
            if *state == AuthState::Authenticating {
                return Ok(AuthState::Authenticating);
            }
            *state = AuthState::Authenticating;
        }

        let destination = self
            .api
            .navigator()
            .redirect_target()
            .unwrap_or_else(|| FEED_PATH.to_string());

        let next = match self.exchange(passphrase).await {
            Ok(Exchange::Token(token)) => match self.api.session().set_token(&token) {
                Ok(()) => AuthState::Authenticated,
                Err(err) => {
                    warn!(error = %err, "failed to persist token");
                    self.set_state(AuthState::Failed(err.to_string()));
                    return Err(err.into());
                }
            },
            Ok(Exchange::Rejected) => AuthState::Failed(WRONG_PASSPHRASE.to_string()),
            Err(err @ (ClientError::Network(_) | ClientError::Decode { .. })) => {
                warn!(error = %err, "token exchange failed");
                AuthState::Failed(NETWORK_FAILURE.to_string())
            }
            Err(err) => {
                self.set_state(AuthState::Unauthenticated);
                return Err(err);
            }
        };

        self.set_state(next.clone());
        if next == AuthState::Authenticated {
            info!(%destination, "logged in");
            self.api.navigator().navigate(&destination);
        }
        Ok(next)
    }

    async fn exchange(&self, passphrase: &str) -> Result<Exchange, ClientError> {
        let body = TokenRequest {
            passphrase: passphrase.to_string(),
        };
        let options = RequestOptions::json(Method::POST, &body)?;
        let response = self.api.request_anonymous(TOKEN_PATH, options).await?;
        if !response.status().is_success() {
            return Ok(Exchange::Rejected);
        }
        let token: TokenResponse = decode_json(response, "token").await?;
        if token.access_token.is_empty() {
            return Err(ClientError::decode("token", "empty access_token"));
        }
        Ok(Exchange::Token(token.access_token))
    }

    /// Forgets the token and returns to the public page.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.api.session().clear_token()?;
        self.set_state(AuthState::Unauthenticated);
        self.api.navigator().navigate(HOME_PATH);
        info!("logged out");
        Ok(())
    }

    fn set_state(&self, next: AuthState) {
        *mutex_lock(&self.state, "application::auth", "set_state") = next;
    }
}
