//! Hosting-shell location with the route guard applied to every navigation.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::domain::routes::{self, GuardDecision, HOME_PATH};
use crate::infra::lock::mutex_lock;

use super::session::SessionManager;

#[derive(Debug, Clone)]
pub struct Navigator {
    session: SessionManager,
    state: Arc<Mutex<NavState>>,
}

#[derive(Debug)]
struct NavState {
    location: String,
    history: Vec<String>,
}

impl Navigator {
    #[must_use]
    pub fn new(session: SessionManager) -> Self {
        Self {
            session,
            state: Arc::new(Mutex::new(NavState {
                location: HOME_PATH.to_string(),
                history: vec![HOME_PATH.to_string()],
            })),
        }
    }

    /// Moves to `target`, or wherever the guard sends it instead. Returns the
    /// location actually reached.
    pub fn navigate(&self, target: &str) -> String {
        let resolved = match routes::guard(target, self.session.is_logged_in()) {
            GuardDecision::Proceed => target.to_string(),
            GuardDecision::Redirect(to) => {
                debug!(requested = target, redirected = %to, "navigation redirected by guard");
                to
            }
        };

        let mut state = mutex_lock(&self.state, "application::navigation", "navigate");
        state.location.clone_from(&resolved);
        state.history.push(resolved.clone());
        resolved
    }

    #[must_use]
    pub fn current(&self) -> String {
        mutex_lock(&self.state, "application::navigation", "current")
            .location
            .clone()
    }

    #[must_use]
    pub fn history(&self) -> Vec<String> {
        mutex_lock(&self.state, "application::navigation", "history")
            .history
            .clone()
    }

    /// Destination captured when the guard bounced an anonymous visit to login.
    #[must_use]
    pub fn redirect_target(&self) -> Option<String> {
        routes::redirect_target(&self.current())
    }
}
