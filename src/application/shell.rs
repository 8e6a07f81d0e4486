//! Process-wide wiring: one session, one navigator, one API client, one key
//! dispatcher, shared by every view the front end opens.

use std::sync::Arc;

use photolog_api_types::PostId;

use crate::config::{ApiSettings, Settings};
use crate::infra::storage::{FileStore, KeyValueStore};

use super::api::ApiClient;
use super::auth::AuthFlow;
use super::error::ClientError;
use super::feed::OwnerFeed;
use super::keyboard::KeyboardDispatcher;
use super::navigation::Navigator;
use super::posts::PostEditor;
use super::profile::ProfileEditor;
use super::public::PublicView;
use super::session::SessionManager;

#[derive(Debug, Clone)]
pub struct Shell {
    session: SessionManager,
    navigator: Navigator,
    api: ApiClient,
    keyboard: KeyboardDispatcher,
}

impl Shell {
    /// Opens the session persisted at the configured store path.
    pub fn open(settings: &Settings) -> Result<Self, ClientError> {
        let store = Arc::new(FileStore::new(&settings.session.store_path));
        Self::with_store(&settings.api, store)
    }

    pub fn with_store(
        settings: &ApiSettings,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ClientError> {
        let session = SessionManager::open(store)?;
        let navigator = Navigator::new(session.clone());
        let api = ApiClient::new(settings, session.clone(), navigator.clone())?;
        Ok(Self {
            session,
            navigator,
            api,
            keyboard: KeyboardDispatcher::new(),
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn keyboard(&self) -> &KeyboardDispatcher {
        &self.keyboard
    }

    #[must_use]
    pub fn auth(&self) -> AuthFlow {
        AuthFlow::new(self.api.clone())
    }

    #[must_use]
    pub fn feed(&self) -> OwnerFeed {
        OwnerFeed::new(self.api.clone())
    }

    #[must_use]
    pub fn post_editor(&self, id: PostId) -> PostEditor {
        PostEditor::for_post(self.api.clone(), id)
    }

    #[must_use]
    pub fn profile_editor(&self) -> ProfileEditor {
        ProfileEditor::for_profile(self.api.clone())
    }

    #[must_use]
    pub fn public_view(&self) -> PublicView {
        PublicView::new(self.api.clone(), self.keyboard.clone())
    }
}
