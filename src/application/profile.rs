use photolog_api_types::{Link, Profile, ProfileUpdateRequest};

use crate::domain::collections::LinkList;

use super::api::{ApiClient, UploadFile};
use super::editor::{EditableResource, ResourceEditor, UploadOutcome};
use super::error::ClientError;

const PROFILE_PATH: &str = "/profile";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileMirror {
    pub name: String,
    pub bio: String,
    pub links: LinkList,
}

impl EditableResource for Profile {
    type Mirror = ProfileMirror;
    type Patch = ProfileUpdateRequest;

    const KIND: &'static str = "profile";
    // The profile always exists; load failures go back to the caller.
    const FALLBACK_ROUTE: Option<&'static str> = None;

    fn mirror(&self) -> ProfileMirror {
        ProfileMirror {
            name: self.name.clone(),
            bio: self.bio.clone(),
            links: LinkList::from_links(&self.links),
        }
    }

    fn patch(mirror: &ProfileMirror) -> ProfileUpdateRequest {
        ProfileUpdateRequest {
            name: mirror.name.clone(),
            bio: mirror.bio.clone(),
            links: mirror.links.to_vec(),
        }
    }
}

pub type ProfileEditor = ResourceEditor<Profile>;

impl ResourceEditor<Profile> {
    #[must_use]
    pub fn for_profile(api: ApiClient) -> Self {
        Self::new(api, PROFILE_PATH)
    }

    /// Adds a link when both fields are non-empty.
    pub fn add_link(&self, label: &str, url: &str) -> Result<bool, ClientError> {
        self.edit(|mirror| mirror.links.add(label, url))
    }

    pub fn set_link_draft(&self, label: &str, url: &str) -> Result<(), ClientError> {
        self.edit(|mirror| mirror.links.set_draft(label, url))
    }

    /// Commits the staged link row.
    pub fn commit_link_draft(&self) -> Result<bool, ClientError> {
        self.edit(|mirror| mirror.links.add_draft())
    }

    pub fn update_link(&self, index: usize, label: &str, url: &str) -> Result<bool, ClientError> {
        self.edit(|mirror| mirror.links.update(index, label, url))
    }

    pub fn remove_link(&self, index: usize) -> Result<Option<Link>, ClientError> {
        self.edit(|mirror| mirror.links.remove(index))
    }

    pub async fn upload_avatar(&self, file: Option<UploadFile>) -> Result<UploadOutcome, ClientError> {
        let path = format!("{PROFILE_PATH}/avatar");
        self.upload(&path, "file", file.into_iter().collect()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::application::editor::{LoadOutcome, SaveOutcome};
    use crate::application::navigation::Navigator;
    use crate::application::session::{SessionManager, TOKEN_KEY};
    use crate::config::ApiSettings;
    use crate::infra::storage::MemoryStore;

    fn editor(server: &MockServer) -> ProfileEditor {
        let session =
            SessionManager::open(Arc::new(MemoryStore::with_entry(TOKEN_KEY, "tok"))).expect("session");
        let navigator = Navigator::new(session.clone());
        let settings = ApiSettings {
            base_url: server.base_url().parse().expect("url"),
            root: "/api".into(),
        };
        let api = ApiClient::new(&settings, session, navigator).expect("client");
        ProfileEditor::for_profile(api)
    }

    #[tokio::test]
    async fn edits_links_and_saves_from_mirror() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/profile");
            then.status(200).json_body(json!({
                "name": "Ana",
                "bio": "",
                "links": [{"label": "site", "url": "https://a.example"}]
            }));
        });
        let patch = server.mock(|when, then| {
            when.method("PATCH").path("/api/profile").json_body(json!({
                "name": "Ana",
                "bio": "hi",
                "links": [{"label": "mail", "url": "mailto:a@example"}]
            }));
            then.status(200).json_body(json!({
                "name": "Ana",
                "bio": "hi",
                "links": [{"label": "mail", "url": "mailto:a@example"}]
            }));
        });

        let editor = editor(&server);
        assert_eq!(editor.load().await.expect("load"), LoadOutcome::Loaded);

        assert!(!editor.add_link("label only", "").expect("loaded"));
        editor.set_link_draft("mail", "mailto:a@example").expect("loaded");
        assert!(editor.commit_link_draft().expect("loaded"));
        assert_eq!(editor.mirror().expect("mirror").links.draft(), ("", ""));
        let removed = editor.remove_link(0).expect("loaded").expect("first link");
        assert_eq!(removed.label, "site");
        assert!(editor.update_link(0, "mail", "mailto:a@example").expect("loaded"));
        assert!(!editor.update_link(4, "x", "y").expect("loaded"));
        editor.edit(|mirror| mirror.bio = "hi".into()).expect("loaded");

        // The canonical copy is untouched until the save echo arrives.
        assert_eq!(editor.canonical().expect("profile").links.len(), 1);
        assert_eq!(editor.canonical().expect("profile").links[0].label, "site");

        assert_eq!(editor.save().await.expect("save"), SaveOutcome::Saved);
        patch.assert();
        assert_eq!(editor.canonical().expect("profile").bio, "hi");
    }

    #[tokio::test]
    async fn load_failure_is_returned_without_redirect() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/profile");
            then.status(500);
        });

        let editor = editor(&server);
        let err = editor.load().await.expect_err("500");
        assert!(err.is_rejection());
        assert_eq!(editor.api().navigator().current(), "/");
    }

    #[tokio::test]
    async fn avatar_upload_replaces_canonical_only() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/profile");
            then.status(200).json_body(json!({"name": "Ana", "bio": "", "links": []}));
        });
        let upload = server.mock(|when, then| {
            when.method("POST").path("/api/profile/avatar");
            then.status(200).json_body(json!({
                "name": "Ana",
                "bio": "",
                "avatar_filename": "me.png",
                "links": []
            }));
        });

        let editor = editor(&server);
        editor.load().await.expect("load");
        assert_eq!(
            editor.upload_avatar(None).await.expect("skip"),
            UploadOutcome::Skipped
        );

        editor.edit(|mirror| mirror.name = "Draft".into()).expect("loaded");
        let outcome = editor
            .upload_avatar(Some(UploadFile::new("me.png", vec![0_u8; 4])))
            .await
            .expect("upload");
        assert_eq!(outcome, UploadOutcome::Uploaded);
        upload.assert();
        assert!(!editor.is_uploading());

        let profile = editor.canonical().expect("profile");
        assert_eq!(profile.avatar(), Some("me.png"));
        assert_eq!(editor.mirror().expect("mirror").name, "Draft");
    }
}
