//! Public page: profile header, the tag-filterable post grid, and the modal
//! gallery with its keyboard bindings.

use std::sync::{Arc, Mutex};

use photolog_api_types::{Post, PostId, Profile};
use tracing::debug;

use crate::domain::filter::TagFilter;
use crate::domain::gallery::GalleryViewer;
use crate::infra::lock::mutex_lock;

use super::api::{ApiClient, RequestOptions, decode_json};
use super::error::ClientError;
use super::keyboard::{KeyListener, KeyboardDispatcher};

const PROFILE_PATH: &str = "/profile";
const PUBLIC_POSTS_PATH: &str = "/posts";

/// Everything the public page renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicState {
    /// `None` until the first load completes.
    pub profile: Option<Profile>,
    pub posts: Vec<Post>,
    pub filter: TagFilter,
    pub gallery: GalleryViewer,
}

#[derive(Debug)]
pub struct PublicView {
    api: ApiClient,
    keyboard: KeyboardDispatcher,
    state: Arc<Mutex<PublicState>>,
    listener: Mutex<Option<KeyListener>>,
}

impl PublicView {
    #[must_use]
    pub fn new(api: ApiClient, keyboard: KeyboardDispatcher) -> Self {
        Self {
            api,
            keyboard,
            state: Arc::new(Mutex::new(PublicState::default())),
            listener: Mutex::new(None),
        }
    }

    /// Binds the gallery keys, then loads the page.
    pub async fn init(&self) -> Result<(), ClientError> {
        self.bind_keys();
        self.load().await
    }

    fn bind_keys(&self) {
        let state = Arc::clone(&self.state);
        let listener = self.keyboard.subscribe(move |key| {
            mutex_lock(&state, "application::public", "handle_key")
                .gallery
                .handle_key(key);
        });
        // Replacing an earlier listener drops, and so deregisters, it.
        *mutex_lock(&self.listener, "application::public", "init") = Some(listener);
    }

    /// Releases the key binding. Safe to call more than once.
    pub fn dispose(&self) {
        if let Some(listener) = mutex_lock(&self.listener, "application::public", "dispose").take() {
            listener.dispose();
        }
    }

    /// Fetches the profile and the (filtered) post list concurrently and
    /// installs both once both have arrived.
    pub async fn load(&self) -> Result<(), ClientError> {
        let query = mutex_lock(&self.state, "application::public", "load").filter.query();

        let profile = async {
            let response = self.api.request(PROFILE_PATH, RequestOptions::get()).await?;
            decode_json::<Profile>(response, "profile").await
        };
        let posts = async {
            let response = self
                .api
                .request(PUBLIC_POSTS_PATH, RequestOptions::get().query(query))
                .await?;
            decode_json::<Vec<Post>>(response, "post list").await
        };
        let (profile, posts) = tokio::join!(profile, posts);
        let (profile, posts) = (profile?, posts?);

        debug!(count = posts.len(), "public page loaded");
        let mut state = mutex_lock(&self.state, "application::public", "load");
        state.profile = Some(profile);
        state.posts = posts;
        Ok(())
    }

    pub async fn filter_by_tag(&self, name: &str) -> Result<(), ClientError> {
        mutex_lock(&self.state, "application::public", "filter_by_tag")
            .filter
            .select(name);
        self.load().await
    }

    pub async fn clear_filter(&self) -> Result<(), ClientError> {
        mutex_lock(&self.state, "application::public", "clear_filter")
            .filter
            .clear();
        self.load().await
    }

    /// Tag chip inside the modal: close the modal, then filter.
    pub async fn select_tag_from_modal(&self, name: &str) -> Result<(), ClientError> {
        self.close_post();
        self.filter_by_tag(name).await
    }

    pub fn open_post(&self, post: Post) {
        mutex_lock(&self.state, "application::public", "open_post")
            .gallery
            .open(post);
    }

    /// Opens the listed post with `id`. Returns `false` when it is not listed.
    pub fn open_post_by_id(&self, id: PostId) -> bool {
        let mut state = mutex_lock(&self.state, "application::public", "open_post_by_id");
        let Some(post) = state.posts.iter().find(|post| post.id == id).cloned() else {
            return false;
        };
        state.gallery.open(post);
        true
    }

    pub fn close_post(&self) {
        mutex_lock(&self.state, "application::public", "close_post")
            .gallery
            .close();
    }

    pub fn prev_image(&self) {
        mutex_lock(&self.state, "application::public", "prev_image")
            .gallery
            .prev();
    }

    pub fn next_image(&self) {
        mutex_lock(&self.state, "application::public", "next_image")
            .gallery
            .next();
    }

    pub fn select_image(&self, index: usize) -> bool {
        mutex_lock(&self.state, "application::public", "select_image")
            .gallery
            .select(index)
    }

    #[must_use]
    pub fn snapshot(&self) -> PublicState {
        mutex_lock(&self.state, "application::public", "snapshot").clone()
    }
}

impl Drop for PublicView {
    fn drop(&mut self) {
        self.dispose();
    }
}
