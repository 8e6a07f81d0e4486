//! Owner feed: every post, published or not, with create and delete.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use photolog_api_types::{Post, PostCreateRequest, PostId};
use reqwest::Method;
use tracing::{debug, info};

use crate::domain::routes::post_edit_path;
use crate::infra::lock::mutex_lock;

use super::api::{ApiClient, RequestOptions, decode_json, expect_success};
use super::editor::InFlight;
use super::error::ClientError;

const FEED_ALL_PATH: &str = "/posts/feed/all";
const POSTS_PATH: &str = "/posts";

#[derive(Debug, Clone)]
pub struct OwnerFeed {
    api: ApiClient,
    posts: Arc<Mutex<Vec<Post>>>,
    creating: Arc<AtomicBool>,
}

impl OwnerFeed {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            posts: Arc::new(Mutex::new(Vec::new())),
            creating: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn load(&self) -> Result<Vec<Post>, ClientError> {
        let response = self.api.request(FEED_ALL_PATH, RequestOptions::get()).await?;
        let posts: Vec<Post> = decode_json(response, "owner feed").await?;
        debug!(count = posts.len(), "owner feed loaded");
        *mutex_lock(&self.posts, "application::feed", "load") = posts.clone();
        Ok(posts)
    }

    #[must_use]
    pub fn posts(&self) -> Vec<Post> {
        mutex_lock(&self.posts, "application::feed", "posts").clone()
    }

    #[must_use]
    pub fn is_creating(&self) -> bool {
        self.creating.load(Ordering::Acquire)
    }

    /// Creates an empty draft and opens its editor. `None` when a create was
    /// already in flight.
    pub async fn create_post(&self) -> Result<Option<Post>, ClientError> {
        let Some(_in_flight) = InFlight::acquire(&self.creating) else {
            debug!("create already in flight; ignoring");
            return Ok(None);
        };

        let body = PostCreateRequest {
            caption: String::new(),
            published: false,
        };
        let options = RequestOptions::json(Method::POST, &body)?;
        let response = self.api.request(POSTS_PATH, options).await?;
        let post: Post = decode_json(response, "post").await?;
        info!(post_id = post.id, "draft created");
        self.api.navigator().navigate(&post_edit_path(post.id));
        Ok(Some(post))
    }

    /// Deletes on the server, then drops the post from the local list.
    pub async fn delete_post(&self, id: PostId) -> Result<(), ClientError> {
        let response = self
            .api
            .request(&format!("{POSTS_PATH}/{id}"), RequestOptions::delete())
            .await?;
        expect_success(response).await?;
        mutex_lock(&self.posts, "application::feed", "delete_post").retain(|post| post.id != id);
        info!(post_id = id, "post deleted");
        Ok(())
    }
}
