use photolog_api_types::{ImageId, Post, PostId, PostUpdateRequest, ReorderImagesRequest};
use reqwest::Method;
use tracing::{debug, warn};

use crate::domain::collections::{self, MoveDirection, TagSet};
use crate::domain::routes::FEED_PATH;

use super::api::{ApiClient, RequestOptions, UploadFile};
use super::editor::{EditableResource, ResourceEditor, UploadOutcome};
use super::error::ClientError;

/// Typed fields of the post editor form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMirror {
    pub caption: String,
    /// Empty means no location.
    pub location: String,
    pub published: bool,
    pub tags: TagSet,
    /// Text typed into the tag box but not yet committed.
    pub tag_input: String,
}

impl EditableResource for Post {
    type Mirror = PostMirror;
    type Patch = PostUpdateRequest;

    const KIND: &'static str = "post";
    const FALLBACK_ROUTE: Option<&'static str> = Some(FEED_PATH);

    fn mirror(&self) -> PostMirror {
        PostMirror {
            caption: self.caption.clone(),
            location: self.location.clone().unwrap_or_default(),
            published: self.published,
            tags: TagSet::from_tags(&self.tags),
            tag_input: String::new(),
        }
    }

    fn patch(mirror: &PostMirror) -> PostUpdateRequest {
        PostUpdateRequest {
            caption: mirror.caption.clone(),
            location: (!mirror.location.is_empty()).then(|| mirror.location.clone()),
            published: mirror.published,
            tags: mirror.tags.to_vec(),
        }
    }

    fn normalize(&mut self) {
        collections::renumber(&mut self.images);
    }
}

pub type PostEditor = ResourceEditor<Post>;

impl ResourceEditor<Post> {
    #[must_use]
    pub fn for_post(api: ApiClient, id: PostId) -> Self {
        Self::new(api, format!("/posts/{id}"))
    }

    pub fn add_tag(&self, raw: &str) -> Result<bool, ClientError> {
        self.edit(|mirror| mirror.tags.add(raw))
    }

    /// Commits the tag box and clears it, whether or not a tag was added.
    pub fn commit_tag_input(&self) -> Result<bool, ClientError> {
        self.edit(|mirror| {
            let raw = std::mem::take(&mut mirror.tag_input);
            mirror.tags.add(&raw)
        })
    }

    pub fn remove_tag(&self, name: &str) -> Result<bool, ClientError> {
        self.edit(|mirror| mirror.tags.remove(name))
    }

    /// Moves one image a slot left or right.
    ///
    /// The swap is applied locally first, then the full id order is sent and
    /// the server's echo replaces the post. If the request fails the local
    /// order is rolled back, unless another response has replaced it in the
    /// meantime. Returns `false` when the move was out of range.
    pub async fn move_image(
        &self,
        image_id: ImageId,
        direction: MoveDirection,
    ) -> Result<bool, ClientError> {
        let planned = self.edit_canonical(|post| {
            let reordered = collections::plan_image_move(&post.images, image_id, direction)?;
            let previous = std::mem::replace(&mut post.images, reordered);
            Some((post.id, previous, collections::image_ids(&post.images)))
        })?;
        let Some((post_id, previous, optimistic)) = planned else {
            debug!(image_id, ?direction, "image move out of range; ignoring");
            return Ok(false);
        };

        let body = ReorderImagesRequest {
            image_ids: optimistic.clone(),
        };
        let options = RequestOptions::json(Method::PATCH, &body)?;
        match self
            .send_replacing(&format!("/posts/{post_id}/images/reorder"), options)
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let restored = self.edit_canonical(|post| {
                    if collections::image_ids(&post.images) != optimistic {
                        return false;
                    }
                    post.images = previous;
                    true
                })?;
                if restored {
                    warn!(post_id, image_id, error = %err, "reorder failed; previous order restored");
                } else {
                    warn!(post_id, image_id, error = %err, "reorder failed; newer images kept");
                }
                Err(err)
            }
        }
    }

    pub async fn delete_image(&self, image_id: ImageId) -> Result<(), ClientError> {
        let post_id = self.post_id()?;
        self.send_replacing(
            &format!("/posts/{post_id}/images/{image_id}"),
            RequestOptions::delete(),
        )
        .await?;
        Ok(())
    }

    pub async fn upload_images(&self, files: Vec<UploadFile>) -> Result<UploadOutcome, ClientError> {
        let post_id = self.post_id()?;
        self.upload(&format!("/posts/{post_id}/images"), "files", files)
            .await
    }

    fn post_id(&self) -> Result<PostId, ClientError> {
        self.canonical()
            .map(|post| post.id)
            .ok_or(ClientError::NotLoaded(Post::KIND))
    }
}
