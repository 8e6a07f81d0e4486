//! Wire types for the photolog REST API.
//!
//! Response types are lenient: every field the server may omit carries a serde
//! default so that partial payloads (and test stubs) still decode.

use serde::{Deserialize, Serialize};

pub type PostId = i64;
pub type ImageId = i64;
pub type TagId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostImage {
    pub id: ImageId,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl PostImage {
    /// Address to display: the public URL when the server supplied one, else the stored filename.
    #[must_use]
    pub fn display_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or_else(|| (!self.filename.is_empty()).then_some(self.filename.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub published: bool,
    /// Server timestamp as sent; may be RFC 3339 or a naive ISO datetime.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub images: Vec<PostImage>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_filename: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Profile {
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.avatar_url.as_deref().or(self.avatar_filename.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenRequest {
    pub passphrase: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostCreateRequest {
    pub caption: String,
    pub published: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostUpdateRequest {
    pub caption: String,
    pub location: Option<String>,
    pub published: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub bio: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderImagesRequest {
    pub image_ids: Vec<ImageId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_post_payload_decodes_with_defaults() {
        let post: Post = serde_json::from_str(r#"{"id":7}"#).expect("decode");
        assert_eq!(post.id, 7);
        assert_eq!(post.caption, "");
        assert!(post.location.is_none());
        assert!(!post.published);
        assert!(post.images.is_empty());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn update_request_sends_null_location() {
        let body = serde_json::to_value(PostUpdateRequest {
            caption: "c".into(),
            location: None,
            published: true,
            tags: vec!["a".into()],
        })
        .expect("encode");
        assert_eq!(
            body,
            serde_json::json!({"caption":"c","location":null,"published":true,"tags":["a"]})
        );
    }

    #[test]
    fn image_display_url_falls_back_to_filename() {
        let image = PostImage {
            id: 1,
            filename: "a.jpg".into(),
            url: None,
            order: 0,
        };
        assert_eq!(image.display_url(), Some("a.jpg"));

        let hosted = PostImage {
            url: Some("https://cdn/a.jpg".into()),
            ..image
        };
        assert_eq!(hosted.display_url(), Some("https://cdn/a.jpg"));
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"tok"}"#).expect("decode");
        assert_eq!(token.token_type, "bearer");
    }
}
