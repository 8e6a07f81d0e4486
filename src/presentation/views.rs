//! Render descriptions: plain data built from client state, one builder per
//! screen. Front ends turn these into output; nothing here draws.

use photolog_api_types::{Link, Post, PostId, Profile, Tag};
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::{FormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::application::auth::AuthState;
use crate::application::posts::PostMirror;
use crate::application::profile::ProfileMirror;
use crate::application::public::PublicState;
use crate::domain::routes::{FEED_PATH, HOME_PATH, LOGIN_PATH, PROFILE_EDIT_PATH, post_edit_path};

pub const SHORT_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const NAIVE_DATETIME_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub label: String,
    pub href: String,
}

impl LinkView {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBadge {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarView {
    pub brand: LinkView,
    pub links: Vec<LinkView>,
    pub show_logout: bool,
}

pub fn nav_bar(logged_in: bool) -> NavBarView {
    let mut links = vec![LinkView::new("Home", HOME_PATH)];
    if logged_in {
        links.push(LinkView::new("Feed", FEED_PATH));
        links.push(LinkView::new("Profile", PROFILE_EDIT_PATH));
    } else {
        links.push(LinkView::new("Log in", LOGIN_PATH));
    }
    NavBarView {
        brand: LinkView::new("Blog", HOME_PATH),
        links,
        show_logout: logged_in,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHeaderView {
    pub name: String,
    pub bio: String,
    /// `None` renders the placeholder.
    pub avatar: Option<String>,
    pub links: Vec<LinkView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailView {
    pub post_id: PostId,
    pub image: Option<String>,
    pub alt: String,
    pub multi_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselDot {
    pub index: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub image: Option<String>,
    pub alt: String,
    /// Prev/next buttons and dots appear only for more than one image.
    pub show_controls: bool,
    pub dots: Vec<CarouselDot>,
    pub date: String,
    pub location: Option<String>,
    pub caption: String,
    pub tags: Vec<TagBadge>,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPageView {
    /// `None` while the first load is outstanding.
    pub header: Option<ProfileHeaderView>,
    pub filter_label: Option<String>,
    pub thumbnails: Vec<ThumbnailView>,
    pub empty_message: Option<&'static str>,
    pub modal: Option<ModalView>,
}

pub fn public_page(state: &PublicState) -> PublicPageView {
    let header = state.profile.as_ref().map(profile_header);
    let thumbnails: Vec<ThumbnailView> = state
        .posts
        .iter()
        .map(|post| ThumbnailView {
            post_id: post.id,
            image: post
                .images
                .first()
                .and_then(|image| image.display_url())
                .map(str::to_string),
            alt: post.caption.clone(),
            multi_image: post.images.len() > 1,
        })
        .collect();
    let empty_message = thumbnails.is_empty().then_some("No posts yet.");

    let modal = state.gallery.active_post().map(|post| {
        let image_count = post.images.len();
        let current = state.gallery.index().unwrap_or(0);
        ModalView {
            image: state
                .gallery
                .current_image()
                .and_then(|image| image.display_url())
                .map(str::to_string),
            alt: post.caption.clone(),
            show_controls: image_count > 1,
            dots: if image_count > 1 {
                (0..image_count)
                    .map(|index| CarouselDot {
                        index,
                        active: index == current,
                    })
                    .collect()
            } else {
                Vec::new()
            },
            date: format_post_date(post.created_at.as_deref()),
            location: post.location.clone().filter(|location| !location.is_empty()),
            caption: post.caption.clone(),
            tags: tag_badges(&post.tags),
            empty_message: (image_count == 0).then_some("No images"),
        }
    });

    PublicPageView {
        header,
        filter_label: state.filter.selected().map(|tag| format!("#{tag}")),
        thumbnails,
        empty_message,
        modal,
    }
}

fn profile_header(profile: &Profile) -> ProfileHeaderView {
    ProfileHeaderView {
        name: if profile.name.is_empty() {
            "No name set".to_string()
        } else {
            profile.name.clone()
        },
        bio: profile.bio.clone(),
        avatar: profile.avatar().map(str::to_string),
        links: link_views(&profile.links),
    }
}

fn link_views(links: &[Link]) -> Vec<LinkView> {
    links
        .iter()
        .map(|link| LinkView::new(&link.label, &link.url))
        .collect()
}

pub fn tag_badges(tags: &[Tag]) -> Vec<TagBadge> {
    tags.iter()
        .map(|tag| TagBadge {
            value: tag.name.clone(),
            label: format!("#{}", tag.name),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCardView {
    pub post_id: PostId,
    pub thumbnail: Option<String>,
    pub caption: String,
    pub date: String,
    pub image_count: String,
    pub status: &'static str,
    pub edit_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPageView {
    pub cards: Vec<FeedCardView>,
    pub empty_message: Option<&'static str>,
    pub creating: bool,
}

pub fn feed_page(posts: &[Post], creating: bool) -> FeedPageView {
    let cards: Vec<FeedCardView> = posts.iter().map(feed_card).collect();
    FeedPageView {
        empty_message: cards.is_empty().then_some("No posts yet. Create one!"),
        cards,
        creating,
    }
}

pub fn feed_card(post: &Post) -> FeedCardView {
    let count = post.images.len();
    FeedCardView {
        post_id: post.id,
        thumbnail: post
            .images
            .first()
            .and_then(|image| image.display_url())
            .map(str::to_string),
        caption: if post.caption.is_empty() {
            "(no caption)".to_string()
        } else {
            post.caption.clone()
        },
        date: format_post_date(post.created_at.as_deref()),
        image_count: format!("{count} image{}", if count == 1 { "" } else { "s" }),
        status: if post.published { "Published" } else { "Draft" },
        edit_href: post_edit_path(post.id),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlotView {
    pub image_id: i64,
    pub src: Option<String>,
    /// 1-based position shown on the tile.
    pub order_label: String,
    pub can_move_left: bool,
    pub can_move_right: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEditorView {
    pub title: String,
    pub caption: String,
    pub location: String,
    pub published: bool,
    pub tags: Vec<TagBadge>,
    pub images: Vec<ImageSlotView>,
    pub empty_images: Option<&'static str>,
    pub saving: bool,
    pub uploading: bool,
    pub notice: Option<&'static str>,
}

pub fn post_editor(
    post: &Post,
    mirror: &PostMirror,
    saving: bool,
    uploading: bool,
    notice: Option<&'static str>,
) -> PostEditorView {
    let last = post.images.len().saturating_sub(1);
    let images: Vec<ImageSlotView> = post
        .images
        .iter()
        .enumerate()
        .map(|(position, image)| ImageSlotView {
            image_id: image.id,
            src: image.display_url().map(str::to_string),
            order_label: (position + 1).to_string(),
            can_move_left: position > 0,
            can_move_right: position < last,
        })
        .collect();

    PostEditorView {
        title: format!("Edit Post #{}", post.id),
        caption: mirror.caption.clone(),
        location: mirror.location.clone(),
        published: mirror.published,
        tags: mirror
            .tags
            .names()
            .iter()
            .map(|name| TagBadge {
                value: name.clone(),
                label: format!("#{name}"),
            })
            .collect(),
        empty_images: images.is_empty().then_some("No images yet."),
        images,
        saving,
        uploading,
        notice,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEditorView {
    pub avatar: Option<String>,
    pub name: String,
    pub bio: String,
    pub links: Vec<LinkView>,
    pub saving: bool,
    pub uploading: bool,
    pub notice: Option<&'static str>,
}

pub fn profile_editor(
    profile: &Profile,
    mirror: &ProfileMirror,
    saving: bool,
    uploading: bool,
    notice: Option<&'static str>,
) -> ProfileEditorView {
    ProfileEditorView {
        avatar: profile.avatar().map(str::to_string),
        name: mirror.name.clone(),
        bio: mirror.bio.clone(),
        links: link_views(mirror.links.entries()),
        saving,
        uploading,
        notice,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFormView {
    pub error: Option<String>,
    pub loading: bool,
    pub submit_enabled: bool,
}

pub fn login_form(state: &AuthState) -> LoginFormView {
    let loading = *state == AuthState::Authenticating;
    LoginFormView {
        error: match state {
            AuthState::Failed(message) => Some(message.clone()),
            _ => None,
        },
        loading,
        submit_enabled: !loading,
    }
}

/// Short human date for a post timestamp. Accepts RFC 3339 and naive ISO
/// datetimes; anything else is shown as received.
pub fn format_post_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return String::new();
    };
    let date = OffsetDateTime::parse(raw, &Rfc3339)
        .map(|moment| moment.date())
        .or_else(|_| PrimitiveDateTime::parse(raw, NAIVE_DATETIME_FORMAT).map(|moment| moment.date()));
    match date.ok().and_then(|date| date.format(SHORT_DATE_FORMAT).ok()) {
        Some(formatted) => formatted,
        None => raw.to_string(),
    }
}
