//! Modal carousel over a public post's images.

use photolog_api_types::{Post, PostImage};

/// Keys the gallery reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Escape" => Self::Escape,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActivePost {
    post: Post,
    index: usize,
}

/// Closed, or open on one post with a carousel position.
///
/// While open, the index stays inside the active post's image range. A post
/// without images is shown at index 0 with nothing to display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryViewer {
    active: Option<ActivePost>,
}

impl GalleryViewer {
    pub fn open(&mut self, post: Post) {
        self.active = Some(ActivePost { post, index: 0 });
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active_post(&self) -> Option<&Post> {
        self.active.as_ref().map(|active| &active.post)
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.active.as_ref().map(|active| active.index)
    }

    #[must_use]
    pub fn current_image(&self) -> Option<&PostImage> {
        let active = self.active.as_ref()?;
        active.post.images.get(active.index)
    }

    pub fn prev(&mut self) {
        if let Some(active) = self.active.as_mut() {
            let len = active.post.images.len();
            if len > 0 {
                active.index = (active.index + len - 1) % len;
            }
        }
    }

    pub fn next(&mut self) {
        if let Some(active) = self.active.as_mut() {
            let len = active.post.images.len();
            if len > 0 {
                active.index = (active.index + 1) % len;
            }
        }
    }

    /// Jumps straight to `index`. Out-of-range positions are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        match self.active.as_mut() {
            Some(active) if index < active.post.images.len() => {
                active.index = index;
                true
            }
            _ => false,
        }
    }

    /// Applies the modal key bindings; returns whether the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::ArrowLeft => self.prev(),
            Key::ArrowRight => self.next(),
            Key::Escape => self.close(),
            Key::Other => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_images(count: i64) -> Post {
        Post {
            id: 1,
            caption: String::new(),
            location: None,
            published: true,
            created_at: None,
            images: (0..count)
                .map(|id| PostImage {
                    id,
                    filename: format!("{id}.jpg"),
                    url: None,
                    order: i32::try_from(id).expect("small"),
                })
                .collect(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn next_wraps_after_full_cycle() {
        let mut gallery = GalleryViewer::default();
        gallery.open(post_with_images(4));
        for _ in 0..4 {
            gallery.next();
        }
        assert_eq!(gallery.index(), Some(0));
    }

    #[test]
    fn prev_from_zero_lands_on_last() {
        let mut gallery = GalleryViewer::default();
        gallery.open(post_with_images(3));
        gallery.prev();
        assert_eq!(gallery.index(), Some(2));
        assert_eq!(gallery.current_image().map(|i| i.id), Some(2));
    }

    #[test]
    fn navigation_without_images_or_when_closed_is_a_no_op() {
        let mut gallery = GalleryViewer::default();
        gallery.next();
        gallery.prev();
        assert_eq!(gallery.index(), None);

        gallery.open(post_with_images(0));
        gallery.next();
        gallery.prev();
        assert_eq!(gallery.index(), Some(0));
        assert!(gallery.current_image().is_none());
    }

    #[test]
    fn open_resets_index() {
        let mut gallery = GalleryViewer::default();
        gallery.open(post_with_images(3));
        gallery.next();
        gallery.open(post_with_images(2));
        assert_eq!(gallery.index(), Some(0));
    }

    #[test]
    fn select_sets_index_only_in_range() {
        let mut gallery = GalleryViewer::default();
        gallery.open(post_with_images(3));
        assert!(gallery.select(2));
        assert_eq!(gallery.index(), Some(2));
        assert!(!gallery.select(3));
        assert_eq!(gallery.index(), Some(2));
    }

    #[test]
    fn keys_only_apply_while_open() {
        let mut gallery = GalleryViewer::default();
        assert!(!gallery.handle_key(Key::ArrowRight));

        gallery.open(post_with_images(2));
        assert!(gallery.handle_key(Key::ArrowRight));
        assert_eq!(gallery.index(), Some(1));
        assert!(gallery.handle_key(Key::ArrowLeft));
        assert_eq!(gallery.index(), Some(0));
        assert!(!gallery.handle_key(Key::Other));
        assert!(gallery.handle_key(Key::Escape));
        assert!(!gallery.is_open());
    }

    #[test]
    fn key_names_map_to_bindings() {
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }
}
