//! Mutation rules for the collections hanging off posts and profiles: the tag
//! set, the link list, and the image sequence.

use photolog_api_types::{ImageId, Link, PostImage, Tag};

/// Canonical tag form: surrounding whitespace removed, lowercased.
#[must_use]
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Tag names of a post, unique under case-insensitive comparison, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    names: Vec<String>,
}

impl TagSet {
    #[must_use]
    pub fn from_tags(tags: &[Tag]) -> Self {
        let mut set = Self::default();
        for tag in tags {
            set.add(&tag.name);
        }
        set
    }

    /// Normalizes and appends `raw`. Empty or already-present names are ignored.
    pub fn add(&mut self, raw: &str) -> bool {
        let name = normalize_tag(raw);
        if name.is_empty() || self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Removes the entry equal to `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|existing| existing != name);
        self.names.len() != before
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.names
            .iter()
            .any(|existing| existing.to_lowercase() == needle)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Profile links plus the staging row used to compose a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkList {
    entries: Vec<Link>,
    draft_label: String,
    draft_url: String,
}

impl LinkList {
    #[must_use]
    pub fn from_links(links: &[Link]) -> Self {
        Self {
            entries: links.to_vec(),
            ..Self::default()
        }
    }

    pub fn set_draft(&mut self, label: impl Into<String>, url: impl Into<String>) {
        self.draft_label = label.into();
        self.draft_url = url.into();
    }

    #[must_use]
    pub fn draft(&self) -> (&str, &str) {
        (&self.draft_label, &self.draft_url)
    }

    /// Commits the staging row. Requires both fields; clears them on success.
    pub fn add_draft(&mut self) -> bool {
        if self.draft_label.is_empty() || self.draft_url.is_empty() {
            return false;
        }
        self.entries.push(Link {
            label: std::mem::take(&mut self.draft_label),
            url: std::mem::take(&mut self.draft_url),
        });
        true
    }

    pub fn add(&mut self, label: &str, url: &str) -> bool {
        self.set_draft(label, url);
        self.add_draft()
    }

    pub fn remove(&mut self, index: usize) -> Option<Link> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Edits an existing row in place.
    pub fn update(&mut self, index: usize, label: &str, url: &str) -> bool {
        match self.entries.get_mut(index) {
            Some(link) => {
                label.clone_into(&mut link.label);
                url.clone_into(&mut link.url);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Link] {
        &self.entries
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Link> {
        self.entries.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

impl MoveDirection {
    #[must_use]
    pub fn offset(self) -> isize {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

impl TryFrom<i32> for MoveDirection {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Left),
            1 => Ok(Self::Right),
            other => Err(other),
        }
    }
}

/// Local reorder for moving `image_id` one slot. `None` when the image is absent
/// or the target slot falls outside the sequence.
#[must_use]
pub fn plan_image_move(
    images: &[PostImage],
    image_id: ImageId,
    direction: MoveDirection,
) -> Option<Vec<PostImage>> {
    let index = images.iter().position(|image| image.id == image_id)?;
    let target = index.checked_add_signed(direction.offset())?;
    if target >= images.len() {
        return None;
    }
    let mut reordered = images.to_vec();
    reordered.swap(index, target);
    renumber(&mut reordered);
    Some(reordered)
}

/// Rewrites positions so they run 0..n in sequence order.
pub fn renumber(images: &mut [PostImage]) {
    for (position, image) in images.iter_mut().enumerate() {
        image.order = i32::try_from(position).unwrap_or(i32::MAX);
    }
}

#[must_use]
pub fn image_ids(images: &[PostImage]) -> Vec<ImageId> {
    images.iter().map(|image| image.id).collect()
}
