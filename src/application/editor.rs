//! Load / edit / save cycle shared by the post and profile editors.
//!
//! The editor keeps two copies of a resource: the canonical form last returned
//! by the server, and a mirror holding only the fields the owner can type into.
//! Saving sends the mirror and replaces both copies with the server's echo.
//! Uploads and image operations replace the canonical copy only, so unsaved
//! typing in the mirror survives them.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::Method;
use reqwest::multipart::Form;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::infra::lock::mutex_lock;

use super::api::{ApiClient, RequestOptions, UploadFile, decode_json};
use super::error::ClientError;

pub const SAVE_NOTICE_TEXT: &str = "Saved!";
pub const SAVE_NOTICE_TTL: Duration = Duration::from_secs(2);

/// A server-owned resource that can be edited through [`ResourceEditor`].
pub trait EditableResource: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    type Mirror: Clone + Debug + Send + Sync;
    type Patch: Serialize;

    const KIND: &'static str;
    /// Where to send the shell when the resource is rejected on load. `None`
    /// means load failures are returned to the caller.
    const FALLBACK_ROUTE: Option<&'static str>;

    fn mirror(&self) -> Self::Mirror;
    fn patch(mirror: &Self::Mirror) -> Self::Patch;

    /// Applied to every copy received from the server.
    fn normalize(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Redirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Another save was still outstanding.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    Suppressed,
    /// Nothing was selected.
    Skipped,
}

/// Transient confirmation shown after a successful save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveNotice {
    shown_at: Option<Instant>,
}

impl SaveNotice {
    pub fn show(&mut self, at: Instant) {
        self.shown_at = Some(at);
    }

    pub fn clear(&mut self) {
        self.shown_at = None;
    }

    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|shown| now.saturating_duration_since(shown) < SAVE_NOTICE_TTL)
    }

    #[must_use]
    pub fn text(&self, now: Instant) -> Option<&'static str> {
        self.is_visible(now).then_some(SAVE_NOTICE_TEXT)
    }
}

/// Holds an in-flight flag for the lifetime of one operation.
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
struct EditorState<R: EditableResource> {
    canonical: Option<R>,
    mirror: Option<R::Mirror>,
    notice: SaveNotice,
}

#[derive(Debug, Clone)]
pub struct ResourceEditor<R: EditableResource> {
    api: ApiClient,
    path: String,
    state: Arc<Mutex<EditorState<R>>>,
    saving: Arc<AtomicBool>,
    uploading: Arc<AtomicBool>,
}

impl<R: EditableResource> ResourceEditor<R> {
    /// Editor for the resource served at `path` (relative to the API root).
    pub fn new(api: ApiClient, path: impl Into<String>) -> Self {
        Self {
            api,
            path: path.into(),
            state: Arc::new(Mutex::new(EditorState {
                canonical: None,
                mirror: None,
                notice: SaveNotice::default(),
            })),
            saving: Arc::new(AtomicBool::new(false)),
            uploading: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn load(&self) -> Result<LoadOutcome, ClientError> {
        let fetched = async {
            let response = self.api.request(&self.path, RequestOptions::get()).await?;
            decode_json::<R>(response, R::KIND).await
        }
        .await;

        match fetched {
            Ok(resource) => {
                self.reset_from(resource);
                debug!(kind = R::KIND, path = %self.path, "resource loaded");
                Ok(LoadOutcome::Loaded)
            }
            Err(err) if err.is_rejection() => match R::FALLBACK_ROUTE {
                Some(route) => {
                    warn!(kind = R::KIND, path = %self.path, error = %err, "resource unavailable; leaving editor");
                    self.api.navigator().navigate(route);
                    Ok(LoadOutcome::Redirected)
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Sends the mirror as a partial update. Calls made while a save is
    /// outstanding return [`SaveOutcome::Suppressed`] without touching the network.
    pub async fn save(&self) -> Result<SaveOutcome, ClientError> {
        let Some(_in_flight) = InFlight::acquire(&self.saving) else {
            debug!(kind = R::KIND, "save already in flight; ignoring");
            return Ok(SaveOutcome::Suppressed);
        };

        let patch = {
            let mut state = mutex_lock(&self.state, "application::editor", "save");
            state.notice.clear();
            let mirror = state.mirror.as_ref().ok_or(ClientError::NotLoaded(R::KIND))?;
            R::patch(mirror)
        };

        let options = RequestOptions::json(Method::PATCH, &patch)?;
        let saved = async {
            let response = self.api.request(&self.path, options).await?;
            decode_json::<R>(response, R::KIND).await
        }
        .await;

        match saved {
            Ok(echo) => {
                self.reset_from(echo);
                mutex_lock(&self.state, "application::editor", "save")
                    .notice
                    .show(Instant::now());
                info!(kind = R::KIND, path = %self.path, "saved");
                Ok(SaveOutcome::Saved)
            }
            Err(err) => {
                warn!(kind = R::KIND, path = %self.path, error = %err, "save failed");
                Err(err)
            }
        }
    }

    /// Sends `options` to `path` and installs the echoed resource as canonical.
    pub async fn send_replacing(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<R, ClientError> {
        let response = self.api.request(path, options).await?;
        let mut echo = decode_json::<R>(response, R::KIND).await?;
        echo.normalize();
        mutex_lock(&self.state, "application::editor", "replace").canonical = Some(echo.clone());
        Ok(echo)
    }

    /// Posts `files` as multipart parts named `field`. Only one upload runs at a time.
    pub async fn upload(
        &self,
        path: &str,
        field: &'static str,
        files: Vec<UploadFile>,
    ) -> Result<UploadOutcome, ClientError> {
        if files.is_empty() {
            return Ok(UploadOutcome::Skipped);
        }
        let Some(_in_flight) = InFlight::acquire(&self.uploading) else {
            debug!(kind = R::KIND, "upload already in flight; ignoring");
            return Ok(UploadOutcome::Suppressed);
        };

        let count = files.len();
        let mut form = Form::new();
        for file in files {
            form = form.part(field, file.into_part()?);
        }

        match self
            .send_replacing(path, RequestOptions::multipart(Method::POST, form))
            .await
        {
            Ok(_) => {
                info!(kind = R::KIND, files = count, "upload complete");
                Ok(UploadOutcome::Uploaded)
            }
            Err(err) => {
                warn!(kind = R::KIND, error = %err, "upload failed");
                Err(err)
            }
        }
    }

    /// Applies `f` to the mirror.
    pub fn edit<T>(&self, f: impl FnOnce(&mut R::Mirror) -> T) -> Result<T, ClientError> {
        let mut state = mutex_lock(&self.state, "application::editor", "edit");
        let mirror = state.mirror.as_mut().ok_or(ClientError::NotLoaded(R::KIND))?;
        Ok(f(mirror))
    }

    /// Applies `f` to the canonical copy. Used for optimistic local changes.
    pub(crate) fn edit_canonical<T>(&self, f: impl FnOnce(&mut R) -> T) -> Result<T, ClientError> {
        let mut state = mutex_lock(&self.state, "application::editor", "edit_canonical");
        let canonical = state
            .canonical
            .as_mut()
            .ok_or(ClientError::NotLoaded(R::KIND))?;
        Ok(f(canonical))
    }

    #[must_use]
    pub fn canonical(&self) -> Option<R> {
        mutex_lock(&self.state, "application::editor", "canonical")
            .canonical
            .clone()
    }

    #[must_use]
    pub fn mirror(&self) -> Option<R::Mirror> {
        mutex_lock(&self.state, "application::editor", "mirror")
            .mirror
            .clone()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn notice(&self) -> SaveNotice {
        mutex_lock(&self.state, "application::editor", "notice").notice
    }

    fn reset_from(&self, mut resource: R) {
        resource.normalize();
        let mirror = resource.mirror();
        let mut state = mutex_lock(&self.state, "application::editor", "reset");
        state.mirror = Some(mirror);
        state.canonical = Some(resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_lasts_two_seconds() {
        let start = Instant::now();
        let mut notice = SaveNotice::default();
        assert_eq!(notice.text(start), None);

        notice.show(start);
        assert_eq!(notice.text(start), Some("Saved!"));
        assert!(notice.is_visible(start + Duration::from_millis(1_999)));
        assert!(!notice.is_visible(start + SAVE_NOTICE_TTL));

        notice.show(start + Duration::from_secs(5));
        assert!(notice.is_visible(start + Duration::from_secs(6)));
        notice.clear();
        assert!(!notice.is_visible(start + Duration::from_secs(6)));
    }

    #[test]
    fn in_flight_flag_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let first = InFlight::acquire(&flag).expect("free flag");
        assert!(InFlight::acquire(&flag).is_none());
        drop(first);
        assert!(InFlight::acquire(&flag).is_some());
        assert!(!flag.load(Ordering::Acquire));
    }
}
