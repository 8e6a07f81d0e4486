//! Route table and the access guard consulted on every navigation.

use url::form_urlencoded;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const FEED_PATH: &str = "/feed";
pub const PROFILE_EDIT_PATH: &str = "/feed/profile";
const POST_EDIT_PREFIX: &str = "/feed/post/";
const REDIRECT_PARAM: &str = "redirect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Feed,
    EditProfile,
    /// Raw id segment; validated when the editor loads.
    EditPost(String),
    Other(String),
}

impl Route {
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let (path, _) = split_location(location);
        let path = path.strip_suffix('/').unwrap_or(path);
        match path {
            HOME_PATH | "" => Self::Home,
            LOGIN_PATH => Self::Login,
            FEED_PATH => Self::Feed,
            PROFILE_EDIT_PATH => Self::EditProfile,
            other => match other.strip_prefix(POST_EDIT_PREFIX) {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::EditPost(id.to_string()),
                _ => Self::Other(other.to_string()),
            },
        }
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Feed | Self::EditProfile | Self::EditPost(_))
    }
}

#[must_use]
pub fn post_edit_path(id: impl std::fmt::Display) -> String {
    format!("{POST_EDIT_PREFIX}{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Protected routes bounce anonymous sessions to login (remembering where they
/// were headed); login bounces authenticated sessions to the feed.
#[must_use]
pub fn guard(target: &str, logged_in: bool) -> GuardDecision {
    let route = Route::parse(target);
    if route.requires_auth() && !logged_in {
        return GuardDecision::Redirect(login_with_redirect(target));
    }
    if route == Route::Login && logged_in {
        return GuardDecision::Redirect(FEED_PATH.to_string());
    }
    GuardDecision::Proceed
}

#[must_use]
pub fn login_with_redirect(full_path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(REDIRECT_PARAM, full_path)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// The `redirect` query parameter of `location`, if any.
#[must_use]
pub fn redirect_target(location: &str) -> Option<String> {
    let (_, query) = split_location(location);
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[must_use]
pub fn split_location(location: &str) -> (&str, Option<&str>) {
    match location.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (location, None),
    }
}
