//! Every network call goes through [`ApiClient`]: it prefixes the API root,
//! attaches the bearer token, and turns 401 answers into a terminated session.
//! All other statuses come back untouched; callers check them with
//! [`decode_json`] or [`expect_success`] before trusting a body.

use bytes::Bytes;
use metrics::counter;
use reqwest::{
    Client, Method, Request, Response, StatusCode, Url,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::config::ApiSettings;
use crate::domain::routes::LOGIN_PATH;
use crate::infra::telemetry::{API_REQUESTS_TOTAL, SESSION_TERMINATIONS_TOTAL};

use super::error::ClientError;
use super::navigation::Navigator;
use super::session::SessionManager;

#[derive(Debug)]
pub enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Multipart(Form),
}

#[derive(Debug)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn json<T: Serialize>(method: Method, body: &T) -> Result<Self, ClientError> {
        let encoded = serde_json::to_vec(body)
            .map_err(|err| ClientError::InvalidInput(format!("failed to encode body: {err}")))?;
        Ok(Self {
            body: RequestBody::Json(encoded),
            ..Self::new(method)
        })
    }

    #[must_use]
    pub fn multipart(method: Method, form: Form) -> Self {
        Self {
            body: RequestBody::Multipart(form),
            ..Self::new(method)
        }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn query<K: Into<String>>(mut self, pairs: impl IntoIterator<Item = (K, String)>) -> Self {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value)));
        self
    }
}

/// A file picked for upload, held in memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &std::path::Path) -> Result<Self, ClientError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::InputFile {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Ok(Self::new(file_name, data))
    }

    pub(crate) fn into_part(self) -> Result<Part, ClientError> {
        let mime = mime_guess::from_path(&self.file_name).first_or_octet_stream();
        Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name)
            .mime_str(mime.essence_str())
            .map_err(|err| ClientError::InvalidInput(err.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    root: String,
    session: SessionManager,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(
        settings: &ApiSettings,
        session: SessionManager,
        navigator: Navigator,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            http,
            base: settings.base_url.clone(),
            root: settings.root.clone(),
            session,
            navigator,
        })
    }

    #[must_use]
    pub fn user_agent() -> &'static str {
        concat!("photolog/", env!("CARGO_PKG_VERSION"))
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        let full = format!("{}/{}", self.root, path.trim_start_matches('/'));
        self.base.join(&full).map_err(ClientError::Url)
    }

    /// Builds the outgoing request, attaching the bearer token when one is held.
    pub fn build(&self, path: &str, options: RequestOptions) -> Result<Request, ClientError> {
        self.build_with(path, options, self.session.token().as_deref())
    }

    fn build_with(
        &self,
        path: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> Result<Request, ClientError> {
        let RequestOptions {
            method,
            mut headers,
            query,
            body,
        } = options;

        let mut url = self.url(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| ClientError::InvalidInput(err.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self.http.request(method, url);
        builder = match body {
            RequestBody::Empty => builder.headers(headers),
            RequestBody::Json(bytes) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                builder.headers(headers).body(bytes)
            }
            // The transport writes the multipart boundary into its own content type.
            RequestBody::Multipart(form) => {
                headers.remove(CONTENT_TYPE);
                builder.headers(headers).multipart(form)
            }
        };

        builder
            .build()
            .map_err(|err| ClientError::InvalidInput(err.to_string()))
    }

    /// Sends an owner request. A 401 clears the session, sends the shell to
    /// login, and fails with [`ClientError::Auth`]; any other status is
    /// returned as-is.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let request = self.build(path, options)?;
        let response = self.execute(request).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            counter!(SESSION_TERMINATIONS_TOTAL).increment(1);
            warn!(path, "server rejected credentials; ending session");
            if let Err(err) = self.session.clear_token() {
                warn!(error = %err, "failed to remove persisted token");
            }
            self.navigator.navigate(LOGIN_PATH);
            return Err(ClientError::Auth);
        }

        Ok(response)
    }

    /// Sends a request without credentials and without 401 interception. Used
    /// for the token exchange, where 401 means a wrong passphrase.
    pub async fn request_anonymous(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let request = self.build_with(path, options, None)?;
        self.execute(request).await
    }

    async fn execute(&self, request: Request) -> Result<Response, ClientError> {
        let method = request.method().clone();
        let url = request.url().clone();
        match self.http.execute(request).await {
            Ok(response) => {
                let status = response.status();
                let outcome = match status {
                    StatusCode::UNAUTHORIZED => "unauthorized",
                    s if s.is_success() => "success",
                    _ => "status",
                };
                counter!(API_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
                debug!(%method, path = url.path(), status = status.as_u16(), "api response");
                Ok(response)
            }
            Err(err) => {
                counter!(API_REQUESTS_TOTAL, "outcome" => "network").increment(1);
                warn!(%method, path = url.path(), error = %err, "api request failed in transport");
                Err(ClientError::Network(err))
            }
        }
    }
}

/// Checks the status, then decodes the body as `T`.
pub async fn decode_json<T: DeserializeOwned>(
    response: Response,
    what: &'static str,
) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes).into_owned();
        return Err(ClientError::Status { status, body });
    }
    serde_json::from_slice(&bytes).map_err(|err| ClientError::decode(what, err.to_string()))
}

/// Checks the status of a response whose body is not needed.
pub async fn expect_success(response: Response) -> Result<(), ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}
