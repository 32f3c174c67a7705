//! HTTP plumbing shared by every endpoint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use fraudwatch_types::{ActionResponse, Download, ListResponse};

use crate::BackendError;

const DEFAULT_ENDPOINT: &str = "http://localhost:5001";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the fraud-monitoring backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base: Url,
}

impl BackendClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> BackendClientBuilder {
        BackendClientBuilder::default()
    }

    /// Base URL every path is resolved against.
    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    /// Resolve an API path (`/api/alerts`) against the endpoint.
    ///
    /// Paths are joined below the endpoint's own path, so a backend mounted
    /// at `http://host/fraud/` keeps its prefix.
    pub fn url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Turn a link returned by the backend into an absolute URL.
    ///
    /// Absolute links are kept as-is, relative ones are resolved like
    /// [`url`](Self::url).
    pub fn resolve(&self, link: &str) -> Result<Url, BackendError> {
        match Url::parse(link) {
            Ok(url) if url.has_host() => Ok(url),
            _ => self.url(link),
        }
    }

    /// GET a JSON document.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self.send(self.client.get(url).query(query)).await?;
        decode(response).await
    }

    /// GET a list endpoint, accepting both `{"items": [...]}` and bare arrays.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let list: ListResponse<T> = self.get(path, query).await?;
        Ok(list.into_items())
    }

    /// Call a mutating endpoint.
    ///
    /// Only returns `Ok` when the backend reports success. `success: false`
    /// and error statuses carrying a message become
    /// [`BackendError::Rejected`].
    pub async fn action<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ActionResponse, BackendError> {
        let url = self.url(path)?;
        tracing::debug!(%url, %method, "action");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(BackendError::Status { status, body }) => {
                return Err(rejection_from_body(status, body));
            }
            Err(err) => return Err(err),
        };

        let result: ActionResponse = decode(response).await?;
        if !result.is_success() {
            return Err(BackendError::Rejected {
                message: result.message_or("The request was rejected").to_string(),
            });
        }
        Ok(result)
    }

    /// Call an export endpoint and return the produced file's absolute URL.
    pub async fn export<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Download, BackendError> {
        let result = self.action(Method::POST, path, Some(body)).await?;
        let mut download = Download::from_response(&result).ok_or_else(|| {
            BackendError::Malformed("export response has no download_url".to_string())
        })?;
        download.download_url = self.resolve(&download.download_url)?.to_string();
        Ok(download)
    }

    /// Fetch an exported file into `dir` and return where it was saved.
    pub async fn download(&self, download: &Download, dir: &Path) -> Result<PathBuf, BackendError> {
        let url = self.resolve(&download.download_url)?;
        let response = self.send(self.client.get(url.clone())).await?;

        let name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition)
            .or_else(|| filename_from_url(&url))
            .or_else(|| download.export_id.clone())
            .unwrap_or_else(|| "download".to_string());

        let bytes = response.bytes().await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "download saved");
        Ok(path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "backend returned error status");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed(e.to_string()))
}

/// Error statuses with a JSON message are application failures, not
/// transport ones.
fn rejection_from_body(status: u16, body: String) -> BackendError {
    match serde_json::from_str::<ActionResponse>(&body) {
        Ok(ActionResponse {
            message: Some(message),
            ..
        }) => BackendError::Rejected { message },
        _ => BackendError::Status { status, body },
    }
}

fn filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .and_then(sanitize_filename)
}

fn filename_from_url(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .and_then(sanitize_filename)
}

/// Keep only the final path component so a hostile name cannot escape `dir`.
fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// Builder for [`BackendClient`].
#[derive(Debug, Default)]
pub struct BackendClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl BackendClientBuilder {
    /// Set the backend base URL (e.g., "http://localhost:5001").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BackendClient, BackendError> {
        let mut endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)?;

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(BackendClient { client, base })
    }
}
