//! Generation request client: turns validated form state into one HTTP
//! submission and normalises every outcome into a [`GenerationResult`].

use crate::request::{Attachment, FormPayload, GenerationForm, GenerationRequest};
use crate::result::GenerationResult;
use crate::transport::{Transport, TransportResponse};
use crate::{ClientConfig, Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    success: bool,
    download_url: Option<String>,
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    filename: Option<String>,
    message: Option<String>,
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BackgroundList {
    #[serde(default)]
    backgrounds: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Service self-description returned by `GET /`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

// Only string details are shown to users; FastAPI's 422 arrays are not.
fn string_detail(detail: Option<serde_json::Value>) -> Option<String> {
    match detail {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

fn service_error(response: &TransportResponse) -> Error {
    let detail = serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|b| string_detail(b.detail));
    Error::ServiceError {
        status: Some(response.status),
        detail,
    }
}

fn decode<D: DeserializeOwned>(response: &TransportResponse) -> Result<D> {
    if !response.is_success() {
        return Err(service_error(response));
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        log::debug!("Undecodable response body (HTTP {}): {}", response.status, e);
        Error::ServiceError {
            status: Some(response.status),
            detail: None,
        }
    })
}

// Query and fragment never belong to the joined URL.
fn join(origin: &Url, path: &str) -> String {
    let mut origin = origin.clone();
    origin.set_query(None);
    origin.set_fragment(None);
    let base = origin.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Resolve a service-relative artifact path against `origin`.
///
/// Exactly one `/` separates the origin from the path. Absolute http(s)
/// URLs are returned unchanged. The joined URL is normalised by the `url`
/// crate: `.`/`..` segments are resolved and characters such as spaces are
/// percent-encoded, so the result equals plain concatenation only for paths
/// that are already normalised (as the service's generated names are).
pub fn resolve_artifact_url(origin: &Url, path: &str) -> Result<String> {
    let path = path.trim();
    if let Ok(absolute) = Url::parse(path) {
        if matches!(absolute.scheme(), "http" | "https") {
            return Ok(absolute.into());
        }
    }
    Url::parse(&join(origin, path))
        .map(String::from)
        .map_err(|e| {
            log::debug!("Cannot resolve download_url '{}': {}", path, e);
            Error::ServiceError {
                status: None,
                detail: None,
            }
        })
}

/// Client for the poster / moodboard generation service
pub struct GenerationClient<T> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "http")]
impl GenerationClient<crate::transport::HttpTransport> {
    /// Create a client backed by a real HTTP transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = crate::transport::HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> GenerationClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for a service path
    pub fn endpoint_url(&self, path: &str) -> String {
        join(&self.config.origin, path)
    }

    /// Build a request from `form` and submit it.
    ///
    /// Never fails: validation, transport and service errors all come back
    /// as [`GenerationResult::Failed`].
    pub fn submit<F: GenerationForm + ?Sized>(&self, form: &F) -> GenerationResult {
        let endpoint = form.endpoint();
        match form.build_request() {
            Ok(request) => self.submit_request(&request),
            Err(err) => {
                log::debug!("Rejected {} before sending: {}", endpoint.path(), err);
                GenerationResult::from_error(&err, endpoint.fallback_message())
            }
        }
    }

    /// Submit an already-built request (single attempt, no retry).
    pub fn submit_request(&self, request: &GenerationRequest) -> GenerationResult {
        let endpoint = request.endpoint();
        match self.try_submit(request) {
            Ok(artifact_url) => {
                log::info!("Generated {} via {}", artifact_url, endpoint.path());
                GenerationResult::Succeeded { artifact_url }
            }
            Err(err) => {
                log::warn!("{} failed: {}", endpoint.path(), err);
                GenerationResult::from_error(&err, endpoint.fallback_message())
            }
        }
    }

    fn try_submit(&self, request: &GenerationRequest) -> Result<String> {
        request.validate()?;

        let url = self.endpoint_url(request.endpoint().path());
        let payload = request.to_payload();
        log::debug!(
            "POST {} ({} fields, {} files)",
            url,
            payload.fields.len(),
            payload.files.len()
        );

        let response = self.transport.post_form(&url, &payload)?;
        let body: GenerationResponse = decode(&response)?;
        if !body.success {
            return Err(Error::ServiceError {
                status: Some(response.status),
                detail: string_detail(body.detail),
            });
        }
        match body.download_url.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => resolve_artifact_url(&self.config.origin, path),
            _ => Err(Error::ServiceError {
                status: Some(response.status),
                detail: None,
            }),
        }
    }

    /// Fetch the artifact once and save it as `dest_dir/suggested_file_name`.
    ///
    /// Only the final path component of `suggested_file_name` is used.
    pub fn trigger_download(
        &self,
        artifact_url: &str,
        suggested_file_name: &str,
        dest_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let file_name = Path::new(suggested_file_name)
            .file_name()
            .ok_or_else(|| {
                Error::ValidationError(format!("Invalid file name '{}'", suggested_file_name))
            })?;

        let response = self.transport.get(artifact_url)?;
        if !response.is_success() {
            return Err(service_error(&response));
        }

        let dest_dir = dest_dir.as_ref();
        std::fs::create_dir_all(dest_dir)?;
        let path = dest_dir.join(file_name);
        std::fs::write(&path, &response.body)?;
        log::info!("Saved {} ({} bytes)", path.display(), response.body.len());
        Ok(path)
    }

    /// Store a background on the service for later reuse; returns its
    /// service-side file name.
    pub fn upload_background(&self, file: Attachment) -> Result<String> {
        let url = self.endpoint_url("/upload-background");
        let payload = FormPayload::new().file("file", file);
        log::debug!("POST {}", url);

        let response = self.transport.post_form(&url, &payload)?;
        let body: UploadResponse = decode(&response)?;
        match (body.success, body.filename) {
            (true, Some(name)) if !name.is_empty() => {
                if let Some(msg) = body.message {
                    log::info!("{}", msg);
                }
                Ok(name)
            }
            _ => Err(Error::ServiceError {
                status: Some(response.status),
                detail: string_detail(body.detail),
            }),
        }
    }

    /// Names of backgrounds previously uploaded to the service
    pub fn list_backgrounds(&self) -> Result<Vec<String>> {
        let url = self.endpoint_url("/backgrounds");
        log::debug!("GET {}", url);
        let body: BackgroundList = decode(&self.transport.get(&url)?)?;
        Ok(body.backgrounds)
    }

    /// Service health check
    pub fn health(&self) -> Result<ServiceInfo> {
        let url = self.endpoint_url("/");
        log::debug!("GET {}", url);
        decode(&self.transport.get(&url)?)
    }
}
