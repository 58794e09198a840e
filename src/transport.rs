//! Network seam between the client and the generation service.
//!
//! The client only ever talks to a [`Transport`]; the default
//! [`HttpTransport`] (feature `http`) sends real multipart requests with a
//! blocking reqwest client, and tests substitute in-memory implementations.

use crate::request::FormPayload;
use crate::Result;

/// Raw response as seen by the client: status code and body bytes
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single-attempt request executor.
///
/// Implementations must not retry; any failure to obtain a response is
/// reported as [`Error::TransportError`](crate::Error::TransportError).
/// Non-2xx responses are *not* errors at this layer.
pub trait Transport: Send {
    /// POST `payload` as `multipart/form-data` to `url`
    fn post_form(&self, url: &str, payload: &FormPayload) -> Result<TransportResponse>;

    /// GET `url`
    fn get(&self, url: &str) -> Result<TransportResponse>;
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use super::{Transport, TransportResponse};
    use crate::request::FormPayload;
    use crate::{ClientConfig, Error, Result};
    use reqwest::blocking::multipart::{Form, Part};
    use reqwest::blocking::{Client, Response};
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    /// reqwest-backed transport
    ///
    /// No request timeout is set beyond reqwest's own default.
    pub struct HttpTransport {
        client: Client,
    }

    impl HttpTransport {
        pub fn new(config: &ClientConfig) -> Result<Self> {
            let mut headers = HeaderMap::new();
            for (name, value) in &config.headers {
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    Error::ConfigError(format!("Invalid header name '{}': {}", name, e))
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    Error::ConfigError(format!("Invalid value for header '{}': {}", name, e))
                })?;
                headers.insert(name, value);
            }

            let client = Client::builder()
                .user_agent(config.user_agent.clone())
                .default_headers(headers)
                .build()
                .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

            Ok(Self { client })
        }

        fn build_form(payload: &FormPayload) -> Result<Form> {
            let mut form = Form::new();
            for (name, value) in &payload.fields {
                form = form.text(name.clone(), value.clone());
            }
            for (name, file) in &payload.files {
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime_type)
                    .map_err(|e| {
                        Error::TransportError(format!(
                            "Invalid MIME type '{}' for {}: {}",
                            file.mime_type, file.file_name, e
                        ))
                    })?;
                form = form.part(name.clone(), part);
            }
            Ok(form)
        }

        fn read(method: &str, url: &str, res: Response) -> Result<TransportResponse> {
            let status = res.status().as_u16();
            let body = res.bytes().map_err(|e| {
                Error::TransportError(format!("{} {}: failed to read response body: {}", method, url, e))
            })?;
            Ok(TransportResponse::new(status, body.to_vec()))
        }
    }

    impl Transport for HttpTransport {
        fn post_form(&self, url: &str, payload: &FormPayload) -> Result<TransportResponse> {
            let form = Self::build_form(payload)?;
            let res = self
                .client
                .post(url)
                .multipart(form)
                .send()
                .map_err(|e| Error::TransportError(format!("POST {} failed: {}", url, e)))?;
            Self::read("POST", url, res)
        }

        fn get(&self, url: &str) -> Result<TransportResponse> {
            let res = self
                .client
                .get(url)
                .send()
                .map_err(|e| Error::TransportError(format!("GET {} failed: {}", url, e)))?;
            Self::read("GET", url, res)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::request::Attachment;

        #[test]
        fn rejects_bad_header_config() {
            let mut config = ClientConfig::default();
            config
                .headers
                .insert("bad header".to_string(), "x".to_string());
            assert!(matches!(
                HttpTransport::new(&config),
                Err(Error::ConfigError(_))
            ));
        }

        #[test]
        fn bad_mime_is_a_transport_error() {
            let payload = FormPayload::new().file("files", Attachment::new("a", "not a mime", vec![1]));
            assert!(matches!(
                HttpTransport::build_form(&payload),
                Err(Error::TransportError(_))
            ));
        }

        #[test]
        fn unreachable_host_is_a_transport_error() {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
            let res = transport.get(&format!("http://{}/", addr));
            assert!(matches!(res, Err(Error::TransportError(_))));
        }
    }
}
