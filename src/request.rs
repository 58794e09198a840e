//! Request model: attachments, endpoints, and the multipart payload handed to
//! a [`Transport`](crate::transport::Transport).

use crate::{Error, Result};
use std::path::Path;

/// A binary file to be sent as a multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// File name reported in the part's `Content-Disposition`
    pub file_name: String,
    /// MIME type of the part
    pub mime_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::ValidationError(format!("Not a file path: {}", path.display()))
            })?
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// The two generation endpoints exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    QuotePoster,
    Moodboard,
}

impl Endpoint {
    /// Path relative to the service origin
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::QuotePoster => "/generate-quote-poster",
            Endpoint::Moodboard => "/generate-moodboard",
        }
    }

    /// Multipart field name used for this endpoint's file parts
    pub fn attachment_field(&self) -> &'static str {
        match self {
            Endpoint::QuotePoster => "background_file",
            Endpoint::Moodboard => "files",
        }
    }

    /// Default name offered when saving the generated artifact
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Endpoint::QuotePoster => "quote-poster.png",
            Endpoint::Moodboard => "moodboard.png",
        }
    }

    /// Message surfaced when a failure carries no server detail
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Endpoint::QuotePoster => "Failed to generate poster",
            Endpoint::Moodboard => "Failed to generate moodboard",
        }
    }

    pub(crate) fn missing_input_message(&self) -> &'static str {
        match self {
            Endpoint::QuotePoster => "Please enter some text for your quote",
            Endpoint::Moodboard => "Please select at least one image",
        }
    }
}

/// A single submission: scalar form fields plus zero or more file parts.
///
/// Built fresh for every submit and dropped once the call resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    endpoint: Endpoint,
    parameters: Vec<(String, String)>,
    attachments: Vec<Attachment>,
}

impl GenerationRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            parameters: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Append a scalar field; order is preserved on the wire.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.push((name.into(), value.to_string()));
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Look up the first value for a field name
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Check the endpoint's required-field rule: non-blank `text` for
    /// posters, at least one attachment for moodboards.
    pub fn validate(&self) -> Result<()> {
        let satisfied = match self.endpoint {
            Endpoint::QuotePoster => self
                .parameter("text")
                .map(|t| !t.trim().is_empty())
                .unwrap_or(false),
            Endpoint::Moodboard => !self.attachments.is_empty(),
        };
        if satisfied {
            Ok(())
        } else {
            Err(Error::ValidationError(
                self.endpoint.missing_input_message().to_string(),
            ))
        }
    }

    /// Flatten into the wire-level payload.
    pub fn to_payload(&self) -> FormPayload {
        let field = self.endpoint.attachment_field();
        let mut payload = FormPayload::new();
        for (name, value) in &self.parameters {
            payload = payload.text(name.clone(), value.clone());
        }
        for attachment in &self.attachments {
            payload = payload.file(field, attachment.clone());
        }
        payload
    }
}

/// Multipart body contents, independent of any HTTP library
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, Attachment)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, name: impl Into<String>, attachment: Attachment) -> Self {
        self.files.push((name.into(), attachment));
        self
    }

    /// Names of all parts, fields first, in send order
    pub fn part_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|(n, _)| n.as_str())
            .chain(self.files.iter().map(|(n, _)| n.as_str()))
            .collect()
    }
}

/// A user-facing form that can be turned into a [`GenerationRequest`].
///
/// Implementations perform their own field checks (ranges, formats) in
/// `build_request`; the endpoint's required-field rule is enforced again by
/// the client before anything is sent.
pub trait GenerationForm {
    /// Endpoint this form submits to
    fn endpoint(&self) -> Endpoint;

    /// Validate the form state and build a fresh request
    fn build_request(&self) -> Result<GenerationRequest>;
}
