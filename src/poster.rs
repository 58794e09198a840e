//! Quote poster form: text plus styling options and an optional background.

use crate::request::{Attachment, Endpoint, GenerationForm, GenerationRequest};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Smallest font size the service accepts
pub const MIN_FONT_SIZE: u32 = 20;
/// Largest font size the service accepts
pub const MAX_FONT_SIZE: u32 = 120;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => Err(Error::ValidationError(format!(
                "Unknown alignment '{}' (expected left, center or right)",
                other
            ))),
        }
    }
}

/// Poster orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            other => Err(Error::ValidationError(format!(
                "Unknown orientation '{}' (expected horizontal or vertical)",
                other
            ))),
        }
    }
}

/// State of the quote poster form
///
/// Defaults match the service's own defaults: 50px white centred text on a
/// horizontal poster with the built-in background.
///
/// ```
/// use postergen::{GenerationForm, QuotePosterForm};
///
/// let form = QuotePosterForm::new("Hello World");
/// let req = form.build_request().unwrap();
/// assert_eq!(req.parameter("font_size"), Some("50"));
/// assert!(req.attachments().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuotePosterForm {
    pub text: String,
    pub font_size: u32,
    /// `#RRGGBB`
    pub color: String,
    pub alignment: Alignment,
    pub orientation: Orientation,
    /// Freshly uploaded background, sent as `background_file`
    pub background: Option<Attachment>,
    /// Name of a background already stored on the service
    pub existing_background: Option<String>,
}

impl Default for QuotePosterForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 50,
            color: "#FFFFFF".to_string(),
            alignment: Alignment::default(),
            orientation: Orientation::default(),
            background: None,
            existing_background: None,
        }
    }
}

impl QuotePosterForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl GenerationForm for QuotePosterForm {
    fn endpoint(&self) -> Endpoint {
        Endpoint::QuotePoster
    }

    fn build_request(&self) -> Result<GenerationRequest> {
        if self.text.trim().is_empty() {
            return Err(Error::ValidationError(
                Endpoint::QuotePoster.missing_input_message().to_string(),
            ));
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(Error::ValidationError(format!(
                "Font size must be between {} and {} (got {})",
                MIN_FONT_SIZE, MAX_FONT_SIZE, self.font_size
            )));
        }
        if !is_hex_color(&self.color) {
            return Err(Error::ValidationError(format!(
                "Color must be a hex value like #FFFFFF (got '{}')",
                self.color
            )));
        }

        let mut req = GenerationRequest::new(Endpoint::QuotePoster)
            .with_parameter("text", &self.text)
            .with_parameter("font_size", self.font_size)
            .with_parameter("color", &self.color)
            .with_parameter("alignment", self.alignment)
            .with_parameter("orientation", self.orientation);

        match (&self.background, &self.existing_background) {
            (Some(file), _) => req = req.with_attachment(file.clone()),
            (None, Some(name)) if !name.trim().is_empty() => {
                req = req.with_parameter("existing_background", name.trim())
            }
            _ => {}
        }

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_fields_in_order() {
        let req = QuotePosterForm::new("Hello World").build_request().unwrap();
        let names: Vec<&str> = req.parameters().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["text", "font_size", "color", "alignment", "orientation"]
        );
        assert_eq!(req.parameter("color"), Some("#FFFFFF"));
        assert_eq!(req.parameter("alignment"), Some("center"));
        assert_eq!(req.parameter("orientation"), Some("horizontal"));
    }

    #[test]
    fn whitespace_text_is_rejected() {
        let err = QuotePosterForm::new("  \t ").build_request().unwrap_err();
        assert_eq!(err.to_string(), "Please enter some text for your quote");
    }

    #[test]
    fn font_size_bounds() {
        let mut form = QuotePosterForm::new("x");
        form.font_size = 19;
        assert!(form.build_request().is_err());
        form.font_size = 20;
        assert!(form.build_request().is_ok());
        form.font_size = 120;
        assert!(form.build_request().is_ok());
        form.font_size = 121;
        assert!(form.build_request().is_err());
    }

    #[test]
    fn color_must_be_hex() {
        let mut form = QuotePosterForm::new("x");
        form.color = "white".into();
        assert!(form.build_request().is_err());
        form.color = "#12abEF".into();
        assert!(form.build_request().is_ok());
    }

    #[test]
    fn uploaded_background_wins_over_existing() {
        let mut form = QuotePosterForm::new("x");
        form.existing_background = Some("abc_bg.png".into());
        let req = form.build_request().unwrap();
        assert_eq!(req.parameter("existing_background"), Some("abc_bg.png"));

        form.background = Some(Attachment::new("bg.png", "image/png", vec![0u8; 4]));
        let req = form.build_request().unwrap();
        assert_eq!(req.parameter("existing_background"), None);
        assert_eq!(req.attachments().len(), 1);
    }

    #[test]
    fn parse_enums() {
        assert_eq!("Right".parse::<Alignment>().unwrap(), Alignment::Right);
        assert_eq!(" LEFT ".parse::<Alignment>().unwrap(), Alignment::Left);
        assert_eq!("vertical".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert!("diagonal".parse::<Orientation>().is_err());
    }
}
