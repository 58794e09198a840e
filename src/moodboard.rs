//! Moodboard form: a grid layout and the images to place in it.

use crate::request::{Attachment, Endpoint, GenerationForm, GenerationRequest};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Grid layouts understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// 2×2 square
    #[default]
    Grid4,
    /// 2×4
    Grid8,
    /// 4×4 square
    Grid16,
    /// 2×4 on a portrait canvas
    Portrait8,
    /// 4×4 on a portrait canvas
    Portrait16,
}

impl Layout {
    pub const ALL: [Layout; 5] = [
        Layout::Grid4,
        Layout::Grid8,
        Layout::Grid16,
        Layout::Portrait8,
        Layout::Portrait16,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Grid4 => "4x4",
            Layout::Grid8 => "8-grid",
            Layout::Grid16 => "16-grid",
            Layout::Portrait8 => "portrait-8",
            Layout::Portrait16 => "portrait-16",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Layout::Grid4 => "4 Grid (2×2)",
            Layout::Grid8 => "8 Grid (2×4)",
            Layout::Grid16 => "16 Grid (4×4)",
            Layout::Portrait8 => "Portrait 8 Grid",
            Layout::Portrait16 => "Portrait 16 Grid",
        }
    }

    /// Number of cells; images past this are dropped by the service
    pub fn capacity(&self) -> usize {
        match self {
            Layout::Grid4 => 4,
            Layout::Grid8 | Layout::Portrait8 => 8,
            Layout::Grid16 | Layout::Portrait16 => 16,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Layout::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Layout::ALL.iter().map(|l| l.as_str()).collect();
                Error::ValidationError(format!(
                    "Unknown layout '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// State of the moodboard form: chosen layout plus the selected images
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodboardForm {
    pub layout: Layout,
    files: Vec<Attachment>,
}

impl MoodboardForm {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            files: Vec::new(),
        }
    }

    /// Replace the whole selection
    pub fn set_files(&mut self, files: Vec<Attachment>) {
        self.files = files;
    }

    pub fn add_file(&mut self, file: Attachment) {
        self.files.push(file);
    }

    /// Drop the file at `index`; out-of-range indices leave the selection untouched.
    pub fn remove_file(&mut self, index: usize) -> Option<Attachment> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }
}

impl GenerationForm for MoodboardForm {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Moodboard
    }

    fn build_request(&self) -> Result<GenerationRequest> {
        if self.files.is_empty() {
            return Err(Error::ValidationError(
                Endpoint::Moodboard.missing_input_message().to_string(),
            ));
        }
        if self.files.len() > self.layout.capacity() {
            log::warn!(
                "{} images selected but layout {} only holds {}; extras will be ignored",
                self.files.len(),
                self.layout,
                self.layout.capacity()
            );
        }

        Ok(self.files.iter().cloned().fold(
            GenerationRequest::new(Endpoint::Moodboard).with_parameter("layout", self.layout),
            GenerationRequest::with_attachment,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> Attachment {
        Attachment::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = MoodboardForm::default().build_request().unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one image");
    }

    #[test]
    fn layout_wire_values_roundtrip() {
        for layout in Layout::ALL {
            assert_eq!(layout.as_str().parse::<Layout>().unwrap(), layout);
        }
        assert!("3x3".parse::<Layout>().is_err());
        assert_eq!("Portrait-16".parse::<Layout>().unwrap(), Layout::Portrait16);
        assert_eq!("4X4".parse::<Layout>().unwrap(), Layout::Grid4);
        assert_eq!(Layout::Portrait8.capacity(), 8);
        assert_eq!(Layout::Grid4.label(), "4 Grid (2×2)");
    }

    #[test]
    fn remove_file_keeps_order() {
        let mut form = MoodboardForm::new(Layout::Grid8);
        form.add_file(png("a.png"));
        form.add_file(png("b.png"));
        form.add_file(png("c.png"));

        assert_eq!(form.remove_file(1).map(|f| f.file_name), Some("b.png".to_string()));
        assert!(form.remove_file(5).is_none());
        let names: Vec<&str> = form.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn request_carries_layout_and_every_file() {
        let mut form = MoodboardForm::new(Layout::Grid4);
        for i in 0..6 {
            form.add_file(png(&format!("{}.png", i)));
        }
        // over capacity still sends everything
        let req = form.build_request().unwrap();
        assert_eq!(req.parameter("layout"), Some("4x4"));
        assert_eq!(req.attachments().len(), 6);
    }
}
