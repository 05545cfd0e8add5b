//! Tunables for fitting and pagination.

use crate::error::Result;
use crate::units::Pt;
use serde::Deserialize;

/// Options for laying out a report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Single-line labels never shrink below this size
    pub min_font_size: Pt,

    /// How much a single-line label shrinks per attempt
    pub shrink_step: Pt,

    /// Appended to labels truncated at the minimum size
    pub ellipsis: String,

    /// Appended to continuation titles after the first page of an item
    pub continued_suffix: String,

    /// Background image name used on continuation pages
    pub continuation_background: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            min_font_size: Pt(6.0),
            shrink_step: Pt(0.5),
            ellipsis: "...".to_string(),
            continued_suffix: "(continued)".to_string(),
            continuation_background: "page-8".to_string(),
        }
    }
}

impl RenderOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the minimum font size for single-line labels.
    pub fn with_min_font_size(mut self, size: Pt) -> Self {
        self.min_font_size = size;
        self
    }

    /// Set the shrink step for single-line labels.
    pub fn with_shrink_step(mut self, step: Pt) -> Self {
        self.shrink_step = step;
        self
    }

    /// Set the truncation marker.
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    /// Set the suffix of repeated continuation titles.
    pub fn with_continued_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.continued_suffix = suffix.into();
        self
    }

    /// Set the background of continuation pages.
    pub fn with_continuation_background(mut self, name: impl Into<String>) -> Self {
        self.continuation_background = name.into();
        self
    }
}
