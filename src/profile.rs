//! Serializable style profile for exchanging settings with a UI layer.
//!
//! A [`StyleProfile`] captures the customization of the selected logo in a
//! format that can be serialized to JSON, stored, and applied back to a
//! [`LogoStore`](crate::LogoStore) through [`Configurable`](crate::Configurable).
//!
//! # Example
//!
//! ```
//! use bank_logo_studio::{Background, StyleProfile};
//!
//! let profile = StyleProfile::new()
//!     .with_size(128)
//!     .with_color("#003399")
//!     .with_background(Background::White);
//!
//! let json = profile.to_json().unwrap();
//! let restored = StyleProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Background;
use crate::registry::ColorMap;

// ============================================================================
// StyleProfile
// ============================================================================

/// A serializable snapshot of logo customization.
///
/// Every field is optional; applying a profile only touches what it sets.
///
/// # JSON Format
///
/// ```json
/// {
///   "size": 128,
///   "color": "#003399",
///   "colorMap": { "bg": "#101010", "text": "auto" },
///   "background": "white"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    /// Export size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Single color for single-color logos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Region colors for multi-color logos.
    #[serde(default, skip_serializing_if = "ColorMap::is_empty")]
    pub color_map: ColorMap,

    /// Pinned preview background. `None` means automatic contrast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
}

impl StyleProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = color_map;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
