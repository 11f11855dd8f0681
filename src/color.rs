//! Color science: hex parsing, relative luminance and contrast decisions.
//!
//! Every dark/light decision in the crate goes through [`is_dark`], which
//! compares the sRGB relative luminance against [`DARK_LUMINANCE_THRESHOLD`].
//! The HSL helpers are only used for theme derivation.

use std::sync::LazyLock;

use palette::{Hsl, IntoColor, Srgb};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Luminance below this value is considered dark (exclusive).
pub const DARK_LUMINANCE_THRESHOLD: f64 = 0.179;

/// Canonical white, as written into markup.
pub const WHITE: &str = "#ffffff";

/// Canonical black, as written into markup.
pub const BLACK: &str = "#000000";

/// Background used by [`dark_theme_color`] when the primary color is white or missing.
const DEFAULT_DARK_THEME: &str = "#050505";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

// ============================================================================
// Hex / RGB
// ============================================================================

/// Parses a 3- or 6-digit hex color, with or without a leading `#`.
///
/// Anything else degrades to black; this function never fails.
pub fn hex_to_rgb(hex: &str) -> Srgb<u8> {
    let clean = hex.trim();
    let clean = clean.strip_prefix('#').unwrap_or(clean);

    if !clean.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Srgb::new(0, 0, 0);
    }

    let channel = |digits: &str| u8::from_str_radix(digits, 16).unwrap_or(0);

    match clean.len() {
        3 => {
            let expanded: String = clean.chars().flat_map(|c| [c, c]).collect();
            Srgb::new(
                channel(&expanded[0..2]),
                channel(&expanded[2..4]),
                channel(&expanded[4..6]),
            )
        }
        6 => Srgb::new(
            channel(&clean[0..2]),
            channel(&clean[2..4]),
            channel(&clean[4..6]),
        ),
        _ => Srgb::new(0, 0, 0),
    }
}

/// Formats an RGB triple as a lower-case `#rrggbb` string.
pub fn rgb_to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Returns true if `input` is a 3- or 6-digit hex color (the `#` is optional).
pub fn is_valid_hex(input: &str) -> bool {
    HEX_COLOR.is_match(input)
}

/// Normalizes user input to a lower-case, 6-digit, `#`-prefixed hex color.
///
/// Input is trimmed first. Invalid input normalizes to `#000000`.
pub fn normalize_hex(input: &str) -> String {
    let clean = input.trim();
    if !is_valid_hex(clean) {
        return BLACK.to_string();
    }

    let digits = clean.strip_prefix('#').unwrap_or(clean);
    if digits.len() == 3 {
        let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
        return format!("#{}", expanded.to_ascii_lowercase());
    }

    format!("#{}", digits.to_ascii_lowercase())
}

// ============================================================================
// Luminance & Contrast
// ============================================================================

/// Computes the sRGB relative luminance of a color, in `[0, 1]`.
pub fn relative_luminance(rgb: Srgb<u8>) -> f64 {
    0.2126 * linearize(rgb.red) + 0.7152 * linearize(rgb.green) + 0.0722 * linearize(rgb.blue)
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Returns true if the color's luminance is below [`DARK_LUMINANCE_THRESHOLD`].
///
/// Empty input is not dark. Other invalid input parses as black and is dark.
pub fn is_dark(hex: &str) -> bool {
    if hex.trim().is_empty() {
        return false;
    }
    relative_luminance(hex_to_rgb(hex)) < DARK_LUMINANCE_THRESHOLD
}

/// Black or white text color that stays legible on `background`.
///
/// Returned as the CSS keyword written into auto-contrast variables.
pub fn auto_text_color(background: &str) -> &'static str {
    if is_dark(background) { "white" } else { "black" }
}

/// Preview background behind a logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    /// Solid white.
    White,
    /// No background.
    #[default]
    Transparent,
}

impl Background {
    /// CSS value for this background.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => WHITE,
            Self::Transparent => "transparent",
        }
    }

    /// The other background.
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Transparent,
            Self::Transparent => Self::White,
        }
    }
}

/// Dark logos get a white background; light logos stay on a transparent one.
pub fn contrast_background(hex: &str) -> Background {
    if is_dark(hex) {
        Background::White
    } else {
        Background::Transparent
    }
}

/// Dot color for the decorative dotted pattern behind a logo.
pub fn contrast_dot_color(hex: &str) -> &'static str {
    if is_dark(hex) { BLACK } else { "#666666" }
}

// ============================================================================
// HSL & Theme Derivation
// ============================================================================

/// Converts RGB to HSL. Saturation and lightness are in `[0, 1]`.
pub fn rgb_to_hsl(rgb: Srgb<u8>) -> Hsl {
    let rgb = Srgb::new(
        f32::from(rgb.red) / 255.0,
        f32::from(rgb.green) / 255.0,
        f32::from(rgb.blue) / 255.0,
    );
    rgb.into_color()
}

/// Converts HSL back to 8-bit RGB.
pub fn hsl_to_rgb(hsl: Hsl) -> Srgb<u8> {
    let rgb: Srgb = hsl.into_color();
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Srgb::new(to_u8(rgb.red), to_u8(rgb.green), to_u8(rgb.blue))
}

/// Page theme derived from a logo's primary color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    /// Very dark page background.
    pub background: String,
    /// Card background, barely lighter than `background`.
    pub card: String,
}

/// Darkens `primary` into a page background while keeping its hue.
///
/// Lightness is scaled by `1 - darkness` (floored at 3%) and saturation by
/// 0.9 (floored at 25%). White or empty input yields `#050505`.
pub fn dark_theme_color(primary: &str, darkness: f32) -> String {
    if primary.trim().is_empty() || primary.trim().eq_ignore_ascii_case(WHITE) {
        return DEFAULT_DARK_THEME.to_string();
    }

    let mut hsl = rgb_to_hsl(hex_to_rgb(primary));
    hsl.lightness = (hsl.lightness * (1.0 - darkness)).max(0.03);
    hsl.saturation = (hsl.saturation * 0.9).max(0.25);
    rgb_to_hex(hsl_to_rgb(hsl))
}

/// Lifts a dark background by one lightness point, capped at 5%.
pub fn card_theme_color(dark_background: &str) -> String {
    let mut hsl = rgb_to_hsl(hex_to_rgb(dark_background));
    hsl.lightness = (hsl.lightness + 0.01).min(0.05);
    rgb_to_hex(hsl_to_rgb(hsl))
}

/// Full theme for a logo's primary color.
pub fn theme_colors(primary: &str) -> ThemeColors {
    let background = dark_theme_color(primary, 0.95);
    let card = card_theme_color(&background);
    ThemeColors { background, card }
}

// ============================================================================
// Tests
// ============================================================================
