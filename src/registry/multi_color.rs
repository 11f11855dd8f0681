//! Colorable regions of multi-color logos and the color maps that drive them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::LogoRegistry;
use crate::color::{BLACK, WHITE, is_dark};

/// Sentinel value asking for an automatically contrasted color.
pub const AUTO: &str = "auto";

/// Key of the region whose color drives auto-contrast.
pub const BACKGROUND_REGION_KEY: &str = "bg";

static SIX_DIGIT_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

// ============================================================================
// RegionColor
// ============================================================================

/// Color assigned to a region: a literal CSS color or [`AUTO`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionColor {
    Auto,
    Literal(String),
}

impl RegionColor {
    pub fn literal(color: impl Into<String>) -> Self {
        Self::Literal(color.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => AUTO,
            Self::Literal(color) => color,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    fn same_as(&self, other: &RegionColor) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl From<String> for RegionColor {
    fn from(value: String) -> Self {
        if value == AUTO {
            Self::Auto
        } else {
            Self::Literal(value)
        }
    }
}

impl From<&str> for RegionColor {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RegionColor> for String {
    fn from(value: RegionColor) -> Self {
        match value {
            RegionColor::Auto => AUTO.to_string(),
            RegionColor::Literal(color) => color,
        }
    }
}

impl fmt::Display for RegionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ColorRegion
// ============================================================================

/// A named, independently colorable part of a logo.
///
/// The source markup binds the region's fill to `css_var` inside its
/// embedded stylesheet. When `auto_contrast_var` is set, a legible
/// `white`/`black` text color is written to that variable as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRegion {
    pub key: String,
    pub label: String,
    pub css_var: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_contrast_var: Option<String>,
    pub default_color: RegionColor,
    #[serde(default)]
    pub description: String,
}

/// A configured region found in a logo's stylesheet, with its current color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedRegion {
    #[serde(flatten)]
    pub region: ColorRegion,
    pub current_color: RegionColor,
}

pub(super) fn bank_regions() -> BTreeMap<String, Vec<ColorRegion>> {
    let region = |key: &str, label: &str, css_var: &str, auto: Option<&str>, default: &str, description: &str| {
        ColorRegion {
            key: key.to_string(),
            label: label.to_string(),
            css_var: css_var.to_string(),
            auto_contrast_var: auto.map(str::to_string),
            default_color: RegionColor::from(default),
            description: description.to_string(),
        }
    };

    let mut regions = BTreeMap::new();
    regions.insert(
        "banco-itau".to_string(),
        vec![
            region("bg", "Fundo", "--itau-bg-color", None, "#003399", "Cor do fundo do logo"),
            region(
                "text",
                "Texto",
                "--itau-text-color",
                Some("--itau-auto-text-color"),
                "#FFFF00",
                "Cor do texto do logo",
            ),
        ],
    );
    regions.insert(
        "agora-investimentos".to_string(),
        vec![
            region(
                "bg",
                "Fundo",
                "--agora-bg-color",
                None,
                "#00C88D",
                "Cor do fundo e elementos principais",
            ),
            region("text", "Texto", "--agora-text-color", None, "#ffffff", "Cor do texto inferior"),
        ],
    );
    regions
}

// ============================================================================
// ColorMap
// ============================================================================

/// Region key to color assignment for the selected multi-color logo.
///
/// Edits go through [`ColorMap::with`], which returns a new map and leaves
/// the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(BTreeMap<String, RegionColor>);

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&RegionColor> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy of this map with `key` set to `color`.
    pub fn with(&self, key: impl Into<String>, color: impl Into<RegionColor>) -> Self {
        let mut next = self.clone();
        next.0.insert(key.into(), color.into());
        next
    }

    pub fn insert(&mut self, key: impl Into<String>, color: impl Into<RegionColor>) {
        self.0.insert(key.into(), color.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionColor)> {
        self.0.iter().map(|(key, color)| (key.as_str(), color))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<RegionColor>> FromIterator<(K, V)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// Registry Lookups
// ============================================================================

impl LogoRegistry {
    /// True if `id` has a region configuration.
    pub fn has_multiple_colors(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    /// Regions configured for `id`, in declaration order.
    pub fn multi_color_config(&self, id: &str) -> Option<&[ColorRegion]> {
        self.regions.get(id).map(Vec::as_slice)
    }

    /// Each region's default color. Empty for unknown or single-color logos.
    pub fn default_color_map(&self, id: &str) -> ColorMap {
        self.multi_color_config(id)
            .unwrap_or_default()
            .iter()
            .map(|region| (region.key.clone(), region.default_color.clone()))
            .collect()
    }
}

// ============================================================================
// Color Map Operations
// ============================================================================

/// Literal color of the background region: the map's value, then the
/// region's default, then black.
pub fn background_color(map: &ColorMap, regions: &[ColorRegion]) -> String {
    let region = regions.iter().find(|region| region.key == BACKGROUND_REGION_KEY);

    match (map.get(BACKGROUND_REGION_KEY), region.map(|r| &r.default_color)) {
        (Some(RegionColor::Literal(color)), _) => color.clone(),
        (_, Some(RegionColor::Literal(color))) => color.clone(),
        _ => BLACK.to_string(),
    }
}

/// Replaces every `auto` entry with white or black, whichever contrasts
/// with the background region.
pub fn resolve_auto_colors(map: &ColorMap, regions: &[ColorRegion]) -> ColorMap {
    let background = background_color(map, regions);
    let contrast = if is_dark(&background) { WHITE } else { BLACK };

    map.iter()
        .map(|(key, color)| match color {
            RegionColor::Auto => (key, RegionColor::literal(contrast)),
            literal => (key, literal.clone()),
        })
        .collect()
}

/// Keeps only configured regions, replacing anything that is neither
/// `auto` nor a 6-digit hex color with the region default.
pub fn validate_color_map(map: &ColorMap, regions: &[ColorRegion]) -> ColorMap {
    regions
        .iter()
        .map(|region| {
            let color = match map.get(&region.key) {
                Some(RegionColor::Auto) => RegionColor::Auto,
                Some(RegionColor::Literal(color)) if SIX_DIGIT_HEX.is_match(color) => {
                    RegionColor::literal(color.as_str())
                }
                _ => region.default_color.clone(),
            };
            (region.key.clone(), color)
        })
        .collect()
}

/// True if every region holds its default color (hex compared case-insensitively).
pub fn is_default_color_map(map: &ColorMap, regions: &[ColorRegion]) -> bool {
    regions.iter().all(|region| {
        map.get(&region.key)
            .is_some_and(|color| color.same_as(&region.default_color))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn itau() -> &'static [ColorRegion] {
        LogoRegistry::banks().multi_color_config("banco-itau").unwrap()
    }

    #[test]
    fn unknown_logo_lookups_are_empty() {
        let registry = LogoRegistry::banks();
        assert!(!registry.has_multiple_colors("banco-bradesco"));
        assert!(registry.multi_color_config("banco-bradesco").is_none());
        assert!(registry.default_color_map("banco-bradesco").is_empty());
    }

    #[test]
    fn default_map_covers_every_region() {
        let map = LogoRegistry::banks().default_color_map("banco-itau");
        assert_eq!(map.keys().collect::<Vec<_>>(), ["bg", "text"]);
        assert_eq!(map.get("bg"), Some(&RegionColor::literal("#003399")));
        assert_eq!(map.get("text"), Some(&RegionColor::literal("#FFFF00")));
    }

    #[test]
    fn region_declaration_order_is_preserved() {
        let keys: Vec<_> = itau().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["bg", "text"]);
        assert_eq!(itau()[1].auto_contrast_var.as_deref(), Some("--itau-auto-text-color"));
    }

    #[test]
    fn with_leaves_original_untouched() {
        let map = LogoRegistry::banks().default_color_map("banco-itau");
        let edited = map.with("text", "#ff0000");
        assert_eq!(map.get("text"), Some(&RegionColor::literal("#FFFF00")));
        assert_eq!(edited.get("text"), Some(&RegionColor::literal("#ff0000")));
    }

    #[test]
    fn auto_resolves_against_background() {
        let dark_bg = ColorMap::from_iter([("bg", "#003399"), ("text", "auto")]);
        let resolved = resolve_auto_colors(&dark_bg, itau());
        assert_eq!(resolved.get("text"), Some(&RegionColor::literal("#ffffff")));

        let light_bg = ColorMap::from_iter([("bg", "#ffff00"), ("text", "auto")]);
        let resolved = resolve_auto_colors(&light_bg, itau());
        assert_eq!(resolved.get("text"), Some(&RegionColor::literal("#000000")));
        assert_eq!(resolved.get("bg"), Some(&RegionColor::literal("#ffff00")));
    }

    #[test]
    fn auto_background_falls_back_to_default() {
        let map = ColorMap::from_iter([("bg", "auto"), ("text", "auto")]);
        assert_eq!(background_color(&map, itau()), "#003399");
        assert_eq!(background_color(&map, &[]), "#000000");
    }

    #[test]
    fn validation_replaces_bad_values_and_drops_unknown_keys() {
        let map = ColorMap::from_iter([("bg", "blue"), ("text", "auto"), ("extra", "#123456")]);
        let valid = validate_color_map(&map, itau());
        assert_eq!(valid.len(), 2);
        assert_eq!(valid.get("bg"), Some(&RegionColor::literal("#003399")));
        assert_eq!(valid.get("text"), Some(&RegionColor::Auto));
        assert!(!valid.contains_key("extra"));
    }

    #[test]
    fn default_map_detection() {
        let map = LogoRegistry::banks().default_color_map("banco-itau");
        assert!(is_default_color_map(&map, itau()));
        assert!(is_default_color_map(&map.with("bg", "#003399"), itau()));
        assert!(!is_default_color_map(&map.with("bg", "#000000"), itau()));
        assert!(!is_default_color_map(&ColorMap::new(), itau()));
    }

    #[test]
    fn region_color_serializes_as_plain_string() {
        let map = ColorMap::from_iter([("bg", "#003399"), ("text", "auto")]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"bg":"#003399","text":"auto"}"##);
        assert_eq!(serde_json::from_str::<ColorMap>(&json).unwrap(), map);
    }
}
