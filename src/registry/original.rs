//! Brand colors and reference source files.
//!
//! Both tables are keyed by a short brand key (`itau`, `caixa`, ...). A logo
//! identifier maps onto a key by looking for the key inside the identifier,
//! so `banco-itau` resolves to `itau`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::LogoRegistry;
use crate::color::WHITE;

static COLOR_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:fill|stroke)\s*[:=]\s*["']?(#(?:[0-9a-f]{6}|[0-9a-f]{3}))\b"#).unwrap()
});

/// Primary and optional secondary brand color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalColors {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl OriginalColors {
    fn new(primary: &str, secondary: Option<&str>) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.map(str::to_string),
        }
    }
}

pub(super) fn bank_colors() -> BTreeMap<String, OriginalColors> {
    [
        ("itau", OriginalColors::new("#003399", Some("#FFFF00"))),
        ("bradesco", OriginalColors::new("#E51736", None)),
        ("btg", OriginalColors::new("#ffffff", None)),
        ("brasil", OriginalColors::new("#33348E", None)),
        ("caixa", OriginalColors::new("#0070AF", Some("#F6822A"))),
        ("xp", OriginalColors::new("#FFC709", None)),
        ("agora", OriginalColors::new("#00C88D", Some("#ffffff"))),
    ]
    .into_iter()
    .map(|(key, colors)| (key.to_string(), colors))
    .collect()
}

pub(super) fn bank_files() -> BTreeMap<String, String> {
    [
        ("itau", "Itau.svg"),
        ("bradesco", "Bradesco.svg"),
        ("brasil", "Banco do brasil.svg"),
        ("btg", "BTG.svg"),
        ("caixa", "Caixa.svg"),
        ("xp", "XP CORRETORA.svg"),
        ("agora", "ÁGORA.svg"),
    ]
    .into_iter()
    .map(|(key, file)| (key.to_string(), file.to_string()))
    .collect()
}

impl LogoRegistry {
    fn brand_key<'a, V>(table: &'a BTreeMap<String, V>, id: &str) -> Option<&'a V> {
        if let Some(value) = table.get(id) {
            return Some(value);
        }
        table
            .iter()
            .find(|(key, _)| id.split('-').any(|part| part == key.as_str()))
            .map(|(_, value)| value)
    }

    /// Brand colors for `id`, if known.
    pub fn original_colors(&self, id: &str) -> Option<&OriginalColors> {
        Self::brand_key(&self.original_colors, id)
    }

    /// Primary brand color. Unknown logos get white.
    pub fn primary_color(&self, id: &str) -> &str {
        self.original_colors(id)
            .map(|colors| colors.primary.as_str())
            .unwrap_or(WHITE)
    }

    pub fn secondary_color(&self, id: &str) -> Option<&str> {
        self.original_colors(id)?.secondary.as_deref()
    }

    pub fn has_multiple_original_colors(&self, id: &str) -> bool {
        self.secondary_color(id).is_some()
    }

    /// Color a logo starts with when selected.
    pub fn default_logo_color(&self, id: &str) -> &str {
        self.primary_color(id)
    }

    /// File name of the unmodified brand asset for `id`.
    pub fn original_file_name(&self, id: &str) -> Option<&str> {
        Self::brand_key(&self.original_files, id).map(String::as_str)
    }

    pub fn has_original_logo(&self, id: &str) -> bool {
        self.original_file_name(id).is_some()
    }
}

/// Collects the distinct hex `fill`/`stroke` colors used in `markup`.
///
/// Both attributes and CSS declarations are scanned. Colors are upper-cased
/// and returned in first-seen order.
pub fn extract_colors_from_svg(markup: &str) -> Vec<String> {
    let mut colors: Vec<String> = Vec::new();
    for capture in COLOR_DECLARATION.captures_iter(markup) {
        let color = capture[1].to_ascii_uppercase();
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_resolve_to_brand_keys() {
        let registry = LogoRegistry::banks();
        assert_eq!(registry.primary_color("banco-itau"), "#003399");
        assert_eq!(registry.secondary_color("banco-itau"), Some("#FFFF00"));
        assert_eq!(registry.primary_color("caixa-economica"), "#0070AF");
        assert_eq!(registry.primary_color("btg-pactual"), "#ffffff");
        assert_eq!(registry.primary_color("itau"), "#003399");
    }

    #[test]
    fn unknown_logo_defaults_to_white() {
        let registry = LogoRegistry::banks();
        assert_eq!(registry.primary_color("banco-desconhecido"), "#ffffff");
        assert_eq!(registry.secondary_color("banco-desconhecido"), None);
        assert!(!registry.has_multiple_original_colors("banco-desconhecido"));
    }

    #[test]
    fn default_logo_color_is_primary() {
        let registry = LogoRegistry::banks();
        for id in registry.catalog() {
            assert_eq!(registry.default_logo_color(id), registry.primary_color(id));
        }
    }

    #[test]
    fn multiple_original_colors() {
        let registry = LogoRegistry::banks();
        assert!(registry.has_multiple_original_colors("agora-investimentos"));
        assert!(!registry.has_multiple_original_colors("xp-investimentos"));
    }

    #[test]
    fn original_files_lookup() {
        let registry = LogoRegistry::banks();
        assert_eq!(registry.original_file_name("banco-brasil"), Some("Banco do brasil.svg"));
        assert_eq!(registry.original_file_name("xp-investimentos"), Some("XP CORRETORA.svg"));
        assert!(registry.has_original_logo("agora-investimentos"));
        assert!(!registry.has_original_logo("nubank"));
    }

    #[test]
    fn extracts_unique_colors_in_order() {
        let svg = r##"<svg><style>.a { fill: #abc; }</style>
            <path fill="#ff0000"/><rect stroke='#00FF00'/><circle fill="#FF0000"/>
            <path fill="none"/></svg>"##;
        assert_eq!(extract_colors_from_svg(svg), ["#ABC", "#FF0000", "#00FF00"]);
    }
}
