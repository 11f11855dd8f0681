//! Static logo data: catalog order, display names, brand colors and
//! colorable regions.
//!
//! A [`LogoRegistry`] is plain data. The built-in bank registry is available
//! through [`LogoRegistry::banks`]; consumers with their own assets can load a
//! registry from JSON instead.
//!
//! ```
//! use bank_logo_studio::LogoRegistry;
//!
//! let registry = LogoRegistry::banks();
//! assert_eq!(registry.catalog()[0], "agora-investimentos");
//! assert_eq!(registry.display_name("banco-itau"), "Banco Itaú");
//! assert!(registry.has_multiple_colors("banco-itau"));
//! assert!(!registry.has_multiple_colors("unknown"));
//! ```

pub mod multi_color;
pub mod original;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use multi_color::{
    AUTO, BACKGROUND_REGION_KEY, ColorMap, ColorRegion, DetectedRegion, RegionColor,
    background_color, is_default_color_map, resolve_auto_colors, validate_color_map,
};
pub use original::{OriginalColors, extract_colors_from_svg};

static BANKS: LazyLock<LogoRegistry> = LazyLock::new(|| LogoRegistry {
    catalog: [
        "agora-investimentos",
        "banco-bradesco",
        "banco-brasil",
        "banco-itau",
        "btg-pactual",
        "caixa-economica",
        "xp-investimentos",
    ]
    .into_iter()
    .map(String::from)
    .collect(),
    display_names: [
        ("agora-investimentos", "Ágora Investimentos"),
        ("banco-bradesco", "Banco Bradesco"),
        ("banco-brasil", "Banco do Brasil"),
        ("banco-itau", "Banco Itaú"),
        ("btg-pactual", "BTG Pactual"),
        ("caixa-economica", "Caixa Econômica"),
        ("xp-investimentos", "XP Investimentos"),
    ]
    .into_iter()
    .map(|(id, name)| (id.to_string(), name.to_string()))
    .collect(),
    original_colors: original::bank_colors(),
    original_files: original::bank_files(),
    regions: multi_color::bank_regions(),
});

/// Everything the pipeline and store need to know about a logo set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoRegistry {
    /// Logo identifiers in display and load order.
    #[serde(default)]
    pub catalog: Vec<String>,

    /// Human-readable names keyed by identifier.
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,

    /// Brand colors keyed by short brand key (e.g. `itau`).
    #[serde(default)]
    pub original_colors: BTreeMap<String, OriginalColors>,

    /// Unmodified source file names keyed by short brand key.
    #[serde(default)]
    pub original_files: BTreeMap<String, String>,

    /// Colorable regions keyed by identifier, in declaration order.
    #[serde(default)]
    pub regions: BTreeMap<String, Vec<ColorRegion>>,
}

impl LogoRegistry {
    /// The built-in Brazilian bank registry.
    pub fn banks() -> &'static LogoRegistry {
        &BANKS
    }

    /// Parses a registry from JSON. Missing sections are empty.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the registry to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ordered logo identifiers.
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Display name for `id`.
    ///
    /// Identifiers without a registered name are title-cased word by word,
    /// so `banco-exemplo` becomes `Banco Exemplo`.
    pub fn display_name(&self, id: &str) -> String {
        if let Some(name) = self.display_names.get(id) {
            return name.clone();
        }

        id.split('-')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_catalog_is_ordered() {
        let catalog = LogoRegistry::banks().catalog();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.first().map(String::as_str), Some("agora-investimentos"));
        assert_eq!(catalog.last().map(String::as_str), Some("xp-investimentos"));
    }

    #[test]
    fn display_names_fall_back_to_title_case() {
        let registry = LogoRegistry::banks();
        assert_eq!(registry.display_name("banco-brasil"), "Banco do Brasil");
        assert_eq!(registry.display_name("banco-exemplo-novo"), "Banco Exemplo Novo");
        assert_eq!(registry.display_name(""), "");
    }

    #[test]
    fn registry_round_trips_through_json() {
        let json = LogoRegistry::banks().to_json_pretty().unwrap();
        let parsed = LogoRegistry::from_json(&json).unwrap();
        assert_eq!(&parsed, LogoRegistry::banks());
    }

    #[test]
    fn partial_json_leaves_other_sections_empty() {
        let registry = LogoRegistry::from_json(r#"{ "catalog": ["a", "b"] }"#).unwrap();
        assert_eq!(registry.catalog(), ["a", "b"]);
        assert!(registry.regions.is_empty());
        assert!(!registry.has_multiple_colors("a"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(LogoRegistry::from_json("{ catalog: ").is_err());
    }
}
