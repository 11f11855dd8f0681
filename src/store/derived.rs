//! Derived markup: pure projections of the store's inputs, memoized.
//!
//! Every derived string is computed by a plain function of [`DeriveInputs`].
//! [`DerivedCache`] only remembers the inputs each value was computed from
//! and recomputes when they differ, so preview and export can never drift
//! apart.

use std::sync::Arc;

use crate::registry::{ColorMap, ColorRegion};
use crate::svg::{self, Coloring};

/// Everything a derived value reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DeriveInputs {
    /// Markup of the selected logo, if any.
    pub markup: Option<Arc<str>>,
    pub size: u32,
    pub color: String,
    pub multi_color: bool,
    pub color_map: ColorMap,
    pub regions: Arc<[ColorRegion]>,
}

impl DeriveInputs {
    /// Returns true if these inputs could produce different markup than `other`.
    pub fn differs_from(&self, other: &Self) -> bool {
        let same_markup = match (&self.markup, &other.markup) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
            (None, None) => true,
            _ => false,
        };
        !same_markup
            || self.size != other.size
            || self.color != other.color
            || self.multi_color != other.multi_color
            || self.color_map != other.color_map
            || self.regions != other.regions
    }

    fn coloring(&self) -> Coloring<'_> {
        if self.multi_color && !self.regions.is_empty() {
            Coloring::Multi {
                map: &self.color_map,
                regions: &self.regions,
            }
        } else {
            Coloring::Single(&self.color)
        }
    }

    fn at_size(&self, size: u32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

// ============================================================================
// Pure Derivations
// ============================================================================

/// Customized markup at `inputs.size`. Empty when nothing is selected.
pub fn derive_export(inputs: &DeriveInputs) -> String {
    match &inputs.markup {
        Some(markup) => svg::customize_svg(markup, inputs.size, inputs.coloring()),
        None => String::new(),
    }
}

/// Customized markup at a fixed preview size.
pub fn derive_preview(inputs: &DeriveInputs, preview_size: u32) -> String {
    derive_export(&inputs.at_size(preview_size))
}

/// Pretty-printed form of [`derive_export`].
pub fn derive_formatted(inputs: &DeriveInputs) -> String {
    non_empty(derive_export(inputs), |markup| svg::format_svg(&markup))
}

/// Embeddable form of [`derive_export`].
pub fn derive_webflow(inputs: &DeriveInputs) -> String {
    non_empty(derive_export(inputs), |markup| svg::create_webflow_optimized_svg(&markup))
}

fn non_empty(markup: String, transform: impl FnOnce(String) -> String) -> String {
    if markup.is_empty() { markup } else { transform(markup) }
}

// ============================================================================
// Cache
// ============================================================================

#[derive(Debug, Default)]
struct Memo {
    inputs: Option<DeriveInputs>,
    value: String,
}

impl Memo {
    fn get_or_compute(&mut self, inputs: &DeriveInputs, compute: impl FnOnce() -> String) -> &str {
        let stale = self.inputs.as_ref().is_none_or(|cached| cached.differs_from(inputs));
        if stale {
            self.value = compute();
            self.inputs = Some(inputs.clone());
        }
        &self.value
    }
}

/// Memoized derived markup.
#[derive(Debug, Default)]
pub struct DerivedCache {
    preview: Memo,
    export: Memo,
    formatted: Memo,
    webflow: Memo,
}

impl DerivedCache {
    pub fn preview(&mut self, inputs: &DeriveInputs, preview_size: u32) -> &str {
        let keyed = inputs.at_size(preview_size);
        self.preview.get_or_compute(&keyed, || derive_export(&keyed))
    }

    pub fn export(&mut self, inputs: &DeriveInputs) -> &str {
        self.export.get_or_compute(inputs, || derive_export(inputs))
    }

    pub fn formatted(&mut self, inputs: &DeriveInputs) -> &str {
        let export = self.export(inputs).to_string();
        self.formatted
            .get_or_compute(inputs, || non_empty(export, |markup| svg::format_svg(&markup)))
    }

    pub fn webflow(&mut self, inputs: &DeriveInputs) -> &str {
        let export = self.export(inputs).to_string();
        self.webflow.get_or_compute(inputs, || {
            non_empty(export, |markup| svg::create_webflow_optimized_svg(&markup))
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LogoRegistry;

    const LOGO: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M0 0"/></svg>"#;

    fn inputs() -> DeriveInputs {
        DeriveInputs {
            markup: Some(Arc::from(LOGO)),
            size: 64,
            color: "#e51736".to_string(),
            multi_color: false,
            color_map: ColorMap::new(),
            regions: Arc::from(Vec::new()),
        }
    }

    #[test]
    fn preview_and_export_differ_only_in_size() {
        let inputs = inputs();
        let export = derive_export(&inputs);
        let preview = derive_preview(&inputs, 120);
        assert!(export.contains(r#"width="64""#));
        assert!(preview.contains(r#"width="120""#));
        assert_eq!(export.replace("64", "120"), preview);
    }

    #[test]
    fn nothing_selected_derives_empty_markup() {
        let inputs = DeriveInputs {
            markup: None,
            ..inputs()
        };
        assert_eq!(derive_export(&inputs), "");
        assert_eq!(derive_formatted(&inputs), "");
        assert_eq!(derive_webflow(&inputs), "");
    }

    #[test]
    fn cache_matches_pure_functions() {
        let mut cache = DerivedCache::default();
        let mut inputs = inputs();
        assert_eq!(cache.export(&inputs), derive_export(&inputs));
        assert_eq!(cache.formatted(&inputs), derive_formatted(&inputs));
        assert_eq!(cache.webflow(&inputs), derive_webflow(&inputs));
        assert_eq!(cache.preview(&inputs, 120), derive_preview(&inputs, 120));

        inputs.color = "#003399".to_string();
        assert!(cache.export(&inputs).contains("#003399"));
        assert_eq!(cache.formatted(&inputs), derive_formatted(&inputs));
    }

    #[test]
    fn differs_from_tracks_every_input() {
        let base = inputs();
        assert!(!base.differs_from(&base.clone()));
        assert!(base.differs_from(&DeriveInputs { size: 65, ..base.clone() }));
        assert!(base.differs_from(&DeriveInputs { markup: None, ..base.clone() }));
        assert!(!base.differs_from(&DeriveInputs {
            markup: Some(Arc::from(LOGO)),
            ..base.clone()
        }));
        assert!(base.differs_from(&DeriveInputs {
            color_map: ColorMap::from_iter([("bg", "#000000")]),
            ..base.clone()
        }));
    }

    #[test]
    fn multi_color_inputs_use_region_coloring() {
        let registry = LogoRegistry::banks();
        let itau = r#"<svg xmlns="http://www.w3.org/2000/svg"><style>.bg{fill:var(--itau-bg-color)}</style><rect class="bg"/></svg>"#;
        let inputs = DeriveInputs {
            markup: Some(Arc::from(itau)),
            multi_color: true,
            color_map: registry.default_color_map("banco-itau").with("bg", "#101010"),
            regions: Arc::from(registry.multi_color_config("banco-itau").unwrap()),
            ..inputs()
        };
        assert!(derive_export(&inputs).contains("--itau-bg-color: #101010"));
        assert!(derive_webflow(&inputs).contains(r##"fill="#101010""##));
    }
}
