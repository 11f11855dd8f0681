//! Single-color and per-region recoloring.

use tracing::debug;

use super::document::Element;
use super::style::{InlineStyle, stylesheet_text};
use super::{Stage, SvgDocument};
use crate::color::auto_text_color;
use crate::error::Result;
use crate::registry::{ColorMap, ColorRegion, DetectedRegion, RegionColor, background_color};

/// Elements whose `fill`/`stroke` attributes are rewritten by [`SingleColor`].
const SHAPES: [&str; 5] = ["path", "circle", "rect", "polygon", "ellipse"];

/// Auto-contrast variable written when a stylesheet styles Itaú's text.
const ITAU_AUTO_TEXT_VAR: &str = "--itau-auto-text-color";

/// Recolors a logo with one color.
///
/// The root gets `color: <color>` so `currentColor` follows it, and every
/// shape whose fill or stroke is `currentColor` or a literal color is
/// rewritten. `none` and `transparent` are left alone.
#[derive(Debug, Clone, Copy)]
pub struct SingleColor<'a> {
    pub color: &'a str,
}

impl Stage for SingleColor<'_> {
    fn name(&self) -> &'static str {
        "single-color"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        let styles_itau_text = stylesheet_text(&doc.root).contains("itau-text");

        let mut style = InlineStyle::parse(doc.root.attr("style").unwrap_or_default());
        style.set("color", self.color);
        if styles_itau_text {
            style.set(ITAU_AUTO_TEXT_VAR, auto_text_color(self.color));
        }
        doc.root.set_attr("style", style.to_string());

        let mut rewritten = 0usize;
        doc.root.walk_mut(&mut |element| {
            if !SHAPES.contains(&element.local_name()) {
                return;
            }
            for attribute in ["fill", "stroke"] {
                if element.attr(attribute).is_some_and(is_recolorable) {
                    element.set_attr(attribute, self.color);
                    rewritten += 1;
                }
            }
        });
        debug!(rewritten, color = self.color, "recolored shapes");
        Ok(())
    }
}

fn is_recolorable(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("currentColor")
        || value.starts_with('#')
        || value.to_ascii_lowercase().starts_with("rgb")
}

/// Writes each region's color as a CSS variable on the root.
///
/// A literal color sets the region's variable and, if the region has an
/// auto-contrast variable, a matching `white`/`black`. `auto` only sets the
/// auto-contrast variable, derived from the background region's color.
/// Regions missing from the map are skipped.
#[derive(Debug, Clone, Copy)]
pub struct MultiColor<'a> {
    pub map: &'a ColorMap,
    pub regions: &'a [ColorRegion],
}

impl Stage for MultiColor<'_> {
    fn name(&self) -> &'static str {
        "multi-color"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        let mut style = InlineStyle::parse(doc.root.attr("style").unwrap_or_default());

        for region in self.regions {
            let Some(color) = self.map.get(&region.key) else {
                continue;
            };

            match color {
                RegionColor::Literal(color) => {
                    style.set(&region.css_var, color.as_str());
                    if let Some(auto_var) = &region.auto_contrast_var {
                        style.set(auto_var, auto_text_color(color));
                    }
                }
                RegionColor::Auto => {
                    if let Some(auto_var) = &region.auto_contrast_var {
                        let background = background_color(self.map, self.regions);
                        style.set(auto_var, auto_text_color(&background));
                    }
                }
            }
        }

        if !style.is_empty() {
            doc.root.set_attr("style", style.to_string());
        }
        Ok(())
    }
}

/// Configured regions whose CSS variable appears in the embedded stylesheet.
pub fn detect_regions(root: &Element, regions: &[ColorRegion], map: &ColorMap) -> Vec<DetectedRegion> {
    let css = stylesheet_text(root);
    if css.trim().is_empty() {
        return Vec::new();
    }

    regions
        .iter()
        .filter(|region| css.contains(&region.css_var))
        .map(|region| DetectedRegion {
            region: region.clone(),
            current_color: map
                .get(&region.key)
                .cloned()
                .unwrap_or_else(|| region.default_color.clone()),
        })
        .collect()
}
