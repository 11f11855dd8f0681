//! SVG transform pipeline.
//!
//! Every public function here takes markup and returns markup. None of them
//! fail: malformed input comes back unchanged, and a stage that errors is
//! rolled back while the remaining stages still run.
//!
//! # Architecture
//!
//! Each transformation is a [`Stage`] that edits a parsed [`SvgDocument`] in
//! place. An [`SvgPipeline`] parses once, runs its stages in order with a
//! snapshot taken before each one, and serializes once at the end.
//!
//! The full export composition is:
//!
//! 1. [`Resize`] the root to a square
//! 2. Recolor with [`SingleColor`] or [`MultiColor`] (every configured region)
//! 3. [`Flatten`] stylesheet classes and variables into attributes
//! 4. [`Prune`] unreferenced definitions and inert groups
//! 5. [`HardCodeColors`] left over `currentColor` values
//! 6. [`Finalize`] for responsive embedding
//! 7. Pretty-print ([`NormalizeAttributes`] plus line indentation)
//!
//! # Example
//!
//! ```
//! use bank_logo_studio::svg::{self, Coloring};
//!
//! let logo = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M0 0h24v24H0z"/></svg>"#;
//!
//! let sized = svg::apply_svg_modifications(logo, 64, "#e51736");
//! assert!(sized.contains(r#"width="64""#));
//!
//! let exported = svg::export_svg(logo, 64, Coloring::Single("#e51736"));
//! assert!(exported.starts_with("<svg"));
//! assert!(!exported.contains("currentColor"));
//! ```

pub mod document;
pub mod finalize;
pub mod flatten;
pub mod format;
pub mod prune;
pub mod recolor;
pub mod resize;
pub mod style;

pub use document::{Element, Node, SvgDocument};
pub use finalize::Finalize;
pub use flatten::{Flatten, HardCodeColors};
pub use format::NormalizeAttributes;
pub use prune::Prune;
pub use recolor::{MultiColor, SingleColor, detect_regions};
pub use resize::Resize;

use tracing::{debug, warn};

use crate::error::Result;
use crate::registry::{ColorMap, ColorRegion, DetectedRegion};

// ============================================================================
// Stage & Pipeline
// ============================================================================

/// One in-place transformation of a parsed document.
pub trait Stage {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Edits the document. On error the pipeline restores the document as it
    /// was before this call.
    fn apply(&self, doc: &mut SvgDocument) -> Result<()>;
}

/// Ordered stages run over a single parse.
#[derive(Default)]
pub struct SvgPipeline<'a> {
    stages: Vec<Box<dyn Stage + 'a>>,
    pretty: bool,
}

impl<'a> SvgPipeline<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn with(mut self, stage: impl Stage + 'a) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Normalizes attribute order and indents the output, one tag per line.
    pub fn pretty(mut self) -> Self {
        self.stages.push(Box::new(NormalizeAttributes));
        self.pretty = true;
        self
    }

    /// Runs every stage against `doc`, rolling back any stage that fails.
    pub fn apply(&self, doc: &mut SvgDocument) {
        for stage in &self.stages {
            let snapshot = doc.clone();
            debug!(stage = stage.name(), "applying svg stage");
            if let Err(error) = stage.apply(doc) {
                warn!(stage = stage.name(), %error, "svg stage failed, keeping its input");
                *doc = snapshot;
            }
        }
    }

    /// Parses `markup`, runs the stages and serializes the result.
    ///
    /// Returns `markup` unchanged if it cannot be parsed or the result cannot
    /// be serialized.
    pub fn run(&self, markup: &str) -> String {
        let mut doc = match SvgDocument::parse(markup) {
            Ok(doc) => doc,
            Err(error) => {
                warn!(%error, "could not parse svg, returning it unchanged");
                return markup.to_string();
            }
        };

        self.apply(&mut doc);

        match doc.serialize() {
            Ok(out) if self.pretty => format::indent(&out),
            Ok(out) => out,
            Err(error) => {
                warn!(%error, "could not serialize svg, returning input unchanged");
                markup.to_string()
            }
        }
    }
}

// ============================================================================
// Coloring
// ============================================================================

/// How a logo is recolored.
#[derive(Debug, Clone, Copy)]
pub enum Coloring<'a> {
    /// One color for the whole logo.
    Single(&'a str),
    /// Per-region colors for a logo with a region configuration.
    Multi {
        map: &'a ColorMap,
        regions: &'a [ColorRegion],
    },
}

// ============================================================================
// Markup In, Markup Out
// ============================================================================

/// Sets the root `width` and `height` to `size`.
pub fn apply_size(markup: &str, size: u32) -> String {
    SvgPipeline::new().with(Resize { size }).run(markup)
}

/// Recolors the logo with a single color.
pub fn apply_color(markup: &str, color: &str) -> String {
    SvgPipeline::new().with(SingleColor { color }).run(markup)
}

/// Writes each region's color (and auto-contrast color) onto the root.
pub fn apply_multiple_colors(markup: &str, map: &ColorMap, regions: &[ColorRegion]) -> String {
    SvgPipeline::new()
        .with(MultiColor { map, regions })
        .run(markup)
}

/// Regions whose CSS variable appears in the embedded stylesheet, each with
/// its current color from `map` (or its default).
///
/// Unparseable markup or a missing stylesheet yields no regions.
pub fn detect_colorable_regions(
    markup: &str,
    regions: &[ColorRegion],
    map: &ColorMap,
) -> Vec<DetectedRegion> {
    match SvgDocument::parse(markup) {
        Ok(doc) => detect_regions(&doc.root, regions, map),
        Err(error) => {
            debug!(%error, "region detection skipped");
            Vec::new()
        }
    }
}

/// Resolves classes, `currentColor` and `var()` into literal attributes and
/// removes the stylesheet.
pub fn convert_styles_to_attributes(markup: &str) -> String {
    SvgPipeline::new().with(Flatten).run(markup)
}

/// Removes unreferenced definitions, empty groups, comments and empty attributes.
pub fn prune_unused_elements(markup: &str) -> String {
    SvgPipeline::new().with(Prune).run(markup)
}

/// Replaces any remaining `currentColor` with black.
pub fn hard_code_colors(markup: &str) -> String {
    SvgPipeline::new().with(HardCodeColors::default()).run(markup)
}

/// Makes the root responsive: no fixed size, a `viewBox`, full-width style.
pub fn finalize_for_webflow(markup: &str) -> String {
    SvgPipeline::new().with(Finalize::default()).run(markup)
}

/// Pretty-prints with normalized attribute order.
pub fn format_svg(markup: &str) -> String {
    SvgPipeline::new().pretty().run(markup)
}

fn webflow_stages<'a>(pipeline: SvgPipeline<'a>) -> SvgPipeline<'a> {
    pipeline
        .with(Flatten)
        .with(Prune)
        .with(HardCodeColors::default())
        .with(Finalize::default())
        .pretty()
}

/// Self-contained, responsive markup for page builders and vector editors.
pub fn create_webflow_optimized_svg(markup: &str) -> String {
    webflow_stages(SvgPipeline::new()).run(markup)
}

/// Resizes then recolors with a single color.
pub fn apply_svg_modifications(markup: &str, size: u32, color: &str) -> String {
    customize_svg(markup, size, Coloring::Single(color))
}

/// Resizes then recolors, without flattening or formatting.
pub fn customize_svg(markup: &str, size: u32, coloring: Coloring<'_>) -> String {
    with_coloring(SvgPipeline::new().with(Resize { size }), coloring).run(markup)
}

/// The full export composition: resize, recolor, flatten, prune, hard-code,
/// finalize and pretty-print.
pub fn export_svg(markup: &str, size: u32, coloring: Coloring<'_>) -> String {
    let pipeline = with_coloring(SvgPipeline::new().with(Resize { size }), coloring);
    webflow_stages(pipeline).run(markup)
}

/// Adds the recolor stage. Multi-color logos get every configured region.
fn with_coloring<'a>(pipeline: SvgPipeline<'a>, coloring: Coloring<'a>) -> SvgPipeline<'a> {
    match coloring {
        Coloring::Single(color) => pipeline.with(SingleColor { color }),
        Coloring::Multi { map, regions } => pipeline.with(MultiColor { map, regions }),
    }
}
