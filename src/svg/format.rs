//! Pretty-printing: stable attribute order and one tag per line.

use std::cmp::Ordering;

use super::document::Element;
use super::{Stage, SvgDocument};
use crate::error::Result;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Attributes that lead every element, in this order.
pub const PREFERRED_ORDER: [&str; 13] = [
    "width",
    "height",
    "viewBox",
    "fill",
    "stroke",
    "stroke-width",
    "opacity",
    "d",
    "fill-rule",
    "clip-rule",
    "transform",
    "id",
    "class",
];

const INDENT: &str = "  ";

/// Sorts attributes into a fixed order and keeps exactly one SVG namespace
/// declaration, on the root.
///
/// Namespace declarations come first, then [`PREFERRED_ORDER`], then
/// everything else alphabetically.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeAttributes;

impl Stage for NormalizeAttributes {
    fn name(&self) -> &'static str {
        "normalize-attributes"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        for child in doc.root.elements_mut() {
            remove_svg_namespace(child);
        }
        doc.root.set_attr("xmlns", SVG_NAMESPACE);
        doc.root.walk_mut(&mut |element| {
            element.attributes.sort_by(|(a, _), (b, _)| compare_attributes(a, b));
        });
        Ok(())
    }
}

fn remove_svg_namespace(element: &mut Element) {
    if element.attr("xmlns") == Some(SVG_NAMESPACE) {
        element.remove_attr("xmlns");
    }
    for child in element.elements_mut() {
        remove_svg_namespace(child);
    }
}

fn rank(name: &str) -> (u8, usize) {
    if name == "xmlns" {
        return (0, 0);
    }
    if name.starts_with("xmlns:") {
        return (0, 1);
    }
    match PREFERRED_ORDER.iter().position(|preferred| *preferred == name) {
        Some(index) => (1, index),
        None => (2, 0),
    }
}

fn compare_attributes(a: &str, b: &str) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
}

/// Puts every tag on its own line, indented two spaces per nesting level.
///
/// Depth is tracked by counting opening and closing tag markers on each
/// line and never goes below zero. Line endings are normalized to `\n`.
pub fn indent(markup: &str) -> String {
    let normalized = markup
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("><", ">\n<");

    let mut depth = 0usize;
    let mut lines = Vec::new();
    for line in normalized.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if line.starts_with("</") {
            depth = depth.saturating_sub(1);
            lines.push(format!("{}{line}", INDENT.repeat(depth)));
            continue;
        }

        lines.push(format!("{}{line}", INDENT.repeat(depth)));
        let opens = line
            .match_indices('<')
            .filter(|(index, _)| {
                !matches!(line[index + 1..].chars().next(), Some('/' | '?' | '!') | None)
            })
            .count();
        let closes = line.matches("</").count() + line.matches("/>").count();
        depth = (depth + opens).saturating_sub(closes);
    }
    lines.join("\n")
}
