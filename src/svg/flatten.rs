//! Converts stylesheet- and variable-driven coloring into literal attributes.
//!
//! Page builders and vector editors do not reliably apply an embedded
//! `<style>` block to pasted markup, so after [`Flatten`] the document
//! carries every color it needs on the elements themselves.

use std::collections::BTreeSet;

use tracing::debug;

use super::document::{Element, Node};
use super::style::{InlineStyle, RootContext, Stylesheet, needs_resolution};
use super::{Stage, SvgDocument};
use crate::color::BLACK;
use crate::error::Result;

/// Properties moved from class rules and inline styles onto attributes.
pub const FLATTENED_PROPERTIES: [&str; 4] = ["fill", "stroke", "opacity", "stroke-width"];

/// Resolves stylesheet classes, `currentColor` and `var()` into attributes,
/// then deletes every `<style>` element and the root's inline style.
///
/// Class rules apply in stylesheet order. An element's own inline style
/// wins over its classes. Classes named by the stylesheet are dropped from
/// `class`; unknown classes are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten;

impl Stage for Flatten {
    fn name(&self) -> &'static str {
        "flatten"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        let sheet = Stylesheet::from_root(&doc.root);
        let context = RootContext::from_root(&doc.root);
        let flattener = Flattener {
            rules: sheet.class_rules().collect(),
            referenced: sheet.referenced_classes(),
            context,
        };

        flattener.flatten(&mut doc.root, true);
        remove_style_elements(&mut doc.root);
        doc.root.remove_attr("style");

        debug!(rules = flattener.rules.len(), "flattened stylesheet");
        Ok(())
    }
}

struct Flattener<'s> {
    rules: Vec<(&'s str, &'s InlineStyle)>,
    referenced: BTreeSet<String>,
    context: RootContext,
}

impl Flattener<'_> {
    fn flatten(&self, element: &mut Element, is_root: bool) {
        self.apply_classes(element);
        if !is_root {
            self.apply_inline_style(element);
        }

        let context = &self.context;
        for (key, value) in element.attributes.iter_mut() {
            if key.as_str() != "style" && key.as_str() != "class" && needs_resolution(value) {
                *value = context.resolve(value);
            }
        }

        for child in element.elements_mut() {
            self.flatten(child, false);
        }
    }

    fn apply_classes(&self, element: &mut Element) {
        let Some(classes) = element.attr("class").map(str::to_string) else {
            return;
        };

        let mut kept = Vec::new();
        for class in classes.split_whitespace() {
            for (_, declarations) in self.rules.iter().filter(|(name, _)| *name == class) {
                for (property, value) in declarations.iter() {
                    if FLATTENED_PROPERTIES.contains(&property) {
                        element.set_attr(property, self.context.resolve(value));
                    }
                }
            }
            if !self.referenced.contains(class) {
                kept.push(class);
            }
        }

        if kept.is_empty() {
            element.remove_attr("class");
        } else {
            element.set_attr("class", kept.join(" "));
        }
    }

    fn apply_inline_style(&self, element: &mut Element) {
        let Some(text) = element.attr("style") else {
            return;
        };
        let mut style = InlineStyle::parse(text);

        for property in FLATTENED_PROPERTIES {
            if let Some(value) = style.remove(property) {
                element.set_attr(property, self.context.resolve(&value));
            }
        }
        for value in style.values_mut() {
            if needs_resolution(value) {
                *value = self.context.resolve(value);
            }
        }

        if style.is_empty() {
            element.remove_attr("style");
        } else {
            element.set_attr("style", style.to_string());
        }
    }
}

fn remove_style_elements(element: &mut Element) {
    element.retain_children(|node| !matches!(node, Node::Element(child) if child.local_name() == "style"));
    for child in element.elements_mut() {
        remove_style_elements(child);
    }
}

/// Replaces any attribute or inline style declaration still equal to
/// `currentColor` with a literal color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardCodeColors {
    pub fallback: String,
}

impl Default for HardCodeColors {
    fn default() -> Self {
        Self {
            fallback: BLACK.to_string(),
        }
    }
}

impl Stage for HardCodeColors {
    fn name(&self) -> &'static str {
        "hard-code-colors"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        doc.root.walk_mut(&mut |element| {
            for (key, value) in element.attributes.iter_mut() {
                if key.as_str() == "style" {
                    let mut style = InlineStyle::parse(value);
                    let mut replaced = false;
                    for declared in style.values_mut() {
                        if is_current_color(declared) {
                            *declared = self.fallback.clone();
                            replaced = true;
                        }
                    }
                    if replaced {
                        *value = style.to_string();
                    }
                } else if is_current_color(value) {
                    *value = self.fallback.clone();
                }
            }
        });
        Ok(())
    }
}

fn is_current_color(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("currentColor")
}
