//! Dead-code removal: unreferenced definitions, inert groups, comments and
//! empty attributes.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::document::{Element, Node};
use super::style::stylesheet_text;
use super::{Stage, SvgDocument};
use crate::error::Result;

static URL_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?#([^'")\s]+)['"]?\s*\)"#).unwrap());

/// Definition elements removed from the top level when nothing references them.
const DEFINITIONS: [&str; 6] = [
    "linearGradient",
    "radialGradient",
    "pattern",
    "clipPath",
    "mask",
    "filter",
];

/// Elements that put pixels on the canvas.
const DRAWABLE: [&str; 10] = [
    "path", "circle", "rect", "polygon", "polyline", "ellipse", "line", "text", "image", "use",
];

/// Attributes that keep an otherwise empty `<g>` alive.
const CONSEQUENTIAL: [&str; 7] = [
    "transform",
    "clip-path",
    "mask",
    "filter",
    "opacity",
    "fill",
    "stroke",
];

/// Removes everything that cannot affect rendering.
///
/// Runs to a fixpoint, so a gradient only referenced by another removed
/// gradient goes too. Comments and processing instructions are stripped,
/// including those before the root, and empty attributes are dropped last.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prune;

impl Stage for Prune {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        doc.prolog.clear();
        strip_comments(&mut doc.root);

        let mut passes = 0;
        loop {
            passes += 1;
            let referenced = referenced_ids(&doc.root);
            if !prune_children(&mut doc.root, &referenced, true) {
                break;
            }
        }

        doc.root.walk_mut(&mut |element| element.retain_attrs(|_, value| !value.trim().is_empty()));
        debug!(passes, "pruned unused elements");
        Ok(())
    }
}

/// Ids referenced through `url(#id)` in any attribute or stylesheet, or
/// through an `href`/`xlink:href` fragment.
pub fn referenced_ids(root: &Element) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();

    root.walk(&mut |element| {
        for (key, value) in &element.attributes {
            for capture in URL_REFERENCE.captures_iter(value) {
                ids.insert(capture[1].to_string());
            }
            let is_href = key == "href" || key.ends_with(":href");
            if let Some(id) = value.trim().strip_prefix('#').filter(|_| is_href) {
                ids.insert(id.to_string());
            }
        }
    });

    for capture in URL_REFERENCE.captures_iter(&stylesheet_text(root)) {
        ids.insert(capture[1].to_string());
    }
    ids
}

fn strip_comments(element: &mut Element) {
    element.retain_children(|node| {
        !matches!(node, Node::Comment(_) | Node::ProcessingInstruction { .. })
    });
    for child in element.elements_mut() {
        strip_comments(child);
    }
}

/// Prunes the subtree bottom-up. Returns true if anything was removed.
fn prune_children(element: &mut Element, referenced: &BTreeSet<String>, is_root: bool) -> bool {
    let mut changed = false;
    for child in element.elements_mut() {
        changed |= prune_children(child, referenced, false);
    }

    let in_defs = element.local_name() == "defs";
    let before = element.children.len();
    element.retain_children(|node| match node {
        Node::Element(child) => !is_removable(child, referenced, in_defs, is_root),
        _ => true,
    });

    changed || element.children.len() != before
}

fn is_removable(element: &Element, referenced: &BTreeSet<String>, in_defs: bool, top_level: bool) -> bool {
    let name = element.local_name();
    let keeps_reference = subtree_has_referenced_id(element, referenced);

    if in_defs && name != "style" {
        return !keeps_reference;
    }
    if top_level && DEFINITIONS.contains(&name) {
        return !keeps_reference;
    }
    match name {
        "defs" => element.elements().next().is_none(),
        "g" => {
            let drawable = element.any_descendant(&|child| DRAWABLE.contains(&child.local_name()));
            let consequential = CONSEQUENTIAL.iter().any(|attr| element.has_attr(attr));
            !drawable && !consequential && !keeps_reference
        }
        _ => false,
    }
}

fn subtree_has_referenced_id(element: &Element, referenced: &BTreeSet<String>) -> bool {
    element
        .find(&|candidate| candidate.attr("id").is_some_and(|id| referenced.contains(id)))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::super::prune_unused_elements;
    use super::*;

    fn ids(markup: &str) -> BTreeSet<String> {
        let doc = SvgDocument::parse(markup).unwrap();
        let mut ids = BTreeSet::new();
        doc.root.walk(&mut |element| {
            if let Some(id) = element.attr("id") {
                ids.insert(id.to_string());
            }
        });
        ids
    }

    #[test]
    fn removes_unused_clip_path_and_empty_defs() {
        let out = prune_unused_elements(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><defs><clipPath id="unused"><rect/></clipPath></defs><path d="M0 0"/></svg>"#,
        );
        assert!(!out.contains("clipPath"));
        assert!(!out.contains("<defs"));
        assert!(out.contains(r#"<path d="M0 0"/>"#));
    }

    #[test]
    fn keeps_referenced_definitions() {
        let out = prune_unused_elements(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
                <defs>
                    <linearGradient id="used"><stop offset="0"/></linearGradient>
                    <linearGradient id="unused"/>
                    <clipPath id="clip"><rect/></clipPath>
                    <path id="shape" d="M0 0"/>
                </defs>
                <radialGradient id="loose"/>
                <g clip-path="url(#clip)"><rect fill="url('#used')"/></g>
                <use xlink:href="#shape"/>
            </svg>"##,
        );
        let remaining = ids(&out);
        assert!(remaining.contains("used"));
        assert!(remaining.contains("clip"));
        assert!(remaining.contains("shape"));
        assert!(!remaining.contains("unused"));
        assert!(!remaining.contains("loose"));
    }

    #[test]
    fn chained_references_are_pruned_to_fixpoint() {
        let out = prune_unused_elements(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><defs><linearGradient id="base"/><linearGradient id="derived" xlink:href="#base"/></defs><path d="M0 0"/></svg>"##,
        );
        assert!(ids(&out).is_empty());
        assert!(!out.contains("<defs"));
    }

    #[test]
    fn removes_inert_groups_only() {
        let out = prune_unused_elements(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                <g id="empty"><g/></g>
                <g id="drawn"><path d="M0 0"/></g>
                <g id="moved" transform="translate(1 1)"/>
            </svg>"#,
        );
        let remaining = ids(&out);
        assert!(!remaining.contains("empty"));
        assert!(remaining.contains("drawn"));
        assert!(remaining.contains("moved"));
    }

    #[test]
    fn strips_comments_and_empty_attributes() {
        let out = prune_unused_elements(
            r#"<!-- header --><svg xmlns="http://www.w3.org/2000/svg"><!-- inner --><?editor data?><path d="M0 0" class="" fill=" "/></svg>"#,
        );
        assert!(!out.contains("<!--"));
        assert!(!out.contains("<?"));
        assert!(out.contains(r#"<path d="M0 0"/>"#));
    }

    #[test]
    fn every_remaining_reference_resolves() {
        let out = prune_unused_elements(
            r##"<svg xmlns="http://www.w3.org/2000/svg"><defs><g><linearGradient id="nested"/></g><mask id="m"/></defs><rect fill="url(#nested)"/><rect mask="url(#gone)"/></svg>"##,
        );
        let doc = SvgDocument::parse(&out).unwrap();
        let present = ids(&out);
        for id in referenced_ids(&doc.root) {
            if id != "gone" {
                assert!(present.contains(&id), "{id} was referenced but removed");
            }
        }
        assert!(present.contains("nested"));
        assert!(!present.contains("m"));
    }
}
