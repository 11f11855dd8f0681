use super::{Stage, SvgDocument};
use crate::error::Result;

/// Canvas assumed for logos that ship without a `viewBox`.
pub const DEFAULT_VIEW_BOX: &str = "0 0 240 240";

/// Inline style that lets the embedding container control the size.
pub const RESPONSIVE_STYLE: &str = "width:100%; height:100%; display:block";

/// Prepares the root for responsive embedding in page builders.
///
/// Drops the fixed `width`/`height`, guarantees a `viewBox`, centers the
/// artwork with `preserveAspectRatio` and stretches the element to its
/// container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalize {
    pub default_view_box: String,
}

impl Default for Finalize {
    fn default() -> Self {
        Self {
            default_view_box: DEFAULT_VIEW_BOX.to_string(),
        }
    }
}

impl Stage for Finalize {
    fn name(&self) -> &'static str {
        "finalize"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        let root = &mut doc.root;
        root.remove_attr("width");
        root.remove_attr("height");
        if root.attr("viewBox").is_none_or(|view_box| view_box.trim().is_empty()) {
            root.set_attr("viewBox", self.default_view_box.as_str());
        }
        root.set_attr("preserveAspectRatio", "xMidYMid meet");
        root.set_attr("style", RESPONSIVE_STYLE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::finalize_for_webflow;
    use super::*;

    #[test]
    fn removes_fixed_size_and_adds_responsive_attributes() {
        let out = finalize_for_webflow(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 32 32" style="color: red"/>"#,
        );
        let doc = SvgDocument::parse(&out).unwrap();
        assert_eq!(doc.root.attr("width"), None);
        assert_eq!(doc.root.attr("height"), None);
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 32 32"));
        assert_eq!(doc.root.attr("preserveAspectRatio"), Some("xMidYMid meet"));
        assert_eq!(doc.root.attr("style"), Some(RESPONSIVE_STYLE));
    }

    #[test]
    fn missing_view_box_defaults_to_logo_canvas() {
        let out = finalize_for_webflow(r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"/>"#);
        let doc = SvgDocument::parse(&out).unwrap();
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 240 240"));
    }

    #[test]
    fn view_box_default_is_configurable() {
        let mut doc = SvgDocument::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
        let stage = Finalize {
            default_view_box: "0 0 100 50".to_string(),
        };
        stage.apply(&mut doc).unwrap();
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 100 50"));
    }
}
