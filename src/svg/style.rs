//! Just enough CSS for logo stylesheets: inline `style` declarations,
//! flat class rules, and `var()` / `currentColor` resolution against the
//! root element.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::document::Element;

/// Nesting limit for `var()` chains, guarding against cycles.
const MAX_VAR_DEPTH: usize = 8;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^{}]+)\{([^}]*)\}").unwrap());
static SIMPLE_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.([\w-]+)$").unwrap());
static ANY_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.([\w-]+)").unwrap());

// ============================================================================
// InlineStyle
// ============================================================================

/// Ordered `name: value` declarations, as found in a `style` attribute or a
/// rule body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parses `a: b; c: d`. Malformed declarations are skipped.
    pub fn parse(text: &str) -> Self {
        let declarations = text
            .split(';')
            .filter_map(|declaration| {
                let (name, value) = declaration.split_once(':')?;
                let (name, value) = (name.trim(), value.trim());
                (!name.is_empty() && !value.is_empty())
                    .then(|| (name.to_string(), value.to_string()))
            })
            .collect();
        Self { declarations }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.declarations.iter_mut().rev().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let mut removed = None;
        self.declarations.retain(|(key, value)| {
            if key == name {
                removed = Some(value.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.declarations.iter_mut().map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.declarations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Stylesheet
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selectors: Vec<String>,
    pub declarations: InlineStyle,
}

/// Flat list of rules from every `<style>` element, in document order.
///
/// At-rules are ignored. Only single-class selectors (`.st0`) carry
/// declarations the flattener can apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    pub fn parse(css: &str) -> Self {
        let css = COMMENT.replace_all(css, "");
        let rules = RULE
            .captures_iter(&css)
            .filter_map(|capture| {
                let selectors: Vec<String> = capture[1]
                    .split(',')
                    .map(|selector| selector.trim().to_string())
                    .filter(|selector| !selector.is_empty())
                    .collect();
                if selectors.is_empty() || selectors.iter().any(|s| s.starts_with('@')) {
                    return None;
                }
                Some(StyleRule {
                    selectors,
                    declarations: InlineStyle::parse(&capture[2]),
                })
            })
            .collect();
        Self { rules }
    }

    /// Parses the text of every `<style>` element under `root`.
    pub fn from_root(root: &Element) -> Self {
        Self::parse(&stylesheet_text(root))
    }

    /// `(class, declarations)` for every single-class selector, in rule order.
    pub fn class_rules(&self) -> impl Iterator<Item = (&str, &InlineStyle)> {
        self.rules.iter().flat_map(|rule| {
            rule.selectors.iter().filter_map(move |selector| {
                let class = SIMPLE_CLASS.captures(selector)?.get(1)?.as_str();
                Some((class, &rule.declarations))
            })
        })
    }

    /// Every class named by any selector, simple or compound.
    pub fn referenced_classes(&self) -> BTreeSet<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.selectors.iter())
            .flat_map(|selector| ANY_CLASS.captures_iter(selector))
            .map(|capture| capture[1].to_string())
            .collect()
    }
}

/// Concatenated text of every `<style>` element under `root`.
///
/// Empty when the document has no embedded stylesheet.
pub fn stylesheet_text(root: &Element) -> String {
    let mut css = String::new();
    root.walk(&mut |element| {
        if element.local_name() == "style" {
            css.push_str(&element.text_content());
            css.push('\n');
        }
    });
    css
}

// ============================================================================
// Value Resolution
// ============================================================================

/// Root-level inputs for resolving `currentColor` and `var()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootContext {
    /// Resolved root `color`, if the root declares one.
    pub color: Option<String>,
    /// Custom properties (`--name`) declared in the root's inline style.
    pub custom_properties: InlineStyle,
}

impl RootContext {
    /// Reads the root's inline `style`, falling back to a `color` attribute.
    pub fn from_root(root: &Element) -> Self {
        let style = InlineStyle::parse(root.attr("style").unwrap_or_default());

        let mut custom_properties = InlineStyle::default();
        for (name, value) in style.iter().filter(|(name, _)| name.starts_with("--")) {
            custom_properties.set(name, value);
        }

        let mut context = Self {
            color: None,
            custom_properties,
        };
        let declared = style.get("color").or_else(|| root.attr("color"));
        context.color = declared
            .map(|color| context.resolve(color))
            .filter(|color| !color.eq_ignore_ascii_case("currentColor"));
        context
    }

    /// Resolves `currentColor` and whole-value `var(--name, fallback)`.
    ///
    /// An undefined variable without a fallback, or a chain of variables
    /// deeper than the nesting limit, resolves to the root color. When no
    /// root color is known the result stays `currentColor`. Other
    /// values are returned trimmed with any `!important` removed.
    pub fn resolve(&self, value: &str) -> String {
        self.resolve_with_depth(value, 0)
    }

    fn resolve_with_depth(&self, value: &str, depth: usize) -> String {
        let value = strip_important(value);
        if depth > MAX_VAR_DEPTH {
            return self.current_color();
        }

        if value.eq_ignore_ascii_case("currentColor") {
            return self.current_color();
        }

        if let Some((name, fallback)) = parse_var(value) {
            if let Some(bound) = self.custom_properties.get(name) {
                return self.resolve_with_depth(bound, depth + 1);
            }
            if let Some(fallback) = fallback {
                return self.resolve_with_depth(fallback, depth + 1);
            }
            return self.current_color();
        }

        value.to_string()
    }

    fn current_color(&self) -> String {
        self.color.clone().unwrap_or_else(|| "currentColor".to_string())
    }
}

/// True if the value depends on inherited or variable context.
pub fn needs_resolution(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("currentColor") || value.contains("var(")
}

fn strip_important(value: &str) -> &str {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    match lower.strip_suffix("!important") {
        Some(rest) => value[..rest.len()].trim_end(),
        None => value,
    }
}

/// Splits `var(--name, fallback)` into its name and optional fallback.
fn parse_var(value: &str) -> Option<(&str, Option<&str>)> {
    let inner = value.strip_prefix("var(")?.strip_suffix(')')?;

    let mut depth = 0usize;
    for (index, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let fallback = inner[index + 1..].trim();
                return Some((inner[..index].trim(), (!fallback.is_empty()).then_some(fallback)));
            }
            _ => {}
        }
    }
    Some((inner.trim(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::document::SvgDocument;

    #[test]
    fn inline_style_parses_and_prints() {
        let mut style = InlineStyle::parse("color: #fff ; --a:red;;broken; fill :none");
        assert_eq!(style.get("color"), Some("#fff"));
        assert_eq!(style.get("--a"), Some("red"));
        assert_eq!(style.get("fill"), Some("none"));
        assert_eq!(style.get("broken"), None);

        style.set("color", "#000");
        assert_eq!(style.remove("--a").as_deref(), Some("red"));
        assert_eq!(style.to_string(), "color: #000; fill: none");
    }

    #[test]
    fn stylesheet_collects_class_rules() {
        let css = "/* brand */ .st0{fill:#003399} .st1, .st2 { fill: var(--itau-text-color, currentColor); }
                   g .st3 { stroke: red } @media print { .st4 { fill: black } }";
        let sheet = Stylesheet::parse(css);
        let rules: Vec<_> = sheet.class_rules().map(|(class, _)| class).collect();
        assert_eq!(rules, ["st0", "st1", "st2"]);
        let referenced = sheet.referenced_classes();
        assert!(referenced.contains("st3"));
        assert!(referenced.contains("st0"));
        assert!(!referenced.contains("st4"));
    }

    #[test]
    fn stylesheet_reads_style_elements() {
        let doc = SvgDocument::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><style><![CDATA[.a{fill:red}]]></style><g><style>.b{stroke:blue}</style></g></svg>"#,
        )
        .unwrap();
        let sheet = Stylesheet::from_root(&doc.root);
        let classes: Vec<_> = sheet.class_rules().map(|(class, _)| class).collect();
        assert_eq!(classes, ["a", "b"]);
    }

    #[test]
    fn resolves_current_color_and_variables() {
        let mut root = Element::new("svg");
        root.set_attr("style", "color: #ff0000; --bg-color: #003399; --alias: var(--bg-color)");
        let context = RootContext::from_root(&root);

        assert_eq!(context.resolve("currentColor"), "#ff0000");
        assert_eq!(context.resolve("var(--bg-color, currentColor)"), "#003399");
        assert_eq!(context.resolve("var(--missing, #123456)"), "#123456");
        assert_eq!(context.resolve("var(--missing, currentColor)"), "#ff0000");
        assert_eq!(context.resolve("var(--missing)"), "#ff0000");
        assert_eq!(context.resolve("var(--alias)"), "#003399");
        assert_eq!(context.resolve("#abc !important"), "#abc");
        assert_eq!(context.resolve("url(#grad)"), "url(#grad)");
    }

    #[test]
    fn root_color_attribute_is_a_fallback() {
        let mut root = Element::new("svg");
        root.set_attr("color", "#00ff00");
        assert_eq!(RootContext::from_root(&root).color.as_deref(), Some("#00ff00"));
        assert_eq!(RootContext::from_root(&Element::new("svg")).color, None);
    }

    #[test]
    fn cyclic_variables_terminate() {
        let mut root = Element::new("svg");
        root.set_attr("style", "--a: var(--b); --b: var(--a)");
        assert_eq!(RootContext::from_root(&root).resolve("var(--a)"), "currentColor");

        root.set_attr("style", "color: #123456; --a: var(--b); --b: var(--a)");
        assert_eq!(RootContext::from_root(&root).resolve("var(--a)"), "#123456");
    }

    #[test]
    fn var_fallbacks_may_nest() {
        assert_eq!(
            parse_var("var(--x, rgb(1, 2, 3))"),
            Some(("--x", Some("rgb(1, 2, 3)")))
        );
        assert_eq!(parse_var("var(--x)"), Some(("--x", None)));
        assert_eq!(parse_var("red"), None);
    }
}
