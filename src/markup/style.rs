//! Style declarations, rules and keyframe blocks.
//!
//! [`StyleMap`] is an insertion-ordered `name → value` map; order matters
//! because keyframe blocks are turned into frames in declaration order.
//! [`StyleSheet`] stores named rules (`#id`, `.class`, tag names) and
//! `@keyframes` blocks, and resolves the style of an element by layering
//! the id rule, the class rules and the inline `style` attribute.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::markup::element::Element;

/// Ordered style declarations.
///
/// Reads treat an empty value like a missing declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `;`-separated list of `name:value` declarations.
    ///
    /// Only the first `:` splits name from value, so `url(http://...)`
    /// values survive. Names keep their case (`refractionRatio`).
    #[must_use]
    pub fn parse_declarations(source: &str) -> Self {
        source
            .split(';')
            .filter_map(|decl| {
                let (name, value) = decl.split_once(':')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a declaration, keeping the original position when it already
    /// exists.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Layers `other` on top of `self`.
    pub fn extend_from(&mut self, other: &StyleMap) {
        for (name, value) in &other.entries {
            self.set(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (name, value) in iter {
            map.set(&name.into(), &value.into());
        }
        map
    }
}

/// The body of one `@keyframes` rule: `(selector, declarations)` blocks in
/// source order. Selectors are `from`, `to` or percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframes {
    blocks: Vec<(String, StyleMap)>,
}

impl Keyframes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_block(mut self, selector: &str, declarations: StyleMap) -> Self {
        self.push(selector, declarations);
        self
    }

    pub fn push(&mut self, selector: &str, declarations: StyleMap) {
        self.blocks.push((selector.to_string(), declarations));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleMap)> {
        self.blocks.iter().map(|(s, d)| (s.as_str(), d))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Named style rules and keyframe blocks for one document.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: FxHashMap<String, StyleMap>,
    keyframes: FxHashMap<String, Keyframes>,
}

impl StyleSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a small CSS subset: plain rules with comma separated
    /// selectors, and `@keyframes` (optionally vendor prefixed) blocks.
    /// Comments are skipped. Anything malformed ends parsing with a warning.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut sheet = Self::new();
        let source = strip_comments(source);
        let mut rest = source.as_str();

        while let Some(open) = rest.find('{') {
            let prelude = rest[..open].trim();
            let Some(close) = matching_brace(rest, open) else {
                log::warn!("Unterminated style rule `{prelude}`, ignoring the rest of the sheet");
                break;
            };
            let body = &rest[open + 1..close];

            if let Some(name) = keyframes_name(prelude) {
                sheet.add_keyframes(name, parse_keyframes_body(body));
            } else {
                let declarations = StyleMap::parse_declarations(body);
                for selector in prelude.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    sheet.add_rule(selector, &declarations);
                }
            }
            rest = &rest[close + 1..];
        }

        sheet
    }

    /// Merges `other` into `self`. Rules are layered, keyframe blocks with
    /// the same name are replaced.
    pub fn merge(&mut self, other: StyleSheet) {
        for (selector, declarations) in &other.rules {
            self.add_rule(selector, declarations);
        }
        self.keyframes.extend(other.keyframes);
    }

    /// Adds declarations to a rule, overriding earlier values.
    pub fn add_rule(&mut self, selector: &str, declarations: &StyleMap) {
        self.rules
            .entry(selector.to_string())
            .or_default()
            .extend_from(declarations);
    }

    #[must_use]
    pub fn rule(&self, selector: &str) -> Option<&StyleMap> {
        self.rules.get(selector)
    }

    pub fn add_keyframes(&mut self, name: &str, keyframes: Keyframes) {
        self.keyframes.insert(name.to_string(), keyframes);
    }

    #[must_use]
    pub fn keyframes(&self, name: &str) -> Option<&Keyframes> {
        self.keyframes.get(name)
    }

    /// Resolves the style of an element: `#id` rule, then `.class` rules in
    /// attribute order, then the inline `style` attribute.
    #[must_use]
    pub fn resolve(&self, element: &Element) -> StyleMap {
        let mut style = StyleMap::new();

        if let Some(id) = element.id()
            && let Some(rule) = self.rule(&format!("#{id}"))
        {
            style.extend_from(rule);
        }

        for class in element.class_names() {
            if let Some(rule) = self.rule(&format!(".{class}")) {
                style.extend_from(rule);
            }
        }

        if let Some(inline) = element.attribute("style") {
            style.extend_from(&StyleMap::parse_declarations(inline));
        }

        style
    }
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0_usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn keyframes_name(prelude: &str) -> Option<&str> {
    ["@keyframes", "@-webkit-keyframes", "@-moz-keyframes"]
        .iter()
        .find_map(|at| prelude.strip_prefix(at))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn parse_keyframes_body(body: &str) -> Keyframes {
    let mut keyframes = Keyframes::new();
    let mut rest = body;
    while let Some(open) = rest.find('{') {
        let selectors = rest[..open].trim();
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            log::warn!("Unterminated keyframe block `{selectors}`");
            break;
        };
        let declarations = StyleMap::parse_declarations(&rest[open + 1..close]);
        for selector in selectors.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            keyframes.push(selector, declarations.clone());
        }
        rest = &rest[close + 1..];
    }
    keyframes
}
