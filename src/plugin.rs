// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::path::Path;

use svgmin_css::StyleData;
use svgmin_tree::{names, Document, Visitor};

/// A tree rewriting step.
pub trait Plugin {
    /// Returns a unique plugin name, like `removeComments`.
    fn name(&self) -> &str;

    /// Creates a visitor for the current document.
    ///
    /// Returns `None` when the plugin cannot run on this document,
    /// for example when it depends on styles and the document has scripts.
    fn create<'a>(&self, info: &PluginInfo<'a>, params: &Params) -> Option<Box<dyn Visitor + 'a>>;
}

/// A context of a single plugin invocation.
#[derive(Clone, Copy, Debug)]
pub struct PluginInfo<'a> {
    /// The current pass number, starting from 1.
    pub pass: u32,
    /// The input file path, if any.
    pub path: Option<&'a Path>,
    /// Document summary.
    pub doc_data: &'a DocData,
}

/// A document summary shared by all plugins of a pass.
#[derive(Debug)]
pub struct DocData {
    has_scripts: bool,
    has_animations: bool,
    styles: RefCell<Option<StyleData>>,
}

impl DocData {
    /// Collects the summary.
    ///
    /// A stylesheet that cannot be parsed is logged and leaves the document
    /// without styles, which disables style-dependent plugins.
    pub fn new(doc: &Document) -> Self {
        let mut has_scripts = false;
        let mut has_animations = false;
        for node in doc.elements() {
            let element = match doc.element(node) {
                Some(e) => e,
                None => continue,
            };

            if element.has_name("script") {
                has_scripts = true;
            }

            if element.is_svg() && names::is_animation(&element.name) {
                has_animations = true;
            }

            if element
                .attributes
                .iter()
                .any(|a| names::is_event_attribute(&a.name))
            {
                has_scripts = true;
            }

            if element
                .href()
                .map_or(false, |href| href.trim_start().starts_with("javascript:"))
            {
                has_scripts = true;
            }
        }

        let styles = match StyleData::new(doc) {
            Ok(styles) => Some(styles),
            Err(e) => {
                log::warn!("Failed to parse styles cause {}. Style-dependent plugins are disabled.", e);
                None
            }
        };

        DocData {
            has_scripts,
            has_animations,
            styles: RefCell::new(styles),
        }
    }

    /// Checks that the document has scripts or event handlers.
    #[inline]
    pub fn has_scripts(&self) -> bool {
        self.has_scripts
    }

    /// Checks that the document has animation elements.
    #[inline]
    pub fn has_animations(&self) -> bool {
        self.has_animations
    }

    /// Returns the document styles, unless they could not be parsed.
    pub fn styles(&self) -> Option<Ref<StyleData>> {
        Ref::filter_map(self.styles.borrow(), |s| s.as_ref()).ok()
    }

    /// Returns mutable document styles, unless they could not be parsed.
    ///
    /// # Panics
    ///
    /// - if styles are already borrowed
    pub fn styles_mut(&self) -> Option<RefMut<StyleData>> {
        RefMut::filter_map(self.styles.borrow_mut(), |s| s.as_mut()).ok()
    }

    /// Checks that style-dependent plugins can run on the document.
    pub fn can_use_styles(&self) -> bool {
        !self.has_scripts && self.styles.borrow().is_some()
    }
}

/// A plugin parameter value.
#[derive(Clone, PartialEq, Debug)]
pub enum ParamValue {
    /// `true` or `false`.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Str(String),
    /// A list of strings.
    List(Vec<String>),
}

impl std::str::FromStr for ParamValue {
    type Err = std::convert::Infallible;

    /// Parses `true`, `false`, a number, a comma-separated list or a string.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value = match text {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => {
                if let Ok(n) = text.parse::<f64>() {
                    ParamValue::Number(n)
                } else if text.contains(',') {
                    ParamValue::List(
                        text.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect(),
                    )
                } else {
                    ParamValue::Str(text.to_string())
                }
            }
        };

        Ok(value)
    }
}

/// Named plugin parameters.
///
/// Getters take a default value, which is used when a parameter is not set
/// or has a different type.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Params(HashMap<String, ParamValue>);

impl Params {
    /// Creates an empty parameters list.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter.
    pub fn set(&mut self, name: &str, value: ParamValue) {
        self.0.insert(name.to_string(), value);
    }

    /// Sets a parameter and returns `self`.
    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.set(name, value);
        self
    }

    /// Returns a parameter.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Returns a boolean parameter.
    pub fn bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(ParamValue::Bool(v)) => *v,
            _ => default,
        }
    }

    /// Returns a numeric parameter.
    pub fn number(&self, name: &str, default: f64) -> f64 {
        match self.get(name) {
            Some(ParamValue::Number(v)) => *v,
            _ => default,
        }
    }

    /// Returns a string parameter.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns a list parameter. A single string is a list of one item.
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(ParamValue::List(v)) => v.clone(),
            Some(ParamValue::Str(v)) => vec![v.clone()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => {
            #[test]
            fn $name() {
                assert_eq!($text.parse::<ParamValue>().unwrap(), $result);
            }
        };
    }

    test!(parse_bool, "true", ParamValue::Bool(true));
    test!(parse_number, "2.5", ParamValue::Number(2.5));
    test!(parse_str, "icon-", ParamValue::Str("icon-".to_string()));
    test!(
        parse_list,
        "a, b,",
        ParamValue::List(vec!["a".to_string(), "b".to_string()])
    );

    #[test]
    fn getters() {
        let params = Params::new()
            .with("remove", ParamValue::Bool(false))
            .with("preserve", ParamValue::Str("a".to_string()));
        assert!(!params.bool("remove", true));
        assert!(params.bool("minify", true));
        assert_eq!(params.list("preserve"), ["a"]);
        assert_eq!(params.number("remove", 1.0), 1.0);
    }

    #[test]
    fn doc_data() {
        let doc = Document::parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.a{fill:red}</style>
                <rect onclick='alert(1)'/>
                <animate/>
            </svg>",
        )
        .unwrap();
        let data = DocData::new(&doc);
        assert!(data.has_scripts());
        assert!(data.has_animations());
        assert!(data.styles().is_some());
        assert!(!data.can_use_styles());
    }

    #[test]
    fn broken_styles() {
        let doc = Document::parse(
            "<svg xmlns='http://www.w3.org/2000/svg'><style>a{b{fill:red}}</style></svg>",
        )
        .unwrap();
        let data = DocData::new(&doc);
        assert!(data.styles().is_none());
        assert!(!data.can_use_styles());
    }
}
