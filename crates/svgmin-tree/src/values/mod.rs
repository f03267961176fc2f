// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Typed attribute and CSS property values.
//!
//! Every value keeps its source text and parses it only on demand.
//! A minified representation is produced lazily as well and cached
//! until the value is mutated.

use std::cell::OnceCell;
use std::fmt;

mod class;
mod color;
mod length;
mod number;
mod path;
mod style;
mod transform;
mod url;

pub use class::ClassList;
pub use color::{color_to_string, Paint};
pub use length::Length;
pub use number::{fmt_number, Fraction, Number, Percentage};
pub use path::PathData;
pub use style::{Declarations, StyleDeclaration};
pub use transform::{TransformItem, TransformList};
pub use url::{find_func_iris, rewrite_func_iris, UrlRef};

/// Common behavior of all values.
pub trait Value {
    /// Returns the canonical text of the value.
    fn as_str(&self) -> &str;

    /// Returns the minified text of the value.
    ///
    /// Values that cannot be parsed minify to their trimmed text.
    fn to_minified(&self) -> &str;

    /// Checks that the value is empty or whitespace-only.
    fn is_empty(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    /// Checks that the value has a `var()` reference.
    fn has_var(&self) -> bool {
        has_var(self.as_str())
    }
}

/// Checks that a CSS value has a `var()` reference.
pub fn has_var(text: &str) -> bool {
    text.contains("var(")
}

/// A value syntax that can be parsed from and written to a string.
pub trait Syntax: Clone + fmt::Debug + Sized {
    /// Parses a value. Returns `None` when the text cannot be
    /// represented losslessly.
    fn parse(text: &str) -> Option<Self>;

    /// Writes a value in its shortest form.
    fn write(&self) -> String;
}

/// A lazily parsed value.
///
/// At least one of the text and the parsed value is always present.
#[derive(Clone, Debug)]
pub struct Cached<T> {
    text: OnceCell<String>,
    parsed: OnceCell<Option<T>>,
    minified: OnceCell<String>,
}

impl<T: Syntax> Cached<T> {
    /// Creates a value from its text.
    pub fn new(text: &str) -> Self {
        Cached {
            text: OnceCell::from(text.to_string()),
            parsed: OnceCell::new(),
            minified: OnceCell::new(),
        }
    }

    /// Creates a value from an already parsed one.
    pub fn from_parsed(value: T) -> Self {
        Cached {
            text: OnceCell::new(),
            parsed: OnceCell::from(Some(value)),
            minified: OnceCell::new(),
        }
    }

    /// Returns a parsed value, unless the text is invalid.
    pub fn parsed(&self) -> Option<&T> {
        self.parsed
            .get_or_init(|| self.text.get().and_then(|text| T::parse(text)))
            .as_ref()
    }

    /// Returns a mutable parsed value, unless the text is invalid.
    ///
    /// Invalidates cached strings.
    pub fn parsed_mut(&mut self) -> Option<&mut T> {
        if self.parsed().is_some() {
            self.text = OnceCell::new();
            self.minified = OnceCell::new();
        }

        self.parsed.get_mut().and_then(|v| v.as_mut())
    }

    /// Replaces the text with its minified form.
    pub fn minify(&mut self) {
        let minified = self.minified().to_string();
        self.text = OnceCell::from(minified);
    }

    fn text(&self) -> &str {
        self.text.get_or_init(|| self.minified().to_string())
    }

    fn minified(&self) -> &str {
        self.minified.get_or_init(|| {
            let original = self.text.get().map(|s| s.trim());
            match (self.parsed(), original) {
                (Some(v), Some(original)) => {
                    let written = v.write();
                    // Never make a value longer.
                    if written.len() <= original.len() {
                        written
                    } else {
                        original.to_string()
                    }
                }
                (Some(v), None) => v.write(),
                (None, Some(original)) => original.to_string(),
                (None, None) => String::new(),
            }
        })
    }
}

impl<T: Syntax> Value for Cached<T> {
    #[inline]
    fn as_str(&self) -> &str {
        self.text()
    }

    #[inline]
    fn to_minified(&self) -> &str {
        self.minified()
    }
}

/// A value that is never parsed.
#[derive(Clone, PartialEq, Debug)]
pub struct Generic(String);

impl Generic {
    /// Creates a new value.
    pub fn new(text: &str) -> Self {
        Generic(text.to_string())
    }
}

impl Value for Generic {
    #[inline]
    fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    fn to_minified(&self) -> &str {
        self.0.trim()
    }
}

/// An attribute or CSS property value.
#[derive(Clone, Debug)]
#[allow(missing_docs)]
pub enum AttributeValue {
    Generic(Generic),
    Paint(Cached<Paint>),
    Length(Cached<Length>),
    LengthPercentage(Cached<Length>),
    Number(Cached<Number>),
    Percentage(Cached<Percentage>),
    PathData(Cached<PathData>),
    ClassList(Cached<ClassList>),
    Style(Cached<Declarations>),
    Transform(Cached<TransformList>),
    Url(Cached<UrlRef>),
    Opacity(Cached<Fraction>),
    StopOffset(Cached<Fraction>),
}

impl AttributeValue {
    /// Creates a value for an SVG attribute of an element.
    pub fn from_attribute(element: &str, name: &str, text: &str) -> Self {
        match name {
            "offset" if element == "stop" => AttributeValue::StopOffset(Cached::new(text)),
            "class" => AttributeValue::ClassList(Cached::new(text)),
            "style" => AttributeValue::Style(Cached::new(text)),
            "href" => AttributeValue::Url(Cached::new(text)),
            "stroke-miterlimit" | "pathLength" => AttributeValue::Number(Cached::new(text)),
            "startOffset" => AttributeValue::Percentage(Cached::new(text)),
            "gradientTransform" | "patternTransform" => {
                AttributeValue::Transform(Cached::new(text))
            }
            "d" if element == "path" || element == "glyph" || element == "missing-glyph" => {
                AttributeValue::PathData(Cached::new(text))
            }
            "d" => AttributeValue::Generic(Generic::new(text)),
            "x" | "y" | "width" | "height" | "cx" | "cy" | "r" | "rx" | "ry" | "x1" | "y1"
            | "x2" | "y2" | "fx" | "fy" | "fr" => {
                AttributeValue::LengthPercentage(Cached::new(text))
            }
            // `dx` and `dy` of text elements are lists.
            "dx" | "dy" if !crate::names::is_text_content(element) => {
                AttributeValue::LengthPercentage(Cached::new(text))
            }
            _ => Self::from_property(name, text),
        }
    }

    /// Creates a value for a CSS property.
    pub fn from_property(name: &str, text: &str) -> Self {
        match name {
            "fill" | "stroke" | "stop-color" | "flood-color" | "lighting-color" | "color" => {
                AttributeValue::Paint(Cached::new(text))
            }
            "letter-spacing" | "word-spacing" | "font-size" => {
                AttributeValue::Length(Cached::new(text))
            }
            "stroke-width" | "stroke-dashoffset" => {
                AttributeValue::LengthPercentage(Cached::new(text))
            }
            "stroke-miterlimit" => AttributeValue::Number(Cached::new(text)),
            "transform" => AttributeValue::Transform(Cached::new(text)),
            "clip-path" | "mask" | "marker-start" | "marker-mid" | "marker-end" => {
                AttributeValue::Url(Cached::new(text))
            }
            "opacity" | "fill-opacity" | "stroke-opacity" | "flood-opacity" | "stop-opacity" => {
                AttributeValue::Opacity(Cached::new(text))
            }
            _ => AttributeValue::Generic(Generic::new(text)),
        }
    }

    fn as_value(&self) -> &dyn Value {
        match self {
            AttributeValue::Generic(ref v) => v,
            AttributeValue::Paint(ref v) => v,
            AttributeValue::Length(ref v) => v,
            AttributeValue::LengthPercentage(ref v) => v,
            AttributeValue::Number(ref v) => v,
            AttributeValue::Percentage(ref v) => v,
            AttributeValue::PathData(ref v) => v,
            AttributeValue::ClassList(ref v) => v,
            AttributeValue::Style(ref v) => v,
            AttributeValue::Transform(ref v) => v,
            AttributeValue::Url(ref v) => v,
            AttributeValue::Opacity(ref v) => v,
            AttributeValue::StopOffset(ref v) => v,
        }
    }

    /// Replaces the canonical text with the minified one.
    pub fn minify(&mut self) {
        match self {
            AttributeValue::Generic(ref mut v) => {
                let trimmed = v.0.trim();
                if trimmed.len() != v.0.len() {
                    v.0 = trimmed.to_string();
                }
            }
            AttributeValue::Paint(ref mut v) => v.minify(),
            AttributeValue::Length(ref mut v) => v.minify(),
            AttributeValue::LengthPercentage(ref mut v) => v.minify(),
            AttributeValue::Number(ref mut v) => v.minify(),
            AttributeValue::Percentage(ref mut v) => v.minify(),
            AttributeValue::PathData(ref mut v) => v.minify(),
            AttributeValue::ClassList(ref mut v) => v.minify(),
            AttributeValue::Style(ref mut v) => v.minify(),
            AttributeValue::Transform(ref mut v) => v.minify(),
            AttributeValue::Url(ref mut v) => v.minify(),
            AttributeValue::Opacity(ref mut v) => v.minify(),
            AttributeValue::StopOffset(ref mut v) => v.minify(),
        }
    }

    /// Returns a parsed paint, if the value is a valid paint.
    pub fn paint(&self) -> Option<&Paint> {
        match self {
            AttributeValue::Paint(ref v) => v.parsed(),
            _ => None,
        }
    }

    /// Returns parsed style declarations, if the value is a style attribute.
    pub fn declarations(&self) -> Option<&Declarations> {
        match self {
            AttributeValue::Style(ref v) => v.parsed(),
            _ => None,
        }
    }

    /// Returns mutable style declarations, if the value is a style attribute.
    pub fn declarations_mut(&mut self) -> Option<&mut Declarations> {
        match self {
            AttributeValue::Style(ref mut v) => v.parsed_mut(),
            _ => None,
        }
    }

    /// Returns a parsed class list, if the value is a class attribute.
    pub fn class_list_mut(&mut self) -> Option<&mut ClassList> {
        match self {
            AttributeValue::ClassList(ref mut v) => v.parsed_mut(),
            _ => None,
        }
    }

    /// Returns a parsed URL reference, if the value is a valid one.
    pub fn url(&self) -> Option<&UrlRef> {
        match self {
            AttributeValue::Url(ref v) => v.parsed(),
            _ => None,
        }
    }

    /// Returns a mutable URL reference, if the value is a valid one.
    pub fn url_mut(&mut self) -> Option<&mut UrlRef> {
        match self {
            AttributeValue::Url(ref mut v) => v.parsed_mut(),
            _ => None,
        }
    }

    /// Returns an id referenced by the value.
    ///
    /// Handles `url(#id)` in any value, `#id` in `href` and paint fallbacks.
    pub fn referenced_id(&self) -> Option<&str> {
        match self {
            AttributeValue::Url(ref v) => v.parsed().and_then(|u| u.id()),
            AttributeValue::Paint(ref v) => match v.parsed() {
                Some(Paint::Url { ref id, .. }) => Some(id.as_str()),
                _ => None,
            },
            _ => url::find_func_iri(self.as_str()),
        }
    }
}

impl Value for AttributeValue {
    #[inline]
    fn as_str(&self) -> &str {
        self.as_value().as_str()
    }

    #[inline]
    fn to_minified(&self) -> &str {
        self.as_value().to_minified()
    }
}

impl PartialEq for AttributeValue {
    /// Values are equal when their minified forms are equal.
    fn eq(&self, other: &Self) -> bool {
        self.to_minified() == other.to_minified()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
