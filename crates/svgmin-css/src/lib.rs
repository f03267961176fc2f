// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A simplified CSS cascade for SVG documents.

Parses `<style>` elements of an [`svgmin_tree::Document`] into rule sets,
matches selectors against elements and resolves per-element property values
with specificity ordering, `!important`, inheritance and detection of values
that depend on the rendering context, like media queries and pseudo-classes.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod selector;
mod stream;
mod style_data;
mod stylesheet;

pub use selector::{
    AttributeOperator, AttributeSelector, Combinator, PseudoArgs, Selector, SelectorSequence,
    SimpleSelector, Specificity,
};
pub use style_data::{ComputedStyle, Features, MinifyOptions, PropValue, PropsMemo, StyleData};
pub use stylesheet::{parse_stylesheet, write_stylesheet, Rule, RuleSet};

/// List of all errors.
#[derive(Clone, PartialEq, Debug)]
pub enum CssError {
    /// Nested rule blocks, nested media queries and `&` are not supported.
    Nesting,

    /// An at-rule other than `@media` and `@font-face`.
    UnsupportedAtRule(String),

    /// A selector that cannot be parsed.
    InvalidSelector(String),

    /// The stylesheet ended in the middle of a block.
    UnexpectedEndOfStream,

    /// A closing brace without an opening one.
    UnbalancedBlock,

    /// An element id that is used more than once, while the stylesheet
    /// has id selectors.
    DuplicateId(String),

    /// A `<style>` element has child elements.
    InvalidStyleContent,
}

impl std::fmt::Display for CssError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            CssError::Nesting => {
                write!(f, "nested CSS rules are not supported")
            }
            CssError::UnsupportedAtRule(ref name) => {
                write!(f, "unsupported at-rule '@{}'", name)
            }
            CssError::InvalidSelector(ref text) => {
                write!(f, "invalid selector '{}'", text)
            }
            CssError::UnexpectedEndOfStream => {
                write!(f, "unexpected end of stylesheet")
            }
            CssError::UnbalancedBlock => {
                write!(f, "unbalanced braces")
            }
            CssError::DuplicateId(ref id) => {
                write!(f, "duplicated element id '{}'", id)
            }
            CssError::InvalidStyleContent => {
                write!(f, "a style element must contain only text")
            }
        }
    }
}

impl std::error::Error for CssError {}
