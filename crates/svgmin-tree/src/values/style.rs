// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{AttributeValue, Syntax, Value};

/// A single CSS declaration value.
#[derive(Clone, PartialEq, Debug)]
pub struct StyleDeclaration {
    /// The value, without `!important`.
    pub value: String,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

/// An ordered CSS declaration block with unique property names.
///
/// Used by the `style` attribute and by stylesheet rules.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Declarations(Vec<(String, StyleDeclaration)>);

impl Declarations {
    /// Parses a declaration block, like the content of a `style` attribute.
    ///
    /// Invalid declarations are skipped, like a browser would do.
    pub fn parse_block(text: &str) -> Self {
        let mut block = Declarations::default();
        for declaration in simplecss::DeclarationTokenizer::from(text) {
            block.cascade(declaration.name, declaration.value, declaration.important);
        }
        block
    }

    /// Adds a declaration following the cascade rules of a single block:
    /// a later declaration wins, unless the earlier one is important
    /// and the later one is not.
    pub fn cascade(&mut self, name: &str, value: &str, important: bool) {
        if let Some((_, prev)) = self.0.iter_mut().find(|(n, _)| n == name) {
            if prev.important && !important {
                return;
            }

            prev.value = value.to_string();
            prev.important = important;
            return;
        }

        self.0.push((
            name.to_string(),
            StyleDeclaration {
                value: value.to_string(),
                important,
            },
        ));
    }

    /// Sets a declaration unconditionally.
    pub fn insert(&mut self, name: &str, value: &str, important: bool) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, prev)) => {
                prev.value = value.to_string();
                prev.important = important;
            }
            None => self.0.push((
                name.to_string(),
                StyleDeclaration {
                    value: value.to_string(),
                    important,
                },
            )),
        }
    }

    /// Returns a declaration.
    pub fn get(&self, name: &str) -> Option<&StyleDeclaration> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Returns a mutable declaration.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut StyleDeclaration> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Removes a declaration.
    pub fn remove(&mut self, name: &str) -> Option<StyleDeclaration> {
        let idx = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(idx).1)
    }

    /// Keeps only declarations for which `f` returns `true`.
    pub fn retain<F: FnMut(&str, &StyleDeclaration) -> bool>(&mut self, mut f: F) {
        self.0.retain(|(n, d)| f(n, d));
    }

    /// Returns an iterator over declarations.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleDeclaration)> {
        self.0.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Returns a mutable iterator over declarations.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut StyleDeclaration)> {
        self.0.iter_mut().map(|(n, d)| (n.as_str(), d))
    }

    /// Returns the number of declarations.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that the block has no declarations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Minifies every value through the typed value model.
    pub fn minify_values(&mut self) {
        for (name, decl) in &mut self.0 {
            let value = AttributeValue::from_property(name, &decl.value);
            let minified = value.to_minified();
            if minified != decl.value {
                decl.value = minified.to_string();
            }
        }
    }

    /// Writes declarations as `p:v;q:w!important`.
    pub fn write_block(&self, s: &mut String) {
        for (i, (name, decl)) in self.0.iter().enumerate() {
            if i != 0 {
                s.push(';');
            }

            s.push_str(name);
            s.push(':');
            s.push_str(decl.value.trim());
            if decl.important {
                s.push_str("!important");
            }
        }
    }
}

impl Syntax for Declarations {
    fn parse(text: &str) -> Option<Self> {
        Some(Declarations::parse_block(text))
    }

    fn write(&self) -> String {
        let mut block = self.clone();
        block.minify_values();
        let mut s = String::new();
        block.write_block(&mut s);
        s
    }
}
