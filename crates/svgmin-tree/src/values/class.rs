// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::Syntax;

/// A `class` attribute value.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Returns an iterator over class names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    /// Checks that the list has a class.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    /// Adds a class, unless already present.
    pub fn add(&mut self, name: &str) {
        if !self.contains(name) {
            self.0.push(name.to_string());
        }
    }

    /// Removes a class.
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|c| c != name);
    }

    /// Renames a class.
    pub fn rename(&mut self, from: &str, to: &str) {
        for c in &mut self.0 {
            if c == from {
                *c = to.to_string();
            }
        }
    }

    /// Keeps only classes for which `f` returns `true`.
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut f: F) {
        self.0.retain(|c| f(c));
    }

    /// Checks that the list has no classes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Syntax for ClassList {
    fn parse(text: &str) -> Option<Self> {
        let mut list = ClassList::default();
        for name in text.split_ascii_whitespace() {
            list.add(name);
        }
        Some(list)
    }

    fn write(&self) -> String {
        self.0.join(" ")
    }
}
