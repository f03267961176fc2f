// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::Syntax;

/// A reference to another element.
#[derive(Clone, PartialEq, Debug)]
pub enum UrlRef {
    /// `none`
    None,
    /// `url(#id)`
    FuncIri(String),
    /// `#id`, as used by `href`.
    Iri(String),
}

impl UrlRef {
    /// Returns the referenced id.
    pub fn id(&self) -> Option<&str> {
        match self {
            UrlRef::None => None,
            UrlRef::FuncIri(ref id) | UrlRef::Iri(ref id) => Some(id),
        }
    }

    /// Replaces the referenced id.
    pub fn set_id(&mut self, new_id: &str) {
        match self {
            UrlRef::None => {}
            UrlRef::FuncIri(ref mut id) | UrlRef::Iri(ref mut id) => *id = new_id.to_string(),
        }
    }
}

impl Syntax for UrlRef {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == "none" {
            return Some(UrlRef::None);
        }

        if text.starts_with("url(") {
            return svgtypes::FuncIRI::from_str(text)
                .ok()
                .map(|v| UrlRef::FuncIri(v.0.to_string()));
        }

        // External references are kept as is.
        if text.starts_with('#') {
            return svgtypes::IRI::from_str(text)
                .ok()
                .map(|v| UrlRef::Iri(v.0.to_string()));
        }

        None
    }

    fn write(&self) -> String {
        match self {
            UrlRef::None => "none".to_string(),
            UrlRef::FuncIri(ref id) => format!("url(#{})", id),
            UrlRef::Iri(ref id) => format!("#{}", id),
        }
    }
}

/// Returns byte ranges of all local `url(#id)` ids in an arbitrary value.
fn func_iri_ranges(text: &str) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut offset = 0;
    while let Some(idx) = text[offset..].find("url(") {
        let mut pos = offset + idx + 4;
        offset = pos;

        let bytes = text.as_bytes();
        while pos < bytes.len() && matches!(bytes[pos], b' ' | b'"' | b'\'') {
            pos += 1;
        }

        if bytes.get(pos) != Some(&b'#') {
            continue;
        }

        let start = pos + 1;
        let end = match text[start..]
            .find(|c: char| c == ')' || c == '"' || c == '\'' || c.is_whitespace())
        {
            Some(len) => start + len,
            None => continue,
        };

        if end > start {
            ranges.push(start..end);
        }
        offset = end;
    }

    ranges
}

/// Finds the first local `url(#id)` reference in an arbitrary value.
pub(crate) fn find_func_iri(text: &str) -> Option<&str> {
    func_iri_ranges(text).first().map(|r| &text[r.clone()])
}

/// Returns all local `url(#id)` references in an arbitrary value.
pub fn find_func_iris(text: &str) -> Vec<&str> {
    func_iri_ranges(text)
        .into_iter()
        .map(|r| &text[r])
        .collect()
}

/// Replaces ids of local `url(#id)` references.
///
/// `f` returns a new id or `None` to keep the current one.
/// Returns `None` when nothing was replaced.
pub fn rewrite_func_iris<F: FnMut(&str) -> Option<String>>(text: &str, mut f: F) -> Option<String> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    let mut changed = false;
    for range in func_iri_ranges(text) {
        if let Some(new_id) = f(&text[range.clone()]) {
            result.push_str(&text[last..range.start]);
            result.push_str(&new_id);
            last = range.end;
            changed = true;
        }
    }

    if !changed {
        return None;
    }

    result.push_str(&text[last..]);
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(UrlRef::parse("url(#a)"), Some(UrlRef::FuncIri("a".to_string())));
        assert_eq!(UrlRef::parse("#b"), Some(UrlRef::Iri("b".to_string())));
        assert_eq!(UrlRef::parse("none"), Some(UrlRef::None));
        assert_eq!(UrlRef::parse("img.png#c"), None);
    }

    #[test]
    fn find_in_text() {
        assert_eq!(find_func_iri("url(#f) blur(1px)"), Some("f"));
        assert_eq!(find_func_iri("url('#f')"), Some("f"));
        assert_eq!(find_func_iri("url(img.png)"), None);
        assert_eq!(find_func_iris("url(#a) url(#b)"), ["a", "b"]);
    }

    #[test]
    fn rewrite() {
        let s = rewrite_func_iris("url(#a) url(#b)", |id| {
            if id == "b" {
                Some("c".to_string())
            } else {
                None
            }
        });
        assert_eq!(s.as_deref(), Some("url(#a) url(#c)"));
        assert_eq!(rewrite_func_iris("url(#a)", |_| None), None);
    }
}
