// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use svgmin_tree::Node;

use crate::stream::{ByteExt, Stream};
use crate::CssError;

/// A selector specificity.
///
/// Compared lexicographically: ids, then classes, attributes and pseudo-classes,
/// then types and pseudo-elements.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl std::ops::Add for Specificity {
    type Output = Specificity;

    #[inline]
    fn add(self, rhs: Specificity) -> Specificity {
        Specificity(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// A selector combinator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    Adjacent,
    /// `a ~ b`
    Sibling,
}

impl Combinator {
    fn as_str(&self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::Adjacent => "+",
            Combinator::Sibling => "~",
        }
    }
}

/// An attribute selector operator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttributeOperator {
    /// `[a]`
    Exists,
    /// `[a=b]`
    Equals,
    /// `[a~=b]`
    Includes,
    /// `[a|=b]`
    DashMatch,
    /// `[a^=b]`
    Prefix,
    /// `[a$=b]`
    Suffix,
    /// `[a*=b]`
    Substring,
}

impl AttributeOperator {
    fn as_str(&self) -> &'static str {
        match self {
            AttributeOperator::Exists => "",
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }
}

/// An attribute selector.
#[derive(Clone, PartialEq, Debug)]
pub struct AttributeSelector {
    /// Attribute name.
    pub name: String,
    /// Operator.
    pub operator: AttributeOperator,
    /// Value to compare with. Empty for `Exists`.
    pub value: String,
    /// The `i` flag.
    pub case_insensitive: bool,
}

impl AttributeSelector {
    fn matches(&self, actual: &str) -> bool {
        let (actual, expected) = if self.case_insensitive {
            (actual.to_lowercase(), self.value.to_lowercase())
        } else {
            (actual.to_string(), self.value.clone())
        };

        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => actual == expected,
            AttributeOperator::Includes => actual.split_ascii_whitespace().any(|v| v == expected),
            AttributeOperator::DashMatch => {
                actual == expected || actual.starts_with(&format!("{}-", expected))
            }
            AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
            AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
            AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
        }
    }
}

/// Pseudo-class or pseudo-element arguments.
#[derive(Clone, PartialEq, Debug)]
pub enum PseudoArgs {
    /// No parentheses.
    None,
    /// A selector list, like in `:not(.a, .b)`.
    Selectors(Vec<Selector>),
    /// Anything else, like in `:nth-child(2n+1)`.
    Raw(String),
}

/// A simple selector.
#[derive(Clone, PartialEq, Debug)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// `rect`
    Type(String),
    /// `.name`
    Class(String),
    /// `#id`
    Id(String),
    /// `[name=value]`
    Attribute(AttributeSelector),
    /// `:hover`, `:not(...)`
    PseudoClass {
        /// Pseudo-class name.
        name: String,
        /// Arguments.
        args: PseudoArgs,
    },
    /// `::before`
    PseudoElement {
        /// Pseudo-element name.
        name: String,
        /// Arguments.
        args: PseudoArgs,
    },
}

impl SimpleSelector {
    fn specificity(&self) -> Specificity {
        match self {
            SimpleSelector::Universal => Specificity::default(),
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement { .. } => Specificity(0, 0, 1),
            SimpleSelector::Id(_) => Specificity(1, 0, 0),
            SimpleSelector::Class(_) | SimpleSelector::Attribute(_) => Specificity(0, 1, 0),
            SimpleSelector::PseudoClass { name, args } => match (name.as_str(), args) {
                ("where", _) => Specificity::default(),
                (_, PseudoArgs::Selectors(list)) => list
                    .iter()
                    .map(|s| s.specificity())
                    .max()
                    .unwrap_or_default(),
                _ => Specificity(0, 1, 0),
            },
        }
    }
}

/// A compound selector with a combinator that links it to the previous one.
#[derive(Clone, PartialEq, Debug)]
pub struct SelectorSequence {
    /// A combinator before this sequence.
    ///
    /// `None` for the first sequence, unless the selector is relative,
    /// like the argument of `:has(> a)`.
    pub combinator: Option<Combinator>,
    /// Simple selectors. Never empty.
    pub simple: Vec<SimpleSelector>,
}

/// A complex selector, like `g > .a:hover`.
#[derive(Clone, PartialEq, Debug)]
pub struct Selector {
    sequences: Vec<SelectorSequence>,
    /// A single sequence of type, class and id selectors only.
    is_simple: bool,
}

/// Pseudo-classes that take a selector list.
fn has_selector_args(name: &str) -> bool {
    matches!(name, "not" | "is" | "where" | "has" | "matches")
}

/// Pseudo-elements that can be written with a single colon.
fn is_legacy_pseudo_element(name: &str) -> bool {
    matches!(name, "before" | "after" | "first-line" | "first-letter")
}

impl Selector {
    /// Parses a single complex selector.
    pub fn parse(text: &str) -> Result<Self, CssError> {
        parse_selector(text, false)
    }

    /// Parses a comma-separated selector list.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, CssError> {
        parse_list(text, false)
    }

    /// Returns compound selectors.
    #[inline]
    pub fn sequences(&self) -> &[SelectorSequence] {
        &self.sequences
    }

    /// Calculates the selector specificity.
    pub fn specificity(&self) -> Specificity {
        self.sequences
            .iter()
            .flat_map(|seq| seq.simple.iter())
            .fold(Specificity::default(), |acc, s| acc + s.specificity())
    }

    /// Checks that the selector has pseudo-classes or pseudo-elements.
    pub fn has_pseudos(&self) -> bool {
        self.simple_selectors().any(|s| {
            matches!(
                s,
                SimpleSelector::PseudoClass { .. } | SimpleSelector::PseudoElement { .. }
            )
        })
    }

    /// Checks that the selector has combinators.
    pub fn has_combinators(&self) -> bool {
        self.sequences.len() > 1 || self.sequences.iter().any(|s| s.combinator.is_some())
    }

    /// Checks that the selector consists of a single type, class or id sequence.
    #[inline]
    pub fn is_simple(&self) -> bool {
        self.is_simple
    }

    /// Returns all simple selectors, including ones nested in pseudo-class arguments.
    pub fn simple_selectors(&self) -> impl Iterator<Item = &SimpleSelector> {
        let mut list = Vec::new();
        collect_simple(self, &mut list);
        list.into_iter()
    }

    /// Returns simple selectors of the top level only.
    fn top_level(&self) -> impl Iterator<Item = &SimpleSelector> {
        self.sequences.iter().flat_map(|seq| seq.simple.iter())
    }

    /// Returns class names that an element must have to be matched.
    pub fn required_classes(&self) -> impl Iterator<Item = &str> {
        self.top_level().filter_map(|s| match s {
            SimpleSelector::Class(ref name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Returns ids that an element must have to be matched.
    pub fn required_ids(&self) -> impl Iterator<Item = &str> {
        self.top_level().filter_map(|s| match s {
            SimpleSelector::Id(ref id) => Some(id.as_str()),
            _ => None,
        })
    }

    /// Returns element names that must be present to be matched.
    pub fn required_types(&self) -> impl Iterator<Item = &str> {
        self.top_level().filter_map(|s| match s {
            SimpleSelector::Type(ref name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub(crate) fn visit_simple_mut(&mut self, f: &mut dyn FnMut(&mut SimpleSelector)) {
        for seq in &mut self.sequences {
            for s in &mut seq.simple {
                match s {
                    SimpleSelector::PseudoClass {
                        args: PseudoArgs::Selectors(ref mut list),
                        ..
                    } => {
                        for sel in list {
                            sel.visit_simple_mut(f);
                        }
                    }
                    _ => f(s),
                }
            }
        }
    }

    /// Checks that the selector matches an element.
    ///
    /// Pseudo-classes and pseudo-elements are treated as matching,
    /// since they may apply at some point.
    pub fn matches(&self, node: Node) -> bool {
        if !node.is_element() {
            return false;
        }

        if self.is_simple {
            return compound_matches(&self.sequences[0].simple, node);
        }

        self.matches_at(self.sequences.len() - 1, node)
    }

    fn matches_at(&self, idx: usize, node: Node) -> bool {
        let seq = &self.sequences[idx];
        if !compound_matches(&seq.simple, node) {
            return false;
        }

        if idx == 0 {
            return true;
        }

        match seq.combinator.unwrap_or(Combinator::Descendant) {
            Combinator::Descendant => node
                .ancestors()
                .skip(1)
                .filter(|n| n.is_element())
                .any(|n| self.matches_at(idx - 1, n)),
            Combinator::Child => node
                .parent_element()
                .map_or(false, |n| self.matches_at(idx - 1, n)),
            Combinator::Adjacent => node
                .prev_sibling_element()
                .map_or(false, |n| self.matches_at(idx - 1, n)),
            Combinator::Sibling => {
                let mut curr = node.prev_sibling_element();
                while let Some(n) = curr {
                    if self.matches_at(idx - 1, n) {
                        return true;
                    }
                    curr = n.prev_sibling_element();
                }
                false
            }
        }
    }
}

fn collect_simple<'a>(selector: &'a Selector, list: &mut Vec<&'a SimpleSelector>) {
    for s in selector.top_level() {
        list.push(s);
        if let SimpleSelector::PseudoClass {
            args: PseudoArgs::Selectors(ref nested),
            ..
        } = s
        {
            for sel in nested {
                collect_simple(sel, list);
            }
        }
    }
}

fn compound_matches(simple: &[SimpleSelector], node: Node) -> bool {
    let element = match node.element() {
        Some(e) => e,
        None => return false,
    };

    simple.iter().all(|s| match s {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(ref name) => element.name == *name,
        SimpleSelector::Class(ref name) => element.has_class(name),
        SimpleSelector::Id(ref id) => element.id() == Some(id.as_str()),
        SimpleSelector::Attribute(ref attr) => match element.any_attribute(&attr.name) {
            Some(value) => attr.matches(&value),
            None => false,
        },
        SimpleSelector::PseudoClass { .. } | SimpleSelector::PseudoElement { .. } => true,
    })
}

fn parse_list(text: &str, relative: bool) -> Result<Vec<Selector>, CssError> {
    let mut list = Vec::new();
    let mut s = Stream::from(text);
    loop {
        let start = s.pos();
        let part = match s.consume_balanced(b',') {
            Ok(part) => {
                s.advance(1);
                part
            }
            Err(CssError::UnexpectedEndOfStream) => {
                let part = &text[start..];
                list.push(parse_selector(part, relative)?);
                break;
            }
            Err(e) => return Err(e),
        };

        list.push(parse_selector(part, relative)?);
    }

    Ok(list)
}

fn parse_selector(text: &str, relative: bool) -> Result<Selector, CssError> {
    let invalid = || CssError::InvalidSelector(text.trim().to_string());

    if text.contains('&') {
        return Err(CssError::Nesting);
    }

    let mut s = Stream::from(text);
    s.skip_spaces();

    let mut sequences = Vec::new();
    let mut combinator = None;
    if relative && !s.at_end() && s.curr_byte_unchecked().is_combinator() {
        combinator = Some(parse_combinator(&mut s));
        s.skip_spaces();
    }

    loop {
        let simple = parse_compound(&mut s, text)?;
        if simple.is_empty() {
            return Err(invalid());
        }

        sequences.push(SelectorSequence { combinator, simple });

        let had_spaces = s.skip_spaces();
        if s.at_end() {
            break;
        }

        if s.curr_byte_unchecked().is_combinator() {
            combinator = Some(parse_combinator(&mut s));
            s.skip_spaces();
        } else if had_spaces {
            combinator = Some(Combinator::Descendant);
        } else {
            return Err(invalid());
        }
    }

    let is_simple = sequences.len() == 1
        && sequences[0].combinator.is_none()
        && sequences[0].simple.iter().all(|s| {
            matches!(
                s,
                SimpleSelector::Universal
                    | SimpleSelector::Type(_)
                    | SimpleSelector::Class(_)
                    | SimpleSelector::Id(_)
            )
        });

    Ok(Selector {
        sequences,
        is_simple,
    })
}

fn parse_combinator(s: &mut Stream) -> Combinator {
    let c = s.curr_byte_unchecked();
    s.advance(1);
    match c {
        b'>' => Combinator::Child,
        b'+' => Combinator::Adjacent,
        _ => Combinator::Sibling,
    }
}

fn parse_compound(s: &mut Stream, text: &str) -> Result<Vec<SimpleSelector>, CssError> {
    let invalid = || CssError::InvalidSelector(text.trim().to_string());

    let mut simple = Vec::new();
    while !s.at_end() {
        let c = s.curr_byte_unchecked();
        match c {
            b'*' => {
                s.advance(1);
                simple.push(SimpleSelector::Universal);
            }
            b'.' => {
                s.advance(1);
                let name = s.consume_ident();
                if name.is_empty() {
                    return Err(invalid());
                }
                simple.push(SimpleSelector::Class(unescape(name)));
            }
            b'#' => {
                s.advance(1);
                let name = s.consume_ident();
                if name.is_empty() {
                    return Err(invalid());
                }
                simple.push(SimpleSelector::Id(unescape(name)));
            }
            b'[' => {
                s.advance(1);
                let inner = s.consume_balanced(b']')?;
                s.advance(1);
                simple.push(SimpleSelector::Attribute(
                    parse_attribute(inner).ok_or_else(invalid)?,
                ));
            }
            b':' => {
                s.advance(1);
                let is_element = s.is_curr_byte_eq(b':');
                if is_element {
                    s.advance(1);
                }

                let name = s.consume_ident();
                if name.is_empty() {
                    return Err(invalid());
                }

                let args = if s.is_curr_byte_eq(b'(') {
                    s.advance(1);
                    let inner = s.consume_balanced(b')')?;
                    s.advance(1);
                    if !is_element && has_selector_args(name) {
                        PseudoArgs::Selectors(parse_list(inner, name == "has")?)
                    } else {
                        PseudoArgs::Raw(inner.trim().to_string())
                    }
                } else {
                    PseudoArgs::None
                };

                let name = name.to_string();
                if is_element || is_legacy_pseudo_element(&name) {
                    simple.push(SimpleSelector::PseudoElement { name, args });
                } else {
                    simple.push(SimpleSelector::PseudoClass { name, args });
                }
            }
            _ if c.is_ident_char() || c == b'\\' => {
                // A type selector must go first.
                if !simple.is_empty() {
                    return Err(invalid());
                }
                let name = s.consume_ident();
                simple.push(SimpleSelector::Type(unescape(name)));
            }
            _ if c.is_space() || c.is_combinator() => break,
            _ => return Err(invalid()),
        }
    }

    Ok(simple)
}

fn parse_attribute(text: &str) -> Option<AttributeSelector> {
    let mut s = Stream::from(text);
    s.skip_spaces();
    let name = s.consume_ident();
    if name.is_empty() {
        return None;
    }

    // Namespaced attributes are not supported.
    s.skip_spaces();
    if s.at_end() {
        return Some(AttributeSelector {
            name: unescape(name),
            operator: AttributeOperator::Exists,
            value: String::new(),
            case_insensitive: false,
        });
    }

    let operator = if s.starts_with(b"=") {
        s.advance(1);
        AttributeOperator::Equals
    } else {
        let op = match s.curr_byte_unchecked() {
            b'~' => AttributeOperator::Includes,
            b'|' => AttributeOperator::DashMatch,
            b'^' => AttributeOperator::Prefix,
            b'$' => AttributeOperator::Suffix,
            b'*' => AttributeOperator::Substring,
            _ => return None,
        };
        s.advance(1);
        s.consume_byte(b'=').ok()?;
        op
    };

    s.skip_spaces();
    let value = if s.curr_byte().ok()?.is_quote() {
        s.consume_quoted().ok()?.to_string()
    } else {
        unescape(s.consume_ident())
    };

    s.skip_spaces();
    let mut case_insensitive = false;
    if !s.at_end() {
        match s.consume_ident() {
            "i" | "I" => case_insensitive = true,
            "s" | "S" => {}
            _ => return None,
        }
        s.skip_spaces();
    }

    if !s.at_end() {
        return None;
    }

    Some(AttributeSelector {
        name: unescape(name),
        operator,
        value,
        case_insensitive,
    })
}

fn unescape(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                result.push(next);
            }
        } else {
            result.push(c);
        }
    }

    result
}

fn write_ident(f: &mut fmt::Formatter, ident: &str) -> fmt::Result {
    for (i, c) in ident.chars().enumerate() {
        let is_valid = c.is_ascii_alphabetic()
            || c == '_'
            || c == '-'
            || !c.is_ascii()
            || (i != 0 && c.is_ascii_digit());
        if is_valid {
            write!(f, "{}", c)?;
        } else if c.is_ascii_digit() {
            write!(f, "\\{:x} ", c as u32)?;
        } else {
            write!(f, "\\{}", c)?;
        }
    }

    Ok(())
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimpleSelector::Universal => write!(f, "*"),
            SimpleSelector::Type(ref name) => write_ident(f, name),
            SimpleSelector::Class(ref name) => {
                write!(f, ".")?;
                write_ident(f, name)
            }
            SimpleSelector::Id(ref id) => {
                write!(f, "#")?;
                write_ident(f, id)
            }
            SimpleSelector::Attribute(ref attr) => {
                write!(f, "[")?;
                write_ident(f, &attr.name)?;
                if attr.operator != AttributeOperator::Exists {
                    write!(f, "{}", attr.operator.as_str())?;
                    let is_ident = !attr.value.is_empty()
                        && !attr.value.starts_with(|c: char| c.is_ascii_digit() || c == '-')
                        && attr.value.bytes().all(|c| c.is_ident_char());
                    if is_ident {
                        write!(f, "{}", attr.value)?;
                    } else {
                        write!(f, "\"{}\"", attr.value.replace('"', "\\\""))?;
                    }
                    if attr.case_insensitive {
                        write!(f, " i")?;
                    }
                }
                write!(f, "]")
            }
            SimpleSelector::PseudoClass { ref name, ref args } => {
                write!(f, ":{}", name)?;
                write_args(f, args)
            }
            SimpleSelector::PseudoElement { ref name, ref args } => {
                if is_legacy_pseudo_element(name) {
                    write!(f, ":{}", name)?;
                } else {
                    write!(f, "::{}", name)?;
                }
                write_args(f, args)
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter, args: &PseudoArgs) -> fmt::Result {
    match args {
        PseudoArgs::None => Ok(()),
        PseudoArgs::Raw(ref text) => write!(f, "({})", text),
        PseudoArgs::Selectors(ref list) => {
            write!(f, "(")?;
            for (i, sel) in list.iter().enumerate() {
                if i != 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", sel)?;
            }
            write!(f, ")")
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for seq in &self.sequences {
            if let Some(c) = seq.combinator {
                write!(f, "{}", c.as_str())?;
            }

            for s in &seq.simple {
                write!(f, "{}", s)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgmin_tree::Document;

    macro_rules! test_specificity {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Selector::parse($text).unwrap().specificity(), $result);
            }
        )
    }

    test_specificity!(specificity_type, "rect", Specificity(0, 0, 1));
    test_specificity!(specificity_class, "g .a.b", Specificity(0, 2, 1));
    test_specificity!(specificity_id, "#a > rect[x]", Specificity(1, 1, 1));
    test_specificity!(specificity_not, ":not(#a, .b)", Specificity(1, 0, 0));
    test_specificity!(specificity_where, ":where(#a) rect", Specificity(0, 0, 1));
    test_specificity!(specificity_legacy_before, "a:before", Specificity(0, 0, 2));
    test_specificity!(specificity_hover, "a:hover", Specificity(0, 1, 1));

    macro_rules! test_write {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Selector::parse($text).unwrap().to_string(), $result);
            }
        )
    }

    test_write!(write_combinators, "g   >  rect + circle ~ path  line", "g>rect+circle~path line");
    test_write!(write_attribute, "[ fill = 'red' i ]", "[fill=red i]");
    test_write!(write_attribute_quoted, "[x='1']", "[x=\"1\"]");
    test_write!(write_pseudo, "a:not( .b ,.c )::after", "a:not(.b,.c):after");
    test_write!(write_pseudo_element, "a::marker", "a::marker");

    #[test]
    fn invalid() {
        assert!(Selector::parse("a..b").is_err());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a >").is_err());
        assert!(Selector::parse(".a rect").is_ok());
        assert_eq!(Selector::parse("& .a"), Err(CssError::Nesting));
    }

    #[test]
    fn single_item_list() {
        let list = Selector::parse_list(".a").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].to_string(), ".a");
    }

    #[test]
    fn list() {
        let list = Selector::parse_list(".a, g > rect ,:is(.b,.c)").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[2].to_string(), ":is(.b,.c)");
    }

    #[test]
    fn matching() {
        let doc = Document::parse(
            "<svg><g class='a b'><rect id='r' fill='red'/><circle/></g><rect/></svg>",
        )
        .unwrap();
        let svg = doc.root_element().unwrap();
        let g = doc.children(svg)[0];
        let rect = doc.children(g)[0];
        let circle = doc.children(g)[1];
        let rect2 = doc.children(svg)[1];

        let check = |sel: &str, id| Selector::parse(sel).unwrap().matches(doc.node(id));
        assert!(check("rect", rect));
        assert!(check(".a rect", rect));
        assert!(!check(".a rect", rect2));
        assert!(check("svg > g > #r", rect));
        assert!(check("#r + circle", circle));
        assert!(check("g ~ rect", rect2));
        assert!(!check("g + circle", circle));
        assert!(check("[fill^=r]", rect));
        assert!(check("[class~=b]", g));
        assert!(check("rect:hover", rect));
        assert!(!check(".c", g));
    }
}
