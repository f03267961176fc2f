// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::Declarations;

use crate::selector::{Selector, Specificity};
use crate::stream::{strip_comments, Stream};
use crate::CssError;

/// A style rule with a single selector.
#[derive(Clone, PartialEq, Debug)]
pub struct Rule {
    /// The selector.
    pub selector: Selector,
    /// Cached selector specificity.
    pub specificity: Specificity,
    /// Declarations.
    pub declarations: Declarations,
    /// The rule is inside a media query or a `<style media="...">`.
    pub in_media: bool,
    /// The selector has pseudo-classes or pseudo-elements.
    pub has_pseudos: bool,
}

impl Rule {
    fn new(selector: Selector, declarations: Declarations, in_media: bool) -> Self {
        Rule {
            specificity: selector.specificity(),
            has_pseudos: selector.has_pseudos(),
            selector,
            declarations,
            in_media,
        }
    }

    /// Checks that the rule depends on the rendering context,
    /// so its values cannot be used for static analysis.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.in_media || self.has_pseudos
    }
}

/// A group of rules sharing the same media.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct RuleSet {
    /// Normalized media query. `None` for all media.
    pub media: Option<String>,
    /// The set comes from an `@media` block.
    pub is_at_rule: bool,
    /// Rules in source order.
    pub rules: Vec<Rule>,
    /// `@font-face` blocks, kept verbatim.
    pub font_faces: Vec<String>,
}

impl RuleSet {
    fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.font_faces.is_empty()
    }
}

fn normalize_media(media: Option<&str>) -> Option<String> {
    let media = media?.trim();
    if media.is_empty() || media == "all" {
        None
    } else {
        Some(media.to_string())
    }
}

/// Parses a stylesheet.
///
/// `media` is the `media` attribute of the `<style>` element.
pub fn parse_stylesheet(text: &str, media: Option<&str>) -> Result<Vec<RuleSet>, CssError> {
    let text = strip_comments(text);
    let media = normalize_media(media);

    let mut sets = Vec::new();
    let mut current = RuleSet {
        media: media.clone(),
        ..RuleSet::default()
    };

    let mut s = Stream::from(text.as_str());
    loop {
        s.skip_spaces();
        if s.at_end() {
            break;
        }

        match s.curr_byte_unchecked() {
            b'@' => {
                s.advance(1);
                let name = s.consume_ident().to_ascii_lowercase();
                match name.as_str() {
                    "media" => {
                        if media.is_some() {
                            return Err(CssError::Nesting);
                        }

                        let prelude = s.consume_balanced(b'{')?;
                        s.advance(1);
                        let block = consume_block(&mut s)?;

                        let mut set = RuleSet {
                            media: normalize_media(Some(prelude)),
                            is_at_rule: true,
                            ..RuleSet::default()
                        };
                        let in_media = set.media.is_some();
                        parse_rules(block, in_media, &mut set.rules)?;

                        if !current.is_empty() {
                            sets.push(std::mem::replace(
                                &mut current,
                                RuleSet {
                                    media: media.clone(),
                                    ..RuleSet::default()
                                },
                            ));
                        }
                        sets.push(set);
                    }
                    "font-face" => {
                        s.consume_balanced(b'{')?;
                        s.advance(1);
                        let block = consume_block(&mut s)?;
                        current.font_faces.push(format!("@font-face{{{}}}", block.trim()));
                    }
                    "charset" => {
                        s.consume_balanced(b';')?;
                        s.advance(1);
                    }
                    _ => return Err(CssError::UnsupportedAtRule(name)),
                }
            }
            b'}' => return Err(CssError::UnbalancedBlock),
            _ => parse_rule(&mut s, media.is_some(), &mut current.rules)?,
        }
    }

    if !current.is_empty() {
        sets.push(current);
    }

    Ok(sets)
}

/// Consumes a block content after `{` and the closing `}`.
fn consume_block<'a>(s: &mut Stream<'a>) -> Result<&'a str, CssError> {
    let start = s.pos();
    let mut depth = 0;
    while !s.at_end() {
        let c = s.curr_byte_unchecked();
        if c == b'"' || c == b'\'' {
            s.consume_quoted()?;
            continue;
        }

        match c {
            b'{' => depth += 1,
            b'}' if depth == 0 => {
                let block = s.slice_from(start);
                s.advance(1);
                return Ok(block);
            }
            b'}' => depth -= 1,
            _ => {}
        }

        s.advance(1);
    }

    Err(CssError::UnexpectedEndOfStream)
}

fn parse_rules(text: &str, in_media: bool, rules: &mut Vec<Rule>) -> Result<(), CssError> {
    let mut s = Stream::from(text);
    loop {
        s.skip_spaces();
        if s.at_end() {
            return Ok(());
        }

        match s.curr_byte_unchecked() {
            b'@' => return Err(CssError::Nesting),
            b'}' => return Err(CssError::UnbalancedBlock),
            _ => parse_rule(&mut s, in_media, rules)?,
        }
    }
}

fn parse_rule(s: &mut Stream, in_media: bool, rules: &mut Vec<Rule>) -> Result<(), CssError> {
    let prelude = s.consume_balanced(b'{')?;
    if prelude.contains(|c: char| c == ';' || c == '}') {
        return Err(CssError::InvalidSelector(prelude.trim().to_string()));
    }

    s.advance(1);
    let block = consume_block(s)?;
    if block.contains('{') {
        return Err(CssError::Nesting);
    }

    let selectors = Selector::parse_list(prelude)?;
    let declarations = Declarations::parse_block(block);
    for selector in selectors {
        rules.push(Rule::new(selector, declarations.clone(), in_media));
    }

    Ok(())
}

/// Writes rule sets back to CSS.
///
/// Adjacent rules with equal declarations are merged into a selector list.
pub fn write_stylesheet(sets: &[RuleSet]) -> String {
    let mut s = String::new();
    for set in sets {
        if set.is_empty() {
            continue;
        }

        let wrap = set.is_at_rule && set.media.is_some();
        if wrap {
            s.push_str("@media ");
            s.push_str(set.media.as_deref().unwrap_or_default());
            s.push('{');
        }

        for font_face in &set.font_faces {
            s.push_str(font_face);
        }

        let mut i = 0;
        while i < set.rules.len() {
            let rule = &set.rules[i];
            s.push_str(&rule.selector.to_string());

            let mut j = i + 1;
            while j < set.rules.len() && set.rules[j].declarations == rule.declarations {
                s.push(',');
                s.push_str(&set.rules[j].selector.to_string());
                j += 1;
            }

            s.push('{');
            rule.declarations.write_block(&mut s);
            s.push('}');
            i = j;
        }

        if wrap {
            s.push('}');
        }
    }

    s
}
