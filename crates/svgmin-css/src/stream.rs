// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::CssError;

pub(crate) trait ByteExt {
    /// Checks if a byte is a space.
    ///
    /// `[ \r\n\t\x0C]`
    fn is_space(&self) -> bool;

    fn is_quote(&self) -> bool;

    /// Checks if a byte can be a part of a CSS identifier.
    fn is_ident_char(&self) -> bool;

    /// Checks if a byte starts a combinator.
    fn is_combinator(&self) -> bool;
}

impl ByteExt for u8 {
    #[inline]
    fn is_space(&self) -> bool {
        matches!(*self, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
    }

    #[inline]
    fn is_quote(&self) -> bool {
        matches!(*self, b'\'' | b'"')
    }

    #[inline]
    fn is_ident_char(&self) -> bool {
        matches!(*self, b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'-' | b'_') || *self >= 0x80
    }

    #[inline]
    fn is_combinator(&self) -> bool {
        matches!(*self, b'>' | b'+' | b'~')
    }
}

/// A streaming text parsing interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> From<&'a str> for Stream<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Stream { text, pos: 0 }
    }
}

impl<'a> Stream<'a> {
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    pub fn curr_byte(&self) -> Result<u8, CssError> {
        if self.at_end() {
            return Err(CssError::UnexpectedEndOfStream);
        }

        Ok(self.curr_byte_unchecked())
    }

    #[inline]
    pub fn curr_byte_unchecked(&self) -> u8 {
        self.text.as_bytes()[self.pos]
    }

    #[inline]
    pub fn is_curr_byte_eq(&self, c: u8) -> bool {
        !self.at_end() && self.curr_byte_unchecked() == c
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.text.len());
        self.pos += n;
    }

    /// Skips whitespaces. Returns `true` if anything was skipped.
    pub fn skip_spaces(&mut self) -> bool {
        let start = self.pos;
        while !self.at_end() && self.curr_byte_unchecked().is_space() {
            self.advance(1);
        }
        self.pos != start
    }

    #[inline]
    pub fn starts_with(&self, text: &[u8]) -> bool {
        self.text.as_bytes()[self.pos..].starts_with(text)
    }

    pub fn consume_byte(&mut self, c: u8) -> Result<(), CssError> {
        if self.curr_byte()? != c {
            return Err(CssError::InvalidSelector(self.text.to_string()));
        }

        self.advance(1);
        Ok(())
    }

    /// Consumes an identifier, which may be escaped with a backslash.
    pub fn consume_ident(&mut self) -> &'a str {
        let start = self.pos;
        while !self.at_end() {
            let c = self.curr_byte_unchecked();
            if c == b'\\' && self.pos + 1 < self.text.len() {
                self.advance(1);
                // Skip a whole UTF-8 char.
                let len = self.text[self.pos..].chars().next().map_or(1, char::len_utf8);
                self.advance(len);
            } else if c.is_ident_char() {
                self.advance(1);
            } else {
                break;
            }
        }

        &self.text[start..self.pos]
    }

    /// Consumes a quoted string and returns its content.
    pub fn consume_quoted(&mut self) -> Result<&'a str, CssError> {
        let quote = self.curr_byte()?;
        self.advance(1);
        let start = self.pos;
        while !self.at_end() {
            let c = self.curr_byte_unchecked();
            if c == b'\\' {
                self.advance(1);
            } else if c == quote {
                let content = &self.text[start..self.pos];
                self.advance(1);
                return Ok(content);
            }

            if !self.at_end() {
                self.advance(1);
            }
        }

        Err(CssError::UnexpectedEndOfStream)
    }

    /// Consumes text until an unmatched `end` byte, skipping nested
    /// parentheses and quoted strings. The `end` byte itself is not consumed.
    pub fn consume_balanced(&mut self, end: u8) -> Result<&'a str, CssError> {
        let start = self.pos;
        let mut depth = 0;
        while !self.at_end() {
            let c = self.curr_byte_unchecked();
            if c.is_quote() {
                self.consume_quoted()?;
                continue;
            }

            match c {
                b'(' | b'[' => depth += 1,
                b')' | b']' if depth > 0 => depth -= 1,
                _ if c == end && depth == 0 => return Ok(&self.text[start..self.pos]),
                _ => {}
            }

            self.advance(1);
        }

        Err(CssError::UnexpectedEndOfStream)
    }

    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.text[start..self.pos]
    }
}

/// Removes `/* */` comments and `<!--`/`-->` markers outside of strings.
pub(crate) fn strip_comments(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut quote = None;
    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            result.push(c);
            if c == '\\' {
                if let Some((_, next)) = chars.next() {
                    result.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        let rest = &text[i..];
        if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map(|p| i + 2 + p + 2).unwrap_or(text.len());
            while chars.peek().map_or(false, |(j, _)| *j < end) {
                chars.next();
            }
            continue;
        }

        if rest.starts_with("<!--") || rest.starts_with("-->") {
            let len = if rest.starts_with("<!--") { 4 } else { 3 };
            for _ in 1..len {
                chars.next();
            }
            continue;
        }

        if c == '"' || c == '\'' {
            quote = Some(c);
        }

        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments() {
        assert_eq!(strip_comments("a/* x */{b:c}"), "a{b:c}");
        assert_eq!(strip_comments("a{content:'/* x */'}"), "a{content:'/* x */'}");
        assert_eq!(strip_comments("<!-- a{} -->"), " a{} ");
        assert_eq!(strip_comments("a{}/* open"), "a{}");
    }

    #[test]
    fn balanced() {
        let mut s = Stream::from("a(b)c]d)e");
        assert_eq!(s.consume_balanced(b')').unwrap(), "a(b)c]d");
    }
}
