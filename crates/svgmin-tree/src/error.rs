// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// A document parsing error.
#[derive(Clone, PartialEq, Debug)]
pub struct ParseError {
    /// The error description.
    pub reason: String,
    /// Source name, like a file path.
    pub source_name: Option<String>,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// The offending source line with a caret under the error column.
    pub snippet: String,
}

impl ParseError {
    pub(crate) fn new(text: &str, source_name: Option<&str>, e: &roxmltree::Error) -> Self {
        let pos = e.pos();
        ParseError {
            reason: e.to_string(),
            source_name: source_name.map(str::to_string),
            line: pos.row,
            column: pos.col,
            snippet: make_snippet(text, pos.row, pos.col),
        }
    }
}

fn make_snippet(text: &str, line: u32, column: u32) -> String {
    let src_line = match text.lines().nth(line.saturating_sub(1) as usize) {
        Some(s) => s,
        None => return String::new(),
    };

    let prefix = format!("{:>4} | ", line);
    let mut snippet = format!("{}{}\n", prefix, src_line);
    let offset = prefix.len() + column.saturating_sub(1) as usize;
    snippet.extend(std::iter::repeat(' ').take(offset));
    snippet.push('^');
    snippet
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "{}:", name)?;
        }

        write!(f, "{}:{}: {}", self.line, self.column, self.reason)?;

        if !self.snippet.is_empty() {
            write!(f, "\n\n{}", self.snippet)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
