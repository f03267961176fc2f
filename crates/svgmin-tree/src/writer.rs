// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::names;
use crate::{Document, Element, NodeId, NodeKind, Value};

/// A line ending style.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Eol {
    /// `\n`
    Lf,
    /// `\r\n`
    Crlf,
}

impl Eol {
    fn as_str(&self) -> &'static str {
        match self {
            Eol::Lf => "\n",
            Eol::Crlf => "\r\n",
        }
    }
}

impl std::str::FromStr for Eol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lf" => Ok(Eol::Lf),
            "crlf" => Ok(Eol::Crlf),
            _ => Err(format!("invalid end of line: '{}'", s)),
        }
    }
}

/// XML writing options.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Put each node on its own line.
    ///
    /// Elements with text children are always written on a single line,
    /// since whitespace inside them is significant.
    ///
    /// Default: false
    pub pretty: bool,

    /// Indentation width in spaces. Used only with `pretty`.
    ///
    /// Default: 4
    pub indent: usize,

    /// Line ending.
    ///
    /// Default: `Eol::Lf`
    pub eol: Eol,

    /// Append a line ending to the output.
    ///
    /// Default: false
    pub final_newline: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 4,
            eol: Eol::Lf,
            final_newline: false,
        }
    }
}

struct XmlWriter<'a> {
    buf: String,
    opt: &'a WriteOptions,
}

impl XmlWriter<'_> {
    fn new_line(&mut self, depth: usize) {
        if !self.opt.pretty {
            return;
        }

        if !self.buf.is_empty() {
            self.buf.push_str(self.opt.eol.as_str());
        }

        for _ in 0..depth * self.opt.indent {
            self.buf.push(' ');
        }
    }

    fn write_attribute(&mut self, name: &str, value: &str) {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        for c in value.chars() {
            match c {
                '&' => self.buf.push_str("&amp;"),
                '<' => self.buf.push_str("&lt;"),
                '"' => self.buf.push_str("&quot;"),
                _ => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }

    fn write_text(&mut self, text: &str, raw: bool) {
        if raw {
            if !text.contains(|c: char| c == '<' || c == '&') {
                self.buf.push_str(text);
                return;
            }

            if !text.contains("]]>") {
                self.buf.push_str("<![CDATA[");
                self.buf.push_str(text);
                self.buf.push_str("]]>");
                return;
            }
        }

        for c in text.chars() {
            match c {
                '&' => self.buf.push_str("&amp;"),
                '<' => self.buf.push_str("&lt;"),
                '>' => self.buf.push_str("&gt;"),
                _ => self.buf.push(c),
            }
        }
    }

    fn write_element_attributes(&mut self, e: &Element) {
        if let Some(xmlns) = e.attribute("xmlns") {
            self.write_attribute("xmlns", xmlns.as_str());
        }

        for attr in e.foreign.iter().filter(|a| a.is_namespace_declaration()) {
            self.write_attribute(&attr.qualified_name(), &attr.value);
        }

        for attr in e.attributes.iter().filter(|a| a.name != "xmlns") {
            self.write_attribute(&attr.name, attr.value.as_str());
        }

        for attr in e.foreign.iter().filter(|a| !a.is_namespace_declaration()) {
            self.write_attribute(&attr.qualified_name(), &attr.value);
        }
    }
}

pub(crate) fn convert(doc: &Document, opt: &WriteOptions) -> String {
    let mut xml = XmlWriter {
        buf: String::new(),
        opt,
    };

    for child in doc.children(doc.root()) {
        write_node(doc, *child, 0, false, false, &mut xml);
    }

    if opt.final_newline && !xml.buf.is_empty() {
        xml.buf.push_str(opt.eol.as_str());
    }

    xml.buf
}

fn write_node(
    doc: &Document,
    id: NodeId,
    depth: usize,
    inline: bool,
    raw_text: bool,
    xml: &mut XmlWriter,
) {
    if !inline {
        xml.new_line(depth);
    }

    match doc.kind(id) {
        NodeKind::Root => {}
        NodeKind::Doctype(ref text) => {
            xml.buf.push_str("<!DOCTYPE ");
            xml.buf.push_str(text);
            xml.buf.push('>');
        }
        NodeKind::Instruction {
            ref name,
            ref value,
        } => {
            xml.buf.push_str("<?");
            xml.buf.push_str(name);
            if !value.is_empty() {
                xml.buf.push(' ');
                xml.buf.push_str(value);
            }
            xml.buf.push_str("?>");
        }
        NodeKind::Comment(ref text) => {
            xml.buf.push_str("<!--");
            xml.buf.push_str(text);
            xml.buf.push_str("-->");
        }
        NodeKind::Text(ref text) => xml.write_text(text, raw_text),
        NodeKind::Element(ref e) => {
            let name = e.qualified_name();
            xml.buf.push('<');
            xml.buf.push_str(&name);
            xml.write_element_attributes(e);

            let children = doc.children(id);
            if children.is_empty() {
                xml.buf.push_str("/>");
                return;
            }

            xml.buf.push('>');

            let has_text = children
                .iter()
                .any(|c| matches!(doc.kind(*c), NodeKind::Text(_)));
            let inline = inline || has_text;
            let raw = e.is_svg() && names::has_raw_text(&e.name);
            for child in children {
                write_node(doc, *child, depth + 1, inline, raw, xml);
            }

            if !inline {
                xml.new_line(depth);
            }

            xml.buf.push_str("</");
            xml.buf.push_str(&name);
            xml.buf.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Document, Eol, WriteOptions};

    fn roundtrip(text: &str, opt: &WriteOptions) -> String {
        Document::parse(text).unwrap().to_string(opt)
    }

    #[test]
    fn minified() {
        let text = "<svg xmlns=\"http://www.w3.org/2000/svg\">\n    <g>\n        <rect/>\n    </g>\n</svg>";
        assert_eq!(
            roundtrip(text, &WriteOptions::default()),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><g><rect/></g></svg>"
        );
    }

    #[test]
    fn pretty() {
        let opt = WriteOptions {
            pretty: true,
            indent: 2,
            eol: Eol::Crlf,
            final_newline: true,
        };
        let text = "<svg><g><rect/></g><text>a <tspan>b</tspan></text></svg>";
        assert_eq!(
            roundtrip(text, &opt),
            "<svg>\r\n  <g>\r\n    <rect/>\r\n  </g>\r\n  <text>a <tspan>b</tspan></text>\r\n</svg>\r\n"
        );
    }

    #[test]
    fn style_as_cdata() {
        let text = "<svg><style><![CDATA[a > b {fill:red}]]></style><style>a &amp;</style></svg>";
        assert_eq!(
            roundtrip(text, &WriteOptions::default()),
            "<svg><style>a > b {fill:red}</style><style><![CDATA[a &]]></style></svg>"
        );
    }

    #[test]
    fn escaping() {
        let text = "<svg><text data-a=\"&quot;&lt;&amp;\">&lt;&amp;</text></svg>";
        assert_eq!(
            roundtrip(text, &WriteOptions::default()),
            "<svg><text data-a=\"&quot;&lt;&amp;\">&lt;&amp;</text></svg>"
        );
    }

    #[test]
    fn prologue() {
        let text = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE svg>\n<!--c-->\n<svg/>";
        assert_eq!(
            roundtrip(text, &WriteOptions::default()),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><!DOCTYPE svg><!--c--><svg/>"
        );
    }
}
