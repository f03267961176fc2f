// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::names;
use crate::{
    Document, Element, ForeignAttribute, NodeId, NodeKind, ParseError, SVG_NS, XMLNS_NS, XML_NS,
};

impl Document {
    /// Parses a document from a string.
    pub fn parse(text: &str) -> Result<Document, ParseError> {
        parse(text, None)
    }

    /// Parses a document from a string, using `name` in error messages.
    pub fn parse_with_name(text: &str, name: &str) -> Result<Document, ParseError> {
        parse(text, Some(name))
    }
}

fn parse(text: &str, source_name: Option<&str>) -> Result<Document, ParseError> {
    let opt = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };

    let xml = roxmltree::Document::parse_with_options(text, opt)
        .map_err(|e| ParseError::new(text, source_name, &e))?;

    let mut doc = Document::new();
    let root_id = doc.root();

    // The tokenizer doesn't expose the XML declaration and the DOCTYPE,
    // so they are recovered from the source text.
    let mut prologue: Vec<(usize, NodeKind)> = Vec::new();
    let body_start = xml.root_element().range().start;
    if let Some(decl) = parse_xml_declaration(text) {
        prologue.push((0, decl));
    }

    if let Some((pos, doctype)) = find_doctype(&text[..body_start]) {
        prologue.push((pos, NodeKind::Doctype(doctype)));
    }

    let mut children: Vec<(usize, Option<NodeKind>, Option<roxmltree::Node>)> = prologue
        .into_iter()
        .map(|(pos, kind)| (pos, Some(kind), None))
        .collect();
    for node in xml.root().children() {
        children.push((node.range().start, None, Some(node)));
    }
    children.sort_by_key(|c| c.0);

    for (_, kind, node) in children {
        if let Some(kind) = kind {
            doc.append(root_id, kind);
        } else if let Some(node) = node {
            parse_xml_node(node, root_id, false, &mut doc);
        }
    }

    Ok(doc)
}

fn parse_xml_declaration(text: &str) -> Option<NodeKind> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix("<?xml")?;
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }

    let end = rest.find("?>")?;
    Some(NodeKind::Instruction {
        name: "xml".to_string(),
        value: rest[..end].trim().to_string(),
    })
}

/// Returns the DOCTYPE position and its content without delimiters.
fn find_doctype(text: &str) -> Option<(usize, String)> {
    let start = text.find("<!DOCTYPE")?;
    let content_start = start + "<!DOCTYPE".len();

    let mut depth = 0;
    let mut quote = None;
    for (i, c) in text[content_start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth -= 1,
            (None, '>') if depth == 0 => {
                let content = &text[content_start..content_start + i];
                return Some((start, content.trim().to_string()));
            }
            _ => {}
        }
    }

    None
}

fn parse_xml_node(node: roxmltree::Node, parent_id: NodeId, preserve: bool, doc: &mut Document) {
    match node.node_type() {
        roxmltree::NodeType::Element => parse_xml_element(node, parent_id, preserve, doc),
        roxmltree::NodeType::Text => {
            let text = node.text().unwrap_or("");
            if preserve || !text.trim().is_empty() {
                doc.append(parent_id, NodeKind::Text(text.to_string()));
            }
        }
        roxmltree::NodeType::Comment => {
            let text = node.text().unwrap_or("");
            doc.append(parent_id, NodeKind::Comment(text.to_string()));
        }
        roxmltree::NodeType::PI => {
            if let Some(pi) = node.pi() {
                doc.append(
                    parent_id,
                    NodeKind::Instruction {
                        name: pi.target.to_string(),
                        value: pi.value.unwrap_or("").to_string(),
                    },
                );
            }
        }
        roxmltree::NodeType::Root => {}
    }
}

fn parse_xml_element(node: roxmltree::Node, parent_id: NodeId, preserve: bool, doc: &mut Document) {
    let tag = node.tag_name();
    let mut element = Element::new(tag.name());
    match tag.namespace() {
        None | Some(SVG_NS) => {}
        Some(uri) => element.uri = Some(uri.to_string()),
    }
    element.prefix = tag
        .namespace()
        .and_then(|uri| node.lookup_prefix(uri))
        .map(str::to_string);

    // Namespace declarations go first, like in most documents.
    let parent_namespaces: Vec<_> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    for ns in node.namespaces() {
        if ns.uri() == XML_NS || parent_namespaces.contains(&(ns.name(), ns.uri())) {
            continue;
        }

        match ns.name() {
            None => element.set_attribute("xmlns", ns.uri()),
            Some(name) => element.foreign.push(ForeignAttribute {
                prefix: Some("xmlns".to_string()),
                local: name.to_string(),
                uri: Some(XMLNS_NS.to_string()),
                value: ns.uri().to_string(),
            }),
        }
    }

    let mut preserve = preserve || names::preserves_whitespace(tag.name());
    for attr in node.attributes() {
        match attr.namespace() {
            None => element.set_attribute(attr.name(), attr.value()),
            Some(uri) => {
                let prefix = if uri == XML_NS {
                    Some("xml")
                } else {
                    node.lookup_prefix(uri)
                };

                if uri == XML_NS && attr.name() == "space" {
                    preserve = attr.value() == "preserve";
                }

                element.foreign.push(ForeignAttribute {
                    prefix: prefix.map(str::to_string),
                    local: attr.name().to_string(),
                    uri: Some(uri.to_string()),
                    value: attr.value().to_string(),
                });
            }
        }
    }

    let id = doc.append(parent_id, NodeKind::Element(element));
    for child in node.children() {
        parse_xml_node(child, id, preserve, doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;

    #[test]
    fn doctype_position() {
        let text = "<?xml version=\"1.0\"?>\n<!-- c -->\n<!DOCTYPE svg [<!ENTITY a \"b>\">]>\n<svg/>";
        let (pos, doctype) = find_doctype(text).unwrap();
        assert_eq!(&text[pos..pos + 9], "<!DOCTYPE");
        assert_eq!(doctype, "svg [<!ENTITY a \"b>\">]");
    }

    #[test]
    fn prologue_order() {
        let text = "<?xml version=\"1.0\"?><!-- c --><!DOCTYPE svg><svg xmlns=\"http://www.w3.org/2000/svg\"/>";
        let doc = Document::parse(text).unwrap();
        let kinds: Vec<_> = doc
            .children(doc.root())
            .iter()
            .map(|id| doc.node_type(*id))
            .collect();
        assert_eq!(
            kinds,
            [
                NodeType::Instruction,
                NodeType::Comment,
                NodeType::Doctype,
                NodeType::Element
            ]
        );
    }

    #[test]
    fn whitespace_text() {
        let text = "<svg><g> </g><text> </text><g xml:space=\"preserve\"> </g></svg>";
        let doc = Document::parse(text).unwrap();
        let svg = doc.root_element().unwrap();
        let children = doc.children(svg);
        assert!(doc.children(children[0]).is_empty());
        assert_eq!(doc.children(children[1]).len(), 1);
        assert_eq!(doc.children(children[2]).len(), 1);
    }

    #[test]
    fn attributes_are_split_by_namespace() {
        let text = "<svg xmlns=\"http://www.w3.org/2000/svg\" \
                    xmlns:xlink=\"http://www.w3.org/1999/xlink\">\
                    <use xlink:href=\"#a\" x=\"1\"/></svg>";
        let doc = Document::parse(text).unwrap();
        let svg = doc.element(doc.root_element().unwrap()).unwrap();
        assert_eq!(svg.attribute_str("xmlns"), Some(SVG_NS));
        assert_eq!(svg.foreign[0].qualified_name(), "xmlns:xlink");

        let use_id = doc.children(doc.root_element().unwrap())[0];
        let use_elem = doc.element(use_id).unwrap();
        assert_eq!(use_elem.attribute_str("x"), Some("1"));
        assert_eq!(use_elem.href(), Some("#a"));
    }

    #[test]
    fn error_position() {
        let err = Document::parse_with_name("<svg>\n<g>\n</svg>", "a.svg").unwrap_err();
        assert_eq!(err.source_name.as_deref(), Some("a.svg"));
        assert_eq!(err.line, 3);
    }
}
