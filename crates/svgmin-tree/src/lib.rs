// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Represents an SVG document as a mutable tree.

`svgmin-tree` uses [`roxmltree`] for tokenizing, but unlike it, produces a tree
that can be edited in place: attributes are stored as typed, lazily parsed
[`AttributeValue`]s and nodes can be inserted, moved and detached.

Nodes live in an arena owned by [`Document`]. A parent owns the list of its
children, while every child keeps a non-owning [`NodeId`] of its parent.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::borrow::Cow;
use std::num::NonZeroU32;

mod error;
pub mod names;
mod parse;
pub mod values;
pub mod visit;
mod writer;

pub use error::ParseError;
pub use values::{AttributeValue, Declarations, StyleDeclaration, Value};
pub use visit::{traverse, VisitError, VisitFlow, Visitor};
pub use writer::{Eol, WriteOptions};

/// The SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// The XLink namespace URI.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// The XML namespace URI.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
/// The namespace URI of namespace declarations.
pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

/// A node identifier inside a [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    #[inline]
    fn new(id: u32) -> Self {
        debug_assert!(id < core::u32::MAX);

        // We are using `NonZeroU32` to reduce overhead of `Option<NodeId>`.
        NodeId(NonZeroU32::new(id + 1).unwrap())
    }

    #[inline]
    fn get_usize(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(id: usize) -> Self {
        debug_assert!(id <= core::u32::MAX as usize);
        NodeId::new(id as u32)
    }
}

/// A node kind without its payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum NodeType {
    Root,
    Doctype,
    Instruction,
    Comment,
    Text,
    Element,
}

/// A node payload.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// The document root. Has no parent.
    Root,
    /// A `<!DOCTYPE ...>` declaration, stored without the `<!DOCTYPE` and `>` delimiters.
    Doctype(String),
    /// A processing instruction, including the XML declaration.
    Instruction {
        /// Instruction target, like `xml` or `xml-stylesheet`.
        name: String,
        /// Everything after the target.
        value: String,
    },
    /// A comment.
    Comment(String),
    /// A text node. CDATA sections are stored as text too.
    Text(String),
    /// An element.
    Element(Element),
}

impl NodeKind {
    /// Returns a payload-less node type.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root => NodeType::Root,
            NodeKind::Doctype(_) => NodeType::Doctype,
            NodeKind::Instruction { .. } => NodeType::Instruction,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Element(_) => NodeType::Element,
        }
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// An attribute from the SVG namespace.
#[derive(Clone, Debug)]
pub struct Attribute {
    /// Attribute's local name.
    pub name: String,
    /// Attribute's value.
    pub value: AttributeValue,
}

/// An attribute outside of the SVG namespace, like `xlink:href` or `xmlns:xlink`.
///
/// Stored as a raw string.
#[derive(Clone, PartialEq, Debug)]
pub struct ForeignAttribute {
    /// Namespace prefix.
    pub prefix: Option<String>,
    /// Local name.
    pub local: String,
    /// Namespace URI.
    pub uri: Option<String>,
    /// Raw value.
    pub value: String,
}

impl ForeignAttribute {
    /// Returns a `prefix:local` name.
    pub fn qualified_name(&self) -> Cow<str> {
        match self.prefix {
            Some(ref prefix) => Cow::Owned(format!("{}:{}", prefix, self.local)),
            None => Cow::Borrowed(&self.local),
        }
    }

    /// Checks that this attribute is a namespace declaration.
    pub fn is_namespace_declaration(&self) -> bool {
        self.prefix.as_deref() == Some("xmlns")
    }
}

/// An ordered list of SVG attributes with unique names.
///
/// Insertion order is preserved, since it's the serialization order.
#[derive(Clone, Default, Debug)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Returns an attribute value.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    /// Returns a mutable attribute value.
    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut AttributeValue> {
        self.0.iter_mut().find(|a| a.name == name).map(|a| &mut a.value)
    }

    /// Checks if an attribute is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|a| a.name == name)
    }

    /// Inserts an attribute.
    ///
    /// An existing attribute keeps its position and gets a new value.
    pub fn insert(&mut self, name: &str, value: AttributeValue) {
        match self.0.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.0.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Removes an attribute, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let idx = self.0.iter().position(|a| a.name == name)?;
        Some(self.0.remove(idx).value)
    }

    /// Keeps only attributes for which `f` returns `true`.
    pub fn retain<F: FnMut(&Attribute) -> bool>(&mut self, f: F) {
        self.0.retain(f)
    }

    /// Returns an iterator over attributes.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<Attribute> {
        self.0.iter()
    }

    /// Returns a mutable iterator over attributes.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<Attribute> {
        self.0.iter_mut()
    }

    /// Returns the number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that there are no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// An element.
#[derive(Clone, Debug)]
pub struct Element {
    /// Local name.
    pub name: String,
    /// Namespace prefix, as written in the source.
    pub prefix: Option<String>,
    /// Namespace URI. `None` stands for the SVG namespace.
    pub uri: Option<String>,
    /// Attributes from the SVG namespace.
    pub attributes: Attributes,
    /// Attributes from other namespaces.
    pub foreign: Vec<ForeignAttribute>,
}

impl Element {
    /// Creates a new SVG element without attributes.
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            prefix: None,
            uri: None,
            attributes: Attributes::default(),
            foreign: Vec::new(),
        }
    }

    /// Checks that the element is in the SVG namespace.
    #[inline]
    pub fn is_svg(&self) -> bool {
        self.uri.is_none()
    }

    /// Checks that the element is an SVG element with the specified name.
    #[inline]
    pub fn has_name(&self, name: &str) -> bool {
        self.is_svg() && self.name == name
    }

    /// Returns a `prefix:name` name.
    pub fn qualified_name(&self) -> Cow<str> {
        match self.prefix {
            Some(ref prefix) => Cow::Owned(format!("{}:{}", prefix, self.name)),
            None => Cow::Borrowed(&self.name),
        }
    }

    /// Returns an SVG attribute value.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns an SVG attribute value as a string.
    #[inline]
    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }

    /// Checks if an SVG attribute is present.
    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    /// Sets an SVG attribute, parsing `text` into a typed value.
    pub fn set_attribute(&mut self, name: &str, text: &str) {
        let value = AttributeValue::from_attribute(&self.name, name, text);
        self.attributes.insert(name, value);
    }

    /// Removes an SVG attribute.
    #[inline]
    pub fn remove_attribute(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    /// Returns a foreign attribute by its `prefix:local` name.
    pub fn foreign_attribute(&self, qname: &str) -> Option<&ForeignAttribute> {
        self.foreign.iter().find(|a| a.qualified_name() == qname)
    }

    /// Returns an SVG attribute or a foreign attribute value by its qualified name.
    pub fn any_attribute(&self, qname: &str) -> Option<Cow<str>> {
        if let Some(value) = self.attribute_str(qname) {
            return Some(Cow::Borrowed(value));
        }

        self.foreign_attribute(qname)
            .map(|a| Cow::Borrowed(a.value.as_str()))
    }

    /// Returns the `id` attribute value.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.attribute_str("id")
    }

    /// Returns `href` or `xlink:href` value.
    pub fn href(&self) -> Option<&str> {
        if let Some(value) = self.attribute_str("href") {
            return Some(value);
        }

        self.foreign
            .iter()
            .find(|a| a.local == "href" && a.uri.as_deref() == Some(XLINK_NS))
            .map(|a| a.value.as_str())
    }

    /// Returns an iterator over class names.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute_str("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    /// Checks that the element has a specified class.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|c| c == name)
    }
}

/// An SVG document.
#[derive(Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document with a single root node.
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
        }
    }

    /// Returns the root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Returns the first element child of the root.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|id| self.node_type(*id) == NodeType::Element)
    }

    /// Returns a read-only node handle.
    #[inline]
    pub fn node(&self, id: NodeId) -> Node {
        Node { doc: self, id }
    }

    /// Returns a node payload.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.get_usize()].kind
    }

    /// Returns a mutable node payload.
    #[inline]
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.get_usize()].kind
    }

    /// Returns a node type.
    #[inline]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.kind(id).node_type()
    }

    /// Returns an element payload, unless the node is not an element.
    #[inline]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            NodeKind::Element(ref e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable element payload, unless the node is not an element.
    #[inline]
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.kind_mut(id) {
            NodeKind::Element(ref mut e) => Some(e),
            _ => None,
        }
    }

    /// Checks that the node is an SVG element with the specified name.
    #[inline]
    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.element(id).map(|e| e.has_name(name)).unwrap_or(false)
    }

    /// Returns a parent node id.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.get_usize()].parent
    }

    /// Returns node's children.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.get_usize()].children
    }

    /// Checks that the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut curr = id;
        loop {
            if curr == self.root() {
                return true;
            }

            match self.parent(curr) {
                Some(parent) => curr = parent,
                None => return false,
            }
        }
    }

    /// Appends a new node to the end of parent's children.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let index = self.children(parent).len();
        self.insert(parent, index, kind)
    }

    /// Inserts a new node at the specified position of parent's children.
    ///
    /// # Panics
    ///
    /// - if `index` is greater than the number of children
    pub fn insert(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> NodeId {
        let new_id = NodeId::from(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.get_usize()].children.insert(index, new_id);
        new_id
    }

    /// Moves an existing node to the specified position of a new parent.
    ///
    /// The node is detached from its current parent first.
    pub fn reattach(&mut self, node: NodeId, parent: NodeId, index: usize) {
        self.detach(node);
        let children = &mut self.nodes[parent.get_usize()].children;
        let index = index.min(children.len());
        children.insert(index, node);
        self.nodes[node.get_usize()].parent = Some(parent);
    }

    /// Removes a node from its parent.
    ///
    /// The node and its subtree remain in the arena, but are no longer reachable.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.get_usize()].parent.take() {
            self.nodes[parent.get_usize()].children.retain(|c| *c != id);
        }
    }

    /// Returns node's position inside its parent children list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Replaces all children of an element with a single text node.
    ///
    /// An empty `text` simply removes all children.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        for child in self.children(id).to_vec() {
            self.detach(child);
        }

        if !text.is_empty() {
            self.append(id, NodeKind::Text(text.to_string()));
        }
    }

    /// Returns the concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text(ref s) = self.kind(node) {
                text.push_str(s);
            }
        }

        text
    }

    /// Returns an iterator over this node and its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// Returns an iterator over all attached elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root())
            .filter(move |id| self.node_type(*id) == NodeType::Element)
    }

    /// Writes the document back to XML.
    pub fn to_string(&self, opt: &WriteOptions) -> String {
        writer::convert(self, opt)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        if self.children(self.root()).is_empty() {
            return write!(f, "Document []");
        }

        macro_rules! writeln_indented {
            ($depth:expr, $f:expr, $fmt:expr) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt)?;
            };
            ($depth:expr, $f:expr, $fmt:expr, $($arg:tt)*) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt, $($arg)*)?;
            };
        }

        fn print_children(
            parent: Node,
            depth: usize,
            f: &mut std::fmt::Formatter,
        ) -> Result<(), std::fmt::Error> {
            for child in parent.children() {
                if let Some(e) = child.element() {
                    writeln_indented!(depth, f, "Element {{");
                    writeln_indented!(depth, f, "    name: {:?}", e.qualified_name());

                    if !e.attributes.is_empty() {
                        writeln_indented!(depth + 1, f, "attributes: [");
                        for attr in &e.attributes {
                            writeln_indented!(depth + 2, f, "{}={:?}", attr.name, attr.value.as_str());
                        }
                        writeln_indented!(depth + 1, f, "]");
                    }

                    if child.has_children() {
                        writeln_indented!(depth, f, "    children: [");
                        print_children(child, depth + 2, f)?;
                        writeln_indented!(depth, f, "    ]");
                    }

                    writeln_indented!(depth, f, "}}");
                } else {
                    writeln_indented!(depth, f, "{:?}", child.kind());
                }
            }

            Ok(())
        }

        writeln!(f, "Document [")?;
        print_children(self.node(self.root()), 1, f)?;
        writeln!(f, "]")?;

        Ok(())
    }
}

/// A read-only node handle.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Eq for Node<'_> {}

impl PartialEq for Node<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.doc, other.doc)
    }
}

impl<'a> Node<'a> {
    /// Returns node's id.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns node's document.
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Returns node's payload.
    #[inline]
    pub fn kind(&self) -> &'a NodeKind {
        self.doc.kind(self.id)
    }

    /// Checks if the current node is an element.
    #[inline]
    pub fn is_element(&self) -> bool {
        self.doc.node_type(self.id) == NodeType::Element
    }

    /// Checks if the current node is a text.
    #[inline]
    pub fn is_text(&self) -> bool {
        self.doc.node_type(self.id) == NodeType::Text
    }

    /// Returns element's payload, unless the current node is not an element.
    #[inline]
    pub fn element(&self) -> Option<&'a Element> {
        self.doc.element(self.id)
    }

    /// Returns the local name of an SVG element.
    #[inline]
    pub fn tag_name(&self) -> Option<&'a str> {
        self.element().filter(|e| e.is_svg()).map(|e| e.name.as_str())
    }

    /// Checks that the node is an SVG element with the specified name.
    #[inline]
    pub fn has_tag_name(&self, name: &str) -> bool {
        self.tag_name() == Some(name)
    }

    /// Returns an SVG attribute value.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&'a AttributeValue> {
        self.element()?.attribute(name)
    }

    /// Returns node's text data.
    ///
    /// For text nodes returns its content. For elements returns the concatenated
    /// text of all descendants.
    pub fn text(&self) -> Cow<'a, str> {
        match self.kind() {
            NodeKind::Text(ref text) => Cow::Borrowed(text),
            NodeKind::Element(_) => Cow::Owned(self.doc.text_content(self.id)),
            _ => Cow::Borrowed(""),
        }
    }

    /// Returns a parent node.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.doc.parent(self.id).map(|id| self.doc.node(id))
    }

    /// Returns the parent element.
    #[inline]
    pub fn parent_element(&self) -> Option<Self> {
        self.ancestors().skip(1).find(|n| n.is_element())
    }

    /// Checks if the node has child nodes.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.doc.children(self.id).is_empty()
    }

    /// Returns an iterator over children nodes.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        doc.children(self.id).iter().map(move |id| doc.node(*id))
    }

    /// Returns the first child element.
    #[inline]
    pub fn first_element_child(&self) -> Option<Self> {
        self.children().find(|n| n.is_element())
    }

    /// Returns the previous sibling element.
    pub fn prev_sibling_element(&self) -> Option<Self> {
        let parent = self.parent()?;
        let idx = self.doc.index_in_parent(self.id)?;
        self.doc.children(parent.id)[..idx]
            .iter()
            .rev()
            .map(|id| self.doc.node(*id))
            .find(|n| n.is_element())
    }

    /// Returns the next sibling element.
    pub fn next_sibling_element(&self) -> Option<Self> {
        let parent = self.parent()?;
        let idx = self.doc.index_in_parent(self.id)?;
        self.doc.children(parent.id)[idx + 1..]
            .iter()
            .map(|id| self.doc.node(*id))
            .find(|n| n.is_element())
    }

    /// Returns an iterator over ancestor nodes starting at this node.
    #[inline]
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors(Some(*self))
    }

    /// Returns an iterator over this node and its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        doc.descendants(self.id).map(move |id| doc.node(id))
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.kind() {
            NodeKind::Element(ref e) => write!(f, "Element {{ name: {:?} }}", e.qualified_name()),
            kind => write!(f, "{:?}", kind),
        }
    }
}

/// An iterator over ancestor nodes.
#[derive(Clone, Debug)]
pub struct Ancestors<'a>(Option<Node<'a>>);

impl<'a> Iterator for Ancestors<'a> {
    type Item = Node<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.0.take();
        self.0 = node.as_ref().and_then(Node::parent);
        node
    }
}

/// A pre-order descendants iterator.
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
