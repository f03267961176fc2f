// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A depth-first tree traversal with mutation support.

use crate::{Document, NodeId, NodeType};

/// What to do after an `enter` callback.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VisitFlow {
    /// Descend into node's children.
    Continue,
    /// Do not visit node's children. The `exit` callback is still called.
    Skip,
}

/// A visitor callback failure.
///
/// Aborts the whole traversal.
#[derive(Clone, PartialEq, Debug)]
pub struct VisitError(pub String);

impl VisitError {
    /// Creates a new error.
    pub fn new<S: Into<String>>(reason: S) -> Self {
        VisitError(reason.into())
    }
}

impl std::fmt::Display for VisitError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for VisitError {}

/// A set of per-node-type callbacks.
///
/// All callbacks are optional. Element callbacks receive the element ancestors,
/// the innermost one last. Leaf callbacks receive the parent node.
#[allow(unused_variables)]
pub trait Visitor {
    /// Called before the root children.
    fn root_enter(&mut self, doc: &mut Document) -> Result<VisitFlow, VisitError> {
        Ok(VisitFlow::Continue)
    }

    /// Called after the root children.
    fn root_exit(&mut self, doc: &mut Document) -> Result<(), VisitError> {
        Ok(())
    }

    /// Called before element's children.
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        ancestors: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        Ok(VisitFlow::Continue)
    }

    /// Called after element's children.
    fn element_exit(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        ancestors: &[NodeId],
    ) -> Result<(), VisitError> {
        Ok(())
    }

    /// Called for a text node.
    fn text(&mut self, doc: &mut Document, node: NodeId, parent: NodeId) -> Result<(), VisitError> {
        Ok(())
    }

    /// Called for a comment node.
    fn comment(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        parent: NodeId,
    ) -> Result<(), VisitError> {
        Ok(())
    }

    /// Called for a processing instruction.
    fn instruction(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        parent: NodeId,
    ) -> Result<(), VisitError> {
        Ok(())
    }

    /// Called for a DOCTYPE node.
    fn doctype(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        parent: NodeId,
    ) -> Result<(), VisitError> {
        Ok(())
    }
}

/// Walks the document depth-first, calling visitor callbacks.
///
/// Children lists are snapshotted before iteration, so callbacks may detach
/// or insert siblings of the current node. Nodes detached by an earlier
/// callback are not visited.
pub fn traverse(doc: &mut Document, visitor: &mut dyn Visitor) -> Result<(), VisitError> {
    let root = doc.root();
    if visitor.root_enter(doc)? == VisitFlow::Continue {
        let mut ancestors = Vec::new();
        visit_children(doc, root, visitor, &mut ancestors)?;
    }

    visitor.root_exit(doc)
}

fn visit_children(
    doc: &mut Document,
    parent: NodeId,
    visitor: &mut dyn Visitor,
    ancestors: &mut Vec<NodeId>,
) -> Result<(), VisitError> {
    let children = doc.children(parent).to_vec();
    for child in children {
        if doc.parent(child) != Some(parent) {
            continue;
        }

        match doc.node_type(child) {
            NodeType::Element => visit_element(doc, child, parent, visitor, ancestors)?,
            NodeType::Text => visitor.text(doc, child, parent)?,
            NodeType::Comment => visitor.comment(doc, child, parent)?,
            NodeType::Instruction => visitor.instruction(doc, child, parent)?,
            NodeType::Doctype => visitor.doctype(doc, child, parent)?,
            NodeType::Root => {}
        }
    }

    Ok(())
}

fn visit_element(
    doc: &mut Document,
    node: NodeId,
    parent: NodeId,
    visitor: &mut dyn Visitor,
    ancestors: &mut Vec<NodeId>,
) -> Result<(), VisitError> {
    let flow = visitor.element_enter(doc, node, ancestors)?;

    // The node may be removed by its own `enter` callback.
    if flow == VisitFlow::Continue && doc.parent(node) == Some(parent) {
        ancestors.push(node);
        let res = visit_children(doc, node, visitor, ancestors);
        ancestors.pop();
        res?;
    }

    visitor.element_exit(doc, node, ancestors)
}
