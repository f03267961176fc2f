// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{Document, NodeId, VisitError, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Removes `text` and `tspan` elements without content
/// and `tref` elements without a reference.
#[derive(Clone, Copy, Debug)]
pub struct RemoveEmptyText;

impl Plugin for RemoveEmptyText {
    fn name(&self) -> &str {
        "removeEmptyText"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(EmptyTextRemover))
    }
}

struct EmptyTextRemover;

impl Visitor for EmptyTextRemover {
    fn element_exit(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<(), VisitError> {
        let element = match doc.element(node) {
            Some(e) => e,
            None => return Ok(()),
        };

        let is_empty = if element.has_name("text") || element.has_name("tspan") {
            doc.children(node).is_empty()
        } else if element.has_name("tref") {
            element.href().is_none()
        } else {
            false
        };

        if is_empty {
            doc.detach(node);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;

    #[test]
    fn removes_empty() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'><text><tspan/></text><text>a</text><tref/><tref href='#a'/></svg>";
        assert_eq!(
            apply(&RemoveEmptyText, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><text>a</text><tref href=\"#a\"/></svg>"
        );
    }
}
