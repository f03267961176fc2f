// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{Document, NodeId, NodeKind, VisitError, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Removes the XML declaration.
///
/// Other processing instructions, like `<?xml-stylesheet?>`, are kept.
#[derive(Clone, Copy, Debug)]
pub struct RemoveXmlProcInst;

impl Plugin for RemoveXmlProcInst {
    fn name(&self) -> &str {
        "removeXMLProcInst"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(DeclarationRemover))
    }
}

struct DeclarationRemover;

impl Visitor for DeclarationRemover {
    fn instruction(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: NodeId,
    ) -> Result<(), VisitError> {
        if let NodeKind::Instruction { ref name, .. } = *doc.kind(node) {
            if name == "xml" {
                doc.detach(node);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;

    #[test]
    fn removes_declaration_only() {
        let text = "<?xml version='1.0' encoding='UTF-8'?><?xml-stylesheet href='a.css'?><svg xmlns='http://www.w3.org/2000/svg'/>";
        assert_eq!(
            apply(&RemoveXmlProcInst, &Params::new(), text),
            "<?xml-stylesheet href='a.css'?><svg xmlns=\"http://www.w3.org/2000/svg\"/>"
        );
    }
}
