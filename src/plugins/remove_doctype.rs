// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{Document, NodeId, VisitError, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Removes `<!DOCTYPE>`.
///
/// Entities declared in the internal subset are already expanded by the parser.
#[derive(Clone, Copy, Debug)]
pub struct RemoveDoctype;

impl Plugin for RemoveDoctype {
    fn name(&self) -> &str {
        "removeDoctype"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(DoctypeRemover))
    }
}

struct DoctypeRemover;

impl Visitor for DoctypeRemover {
    fn doctype(&mut self, doc: &mut Document, node: NodeId, _: NodeId) -> Result<(), VisitError> {
        doc.detach(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;

    #[test]
    fn removes_doctype() {
        let text = "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\"><svg xmlns='http://www.w3.org/2000/svg'/>";
        assert_eq!(
            apply(&RemoveDoctype, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"/>"
        );
    }
}
