// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{Document, NodeId, VisitError, VisitFlow, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Removes `<metadata>`.
#[derive(Clone, Copy, Debug)]
pub struct RemoveMetadata;

impl Plugin for RemoveMetadata {
    fn name(&self) -> &str {
        "removeMetadata"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(MetadataRemover))
    }
}

struct MetadataRemover;

impl Visitor for MetadataRemover {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        if doc.is_element_named(node, "metadata") {
            doc.detach(node);
            return Ok(VisitFlow::Skip);
        }

        Ok(VisitFlow::Continue)
    }
}
