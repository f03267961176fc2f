// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{Document, NodeId, VisitError, VisitFlow, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Rewrites typed attribute values in their shortest form.
///
/// Values that cannot be parsed are only trimmed.
#[derive(Clone, Copy, Debug)]
pub struct MinifyValues;

impl Plugin for MinifyValues {
    fn name(&self) -> &str {
        "minifyValues"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(ValueMinifier))
    }
}

struct ValueMinifier;

impl Visitor for ValueMinifier {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        if let Some(element) = doc.element_mut(node) {
            for attr in element.attributes.iter_mut() {
                attr.value.minify();
            }
        }

        Ok(VisitFlow::Continue)
    }
}
