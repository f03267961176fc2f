// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{AttributeValue, Document, NodeId, VisitError, VisitFlow, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Rewrites colors in their shortest form, like `#ff0000` to `red`.
#[derive(Clone, Copy, Debug)]
pub struct ConvertColors;

impl Plugin for ConvertColors {
    fn name(&self) -> &str {
        "convertColors"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(ColorConverter))
    }
}

struct ColorConverter;

impl Visitor for ColorConverter {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        if let Some(element) = doc.element_mut(node) {
            for attr in element.attributes.iter_mut() {
                if let AttributeValue::Paint(_) = attr.value {
                    attr.value.minify();
                }
            }
        }

        Ok(VisitFlow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;

    #[test]
    fn converts_paints() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'><rect fill='#ff0000' stroke='rgb(255, 255, 255)' width='10.0'/><stop stop-color='#f0ffff'/><rect fill='url(#a) #000000' stroke='rgba(0, 0, 0, 0.5)'/></svg>";
        assert_eq!(
            apply(&ConvertColors, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect fill=\"red\" stroke=\"#fff\" width=\"10.0\"/><stop stop-color=\"azure\"/><rect fill=\"url(#a) #000\" stroke=\"rgba(0, 0, 0, 0.5)\"/></svg>"
        );
    }
}
