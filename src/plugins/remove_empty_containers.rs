// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{names, Document, NodeId, VisitError, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Removes container elements without children.
///
/// Runs on element exit, so containers that become empty
/// after their children were removed are removed too.
#[derive(Clone, Copy, Debug)]
pub struct RemoveEmptyContainers;

impl Plugin for RemoveEmptyContainers {
    fn name(&self) -> &str {
        "removeEmptyContainers"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(ContainerRemover))
    }
}

struct ContainerRemover;

impl Visitor for ContainerRemover {
    fn element_exit(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        ancestors: &[NodeId],
    ) -> Result<(), VisitError> {
        let element = match doc.element(node) {
            Some(e) => e,
            None => return Ok(()),
        };

        if !element.is_svg()
            || !names::is_container(&element.name)
            || !doc.children(node).is_empty()
            || ancestors.is_empty()
        {
            return Ok(());
        }

        // Empty patterns and masks can still be referenced.
        if (element.name == "pattern" && !element.attributes.is_empty())
            || (element.name == "mask" && element.id().is_some())
        {
            return Ok(());
        }

        // A filter can render without any input.
        if element.name == "g" && element.has_attribute("filter") {
            return Ok(());
        }

        if ancestors.last().map_or(false, |p| doc.is_element_named(*p, "switch")) {
            return Ok(());
        }

        doc.detach(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => {
            #[test]
            fn $name() {
                let text = concat!("<svg xmlns='http://www.w3.org/2000/svg'>", $text, "</svg>");
                let result = concat!("<svg xmlns=\"http://www.w3.org/2000/svg\"", $result);
                assert_eq!(apply(&RemoveEmptyContainers, &Params::new(), text), result);
            }
        };
    }

    test!(nested, "<g><g/><defs/></g>", "/>");
    test!(with_content, "<g><rect/></g>", "><g><rect/></g></svg>");
    test!(pattern_with_attributes, "<pattern id=\"p\"/>", "><pattern id=\"p\"/></svg>");
    test!(mask_with_id, "<mask id=\"m\"/><mask/>", "><mask id=\"m\"/></svg>");
    test!(filtered_group, "<g filter=\"url(#f)\"/>", "><g filter=\"url(#f)\"/></svg>");
    test!(switch_child, "<switch><g/></switch>", "><switch><g/></switch></svg>");

    #[test]
    fn root_is_kept() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'/>";
        assert_eq!(
            apply(&RemoveEmptyContainers, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"/>"
        );
    }
}
