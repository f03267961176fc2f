// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashSet;

use svgmin_css::{ComputedStyle, PropsMemo};
use svgmin_tree::{names, Document, NodeId, Value, VisitError, VisitFlow, Visitor};

use super::{is_zero, referenced_ids};
use crate::{DocData, Params, Plugin, PluginInfo};

/// Removes elements that are never rendered:
/// `display="none"`, `opacity="0"` and shapes with a zero size or without geometry.
///
/// Elements inside non-rendering containers, like `defs` or `clipPath`, are kept,
/// as well as elements whose subtree contains a referenced id.
#[derive(Clone, Copy, Debug)]
pub struct RemoveHiddenElems;

impl Plugin for RemoveHiddenElems {
    fn name(&self) -> &str {
        "removeHiddenElems"
    }

    fn create<'a>(&self, info: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        let doc_data = info.doc_data;
        if !doc_data.can_use_styles() || doc_data.has_animations() {
            return None;
        }

        // Removing an element changes what combinators match.
        if doc_data.styles()?.features().combinators {
            return None;
        }

        Some(Box::new(HiddenRemover {
            doc_data,
            memo: PropsMemo::new(),
            candidates: Vec::new(),
        }))
    }
}

struct HiddenRemover<'a> {
    doc_data: &'a DocData,
    memo: PropsMemo,
    candidates: Vec<NodeId>,
}

impl HiddenRemover<'_> {
    fn is_hidden(&mut self, doc: &Document, node: NodeId) -> bool {
        let styles = match self.doc_data.styles() {
            Some(v) => v,
            None => return false,
        };

        let element = match doc.element(node) {
            Some(e) => e,
            None => return false,
        };

        let style = styles.compute_props(doc, node, &mut self.memo);
        if style.value("display") == Some("none") {
            return true;
        }

        if style.value("opacity").map_or(false, is_zero) {
            return true;
        }

        match element.name.as_str() {
            "circle" => is_zero_prop(&style, "r"),
            "ellipse" => is_zero_prop(&style, "rx") || is_zero_prop(&style, "ry"),
            "rect" | "image" => is_zero_prop(&style, "width") || is_zero_prop(&style, "height"),
            "path" => !style.contains("d") || style.value("d").map_or(false, str::is_empty),
            "polyline" | "polygon" => element.attribute("points").map_or(true, |v| v.is_empty()),
            _ => false,
        }
    }
}

fn is_zero_prop(style: &ComputedStyle, name: &str) -> bool {
    style.value(name).map_or(false, is_zero)
}

impl Visitor for HiddenRemover<'_> {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        ancestors: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        let is_non_rendering = match doc.element(node) {
            Some(e) => !e.is_svg() || names::is_non_rendering(&e.name),
            None => return Ok(VisitFlow::Continue),
        };

        if is_non_rendering {
            return Ok(VisitFlow::Skip);
        }

        if !ancestors.is_empty() && self.is_hidden(doc, node) {
            self.candidates.push(node);
            return Ok(VisitFlow::Skip);
        }

        Ok(VisitFlow::Continue)
    }

    fn root_exit(&mut self, doc: &mut Document) -> Result<(), VisitError> {
        if self.candidates.is_empty() {
            return Ok(());
        }

        let mut references: HashSet<String> = HashSet::new();
        for node in doc.elements() {
            if let Some(element) = doc.element(node) {
                references.extend(referenced_ids(element));
            }
        }

        if let Some(styles) = self.doc_data.styles() {
            references.extend(styles.referenced_ids().iter().cloned());
        }

        for node in self.candidates.drain(..) {
            let is_referenced = doc.descendants(node).any(|n| {
                doc.element(n)
                    .and_then(|e| e.id())
                    .map_or(false, |id| references.contains(id))
            });

            if is_referenced {
                continue;
            }

            doc.detach(node);
        }

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
                assert_eq!(apply(&RemoveHiddenElems, &Params::new(), text), result);
            }
        };
    }

    test!(display_none, "<rect display='none'/><g opacity='0'><rect/></g>", "/>");
    test!(
        zero_size_shapes,
        "<circle r='0'/><ellipse rx='1' ry='0px'/><rect width='0' height='10'/>\
         <rect width='10' height='10'/>",
        "><rect width=\"10\" height=\"10\"/></svg>"
    );
    test!(empty_geometry, "<path/><path d=''/><polygon points=' '/><polyline/>", "/>");
    test!(
        referenced_subtree,
        "<g display='none'><path id='p' d='M0 0'/></g><use href='#p'/>",
        "><g display=\"none\"><path id=\"p\" d=\"M0 0\"/></g><use href=\"#p\"/></svg>"
    );
    test!(
        non_rendering,
        "<clipPath><rect width='0'/></clipPath>",
        "><clipPath><rect width=\"0\"/></clipPath></svg>"
    );
    test!(
        hidden_by_rule,
        "<style>.h{display:none}</style><rect class='h'/><rect width='1' height='1'/>",
        "><style>.h{display:none}</style><rect width=\"1\" height=\"1\"/></svg>"
    );
    test!(
        dynamic_rule,
        "<style>@media print{.h{display:none}}</style><rect class='h' width='1' height='1'/>",
        "><style>@media print{.h{display:none}}</style>\
         <rect class=\"h\" width=\"1\" height=\"1\"/></svg>"
    );
    test!(
        geometry_from_css,
        "<style>path{d:path('M0 0')}</style><path/>",
        "><style>path{d:path('M0 0')}</style><path/></svg>"
    );
    test!(
        skipped_with_combinators,
        "<style>g rect{fill:red}</style><rect display='none'/>",
        "><style>g rect{fill:red}</style><rect display=\"none\"/></svg>"
    );
}
