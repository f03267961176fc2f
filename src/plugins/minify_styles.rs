// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_css::MinifyOptions;
use svgmin_tree::{Document, NodeId, VisitError, VisitFlow, Visitor};

use crate::{DocData, Params, Plugin, PluginInfo};

/// Minifies stylesheets and `style` attributes.
///
/// Parameters:
///
/// - `removeUnused`: remove rules that cannot match any element. Default: true
#[derive(Clone, Copy, Debug)]
pub struct MinifyStyles;

impl Plugin for MinifyStyles {
    fn name(&self) -> &str {
        "minifyStyles"
    }

    fn create<'a>(&self, info: &PluginInfo<'a>, params: &Params) -> Option<Box<dyn Visitor + 'a>> {
        if !info.doc_data.can_use_styles() {
            return None;
        }

        Some(Box::new(StyleMinifier {
            doc_data: info.doc_data,
            opt: MinifyOptions {
                remove_unused: params.bool("removeUnused", true),
            },
        }))
    }
}

struct StyleMinifier<'a> {
    doc_data: &'a DocData,
    opt: MinifyOptions,
}

impl Visitor for StyleMinifier<'_> {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        let element = match doc.element_mut(node) {
            Some(e) => e,
            None => return Ok(VisitFlow::Continue),
        };

        let is_empty = match element.attributes.get_mut("style") {
            Some(value) => {
                value.minify();
                value.declarations().map_or(false, |d| d.is_empty())
            }
            None => false,
        };

        if is_empty {
            element.remove_attribute("style");
        }

        Ok(VisitFlow::Continue)
    }

    fn root_exit(&mut self, doc: &mut Document) -> Result<(), VisitError> {
        if let Some(mut styles) = self.doc_data.styles_mut() {
            styles.minify_styles(doc, self.opt);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;
    use crate::ParamValue;

    const TEXT: &str = "<svg xmlns='http://www.w3.org/2000/svg'><style>.a { fill: #ff0000 } .b { fill: blue }</style><rect class='a' style='stroke : #ffffff ; '/><rect style='  '/></svg>";

    #[test]
    fn minifies() {
        assert_eq!(
            apply(&MinifyStyles, &Params::new(), TEXT),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><style>.a{fill:red}</style><rect class=\"a\" style=\"stroke:#fff\"/><rect/></svg>"
        );
    }

    #[test]
    fn keeps_unused_rules() {
        let params = Params::new().with("removeUnused", ParamValue::Bool(false));
        assert_eq!(
            apply(&MinifyStyles, &params, TEXT),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><style>.a{fill:red}.b{fill:#00f}</style><rect class=\"a\" style=\"stroke:#fff\"/><rect/></svg>"
        );
    }
}
