// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_css::{PropValue, PropsMemo};
use svgmin_tree::{names, AttributeValue, Document, NodeId, VisitError, VisitFlow, Visitor};

use super::in_reusable_subtree;
use crate::{DocData, Params, Plugin, PluginInfo};

/// Removes presentation attributes that have no effect.
///
/// An attribute is removed when it equals its initial value and nothing
/// is inherited for it, or when it repeats the value inherited from the parent.
/// Properties that stylesheet rules set or select on are never touched.
///
/// Parameters:
///
/// - `defaultAttrs`: remove attributes equal to their initial value. Default: true
/// - `uselessOverrides`: remove attributes equal to the inherited value. Default: true
#[derive(Clone, Copy, Debug)]
pub struct RemoveUnknownsAndDefaults;

impl Plugin for RemoveUnknownsAndDefaults {
    fn name(&self) -> &str {
        "removeUnknownsAndDefaults"
    }

    fn create<'a>(&self, info: &PluginInfo<'a>, params: &Params) -> Option<Box<dyn Visitor + 'a>> {
        if !info.doc_data.can_use_styles() {
            return None;
        }

        Some(Box::new(DefaultsRemover {
            doc_data: info.doc_data,
            default_attrs: params.bool("defaultAttrs", true),
            useless_overrides: params.bool("uselessOverrides", true),
            memo: PropsMemo::new(),
        }))
    }
}

struct DefaultsRemover<'a> {
    doc_data: &'a DocData,
    default_attrs: bool,
    useless_overrides: bool,
    memo: PropsMemo,
}

impl Visitor for DefaultsRemover<'_> {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        ancestors: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        let styles = match self.doc_data.styles() {
            Some(v) => v,
            None => return Ok(VisitFlow::Skip),
        };

        let element = match doc.element(node) {
            Some(e) => e,
            None => return Ok(VisitFlow::Continue),
        };

        // Referenced elements can be restyled by `use`.
        if !element.is_svg() || element.id().is_some() {
            return Ok(VisitFlow::Continue);
        }

        let is_reusable = in_reusable_subtree(doc, ancestors);

        let rule_props = styles.compute_style_element_props(doc, node);
        let parent_props = styles.compute_parent_props(doc, ancestors, &mut self.memo);

        let mut useless = Vec::new();
        for attr in &element.attributes {
            let name = attr.name.as_str();
            if !names::is_presentation(name)
                || rule_props.contains(name)
                || styles.has_attribute_selector(Some(name))
            {
                continue;
            }

            let is_inheritable = names::is_inheritable(name);
            let inherited = if is_inheritable {
                parent_props.get(name)
            } else {
                None
            };

            let is_default = self.default_attrs
                && inherited.is_none()
                && !(is_inheritable && is_reusable)
                && names::default_value(name)
                    .map_or(false, |v| AttributeValue::from_property(name, v) == attr.value);

            let is_override = self.useless_overrides
                && match inherited {
                    Some(PropValue::Static(v)) => {
                        AttributeValue::from_property(name, v) == attr.value
                    }
                    _ => false,
                };

            if is_default || is_override {
                useless.push(name.to_string());
            }
        }

        if let Some(element) = doc.element_mut(node) {
            for name in useless {
                element.remove_attribute(&name);
            }
        }

        Ok(VisitFlow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;
    use crate::ParamValue;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => {
            #[test]
            fn $name() {
                let text = concat!("<svg xmlns='http://www.w3.org/2000/svg'>", $text, "</svg>");
                let result = concat!("<svg xmlns=\"http://www.w3.org/2000/svg\">", $result, "</svg>");
                assert_eq!(apply(&RemoveUnknownsAndDefaults, &Params::new(), text), result);
            }
        };
    }

    test!(
        defaults,
        "<rect fill='#000' stroke='none' opacity='1.0' stroke-width='2' x='0'/>",
        "<rect stroke-width=\"2\" x=\"0\"/>"
    );
    test!(
        inherited_value_is_kept,
        "<g fill='red'><rect fill='black'/></g>",
        "<g fill=\"red\"><rect fill=\"black\"/></g>"
    );
    test!(
        useless_override,
        "<g fill='red'><rect fill='#f00'/></g>",
        "<g fill=\"red\"><rect/></g>"
    );
    test!(
        not_inheritable,
        "<g opacity='.5'><rect opacity='1'/></g>",
        "<g opacity=\".5\"><rect/></g>"
    );
    test!(
        element_with_id,
        "<rect id='r' fill='black'/>",
        "<rect id=\"r\" fill=\"black\"/>"
    );
    test!(
        set_by_rule,
        "<style>.a{fill:red}</style><rect class='a' fill='black'/>",
        "<style>.a{fill:red}</style><rect class=\"a\" fill=\"black\"/>"
    );
    test!(
        selected_by_attribute,
        "<style>[fill=black]{stroke:red}</style><rect fill='black'/>",
        "<style>[fill=black]{stroke:red}</style><rect fill=\"black\"/>"
    );
    test!(
        dynamic_parent_value,
        "<style>@media print{g{fill:red}}</style><g><rect fill='black'/></g>",
        "<style>@media print{g{fill:red}}</style><g><rect fill=\"black\"/></g>"
    );

    test!(
        symbol_content,
        "<defs><symbol id='s'><rect width='5' fill='#000' opacity='1'/></symbol></defs>\
         <use href='#s' fill='red'/>",
        "<defs><symbol id=\"s\"><rect width=\"5\" fill=\"#000\"/></symbol></defs>\
         <use href=\"#s\" fill=\"red\"/>"
    );
    test!(
        group_with_id,
        "<g id='g'><g fill='#000' stroke='red'><circle stroke='red'/></g></g>",
        "<g id=\"g\"><g fill=\"#000\" stroke=\"red\"><circle/></g></g>"
    );

    #[test]
    fn overrides_only() {
        let params = Params::new().with("defaultAttrs", ParamValue::Bool(false));
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <g stroke='red'><rect stroke='red' fill='black'/></g></svg>";
        assert_eq!(
            apply(&RemoveUnknownsAndDefaults, &params, text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <g stroke=\"red\"><rect fill=\"black\"/></g></svg>"
        );
    }
}
