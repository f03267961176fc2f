// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_css::{ComputedStyle, PropsMemo};
use svgmin_tree::{names, Document, NodeId, VisitError, VisitFlow, Visitor};

use super::{in_reusable_subtree, is_zero};
use crate::{DocData, Params, Plugin, PluginInfo};

/// Removes stroke and fill attributes of shapes that do not paint them.
///
/// Parameters:
///
/// - `stroke`: handle stroke attributes. Default: true
/// - `fill`: handle fill attributes. Default: true
/// - `removeNone`: remove shapes that paint neither. Default: false
#[derive(Clone, Copy, Debug)]
pub struct RemoveUselessStrokeAndFill;

impl Plugin for RemoveUselessStrokeAndFill {
    fn name(&self) -> &str {
        "removeUselessStrokeAndFill"
    }

    fn create<'a>(&self, info: &PluginInfo<'a>, params: &Params) -> Option<Box<dyn Visitor + 'a>> {
        let doc_data = info.doc_data;
        if !doc_data.can_use_styles() || doc_data.has_animations() {
            return None;
        }

        Some(Box::new(PaintCleaner {
            doc_data,
            stroke: params.bool("stroke", true),
            fill: params.bool("fill", true),
            remove_none: params.bool("removeNone", false),
            memo: PropsMemo::new(),
        }))
    }
}

struct PaintCleaner<'a> {
    doc_data: &'a DocData,
    stroke: bool,
    fill: bool,
    remove_none: bool,
    memo: PropsMemo,
}

#[derive(Default)]
struct Changes {
    remove_stroke: bool,
    stroke_none: bool,
    remove_fill: bool,
    fill_none: bool,
}

impl PaintCleaner<'_> {
    fn plan(&mut self, doc: &Document, node: NodeId, ancestors: &[NodeId]) -> Option<Changes> {
        let styles = self.doc_data.styles()?;
        let element = doc.element(node)?;
        // Referenced shapes can be restyled by `use`.
        if !element.is_svg() || element.id().is_some() || element.has_attribute("style") {
            return None;
        }

        let is_paint_prop = |name: &str| name.starts_with("stroke") || name.starts_with("fill");
        let rule_props = styles.compute_style_element_props(doc, node);
        if rule_props.iter().any(|(name, _)| is_paint_prop(name)) {
            return None;
        }

        let style = styles.compute_props(doc, node, &mut self.memo);
        if style.iter().any(|(name, v)| is_paint_prop(name) && v.as_str().is_none()) {
            return None;
        }

        let parent = styles.compute_parent_props(doc, ancestors, &mut self.memo);

        let mut changes = Changes::default();
        if self.stroke && !paints_stroke(&style) {
            // `stroke-width` affects marker size.
            let has_marker = style.value("marker-end").map_or(false, |v| v != "none");
            let zero_width = style.value("stroke-width").map_or(false, is_zero);
            if zero_width || !has_marker {
                changes.remove_stroke = true;
                // A `use` element may provide a stroke.
                changes.stroke_none = in_reusable_subtree(doc, ancestors)
                    || match parent.get("stroke") {
                        Some(v) => v.as_str() != Some("none"),
                        None => false,
                    };
            }
        }

        if self.fill && !paints_fill(&style) {
            changes.remove_fill = true;
            changes.fill_none = style.value("fill") != Some("none");
        }

        Some(changes)
    }
}

fn paints_stroke(style: &ComputedStyle) -> bool {
    match style.value("stroke") {
        Some(v) if v != "none" => {}
        _ => return false,
    }

    !style.value("stroke-opacity").map_or(false, is_zero)
        && !style.value("stroke-width").map_or(false, is_zero)
}

fn paints_fill(style: &ComputedStyle) -> bool {
    style.value("fill") != Some("none") && !style.value("fill-opacity").map_or(false, is_zero)
}

impl Visitor for PaintCleaner<'_> {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        ancestors: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        if !doc.element(node).map_or(false, |e| names::is_shape(&e.name)) {
            return Ok(VisitFlow::Continue);
        }

        let changes = match self.plan(doc, node, ancestors) {
            Some(v) => v,
            None => return Ok(VisitFlow::Continue),
        };

        if self.remove_none && changes.remove_stroke && changes.remove_fill {
            doc.detach(node);
            return Ok(VisitFlow::Skip);
        }

        let element = match doc.element_mut(node) {
            Some(e) => e,
            None => return Ok(VisitFlow::Continue),
        };

        if changes.remove_stroke {
            element.attributes.retain(|a| !a.name.starts_with("stroke"));
            if changes.stroke_none {
                element.set_attribute("stroke", "none");
            }
        }

        if changes.remove_fill {
            element.attributes.retain(|a| !a.name.starts_with("fill-"));
            if changes.fill_none {
                element.set_attribute("fill", "none");
            }
        }

        Ok(VisitFlow::Continue)
    }
}
