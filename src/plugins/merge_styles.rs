// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{Document, VisitError, VisitFlow, Visitor};

use crate::{DocData, Params, Plugin, PluginInfo};

/// Merges all `<style>` elements into the first one.
#[derive(Clone, Copy, Debug)]
pub struct MergeStyles;

impl Plugin for MergeStyles {
    fn name(&self) -> &str {
        "mergeStyles"
    }

    fn create<'a>(&self, info: &PluginInfo<'a>, _: &Params) -> Option<Box<dyn Visitor + 'a>> {
        if !info.doc_data.can_use_styles() {
            return None;
        }

        Some(Box::new(StyleMerger {
            doc_data: info.doc_data,
        }))
    }
}

struct StyleMerger<'a> {
    doc_data: &'a DocData,
}

impl Visitor for StyleMerger<'_> {
    fn root_enter(&mut self, doc: &mut Document) -> Result<VisitFlow, VisitError> {
        if let Some(mut styles) = self.doc_data.styles_mut() {
            styles.merge_styles(doc);
        }

        Ok(VisitFlow::Skip)
    }
}
