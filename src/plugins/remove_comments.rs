// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgmin_tree::{Document, NodeId, NodeKind, VisitError, Visitor};

use crate::{Params, Plugin, PluginInfo};

/// Removes comments.
///
/// Legal comments, like `<!--! (c) Author -->`, are kept unless
/// the `preserveLegal` parameter is `false`.
#[derive(Clone, Copy, Debug)]
pub struct RemoveComments;

impl Plugin for RemoveComments {
    fn name(&self) -> &str {
        "removeComments"
    }

    fn create<'a>(&self, _: &PluginInfo<'a>, params: &Params) -> Option<Box<dyn Visitor + 'a>> {
        Some(Box::new(CommentRemover {
            preserve_legal: params.bool("preserveLegal", true),
        }))
    }
}

struct CommentRemover {
    preserve_legal: bool,
}

impl Visitor for CommentRemover {
    fn comment(&mut self, doc: &mut Document, node: NodeId, _: NodeId) -> Result<(), VisitError> {
        let is_legal = match *doc.kind(node) {
            NodeKind::Comment(ref text) => text.starts_with('!'),
            _ => return Ok(()),
        };

        if !(is_legal && self.preserve_legal) {
            doc.detach(node);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;
    use crate::ParamValue;

    const TEXT: &str = "<svg xmlns='http://www.w3.org/2000/svg'><!--! legal --><!-- note --><g/></svg>";

    #[test]
    fn keeps_legal_comments() {
        assert_eq!(
            apply(&RemoveComments, &Params::new(), TEXT),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><!--! legal --><g/></svg>"
        );
    }

    #[test]
    fn removes_all() {
        let params = Params::new().with("preserveLegal", ParamValue::Bool(false));
        assert_eq!(
            apply(&RemoveComments, &params, TEXT),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><g/></svg>"
        );
    }
}
