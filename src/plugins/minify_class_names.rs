// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{HashMap, HashSet};

use svgmin_tree::{Document, NodeId, VisitError, VisitFlow, Visitor};

use super::generate_name;
use crate::{DocData, Params, Plugin, PluginInfo};

/// Renames classes used by stylesheets to the shortest possible names
/// and removes classes that no stylesheet uses.
///
/// Parameters:
///
/// - `preserve`: a list of classes to keep as is
/// - `removeUnused`: remove classes that no selector uses. Default: true
#[derive(Clone, Copy, Debug)]
pub struct MinifyClassNames;

impl Plugin for MinifyClassNames {
    fn name(&self) -> &str {
        "minifyClassNames"
    }

    fn create<'a>(&self, info: &PluginInfo<'a>, params: &Params) -> Option<Box<dyn Visitor + 'a>> {
        let doc_data = info.doc_data;
        if !doc_data.can_use_styles() {
            return None;
        }

        if doc_data.styles()?.has_attribute_selector(Some("class")) {
            return None;
        }

        Some(Box::new(ClassMinifier {
            doc_data,
            preserve: params.list("preserve").into_iter().collect(),
            remove_unused: params.bool("removeUnused", true),
            nodes: Vec::new(),
            classes: Vec::new(),
        }))
    }
}

struct ClassMinifier<'a> {
    doc_data: &'a DocData,
    preserve: HashSet<String>,
    remove_unused: bool,
    nodes: Vec<NodeId>,
    // In order of first appearance.
    classes: Vec<String>,
}

impl ClassMinifier<'_> {
    /// Returns new names and the set of classes to keep.
    fn plan(&self) -> Option<(HashMap<String, String>, HashSet<String>)> {
        let styles = self.doc_data.styles()?;
        let used = styles.referenced_classes();

        let renamed: Vec<&String> = self
            .classes
            .iter()
            .filter(|c| used.contains(*c) && !self.preserve.contains(*c))
            .collect();

        // Names that stay as is and cannot be reused.
        let mut taken: HashSet<&str> = HashSet::new();
        for name in used.iter().chain(&self.preserve) {
            if !renamed.contains(&name) {
                taken.insert(name);
            }
        }

        let mut keep = HashSet::new();
        for name in &self.classes {
            if used.contains(name) || self.preserve.contains(name) {
                keep.insert(name.clone());
            } else if !self.remove_unused {
                keep.insert(name.clone());
                taken.insert(name);
            }
        }

        let mut map = HashMap::new();
        let mut idx = 0;
        for name in renamed {
            let mut new_name = generate_name(idx);
            idx += 1;
            while taken.contains(new_name.as_str()) {
                new_name = generate_name(idx);
                idx += 1;
            }

            map.insert(name.clone(), new_name);
        }

        Some((map, keep))
    }
}

impl Visitor for ClassMinifier<'_> {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        if let Some(element) = doc.element(node) {
            if element.has_attribute("class") {
                self.nodes.push(node);
                for name in element.classes() {
                    if !self.classes.iter().any(|c| c == name) {
                        self.classes.push(name.to_string());
                    }
                }
            }
        }

        Ok(VisitFlow::Continue)
    }

    fn root_exit(&mut self, doc: &mut Document) -> Result<(), VisitError> {
        let (map, keep) = match self.plan() {
            Some(v) => v,
            None => return Ok(()),
        };

        for node in &self.nodes {
            let element = match doc.element_mut(*node) {
                Some(e) => e,
                None => continue,
            };

            let classes: Vec<&str> = element
                .classes()
                .filter(|c| keep.contains(*c))
                .map(|c| map.get(c).map_or(c, |v| v.as_str()))
                .collect();

            if classes.is_empty() {
                element.remove_attribute("class");
            } else {
                let text = classes.join(" ");
                element.set_attribute("class", &text);
            }
        }

        if !map.is_empty() {
            if let Some(mut styles) = self.doc_data.styles_mut() {
                styles.update_class_names(&map);
                styles.write_rules(doc);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;
    use crate::ParamValue;

    #[test]
    fn renames_and_removes() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>.icon-large{fill:red}.unused-rule{fill:blue}</style>\
                    <rect class='icon-large extra'/><circle class='extra'/></svg>";
        assert_eq!(
            apply(&MinifyClassNames, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>.a{fill:red}.unused-rule{fill:blue}</style>\
             <rect class=\"a\"/><circle/></svg>"
        );
    }

    #[test]
    fn swapped_names() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>.b{fill:red}.a{fill:blue}</style>\
                    <rect class='b a'/></svg>";
        assert_eq!(
            apply(&MinifyClassNames, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>.a{fill:red}.b{fill:blue}</style>\
             <rect class=\"a b\"/></svg>"
        );
    }

    #[test]
    fn preserved() {
        let params = Params::new().with("preserve", ParamValue::Str("a".to_string()));
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>.a{fill:red}.long{fill:blue}</style>\
                    <rect class='long a'/></svg>";
        assert_eq!(
            apply(&MinifyClassNames, &params, text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>.a{fill:red}.b{fill:blue}</style>\
             <rect class=\"b a\"/></svg>"
        );
    }

    #[test]
    fn keep_unused() {
        let params = Params::new().with("removeUnused", ParamValue::Bool(false));
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>.long{fill:blue}</style>\
                    <rect class='long a'/></svg>";
        assert_eq!(
            apply(&MinifyClassNames, &params, text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>.b{fill:blue}</style>\
             <rect class=\"b a\"/></svg>"
        );
    }

    #[test]
    fn skipped_on_class_attribute_selector() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>[class~=x]{fill:red}</style><rect class='x y'/></svg>";
        assert_eq!(
            apply(&MinifyClassNames, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>[class~=x]{fill:red}</style><rect class=\"x y\"/></svg>"
        );
    }
}
