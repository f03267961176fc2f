// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{HashMap, HashSet};

use svgmin_tree::values::rewrite_func_iris;
use svgmin_tree::{Document, NodeId, Value, VisitError, VisitFlow, Visitor, XLINK_NS};

use super::{generate_name, local_href, referenced_ids};
use crate::{DocData, Params, Plugin, PluginInfo};

/// Removes unreferenced ids and shortens referenced ones.
///
/// References in attributes and in stylesheets are updated accordingly.
///
/// Parameters:
///
/// - `remove`: remove unreferenced ids. Default: true
/// - `minify`: rename referenced ids to the shortest possible names. Default: true
/// - `preserve`: a list of ids to keep as is
/// - `preservePrefixes`: a list of id prefixes to keep as is
#[derive(Clone, Copy, Debug)]
pub struct CleanupIds;

impl Plugin for CleanupIds {
    fn name(&self) -> &str {
        "cleanupIds"
    }

    fn create<'a>(&self, info: &PluginInfo<'a>, params: &Params) -> Option<Box<dyn Visitor + 'a>> {
        let doc_data = info.doc_data;
        // Animations can reference ids through `begin`/`end` timing values.
        if !doc_data.can_use_styles() || doc_data.has_animations() {
            return None;
        }

        if doc_data.styles()?.has_attribute_selector(Some("id")) {
            return None;
        }

        Some(Box::new(IdCleaner {
            doc_data,
            remove: params.bool("remove", true),
            minify: params.bool("minify", true),
            preserve: params.list("preserve").into_iter().collect(),
            preserve_prefixes: params.list("preservePrefixes"),
            ids: Vec::new(),
            references: HashSet::new(),
        }))
    }
}

struct IdCleaner<'a> {
    doc_data: &'a DocData,
    remove: bool,
    minify: bool,
    preserve: HashSet<String>,
    preserve_prefixes: Vec<String>,
    ids: Vec<(NodeId, String)>,
    references: HashSet<String>,
}

impl IdCleaner<'_> {
    fn is_preserved(&self, id: &str) -> bool {
        self.preserve.contains(id)
            || self.preserve_prefixes.iter().any(|p| id.starts_with(p.as_str()))
    }

    /// Decides what happens to each id: `None` removes it, a new name renames it.
    /// Ids missing from the map stay as is.
    fn plan(&self) -> HashMap<NodeId, Option<String>> {
        let mut count: HashMap<&str, usize> = HashMap::new();
        for (_, id) in &self.ids {
            *count.entry(id.as_str()).or_default() += 1;
        }

        for (id, n) in &count {
            if *n > 1 {
                log::warn!("Element ID '{}' is used {} times. Kept as is.", id, n);
            }
        }

        let styles = match self.doc_data.styles() {
            Some(v) => v,
            None => return HashMap::new(),
        };

        let is_referenced = |id: &str| {
            self.references.contains(id)
                || styles.referenced_ids().contains(id)
                || styles.has_id_selector(id)
        };

        let is_fixed = |id: &str| self.is_preserved(id) || count.get(id).map_or(false, |n| *n > 1);

        // Names that must not be taken by renamed ids.
        // References that point nowhere must stay unresolved.
        let existing: HashSet<&str> = self.ids.iter().map(|(_, id)| id.as_str()).collect();
        let mut taken: HashSet<String> = self
            .references
            .iter()
            .chain(styles.referenced_ids())
            .chain(styles.id_selectors())
            .filter(|id| !existing.contains(id.as_str()))
            .cloned()
            .collect();
        for (_, id) in &self.ids {
            let id = id.as_str();
            let kept = is_fixed(id)
                || (is_referenced(id) && !self.minify)
                || (!is_referenced(id) && !self.remove);
            if kept {
                taken.insert(id.to_string());
            }
        }

        let mut plan = HashMap::new();
        let mut renamed: HashMap<&str, String> = HashMap::new();
        let mut idx = 0;
        for (node, id) in &self.ids {
            let id = id.as_str();
            if is_fixed(id) {
                continue;
            }

            if !is_referenced(id) {
                if self.remove {
                    plan.insert(*node, None);
                }
                continue;
            }

            if !self.minify {
                continue;
            }

            let new_id = match renamed.get(id) {
                Some(v) => v.clone(),
                None => {
                    let mut name = generate_name(idx);
                    idx += 1;
                    while taken.contains(&name) {
                        name = generate_name(idx);
                        idx += 1;
                    }
                    renamed.insert(id, name.clone());
                    name
                }
            };

            if new_id != id {
                plan.insert(*node, Some(new_id));
            }
        }

        plan
    }
}

impl Visitor for IdCleaner<'_> {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        if let Some(element) = doc.element(node) {
            if let Some(id) = element.id() {
                self.ids.push((node, id.to_string()));
            }

            self.references.extend(referenced_ids(element));
        }

        Ok(VisitFlow::Continue)
    }

    fn root_exit(&mut self, doc: &mut Document) -> Result<(), VisitError> {
        // A document with nothing but definitions is a sprite sheet.
        if let Some(root) = doc.root_element() {
            let mut children = doc.node(root).children().filter(|n| n.is_element()).peekable();
            if children.peek().is_some() && children.all(|n| n.has_tag_name("defs")) {
                return Ok(());
            }
        }

        let plan = self.plan();
        if plan.is_empty() {
            return Ok(());
        }

        let mut map = HashMap::new();
        for (node, id) in &self.ids {
            let element = match doc.element_mut(*node) {
                Some(e) => e,
                None => continue,
            };

            match plan.get(node) {
                Some(Some(new_id)) => {
                    element.set_attribute("id", new_id);
                    map.insert(id.clone(), new_id.clone());
                }
                Some(None) => {
                    element.remove_attribute("id");
                }
                None => {}
            }
        }

        if map.is_empty() {
            return Ok(());
        }

        let nodes: Vec<NodeId> = doc.elements().collect();
        for node in nodes {
            if let Some(element) = doc.element_mut(node) {
                rename_references(element, &map);
            }
        }

        if let Some(mut styles) = self.doc_data.styles_mut() {
            styles.update_referenced_ids(&map);
            styles.write_rules(doc);
        }

        Ok(())
    }
}

fn rename_references(element: &mut svgmin_tree::Element, map: &HashMap<String, String>) {
    let mut updates = Vec::new();
    for attr in &element.attributes {
        let value = attr.value.as_str();
        if attr.name == "href" {
            if let Some(new_id) = local_href(value).and_then(|id| map.get(id)) {
                updates.push((attr.name.clone(), format!("#{}", new_id)));
            }
            continue;
        }

        if let Some(text) = rewrite_func_iris(value, |id| map.get(id).cloned()) {
            updates.push((attr.name.clone(), text));
        }
    }

    for (name, text) in updates {
        element.set_attribute(&name, &text);
    }

    for attr in &mut element.foreign {
        if attr.local == "href" && attr.uri.as_deref() == Some(XLINK_NS) {
            if let Some(new_id) = local_href(&attr.value).and_then(|id| map.get(id)) {
                attr.value = format!("#{}", new_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::apply;
    use crate::ParamValue;

    #[test]
    fn minifies_and_removes() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <defs><linearGradient id='gradient'/></defs>\
                    <rect id='unused' fill='url(#gradient)'/>\
                    <use href='#gradient'/></svg>";
        assert_eq!(
            apply(&CleanupIds, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <defs><linearGradient id=\"a\"/></defs>\
             <rect fill=\"url(#a)\"/>\
             <use href=\"#a\"/></svg>"
        );
    }

    #[test]
    fn updates_stylesheets() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>#target{fill:red}rect{clip-path:url(#clip)}</style>\
                    <clipPath id='clip'/><rect id='target'/></svg>";
        assert_eq!(
            apply(&CleanupIds, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>#b{fill:red}rect{clip-path:url(#a)}</style>\
             <clipPath id=\"a\"/><rect id=\"b\"/></svg>"
        );
    }

    #[test]
    fn xlink_href() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg' \
                    xmlns:xlink='http://www.w3.org/1999/xlink'>\
                    <path id='path'/><use xlink:href='#path'/></svg>";
        assert_eq!(
            apply(&CleanupIds, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             xmlns:xlink=\"http://www.w3.org/1999/xlink\">\
             <path id=\"a\"/><use xlink:href=\"#a\"/></svg>"
        );
    }

    #[test]
    fn preserved_names_are_not_reused() {
        let params = Params::new()
            .with("preserve", ParamValue::Str("a".to_string()))
            .with("preservePrefixes", ParamValue::Str("icon-".to_string()));
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <g id='a'/><g id='icon-home'/><g id='long'/><use href='#long'/></svg>";
        assert_eq!(
            apply(&CleanupIds, &params, text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <g id=\"a\"/><g id=\"icon-home\"/><g id=\"b\"/><use href=\"#b\"/></svg>"
        );
    }

    #[test]
    fn dangling_references_are_not_reused() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>#b{fill:red}</style>\
                    <path id='long' d='M0 0h5'/><use href='#long'/>\
                    <use href='#a' fill='red'/></svg>";
        assert_eq!(
            apply(&CleanupIds, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>#b{fill:red}</style>\
             <path id=\"c\" d=\"M0 0h5\"/><use href=\"#c\"/>\
             <use href=\"#a\" fill=\"red\"/></svg>"
        );
    }

    #[test]
    fn keeps_ids_without_minify_and_remove() {
        let params = Params::new()
            .with("remove", ParamValue::Bool(false))
            .with("minify", ParamValue::Bool(false));
        let text = "<svg xmlns='http://www.w3.org/2000/svg'><g id='x'/><use href='#y'/></svg>";
        assert_eq!(
            apply(&CleanupIds, &params, text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><g id=\"x\"/><use href=\"#y\"/></svg>"
        );
    }

    #[test]
    fn skipped_on_id_attribute_selector() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                    <style>[id^=icon]{fill:red}</style><g id='icon'/></svg>";
        assert_eq!(
            apply(&CleanupIds, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\
             <style>[id^=icon]{fill:red}</style><g id=\"icon\"/></svg>"
        );
    }

    #[test]
    fn skipped_on_sprite_sheet() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'><defs><g id='icon'/></defs></svg>";
        assert_eq!(
            apply(&CleanupIds, &Params::new(), text),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><defs><g id=\"icon\"/></defs></svg>"
        );
    }
}
