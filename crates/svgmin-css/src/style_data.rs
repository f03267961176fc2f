// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

use svgmin_tree::values::{find_func_iris, has_var, rewrite_func_iris};
use svgmin_tree::{names, Declarations, Document, Element, NodeId, NodeKind, NodeType, Value};

use crate::selector::SimpleSelector;
use crate::stylesheet::{parse_stylesheet, write_stylesheet, Rule, RuleSet};
use crate::CssError;

/// A resolved property value.
#[derive(Clone, PartialEq, Debug)]
pub enum PropValue {
    /// A value known statically.
    Static(String),
    /// A value that depends on the rendering context: media queries,
    /// pseudo-classes, `var()` references or geometry properties set by CSS.
    ///
    /// Such values must never be optimized away.
    Dynamic,
}

impl PropValue {
    fn from_text(text: &str) -> Self {
        if has_var(text) {
            PropValue::Dynamic
        } else {
            PropValue::Static(text.trim().to_string())
        }
    }

    /// Returns the value text, unless it is dynamic.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Static(ref s) => Some(s.as_str()),
            PropValue::Dynamic => None,
        }
    }
}

/// Resolved properties of an element.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct ComputedStyle(HashMap<String, PropValue>);

impl ComputedStyle {
    /// Returns a property.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    /// Returns a property text. `None` when the property is not set or is dynamic.
    #[inline]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// Checks that the property is set and is dynamic.
    #[inline]
    pub fn is_dynamic(&self, name: &str) -> bool {
        self.get(name) == Some(&PropValue::Dynamic)
    }

    /// Checks that the property is set.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Sets a property.
    pub fn set(&mut self, name: &str, value: PropValue) {
        self.0.insert(name.to_string(), value);
    }

    /// Returns an iterator over properties in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that no properties are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn inherit_from(&mut self, parent: &ComputedStyle) {
        let explicit: Vec<String> = self
            .0
            .iter()
            .filter(|(_, v)| v.as_str() == Some("inherit"))
            .map(|(k, _)| k.clone())
            .collect();

        for name in explicit {
            match parent.get(&name) {
                Some(value) => {
                    self.0.insert(name, value.clone());
                }
                None => {
                    self.0.remove(&name);
                }
            }
        }

        for (name, value) in &parent.0 {
            if names::is_inheritable(name) && !self.0.contains_key(name) {
                self.0.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Computed styles of elements, shared between queries of a single traversal.
///
/// Must be cleared after any tree mutation that can affect the cascade.
#[derive(Clone, Default, Debug)]
pub struct PropsMemo(HashMap<NodeId, ComputedStyle>);

impl PropsMemo {
    /// Creates an empty memo.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all memoized styles.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// CSS constructs present in the stylesheets.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Features {
    /// `@media`, `@font-face` or `<style media="...">`.
    pub at_rules: bool,
    /// `[name=value]`
    pub attribute_selectors: bool,
    /// Descendant, child or sibling combinators.
    pub combinators: bool,
    /// Pseudo-classes or pseudo-elements.
    pub pseudos: bool,
    /// Plain type, class or id selectors.
    pub simple_selectors: bool,
}

/// `StyleData::minify_styles` options.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MinifyOptions {
    /// Remove rules that cannot match any element of the document.
    ///
    /// Default: true
    pub remove_unused: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        MinifyOptions {
            remove_unused: true,
        }
    }
}

#[derive(Clone, Debug)]
struct Sheet {
    element: NodeId,
    rule_sets: Vec<RuleSet>,
}

#[derive(Clone, Copy, Debug)]
struct RuleRef {
    sheet: usize,
    set: usize,
    rule: usize,
}

#[derive(Clone, Default, Debug)]
struct Derived {
    sorted: Vec<RuleRef>,
    classes: HashSet<String>,
    ids: HashSet<String>,
    attributes: HashSet<String>,
    referenced_ids: HashSet<String>,
    features: Features,
}

impl Derived {
    fn new(sheets: &[Sheet]) -> Self {
        let mut d = Derived::default();
        for (sheet_idx, sheet) in sheets.iter().enumerate() {
            for (set_idx, set) in sheet.rule_sets.iter().enumerate() {
                if set.is_at_rule || set.media.is_some() || !set.font_faces.is_empty() {
                    d.features.at_rules = true;
                }

                for (rule_idx, rule) in set.rules.iter().enumerate() {
                    d.sorted.push(RuleRef {
                        sheet: sheet_idx,
                        set: set_idx,
                        rule: rule_idx,
                    });

                    let selector = &rule.selector;
                    d.features.simple_selectors |= selector.is_simple();
                    d.features.combinators |= selector.has_combinators();
                    d.features.pseudos |= rule.has_pseudos;

                    for s in selector.simple_selectors() {
                        match s {
                            SimpleSelector::Class(ref name) => {
                                d.classes.insert(name.clone());
                            }
                            SimpleSelector::Id(ref id) => {
                                d.ids.insert(id.clone());
                            }
                            SimpleSelector::Attribute(ref attr) => {
                                d.features.attribute_selectors = true;
                                d.attributes.insert(attr.name.clone());
                            }
                            _ => {}
                        }
                    }

                    for (_, decl) in rule.declarations.iter() {
                        for id in find_func_iris(&decl.value) {
                            d.referenced_ids.insert(id.to_string());
                        }
                    }
                }
            }
        }

        // Stable, so equal specificities keep the source order.
        d.sorted
            .sort_by_key(|r| sheets[r.sheet].rule_sets[r.set].rules[r.rule].specificity);
        d
    }
}

/// Parsed `<style>` elements of a document and the cascade over them.
///
/// Derived data (sorted rules, referenced names, features) is computed
/// lazily and dropped by every rule edit.
#[derive(Clone, Debug)]
pub struct StyleData {
    sheets: Vec<Sheet>,
    cache: OnceCell<Derived>,
}

fn is_css_style(element: &Element) -> bool {
    element.is_svg()
        && element.name == "style"
        && matches!(element.attribute_str("type").map(str::trim), None | Some("") | Some("text/css"))
}

impl StyleData {
    /// Parses all `<style>` elements of the document.
    ///
    /// Fails when a stylesheet uses unsupported CSS, or when ids are
    /// duplicated while the stylesheets have id selectors.
    pub fn new(doc: &Document) -> Result<Self, CssError> {
        let mut sheets = Vec::new();
        for node in doc.elements() {
            let element = match doc.element(node) {
                Some(e) if is_css_style(e) => e,
                _ => continue,
            };

            if doc
                .children(node)
                .iter()
                .any(|c| doc.node_type(*c) == NodeType::Element)
            {
                return Err(CssError::InvalidStyleContent);
            }

            let text = doc.text_content(node);
            let rule_sets = parse_stylesheet(&text, element.attribute_str("media"))?;
            sheets.push(Sheet {
                element: node,
                rule_sets,
            });
        }

        let data = StyleData {
            sheets,
            cache: OnceCell::new(),
        };

        if !data.derived().ids.is_empty() {
            let mut seen = HashSet::new();
            for node in doc.elements() {
                if let Some(id) = doc.element(node).and_then(|e| e.id()) {
                    if !seen.insert(id) {
                        return Err(CssError::DuplicateId(id.to_string()));
                    }
                }
            }
        }

        Ok(data)
    }

    fn derived(&self) -> &Derived {
        self.cache.get_or_init(|| Derived::new(&self.sheets))
    }

    fn invalidate(&mut self) {
        self.cache = OnceCell::new();
    }

    fn rule(&self, r: RuleRef) -> &Rule {
        &self.sheets[r.sheet].rule_sets[r.set].rules[r.rule]
    }

    /// Checks that the document has at least one CSS `<style>` element.
    #[inline]
    pub fn has_styles(&self) -> bool {
        !self.sheets.is_empty()
    }

    /// Returns `<style>` elements in document order.
    pub fn style_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.sheets.iter().map(|s| s.element)
    }

    /// Returns all rules sorted by ascending specificity.
    pub fn sorted_rules(&self) -> Vec<&Rule> {
        self.derived().sorted.iter().map(|r| self.rule(*r)).collect()
    }

    /// Returns rules matching an element, sorted by ascending specificity.
    pub fn matching_rules(&self, doc: &Document, node: NodeId) -> Vec<&Rule> {
        let node = doc.node(node);
        self.derived()
            .sorted
            .iter()
            .map(|r| self.rule(*r))
            .filter(|rule| rule.selector.matches(node))
            .collect()
    }

    /// Returns CSS constructs used by stylesheets.
    #[inline]
    pub fn features(&self) -> Features {
        self.derived().features
    }

    /// Checks that stylesheets select elements by an attribute.
    ///
    /// `None` checks for any attribute selector.
    pub fn has_attribute_selector(&self, name: Option<&str>) -> bool {
        match name {
            Some(name) => self.derived().attributes.contains(name),
            None => self.derived().features.attribute_selectors,
        }
    }

    /// Returns class names used by selectors.
    #[inline]
    pub fn referenced_classes(&self) -> &HashSet<String> {
        &self.derived().classes
    }

    /// Checks that a class is used by any selector.
    #[inline]
    pub fn has_class_reference(&self, name: &str) -> bool {
        self.derived().classes.contains(name)
    }

    /// Checks that an id is used by any selector.
    #[inline]
    pub fn has_id_selector(&self, id: &str) -> bool {
        self.derived().ids.contains(id)
    }

    /// Returns ids used by selectors.
    #[inline]
    pub fn id_selectors(&self) -> &HashSet<String> {
        &self.derived().ids
    }

    /// Returns ids referenced by `url(#id)` in declarations.
    #[inline]
    pub fn referenced_ids(&self) -> &HashSet<String> {
        &self.derived().referenced_ids
    }

    /// Resolves properties set on the element itself: presentation attributes,
    /// stylesheet rules and the `style` attribute, in this order of precedence.
    pub fn compute_own_props(&self, doc: &Document, node: NodeId) -> ComputedStyle {
        let inline = doc
            .element(node)
            .and_then(|e| e.attribute("style"))
            .and_then(|v| v.declarations());
        self.compute_own_props_impl(doc, node, inline)
    }

    /// Like [`compute_own_props`](Self::compute_own_props), but uses `style`
    /// instead of the element's `style` attribute.
    pub fn compute_own_props_with_style(
        &self,
        doc: &Document,
        node: NodeId,
        style: &Declarations,
    ) -> ComputedStyle {
        self.compute_own_props_impl(doc, node, Some(style))
    }

    fn compute_own_props_impl(
        &self,
        doc: &Document,
        node: NodeId,
        inline: Option<&Declarations>,
    ) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        let element = match doc.element(node) {
            Some(e) => e,
            None => return style,
        };

        for attr in &element.attributes {
            if names::is_presentation(&attr.name)
                || names::is_geometry_property(&element.name, &attr.name)
            {
                style.set(&attr.name, PropValue::from_text(attr.value.as_str()));
            }
        }

        let important = self.apply_rules(doc, node, &mut style);

        if let Some(inline) = inline {
            for (name, decl) in inline.iter() {
                if !decl.important && important.contains(name) {
                    continue;
                }

                style.set(name, PropValue::from_text(&decl.value));
            }
        }

        style
    }

    /// Resolves properties set on the element by stylesheet rules only.
    pub fn compute_style_element_props(&self, doc: &Document, node: NodeId) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        self.apply_rules(doc, node, &mut style);
        style
    }

    /// Applies matching rules and returns names set by important declarations.
    fn apply_rules(&self, doc: &Document, node: NodeId, style: &mut ComputedStyle) -> HashSet<String> {
        let mut important = HashSet::new();
        let element_name = match doc.element(node) {
            Some(e) => e.name.as_str(),
            None => return important,
        };

        for rule in self.matching_rules(doc, node) {
            let dynamic = rule.is_dynamic();
            for (name, decl) in rule.declarations.iter() {
                if !decl.important && important.contains(name) {
                    continue;
                }

                if decl.important {
                    important.insert(name.to_string());
                }

                let value = if dynamic || names::is_geometry_property(element_name, name) {
                    PropValue::Dynamic
                } else {
                    PropValue::from_text(&decl.value)
                };
                style.set(name, value);
            }
        }

        important
    }

    /// Resolves element properties, including inherited ones.
    pub fn compute_props(&self, doc: &Document, node: NodeId, memo: &mut PropsMemo) -> ComputedStyle {
        let mut style = self.compute_own_props(doc, node);
        match doc.node(node).parent_element() {
            Some(parent) => {
                let parent_style = self.memoized_props(doc, parent.id(), memo);
                style.inherit_from(parent_style);
            }
            None => style.inherit_from(&ComputedStyle::default()),
        }

        style
    }

    /// Resolves properties inherited by children of the innermost ancestor.
    ///
    /// `ancestors` is an element chain, the innermost one last.
    pub fn compute_parent_props(
        &self,
        doc: &Document,
        ancestors: &[NodeId],
        memo: &mut PropsMemo,
    ) -> ComputedStyle {
        match ancestors.last() {
            Some(parent) => self.memoized_props(doc, *parent, memo).clone(),
            None => ComputedStyle::default(),
        }
    }

    fn memoized_props<'m>(&self, doc: &Document, node: NodeId, memo: &'m mut PropsMemo) -> &'m ComputedStyle {
        if !memo.0.contains_key(&node) {
            let style = self.compute_props(doc, node, memo);
            memo.0.insert(node, style);
        }

        &memo.0[&node]
    }

    /// Removes rules for which `f` returns `true`.
    ///
    /// Call [`write_rules`](Self::write_rules) to update the document.
    pub fn delete_rules<F: FnMut(&Rule) -> bool>(&mut self, mut f: F) {
        for sheet in &mut self.sheets {
            for set in &mut sheet.rule_sets {
                set.rules.retain(|r| !f(r));
            }
        }

        self.invalidate();
    }

    /// Writes rules back to their `<style>` elements.
    ///
    /// Elements left without rules are removed from the document.
    pub fn write_rules(&mut self, doc: &mut Document) {
        self.sheets.retain(|sheet| {
            let css = write_stylesheet(&sheet.rule_sets);
            if css.is_empty() {
                doc.detach(sheet.element);
                false
            } else {
                doc.set_text(sheet.element, &css);
                true
            }
        });

        self.invalidate();
    }

    /// Renames classes in selectors.
    ///
    /// Call [`write_rules`](Self::write_rules) to update the document.
    pub fn update_class_names(&mut self, map: &HashMap<String, String>) {
        self.for_each_rule_mut(|rule| {
            rule.selector.visit_simple_mut(&mut |s: &mut SimpleSelector| {
                if let SimpleSelector::Class(ref mut name) = s {
                    if let Some(new) = map.get(name.as_str()) {
                        *name = new.clone();
                    }
                }
            });
        });

        self.invalidate();
    }

    /// Renames ids in selectors and in `url(#id)` references of declarations.
    ///
    /// Call [`write_rules`](Self::write_rules) to update the document.
    pub fn update_referenced_ids(&mut self, map: &HashMap<String, String>) {
        self.for_each_rule_mut(|rule| {
            rule.selector.visit_simple_mut(&mut |s: &mut SimpleSelector| {
                if let SimpleSelector::Id(ref mut id) = s {
                    if let Some(new) = map.get(id.as_str()) {
                        *id = new.clone();
                    }
                }
            });

            for (_, decl) in rule.declarations.iter_mut() {
                if let Some(value) = rewrite_func_iris(&decl.value, |id| map.get(id).cloned()) {
                    decl.value = value;
                }
            }
        });

        self.invalidate();
    }

    fn for_each_rule_mut<F: FnMut(&mut Rule)>(&mut self, mut f: F) {
        for sheet in &mut self.sheets {
            for set in &mut sheet.rule_sets {
                for rule in &mut set.rules {
                    f(rule);
                }
            }
        }
    }

    /// Moves all stylesheets into the first `<style>` element.
    ///
    /// Stylesheets with a `media` attribute are wrapped into `@media`.
    /// Returns `false` when there was nothing to merge.
    pub fn merge_styles(&mut self, doc: &mut Document) -> bool {
        if self.sheets.len() < 2 {
            return false;
        }

        let mut merged = Vec::new();
        for sheet in &mut self.sheets {
            for mut set in sheet.rule_sets.drain(..) {
                if set.media.is_some() {
                    set.is_at_rule = true;
                }
                merged.push(set);
            }
        }

        for sheet in self.sheets.drain(1..) {
            doc.detach(sheet.element);
        }

        let first = &mut self.sheets[0];
        first.rule_sets = merged;
        if let Some(element) = doc.element_mut(first.element) {
            element.remove_attribute("media");
        }

        log::debug!("Merged style elements.");
        self.write_rules(doc);
        true
    }

    /// Minifies declaration values and removes empty rules.
    ///
    /// With `remove_unused`, also removes rules whose selector requires a class,
    /// an id or an element type that is not present in the document.
    pub fn minify_styles(&mut self, doc: &mut Document, opt: MinifyOptions) {
        let mut classes = HashSet::new();
        let mut ids = HashSet::new();
        let mut types = HashSet::new();
        if opt.remove_unused {
            for node in doc.elements() {
                if let Some(element) = doc.element(node) {
                    types.insert(element.name.clone());
                    classes.extend(element.classes().map(str::to_string));
                    if let Some(id) = element.id() {
                        ids.insert(id.to_string());
                    }
                }
            }
        }

        for sheet in &mut self.sheets {
            for set in &mut sheet.rule_sets {
                for rule in &mut set.rules {
                    rule.declarations.minify_values();
                }

                set.rules.retain(|rule| {
                    if rule.declarations.is_empty() {
                        return false;
                    }

                    if opt.remove_unused {
                        let s = &rule.selector;
                        if s.required_classes().any(|c| !classes.contains(c))
                            || s.required_ids().any(|id| !ids.contains(id))
                            || s.required_types().any(|t| !types.contains(t))
                        {
                            log::debug!("Removed unused rule '{}'.", s);
                            return false;
                        }
                    }

                    true
                });
            }
        }

        self.write_rules(doc);
    }

    /// Appends CSS to the last `<style>` element.
    ///
    /// When there are no styles or the last `<style>` element has a `media`
    /// attribute, a new element is inserted after it, so the added rules
    /// always go last in the cascade.
    pub fn add_style_section(&mut self, doc: &mut Document, css: &str) -> Result<(), CssError> {
        let rule_sets = parse_stylesheet(css, None)?;

        let last_plain = self.sheets.last_mut().filter(|sheet| {
            doc.element(sheet.element)
                .map_or(false, |e| !e.has_attribute("media"))
        });

        match last_plain {
            Some(sheet) => sheet.rule_sets.extend(rule_sets),
            None => {
                let (parent, index) = match self.sheets.last() {
                    Some(sheet) => match (doc.parent(sheet.element), doc.index_in_parent(sheet.element)) {
                        (Some(parent), Some(idx)) => (parent, idx + 1),
                        _ => return Ok(()),
                    },
                    None => match doc.root_element() {
                        Some(root) => (root, 0),
                        None => return Ok(()),
                    },
                };

                let element = doc.insert(parent, index, NodeKind::Element(Element::new("style")));
                self.sheets.push(Sheet { element, rule_sets });
            }
        }

        self.write_rules(doc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Document, StyleData) {
        let doc = Document::parse(text).unwrap();
        let styles = StyleData::new(&doc).unwrap();
        (doc, styles)
    }

    fn by_id(doc: &Document, id: &str) -> NodeId {
        doc.elements()
            .find(|n| doc.element(*n).and_then(|e| e.id()) == Some(id))
            .unwrap()
    }

    fn own_props(text: &str) -> ComputedStyle {
        let (doc, styles) = parse(text);
        styles.compute_own_props(&doc, by_id(&doc, "target"))
    }

    fn style_texts(doc: &Document) -> Vec<String> {
        doc.elements()
            .filter(|n| doc.is_element_named(*n, "style"))
            .map(|n| doc.text_content(n))
            .collect()
    }

    #[test]
    fn rule_overrides_presentation_attribute() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>rect{fill:red}</style>
                <rect id='target' fill='blue'/>
            </svg>",
        );
        assert_eq!(style.value("fill"), Some("red"));
    }

    #[test]
    fn style_attribute_overrides_rule() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.a{fill:red}</style>
                <rect id='target' class='a' style='fill:blue'/>
            </svg>",
        );
        assert_eq!(style.value("fill"), Some("blue"));
    }

    #[test]
    fn important_rule_overrides_style_attribute() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.a{fill:red!important}</style>
                <rect id='target' class='a' style='fill:blue'/>
            </svg>",
        );
        assert_eq!(style.value("fill"), Some("red"));
    }

    #[test]
    fn important_rule_overrides_specificity() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>rect{fill:red!important} #target{fill:blue}</style>
                <rect id='target'/>
            </svg>",
        );
        assert_eq!(style.value("fill"), Some("red"));
    }

    #[test]
    fn important_style_attribute_overrides_important_rule() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>#target{fill:red!important}</style>
                <rect id='target' style='fill:blue!important'/>
            </svg>",
        );
        assert_eq!(style.value("fill"), Some("blue"));
    }

    #[test]
    fn style_override() {
        let (doc, styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>rect{stroke:red} .a{fill:red!important}</style>
                <rect id='target' class='a' fill='green' style='stroke:blue;opacity:.5'/>
            </svg>",
        );
        let node = by_id(&doc, "target");
        let style = styles.compute_own_props_with_style(
            &doc,
            node,
            &Declarations::parse_block("stroke:yellow;fill:blue"),
        );
        assert_eq!(style.value("stroke"), Some("yellow"));
        assert_eq!(style.value("fill"), Some("red"));
        assert_eq!(style.value("opacity"), None);
    }

    #[test]
    fn var_in_rule_is_dynamic() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>rect{fill:var(--main, red);stroke:red}</style>
                <rect id='target'/>
            </svg>",
        );
        assert!(style.is_dynamic("fill"));
        assert_eq!(style.value("fill"), None);
        assert_eq!(style.value("stroke"), Some("red"));
    }

    #[test]
    fn specificity_wins_over_source_order() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>#target{fill:red} .cls{fill:blue}</style>
                <rect id='target' class='cls'/>
            </svg>",
        );
        assert_eq!(style.value("fill"), Some("red"));
    }

    #[test]
    fn source_order_breaks_ties() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.a{fill:red} .b{fill:blue}</style>
                <style>.a{stroke:red}</style>
                <rect id='target' class='b a'/>
            </svg>",
        );
        assert_eq!(style.value("fill"), Some("blue"));
        assert_eq!(style.value("stroke"), Some("red"));
    }

    #[test]
    fn media_values_are_dynamic() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>@media (min-width: 10px) { rect{fill:red} }</style>
                <rect id='target'/>
            </svg>",
        );
        assert!(style.is_dynamic("fill"));
        assert_eq!(style.value("fill"), None);
    }

    #[test]
    fn style_media_attribute_values_are_dynamic() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style media='print'>rect{fill:red}</style>
                <rect id='target'/>
            </svg>",
        );
        assert!(style.is_dynamic("fill"));
    }

    #[test]
    fn pseudo_class_values_are_dynamic() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>rect:hover{fill:red}</style>
                <rect id='target' fill='blue'/>
            </svg>",
        );
        assert!(style.is_dynamic("fill"));
    }

    #[test]
    fn var_values_are_dynamic() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <rect id='target' style='fill:var(--color)'/>
            </svg>",
        );
        assert!(style.is_dynamic("fill"));
    }

    #[test]
    fn geometry_properties() {
        let style = own_props(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>rect{width:10px}</style>
                <rect id='target' x='5' height='20'/>
            </svg>",
        );
        assert_eq!(style.value("x"), Some("5"));
        assert!(style.is_dynamic("width"));
    }

    #[test]
    fn style_element_props() {
        let (doc, styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.a{fill:red}</style>
                <rect id='target' class='a' stroke='blue' style='opacity:.5'/>
            </svg>",
        );
        let style = styles.compute_style_element_props(&doc, by_id(&doc, "target"));
        assert_eq!(style.len(), 1);
        assert_eq!(style.value("fill"), Some("red"));
    }

    #[test]
    fn inheritance() {
        let (doc, styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>g{stroke:green}</style>
                <g fill='red' opacity='.5'>
                    <g>
                        <rect id='target' stroke='inherit'/>
                    </g>
                </g>
            </svg>",
        );
        let mut memo = PropsMemo::new();
        let style = styles.compute_props(&doc, by_id(&doc, "target"), &mut memo);
        assert_eq!(style.value("fill"), Some("red"));
        assert_eq!(style.value("stroke"), Some("green"));
        assert!(!style.contains("opacity"));
    }

    #[test]
    fn parent_props() {
        let (doc, styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <g id='g' fill='red'><rect id='target'/></g>
            </svg>",
        );
        let ancestors = [doc.root_element().unwrap(), by_id(&doc, "g")];
        let mut memo = PropsMemo::new();
        let style = styles.compute_parent_props(&doc, &ancestors, &mut memo);
        assert_eq!(style.value("fill"), Some("red"));
        assert_eq!(styles.compute_parent_props(&doc, &[], &mut memo), ComputedStyle::default());
    }

    #[test]
    fn duplicate_ids() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>
            <style>#a{fill:red}</style>
            <rect id='a'/><rect id='a'/>
        </svg>";
        let doc = Document::parse(text).unwrap();
        assert_eq!(StyleData::new(&doc).unwrap_err(), CssError::DuplicateId("a".to_string()));

        let text = "<svg xmlns='http://www.w3.org/2000/svg'>
            <style>.a{fill:red}</style>
            <rect id='a'/><rect id='a'/>
        </svg>";
        let doc = Document::parse(text).unwrap();
        assert!(StyleData::new(&doc).is_ok());
    }

    #[test]
    fn invalid_style_content() {
        let doc = Document::parse(
            "<svg xmlns='http://www.w3.org/2000/svg'><style><g/></style></svg>",
        )
        .unwrap();
        assert_eq!(StyleData::new(&doc).unwrap_err(), CssError::InvalidStyleContent);
    }

    #[test]
    fn non_css_styles_are_ignored() {
        let (_, styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style type='text/less'>@import 'a';</style>
            </svg>",
        );
        assert!(!styles.has_styles());
    }

    #[test]
    fn queries() {
        let (_, styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>
                    .a{fill:url(#grad)}
                    g > :not(.b){fill:red}
                    [data-x]{fill:blue}
                    #c{mask:url(#m)}
                </style>
            </svg>",
        );

        let features = styles.features();
        assert!(features.simple_selectors);
        assert!(features.combinators);
        assert!(features.pseudos);
        assert!(features.attribute_selectors);
        assert!(!features.at_rules);

        assert!(styles.has_class_reference("a"));
        assert!(styles.has_class_reference("b"));
        assert!(styles.has_id_selector("c"));
        assert!(styles.has_attribute_selector(None));
        assert!(styles.has_attribute_selector(Some("data-x")));
        assert!(!styles.has_attribute_selector(Some("fill")));
        assert!(styles.referenced_ids().contains("grad"));
        assert!(styles.referenced_ids().contains("m"));
    }

    #[test]
    fn sorted_rules() {
        let (_, styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>#a{fill:red} .b{fill:red} c{fill:red} .d{fill:red}</style>
            </svg>",
        );
        let order: Vec<String> = styles
            .sorted_rules()
            .iter()
            .map(|r| r.selector.to_string())
            .collect();
        assert_eq!(order, ["c", ".b", ".d", "#a"]);
    }

    #[test]
    fn delete_and_write_rules() {
        let (mut doc, mut styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.a{fill:red} .b{fill:blue}</style>
                <style>.c{fill:red}</style>
            </svg>",
        );
        styles.delete_rules(|r| r.selector.to_string() != ".a");
        styles.write_rules(&mut doc);
        assert_eq!(style_texts(&doc), [".a{fill:red}"]);
        assert_eq!(styles.sorted_rules().len(), 1);
    }

    #[test]
    fn update_names() {
        let (mut doc, mut styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.long{fill:url(#gradient)} #gradient:not(.long){fill:red}</style>
            </svg>",
        );

        let mut classes = HashMap::new();
        classes.insert("long".to_string(), "a".to_string());
        styles.update_class_names(&classes);
        assert!(styles.has_class_reference("a"));
        assert!(!styles.has_class_reference("long"));

        let mut ids = HashMap::new();
        ids.insert("gradient".to_string(), "b".to_string());
        styles.update_referenced_ids(&ids);
        assert!(styles.referenced_ids().contains("b"));

        styles.write_rules(&mut doc);
        assert_eq!(style_texts(&doc), [".a{fill:url(#b)}#b:not(.a){fill:red}"]);
    }

    #[test]
    fn merge_styles() {
        let (mut doc, mut styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>.a{fill:red}</style>
                <g><style media='print'>.b{fill:blue}</style></g>
                <style>.c{fill:green}</style>
            </svg>",
        );
        assert!(styles.merge_styles(&mut doc));
        assert_eq!(
            style_texts(&doc),
            [".a{fill:red}@media print{.b{fill:blue}}.c{fill:green}"]
        );
        assert!(!styles.merge_styles(&mut doc));

        // The merged text must parse to the same cascade.
        let reparsed = StyleData::new(&doc).unwrap();
        assert_eq!(reparsed.sorted_rules().len(), 3);
        assert!(reparsed.features().at_rules);
    }

    #[test]
    fn merge_into_style_with_media() {
        let (mut doc, mut styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style media='screen'>.a{fill:red}</style>
                <style>.b{fill:blue}</style>
            </svg>",
        );
        assert!(styles.merge_styles(&mut doc));
        assert_eq!(style_texts(&doc), ["@media screen{.a{fill:red}}.b{fill:blue}"]);
        let style = styles.style_elements().next().unwrap();
        assert!(!doc.element(style).unwrap().has_attribute("media"));
    }

    #[test]
    fn minify_styles() {
        let (mut doc, mut styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>
                <style>
                    .a { fill: #ff0000; stroke-width: 1.50 }
                    .unused { fill: red }
                    #missing, circle { fill: red }
                    rect { }
                    rect { fill: blue }
                </style>
                <rect class='a'/>
            </svg>",
        );
        styles.minify_styles(&mut doc, MinifyOptions::default());
        assert_eq!(style_texts(&doc), [".a{fill:red;stroke-width:1.5}rect{fill:#00f}"]);
    }

    #[test]
    fn minify_removes_empty_style() {
        let (mut doc, mut styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'><style>.x{fill:red}</style></svg>",
        );
        styles.minify_styles(&mut doc, MinifyOptions::default());
        assert!(style_texts(&doc).is_empty());
        assert!(!styles.has_styles());
    }

    #[test]
    fn add_style_section() {
        let (mut doc, mut styles) = parse("<svg xmlns='http://www.w3.org/2000/svg'><rect/></svg>");
        styles.add_style_section(&mut doc, ".a{fill:red}").unwrap();
        assert_eq!(style_texts(&doc), [".a{fill:red}"]);
        let root = doc.root_element().unwrap();
        assert!(doc.is_element_named(doc.children(root)[0], "style"));

        styles.add_style_section(&mut doc, ".b{fill:blue}").unwrap();
        assert_eq!(style_texts(&doc), [".a{fill:red}.b{fill:blue}"]);
        assert_eq!(styles.sorted_rules().len(), 2);
    }

    #[test]
    fn add_style_section_after_media() {
        let (mut doc, mut styles) = parse(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
             <style>.a{fill:red}</style><style media='print'>.b{fill:red}</style><rect/></svg>",
        );
        styles.add_style_section(&mut doc, ".c{fill:blue}").unwrap();
        let root = doc.root_element().unwrap();
        let added = doc.children(root)[2];
        assert!(doc.is_element_named(added, "style"));
        assert!(!doc.element(added).unwrap().has_attribute("media"));
        assert_eq!(doc.text_content(added), ".c{fill:blue}");
        assert_eq!(styles.sorted_rules().len(), 3);
    }
}
