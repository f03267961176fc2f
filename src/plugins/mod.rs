// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Built-in plugins.

use std::rc::Rc;

use svgmin_tree::values::find_func_iris;
use svgmin_tree::{Document, Element, NodeId, Value, XLINK_NS};

use crate::Plugin;

mod cleanup_ids;
mod convert_colors;
mod merge_styles;
mod minify_class_names;
mod minify_styles;
mod minify_values;
mod remove_comments;
mod remove_doctype;
mod remove_empty_containers;
mod remove_empty_text;
mod remove_hidden_elems;
mod remove_metadata;
mod remove_unknowns_and_defaults;
mod remove_useless_stroke_and_fill;
mod remove_xml_proc_inst;

pub use cleanup_ids::CleanupIds;
pub use convert_colors::ConvertColors;
pub use merge_styles::MergeStyles;
pub use minify_class_names::MinifyClassNames;
pub use minify_styles::MinifyStyles;
pub use minify_values::MinifyValues;
pub use remove_comments::RemoveComments;
pub use remove_doctype::RemoveDoctype;
pub use remove_empty_containers::RemoveEmptyContainers;
pub use remove_empty_text::RemoveEmptyText;
pub use remove_hidden_elems::RemoveHiddenElems;
pub use remove_metadata::RemoveMetadata;
pub use remove_unknowns_and_defaults::RemoveUnknownsAndDefaults;
pub use remove_useless_stroke_and_fill::RemoveUselessStrokeAndFill;
pub use remove_xml_proc_inst::RemoveXmlProcInst;

/// Plugins that run by default, in order.
pub const DEFAULT_PRESET: &[&str] = &[
    "removeDoctype",
    "removeXMLProcInst",
    "removeComments",
    "removeMetadata",
    "mergeStyles",
    "minifyStyles",
    "cleanupIds",
    "convertColors",
    "minifyValues",
    "removeUnknownsAndDefaults",
    "removeUselessStrokeAndFill",
    "removeHiddenElems",
    "removeEmptyText",
    "removeEmptyContainers",
];

/// Returns all built-in plugins.
pub fn registry() -> Vec<Rc<dyn Plugin>> {
    vec![
        Rc::new(RemoveDoctype),
        Rc::new(RemoveXmlProcInst),
        Rc::new(RemoveComments),
        Rc::new(RemoveMetadata),
        Rc::new(MergeStyles),
        Rc::new(MinifyStyles),
        Rc::new(CleanupIds),
        Rc::new(ConvertColors),
        Rc::new(MinifyValues),
        Rc::new(RemoveUnknownsAndDefaults),
        Rc::new(RemoveUselessStrokeAndFill),
        Rc::new(RemoveHiddenElems),
        Rc::new(RemoveEmptyText),
        Rc::new(RemoveEmptyContainers),
        Rc::new(MinifyClassNames),
    ]
}

/// Finds a built-in plugin by name.
pub fn find(name: &str) -> Option<Rc<dyn Plugin>> {
    registry().into_iter().find(|p| p.name() == name)
}

/// Returns ids referenced by the element attributes:
/// `url(#id)` in any value and `#id` in `href` and `xlink:href`.
pub(crate) fn referenced_ids(element: &Element) -> Vec<String> {
    let mut ids = Vec::new();
    for attr in &element.attributes {
        let value = attr.value.as_str();
        if attr.name == "href" {
            if let Some(id) = local_href(value) {
                ids.push(id.to_string());
            }
        }

        ids.extend(find_func_iris(value).into_iter().map(str::to_string));
    }

    for attr in &element.foreign {
        if attr.local == "href" && attr.uri.as_deref() == Some(XLINK_NS) {
            if let Some(id) = local_href(&attr.value) {
                ids.push(id.to_string());
            }
        }
    }

    ids
}

/// Returns an id of a local `#id` reference.
pub(crate) fn local_href(text: &str) -> Option<&str> {
    let id = text.trim().strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Checks that an element is inside a subtree that can be instantiated by `use`,
/// where inherited values come from the `use` element instead.
///
/// The root element is not checked.
pub(crate) fn in_reusable_subtree(doc: &Document, ancestors: &[NodeId]) -> bool {
    ancestors.iter().skip(1).any(|id| {
        doc.element(*id)
            .map_or(false, |e| e.id().is_some() || e.has_name("symbol"))
    })
}

/// Generates the `n`-th shortest name: `a`...`z`, `A`...`Z`, `aa`, `ab` and so on.
pub(crate) fn generate_name(mut n: usize) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let base = CHARS.len();
    let mut name = Vec::new();
    loop {
        name.push(CHARS[n % base]);
        if n < base {
            break;
        }
        n = n / base - 1;
    }

    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Parses a numeric value and checks that it is zero. Units are ignored.
pub(crate) fn is_zero(text: &str) -> bool {
    let number = text
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    number.parse::<f64>().map_or(false, |n| n == 0.0)
}

/// Runs a single plugin once and writes the result.
#[cfg(test)]
pub(crate) fn apply(plugin: &dyn Plugin, params: &crate::Params, text: &str) -> String {
    let mut doc = svgmin_tree::Document::parse(text).unwrap();
    let data = crate::DocData::new(&doc);
    let info = crate::PluginInfo {
        pass: 1,
        path: None,
        doc_data: &data,
    };

    if let Some(mut visitor) = plugin.create(&info, params) {
        svgmin_tree::traverse(&mut doc, visitor.as_mut()).unwrap();
    }

    doc.to_string(&svgmin_tree::WriteOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $n:expr, $result:expr) => {
            #[test]
            fn $name() {
                assert_eq!(generate_name($n), $result);
            }
        };
    }

    test!(name_first, 0, "a");
    test!(name_upper, 26, "A");
    test!(name_last_single, 51, "Z");
    test!(name_first_double, 52, "aa");
    test!(name_second_double, 53, "ab");
    test!(name_after_az, 104, "ba");

    #[test]
    fn registry_is_complete() {
        for name in DEFAULT_PRESET {
            assert!(find(name).is_some(), "{}", name);
        }
        assert!(find("minifyClassNames").is_some());
    }

    #[test]
    fn zero() {
        assert!(is_zero("0"));
        assert!(is_zero(" 0px"));
        assert!(is_zero("0.0%"));
        assert!(!is_zero("1e-3"));
        assert!(!is_zero("auto"));
    }

    #[test]
    fn references() {
        let mut element = Element::new("use");
        element.set_attribute("href", "#a");
        element.set_attribute("fill", "url(#b) red");
        element.set_attribute("style", "mask:url(#c);clip-path:url('#d')");
        assert_eq!(referenced_ids(&element), ["a", "b", "c", "d"]);
    }
}
