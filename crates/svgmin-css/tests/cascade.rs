use svgmin_css::{CssError, PropValue, PropsMemo, StyleData};
use svgmin_tree::{Document, NodeId};

fn find(doc: &Document, name: &str) -> NodeId {
    doc.elements()
        .find(|n| doc.element(*n).map_or(false, |e| e.name == name))
        .unwrap()
}

fn resolve(svg: &str, element: &str, prop: &str) -> Option<PropValue> {
    let doc = Document::parse(svg).unwrap();
    let styles = StyleData::new(&doc).unwrap();
    let node = find(&doc, element);
    styles.compute_own_props(&doc, node).get(prop).cloned()
}

fn static_value(s: &str) -> Option<PropValue> {
    Some(PropValue::Static(s.to_string()))
}

#[test]
fn rule_overrides_presentation_attribute() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'>\
               <style>rect{fill:red}</style><rect fill='blue'/></svg>";
    assert_eq!(resolve(svg, "rect", "fill"), static_value("red"));
}

#[test]
fn style_attribute_overrides_class_rule() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'>\
               <style>.a{fill:red}</style><rect class='a' fill='green' style='fill:blue'/></svg>";
    assert_eq!(resolve(svg, "rect", "fill"), static_value("blue"));
}

#[test]
fn important_overrides_style_attribute() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'>\
               <style>.a{fill:red!important}</style><rect class='a' style='fill:blue'/></svg>";
    assert_eq!(resolve(svg, "rect", "fill"), static_value("red"));
}

#[test]
fn id_rule_wins_regardless_of_order() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'>\
               <style>#r{fill:red}.cls{fill:blue}</style><rect id='r' class='cls'/></svg>";
    assert_eq!(resolve(svg, "rect", "fill"), static_value("red"));
}

#[test]
fn media_values_are_unknown() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'>\
               <style>@media (min-width: 10px){rect{fill:red}}</style><rect fill='blue'/></svg>";
    assert_eq!(resolve(svg, "rect", "fill"), Some(PropValue::Dynamic));
}

#[test]
fn inherited_values() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'>\
               <style>g{stroke:red;opacity:.5}</style><g><rect/></g></svg>";
    let doc = Document::parse(svg).unwrap();
    let styles = StyleData::new(&doc).unwrap();
    let mut memo = PropsMemo::new();
    let props = styles.compute_props(&doc, find(&doc, "rect"), &mut memo);
    assert_eq!(props.value("stroke"), Some("red"));
    assert!(!props.contains("opacity"));
}

#[test]
fn broken_stylesheets_are_errors() {
    let parse = |css: &str| {
        let svg = format!("<svg xmlns='http://www.w3.org/2000/svg'><style>{}</style></svg>", css);
        StyleData::new(&Document::parse(&svg).unwrap()).err()
    };

    assert_eq!(parse("a{b{fill:red}}"), Some(CssError::Nesting));
    assert_eq!(parse("@import url(a.css);"), Some(CssError::UnsupportedAtRule("import".to_string())));
    assert_eq!(parse("rect{fill:red}"), None);
}

#[test]
fn edits_update_queries() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'>\
               <style>.a{fill:red}.b{fill:blue}</style><rect class='a'/></svg>";
    let mut doc = Document::parse(svg).unwrap();
    let mut styles = StyleData::new(&doc).unwrap();
    assert!(styles.has_class_reference("b"));

    styles.delete_rules(|rule| rule.selector.to_string() == ".b");
    assert!(!styles.has_class_reference("b"));

    styles.write_rules(&mut doc);
    let reparsed = StyleData::new(&doc).unwrap();
    assert_eq!(reparsed.sorted_rules().len(), 1);
}
