use svgmin_tree::{traverse, Document, NodeId, VisitError, VisitFlow, Visitor, WriteOptions};

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    skip: Option<&'static str>,
    remove: Option<&'static str>,
}

impl Recorder {
    fn name(doc: &Document, node: NodeId) -> String {
        let element = doc.element(node).unwrap();
        element.id().unwrap_or(element.name.as_str()).to_string()
    }
}

impl Visitor for Recorder {
    fn element_enter(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        ancestors: &[NodeId],
    ) -> Result<VisitFlow, VisitError> {
        let name = Self::name(doc, node);
        self.events.push(format!("enter {} {}", name, ancestors.len()));

        if self.remove == Some(name.as_str()) {
            doc.detach(node);
        }

        if self.skip == Some(name.as_str()) {
            return Ok(VisitFlow::Skip);
        }

        Ok(VisitFlow::Continue)
    }

    fn element_exit(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        _: &[NodeId],
    ) -> Result<(), VisitError> {
        self.events.push(format!("exit {}", Self::name(doc, node)));
        Ok(())
    }

    fn text(&mut self, _: &mut Document, _: NodeId, _: NodeId) -> Result<(), VisitError> {
        self.events.push("text".to_string());
        Ok(())
    }
}

const SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg'>\
                   <g id='a'><rect id='b'/></g><text id='c'>t</text></svg>";

#[test]
fn visits_in_document_order() {
    let mut doc = Document::parse(SVG).unwrap();
    let mut recorder = Recorder::default();
    traverse(&mut doc, &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        [
            "enter svg 0",
            "enter a 1",
            "enter b 2",
            "exit b",
            "exit a",
            "enter c 1",
            "text",
            "exit c",
            "exit svg"
        ]
    );
}

#[test]
fn skip_does_not_visit_children() {
    let mut doc = Document::parse(SVG).unwrap();
    let mut recorder = Recorder {
        skip: Some("a"),
        ..Recorder::default()
    };
    traverse(&mut doc, &mut recorder).unwrap();
    assert!(!recorder.events.iter().any(|e| e.contains(" b")));
    assert!(recorder.events.contains(&"exit a".to_string()));
}

#[test]
fn removed_node_children_are_not_visited() {
    let mut doc = Document::parse(SVG).unwrap();
    let mut recorder = Recorder {
        remove: Some("a"),
        ..Recorder::default()
    };
    traverse(&mut doc, &mut recorder).unwrap();
    assert!(!recorder.events.iter().any(|e| e.contains(" b")));
    assert!(recorder.events.contains(&"enter c 1".to_string()));
    assert_eq!(
        doc.to_string(&WriteOptions::default()),
        "<svg xmlns=\"http://www.w3.org/2000/svg\"><text id=\"c\">t</text></svg>"
    );
}

struct Failing;

impl Visitor for Failing {
    fn root_enter(&mut self, _: &mut Document) -> Result<VisitFlow, VisitError> {
        Err(VisitError::new("nope"))
    }
}

#[test]
fn errors_are_propagated() {
    let mut doc = Document::parse(SVG).unwrap();
    assert_eq!(traverse(&mut doc, &mut Failing), Err(VisitError::new("nope")));
}
