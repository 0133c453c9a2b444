// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end parsing through [`TemplateParser`].

use std::sync::Arc;

use pretty_assertions::assert_eq;
use weft::{
    ArgumentDefinition, ArgumentType, CallNode, CallableDescriptor, Capabilities,
    ExpressionRecognizer, InterceptionPoint, InterceptionPoints, Interceptor, LexErrorKind, Node,
    ParseErrorKind, ParsingState, Registry, TemplateParser, Value,
};

const CORE: &str = "Weft\\Core";

fn registry() -> Registry {
    let open = |identifier: &str| {
        CallableDescriptor::new(CORE, identifier)
            .with_capabilities(Capabilities::ARBITRARY_ARGUMENTS)
    };
    Registry::new()
        .with(
            CallableDescriptor::new(CORE, "call")
                .argument(ArgumentDefinition::optional("arg", ArgumentType::Any)),
        )
        .with(open("format"))
        .with(open("upper"))
        .with(open("escape"))
        .with(open("section"))
        .with(open("foo"))
}

fn parser() -> TemplateParser {
    TemplateParser::new(registry())
        .with_namespace("ns", CORE)
        .with_namespace("f", CORE)
        .with_namespace("a", CORE)
}

fn children(source: &str) -> Vec<Node> {
    let template = parser()
        .parse(source)
        .unwrap_or_else(|error| panic!("{source:?}:\n{error}"));
    template.root().children().to_vec()
}

fn call(node: &Node) -> &CallNode {
    node.as_call()
        .unwrap_or_else(|| panic!("expected a call, got {node:?}"))
}

#[test]
fn nested_accessor_argument_and_text_body() {
    let nodes = children("<ns:call arg=\"{outer.path}\">body</ns:call>");
    assert_eq!(nodes.len(), 1);
    let call = call(&nodes[0]);
    assert_eq!(call.arguments.len(), 1);
    assert_eq!(
        call.argument("arg"),
        Some(&Value::Node(Node::accessor("outer.path")))
    );
    assert_eq!(call.children, vec![Node::text("body")]);
}

#[test]
fn quoting_and_escaping_in_attributes() {
    let nodes = children(r#"<ns:call arg="a \"quoted\" value"/>"#);
    assert_eq!(
        call(&nodes[0]).argument("arg"),
        Some(&Value::from("a \"quoted\" value"))
    );

    let nodes = children(r#"<ns:call arg="value {var}"/>"#);
    assert_eq!(
        call(&nodes[0]).argument("arg"),
        Some(&Value::Node(Node::Root(vec![
            Node::text("value "),
            Node::accessor("var"),
        ])))
    );
}

#[test]
fn numeric_argument_is_not_an_accessor() {
    let nodes = children("{f:format(count: 42)}");
    assert_eq!(call(&nodes[0]).argument("count"), Some(&Value::Integer(42)));
}

#[test]
fn mismatched_closing_tag() {
    let error = parser().parse("<a:foo>text</a:bar>").unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::MismatchedClosingTag {
            expected: "a:foo".to_owned(),
            found: "a:bar".to_owned(),
        }
    );
    let message = error.to_string();
    assert!(message.contains("a:foo") && message.contains("a:bar"), "{message}");
}

#[test]
fn pipe_chain_order() {
    let nodes = children("{value | f:format() | f:upper()}");
    let outer = call(&nodes[0]);
    assert_eq!(outer.identifier, "upper");
    let inner = call(&outer.children[0]);
    assert_eq!(inner.identifier, "format");
    assert_eq!(inner.children, vec![Node::accessor("value")]);
}

#[test]
fn unclosed_constructs_are_unterminated() {
    for source in [
        "{open",
        "{f:format(open",
        "{f:format(v: 'open",
        "<f:section name=\"open",
        "<f:section>",
    ] {
        let error = parser().parse(source).unwrap_err();
        let unterminated = matches!(
            error.kind,
            ParseErrorKind::Lex(LexErrorKind::Unterminated { .. })
                | ParseErrorKind::UnterminatedTag { .. }
        );
        assert!(unterminated, "{source}: {error}");
    }
}

// === Namespace declarations ===

#[test]
fn inline_namespace_declaration() {
    let nodes = children("{namespace x=Weft\\Core}<x:section>{y}</x:section>");
    assert_eq!(nodes.len(), 1);
    assert_eq!(call(&nodes[0]).qualified_name(), "x:section");
}

#[test]
fn declarations_do_not_leak_between_templates() {
    let parser = parser();
    assert!(parser
        .parse("{namespace x=Weft\\Core}<x:section/>")
        .is_ok());
    let template = parser.parse("<x:section/>").unwrap();
    assert_eq!(template.root().children(), &[Node::text("<x:section/>")]);
    assert!(!parser.namespaces().contains("x"));
}

#[test]
fn declarations_keep_line_numbers() {
    let error = parser()
        .parse("{namespace\n  x=Weft\\Core}\n<x:section>")
        .unwrap_err();
    assert_eq!(error.line(), 3);
    assert_eq!(error.column(), 1);
}

#[test]
fn xmlns_attribute_declares_prefix() {
    let nodes = children("<html xmlns:x=\"Weft\\Core\"><x:section/></html>");
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0], Node::text("<html xmlns:x=\"Weft\\Core\">"));
    assert_eq!(call(&nodes[1]).qualified_name(), "x:section");
    assert_eq!(nodes[2], Node::text("</html>"));
}

// === Interceptors and recognizers ===

/// Wraps every accessor in `f:escape`.
struct Escape {
    descriptor: Arc<CallableDescriptor>,
}

impl Interceptor for Escape {
    fn points(&self) -> InterceptionPoints {
        InterceptionPoints::ACCESSOR_PRODUCED
    }

    fn process(&self, node: Node, _: InterceptionPoint, state: &mut ParsingState<'_>) -> Node {
        if state.depth() > 0 {
            return node;
        }
        let mut call = CallNode::new("f", "escape", Arc::clone(&self.descriptor));
        call.children.push(node);
        Node::Call(Box::new(call))
    }
}

#[test]
fn interceptor_wraps_top_level_accessors() {
    let descriptor = Arc::new(CallableDescriptor::new(CORE, "escape"));
    let parser = parser().with_interceptor(Escape { descriptor });
    let template = parser
        .parse("{name}<f:section>{inside}</f:section>")
        .unwrap();
    let nodes = template.root().children();
    assert_eq!(call(&nodes[0]).identifier, "escape");
    assert_eq!(call(&nodes[0]).children, vec![Node::accessor("name")]);
    assert_eq!(call(&nodes[1]).children, vec![Node::accessor("inside")]);
}

#[test]
fn recognizers_in_registration_order() {
    let parser = parser()
        .with_recognizer(ExpressionRecognizer::cast().unwrap())
        .with_recognizer(ExpressionRecognizer::math().unwrap());
    let template = parser.parse("{total as integer}{total * 2}{total}").unwrap();
    let names: Vec<_> = template
        .root()
        .children()
        .iter()
        .map(|node| node.as_expression().map(|e| e.name.clone()))
        .collect();
    assert_eq!(
        names,
        vec![Some("cast".to_owned()), Some("math".to_owned()), None]
    );
}

#[test]
fn parser_is_shared_across_threads() {
    let parser = parser();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let parser = &parser;
                scope.spawn(move || {
                    let source = format!("<f:section>{{item{i}}}</f:section>");
                    parser.parse(&source).map(|template| template.root().children().len())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(1));
        }
    });
}
