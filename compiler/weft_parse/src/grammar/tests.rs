use pretty_assertions::assert_eq;
use proptest::prelude::*;
use weft_ir::{
    ArgumentDefinition, ArgumentType, ArrayKey, ArrayNode, CallableDescriptor, Capabilities,
    NamespaceTable, Node, Value,
};
use weft_lexer::{ContextKind, LexErrorKind};

use crate::{
    parse, ExpressionRecognizer, InterceptionPoint, InterceptionPoints, Interceptor, ParseError,
    ParseErrorKind, ParseSession, ParsedTemplate, ParserConfig, ParsingState, Registry,
};

const CORE: &str = "Weft\\Core";

fn open(identifier: &str) -> CallableDescriptor {
    CallableDescriptor::new(CORE, identifier).with_capabilities(Capabilities::ARBITRARY_ARGUMENTS)
}

fn registry() -> Registry {
    Registry::new()
        .with(open("x"))
        .with(open("a"))
        .with(open("b"))
        .with(open("foo"))
        .with(
            CallableDescriptor::new(CORE, "call")
                .argument(ArgumentDefinition::optional("arg", ArgumentType::Any)),
        )
        .with(
            CallableDescriptor::new(CORE, "if")
                .argument(ArgumentDefinition::required("condition", ArgumentType::Boolean)),
        )
        .with(
            CallableDescriptor::new(CORE, "layout")
                .argument(ArgumentDefinition::optional("name", ArgumentType::String))
                .with_capabilities(Capabilities::LAYOUT),
        )
        .with(
            CallableDescriptor::new(CORE, "uncached").with_capabilities(Capabilities::UNCACHEABLE),
        )
}

fn namespaces() -> NamespaceTable {
    NamespaceTable::new()
        .with("f", CORE)
        .with("ns", CORE)
        .with("a", CORE)
        .with("other", "Weft\\Other")
}

fn parse_template(source: &str, config: ParserConfig) -> Result<ParsedTemplate, ParseError> {
    let table = namespaces();
    let registry = registry();
    let session = ParseSession::new(&table, &registry).with_config(config);
    parse(source, &session)
}

fn root(source: &str) -> Vec<Node> {
    match parse_template(source, ParserConfig::default()) {
        Ok(template) => match template.into_root() {
            Node::Root(children) => children,
            other => panic!("expected root, got {other:?}"),
        },
        Err(error) => panic!("{source:?} failed to parse:\n{error}"),
    }
}

/// The single node `source` parses to.
fn single(source: &str) -> Node {
    let mut children = root(source);
    assert_eq!(children.len(), 1, "{source:?} produced {children:?}");
    children.remove(0)
}

fn error(source: &str) -> ParseError {
    match parse_template(source, ParserConfig::default()) {
        Ok(template) => panic!("{source:?} parsed unexpectedly: {:?}", template.root()),
        Err(error) => error,
    }
}

fn argument<'n>(node: &'n Node, name: &str) -> &'n Value {
    node.as_call()
        .and_then(|call| call.argument(name))
        .unwrap_or_else(|| panic!("no argument {name} on {node:?}"))
}

// === Text and inline ===

#[test]
fn literal_text_is_one_text_node() {
    let text = "Dear reader, a > b and (c) 'd' \"e\": f=g, h|i";
    assert_eq!(root(text), vec![Node::text(text)]);
}

#[test]
fn empty_template_is_empty_root() {
    assert_eq!(root(""), vec![]);
}

#[test]
fn accessor_between_text() {
    assert_eq!(
        root("Hello {user.name}!"),
        vec![Node::text("Hello "), Node::accessor("user.name"), Node::text("!")]
    );
}

#[test]
fn numbers_words_and_empty_braces_are_text() {
    assert_eq!(single("{42}"), Node::text("42"));
    assert_eq!(single("{-1.5}"), Node::text("-1.5"));
    assert_eq!(single("{}"), Node::text("{}"));
    assert_eq!(single("{ }"), Node::text("{ }"));
    assert_eq!(single("{a b c}"), Node::text("{a b c}"));
    assert_eq!(single("{a ? b : c}"), Node::text("{a ? b : c}"));
}

#[test]
fn quoted_inline_literal() {
    assert_eq!(single("{'plain'}"), Node::text("plain"));
}

#[test]
fn inline_array_literal() {
    let mut expected = ArrayNode::new();
    expected.insert(ArrayKey::parse("a"), Value::Integer(1));
    expected.insert(ArrayKey::parse("b"), Value::from("two"));
    expected.insert(ArrayKey::parse("c"), Value::Node(Node::accessor("d")));
    assert_eq!(single("{a: 1, b: 'two', c: {d}}"), Node::Array(expected));
}

#[test]
fn inline_array_with_quoted_keys_and_implicit_entries() {
    let Node::Array(array) = single("{'first key': x, y, 3}") else {
        panic!("expected array");
    };
    assert_eq!(
        array.get_named("first key"),
        Some(&Value::Node(Node::accessor("x")))
    );
    assert_eq!(array.get_named("y"), Some(&Value::Node(Node::accessor("y"))));
    assert_eq!(array.get(&ArrayKey::Index(0)), Some(&Value::Integer(3)));
}

#[test]
fn whitespace_separated_array_entries() {
    let Node::Array(array) = single("{a: 1 b: 2}") else {
        panic!("expected array");
    };
    assert_eq!(array.len(), 2);
    assert_eq!(array.get_named("b"), Some(&Value::Integer(2)));
}

#[test]
fn keyed_call_inside_array() {
    let Node::Array(array) = single("{items: f:x(n: 1), more: (1, 2)}") else {
        panic!("expected array");
    };
    let items = array.get_named("items").and_then(Value::as_node);
    assert_eq!(items.and_then(Node::as_call).map(|call| call.identifier.as_str()), Some("x"));
    let more = array.get_named("more").and_then(Value::as_node);
    assert_eq!(more.and_then(Node::as_array).map(ArrayNode::len), Some(2));
}

// === Calls ===

#[test]
fn tag_with_accessor_argument_and_body() {
    let node = single("<ns:call arg=\"{outer.path}\">body</ns:call>");
    let call = node.as_call().unwrap();
    assert_eq!(call.qualified_name(), "ns:call");
    assert_eq!(call.arguments.len(), 1);
    assert_eq!(
        argument(&node, "arg"),
        &Value::Node(Node::accessor("outer.path"))
    );
    assert_eq!(call.children, vec![Node::text("body")]);
}

#[test]
fn nested_tags_and_inline_calls() {
    let node = single("<f:x><f:a>{f:b(arg: '{inner}')}</f:a></f:x>");
    let inner_tag = &node.children()[0];
    assert_eq!(inner_tag.as_call().unwrap().identifier, "a");
    let inline_call = &inner_tag.children()[0];
    assert_eq!(inline_call.as_call().unwrap().identifier, "b");
    assert_eq!(
        argument(inline_call, "arg"),
        &Value::Node(Node::accessor("inner"))
    );
}

#[test]
fn escaped_quotes_in_string_argument() {
    let node = single(r#"{f:x(value: "a \"quoted\" value")}"#);
    assert_eq!(argument(&node, "value"), &Value::from("a \"quoted\" value"));
}

#[test]
fn mixed_string_argument_is_root() {
    let node = single(r#"{f:x(value: "value {var}")}"#);
    assert_eq!(
        argument(&node, "value"),
        &Value::Node(Node::Root(vec![Node::text("value "), Node::accessor("var")]))
    );
}

#[test]
fn numeric_arguments_are_literals() {
    let node = single("{f:x(count: 42, ratio: 0.5, name: count)}");
    assert_eq!(argument(&node, "count"), &Value::Integer(42));
    assert_eq!(argument(&node, "ratio"), &Value::Float(0.5));
    assert_eq!(argument(&node, "name"), &Value::Node(Node::accessor("count")));
}

#[test]
fn bare_argument_is_keyed_by_its_text() {
    let node = single("{f:x(user.name)}");
    assert_eq!(
        argument(&node, "user.name"),
        &Value::Node(Node::accessor("user.name"))
    );
}

#[test]
fn pipe_chain_wraps_left_to_right() {
    let outer = single("{value | f:a() | f:b()}");
    assert_eq!(outer.as_call().unwrap().identifier, "b");
    let inner = &outer.children()[0];
    assert_eq!(inner.as_call().unwrap().identifier, "a");
    assert_eq!(inner.children(), &[Node::accessor("value")]);
}

#[test]
fn legacy_arrow_pipe() {
    let node = single("{value -> f:a()}");
    assert_eq!(node.children(), &[Node::accessor("value")]);
    let node = single("{value->f:a()}");
    assert_eq!(node.children(), &[Node::accessor("value")]);
}

#[test]
fn quoted_literal_piped_into_call() {
    let node = single("{'raw' | f:a()}");
    assert_eq!(node.children(), &[Node::text("raw")]);
}

// === Self-closing tags ===

#[test]
fn self_closing_without_arguments() {
    for source in ["<f:x/>after", "<f:x />after"] {
        let children = root(source);
        assert_eq!(children.len(), 2, "{source}");
        assert!(children[0].children().is_empty(), "{source}");
        assert_eq!(children[1], Node::text("after"), "{source}");
    }
}

#[test]
fn self_closing_with_one_argument() {
    let node = single("<f:x a=\"1\"/>");
    assert_eq!(argument(&node, "a"), &Value::from("1"));
    let node = single("<f:x a=1/>");
    assert_eq!(argument(&node, "a"), &Value::Integer(1));
    let node = single("<f:x a='{b}' />");
    assert_eq!(argument(&node, "a"), &Value::Node(Node::accessor("b")));
}

#[test]
fn attributes_may_span_lines() {
    let node = single("<f:x\n    a=\"1\"\n    b=\"2\"\n>body</f:x>");
    assert_eq!(node.as_call().unwrap().arguments.len(), 2);
    assert_eq!(node.children(), &[Node::text("body")]);
}

// === Markup that is not a template tag ===

#[test]
fn inactive_tags_keep_their_text() {
    assert_eq!(
        root("<div class=\"{cls}\">x</div>"),
        vec![
            Node::text("<div class=\""),
            Node::accessor("cls"),
            Node::text("\">x</div>"),
        ]
    );
}

#[test]
fn undeclared_prefix_is_markup() {
    assert_eq!(root("<g:x>y</g:x>"), vec![Node::text("<g:x>y</g:x>")]);
}

#[test]
fn cdata_is_kept_verbatim() {
    let text = "<![CDATA[ {not} <f:x> ]]>";
    assert_eq!(root(text), vec![Node::text(text)]);
}

// === Metadata ===

#[test]
fn layout_and_uncacheable_capabilities() {
    let template =
        parse_template("<f:layout name=\"Main\"/>{f:uncached()}", ParserConfig::default()).unwrap();
    assert_eq!(template.layout_name(), Some("Main"));
    assert!(!template.is_compilable());

    let template = parse_template("plain", ParserConfig::default()).unwrap();
    assert_eq!(template.layout_name(), None);
    assert!(template.is_compilable());
}

// === Interceptors and recognizers ===

struct Shout;

impl Interceptor for Shout {
    fn points(&self) -> InterceptionPoints {
        InterceptionPoints::TEXT_PRODUCED | InterceptionPoints::ACCESSOR_PRODUCED
    }

    fn process(&self, node: Node, point: InterceptionPoint, state: &mut ParsingState<'_>) -> Node {
        match (point, node) {
            (InterceptionPoint::TextProduced, Node::Text(text)) => Node::Text(text.to_uppercase()),
            (InterceptionPoint::AccessorProduced, Node::ObjectAccessor(path)) => {
                state.set_layout_name(path.clone());
                Node::ObjectAccessor(format!("escaped.{path}"))
            }
            (_, node) => node,
        }
    }
}

#[test]
fn interceptors_replace_nodes() {
    let table = namespaces();
    let registry = registry();
    let interceptors: Vec<Box<dyn Interceptor>> = vec![Box::new(Shout)];
    let session = ParseSession::new(&table, &registry).with_interceptors(&interceptors);
    let template = parse("hello {name}", &session).unwrap();
    assert_eq!(
        template.root(),
        &Node::Root(vec![Node::text("HELLO "), Node::accessor("escaped.name")])
    );
    assert_eq!(template.layout_name(), Some("name"));
}

#[test]
fn recognizers_claim_inline_expressions() {
    let table = namespaces();
    let registry = registry();
    let recognizers = vec![
        ExpressionRecognizer::math().unwrap(),
        ExpressionRecognizer::ternary().unwrap(),
    ];
    let session = ParseSession::new(&table, &registry).with_recognizers(&recognizers);

    let template = parse("{a + b}{flag ? 'yes' : 'no'}{f:x()}", &session).unwrap();
    let children = template.root().children();
    assert_eq!(children[0].as_expression().map(|e| e.name.as_str()), Some("math"));
    assert_eq!(children[1].as_expression().map(|e| e.name.as_str()), Some("ternary"));
    assert!(children[2].as_call().is_some());
}

// === Errors ===

#[test]
fn mismatched_closing_tag_names_both() {
    let error = error("<a:foo>text</a:bar>");
    assert_eq!(
        error.kind,
        ParseErrorKind::MismatchedClosingTag {
            expected: "a:foo".to_owned(),
            found: "a:bar".to_owned(),
        }
    );
    assert_eq!(error.offset, 11);
    assert_eq!((error.line(), error.column()), (1, 12));
}

#[test]
fn unclosed_and_unopened_tags() {
    let unclosed = error("<f:x>body");
    assert_eq!(
        unclosed.kind,
        ParseErrorKind::UnterminatedTag {
            name: "f:x".to_owned()
        }
    );
    assert_eq!(unclosed.offset, 0);
    assert_eq!(
        error("body</f:x>").kind,
        ParseErrorKind::UnexpectedClosingTag {
            found: "f:x".to_owned()
        }
    );
}

#[test]
fn unclosed_regions_are_unterminated() {
    for source in ["{a", "{f:x(a", "{f:x(a: 'b", "<f:x a=\"1", "<div {a"] {
        let error = error(source);
        assert!(
            matches!(
                error.kind,
                ParseErrorKind::Lex(LexErrorKind::Unterminated { .. })
            ),
            "{source}: {error}"
        );
    }
}

#[test]
fn unresolvable_calls() {
    assert_eq!(
        error("{g:x()}").kind,
        ParseErrorKind::UnknownNamespace {
            namespace: "g".to_owned()
        }
    );
    assert_eq!(
        error("{other:x()}").kind,
        ParseErrorKind::UnknownNamespace {
            namespace: "other".to_owned()
        }
    );
    assert_eq!(
        error("<f:missing/>").kind,
        ParseErrorKind::UnknownIdentifier {
            namespace: "f".to_owned(),
            identifier: "missing".to_owned(),
        }
    );
}

#[test]
fn argument_validation() {
    assert_eq!(
        error("<f:if>x</f:if>").kind,
        ParseErrorKind::MissingRequiredArgument {
            call: "f:if".to_owned(),
            argument: "condition".to_owned(),
        }
    );
    assert_eq!(
        error("<f:if condition=\"{a}\" else=\"b\"/>").kind,
        ParseErrorKind::UndeclaredArgument {
            call: "f:if".to_owned(),
            argument: "else".to_owned(),
        }
    );

    let relaxed = ParserConfig {
        strict_arguments: false,
        ..ParserConfig::default()
    };
    assert!(parse_template("<f:if else=\"b\"/>", relaxed).is_ok());
}

#[test]
fn malformed_argument_lists() {
    for source in [
        "{f:x(1)}",
        "{f:x(a:)}",
        "{f:x(a: 1, a: 2)}",
        "{f:x(: 1)}",
        "<f:x a=\"1\" a=\"2\"/>",
        "{f:x(a: +)}",
        "<f:x a=\"1\" ?>",
    ] {
        let error = error(source);
        assert!(
            matches!(error.kind, ParseErrorKind::MalformedArguments { .. }),
            "{source}: {error}"
        );
    }
}

#[test]
fn malformed_inline_expressions() {
    for source in ["{value |}", "{value | other}", "{x(1)}", "{f:x() y}", "{a: }"] {
        let error = error(source);
        assert!(
            matches!(error.kind, ParseErrorKind::MalformedInline { .. }),
            "{source}: {error}"
        );
    }
}

#[test]
fn malformed_tags() {
    for source in ["<f:>", "<f:x:y>", "</f:x a=\"1\">"] {
        let error = error(source);
        assert!(
            matches!(error.kind, ParseErrorKind::MalformedTag { .. }),
            "{source}: {error}"
        );
    }
}

#[test]
fn operator_words_are_not_implicit_arguments() {
    let error = error("{f:x(a: b + c)}");
    assert!(
        matches!(error.kind, ParseErrorKind::MalformedArguments { .. }),
        "{error}"
    );
    assert_eq!(error.offset, 10);

    let node = single("{f:x(a: user-data.first_name, items.0)}");
    assert_eq!(
        argument(&node, "a"),
        &Value::Node(Node::accessor("user-data.first_name"))
    );
    assert_eq!(argument(&node, "items.0"), &Value::Node(Node::accessor("items.0")));
}

#[test]
fn detached_slash_before_tag_end() {
    let error = error("<f:x a=\"1\" / >");
    assert!(
        matches!(error.kind, ParseErrorKind::MalformedTag { .. }),
        "{error}"
    );
    assert_eq!(error.offset, 11);
}

#[test]
fn open_tags_respect_max_depth() {
    let config = ParserConfig {
        max_depth: 2,
        ..ParserConfig::default()
    };
    let error = parse_template("<f:x><f:x><f:x></f:x></f:x></f:x>", config).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::Lex(LexErrorKind::NestingTooDeep { limit: 2 })
    );
    assert_eq!(error.offset, 10);
}

#[test]
fn error_records_context() {
    let error = error("{f:x(a:)}");
    assert_eq!(error.context, ContextKind::Inline);
}

proptest! {
    #[test]
    fn text_without_markup_round_trips(text in "[^{<]{1,64}") {
        prop_assert_eq!(root(&text), vec![Node::text(text.clone())]);
    }

    #[test]
    fn arbitrary_ascii_never_panics(text in "[ -~\n]{0,64}") {
        let _ = parse_template(&text, ParserConfig::default());
    }
}
