use super::*;
use pretty_assertions::assert_eq;

fn groups(node: &Node) -> Vec<Option<String>> {
    node.as_expression()
        .map(|expression| expression.groups.clone())
        .unwrap_or_default()
}

#[test]
fn math_captures_operands_and_operator() {
    let math = ExpressionRecognizer::math().unwrap();
    let node = math.recognize("price * 2").unwrap();
    assert_eq!(
        groups(&node),
        vec![
            Some("price * 2".to_owned()),
            Some("price".to_owned()),
            Some("*".to_owned()),
            Some("2".to_owned()),
        ]
    );
    assert!(math.recognize("price").is_none());
}

#[test]
fn ternary_allows_empty_then_branch() {
    let ternary = ExpressionRecognizer::ternary().unwrap();
    let node = ternary.recognize("flag ? : other").unwrap();
    let expression = node.as_expression().unwrap();
    assert_eq!(expression.name, "ternary");
    assert_eq!(expression.source, "flag ? : other");
    assert_eq!(expression.groups[2], Some(String::new()));
}

#[test]
fn cast_only_knows_scalar_and_array_types() {
    let cast = ExpressionRecognizer::cast().unwrap();
    assert!(cast.recognize("count as integer").is_some());
    assert!(cast.recognize("count as object").is_none());
}

#[test]
fn first_matching_recognizer_wins() {
    let recognizers = vec![
        ExpressionRecognizer::new("never", Regex::new("^$").unwrap(), |_, _| {
            Node::text("never")
        }),
        ExpressionRecognizer::new("first", Regex::new(r"\+").unwrap(), |_, _| {
            Node::text("first")
        }),
        ExpressionRecognizer::math().unwrap(),
    ];
    assert_eq!(recognize(&recognizers, "a + b"), Some(Node::text("first")));
    assert_eq!(recognize(&recognizers, "a b"), None);
}

#[test]
fn debug_shows_pattern() {
    let cast = ExpressionRecognizer::cast().unwrap();
    let rendered = format!("{cast:?}");
    assert!(rendered.contains("cast"));
    assert!(rendered.contains("as"));
}
