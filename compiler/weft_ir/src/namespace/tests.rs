use super::*;
use pretty_assertions::assert_eq;

#[test]
fn declared_prefix_resolves() {
    let table = NamespaceTable::new().with("f", "Weft\\Core");
    assert!(table.contains("f"));
    assert!(!table.contains("g"));
    assert_eq!(table.resolve("f").collect::<Vec<_>>(), vec!["Weft\\Core"]);
    assert_eq!(table.resolve("g").count(), 0);
}

#[test]
fn later_bindings_are_searched_first() {
    let mut table = NamespaceTable::new();
    table.declare("f", "A");
    table.declare("f", "B");
    assert_eq!(table.resolve("f").collect::<Vec<_>>(), vec!["B", "A"]);

    table.declare("f", "A");
    assert_eq!(table.resolve("f").collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(table.len(), 1);
}
