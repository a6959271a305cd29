//! Tests for edge-list parsing

use rstest::rstest;

use gvtree::domain::{Delimiter, DomainError, EdgeList};

#[rstest]
#[case("whitespace", "A   B\t2.5\n")]
#[case("tab", "A\tB\t2.5\n")]
#[case("\\t", "A\tB\t2.5\n")]
#[case("comma", "A, B, 2.5\n")]
#[case("semicolon", "A;B;2.5\n")]
#[case("pipe", "A|B|2.5\n")]
#[case("::", "A::B::2.5\n")]
fn given_named_delimiter_when_parsing_then_reads_single_edge(#[case] name: &str, #[case] content: &str) {
    // Arrange
    let delimiter = Delimiter::from_name(name);

    // Act
    let graph = EdgeList::parse(content, &delimiter).unwrap();

    // Assert
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.weight("A", "B"), Some(2.5));
}

#[test]
fn given_node_ids_with_spaces_when_parsing_comma_list_then_ids_are_kept() {
    let content = "United States,Mexico,0.75\nMexico,United States,0.5\n";

    let graph = EdgeList::parse(content, &Delimiter::from_name("comma")).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.weight("United States", "Mexico"), Some(0.75));
}

#[rstest]
#[case("A B\n", 1)]
#[case("A B 1 extra\n", 1)]
#[case("A B 1\n\nC\n", 3)]
fn given_wrong_field_count_when_parsing_then_input_format_error(#[case] content: &str, #[case] line: usize) {
    let err = EdgeList::parse(content, &Delimiter::Whitespace).unwrap_err();

    assert!(
        matches!(err, DomainError::InputFormat { line: l, .. } if l == line),
        "unexpected error: {err:?}"
    );
}

#[test]
fn given_empty_identifier_when_parsing_then_rejected() {
    let err = EdgeList::parse("A,,3\n", &Delimiter::from_name("comma")).unwrap_err();

    assert_eq!(
        err,
        DomainError::InputFormat {
            line: 1,
            message: "empty node identifier".into()
        }
    );
}

#[test]
fn given_negative_and_exponent_weights_when_parsing_then_accepted() {
    let graph = EdgeList::parse("A B -1.5\nB C 2e3\n", &Delimiter::Whitespace).unwrap();

    assert_eq!(graph.weight("A", "B"), Some(-1.5));
    assert_eq!(graph.weight("B", "C"), Some(2000.0));
}

#[test]
fn given_only_comments_when_parsing_then_graph_is_empty() {
    let graph = EdgeList::parse("# nothing here\n\n   # indented\n", &Delimiter::Whitespace).unwrap();

    assert!(graph.is_empty());
}

#[test]
fn given_repeated_pair_when_parsing_then_last_weight_wins() {
    let graph = EdgeList::parse("A B 1\nA B 4\nB A 2\n", &Delimiter::Whitespace).unwrap();

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.weight("A", "B"), Some(4.0));
    assert_eq!(graph.weight("B", "A"), Some(2.0));
}
