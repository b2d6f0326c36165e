// Transducer description parsing

use corpus_view_wasm::parse::{FstGraph, FstParseError};

#[test]
fn test_states_are_collected_and_sorted() {
    let src = "10\t2\ta\tx\t0.5\n2\t3\tb\ty\t1\n3\tout\n";
    let graph = FstGraph::parse(src).unwrap();

    let ids: Vec<u64> = graph.states.iter().map(|s| s.id).collect();
    // Numeric order, not string order ("10" < "2")
    assert_eq!(ids, [2, 3, 10]);

    let labels: Vec<String> = graph.states.iter().map(|s| s.label()).collect();
    assert_eq!(labels, ["2", "3\n/out", "10"]);
}

#[test]
fn test_edges_keep_line_order_and_labels() {
    let graph = FstGraph::parse("0\t1\ta\tx\t0.5\n1\t0\t<eps>\ty\t2").unwrap();

    let labels: Vec<String> = graph.edges.iter().map(|e| e.label()).collect();
    assert_eq!(labels, ["a:x/0.5", "<eps>:y/2"]);
    assert_eq!((graph.edges[1].from, graph.edges[1].to), (1, 0));
}

#[test]
fn test_final_only_state_is_included() {
    let graph = FstGraph::parse("5\tdone").unwrap();
    assert_eq!(graph.states.len(), 1);
    assert!(graph.states[0].is_final());
    assert!(graph.edges.is_empty());
}

#[test]
fn test_blank_lines_are_skipped() {
    let graph = FstGraph::parse("\n0\t1\ta\tb\t0\n\n").unwrap();
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.states.len(), 2);
}

#[test]
fn test_empty_source_is_an_empty_graph() {
    assert_eq!(FstGraph::parse("").unwrap(), FstGraph::default());
}

#[test]
fn test_wrong_field_count_reports_line() {
    let err = FstGraph::parse("0\t1\ta\tb\t0\n1\t2\tc\n").unwrap_err();
    assert_eq!(err, FstParseError::FieldCount { line: 2, found: 3 });
    assert_eq!(err.to_string(), "line 2: expected 2 or 5 tab-separated fields, found 3");
}

#[test]
fn test_non_numeric_state_reports_line() {
    let err = FstGraph::parse("q0\tout").unwrap_err();
    assert_eq!(err, FstParseError::InvalidState { line: 1, value: "q0".to_string() });
}
