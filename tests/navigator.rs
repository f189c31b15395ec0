use curvecut::data::navigator::{advance, list_batches, retreat, sync_from_direct_selection, BatchNavigator};
use curvecut::{Delimiter, Table};

fn batches(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn batches_are_distinct_sorted_text() {
    let csv = "lot,v\nB,1\nA,2\n10,3\nB,4\n,5\n2,6\n";
    let t = Table::from_bytes(csv.as_bytes(), Delimiter::Comma).unwrap();
    // lexicographic, missing values skipped
    assert_eq!(list_batches(&t, "lot").unwrap(), batches(&["10", "2", "A", "B"]));
}

#[test]
fn all_missing_lot_column_yields_no_batches() {
    let t = Table::from_bytes("lot,v\n,1\n ,2\n".as_bytes(), Delimiter::Comma).unwrap();
    let nav = BatchNavigator::new(list_batches(&t, "lot").unwrap());
    assert!(nav.is_empty());
    assert_eq!(nav.current(), None);
}

#[test]
fn advance_and_retreat_clamp() {
    let n = 3;
    let mut p = 0;
    for _ in 0..10 {
        p = advance(p, n);
        assert!(p <= n - 1);
    }
    assert_eq!(p, 2);
    for _ in 0..10 {
        p = retreat(p, n);
    }
    assert_eq!(p, 0);
    assert_eq!(advance(0, 0), 0);
}

#[test]
fn single_batch_navigation_is_a_no_op() {
    let mut nav = BatchNavigator::new(batches(&["only"]));
    assert_eq!(nav.advance(), Some("only"));
    assert_eq!(nav.retreat(), Some("only"));
    assert_eq!(nav.pointer(), 0);
}

#[test]
fn direct_pick_then_previous_uses_picked_position() {
    let list = batches(&["A", "B", "C", "D"]);
    let mut nav = BatchNavigator::new(list.clone());
    assert_eq!(nav.current(), Some("A"));
    assert!(nav.sync_from_direct_selection("C"));
    assert_eq!(nav.pointer(), 2);
    assert_eq!(nav.retreat(), Some("B"));
    assert_eq!(sync_from_direct_selection(1, "missing", &list), 1);
}

#[test]
fn shrinking_batch_list_clamps_pointer() {
    let mut nav = BatchNavigator::new(batches(&["A", "B", "C"]));
    nav.advance();
    nav.advance();
    nav.set_batches(batches(&["A"]));
    assert_eq!(nav.current(), Some("A"));
    nav.set_batches(Vec::new());
    assert_eq!(nav.current(), None);
}
