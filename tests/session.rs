use curvecut::{
    ClickEvent, ColumnRoles, CurveCutConfig, Delimiter, NoticeLevel, SelectionState, SessionEvent,
    SessionState, Table,
};

const SCENARIO: &str = "lot,date,target\n\
A,01/01/2024 00:00:00,1\n\
A,01/01/2024 00:00:01,2\n\
A,01/01/2024 00:00:02,3\n\
B,01/01/2024 00:00:03,4\n\
B,01/01/2024 00:00:04,5\n";

fn click(row: usize) -> SessionEvent {
    SessionEvent::Click(ClickEvent {
        row_index: Some(row),
        point_ordinal: 0,
        x: 0.0,
        y: 0.0,
    })
}

fn loaded(csv: &str) -> SessionState {
    let mut s = SessionState::default();
    let notice = s.handle(SessionEvent::Upload {
        name: "data.csv".into(),
        bytes: csv.as_bytes().to_vec(),
    });
    assert_eq!(notice.level, NoticeLevel::Success, "{}", notice.message);
    s
}

#[test]
fn two_lot_scenario() {
    let mut s = loaded(SCENARIO);
    assert_eq!(s.roles(), Some(&ColumnRoles::new("lot", "date", "target")));
    assert_eq!(s.current_batch(), Some("A"));

    s.handle(click(0));
    s.handle(click(2));
    assert_eq!(s.current_selection(), &[0, 2]);
    assert_eq!(s.handle(SessionEvent::Validate).level, NoticeLevel::Success);
    let export = s.export_table().table().unwrap();
    assert_eq!(export.column("target").unwrap(), vec!["1", "2", "3"]);
    assert!(export.column("lot").unwrap().iter().all(|v| *v == "A"));

    s.handle(SessionEvent::Next);
    assert_eq!(s.current_batch(), Some("B"));
    s.handle(click(0));
    s.handle(click(1));
    s.handle(SessionEvent::Validate);

    let export = s.export_table().table().unwrap();
    assert_eq!(export.n_rows(), 5);
    assert_eq!(export.column("lot").unwrap()[3..], ["B", "B"]);
    assert_eq!(export.column("target").unwrap()[3..], ["4", "5"]);
}

#[test]
fn click_order_does_not_change_the_commit() {
    let mut s = loaded(SCENARIO);
    s.handle(click(2));
    s.handle(click(0));
    s.handle(SessionEvent::Validate);
    assert_eq!(s.export_table().n_rows(), 3);
    assert_eq!(
        s.export_table().table().unwrap().column("target").unwrap(),
        vec!["1", "2", "3"]
    );
}

#[test]
fn third_click_is_ignored() {
    let mut s = loaded(SCENARIO);
    s.handle(click(0));
    s.handle(click(1));
    let notice = s.handle(click(2));
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(s.current_selection(), &[0, 1]);
}

#[test]
fn click_falls_back_to_point_ordinal() {
    let mut s = loaded(SCENARIO);
    s.handle(SessionEvent::Click(ClickEvent {
        row_index: None,
        point_ordinal: 2,
        x: 0.0,
        y: 0.0,
    }));
    assert_eq!(s.selection_state(), SelectionState::OnePoint(2));
}

#[test]
fn out_of_range_click_is_rejected() {
    let mut s = loaded(SCENARIO);
    let notice = s.handle(click(3));
    assert!(notice.is_error());
    assert!(s.current_selection().is_empty());
}

#[test]
fn validate_needs_two_points() {
    let mut s = loaded(SCENARIO);
    assert!(!s.can_commit());
    s.handle(click(1));
    assert!(!s.can_commit());
    let notice = s.handle(SessionEvent::Validate);
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(s.export_table().is_empty());
    s.handle(click(1));
    assert!(s.can_commit());
    s.handle(SessionEvent::Validate);
    assert_eq!(s.export_table().n_rows(), 1);
}

#[test]
fn reversed_commit_reports_an_error() {
    let mut s = loaded(SCENARIO);
    let notice = s.commit_range(2, 1);
    assert!(notice.is_error());
    assert!(s.export_table().is_empty());
    assert_eq!(s.commit_range(1, 2).level, NoticeLevel::Success);
}

#[test]
fn selections_are_kept_per_lot_across_navigation() {
    let mut s = loaded(SCENARIO);
    s.handle(click(1));
    s.handle(SessionEvent::Next);
    assert!(s.current_selection().is_empty());
    s.handle(click(0));
    s.handle(SessionEvent::Previous);
    assert_eq!(s.current_selection(), &[1]);
    assert_eq!(s.recorder().current_selection("B"), &[0]);
}

#[test]
fn reset_keeps_other_lots_and_committed_rows() {
    let mut s = loaded(SCENARIO);
    s.handle(click(0));
    s.handle(click(1));
    s.handle(SessionEvent::Validate);
    s.handle(SessionEvent::Next);
    s.handle(click(1));
    s.handle(SessionEvent::Previous);
    s.handle(SessionEvent::ResetSelection);
    assert!(s.current_selection().is_empty());
    assert_eq!(s.recorder().current_selection("B"), &[1]);
    assert_eq!(s.export_table().n_rows(), 2);
}

#[test]
fn direct_pick_then_previous() {
    let csv = "lot,date,target\nA,1,1\nB,2,2\nC,3,3\nD,4,4\n";
    let mut s = loaded(csv);
    assert_eq!(s.current_batch(), Some("A"));
    s.handle(SessionEvent::PickBatch("C".into()));
    assert_eq!(s.navigator().pointer(), 2);
    s.handle(SessionEvent::Previous);
    assert_eq!(s.current_batch(), Some("B"));
}

#[test]
fn navigation_without_data_is_informational() {
    let mut s = SessionState::default();
    let notice = s.handle(SessionEvent::Next);
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(s.current_batch(), None);
    assert!(s.batch_rows().unwrap().is_none());
}

#[test]
fn export_before_any_commit_is_a_warning() {
    let s = loaded(SCENARIO);
    let err = s.export_payload().unwrap_err();
    assert_eq!(curvecut::Notice::from(err).level, NoticeLevel::Warning);
}

#[test]
fn export_payload_uses_filename_and_delimiter() {
    let mut s = loaded(SCENARIO);
    assert_eq!(s.export_filename(), "extractions_A.csv");
    s.handle(click(0));
    s.handle(click(0));
    s.handle(SessionEvent::Validate);
    let payload = s.export_payload().unwrap();
    assert_eq!(payload.filename, "extractions_A.csv");
    assert_eq!(payload.mime, "text/csv");
    let back = Table::from_bytes(&payload.bytes, Delimiter::Comma).unwrap();
    assert_eq!(back.n_rows(), 1);

    s.handle(SessionEvent::SetExportFilename("mine.csv".into()));
    assert_eq!(s.export_payload().unwrap().filename, "mine.csv");
}

#[test]
fn edited_filename_resets_when_the_lot_changes() {
    let mut s = loaded(SCENARIO);
    s.handle(SessionEvent::SetExportFilename("extractions_A_v2.csv".into()));
    s.handle(SessionEvent::PickBatch("A".into()));
    assert_eq!(s.export_filename(), "extractions_A_v2.csv");
    s.handle(SessionEvent::Next);
    assert_eq!(s.export_filename(), "extractions_B.csv");
    s.handle(SessionEvent::Previous);
    assert_eq!(s.export_filename(), "extractions_A.csv");
}

#[test]
fn repeated_header_columns_survive_commits() {
    let mut s = loaded("lot,date,val,val\nA,1,1,100\nB,2,2,200\n");
    s.handle(click(0));
    s.handle(click(0));
    assert_eq!(s.handle(SessionEvent::Validate).level, NoticeLevel::Success);
    s.handle(SessionEvent::Next);
    s.handle(click(0));
    s.handle(click(0));
    assert_eq!(s.handle(SessionEvent::Validate).level, NoticeLevel::Success);
    let export = s.export_table().table().unwrap();
    assert_eq!(export.columns(), &["lot", "date", "val", "val.1"]);
    assert_eq!(export.rows()[1], vec!["B", "2", "2", "200"]);
}

#[test]
fn malformed_upload_keeps_previous_table() {
    let mut s = loaded(SCENARIO);
    let notice = s.handle(SessionEvent::Upload {
        name: "bad.csv".into(),
        bytes: b"a,b\n1,2,3\n".to_vec(),
    });
    assert!(notice.is_error());
    assert_eq!(s.table().unwrap().n_rows(), 5);
    assert_eq!(s.upload_name(), Some("data.csv"));
}

#[test]
fn reupload_keeps_export_and_drops_vanished_lots() {
    let mut s = loaded(SCENARIO);
    s.handle(SessionEvent::Next);
    s.handle(click(0));
    s.handle(click(1));
    s.handle(SessionEvent::Validate);
    s.handle(SessionEvent::Upload {
        name: "second.csv".into(),
        bytes: b"lot,date,target\nA,1,1\n".to_vec(),
    });
    assert_eq!(s.current_batch(), Some("A"));
    assert!(s.recorder().current_selection("B").is_empty());
    assert_eq!(s.export_table().n_rows(), 2);
}

#[test]
fn changing_delimiter_reparses_upload() {
    let csv = "lot;date;target\nA;1;1\nB;2;2\n";
    let mut s = SessionState::default();
    let notice = s.handle(SessionEvent::Upload {
        name: "semi.csv".into(),
        bytes: csv.as_bytes().to_vec(),
    });
    // a single column cannot hold three distinct roles
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(s.roles().is_none());
    let notice = s.handle(SessionEvent::SetDelimiter(Delimiter::Semicolon));
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(s.navigator().batches(), &["A", "B"]);
}

#[test]
fn role_collisions_are_rejected() {
    let mut s = loaded(SCENARIO);
    let before = s.roles().cloned();
    let notice = s.handle(SessionEvent::ApplyRoles(ColumnRoles::new("lot", "lot", "target")));
    assert!(notice.is_error());
    assert_eq!(s.roles().cloned(), before);
}

#[test]
fn changing_lot_column_rebuilds_batches() {
    let csv = "lot,grp,date,target\nA,x,1,1\nB,x,2,2\nB,y,3,3\n";
    let mut s = loaded(csv);
    s.handle(click(0));
    let notice = s.handle(SessionEvent::ApplyRoles(ColumnRoles::new("grp", "date", "target")));
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(s.navigator().batches(), &["x", "y"]);
    assert!(s.current_selection().is_empty());
    assert_eq!(s.batch_rows().unwrap().unwrap().n_rows(), 2);
}

#[test]
fn overlay_series_per_lot_and_parameter() {
    let csv = "lot,date,temp,ph\n\
A,2024-01-01 10:00:00,20,7\n\
A,2024-01-01 10:00:10,21,7.1\n\
B,2024-01-02 08:00:05,30,6\n\
B,2024-01-02 08:00:00,29,6.1\n\
B,garbage,99,9\n";
    let mut s = loaded(csv);
    assert_eq!(s.overlay_parameters(), vec!["temp", "ph"]);
    s.handle(SessionEvent::OverlaySelectAll);
    s.handle(SessionEvent::OverlayToggleParameter("temp".into()));
    let series = s.overlay_series().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].points, vec![[0.0, 20.0], [10.0, 21.0]]);
    // sorted by time, unreadable date dropped
    assert_eq!(series[1].points, vec![[0.0, 29.0], [5.0, 30.0]]);
    assert_eq!(series[1].label(), "temp (Lot B)");

    s.handle(SessionEvent::OverlayDeselectAll);
    assert!(s.overlay_series().unwrap().is_empty());
}

#[test]
fn config_defaults_flow_into_session() {
    let cfg = CurveCutConfig {
        default_delimiter: Delimiter::Semicolon,
        export_filename_prefix: "cuts".into(),
        ..CurveCutConfig::default()
    };
    let mut s = SessionState::new(&cfg);
    s.handle(SessionEvent::Upload {
        name: "x.csv".into(),
        bytes: b"lot;date;target\nL1;1;1\n".to_vec(),
    });
    assert_eq!(s.export_filename(), "cuts_L1.csv");
}

#[test]
fn chart_for_current_lot() {
    let s = loaded(SCENARIO);
    let chart = s.batch_chart().unwrap().unwrap();
    assert_eq!(chart.target.points.len(), 3);
    assert_eq!(chart.target.rows, vec![0, 1, 2]);
}

#[test]
fn clearing_the_export_starts_over() {
    let mut s = loaded(SCENARIO);
    let last = s.handle_all([click(0), click(1), SessionEvent::Validate]);
    assert_eq!(last.map(|n| n.level), Some(NoticeLevel::Success));
    assert_eq!(s.last_commit().map(|c| c.rows), Some(2));
    s.handle(SessionEvent::ClearExport);
    assert!(s.export_table().is_empty());
    assert!(s.last_commit().is_none());
    // the click buffer is untouched, so the same range can be committed again
    assert!(s.can_commit());
}
