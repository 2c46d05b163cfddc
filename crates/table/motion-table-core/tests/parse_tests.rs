use motion_table_core::{MotionTable, RawCell, TableError, TimeUnit};

fn rows(cells: &[&[RawCell]]) -> Vec<Vec<RawCell>> {
    cells.iter().map(|r| r.to_vec()).collect()
}

#[test]
fn test_parse_minimal_table() {
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "j1".into()],
            &[0.0.into(), 0.0.into()],
            &[10.0.into(), (-2.3).into()],
            &[15.0.into(), (-2.5).into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();

    assert_eq!(table.times(), &[0.0, 10.0, 15.0]);
    assert_eq!(table.angle_names().collect::<Vec<_>>(), vec!["j1"]);
    assert_eq!(table.name(), "Unnamed Motion");
    assert_eq!(table.start_time(), 0.0);
    assert_eq!(table.end_time(), 15.0);
}

#[test]
fn test_autodetected_millisecond_unit() {
    // Total span > 1000 with no declared unit reads as milliseconds.
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "j1".into()],
            &[0.0.into(), 0.0.into()],
            &[10.0.into(), (-2.3).into()],
            &[1000.0.into(), 1.23.into()],
        ]),
        None,
    )
    .unwrap();
    assert_eq!(table.times(), &[0.0, 0.01, 1.0]);
}

#[test]
fn test_actor_prefixed_descriptor_header() {
    // "robot1-RPOSX" strips the delimiter, records the actor and lands in
    // the descriptor map under the canonical key.
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "robot1-RPOSX".into()],
            &[0.0.into(), 1.5.into()],
            &[1.0.into(), 2.5.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();

    assert_eq!(
        table.descriptor_names().collect::<Vec<_>>(),
        vec!["robot1X_POS"]
    );
    assert!(table.actor_names().contains("robot1"));
    assert!(!table.actor_names().contains("time"));
}

#[test]
fn test_header_whitespace_normalized() {
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "  left elbow ".into()],
            &[0.0.into(), 0.1.into()],
            &[1.0.into(), 0.2.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();
    assert_eq!(table.angle_names().collect::<Vec<_>>(), vec!["left_elbow"]);
}

#[test]
fn test_blank_cells_are_skipped() {
    // A blank cell shortens its column rather than contributing a zero.
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "X_POS".into(), "j1".into()],
            &[0.0.into(), 1.0.into(), 0.0.into()],
            &[1.0.into(), "".into(), 1.0.into()],
            &[2.0.into(), "".into(), 2.0.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();
    assert_eq!(table.series("X_POS").unwrap().values(), &[1.0]);
    assert_eq!(table.series("j1").unwrap().values(), &[0.0, 1.0, 2.0]);
}

#[test]
fn test_timestamp_column_accepted() {
    let table = MotionTable::parse(
        &rows(&[
            &["timestamp".into(), "j1".into()],
            &[0.0.into(), 0.0.into()],
            &[1.0.into(), 1.0.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();
    assert_eq!(table.times(), &[0.0, 1.0]);
}

#[test]
fn test_duplicate_time_rows_collapse() {
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "j1".into()],
            &[5.0.into(), 1.0.into()],
            &[5.0.into(), 2.0.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();
    assert_eq!(table.times(), &[0.0]);
    assert_eq!(table.series("j1").unwrap().values(), &[1.0]);
}

#[test]
fn test_single_descending_row_repaired() {
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "j1".into()],
            &[0.0.into(), 0.0.into()],
            &[10.0.into(), 1.0.into()],
            &[5.0.into(), 9.0.into()],
            &[20.0.into(), 2.0.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();
    assert_eq!(table.times(), &[0.0, 10.0, 20.0]);
    assert_eq!(table.series("j1").unwrap().values(), &[0.0, 1.0, 2.0]);
}

#[test]
fn test_long_descending_run_aborts() {
    let err = MotionTable::parse(
        &rows(&[
            &["time".into(), "j1".into()],
            &[100.0.into(), 0.0.into()],
            &[1.0.into(), 0.0.into()],
            &[2.0.into(), 0.0.into()],
            &[3.0.into(), 0.0.into()],
            &[4.0.into(), 0.0.into()],
            &[5.0.into(), 0.0.into()],
            &[6.0.into(), 0.0.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap_err();
    assert_eq!(err, TableError::DescendingTimeRun { count: 6 });
}

#[test]
fn test_empty_grid_rejected() {
    let err = MotionTable::parse(&[], None).unwrap_err();
    assert_eq!(err, TableError::EmptyGrid);
}

#[test]
fn test_numeric_header_rejected() {
    let err = MotionTable::parse(
        &rows(&[
            &["time".into(), 7.0.into()],
            &[0.0.into(), 0.0.into()],
        ]),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, TableError::NonStringHeader { column: 1, .. }));
}

#[test]
fn test_both_time_columns_rejected() {
    let err = MotionTable::parse(
        &rows(&[
            &["time".into(), "timestamp".into()],
            &[0.0.into(), 0.0.into()],
        ]),
        None,
    )
    .unwrap_err();
    assert_eq!(err, TableError::AmbiguousTimeColumn);
}

#[test]
fn test_missing_time_column_rejected() {
    let err = MotionTable::parse(
        &rows(&[
            &["j1".into(), "j2".into()],
            &[0.0.into(), 0.0.into()],
        ]),
        None,
    )
    .unwrap_err();
    assert_eq!(err, TableError::MissingTimeColumn);
}

#[test]
fn test_bad_cells_fall_back_to_zero() {
    // The cleaner replaces non-numeric data cells before the parse sees
    // them, so a stray word becomes a zero sample, not an error.
    let table = MotionTable::parse(
        &rows(&[
            &["time".into(), "j1".into()],
            &[0.0.into(), "wat".into()],
            &[1.0.into(), 3.0.into()],
        ]),
        Some(TimeUnit::Second),
    )
    .unwrap();
    assert_eq!(table.series("j1").unwrap().values(), &[0.0, 3.0]);
}
