use std::cell::RefCell;
use std::rc::Rc;

use gridstore_core::action::{
    AddHighlightRange, AddNamedRange, AddOutline, CopyRange, InsertAction, MergeAction, MoveRange,
    RemoveAction, RemoveNamedRange, RemoveRangeData, RemoveRangeStyle, ResizeHeaders,
    SetCellData, SetHeadersVisible, SetOutlineCollapsed, SetPartialGrid, SetRangeBorders,
    SetRangeData, SetRangeStyle, UnmergeAction,
};
use gridstore_core::grid::{
    Axis, BorderLine, BorderPositions, BorderSide, CellPosition, CellStore, CellValue, Color,
    GridContent, GridError, HeaderTable, HighlightRange, NamedRange, OutlineRegistry,
    PartialGrid, RangePosition, RangeRegistry, RangeStyle, StyleFlags,
};
use gridstore_core::{
    Action, ActionEngine, ActionGroup, EngineConfig, SheetError, Worksheet, WorksheetEvent,
};
use pretty_assertions::assert_eq;

/// Everything observable about a worksheet's state.
#[derive(Debug, PartialEq)]
struct Snapshot {
    cells: CellStore,
    rows: HeaderTable,
    columns: HeaderTable,
    root: RangeStyle,
    ranges: RangeRegistry,
    outlines: Option<OutlineRegistry>,
}

fn snapshot(sheet: &Worksheet) -> Snapshot {
    Snapshot {
        cells: sheet.cells().clone(),
        rows: sheet.headers(Axis::Row).clone(),
        columns: sheet.headers(Axis::Column).clone(),
        root: sheet.root_style().clone(),
        ranges: sheet.ranges().clone(),
        outlines: sheet.outlines().cloned(),
    }
}

fn engine(rows: usize, cols: usize) -> ActionEngine {
    ActionEngine::with_config(EngineConfig::with_size(rows, cols)).unwrap()
}

fn cell(text: &str) -> CellPosition {
    text.parse().unwrap()
}

fn range(text: &str) -> RangePosition {
    text.parse().unwrap()
}

fn value(engine: &ActionEngine, at: &str) -> Option<CellValue> {
    engine.sheet().cell(cell(at)).and_then(|c| c.value.clone())
}

/// A sheet with some data, styles, a merge, a named range and an outline.
fn populated() -> ActionEngine {
    let mut engine = engine(12, 8);
    for (row, text) in ["10", "20", "=A1+A2", "label", "TRUE"].iter().enumerate() {
        engine
            .do_action(SetCellData::from_text(CellPosition::new(row, 0), text))
            .unwrap();
    }
    engine
        .do_action(SetRangeStyle::new(range("B2:C3"), RangeStyle::new().with_italic(true)))
        .unwrap();
    engine
        .do_action(SetRangeStyle::new(range("7:7"), RangeStyle::new().with_bold(true)))
        .unwrap();
    engine.do_action(MergeAction::new(range("D4:E6"))).unwrap();
    engine
        .do_action(AddNamedRange::new(NamedRange::new("Total", range("A4:B5"))))
        .unwrap();
    engine.do_action(AddOutline::new(Axis::Row, 2, 5)).unwrap();
    engine.clear_history();
    engine
}

/// Do, undo and redo `action`, checking state after each step.
fn check_round_trip(mut engine: ActionEngine, action: impl Into<Action>) {
    let before = snapshot(engine.sheet());
    engine.do_action(action).unwrap();
    let after = snapshot(engine.sheet());
    engine.undo().unwrap();
    assert_eq!(snapshot(engine.sheet()), before);
    engine.redo().unwrap();
    assert_eq!(snapshot(engine.sheet()), after);
    engine.undo().unwrap();
    assert_eq!(snapshot(engine.sheet()), before);
}

#[test]
fn test_insert_rows_scenario() {
    let mut engine = engine(10, 10);
    engine
        .do_action(SetCellData::from_text(cell("A6"), "row five"))
        .unwrap();
    let before = snapshot(engine.sheet());

    engine.do_action(InsertAction::rows(5, 3)).unwrap();
    assert_eq!(engine.sheet().row_count(), 13);
    assert_eq!(value(&engine, "A9"), Some(CellValue::Text("row five".into())));
    assert_eq!(value(&engine, "A6"), None);

    engine.undo().unwrap();
    assert_eq!(snapshot(engine.sheet()), before);
}

#[test]
fn test_full_row_style_scenario() {
    let mut engine = engine(10, 26);
    let before = snapshot(engine.sheet());
    let bold = RangeStyle::new().with_bold(true);
    engine
        .do_action(SetRangeStyle::new(RangePosition::full_rows(2, 1), bold.clone()))
        .unwrap();

    let sheet = engine.sheet();
    assert!(sheet.cells().is_empty());
    assert_eq!(sheet.headers(Axis::Row).get(2).unwrap().style, Some(bold));
    assert!((0..10).filter(|&r| r != 2).all(|r| sheet.headers(Axis::Row).get(r).unwrap().style.is_none()));
    assert!(sheet.headers(Axis::Column).iter().all(|(_, h)| h.style.is_none()));

    engine.undo().unwrap();
    assert_eq!(snapshot(engine.sheet()), before);
}

#[test]
fn test_remove_rows_with_named_range_scenario() {
    let mut engine = engine(10, 10);
    let total = NamedRange::new("Total", RangePosition::new(3, 0, 2, 4));
    engine.do_action(AddNamedRange::new(total.clone())).unwrap();

    engine.do_action(RemoveAction::rows(3, 2)).unwrap();
    assert!(engine.sheet().ranges().find("Total").is_none());
    assert_eq!(engine.sheet().row_count(), 8);

    engine.undo().unwrap();
    assert_eq!(engine.sheet().ranges().find("Total"), Some(&total));
}

#[test]
fn test_reusable_clone_scenario() {
    let mut engine = engine(6, 6);
    let original = Action::from(SetRangeStyle::new(
        range("A1:B2"),
        RangeStyle::new().with_back_color(Some(Color::rgb(255, 255, 0))),
    ));
    let clone = original.clone_to(range("C3:D4")).unwrap();
    assert_eq!(clone.range(), Some(range("C3:D4")));

    engine.do_action(clone).unwrap();
    let sheet = engine.sheet();
    let styled: Vec<CellPosition> = sheet.cells().iter().map(|(pos, _)| pos).collect();
    assert_eq!(styled, range("C3:D4").positions().collect::<Vec<_>>());

    // The original was never done, so it has nothing to undo.
    let mut original = original;
    assert_eq!(
        gridstore_core::Undoable::undo(&mut original, engine.sheet_mut()),
        Err(SheetError::NotDone("SetRangeStyle"))
    );
}

#[test]
fn test_move_scenario() {
    let mut engine = engine(10, 10);
    engine
        .do_action(SetRangeData::new(
            cell("A1"),
            vec![
                vec![Some(CellValue::Number(1.0))],
                vec![Some(CellValue::Number(2.0))],
                vec![Some(CellValue::Number(3.0))],
            ],
        ))
        .unwrap();
    let before = snapshot(engine.sheet());

    engine.do_action(MoveRange::new(range("A1:A3"), cell("C1"))).unwrap();
    assert_eq!(value(&engine, "A2"), None);
    assert_eq!(value(&engine, "C3"), Some(CellValue::Number(3.0)));

    engine.undo().unwrap();
    assert_eq!(value(&engine, "A3"), Some(CellValue::Number(3.0)));
    assert_eq!(value(&engine, "C1"), None);
    assert_eq!(snapshot(engine.sheet()), before);
}

#[test]
fn test_round_trips() {
    let side = BorderSide::new(BorderLine::Double, Color::rgb(0, 0, 128));
    let pasted = PartialGrid::from_values(vec![
        vec![Some(CellValue::Number(1.0)), None],
        vec![Some(CellValue::Text("x".into())), Some(CellValue::Bool(false))],
    ]);
    let actions: Vec<Action> = vec![
        SetCellData::from_text(cell("A1"), "line one\nline two").into(),
        SetCellData::from_text(cell("E5"), "inside merge").into(),
        SetRangeData::new(cell("F1"), vec![vec![Some(CellValue::Number(5.0)), None]]).into(),
        RemoveRangeData::new(range("A1:A5")).into(),
        SetPartialGrid::new(range("F8:H12"), pasted, GridContent::DATA).into(),
        SetRangeStyle::new(range("A:A"), RangeStyle::new().with_italic(false)).into(),
        SetRangeStyle::new(RangePosition::entire(), RangeStyle::new().with_bold(false)).into(),
        RemoveRangeStyle::new(range("B2:B2"), StyleFlags::all()).into(),
        RemoveRangeStyle::new(RangePosition::entire(), StyleFlags::BOLD).into(),
        SetRangeBorders::new(range("A1:C3"), BorderPositions::all(), side).into(),
        InsertAction::columns(1, 2).into(),
        InsertAction::rows(4, 1).into(),
        RemoveAction::rows(3, 3).into(),
        RemoveAction::columns(0, 4).into(),
        RemoveAction::rows(2, 5).into(),
        MergeAction::new(range("F1:G2")).into(),
        UnmergeAction::new(range("E5")).into(),
        MoveRange::new(range("A1:B3"), cell("B2")).into(),
        CopyRange::new(range("A1:C3"), cell("E8")).into(),
        ResizeHeaders::new(Axis::Row, 0, 3, 44).into(),
        SetHeadersVisible::hide(Axis::Column, 1, 2).into(),
        RemoveNamedRange::new("total").into(),
        AddHighlightRange::new(HighlightRange::new("Watch", range("B2:C3"), Color::rgb(255, 0, 0))).into(),
        SetOutlineCollapsed::new(Axis::Row, 2, 5, true).into(),
        ActionGroup::new("batch")
            .with(InsertAction::rows(0, 1))
            .with(SetCellData::from_text(cell("A1"), "header"))
            .with(SetRangeStyle::new(range("1:1"), RangeStyle::new().with_bold(true)))
            .into(),
    ];
    for action in actions {
        check_round_trip(populated(), action);
    }
}

#[test]
fn test_redo_matches_first_do() {
    let mut engine = populated();
    engine.do_action(RemoveAction::rows(4, 2)).unwrap();
    engine.do_action(InsertAction::columns(0, 1)).unwrap();
    engine
        .do_action(SetCellData::from_text(cell("A1"), "after"))
        .unwrap();
    let done = snapshot(engine.sheet());

    for _ in 0..3 {
        engine.undo().unwrap();
    }
    for _ in 0..3 {
        engine.redo().unwrap();
    }
    assert_eq!(snapshot(engine.sheet()), done);
    assert_eq!(engine.redo(), Err(SheetError::NothingToRedo));
}

#[test]
fn test_structural_limit_is_not_recorded() {
    let mut engine = populated();
    let before = snapshot(engine.sheet());
    let err = engine.do_action(RemoveAction::columns(0, 8)).unwrap_err();
    assert_eq!(
        err,
        SheetError::Grid(GridError::StructuralLimit("cannot delete all 8 columns".into()))
    );
    assert!(!engine.can_undo());
    assert_eq!(snapshot(engine.sheet()), before);
}

#[test]
fn test_clone_to_full_bands_scenario() {
    let mut engine = populated();
    let before = snapshot(engine.sheet());

    let hide = Action::from(SetHeadersVisible::hide(Axis::Column, 0, 1));
    engine
        .do_action(hide.clone_to(RangePosition::full_rows(2, 1)).unwrap())
        .unwrap();
    assert!(engine.sheet().headers(Axis::Column).iter().all(|(_, h)| !h.visible));
    engine.undo().unwrap();
    assert_eq!(snapshot(engine.sheet()), before);

    let resize = Action::from(ResizeHeaders::new(Axis::Row, 0, 1, 44));
    engine
        .do_action(resize.clone_to(RangePosition::full_columns(3, 2)).unwrap())
        .unwrap();
    assert!(engine.sheet().headers(Axis::Row).iter().all(|(_, h)| h.size == 44));
    engine.undo().unwrap();
    assert_eq!(snapshot(engine.sheet()), before);

    let insert = Action::from(InsertAction::rows(0, 1));
    let err = engine
        .do_action(insert.clone_to(RangePosition::full_columns(1, 1)).unwrap())
        .unwrap_err();
    assert!(err.is_structural_limit());
    let remove = Action::from(RemoveAction::columns(0, 1));
    let err = engine
        .do_action(remove.clone_to(RangePosition::full_rows(4, 1)).unwrap())
        .unwrap_err();
    assert!(err.is_structural_limit());

    assert!(!engine.can_undo());
    assert_eq!(snapshot(engine.sheet()), before);
}

#[test]
fn test_data_paste_over_merge_scenario() {
    let mut engine = engine(6, 6);
    engine.do_action(MergeAction::new(range("B2:C3"))).unwrap();
    engine.clear_history();
    let before = snapshot(engine.sheet());

    let number = |n: f64| Some(CellValue::Number(n));
    let grid = PartialGrid::from_values(vec![
        vec![number(1.0), number(2.0)],
        vec![number(3.0), number(4.0)],
    ]);
    engine
        .do_action(SetPartialGrid::new(range("B2:C3"), grid, GridContent::DATA))
        .unwrap();
    let after = snapshot(engine.sheet());
    assert_eq!(value(&engine, "B2"), Some(CellValue::Number(1.0)));
    for interior in ["C2", "B3", "C3"] {
        assert_eq!(value(&engine, interior), None);
    }
    assert_eq!(engine.sheet().cells().merge_at(cell("C3")), Some(range("B2:C3")));
    assert!(engine.sheet().cells().check_merge_integrity().is_ok());

    engine.undo().unwrap();
    assert_eq!(snapshot(engine.sheet()), before);
    engine.redo().unwrap();
    assert_eq!(snapshot(engine.sheet()), after);
}

#[test]
fn test_group_rolls_back_on_failure() {
    let mut engine = populated();
    let before = snapshot(engine.sheet());
    let group = ActionGroup::new("doomed")
        .with(SetCellData::from_text(cell("H12"), "x"))
        .with(RemoveAction::rows(0, 1))
        .with(MergeAction::new(range("D5:F5")));
    let err = engine.do_action(group).unwrap_err();
    assert!(matches!(err, SheetError::Grid(GridError::RangeIntersection(_))));
    assert_eq!(snapshot(engine.sheet()), before);
    assert!(!engine.can_undo());
}

#[test]
fn test_readonly_cells_are_reported_and_skipped() {
    let mut engine = engine(4, 4);
    engine.sheet_mut().set_readonly(range("B1"), true).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    engine.sheet_mut().add_listener(move |event: &WorksheetEvent| {
        if let WorksheetEvent::CellError { pos, .. } = event {
            sink.borrow_mut().push(*pos);
        }
    });

    engine
        .do_action(SetRangeData::new(
            cell("A1"),
            vec![vec![Some(CellValue::Number(1.0)), Some(CellValue::Number(2.0))]],
        ))
        .unwrap();
    assert_eq!(seen.borrow().as_slice(), &[cell("B1")]);
    assert_eq!(value(&engine, "A1"), Some(CellValue::Number(1.0)));
    assert_eq!(value(&engine, "B1"), None);
    assert!(engine.can_undo());
}

#[test]
fn test_structural_events_reach_listeners() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let sheet = Worksheet::with_listeners(
        EngineConfig::with_size(5, 5),
        vec![Box::new(move |event: &WorksheetEvent| {
            if matches!(
                event,
                WorksheetEvent::RowsInserted { .. } | WorksheetEvent::RowsDeleted { .. }
            ) {
                sink.borrow_mut().push(event.clone());
            }
        })],
    )
    .unwrap();
    let mut engine = ActionEngine::new(sheet);
    engine.do_action(InsertAction::rows(1, 2)).unwrap();
    engine.undo().unwrap();
    assert_eq!(
        events.borrow().as_slice(),
        &[
            WorksheetEvent::RowsInserted { at: 1, count: 2 },
            WorksheetEvent::RowsDeleted { at: 1, count: 2 },
        ]
    );
}
