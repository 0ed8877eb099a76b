use gridstore_core::action::{InsertAction, MergeAction, RemoveAction};
use gridstore_core::grid::{Axis, RangePosition};
use gridstore_core::{Action, ActionEngine, EngineConfig};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Edit {
    Insert(Axis, usize, usize),
    Remove(Axis, usize, usize),
    Merge(usize, usize, usize, usize),
}

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Row), Just(Axis::Column)]
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (axis(), 0..12usize, 1..4usize).prop_map(|(a, at, n)| Edit::Insert(a, at, n)),
        (axis(), 0..12usize, usize::MAX - 2..=usize::MAX).prop_map(|(a, at, n)| Edit::Insert(a, at, n)),
        (axis(), 0..12usize, 1..8usize).prop_map(|(a, at, n)| Edit::Remove(a, at, n)),
        (0..10usize, 0..10usize, 1..4usize, 1..4usize).prop_map(|(r, c, h, w)| Edit::Merge(r, c, h, w)),
    ]
}

fn to_action(edit: &Edit) -> Action {
    match *edit {
        Edit::Insert(axis, at, count) => InsertAction::new(axis, at, count).into(),
        Edit::Remove(axis, at, count) => RemoveAction::new(axis, at, count).into(),
        Edit::Merge(row, col, rows, cols) => MergeAction::new(RangePosition::new(row, col, rows, cols)).into(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn sheet_never_drops_below_one_row_or_column(edits in proptest::collection::vec(edit(), 1..24)) {
        let mut engine = ActionEngine::with_config(EngineConfig::with_size(6, 6)).unwrap();
        for edit in &edits {
            // Failures are expected; the sheet must stay valid either way.
            let _ = engine.do_action(to_action(edit));
            prop_assert!(engine.sheet().row_count() >= 1);
            prop_assert!(engine.sheet().column_count() >= 1);
            prop_assert_eq!(engine.sheet().headers(Axis::Row).len(), engine.sheet().row_count());
            prop_assert_eq!(engine.sheet().headers(Axis::Column).len(), engine.sheet().column_count());
        }
    }

    #[test]
    fn merges_stay_consistent_through_edits_and_undo(edits in proptest::collection::vec(edit(), 1..16)) {
        let mut engine = ActionEngine::with_config(EngineConfig::with_size(10, 10)).unwrap();
        let initial = engine.sheet().cells().clone();
        let mut recorded = 0;
        for edit in &edits {
            if engine.do_action(to_action(edit)).is_ok() {
                recorded += 1;
            }
            prop_assert!(engine.sheet().cells().check_merge_integrity().is_ok());
        }
        for _ in 0..recorded {
            engine.undo().unwrap();
            prop_assert!(engine.sheet().cells().check_merge_integrity().is_ok());
        }
        prop_assert_eq!(engine.sheet().cells(), &initial);
    }

    #[test]
    fn oversized_inserts_change_nothing(
        axis in axis(),
        at in 0..8usize,
        count in prop_oneof![Just(usize::MAX), 1_048_577..=usize::MAX],
    ) {
        let mut engine = ActionEngine::with_config(EngineConfig::with_size(6, 6)).unwrap();
        let before = engine.sheet().cells().clone();
        let err = engine.do_action(InsertAction::new(axis, at, count)).unwrap_err();
        prop_assert!(err.is_structural_limit());
        prop_assert!(!engine.can_undo());
        prop_assert_eq!(engine.sheet().row_count(), 6);
        prop_assert_eq!(engine.sheet().column_count(), 6);
        prop_assert_eq!(engine.sheet().headers(axis).len(), 6);
        prop_assert_eq!(engine.sheet().cells(), &before);
    }
}
