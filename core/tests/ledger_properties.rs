//! Property tests for the attendance ledger and the bunk calculator.

use bunkr_core::{allowance_closed_form, ActionKind, AttendanceLedger, TargetPercent};
use proptest::collection::vec;
use proptest::prelude::*;

fn action() -> impl Strategy<Value = ActionKind> {
    prop::sample::select(ActionKind::ALL.to_vec())
}

fn target() -> impl Strategy<Value = TargetPercent> {
    (1i64..=100).prop_map(|v| TargetPercent::new(v).expect("in range"))
}

fn replay(actions: &[ActionKind]) -> AttendanceLedger {
    actions
        .iter()
        .fold(AttendanceLedger::new(), |ledger, a| ledger.apply(*a))
}

proptest! {
    /// Undo reverses the most recent apply on any ledger built from actions.
    #[test]
    fn apply_then_undo_is_identity(actions in vec(action(), 0..40), next in action()) {
        let ledger = replay(&actions);
        prop_assert_eq!(ledger.apply(next).undo(), ledger);
    }

    /// Undoing everything walks back to the empty ledger, one step at a time.
    #[test]
    fn undo_walks_history_backwards(actions in vec(action(), 0..40)) {
        let mut ledger = replay(&actions);
        for n in (0..actions.len()).rev() {
            ledger = ledger.undo();
            prop_assert_eq!(&ledger, &replay(&actions[..n]));
        }
        prop_assert_eq!(ledger.undo(), AttendanceLedger::new());
    }

    /// History is the applied actions, in order.
    #[test]
    fn history_preserves_order(actions in vec(action(), 0..40)) {
        prop_assert_eq!(replay(&actions).history, actions);
    }

    /// Counters never go negative, even when history and counters disagree.
    #[test]
    fn undo_clamps_out_of_sync_counters(
        attended in 0u32..3,
        missed in 0u32..3,
        history in vec(action(), 1..10),
    ) {
        let ledger = AttendanceLedger { attended_count: attended, missed_count: missed, history };
        let undone = ledger.undo();
        prop_assert!(undone.attended_count <= ledger.attended_count);
        prop_assert!(undone.missed_count <= ledger.missed_count);
        prop_assert_eq!(undone.history.len(), ledger.history.len() - 1);
    }

    #[test]
    fn percent_is_bounded(attended in 0u32..10_000, missed in 0u32..10_000) {
        let ledger = AttendanceLedger { attended_count: attended, missed_count: missed, history: vec![] };
        prop_assert!(ledger.attendance_percent() <= 100);
    }

    /// The reported allowance is exactly how many absences the target survives.
    #[test]
    fn allowance_is_tight(attended in 0u32..300, missed in 0u32..300, t in target()) {
        prop_assume!(attended + missed > 0);
        let ledger = AttendanceLedger { attended_count: attended, missed_count: missed, history: vec![] };
        let allowance = ledger.bunk_allowance(t);

        let after = AttendanceLedger { missed_count: missed + allowance, ..ledger.clone() };

        if ledger.meets_target(t) {
            prop_assert!(after.meets_target(t));
            prop_assert!(after.attendance_percent() >= t.get());
        } else {
            prop_assert_eq!(allowance, 0);
        }
        prop_assert!(!after.apply(ActionKind::MissedClass).meets_target(t));
    }
}

#[test]
fn thirty_of_forty_sits_exactly_at_safe_threshold() {
    let ledger = AttendanceLedger { attended_count: 30, missed_count: 10, history: vec![] };
    assert_eq!(ledger.attendance_percent(), 75);
    assert_eq!(ledger.bunk_allowance(TargetPercent::SAFE), 0);
    assert!(ledger.bunk_allowance(TargetPercent::MINIMUM) > 0);

    assert_eq!(allowance_closed_form(30, 5, TargetPercent::SAFE), 5);
}

#[test]
fn closed_form_is_constant_time_at_the_lowest_target() {
    let t = TargetPercent::new(1).expect("in range");
    assert_eq!(allowance_closed_form(u32::MAX, 0, t), u32::MAX);
    assert_eq!(
        AttendanceLedger { attended_count: u32::MAX, missed_count: 0, history: vec![] }.bunk_allowance(t),
        u32::MAX
    );
}
