use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::bunk::{self, TargetPercent};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AttendedClass,
    MissedClass,
    AttendedLab,
    MissedLab,
    ClassCancelled,
    LabCancelled,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::AttendedClass,
        ActionKind::MissedClass,
        ActionKind::AttendedLab,
        ActionKind::MissedLab,
        ActionKind::ClassCancelled,
        ActionKind::LabCancelled,
    ];

    /// `(attended, missed)` credits this action adds.
    pub fn weights(self) -> (u32, u32) {
        match self {
            ActionKind::AttendedClass => (1, 0),
            ActionKind::MissedClass => (0, 1),
            ActionKind::AttendedLab => (2, 0),
            ActionKind::MissedLab => (0, 2),
            ActionKind::ClassCancelled | ActionKind::LabCancelled => (0, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::AttendedClass => "present",
            ActionKind::MissedClass => "absent",
            ActionKind::AttendedLab => "lab-present",
            ActionKind::MissedLab => "lab-absent",
            ActionKind::ClassCancelled => "cancelled",
            ActionKind::LabCancelled => "lab-cancelled",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Attendance counters for one subject plus the actions that produced them.
///
/// Operations never mutate in place: [`apply`](Self::apply) and
/// [`undo`](Self::undo) return the next ledger value and leave `self` alone.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceLedger {
    pub attended_count: u32,
    pub missed_count: u32,
    #[serde(default)]
    pub history: Vec<ActionKind>,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn apply(&self, action: ActionKind) -> Self {
        let (attended, missed) = action.weights();
        let mut history = self.history.clone();
        history.push(action);

        Self {
            attended_count: self.attended_count.saturating_add(attended),
            missed_count: self.missed_count.saturating_add(missed),
            history,
        }
    }

    /// Reverses the newest action. Counters clamp at zero, so a ledger whose
    /// counters were edited out of step with its history is not restored
    /// exactly. An empty history yields an unchanged copy.
    #[must_use]
    pub fn undo(&self) -> Self {
        let mut history = self.history.clone();
        let Some(last) = history.pop() else {
            return self.clone();
        };
        let (attended, missed) = last.weights();

        Self {
            attended_count: self.attended_count.saturating_sub(attended),
            missed_count: self.missed_count.saturating_sub(missed),
            history,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.attended_count) + u64::from(self.missed_count)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn last_action(&self) -> Option<ActionKind> {
        self.history.last().copied()
    }

    /// Rounded half-up; 100 when nothing has been counted yet.
    pub fn attendance_percent(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 100;
        }
        let attended = u64::from(self.attended_count);
        ((attended * 200 + total) / (total * 2)) as u8
    }

    pub fn meets_target(&self, target: TargetPercent) -> bool {
        bunk::ratio_meets(u64::from(self.attended_count), self.total(), target)
    }

    /// How many more single classes can be missed while the exact ratio stays
    /// at or above `target`. A ledger with nothing counted has no ratio to
    /// protect yet and reports 0, matching the step-by-step simulation.
    pub fn bunk_allowance(&self, target: TargetPercent) -> u32 {
        if self.total() == 0 {
            return 0;
        }
        bunk::allowance_closed_form(self.attended_count, self.missed_count, target)
    }
}
