use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Thresholds;
use crate::model::ledger::ActionKind;
use crate::model::subject::Subject;

/// Read model handed to front ends: one subject with its derived hints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubjectDto {
    pub id: Uuid,
    pub short_id: String,
    pub name: String,
    pub attended: u32,
    pub missed: u32,
    pub percent: u8,
    pub target: u8,
    pub custom_target: bool,
    pub below_target: bool,
    /// Absences left before dropping under `target`
    pub allowance: u32,
    pub allowance_safe: u32,
    pub allowance_minimum: u32,
    pub history_len: usize,
    pub last_action: Option<ActionKind>,
}

impl SubjectDto {
    pub fn from_entity(subject: &Subject, thresholds: &Thresholds) -> Self {
        let ledger = &subject.ledger;
        let target = subject.effective_target(thresholds.default_target);

        Self {
            id: subject.id,
            short_id: subject.short_id(),
            name: subject.name.clone(),
            attended: ledger.attended_count,
            missed: ledger.missed_count,
            percent: ledger.attendance_percent(),
            target: target.get(),
            custom_target: subject.target.is_some(),
            below_target: !ledger.meets_target(target),
            allowance: ledger.bunk_allowance(target),
            allowance_safe: ledger.bunk_allowance(thresholds.safe),
            allowance_minimum: ledger.bunk_allowance(thresholds.minimum),
            history_len: ledger.history.len(),
            last_action: ledger.last_action(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ledger::AttendanceLedger;

    #[test]
    fn test_from_entity_hints() {
        let mut subject = Subject::new("Algorithms".to_string());
        subject.ledger = AttendanceLedger {
            attended_count: 30,
            missed_count: 10,
            history: vec![ActionKind::MissedClass],
        };

        let dto = SubjectDto::from_entity(&subject, &Thresholds::default());
        assert_eq!(dto.percent, 75);
        assert_eq!(dto.target, 75);
        assert!(!dto.custom_target);
        assert!(!dto.below_target);
        assert_eq!(dto.allowance, 0);
        assert_eq!(dto.allowance_safe, 0);
        assert_eq!(dto.allowance_minimum, 20);
        assert_eq!(dto.history_len, 1);
        assert_eq!(dto.last_action, Some(ActionKind::MissedClass));
    }

    #[test]
    fn test_fresh_subject_is_not_below_target() {
        let subject = Subject::new("Ethics".to_string());
        let dto = SubjectDto::from_entity(&subject, &Thresholds::default());
        assert_eq!(dto.percent, 100);
        assert!(!dto.below_target);
        assert_eq!(dto.allowance, 0);
        assert_eq!(dto.last_action, None);
    }
}
