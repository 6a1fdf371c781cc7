use anyhow::Result;
use serde::Serialize;

use crate::model::bunk;
use crate::model::subject::Subject;
use crate::repository::Repository;
use crate::service::dto::SubjectDto;
use crate::service::subject_service::SubjectService;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Overview {
    pub subject_count: usize,
    pub total_attended: u64,
    pub total_missed: u64,
    pub overall_percent: u8,
    /// Combined counters measured against the default target
    pub overall_meets_target: bool,
    /// Sorted by percent, worst first
    pub at_risk: Vec<SubjectDto>,
}

pub struct OverviewUseCase<'a, R: Repository<Subject>> {
    subject_service: &'a SubjectService<R>,
}

impl<'a, R: Repository<Subject>> OverviewUseCase<'a, R> {
    pub fn new(subject_service: &'a SubjectService<R>) -> Self {
        Self { subject_service }
    }

    pub fn get_overview(&self) -> Result<Overview> {
        let subjects = self.subject_service.subjects()?;
        let default_target = self.subject_service.thresholds().default_target;

        let total_attended: u64 = subjects.iter().map(|s| u64::from(s.ledger.attended_count)).sum();
        let total_missed: u64 = subjects.iter().map(|s| u64::from(s.ledger.missed_count)).sum();

        let mut at_risk: Vec<SubjectDto> = subjects
            .iter()
            .filter(|s| !s.ledger.meets_target(s.effective_target(default_target)))
            .map(|s| self.subject_service.summarize(s))
            .collect();
        at_risk.sort_by(|a, b| a.percent.cmp(&b.percent).then_with(|| a.name.cmp(&b.name)));

        Ok(Overview {
            subject_count: subjects.len(),
            total_attended,
            total_missed,
            overall_percent: overall_percent(total_attended, total_missed),
            overall_meets_target: bunk::ratio_meets(
                total_attended,
                total_attended + total_missed,
                default_target,
            ),
            at_risk,
        })
    }
}

// Same rounding as the per-subject percentage, over u64 totals.
fn overall_percent(attended: u64, missed: u64) -> u8 {
    let total = attended + missed;
    if total == 0 {
        return 100;
    }
    ((attended * 200 + total) / (total * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::model::bunk::TargetPercent;
    use crate::model::ledger::AttendanceLedger;
    use anyhow::Result;
    use uuid::Uuid;

    struct MockSubjectRepo {
        subjects: Vec<Subject>,
    }

    impl Repository<Subject> for MockSubjectRepo {
        fn save(&self, _item: &Subject) -> Result<()> { unimplemented!() }
        fn get(&self, _id: &Uuid) -> Result<Subject> { unimplemented!() }
        fn delete(&self, _id: &Uuid) -> Result<()> { unimplemented!() }
        fn list(&self) -> Result<Vec<Subject>> { Ok(self.subjects.clone()) }
    }

    fn subject(name: &str, attended: u32, missed: u32) -> Subject {
        let mut s = Subject::new(name.to_string());
        s.ledger = AttendanceLedger {
            attended_count: attended,
            missed_count: missed,
            history: Vec::new(),
        };
        s
    }

    #[test]
    fn test_overview_totals_and_risk() {
        let mut strict = subject("Lab Safety", 18, 2);
        strict.target = Some(TargetPercent::new(95).unwrap());

        let repo = MockSubjectRepo {
            subjects: vec![
                subject("Maths", 30, 10),
                subject("Physics", 5, 5),
                subject("Art", 1, 3),
                strict,
            ],
        };
        let service = SubjectService::new(repo, Thresholds::default());
        let overview = OverviewUseCase::new(&service).get_overview().unwrap();

        assert_eq!(overview.subject_count, 4);
        assert_eq!(overview.total_attended, 54);
        assert_eq!(overview.total_missed, 20);
        // 54 / 74 = 72.97
        assert_eq!(overview.overall_percent, 73);
        assert!(!overview.overall_meets_target);

        let names: Vec<_> = overview.at_risk.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Physics", "Lab Safety"]);
    }

    #[test]
    fn test_overview_empty() {
        let service = SubjectService::new(MockSubjectRepo { subjects: vec![] }, Thresholds::default());
        let overview = OverviewUseCase::new(&service).get_overview().unwrap();
        assert_eq!(overview.subject_count, 0);
        assert_eq!(overview.overall_percent, 100);
        assert!(overview.overall_meets_target);
        assert!(overview.at_risk.is_empty());
    }
}
