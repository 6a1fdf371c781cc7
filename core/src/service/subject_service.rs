use anyhow::Result;
use uuid::Uuid;

use crate::config::Thresholds;
use crate::error::BunkrError;
use crate::model::bunk::TargetPercent;
use crate::model::ledger::ActionKind;
use crate::model::subject::Subject;
use crate::repository::Repository;
use crate::service::dto::SubjectDto;

pub struct SubjectService<R: Repository<Subject>> {
    repo: R,
    thresholds: Thresholds,
}

impl<R: Repository<Subject>> SubjectService<R> {
    pub fn new(repo: R, thresholds: Thresholds) -> Self {
        Self { repo, thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn add_subject(&self, name: &str, target: Option<TargetPercent>) -> Result<SubjectDto> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BunkrError::EmptyName.into());
        }

        let existing = self.repo.list()?;
        if existing.iter().any(|s| same_name(&s.name, name)) {
            return Err(BunkrError::DuplicateSubject(name.to_string()).into());
        }

        let mut subject = Subject::new(name.to_string());
        subject.target = target;
        self.persist(&subject)?;
        tracing::info!(id = %subject.id, name = %subject.name, "subject added");

        Ok(self.summarize(&subject))
    }

    /// Resolves a full id, a unique id prefix, or a case-insensitive name.
    pub fn find(&self, query: &str) -> Result<Subject> {
        let query = query.trim();
        if let Ok(id) = Uuid::parse_str(query) {
            return self.repo.get(&id);
        }

        let subjects = self.repo.list()?;
        if let Some(s) = subjects.iter().find(|s| same_name(&s.name, query)) {
            return Ok(s.clone());
        }

        let lowered = query.to_lowercase();
        let matches: Vec<&Subject> = if lowered.is_empty() {
            Vec::new()
        } else {
            subjects
                .iter()
                .filter(|s| s.id.to_string().starts_with(&lowered))
                .collect()
        };

        match matches.as_slice() {
            [single] => Ok((*single).clone()),
            [] => Err(BunkrError::NotFound(query.to_string()).into()),
            many => Err(BunkrError::AmbiguousSubject {
                query: query.to_string(),
                matches: many.iter().map(|s| s.name.clone()).collect(),
            }
            .into()),
        }
    }

    pub fn get(&self, query: &str) -> Result<SubjectDto> {
        let subject = self.find(query)?;
        Ok(self.summarize(&subject))
    }

    pub fn record(&self, query: &str, action: ActionKind) -> Result<SubjectDto> {
        let mut subject = self.find(query)?;
        subject.ledger = subject.ledger.apply(action);
        self.persist(&subject)?;
        tracing::debug!(
            name = %subject.name,
            action = %action,
            attended = subject.ledger.attended_count,
            missed = subject.ledger.missed_count,
            "action recorded"
        );

        Ok(self.summarize(&subject))
    }

    /// Undoes the newest action. With nothing to undo the stored record is
    /// left untouched.
    pub fn undo(&self, query: &str) -> Result<SubjectDto> {
        let mut subject = self.find(query)?;
        let Some(last) = subject.ledger.last_action() else {
            tracing::debug!(name = %subject.name, "nothing to undo");
            return Ok(self.summarize(&subject));
        };

        subject.ledger = subject.ledger.undo();
        self.persist(&subject)?;
        tracing::debug!(name = %subject.name, action = %last, "action undone");

        Ok(self.summarize(&subject))
    }

    pub fn set_target(&self, query: &str, target: Option<TargetPercent>) -> Result<SubjectDto> {
        let mut subject = self.find(query)?;
        subject.target = target;
        self.persist(&subject)?;
        Ok(self.summarize(&subject))
    }

    pub fn remove(&self, query: &str) -> Result<Subject> {
        let subject = self.find(query)?;
        if let Err(e) = self.repo.delete(&subject.id) {
            tracing::warn!(id = %subject.id, error = %e, "failed to delete subject");
            return Err(e);
        }
        tracing::info!(id = %subject.id, name = %subject.name, "subject removed");
        Ok(subject)
    }

    pub fn list(&self) -> Result<Vec<SubjectDto>> {
        let mut subjects = self.repo.list()?;
        subjects.sort_by_key(|s| s.name.to_lowercase());
        Ok(subjects.iter().map(|s| self.summarize(s)).collect())
    }

    pub fn subjects(&self) -> Result<Vec<Subject>> {
        self.repo.list()
    }

    pub fn summarize(&self, subject: &Subject) -> SubjectDto {
        SubjectDto::from_entity(subject, &self.thresholds)
    }

    fn persist(&self, subject: &Subject) -> Result<()> {
        self.repo.save(subject).map_err(|e| {
            tracing::warn!(id = %subject.id, error = %e, "failed to save subject");
            e
        })
    }
}

/// Unicode-aware, so "Ética" and "ética" are the same subject.
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
