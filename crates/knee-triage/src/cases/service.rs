use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{CaseId, CaseRecord};
use super::repository::{CaseRepository, RepositoryError};
use crate::scoring::{Questionnaire, ScoringConfig, ScoringEngine, ScoringResult};

/// Scores questionnaires against a shared weight table and keeps the
/// resulting cases in a repository.
pub struct AssessmentService<R> {
    config: Arc<ScoringConfig>,
    repository: Arc<R>,
}

impl<R> AssessmentService<R>
where
    R: CaseRepository + 'static,
{
    pub fn new(config: Arc<ScoringConfig>, repository: Arc<R>) -> Self {
        Self { config, repository }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Scores one questionnaire on a fresh engine; nothing is stored.
    pub fn assess(&self, questionnaire: &Questionnaire) -> ScoringResult {
        ScoringEngine::new(&self.config).evaluate(questionnaire)
    }

    /// Scores and stores a new case under a freshly generated id.
    pub fn submit(
        &self,
        questionnaire: Questionnaire,
    ) -> Result<CaseRecord, AssessmentServiceError> {
        let result = self.assess(&questionnaire);
        let created_at = Utc::now();
        let record = CaseRecord::new(
            CaseId::generate(created_at),
            questionnaire,
            Some(result),
            created_at,
        );

        let stored = self.repository.save(record)?;
        info!(
            case_id = %stored.id,
            patient_id = %stored.patient_id,
            red_flags = stored.result.as_ref().map(|result| result.red_flags.len()).unwrap_or(0),
            "stored assessment case"
        );
        Ok(stored)
    }

    /// Re-scores an existing case's answers and saves it under its own id,
    /// keeping its original creation time.
    pub fn resave(&self, mut record: CaseRecord) -> Result<CaseRecord, AssessmentServiceError> {
        record.patient_id = record.questionnaire.patient_label();
        record.result = Some(self.assess(&record.questionnaire));
        let stored = self.repository.save(record)?;
        info!(case_id = %stored.id, "re-saved assessment case");
        Ok(stored)
    }

    pub fn get(&self, case_id: &CaseId) -> Result<CaseRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(case_id)?
            .ok_or_else(|| RepositoryError::NotFound(case_id.clone()))?;
        Ok(record)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<CaseRecord>, AssessmentServiceError> {
        Ok(self.repository.recent(limit)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
