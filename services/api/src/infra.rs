use knee_triage::cases::{
    AssessmentService, CaseId, CaseRecord, CaseRepository, InMemoryCaseHistory,
    JsonFileCaseHistory, RepositoryError,
};
use knee_triage::config::ScoringSettings;
use knee_triage::error::AppError;
use knee_triage::scoring::ScoringConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Case history backend selected by configuration.
#[derive(Debug)]
pub(crate) enum CaseHistory {
    Memory(InMemoryCaseHistory),
    File(JsonFileCaseHistory),
}

impl CaseHistory {
    pub(crate) fn from_settings(settings: &ScoringSettings) -> Result<Self, AppError> {
        match &settings.history_path {
            Some(path) => {
                let history = JsonFileCaseHistory::open(path, settings.history_limit)?;
                info!(
                    path = %path.display(),
                    limit = settings.history_limit,
                    "using file-backed case history"
                );
                Ok(Self::File(history))
            }
            None => Ok(Self::Memory(InMemoryCaseHistory::new(settings.history_limit))),
        }
    }

    fn backend(&self) -> &dyn CaseRepository {
        match self {
            CaseHistory::Memory(history) => history,
            CaseHistory::File(history) => history,
        }
    }
}

impl CaseRepository for CaseHistory {
    fn save(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        self.backend().save(record)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        self.backend().fetch(id)
    }

    fn recent(&self, limit: usize) -> Result<Vec<CaseRecord>, RepositoryError> {
        self.backend().recent(limit)
    }
}

/// Explicit path first, then the configured override, then the built-in table.
pub(crate) fn load_scoring_config(
    explicit: Option<&Path>,
    settings: &ScoringSettings,
) -> Result<Arc<ScoringConfig>, AppError> {
    let path = explicit.or(settings.weight_table.as_deref());
    Ok(ScoringConfig::load(path)?)
}

pub(crate) fn build_service(
    settings: &ScoringSettings,
) -> Result<Arc<AssessmentService<CaseHistory>>, AppError> {
    let config = load_scoring_config(None, settings)?;
    let history = CaseHistory::from_settings(settings)?;
    Ok(Arc::new(AssessmentService::new(config, Arc::new(history))))
}
