//! Case history: scored questionnaires kept most-recent-first in a bounded
//! store, plus the service and HTTP routes built on top of it.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{CaseId, CaseRecord, CaseSummaryView};
pub use repository::{CaseRepository, InMemoryCaseHistory, JsonFileCaseHistory, RepositoryError};
pub use router::{assessment_router, DEFAULT_LISTING_LIMIT};
pub use service::{AssessmentService, AssessmentServiceError};
