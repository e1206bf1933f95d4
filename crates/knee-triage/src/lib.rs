//! Rule-based differential diagnosis for knee-pain questionnaires.
//!
//! [`scoring`] holds the weight table and the scoring engine; [`cases`]
//! persists scored questionnaires and exposes them over HTTP.

pub mod cases;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
