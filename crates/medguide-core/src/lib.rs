//! Core types for MediGuide: the feature schema, symptom vectorisation, and
//! the request/response shapes shared by the server and CLI.

pub mod api;
pub mod config;
mod error;
pub mod schema;
pub mod vector;

pub use api::{AskRequest, AskResponse, Candidate, PredictRequest, PredictResponse};
pub use config::{DEFAULT_LABEL_COLUMN, PipelineConfig};
pub use error::SchemaLoadError;
pub use schema::FeatureSchema;
pub use vector::{FeatureVector, normalize_symptom};
