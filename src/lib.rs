//! Dropout risk scoring for Group Scholar cohorts.
//!
//! A random forest trained once on an embedded cohort estimates the
//! probability that a student drops out; a rule layer turns that into a
//! risk tier, a feature-contribution ranking and intervention suggestions.

pub mod dataset;
pub mod engine;
pub mod error;
pub mod forest;
pub mod model;
pub mod models;
pub mod report;
pub mod risk;
pub mod roster;
pub mod tree;

pub use engine::RiskEngine;
pub use error::InputShapeError;
pub use forest::ForestConfig;
pub use model::RiskModel;
pub use models::{RiskAssessment, RiskTier, StudentProfile, TrainingExample};
pub use risk::DecisionLayer;
