use tracing::debug;

use crate::dataset::training_examples;
use crate::error::InputShapeError;
use crate::forest::ForestConfig;
use crate::model::RiskModel;
use crate::models::{RiskAssessment, StudentProfile};
use crate::risk::DecisionLayer;

/// Trained model plus decision layer, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    model: RiskModel,
    decisions: DecisionLayer,
}

impl RiskEngine {
    /// Trains on the embedded cohort.
    pub fn new(config: ForestConfig) -> Self {
        Self::from_model(RiskModel::train(&training_examples(), config))
    }

    pub fn from_model(model: RiskModel) -> Self {
        let decisions = DecisionLayer::from_model(&model);
        Self { model, decisions }
    }

    pub fn evaluate(&self, profile: &StudentProfile) -> RiskAssessment {
        let probability = self.model.predict(profile) * 100.0;
        let assessment = self.decisions.assess(probability, profile);
        debug!(
            probability = assessment.probability,
            tier = %assessment.tier,
            suggestions = assessment.suggestions.len(),
            "student assessed"
        );
        assessment
    }

    pub fn evaluate_features(&self, features: &[f64]) -> Result<RiskAssessment, InputShapeError> {
        let profile = StudentProfile::from_features(features)?;
        Ok(self.evaluate(&profile))
    }

    pub fn model(&self) -> &RiskModel {
        &self.model
    }

    pub fn decisions(&self) -> &DecisionLayer {
        &self.decisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskTier;
    use crate::risk::{
        ATTENDANCE_SUGGESTION, COUNSELING_SUGGESTION, FINANCIAL_AID_SUGGESTION,
        NO_RISK_SUGGESTION, REMEDIAL_SUGGESTION, STUDY_TIME_SUGGESTION,
    };

    fn engine() -> RiskEngine {
        RiskEngine::new(ForestConfig {
            n_trees: 80,
            ..ForestConfig::default()
        })
    }

    #[test]
    fn safe_student_is_low_risk() {
        let engine = engine();
        let profile = StudentProfile::new(90.0, 8.0, 85, 10, 3, false).unwrap();
        let assessment = engine.evaluate(&profile);

        assert_eq!(assessment.tier, RiskTier::Low);
        assert_eq!(assessment.suggestions, vec![NO_RISK_SUGGESTION]);
        assert_eq!(assessment.feature_ranking.len(), 6);
    }

    #[test]
    fn struggling_student_is_high_risk() {
        let engine = engine();
        let assessment = engine
            .evaluate_features(&[50.0, 4.0, 40.0, 2.0, 9.0, 1.0])
            .unwrap();

        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(assessment.suggestions.len(), 5);
        assert!(assessment.probability >= 60.0 && assessment.probability <= 100.0);
    }

    #[test]
    fn evaluation_is_deterministic_across_engines() {
        let profile = StudentProfile::new(71.0, 6.2, 55, 6, 6, false).unwrap();
        let first = engine().evaluate(&profile);
        let second = engine().evaluate(&profile);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn default_engine_separates_reference_profiles() {
        let engine = RiskEngine::new(ForestConfig::default());
        assert_eq!(engine.model().n_trees(), 250);
        assert_eq!(engine.model().training_rows(), 16);
        assert_eq!(engine.model().holdout_rows(), 4);

        let safe = engine
            .evaluate_features(&[90.0, 8.0, 85.0, 10.0, 3.0, 0.0])
            .unwrap();
        assert_eq!(safe.tier, RiskTier::Low);
        assert_eq!(safe.suggestions, vec![NO_RISK_SUGGESTION]);

        let struggling = engine
            .evaluate_features(&[50.0, 4.0, 40.0, 2.0, 9.0, 1.0])
            .unwrap();
        assert_eq!(struggling.tier, RiskTier::High);
        assert_eq!(
            struggling.suggestions,
            vec![
                ATTENDANCE_SUGGESTION,
                REMEDIAL_SUGGESTION,
                STUDY_TIME_SUGGESTION,
                COUNSELING_SUGGESTION,
                FINANCIAL_AID_SUGGESTION,
            ]
        );

        let sum: f64 = struggling.feature_ranking.iter().map(|c| c.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_vector_is_rejected() {
        let err = engine().evaluate_features(&[80.0; 4]).unwrap_err();
        assert!(matches!(err, InputShapeError::FeatureCount { actual: 4, .. }));
    }
}
