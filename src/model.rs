use tracing::info;

use crate::dataset::Dataset;
use crate::error::InputShapeError;
use crate::forest::{ForestConfig, RandomForest};
use crate::models::{FeatureContribution, StudentProfile, TrainingExample};

/// Trained dropout classifier. Read-only once built.
#[derive(Debug, Clone)]
pub struct RiskModel {
    forest: RandomForest,
    training_rows: usize,
    holdout_rows: usize,
    holdout_accuracy: Option<f64>,
}

impl RiskModel {
    /// Fits on every example given.
    pub fn fit(examples: &[TrainingExample], config: ForestConfig) -> Self {
        let dataset = Dataset::from_examples(examples);
        let mut forest = RandomForest::new(config);
        forest.fit(&dataset);

        info!(
            trees = forest.n_trees(),
            rows = dataset.n_samples(),
            "dropout model trained"
        );

        Self {
            forest,
            training_rows: dataset.n_samples(),
            holdout_rows: 0,
            holdout_accuracy: None,
        }
    }

    /// Holds out `config.holdout_ratio` of the examples, fits on the rest
    /// and scores the holdout.
    pub fn train(examples: &[TrainingExample], config: ForestConfig) -> Self {
        let dataset = Dataset::from_examples(examples);
        let split = dataset.random_split(config.holdout_ratio, config.seed);

        let mut forest = RandomForest::new(config);
        forest.fit(&split.train);
        let holdout_accuracy = forest.accuracy(&split.holdout);

        info!(
            trees = forest.n_trees(),
            training_rows = split.train.n_samples(),
            holdout_rows = split.holdout.n_samples(),
            holdout_accuracy = ?holdout_accuracy,
            "dropout model trained"
        );

        Self {
            forest,
            training_rows: split.train.n_samples(),
            holdout_rows: split.holdout.n_samples(),
            holdout_accuracy,
        }
    }

    /// Dropout probability in `[0, 1]`.
    pub fn predict(&self, profile: &StudentProfile) -> f64 {
        self.forest.predict_proba_one(&profile.to_features())
    }

    /// Validates a raw vector against the student schema before predicting.
    pub fn predict_features(&self, features: &[f64]) -> Result<f64, InputShapeError> {
        let profile = StudentProfile::from_features(features)?;
        Ok(self.predict(&profile))
    }

    pub fn feature_importances(&self) -> &[f64] {
        self.forest.feature_importances()
    }

    /// Importances paired with feature names, highest first.
    pub fn feature_ranking(&self) -> Vec<FeatureContribution> {
        self.forest
            .feature_importance_ranking()
            .into_iter()
            .map(|(feature, weight)| FeatureContribution {
                feature: feature.to_string(),
                weight,
            })
            .collect()
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    pub fn config(&self) -> &ForestConfig {
        self.forest.config()
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    pub fn holdout_rows(&self) -> usize {
        self.holdout_rows
    }

    pub fn holdout_accuracy(&self) -> Option<f64> {
        self.holdout_accuracy
    }
}
