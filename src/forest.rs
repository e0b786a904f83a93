//! Bagged ensemble of Gini trees with soft voting.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::tree::{DecisionTree, TreeConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    /// `None` grows every tree until its leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per node; `floor(sqrt(n_features))` when unset
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
    /// Share of the cohort held out to measure accuracy after fitting
    pub holdout_ratio: f64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 250,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
            holdout_ratio: 0.2,
        }
    }
}

impl ForestConfig {
    /// Candidate features per node for a dataset of `n_features` columns.
    pub fn max_features_for(&self, n_features: usize) -> usize {
        self.max_features
            .unwrap_or_else(|| ((n_features as f64).sqrt() as usize).max(1))
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn fit(&mut self, dataset: &Dataset) {
        self.feature_names = dataset.feature_names.clone();
        let n_features = dataset.n_features();
        let max_features = self.config.max_features_for(n_features);

        self.trees = (0..self.config.n_trees)
            .map(|i| {
                let seed = self.config.seed.wrapping_add(i as u64);
                let mut tree = DecisionTree::new(TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features,
                    seed,
                });

                if self.config.bootstrap {
                    tree.fit(&dataset.bootstrap_sample(seed));
                } else {
                    tree.fit(dataset);
                }
                tree
            })
            .collect();

        self.feature_importances = self.aggregate_importances(n_features);
        debug!(
            trees = self.trees.len(),
            max_features, "random forest fitted"
        );
    }

    fn aggregate_importances(&self, n_features: usize) -> Vec<f64> {
        let mut totals = vec![0.0; n_features];
        for tree in self.trees.iter().filter(|tree| !tree.is_trivial()) {
            for (total, &imp) in totals.iter_mut().zip(tree.feature_importances()) {
                *total += imp;
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter().map(|total| total / sum).collect()
        } else {
            warn!("every tree is a single leaf; falling back to uniform importances");
            vec![1.0 / n_features.max(1) as f64; n_features]
        }
    }

    /// Mean dropout probability across trees.
    pub fn predict_proba_one(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_proba_one(features))
            .sum();
        total / self.trees.len() as f64
    }

    pub fn predict_one(&self, features: &[f64]) -> bool {
        self.predict_proba_one(features) > 0.5
    }

    pub fn accuracy(&self, dataset: &Dataset) -> Option<f64> {
        if dataset.n_samples() == 0 {
            return None;
        }
        let correct = dataset
            .features
            .iter()
            .zip(dataset.labels.iter())
            .filter(|&(features, &label)| self.predict_one(features) == (label > 0.0))
            .count();
        Some(correct as f64 / dataset.n_samples() as f64)
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Feature names paired with importances, highest first.
    pub fn feature_importance_ranking(&self) -> Vec<(&str, f64)> {
        let mut ranking: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(name, &imp)| (name.as_str(), imp))
            .collect();

        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_feature_dataset() -> Dataset {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..60 {
            let signal = i as f64 / 6.0;
            let noise = ((i * 7) % 11) as f64;
            features.push(vec![signal, noise]);
            labels.push(if signal > 5.0 { 1.0 } else { 0.0 });
        }
        Dataset {
            features,
            labels,
            feature_names: vec!["signal".to_string(), "noise".to_string()],
        }
    }

    #[test]
    fn forest_classifies_separable_data() {
        let dataset = two_feature_dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 25,
            ..ForestConfig::default()
        });
        forest.fit(&dataset);

        assert_eq!(forest.n_trees(), 25);
        assert!(forest.accuracy(&dataset).unwrap() > 0.9);
        assert!(forest.predict_proba_one(&[9.0, 3.0]) > 0.5);
        assert!(forest.predict_proba_one(&[0.5, 3.0]) < 0.5);
    }

    #[test]
    fn importances_sum_to_one_and_favor_signal() {
        let dataset = two_feature_dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 25,
            max_features: Some(2),
            ..ForestConfig::default()
        });
        forest.fit(&dataset);

        let sum: f64 = forest.feature_importances().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);

        let ranking = forest.feature_importance_ranking();
        assert_eq!(ranking[0].0, "signal");
    }

    #[test]
    fn same_seed_gives_same_forest_output() {
        let dataset = two_feature_dataset();
        let config = ForestConfig {
            n_trees: 15,
            seed: 9,
            ..ForestConfig::default()
        };
        let mut a = RandomForest::new(config.clone());
        let mut b = RandomForest::new(config);
        a.fit(&dataset);
        b.fit(&dataset);

        assert_eq!(a.feature_importances(), b.feature_importances());
        assert_eq!(
            a.predict_proba_one(&[4.9, 2.0]),
            b.predict_proba_one(&[4.9, 2.0])
        );
    }

    #[test]
    fn zero_trees_builds_an_empty_forest() {
        let dataset = two_feature_dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 0,
            ..ForestConfig::default()
        });
        forest.fit(&dataset);

        assert_eq!(forest.n_trees(), 0);
        assert_eq!(forest.n_trees(), forest.config().n_trees);
        assert_eq!(forest.predict_proba_one(&[9.0, 3.0]), 0.5);
    }

    #[test]
    fn default_config_matches_shipped_hyperparameters() {
        let config = ForestConfig::default();
        assert_eq!(config.n_trees, 250);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.min_samples_split, 2);
        assert_eq!(config.min_samples_leaf, 1);
        assert!(config.bootstrap);
        assert_eq!(config.holdout_ratio, 0.2);
        assert_eq!(config.max_features_for(6), 2);
        assert_eq!(config.max_features_for(1), 1);

        let fixed = ForestConfig {
            max_features: Some(4),
            ..ForestConfig::default()
        };
        assert_eq!(fixed.max_features_for(6), 4);
    }

    #[test]
    fn single_class_data_falls_back_to_uniform_importances() {
        let mut dataset = two_feature_dataset();
        dataset.labels = vec![1.0; dataset.labels.len()];
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 5,
            ..ForestConfig::default()
        });
        forest.fit(&dataset);

        assert_eq!(forest.feature_importances(), &[0.5, 0.5]);
        assert_eq!(forest.predict_proba_one(&[1.0, 1.0]), 1.0);
    }
}
