//! Embedded training cohort and the sampling helpers the forest trains on.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::models::{StudentProfile, TrainingExample, FEATURE_NAMES};

// attendance, gpa, internal_marks, study_hours, stress_level, financial_issue, dropout
const COHORT: [(f64, f64, u8, u8, u8, bool, bool); 20] = [
    (65.0, 5.5, 45, 5, 7, true, true),
    (70.0, 6.0, 50, 6, 6, false, true),
    (80.0, 7.2, 65, 8, 4, false, false),
    (90.0, 8.5, 80, 12, 2, false, false),
    (85.0, 8.0, 75, 10, 3, false, false),
    (60.0, 5.0, 40, 4, 8, true, true),
    (75.0, 6.8, 60, 7, 5, false, false),
    (88.0, 8.2, 78, 11, 3, false, false),
    (92.0, 9.0, 85, 13, 2, false, false),
    (55.0, 4.5, 35, 3, 9, true, true),
    (78.0, 7.0, 62, 8, 4, false, false),
    (83.0, 7.5, 70, 9, 4, false, false),
    (68.0, 6.0, 48, 6, 6, false, true),
    (74.0, 6.5, 58, 7, 5, false, false),
    (95.0, 9.2, 90, 14, 2, false, false),
    (50.0, 4.0, 30, 2, 9, true, true),
    (58.0, 5.0, 42, 4, 8, true, true),
    (62.0, 5.8, 50, 5, 7, true, true),
    (72.0, 6.7, 60, 7, 5, false, false),
    (81.0, 7.8, 72, 9, 3, false, false),
];

/// The fixed cohort every engine is trained on.
pub fn training_examples() -> Vec<TrainingExample> {
    COHORT
        .iter()
        .map(
            |&(attendance, gpa, internal_marks, study_hours, stress_level, financial_issue, dropout)| {
                TrainingExample {
                    profile: StudentProfile {
                        attendance,
                        gpa,
                        internal_marks,
                        study_hours,
                        stress_level,
                        financial_issue,
                    },
                    dropout,
                }
            },
        )
        .collect()
}

/// Feature matrix with binary labels (1.0 = dropout).
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
    pub feature_names: Vec<String>,
}

pub struct Split {
    pub train: Dataset,
    pub holdout: Dataset,
}

impl Dataset {
    pub fn from_examples(examples: &[TrainingExample]) -> Self {
        Self {
            features: examples
                .iter()
                .map(|example| example.profile.to_features().to_vec())
                .collect(),
            labels: examples
                .iter()
                .map(|example| if example.dropout { 1.0 } else { 0.0 })
                .collect(),
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Shuffled split; the holdout takes `ceil(ratio * n)` rows off the front.
    pub fn random_split(&self, holdout_ratio: f64, seed: u64) -> Split {
        let n = self.n_samples();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let ratio = holdout_ratio.clamp(0.0, 1.0);
        let holdout_size = ((ratio * n as f64).ceil() as usize).min(n.saturating_sub(1));
        let (holdout_indices, train_indices) = indices.split_at(holdout_size);

        Split {
            train: self.subset(train_indices),
            holdout: self.subset(holdout_indices),
        }
    }

    /// Sample `n` rows with replacement.
    pub fn bootstrap_sample(&self, seed: u64) -> Dataset {
        let n = self.n_samples();
        if n == 0 {
            return self.clone();
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
        self.subset(&indices)
    }
}
