use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputShapeError;

pub const FEATURE_COUNT: usize = 6;

/// Column order of every feature vector handed to the forest.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "attendance",
    "gpa",
    "internal_marks",
    "study_hours",
    "stress_level",
    "financial_issue",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum FeatureKind {
    Real,
    Integer,
    Flag,
}

#[derive(Debug, Clone, Copy)]
struct FeatureDomain {
    name: &'static str,
    kind: FeatureKind,
    min: f64,
    max: f64,
}

const DOMAINS: [FeatureDomain; FEATURE_COUNT] = [
    FeatureDomain { name: "attendance", kind: FeatureKind::Real, min: 0.0, max: 100.0 },
    FeatureDomain { name: "gpa", kind: FeatureKind::Real, min: 0.0, max: 10.0 },
    FeatureDomain { name: "internal_marks", kind: FeatureKind::Integer, min: 0.0, max: 100.0 },
    FeatureDomain { name: "study_hours", kind: FeatureKind::Integer, min: 0.0, max: 20.0 },
    FeatureDomain { name: "stress_level", kind: FeatureKind::Integer, min: 1.0, max: 10.0 },
    FeatureDomain { name: "financial_issue", kind: FeatureKind::Flag, min: 0.0, max: 1.0 },
];

impl FeatureDomain {
    fn check(&self, value: f64) -> Result<f64, InputShapeError> {
        if !value.is_finite() {
            return Err(InputShapeError::NonFinite { feature: self.name });
        }

        match self.kind {
            FeatureKind::Flag if value != 0.0 && value != 1.0 => {
                return Err(InputShapeError::NotBoolean {
                    feature: self.name,
                    value,
                });
            }
            FeatureKind::Integer if value.fract() != 0.0 => {
                return Err(InputShapeError::NotInteger {
                    feature: self.name,
                    value,
                });
            }
            _ => {}
        }

        if value < self.min || value > self.max {
            return Err(InputShapeError::OutOfDomain {
                feature: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }

        Ok(value)
    }
}

/// One student's academic and wellbeing snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StudentProfile {
    pub attendance: f64,
    pub gpa: f64,
    pub internal_marks: u8,
    pub study_hours: u8,
    pub stress_level: u8,
    pub financial_issue: bool,
}

impl StudentProfile {
    pub fn new(
        attendance: f64,
        gpa: f64,
        internal_marks: u8,
        study_hours: u8,
        stress_level: u8,
        financial_issue: bool,
    ) -> Result<Self, InputShapeError> {
        let profile = Self {
            attendance,
            gpa,
            internal_marks,
            study_hours,
            stress_level,
            financial_issue,
        };
        Self::from_features(&profile.to_features())
    }

    /// Builds a profile from a raw vector in [`FEATURE_NAMES`] order.
    pub fn from_features(features: &[f64]) -> Result<Self, InputShapeError> {
        if features.len() != FEATURE_COUNT {
            return Err(InputShapeError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }

        let mut checked = [0.0; FEATURE_COUNT];
        for ((slot, domain), &value) in checked.iter_mut().zip(DOMAINS.iter()).zip(features) {
            *slot = domain.check(value)?;
        }

        Ok(Self {
            attendance: checked[0],
            gpa: checked[1],
            internal_marks: checked[2] as u8,
            study_hours: checked[3] as u8,
            stress_level: checked[4] as u8,
            financial_issue: checked[5] == 1.0,
        })
    }

    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.attendance,
            self.gpa,
            f64::from(self.internal_marks),
            f64::from(self.study_hours),
            f64::from(self.stress_level),
            if self.financial_issue { 1.0 } else { 0.0 },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingExample {
    pub profile: StudentProfile,
    pub dropout: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const LOW_CEILING: f64 = 30.0;
    pub const MEDIUM_CEILING: f64 = 60.0;

    /// Buckets a dropout probability expressed in percent.
    pub fn from_probability(probability: f64) -> Self {
        if probability < Self::LOW_CEILING {
            RiskTier::Low
        } else if probability < Self::MEDIUM_CEILING {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn rationale(self) -> &'static str {
        match self {
            RiskTier::Low => {
                "Student is academically stable. Maintain consistency and regular revision."
            }
            RiskTier::Medium => {
                "Student shows warning signs. Early academic intervention is recommended."
            }
            RiskTier::High => {
                "Student is at high risk of dropout. Immediate academic and counseling support required."
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub weight: f64,
}

impl FeatureContribution {
    pub fn percent(&self) -> f64 {
        self.weight * 100.0
    }

    /// "internal_marks" becomes "Internal Marks".
    pub fn display_name(&self) -> String {
        self.feature
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub tier: RiskTier,
    pub rationale: String,
    pub suggestions: Vec<String>,
    pub feature_ranking: Vec<FeatureContribution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    pub profile: StudentProfile,
}

#[derive(Debug, Clone)]
pub struct TierSummary {
    pub tier: RiskTier,
    pub count: usize,
    pub avg_probability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_vector_round_trips_through_validation() {
        let profile = StudentProfile::new(82.5, 7.4, 66, 9, 4, true).unwrap();
        let rebuilt = StudentProfile::from_features(&profile.to_features()).unwrap();
        assert_eq!(profile, rebuilt);
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let err = StudentProfile::from_features(&[80.0, 7.0, 60.0]).unwrap_err();
        assert_eq!(
            err,
            InputShapeError::FeatureCount {
                expected: 6,
                actual: 3
            }
        );

        let err = StudentProfile::from_features(&[80.0, 7.0, 60.0, 7.0, 5.0, 0.0, 1.0]).unwrap_err();
        assert!(matches!(err, InputShapeError::FeatureCount { actual: 7, .. }));
    }

    #[test]
    fn rejects_values_outside_declared_domain() {
        let err = StudentProfile::from_features(&[120.0, 7.0, 60.0, 7.0, 5.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            InputShapeError::OutOfDomain {
                feature: "attendance",
                ..
            }
        ));

        let err = StudentProfile::new(80.0, 7.0, 60, 7, 0, false).unwrap_err();
        assert!(matches!(
            err,
            InputShapeError::OutOfDomain {
                feature: "stress_level",
                ..
            }
        ));
    }

    #[test]
    fn rejects_wrong_value_types() {
        let err = StudentProfile::from_features(&[80.0, 7.0, 60.5, 7.0, 5.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            InputShapeError::NotInteger {
                feature: "internal_marks",
                ..
            }
        ));

        let err = StudentProfile::from_features(&[80.0, 7.0, 60.0, 7.0, 5.0, 2.0]).unwrap_err();
        assert!(matches!(err, InputShapeError::NotBoolean { .. }));

        let err = StudentProfile::from_features(&[80.0, f64::NAN, 60.0, 7.0, 5.0, 0.0]).unwrap_err();
        assert_eq!(err, InputShapeError::NonFinite { feature: "gpa" });
    }

    #[test]
    fn tier_boundaries_follow_thresholds() {
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(29.999), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(30.0), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(59.999), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(60.0), RiskTier::High);
        assert_eq!(RiskTier::from_probability(100.0), RiskTier::High);
    }

    #[test]
    fn tier_is_monotone_in_probability() {
        let mut previous = RiskTier::from_probability(0.0);
        for step in 0..=10_000 {
            let tier = RiskTier::from_probability(step as f64 / 100.0);
            assert!(tier >= previous);
            previous = tier;
        }
    }

    #[test]
    fn display_name_title_cases_feature() {
        let contribution = FeatureContribution {
            feature: "internal_marks".to_string(),
            weight: 0.25,
        };
        assert_eq!(contribution.display_name(), "Internal Marks");
        assert!((contribution.percent() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn profile_serializes_with_schema_field_names() {
        let profile = StudentProfile::new(82.5, 7.4, 66, 9, 4, true).unwrap();
        let value = serde_json::to_value(profile).unwrap();
        for name in FEATURE_NAMES {
            assert!(value.get(name).is_some(), "missing {name}");
        }
        assert_eq!(value["financial_issue"], serde_json::json!(true));
    }

    #[test]
    fn tier_serializes_uppercase() {
        let json = serde_json::to_string(&RiskTier::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }
}
