use crate::model::RiskModel;
use crate::models::{FeatureContribution, RiskAssessment, RiskTier, StudentProfile};

pub const ATTENDANCE_SUGGESTION: &str = "Improve attendance to at least 80%.";
pub const REMEDIAL_SUGGESTION: &str = "Attend remedial classes and strengthen fundamentals.";
pub const STUDY_TIME_SUGGESTION: &str = "Increase focused study time by 1–2 hours daily.";
pub const COUNSELING_SUGGESTION: &str = "Seek counseling or stress-management programs.";
pub const FINANCIAL_AID_SUGGESTION: &str = "Explore scholarships or financial assistance options.";
pub const NO_RISK_SUGGESTION: &str =
    "No major risk factors detected. Continue current performance.";

/// A risk factor check and the intervention it triggers.
pub struct InterventionRule {
    pub factor: &'static str,
    pub applies: fn(&StudentProfile) -> bool,
    pub message: &'static str,
}

/// Evaluated top to bottom; every matching rule contributes its message.
pub const INTERVENTION_RULES: [InterventionRule; 5] = [
    InterventionRule {
        factor: "attendance",
        applies: |p: &StudentProfile| p.attendance < 75.0,
        message: ATTENDANCE_SUGGESTION,
    },
    InterventionRule {
        factor: "internal_marks",
        applies: |p: &StudentProfile| p.internal_marks < 60,
        message: REMEDIAL_SUGGESTION,
    },
    InterventionRule {
        factor: "study_hours",
        applies: |p: &StudentProfile| p.study_hours < 7,
        message: STUDY_TIME_SUGGESTION,
    },
    InterventionRule {
        factor: "stress_level",
        applies: |p: &StudentProfile| p.stress_level > 6,
        message: COUNSELING_SUGGESTION,
    },
    InterventionRule {
        factor: "financial_issue",
        applies: |p: &StudentProfile| p.financial_issue,
        message: FINANCIAL_AID_SUGGESTION,
    },
];

pub fn suggestions_for(profile: &StudentProfile) -> Vec<String> {
    let mut suggestions: Vec<String> = INTERVENTION_RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| rule.message.to_string())
        .collect();

    if suggestions.is_empty() {
        suggestions.push(NO_RISK_SUGGESTION.to_string());
    }
    suggestions
}

/// Turns a model probability into a tier, rationale and interventions.
#[derive(Debug, Clone)]
pub struct DecisionLayer {
    ranking: Vec<FeatureContribution>,
}

impl DecisionLayer {
    pub fn new(mut ranking: Vec<FeatureContribution>) -> Self {
        ranking.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        Self { ranking }
    }

    pub fn from_model(model: &RiskModel) -> Self {
        Self::new(model.feature_ranking())
    }

    /// `probability` is in percent.
    pub fn assess(&self, probability: f64, profile: &StudentProfile) -> RiskAssessment {
        let tier = RiskTier::from_probability(probability);

        RiskAssessment {
            probability,
            tier,
            rationale: tier.rationale().to_string(),
            suggestions: suggestions_for(profile),
            feature_ranking: self.ranking.clone(),
        }
    }

    pub fn ranking(&self) -> &[FeatureContribution] {
        &self.ranking
    }
}
