use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{FeatureContribution, RiskAssessment, RiskTier, StudentRecord, TierSummary};

const BAR_WIDTH: usize = 30;

pub fn summarize_by_tier(assessments: &[RiskAssessment]) -> Vec<TierSummary> {
    let mut map: HashMap<RiskTier, (usize, f64)> = HashMap::new();

    for assessment in assessments {
        let entry = map.entry(assessment.tier).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += assessment.probability;
    }

    let mut summaries: Vec<TierSummary> = map
        .into_iter()
        .map(|(tier, (count, total_probability))| TierSummary {
            tier,
            count,
            avg_probability: if count == 0 {
                0.0
            } else {
                total_probability / count as f64
            },
        })
        .collect();

    summaries.sort_by(|a, b| b.tier.cmp(&a.tier));
    summaries
}

/// Text bar proportional to a contribution weight in `[0, 1]`.
pub fn contribution_bar(weight: f64) -> String {
    let filled = (weight.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

pub fn build_report(
    generated_on: NaiveDate,
    ranking: &[FeatureContribution],
    assessed: &[(StudentRecord, RiskAssessment)],
) -> String {
    let assessments: Vec<RiskAssessment> =
        assessed.iter().map(|(_, assessment)| assessment.clone()).collect();
    let summaries = summarize_by_tier(&assessments);

    let mut output = String::new();

    let _ = writeln!(output, "# Student Dropout Risk Report");
    let _ = writeln!(
        output,
        "Generated on {} for {} students",
        generated_on,
        assessed.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Tier Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students assessed.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} students (avg probability {:.1}%)",
                summary.tier, summary.count, summary.avg_probability
            );
        }
    }

    let mut ranked: Vec<&(StudentRecord, RiskAssessment)> = assessed.iter().collect();
    ranked.sort_by(|a, b| b.1.probability.total_cmp(&a.1.probability));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Highest Risk Students");

    if ranked.is_empty() {
        let _ = writeln!(output, "No students assessed.");
    } else {
        for (student, assessment) in ranked.iter().take(10) {
            let _ = writeln!(
                output,
                "- {}: {} ({:.2}%)",
                student.name, assessment.tier, assessment.probability
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Feature Contribution");
    for contribution in ranking {
        let _ = writeln!(
            output,
            "- {:<16} {:>6.2}% {}",
            contribution.display_name(),
            contribution.percent(),
            contribution_bar(contribution.weight)
        );
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for assessment in &assessments {
        for suggestion in &assessment.suggestions {
            *counts.entry(suggestion.as_str()).or_insert(0) += 1;
        }
    }
    let mut interventions: Vec<(&str, usize)> = counts.into_iter().collect();
    interventions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Common Interventions");

    if interventions.is_empty() {
        let _ = writeln!(output, "No interventions suggested.");
    } else {
        for (suggestion, count) in interventions {
            let _ = writeln!(output, "- {suggestion} ({count} students)");
        }
    }

    output
}
