use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use groupscholar_dropout_risk::models::{FeatureContribution, RiskAssessment, StudentProfile};
use groupscholar_dropout_risk::report::{self, contribution_bar};
use groupscholar_dropout_risk::roster;
use groupscholar_dropout_risk::{ForestConfig, RiskEngine};

#[derive(Parser)]
#[command(name = "dropout-risk")]
#[command(about = "Student dropout risk prediction and intervention planning for Group Scholar", long_about = None)]
struct Cli {
    /// Trees in the random forest
    #[arg(
        long,
        global = true,
        env = "DROPOUT_RISK_TREES",
        default_value_t = 250,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    trees: u64,
    /// Seed for the holdout split and bootstrap sampling
    #[arg(long, global = true, env = "DROPOUT_RISK_SEED", default_value_t = 42)]
    seed: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a single student
    Assess {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        json: bool,
    },
    /// Assess every student in a CSV file
    Batch {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report for a CSV file of students
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Show training statistics and feature contributions
    Model,
}

#[derive(Args)]
struct ProfileArgs {
    /// Attendance percentage (0-100)
    #[arg(long, default_value_t = 75.0)]
    attendance: f64,
    /// Current GPA (0-10)
    #[arg(long, default_value_t = 7.0)]
    gpa: f64,
    /// Internal marks (0-100)
    #[arg(long, default_value_t = 60)]
    internal_marks: u8,
    /// Study hours per week (0-20)
    #[arg(long, default_value_t = 7)]
    study_hours: u8,
    /// Stress level (1-10)
    #[arg(long, default_value_t = 5)]
    stress_level: u8,
    /// Student reports financial issues
    #[arg(long)]
    financial_issue: bool,
}

impl ProfileArgs {
    fn to_profile(&self) -> anyhow::Result<StudentProfile> {
        StudentProfile::new(
            self.attendance,
            self.gpa,
            self.internal_marks,
            self.study_hours,
            self.stress_level,
            self.financial_issue,
        )
        .context("invalid student profile")
    }
}

fn print_ranking(ranking: &[FeatureContribution]) {
    for contribution in ranking {
        println!(
            "  {:<16} {:>6.2}% {}",
            contribution.display_name(),
            contribution.percent(),
            contribution_bar(contribution.weight)
        );
    }
}

fn print_assessment(assessment: &RiskAssessment) {
    println!("Dropout probability: {:.2}%", assessment.probability);
    println!("Risk level: {}", assessment.tier);
    println!("Feedback: {}", assessment.rationale);
    println!();
    println!("Feature contribution:");
    print_ranking(&assessment.feature_ranking);
    println!();
    println!("Interventions:");
    for suggestion in &assessment.suggestions {
        println!("- {suggestion}");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("groupscholar_dropout_risk=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let n_trees = usize::try_from(cli.trees).context("--trees does not fit this platform")?;
    let engine = RiskEngine::new(ForestConfig {
        n_trees,
        seed: cli.seed,
        ..ForestConfig::default()
    });

    match cli.command {
        Commands::Assess { profile, json } => {
            let assessment = engine.evaluate(&profile.to_profile()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                print_assessment(&assessment);
            }
        }
        Commands::Batch { csv, limit, json } => {
            let students = roster::load_students(&csv)?;
            let mut assessed: Vec<_> = students
                .into_iter()
                .map(|student| {
                    let assessment = engine.evaluate(&student.profile);
                    (student, assessment)
                })
                .collect();
            assessed.sort_by(|a, b| b.1.probability.total_cmp(&a.1.probability));

            if json {
                let rows: Vec<serde_json::Value> = assessed
                    .iter()
                    .take(limit)
                    .map(|(student, assessment)| {
                        serde_json::json!({
                            "name": student.name,
                            "profile": student.profile,
                            "assessment": assessment,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            if assessed.is_empty() {
                println!("No students found in {}.", csv.display());
                return Ok(());
            }

            println!("Students by dropout risk:");
            for (student, assessment) in assessed.iter().take(limit) {
                println!(
                    "- {} {} {:.2}% ({} interventions)",
                    student.name,
                    assessment.tier,
                    assessment.probability,
                    assessment.suggestions.len()
                );
            }
        }
        Commands::Report { csv, out } => {
            let students = roster::load_students(&csv)?;
            let assessed: Vec<_> = students
                .into_iter()
                .map(|student| {
                    let assessment = engine.evaluate(&student.profile);
                    (student, assessment)
                })
                .collect();
            let report = report::build_report(
                chrono::Utc::now().date_naive(),
                engine.decisions().ranking(),
                &assessed,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Model => {
            let model = engine.model();
            println!("Trees: {}", model.n_trees());
            println!(
                "Training rows: {} (holdout {})",
                model.training_rows(),
                model.holdout_rows()
            );
            match model.holdout_accuracy() {
                Some(accuracy) => println!("Holdout accuracy: {:.2}%", accuracy * 100.0),
                None => println!("Holdout accuracy: n/a"),
            }
            println!();
            println!("Feature contribution:");
            print_ranking(engine.decisions().ranking());
        }
    }

    Ok(())
}
