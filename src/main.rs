use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

mod aggregate;
mod attendance;
mod classify;
mod config;
mod db;
mod models;
mod report;
mod risk;
mod score;
mod trend;

use config::Thresholds;
use models::StudentContext;

#[derive(Parser)]
#[command(name = "performance-insights")]
#[command(
    about = "Performance and attendance analytics over the academic records store",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Department,
    Semester,
    Subject,
    ExamType,
}

impl GroupBy {
    fn label(self) -> &'static str {
        match self {
            GroupBy::Department => "department",
            GroupBy::Semester => "semester",
            GroupBy::Subject => "subject",
            GroupBy::ExamType => "exam type",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one student: average, band, trend, risk and attendance
    Student {
        #[arg(long)]
        registration: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Aggregate averages, distribution and ranking across a cohort
    Summary {
        #[arg(long, value_enum, default_value = "department")]
        group_by: GroupBy,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        semester: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        semester: Option<i32>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(serde::Serialize)]
struct SummaryOutput {
    group_by: String,
    records: usize,
    scored: usize,
    mean: Option<f64>,
    distribution: aggregate::BandDistribution,
    ranking: Vec<aggregate::RankedBucket>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to the academic records Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    let thresholds = Thresholds::default();

    match cli.command {
        Commands::Student {
            registration,
            subject,
            json,
        } => {
            let scope = db::Scope {
                registration: Some(registration.as_str()),
                ..db::Scope::default()
            };
            let students = db::fetch_students(&pool, &scope).await?;
            let Some(context) = students.into_iter().next() else {
                println!("No student found for registration {registration}.");
                return Ok(());
            };

            let mut scores = db::fetch_score_records(&pool, &scope).await?;
            let mut attendance_records = db::fetch_attendance_records(&pool, &scope).await?;
            if let Some(subject) = subject.as_deref() {
                scores.retain(|record| record.subject_code == subject);
                attendance_records.retain(|record| record.subject_code == subject);
            }

            let assessment =
                risk::assess_student(context, &scores, &attendance_records, &thresholds);
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                print_assessment(&assessment);
            }
        }
        Commands::Summary {
            group_by,
            department,
            semester,
            json,
        } => {
            let scope = db::Scope {
                department: department.as_deref(),
                registration: None,
                semester,
            };
            let students = db::fetch_students(&pool, &scope).await?;
            let scores = db::fetch_score_records(&pool, &scope).await?;

            let contexts: HashMap<Uuid, StudentContext> = students
                .into_iter()
                .map(|student| (student.student_id, student))
                .collect();
            let buckets = match group_by {
                GroupBy::Department => aggregate::aggregate_by(&scores, &thresholds, |record| {
                    contexts
                        .get(&record.student_id)
                        .map(|c| c.department_id.clone())
                        .unwrap_or_else(|| "unassigned".to_string())
                }),
                GroupBy::Semester => aggregate::aggregate_by(&scores, &thresholds, |record| {
                    contexts
                        .get(&record.student_id)
                        .map(|c| c.semester.to_string())
                        .unwrap_or_else(|| "unassigned".to_string())
                }),
                GroupBy::Subject => {
                    aggregate::aggregate_by(&scores, &thresholds, |record| {
                        record.subject_code.clone()
                    })
                }
                GroupBy::ExamType => {
                    aggregate::aggregate_by(&scores, &thresholds, |record| record.exam_type.clone())
                }
            };
            let ranking = aggregate::rank_by_mean(buckets);

            let scored: Vec<f64> = score::valid_percentages(&scores).collect();
            let summary = SummaryOutput {
                group_by: group_by.label().to_string(),
                records: scores.len(),
                scored: scored.len(),
                mean: if scored.is_empty() {
                    None
                } else {
                    Some(scored.iter().sum::<f64>() / scored.len() as f64)
                },
                distribution: aggregate::distribution(scored.iter().copied(), &thresholds),
                ranking,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Report {
            department,
            semester,
            out,
        } => {
            let scope = db::Scope {
                department: department.as_deref(),
                registration: None,
                semester,
            };
            let students = db::fetch_students(&pool, &scope).await?;
            let scores = db::fetch_score_records(&pool, &scope).await?;
            let attendance_records = db::fetch_attendance_records(&pool, &scope).await?;

            let report = report::build_report(
                department.as_deref(),
                &students,
                &scores,
                &attendance_records,
                &thresholds,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn print_assessment(assessment: &risk::StudentAssessment) {
    let context = &assessment.context;
    println!(
        "{} ({}), {} semester {}, batch {}",
        context.full_name,
        context.registration_no,
        context.department_id,
        context.semester,
        context.batch
    );

    match (assessment.average, assessment.band) {
        (Some(average), Some(band)) => println!(
            "Average: {:.1}% ({}, {} pace)",
            average,
            band.label(),
            band.pace().label()
        ),
        _ => println!("Average: no scored exams on record."),
    }

    println!("Trend: {}", assessment.trend.label());

    match assessment.risk {
        Some(risk) => println!("Risk: {}", risk.label()),
        None => println!("Risk: no data."),
    }

    match (assessment.attendance.percentage, assessment.attendance_band) {
        (Some(percentage), Some(band)) => {
            let attended = assessment.attendance.present + assessment.attendance.late;
            println!(
                "Attendance: {:.1}% ({} of {} sessions, {})",
                percentage,
                attended,
                assessment.attendance.total,
                band.label()
            );
        }
        _ => println!("Attendance: no records."),
    }
}

fn print_summary(summary: &SummaryOutput) {
    println!("Cohort summary grouped by {}:", summary.group_by);

    match summary.mean {
        Some(mean) => println!(
            "Average {:.1}% across {} scored exams ({} records lacked a usable maximum).",
            mean,
            summary.scored,
            summary.records - summary.scored
        ),
        None => println!("No scored exams in scope."),
    }

    let counts = &summary.distribution;
    println!(
        "Distribution: {} excellent, {} good, {} average, {} poor ({} scored).",
        counts.excellent,
        counts.good,
        counts.average,
        counts.poor,
        counts.total()
    );

    for entry in &summary.ranking {
        match (entry.rank, entry.bucket.mean) {
            (Some(rank), Some(mean)) => println!(
                "{}. {}: {:.1}% across {} scored exams",
                rank, entry.bucket.key, mean, entry.bucket.count
            ),
            _ => println!(
                "-. {}: no scored exams ({} records)",
                entry.bucket.key, entry.bucket.records
            ),
        }
    }
}
