use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};

mod config;
mod dates;
mod engine;
mod llm;
mod loader;
mod models;
mod parser;
mod rbac;

use models::StudentRecord;

#[derive(Parser)]
#[command(name = "student-data-query")]
#[command(about = "Plain-English queries over student homework and quiz records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured admin roles and their scopes
    Admins,
    /// Write a realistic sample dataset
    Seed {
        #[arg(long, default_value = config::DEFAULT_DATASET_PATH)]
        out: PathBuf,
    },
    /// Run one or more plain-English questions under an admin scope
    Query {
        #[arg(long, default_value = "Amit")]
        admin: String,
        /// Dataset file (.json or .csv); defaults to DATASET_PATH
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Questions to run; defaults to three stock examples
        questions: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Admins => {
            for admin in config::admin_roster() {
                println!(
                    "- {}: grades={:?} classes={:?} region={}",
                    admin.name, admin.allowed_grades, admin.allowed_classes, admin.region
                );
            }
        }
        Commands::Seed { out } => {
            let count = write_seed(&out)?;
            println!("Wrote {count} sample records to {}.", out.display());
        }
        Commands::Query {
            admin,
            dataset,
            limit,
            questions,
        } => {
            let settings = config::Settings::from_env();
            let admin = config::find_admin(&admin)
                .with_context(|| format!("unknown admin '{admin}'; run `admins` to list roles"))?;

            let path = dataset.unwrap_or_else(|| settings.dataset_path.clone());
            let records = loader::load_students(&path)?;
            let scoped = rbac::scope_records(&records, &admin);

            if settings.llm_enabled() {
                println!("OpenAI API key detected: LLM refinement enabled");
            } else {
                println!("No OpenAI API key set: using rule-based parsing only");
            }
            println!(
                "Admin {}: {} of {} records in scope",
                admin.name,
                scoped.len(),
                records.len()
            );

            let questions = if questions.is_empty() {
                stock_questions()
            } else {
                questions
            };

            for question in &questions {
                let seed = parser::parse(question);
                let parsed = llm::refine(question, seed, &settings).await;
                let mut rows = engine::apply_filters(&scoped, &parsed);
                rows.sort_by(|a, b| {
                    (&a.grade, &a.class, &a.student_name).cmp(&(&b.grade, &b.class, &b.student_name))
                });

                println!();
                println!("Query: {question}");
                println!("Parsed: {}", engine::build_summary(&parsed));
                println!("Rows: {}", rows.len());
                for row in rows.iter().take(limit) {
                    println!(
                        "- {} ({}, {}, {}) homework={} score={} quiz={} submitted={}",
                        row.student_name,
                        row.grade,
                        row.class,
                        row.region,
                        row.homework_submitted,
                        fmt_score(row.quiz_score),
                        fmt_date(row.quiz_date),
                        fmt_date(row.submission_date)
                    );
                }
                if rows.is_empty() {
                    println!("No matching records within this admin's scope.");
                }
            }
        }
    }

    Ok(())
}

fn stock_questions() -> Vec<String> {
    vec![
        "Which students haven't submitted homework?".to_string(),
        "Show performance for Grade 8 last week".to_string(),
        "List upcoming quizzes for next week".to_string(),
    ]
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.to_string(),
        None => "None".to_string(),
    }
}

fn fmt_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{s:.0}"),
        None => "None".to_string(),
    }
}

/// Sample data anchored to the current week so the stock questions always
/// return rows regardless of when it is generated.
fn write_seed(out: &std::path::Path) -> anyhow::Result<usize> {
    let monday = dates::monday_of_week(Local::now().date_naive());
    let record = |name: &str,
                  grade: &str,
                  class: &str,
                  region: &str,
                  submitted: bool,
                  score: Option<f64>,
                  quiz_offset: i64,
                  submission_offset: i64| {
        StudentRecord {
            student_name: name.to_string(),
            grade: grade.to_string(),
            class: class.to_string(),
            region: region.to_string(),
            homework_submitted: if submitted { "yes" } else { "no" }.to_string(),
            quiz_score: score,
            quiz_date: Some(monday + Duration::days(quiz_offset)),
            submission_date: submitted.then(|| monday + Duration::days(submission_offset)),
        }
    };

    let records = vec![
        // Last week's quizzes (offsets -7..-1), graded.
        record("Asha Verma", "Grade 8", "8A", "East", true, Some(88.0), -5, -6),
        record("Bilal Khan", "Grade 8", "8A", "East", false, Some(61.0), -5, 0),
        record("Chitra Rao", "Grade 8", "8B", "East", true, Some(74.0), -4, -3),
        record("Dev Patel", "Grade 8", "8B", "East", false, Some(52.0), -4, 0),
        record("Esha Nair", "Grade 7", "7A", "West", true, Some(91.0), -6, -5),
        record("Farhan Ali", "Grade 7", "7A", "West", false, None, -6, 0),
        // Upcoming quizzes (offsets 7..13), not yet scored.
        record("Gita Iyer", "Grade 8", "8A", "East", true, None, 8, -2),
        record("Harsh Mehta", "Grade 8", "8B", "East", true, None, 9, -1),
        record("Indira Joshi", "Grade 9", "9A", "North", true, None, 10, -2),
        record("Jai Singh", "Grade 9", "9B", "North", false, None, 10, 0),
    ];

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(out, json).with_context(|| format!("could not write {}", out.display()))?;
    Ok(records.len())
}
