use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod dashboard;
mod error;
mod groups;
mod insights;
mod kpi;
mod models;
mod records;
mod report;
mod risk;
mod suggestions;

use models::{EmployeeRecord, RiskTier};
use records::RecordFilter;

#[derive(Parser)]
#[command(name = "churn-risk")]
#[command(about = "Churn risk analytics over employee prediction records", long_about = None)]
struct Cli {
    /// Employee records CSV exported by the records API
    #[arg(long, global = true, env = "CHURN_RECORDS_CSV", default_value = "employees.csv")]
    records: PathBuf,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard KPIs and risk distribution
    Summary,
    /// Average churn risk per department or tenure band
    Groups {
        #[arg(long, value_enum, default_value_t = GroupBy::Department)]
        by: GroupBy,
        /// Order departments by average risk, highest first
        #[arg(long)]
        sorted: bool,
    },
    /// Derived insights for the whole record set
    Insights,
    /// Generate a markdown report
    Report {
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value = "churn_report.md")]
        out: PathBuf,
    },
    /// List employees with optional filters
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long, value_enum)]
        risk: Option<RiskArg>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Classify a single probability or service label
    #[command(group(
        ArgGroup::new("input")
            .args(["probability", "label"])
            .required(true)
            .multiple(false)
    ))]
    Classify {
        #[arg(long)]
        probability: Option<f64>,
        #[arg(long)]
        label: Option<String>,
    },
    /// Risk tier and retention suggestions for one employee
    Suggest {
        #[arg(long)]
        employee: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Department,
    Tenure,
}

#[derive(Clone, Copy, ValueEnum)]
enum RiskArg {
    Low,
    Medium,
    High,
}

impl From<RiskArg> for RiskTier {
    fn from(value: RiskArg) -> Self {
        match value {
            RiskArg::Low => RiskTier::Low,
            RiskArg::Medium => RiskTier::Medium,
            RiskArg::High => RiskTier::High,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(cli: &Cli) -> anyhow::Result<Vec<EmployeeRecord>> {
    records::load_csv(&cli.records)
        .with_context(|| format!("failed to load employee records from {}", cli.records.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(records = %cli.records.display(), "starting");

    match &cli.command {
        Commands::Summary => {
            let records = load(&cli)?;
            let summary = kpi::summarize(&records)?;
            let distribution = kpi::risk_distribution(&records)?;

            if cli.json {
                print_json(&serde_json::json!({
                    "kpi": summary,
                    "risk_distribution": distribution,
                }))?;
                return Ok(());
            }

            println!("Total employees: {}", summary.total_count);
            println!(
                "Average churn risk: {:.1}%",
                summary.average_churn_probability * 100.0
            );
            println!("High risk count: {}", summary.high_risk_count);
            println!(
                "Average satisfaction: {:.0}%",
                summary.average_satisfaction * 100.0
            );
            println!(
                "Risk mix: {} low / {} medium / {} high of {}",
                distribution.low,
                distribution.medium,
                distribution.high,
                distribution.total()
            );
        }
        Commands::Groups { by, sorted } => {
            let records = load(&cli)?;
            let mut buckets = match by {
                GroupBy::Department => groups::group_by_department(&records)?,
                GroupBy::Tenure => groups::group_by_tenure(&records)?,
            };
            if *sorted {
                groups::sort_by_risk(&mut buckets);
            }

            if cli.json {
                return print_json(&buckets);
            }

            if buckets.is_empty() {
                println!("No employee records loaded.");
            }
            for bucket in buckets.iter() {
                println!(
                    "- {}: {:.1}% average risk across {} employees",
                    bucket.key, bucket.average_churn_probability_percent, bucket.count
                );
            }
        }
        Commands::Insights => {
            let records = load(&cli)?;
            let snapshot = dashboard::build_dashboard(&records)?;

            if cli.json {
                return print_json(&snapshot.insights);
            }

            for insight in snapshot.insights.iter() {
                println!("{}: {}", insight.category.title(), insight.text);
            }
        }
        Commands::Report { department, out } => {
            let mut records = load(&cli)?;
            if let Some(department) = department {
                let filter = RecordFilter {
                    department: Some(department.clone()),
                    ..Default::default()
                };
                records = records::filter_records(&records, &filter)?;
                if records.is_empty() {
                    warn!(department = %department, "no employees matched the department filter");
                }
            }

            let snapshot = dashboard::build_dashboard(&records)?;
            let generated_on = chrono::Local::now().date_naive();
            let report = report::build_report(department.as_deref(), generated_on, &snapshot);
            std::fs::write(out, report)
                .with_context(|| format!("failed to write report to {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::List {
            department,
            risk,
            search,
            page,
            limit,
        } => {
            let records = load(&cli)?;
            let filter = RecordFilter {
                department: department.clone(),
                risk: risk.map(RiskTier::from),
                search: search.clone(),
            };
            let matched = records::filter_records(&records, &filter)?;
            let page = records::paginate(&matched, *page, *limit)?;

            if cli.json {
                return print_json(&page);
            }

            if page.items.is_empty() {
                println!("No employees matched.");
                return Ok(());
            }

            println!(
                "Page {} of {} ({} employees)",
                page.page, page.total_pages, page.total
            );
            for record in page.items.iter() {
                println!(
                    "- {} ({}, {}) {} months, churn {:.1}% [{}]",
                    record.display_name(),
                    record.employee_id,
                    record.department,
                    record.tenure_months,
                    record.churn_probability * 100.0,
                    risk::classify(record.churn_probability)?
                );
            }
        }
        Commands::Classify { probability, label } => {
            let tier = match (probability, label) {
                (Some(probability), _) => risk::classify(*probability)?,
                (None, label) => risk::classify_by_label(label.as_deref()),
            };

            if cli.json {
                return print_json(&tier);
            }
            println!("{tier}");
        }
        Commands::Suggest { employee } => {
            let records = load(&cli)?;
            let record = records
                .iter()
                .find(|record| record.employee_id == *employee)
                .with_context(|| format!("employee {employee} not found"))?;

            let tier = risk::classify_record(record)?;
            let reported = risk::classify_by_label(record.status.as_deref());
            if reported != RiskTier::Unknown && reported != tier {
                warn!(
                    employee = %record.employee_id,
                    reported = %reported,
                    computed = %tier,
                    "service status label disagrees with churn probability"
                );
            }
            let suggestions = suggestions::retention_suggestions(record)?;

            if cli.json {
                return print_json(&serde_json::json!({
                    "employee_id": record.employee_id,
                    "churn_probability": record.churn_probability,
                    "risk": tier,
                    "suggestions": suggestions,
                }));
            }

            println!(
                "{} ({}): {} at {:.1}% churn probability",
                record.display_name(),
                record.department,
                tier,
                record.churn_probability * 100.0
            );
            for suggestion in suggestions.iter() {
                println!("- {suggestion}");
            }
        }
    }

    Ok(())
}
