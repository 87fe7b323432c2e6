//! Eligibility Review CLI

use clap::{Parser, Subcommand};
use elig_catalog::policies::{default_policies, TrackPolicy};
use elig_core::{
    normalize::normalize_course,
    report::{self, ReportFormat},
    roster::load_roster,
    RecordSource, Reviewer,
};
use elig_sis::{SisClient, SisConfig};
use elig_terms::{parse_term, TermValue};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "elig-review")]
#[command(about = "Requirement Verification & Eligibility Review Tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a roster of applications
    Review {
        /// Path to the roster JSON file
        #[arg(short, long)]
        roster: PathBuf,

        /// Current term, as a code or name (2262, Sp26, "Spring 2026")
        #[arg(short, long)]
        current_term: String,

        /// Serve record lookups from a JSON fixture instead of the gateway
        #[arg(long)]
        records: Option<PathBuf>,

        /// Output format (json, markdown)
        #[arg(short, long, default_value = "markdown")]
        output: String,

        /// Output file (defaults to stdout)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Normalize reported course names
    Normalize {
        /// Course names as applicants wrote them
        #[arg(required = true)]
        courses: Vec<String>,
    },

    /// Parse term codes and names
    Term {
        /// Term values (2262, Sp26, "Spring 2026")
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// List the configured admission policies
    Policies,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    match cli.command {
        Commands::Review {
            roster,
            current_term,
            records,
            output,
            output_file,
        } => {
            cmd_review(roster, current_term, records, output, output_file).await;
        }
        Commands::Normalize { courses } => {
            cmd_normalize(courses);
        }
        Commands::Term { values } => {
            cmd_term(values);
        }
        Commands::Policies => {
            cmd_policies();
        }
    }
}

async fn cmd_review(
    roster_path: PathBuf,
    current_term: String,
    records: Option<PathBuf>,
    output_format: String,
    output_file: Option<PathBuf>,
) {
    let TermValue::Id(current_term) = parse_term(&current_term) else {
        error!("Not a recognized term: {}", current_term);
        std::process::exit(1);
    };

    info!("Reviewing roster: {}", roster_path.display());

    if !roster_path.exists() {
        error!("File not found: {}", roster_path.display());
        std::process::exit(1);
    }

    let roster = match load_roster(&roster_path) {
        Ok(roster) => roster,
        Err(e) => {
            error!("Failed to load roster: {}", e);
            std::process::exit(1);
        }
    };

    let source: Box<dyn RecordSource> = match records {
        Some(path) => {
            if !path.exists() {
                error!("File not found: {}", path.display());
                std::process::exit(1);
            }
            match elig_core::FileSource::load(&path) {
                Ok(source) => Box::new(source),
                Err(e) => {
                    error!("Failed to load records: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let config = match SisConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    error!("Gateway not configured: {}", e);
                    std::process::exit(1);
                }
            };
            match SisClient::new(config) {
                Ok(client) => Box::new(client),
                Err(e) => {
                    error!("Failed to build gateway client: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let reviewer = match Reviewer::new(current_term, source) {
        Ok(reviewer) => reviewer,
        Err(e) => {
            error!("Invalid review configuration: {}", e);
            std::process::exit(1);
        }
    };

    let batch = reviewer.review_batch(roster).await;
    info!(
        "Review completed: {} eligible, {} conditional, {} ineligible, {} lookup failures",
        batch.summary.eligible,
        batch.summary.conditional,
        batch.summary.ineligible,
        batch.summary.lookup_failures
    );

    let format = match output_format.to_lowercase().as_str() {
        "json" => ReportFormat::Json,
        _ => ReportFormat::Markdown,
    };

    match report::generate_report(&batch, format) {
        Ok(report_content) => {
            if let Some(out_path) = output_file {
                std::fs::write(&out_path, &report_content).expect("Failed to write output file");
                info!("Report written to: {}", out_path.display());
            } else {
                println!("{}", report_content);
            }
        }
        Err(e) => {
            error!("Failed to generate report: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_normalize(courses: Vec<String>) {
    for course in &courses {
        println!("{} -> {}", course, normalize_course(course));
    }
}

fn cmd_term(values: Vec<String>) {
    for value in &values {
        match parse_term(value) {
            TermValue::Id(id) => match id.season() {
                Some(season) => println!("{} -> {} ({} {})", value, id, season, id.year()),
                None => println!("{} -> {}", value, id),
            },
            TermValue::Text(_) => println!("{} -> not a term code", value),
        }
    }
}

fn cmd_policies() {
    println!("\nAdmission Policies\n{}", "=".repeat(50));

    for policy in default_policies() {
        println!("\n{}", policy.major);
        println!(
            "  Requirement groups: {}",
            policy.requirement_prefixes.join(", ")
        );
        println!("  Basic gates: {}", policy.gates.len());
        print_track("First-year", &policy.first_year);
        print_track("Transfer", &policy.transfer);
    }
}

fn print_track(label: &str, track: &TrackPolicy) {
    match track {
        TrackPolicy::Ineligible(reason) => println!("  {}: ineligible ({})", label, reason),
        TrackPolicy::Tiers(track) => {
            match track.max_terms {
                Some(max) => println!("  {} (up to {} terms in attendance):", label, max),
                None => println!("  {}:", label),
            }
            for tier in &track.tiers {
                if tier.max_terms == u32::MAX {
                    println!(
                        "    {} ({}+ terms): {} checks",
                        tier.label,
                        tier.min_terms,
                        tier.checks.len()
                    );
                } else {
                    println!(
                        "    {} ({}-{} terms): {} checks",
                        tier.label,
                        tier.min_terms,
                        tier.max_terms - 1,
                        tier.checks.len()
                    );
                }
            }
        }
    }
}
