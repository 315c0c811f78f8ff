// src/main.rs

use chrono::Utc;
use clap::{Parser, Subcommand};
use cp_tracker::{
    database, tracker, ApiResponse, Config, DashboardStats, Difficulty, IntervalPolicy,
    NewProblem, ProblemQuery, ProblemRecord, ProblemStatus, ReviewFilter, ReviewItem, ReviewSort,
    Result,
};
use log::{debug, error, info};
use rusqlite::Connection;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Track solved problems across judges and decide what to review next
#[derive(Parser)]
#[command(name = "cp-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// SQLite database file (overrides CP_TRACKER_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Climb the review interval ladder with each review
    #[arg(long, global = true)]
    progressive: bool,

    /// Print `{success, data, error}` JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new problem
    Add {
        title: String,
        #[arg(long, default_value = "LeetCode")]
        platform: String,
        /// easy, medium or hard
        #[arg(long)]
        difficulty: Difficulty,
        #[arg(long, default_value = "unsolved")]
        status: ProblemStatus,
        #[arg(long)]
        url: Option<String>,
        /// Comma-separated
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List problems
    List {
        #[arg(long)]
        status: Option<ProblemStatus>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        platform: Option<String>,
    },

    /// Show one problem
    Show { id: i64 },

    /// Change a problem's status
    Status { id: i64, status: ProblemStatus },

    /// Change the status of several problems at once
    BulkStatus {
        status: ProblemStatus,
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Add tags to a problem
    Tag {
        id: i64,
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove a tag from a problem
    Untag { id: i64, tag: String },

    /// Set notes on a problem (omit the text to clear them)
    Note { id: i64, text: Option<String> },

    /// Delete a problem
    Delete { id: i64 },

    /// Show the review queue
    Queue {
        /// all, due or overdue
        #[arg(long, default_value = "all")]
        filter: ReviewFilter,
        /// priority, date or difficulty
        #[arg(long, default_value = "priority")]
        sort: ReviewSort,
    },

    /// Mark a problem as reviewed
    Review { id: i64 },

    /// Dashboard summary
    Stats,

    /// Load the bundled sample problems into an empty store
    Seed,

    /// Import problems from a JSON file
    Import { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if cli.progressive {
        config.interval_policy = IntervalPolicy::Progressive;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    let json = cli.json;
    match run(cli.command, &config, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                error!("{}", e);
                print_json(&ApiResponse::<()>::err(e.to_string()));
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn open_store(config: &Config) -> Result<Connection> {
    config.ensure_data_dir()?;
    info!("Database path: {:?}", config.db_path);
    let conn = Connection::open(&config.db_path)?;
    database::init_db(&conn)?;
    Ok(conn)
}

fn run(command: Commands, config: &Config, json: bool) -> Result<()> {
    let conn = open_store(config)?;
    let now = Utc::now();
    let policy = config.interval_policy;
    debug!("Interval policy: {:?}", policy);

    match command {
        Commands::Add {
            title,
            platform,
            difficulty,
            status,
            url,
            tags,
            notes,
        } => {
            let new = NewProblem {
                title,
                platform,
                url,
                difficulty,
                status,
                tags,
                notes,
                solved_at: None,
                last_reviewed_at: None,
                review_count: 0,
            };
            let p = tracker::add_problem(&conn, &new, now)?;
            emit(json, &p, || print_record(&p));
        }
        Commands::List {
            status,
            difficulty,
            tag,
            platform,
        } => {
            let query = ProblemQuery {
                status,
                difficulty,
                tag,
                platform,
            };
            let problems = tracker::list_problems(&conn, &query)?;
            emit(json, &problems, || print_records(&problems));
        }
        Commands::Show { id } => {
            let p = tracker::get_problem(&conn, id)?;
            emit(json, &p, || print_record(&p));
        }
        Commands::Status { id, status } => {
            let p = tracker::update_status(&conn, id, status, now)?;
            emit(json, &p, || print_record(&p));
        }
        Commands::BulkStatus { status, ids } => {
            let n = tracker::bulk_update_status(&conn, &ids, status, now)?;
            emit(json, &n, || println!("Updated {} problems to {}", n, status));
        }
        Commands::Tag { id, tags } => {
            let p = tracker::add_tags(&conn, id, &tags)?;
            emit(json, &p, || print_record(&p));
        }
        Commands::Untag { id, tag } => {
            let p = tracker::remove_tag(&conn, id, &tag)?;
            emit(json, &p, || print_record(&p));
        }
        Commands::Note { id, text } => {
            let p = tracker::update_notes(&conn, id, text.as_deref())?;
            emit(json, &p, || print_record(&p));
        }
        Commands::Delete { id } => {
            tracker::delete_problem(&conn, id)?;
            emit(json, &id, || println!("Deleted problem {}", id));
        }
        Commands::Queue { filter, sort } => {
            let items = tracker::review_queue(&conn, now, filter, sort, policy)?;
            emit(json, &items, || print_queue(&items));
        }
        Commands::Review { id } => {
            let p = tracker::mark_problem_reviewed(&conn, id, now)?;
            emit(json, &p, || print_record(&p));
        }
        Commands::Stats => {
            let stats = tracker::dashboard(&conn, now, policy)?;
            emit(json, &stats, || print_stats(&stats));
        }
        Commands::Seed => {
            let n = database::seed_sample_data(&conn, now)?;
            emit(json, &n, || println!("Seeded {} problems", n));
        }
        Commands::Import { file } => {
            let data = fs::read_to_string(&file)?;
            let n = database::seed_from_json(&conn, &data, now)?;
            emit(json, &n, || println!("Imported {} problems from {}", n, file.display()));
        }
    }

    Ok(())
}

// --- Output ---

fn emit<T: Serialize>(json: bool, data: &T, text: impl FnOnce()) {
    if json {
        print_json(&ApiResponse::ok(data));
    } else {
        text();
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!("Failed to encode output: {}", e),
    }
}

fn date_or_dash(ts: Option<chrono::DateTime<Utc>>) -> String {
    ts.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d").to_string())
}

fn print_record(p: &ProblemRecord) {
    println!("#{} {} [{}]", p.id, p.title, p.platform);
    println!("  difficulty: {}", p.difficulty);
    println!("  status:     {}", p.status);
    println!("  solved:     {}", date_or_dash(p.solved_at));
    println!("  reviewed:   {} ({} times)", date_or_dash(p.last_reviewed_at), p.review_count);
    if !p.tags.is_empty() {
        println!("  tags:       {}", p.tags.join(", "));
    }
    if let Some(url) = &p.url {
        println!("  url:        {}", url);
    }
    if let Some(notes) = &p.notes {
        println!("  notes:      {}", notes);
    }
}

fn print_records(problems: &[ProblemRecord]) {
    if problems.is_empty() {
        println!("No problems.");
        return;
    }
    println!("{:>5}  {:<10}  {:<6}  {:<11}  TITLE", "ID", "STATUS", "DIFF", "PLATFORM");
    for p in problems {
        println!(
            "{:>5}  {:<10}  {:<6}  {:<11}  {}",
            p.id,
            p.status.as_str(),
            p.difficulty.as_str(),
            p.platform,
            p.title
        );
    }
}

fn print_queue(items: &[ReviewItem]) {
    if items.is_empty() {
        println!("Nothing to review.");
        return;
    }
    println!("{:>5}  {:<8}  {:<6}  {:<10}  {:>5}  TITLE", "ID", "PRIORITY", "DIFF", "NEXT", "DAYS");
    for item in items {
        println!(
            "{:>5}  {:<8}  {:<6}  {:<10}  {:>5}  {}",
            item.record.id,
            item.review_priority.as_str(),
            item.record.difficulty.as_str(),
            item.next_review_at.format("%Y-%m-%d"),
            item.days_since_last_review,
            item.record.title
        );
    }
}

fn print_stats(s: &DashboardStats) {
    println!("Problems: {} ({} in review)", s.total, s.reviewable);
    println!("Due: {}  Overdue: {}", s.due, s.overdue);
    for (status, n) in &s.by_status {
        println!("  {:<10} {}", status.as_str(), n);
    }
    for (difficulty, n) in &s.by_difficulty {
        println!("  {:<10} {}", difficulty.as_str(), n);
    }
    for (priority, n) in &s.by_priority {
        println!("  {:<10} {}", format!("{} prio", priority), n);
    }
    if !s.top_tags.is_empty() {
        let tags: Vec<String> = s.top_tags.iter().map(|(t, n)| format!("{} ({})", t, n)).collect();
        println!("Top tags: {}", tags.join(", "));
    }
}
