use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rusqlite::types::Value;
use sql_exercises::blog::{self, extract_series_exercises};
use sql_exercises::db::{self, Row};
use sql_exercises::practice::{self, DEFAULT_SEED};
use sql_exercises::settings::Settings;

#[derive(Parser)]
#[command(
    name = "sql_exercises",
    about = "Exercise extractor for the SQL for Python Developers series"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract python and SQL exercises from the blog (reads BLOG_PATH)
    Extract {
        /// Which python block of each post to extract (0 = first)
        code_block_index: Option<usize>,
    },
    /// List the posts in the series and what extraction would produce
    Stats,
    /// Run a SQL file against the sample customers and orders tables
    Query {
        file: PathBuf,
        /// Treat the file as one query and print name-keyed records as JSON
        #[arg(long)]
        records: bool,
        /// Also load the vendors table
        #[arg(long)]
        vendors: bool,
        /// Also load the stats table
        #[arg(long)]
        stats: bool,
        /// Add the nullable customer columns
        #[arg(long)]
        nulls: bool,
    },
    /// Run the "first SQL query" exercise
    FirstQuery,
    /// Generate fake customers, load them, and show the first rows
    PracticeData {
        #[arg(short = 'n', long, default_value = "50")]
        count: usize,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { code_block_index } => {
            let mut settings = Settings::load()?;
            if let Some(idx) = code_block_index {
                settings.code_block_index = idx;
            }
            let opts = settings.extract_options()?;
            let report = extract_series_exercises(&opts)?;
            if report.posts == 0 {
                println!("No posts found in series '{}'", opts.series);
                return Ok(());
            }
            report.print();
            println!(
                "Exercises in {} and {}",
                opts.output_dir.display(),
                opts.sql_dir.display()
            );
            Ok(())
        }
        Commands::Stats => {
            let settings = Settings::load()?;
            let root = settings.require_blog_path()?;
            let rows = blog::summarize_series(root, &settings.series)?;
            if rows.is_empty() {
                println!("No posts found in series '{}'", settings.series);
                return Ok(());
            }

            println!(
                "{:>3} | {:<48} | {:>6} | {:>6} | {:>6} | {:>5}",
                "#", "Slug", "Weight", "Python", "SQL", "Stmts"
            );
            println!("{}", "-".repeat(90));
            for r in &rows {
                println!(
                    "{:>3} | {:<48} | {:>6} | {:>6} | {:>6} | {:>5}",
                    r.ordinal,
                    truncate(&r.slug, 48),
                    r.weight,
                    r.python_blocks,
                    r.sql_blocks,
                    r.sql_statements
                );
            }
            println!("\n{} posts in '{}'", rows.len(), settings.series);
            Ok(())
        }
        Commands::Query { file, records, vendors, stats, nulls } => {
            let conn = db::connect_in_memory()?;
            db::load_sample_customers(&conn)?;
            db::load_sample_orders(&conn)?;
            if vendors {
                db::load_sample_vendors(&conn)?;
            }
            if stats {
                db::load_sample_stats(&conn)?;
            }
            if nulls {
                db::load_null_columns(&conn)?;
            }

            if records {
                let sql = db::load_sql_file(&file)?;
                for record in db::query_to_dict_list(&conn, &sql)? {
                    let json: serde_json::Map<String, serde_json::Value> =
                        record.iter().map(|(k, v)| (k.clone(), to_json(v))).collect();
                    println!("{}", serde_json::Value::Object(json));
                }
                return Ok(());
            }

            match db::execute_sql_file(&conn, &file)
                .with_context(|| format!("Failed to run {}", file.display()))?
            {
                Some(rows) => print_rows(&rows),
                None => println!("Nothing to execute in {}", file.display()),
            }
            Ok(())
        }
        Commands::FirstQuery => {
            let rows = practice::first_query()?;
            print_rows(&rows);
            Ok(())
        }
        Commands::PracticeData { count, seed } => {
            let today = chrono::Local::now().date_naive();
            let customers = practice::generate_customer_data(count, seed, today);
            let records = practice::load_customer_data(&customers)?;

            println!("Returned {} rows of data.", records.len());
            println!("Here are the first 5 rows:");
            let head: Vec<Row> = records
                .iter()
                .take(5)
                .map(|r| {
                    ["id", "name", "email", "city", "signup_date", "is_premium"]
                        .iter()
                        .map(|col| r.get(*col).cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .collect();
            print_rows(&head);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_rows(rows: &[Row]) {
    for row in rows {
        let cells: Vec<String> = row.iter().map(db::display_value).collect();
        println!("{}", cells.join(" | "));
    }
    println!("({} rows)", rows.len());
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Real(r) => serde_json::Value::from(*r),
        Value::Text(t) => serde_json::Value::from(t.as_str()),
        Value::Blob(b) => serde_json::Value::from(b.clone()),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_index(args: &[&str]) -> Result<Option<usize>, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Commands::Extract { code_block_index } => Ok(code_block_index),
            _ => panic!("expected the extract subcommand"),
        }
    }

    #[test]
    fn block_index_parses() {
        let idx = extract_index(&["sql_exercises", "extract", "1"]).unwrap();
        assert_eq!(idx, Some(1));
        let idx = extract_index(&["sql_exercises", "extract"]).unwrap();
        assert_eq!(idx, None);
    }

    #[test]
    fn non_numeric_block_index_is_rejected() {
        assert!(Cli::try_parse_from(["sql_exercises", "extract", "abc"]).is_err());
    }

    #[test]
    fn negative_block_index_is_rejected() {
        assert!(Cli::try_parse_from(["sql_exercises", "extract", "-1"]).is_err());
    }

    #[test]
    fn practice_data_defaults() {
        let cli = Cli::try_parse_from(["sql_exercises", "practice-data"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::PracticeData { count: 50, seed } if seed == DEFAULT_SEED
        ));
    }
}
