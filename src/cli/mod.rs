//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `promptlens ask` — submit a prompt from the terminal
//! - `promptlens stats` — aggregate feedback / latency metrics
//! - `promptlens log` — dump recent interaction records
//! - `promptlens health` — credential, config, and log-file status

use anyhow::Result;
use colored::Colorize;

use crate::analytics::{self, AggregateStats};
use crate::config::{self, PromptlensConfig};
use crate::dashboard::Dashboard;
use crate::llm::HfClient;
use crate::store::{InteractionRecord, InteractionStore};

/// Output format for analytics commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// promptlens ask
// ---------------------------------------------------------------------------

/// Submit a prompt through the full orchestrator path and print the result.
pub fn run_ask(prompt: &str, model: Option<&str>, template: Option<&str>) -> Result<()> {
    let config = PromptlensConfig::load();
    let model = model.unwrap_or(&config.default_model).to_string();
    let template = template.unwrap_or(&config.default_template).to_string();

    let store = InteractionStore::open(config.log_file.clone());
    let client = HfClient::from_config(&config);
    let mut dash = Dashboard::new(store, client);

    let (response, latency) = dash.submit(prompt, &template, &model);

    println!("{} {}", "Model:".bold(), model);
    println!("{} {latency:.3}s", "Latency:".bold());
    println!();
    println!("{response}");

    Ok(())
}

// ---------------------------------------------------------------------------
// promptlens stats
// ---------------------------------------------------------------------------

/// Show aggregate statistics over the full interaction log.
pub fn run_stats(format: OutputFormat) -> Result<()> {
    let config = PromptlensConfig::load();
    let store = InteractionStore::open(config.log_file);
    let stats = analytics::compute_stats(&store.read_all());

    if stats.total == 0 && format == OutputFormat::Table {
        println!(
            "{}",
            "No interactions logged yet. Submit a prompt to start collecting data.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_stats_json(&stats)?,
        OutputFormat::Csv => print_stats_csv(&stats),
        OutputFormat::Table => print_stats_table(&stats),
    }

    Ok(())
}

fn print_stats_table(stats: &AggregateStats) {
    println!("{}", "Prompt Evaluation Report".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!("  {} {}", "Total requests:    ".bold(), stats.total);
    println!("  {} {}", "Thumbs up:         ".bold(), stats.thumbs_up);
    println!("  {} {}", "Thumbs down:       ".bold(), stats.thumbs_down);
    println!("  {} {}", "Hallucinations:    ".bold(), stats.hallucinations);
    println!("  {} {:.3}s", "Avg latency:       ".bold(), stats.avg_latency);
    println!(
        "  {} {:.1}%",
        "Satisfaction:      ".bold(),
        stats.satisfaction_rate
    );
    println!(
        "  {} {:.1}%",
        "Hallucination rate:".bold(),
        stats.hallucination_rate
    );
}

fn print_stats_json(stats: &AggregateStats) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

fn print_stats_csv(stats: &AggregateStats) {
    println!(
        "total,thumbs_up,thumbs_down,hallucinations,avg_latency,satisfaction_rate,hallucination_rate"
    );
    println!(
        "{},{},{},{},{},{},{}",
        stats.total,
        stats.thumbs_up,
        stats.thumbs_down,
        stats.hallucinations,
        stats.avg_latency,
        stats.satisfaction_rate,
        stats.hallucination_rate
    );
}

// ---------------------------------------------------------------------------
// promptlens log
// ---------------------------------------------------------------------------

/// Dump the most recent `limit` interaction records, oldest first.
pub fn run_log(format: OutputFormat, limit: usize) -> Result<()> {
    let config = PromptlensConfig::load();
    let store = InteractionStore::open(config.log_file);
    let records = store.read_all();

    let start = records.len().saturating_sub(limit);
    let recent = &records[start..];

    if recent.is_empty() && format == OutputFormat::Table {
        println!("{}", "No interactions logged yet.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recent)?),
        OutputFormat::Csv => print_log_csv(recent),
        OutputFormat::Table => print_log_table(recent),
    }

    Ok(())
}

fn print_log_table(records: &[InteractionRecord]) {
    println!(
        "  {:<19} {:<28} {:>8} {:<10} {:<24}",
        "Time", "Prompt", "Latency", "Feedback", "Model"
    );
    println!("  {}", "-".repeat(94));

    for (i, record) in records.iter().enumerate() {
        let feedback = record
            .user_feedback
            .map(|f| f.label())
            .unwrap_or("-");
        let line = format!(
            "  {:<19} {:<28} {:>7.3}s {:<10} {:<24}",
            format_timestamp(record.timestamp),
            truncate(&record.prompt, 28),
            record.latency,
            feedback,
            truncate(&record.model_version, 24),
        );

        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_log_csv(records: &[InteractionRecord]) {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for record in records {
        let _ = writer.serialize(record);
    }
    let _ = writer.flush();
}

// ---------------------------------------------------------------------------
// promptlens health
// ---------------------------------------------------------------------------

/// Report credential, config, and log-file status.
pub fn run_health() -> Result<()> {
    let config = PromptlensConfig::load();

    println!("{}", "promptlens health".bold().cyan());
    println!();

    let token_status = if config.token.is_some() {
        "set".green()
    } else {
        "missing — submissions will return an error response".red()
    };
    println!("  {} {}", "HF_TOKEN:    ".bold(), token_status);

    let config_exists = config::config_file_path().map(|p| p.exists()).unwrap_or(false);
    println!(
        "  {} {}",
        "Config file: ".bold(),
        if config_exists {
            "present".green()
        } else {
            "defaults (no config.toml)".yellow()
        }
    );

    let log_exists = config.log_file.exists();
    let row_count = if log_exists {
        InteractionStore::open(config.log_file.clone()).read_all().len()
    } else {
        0
    };
    println!(
        "  {} {} ({} rows)",
        "Log file:    ".bold(),
        config.log_file.display(),
        row_count
    );

    println!("  {} {}", "Model:       ".bold(), config.default_model);
    println!("  {} {}", "Dashboard:   ".bold(), config.server_addr);

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render an epoch-seconds timestamp as local wall-clock time.
fn format_timestamp(epoch_seconds: f64) -> String {
    chrono::DateTime::from_timestamp(epoch_seconds as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
