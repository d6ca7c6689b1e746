//! CSV-backed interaction store.
//!
//! Every prompt submitted through the dashboard becomes one row in a flat
//! comma-separated table (header row + records). The table is the entire
//! durable state: no index, no compaction. Supports append, full read, and a
//! single update-by-match operation used to attach user feedback after
//! generation.
//!
//! Write failures are best-effort: a diagnostic goes to stderr and the caller
//! observes no error. A read failure degrades to an empty table so that every
//! downstream consumer (stats, charts) keeps working.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Column set of the persisted table, in order. Fixed by the file contract —
/// never varies across reads or writes.
pub const COLUMNS: [&str; 8] = [
    "timestamp",
    "prompt",
    "response",
    "latency",
    "model_version",
    "prompt_template",
    "user_feedback",
    "hallucination",
];

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// User rating attached to a logged interaction after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

impl Feedback {
    /// Human-readable label for display — never the raw stored marker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Thumbs up",
            Self::Negative => "Thumbs down",
        }
    }
}

/// A single logged interaction: one row in the persisted table.
///
/// Created once at append time with the feedback fields unset; mutated at
/// most once by [`InteractionStore::update_by_match`]; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Seconds since the Unix epoch, set at log time.
    pub timestamp: f64,
    pub prompt: String,
    /// Generated text, or a literal error message for failed calls.
    pub response: String,
    /// Wall-clock duration of the inference call in seconds, 3 decimal
    /// places. 0 on error paths.
    pub latency: f64,
    pub model_version: String,
    pub prompt_template: String,
    /// Empty until the user rates the response.
    pub user_feedback: Option<Feedback>,
    #[serde(default)]
    pub hallucination: bool,
}

impl InteractionRecord {
    /// Build a fresh record stamped with the current time. Feedback fields
    /// start unset.
    pub fn new(
        prompt: impl Into<String>,
        response: impl Into<String>,
        latency: f64,
        model_version: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
            prompt: prompt.into(),
            response: response.into(),
            latency,
            model_version: model_version.into(),
            prompt_template: prompt_template.into(),
            user_feedback: None,
            hallucination: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Handle on the persisted interaction table.
///
/// Holds only the file path — every operation goes through the file, which is
/// the single source of truth. Callers that want an in-memory view cache the
/// result of [`read_all`](Self::read_all) themselves (see the dashboard).
#[derive(Debug, Clone)]
pub struct InteractionStore {
    path: PathBuf,
}

impl InteractionStore {
    /// Open the store at `path`, creating the file with just the header row
    /// (and any missing parent directories) if it does not exist yet.
    ///
    /// Bootstrap failures are reported to stderr and swallowed — a store over
    /// an unwritable path still works as an always-empty table.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self { path: path.into() };

        if !store.path.exists()
            && let Err(e) = store.write_table(&[])
        {
            eprintln!(
                "promptlens: failed to initialize log file {}: {e:#}",
                store.path.display()
            );
        }

        store
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record to the end of the table.
    ///
    /// The file is read in full, the row is added, and the table is rewritten.
    /// A crash mid-write can corrupt the file (accepted limitation). Failures
    /// are swallowed after a diagnostic — the caller observes no error.
    pub fn append(&self, record: InteractionRecord) {
        if let Err(e) = self.try_append(record) {
            eprintln!("promptlens: failed to log interaction: {e:#}");
        }
    }

    fn try_append(&self, record: InteractionRecord) -> Result<()> {
        let mut records = self.try_read_all().unwrap_or_default();
        records.push(record);
        self.write_table(&records)
    }

    /// Read the complete table in file order (chronological under normal use).
    ///
    /// Degrades to an empty table on any I/O or parse failure. A partially
    /// parsed table is never returned — it would silently skew every derived
    /// statistic.
    pub fn read_all(&self) -> Vec<InteractionRecord> {
        match self.try_read_all() {
            Ok(records) => records,
            Err(e) => {
                eprintln!(
                    "promptlens: failed to read log file {}: {e:#}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Like [`read_all`](Self::read_all), but surfaces the failure instead of
    /// degrading. Used by callers that keep their own cached view and prefer
    /// stale data over an empty table.
    pub fn try_read_all(&self) -> Result<Vec<InteractionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let mut reader = csv::Reader::from_reader(file);
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: InteractionRecord = row.context("malformed row in log file")?;
            records.push(record);
        }

        Ok(records)
    }

    /// Attach user feedback to the **last** row whose prompt, response, and
    /// latency all equal the given values (latency compared as a float).
    ///
    /// Earlier rows with an identical triple are left untouched. Zero matches
    /// is a silent no-op. Failures are swallowed after a diagnostic.
    pub fn update_by_match(
        &self,
        prompt: &str,
        response: &str,
        latency: f64,
        feedback: Feedback,
        hallucination: bool,
    ) {
        if let Err(e) = self.try_update_by_match(prompt, response, latency, feedback, hallucination)
        {
            eprintln!("promptlens: failed to record feedback: {e:#}");
        }
    }

    fn try_update_by_match(
        &self,
        prompt: &str,
        response: &str,
        latency: f64,
        feedback: Feedback,
        hallucination: bool,
    ) -> Result<()> {
        let mut records = self.try_read_all()?;

        let last_match = records
            .iter()
            .rposition(|r| r.prompt == prompt && r.response == response && r.latency == latency);

        let Some(idx) = last_match else {
            return Ok(());
        };

        records[idx].user_feedback = Some(feedback);
        records[idx].hallucination = hallucination;

        self.write_table(&records)
    }

    /// Rewrite the whole file: header row, then every record. No partial-write
    /// protection.
    fn write_table(&self, records: &[InteractionRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))?;

        // The header is written explicitly so an empty table still carries the
        // full column set; automatic headers only appear with the first row.
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(COLUMNS).context("failed to write header")?;
        for record in records {
            writer.serialize(record).context("failed to write row")?;
        }
        writer.flush().context("failed to flush log file")?;

        Ok(())
    }
}

/// Round a latency measurement to the 3 decimal places the table stores.
pub fn round_latency(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_store() -> (tempfile::TempDir, InteractionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = InteractionStore::open(dir.path().join("prompt-log.csv"));
        (dir, store)
    }

    #[test]
    fn open_creates_header_only_file() {
        let (_dir, store) = temp_store();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("timestamp,prompt,response,latency"));
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn append_then_read_preserves_fields() {
        let (_dir, store) = temp_store();
        let record = InteractionRecord::new("hello", "world", 0.125, "gpt2", "Default");
        store.append(record.clone());

        let rows = store.read_all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prompt, "hello");
        assert_eq!(rows[0].response, "world");
        assert_eq!(rows[0].latency, 0.125);
        assert_eq!(rows[0].model_version, "gpt2");
        assert_eq!(rows[0].user_feedback, None);
        assert!(!rows[0].hallucination);
    }

    #[test]
    fn fields_with_commas_and_newlines_round_trip() {
        let (_dir, store) = temp_store();
        let record = InteractionRecord::new(
            "first, second,\nthird",
            "a \"quoted\" reply,\nwith lines",
            1.5,
            "meta-llama/Meta-Llama-3-8B-Instruct",
            "Q&A, general",
        );
        store.append(record.clone());

        let rows = store.read_all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prompt, record.prompt);
        assert_eq!(rows[0].response, record.response);
        assert_eq!(rows[0].prompt_template, record.prompt_template);
    }

    #[test]
    fn read_all_of_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = InteractionStore {
            path: dir.path().join("never-created.csv"),
        };
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn read_all_of_garbage_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt-log.csv");
        fs::write(&path, "timestamp,prompt\nnot-a-number,x\n").unwrap();

        let store = InteractionStore { path };
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn update_by_match_sets_last_matching_row_only() {
        let (_dir, store) = temp_store();
        // Two identical triples plus one distinct row.
        store.append(InteractionRecord::new("p", "r", 0.5, "gpt2", "Default"));
        store.append(InteractionRecord::new("p", "r", 0.5, "gpt2", "Default"));
        store.append(InteractionRecord::new("other", "r", 0.5, "gpt2", "Default"));

        store.update_by_match("p", "r", 0.5, Feedback::Positive, true);

        let rows = store.read_all();
        assert_eq!(rows[0].user_feedback, None);
        assert_eq!(rows[1].user_feedback, Some(Feedback::Positive));
        assert!(rows[1].hallucination);
        assert_eq!(rows[2].user_feedback, None);
    }

    #[test]
    fn update_by_match_without_match_is_a_no_op() {
        let (_dir, store) = temp_store();
        store.append(InteractionRecord::new("p", "r", 0.5, "gpt2", "Default"));

        let before = store.read_all();
        store.update_by_match("p", "r", 0.501, Feedback::Negative, false);
        assert_eq!(store.read_all(), before);
    }

    #[test]
    fn feedback_marker_serializes_lowercase() {
        let (_dir, store) = temp_store();
        store.append(InteractionRecord::new("p", "r", 0.5, "gpt2", "Default"));
        store.update_by_match("p", "r", 0.5, Feedback::Negative, false);

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("negative"));
        assert!(!contents.contains("Negative"));
    }

    #[test]
    fn round_latency_keeps_three_decimals() {
        assert_eq!(round_latency(0.8334567), 0.833);
        assert_eq!(round_latency(1.2), 1.2);
        assert_eq!(round_latency(0.0), 0.0);
    }
}
