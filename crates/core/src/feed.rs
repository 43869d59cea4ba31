use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{FeedError, SourceUnavailable};
use crate::types::{
    ProblemId, SubmissionId, SubmissionRecord, UserDirectory, UserId, UserProfile, Verdict,
};

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: SubmissionId,
    user_id: UserId,
    username: String,
    #[serde(default)]
    full_name: String,
    problem_id: ProblemId,
    problem_code: String,
    submitted_at: DateTime<Utc>,
    #[serde(default)]
    verdict: String,
    #[serde(default)]
    source_path: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedStats {
    pub rows: u64,
    pub skipped_unjudged: u64,
    pub unreadable_sources: u64,
}

#[derive(Debug, Clone)]
pub struct FeedOutcome {
    pub records: Vec<SubmissionRecord>,
    pub directory: UserDirectory,
    pub stats: FeedStats,
}

/// Loads a submissions export. Source paths are resolved against the CSV
/// file's directory; a source that cannot be read is carried on the record
/// as `SourceUnavailable` rather than failing the load.
pub fn load_submissions_csv(path: &Path) -> Result<FeedOutcome, FeedError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| FeedError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut records = Vec::new();
    let mut directory = UserDirectory::default();
    let mut stats = FeedStats::default();

    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|source| FeedError::Row {
            path: path.to_path_buf(),
            line: source
                .position()
                .map(|pos| pos.line())
                .unwrap_or(idx as u64 + 2),
            source,
        })?;
        stats.rows = stats.rows.saturating_add(1);

        if directory.get(row.user_id).is_none() {
            directory.insert(
                row.user_id,
                UserProfile {
                    username: row.username.clone(),
                    full_name: row.full_name.clone(),
                },
            );
        }

        let Some(verdict) = Verdict::parse(&row.verdict) else {
            stats.skipped_unjudged = stats.skipped_unjudged.saturating_add(1);
            continue;
        };

        let source = read_source(base_dir, &row.source_path);
        if source.is_err() {
            stats.unreadable_sources = stats.unreadable_sources.saturating_add(1);
        }

        records.push(SubmissionRecord {
            id: row.id,
            user_id: row.user_id,
            problem_id: row.problem_id,
            problem_code: row.problem_code,
            submitted_at: row.submitted_at,
            verdict,
            source,
        });
    }

    tracing::info!(
        path = %path.display(),
        rows = stats.rows,
        records = records.len(),
        users = directory.len(),
        unjudged = stats.skipped_unjudged,
        "loaded submissions feed"
    );

    Ok(FeedOutcome {
        records,
        directory,
        stats,
    })
}

fn resolve_source_path(base_dir: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn read_source(base_dir: &Path, raw: &str) -> Result<Vec<u8>, SourceUnavailable> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SourceUnavailable::Missing);
    }
    Ok(fs::read(resolve_source_path(base_dir, raw))?)
}
