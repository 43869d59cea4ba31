use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use dup_submission_check_core::{
    AnalysisReport, AnalysisStats, CopyEdge, FeedStats, RankingRow, SkippedSource, UserAggregate,
    UserDirectory,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonAnalysisStats {
    pub(crate) records: u64,
    pub(crate) users: u64,
    pub(crate) problems: u64,
    pub(crate) problems_compared: u64,
    pub(crate) sources_analyzed: u64,
    pub(crate) sources_skipped: u64,
    pub(crate) lossy_decodes: u64,
    pub(crate) exact_edges: u64,
    pub(crate) structural_edges: u64,
    pub(crate) structural_suppressed: u64,
    pub(crate) unattributed_ties: u64,
}

impl From<&AnalysisStats> for JsonAnalysisStats {
    fn from(stats: &AnalysisStats) -> Self {
        Self {
            records: stats.records,
            users: stats.users,
            problems: stats.problems,
            problems_compared: stats.problems_compared,
            sources_analyzed: stats.sources_analyzed,
            sources_skipped: stats.sources_skipped,
            lossy_decodes: stats.lossy_decodes,
            exact_edges: stats.exact_edges,
            structural_edges: stats.structural_edges,
            structural_suppressed: stats.structural_suppressed,
            unattributed_ties: stats.unattributed_ties,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonFeedStats {
    pub(crate) rows: u64,
    pub(crate) skipped_unjudged: u64,
    pub(crate) unreadable_sources: u64,
}

impl From<&FeedStats> for JsonFeedStats {
    fn from(stats: &FeedStats) -> Self {
        Self {
            rows: stats.rows,
            skipped_unjudged: stats.skipped_unjudged,
            unreadable_sources: stats.unreadable_sources,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonUser {
    pub(crate) user_id: u64,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) attempted: Vec<u64>,
    pub(crate) accepted: Vec<u64>,
    pub(crate) wrong_answer: Vec<u64>,
    pub(crate) copied_exact: Vec<u64>,
    pub(crate) copied_form: Vec<u64>,
    pub(crate) valid_after_exact: Vec<u64>,
    pub(crate) valid_after_form: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonCopyEdge {
    pub(crate) kind: &'static str,
    pub(crate) problem_id: u64,
    pub(crate) problem_code: String,
    pub(crate) copier_user_id: u64,
    pub(crate) copier_username: String,
    pub(crate) copier_submission_id: u64,
    pub(crate) copied_at: DateTime<Utc>,
    pub(crate) original_user_id: u64,
    pub(crate) original_username: String,
    pub(crate) original_submission_id: u64,
    pub(crate) original_at: DateTime<Utc>,
    pub(crate) signature: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonRankingRow {
    pub(crate) rank: usize,
    pub(crate) user_id: u64,
    pub(crate) username: String,
    pub(crate) attempted: usize,
    pub(crate) accepted: usize,
    pub(crate) wrong_answer: usize,
    pub(crate) copied: usize,
    pub(crate) valid: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonRankings {
    pub(crate) unfiltered: Vec<JsonRankingRow>,
    pub(crate) exact: Vec<JsonRankingRow>,
    pub(crate) form: Vec<JsonRankingRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonSkippedSource {
    pub(crate) submission_id: u64,
    pub(crate) user_id: u64,
    pub(crate) problem_id: u64,
    pub(crate) reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonReport {
    pub(crate) users: Vec<JsonUser>,
    pub(crate) copy_cases: Vec<JsonCopyEdge>,
    pub(crate) rankings: JsonRankings,
    pub(crate) skipped_sources: Vec<JsonSkippedSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stats: Option<JsonAnalysisStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) feed_stats: Option<JsonFeedStats>,
}

fn map_user(user: &UserAggregate, directory: &UserDirectory) -> JsonUser {
    JsonUser {
        user_id: user.user_id,
        username: directory.username(user.user_id),
        full_name: directory.full_name(user.user_id).to_string(),
        attempted: user.attempted.iter().copied().collect(),
        accepted: user.accepted.iter().copied().collect(),
        wrong_answer: user.wrong_answer.iter().copied().collect(),
        copied_exact: user.copied_exact.iter().copied().collect(),
        copied_form: user.copied_form.iter().copied().collect(),
        valid_after_exact: user.valid_after_exact.iter().copied().collect(),
        valid_after_form: user.valid_after_form.iter().copied().collect(),
    }
}

fn map_edge(edge: &CopyEdge, directory: &UserDirectory) -> JsonCopyEdge {
    JsonCopyEdge {
        kind: edge.kind.label(),
        problem_id: edge.problem_id,
        problem_code: edge.problem_code.clone(),
        copier_user_id: edge.copier_user_id,
        copier_username: directory.username(edge.copier_user_id),
        copier_submission_id: edge.copier_submission_id,
        copied_at: edge.copied_at,
        original_user_id: edge.original_user_id,
        original_username: directory.username(edge.original_user_id),
        original_submission_id: edge.original_submission_id,
        original_at: edge.original_at,
        signature: format!("{:016x}", edge.signature),
    }
}

fn map_rows(rows: &[RankingRow]) -> Vec<JsonRankingRow> {
    rows.iter()
        .map(|r| JsonRankingRow {
            rank: r.rank,
            user_id: r.user_id,
            username: r.username.clone(),
            attempted: r.attempted,
            accepted: r.accepted,
            wrong_answer: r.wrong_answer,
            copied: r.copied,
            valid: r.valid,
        })
        .collect()
}

fn map_skipped(skipped: &SkippedSource) -> JsonSkippedSource {
    JsonSkippedSource {
        submission_id: skipped.submission_id,
        user_id: skipped.user_id,
        problem_id: skipped.problem_id,
        reason: skipped.reason.to_string(),
    }
}

pub(crate) fn map_report(report: &AnalysisReport, directory: &UserDirectory) -> JsonReport {
    JsonReport {
        users: report
            .users
            .iter()
            .map(|u| map_user(u, directory))
            .collect(),
        copy_cases: report
            .copy_edges
            .iter()
            .map(|e| map_edge(e, directory))
            .collect(),
        rankings: JsonRankings {
            unfiltered: map_rows(&report.rankings.unfiltered),
            exact: map_rows(&report.rankings.exact),
            form: map_rows(&report.rankings.form),
        },
        skipped_sources: report.skipped_sources.iter().map(map_skipped).collect(),
        stats: None,
        feed_stats: None,
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::other(format!("json encode: {e}")))?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json + "\n")
}
