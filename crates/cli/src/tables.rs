use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use dup_submission_check_core::{AnalysisReport, CopyEdge, RankingPolicy, RankingRow, UserDirectory};
use serde::Serialize;

pub(crate) const COPY_DETAILS_FILE: &str = "copy_details.csv";

#[derive(Debug, Serialize)]
struct RankingCsvRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Username")]
    username: &'a str,
    #[serde(rename = "Full Name")]
    full_name: &'a str,
    #[serde(rename = "Attempted")]
    attempted: usize,
    #[serde(rename = "AC")]
    accepted: usize,
    #[serde(rename = "WA")]
    wrong_answer: usize,
    #[serde(rename = "Copied")]
    copied: usize,
    #[serde(rename = "Valid AC")]
    valid: usize,
}

#[derive(Debug, Serialize)]
struct CopyDetailCsvRow<'a> {
    #[serde(rename = "No")]
    index: usize,
    #[serde(rename = "Copy Type")]
    kind: &'static str,
    #[serde(rename = "Problem")]
    problem_code: &'a str,
    #[serde(rename = "Copier Username")]
    copier_username: String,
    #[serde(rename = "Copier Full Name")]
    copier_full_name: &'a str,
    #[serde(rename = "Copier Submission")]
    copier_submission_id: u64,
    #[serde(rename = "Copied At")]
    copied_at: String,
    #[serde(rename = "Original Username")]
    original_username: String,
    #[serde(rename = "Original Full Name")]
    original_full_name: &'a str,
    #[serde(rename = "Original Submission")]
    original_submission_id: u64,
    #[serde(rename = "Original At")]
    original_at: String,
}

pub(crate) fn ranking_file_name(policy: RankingPolicy) -> String {
    format!("ranking_{}.csv", policy.slug())
}

fn write_ranking(path: &Path, rows: &[RankingRow], directory: &UserDirectory) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for row in rows {
        writer.serialize(RankingCsvRow {
            rank: row.rank,
            username: &row.username,
            full_name: directory.full_name(row.user_id),
            attempted: row.attempted,
            accepted: row.accepted,
            wrong_answer: row.wrong_answer,
            copied: row.copied,
            valid: row.valid,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn write_copy_details(
    path: &Path,
    edges: &[CopyEdge],
    directory: &UserDirectory,
) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for (idx, edge) in edges.iter().enumerate() {
        writer.serialize(CopyDetailCsvRow {
            index: idx + 1,
            kind: edge.kind.label(),
            problem_code: &edge.problem_code,
            copier_username: directory.username(edge.copier_user_id),
            copier_full_name: directory.full_name(edge.copier_user_id),
            copier_submission_id: edge.copier_submission_id,
            copied_at: edge.copied_at.to_rfc3339(),
            original_username: directory.username(edge.original_user_id),
            original_full_name: directory.full_name(edge.original_user_id),
            original_submission_id: edge.original_submission_id,
            original_at: edge.original_at.to_rfc3339(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the three ranking tables and the copy audit list into `out_dir`,
/// returning the paths written.
pub(crate) fn write_tables(
    out_dir: &Path,
    report: &AnalysisReport,
    directory: &UserDirectory,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(RankingPolicy::ALL.len() + 1);
    for policy in RankingPolicy::ALL {
        let path = out_dir.join(ranking_file_name(policy));
        write_ranking(&path, report.rankings.get(policy), directory)?;
        written.push(path);
    }

    let path = out_dir.join(COPY_DETAILS_FILE);
    write_copy_details(&path, &report.copy_edges, directory)?;
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use chrono::{TimeZone, Utc};
    use dup_submission_check_core::{
        AnalysisOptions, SubmissionRecord, UserProfile, Verdict, analyze_submissions,
    };

    use super::*;

    fn temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!("dup-submission-check-{suffix}-{nanos}"))
    }

    fn record(id: u64, user_id: u64, problem_id: u64, source: &str) -> SubmissionRecord {
        SubmissionRecord {
            id,
            user_id,
            problem_id,
            problem_code: format!("P{problem_id}"),
            submitted_at: Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap(),
            verdict: Verdict::Accepted,
            source: Ok(source.as_bytes().to_vec()),
        }
    }

    #[test]
    fn writes_every_table() {
        let mut directory = UserDirectory::default();
        directory.insert(
            1,
            UserProfile {
                username: "an".to_string(),
                full_name: "Le Van An".to_string(),
            },
        );
        directory.insert(
            2,
            UserProfile {
                username: "binh".to_string(),
                full_name: "Pham Binh".to_string(),
            },
        );
        let records = vec![
            record(1, 1, 1, "print(sum(map(int, input().split())))"),
            record(2, 2, 1, "print(sum(map(int, input().split())))"),
            record(3, 2, 2, "print(max(1, 2))"),
        ];
        let report = analyze_submissions(records, &directory, &AnalysisOptions::default());

        let out = temp_dir("tables");
        let written = write_tables(&out, &report, &directory).unwrap();
        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "ranking_unfiltered.csv",
                "ranking_exact.csv",
                "ranking_form.csv",
                "copy_details.csv"
            ]
        );

        let exact = fs::read_to_string(out.join("ranking_exact.csv")).unwrap();
        let lines: Vec<&str> = exact.lines().collect();
        assert_eq!(
            lines,
            [
                "Rank,Username,Full Name,Attempted,AC,WA,Copied,Valid AC",
                "1,an,Le Van An,1,1,0,0,1",
                "2,binh,Pham Binh,2,2,0,1,1",
            ]
        );

        let details = fs::read_to_string(out.join(COPY_DETAILS_FILE)).unwrap();
        let lines: Vec<&str> = details.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("1,Exact Copy,P1,binh,Pham Binh,2,"));
        assert!(lines[1].contains(",an,Le Van An,1,"));

        fs::remove_dir_all(&out).unwrap();
    }
}
