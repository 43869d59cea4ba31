use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::SourceUnavailable;
use crate::stoplist::Stoplist;

pub type UserId = u64;
pub type ProblemId = u64;
pub type SubmissionId = u64;

pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    Other(String),
}

impl Verdict {
    /// Parses a judge result code. An empty code means judging has not
    /// finished and yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return None;
        }
        Some(match code.to_ascii_uppercase().as_str() {
            "AC" => Self::Accepted,
            "WA" => Self::WrongAnswer,
            other => Self::Other(other.to_string()),
        })
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Accepted => "AC",
            Self::WrongAnswer => "WA",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub problem_code: String,
    pub submitted_at: DateTime<Utc>,
    pub verdict: Verdict,
    pub source: Result<Vec<u8>, SourceUnavailable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    profiles: HashMap<UserId, UserProfile>,
}

impl UserDirectory {
    pub fn insert(&mut self, user_id: UserId, profile: UserProfile) {
        self.profiles.insert(user_id, profile);
    }

    pub fn get(&self, user_id: UserId) -> Option<&UserProfile> {
        self.profiles.get(&user_id)
    }

    /// Display name for `user_id`, falling back to the numeric id.
    pub fn username(&self, user_id: UserId) -> String {
        self.profiles
            .get(&user_id)
            .map(|p| p.username.as_str())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("user{user_id}"))
    }

    pub fn full_name(&self, user_id: UserId) -> &str {
        self.profiles
            .get(&user_id)
            .map(|p| p.full_name.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CopyKind {
    Exact,
    Structural,
}

impl CopyKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Exact => "Exact Copy",
            Self::Structural => "Form Copy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEdge {
    pub kind: CopyKind,
    pub problem_id: ProblemId,
    pub problem_code: String,
    pub copier_user_id: UserId,
    pub copier_submission_id: SubmissionId,
    pub copied_at: DateTime<Utc>,
    pub original_user_id: UserId,
    pub original_submission_id: SubmissionId,
    pub original_at: DateTime<Utc>,
    /// Hash of the normalized text (exact) or the fingerprint (structural)
    /// both submissions share.
    pub signature: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAggregate {
    pub user_id: UserId,
    pub attempted: BTreeSet<ProblemId>,
    pub accepted: BTreeSet<ProblemId>,
    pub wrong_answer: BTreeSet<ProblemId>,
    pub copied_exact: BTreeSet<ProblemId>,
    pub copied_form: BTreeSet<ProblemId>,
    pub valid_after_exact: BTreeSet<ProblemId>,
    pub valid_after_form: BTreeSet<ProblemId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankingPolicy {
    Unfiltered,
    Exact,
    Form,
}

impl RankingPolicy {
    pub const ALL: [RankingPolicy; 3] = [Self::Unfiltered, Self::Exact, Self::Form];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Unfiltered => "unfiltered",
            Self::Exact => "exact",
            Self::Form => "form",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    pub rank: usize,
    pub user_id: UserId,
    pub username: String,
    pub attempted: usize,
    pub accepted: usize,
    pub wrong_answer: usize,
    pub copied: usize,
    pub valid: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingTables {
    pub unfiltered: Vec<RankingRow>,
    pub exact: Vec<RankingRow>,
    pub form: Vec<RankingRow>,
}

impl RankingTables {
    pub fn get(&self, policy: RankingPolicy) -> &[RankingRow] {
        match policy {
            RankingPolicy::Unfiltered => &self.unfiltered,
            RankingPolicy::Exact => &self.exact,
            RankingPolicy::Form => &self.form,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub submission_id: SubmissionId,
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub reason: SourceUnavailable,
}

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub stoplist: Stoplist,
    /// Structural matches also require the same non-stoplist identifier set.
    pub compare_identifiers: bool,
    pub parallel: bool,
    pub progress_interval: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            stoplist: Stoplist::builtin(),
            compare_identifiers: true,
            parallel: true,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnalysisStats {
    pub records: u64,
    pub users: u64,
    pub problems: u64,
    pub problems_compared: u64,
    pub sources_analyzed: u64,
    pub sources_skipped: u64,
    pub lossy_decodes: u64,
    pub exact_edges: u64,
    pub structural_edges: u64,
    pub structural_suppressed: u64,
    pub unattributed_ties: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub users: Vec<UserAggregate>,
    pub copy_edges: Vec<CopyEdge>,
    pub rankings: RankingTables,
    pub skipped_sources: Vec<SkippedSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome<T> {
    pub result: T,
    pub stats: AnalysisStats,
}
