mod aggregate;
mod analysis;
mod detect;
mod error;
mod feed;
mod fingerprint;
mod normalize;
mod ranking;
mod stoplist;
mod types;
mod util;

pub use aggregate::CopyAggregator;

pub use analysis::{analyze_submissions, analyze_submissions_with_stats};

pub use detect::{
    ExactFindings, GroupedSubmission, ProblemFindings, ProblemGroup, StructuralFindings,
    detect_exact_copies, detect_problem, detect_structural_copies,
};

pub use error::{FeedError, SourceUnavailable, StoplistError};

pub use feed::{FeedOutcome, FeedStats, load_submissions_csv};

pub use fingerprint::{extract_identifiers, structure_fingerprint};

pub use normalize::{normalize_code, strip_comments};

pub use ranking::{rank_all, rank_users};

pub use stoplist::{Language, Stoplist};

pub use types::{
    AnalysisOptions, AnalysisOutcome, AnalysisReport, AnalysisStats, CopyEdge, CopyKind,
    DEFAULT_PROGRESS_INTERVAL, ProblemId, RankingPolicy, RankingRow, RankingTables,
    SkippedSource, SubmissionId, SubmissionRecord, UserAggregate, UserDirectory, UserId,
    UserProfile, Verdict,
};
