mod exact;
mod structural;


use chrono::{DateTime, Utc};

use crate::types::{AnalysisOptions, CopyEdge, CopyKind, ProblemId, SubmissionId, UserId};

pub use exact::{ExactFindings, detect_exact_copies};
pub use structural::{StructuralFindings, detect_structural_copies};

/// A readable submission, decoded and ready for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedSubmission {
    pub submission_id: SubmissionId,
    pub user_id: UserId,
    pub submitted_at: DateTime<Utc>,
    pub text: String,
}

/// Every readable submission to one problem, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemGroup {
    pub problem_id: ProblemId,
    pub problem_code: String,
    submissions: Vec<GroupedSubmission>,
}

impl ProblemGroup {
    pub fn new(
        problem_id: ProblemId,
        problem_code: impl Into<String>,
        mut submissions: Vec<GroupedSubmission>,
    ) -> Self {
        submissions.sort_by_key(|s| (s.submitted_at, s.submission_id));
        Self {
            problem_id,
            problem_code: problem_code.into(),
            submissions,
        }
    }

    pub fn submissions(&self) -> &[GroupedSubmission] {
        &self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Fewer than two submissions leaves nothing to compare.
    pub fn is_comparable(&self) -> bool {
        self.submissions.len() >= 2
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Origin {
    pub(crate) user_id: UserId,
    pub(crate) submission_id: SubmissionId,
    pub(crate) submitted_at: DateTime<Utc>,
}

impl Origin {
    pub(crate) fn of(submission: &GroupedSubmission) -> Self {
        Self {
            user_id: submission.user_id,
            submission_id: submission.submission_id,
            submitted_at: submission.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    SameUser,
    /// Same instant as the first-seen holder; neither came first.
    Tie,
    Copy,
}

pub(crate) fn resolve(origin: &Origin, submission: &GroupedSubmission) -> Resolution {
    if origin.user_id == submission.user_id {
        Resolution::SameUser
    } else if origin.submitted_at >= submission.submitted_at {
        Resolution::Tie
    } else {
        Resolution::Copy
    }
}

pub(crate) fn make_edge(
    kind: CopyKind,
    group: &ProblemGroup,
    origin: &Origin,
    copier: &GroupedSubmission,
    signature: u64,
) -> CopyEdge {
    CopyEdge {
        kind,
        problem_id: group.problem_id,
        problem_code: group.problem_code.clone(),
        copier_user_id: copier.user_id,
        copier_submission_id: copier.submission_id,
        copied_at: copier.submitted_at,
        original_user_id: origin.user_id,
        original_submission_id: origin.submission_id,
        original_at: origin.submitted_at,
        signature,
    }
}

/// Both detectors' results for one problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFindings {
    pub exact: Vec<CopyEdge>,
    pub structural: StructuralFindings,
    pub unattributed_ties: u64,
}

pub fn detect_problem(group: &ProblemGroup, options: &AnalysisOptions) -> ProblemFindings {
    if !group.is_comparable() {
        return ProblemFindings::default();
    }

    let exact = detect_exact_copies(group);
    let structural = detect_structural_copies(group, options, &exact.edges);
    tracing::debug!(
        problem = %group.problem_code,
        submissions = group.len(),
        exact = exact.edges.len(),
        structural = structural.edges.len(),
        suppressed = structural.suppressed.len(),
        "compared problem"
    );

    ProblemFindings {
        unattributed_ties: exact.unattributed_ties + structural.unattributed_ties,
        exact: exact.edges,
        structural,
    }
}
