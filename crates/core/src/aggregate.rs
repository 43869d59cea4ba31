use std::collections::BTreeMap;

use crate::detect::ProblemFindings;
use crate::types::{CopyEdge, CopyKind, SubmissionRecord, UserAggregate, UserId, Verdict};

/// Single owner of the per-user accumulators for one analysis run.
#[derive(Debug, Default)]
pub struct CopyAggregator {
    users: BTreeMap<UserId, UserAggregate>,
    edges: Vec<CopyEdge>,
}

impl CopyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies a judged submission, readable source or not.
    pub fn record_attempt(&mut self, record: &SubmissionRecord) {
        let user = self.user_mut(record.user_id);
        user.attempted.insert(record.problem_id);
        match record.verdict {
            Verdict::Accepted => {
                user.accepted.insert(record.problem_id);
            }
            Verdict::WrongAnswer => {
                user.wrong_answer.insert(record.problem_id);
            }
            Verdict::Other(_) => {}
        }
    }

    pub fn absorb(&mut self, findings: ProblemFindings) {
        for edge in &findings.exact {
            self.user_mut(edge.copier_user_id)
                .copied_exact
                .insert(edge.problem_id);
        }
        for edge in findings.structural.matches() {
            self.user_mut(edge.copier_user_id)
                .copied_form
                .insert(edge.problem_id);
        }
        self.edges.extend(findings.exact);
        self.edges.extend(findings.structural.edges);
    }

    /// Derives the valid-AC sets and returns users ordered by id together
    /// with the audit list ordered by copy time.
    pub fn finish(self) -> (Vec<UserAggregate>, Vec<CopyEdge>) {
        let users = self
            .users
            .into_values()
            .map(|mut user| {
                user.valid_after_exact = user
                    .accepted
                    .difference(&user.copied_exact)
                    .copied()
                    .collect();
                user.valid_after_form = user
                    .accepted
                    .difference(&user.copied_form)
                    .copied()
                    .collect();
                user
            })
            .collect();

        let mut edges = self.edges;
        edges.sort_by(|a, b| {
            (a.copied_at, a.copier_submission_id, a.kind).cmp(&(
                b.copied_at,
                b.copier_submission_id,
                b.kind,
            ))
        });
        (users, edges)
    }

    fn user_mut(&mut self, user_id: UserId) -> &mut UserAggregate {
        self.users.entry(user_id).or_insert_with(|| UserAggregate {
            user_id,
            ..UserAggregate::default()
        })
    }
}
