use std::collections::{BTreeSet, HashMap, HashSet};

use crate::fingerprint::{extract_identifiers, structure_fingerprint};
use crate::types::{AnalysisOptions, CopyEdge, CopyKind, SubmissionId};
use crate::util::fnv1a64;

use super::{Origin, ProblemGroup, Resolution, make_edge, resolve};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StructuralKey {
    fingerprint: String,
    identifiers: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralFindings {
    /// Matches reported in the audit list.
    pub edges: Vec<CopyEdge>,
    /// Matches on submissions that already carry an exact edge. They still
    /// flag the problem as form-copied but are not reported again.
    pub suppressed: Vec<CopyEdge>,
    pub unattributed_ties: u64,
}

impl StructuralFindings {
    pub fn matches(&self) -> impl Iterator<Item = &CopyEdge> {
        self.edges.iter().chain(self.suppressed.iter())
    }
}

pub fn detect_structural_copies(
    group: &ProblemGroup,
    options: &AnalysisOptions,
    exact_edges: &[CopyEdge],
) -> StructuralFindings {
    let exact_copiers: HashSet<SubmissionId> =
        exact_edges.iter().map(|e| e.copier_submission_id).collect();

    let mut seen: HashMap<StructuralKey, Origin> = HashMap::new();
    let mut findings = StructuralFindings::default();

    for submission in group.submissions() {
        let key = StructuralKey {
            fingerprint: structure_fingerprint(&submission.text),
            identifiers: if options.compare_identifiers {
                extract_identifiers(&submission.text, &options.stoplist)
            } else {
                BTreeSet::new()
            },
        };

        let Some(origin) = seen.get(&key) else {
            seen.insert(key, Origin::of(submission));
            continue;
        };

        match resolve(origin, submission) {
            Resolution::SameUser => {}
            Resolution::Tie => {
                findings.unattributed_ties = findings.unattributed_ties.saturating_add(1);
            }
            Resolution::Copy => {
                let signature = fnv1a64(key.fingerprint.as_bytes());
                let edge = make_edge(CopyKind::Structural, group, origin, submission, signature);
                if exact_copiers.contains(&submission.submission_id) {
                    findings.suppressed.push(edge);
                } else {
                    findings.edges.push(edge);
                }
            }
        }
    }

    findings
}
