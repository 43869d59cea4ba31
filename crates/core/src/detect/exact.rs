use std::collections::HashMap;

use crate::normalize::normalize_code;
use crate::types::{CopyEdge, CopyKind};
use crate::util::fnv1a64;

use super::{Origin, ProblemGroup, Resolution, make_edge, resolve};

#[derive(Debug)]
struct FirstSeen {
    sample: String,
    origin: Origin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactFindings {
    pub edges: Vec<CopyEdge>,
    pub unattributed_ties: u64,
}

/// First-seen-wins over normalized text. Buckets are keyed by hash and
/// length, and the stored sample is compared, so hash collisions never
/// produce an edge.
pub fn detect_exact_copies(group: &ProblemGroup) -> ExactFindings {
    let mut seen: HashMap<(u64, usize), Vec<FirstSeen>> = HashMap::new();
    let mut findings = ExactFindings::default();

    for submission in group.submissions() {
        let normalized = normalize_code(&submission.text);
        let content_hash = fnv1a64(normalized.as_bytes());
        let bucket = seen.entry((content_hash, normalized.len())).or_default();

        let Some(first) = bucket.iter().find(|f| f.sample == normalized) else {
            bucket.push(FirstSeen {
                sample: normalized,
                origin: Origin::of(submission),
            });
            continue;
        };

        match resolve(&first.origin, submission) {
            Resolution::SameUser => {}
            Resolution::Tie => {
                findings.unattributed_ties = findings.unattributed_ties.saturating_add(1);
            }
            Resolution::Copy => findings.edges.push(make_edge(
                CopyKind::Exact,
                group,
                &first.origin,
                submission,
                content_hash,
            )),
        }
    }

    findings
}
