use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;

use crate::aggregate::CopyAggregator;
use crate::detect::{GroupedSubmission, ProblemFindings, ProblemGroup, detect_problem};
use crate::ranking::rank_all;
use crate::types::{
    AnalysisOptions, AnalysisOutcome, AnalysisReport, AnalysisStats, ProblemId, SkippedSource,
    SubmissionRecord, UserDirectory,
};
use crate::util::decode_source;

pub fn analyze_submissions<I>(
    records: I,
    directory: &UserDirectory,
    options: &AnalysisOptions,
) -> AnalysisReport
where
    I: IntoIterator<Item = SubmissionRecord>,
{
    analyze_submissions_with_stats(records, directory, options).result
}

/// Runs the whole batch: tallies every record, groups readable sources by
/// problem, runs both detectors per problem, then aggregates and ranks.
pub fn analyze_submissions_with_stats<I>(
    records: I,
    directory: &UserDirectory,
    options: &AnalysisOptions,
) -> AnalysisOutcome<AnalysisReport>
where
    I: IntoIterator<Item = SubmissionRecord>,
{
    let mut stats = AnalysisStats::default();
    let mut aggregator = CopyAggregator::new();
    let mut skipped_sources = Vec::new();
    let mut problems: HashSet<ProblemId> = HashSet::new();
    let mut grouped: BTreeMap<ProblemId, (String, Vec<GroupedSubmission>)> = BTreeMap::new();

    tracing::info!("collecting submissions");
    for record in records {
        stats.records = stats.records.saturating_add(1);
        if options.progress_interval > 0 && stats.records % options.progress_interval as u64 == 0
        {
            tracing::info!(processed = stats.records, "collecting submissions");
        }

        aggregator.record_attempt(&record);
        problems.insert(record.problem_id);

        let SubmissionRecord {
            id,
            user_id,
            problem_id,
            problem_code,
            submitted_at,
            source,
            ..
        } = record;

        let bytes = match source {
            Ok(bytes) => bytes,
            Err(reason) => {
                tracing::warn!(
                    submission = id,
                    user = user_id,
                    problem = problem_id,
                    %reason,
                    "skipping submission without readable source"
                );
                stats.sources_skipped = stats.sources_skipped.saturating_add(1);
                skipped_sources.push(SkippedSource {
                    submission_id: id,
                    user_id,
                    problem_id,
                    reason,
                });
                continue;
            }
        };

        let (text, lossy) = decode_source(bytes);
        if lossy {
            stats.lossy_decodes = stats.lossy_decodes.saturating_add(1);
        }
        stats.sources_analyzed = stats.sources_analyzed.saturating_add(1);

        grouped
            .entry(problem_id)
            .or_insert_with(|| (problem_code, Vec::new()))
            .1
            .push(GroupedSubmission {
                submission_id: id,
                user_id,
                submitted_at,
                text,
            });
    }

    let groups: Vec<ProblemGroup> = grouped
        .into_iter()
        .map(|(problem_id, (problem_code, submissions))| {
            ProblemGroup::new(problem_id, problem_code, submissions)
        })
        .collect();
    stats.problems = problems.len() as u64;
    stats.problems_compared = groups.iter().filter(|g| g.is_comparable()).count() as u64;

    tracing::info!(
        problems = stats.problems_compared,
        parallel = options.parallel,
        "detecting copies"
    );
    let findings: Vec<ProblemFindings> = if options.parallel {
        groups
            .par_iter()
            .map(|group| detect_problem(group, options))
            .collect()
    } else {
        groups
            .iter()
            .map(|group| detect_problem(group, options))
            .collect()
    };

    for problem in findings {
        stats.exact_edges = stats
            .exact_edges
            .saturating_add(problem.exact.len() as u64);
        stats.structural_edges = stats
            .structural_edges
            .saturating_add(problem.structural.edges.len() as u64);
        stats.structural_suppressed = stats
            .structural_suppressed
            .saturating_add(problem.structural.suppressed.len() as u64);
        stats.unattributed_ties = stats
            .unattributed_ties
            .saturating_add(problem.unattributed_ties);
        aggregator.absorb(problem);
    }

    let (users, copy_edges) = aggregator.finish();
    stats.users = users.len() as u64;
    let rankings = rank_all(&users, directory);

    tracing::info!(
        users = stats.users,
        copy_cases = copy_edges.len(),
        skipped_sources = stats.sources_skipped,
        "analysis finished"
    );

    AnalysisOutcome {
        result: AnalysisReport {
            users,
            copy_edges,
            rankings,
            skipped_sources,
        },
        stats,
    }
}
