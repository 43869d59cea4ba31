use dup_submission_check_core::{AnalysisReport, AnalysisStats, FeedStats, UserDirectory};

pub(crate) fn has_skipped_sources(stats: &AnalysisStats) -> bool {
    stats.sources_skipped > 0
}

pub(crate) fn format_stats(feed: &FeedStats, stats: &AnalysisStats) -> String {
    let mut out = String::new();
    out.push_str("== run stats ==\n");
    out.push_str(&format!(
        "rows={} records={} users={} problems={} compared={}\n",
        feed.rows, stats.records, stats.users, stats.problems, stats.problems_compared
    ));
    out.push_str(&format!(
        "analyzed={} exact={} form={} form_suppressed={}\n",
        stats.sources_analyzed,
        stats.exact_edges,
        stats.structural_edges,
        stats.structural_suppressed
    ));

    let mut notes: Vec<(&str, u64)> = vec![
        ("unjudged", feed.skipped_unjudged),
        ("unreadable_source", stats.sources_skipped),
        ("lossy_decode", stats.lossy_decodes),
        ("unattributed_tie", stats.unattributed_ties),
    ];
    notes.retain(|(_, v)| *v > 0);
    if !notes.is_empty() {
        out.push_str("skipped or degraded:\n");
        for (k, v) in notes {
            out.push_str(&format!("- {k}={v}\n"));
        }
    }
    out.push('\n');
    out
}

pub(crate) fn format_skipped_sources(report: &AnalysisReport, directory: &UserDirectory) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "unreadable sources: {}\n",
        report.skipped_sources.len()
    ));
    for skipped in &report.skipped_sources {
        out.push_str(&format!(
            "- submission={} user={} problem={}: {}\n",
            skipped.submission_id,
            directory.username(skipped.user_id),
            skipped.problem_id,
            skipped.reason
        ));
    }
    out
}
