use std::path::PathBuf;

use clap::Parser;
use dup_submission_check_core::{AnalysisOptions, Language, Stoplist, StoplistError};

#[derive(Debug, Clone, Parser)]
#[command(name = "dup-submission-check")]
#[command(
    about = "Detects copied judge submissions and writes copy-adjusted rankings",
    long_about = None,
    version
)]
pub(crate) struct Cli {
    /// Submissions export (CSV with one row per judged submission)
    #[arg(long, value_name = "CSV")]
    pub(crate) submissions: PathBuf,

    /// Output directory for CSV tables, or output file with --json
    #[arg(short, long, default_value = "ranking_report")]
    pub(crate) output: PathBuf,

    /// Write the whole report as one JSON document
    #[arg(long)]
    pub(crate) json: bool,

    /// Extra stoplist file, one word per line (repeatable)
    #[arg(long = "stoplist", value_name = "FILE")]
    pub(crate) stoplists: Vec<PathBuf>,

    /// Restrict the built-in stoplist to these languages (repeatable)
    #[arg(long = "language", value_name = "LANG", conflicts_with = "no_builtin_stoplist")]
    pub(crate) languages: Vec<String>,

    /// Start from an empty stoplist instead of the built-in keywords
    #[arg(long)]
    pub(crate) no_builtin_stoplist: bool,

    /// Match form copies on the code skeleton alone, ignoring identifier names
    #[arg(long)]
    pub(crate) fingerprint_only: bool,

    /// Compare problems one at a time instead of on the thread pool
    #[arg(long)]
    pub(crate) sequential: bool,

    /// Print run statistics to stderr
    #[arg(long)]
    pub(crate) stats: bool,

    /// Exit non-zero if any submission source could not be read
    #[arg(long)]
    pub(crate) strict: bool,
}

impl Cli {
    pub(crate) fn stoplist(&self) -> Result<Stoplist, StoplistError> {
        let mut stoplist = if self.no_builtin_stoplist {
            Stoplist::empty()
        } else if self.languages.is_empty() {
            Stoplist::builtin()
        } else {
            let languages = self
                .languages
                .iter()
                .map(|raw| Language::parse(raw))
                .collect::<Result<Vec<_>, _>>()?;
            Stoplist::for_languages(&languages)
        };

        for path in &self.stoplists {
            stoplist.merge(Stoplist::load(path)?);
        }
        Ok(stoplist)
    }

    pub(crate) fn analysis_options(&self) -> Result<AnalysisOptions, StoplistError> {
        Ok(AnalysisOptions {
            stoplist: self.stoplist()?,
            compare_identifiers: !self.fingerprint_only,
            parallel: !self.sequential,
            ..AnalysisOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dup-submission-check").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--submissions", "subs.csv"]).unwrap();
        assert_eq!(cli.submissions, PathBuf::from("subs.csv"));
        assert_eq!(cli.output, PathBuf::from("ranking_report"));
        assert!(!cli.json && !cli.stats && !cli.strict);

        let options = cli.analysis_options().unwrap();
        assert!(options.parallel);
        assert!(options.compare_identifiers);
        assert_eq!(options.stoplist, Stoplist::builtin());
    }

    #[test]
    fn submissions_is_required() {
        let err = parse(&["--json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--submissions",
            "subs.csv",
            "-o",
            "out.json",
            "--json",
            "--sequential",
            "--fingerprint-only",
            "--no-builtin-stoplist",
        ])
        .unwrap();
        assert_eq!(cli.output, PathBuf::from("out.json"));
        assert!(cli.json);

        let options = cli.analysis_options().unwrap();
        assert!(!options.parallel);
        assert!(!options.compare_identifiers);
        assert!(options.stoplist.is_empty());
    }

    #[test]
    fn languages_narrow_the_builtin_stoplist() {
        let cli = parse(&["--submissions", "s.csv", "--language", "py", "--language", "java"])
            .unwrap();
        let stoplist = cli.stoplist().unwrap();
        assert!(stoplist.contains("elif"));
        assert!(stoplist.contains("println"));
        assert!(!stoplist.contains("cout"));
    }

    #[test]
    fn unknown_language_is_rejected() {
        let cli = parse(&["--submissions", "s.csv", "--language", "cobol"]).unwrap();
        assert!(matches!(
            cli.stoplist(),
            Err(StoplistError::UnknownLanguage(lang)) if lang == "cobol"
        ));
    }

    #[test]
    fn language_conflicts_with_empty_stoplist() {
        let err = parse(&[
            "--submissions",
            "s.csv",
            "--language",
            "c",
            "--no-builtin-stoplist",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn stoplist_files_extend_the_builtin_set() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("dup-submission-check-stoplist-{nanos}.txt"));
        fs::write(&path, "read_int\n# helpers\nfast_io\n").unwrap();

        let cli = parse(&[
            "--submissions",
            "s.csv",
            "--stoplist",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let stoplist = cli.stoplist().unwrap();
        assert!(stoplist.contains("read_int"));
        assert!(stoplist.contains("fast_io"));
        assert!(stoplist.contains("while"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_stoplist_file_is_an_error() {
        let cli = parse(&["--submissions", "s.csv", "--stoplist", "/nonexistent/stop.txt"]).unwrap();
        assert!(matches!(cli.stoplist(), Err(StoplistError::Read { .. })));
    }
}
