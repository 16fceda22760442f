use log::{debug, info, warn};

use copeland_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tally::config_reader::*;
use crate::tally::io_lines::*;

pub mod config_reader;
pub mod io_lines;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading directory {path}"))]
    ReadingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No ballot files were found"))]
    NoBallotFiles {},
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot register the names read from {path}"))]
    Registration { source: TallyError, path: String },
    #[snafu(display("File {path}: Copeland update failed"))]
    RejectedBallot { source: TallyError, path: String },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CliResult<T> = Result<T, CliError>;

/// Everything needed to run a count, once the command line and the configuration
/// file have been reconciled.
#[derive(PartialEq, Debug, Clone)]
pub struct TallySettings {
    pub contest_name: String,
    pub names_file: Option<PathBuf>,
    pub sources: Vec<PathBuf>,
    pub normalize_case: bool,
    pub skip_errors: bool,
    pub rules: ScoringRules,
    pub out: Option<String>,
    pub reference: Option<String>,
}

impl Default for TallySettings {
    fn default() -> Self {
        TallySettings {
            contest_name: "copeland".to_string(),
            names_file: None,
            sources: Vec::new(),
            normalize_case: true,
            skip_errors: false,
            rules: ScoringRules::DEFAULT_RULES,
            out: None,
            reference: None,
        }
    }
}

/// How many ballots were counted and rejected.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct BallotStats {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct OutputScoring {
    pub win: String,
    pub tie: String,
    pub loss: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct OutputConfig {
    pub contest: String,
    pub alternatives: Vec<String>,
    pub ballots: usize,
    pub rejected: usize,
    pub scoring: OutputScoring,
}

/// Reads the settings of a count from a configuration file.
///
/// Relative paths in the file are resolved from the directory of the file.
pub fn settings_from_config(config_path: &str) -> CliResult<TallySettings> {
    let config = read_config(config_path)?;
    info!("config: {:?}", config);
    let root_p = Path::new(config_path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let defaults = TallySettings::default();
    let scoring = config.scoring.unwrap_or_default();
    Ok(TallySettings {
        contest_name: config.contest_name.unwrap_or(defaults.contest_name),
        names_file: config.names_file.map(|p| root_p.join(p)),
        sources: config
            .ballot_sources
            .iter()
            .map(|p| root_p.join(p))
            .collect(),
        normalize_case: config.normalize_case.unwrap_or(defaults.normalize_case),
        skip_errors: config.skip_errors.unwrap_or(defaults.skip_errors),
        rules: ScoringRules {
            win: scoring.win.unwrap_or(defaults.rules.win),
            tie: scoring.tie.unwrap_or(defaults.rules.tie),
            loss: scoring.loss.unwrap_or(defaults.rules.loss),
        },
        out: None,
        reference: None,
    })
}

/// Combines the command line with the optional configuration file.
pub fn build_settings(args: &Args) -> CliResult<TallySettings> {
    let mut settings = match &args.config {
        Some(config_path) => settings_from_config(config_path)?,
        None => TallySettings::default(),
    };

    if !args.paths.is_empty() {
        settings.sources = args.paths.iter().map(PathBuf::from).collect();
    }
    if let Some(names) = &args.names {
        settings.names_file = Some(PathBuf::from(names));
    }
    if let Some(normalize_case) = args.normalize_case {
        settings.normalize_case = normalize_case;
    }
    if args.skip_errors {
        settings.skip_errors = true;
    }
    if let Some(win) = args.score_win {
        settings.rules.win = win;
    }
    if let Some(tie) = args.score_tie {
        settings.rules.tie = tie;
    }
    if let Some(loss) = args.score_loss {
        settings.rules.loss = loss;
    }
    settings.out = args.out.clone();
    settings.reference = args.reference.clone();

    if settings.sources.is_empty() {
        whatever!("No ballot files or directories were given")
    }
    debug!("build_settings: {:?}", settings);
    Ok(settings)
}

/// Registers the names of the vote, either from the names file or from the first ballot.
fn register(settings: &TallySettings, files: &[PathBuf]) -> CliResult<Copeland> {
    let names_path: PathBuf = match &settings.names_file {
        Some(p) => p.clone(),
        None => files.first().cloned().context(NoBallotFilesSnafu {})?,
    };
    let path = names_path.display().to_string();
    info!("Reading the names from {:?}", path);
    let mut names = read_ballot(&names_path, settings.normalize_case)?;
    names.sort();
    names.dedup();
    Copeland::new(names.as_slice()).context(RegistrationSnafu { path })
}

fn count_ballots(
    tally: &mut Copeland,
    files: &[PathBuf],
    settings: &TallySettings,
) -> CliResult<BallotStats> {
    let mut stats = BallotStats::default();
    for p in files {
        let path = p.display().to_string();
        let ballot = read_ballot(p, settings.normalize_case)?;
        debug!("count_ballots: {}: {:?}", path, ballot);
        match tally.update(ballot.as_slice()) {
            Ok(()) => stats.accepted += 1,
            Err(e) if settings.skip_errors => {
                warn!("file {:?}: Copeland update failed: {}", path, e);
                stats.rejected += 1;
            }
            Err(e) => return Err(e).context(RejectedBallotSnafu { path }),
        }
    }
    info!(
        "Counted {} ballots, rejected {}",
        stats.accepted, stats.rejected
    );
    Ok(stats)
}

fn ranks_to_json(ranks: &[Vec<ScoreEntry>]) -> Vec<JSValue> {
    ranks
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            let entries: Vec<JSValue> = group
                .iter()
                .map(|e| json!({"name": e.name, "score": e.score.to_string()}))
                .collect();
            json!({"rank": idx + 1, "entries": entries})
        })
        .collect()
}

fn build_summary_js(
    settings: &TallySettings,
    tally: &Copeland,
    stats: &BallotStats,
    ranks: &[Vec<ScoreEntry>],
) -> JSValue {
    let c = OutputConfig {
        contest: settings.contest_name.clone(),
        alternatives: tally.names().to_vec(),
        ballots: stats.accepted,
        rejected: stats.rejected,
        scoring: OutputScoring {
            win: settings.rules.win.to_string(),
            tie: settings.rules.tie.to_string(),
            loss: settings.rules.loss.to_string(),
        },
    };
    json!({
        "config": c,
        "results": ranks_to_json(ranks) })
}

fn print_ranks(ranks: &[Vec<ScoreEntry>]) {
    println!("Scores:");
    for (idx, group) in ranks.iter().enumerate() {
        println!("\tRank {}:", idx + 1);
        for entry in group {
            println!("\t\t{}\t{}", entry.score, entry.name);
        }
    }
}

pub fn run_tally(settings: &TallySettings) -> CliResult<()> {
    let files = collect_files(&settings.sources)?;
    info!("Found {} ballot files", files.len());

    let mut tally = register(settings, &files)?;
    println!("Registered names:");
    for name in tally.names() {
        println!("\t{}", name);
    }
    println!();

    let stats = count_ballots(&mut tally, &files, settings)?;

    let ranks = rank_by_score(&tally.score(&settings.rules));
    print_ranks(&ranks);

    let result_js = build_summary_js(settings, &tally, &stats, &ranks);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    match settings.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            info!("Writing the summary to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingSummarySnafu { path })?;
        }
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &settings.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_str(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
        info!("The summary matches the reference {:?}", summary_p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn test_dir() -> &'static str {
        option_env!("COPELAND_TEST_DIR").unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"))
    }

    fn test_settings(test_name: &str) -> TallySettings {
        let _ = env_logger::builder().is_test(true).try_init();
        let config_path = format!("{}/{}/{}_config.json", test_dir(), test_name, test_name);
        let mut settings = settings_from_config(&config_path).unwrap();
        settings.reference = Some(format!(
            "{}/{}/{}_expected_summary.json",
            test_dir(),
            test_name,
            test_name
        ));
        settings
    }

    fn test_wrapper(test_name: &str) {
        let settings = test_settings(test_name);
        if let Err(e) = run_tally(&settings) {
            panic!("test {}: an error occured: {} ({:?})", test_name, e, e);
        }
    }

    #[test]
    fn simple() {
        test_wrapper("simple");
    }

    #[test]
    fn skip_errors_cycle() {
        test_wrapper("skip_errors_cycle");
    }

    #[test]
    fn rejected_ballot_stops_the_count() {
        let mut settings = test_settings("skip_errors_cycle");
        settings.skip_errors = false;
        match run_tally(&settings) {
            Err(CliError::RejectedBallot { path, source }) => {
                assert!(path.ends_with("02.txt"), "{}", path);
                assert_eq!(
                    source.ballot_error(),
                    Some(&BallotError::DuplicateName {
                        name: "A".to_string(),
                        count: 2
                    })
                );
            }
            x => panic!("expected a rejected ballot, got {:?}", x),
        }
    }

    #[test]
    fn reference_mismatch() {
        let mut settings = test_settings("simple");
        settings.rules = ScoringRules {
            win: 2.0,
            tie: 1.0,
            loss: 0.0,
        };
        assert!(matches!(
            run_tally(&settings),
            Err(CliError::ReferenceMismatch {})
        ));
    }

    #[test]
    fn settings_from_simple_config() {
        let settings = test_settings("simple");
        let root = PathBuf::from(test_dir()).join("simple");
        assert_eq!(settings.contest_name, "simple");
        assert_eq!(settings.names_file, Some(root.join("names.txt")));
        assert_eq!(settings.sources, vec![root.join("ballots")]);
        assert!(settings.normalize_case);
        assert!(!settings.skip_errors);
        assert_eq!(settings.rules, ScoringRules::DEFAULT_RULES);
    }

    #[test]
    fn command_line_overrides_config() {
        let config = format!("{}/simple/simple_config.json", test_dir());
        let args = Args::parse_from([
            "copeland",
            "--config",
            config.as_str(),
            "--score-win",
            "3",
            "--normalize-case",
            "false",
            "--skip-errors",
            "other_ballots",
        ]);
        let settings = build_settings(&args).unwrap();
        assert_eq!(settings.sources, vec![PathBuf::from("other_ballots")]);
        assert_eq!(settings.rules.win, 3.0);
        assert_eq!(settings.rules.tie, 0.5);
        assert!(!settings.normalize_case);
        assert!(settings.skip_errors);
    }

    #[test]
    fn sources_are_required() {
        let err = Args::try_parse_from(["copeland", "--names", "names.txt"]).unwrap_err();
        assert_eq!(err.kind(), clap::ErrorKind::MissingRequiredArgument);

        // A configuration file may provide the sources instead.
        let config = format!("{}/no_sources/no_sources_config.json", test_dir());
        let args = Args::try_parse_from(["copeland", "--config", config.as_str()]).unwrap();
        assert!(matches!(
            build_settings(&args),
            Err(CliError::Whatever { .. })
        ));
        let config = format!("{}/simple/simple_config.json", test_dir());
        let args = Args::try_parse_from(["copeland", "--config", config.as_str()]).unwrap();
        let settings = build_settings(&args).unwrap();
        assert_eq!(settings.contest_name, "simple");
    }

    #[test]
    fn undecodable_ballot_is_skipped() {
        let mut settings = test_settings("encoding");
        settings.reference = None;
        match run_tally(&settings) {
            Err(CliError::RejectedBallot { path, source }) => {
                assert!(path.ends_with("02.txt"), "{}", path);
                assert_eq!(
                    source.ballot_error(),
                    Some(&BallotError::UnknownName {
                        name: "\u{FFFD}t\u{FFFD}".to_string()
                    })
                );
            }
            x => panic!("expected a rejected ballot, got {:?}", x),
        }
        settings.skip_errors = true;
        assert!(run_tally(&settings).is_ok());
    }

    #[test]
    fn summary_format() {
        let mut tally = Copeland::new(&["A", "B"]).unwrap();
        tally.update(&["B", "A"]).unwrap();
        let ranks = rank_by_score(&tally.score(&ScoringRules::DEFAULT_RULES));
        let stats = BallotStats {
            accepted: 1,
            rejected: 0,
        };
        let js = build_summary_js(&TallySettings::default(), &tally, &stats, &ranks);
        assert_eq!(
            js,
            json!({
                "config": {
                    "contest": "copeland",
                    "alternatives": ["A", "B"],
                    "ballots": 1,
                    "rejected": 0,
                    "scoring": {"win": "1", "tie": "0.5", "loss": "0"}
                },
                "results": [
                    {"rank": 1, "entries": [{"name": "B", "score": "1"}]},
                    {"rank": 2, "entries": [{"name": "A", "score": "0"}]}
                ]
            })
        );
    }
}
