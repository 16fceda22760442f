use crate::tally::*;

use serde::Deserialize;
use serde_json::Value as JSValue;

#[derive(PartialEq, Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    pub win: Option<f64>,
    pub tie: Option<f64>,
    pub loss: Option<f64>,
}

/// The settings of a count, as written in a configuration file.
///
/// All the fields are optional.
#[derive(PartialEq, Debug, Clone, Default, Deserialize)]
pub struct TallyConfig {
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    #[serde(rename = "namesFile")]
    pub names_file: Option<String>,
    #[serde(rename = "ballotSources", default)]
    pub ballot_sources: Vec<String>,
    #[serde(rename = "normalizeCase")]
    pub normalize_case: Option<bool>,
    #[serde(rename = "skipErrors")]
    pub skip_errors: Option<bool>,
    pub scoring: Option<ScoringConfig>,
}

pub fn parse_config(contents: &str, path: &str) -> CliResult<TallyConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu { path })
}

pub fn read_config(path: &str) -> CliResult<TallyConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    parse_config(&contents, path)
}

pub fn read_summary(path: &str) -> CliResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("read_summary: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}
