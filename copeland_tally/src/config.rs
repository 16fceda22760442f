// ******** Output data structures *********

use std::error::Error;
use std::fmt::Display;

/// The score of one alternative, as computed from the pairwise matrix.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoreEntry {
    pub name: String,
    pub score: f64,
}

/// Errors raised when a ballot does not describe a strict ranking of all the
/// registered alternatives.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotError {
    /// The ballot does not have one entry per alternative.
    IncorrectLength { expected: usize, actual: usize },
    /// The ballot mentions a name that was not registered.
    UnknownName { name: String },
    /// A registered alternative is absent from the ballot.
    MissingName { name: String },
    /// A registered alternative is ranked more than once.
    DuplicateName { name: String, count: usize },
}

impl BallotError {
    /// The alternative at fault, if the error is about a specific name.
    pub fn name(&self) -> Option<&str> {
        match self {
            BallotError::IncorrectLength { .. } => None,
            BallotError::UnknownName { name }
            | BallotError::MissingName { name }
            | BallotError::DuplicateName { name, .. } => Some(name.as_str()),
        }
    }
}

impl Error for BallotError {}

impl Display for BallotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotError::IncorrectLength { expected, actual } => write!(
                f,
                "incorrect number of items in ballot list: expected {}, got {}",
                expected, actual
            ),
            BallotError::UnknownName { name } => write!(f, "unknown name {:?} in ballot", name),
            BallotError::MissingName { name } => write!(f, "missing name {:?} in ballot", name),
            BallotError::DuplicateName { name, count } => {
                write!(f, "name {:?} appears {} times in ballot", name, count)
            }
        }
    }
}

/// Errors that prevent the engine from being built or from accepting a ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyError {
    /// Fewer than two distinct alternatives were registered.
    InsufficientAlternatives { found: usize },
    /// A ballot was rejected. The state of the engine did not change.
    StateUpdate(BallotError),
}

impl TallyError {
    /// The ballot problem behind a rejected update.
    pub fn ballot_error(&self) -> Option<&BallotError> {
        match self {
            TallyError::StateUpdate(e) => Some(e),
            TallyError::InsufficientAlternatives { .. } => None,
        }
    }
}

impl Error for TallyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TallyError::StateUpdate(e) => Some(e),
            TallyError::InsufficientAlternatives { .. } => None,
        }
    }
}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::InsufficientAlternatives { found } => write!(
                f,
                "not enough alternatives: at least 2 are required, found {}",
                found
            ),
            TallyError::StateUpdate(e) => write!(f, "state update failed: {}", e),
        }
    }
}

// ********* Configuration **********

/// Points granted to an alternative for each of its head-to-head records.
///
/// An alternative that beats an opponent on more ballots than it loses gets
/// `win`, the reverse gets `loss`, and an even record (including two
/// alternatives never compared) gets `tie`.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ScoringRules {
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
}

impl ScoringRules {
    pub const DEFAULT_RULES: ScoringRules = ScoringRules {
        win: 1.0,
        tie: 0.5,
        loss: 0.0,
    };
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules::DEFAULT_RULES
    }
}
