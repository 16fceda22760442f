/*!
Copeland tally of ranked ballots.

Every ballot is a strict ranking of all the registered alternatives. The engine
accumulates, for every ordered pair of alternatives, the number of ballots that
ranked the first above the second. Scores are then derived from the
head-to-head records: each alternative collects points for every opponent it
beats, ties or loses to, according to [ScoringRules].

```
use copeland_tally::{rank_by_score, Copeland, ScoringRules};
# use copeland_tally::TallyError;

let mut tally = Copeland::new(&["Clara", "Anna", "Bob"])?;
tally.update(&["Anna", "Bob", "Clara"])?;
tally.update(&["Bob", "Anna", "Clara"])?;
tally.update(&["Anna", "Clara", "Bob"])?;

let ranks = rank_by_score(&tally.score(&ScoringRules::DEFAULT_RULES));
assert_eq!(ranks[0][0].name, "Anna");
assert_eq!(ranks[0][0].score, 2.0);
# Ok::<(), TallyError>(())
```

The engine holds no locks. Callers sharing it between threads must guard it
themselves.
*/
mod config;
pub mod manual;
mod matrix;

use log::debug;
use std::cmp::Ordering;

pub use crate::config::*;
pub use crate::matrix::PairwiseMatrix;

/// The tally state: the registered alternatives and their head-to-head counts.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Copeland {
    // Sorted and without duplicates. The index of a name is its position in the matrix.
    names: Vec<String>,
    state: PairwiseMatrix,
}

impl Copeland {
    /// Registers the alternatives of the election.
    ///
    /// The names are sorted and deduplicated. Names are compared exactly: any
    /// normalization (case, whitespace) must be applied beforehand.
    /// At least two distinct names are required.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Copeland, TallyError> {
        let mut sorted: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        sorted.sort();
        sorted.dedup();
        if sorted.len() < 2 {
            return Err(TallyError::InsufficientAlternatives {
                found: sorted.len(),
            });
        }
        debug!("Registered {} alternatives", sorted.len());
        for (idx, name) in sorted.iter().enumerate() {
            debug!("Alternative: {}: {}", idx, name);
        }
        let size = sorted.len();
        Ok(Copeland {
            names: sorted,
            state: PairwiseMatrix::new(size),
        })
    }

    /// The registered alternatives, in sorted order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The number of ballots that ranked `runner` above `opponent`.
    ///
    /// Returns None if one of the names is not registered.
    pub fn head_to_head(&self, runner: &str, opponent: &str) -> Option<u64> {
        let i = self.position(runner)?;
        let j = self.position(opponent)?;
        if i == j {
            return Some(0);
        }
        Some(self.state.get(i, j))
    }

    /// Adds a ballot to the tally.
    ///
    /// The ballot lists every registered alternative exactly once, from the
    /// most preferred to the least preferred. The ballot is checked completely
    /// before being counted: if it is rejected, the tally does not change.
    pub fn update<S: AsRef<str>>(&mut self, ballot: &[S]) -> Result<(), TallyError> {
        let contribution = self.ballot_to_matrix(ballot).map_err(TallyError::StateUpdate)?;
        self.state += &contribution;
        Ok(())
    }

    /// Computes the score of every alternative, in the order of [Copeland::names].
    ///
    /// This does not change the tally and can be called at any time.
    pub fn score(&self, rules: &ScoringRules) -> Vec<ScoreEntry> {
        let size = self.state.size();
        let mut res: Vec<ScoreEntry> = Vec::with_capacity(size);
        for (i, name) in self.names.iter().enumerate() {
            let mut score = 0.0;
            for j in (0..size).filter(|j| *j != i) {
                let runner = self.state.get(i, j);
                let opponent = self.state.get(j, i);
                score += match runner.cmp(&opponent) {
                    Ordering::Greater => rules.win,
                    Ordering::Less => rules.loss,
                    Ordering::Equal => rules.tie,
                };
            }
            res.push(ScoreEntry {
                name: name.clone(),
                score,
            });
        }
        debug!("score: rules: {:?} scores: {:?}", rules, res);
        res
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }

    // Checks the ballot and turns it into the matrix of its pairwise preferences.
    fn ballot_to_matrix<S: AsRef<str>>(&self, ballot: &[S]) -> Result<PairwiseMatrix, BallotError> {
        let size = self.names.len();
        if ballot.len() != size {
            return Err(BallotError::IncorrectLength {
                expected: size,
                actual: ballot.len(),
            });
        }

        let mut positions: Vec<usize> = Vec::with_capacity(size);
        let mut counts: Vec<usize> = vec![0; size];
        for name in ballot.iter().map(|s| s.as_ref()) {
            let pos = self
                .position(name)
                .ok_or_else(|| BallotError::UnknownName {
                    name: name.to_string(),
                })?;
            positions.push(pos);
            counts[pos] += 1;
        }

        // Reported in the order of the registered names.
        for (name, count) in self.names.iter().zip(counts.iter()) {
            match *count {
                0 => {
                    return Err(BallotError::MissingName { name: name.clone() });
                }
                1 => {}
                count => {
                    return Err(BallotError::DuplicateName {
                        name: name.clone(),
                        count,
                    });
                }
            }
        }

        let mut m = PairwiseMatrix::new(size);
        for (rank, winner) in positions.iter().enumerate() {
            for loser in positions[rank + 1..].iter() {
                m.increment(*winner, *loser);
            }
        }
        Ok(m)
    }
}

/// Orders the scores from the highest to the lowest, grouping equal scores together.
///
/// Within a group, and between equal scores in general, entries are sorted by
/// name. Scores are grouped only when exactly equal: no tolerance is applied
/// to fractional scores.
pub fn rank_by_score(scores: &[ScoreEntry]) -> Vec<Vec<ScoreEntry>> {
    let mut sorted: Vec<ScoreEntry> = scores.to_vec();
    sorted.sort_by(|a, b| compare_scores(b.score, a.score).then_with(|| a.name.cmp(&b.name)));
    sorted
        .chunk_by(|a, b| a.score == b.score)
        .map(|group| group.to_vec())
        .collect()
}

// NaN is below every number and equal to itself, so that the order stays total.
// Other values compare numerically (-0.0 equals 0.0).
fn compare_scores(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}
