use chrono::{Datelike, NaiveDate};
use snafu::Snafu;

/// The election itself, with the figures reported in the meta block.
///
/// The figures are independent inputs: they are not checked against the
/// vote counts of the polling stations.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    /// Election day. Only its year ends up in the rendered file.
    pub date: NaiveDate,
    /// May be unknown while results are still coming in.
    pub eligible_voters: Option<u64>,
    /// May be unknown while results are still coming in.
    pub ballots: Option<u64>,
    pub postal_ballots: u64,
    pub invalid_ballots: u64,
}

impl Election {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// A polling station and the votes counted there.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PollingStation {
    /// Identifier used by the website, for instance `klein-boden`.
    pub key: String,
    /// Display label, for instance `Klein Boden`.
    pub name: String,
    /// Candidate key to number of votes, in display order.
    pub votes: Vec<(String, u64)>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub key: String,
    pub family_name: String,
    pub given_name: String,
    /// Key of the party or group, `None` for independent candidates.
    pub party: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Party {
    pub key: String,
    pub seats: u64,
}

/// A complete snapshot of the results of one election.
///
/// The order of the polling stations, candidates and parties is the order
/// used on the website.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub election: Election,
    pub polling_stations: Vec<PollingStation>,
    pub candidates: Vec<Candidate>,
    pub parties: Vec<Party>,
}

// ******** Errors *********

/// Errors that abort rendering. No partial output is produced.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RenderError {
    #[snafu(display(
        "polling station '{station}' has votes for '{candidate}', which is not a registered candidate"
    ))]
    UnknownCandidate { station: String, candidate: String },

    #[snafu(display("unknown polling station '{station}'"))]
    UnknownPollingStation { station: String },

    #[snafu(display("duplicate key '{key}' in {path}"))]
    DuplicateKey { path: String, key: String },

    #[snafu(display("cannot format {found} as {kind} literal"))]
    Format { kind: String, found: String },

    #[snafu(display("malformed mapping at {path}: {message}"))]
    Serialization { path: String, message: String },
}

pub type RenderResult<T> = Result<T, RenderError>;
