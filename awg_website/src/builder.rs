pub use crate::model::*;

use crate::literal::{identifier, LeafKind};
use snafu::prelude::*;

/// A builder for assembling the results of an election.
///
/// Keys are derived from the names the same way the website derives them.
///
/// ```
/// use awg_website::builder::Builder;
/// use awg_website::Election;
/// use chrono::NaiveDate;
///
/// let election = Election {
///     date: NaiveDate::from_ymd_opt(2018, 5, 6).unwrap(),
///     eligible_voters: Some(990),
///     ballots: Some(601),
///     postal_ballots: 0,
///     invalid_ballots: 3,
/// };
/// let mut builder = Builder::new(&election)
///     .candidate("Poppinga", "Jens", Some("CDU"))
///     .party("CDU", 5)
///     .polling_station("Klein Boden");
///
/// builder.add_votes("klein-boden", "poppinga-jens", 106)?;
///
/// let result = builder.build();
/// assert_eq!(result.polling_stations[0].votes, vec![("poppinga-jens".to_string(), 106)]);
/// # Ok::<(), awg_website::RenderError>(())
/// ```
pub struct Builder {
    pub(crate) _election: Election,
    pub(crate) _polling_stations: Vec<PollingStation>,
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _parties: Vec<Party>,
}

impl Builder {
    pub fn new(election: &Election) -> Builder {
        Builder {
            _election: election.clone(),
            _polling_stations: Vec::new(),
            _candidates: Vec::new(),
            _parties: Vec::new(),
        }
    }

    /// Registers a candidate. The key is built from the family and the given
    /// name, the party key from the party's short name.
    pub fn candidate(
        mut self,
        family_name: &str,
        given_name: &str,
        party: Option<&str>,
    ) -> Builder {
        self._candidates.push(Candidate {
            key: identifier(&format!("{}, {}", family_name, given_name)),
            family_name: family_name.to_string(),
            given_name: given_name.to_string(),
            party: party.map(identifier),
        });
        self
    }

    pub fn party(mut self, short_name: &str, seats: u64) -> Builder {
        self._parties.push(Party {
            key: identifier(short_name),
            seats,
        });
        self
    }

    /// Registers a polling station without any votes.
    pub fn polling_station(mut self, name: &str) -> Builder {
        self._polling_stations.push(PollingStation {
            key: identifier(name),
            name: name.to_string(),
            votes: Vec::new(),
        });
        self
    }

    /// Adds votes for a candidate in a polling station.
    ///
    /// Votes for the same candidate accumulate. A candidate first seen in this
    /// station is appended after the ones already present. Fails with a format
    /// error if the accumulated count does not fit in 64 bits.
    pub fn add_votes(
        &mut self,
        station_key: &str,
        candidate_key: &str,
        count: u64,
    ) -> RenderResult<()> {
        let station = self
            ._polling_stations
            .iter_mut()
            .find(|s| s.key == station_key)
            .context(UnknownPollingStationSnafu {
                station: station_key,
            })?;
        match station.votes.iter_mut().find(|(c, _)| c == candidate_key) {
            Some((_, votes)) => {
                *votes = votes.checked_add(count).with_context(|| FormatSnafu {
                    kind: LeafKind::Integer.to_string(),
                    found: format!(
                        "votes for {} in {} ({} + {})",
                        candidate_key, station_key, votes, count
                    ),
                })?;
            }
            None => station.votes.push((candidate_key.to_string(), count)),
        }
        Ok(())
    }

    pub fn build(self) -> ElectionResult {
        ElectionResult {
            election: self._election,
            polling_stations: self._polling_stations,
            candidates: self._candidates,
            parties: self._parties,
        }
    }
}
