use crate::awg::*;

use awg_website::literal::identifier;
use awg_website::{Candidate, Election, ElectionResult, Party, PollingStation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fs;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotElection {
    pub date: NaiveDate,
    #[serde(rename = "numberOfEligibleVoters")]
    pub number_of_eligible_voters: Option<u64>,
    #[serde(rename = "numberOfAllBallots")]
    pub number_of_all_ballots: Option<u64>,
    #[serde(rename = "numberOfPostalBallots")]
    pub number_of_postal_ballots: u64,
    #[serde(rename = "numberOfInvalidBallots")]
    pub number_of_invalid_ballots: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPollingStation {
    pub name: String,
    pub key: Option<String>,
    /// Pairs of candidate key and number of votes.
    pub votes: Vec<(String, u64)>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNomination {
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    pub party: Option<String>,
    pub key: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotParty {
    #[serde(rename = "shortName")]
    pub short_name: String,
    pub key: Option<String>,
    pub seats: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub election: SnapshotElection,
    #[serde(rename = "pollingStations")]
    pub polling_stations: Vec<SnapshotPollingStation>,
    pub nominations: Vec<SnapshotNomination>,
    pub parties: Vec<SnapshotParty>,
}

// Empty keys are treated as missing.
fn key_or_derived(key: &Option<String>, name: &str) -> String {
    match key {
        Some(k) if !k.is_empty() => k.clone(),
        _ => identifier(name),
    }
}

impl Snapshot {
    pub fn into_election_result(self) -> ElectionResult {
        let e = self.election;
        ElectionResult {
            election: Election {
                date: e.date,
                eligible_voters: e.number_of_eligible_voters,
                ballots: e.number_of_all_ballots,
                postal_ballots: e.number_of_postal_ballots,
                invalid_ballots: e.number_of_invalid_ballots,
            },
            polling_stations: self
                .polling_stations
                .into_iter()
                .map(|ps| PollingStation {
                    key: key_or_derived(&ps.key, &ps.name),
                    name: ps.name,
                    votes: ps.votes,
                })
                .collect(),
            candidates: self
                .nominations
                .into_iter()
                .map(|n| Candidate {
                    key: key_or_derived(
                        &n.key,
                        &format!("{}, {}", n.family_name, n.given_name),
                    ),
                    party: n.party.as_deref().map(identifier),
                    family_name: n.family_name,
                    given_name: n.given_name,
                })
                .collect(),
            parties: self
                .parties
                .into_iter()
                .map(|p| Party {
                    key: key_or_derived(&p.key, &p.short_name),
                    seats: p.seats,
                })
                .collect(),
        }
    }
}

pub fn read_snapshot(path: &str) -> AwgResult<Snapshot> {
    let snapshot_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let snapshot: Snapshot =
        serde_json::from_str(&snapshot_str).context(ParsingJsonSnafu { path })?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "election": {
            "date": "2023-05-14",
            "numberOfPostalBallots": 12,
            "numberOfInvalidBallots": 1
        },
        "pollingStations": [
            { "name": "Groß Boden", "votes": [["mueller-anna", 3], ["hansen-uwe", 4]] },
            { "name": "Dorf", "key": "dorf-mitte", "votes": [] }
        ],
        "nominations": [
            { "familyName": "Müller", "givenName": "Anna", "party": "Die Grünen" },
            { "familyName": "Hansen", "givenName": "Uwe", "key": "" }
        ],
        "parties": [
            { "shortName": "Die Grünen", "seats": 2 },
            { "shortName": "AWG", "key": "awg-rethwisch", "seats": 1 }
        ]
    }"#;

    #[test]
    fn parse_small() {
        let snapshot: Snapshot = serde_json::from_str(SMALL).unwrap();
        assert_eq!(snapshot.election.number_of_eligible_voters, None);
        assert_eq!(snapshot.election.number_of_postal_ballots, 12);
        assert_eq!(
            snapshot.polling_stations[0].votes,
            vec![("mueller-anna".to_string(), 3), ("hansen-uwe".to_string(), 4)]
        );
        assert_eq!(snapshot.nominations[1].party, None);
    }

    #[test]
    fn derive_missing_keys() {
        let snapshot: Snapshot = serde_json::from_str(SMALL).unwrap();
        let r = snapshot.into_election_result();
        assert_eq!(r.election.year(), 2023);
        assert_eq!(r.election.ballots, None);
        assert_eq!(r.polling_stations[0].key, "gross-boden");
        assert_eq!(r.polling_stations[0].name, "Groß Boden");
        assert_eq!(r.polling_stations[1].key, "dorf-mitte");
        assert_eq!(r.candidates[0].key, "mueller-anna");
        assert_eq!(r.candidates[0].party, Some("die-gruenen".to_string()));
        assert_eq!(r.candidates[1].key, "hansen-uwe");
        assert_eq!(r.candidates[1].party, None);
        assert_eq!(r.parties[0].key, "die-gruenen");
        assert_eq!(r.parties[1].key, "awg-rethwisch");
    }

    #[test]
    fn render_small() {
        let snapshot: Snapshot = serde_json::from_str(SMALL).unwrap();
        let php = snapshot.into_election_result().render().unwrap();
        assert!(php.contains("function data_2023_get_meta()"));
        assert!(php.contains("'wahlberechtigte' => null"));
        assert!(php.contains(
            "'gesamt' => array(\n\t\t\t'mueller-anna' => 3,\n\t\t\t'hansen-uwe' => 4\n\t\t)"
        ));
        assert!(php.contains("'dorf-mitte' => array()"));
    }

    #[test]
    fn missing_file() {
        let res = read_snapshot("/nonexistent/snapshot.json");
        assert!(matches!(res, Err(AwgError::OpeningJson { .. })));
    }
}
