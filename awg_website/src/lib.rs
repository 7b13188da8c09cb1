/*!
Renders the results of a local election into the data file of the AWG
website.

The data file is a PHP script with five functions per election year, each
returning a literal array:

- `data_<year>_get_meta`: number of eligible voters, ballots, postal ballots
  and invalid ballots
- `data_<year>_get_data`: the votes per candidate for each polling station,
  followed by the total (`gesamt`)
- `data_<year>_get_personen`: party, family name and given name per candidate
- `data_<year>_get_seats`: the seats won per party
- `data_<year>_get_types`: the display label of the total and of each polling
  station

The order of the polling stations, candidates and parties given as input is
the order used on the website.

See the [manual] for the exact layout.
*/
pub mod aggregate;
pub mod builder;
pub mod literal;
pub mod manual;
mod model;
mod template;

use log::{debug, info};
use snafu::prelude::*;
use std::collections::HashSet;

use crate::aggregate::aggregate;
use crate::literal::{serialize_in, Leaf, Mapping};
pub use crate::model::*;
pub use crate::template::{Block, RenderedBlocks};
use crate::template::Template;

/// Key of the total over all polling stations.
pub const TOTAL_KEY: &str = "gesamt";

/// Display label of the total over all polling stations.
pub const TOTAL_LABEL: &str = "Gesamt";

/// The five blocks of the data file, before serialization.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Blocks {
    pub meta: Mapping,
    pub data: Mapping,
    pub personen: Mapping,
    pub seats: Mapping,
    pub types: Mapping,
}

impl Blocks {
    pub fn get(&self, block: Block) -> &Mapping {
        match block {
            Block::Meta => &self.meta,
            Block::Data => &self.data,
            Block::Personen => &self.personen,
            Block::Seats => &self.seats,
            Block::Types => &self.types,
        }
    }

    /// Serializes every block into its PHP array expression.
    pub fn serialize(&self) -> RenderResult<RenderedBlocks> {
        let s = |block: Block| serialize_in(&[block.name()], self.get(block));
        Ok(RenderedBlocks {
            meta: s(Block::Meta)?,
            data: s(Block::Data)?,
            personen: s(Block::Personen)?,
            seats: s(Block::Seats)?,
            types: s(Block::Types)?,
        })
    }
}

impl ElectionResult {
    /// Renders the data file of this result.
    pub fn render(&self) -> RenderResult<String> {
        render(
            &self.election,
            &self.polling_stations,
            &self.candidates,
            &self.parties,
        )
    }
}

/// Renders the data file for the website.
///
/// Arguments:
/// * `election` the figures of the meta block and the election day
/// * `polling_stations` the votes by polling station, in display order
/// * `candidates` the roster, in display order
/// * `parties` the seats won, in display order
///
/// Fails without producing any output if a polling station has votes for a
/// candidate missing in the roster, if a key repeats within one array, or if
/// a value cannot be formatted.
pub fn render(
    election: &Election,
    polling_stations: &[PollingStation],
    candidates: &[Candidate],
    parties: &[Party],
) -> RenderResult<String> {
    info!(
        "render: election {:?}: {:?} polling stations, {:?} candidates, {:?} parties",
        election.date,
        polling_stations.len(),
        candidates.len(),
        parties.len()
    );
    let blocks = assemble_blocks(election, polling_stations, candidates, parties)?;
    let rendered = blocks.serialize()?;
    Template::get().fill(election.date, &rendered)
}

/// Builds the five blocks without serializing them.
pub fn assemble_blocks(
    election: &Election,
    polling_stations: &[PollingStation],
    candidates: &[Candidate],
    parties: &[Party],
) -> RenderResult<Blocks> {
    check_candidates(polling_stations, candidates)?;
    let blocks = Blocks {
        meta: meta_block(election)?,
        data: data_block(polling_stations)?,
        personen: persons_block(candidates),
        seats: seats_block(parties)?,
        types: types_block(polling_stations),
    };
    for b in Block::ALL.iter() {
        debug!(
            "assemble_blocks: {}: {:?} entries",
            b.name(),
            blocks.get(*b).len()
        );
    }
    Ok(blocks)
}

// Every candidate with votes must be in the roster.
fn check_candidates(
    polling_stations: &[PollingStation],
    candidates: &[Candidate],
) -> RenderResult<()> {
    let roster: HashSet<&str> = candidates.iter().map(|c| c.key.as_str()).collect();
    for station in polling_stations.iter() {
        for (candidate, _) in station.votes.iter() {
            ensure!(
                roster.contains(candidate.as_str()),
                UnknownCandidateSnafu {
                    station: station.key.as_str(),
                    candidate: candidate.as_str(),
                }
            );
        }
    }
    Ok(())
}

fn meta_block(election: &Election) -> RenderResult<Mapping> {
    Ok(Mapping::new()
        .with("wahlberechtigte", Leaf::optional_count(election.eligible_voters)?)
        .with("stimmzettel", Leaf::optional_count(election.ballots)?)
        .with("davon-briefwaehler", Leaf::count(election.postal_ballots)?)
        .with("ungueltige-stimmen", Leaf::count(election.invalid_ballots)?))
}

fn votes_mapping(votes: &[(String, u64)]) -> RenderResult<Mapping> {
    let mut res = Mapping::new();
    for (candidate, count) in votes.iter() {
        res.push(candidate.clone(), Leaf::count(*count)?);
    }
    Ok(res)
}

fn data_block(polling_stations: &[PollingStation]) -> RenderResult<Mapping> {
    let mut res = Mapping::new();
    for station in polling_stations.iter() {
        res.push(station.key.clone(), votes_mapping(&station.votes)?);
    }
    let total = aggregate(
        polling_stations
            .iter()
            .map(|s| (s.key.as_str(), s.votes.as_slice())),
    )?;
    res.push(TOTAL_KEY, votes_mapping(&total)?);
    Ok(res)
}

fn persons_block(candidates: &[Candidate]) -> Mapping {
    let mut res = Mapping::new();
    for c in candidates.iter() {
        let person = Mapping::new()
            .with("gruppierung", Leaf::optional_string(c.party.as_deref()))
            .with("nachname", Leaf::label(c.family_name.clone()))
            .with("vorname", Leaf::label(c.given_name.clone()));
        res.push(c.key.clone(), person);
    }
    res
}

fn seats_block(parties: &[Party]) -> RenderResult<Mapping> {
    let mut res = Mapping::new();
    for p in parties.iter() {
        res.push(p.key.clone(), Leaf::count(p.seats)?);
    }
    Ok(res)
}

fn types_block(polling_stations: &[PollingStation]) -> Mapping {
    let mut res = Mapping::new().with(TOTAL_KEY, Leaf::label(TOTAL_LABEL));
    for station in polling_stations.iter() {
        res.push(station.key.clone(), Leaf::label(station.name.clone()));
    }
    res
}
