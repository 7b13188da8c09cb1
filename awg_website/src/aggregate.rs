use log::debug;

use snafu::prelude::*;
use std::collections::HashMap;

use crate::literal::LeafKind;
use crate::model::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);

    fn checked_add(self, rhs: VoteCount) -> Option<VoteCount> {
        self.0.checked_add(rhs.0).map(VoteCount)
    }
}

/// Sums the votes of every candidate over all the polling stations.
///
/// Candidates are returned in order of first appearance: the candidates of the
/// first station in its order, then the ones only introduced by the second
/// station, and so on. A candidate missing in a station counts zero there.
///
/// Fails with a format error if a total does not fit in 64 bits.
///
/// ```
/// use awg_website::aggregate::aggregate;
///
/// let a = vec![("poppinga-jens".to_string(), 106)];
/// let b = vec![
///     ("boettger-volker".to_string(), 169),
///     ("poppinga-jens".to_string(), 222),
/// ];
/// let stations = vec![("klein-boden", a.as_slice()), ("rethwischdorf", b.as_slice())];
/// let total = aggregate(stations)?;
/// assert_eq!(
///     total,
///     vec![("poppinga-jens".to_string(), 328), ("boettger-volker".to_string(), 169)]
/// );
/// # Ok::<(), awg_website::RenderError>(())
/// ```
pub fn aggregate<'a, I>(stations: I) -> RenderResult<Vec<(String, u64)>>
where
    I: IntoIterator<Item = (&'a str, &'a [(String, u64)])>,
{
    // Position of each candidate in the output.
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut totals: Vec<(&'a str, VoteCount)> = Vec::new();

    for (station, votes) in stations {
        debug!("aggregate: station {:?}: {:?} candidates", station, votes.len());
        for (candidate, count) in votes.iter() {
            let idx = *positions.entry(candidate.as_str()).or_insert_with(|| {
                totals.push((candidate.as_str(), VoteCount::EMPTY));
                totals.len() - 1
            });
            let previous = totals[idx].1;
            totals[idx].1 = previous
                .checked_add(VoteCount(*count))
                .with_context(|| FormatSnafu {
                    kind: LeafKind::Integer.to_string(),
                    found: format!(
                        "total of {} after station {} ({} + {})",
                        candidate, station, previous.0, count
                    ),
                })?;
        }
    }

    // Only logged, may exceed 64 bits.
    let all: u128 = totals.iter().map(|(_, vc)| u128::from(vc.0)).sum();
    debug!("aggregate: {:?} candidates, {:?} votes in total", totals.len(), all);

    Ok(totals
        .into_iter()
        .map(|(name, vc)| (name.to_string(), vc.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(l: &[(&str, u64)]) -> Vec<(String, u64)> {
        l.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn sums_over_stations() {
        let a = votes(&[("poppinga-jens", 106), ("boettger-volker", 26)]);
        let b = votes(&[("poppinga-jens", 222), ("boettger-volker", 169)]);
        let total = aggregate(vec![
            ("klein-boden", a.as_slice()),
            ("rethwischdorf", b.as_slice()),
        ])
        .unwrap();
        assert_eq!(
            total,
            votes(&[("poppinga-jens", 328), ("boettger-volker", 195)])
        );
    }

    #[test]
    fn first_appearance_order() {
        // The second station lists the candidates in another order and adds one.
        let a = votes(&[("b", 1), ("a", 2)]);
        let b = votes(&[("c", 5), ("a", 3), ("b", 4)]);
        let total = aggregate(vec![("s1", a.as_slice()), ("s2", b.as_slice())]).unwrap();
        assert_eq!(total, votes(&[("b", 5), ("a", 5), ("c", 5)]));
    }

    #[test]
    fn missing_entries_count_zero() {
        let a = votes(&[("a", 7)]);
        let b = votes(&[("b", 0)]);
        let c: Vec<(String, u64)> = vec![];
        let total = aggregate(vec![
            ("s1", a.as_slice()),
            ("s2", b.as_slice()),
            ("s3", c.as_slice()),
        ])
        .unwrap();
        assert_eq!(total, votes(&[("a", 7), ("b", 0)]));
    }

    #[test]
    fn no_stations() {
        let total = aggregate(Vec::<(&str, &[(String, u64)])>::new()).unwrap();
        assert!(total.is_empty());
    }

    #[test]
    fn deterministic() {
        let a = votes(&[("x", 1), ("y", 2), ("z", 3)]);
        let b = votes(&[("z", 1), ("w", 2)]);
        let first = aggregate(vec![("s1", a.as_slice()), ("s2", b.as_slice())]).unwrap();
        for _ in 0..10 {
            let again = aggregate(vec![("s1", a.as_slice()), ("s2", b.as_slice())]).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn total_out_of_range() {
        let a = votes(&[("a", 9_000_000_000_000_000_000)]);
        let res = aggregate(vec![
            ("s1", a.as_slice()),
            ("s2", a.as_slice()),
            ("s3", a.as_slice()),
        ]);
        assert!(matches!(res, Err(RenderError::Format { .. })));
    }

    #[test]
    fn large_totals_of_several_candidates() {
        // Each total fits, their sum does not.
        let a = votes(&[
            ("a", 7_000_000_000_000_000_000),
            ("b", 7_000_000_000_000_000_000),
            ("c", 7_000_000_000_000_000_000),
        ]);
        let total = aggregate(vec![("s1", a.as_slice())]).unwrap();
        assert_eq!(total, a);
    }
}
