//! Best-time records for completed runs, keyed by a board-size string such
//! as `"8x10x10"`. The board engine knows nothing about this; hosts feed it
//! elapsed times and render the rankings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many entries a rankings table shows at most.
pub const MAX_RANKED: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub rank: usize,
    pub secs: u32,
}

/// Recorded completion times per board-size key, each list kept sorted
/// ascending.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBook {
    times: BTreeMap<String, Vec<u32>>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed run for the given board-size key.
    pub fn add(&mut self, size_key: &str, secs: u32) {
        let times = self.times.entry(size_key.to_owned()).or_default();
        let at = times.partition_point(|&recorded| recorded <= secs);
        times.insert(at, secs);
    }

    /// Best (minimum) recorded time for a board-size key.
    pub fn best(&self, size_key: &str) -> Option<u32> {
        self.times
            .get(size_key)
            .and_then(|times| times.first().copied())
    }

    /// Top recorded times, ascending, at most [`MAX_RANKED`] entries. Equal
    /// times share the rank of the first of them.
    pub fn rankings(&self, size_key: &str) -> Vec<Ranking> {
        let Some(times) = self.times.get(size_key) else {
            return Vec::new();
        };

        let mut rankings: Vec<Ranking> = Vec::with_capacity(times.len().min(MAX_RANKED));
        for (i, &secs) in times.iter().take(MAX_RANKED).enumerate() {
            let rank = match rankings.last() {
                Some(prev) if prev.secs == secs => prev.rank,
                _ => i + 1,
            };
            rankings.push(Ranking { rank, secs });
        }
        rankings
    }

    /// Distinct board-size keys with at least one record, sorted.
    pub fn size_keys(&self) -> impl Iterator<Item = &str> {
        self.times.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
