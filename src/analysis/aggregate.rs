use super::record::MatchRecord;
use serde::Serialize;

/// Averages over a match sequence, rounded to one decimal place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStats {
    pub win_rate: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    #[serde(rename = "avgCS")]
    pub avg_cs: f64,
    pub avg_gold: f64,
    pub avg_damage: f64,
    #[serde(rename = "avgKDA")]
    pub avg_kda: f64,
}

/// One point of the K/D/A trend. `index` 1 is the most recent match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetrics {
    pub index: usize,
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub win: bool,
}

/// Running full-precision sums. Shared by the overall aggregate and the
/// per-champion buckets so both use the same formulas.
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    games: usize,
    wins: usize,
    kills: u64,
    deaths: u64,
    assists: u64,
    cs: u64,
    gold_per_min: f64,
    damage: u64,
    kda: f64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &MatchRecord) {
        self.games += 1;
        if record.win() {
            self.wins += 1;
        }
        self.kills += u64::from(record.kills());
        self.deaths += u64::from(record.deaths());
        self.assists += u64::from(record.assists());
        self.cs += u64::from(record.cs());
        self.gold_per_min += record.gold_per_min();
        self.damage += u64::from(record.damage());
        self.kda += record.kda();
    }

    pub fn games(&self) -> usize {
        self.games
    }

    /// Percentage in 0..=100, unrounded.
    pub fn win_rate(&self) -> f64 {
        self.mean(self.wins as f64 * 100.0)
    }

    /// Mean of per-match KDA, unrounded.
    pub fn avg_kda(&self) -> f64 {
        self.mean(self.kda)
    }

    fn mean(&self, total: f64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            total / self.games as f64
        }
    }

    pub fn finish(&self) -> AggregatedStats {
        AggregatedStats {
            win_rate: round1(self.win_rate()),
            avg_kills: round1(self.mean(self.kills as f64)),
            avg_deaths: round1(self.mean(self.deaths as f64)),
            avg_assists: round1(self.mean(self.assists as f64)),
            avg_cs: round1(self.mean(self.cs as f64)),
            avg_gold: round1(self.mean(self.gold_per_min)),
            avg_damage: round1(self.mean(self.damage as f64)),
            avg_kda: round1(self.avg_kda()),
        }
    }
}

/// Round half up to one decimal place.
///
/// Inputs are non-negative, where `f64::round` (half away from zero) is
/// half up. Dividing the rounded integer by ten yields the closest f64 to
/// the one-decimal value, so `14000.0` never prints as `14000.04`.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn aggregate(matches: &[MatchRecord]) -> AggregatedStats {
    let mut acc = StatsAccumulator::new();
    for record in matches {
        acc.add(record);
    }
    acc.finish()
}

pub fn match_trend(matches: &[MatchRecord]) -> Vec<MatchMetrics> {
    matches
        .iter()
        .enumerate()
        .map(|(idx, record)| MatchMetrics {
            index: idx + 1,
            champion: record.champion().to_string(),
            kills: record.kills(),
            deaths: record.deaths(),
            assists: record.assists(),
            kda: record.kda(),
            win: record.win(),
        })
        .collect()
}
