pub mod aggregate;
pub mod champion_pool;
pub mod record;

use aggregate::{aggregate, match_trend, AggregatedStats, MatchMetrics};
use champion_pool::{champion_buckets, rank_champions, ChampionBucket, ChampionPool};
use record::MatchRecord;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub game_name: String,
    pub tag_line: String,
}

/// Everything the analysis command renders, computed in one pass over the
/// fetched records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub player: Option<PlayerInfo>,
    pub matches: usize,
    pub overall_stats: AggregatedStats,
    pub champion_pool: ChampionPool,
    pub champions: Vec<ChampionBucket>,
    pub trend: Vec<MatchMetrics>,
}

impl AnalysisReport {
    pub fn build(player: Option<PlayerInfo>, matches: &[MatchRecord]) -> Self {
        AnalysisReport {
            player,
            matches: matches.len(),
            overall_stats: aggregate(matches),
            champion_pool: rank_champions(matches),
            champions: champion_buckets(matches),
            trend: match_trend(matches),
        }
    }

    /// Copy with every bucket rounded, for output.
    pub fn rounded(&self) -> Self {
        AnalysisReport {
            champion_pool: self.champion_pool.rounded(),
            champions: self.champions.iter().map(ChampionBucket::rounded).collect(),
            trend: self
                .trend
                .iter()
                .map(|m| MatchMetrics {
                    kda: aggregate::round1(m.kda),
                    ..m.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}
