use super::aggregate::{round1, StatsAccumulator};
use super::record::MatchRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Per-champion results at full precision. Use [`ChampionBucket::rounded`]
/// when presenting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionBucket {
    pub name: String,
    pub games: usize,
    pub win_rate: f64,
    #[serde(rename = "avgKDA")]
    pub avg_kda: f64,
}

impl ChampionBucket {
    pub fn rounded(&self) -> ChampionBucket {
        ChampionBucket {
            name: self.name.clone(),
            games: self.games,
            win_rate: round1(self.win_rate),
            avg_kda: round1(self.avg_kda),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChampionPool {
    pub best: Option<ChampionBucket>,
    pub worst: Option<ChampionBucket>,
}

impl ChampionPool {
    pub fn rounded(&self) -> ChampionPool {
        ChampionPool {
            best: self.best.as_ref().map(ChampionBucket::rounded),
            worst: self.worst.as_ref().map(ChampionBucket::rounded),
        }
    }
}

/// One bucket per distinct champion name (case-sensitive), most played first.
pub fn champion_buckets(matches: &[MatchRecord]) -> Vec<ChampionBucket> {
    let mut groups: HashMap<&str, StatsAccumulator> = HashMap::new();
    for record in matches {
        groups.entry(record.champion()).or_default().add(record);
    }

    let mut buckets: Vec<ChampionBucket> = groups
        .into_iter()
        .map(|(name, acc)| ChampionBucket {
            name: name.to_string(),
            games: acc.games(),
            win_rate: acc.win_rate(),
            avg_kda: acc.avg_kda(),
        })
        .collect();

    buckets.sort_by(|a, b| b.games.cmp(&a.games).then_with(|| a.name.cmp(&b.name)));
    buckets
}

pub fn rank_champions(matches: &[MatchRecord]) -> ChampionPool {
    let buckets = champion_buckets(matches);

    let best = buckets.iter().max_by(|a, b| compare_best(a, b)).cloned();
    let worst = buckets.iter().min_by(|a, b| compare_worst(a, b)).cloned();

    ChampionPool { best, worst }
}

// Means of per-match ratios pick up summation error, so a true tie such as
// (1.2 + 1.1 + 1.0) / 3 against 1.1 can differ in the last bits.
const KDA_TOLERANCE: f64 = 1e-9;

fn compare_kda(a: f64, b: f64) -> Ordering {
    let scale = a.abs().max(b.abs()).max(1.0);
    if (a - b).abs() <= KDA_TOLERANCE * scale {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

// Greater is better: win rate, KDA, games, then the smaller name wins.
fn compare_best(a: &ChampionBucket, b: &ChampionBucket) -> Ordering {
    a.win_rate
        .total_cmp(&b.win_rate)
        .then_with(|| compare_kda(a.avg_kda, b.avg_kda))
        .then_with(|| a.games.cmp(&b.games))
        .then_with(|| b.name.cmp(&a.name))
}

// Lesser is worse: win rate, KDA, games, then the smaller name loses.
fn compare_worst(a: &ChampionBucket, b: &ChampionBucket) -> Ordering {
    a.win_rate
        .total_cmp(&b.win_rate)
        .then_with(|| compare_kda(a.avg_kda, b.avg_kda))
        .then_with(|| a.games.cmp(&b.games))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn game(champion: &str, win: bool, k: u32, d: u32, a: u32) -> MatchRecord {
        MatchRecord::new(champion, "MIDDLE", k, d, a, 150, 350.0, 15000, win).unwrap()
    }

    fn best_name(pool: &ChampionPool) -> &str {
        &pool.best.as_ref().unwrap().name
    }

    fn worst_name(pool: &ChampionPool) -> &str {
        &pool.worst.as_ref().unwrap().name
    }

    #[test]
    fn empty_input_has_no_best_or_worst() {
        assert_eq!(rank_champions(&[]), ChampionPool { best: None, worst: None });
        assert!(champion_buckets(&[]).is_empty());
    }

    #[test]
    fn games_add_up_to_input_length() {
        let matches = vec![
            game("Ahri", true, 1, 1, 1),
            game("Zed", false, 1, 1, 1),
            game("Ahri", false, 1, 1, 1),
            game("ahri", true, 1, 1, 1),
            game("Lux", true, 1, 1, 1),
        ];
        let buckets = champion_buckets(&matches);
        assert_eq!(buckets.iter().map(|b| b.games).sum::<usize>(), matches.len());
        // names are case-sensitive
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].name, "Ahri");
    }

    #[test]
    fn two_game_example() {
        let matches = vec![
            MatchRecord::new("Ahri", "MIDDLE", 10, 2, 5, 180, 400.0, 20000, true).unwrap(),
            MatchRecord::new("Ahri", "MIDDLE", 2, 8, 1, 120, 300.0, 8000, false).unwrap(),
        ];
        let pool = rank_champions(&matches);
        let best = pool.best.as_ref().unwrap();
        assert_eq!(best.name, "Ahri");
        assert_eq!(best.games, 2);
        assert_eq!(best.win_rate, 50.0);
        assert_eq!(pool.best, pool.worst);
    }

    #[test]
    fn single_champion_is_best_and_worst() {
        let pool = rank_champions(&[game("Teemo", false, 0, 9, 0)]);
        assert_eq!(best_name(&pool), "Teemo");
        assert_eq!(worst_name(&pool), "Teemo");
    }

    #[test]
    fn picks_by_win_rate() {
        let matches = vec![
            game("Ahri", true, 1, 1, 1),
            game("Ahri", true, 1, 1, 1),
            game("Zed", false, 1, 1, 1),
            game("Lux", true, 1, 1, 1),
            game("Lux", false, 1, 1, 1),
        ];
        let pool = rank_champions(&matches);
        assert_eq!(best_name(&pool), "Ahri");
        assert_eq!(worst_name(&pool), "Zed");
    }

    #[test]
    fn win_rate_tie_broken_by_kda() {
        let matches = vec![
            game("Ahri", true, 10, 1, 0),
            game("Zed", true, 2, 1, 0),
            game("Lux", false, 0, 5, 0),
            game("Teemo", false, 5, 5, 0),
        ];
        let pool = rank_champions(&matches);
        assert_eq!(best_name(&pool), "Ahri");
        assert_eq!(worst_name(&pool), "Lux");
    }

    #[test]
    fn kda_tie_broken_by_games() {
        let matches = vec![
            game("Ahri", true, 3, 1, 0),
            game("Ahri", true, 3, 1, 0),
            game("Zed", true, 3, 1, 0),
            game("Lux", false, 0, 1, 0),
            game("Teemo", false, 0, 1, 0),
            game("Teemo", false, 0, 1, 0),
        ];
        let pool = rank_champions(&matches);
        assert_eq!(best_name(&pool), "Ahri");
        assert_eq!(worst_name(&pool), "Lux");
    }

    #[test]
    fn full_tie_broken_by_name() {
        let matches = vec![
            game("Zed", true, 1, 1, 1),
            game("Ahri", true, 1, 1, 1),
            game("Lux", true, 1, 1, 1),
        ];
        let pool = rank_champions(&matches);
        assert_eq!(best_name(&pool), "Ahri");
        assert_eq!(worst_name(&pool), "Ahri");
    }

    #[test]
    fn ranking_uses_full_precision_kda() {
        // 3.04 and 3.0 both display as 3.0 but are not tied
        let matches = vec![
            game("Ahri", true, 76, 25, 0),
            game("Zed", true, 3, 1, 0),
        ];
        let pool = rank_champions(&matches);
        assert_eq!(best_name(&pool), "Ahri");
        assert_eq!(pool.rounded().best.unwrap().avg_kda, 3.0);
    }

    #[test]
    fn equal_mean_kda_falls_through_to_games() {
        // Ahri averages (1.2 + 1.1 + 1.0) / 3, which sums to just under 1.1
        let matches = vec![
            game("Ahri", true, 6, 5, 0),
            game("Ahri", true, 11, 10, 0),
            game("Ahri", true, 5, 5, 0),
            game("Zed", true, 11, 10, 0),
        ];
        let pool = rank_champions(&matches);
        assert_eq!(best_name(&pool), "Ahri");
        assert_eq!(worst_name(&pool), "Zed");
    }

    #[test]
    fn rounded_bucket_for_display() {
        let matches = vec![
            game("Ahri", true, 1, 1, 1),
            game("Ahri", false, 1, 1, 1),
            game("Ahri", false, 1, 1, 1),
        ];
        let pool = rank_champions(&matches).rounded();
        assert_eq!(pool.best.unwrap().win_rate, 33.3);
    }
}
