use crate::analysis::aggregate::{AggregatedStats, MatchMetrics};
use crate::analysis::champion_pool::{ChampionBucket, ChampionPool};
use crate::analysis::record::MatchRecord;
use crate::analysis::AnalysisReport;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "#")]
    number: String,
    champion: String,
    result: String,
    #[tabled(rename = "K/D/A")]
    kda_line: String,
    #[tabled(rename = "KDA")]
    kda: String,
    trend: String,
}

#[derive(Tabled)]
struct ChampionRow {
    champion: String,
    games: String,
    win_rate: String,
    avg_kda: String,
    performance: String,
}

#[derive(Tabled)]
struct StatRow {
    stat: String,
    value: String,
}

/// Dashboard-style short numbers: 1.2K, 3.4M.
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else {
        format!("{}", num)
    }
}

/// Horizontal bar scaled so `max` fills the width.
pub fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.clamp(1, BAR_WIDTH))
}

pub fn display_latest_match(record: &MatchRecord, player: &str) {
    println!(
        "\n{}",
        format!("🔥 Latest match for {}", player).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let result = if record.win() {
        "✅ WIN".green().to_string()
    } else {
        "❌ LOSS".red().to_string()
    };
    let role = if record.role().is_empty() { "-" } else { record.role() };

    let rows = vec![
        StatRow { stat: "Champion".into(), value: record.champion().to_string() },
        StatRow { stat: "Role".into(), value: role.to_string() },
        StatRow {
            stat: "K/D/A".into(),
            value: format!("{}/{}/{}", record.kills(), record.deaths(), record.assists()),
        },
        StatRow { stat: "KDA ratio".into(), value: format!("{:.2}", record.kda()) },
        StatRow { stat: "CS".into(), value: record.cs().to_string() },
        StatRow { stat: "Gold".into(), value: format!("{:.0}/min", record.gold_per_min()) },
        StatRow { stat: "Damage".into(), value: format_number(record.damage() as f64) },
        StatRow { stat: "Result".into(), value: result },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

/// Expects a report already passed through [`AnalysisReport::rounded`].
pub fn display_report(report: &AnalysisReport) {
    let title = match &report.player {
        Some(p) => format!("📊 ANALYSIS for {}#{} (Last {} Games)", p.game_name, p.tag_line, report.matches),
        None => format!("📊 ANALYSIS (Last {} Games)", report.matches),
    };
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(80).cyan());

    display_overall_stats(&report.overall_stats);
    display_champion_pool(&report.champion_pool);
    display_champion_performance(&report.champions);
    display_trend(&report.trend);
}

fn display_overall_stats(stats: &AggregatedStats) {
    println!("{}", "Overall".bold().yellow());
    let rows = vec![
        StatRow { stat: "Win Rate".into(), value: format!("{:.1}%", stats.win_rate) },
        StatRow {
            stat: "K/D/A".into(),
            value: format!("{:.1}/{:.1}/{:.1}", stats.avg_kills, stats.avg_deaths, stats.avg_assists),
        },
        StatRow { stat: "KDA ratio".into(), value: format!("{:.1}", stats.avg_kda) },
        StatRow { stat: "CS".into(), value: format!("{:.1}", stats.avg_cs) },
        StatRow { stat: "Gold".into(), value: format!("{:.1}/min", stats.avg_gold) },
        StatRow { stat: "Damage".into(), value: format_number(stats.avg_damage) },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn display_champion_pool(pool: &ChampionPool) {
    let (Some(best), Some(worst)) = (&pool.best, &pool.worst) else {
        println!("{}\n", "No champions to rank (no matches)".yellow());
        return;
    };

    println!("{}", "🟢 Best Champion".bold().green());
    print_bucket(best);
    println!("{}", "🔴 Worst Champion".bold().red());
    print_bucket(worst);
    println!();
}

fn print_bucket(bucket: &ChampionBucket) {
    println!(
        "  {} with {:.1}% win rate over {} games, {:.1} avg KDA",
        bucket.name.bold(),
        bucket.win_rate,
        bucket.games,
        bucket.avg_kda
    );
}

fn display_champion_performance(buckets: &[ChampionBucket]) {
    if buckets.is_empty() {
        return;
    }

    println!("{}", "🎯 Champion Performance".bold().yellow());
    let rows: Vec<ChampionRow> = buckets
        .iter()
        .map(|b| ChampionRow {
            champion: b.name.clone(),
            games: b.games.to_string(),
            win_rate: format!("{:.1}%", b.win_rate),
            avg_kda: format!("{:.1}", b.avg_kda),
            performance: bar(b.win_rate, 100.0),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn display_trend(trend: &[MatchMetrics]) {
    if trend.is_empty() {
        return;
    }

    println!("{}", "📈 K/D/A Trend (most recent first)".bold().yellow());
    let max_kda = trend.iter().map(|m| m.kda).fold(0.0, f64::max);

    let rows: Vec<TrendRow> = trend
        .iter()
        .map(|m| {
            let result = if m.win {
                "WIN".green().to_string()
            } else {
                "LOSS".red().to_string()
            };
            let trend_bar = if m.win {
                bar(m.kda, max_kda).green().to_string()
            } else {
                bar(m.kda, max_kda).red().to_string()
            };
            TrendRow {
                number: m.index.to_string(),
                champion: m.champion.clone(),
                result,
                kda_line: format!("{}/{}/{}", m.kills, m.deaths, m.assists),
                kda: format!("{:.1}", m.kda),
                trend: trend_bar,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
