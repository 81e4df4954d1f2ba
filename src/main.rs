mod analysis;
mod api;
mod config;
mod display;
mod error;
mod store;

use analysis::record::MatchRecord;
use analysis::{AnalysisReport, PlayerInfo};
use anyhow::Context as _;
use api::client::{FetchedMatch, RiotApiClient};
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::{Config, MAX_MATCH_COUNT};
use display::output::{display_error, display_info, display_latest_match, display_report, display_success};
use error::AppError;
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use store::{CachedMatch, Profile, Store, StoreDocument};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "League Roaster")]
#[command(about = "Match history stats and champion pool for your League account", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register your League account (Name TAG or Name#TAG)
    Register {
        game_name: String,
        tag_line: Option<String>,
    },

    /// Forget the registered account and its cached matches
    Unregister,

    /// Stats for your latest match
    Latest {
        /// Ignore cached match details
        #[arg(long)]
        refresh: bool,
    },

    /// Detailed match history analysis with charts
    Analysis {
        /// Number of matches to analyze (default: 10, max: 100)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=MAX_MATCH_COUNT as u64))]
        matches: Option<u64>,

        /// Ignore cached match details
        #[arg(long)]
        refresh: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Analyze a JSON array of match records instead of calling the API
        #[arg(long, value_name = "PATH")]
        from_file: Option<PathBuf>,
    },
}

/// Process-wide dependencies, opened once in `main` and passed down.
struct Context {
    config: Config,
    store: Store,
}

impl Context {
    fn open() -> Result<Self, AppError> {
        let config = Config::from_env()?;
        let store = Store::open(&config.data_dir)?;
        Ok(Context { config, store })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // File analysis needs neither config nor the data directory
    if let Command::Analysis {
        matches,
        json,
        from_file: Some(path),
        ..
    } = &args.command
    {
        let report = analyze_file(path, matches.map(|n| n as usize))?;
        return print_report(&report, *json);
    }

    let ctx = Context::open()?;

    match args.command {
        Command::Register { game_name, tag_line } => register(&ctx, &game_name, tag_line.as_deref())?,
        Command::Unregister => unregister(&ctx)?,
        Command::Latest { refresh } => latest(&ctx, refresh)?,
        Command::Analysis {
            matches,
            refresh,
            json,
            ..
        } => {
            let count = matches.map_or(ctx.config.match_count, |n| n as usize);
            let report = analyze_account(&ctx, count, refresh, !json)?;
            print_report(&report, json)?;
        }
    }

    Ok(())
}

fn print_report(report: &AnalysisReport, json: bool) -> anyhow::Result<()> {
    let report = report.rounded();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report);
    }
    Ok(())
}

fn parse_riot_id(game_name: &str, tag_line: Option<&str>) -> Result<(String, String), AppError> {
    let (name, tag) = match tag_line {
        Some(tag) => (game_name, tag),
        None => game_name.split_once('#').ok_or(AppError::InvalidRiotId)?,
    };

    let name = name.trim();
    let tag = tag.trim().trim_start_matches('#');
    if name.is_empty() || tag.is_empty() || name.contains('#') || tag.contains('#') {
        return Err(AppError::InvalidRiotId);
    }

    Ok((name.to_string(), tag.to_string()))
}

fn register(ctx: &Context, game_name: &str, tag_line: Option<&str>) -> Result<(), AppError> {
    let (game_name, tag_line) = parse_riot_id(game_name, tag_line)?;
    let client = RiotApiClient::new(&ctx.config)?;

    display_info(&format!("Looking up {}#{} in region {}", game_name, tag_line, ctx.config.region));
    let account = client.get_account(&game_name, &tag_line)?;

    // Riot returns the canonical capitalization
    let profile = Profile {
        game_name: if account.game_name.is_empty() { game_name } else { account.game_name },
        tag_line: if account.tag_line.is_empty() { tag_line } else { account.tag_line },
        puuid: account.puuid,
        registered_at: Utc::now(),
    };

    let mut doc = ctx.store.load()?;
    doc.set_profile(profile.clone());
    ctx.store.save(&doc)?;

    display_success(&format!("Registered {}. Saved to {}", profile.riot_id(), ctx.store.path().display()));
    Ok(())
}

fn unregister(ctx: &Context) -> Result<(), AppError> {
    let mut doc = ctx.store.load()?;
    let Some(profile) = doc.profile.take() else {
        return Err(AppError::NotRegistered);
    };
    doc.clear();
    ctx.store.save(&doc)?;

    display_success(&format!("Forgot {}", profile.riot_id()));
    Ok(())
}

fn latest(ctx: &Context, refresh: bool) -> Result<(), AppError> {
    let profile = ctx.store.profile()?;
    let records = fetch_records(ctx, &profile, 1, refresh, true)?;
    let record = records.first().ok_or(AppError::NoMatches)?;

    display_latest_match(record, &profile.riot_id());
    Ok(())
}

fn analyze_account(ctx: &Context, count: usize, refresh: bool, verbose: bool) -> Result<AnalysisReport, AppError> {
    let profile = ctx.store.profile()?;
    let records = fetch_records(ctx, &profile, count, refresh, verbose)?;

    let player = PlayerInfo {
        game_name: profile.game_name.clone(),
        tag_line: profile.tag_line.clone(),
    };
    Ok(AnalysisReport::build(Some(player), &records))
}

fn analyze_file(path: &Path, count: Option<usize>) -> anyhow::Result<AnalysisReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut records: Vec<MatchRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid match records in {}", path.display()))?;

    if let Some(count) = count {
        records.truncate(count);
    }

    Ok(AnalysisReport::build(None, &records))
}

/// Most-recent-first records for the registered player. Only match details
/// missing from the store are requested unless `refresh` is set.
fn fetch_records(
    ctx: &Context,
    profile: &Profile,
    count: usize,
    refresh: bool,
    verbose: bool,
) -> Result<Vec<MatchRecord>, AppError> {
    let client = RiotApiClient::new(&ctx.config)?;

    if verbose {
        display_info(&format!("Fetching match history for {}", profile.riot_id()));
    }
    let ids = client.get_match_ids(&profile.puuid, count.min(MAX_MATCH_COUNT))?;
    if ids.is_empty() {
        return Err(AppError::NoMatches);
    }

    let mut doc = ctx.store.load()?;
    let missing: Vec<String> = {
        let cached = doc.cached_ids();
        ids.iter()
            .filter(|id| refresh || !cached.contains(id.as_str()))
            .cloned()
            .collect()
    };
    tracing::debug!(requested = ids.len(), missing = missing.len(), "match cache lookup");

    if missing.is_empty() {
        if verbose {
            display_success("⚡ Cache is up-to-date (no new matches)");
        }
    } else {
        let pb = if verbose {
            ProgressBar::new(missing.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_message("Fetching match details");

        let outcome = fetch_into(&mut doc, &missing, |match_id| {
            let result = client.fetch_match(match_id, &profile.puuid);
            pb.inc(1);
            result
        });
        if outcome.is_ok() {
            pb.finish_with_message("✓ Match data fetched");
        } else {
            pb.abandon();
        }

        // Keep whatever arrived before a failure
        ctx.store.save(&doc)?;
        outcome?;
    }

    let records = doc.records_for(&ids);
    if records.is_empty() {
        return Err(AppError::NoMatches);
    }
    if verbose {
        display_success(&format!("Found {} matches to analyze", records.len()));
    }
    Ok(records)
}

/// Fetches each missing id and merges the results into `doc`, even when a
/// request fails part way. Matches without a usable record for the player
/// are remembered as skipped.
fn fetch_into<F>(doc: &mut StoreDocument, missing: &[String], mut fetch: F) -> Result<(), AppError>
where
    F: FnMut(&str) -> Result<Option<FetchedMatch>, AppError>,
{
    let mut fetched = Vec::with_capacity(missing.len());
    let mut outcome = Ok(());

    for match_id in missing {
        match fetch(match_id) {
            Ok(Some(m)) => fetched.push(CachedMatch {
                id: m.id,
                played_at: store::played_at(m.game_creation),
                record: m.record,
            }),
            Ok(None) => doc.mark_skipped(match_id),
            Err(AppError::InvalidRecord(reason)) => {
                tracing::warn!(match_id = match_id.as_str(), %reason, "unusable match data, skipping");
                doc.mark_skipped(match_id);
            }
            Err(e) => {
                outcome = Err(e);
                break;
            }
        }
    }

    if !fetched.is_empty() {
        doc.add_matches(fetched);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fetched(id: &str, champion: &str, game_creation: i64) -> FetchedMatch {
        FetchedMatch {
            id: id.to_string(),
            game_creation,
            record: MatchRecord::new(champion, "MIDDLE", 5, 2, 7, 160, 380.0, 18000, true).unwrap(),
        }
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn failed_fetch_keeps_earlier_matches() {
        let mut doc = StoreDocument::default();
        let missing = ids(&["NA1_1", "NA1_2", "NA1_3", "NA1_4"]);
        let mut requested = Vec::new();

        let result = fetch_into(&mut doc, &missing, |id| {
            requested.push(id.to_string());
            match id {
                "NA1_1" => Ok(Some(fetched(id, "Ahri", 2_000))),
                "NA1_2" => Ok(Some(fetched(id, "Zed", 1_000))),
                _ => Err(AppError::RateLimited),
            }
        });

        assert!(matches!(result, Err(AppError::RateLimited)));
        assert_eq!(requested, ids(&["NA1_1", "NA1_2", "NA1_3"]));
        let cached: Vec<&str> = doc.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(cached, vec!["NA1_1", "NA1_2"]);
    }

    #[test]
    fn unusable_matches_are_skipped_and_remembered() {
        let mut doc = StoreDocument::default();
        let missing = ids(&["NA1_1", "NA1_2", "NA1_3"]);

        fetch_into(&mut doc, &missing, |id| match id {
            "NA1_1" => Ok(None),
            "NA1_2" => Err(AppError::InvalidRecord("deaths must be non-negative".to_string())),
            _ => Ok(Some(fetched(id, "Lux", 3_000))),
        })
        .unwrap();

        assert_eq!(doc.records_for(&missing).len(), 1);
        assert_eq!(doc.skipped, ids(&["NA1_1", "NA1_2"]));
        assert_eq!(doc.cached_ids().len(), 3);
    }

    #[test]
    fn file_analysis_runs_without_account_setup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.json");
        fs::write(
            &path,
            r#"[{"champion":"Ahri","role":"MIDDLE","kills":3,"deaths":1,"assists":4,"cs":150,"goldPerMin":350,"damage":12000,"win":true}]"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "league_roaster",
            "analysis",
            "--json",
            "--from-file",
            path.to_str().unwrap(),
        ])
        .unwrap();
        run(args).unwrap();

        let missing = dir.path().join("absent.json");
        let args = Args::try_parse_from([
            "league_roaster",
            "analysis",
            "--from-file",
            missing.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(args).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }

    #[test]
    fn riot_id_from_two_parts() {
        assert_eq!(
            parse_riot_id("Hide on bush", Some("KR1")).unwrap(),
            ("Hide on bush".to_string(), "KR1".to_string())
        );
        assert_eq!(parse_riot_id("Faker", Some("#T1")).unwrap().1, "T1");
    }

    #[test]
    fn riot_id_from_hash_form() {
        assert_eq!(
            parse_riot_id("Faker#T1", None).unwrap(),
            ("Faker".to_string(), "T1".to_string())
        );
    }

    #[test]
    fn riot_id_rejects_malformed() {
        assert!(matches!(parse_riot_id("Faker", None), Err(AppError::InvalidRiotId)));
        assert!(matches!(parse_riot_id("#T1", None), Err(AppError::InvalidRiotId)));
        assert!(matches!(parse_riot_id("Faker", Some("")), Err(AppError::InvalidRiotId)));
        assert!(matches!(parse_riot_id("a#b#c", None), Err(AppError::InvalidRiotId)));
    }

    #[test]
    fn analyzes_file_of_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.json");
        fs::write(
            &path,
            r#"[
                {"champion":"Ahri","role":"MIDDLE","kills":10,"deaths":2,"assists":5,"cs":180,"goldPerMin":400,"damage":20000,"win":true},
                {"champion":"Ahri","role":"MIDDLE","kills":2,"deaths":8,"assists":1,"cs":120,"goldPerMin":300,"damage":8000,"win":false},
                {"champion":"Zed","role":"MIDDLE","kills":0,"deaths":0,"assists":0,"cs":10,"goldPerMin":100,"damage":100,"win":false}
            ]"#,
        )
        .unwrap();

        let report = analyze_file(&path, Some(2)).unwrap();
        assert_eq!(report.matches, 2);
        assert_eq!(report.overall_stats.win_rate, 50.0);
        assert_eq!(report.overall_stats.avg_damage, 14000.0);
        assert_eq!(report.champion_pool.best.unwrap().name, "Ahri");

        assert_eq!(analyze_file(&path, None).unwrap().matches, 3);
    }

    #[test]
    fn file_with_bad_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"[{"champion":"Ahri","kills":1,"deaths":-2,"assists":5,"cs":180,"goldPerMin":400,"damage":20000,"win":true}]"#,
        )
        .unwrap();

        let err = analyze_file(&path, None).unwrap_err();
        assert!(format!("{:#}", err).contains("deaths"));
    }
}
