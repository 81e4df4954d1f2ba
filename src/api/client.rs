use crate::analysis::record::MatchRecord;
use crate::config::Config;
use crate::error::AppError;
use governor::{Quota, RateLimiter, state::{InMemoryState, NotKeyed}, clock::DefaultClock};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use super::models::*;

const REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(20) {
    Some(n) => n,
    None => unreachable!(),
};
const MAX_RETRIES: u32 = 3;

/// A match as fetched for the tracked player.
#[derive(Debug, Clone)]
pub struct FetchedMatch {
    pub id: String,
    pub game_creation: i64,
    pub record: MatchRecord,
}

pub struct RiotApiClient {
    api_key: String,
    region: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RiotApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = config.require_api_key()?.to_string();
        Ok(RiotApiClient {
            api_key,
            region: config.region.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_second(REQUESTS_PER_SECOND)),
        })
    }

    fn regional_routing(&self) -> &'static str {
        regional_routing(&self.region)
    }

    fn execute_request(&self, url: &str) -> Result<String, AppError> {
        let mut retry_count = 0;

        loop {
            while self.rate_limiter.check().is_err() {
                thread::sleep(Duration::from_millis(50));
            }

            let response = ureq::get(url)
                .set("User-Agent", "league_roaster/0.1.0")
                .set("X-Riot-Token", &self.api_key)
                .call();

            match response {
                Ok(resp) => {
                    return resp.into_string().map_err(|e| {
                        AppError::HttpError(e.to_string())
                    });
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = 2000 * (retry_count + 1) as u64;
                    tracing::warn!(wait_ms, "rate limited by Riot, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(404, _)) => {
                    return Err(AppError::ApiError(format!("not found: {}", redact(url))));
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(AppError::ApiError(format!("Riot API returned HTTP {}", code)));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    pub fn get_account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        // account-v1 is not served from the sea cluster
        let routing = match self.regional_routing() {
            "sea" => "asia",
            other => other,
        };
        let url = format!(
            "https://{}.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{}/{}",
            routing, encode_segment(game_name), encode_segment(tag_line)
        );

        let body = self.execute_request(&url).map_err(|e| match e {
            AppError::ApiError(_) => AppError::PlayerNotFound(format!("{}#{}", game_name, tag_line)),
            other => other,
        })?;
        serde_json::from_str(&body).map_err(|_| {
            AppError::PlayerNotFound(format!("{}#{}", game_name, tag_line))
        })
    }

    pub fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/match/v5/matches/by-puuid/{}/ids?start=0&count={}",
            self.regional_routing(), puuid, count
        );

        let body = self.execute_request(&url)?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::JsonError(e.to_string())
        })
    }

    pub fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/match/v5/matches/{}",
            self.regional_routing(), match_id
        );

        let body = self.execute_request(&url)?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::JsonError(e.to_string())
        })
    }

    /// Fetches and converts one match. `None` when the player is not among
    /// the participants.
    pub fn fetch_match(&self, match_id: &str, puuid: &str) -> Result<Option<FetchedMatch>, AppError> {
        let dto = self.get_match(match_id)?;
        let Some(participant) = dto.participant(puuid) else {
            tracing::warn!(match_id, "player missing from participants, skipping");
            return Ok(None);
        };

        let record = MatchRecord::from_participant(participant, dto.info.game_duration)?;
        Ok(Some(FetchedMatch {
            id: dto.metadata.match_id,
            game_creation: dto.info.game_creation,
            record,
        }))
    }
}

pub fn regional_routing(platform: &str) -> &'static str {
    match platform.to_ascii_lowercase().as_str() {
        "na1" | "br1" | "la1" | "la2" => "americas",
        "euw1" | "eun1" | "tr1" | "ru" | "me1" => "europe",
        "kr" | "jp1" => "asia",
        "oc1" | "ph2" | "sg2" | "th2" | "tw2" | "vn2" => "sea",
        _ => "americas",
    }
}

fn encode_segment(segment: &str) -> String {
    segment
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

// Resource family of a Riot URL, used in place of the full path in errors.
fn redact(url: &str) -> &str {
    url.split("/lol/")
        .nth(1)
        .or_else(|| url.split("/riot/").nth(1))
        .and_then(|path| path.split('/').next())
        .unwrap_or("resource")
}
