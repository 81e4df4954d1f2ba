use crate::api::models::ParticipantDto;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One match from the tracked player's point of view.
///
/// Fields are private so every record goes through [`MatchRecord::new`],
/// including the ones read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMatchRecord")]
pub struct MatchRecord {
    champion: String,
    role: String,
    kills: u32,
    deaths: u32,
    assists: u32,
    cs: u32,
    gold_per_min: f64,
    damage: u32,
    win: bool,
}

// Wire shape; signed so negative counts reach validation instead of a
// generic serde error.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatchRecord {
    champion: String,
    #[serde(default)]
    role: String,
    kills: i64,
    deaths: i64,
    assists: i64,
    cs: i64,
    gold_per_min: f64,
    damage: i64,
    win: bool,
}

impl TryFrom<RawMatchRecord> for MatchRecord {
    type Error = AppError;

    fn try_from(raw: RawMatchRecord) -> Result<Self, Self::Error> {
        MatchRecord::new(
            raw.champion,
            raw.role,
            count("kills", raw.kills)?,
            count("deaths", raw.deaths)?,
            count("assists", raw.assists)?,
            count("cs", raw.cs)?,
            raw.gold_per_min,
            count("damage", raw.damage)?,
            raw.win,
        )
    }
}

fn count(field: &str, value: i64) -> Result<u32, AppError> {
    u32::try_from(value)
        .map_err(|_| AppError::InvalidRecord(format!("{} must be a non-negative count, got {}", field, value)))
}

impl MatchRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        champion: impl Into<String>,
        role: impl Into<String>,
        kills: u32,
        deaths: u32,
        assists: u32,
        cs: u32,
        gold_per_min: f64,
        damage: u32,
        win: bool,
    ) -> Result<Self, AppError> {
        let champion = champion.into();
        if champion.trim().is_empty() {
            return Err(AppError::InvalidRecord("champion name is empty".to_string()));
        }
        if !gold_per_min.is_finite() || gold_per_min < 0.0 {
            return Err(AppError::InvalidRecord(format!(
                "goldPerMin must be a non-negative number, got {}",
                gold_per_min
            )));
        }

        Ok(MatchRecord {
            champion,
            role: role.into(),
            kills,
            deaths,
            assists,
            cs,
            gold_per_min,
            damage,
            win,
        })
    }

    /// Builds a record from the tracked player's entry in a Match V5 payload.
    pub fn from_participant(p: &ParticipantDto, game_duration_secs: i64) -> Result<Self, AppError> {
        if game_duration_secs <= 0 {
            return Err(AppError::InvalidRecord(format!(
                "game duration must be positive, got {}s",
                game_duration_secs
            )));
        }

        let minutes = game_duration_secs as f64 / 60.0;
        let gold_earned = count("goldEarned", p.gold_earned.into())?;
        let cs = count("totalMinionsKilled", p.total_minions_killed.into())?
            + count("neutralMinionsKilled", p.neutral_minions_killed.into())?;

        MatchRecord::new(
            p.champion_name.clone(),
            p.team_position.clone(),
            count("kills", p.kills.into())?,
            count("deaths", p.deaths.into())?,
            count("assists", p.assists.into())?,
            cs,
            gold_earned as f64 / minutes,
            count("totalDamageDealtToChampions", p.total_damage_dealt_to_champions.into())?,
            p.win,
        )
    }

    pub fn champion(&self) -> &str {
        &self.champion
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn assists(&self) -> u32 {
        self.assists
    }

    pub fn cs(&self) -> u32 {
        self.cs
    }

    pub fn gold_per_min(&self) -> f64 {
        self.gold_per_min
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn win(&self) -> bool {
        self.win
    }

    /// (kills + assists) / max(deaths, 1). A deathless game counts as one death.
    pub fn kda(&self) -> f64 {
        (u64::from(self.kills) + u64::from(self.assists)) as f64 / self.deaths.max(1) as f64
    }
}
