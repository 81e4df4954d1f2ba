use serde::Deserialize;

// Account V1 response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub tag_line: String,
}

// Match V5 response
#[derive(Debug, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub game_duration: i64, // seconds
    #[serde(default)]
    pub game_creation: i64, // epoch millis
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_name: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    #[serde(default)]
    pub total_minions_killed: i32,
    #[serde(default)]
    pub neutral_minions_killed: i32,
    pub gold_earned: i32,
    pub total_damage_dealt_to_champions: i32,
    #[serde(default)]
    pub team_position: String, // TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY
}

impl MatchDto {
    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCH_JSON: &str = r#"{
        "metadata": { "matchId": "NA1_1", "participants": ["me", "you"] },
        "info": {
            "gameDuration": 1800,
            "gameCreation": 1700000000000,
            "participants": [
                {
                    "puuid": "me", "championName": "Ahri", "win": true,
                    "kills": 10, "deaths": 2, "assists": 5,
                    "totalMinionsKilled": 170, "neutralMinionsKilled": 10,
                    "goldEarned": 12000, "totalDamageDealtToChampions": 20000,
                    "teamPosition": "MIDDLE", "teamId": 100
                },
                {
                    "puuid": "you", "championName": "Zed", "win": false,
                    "kills": 2, "deaths": 10, "assists": 1,
                    "goldEarned": 7000, "totalDamageDealtToChampions": 9000
                }
            ]
        }
    }"#;

    #[test]
    fn parses_match_and_finds_participant() {
        let dto: MatchDto = serde_json::from_str(MATCH_JSON).unwrap();
        assert_eq!(dto.metadata.match_id, "NA1_1");

        let me = dto.participant("me").unwrap();
        assert_eq!(me.champion_name, "Ahri");
        assert_eq!(me.total_minions_killed + me.neutral_minions_killed, 180);

        let you = dto.participant("you").unwrap();
        assert_eq!(you.team_position, "");
        assert!(dto.participant("nobody").is_none());
    }
}
