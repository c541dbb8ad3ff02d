use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four legal move tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    Bomb,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Rock, Move::Paper, Move::Scissors, Move::Bomb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
            Move::Bomb => "bomb",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            "bomb" => Ok(Move::Bomb),
            other => Err(format!(
                "unknown move '{}' (expected rock, paper, scissors or bomb)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoveStatus {
    Valid,
    Invalid,
    Unclear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundWinner {
    User,
    Bot,
    Draw,
    /// No winner: the user's move was invalid or unclear and the turn is wasted.
    #[serde(rename = "None")]
    NoWinner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub user_bomb_used: bool,
}

/// Judgment for one round, exactly as the provider returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub round: u32,
    pub user_input: String,
    #[serde(deserialize_with = "nullable_move")]
    pub interpreted_user_move: Option<Move>,
    pub bot_move: Move,
    pub move_status: MoveStatus,
    pub round_winner: RoundWinner,
    pub explanation: String,
    pub state_update: StateUpdate,
}

// The prompt template spells the empty interpretation as `null` inside a string
// slot, so models answer with either JSON null or the string "null".
fn nullable_move<'de, D>(deserializer: D) -> Result<Option<Move>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().eq_ignore_ascii_case("null") => Ok(None),
        Some(s) => s.parse::<Move>().map(Some).map_err(|_| {
            serde::de::Error::custom(format!(
                "interpreted_user_move '{}' is not a legal move or null",
                s
            ))
        }),
    }
}

/// The two facts threaded between rounds of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub round: u32,
    pub user_bomb_used: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            round: 1,
            user_bomb_used: false,
        }
    }
}

impl SessionState {
    /// State for the next round: the counter moves forward by one and the bomb
    /// flag is taken verbatim from the judge. The counter stops at `u32::MAX`.
    pub fn advance(&self, update: &StateUpdate) -> SessionState {
        SessionState {
            round: self.round.saturating_add(1),
            user_bomb_used: update.user_bomb_used,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRequest {
    pub user_input: String,
    pub bot_move: Move,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    /// Ask the provider for a strict JSON body instead of free text.
    pub json_output: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            json_output: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub meta: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn verdict_json() -> serde_json::Value {
        json!({
            "round": 1,
            "user_input": "I choose the nuclear option",
            "interpreted_user_move": "bomb",
            "bot_move": "scissors",
            "move_status": "VALID",
            "round_winner": "User",
            "explanation": "Nuclear option reads as bomb; bomb beats scissors.",
            "state_update": { "user_bomb_used": true }
        })
    }

    #[test]
    fn parses_full_verdict() {
        let v: Verdict = serde_json::from_value(verdict_json()).unwrap();
        assert_eq!(v.interpreted_user_move, Some(Move::Bomb));
        assert_eq!(v.bot_move, Move::Scissors);
        assert_eq!(v.move_status, MoveStatus::Valid);
        assert_eq!(v.round_winner, RoundWinner::User);
        assert!(v.state_update.user_bomb_used);
    }

    #[test]
    fn interpreted_move_accepts_null_and_null_string() {
        let mut raw = verdict_json();
        raw["interpreted_user_move"] = serde_json::Value::Null;
        raw["round_winner"] = json!("None");
        raw["move_status"] = json!("UNCLEAR");
        let v: Verdict = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(v.interpreted_user_move, None);
        assert_eq!(v.round_winner, RoundWinner::NoWinner);

        raw["interpreted_user_move"] = json!("null");
        let v: Verdict = serde_json::from_value(raw).unwrap();
        assert_eq!(v.interpreted_user_move, None);
    }

    #[test]
    fn interpreted_move_rejects_unknown_token() {
        let mut raw = verdict_json();
        raw["interpreted_user_move"] = json!("lizard");
        let err = serde_json::from_value::<Verdict>(raw).unwrap_err();
        assert!(err.to_string().contains("lizard"));
    }

    #[test]
    fn winner_none_serializes_back_to_none() {
        let out = serde_json::to_value(RoundWinner::NoWinner).unwrap();
        assert_eq!(out, json!("None"));
    }

    #[test]
    fn advance_trusts_reported_bomb_flag() {
        let s = SessionState {
            round: 4,
            user_bomb_used: true,
        };
        let next = s.advance(&StateUpdate {
            user_bomb_used: false,
        });
        assert_eq!(
            next,
            SessionState {
                round: 5,
                user_bomb_used: false
            }
        );
        // the input state is untouched
        assert_eq!(s.round, 4);
    }

    #[test]
    fn advance_saturates_at_last_round() {
        let s = SessionState {
            round: u32::MAX,
            user_bomb_used: false,
        };
        let next = s.advance(&StateUpdate {
            user_bomb_used: true,
        });
        assert_eq!(next.round, u32::MAX);
        assert!(next.user_bomb_used);
    }

    #[test]
    fn move_from_str_is_case_insensitive() {
        assert_eq!("Scissors".parse::<Move>().unwrap(), Move::Scissors);
        assert_eq!(" BOMB ".parse::<Move>().unwrap(), Move::Bomb);
        assert!("lizard".parse::<Move>().is_err());
    }
}
