use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TierMap;

/// Overall game progress for one user. Created lazily on first access,
/// mutated only by the round controller, never deleted.
///
/// Invariants: `game_completed` only when all three tiers are completed;
/// `game_won` only when `game_completed` and all three tiers were won; once
/// `game_expired` is set no further round may be played.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProgress {
    pub user_id: Uuid,
    pub game_started: bool,
    pub game_start_time: Option<DateTime<Utc>>,
    pub game_end_time: Option<DateTime<Utc>>,
    pub total_time_taken: Option<Duration>,
    pub completed: TierMap<bool>,
    pub won: TierMap<bool>,
    pub game_completed: bool,
    pub game_won: bool,
    pub game_expired: bool,
}

impl UserProgress {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            game_started: false,
            game_start_time: None,
            game_end_time: None,
            total_time_taken: None,
            completed: TierMap::default(),
            won: TierMap::default(),
            game_completed: false,
            game_won: false,
            game_expired: false,
        }
    }
}

/// Why the overall game is over, for the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    TimeExpired,
    WonAll,
    LostGame,
}
