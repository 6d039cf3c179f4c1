use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::Difficulty;

/// One submitted emoji guess and its outcome. Append-only history: a row is
/// written once per submission and touched again only by the result view's
/// finalization pass when the round handler left `finished` unset.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub difficulty: Difficulty,
    pub word: String,
    pub emoji_input: String,
    pub guesses: Vec<String>,
    pub win: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub time_taken: Option<Duration>,
    pub finished: bool,
    pub expired: bool,
    /// Attempt count for this tier at the time of submission.
    pub tries: u32,
    pub total_words: i32,
    pub solved_words: i32,
    pub score: i32,
}
