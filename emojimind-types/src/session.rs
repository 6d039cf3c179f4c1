use chrono::{DateTime, Utc};

use crate::TierMap;

/// Transient per-session game state, passed explicitly into the round
/// controller rather than living in ambient request state.
///
/// `active_word` is a single slot shared across tiers: rendering a new
/// round overwrites it, and a submission without one is a stale session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSession {
    /// Mirror of the persisted global start time, restored on new sessions.
    pub start_time: Option<DateTime<Utc>>,
    /// The target word of the round currently being played.
    pub active_word: Option<String>,
    /// Submissions made per tier. Never reset within a tier.
    pub tries: TierMap<u32>,
    /// Whether the most recent submission per tier won.
    pub last_win: TierMap<bool>,
}
