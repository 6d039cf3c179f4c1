use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use emojimind_core::{apply_submission, SubmissionResult};
use emojimind_types::{Difficulty, PlayerSession, UserProgress};

/// Creates progress with the global timer already running since `start`.
pub fn create_started_progress(start: DateTime<Utc>) -> (UserProgress, PlayerSession) {
    let mut progress = UserProgress::new(Uuid::new_v4());
    progress.game_started = true;
    progress.game_start_time = Some(start);

    let session = PlayerSession {
        start_time: Some(start),
        ..PlayerSession::default()
    };

    (progress, session)
}

/// Creates progress a few minutes into a live game.
pub fn create_live_game() -> (UserProgress, PlayerSession) {
    create_started_progress(Utc::now() - Duration::minutes(2))
}

/// Submits one guess round with the given oracle output.
pub fn submit(
    progress: &mut UserProgress,
    session: &mut PlayerSession,
    tier: Difficulty,
    word: &str,
    emojis: &str,
    guesses: &[&str],
) -> SubmissionResult {
    apply_submission(
        progress,
        session,
        tier,
        word,
        emojis,
        guesses.iter().map(|g| g.to_string()).collect(),
        Utc::now(),
    )
}

/// Marks a tier as already completed with the given outcome.
pub fn complete_tier(progress: &mut UserProgress, tier: Difficulty, won: bool) {
    progress.completed.set(tier, true);
    progress.won.set(tier, won);
}
