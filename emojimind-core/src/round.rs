use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use emojimind_types::{
    Difficulty, GameOverReason, PlayerSession, RoundAttempt, TierMap, UserProgress,
};

/// A tier is over after this many submissions, win or not.
pub const MAX_TRIES: u32 = 3;

/// The single game-wide time budget covering all three tiers.
pub fn time_limit() -> Duration {
    Duration::minutes(10)
}

/// Whether the user may play this tier at all. False when the overall game
/// is expired or completed, or the tier itself is already done.
pub fn gate_round(progress: &UserProgress, tier: Difficulty) -> bool {
    if progress.game_expired || progress.game_completed {
        return false;
    }
    !*progress.completed.get(tier)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSync {
    /// First-ever round: the global timer starts now. Persist progress.
    Started,
    /// The session lost its mirror; restored from the persisted start.
    Restored,
    Unchanged,
}

/// Start the global timer on a user's first round, or restore the session
/// mirror from the persisted start time when a new session shows up
/// mid-game.
pub fn sync_timer(
    progress: &mut UserProgress,
    session: &mut PlayerSession,
    now: DateTime<Utc>,
) -> TimerSync {
    if session.start_time.is_some() {
        return TimerSync::Unchanged;
    }

    if !progress.game_started {
        progress.game_started = true;
        progress.game_start_time = Some(now);
        session.start_time = Some(now);
        return TimerSync::Started;
    }

    if let Some(start) = progress.game_start_time {
        session.start_time = Some(start);
        return TimerSync::Restored;
    }

    TimerSync::Unchanged
}

/// Expire the overall game when more than the time limit has elapsed since
/// the global start. Returns true when progress was just transitioned;
/// the caller persists and redirects home.
pub fn check_expiry(progress: &mut UserProgress, now: DateTime<Utc>) -> bool {
    let Some(start) = progress.game_start_time else {
        return false;
    };
    if now <= start + time_limit() {
        return false;
    }
    expire(progress, start);
    true
}

// End time freezes at start+limit and total time at exactly the limit.
fn expire(progress: &mut UserProgress, start: DateTime<Utc>) {
    tracing::debug!("Game expired for user {}", progress.user_id);
    progress.game_expired = true;
    progress.game_end_time = Some(start + time_limit());
    progress.total_time_taken = Some(time_limit());
}

#[derive(Debug)]
pub struct SubmissionResult {
    pub attempt: RoundAttempt,
    pub tries_after: u32,
    pub tier_completed: bool,
    /// Whether progress was mutated and must be persisted.
    pub progress_dirty: bool,
}

/// Record one emoji submission: decide the win, apply the ten-minute
/// window, build the attempt row, and advance tier/overall completion.
///
/// Expiry pre-empts winning: a guess landing past the window produces an
/// expired, unfinished attempt with timing frozen at the limit, and forces
/// the overall game into the expired state.
pub fn apply_submission(
    progress: &mut UserProgress,
    session: &mut PlayerSession,
    tier: Difficulty,
    word: &str,
    emoji_input: &str,
    guesses: Vec<String>,
    now: DateTime<Utc>,
) -> SubmissionResult {
    let target = word.to_lowercase();
    let win = guesses.iter().any(|g| g.to_lowercase() == target);

    let start = progress.game_start_time.unwrap_or(now);
    let deadline = start + time_limit();
    let expired = now > deadline;
    let finished = !expired;

    let (end_time, time_taken) = if expired {
        (deadline, time_limit())
    } else {
        (now, now - start)
    };

    if expired {
        expire(progress, start);
    }

    let tries_after = session.tries.get(tier) + 1;

    let attempt = RoundAttempt {
        id: Uuid::new_v4(),
        user_id: progress.user_id,
        difficulty: tier,
        word: word.to_string(),
        emoji_input: emoji_input.to_string(),
        guesses,
        win,
        start_time: Some(start),
        end_time: Some(end_time),
        time_taken: Some(time_taken),
        finished,
        expired,
        tries: tries_after,
        total_words: 0,
        solved_words: 0,
        score: 0,
    };

    let tier_completed = win || tries_after >= MAX_TRIES;
    if tier_completed {
        progress.completed.set(tier, true);
        progress.won.set(tier, win);

        if progress.completed.all(|done| done) {
            progress.game_completed = true;
            progress.game_end_time = Some(now);
            if progress.won.all(|won| won) {
                progress.game_won = true;
            }
        }
    }

    session.tries.set(tier, tries_after);
    session.last_win.set(tier, win);

    SubmissionResult {
        attempt,
        tries_after,
        tier_completed,
        progress_dirty: expired || tier_completed,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalizeResult {
    pub attempt_changed: bool,
    pub progress_changed: bool,
}

/// The result view's one-time correction: an attempt the round handler
/// left unfinished is finished now when still inside the window, or marked
/// expired with frozen timing otherwise (propagating overall expiry).
/// Finished attempts are left untouched, so re-rendering is idempotent.
pub fn finalize_attempt(
    attempt: &mut RoundAttempt,
    progress: &mut UserProgress,
    now: DateTime<Utc>,
) -> FinalizeResult {
    if attempt.finished {
        return FinalizeResult::default();
    }
    let Some(start) = progress.game_start_time else {
        return FinalizeResult::default();
    };

    let deadline = start + time_limit();
    if now <= deadline {
        attempt.end_time = Some(now);
        attempt.time_taken = Some(now - start);
        attempt.finished = true;
        attempt.expired = false;
        FinalizeResult {
            attempt_changed: true,
            progress_changed: false,
        }
    } else {
        attempt.end_time = Some(deadline);
        attempt.time_taken = Some(time_limit());
        attempt.finished = false;
        attempt.expired = true;
        expire(progress, start);
        FinalizeResult {
            attempt_changed: true,
            progress_changed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    /// The tier round is over: three tries used or a win occurred.
    pub complete: bool,
    pub show_try_again: bool,
    pub show_next_difficulty: bool,
}

pub fn outcome_flags(progress: &UserProgress, tries: u32, win: bool) -> RoundOutcome {
    let complete = tries >= MAX_TRIES || win;
    RoundOutcome {
        complete,
        show_try_again: tries < MAX_TRIES && !win && !progress.game_expired,
        show_next_difficulty: complete && !progress.game_expired && !progress.game_completed,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HomeView {
    GameOver(GameOverReason),
    Dashboard {
        completed: TierMap<bool>,
        won: TierMap<bool>,
    },
}

pub fn home_view(progress: &UserProgress) -> HomeView {
    if progress.game_expired {
        return HomeView::GameOver(GameOverReason::TimeExpired);
    }
    if progress.game_completed {
        if progress.game_won {
            return HomeView::GameOver(GameOverReason::WonAll);
        }
        return HomeView::GameOver(GameOverReason::LostGame);
    }
    HomeView::Dashboard {
        completed: progress.completed,
        won: progress.won,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_progress() -> UserProgress {
        UserProgress::new(Uuid::new_v4())
    }

    fn started_progress(start: DateTime<Utc>) -> (UserProgress, PlayerSession) {
        let mut progress = test_progress();
        progress.game_started = true;
        progress.game_start_time = Some(start);
        let session = PlayerSession {
            start_time: Some(start),
            ..PlayerSession::default()
        };
        (progress, session)
    }

    #[test]
    fn test_gate_rejects_expired_and_completed() {
        let mut progress = test_progress();
        assert!(gate_round(&progress, Difficulty::Easy));

        progress.game_expired = true;
        assert!(!gate_round(&progress, Difficulty::Easy));

        let mut progress = test_progress();
        progress.game_completed = true;
        assert!(!gate_round(&progress, Difficulty::Easy));

        let mut progress = test_progress();
        progress.completed.set(Difficulty::Medium, true);
        assert!(!gate_round(&progress, Difficulty::Medium));
        assert!(gate_round(&progress, Difficulty::Hard));
    }

    #[test]
    fn test_sync_timer_starts_once() {
        let mut progress = test_progress();
        let mut session = PlayerSession::default();
        let now = Utc::now();

        assert_eq!(sync_timer(&mut progress, &mut session, now), TimerSync::Started);
        assert!(progress.game_started);
        assert_eq!(progress.game_start_time, Some(now));
        assert_eq!(session.start_time, Some(now));

        // Subsequent calls with a live session are no-ops.
        assert_eq!(
            sync_timer(&mut progress, &mut session, now + Duration::seconds(5)),
            TimerSync::Unchanged
        );
        assert_eq!(progress.game_start_time, Some(now));
    }

    #[test]
    fn test_sync_timer_restores_lost_session() {
        let start = Utc::now() - Duration::minutes(3);
        let (mut progress, _) = started_progress(start);

        let mut fresh_session = PlayerSession::default();
        assert_eq!(
            sync_timer(&mut progress, &mut fresh_session, Utc::now()),
            TimerSync::Restored
        );
        assert_eq!(fresh_session.start_time, Some(start));
    }

    #[test]
    fn test_check_expiry_within_window() {
        let start = Utc::now();
        let (mut progress, _) = started_progress(start);

        assert!(!check_expiry(&mut progress, start + Duration::minutes(9)));
        assert!(!progress.game_expired);

        // Exactly at the deadline is still in time.
        assert!(!check_expiry(&mut progress, start + time_limit()));
        assert!(!progress.game_expired);
    }

    #[test]
    fn test_check_expiry_past_window_freezes_timing() {
        let start = Utc::now();
        let (mut progress, _) = started_progress(start);

        assert!(check_expiry(&mut progress, start + Duration::minutes(11)));
        assert!(progress.game_expired);
        assert_eq!(progress.game_end_time, Some(start + time_limit()));
        assert_eq!(progress.total_time_taken, Some(time_limit()));
    }

    #[test]
    fn test_win_is_case_insensitive() {
        let start = Utc::now() - Duration::minutes(2);
        let (mut progress, mut session) = started_progress(start);

        let result = apply_submission(
            &mut progress,
            &mut session,
            Difficulty::Easy,
            "Sun",
            "☀️",
            vec!["SUN".to_string(), "Light".to_string()],
            Utc::now(),
        );
        assert!(result.attempt.win);
        assert!(result.tier_completed);
    }

    #[test]
    fn test_losing_submission_records_attempt() {
        let start = Utc::now() - Duration::minutes(2);
        let now = Utc::now();
        let (mut progress, mut session) = started_progress(start);

        let result = apply_submission(
            &mut progress,
            &mut session,
            Difficulty::Easy,
            "Sun",
            "🌊",
            vec!["Wave".to_string(), "Ocean".to_string()],
            now,
        );

        assert!(!result.attempt.win);
        assert!(result.attempt.finished);
        assert!(!result.attempt.expired);
        assert_eq!(result.attempt.time_taken, Some(now - start));
        assert_eq!(result.tries_after, 1);
        assert!(!result.tier_completed);
        assert!(!result.progress_dirty);
        assert_eq!(*session.tries.get(Difficulty::Easy), 1);
        assert!(!*session.last_win.get(Difficulty::Easy));
    }

    #[test]
    fn test_tries_exhaustion_completes_tier_as_lost() {
        let start = Utc::now() - Duration::minutes(1);
        let (mut progress, mut session) = started_progress(start);

        for try_number in 1..=MAX_TRIES {
            let result = apply_submission(
                &mut progress,
                &mut session,
                Difficulty::Hard,
                "Democracy",
                "🗳️",
                vec!["Vote".to_string()],
                Utc::now(),
            );
            assert_eq!(result.tries_after, try_number);
            assert_eq!(result.tier_completed, try_number == MAX_TRIES);
        }

        assert!(*progress.completed.get(Difficulty::Hard));
        assert!(!*progress.won.get(Difficulty::Hard));
    }

    #[test]
    fn test_completing_all_tiers_sets_overall_flags() {
        let start = Utc::now() - Duration::minutes(1);
        let (mut progress, mut session) = started_progress(start);
        progress.completed.set(Difficulty::Easy, true);
        progress.won.set(Difficulty::Easy, true);
        progress.completed.set(Difficulty::Medium, true);
        progress.won.set(Difficulty::Medium, true);

        // Third tier lost on tries: game completed but not won.
        for _ in 0..MAX_TRIES {
            apply_submission(
                &mut progress,
                &mut session,
                Difficulty::Hard,
                "Democracy",
                "🗳️",
                vec!["Vote".to_string()],
                Utc::now(),
            );
        }

        assert!(progress.game_completed);
        assert!(!progress.game_won);
        assert!(progress.game_end_time.is_some());
    }

    #[test]
    fn test_winning_all_tiers_sets_game_won() {
        let start = Utc::now() - Duration::minutes(1);
        let (mut progress, mut session) = started_progress(start);
        progress.completed.set(Difficulty::Easy, true);
        progress.won.set(Difficulty::Easy, true);
        progress.completed.set(Difficulty::Medium, true);
        progress.won.set(Difficulty::Medium, true);

        apply_submission(
            &mut progress,
            &mut session,
            Difficulty::Hard,
            "Democracy",
            "🗳️",
            vec!["Democracy".to_string()],
            Utc::now(),
        );

        assert!(progress.game_completed);
        assert!(progress.game_won);
    }

    #[test]
    fn test_expiry_preempts_win() {
        let start = Utc::now() - Duration::minutes(11);
        let (mut progress, mut session) = started_progress(start);

        let result = apply_submission(
            &mut progress,
            &mut session,
            Difficulty::Easy,
            "Sun",
            "☀️",
            vec!["Sun".to_string()],
            Utc::now(),
        );

        assert!(result.attempt.win);
        assert!(result.attempt.expired);
        assert!(!result.attempt.finished);
        assert_eq!(result.attempt.time_taken, Some(time_limit()));
        assert_eq!(result.attempt.end_time, Some(start + time_limit()));
        assert!(result.progress_dirty);
        assert!(progress.game_expired);
        assert_eq!(progress.total_time_taken, Some(time_limit()));
    }

    #[test]
    fn test_finalize_is_idempotent_for_finished_attempts() {
        let start = Utc::now() - Duration::minutes(2);
        let (mut progress, mut session) = started_progress(start);

        let mut attempt = apply_submission(
            &mut progress,
            &mut session,
            Difficulty::Easy,
            "Sun",
            "☀️",
            vec!["Sun".to_string()],
            Utc::now(),
        )
        .attempt;

        let before = attempt.clone();
        let result = finalize_attempt(&mut attempt, &mut progress, Utc::now());
        assert_eq!(result, FinalizeResult::default());
        assert_eq!(attempt, before);
    }

    #[test]
    fn test_finalize_finishes_within_window() {
        let start = Utc::now() - Duration::minutes(3);
        let (mut progress, _) = started_progress(start);
        let now = Utc::now();

        let mut attempt = unfinished_attempt(&progress, start);
        let result = finalize_attempt(&mut attempt, &mut progress, now);

        assert!(result.attempt_changed);
        assert!(!result.progress_changed);
        assert!(attempt.finished);
        assert!(!attempt.expired);
        assert_eq!(attempt.end_time, Some(now));
        assert_eq!(attempt.time_taken, Some(now - start));
    }

    #[test]
    fn test_finalize_expires_past_window() {
        let start = Utc::now() - Duration::minutes(12);
        let (mut progress, _) = started_progress(start);

        let mut attempt = unfinished_attempt(&progress, start);
        let result = finalize_attempt(&mut attempt, &mut progress, Utc::now());

        assert!(result.attempt_changed);
        assert!(result.progress_changed);
        assert!(!attempt.finished);
        assert!(attempt.expired);
        assert_eq!(attempt.time_taken, Some(time_limit()));
        assert!(progress.game_expired);
        assert_eq!(progress.game_end_time, Some(start + time_limit()));
    }

    fn unfinished_attempt(progress: &UserProgress, start: DateTime<Utc>) -> RoundAttempt {
        RoundAttempt {
            id: Uuid::new_v4(),
            user_id: progress.user_id,
            difficulty: Difficulty::Easy,
            word: "Sun".to_string(),
            emoji_input: "☀️".to_string(),
            guesses: vec!["Wave".to_string()],
            win: false,
            start_time: Some(start),
            end_time: None,
            time_taken: None,
            finished: false,
            expired: false,
            tries: 1,
            total_words: 0,
            solved_words: 0,
            score: 0,
        }
    }

    #[test]
    fn test_outcome_flags() {
        let progress = test_progress();

        let open = outcome_flags(&progress, 1, false);
        assert!(!open.complete);
        assert!(open.show_try_again);
        assert!(!open.show_next_difficulty);

        let won = outcome_flags(&progress, 1, true);
        assert!(won.complete);
        assert!(!won.show_try_again);
        assert!(won.show_next_difficulty);

        let exhausted = outcome_flags(&progress, 3, false);
        assert!(exhausted.complete);
        assert!(!exhausted.show_try_again);
        assert!(exhausted.show_next_difficulty);
    }

    #[test]
    fn test_outcome_flags_suppressed_when_game_over() {
        let mut progress = test_progress();
        progress.game_expired = true;
        let flags = outcome_flags(&progress, 1, false);
        assert!(!flags.show_try_again);
        assert!(!flags.show_next_difficulty);

        let mut progress = test_progress();
        progress.game_completed = true;
        let flags = outcome_flags(&progress, 3, true);
        assert!(flags.complete);
        assert!(!flags.show_next_difficulty);
    }

    #[test]
    fn test_home_view_reasons() {
        let mut progress = test_progress();
        assert!(matches!(home_view(&progress), HomeView::Dashboard { .. }));

        progress.game_completed = true;
        assert_eq!(
            home_view(&progress),
            HomeView::GameOver(GameOverReason::LostGame)
        );

        progress.game_won = true;
        assert_eq!(
            home_view(&progress),
            HomeView::GameOver(GameOverReason::WonAll)
        );

        // Expiry outranks completion on the home screen.
        progress.game_expired = true;
        assert_eq!(
            home_view(&progress),
            HomeView::GameOver(GameOverReason::TimeExpired)
        );
    }
}
