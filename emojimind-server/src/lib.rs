use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, warn};
use warp::http::{StatusCode, Uri};
use warp::{Filter, Reply};

use emojimind_core::{
    GuessOracle, HomeView, TimerSync, apply_submission, check_expiry, finalize_attempt,
    gate_round, home_view, outcome_flags, sync_timer, validate_emoji_input,
};
use emojimind_persistence::repositories::{
    AttemptRepository, ProgressRepository, UserRepository, WordRepository,
};
use emojimind_types::Difficulty;

use crate::auth::GoogleAuthService;
use crate::session::{SESSION_COOKIE, Session, SessionStore};

pub mod auth;
pub mod config;
pub mod oracle;
pub mod pages;
pub mod session;

/// Everything a request handler needs, shared behind one Arc.
pub struct AppState {
    pub users: UserRepository,
    pub words: WordRepository,
    pub progress: ProgressRepository,
    pub attempts: AttemptRepository,
    pub sessions: SessionStore,
    pub auth: GoogleAuthService,
    pub oracle: Arc<dyn GuessOracle>,
}

#[derive(Deserialize)]
struct PlayForm {
    emojis: String,
}

#[derive(Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

pub fn create_routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map({
        let state = state.clone();
        move || state.clone()
    });

    let home = warp::path::end()
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(state_filter.clone())
        .and_then(handle_home);

    let play_form = warp::path!("play" / String)
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(state_filter.clone())
        .and_then(handle_play_form);

    let play_submit = warp::path!("play" / String)
        .and(warp::post())
        .and(warp::body::form::<PlayForm>())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(state_filter.clone())
        .and_then(handle_play_submit);

    let result = warp::path!("result" / String)
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(state_filter.clone())
        .and_then(handle_result);

    let login = warp::path!("auth" / "login")
        .and(warp::get())
        .map(|| warp::reply::html(pages::login_page()));

    let google = warp::path!("auth" / "google")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(handle_google_redirect);

    let callback = warp::path!("auth" / "callback")
        .and(warp::get())
        .and(warp::query::<CallbackQuery>())
        .and(state_filter.clone())
        .and_then(handle_callback);

    let logout = warp::path!("auth" / "logout")
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(state_filter.clone())
        .and_then(handle_logout);

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    home.or(play_form)
        .or(play_submit)
        .or(result)
        .or(login)
        .or(google)
        .or(callback)
        .or(logout)
        .or(health)
        .with(warp::log("emojimind"))
}

fn redirect_home() -> warp::reply::Response {
    warp::redirect::see_other(Uri::from_static("/")).into_response()
}

fn redirect_login() -> warp::reply::Response {
    warp::redirect::see_other(Uri::from_static("/auth/login")).into_response()
}

fn result_uri(tier: Difficulty) -> Uri {
    match tier {
        Difficulty::Easy => Uri::from_static("/result/easy"),
        Difficulty::Medium => Uri::from_static("/result/medium"),
        Difficulty::Hard => Uri::from_static("/result/hard"),
    }
}

fn server_error(context: &str, err: anyhow::Error) -> warp::reply::Response {
    error!("Failed to {}: {:#}", context, err);
    warp::reply::with_status(
        warp::reply::html("<h1>Something went wrong</h1>"),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response()
}

fn authenticate(state: &AppState, session_id: Option<&String>) -> Option<(String, Session)> {
    let session_id = session_id?;
    let session = state.sessions.get(session_id)?;
    Some((session_id.clone(), session))
}

async fn handle_home(
    session_id: Option<String>,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let Some((session_id, mut session)) = authenticate(&state, session_id.as_ref()) else {
        return Ok(redirect_login());
    };

    let progress = match state.progress.get_or_create(session.user.id).await {
        Ok(progress) => progress,
        Err(err) => return Ok(server_error("load progress", err)),
    };

    match home_view(&progress) {
        HomeView::GameOver(reason) => {
            Ok(warp::reply::html(pages::game_over_page(reason)).into_response())
        }
        HomeView::Dashboard { completed, won } => {
            // Landing home mid-game drops the session's timer mirror; it is
            // restored from the persisted start on the next round entry.
            session.play.start_time = None;
            state.sessions.update_play(&session_id, session.play);
            Ok(warp::reply::html(pages::home_page(&session.user, completed, won)).into_response())
        }
    }
}

async fn handle_play_form(
    difficulty: String,
    session_id: Option<String>,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let Ok(tier) = difficulty.parse::<Difficulty>() else {
        return Ok(redirect_home());
    };
    let Some((session_id, mut session)) = authenticate(&state, session_id.as_ref()) else {
        return Ok(redirect_login());
    };

    let mut progress = match state.progress.get_or_create(session.user.id).await {
        Ok(progress) => progress,
        Err(err) => return Ok(server_error("load progress", err)),
    };

    if !gate_round(&progress, tier) {
        return Ok(redirect_home());
    }

    let now = Utc::now();
    if sync_timer(&mut progress, &mut session.play, now) == TimerSync::Started {
        if let Err(err) = state.progress.save(&progress).await {
            return Ok(server_error("start game timer", err));
        }
    }

    if check_expiry(&mut progress, now) {
        if let Err(err) = state.progress.save(&progress).await {
            return Ok(server_error("record expiry", err));
        }
        state.sessions.update_play(&session_id, session.play);
        return Ok(redirect_home());
    }

    // New round: pick a word and make it the session's active target.
    let word = match state.words.pick_random(tier).await {
        Ok(word) => word,
        Err(err) => return Ok(server_error("pick word", err)),
    };
    let Some(word) = word else {
        state.sessions.update_play(&session_id, session.play);
        return Ok(warp::reply::html(pages::no_words_page(tier)).into_response());
    };

    session.play.active_word = Some(word.clone());
    let tries = *session.play.tries.get(tier);
    state.sessions.update_play(&session_id, session.play);

    Ok(warp::reply::html(pages::play_page(tier, &word, tries, None)).into_response())
}

async fn handle_play_submit(
    difficulty: String,
    form: PlayForm,
    session_id: Option<String>,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let Ok(tier) = difficulty.parse::<Difficulty>() else {
        return Ok(redirect_home());
    };
    let Some((session_id, mut session)) = authenticate(&state, session_id.as_ref()) else {
        return Ok(redirect_login());
    };

    let mut progress = match state.progress.get_or_create(session.user.id).await {
        Ok(progress) => progress,
        Err(err) => return Ok(server_error("load progress", err)),
    };

    if !gate_round(&progress, tier) {
        return Ok(redirect_home());
    }

    let now = Utc::now();
    if sync_timer(&mut progress, &mut session.play, now) == TimerSync::Started {
        if let Err(err) = state.progress.save(&progress).await {
            return Ok(server_error("start game timer", err));
        }
    }

    // No active word means the session went stale mid-round.
    let Some(word) = session.play.active_word.clone() else {
        state.sessions.update_play(&session_id, session.play);
        return Ok(redirect_home());
    };

    let emojis = match validate_emoji_input(&form.emojis, tier) {
        Ok(emojis) => emojis,
        Err(err) => {
            let tries = *session.play.tries.get(tier);
            state.sessions.update_play(&session_id, session.play);
            return Ok(warp::reply::html(pages::play_page(
                tier,
                &word,
                tries,
                Some(&err.to_string()),
            ))
            .into_response());
        }
    };

    let guesses = match state.oracle.guess(&emojis, tier).await {
        Ok(guesses) => guesses,
        Err(err) => {
            // An unreachable or slow oracle costs the player this attempt
            // rather than the request.
            warn!("Guess oracle failed: {:#}", err);
            Vec::new()
        }
    };

    let outcome = apply_submission(
        &mut progress,
        &mut session.play,
        tier,
        &word,
        &emojis,
        guesses,
        Utc::now(),
    );

    if let Err(err) = state.attempts.create(&outcome.attempt).await {
        return Ok(server_error("record attempt", err));
    }
    if outcome.progress_dirty {
        if let Err(err) = state.progress.save(&progress).await {
            return Ok(server_error("save progress", err));
        }
    }
    state.sessions.update_play(&session_id, session.play);

    Ok(warp::redirect::see_other(result_uri(tier)).into_response())
}

async fn handle_result(
    difficulty: String,
    session_id: Option<String>,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let Ok(tier) = difficulty.parse::<Difficulty>() else {
        return Ok(redirect_home());
    };
    let Some((_, session)) = authenticate(&state, session_id.as_ref()) else {
        return Ok(redirect_login());
    };

    let mut progress = match state.progress.get_or_create(session.user.id).await {
        Ok(progress) => progress,
        Err(err) => return Ok(server_error("load progress", err)),
    };

    let win = *session.play.last_win.get(tier);
    let tries = *session.play.tries.get(tier);

    let attempt = match state.attempts.latest_for(session.user.id, tier).await {
        Ok(attempt) => attempt,
        Err(err) => return Ok(server_error("load attempt", err)),
    };

    let attempt = if let Some(mut attempt) = attempt {
        let correction = finalize_attempt(&mut attempt, &mut progress, Utc::now());
        if correction.attempt_changed {
            if let Err(err) = state.attempts.update_timing(&attempt).await {
                return Ok(server_error("finalize attempt", err));
            }
        }
        if correction.progress_changed {
            if let Err(err) = state.progress.save(&progress).await {
                return Ok(server_error("save progress", err));
            }
        }
        Some(attempt)
    } else {
        None
    };

    let flags = outcome_flags(&progress, tries, win);
    Ok(warp::reply::html(pages::result_page(
        tier,
        win,
        tries,
        attempt.as_ref(),
        progress.game_expired,
        flags,
    ))
    .into_response())
}

async fn handle_google_redirect(
    state: Arc<AppState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let url = state.auth.authorize_url(&state.sessions.begin_login());
    match url.parse::<Uri>() {
        Ok(uri) => Ok(warp::redirect::see_other(uri).into_response()),
        Err(err) => Ok(server_error("build consent URL", anyhow::anyhow!(err))),
    }
}

async fn handle_callback(
    query: CallbackQuery,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    if let Some(err) = query.error {
        warn!("OAuth callback returned error: {}", err);
        return Ok(warp::reply::html(pages::login_error_page()).into_response());
    }
    let (Some(code), Some(login_state)) = (query.code, query.state) else {
        warn!("OAuth callback missing code or state");
        return Ok(warp::reply::html(pages::login_error_page()).into_response());
    };
    if !state.sessions.take_login_state(&login_state) {
        warn!("OAuth callback with unknown login state");
        return Ok(warp::reply::html(pages::login_error_page()).into_response());
    }

    let id_token = match state.auth.exchange_code(&code).await {
        Ok(token) => token,
        Err(err) => {
            warn!("Code exchange failed: {}", err);
            return Ok(warp::reply::html(pages::login_error_page()).into_response());
        }
    };
    let profile = match state.auth.validate_id_token(&id_token).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!("ID token validation failed: {}", err);
            return Ok(warp::reply::html(pages::login_error_page()).into_response());
        }
    };

    let user = match state.users.get_or_create(&profile.email, &profile.display_name).await {
        Ok(user) => user,
        Err(err) => return Ok(server_error("create user", err)),
    };

    tracing::info!("User {} signed in", user.email);
    let session_id = state.sessions.create(user);

    Ok(warp::reply::with_header(
        warp::redirect::see_other(Uri::from_static("/")),
        "set-cookie",
        format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax"),
    )
    .into_response())
}

async fn handle_logout(
    session_id: Option<String>,
    state: Arc<AppState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    if let Some(session_id) = session_id {
        state.sessions.remove(&session_id);
    }

    Ok(warp::reply::with_header(
        warp::redirect::see_other(Uri::from_static("/")),
        "set-cookie",
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0"),
    )
    .into_response())
}
