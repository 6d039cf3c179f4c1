//! Minimal server-rendered pages. The game is form posts and redirects;
//! everything here is plain HTML with no client-side state.

use chrono::Duration;

use emojimind_core::RoundOutcome;
use emojimind_types::{Difficulty, GameOverReason, RoundAttempt, TierMap, User};

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Emojimind</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_duration(duration: Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn login_page() -> String {
    layout(
        "Sign in",
        "<h1>Emojimind</h1>\
         <p>Describe a secret word with emojis and see if the AI can guess it.</p>\
         <p><a href=\"/auth/google\">Sign in with Google</a></p>",
    )
}

pub fn login_error_page() -> String {
    layout(
        "Sign in failed",
        "<h1>Sign in failed</h1>\
         <p>Something went wrong signing you in.</p>\
         <p><a href=\"/auth/login\">Try again</a></p>",
    )
}

pub fn home_page(user: &User, completed: TierMap<bool>, won: TierMap<bool>) -> String {
    let mut rows = String::new();
    for tier in Difficulty::ALL {
        let status = if *completed.get(tier) {
            if *won.get(tier) { "won" } else { "lost" }
        } else {
            "open"
        };
        let action = if *completed.get(tier) {
            String::new()
        } else {
            format!(" <a href=\"/play/{tier}\">Play</a>")
        };
        rows.push_str(&format!("<li>{tier}: {status}{action}</li>\n"));
    }

    let body = format!(
        "<h1>Emojimind</h1>\
         <p>Signed in as {}. <a href=\"/auth/logout\">Sign out</a></p>\
         <p>You have ten minutes to clear all three difficulties. The timer \
         starts with your first round.</p>\
         <ul>\n{rows}</ul>",
        escape_html(&user.display_name)
    );
    layout("Home", &body)
}

pub fn game_over_page(reason: GameOverReason) -> String {
    let (title, message) = match reason {
        GameOverReason::TimeExpired => (
            "Time expired",
            "Your ten minutes are up. Thanks for playing!",
        ),
        GameOverReason::WonAll => (
            "You won!",
            "The AI guessed every word from your emojis. A perfect game!",
        ),
        GameOverReason::LostGame => (
            "Game over",
            "All difficulties played, but the AI missed at least one word.",
        ),
    };
    layout(title, &format!("<h1>{title}</h1>\n<p>{message}</p>"))
}

pub fn play_page(tier: Difficulty, word: &str, tries: u32, error: Option<&str>) -> String {
    let tries_left = emojimind_core::MAX_TRIES.saturating_sub(tries);
    let error_html = error
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape_html(message)))
        .unwrap_or_default();

    let body = format!(
        "<h1>Difficulty: {tier}</h1>\
         <p>Your word is <strong>{}</strong>.</p>\
         <p>Describe it with up to {} emojis. Tries left: {tries_left}.</p>\n{error_html}\
         <form method=\"post\" action=\"/play/{tier}\">\n\
         <input type=\"text\" name=\"emojis\" placeholder=\"e.g. 💻☁️📡\" autofocus>\n\
         <button type=\"submit\">Submit</button>\n</form>\n\
         <p><a href=\"/\">Back to home</a></p>",
        escape_html(word),
        tier.emoji_limit()
    );
    layout(&format!("Play {tier}"), &body)
}

pub fn no_words_page(tier: Difficulty) -> String {
    let body = format!(
        "<h1>No words available</h1>\
         <p>There are no {tier} words to play right now.</p>\
         <p><a href=\"/\">Back to home</a></p>"
    );
    layout("No words", &body)
}

pub fn result_page(
    tier: Difficulty,
    win: bool,
    tries: u32,
    attempt: Option<&RoundAttempt>,
    expired: bool,
    flags: RoundOutcome,
) -> String {
    let headline = if expired {
        "Time expired"
    } else if win {
        "The AI got it!"
    } else {
        "No luck this time"
    };

    let mut body = format!("<h1>{headline}</h1>\n<p>Difficulty: {tier}. Tries used: {tries}.</p>\n");

    if let Some(attempt) = attempt {
        body.push_str(&format!(
            "<p>Your word was <strong>{}</strong>, your emojis: {}</p>\n",
            escape_html(&attempt.word),
            escape_html(&attempt.emoji_input)
        ));
        if attempt.guesses.is_empty() {
            body.push_str("<p>The AI had no guesses.</p>\n");
        } else {
            body.push_str("<p>The AI guessed:</p>\n<ol>\n");
            for guess in &attempt.guesses {
                body.push_str(&format!("<li>{}</li>\n", escape_html(guess)));
            }
            body.push_str("</ol>\n");
        }
        if let Some(taken) = attempt.time_taken {
            body.push_str(&format!("<p>Time used: {}</p>\n", format_duration(taken)));
        }
    }

    if flags.show_try_again {
        body.push_str(&format!("<p><a href=\"/play/{tier}\">Try again</a></p>\n"));
    }
    if flags.show_next_difficulty {
        if let Some(next) = tier.next() {
            body.push_str(&format!("<p><a href=\"/play/{next}\">Next difficulty: {next}</a></p>\n"));
        }
    }
    body.push_str("<p><a href=\"/\">Back to home</a></p>");

    layout(&format!("Result {tier}"), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"a&b\"</b>"),
            "&lt;b&gt;&quot;a&amp;b&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(65)), "1:05");
        assert_eq!(format_duration(Duration::minutes(10)), "10:00");
        assert_eq!(format_duration(Duration::seconds(-3)), "0:00");
    }

    #[test]
    fn test_play_page_shows_word_and_error() {
        let page = play_page(Difficulty::Easy, "Sun", 1, Some("Please enter emoji only."));
        assert!(page.contains("Sun"));
        assert!(page.contains("Please enter emoji only."));
        assert!(page.contains("Tries left: 2"));
        assert!(page.contains("action=\"/play/easy\""));
    }
}
