use anyhow::Result;
use async_trait::async_trait;

use emojimind_types::Difficulty;

/// The external guessing service: emoji text in, candidate words out.
///
/// Implementations return at most [`Difficulty::guess_limit`] entries and
/// do not case-normalize them; case-insensitive comparison is the round
/// controller's job.
#[async_trait]
pub trait GuessOracle: Send + Sync {
    async fn guess(&self, emojis: &str, difficulty: Difficulty) -> Result<Vec<String>>;
}

/// The instruction text sent to the model for one guess request.
pub fn build_prompt(emojis: &str, difficulty: Difficulty) -> String {
    format!(
        "You are an AI for an emoji guessing game. \
         The user will provide only emojis as input (no text, no numbers, no punctuation, only emojis). \
         Your task is to guess the most likely English word or phrase that the emojis represent, based on the given difficulty: {difficulty}. \
         If difficulty is easy, return top 2 words. If difficulty is medium, return top 5 words. If difficulty is hard, return top 10 words. \
         Return your guesses as a simple list, one word per line. Do not use quotation marks, brackets, or any special formatting. \
         Do not explain your reasoning, do not include any text except the words. \
         Example format:\nMouse\nRodent\nRat\n\nEmojis: {emojis}"
    )
}

/// Extract usable guesses from a free-form model response.
///
/// Lines are stripped of surrounding quotes, brackets, and whitespace; a
/// single-line comma-separated response is re-split on commas; a response
/// that yields nothing usable degrades to one entry of the raw trimmed
/// text. The result is capped at the tier's guess limit.
pub fn parse_guesses(raw: &str, difficulty: Difficulty) -> Vec<String> {
    let text = raw.trim();

    let mut guesses: Vec<String> = text
        .lines()
        .map(clean_guess)
        .filter(|g| is_usable(g))
        .collect();

    // Models sometimes answer "Mouse, Rodent, Rat" on one line.
    if guesses.len() <= 1 && text.contains(',') {
        guesses = text
            .split(',')
            .map(clean_guess)
            .filter(|g| is_usable(g))
            .collect();
    }

    if guesses.is_empty() {
        guesses = vec![text.trim_matches('"').trim_matches('\'').to_string()];
    }

    guesses.retain(|g| !g.trim().is_empty());
    guesses.truncate(difficulty.guess_limit());
    guesses
}

fn clean_guess(line: &str) -> String {
    line.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim_matches(|c| c == '[' || c == ']')
        .trim()
        .to_string()
}

fn is_usable(guess: &str) -> bool {
    !guess.is_empty() && !guess.starts_with("Example")
}
