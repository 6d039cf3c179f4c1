use serde::{Deserialize, Serialize};

/// Rejection of a submitted emoji string. Reported inline on the guess
/// form; no attempt is recorded and round state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter emoji only.")]
    NotEmoji,
    #[error("Use up to {limit} emojis.")]
    TooManyEmojis { limit: usize },
}
