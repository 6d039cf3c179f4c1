use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three difficulty tiers. Each tier has its own word pool, emoji
/// budget, and cap on how many guesses the oracle may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// How many emojis the player is told to use for this tier.
    pub fn emoji_limit(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 4,
            Difficulty::Hard => 3,
        }
    }

    /// How many guesses the oracle may return for this tier.
    pub fn guess_limit(&self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 5,
            Difficulty::Hard => 10,
        }
    }

    /// The tier offered after this one, if any.
    pub fn next(&self) -> Option<Difficulty> {
        match self {
            Difficulty::Easy => Some(Difficulty::Medium),
            Difficulty::Medium => Some(Difficulty::Hard),
            Difficulty::Hard => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

/// One value per tier, indexed by [`Difficulty`]. Replaces the original's
/// reflective "easy/medium/hard"-prefixed attribute access with three named
/// fields behind a tier-indexed accessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMap<T> {
    pub easy: T,
    pub medium: T,
    pub hard: T,
}

impl<T> TierMap<T> {
    pub fn get(&self, tier: Difficulty) -> &T {
        match tier {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn get_mut(&mut self, tier: Difficulty) -> &mut T {
        match tier {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    pub fn set(&mut self, tier: Difficulty, value: T) {
        *self.get_mut(tier) = value;
    }
}

impl<T: Copy> TierMap<T> {
    pub fn all(&self, predicate: impl Fn(T) -> bool) -> bool {
        Difficulty::ALL.iter().all(|tier| predicate(*self.get(*tier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trip() {
        for tier in Difficulty::ALL {
            assert_eq!(tier.as_str().parse::<Difficulty>().unwrap(), tier);
        }
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_tier_limits() {
        assert_eq!(Difficulty::Easy.emoji_limit(), 4);
        assert_eq!(Difficulty::Medium.emoji_limit(), 4);
        assert_eq!(Difficulty::Hard.emoji_limit(), 3);

        assert_eq!(Difficulty::Easy.guess_limit(), 2);
        assert_eq!(Difficulty::Medium.guess_limit(), 5);
        assert_eq!(Difficulty::Hard.guess_limit(), 10);
    }

    #[test]
    fn test_tier_ordering() {
        assert_eq!(Difficulty::Easy.next(), Some(Difficulty::Medium));
        assert_eq!(Difficulty::Medium.next(), Some(Difficulty::Hard));
        assert_eq!(Difficulty::Hard.next(), None);
    }

    #[test]
    fn test_tier_map_accessors() {
        let mut map = TierMap::<u32>::default();
        map.set(Difficulty::Medium, 2);
        *map.get_mut(Difficulty::Hard) += 5;

        assert_eq!(*map.get(Difficulty::Easy), 0);
        assert_eq!(*map.get(Difficulty::Medium), 2);
        assert_eq!(*map.get(Difficulty::Hard), 5);

        assert!(!map.all(|v| v > 0));
        map.set(Difficulty::Easy, 1);
        map.set(Difficulty::Medium, 1);
        assert!(map.all(|v| v > 0));
    }
}
