use anyhow::Result;
use rand::Rng;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::info;

use crate::entities::{prelude::*, words};
use emojimind_types::Difficulty;

pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Pick one uniformly-random word of the tier, or `None` when the tier
    /// has no words. No side effects.
    pub async fn pick_random(&self, tier: Difficulty) -> Result<Option<String>> {
        let words = Words::find()
            .filter(words::Column::Difficulty.eq(tier.as_str()))
            .all(&self.db)
            .await?;

        if words.is_empty() {
            return Ok(None);
        }

        let index = rand::thread_rng().gen_range(0..words.len());
        Ok(Some(words[index].word.clone()))
    }

    pub async fn count(&self, tier: Difficulty) -> Result<u64> {
        let count = Words::find()
            .filter(words::Column::Difficulty.eq(tier.as_str()))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Insert a word unless it already exists. Returns whether a row was
    /// created (word text is unique across tiers).
    pub async fn insert_word(&self, word: &str, tier: Difficulty) -> Result<bool> {
        let existing = Words::find()
            .filter(words::Column::Word.eq(word))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let model = words::ActiveModel {
            id: ActiveValue::NotSet,
            word: ActiveValue::Set(word.to_string()),
            difficulty: ActiveValue::Set(tier.as_str().to_string()),
        };
        Words::insert(model).exec(&self.db).await?;
        Ok(true)
    }

    /// Seed the built-in sample words for any tier that is missing them.
    /// Returns how many rows were created.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut created = 0;
        for (tier, words) in SAMPLE_WORDS {
            for word in *words {
                if self.insert_word(word, *tier).await? {
                    created += 1;
                }
            }
        }
        if created > 0 {
            info!("Seeded {} sample words", created);
        }
        Ok(created)
    }
}

pub const SAMPLE_WORDS: &[(Difficulty, &[&str])] = &[
    (
        Difficulty::Easy,
        &[
            "Computer", "Phone", "Car", "Tree", "House", "Dog", "Cat", "Sun", "Moon", "Water",
            "Fire", "Book", "Music", "Love", "Happy", "Food", "Coffee", "Pizza", "Heart", "Star",
        ],
    ),
    (
        Difficulty::Medium,
        &[
            "Birthday",
            "Christmas",
            "Vacation",
            "School",
            "Hospital",
            "Restaurant",
            "Airport",
            "Shopping",
            "Wedding",
            "Party",
            "Movie",
            "Football",
            "Basketball",
            "Swimming",
            "Dancing",
            "Cooking",
            "Fishing",
            "Camping",
            "Exercise",
            "Reading",
        ],
    ),
    (
        Difficulty::Hard,
        &[
            "Earthquake",
            "Democracy",
            "Philosophy",
            "Cryptocurrency",
            "Artificial Intelligence",
            "Global Warming",
            "Time Travel",
            "Social Media",
            "Video Conference",
            "Online Learning",
            "Space Exploration",
            "Renewable Energy",
            "Virtual Reality",
            "Machine Learning",
            "Quantum Physics",
            "Blockchain",
            "Biotechnology",
            "Nanotechnology",
            "Cybersecurity",
            "Automation",
        ],
    ),
];
