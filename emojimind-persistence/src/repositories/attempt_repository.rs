use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entities::{prelude::*, round_attempts};
use emojimind_types::{Difficulty, RoundAttempt};

pub struct AttemptRepository {
    db: DatabaseConnection,
}

impl AttemptRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_attempt(model: round_attempts::Model) -> Result<RoundAttempt> {
        let difficulty: Difficulty = model.difficulty.parse()?;
        let guesses: Vec<String> = serde_json::from_value(model.guesses)?;

        Ok(RoundAttempt {
            id: model.id,
            user_id: model.user_id,
            difficulty,
            word: model.word,
            emoji_input: model.emoji_input,
            guesses,
            win: model.win,
            start_time: model.start_time.map(|t| t.with_timezone(&Utc)),
            end_time: model.end_time.map(|t| t.with_timezone(&Utc)),
            time_taken: model.time_taken_seconds.map(Duration::seconds),
            finished: model.finished,
            expired: model.expired,
            tries: model.tries as u32,
            total_words: model.total_words,
            solved_words: model.solved_words,
            score: model.score,
        })
    }

    pub async fn create(&self, attempt: &RoundAttempt) -> Result<()> {
        let model = round_attempts::ActiveModel {
            id: ActiveValue::Set(attempt.id),
            user_id: ActiveValue::Set(attempt.user_id),
            difficulty: ActiveValue::Set(attempt.difficulty.as_str().to_string()),
            word: ActiveValue::Set(attempt.word.clone()),
            emoji_input: ActiveValue::Set(attempt.emoji_input.clone()),
            guesses: ActiveValue::Set(serde_json::to_value(&attempt.guesses)?),
            win: ActiveValue::Set(attempt.win),
            start_time: ActiveValue::Set(attempt.start_time.map(Into::into)),
            end_time: ActiveValue::Set(attempt.end_time.map(Into::into)),
            time_taken_seconds: ActiveValue::Set(attempt.time_taken.map(|d| d.num_seconds())),
            finished: ActiveValue::Set(attempt.finished),
            tries: ActiveValue::Set(attempt.tries as i32),
            total_words: ActiveValue::Set(attempt.total_words),
            solved_words: ActiveValue::Set(attempt.solved_words),
            expired: ActiveValue::Set(attempt.expired),
            score: ActiveValue::Set(attempt.score),
            created_at: ActiveValue::Set(Utc::now().into()),
        };

        RoundAttempts::insert(model).exec(&self.db).await?;
        Ok(())
    }

    /// The most recent attempt for (user, tier), for the result view.
    pub async fn latest_for(
        &self,
        user_id: Uuid,
        tier: Difficulty,
    ) -> Result<Option<RoundAttempt>> {
        let model = RoundAttempts::find()
            .filter(round_attempts::Column::UserId.eq(user_id))
            .filter(round_attempts::Column::Difficulty.eq(tier.as_str()))
            .order_by_desc(round_attempts::Column::CreatedAt)
            .one(&self.db)
            .await?;

        model.map(Self::model_to_attempt).transpose()
    }

    pub async fn count_for(&self, user_id: Uuid, tier: Difficulty) -> Result<u64> {
        let count = RoundAttempts::find()
            .filter(round_attempts::Column::UserId.eq(user_id))
            .filter(round_attempts::Column::Difficulty.eq(tier.as_str()))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Apply the result view's finalization correction to a stored row.
    /// Only the timing fields may change after creation.
    pub async fn update_timing(&self, attempt: &RoundAttempt) -> Result<()> {
        let model = round_attempts::ActiveModel {
            id: ActiveValue::Unchanged(attempt.id),
            end_time: ActiveValue::Set(attempt.end_time.map(Into::into)),
            time_taken_seconds: ActiveValue::Set(attempt.time_taken.map(|d| d.num_seconds())),
            finished: ActiveValue::Set(attempt.finished),
            expired: ActiveValue::Set(attempt.expired),
            ..Default::default()
        };

        RoundAttempts::update(model).exec(&self.db).await?;
        Ok(())
    }
}
