use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::entities::{prelude::*, user_progress};
use emojimind_types::{TierMap, UserProgress as Progress};

pub struct ProgressRepository {
    db: DatabaseConnection,
}

impl ProgressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_progress(model: user_progress::Model) -> Progress {
        Progress {
            user_id: model.user_id,
            game_started: model.game_started,
            game_start_time: model.game_start_time.map(|t| t.with_timezone(&Utc)),
            game_end_time: model.game_end_time.map(|t| t.with_timezone(&Utc)),
            total_time_taken: model.total_time_seconds.map(Duration::seconds),
            completed: TierMap {
                easy: model.easy_completed,
                medium: model.medium_completed,
                hard: model.hard_completed,
            },
            won: TierMap {
                easy: model.easy_won,
                medium: model.medium_won,
                hard: model.hard_won,
            },
            game_completed: model.game_completed,
            game_won: model.game_won,
            game_expired: model.game_expired,
        }
    }

    fn progress_to_active(progress: &Progress) -> user_progress::ActiveModel {
        user_progress::ActiveModel {
            user_id: ActiveValue::Set(progress.user_id),
            game_started: ActiveValue::Set(progress.game_started),
            game_start_time: ActiveValue::Set(progress.game_start_time.map(Into::into)),
            game_end_time: ActiveValue::Set(progress.game_end_time.map(Into::into)),
            total_time_seconds: ActiveValue::Set(
                progress.total_time_taken.map(|d| d.num_seconds()),
            ),
            easy_completed: ActiveValue::Set(progress.completed.easy),
            medium_completed: ActiveValue::Set(progress.completed.medium),
            hard_completed: ActiveValue::Set(progress.completed.hard),
            easy_won: ActiveValue::Set(progress.won.easy),
            medium_won: ActiveValue::Set(progress.won.medium),
            hard_won: ActiveValue::Set(progress.won.hard),
            game_completed: ActiveValue::Set(progress.game_completed),
            game_won: ActiveValue::Set(progress.game_won),
            game_expired: ActiveValue::Set(progress.game_expired),
            updated_at: ActiveValue::Set(Utc::now().into()),
        }
    }

    /// Fetch the user's progress, creating the default row lazily on first
    /// access.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<Progress> {
        if let Some(model) = UserProgress::find_by_id(user_id).one(&self.db).await? {
            return Ok(Self::model_to_progress(model));
        }

        let progress = Progress::new(user_id);
        UserProgress::insert(Self::progress_to_active(&progress))
            .exec(&self.db)
            .await?;
        Ok(progress)
    }

    pub async fn save(&self, progress: &Progress) -> Result<()> {
        UserProgress::update(Self::progress_to_active(progress))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
