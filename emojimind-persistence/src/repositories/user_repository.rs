use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use emojimind_types::User;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn create_user(&self, email: &str, display_name: &str) -> Result<User> {
        let now = Utc::now();
        let user_model = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            email: ActiveValue::Set(email.to_string()),
            display_name: ActiveValue::Set(display_name.to_string()),
            created_at: ActiveValue::Set(now.into()),
            updated_at: ActiveValue::Set(now.into()),
        };

        let saved = Users::insert(user_model).exec(&self.db).await?;

        let created = Users::find_by_id(saved.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(Self::model_to_user(created))
    }

    /// Login path: look the user up by email, creating them from the OAuth
    /// profile on first login.
    pub async fn get_or_create(&self, email: &str, display_name: &str) -> Result<User> {
        if let Some(user) = self.find_by_email(email).await? {
            return Ok(user);
        }
        self.create_user(email, display_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> UserRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup_test_db().await;

        let created = repo
            .create_user("test@example.com", "Test User")
            .await
            .unwrap();
        assert_eq!(created.email, "test@example.com");
        assert_eq!(created.display_name, "Test User");

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.email, created.email);

        let by_email = repo
            .find_by_email("test@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let repo = setup_test_db().await;

        let first = repo.get_or_create("alice@example.com", "Alice").await.unwrap();
        let second = repo.get_or_create("alice@example.com", "Alice A.").await.unwrap();

        // Second login finds the existing row rather than creating another.
        assert_eq!(first.id, second.id);
        assert_eq!(second.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let repo = setup_test_db().await;
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo
            .find_by_email("ghost@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
