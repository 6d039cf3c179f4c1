use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoundAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoundAttempts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoundAttempts::UserId).uuid().not_null())
                    .col(ColumnDef::new(RoundAttempts::Difficulty).string().not_null())
                    .col(ColumnDef::new(RoundAttempts::Word).string().not_null())
                    .col(ColumnDef::new(RoundAttempts::EmojiInput).string().not_null())
                    .col(ColumnDef::new(RoundAttempts::Guesses).json().not_null())
                    .col(ColumnDef::new(RoundAttempts::Win).boolean().not_null())
                    .col(ColumnDef::new(RoundAttempts::StartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(RoundAttempts::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(RoundAttempts::TimeTakenSeconds).big_integer())
                    .col(
                        ColumnDef::new(RoundAttempts::Finished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RoundAttempts::Tries)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoundAttempts::TotalWords)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoundAttempts::SolvedWords)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoundAttempts::Expired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RoundAttempts::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoundAttempts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_attempts_user")
                            .from(RoundAttempts::Table, RoundAttempts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the latest-attempt-per-tier lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_round_attempts_user_difficulty")
                    .table(RoundAttempts::Table)
                    .col(RoundAttempts::UserId)
                    .col(RoundAttempts::Difficulty)
                    .col(RoundAttempts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoundAttempts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RoundAttempts {
    Table,
    Id,
    UserId,
    Difficulty,
    Word,
    EmojiInput,
    Guesses,
    Win,
    StartTime,
    EndTime,
    TimeTakenSeconds,
    Finished,
    Tries,
    TotalWords,
    SolvedWords,
    Expired,
    Score,
    CreatedAt,
}
