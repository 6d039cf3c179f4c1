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
                    .table(UserProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProgress::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::GameStarted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(UserProgress::GameStartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(UserProgress::GameEndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(UserProgress::TotalTimeSeconds).big_integer())
                    .col(
                        ColumnDef::new(UserProgress::EasyCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::MediumCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::HardCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::EasyWon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::MediumWon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::HardWon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::GameCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::GameWon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::GameExpired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_progress_user")
                            .from(UserProgress::Table, UserProgress::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProgress::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserProgress {
    Table,
    UserId,
    GameStarted,
    GameStartTime,
    GameEndTime,
    TotalTimeSeconds,
    EasyCompleted,
    MediumCompleted,
    HardCompleted,
    EasyWon,
    MediumWon,
    HardWon,
    GameCompleted,
    GameWon,
    GameExpired,
    UpdatedAt,
}
