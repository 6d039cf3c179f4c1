use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "round_attempts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub difficulty: String,
    pub word: String,
    pub emoji_input: String,
    pub guesses: Json,
    pub win: bool,
    pub start_time: Option<DateTimeWithTimeZone>,
    pub end_time: Option<DateTimeWithTimeZone>,
    pub time_taken_seconds: Option<i64>,
    pub finished: bool,
    pub tries: i32,
    pub total_words: i32,
    pub solved_words: i32,
    pub expired: bool,
    pub score: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
