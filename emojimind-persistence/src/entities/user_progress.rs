use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub game_started: bool,
    pub game_start_time: Option<DateTimeWithTimeZone>,
    pub game_end_time: Option<DateTimeWithTimeZone>,
    pub total_time_seconds: Option<i64>,
    pub easy_completed: bool,
    pub medium_completed: bool,
    pub hard_completed: bool,
    pub easy_won: bool,
    pub medium_won: bool,
    pub hard_won: bool,
    pub game_completed: bool,
    pub game_won: bool,
    pub game_expired: bool,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
