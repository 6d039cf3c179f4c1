pub use super::round_attempts::Entity as RoundAttempts;
pub use super::user_progress::Entity as UserProgress;
pub use super::users::Entity as Users;
pub use super::words::Entity as Words;
