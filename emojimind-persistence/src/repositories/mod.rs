pub mod attempt_repository;
pub mod progress_repository;
pub mod user_repository;
pub mod word_repository;

pub use attempt_repository::AttemptRepository;
pub use progress_repository::ProgressRepository;
pub use user_repository::UserRepository;
pub use word_repository::WordRepository;
