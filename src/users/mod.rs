mod repo;
mod repo_types;

pub use repo::{SqliteUserRepository, UserRepository};
pub use repo_types::{InvalidStatus, NewUser, Status, User};
