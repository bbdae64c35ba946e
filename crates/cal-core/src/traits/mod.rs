//! Repository traits (ports)

mod repositories;

pub use repositories::{EventRepository, RepoResult, TelegramConfigRepository};
