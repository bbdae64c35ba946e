//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in cal-core.

mod error;
mod event;
mod telegram;

pub use event::PgEventRepository;
pub use telegram::PgTelegramConfigRepository;
