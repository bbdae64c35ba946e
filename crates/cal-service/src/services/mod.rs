//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and are constructed per call.

pub mod auth;
pub mod context;
pub mod error;
pub mod event;
pub mod telegram;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use telegram::{DigestOutcome, TelegramService};
