//! # cal-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! - [`services::AuthService`] issues access tokens and rotates refresh tokens
//! - [`services::EventService`] wraps calendar event persistence
//! - [`services::TelegramService`] and the [`telegram`] client deliver due-task digests
//! - [`scheduler`] runs the daily digest in the background

pub mod dto;
pub mod scheduler;
pub mod services;
pub mod telegram;

pub use scheduler::{spawn_digest_scheduler, DigestSchedule};
pub use services::{
    AuthService, DigestOutcome, EventService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, TelegramService,
};
pub use telegram::{HttpTelegramClient, TelegramApi};
