//! Daily due-task digest
//!
//! A background task wakes once a minute and sends the digest the first time it
//! observes the configured local time on a given day.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use cal_common::DigestConfig;
use cal_core::DomainError;

use crate::services::{ServiceContext, ServiceError, TelegramService};

const CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Minutes after the target time during which a missed tick still triggers the run
const CATCH_UP_MINUTES: u32 = 5;

/// When the digest runs, in a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestSchedule {
    at: NaiveTime,
    offset: FixedOffset,
}

impl DigestSchedule {
    /// `None` when the time or offset is out of range
    pub fn new(hour: u32, minute: u32, utc_offset_hours: i32) -> Option<Self> {
        Some(Self {
            at: NaiveTime::from_hms_opt(hour, minute, 0)?,
            offset: FixedOffset::east_opt(utc_offset_hours * 3600)?,
        })
    }

    pub fn from_config(config: &DigestConfig) -> Option<Self> {
        Self::new(config.hour, config.minute, config.utc_offset_hours)
    }

    /// Calendar day at `now` in the schedule's offset
    pub fn local_day(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// The local day to send a digest for, if one is due at `now`
    pub fn due_day(&self, now: DateTime<Utc>, last_run: Option<NaiveDate>) -> Option<NaiveDate> {
        let local = now.with_timezone(&self.offset);
        let day = local.date_naive();
        if last_run == Some(day) {
            return None;
        }

        let minute_of_day = |t: NaiveTime| t.hour() * 60 + t.minute();
        let elapsed = minute_of_day(local.time()).checked_sub(minute_of_day(self.at))?;
        (elapsed < CATCH_UP_MINUTES).then_some(day)
    }
}

/// Spawn the digest loop on the current runtime
pub fn spawn_digest_scheduler(ctx: Arc<ServiceContext>, schedule: DigestSchedule) -> JoinHandle<()> {
    tracing::info!(
        at = %schedule.at,
        offset = %schedule.offset,
        "Daily digest scheduler started"
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHECK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_run: Option<NaiveDate> = None;

        loop {
            interval.tick().await;

            let Some(day) = schedule.due_day(Utc::now(), last_run) else {
                continue;
            };
            last_run = Some(day);

            tracing::info!(%day, "Running daily due-task check");
            match TelegramService::new(&ctx).check_due_tasks(day).await {
                Ok(outcome) => tracing::info!(?outcome, "Daily digest finished"),
                Err(ServiceError::Domain(DomainError::TelegramConfigNotFound)) => {
                    tracing::debug!("Telegram not configured; skipping digest");
                }
                Err(e) => tracing::error!(error = %e, "Daily digest failed"),
            }
        }
    })
}
