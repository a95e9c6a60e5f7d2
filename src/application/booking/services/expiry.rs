//! Background task that cancels stale pending bookings.
//!
//! A booking left in `Pending` after its reserved hour has fully passed
//! holds capacity nobody can use anymore. The sweep runs in a
//! tokio::spawn loop and cancels such bookings, which frees their slots
//! for future days' counts and keeps the audit record.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{info, warn};

use crate::domain::{Clock, DomainResult, RepositoryProvider};
use crate::shared::retry::{retry_with_backoff, RetryConfig};
use crate::shared::shutdown::ShutdownSignal;

/// Start the stale-booking sweep task.
///
/// Every `check_interval_secs` the sweep looks for `Pending` bookings
/// whose slot hour ended before "now" and cancels them.
pub fn start_stale_booking_sweep(
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            "📅 Stale-booking sweep started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match sweep_once(&repos, &clock).await {
                        Ok(0) => {}
                        Ok(swept) => info!(count = swept, "Cancelled stale pending bookings"),
                        Err(e) => warn!(error = %e, "Stale-booking sweep error"),
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("📅 Stale-booking sweep shutting down");
                    break;
                }
            }
        }

        info!("📅 Stale-booking sweep stopped");
    });
}

/// One sweep pass. Returns how many bookings were cancelled.
pub async fn sweep_once(
    repos: &Arc<dyn RepositoryProvider>,
    clock: &Arc<dyn Clock>,
) -> DomainResult<usize> {
    let cutoff = clock.now();

    let stale = retry_with_backoff(
        RetryConfig::default(),
        || repos.bookings().find_pending_ended_before(cutoff),
        |err| err.is_transient(),
        "find_stale_bookings",
    )
    .await?;

    let mut swept = 0;
    for mut booking in stale {
        if let Err(e) = booking.cancel() {
            warn!(booking_id = %booking.id, error = %e, "Stale booking refused cancellation");
            continue;
        }
        match repos.bookings().replace(booking.clone()).await {
            Ok(()) => {
                metrics::counter!("bookings_expired_total").increment(1);
                swept += 1;
            }
            Err(e) => warn!(booking_id = %booking.id, error = %e, "Failed to cancel stale booking"),
        }
    }

    Ok(swept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::testing::{
        created_at, fixed_clock, provider_with_station, sample_booking_at,
    };
    use crate::domain::{BookingStatus, RepositoryProvider};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[tokio::test]
    async fn sweeps_only_pending_bookings_with_fully_passed_hours() {
        // Fixed clock reads 2024-01-10 09:00 UTC
        let repos = provider_with_station("ST-001", 2, true);
        repos
            .seed_bookings(vec![
                // Ended yesterday → swept
                sample_booking_at("ST-001", date(1, 9), 10, BookingStatus::Pending),
                // Ended at 08:00 today → swept
                sample_booking_at("ST-001", date(1, 10), 7, BookingStatus::Pending),
                // Ends at 09:00 sharp, not strictly before cutoff → kept
                sample_booking_at("ST-001", date(1, 10), 8, BookingStatus::Pending),
                // In the future → kept
                sample_booking_at("ST-001", date(1, 10), 15, BookingStatus::Pending),
                // Past but approved → not the sweep's business
                sample_booking_at("ST-001", date(1, 9), 10, BookingStatus::Approved),
            ])
            .await;
        let repos_dyn: Arc<dyn RepositoryProvider> = repos.clone();
        let clock = fixed_clock();
        assert_eq!(clock.now(), created_at());

        let swept = sweep_once(&repos_dyn, &clock).await.unwrap();
        assert_eq!(swept, 2);

        let all = repos.bookings().find_all().await.unwrap();
        let cancelled = all
            .iter()
            .filter(|b| b.status == BookingStatus::Cancelled)
            .count();
        assert_eq!(cancelled, 2);

        // Second pass finds nothing left to do
        let swept = sweep_once(&repos_dyn, &clock).await.unwrap();
        assert_eq!(swept, 0);
    }
}
