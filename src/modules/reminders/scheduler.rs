//! Time-triggered fee reminders. Runs on its own cadence, independent of
//! the generation sweep.

use chrono::Utc;
use tokio::time::{self, Duration};
use tracing::{info, warn};

use crate::modules::reminders::service::ReminderService;
use crate::state::AppState;

pub fn spawn(state: AppState) {
    let interval = Duration::from_secs(state.billing_config.reminder_interval_secs);

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        loop {
            ticker.tick().await;
            let today = Utc::now().date_naive();
            let service = ReminderService::from_state(&state);
            match service.run_sweep(today).await {
                Ok(summary) => info!(
                    %today,
                    sent = summary.sent,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "scheduled reminder tick finished"
                ),
                Err(err) => warn!(error = ?err.error, "scheduled reminder tick failed"),
            }
        }
    });
}
