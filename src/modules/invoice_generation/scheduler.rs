//! Time-triggered recurring generation.
//!
//! A daily tick drives the monthly cycle. The sweep itself decides per
//! enrollment whether today is a generation day; the tick only provides
//! the wall clock.

use chrono::Utc;
use tokio::time::{self, Duration};
use tracing::{info, warn};

use bursar_models::billing::FeeCycleKind;

use crate::modules::invoice_generation::service::GenerationService;
use crate::state::AppState;

pub fn spawn(state: AppState) {
    let interval = Duration::from_secs(state.billing_config.generation_interval_secs);

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        loop {
            ticker.tick().await;
            let today = Utc::now().date_naive();
            let service = GenerationService::from_state(&state);
            match service.run_sweep(FeeCycleKind::Monthly, today).await {
                Ok(summary) => info!(
                    %today,
                    generated = summary.generated,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "scheduled generation tick finished"
                ),
                Err(err) => warn!(error = ?err.error, "scheduled generation tick failed"),
            }
        }
    });
}
