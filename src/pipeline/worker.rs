use std::sync::Arc;

use log::{error, info};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::ApprovalPipeline;

const WORKER_POLL_INTERVAL_SECS: u64 = 1;
const WORKER_ERROR_BACKOFF_SECS: u64 = 5;

/// Drain the approved queue to the vault, one note per tick, until
/// cancelled. A failed write is logged and followed by a longer pause; the
/// failed item is not re-queued.
pub async fn persistence_loop(
    pipeline: Arc<ApprovalPipeline>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(WORKER_POLL_INTERVAL_SECS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match pipeline.write_next_approved().await {
                    Ok(Some(path)) => info!("Approved and written: {}", path.display()),
                    Ok(None) => {}
                    Err(err) => {
                        error!("Error in approval worker: {err:#}");
                        tokio::select! {
                            _ = tokio::time::sleep(Duration::from_secs(WORKER_ERROR_BACKOFF_SECS)) => {}
                            _ = cancel_token.cancelled() => break,
                        }
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!("Persistence worker shutting down");
                break;
            }
        }
    }
}
