use tokio::time::MissedTickBehavior;

use std::{sync::Arc, time::Duration};

use crate::{
    api::BoardApi,
    session::{Refresh, Session},
};

/// Re-fetches the selected board every `every`, independent of user actions.
pub async fn run<A: BoardApi>(session: Arc<Session<A>>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately; the initial load is done by the caller.
    interval.tick().await;

    loop {
        interval.tick().await;
        match session.reload().await {
            Refresh::Applied => tracing::debug!("Periodic refresh applied"),
            Refresh::Discarded => tracing::debug!("Periodic refresh superseded"),
            Refresh::NoBoard => tracing::trace!("No board selected, skipping refresh"),
            Refresh::Failed(e) => tracing::warn!("Periodic refresh failed: {e}"),
        }
    }
}
