//! ExpirySweeper - Background service for subscription expiration.
//!
//! Subscriptions end by calendar, not by event: nothing happens at the
//! moment a billing window closes unless something looks. This service
//! looks. On every tick it runs the expiration sweep, which downgrades
//! active subscriptions whose window has passed and abandons pending
//! ones that outlived the configured TTL.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `sweep_interval` | 24h | How often to run the sweep |
//!
//! ## Graceful Shutdown
//!
//! The service listens for a shutdown signal and exits without starting
//! another sweep. A sweep interrupted mid-run is harmless: every item is
//! committed independently and the next run picks up the remainder.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::subscription::{
    ExpireSubscriptionsCommand, ExpireSubscriptionsHandler, SweepOutcome,
};
use crate::domain::foundation::Timestamp;
use crate::domain::subscription::SubscriptionError;

/// Configuration for the ExpirySweeper service.
#[derive(Debug, Clone)]
pub struct ExpirySweeperConfig {
    /// How often to run the expiration sweep.
    pub sweep_interval: Duration,
}

impl Default for ExpirySweeperConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl ExpirySweeperConfig {
    /// Create config with a custom sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Background service that expires subscriptions on a schedule.
pub struct ExpirySweeper {
    handler: ExpireSubscriptionsHandler,
    config: ExpirySweeperConfig,
}

impl ExpirySweeper {
    /// Create a new ExpirySweeper with default configuration.
    pub fn new(handler: ExpireSubscriptionsHandler) -> Self {
        Self {
            handler,
            config: ExpirySweeperConfig::default(),
        }
    }

    /// Create a new ExpirySweeper with custom configuration.
    pub fn with_config(handler: ExpireSubscriptionsHandler, config: ExpirySweeperConfig) -> Self {
        Self { handler, config }
    }

    /// Run the sweep loop until shutdown signal is received.
    ///
    /// A failed sweep is logged and retried on the next tick. Transient
    /// database trouble must not take the whole service down.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                }

                _ = interval.tick() => {
                    match self.sweep_once().await {
                        Ok(outcome) => {
                            tracing::info!(
                                expired = outcome.expired,
                                abandoned = outcome.abandoned,
                                skipped = outcome.skipped,
                                "Expiration sweep completed"
                            );
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Expiration sweep failed");
                        }
                    }
                }
            }
        }
    }

    /// Run exactly one sweep (also useful for testing and one-shot runs).
    pub async fn sweep_once(&self) -> Result<SweepOutcome, SubscriptionError> {
        self.handler
            .handle(ExpireSubscriptionsCommand {
                now: Timestamp::now(),
            })
            .await
    }
}
