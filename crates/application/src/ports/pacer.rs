//! Pacing between outbound requests
//!
//! The batch geocoder waits through a [`Pacer`] so tests can observe or skip
//! the wall-clock delay.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Suspends the caller between rate-limited requests
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait for `delay`
    async fn pause(&self, delay: Duration);
}

/// Pacer backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
