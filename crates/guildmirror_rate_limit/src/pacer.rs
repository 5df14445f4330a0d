//! Fixed delays between the steps of a repair pass.

use guildmirror_core::PacingConfig;
use std::time::Duration;
use tracing::debug;

/// A point in a pass where a delay is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PaceStep {
    /// Before the next guild of a deployment-wide sync
    #[display("guild")]
    Guild,
    /// Before a well-known role lookup
    #[display("role")]
    Role,
    /// Before a node repair
    #[display("node")]
    Node,
    /// Before a member repair
    #[display("member")]
    Member,
}

/// Policy deciding how long to wait at each step.
///
/// Waits are not cancellable; a pass always completes its current delay.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    /// Wait before the given step.
    async fn pause(&self, step: PaceStep);
}

/// Sleeps for a configured duration per step.
///
/// # Example
///
/// ```
/// use guildmirror_core::PacingConfig;
/// use guildmirror_rate_limit::{FixedPacer, PaceStep, Pacer};
/// use std::time::Duration;
///
/// let pacer = FixedPacer::new(PacingConfig { between_nodes: 5_000, ..PacingConfig::none() });
/// assert_eq!(pacer.delay(PaceStep::Node), Duration::from_secs(5));
/// assert_eq!(pacer.delay(PaceStep::Guild), Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedPacer {
    config: PacingConfig,
}

impl FixedPacer {
    /// Creates a pacer from the `[pacing]` configuration section.
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    /// Delay for a step.
    pub fn delay(&self, step: PaceStep) -> Duration {
        match step {
            PaceStep::Guild => self.config.guild_delay(),
            PaceStep::Role => self.config.role_delay(),
            PaceStep::Node => self.config.node_delay(),
            PaceStep::Member => self.config.member_delay(),
        }
    }
}

#[async_trait::async_trait]
impl Pacer for FixedPacer {
    async fn pause(&self, step: PaceStep) {
        let delay = self.delay(step);
        if delay.is_zero() {
            return;
        }
        debug!(%step, delay_ms = delay.as_millis() as u64, "Pacing");
        tokio::time::sleep(delay).await;
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait::async_trait]
impl Pacer for NoPacing {
    async fn pause(&self, _step: PaceStep) {}
}
