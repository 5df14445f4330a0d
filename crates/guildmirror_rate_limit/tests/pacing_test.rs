//! Pacing tests on a paused tokio clock.

use guildmirror_core::PacingConfig;
use guildmirror_rate_limit::{FixedPacer, NoPacing, PaceStep, Pacer, RequestLimiter};
use std::time::Duration;
use tokio::time::Instant;

fn config() -> PacingConfig {
    PacingConfig {
        between_guilds: 10_000,
        between_roles: 2_000,
        between_nodes: 5_000,
        between_members: 1_000,
    }
}

#[tokio::test(start_paused = true)]
async fn test_fixed_pacer_waits_per_step() {
    let pacer = FixedPacer::new(config());
    let start = Instant::now();

    pacer.pause(PaceStep::Role).await;
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    pacer.pause(PaceStep::Node).await;
    pacer.pause(PaceStep::Member).await;
    assert_eq!(start.elapsed(), Duration::from_secs(8));

    pacer.pause(PaceStep::Guild).await;
    assert_eq!(start.elapsed(), Duration::from_secs(18));
}

#[tokio::test(start_paused = true)]
async fn test_zero_delay_does_not_sleep() {
    let pacer = FixedPacer::new(PacingConfig::none());
    let start = Instant::now();

    for step in [PaceStep::Guild, PaceStep::Role, PaceStep::Node, PaceStep::Member] {
        pacer.pause(step).await;
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_no_pacing() {
    let start = Instant::now();
    NoPacing.pause(PaceStep::Guild).await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[test]
fn test_request_limiter_burst_then_refuses() {
    let limiter = RequestLimiter::per_minute(3);
    assert!(limiter.is_limited());
    assert!(limiter.try_acquire());
    assert!(limiter.try_acquire());
    assert!(limiter.try_acquire());
    assert!(!limiter.try_acquire());
}

#[test]
fn test_request_limiter_zero_is_unlimited() {
    for limiter in [RequestLimiter::per_minute(0), RequestLimiter::unlimited()] {
        assert!(!limiter.is_limited());
        for _ in 0..1000 {
            assert!(limiter.try_acquire());
        }
    }
}

#[tokio::test]
async fn test_clones_share_quota() {
    let limiter = RequestLimiter::per_minute(2);
    let clone = limiter.clone();
    limiter.acquire().await;
    clone.acquire().await;
    assert!(!limiter.try_acquire());
}
