//! Pacing and rate limiting for remote directory calls.
//!
//! Two independent mechanisms keep a repair pass under the directory's
//! rate limits:
//!
//! - [`Pacer`] inserts fixed delays between the steps of a pass (between
//!   guilds, role lookups, node repairs and member repairs). [`FixedPacer`]
//!   sleeps on the tokio clock, so tests can drive it with a paused runtime
//!   instead of waiting in real time.
//! - [`RequestLimiter`] caps the raw request rate with a GCRA quota from the
//!   governor crate, independent of which step issues the call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod limiter;
mod pacer;

pub use limiter::RequestLimiter;
pub use pacer::{FixedPacer, NoPacing, PaceStep, Pacer};
