//! Relay handler, counters and process wiring.

mod handler;
mod runtime;
mod stats;

pub use handler::{RelayHandler, RelayOutcome};
pub use runtime::{run_relay, run_relay_until};
pub use stats::{RelayStats, RelayStatsSnapshot};
