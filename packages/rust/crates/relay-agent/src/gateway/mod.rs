//! HTTP health endpoints.

mod http;

pub use http::{GatewayState, STATUS_BOT_NAME, StatusResponse, router, run_http};
