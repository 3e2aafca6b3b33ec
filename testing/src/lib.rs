//! Shared test doubles for the parameter store workspace.
//!
//! - [`RecordingClient`] / [`RecordingFactory`]: an in-memory store that
//!   records every remote call, with scripted failures and latency
//! - [`SsmMock`]: a `wiremock` server speaking the SSM JSON protocol, for
//!   driving the real AWS client
//! - [`LogCapture`]: collects formatted `tracing` output for assertions

mod logs;
mod recording;
mod ssm;

pub use logs::LogCapture;
pub use recording::{Call, RecordingClient, RecordingFactory};
pub use ssm::SsmMock;

use std::sync::atomic::{AtomicU32, Ordering};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

/// A root prefix no other test uses, e.g. `/test-app-3`.
pub fn unique_root(prefix: &str) -> String {
    format!("/{}", unique_id(prefix))
}
