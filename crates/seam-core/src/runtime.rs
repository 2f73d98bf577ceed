//! Process-wide worker runtime
//!
//! Long-running work is modeled as a future rather than a blocking call,
//! so the boundary itself never blocks the host's calling thread. The
//! work runs here, on a small tokio runtime owned by the native side.

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("seam-worker")
        .enable_time()
        .build()
        .expect("failed to build the seam worker runtime")
});

/// The runtime backing future-bridge work and detached service tasks.
///
/// First use builds the runtime; a build failure is resource exhaustion
/// and is fatal to the call that triggered it.
pub(crate) fn runtime() -> &'static Runtime {
    &RUNTIME
}
