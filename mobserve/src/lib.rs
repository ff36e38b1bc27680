//! Production-friendly observability hooks for the client call lifecycle.
//!
//! ```rust
//! use mobserve::{MetricsCallHooks, SafeCallHooks, TracingCallHooks};
//!
//! let _hooks = SafeCallHooks::new(TracingCallHooks);
//! let _metrics = MetricsCallHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsCallHooks;
pub use safe_hooks::SafeCallHooks;
pub use tracing_hooks::TracingCallHooks;

pub mod prelude {
    pub use crate::{MetricsCallHooks, SafeCallHooks, TracingCallHooks};
}
