//! Tracing-based hooks for the client call lifecycle.
//!
//! ```rust
//! use mclient::CallHooks;
//! use mobserve::TracingCallHooks;
//!
//! fn accepts_hooks(_hooks: &dyn CallHooks) {}
//!
//! let hooks = TracingCallHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use mclient::{CallHooks, ClientError, ConfigWarning};
use mprovider::ProviderId;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCallHooks;

impl CallHooks for TracingCallHooks {
    fn on_call_start(&self, provider: ProviderId, model: &str) {
        tracing::info!(
            phase = "client",
            event = "call_start",
            provider = %provider,
            model
        );
    }

    fn on_call_success(&self, provider: ProviderId, model: &str, elapsed: Duration) {
        tracing::info!(
            phase = "client",
            event = "call_success",
            provider = %provider,
            model,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_call_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ClientError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "client",
            event = "call_failure",
            provider = %provider,
            model,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_config_warning(&self, warning: &ConfigWarning) {
        tracing::warn!(
            phase = "config",
            event = "warning",
            setting = %warning.setting,
            message = %warning.message
        );
    }
}
