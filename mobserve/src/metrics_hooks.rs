//! Metrics-based hooks for the client call lifecycle.
//!
//! ```rust
//! use mclient::CallHooks;
//! use mobserve::MetricsCallHooks;
//!
//! fn accepts_hooks(_hooks: &dyn CallHooks) {}
//!
//! let hooks = MetricsCallHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use mclient::{CallHooks, ClientError, ConfigWarning};
use mprovider::ProviderId;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCallHooks;

impl CallHooks for MetricsCallHooks {
    fn on_call_start(&self, provider: ProviderId, model: &str) {
        metrics::counter!(
            "marionette_client_call_start_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_call_success(&self, provider: ProviderId, model: &str, elapsed: Duration) {
        metrics::counter!(
            "marionette_client_success_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "marionette_client_call_duration_seconds",
            "provider" => provider.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_call_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ClientError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "marionette_client_failure_total",
            "provider" => provider.to_string(),
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "marionette_client_call_duration_seconds",
            "provider" => provider.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_config_warning(&self, warning: &ConfigWarning) {
        metrics::counter!(
            "marionette_config_warning_total",
            "setting" => warning.setting.clone()
        )
        .increment(1);
    }
}
