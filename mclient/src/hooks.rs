//! Observation hooks for call lifecycle and configuration warnings.
//!
//! ```rust
//! use mclient::{CallHooks, NoopCallHooks};
//!
//! fn accepts_hooks(_hooks: &dyn CallHooks) {}
//!
//! let hooks = NoopCallHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use mprovider::ProviderId;

use crate::config::ConfigWarning;
use crate::error::ClientError;

pub trait CallHooks: Send + Sync {
    fn on_call_start(&self, _provider: ProviderId, _model: &str) {}

    fn on_call_success(&self, _provider: ProviderId, _model: &str, _elapsed: Duration) {}

    fn on_call_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _error: &ClientError,
        _elapsed: Duration,
    ) {
    }

    fn on_config_warning(&self, _warning: &ConfigWarning) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallHooks;

impl CallHooks for NoopCallHooks {}
