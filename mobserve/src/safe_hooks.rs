use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use mclient::{CallHooks, ClientError, ConfigWarning};
use mprovider::ProviderId;

/// Wraps another hook implementation so a panic inside a callback never
/// takes the session down with it.
pub struct SafeCallHooks<H> {
    inner: H,
}

impl<H> SafeCallHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> CallHooks for SafeCallHooks<H>
where
    H: CallHooks,
{
    fn on_call_start(&self, provider: ProviderId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_start(provider, model)
        }));
    }

    fn on_call_success(&self, provider: ProviderId, model: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_success(provider, model, elapsed)
        }));
    }

    fn on_call_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ClientError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_failure(provider, model, error, elapsed)
        }));
    }

    fn on_config_warning(&self, warning: &ConfigWarning) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_config_warning(warning)));
    }
}
