//! One-call session assembly from settings.

use std::sync::Arc;

use mclient::{CallHooks, ClientError, ClientSession, NoopCallHooks, Settings};

use crate::providers::build_provider;

/// Resolves `settings` and assembles a ready [`ClientSession`]. Fails before
/// any network activity when a hosted provider is selected without its
/// credential.
pub fn connect(settings: Settings) -> Result<ClientSession, ClientError> {
    connect_with_hooks(settings, Arc::new(NoopCallHooks))
}

/// Like [`connect`], but installs `hooks` on the session and reports each
/// configuration warning through them.
pub fn connect_with_hooks(
    settings: Settings,
    hooks: Arc<dyn CallHooks>,
) -> Result<ClientSession, ClientError> {
    let config = settings.resolve()?;
    for warning in &config.warnings {
        hooks.on_config_warning(warning);
    }
    let provider = build_provider(&config)?;
    Ok(ClientSession::new(provider, config).with_hooks(hooks))
}
