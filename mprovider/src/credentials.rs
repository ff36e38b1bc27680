//! Credential storage with redaction-by-default.
//!
//! API keys only ever leave the store through [`CredentialStore::with_key`],
//! so nothing outside an adapter's auth path can accidentally log one.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Mutex, MutexGuard};

use crate::error::ProviderError;
use crate::model::ProviderId;

/// A secret that never appears in `Debug` output and zeroes its buffer
/// on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Debug for SecretString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zeroing the bytes keeps the buffer valid UTF-8 and the
        // string is dropped immediately afterwards.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Per-provider API keys, keyed by [`ProviderId`].
#[derive(Debug, Default)]
pub struct CredentialStore {
    keys: Mutex<HashMap<ProviderId, SecretString>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an API key for `provider`. Blank keys are rejected.
    pub fn set_key(
        &self,
        provider: ProviderId,
        key: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::authentication(format!(
                "cannot store an empty API key for {provider}"
            )));
        }
        let mut keys = self.guard()?;
        keys.insert(provider, SecretString::new(trimmed));
        Ok(())
    }

    pub fn has_key(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        let keys = self.guard()?;
        Ok(keys.contains_key(&provider))
    }

    /// Runs `f` over the stored key for `provider`, if there is one.
    pub fn with_key<R>(
        &self,
        provider: ProviderId,
        f: impl FnOnce(&str) -> R,
    ) -> Result<Option<R>, ProviderError> {
        let keys = self.guard()?;
        Ok(keys.get(&provider).map(|key| f(key.expose())))
    }

    /// Removes the key for `provider`, reporting whether one was present.
    pub fn clear(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        let mut keys = self.guard()?;
        Ok(keys.remove(&provider).is_some())
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.keys
            .lock()
            .map_err(|_| ProviderError::other("credential store lock poisoned"))
    }
}
