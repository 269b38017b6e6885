//! API credential storage and resolution.
//!
//! The core never holds on to a credential: callers resolve it right before a
//! request and pass it in. Where it is kept between runs is up to a
//! [`CredentialStore`] implementation supplied by the caller.

use std::sync::Mutex;

use crate::config::GeminiConfig;
use crate::error::RotaError;

/// Key under which the Gemini API key is persisted.
pub const CREDENTIAL_KEY: &str = "gemini-api-key";

/// Persistent storage for the single API credential.
pub trait CredentialStore: Send + Sync {
    /// Read the stored credential, if any.
    fn get(&self) -> Result<Option<String>, RotaError>;

    /// Store a credential, replacing any previous one.
    fn set(&self, key: &str) -> Result<(), RotaError>;

    /// Remove the stored credential. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), RotaError>;
}

/// In-process credential store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: Mutex::new(Some(key.to_string())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, RotaError> {
        self.key
            .lock()
            .map_err(|_| RotaError::Credential("credential store lock poisoned".to_string()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, RotaError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, key: &str) -> Result<(), RotaError> {
        *self.lock()? = Some(key.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), RotaError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
    } else if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed explicitly by the caller (e.g. `--api-key`)
    Explicit,
    /// The `gemini.api_key` config value or the env var it references
    Config,
    /// The persistent credential store
    Store,
}

/// Resolve the credential for one request.
///
/// Order: explicit value, then the config value (with `${ENV_VAR}`
/// expansion), then the store. Blank values are skipped.
pub fn resolve_api_key(
    explicit: Option<&str>,
    config: &GeminiConfig,
    store: &dyn CredentialStore,
) -> Result<Option<(String, CredentialSource)>, RotaError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(Some((key.to_string(), CredentialSource::Explicit)));
    }
    if let Some(key) = resolve_env_var(&config.api_key) {
        return Ok(Some((key, CredentialSource::Config)));
    }
    Ok(store
        .get()?
        .filter(|k| !k.trim().is_empty())
        .map(|k| (k, CredentialSource::Store)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.to_string(),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_explicit_key_wins() {
        let store = MemoryCredentialStore::with_key("stored");
        let resolved = resolve_api_key(Some("flag"), &config_with_key("configured"), &store)
            .unwrap()
            .unwrap();
        assert_eq!(resolved, ("flag".to_string(), CredentialSource::Explicit));
    }

    #[test]
    fn test_config_key_before_store() {
        let store = MemoryCredentialStore::with_key("stored");
        let resolved = resolve_api_key(Some("  "), &config_with_key("configured"), &store)
            .unwrap()
            .unwrap();
        assert_eq!(resolved, ("configured".to_string(), CredentialSource::Config));
    }

    #[test]
    fn test_store_used_when_env_unset() {
        let store = MemoryCredentialStore::with_key("stored");
        let config = config_with_key("${DEFINITELY_NOT_SET_XYZ_456}");
        let resolved = resolve_api_key(None, &config, &store).unwrap().unwrap();
        assert_eq!(resolved, ("stored".to_string(), CredentialSource::Store));
    }

    #[test]
    fn test_nothing_configured() {
        let store = MemoryCredentialStore::new();
        let config = config_with_key("${DEFINITELY_NOT_SET_XYZ_789}");
        assert!(resolve_api_key(None, &config, &store).unwrap().is_none());
    }
}
