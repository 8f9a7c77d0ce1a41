//! Storage configuration
//!
//! Settings are read from Shuttle secrets first, then the process
//! environment (`.env` is loaded by `dotenvy` at startup).
//!
//! - `KURA_STORAGE`: `postgres` (default), `supabase` or `memory`
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY`: required for `supabase`
//! - `KURA_HTTP_TIMEOUT_SECS`: outbound HTTP timeout (default 30)

use std::time::Duration;

use kura::DomainError;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Which adapter backs the TemplateRepository port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Supabase,
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Supabase => write!(f, "supabase"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "supabase" => Ok(StorageBackend::Supabase),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Connection details for a Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
}

/// Storage settings injected into the repository factory
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub supabase: Option<SupabaseSettings>,
    pub http_timeout: Duration,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            supabase: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl StorageSettings {
    /// Build settings from any key lookup (secrets, environment, tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("KURA_STORAGE") {
            Some(raw) => raw.parse().map_err(DomainError::Configuration)?,
            None => StorageBackend::default(),
        };

        let supabase = match (lookup("SUPABASE_URL"), lookup("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseSettings { url, anon_key }),
            _ => None,
        };

        if backend == StorageBackend::Supabase && supabase.is_none() {
            return Err(DomainError::Configuration(
                "KURA_STORAGE=supabase requires SUPABASE_URL and SUPABASE_ANON_KEY".to_string(),
            ));
        }

        let http_timeout = match lookup("KURA_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                DomainError::Configuration(format!("Invalid KURA_HTTP_TIMEOUT_SECS: {e}"))
            })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            backend,
            supabase,
            http_timeout,
        })
    }

    /// Shuttle secrets, falling back to the process environment
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Result<Self, DomainError> {
        Self::from_lookup(|key| secrets.get(key).or_else(|| std::env::var(key).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_postgres() {
        let settings = StorageSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.backend, StorageBackend::Postgres);
        assert_eq!(settings.http_timeout, Duration::from_secs(30));
        assert!(settings.supabase.is_none());
    }

    #[test]
    fn test_supabase_requires_credentials() {
        let result = StorageSettings::from_lookup(lookup_from(&[("KURA_STORAGE", "supabase")]));
        assert!(matches!(result, Err(DomainError::Configuration(_))));

        let settings = StorageSettings::from_lookup(lookup_from(&[
            ("KURA_STORAGE", "Supabase"),
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("KURA_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(settings.backend, StorageBackend::Supabase);
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
        assert_eq!(settings.supabase.unwrap().anon_key, "anon");
    }

    #[test]
    fn test_rejects_unknown_backend_and_bad_timeout() {
        assert!(StorageSettings::from_lookup(lookup_from(&[("KURA_STORAGE", "mongo")])).is_err());
        assert!(
            StorageSettings::from_lookup(lookup_from(&[("KURA_HTTP_TIMEOUT_SECS", "soon")]))
                .is_err()
        );
    }
}
