//! Qudora credential resolution.
//!
//! Credentials are looked up in this order, first match wins:
//!
//! 1. `CUDAQ_QUDORA_CREDENTIALS`: used verbatim as the API key; no file is
//!    read and no refresh key is set.
//! 2. The `credentials` backend option, a path to a credential file.
//! 3. `~/.qudora_config`.
//!
//! A credential file holds one `<key> : <value>` pair per line. Recognized
//! keys are `key` (API key), `refresh` (refresh key) and `time` (optional
//! retrieval timestamp). Both `key` and `refresh` must be present and
//! non-empty.
//!
//! Nothing is cached: every [`CredentialResolver::resolve`] call reads the
//! environment and the file again, so rotated credentials are picked up
//! mid-session.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{QudoraError, QudoraResult};

/// Environment variable holding an inline API key.
pub const CREDENTIALS_ENV_VAR: &str = "CUDAQ_QUDORA_CREDENTIALS";

/// Credential file name in the user's home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".qudora_config";

/// Source of environment-dependent lookups.
pub trait CredentialEnv: Send + Sync {
    /// Inline credentials from the environment, if set and non-empty.
    fn inline_credentials(&self) -> Option<String>;

    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Reads the real process environment on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl CredentialEnv for ProcessEnv {
    fn inline_credentials(&self) -> Option<String> {
        std::env::var(CREDENTIALS_ENV_VAR)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Environment with fixed values, for hosts that manage credentials
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct FixedEnv {
    inline: Option<String>,
    home: Option<PathBuf>,
}

impl FixedEnv {
    /// An environment with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inline credentials.
    pub fn with_inline_credentials(mut self, token: impl Into<String>) -> Self {
        self.inline = Some(token.into()).filter(|t| !t.is_empty());
        self
    }

    /// Set the home directory.
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }
}

impl CredentialEnv for FixedEnv {
    fn inline_credentials(&self) -> Option<String> {
        self.inline.clone()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }
}

/// Resolved authentication material.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API key sent as the bearer token.
    pub api_key: String,
    /// Refresh key; absent for inline credentials.
    pub refresh_key: Option<String>,
    /// When the keys were retrieved, as written in the file.
    pub retrieved_at: Option<String>,
}

impl Credentials {
    /// Credentials consisting of an API key only.
    pub fn from_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            refresh_key: None,
            retrieved_at: None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("refresh_key", &self.refresh_key.as_ref().map(|_| "[REDACTED]"))
            .field("retrieved_at", &self.retrieved_at)
            .finish()
    }
}

/// Where resolved credentials came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// The `CUDAQ_QUDORA_CREDENTIALS` environment variable.
    Environment,
    /// A credential file.
    File(PathBuf),
}

/// Credentials together with their source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub credentials: Credentials,
    pub source: CredentialSource,
}

/// Resolves credentials from the environment, an explicit path, or the
/// default config file.
#[derive(Clone)]
pub struct CredentialResolver {
    user_specified: Option<String>,
    env: Arc<dyn CredentialEnv>,
}

impl CredentialResolver {
    /// Create a resolver reading the process environment.
    ///
    /// An empty `user_specified` value is treated as absent.
    pub fn new(user_specified: Option<String>) -> Self {
        Self {
            user_specified: user_specified.filter(|s| !s.is_empty()),
            env: Arc::new(ProcessEnv),
        }
    }

    /// Replace the environment lookups.
    pub fn with_env(mut self, env: Arc<dyn CredentialEnv>) -> Self {
        self.env = env;
        self
    }

    /// Resolve credentials.
    pub fn resolve(&self) -> QudoraResult<ResolvedCredentials> {
        if let Some(inline) = self.env.inline_credentials() {
            debug!("Using Qudora credentials from {}", CREDENTIALS_ENV_VAR);
            return Ok(ResolvedCredentials {
                credentials: Credentials::from_api_key(inline),
                source: CredentialSource::Environment,
            });
        }

        let path = match &self.user_specified {
            Some(path) => PathBuf::from(path),
            None => self.default_config_path()?,
        };

        debug!("Reading Qudora credentials from {}", path.display());
        let credentials = read_credentials_file(&path)?;
        Ok(ResolvedCredentials {
            credentials,
            source: CredentialSource::File(path),
        })
    }

    /// `~/.qudora_config` for the current environment.
    pub fn default_config_path(&self) -> QudoraResult<PathBuf> {
        self.env
            .home_dir()
            .map(|home| home.join(DEFAULT_CONFIG_FILE))
            .ok_or(QudoraError::NoHomeDir)
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field(
                "user_specified",
                &self.user_specified.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

/// Read and parse a credential file.
pub fn read_credentials_file(path: &Path) -> QudoraResult<Credentials> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            QudoraError::ConfigNotFound(path.to_path_buf())
        } else {
            QudoraError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_credentials(&contents, path)
}

/// Parse credential file contents; `path` is only used in error messages.
pub fn parse_credentials(contents: &str, path: &Path) -> QudoraResult<Credentials> {
    let malformed = |reason: String| QudoraError::MalformedConfig {
        path: path.to_path_buf(),
        reason,
    };

    let mut api_key = String::new();
    let mut refresh_key = String::new();
    let mut retrieved_at = None;

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(':').collect();
        let [key, value] = parts.as_slice() else {
            return Err(malformed(format!(
                "line {}: key-value pairs must be in `<key> : <value>` format (one per line)",
                index + 1
            )));
        };

        let value = value.trim();
        match key.trim() {
            "key" => api_key = value.to_string(),
            "refresh" => refresh_key = value.to_string(),
            "time" => retrieved_at = Some(value.to_string()).filter(|v| !v.is_empty()),
            other => return Err(malformed(format!("unknown key `{other}`"))),
        }
    }

    if api_key.is_empty() {
        return Err(malformed("empty API key".into()));
    }
    if refresh_key.is_empty() {
        return Err(malformed("empty refresh key".into()));
    }

    Ok(Credentials {
        api_key,
        refresh_key: Some(refresh_key),
        retrieved_at,
    })
}
