//! config
//!
//! Environment-driven configuration.
//!
//! # Overview
//!
//! All configuration comes from process environment variables, read once at
//! startup. Nothing in the store or API layers touches the environment after
//! that.
//!
//! | Variable         | Required            | Default        |
//! |------------------|---------------------|----------------|
//! | `GITHUB_TOKEN`   | in production       | —              |
//! | `GITHUB_OWNER`   | in production       | —              |
//! | `GITHUB_REPO`    | in production       | —              |
//! | `CONTENT_BRANCH` | no                  | `main`         |
//! | `CONTENT_DIR`    | no                  | `src/icerik`   |
//! | `APP_ENV`        | no                  | `production`   |
//! | `BIND_ADDR`      | no                  | `0.0.0.0:3000` |
//!
//! # Backend selection
//!
//! The GitHub-backed store is used whenever credentials are present. Running
//! without credentials is only allowed in development, where writes fall back
//! to local disk. A production process with incomplete credentials fails at
//! startup, before any request is accepted.

use std::net::SocketAddr;
use thiserror::Error;

/// Default branch all commits target.
pub const DEFAULT_BRANCH: &str = "main";

/// Default repository-relative directory holding article markdown files.
pub const DEFAULT_CONTENT_DIR: &str = "src/icerik";

/// Default listen address for the HTTP API.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Errors from configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// Credentials were supplied partially (e.g. token without owner/repo).
    #[error("incomplete GitHub credentials: {0} is set but {1} is missing")]
    PartialCredentials(&'static str, &'static str),

    /// `APP_ENV` is not a recognized environment name.
    #[error("invalid APP_ENV value: {0} (expected `production` or `development`)")]
    InvalidEnvironment(String),

    /// `BIND_ADDR` is not a parseable socket address.
    #[error("invalid BIND_ADDR value: {0}")]
    InvalidBindAddr(String),
}

/// Deployment environment.
///
/// Controls backend selection and whether error detail is echoed to API
/// clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Hosted deployment: credentials required, error detail suppressed.
    Production,
    /// Local development: local-disk fallback allowed, error detail shown.
    Development,
}

impl Environment {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" => Some(Environment::Development),
            _ => None,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
        }
    }
}

/// Coordinates and credential for the remote content repository.
#[derive(Clone)]
pub struct GitHubConfig {
    /// Bearer token for the GitHub REST API.
    pub token: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch all commits target.
    pub branch: String,
}

// Custom Debug to keep the token out of logs.
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .finish_non_exhaustive()
    }
}

/// Process configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment.
    pub environment: Environment,
    /// Remote repository coordinates; `None` means local fallback mode.
    pub github: Option<GitHubConfig>,
    /// Repository-relative directory for article files. Also the local
    /// directory the read endpoints and the fallback store use.
    pub content_dir: String,
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - `MissingVar` when running in production without full credentials
    /// - `PartialCredentials` when only some of the GitHub variables are set
    /// - `InvalidEnvironment` / `InvalidBindAddr` on unparseable values
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Whether API error responses may include internal error detail.
    pub fn expose_error_detail(&self) -> bool {
        self.environment != Environment::Production
    }

    fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match get("APP_ENV") {
            Some(raw) => {
                Environment::parse(&raw).ok_or(ConfigError::InvalidEnvironment(raw))?
            }
            None => Environment::Production,
        };

        let token = get("GITHUB_TOKEN").filter(|s| !s.is_empty());
        let owner = get("GITHUB_OWNER").filter(|s| !s.is_empty());
        let repo = get("GITHUB_REPO").filter(|s| !s.is_empty());

        let github = match (token, owner, repo) {
            (Some(token), Some(owner), Some(repo)) => Some(GitHubConfig {
                token,
                owner,
                repo,
                branch: get("CONTENT_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            }),
            (None, None, None) => {
                if environment == Environment::Production {
                    return Err(ConfigError::MissingVar("GITHUB_TOKEN"));
                }
                None
            }
            (token, owner, repo) => {
                let set = if token.is_some() {
                    "GITHUB_TOKEN"
                } else if owner.is_some() {
                    "GITHUB_OWNER"
                } else {
                    "GITHUB_REPO"
                };
                let missing = if token.is_none() {
                    "GITHUB_TOKEN"
                } else if owner.is_none() {
                    "GITHUB_OWNER"
                } else {
                    "GITHUB_REPO"
                };
                return Err(ConfigError::PartialCredentials(set, missing));
            }
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr(e.to_string()))?;

        Ok(Config {
            environment,
            github,
            content_dir: get("CONTENT_DIR").unwrap_or_else(|| DEFAULT_CONTENT_DIR.to_string()),
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    mod environment {
        use super::*;

        #[test]
        fn parses_aliases() {
            assert_eq!(Environment::parse("production"), Some(Environment::Production));
            assert_eq!(Environment::parse("prod"), Some(Environment::Production));
            assert_eq!(Environment::parse("Development"), Some(Environment::Development));
            assert_eq!(Environment::parse("dev"), Some(Environment::Development));
            assert_eq!(Environment::parse("staging"), None);
        }

        #[test]
        fn display() {
            assert_eq!(Environment::Production.to_string(), "production");
            assert_eq!(Environment::Development.to_string(), "development");
        }
    }

    mod loading {
        use super::*;

        #[test]
        fn full_credentials_select_github() {
            let config = config_from(&[
                ("GITHUB_TOKEN", "ghp_x"),
                ("GITHUB_OWNER", "izmirdesen"),
                ("GITHUB_REPO", "site"),
            ])
            .unwrap();

            let github = config.github.expect("github config");
            assert_eq!(github.owner, "izmirdesen");
            assert_eq!(github.repo, "site");
            assert_eq!(github.branch, DEFAULT_BRANCH);
            assert_eq!(config.environment, Environment::Production);
        }

        #[test]
        fn production_without_credentials_fails() {
            let result = config_from(&[]);
            assert!(matches!(result, Err(ConfigError::MissingVar(_))));
        }

        #[test]
        fn development_without_credentials_uses_fallback() {
            let config = config_from(&[("APP_ENV", "development")]).unwrap();
            assert!(config.github.is_none());
            assert!(config.expose_error_detail());
        }

        #[test]
        fn partial_credentials_rejected_even_in_development() {
            let result = config_from(&[("APP_ENV", "development"), ("GITHUB_TOKEN", "ghp_x")]);
            assert!(matches!(
                result,
                Err(ConfigError::PartialCredentials("GITHUB_TOKEN", _))
            ));
        }

        #[test]
        fn empty_variables_count_as_unset() {
            let config = config_from(&[
                ("APP_ENV", "development"),
                ("GITHUB_TOKEN", ""),
                ("GITHUB_OWNER", ""),
                ("GITHUB_REPO", ""),
            ])
            .unwrap();
            assert!(config.github.is_none());
        }

        #[test]
        fn overrides_apply() {
            let config = config_from(&[
                ("GITHUB_TOKEN", "ghp_x"),
                ("GITHUB_OWNER", "o"),
                ("GITHUB_REPO", "r"),
                ("CONTENT_BRANCH", "yayin"),
                ("CONTENT_DIR", "icerik"),
                ("BIND_ADDR", "127.0.0.1:8080"),
            ])
            .unwrap();

            assert_eq!(config.github.as_ref().unwrap().branch, "yayin");
            assert_eq!(config.content_dir, "icerik");
            assert_eq!(config.bind_addr.port(), 8080);
        }

        #[test]
        fn invalid_environment_rejected() {
            let result = config_from(&[("APP_ENV", "staging")]);
            assert!(matches!(result, Err(ConfigError::InvalidEnvironment(_))));
        }

        #[test]
        fn invalid_bind_addr_rejected() {
            let result = config_from(&[("APP_ENV", "development"), ("BIND_ADDR", "nope")]);
            assert!(matches!(result, Err(ConfigError::InvalidBindAddr(_))));
        }

        #[test]
        fn production_hides_error_detail() {
            let config = config_from(&[
                ("GITHUB_TOKEN", "ghp_x"),
                ("GITHUB_OWNER", "o"),
                ("GITHUB_REPO", "r"),
            ])
            .unwrap();
            assert!(!config.expose_error_detail());
        }
    }

    mod debug_output {
        use super::*;

        #[test]
        fn github_config_debug_redacts_token() {
            let config = config_from(&[
                ("GITHUB_TOKEN", "ghp_secret_abc"),
                ("GITHUB_OWNER", "o"),
                ("GITHUB_REPO", "r"),
            ])
            .unwrap();

            let output = format!("{:?}", config);
            assert!(!output.contains("ghp_secret_abc"));
            assert!(output.contains("owner"));
        }
    }
}
