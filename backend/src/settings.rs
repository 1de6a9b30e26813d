//! Application settings loaded via OrthoConfig.
//!
//! Values come from `EFFORTEE_*` environment variables, configuration files
//! and command-line flags, in increasing order of precedence. The unprefixed
//! `MONGO_URI`, `PORT` and `API_TOKEN` variables read by earlier deployments
//! are honoured through [`AppSettings::with_legacy_env`] when no `EFFORTEE_*`
//! source set the value.

use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::inbound::http::auth::ApiToken;
use crate::outbound::persistence::ConnectionConfig;

const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "effortee";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Errors raised when settings are present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// No bearer token was configured, or it was blank.
    #[error("EFFORTEE_API_TOKEN must be set to a non-empty value")]
    MissingApiToken,
    /// The listen host is not an IP address.
    #[error("invalid listen host `{host}`: expected an IP address")]
    InvalidHost { host: String },
    /// A legacy port variable did not hold a port number.
    #[error("invalid {name} `{value}`: expected a port number")]
    InvalidPort { name: &'static str, value: String },
}

/// Runtime configuration for the API server and setup tool.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EFFORTEE")]
pub struct AppSettings {
    /// MongoDB connection string.
    #[ortho_config(default = DEFAULT_MONGO_URI.to_owned())]
    pub mongo_uri: String,
    /// Database holding the `users` and `quests` collections.
    #[ortho_config(default = DEFAULT_DATABASE.to_owned())]
    pub database: String,
    /// Listen address.
    #[ortho_config(default = DEFAULT_HOST.to_owned())]
    pub host: String,
    /// Listen port.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// Shared bearer token clients must present.
    pub api_token: Option<String>,
}

/// Read a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl AppSettings {
    /// Return the configured MongoDB URI.
    pub fn mongo_uri(&self) -> &str {
        &self.mongo_uri
    }

    /// Return the configured database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Return the configured listen port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Fill values from the unprefixed `MONGO_URI`, `PORT` and `API_TOKEN`
    /// variables.
    ///
    /// A legacy variable only applies while its `EFFORTEE_*` counterpart is
    /// unset and the value still holds its default, so flags and files keep
    /// precedence.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidPort`] when `PORT` is not a port number.
    pub fn with_legacy_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let legacy = |name: &str, prefixed: &str| match lookup(prefixed) {
            Some(_) => None,
            None => lookup(name),
        };

        if self.mongo_uri == DEFAULT_MONGO_URI {
            if let Some(uri) = legacy("MONGO_URI", "EFFORTEE_MONGO_URI") {
                info!("using legacy MONGO_URI");
                self.mongo_uri = uri;
            }
        }
        if self.port == DEFAULT_PORT {
            if let Some(value) = legacy("PORT", "EFFORTEE_PORT") {
                let Ok(port) = value.trim().parse() else {
                    return Err(SettingsError::InvalidPort { name: "PORT", value });
                };
                self.port = port;
                info!(port = self.port, "using legacy PORT");
            }
        }
        if self.api_token.is_none() {
            self.api_token = legacy("API_TOKEN", "EFFORTEE_API_TOKEN");
        }
        Ok(self)
    }

    /// Resolve the socket address the HTTP server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip: IpAddr = self.host.parse().map_err(|_| SettingsError::InvalidHost {
            host: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Build the persistence connection settings.
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.mongo_uri(), self.database())
    }

    /// Take the configured bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingApiToken`] when the token is absent
    /// or blank.
    pub fn api_token(&self) -> Result<ApiToken, SettingsError> {
        self.api_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .and_then(ApiToken::new)
            .ok_or(SettingsError::MissingApiToken)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "EFFORTEE_MONGO_URI",
        "EFFORTEE_DATABASE",
        "EFFORTEE_HOST",
        "EFFORTEE_PORT",
        "EFFORTEE_API_TOKEN",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("effortee")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.mongo_uri(), DEFAULT_MONGO_URI);
        assert_eq!(settings.database(), DEFAULT_DATABASE);
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
        );
        assert_eq!(
            settings.api_token().expect_err("no token"),
            SettingsError::MissingApiToken
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("EFFORTEE_MONGO_URI", Some("mongodb://db:27017".to_owned())),
            ("EFFORTEE_DATABASE", Some("effortee_test".to_owned())),
            ("EFFORTEE_HOST", Some("127.0.0.1".to_owned())),
            ("EFFORTEE_PORT", Some("8081".to_owned())),
            ("EFFORTEE_API_TOKEN", Some("s3cret".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let connection = settings.connection();
        assert_eq!(connection.uri(), "mongodb://db:27017");
        assert_eq!(connection.database(), "effortee_test");
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 8081)))
        );
        assert!(settings.api_token().expect("token set").matches("s3cret"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_tokens_are_rejected(#[case] token: &str) {
        let _guard = lock_env([("EFFORTEE_API_TOKEN", Some(token.to_owned()))]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_token().expect_err("blank token"),
            SettingsError::MissingApiToken
        );
    }

    #[rstest]
    fn host_names_are_not_resolved() {
        let _guard = lock_env([("EFFORTEE_HOST", Some("localhost".to_owned()))]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Err(SettingsError::InvalidHost {
                host: "localhost".to_owned()
            })
        );
    }

    fn lookup_in<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[rstest]
    fn legacy_variables_fill_unset_values() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let legacy = [
            ("MONGO_URI", "mongodb://legacy:27017"),
            ("PORT", "4000"),
            ("API_TOKEN", "legacy-token"),
        ];

        let settings = load_from_empty_args()
            .with_legacy_env(lookup_in(&legacy))
            .expect("legacy values parse");
        assert_eq!(settings.mongo_uri(), "mongodb://legacy:27017");
        assert_eq!(settings.port(), 4000);
        assert!(settings.api_token().expect("token set").matches("legacy-token"));
    }

    #[rstest]
    fn prefixed_variables_win_over_legacy_ones() {
        let _guard = lock_env([
            ("EFFORTEE_MONGO_URI", Some("mongodb://db:27017".to_owned())),
            ("EFFORTEE_PORT", Some("3000".to_owned())),
            ("EFFORTEE_API_TOKEN", Some("s3cret".to_owned())),
            ("MONGO_URI", Some("mongodb://legacy:27017".to_owned())),
            ("PORT", Some("4000".to_owned())),
            ("API_TOKEN", Some("legacy-token".to_owned())),
        ]);

        let settings = load_from_empty_args()
            .with_legacy_env(process_env)
            .expect("legacy values parse");
        assert_eq!(settings.mongo_uri(), "mongodb://db:27017");
        assert_eq!(settings.port(), 3000);
        assert!(settings.api_token().expect("token set").matches("s3cret"));
    }

    #[rstest]
    fn malformed_legacy_port_is_reported() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let legacy = [("PORT", "http")];

        let err = load_from_empty_args()
            .with_legacy_env(lookup_in(&legacy))
            .expect_err("not a port");
        assert_eq!(
            err,
            SettingsError::InvalidPort {
                name: "PORT",
                value: "http".to_owned()
            }
        );
    }
}
