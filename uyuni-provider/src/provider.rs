//! Provider configuration for the Uyuni plugin
//!
//! Resolves host, username and password from the provider block with a
//! fallback to environment variables, validates the result, and connects
//! the shared API client handed to every resource and data source.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use uyuni_api::ConnectionDetails;
use uyuni_provider_core::{
    AttributeSchema, AttributeType, Attributes, ConfiguredProvider, Diagnostics, Provider, Schema,
};

use crate::user_resource::UserResource;
use crate::users_data_source::UsersDataSource;

/// Environment fallback for the `host` attribute
pub const ENV_HOST: &str = "UYUNI_HOST";
/// Environment fallback for the `username` attribute
pub const ENV_USERNAME: &str = "UYUNI_USERNAME";
/// Environment fallback for the `password` attribute
pub const ENV_PASSWORD: &str = "UYUNI_PASSWORD";

/// The Uyuni provider implementation
pub struct UyuniProvider {
    /// Set to the provider version on release, "dev" when built and run
    /// locally, and "test" when running acceptance tests
    version: String,
}

impl UyuniProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolve connection settings from configuration and an environment
    /// lookup
    ///
    /// Explicit configuration wins over the environment. All independent
    /// validation failures are accumulated before this returns.
    pub fn resolve_connection<F>(
        config: &Attributes,
        env: F,
    ) -> Result<ConnectionDetails, Diagnostics>
    where
        F: Fn(&str) -> Option<String>,
    {
        const FIELDS: [(&str, &str, &str); 3] = [
            ("host", ENV_HOST, "Uyuni API Host"),
            ("username", ENV_USERNAME, "Uyuni API Username"),
            ("password", ENV_PASSWORD, "Uyuni API Password"),
        ];

        let mut diags = Diagnostics::new();

        // A value derived from a not-yet-applied resource cannot be used
        // to build the client.
        for (attr, env_var, label) in FIELDS {
            if config.is_unknown(attr) {
                diags.add_attribute_error(
                    attr,
                    format!("Unknown {label}"),
                    format!(
                        "The provider cannot create the Uyuni API client as there is an unknown \
                         configuration value for the {label}. Either target apply the source of \
                         the value first, set the value statically in the configuration, or use \
                         the {env_var} environment variable."
                    ),
                );
            }
        }
        if diags.has_errors() {
            return Err(diags);
        }

        let mut resolved = [String::new(), String::new(), String::new()];
        for (slot, (attr, env_var, label)) in resolved.iter_mut().zip(FIELDS) {
            *slot = match config.get_string(attr) {
                Some(value) => value.to_string(),
                None => env(env_var).unwrap_or_default(),
            };
            if slot.is_empty() {
                diags.add_attribute_error(
                    attr,
                    format!("Missing {label}"),
                    format!(
                        "The provider cannot create the Uyuni API client as there is a missing \
                         or empty value for the {label}. Set the {attr} value in the \
                         configuration or use the {env_var} environment variable. If either is \
                         already set, ensure the value is not empty."
                    ),
                );
            }
        }
        if diags.has_errors() {
            return Err(diags);
        }

        let [host, username, password] = resolved;
        Ok(ConnectionDetails::new(host, username, password).with_insecure(true))
    }

    /// Configure against an explicit environment lookup
    ///
    /// `Provider::configure` passes the process environment; tests pass a
    /// closure over a plain map.
    pub async fn configure_with_env<F>(
        &self,
        config: &Attributes,
        env: F,
    ) -> Result<ConfiguredProvider, Diagnostics>
    where
        F: Fn(&str) -> Option<String>,
    {
        let details = Self::resolve_connection(config, env)?;

        info!(
            host = %details.server,
            username = %details.user,
            version = %self.version,
            "configuring Uyuni client"
        );

        let client = match uyuni_api::init(&details).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                let mut diags = Diagnostics::new();
                diags.add_error(
                    "Unable to Create Uyuni API Client",
                    format!(
                        "An unexpected error occurred when creating the Uyuni API client. If \
                         the error is not clear, please contact the provider developers.\n\n\
                         Uyuni client error: {e}"
                    ),
                );
                return Err(diags);
            }
        };

        info!("configured Uyuni client");

        Ok(ConfiguredProvider::new()
            .with_resource(Box::new(UserResource::new(Arc::clone(&client))))
            .with_data_source(Box::new(UsersDataSource::new(client))))
    }
}

#[async_trait]
impl Provider for UyuniProvider {
    fn name(&self) -> &'static str {
        "uyuni"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attribute(AttributeSchema::new("host", AttributeType::String))
            .attribute(AttributeSchema::new("username", AttributeType::String))
            .attribute(AttributeSchema::new("password", AttributeType::String).sensitive())
    }

    async fn configure(&self, config: &Attributes) -> Result<ConfiguredProvider, Diagnostics> {
        self.configure_with_env(config, |key| std::env::var(key).ok())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uyuni_provider_core::Value;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_host_with_env_credentials() {
        let config = Attributes::new().with("host", Value::string("h"));
        let env = env_from(&[(ENV_USERNAME, "u"), (ENV_PASSWORD, "p")]);

        let details = UyuniProvider::resolve_connection(&config, env).unwrap();
        assert_eq!(details.server, "h");
        assert_eq!(details.user, "u");
        assert_eq!(details.password, "p");
        assert!(details.insecure);
        assert!(details.ca_cert.is_none());
    }

    #[test]
    fn test_explicit_configuration_wins_over_environment() {
        let config = Attributes::new()
            .with("host", Value::string("explicit-host"))
            .with("username", Value::string("explicit-user"))
            .with("password", Value::string("explicit-pass"));
        let env = env_from(&[
            (ENV_HOST, "env-host"),
            (ENV_USERNAME, "env-user"),
            (ENV_PASSWORD, "env-pass"),
        ]);

        let details = UyuniProvider::resolve_connection(&config, env).unwrap();
        assert_eq!(details.server, "explicit-host");
        assert_eq!(details.user, "explicit-user");
        assert_eq!(details.password, "explicit-pass");
    }

    #[test]
    fn test_all_missing_values_reported_together() {
        let err = UyuniProvider::resolve_connection(&Attributes::new(), |_| None).unwrap_err();

        assert_eq!(err.errors().count(), 3);
        let attrs: Vec<_> = err.errors().map(|d| d.attribute.as_deref()).collect();
        assert_eq!(attrs, vec![Some("host"), Some("username"), Some("password")]);
        for diag in err.errors() {
            assert!(diag.summary.starts_with("Missing"));
        }
    }

    #[test]
    fn test_unknown_value_aborts_before_missing_checks() {
        let config = Attributes::new().with("host", Value::Unknown);
        let err = UyuniProvider::resolve_connection(&config, |_| None).unwrap_err();

        assert_eq!(err.errors().count(), 1);
        let diag = err.errors().next().unwrap();
        assert_eq!(diag.attribute.as_deref(), Some("host"));
        assert!(diag.summary.contains("Unknown"));
        assert!(diag.detail.contains(ENV_HOST));
    }

    #[test]
    fn test_empty_explicit_value_is_missing() {
        let config = Attributes::new()
            .with("host", Value::string("h"))
            .with("username", Value::string(""))
            .with("password", Value::string("p"));
        let err = UyuniProvider::resolve_connection(&config, |_| None).unwrap_err();

        assert_eq!(err.errors().count(), 1);
        assert_eq!(
            err.errors().next().unwrap().attribute.as_deref(),
            Some("username")
        );
    }

    #[test]
    fn test_provider_schema_marks_password_sensitive() {
        let schema = UyuniProvider::new("test").schema();
        assert!(schema.attributes["password"].sensitive);
        assert!(!schema.attributes["host"].required);
        assert!(!schema.attributes["username"].required);
    }
}
