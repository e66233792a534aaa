//! Client configuration.
//!
//! NOVA deployments configure two endpoints: the OAuth2 single sign-on
//! server and the SOAP webservice host. Both share a `default` block of
//! HTTP settings which the per-endpoint blocks override field by field.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{NovaError, Result};

/// NOVA interface version used when the configuration does not pin one.
pub const DEFAULT_NOVA_VERSION: &str = "v14";

/// Request timeout applied when neither the endpoint nor the default
/// block configures one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_version() -> String {
    DEFAULT_NOVA_VERSION.to_string()
}

/// HTTP settings for one endpoint, all optional so they can be layered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpSettings {
    /// Base URL of the endpoint, e.g. `https://nova-int-ws.sbb.ch`.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User agent header sent with every request.
    pub user_agent: Option<String>,
}

impl HttpSettings {
    /// Layers `self` over `fallback`. Fields set on `self` win.
    pub fn merged_over(&self, fallback: &HttpSettings) -> HttpSettings {
        HttpSettings {
            base_url: self.base_url.clone().or_else(|| fallback.base_url.clone()),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            user_agent: self
                .user_agent
                .clone()
                .or_else(|| fallback.user_agent.clone()),
        }
    }
}

/// OAuth2 single sign-on settings: endpoint plus client credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SsoSettings {
    #[serde(flatten)]
    pub http: HttpSettings,
    /// OAuth2 client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth2 client secret.
    #[serde(default)]
    pub client_secret: String,
}

/// Complete client configuration.
///
/// Deserializable from any serde format, typically JSON:
///
/// ```
/// let config: novaapi::NovaConfig = serde_json::from_str(
///     r#"{
///         "default": {"timeout_secs": 10},
///         "sso": {
///             "base_url": "https://sso-int.sbb.ch",
///             "client_id": "my-client",
///             "client_secret": "my-secret"
///         },
///         "webservice": {"base_url": "https://nova-int-ws.sbb.ch"}
///     }"#,
/// )?;
/// assert_eq!(config.version, "v14");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NovaConfig {
    /// NOVA interface version, substituted into endpoint paths,
    /// namespaces and SOAP actions.
    #[serde(default = "default_version")]
    pub version: String,
    /// Settings shared by both endpoints unless overridden.
    #[serde(default)]
    pub default: HttpSettings,
    /// Token endpoint settings and credentials.
    #[serde(default)]
    pub sso: SsoSettings,
    /// SOAP webservice endpoint settings.
    #[serde(default)]
    pub webservice: HttpSettings,
}

impl Default for NovaConfig {
    fn default() -> Self {
        NovaConfig {
            version: default_version(),
            default: HttpSettings::default(),
            sso: SsoSettings::default(),
            webservice: HttpSettings::default(),
        }
    }
}

impl NovaConfig {
    /// Layers the endpoint settings over the defaults and validates the
    /// result.
    ///
    /// Fails with [`NovaError::Config`] when a base URL or the client
    /// credentials are missing, and with [`NovaError::Url`] when a base
    /// URL does not parse.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        if self.sso.client_id.is_empty() || self.sso.client_secret.is_empty() {
            return Err(NovaError::config(
                "OAuth2 client credentials are not configured",
            ));
        }

        let sso_http = self.sso.http.merged_over(&self.default);
        let webservice_http = self.webservice.merged_over(&self.default);

        Ok(ResolvedConfig {
            version: self.version.clone(),
            sso: resolve_endpoint(&sso_http, "sso")?,
            webservice: resolve_endpoint(&webservice_http, "webservice")?,
            client_id: self.sso.client_id.clone(),
            client_secret: self.sso.client_secret.clone(),
        })
    }
}

fn resolve_endpoint(settings: &HttpSettings, name: &str) -> Result<ResolvedEndpoint> {
    let base_url = match settings.base_url.as_deref() {
        Some(url) if !url.is_empty() => Url::parse(url)?,
        _ => {
            return Err(NovaError::config(format!(
                "No base URL configured for the {name} endpoint"
            )));
        }
    };

    Ok(ResolvedEndpoint {
        base_url,
        timeout: Duration::from_secs(settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        user_agent: settings.user_agent.clone(),
    })
}

/// One endpoint after layering and validation.
#[derive(Debug, Clone)]
pub struct ResolvedEndpoint {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

/// Configuration after layering and validation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub version: String,
    pub sso: ResolvedEndpoint,
    pub webservice: ResolvedEndpoint,
    pub client_id: String,
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> NovaConfig {
        serde_json::from_str(
            r#"{
                "default": {"base_url": "https://fallback.example", "timeout_secs": 5},
                "sso": {
                    "base_url": "https://sso.example",
                    "client_id": "id",
                    "client_secret": "secret"
                },
                "webservice": {"user_agent": "nova-client/1.0"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn version_defaults_to_v14() {
        let config = full_config();
        assert_eq!(config.version, DEFAULT_NOVA_VERSION);
        assert_eq!(NovaConfig::default().version, "v14");
    }

    #[test]
    fn endpoint_settings_override_defaults() {
        let resolved = full_config().resolve().unwrap();
        assert_eq!(resolved.sso.base_url.as_str(), "https://sso.example/");
        assert_eq!(
            resolved.webservice.base_url.as_str(),
            "https://fallback.example/"
        );
        assert_eq!(resolved.sso.timeout, Duration::from_secs(5));
        assert_eq!(resolved.sso.user_agent, None);
        assert_eq!(
            resolved.webservice.user_agent.as_deref(),
            Some("nova-client/1.0")
        );
    }

    #[test]
    fn timeout_falls_back_to_default_constant() {
        let mut config = full_config();
        config.default.timeout_secs = None;
        let resolved = config.resolve().unwrap();
        assert_eq!(
            resolved.webservice.timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let mut config = full_config();
        config.sso.client_secret.clear();
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, NovaError::Config { .. }));
        assert!(err.to_string().contains("client credentials"));
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let mut config = full_config();
        config.default.base_url = None;
        config.webservice.base_url = None;
        let err = config.resolve().unwrap_err();
        assert!(err.to_string().contains("webservice endpoint"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut config = full_config();
        config.sso.http.base_url = Some("not a url".to_string());
        assert!(matches!(
            config.resolve().unwrap_err(),
            NovaError::Url(_)
        ));
    }
}
