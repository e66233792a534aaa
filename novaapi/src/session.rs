//! OAuth2 session handling and HTTP transport for the SOAP services.
//!
//! NOVA sits behind the SBB SSO gateway. Every SOAP call is made with a
//! client-credentials bearer token; tokens are cached and renewed after
//! a fixed lifetime rather than tracking the `expires_in` the gateway
//! reports.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ResolvedConfig;
use crate::error::{NovaError, Result};
use crate::parser::normalize::{HttpFailure, failure_to_error};

/// Token endpoint under the SSO base URL.
pub const TOKEN_ENDPOINT_PATH: &str = "/auth/realms/SBB_Public/protocol/openid-connect/token";

/// Sessions older than this are dropped and a fresh token is fetched.
pub const SESSION_MAX_LIFETIME: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug)]
struct Session {
    client: Client,
    minted_at: Instant,
}

/// Lazily authenticated HTTP transport shared by all service calls.
///
/// The first request logs in against the SSO token endpoint and keeps a
/// client with the bearer token as default header. Concurrent callers
/// share one login through the session lock.
#[derive(Debug)]
pub struct SessionManager {
    config: ResolvedConfig,
    session: Mutex<Option<Session>>,
}

impl SessionManager {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    /// The resolved configuration this session was built from.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Posts a SOAP envelope to a service path under the webservice
    /// base URL and returns the raw response body.
    pub async fn post_soap(&self, path: &str, soap_action: &str, envelope: String) -> Result<String> {
        let client = self.client().await?;
        let url = self.config.webservice.base_url.join(path)?;

        debug!("POST {} [{}]", url, soap_action);

        let response = client
            .post(url.clone())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", soap_action)
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = transport_message(&url, status);
            let body = response.text().await.unwrap_or_default();
            warn!("SOAP request failed: {}", message);
            return Err(failure_to_error(&HttpFailure {
                status: status.as_u16(),
                message,
                body,
            }));
        }

        Ok(response.text().await?)
    }

    /// Returns the cached authenticated client, logging in if there is
    /// none yet or the cached session is too old.
    async fn client(&self) -> Result<Client> {
        let mut guard = self.session.lock().await;

        if let Some(session) = guard.as_ref() {
            if session.minted_at.elapsed() < SESSION_MAX_LIFETIME {
                return Ok(session.client.clone());
            }
            debug!("OAuth2 session expired, renewing");
        }

        let client = self.login().await?;
        *guard = Some(Session {
            client: client.clone(),
            minted_at: Instant::now(),
        });

        Ok(client)
    }

    /// Requests an access token with the client-credentials grant and
    /// builds the authenticated client.
    async fn login(&self) -> Result<Client> {
        let sso = &self.config.sso;
        let url = sso.base_url.join(TOKEN_ENDPOINT_PATH)?;

        info!("Requesting OAuth2 access token from {}", url);

        let mut builder = Client::builder().timeout(sso.timeout);
        if let Some(agent) = &sso.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let response = builder
            .build()?
            .post(url.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = transport_message(&url, status);
            let body = response.text().await.unwrap_or_default();
            warn!("Token request failed: {}", message);
            return Err(failure_to_error(&HttpFailure {
                status: status.as_u16(),
                message,
                body,
            }));
        }

        let body = response.text().await?;
        let token = parse_access_token(&body)?;

        self.authenticated_client(&token)
    }

    fn authenticated_client(&self, token: &str) -> Result<Client> {
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| NovaError::Authentication {
                message: "Oauth2 access token is not a valid header value.".to_string(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let webservice = &self.config.webservice;
        let mut builder = Client::builder()
            .timeout(webservice.timeout)
            .default_headers(headers);
        if let Some(agent) = &webservice.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Ok(builder.build()?)
    }
}

fn transport_message(url: &Url, status: StatusCode) -> String {
    format!("POST {url} resulted in a {status} response")
}

/// The gateway answers token requests with JSON. Anything else, and any
/// JSON without an `access_token`, is an authentication failure.
fn parse_access_token(body: &str) -> Result<String> {
    if !body.contains('{') {
        return Err(invalid_token_response());
    }

    let token: TokenResponse =
        serde_json::from_str(body).map_err(|_| invalid_token_response())?;
    if token.access_token.is_empty() {
        return Err(invalid_token_response());
    }

    Ok(token.access_token)
}

fn invalid_token_response() -> NovaError {
    NovaError::Authentication {
        message: "Oauth2 authentication failed. Invalid json response. Access token not found."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_access_token() {
        let token = parse_access_token(r#"{"access_token":"abc","expires_in":300}"#).unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn test_non_json_token_body_is_rejected() {
        let err = parse_access_token("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, NovaError::Authentication { .. }));
        assert_eq!(
            err.to_string(),
            "Oauth2 authentication failed. Invalid json response. Access token not found."
        );
    }

    #[test]
    fn test_token_body_without_access_token_is_rejected() {
        let err = parse_access_token(r#"{"error":"invalid_client"}"#).unwrap_err();
        assert!(matches!(err, NovaError::Authentication { .. }));
    }

    #[test]
    fn test_empty_access_token_is_rejected() {
        let err = parse_access_token(r#"{"access_token":""}"#).unwrap_err();
        assert!(matches!(err, NovaError::Authentication { .. }));
    }

    #[test]
    fn test_transport_message_format() {
        let url = Url::parse("https://nova-int.sbb.ch/novaan/x").unwrap();
        assert_eq!(
            transport_message(&url, StatusCode::INTERNAL_SERVER_ERROR),
            "POST https://nova-int.sbb.ch/novaan/x resulted in a 500 Internal Server Error response"
        );
    }
}
