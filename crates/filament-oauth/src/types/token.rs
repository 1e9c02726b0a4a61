//! The issued access token value.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use smol_str::SmolStr;
use url::Url;
use url::form_urlencoded;

use crate::error::{OAuthError, Result};
use crate::scopes::Scope;
use crate::types::TokenResponse;

/// An issued access token.
///
/// Constructed exactly once, either from a token endpoint JSON body or from
/// the redirect fragment of an implicit grant, and immutable afterwards. A
/// refresh never mutates a token; `TokenRefreshGrant` produces a brand-new
/// one.
#[derive(Debug, Clone)]
pub struct AccessToken {
    access_token: SmolStr,
    token_type: SmolStr,
    refresh_token: Option<SmolStr>,
    issued_at: DateTime<Utc>,
    expires_in: TimeDelta,
    scope: Scope,
    extensions: BTreeMap<SmolStr, serde_json::Value>,
}

impl AccessToken {
    /// Builds a token from a parsed token endpoint response.
    ///
    /// `expires_in` falls back to the provider's configured default TTL and
    /// `scope` to the originally requested scope when the server omits them
    /// (RFC 6749 section 5.1 makes both optional).
    pub fn from_response(
        response: TokenResponse,
        requested_scope: &Scope,
        default_ttl: TimeDelta,
    ) -> Self {
        let scope = response
            .scope
            .as_deref()
            .map(Scope::from)
            .unwrap_or_else(|| requested_scope.clone());
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token,
            issued_at: Utc::now(),
            expires_in: response
                .expires_in
                .map(TimeDelta::seconds)
                .unwrap_or(default_ttl),
            scope,
            extensions: response.extensions,
        }
    }

    /// Builds a token from the fragment of an implicit grant redirect URI
    /// (RFC 6749 section 4.2.2).
    ///
    /// The fragment's `state` is validated against `expected_state` before
    /// any field is trusted; a mismatch is a CSRF failure, not a parse
    /// failure.
    pub fn from_fragment(
        redirect_uri: &Url,
        expected_state: &str,
        requested_scope: &Scope,
        default_ttl: TimeDelta,
    ) -> Result<Self> {
        let fragment = redirect_uri.fragment().unwrap_or("");
        let parameters: Vec<(String, String)> = form_urlencoded::parse(fragment.as_bytes())
            .into_owned()
            .collect();
        let first = |name: &str| {
            parameters
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };

        match first("state") {
            None => return Err(OAuthError::missing_parameter("state")),
            Some(state) if state != expected_state => return Err(OAuthError::StateMismatch),
            Some(_) => {}
        }
        let access_token = first("access_token")
            .ok_or_else(|| OAuthError::missing_parameter("access_token"))?;
        let token_type =
            first("token_type").ok_or_else(|| OAuthError::missing_parameter("token_type"))?;
        let expires_in = match first("expires_in") {
            Some(seconds) => TimeDelta::seconds(
                seconds
                    .parse()
                    .map_err(|_| OAuthError::InvalidParameter(SmolStr::new_static("expires_in")))?,
            ),
            None => default_ttl,
        };
        let scope = match first("scope") {
            Some(scope) => Scope::from(scope),
            None => requested_scope.clone(),
        };
        let extensions = parameters
            .iter()
            .filter(|(n, _)| {
                !matches!(
                    n.as_str(),
                    "access_token" | "token_type" | "expires_in" | "scope" | "state"
                )
            })
            .map(|(n, v)| (SmolStr::from(n), serde_json::Value::String(v.clone())))
            .collect();

        Ok(Self {
            access_token: SmolStr::from(access_token),
            token_type: SmolStr::from(token_type),
            refresh_token: None,
            issued_at: Utc::now(),
            expires_in,
            scope,
            extensions,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// `issued_at + expires_in`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + self.expires_in
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// A non-standard member of the token response, if present.
    pub fn extra_parameter(&self, name: &str) -> Option<&serde_json::Value> {
        self.extensions.get(name)
    }
}
