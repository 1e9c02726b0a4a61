//! The Authorization Code grant with PKCE (RFC 6749 section 4.1, RFC 7636).

use smol_str::SmolStr;
use url::Url;

use crate::authorization::AuthorizationRequest;
use crate::client::OAuth2Client;
use crate::error::{OAuthError, Result};
use crate::grants::redirect;
use crate::http_client::HttpClient;
use crate::pkce::{CodeChallenge, CodeVerifier};
use crate::request::token_request;
use crate::scopes::Scope;
use crate::state::{GrantKind, GrantSnapshot};
use crate::types::{AccessToken, AuthorizationCodeTokenRequest};

/// An authorization code flow that has not been through the user agent yet.
///
/// The CSRF state and PKCE verifier are drawn once at construction and fixed
/// for the lifetime of the flow, including across snapshot export/import.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationCodeGrant {
    scope: Scope,
    state: SmolStr,
    verifier: CodeVerifier,
}

impl AuthorizationCodeGrant {
    pub fn new(client: &OAuth2Client, scope: Scope) -> Self {
        Self {
            scope,
            state: client.random_chars(),
            verifier: CodeVerifier::generate(),
        }
    }

    pub(crate) fn restore(scope: Scope, state: SmolStr, verifier: CodeVerifier) -> Self {
        Self {
            scope,
            state,
            verifier,
        }
    }

    /// The CSRF state issued for this flow, e.g. for keying stored
    /// snapshots.
    pub fn csrf_state(&self) -> &str {
        &self.state
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The URL to open in the user agent.
    pub fn authorization_url(&self, client: &OAuth2Client) -> Url {
        let request = if self.scope.is_empty() {
            AuthorizationRequest::new("code", self.state.clone())
        } else {
            AuthorizationRequest::scoped("code", &self.scope, self.state.clone())
        };
        let request = client
            .authorization_request(request)
            .with_code_challenge(&CodeChallenge::s256(&self.verifier));
        client.authorization_url(request)
    }

    /// Continues the flow with the redirect URI the user agent came back
    /// with. The authorization server's parameters are in the redirect's
    /// **query** (RFC 6749 section 4.1.2).
    ///
    /// Fails with [`OAuthError::StateMismatch`] when the redirect's `state`
    /// differs from the issued one, and with
    /// [`OAuthError::MissingParameter`] when `state` or `code` is absent.
    pub fn with_redirect(self, redirect_uri: &Url) -> Result<AuthorizedCodeGrant> {
        let parameters = redirect::form_parameters(redirect_uri.query().unwrap_or(""));
        redirect::require_state(&parameters, &self.state)?;
        if redirect::first(&parameters, "code").is_none() {
            return Err(OAuthError::missing_parameter("code"));
        }
        Ok(AuthorizedCodeGrant {
            scope: self.scope,
            state: self.state,
            verifier: self.verifier,
            redirect_uri: redirect_uri.clone(),
        })
    }

    pub fn snapshot(&self) -> GrantSnapshot {
        GrantSnapshot {
            kind: GrantKind::AuthorizationCode,
            scope: self.scope.clone(),
            state: self.state.clone(),
            code_verifier: Some(self.verifier.clone()),
            redirect_uri: None,
        }
    }
}

/// An authorization code flow the user has consented to. The only remaining
/// step is exchanging the code at the token endpoint.
///
/// The received redirect URI is carried whole instead of the bare code, so a
/// snapshot of this state holds no detached one-shot secret; the code is
/// re-extracted (and the state re-checked) at exchange time.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedCodeGrant {
    scope: Scope,
    state: SmolStr,
    verifier: CodeVerifier,
    redirect_uri: Url,
}

impl AuthorizedCodeGrant {
    pub(crate) fn restore(
        scope: Scope,
        state: SmolStr,
        verifier: CodeVerifier,
        redirect_uri: Url,
    ) -> Self {
        Self {
            scope,
            state,
            verifier,
            redirect_uri,
        }
    }

    pub fn csrf_state(&self) -> &str {
        &self.state
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Exchanges the authorization code for an access token.
    ///
    /// The token request carries the code, the client's registered
    /// `redirect_uri` (the token endpoint requires the exact value used in
    /// the authorization step) and the PKCE verifier, authenticated with
    /// the client's Basic credentials.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn access_token<T>(&self, client: &OAuth2Client, http: &T) -> Result<AccessToken>
    where
        T: HttpClient + Sync,
    {
        let parameters = redirect::form_parameters(self.redirect_uri.query().unwrap_or(""));
        redirect::require_state(&parameters, &self.state)?;
        let code = redirect::first(&parameters, "code")
            .ok_or_else(|| OAuthError::missing_parameter("code"))?;
        let request =
            AuthorizationCodeTokenRequest::new(code, client.redirect_uri(), self.verifier.as_str());
        token_request(client, http, &request, &self.scope).await
    }

    pub fn snapshot(&self) -> GrantSnapshot {
        GrantSnapshot {
            kind: GrantKind::AuthorizedAuthorizationCode,
            scope: self.scope.clone(),
            state: self.state.clone(),
            code_verifier: Some(self.verifier.clone()),
            redirect_uri: Some(self.redirect_uri.clone()),
        }
    }
}
