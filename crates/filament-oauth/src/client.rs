//! The client façade: provider endpoints, client credentials, redirect URI,
//! and the entropy source every interactive flow draws from.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::TimeDelta;
use http::header::AUTHORIZATION;
use rand::RngCore;
use rand::rngs::ThreadRng;
use smol_str::SmolStr;
use url::Url;

use crate::authorization::AuthorizationRequest;
use crate::error::Result;
use crate::types::AccessToken;

// 64 URL-safe symbols; each random byte maps uniformly onto one of them.
const STATE_CHARS: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

/// Authorization server endpoints plus the default token TTL applied when a
/// response omits `expires_in`. The TTL is explicit configuration, not a
/// hidden fallback.
#[derive(Debug, Clone)]
pub struct AuthorizationProvider {
    authorization_endpoint: Url,
    token_endpoint: Url,
    default_token_ttl: TimeDelta,
}

impl AuthorizationProvider {
    pub fn new(
        authorization_endpoint: Url,
        token_endpoint: Url,
        default_token_ttl: TimeDelta,
    ) -> Self {
        Self {
            authorization_endpoint,
            token_endpoint,
            default_token_ttl,
        }
    }

    pub fn authorization_endpoint(&self) -> &Url {
        &self.authorization_endpoint
    }

    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    pub fn default_token_ttl(&self) -> TimeDelta {
        self.default_token_ttl
    }
}

/// Registered client credentials, used for HTTP Basic authentication of
/// token requests (RFC 6749 section 2.3.1).
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client_id: SmolStr,
    client_secret: SmolStr,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<SmolStr>, client_secret: impl Into<SmolStr>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn basic_authorization(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
        )
    }
}

/// Binds credentials and a registered redirect URI to a provider.
///
/// A client is borrowed by a grant for the duration of a single operation;
/// grants and their snapshots never embed it, since it holds live
/// credentials.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    provider: AuthorizationProvider,
    credentials: ClientCredentials,
    redirect_uri: SmolStr,
}

impl OAuth2Client {
    /// `redirect_uri` is kept byte for byte as registered; it is sent
    /// verbatim in both the authorization request and the code exchange,
    /// which must agree exactly.
    pub fn new(
        provider: AuthorizationProvider,
        credentials: ClientCredentials,
        redirect_uri: impl Into<SmolStr>,
    ) -> Self {
        Self {
            provider,
            credentials,
            redirect_uri: redirect_uri.into(),
        }
    }

    pub fn provider(&self) -> &AuthorizationProvider {
        &self.provider
    }

    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn default_token_ttl(&self) -> TimeDelta {
        self.provider.default_token_ttl()
    }

    /// A fresh opaque random string for CSRF state values, drawn from a
    /// cryptographically secure generator. 64 characters over a 64-symbol
    /// alphabet is 384 bits of entropy; do not shorten this, guessable
    /// state values defeat the CSRF check.
    pub fn random_chars(&self) -> SmolStr {
        let mut bytes = [0u8; 64];
        ThreadRng::default().fill_bytes(&mut bytes);
        bytes
            .iter()
            .map(|b| STATE_CHARS[(b % 64) as usize] as char)
            .collect::<String>()
            .into()
    }

    /// Upserts this client's `client_id` and `redirect_uri` onto an
    /// authorization request.
    pub fn authorization_request(&self, request: AuthorizationRequest) -> AuthorizationRequest {
        request
            .with_client_id(self.client_id())
            .with_redirect_uri(self.redirect_uri())
    }

    /// Renders a finished request onto the provider's authorization
    /// endpoint.
    pub fn authorization_url(&self, request: AuthorizationRequest) -> Url {
        request.authorization_uri(self.provider.authorization_endpoint())
    }

    pub(crate) fn basic_authorization(&self) -> String {
        self.credentials.basic_authorization()
    }

    /// Decorates a resource request with `Authorization: Bearer <token>`.
    pub fn bearer_authenticated<B>(
        &self,
        token: &AccessToken,
        mut request: http::Request<B>,
    ) -> Result<http::Request<B>> {
        let value = http::HeaderValue::from_str(&format!("Bearer {}", token.access_token()))
            .map_err(http::Error::from)?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(request)
    }
}
