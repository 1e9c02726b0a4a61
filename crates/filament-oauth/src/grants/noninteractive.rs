//! The single-step grants: no user agent, no persisted state. Each is a
//! stateless `(client, parameters) -> AccessToken` call.

use smol_str::SmolStr;

use crate::client::OAuth2Client;
use crate::error::Result;
use crate::http_client::HttpClient;
use crate::request::token_request;
use crate::scopes::Scope;
use crate::types::{
    AccessToken, ClientCredentialsTokenRequest, RefreshTokenRequest,
    ResourceOwnerPasswordTokenRequest,
};

/// Client Credentials grant (RFC 6749 section 4.4).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentialsGrant {
    scope: Scope,
}

impl ClientCredentialsGrant {
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn access_token<T>(&self, client: &OAuth2Client, http: &T) -> Result<AccessToken>
    where
        T: HttpClient + Sync,
    {
        token_request(
            client,
            http,
            &ClientCredentialsTokenRequest::new(&self.scope),
            &self.scope,
        )
        .await
    }
}

/// Resource Owner Password Credentials grant (RFC 6749 section 4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOwnerPasswordGrant {
    scope: Scope,
    username: SmolStr,
    password: SmolStr,
}

impl ResourceOwnerPasswordGrant {
    pub fn new(scope: Scope, username: impl Into<SmolStr>, password: impl Into<SmolStr>) -> Self {
        Self {
            scope,
            username: username.into(),
            password: password.into(),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn access_token<T>(&self, client: &OAuth2Client, http: &T) -> Result<AccessToken>
    where
        T: HttpClient + Sync,
    {
        token_request(
            client,
            http,
            &ResourceOwnerPasswordTokenRequest::new(&self.username, &self.password, &self.scope),
            &self.scope,
        )
        .await
    }
}

/// Refreshing an Access Token (RFC 6749 section 6). Produces a brand-new
/// [`AccessToken`]; the one the refresh token came from is untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRefreshGrant {
    scope: Scope,
    refresh_token: SmolStr,
}

impl TokenRefreshGrant {
    pub fn new(scope: Scope, refresh_token: impl Into<SmolStr>) -> Self {
        Self {
            scope,
            refresh_token: refresh_token.into(),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub async fn access_token<T>(&self, client: &OAuth2Client, http: &T) -> Result<AccessToken>
    where
        T: HttpClient + Sync,
    {
        token_request(
            client,
            http,
            &RefreshTokenRequest::new(&self.refresh_token, &self.scope),
            &self.scope,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, json_response, test_client};
    use http::StatusCode;

    const TOKEN_JSON: &str = r#"{"access_token":"AT","token_type":"Bearer","expires_in":3600}"#;

    #[tokio::test]
    async fn client_credentials_sends_scope_when_present() {
        let http = MockClient::default();
        http.respond(json_response(StatusCode::OK, TOKEN_JSON)).await;
        ClientCredentialsGrant::new(Scope::new(["s1", "s2"]))
            .access_token(&test_client(), &http)
            .await
            .unwrap();
        assert_eq!(
            http.sent().await.unwrap().body(),
            b"grant_type=client_credentials&scope=s1+s2"
        );
    }

    #[tokio::test]
    async fn password_grant_sends_credentials_in_the_body() {
        let http = MockClient::default();
        http.respond(json_response(StatusCode::OK, TOKEN_JSON)).await;
        ResourceOwnerPasswordGrant::new(Scope::empty(), "alice", "secret")
            .access_token(&test_client(), &http)
            .await
            .unwrap();
        assert_eq!(
            http.sent().await.unwrap().body(),
            b"grant_type=password&username=alice&password=secret"
        );
    }

    #[tokio::test]
    async fn refresh_produces_a_new_token() {
        let http = MockClient::default();
        http.respond(json_response(StatusCode::OK, TOKEN_JSON)).await;
        let token = TokenRefreshGrant::new(Scope::empty(), "RT-old")
            .access_token(&test_client(), &http)
            .await
            .unwrap();
        assert_eq!(token.access_token(), "AT");
        assert_eq!(
            http.sent().await.unwrap().body(),
            b"grant_type=refresh_token&refresh_token=RT-old"
        );
    }
}
