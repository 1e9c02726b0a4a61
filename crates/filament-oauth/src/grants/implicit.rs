//! The Implicit grant (RFC 6749 section 4.2). The token comes back in the
//! redirect URI's fragment; there is no token endpoint round trip.

use smol_str::SmolStr;
use url::Url;

use crate::authorization::AuthorizationRequest;
use crate::client::OAuth2Client;
use crate::error::{OAuthError, Result};
use crate::grants::redirect;
use crate::scopes::Scope;
use crate::state::{GrantKind, GrantSnapshot};
use crate::types::AccessToken;

/// An implicit flow that has not been through the user agent yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplicitGrant {
    scope: Scope,
    state: SmolStr,
}

impl ImplicitGrant {
    pub fn new(client: &OAuth2Client, scope: Scope) -> Self {
        Self {
            scope,
            state: client.random_chars(),
        }
    }

    pub(crate) fn restore(scope: Scope, state: SmolStr) -> Self {
        Self { scope, state }
    }

    pub fn csrf_state(&self) -> &str {
        &self.state
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The URL to open in the user agent.
    pub fn authorization_url(&self, client: &OAuth2Client) -> Url {
        let request = if self.scope.is_empty() {
            AuthorizationRequest::new("token", self.state.clone())
        } else {
            AuthorizationRequest::scoped("token", &self.scope, self.state.clone())
        };
        client.authorization_url(client.authorization_request(request))
    }

    /// Continues the flow with the redirect URI the user agent came back
    /// with. The token fields are in the redirect's **fragment** (RFC 6749
    /// section 4.2.2), never its query.
    pub fn with_redirect(self, redirect_uri: &Url) -> Result<AuthorizedImplicitGrant> {
        let parameters = redirect::form_parameters(redirect_uri.fragment().unwrap_or(""));
        redirect::require_state(&parameters, &self.state)?;
        if redirect::first(&parameters, "access_token").is_none() {
            return Err(OAuthError::missing_parameter("access_token"));
        }
        Ok(AuthorizedImplicitGrant {
            scope: self.scope,
            state: self.state,
            redirect_uri: redirect_uri.clone(),
        })
    }

    pub fn snapshot(&self) -> GrantSnapshot {
        GrantSnapshot {
            kind: GrantKind::Implicit,
            scope: self.scope.clone(),
            state: self.state.clone(),
            code_verifier: None,
            redirect_uri: None,
        }
    }
}

/// An implicit flow whose redirect has been accepted. The token is already
/// in the carried fragment; materializing it is a pure parse that
/// re-validates the `state` field.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedImplicitGrant {
    scope: Scope,
    state: SmolStr,
    redirect_uri: Url,
}

impl AuthorizedImplicitGrant {
    pub(crate) fn restore(scope: Scope, state: SmolStr, redirect_uri: Url) -> Self {
        Self {
            scope,
            state,
            redirect_uri,
        }
    }

    pub fn csrf_state(&self) -> &str {
        &self.state
    }

    /// Materializes the access token from the fragment. `expires_in`
    /// defaults to the provider's configured TTL and `scope` to the
    /// requested scope when the fragment omits them.
    pub fn access_token(&self, client: &OAuth2Client) -> Result<AccessToken> {
        AccessToken::from_fragment(
            &self.redirect_uri,
            &self.state,
            &self.scope,
            client.default_token_ttl(),
        )
    }

    pub fn snapshot(&self) -> GrantSnapshot {
        GrantSnapshot {
            kind: GrantKind::AuthorizedImplicit,
            scope: self.scope.clone(),
            state: self.state.clone(),
            code_verifier: None,
            redirect_uri: Some(self.redirect_uri.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::InteractiveGrant;
    use crate::testing::test_client;
    use chrono::TimeDelta;

    fn pinned_grant() -> ImplicitGrant {
        ImplicitGrant::restore(Scope::new(["calendar"]), SmolStr::new_static("xyz"))
    }

    #[test]
    fn authorization_url_uses_token_response_type() {
        let url = pinned_grant().authorization_url(&test_client());
        assert_eq!(
            url.as_str(),
            "http://auth.example.com/authorize?response_type=token&scope=calendar&state=xyz\
             &client_id=abcd&redirect_uri=http%3A%2F%2Flocalhost%3A1234"
        );
    }

    #[test]
    fn fragment_token_is_materialized_without_a_network_call() {
        let redirect = Url::parse(
            "http://localhost:1234#access_token=AT&token_type=Bearer&expires_in=60&state=xyz",
        )
        .unwrap();
        let token = pinned_grant()
            .with_redirect(&redirect)
            .unwrap()
            .access_token(&test_client())
            .unwrap();
        assert_eq!(token.access_token(), "AT");
        assert_eq!(token.expires_at(), token.issued_at() + TimeDelta::seconds(60));
        // scope defaults to the requested one
        assert_eq!(token.scope(), &Scope::new(["calendar"]));
    }

    #[test]
    fn missing_expires_in_falls_back_to_provider_ttl() {
        let redirect =
            Url::parse("http://localhost:1234#access_token=AT&token_type=Bearer&state=xyz")
                .unwrap();
        let token = pinned_grant()
            .with_redirect(&redirect)
            .unwrap()
            .access_token(&test_client())
            .unwrap();
        assert_eq!(
            token.expires_at(),
            token.issued_at() + TimeDelta::seconds(3600)
        );
    }

    #[test]
    fn wrong_state_is_a_csrf_error() {
        let redirect =
            Url::parse("http://localhost:1234#access_token=AT&token_type=Bearer&state=evil")
                .unwrap();
        let err = pinned_grant().with_redirect(&redirect).unwrap_err();
        assert!(matches!(err, OAuthError::StateMismatch));
    }

    #[test]
    fn token_in_query_does_not_satisfy_the_fragment_check() {
        // implicit parameters live in the fragment, not the query
        let redirect =
            Url::parse("http://localhost:1234?access_token=AT&token_type=Bearer&state=xyz")
                .unwrap();
        let err = pinned_grant().with_redirect(&redirect).unwrap_err();
        assert!(matches!(err, OAuthError::MissingParameter(name) if name == "state"));
    }

    #[test]
    fn snapshot_round_trip_restores_the_authorized_grant() {
        let redirect =
            Url::parse("http://localhost:1234#access_token=AT&token_type=Bearer&state=xyz")
                .unwrap();
        let authorized = pinned_grant().with_redirect(&redirect).unwrap();
        let encoded = authorized.snapshot().encode().unwrap();
        let InteractiveGrant::AuthorizedImplicit(restored) =
            GrantSnapshot::decode(&encoded).unwrap().grant().unwrap()
        else {
            panic!("snapshot restored to the wrong grant kind");
        };
        assert_eq!(restored, authorized);
        let token = restored.access_token(&test_client()).unwrap();
        assert_eq!(token.access_token(), "AT");
    }
}
